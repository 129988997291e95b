use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{ViewerError, ViewerResult};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompetitionCatalogEntry {
    pub competition_name: String,
    pub competition_id: u32,
    pub season_name: String,
    pub season_id: u32,
}

/// Read-only competition/season reference table, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CompetitionCatalogEntry>,
}

impl Catalog {
    pub fn from_entries(entries: Vec<CompetitionCatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn load(path: &Path) -> ViewerResult<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| ViewerError::Catalog(format!("{}: {err}", path.display())))?;
        Self::from_json(&raw)
    }

    /// Extra fields per entry are ignored.
    pub fn from_json(raw: &str) -> ViewerResult<Self> {
        let entries: Vec<CompetitionCatalogEntry> = serde_json::from_str(raw.trim())
            .map_err(|err| ViewerError::Catalog(format!("invalid catalog json: {err}")))?;
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CompetitionCatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn resolve_competition_id(catalog: &Catalog, competition_name: &str) -> ViewerResult<u32> {
    single_id(
        "competition",
        competition_name,
        catalog
            .entries
            .iter()
            .filter(|e| e.competition_name == competition_name)
            .map(|e| e.competition_id),
    )
}

pub fn resolve_season_id(catalog: &Catalog, season_name: &str) -> ViewerResult<u32> {
    single_id(
        "season",
        season_name,
        catalog
            .entries
            .iter()
            .filter(|e| e.season_name == season_name)
            .map(|e| e.season_id),
    )
}

/// Season lookup restricted to one competition's rows. Season labels such as
/// "2022" recur across competitions with different ids.
pub fn resolve_season_id_for(
    catalog: &Catalog,
    competition_id: u32,
    season_name: &str,
) -> ViewerResult<u32> {
    single_id(
        "season",
        season_name,
        catalog
            .entries
            .iter()
            .filter(|e| e.competition_id == competition_id && e.season_name == season_name)
            .map(|e| e.season_id),
    )
}

pub fn match_list_url(base_url: &str, competition_id: u32, season_id: u32) -> String {
    format!(
        "{}/matches/{competition_id}/{season_id}.json",
        base_url.trim_end_matches('/')
    )
}

pub fn build_match_list_url(
    catalog: &Catalog,
    base_url: &str,
    competition_name: &str,
    season_name: &str,
) -> ViewerResult<String> {
    let competition_id = resolve_competition_id(catalog, competition_name)?;
    let season_id = resolve_season_id_for(catalog, competition_id, season_name)?;
    Ok(match_list_url(base_url, competition_id, season_id))
}

fn single_id(
    field: &'static str,
    name: &str,
    ids: impl Iterator<Item = u32>,
) -> ViewerResult<u32> {
    let distinct: BTreeSet<u32> = ids.collect();
    match distinct.first() {
        Some(id) if distinct.len() == 1 => Ok(*id),
        _ => Err(ViewerError::missing_reference(field, name, distinct.len())),
    }
}
