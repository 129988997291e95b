#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Result, anyhow};

use statsbomb_viewer::catalog::{Catalog, CompetitionCatalogEntry};
use statsbomb_viewer::http_client::{FetchResponse, JsonSource};

pub const BASE: &str = "http://stub/data";

pub fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

pub fn shipped_catalog() -> Catalog {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("assets");
    path.push("competitions.json");
    Catalog::load(&path).expect("shipped catalog should load")
}

pub fn entry(
    competition: &str,
    competition_id: u32,
    season: &str,
    season_id: u32,
) -> CompetitionCatalogEntry {
    CompetitionCatalogEntry {
        competition_name: competition.to_string(),
        competition_id,
        season_name: season.to_string(),
        season_id,
    }
}

/// Serves canned responses; unknown URLs answer 404. `offline` URLs fail at
/// the transport level.
#[derive(Default)]
pub struct StubSource {
    responses: HashMap<String, FetchResponse>,
    offline: Vec<String>,
    calls: RefCell<Vec<String>>,
}

impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, status: u16, body: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            FetchResponse {
                status,
                body: body.to_string(),
            },
        );
        self
    }

    pub fn offline(mut self, url: &str) -> Self {
        self.offline.push(url.to_string());
        self
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.calls.borrow().iter().filter(|u| u.as_str() == url).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl JsonSource for StubSource {
    fn get(&self, url: &str) -> Result<FetchResponse> {
        self.calls.borrow_mut().push(url.to_string());
        if self.offline.iter().any(|u| u == url) {
            return Err(anyhow!("connection refused"));
        }
        Ok(self.responses.get(url).cloned().unwrap_or(FetchResponse {
            status: 404,
            body: "404: Not Found".to_string(),
        }))
    }
}
