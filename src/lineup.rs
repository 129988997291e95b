use std::collections::HashSet;

use anyhow::{Context, Result, anyhow};
use serde_json::Value;

use crate::cache::MemoCache;
use crate::http_client::{JsonSource, get_or_report};
use crate::telemetry::{EventSink, FetchEvent};

pub const STARTING_XI: &str = "Starting XI";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineupEntry {
    pub team_name: String,
    pub player_display_name: String,
    pub is_starting_eleven: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamLineup {
    pub team_name: String,
    pub players: Vec<LineupEntry>,
}

/// Per-team rosters for one match, teams in payload order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamRoster {
    teams: Vec<TeamLineup>,
}

impl TeamRoster {
    pub fn from_teams(teams: Vec<TeamLineup>) -> Self {
        Self { teams }
    }

    pub fn teams(&self) -> &[TeamLineup] {
        &self.teams
    }

    pub fn team_names(&self) -> impl Iterator<Item = &str> {
        self.teams.iter().map(|t| t.team_name.as_str())
    }

    pub fn players(&self, team_name: &str) -> Option<&[LineupEntry]> {
        self.teams
            .iter()
            .find(|t| t.team_name == team_name)
            .map(|t| t.players.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

/// Starter display names per team.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartingElevenView {
    teams: Vec<(String, Vec<String>)>,
}

impl StartingElevenView {
    pub fn teams(&self) -> &[(String, Vec<String>)] {
        &self.teams
    }

    pub fn get(&self, team_name: &str) -> Option<&[String]> {
        self.teams
            .iter()
            .find(|(name, _)| name == team_name)
            .map(|(_, players)| players.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Longest team list; the grid renders this many rows.
    pub fn max_len(&self) -> usize {
        self.teams.iter().map(|(_, p)| p.len()).max().unwrap_or(0)
    }
}

pub fn derive_starting_eleven(roster: &TeamRoster) -> StartingElevenView {
    let teams = roster
        .teams
        .iter()
        .map(|team| {
            let starters = team
                .players
                .iter()
                .filter(|p| p.is_starting_eleven)
                .map(|p| p.player_display_name.clone())
                .collect();
            (team.team_name.clone(), starters)
        })
        .collect();
    StartingElevenView { teams }
}

#[derive(Debug, Clone, Default)]
pub struct LineupParse {
    pub roster: TeamRoster,
    pub skipped: Vec<(usize, String)>,
}

pub fn parse_lineup_json(raw: &str) -> Result<LineupParse> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(LineupParse::default());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid lineup json")?;
    let arr = root
        .as_array()
        .ok_or_else(|| anyhow!("lineup payload is not an array"))?;

    let mut out = LineupParse::default();
    let mut seen = HashSet::new();
    // Skipped player indices are flattened across teams so each one is unique.
    let mut player_idx = 0usize;
    for (idx, item) in arr.iter().enumerate() {
        let Some(team_name) = item.get("team_name").and_then(Value::as_str) else {
            out.skipped.push((idx, "missing team_name".to_string()));
            continue;
        };
        let Some(list) = item.get("lineup").and_then(Value::as_array) else {
            out.skipped.push((idx, "missing lineup array".to_string()));
            continue;
        };
        if !seen.insert(team_name.to_string()) {
            out.skipped.push((idx, format!("duplicate team '{team_name}'")));
            continue;
        }

        let mut players = Vec::with_capacity(list.len());
        for player in list {
            match parse_lineup_entry(team_name, player) {
                Some(entry) => players.push(entry),
                None => out.skipped.push((
                    player_idx,
                    format!("player without a name in '{team_name}'"),
                )),
            }
            player_idx += 1;
        }
        out.roster.teams.push(TeamLineup {
            team_name: team_name.to_string(),
            players,
        });
    }
    Ok(out)
}

fn parse_lineup_entry(team_name: &str, v: &Value) -> Option<LineupEntry> {
    let player_display_name = display_name(v)?;
    let is_starting_eleven = v
        .get("positions")
        .and_then(Value::as_array)
        .is_some_and(|positions| {
            positions
                .iter()
                .any(|pos| pos.get("start_reason").and_then(Value::as_str) == Some(STARTING_XI))
        });
    Some(LineupEntry {
        team_name: team_name.to_string(),
        player_display_name,
        is_starting_eleven,
    })
}

fn display_name(v: &Value) -> Option<String> {
    let pick = |key: &str| {
        v.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };
    pick("player_nickname")
        .or_else(|| pick("player_name"))
        .map(str::to_string)
}

pub fn lineup_url(base_url: &str, match_id: u64) -> String {
    format!("{}/lineups/{match_id}.json", base_url.trim_end_matches('/'))
}

/// Fetches one match's lineups. Same degrade-to-empty policy as the match list.
pub fn fetch_lineup<S>(
    source: &S,
    cache: &mut dyn MemoCache<u64, TeamRoster>,
    sink: &mut dyn EventSink,
    base_url: &str,
    match_id: u64,
) -> TeamRoster
where
    S: JsonSource + ?Sized,
{
    if let Some(hit) = cache.get(&match_id) {
        sink.record(FetchEvent::CacheHit {
            key: format!("lineup {match_id}"),
        });
        return hit;
    }

    let url = lineup_url(base_url, match_id);
    let Some(resp) = get_or_report(source, sink, &url) else {
        return TeamRoster::default();
    };

    let parsed = match parse_lineup_json(&resp.body) {
        Ok(parsed) => parsed,
        Err(err) => {
            sink.record(FetchEvent::FetchFailure {
                url,
                status: Some(resp.status),
                reason: format!("{err:#}"),
            });
            return TeamRoster::default();
        }
    };
    for (index, reason) in parsed.skipped {
        sink.record(FetchEvent::MalformedRecord {
            url: url.clone(),
            index,
            reason,
        });
    }
    sink.record(FetchEvent::Fetched {
        url,
        records: parsed.roster.teams.iter().map(|t| t.players.len()).sum(),
    });
    cache.put(match_id, parsed.roster.clone());
    parsed.roster
}
