use std::collections::HashSet;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use serde_json::Value;

use crate::cache::MemoCache;
use crate::http_client::{JsonSource, get_or_report};
use crate::telemetry::{EventSink, FetchEvent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub match_id: u64,
    pub match_date: NaiveDate,
    pub home_team: String,
    pub away_team: String,
    pub home_score: u32,
    pub away_score: u32,
}

/// Match rows in source order. Match ids are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchListView {
    records: Vec<MatchRecord>,
}

impl MatchListView {
    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first(&self) -> Option<&MatchRecord> {
        self.records.first()
    }

    pub fn get(&self, match_id: u64) -> Option<&MatchRecord> {
        self.records.iter().find(|m| m.match_id == match_id)
    }

    pub fn contains(&self, match_id: u64) -> bool {
        self.get(match_id).is_some()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MatchListParse {
    pub view: MatchListView,
    /// (array index, reason) for every element that was dropped.
    pub skipped: Vec<(usize, String)>,
}

pub fn parse_match_list_json(raw: &str) -> Result<MatchListParse> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(MatchListParse::default());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid match list json")?;
    let arr = root
        .as_array()
        .ok_or_else(|| anyhow!("match list payload is not an array"))?;

    let mut out = MatchListParse::default();
    let mut seen = HashSet::with_capacity(arr.len());
    for (idx, item) in arr.iter().enumerate() {
        match parse_match_record(item) {
            Ok(record) if !seen.insert(record.match_id) => {
                let reason = format!("duplicate match_id {}", record.match_id);
                out.skipped.push((idx, reason));
            }
            Ok(record) => out.view.records.push(record),
            Err(reason) => out.skipped.push((idx, reason)),
        }
    }
    Ok(out)
}

fn parse_match_record(v: &Value) -> Result<MatchRecord, String> {
    let match_id = v
        .get("match_id")
        .and_then(Value::as_u64)
        .ok_or("missing match_id")?;
    let raw_date = v
        .get("match_date")
        .and_then(Value::as_str)
        .ok_or("missing match_date")?;
    let match_date = NaiveDate::parse_from_str(raw_date.trim(), "%Y-%m-%d")
        .map_err(|_| format!("bad match_date '{raw_date}'"))?;
    let home_team = v
        .get("home_team")
        .and_then(|t| t.get("home_team_name"))
        .and_then(Value::as_str)
        .ok_or("missing home_team.home_team_name")?;
    let away_team = v
        .get("away_team")
        .and_then(|t| t.get("away_team_name"))
        .and_then(Value::as_str)
        .ok_or("missing away_team.away_team_name")?;
    let home_score = score(v, "home_score")?;
    let away_score = score(v, "away_score")?;

    Ok(MatchRecord {
        match_id,
        match_date,
        home_team: home_team.to_string(),
        away_team: away_team.to_string(),
        home_score,
        away_score,
    })
}

fn score(v: &Value, key: &str) -> Result<u32, String> {
    v.get(key)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| format!("missing or negative {key}"))
}

/// Fetches and flattens one competition/season match list.
///
/// Never fails: a bad status, transport error, or unusable payload yields an
/// empty view and a `FetchFailure` event. Only successful loads are cached.
pub fn fetch_match_list<S>(
    source: &S,
    cache: &mut dyn MemoCache<String, MatchListView>,
    sink: &mut dyn EventSink,
    url: &str,
) -> MatchListView
where
    S: JsonSource + ?Sized,
{
    let key = url.to_string();
    if let Some(hit) = cache.get(&key) {
        sink.record(FetchEvent::CacheHit { key });
        return hit;
    }

    let Some(resp) = get_or_report(source, sink, url) else {
        return MatchListView::default();
    };

    let parsed = match parse_match_list_json(&resp.body) {
        Ok(parsed) => parsed,
        Err(err) => {
            sink.record(FetchEvent::FetchFailure {
                url: key,
                status: Some(resp.status),
                reason: format!("{err:#}"),
            });
            return MatchListView::default();
        }
    };
    for (index, reason) in parsed.skipped {
        sink.record(FetchEvent::MalformedRecord {
            url: key.clone(),
            index,
            reason,
        });
    }
    sink.record(FetchEvent::Fetched {
        url: key.clone(),
        records: parsed.view.len(),
    });
    cache.put(key, parsed.view.clone());
    parsed.view
}
