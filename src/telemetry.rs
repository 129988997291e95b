use std::collections::VecDeque;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const MAX_LOGS: usize = 200;

/// Structured outcome of a remote fetch that the caller does not see as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchEvent {
    /// Non-success status, transport error, or a payload of the wrong shape.
    FetchFailure {
        url: String,
        status: Option<u16>,
        reason: String,
    },
    /// One element of an otherwise usable payload was skipped.
    MalformedRecord {
        url: String,
        index: usize,
        reason: String,
    },
    CacheHit { key: String },
    Fetched { url: String, records: usize },
}

impl FetchEvent {
    pub fn is_failure(&self) -> bool {
        matches!(self, FetchEvent::FetchFailure { .. })
    }

    pub fn console_line(&self) -> String {
        match self {
            FetchEvent::FetchFailure {
                url,
                status: Some(status),
                ..
            } => format!("[WARN] Failed to fetch {url} (status {status})"),
            FetchEvent::FetchFailure { url, reason, .. } => {
                format!("[WARN] Failed to fetch {url}: {reason}")
            }
            FetchEvent::MalformedRecord { index, reason, .. } => {
                format!("[WARN] Skipped record {index}: {reason}")
            }
            FetchEvent::CacheHit { key } => format!("[INFO] Cached {key}"),
            FetchEvent::Fetched { url, records } => {
                format!("[INFO] Loaded {records} rows from {url}")
            }
        }
    }
}

pub trait EventSink {
    fn record(&mut self, event: FetchEvent);
}

/// Emits every event through `tracing` and keeps a bounded console tail for the UI.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<FetchEvent>,
    lines: VecDeque<String>,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            lines: VecDeque::with_capacity(MAX_LOGS),
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.lines.push_back(msg.into());
        while self.lines.len() > MAX_LOGS {
            self.lines.pop_front();
        }
    }

    pub fn lines(&self) -> &VecDeque<String> {
        &self.lines
    }

    pub fn failures(&self) -> impl Iterator<Item = &FetchEvent> {
        self.events.iter().filter(|e| e.is_failure())
    }

    pub fn events(&self) -> &[FetchEvent] {
        &self.events
    }
}

impl EventSink for EventLog {
    fn record(&mut self, event: FetchEvent) {
        match &event {
            FetchEvent::FetchFailure {
                url,
                status,
                reason,
            } => tracing::warn!(%url, ?status, %reason, "fetch failed, degrading to empty"),
            FetchEvent::MalformedRecord { url, index, reason } => {
                tracing::warn!(%url, index, %reason, "skipping malformed record")
            }
            FetchEvent::CacheHit { key } => tracing::debug!(%key, "cache hit"),
            FetchEvent::Fetched { url, records } => tracing::info!(%url, records, "fetched"),
        }
        if !matches!(event, FetchEvent::CacheHit { .. }) {
            self.push_log(event.console_line());
        }
        // Keep only the recent window; the console tail is what the UI reads.
        if self.events.len() >= MAX_LOGS {
            self.events.remove(0);
        }
        self.events.push(event);
    }
}

/// Installs the global subscriber, writing to `log_path` since the terminal
/// is owned by the UI. Filter comes from `RUST_LOG`.
pub fn init_tracing(log_path: &Path) -> Result<()> {
    let file = File::create(log_path)
        .with_context(|| format!("create log file {}", log_path.display()))?;
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "statsbomb_viewer=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .context("install tracing subscriber")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_reach_console_but_cache_hits_do_not() {
        let mut log = EventLog::new();
        log.record(FetchEvent::CacheHit {
            key: "u".to_string(),
        });
        log.record(FetchEvent::FetchFailure {
            url: "http://x/matches/1/2.json".to_string(),
            status: Some(404),
            reason: "not found".to_string(),
        });

        assert_eq!(log.events().len(), 2);
        assert_eq!(log.failures().count(), 1);
        assert_eq!(log.lines().len(), 1);
        assert!(log.lines()[0].contains("status 404"));
    }

    #[test]
    fn console_is_bounded() {
        let mut log = EventLog::new();
        for i in 0..(MAX_LOGS + 25) {
            log.push_log(format!("line {i}"));
        }
        assert_eq!(log.lines().len(), MAX_LOGS);
        assert_eq!(log.lines().back().map(String::as_str), Some("line 224"));
    }
}
