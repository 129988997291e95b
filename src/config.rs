use std::env;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://raw.githubusercontent.com/statsbomb/open-data/master/data";
pub const DEFAULT_CATALOG_PATH: &str = "assets/competitions.json";
pub const DEFAULT_EXPORT_PATH: &str = "statsbomb_export.xlsx";
pub const DEFAULT_LOG_PATH: &str = "statsbomb_viewer.log";
pub const DEFAULT_CACHE_ENTRIES: usize = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub base_url: String,
    pub catalog_path: PathBuf,
    pub cache_max_entries: usize,
    pub http_timeout_secs: u64,
    pub export_path: PathBuf,
    pub log_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            cache_max_entries: DEFAULT_CACHE_ENTRIES,
            http_timeout_secs: DEFAULT_TIMEOUT_SECS,
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
        }
    }
}

impl AppConfig {
    /// Loads `.env.local` / `.env` (if present) and reads settings from the environment.
    pub fn from_env() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let base_url = lookup("STATSBOMB_BASE_URL")
            .and_then(non_empty)
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.base_url);
        let catalog_path = lookup("CATALOG_PATH")
            .and_then(non_empty)
            .map(PathBuf::from)
            .unwrap_or(defaults.catalog_path);
        let cache_max_entries = lookup("CACHE_MAX_ENTRIES")
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_CACHE_ENTRIES)
            .max(1);
        let http_timeout_secs = lookup("HTTP_TIMEOUT_SECS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
            .max(1);
        let export_path = lookup("EXPORT_PATH")
            .and_then(non_empty)
            .map(PathBuf::from)
            .unwrap_or(defaults.export_path);
        let log_path = lookup("LOG_PATH")
            .and_then(non_empty)
            .map(PathBuf::from)
            .unwrap_or(defaults.log_path);

        Self {
            base_url,
            catalog_path,
            cache_max_entries,
            http_timeout_secs,
            export_path,
            log_path,
        }
    }
}

fn non_empty(val: String) -> Option<String> {
    let trimmed = val.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
