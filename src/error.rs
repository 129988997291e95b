use thiserror::Error;

pub type ViewerResult<T> = Result<T, ViewerError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ViewerError {
    /// A catalog name matched no ids, or more than one distinct id.
    #[error("catalog {field} '{name}' resolved to {found} ids (expected exactly one)")]
    AmbiguousOrMissingReference {
        field: &'static str,
        name: String,
        found: usize,
    },
    #[error("season '{season}' is not offered for {league}")]
    UnknownSeason { league: String, season: String },
    #[error("match {0} is not in the current match list")]
    UnknownMatch(u64),
    #[error("catalog unavailable: {0}")]
    Catalog(String),
}

impl ViewerError {
    pub fn missing_reference(field: &'static str, name: &str, found: usize) -> Self {
        Self::AmbiguousOrMissingReference {
            field,
            name: name.to_string(),
            found,
        }
    }
}
