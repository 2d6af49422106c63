use thiserror::Error;

/// Fatal pipeline errors. Anything here aborts the run; per-snapshot and
/// per-row failures are handled as values (`FetchError`, `RowParseError`)
/// and never reach this enum.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("ranking index unavailable: {0}")]
    IndexUnavailable(String),

    #[error("ranking index page no longer matches the expected structure")]
    IndexSchemaChanged,

    #[error("ranking index inconsistent: {ids} snapshot ids vs {dates} distinct dates")]
    IndexInconsistent { ids: usize, dates: usize },

    #[error("no snapshots were parsed successfully, nothing to write")]
    EmptyDataset,

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScrapeError {
    /// Schema-change failures mean the remote site was redesigned and the
    /// selectors need updating; the CLI asks the user to report these.
    pub fn is_schema_change(&self) -> bool {
        matches!(self, ScrapeError::IndexSchemaChanged)
    }
}

/// Failure of a single snapshot fetch/parse. These never abort the batch;
/// the scheduler records them and moves on.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP status {status}")]
    Http { status: u16 },

    #[error("snapshot page no longer matches the expected table structure")]
    PageSchemaChanged,
}

impl FetchError {
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Network(_) => "network",
            FetchError::Http { .. } => "http",
            FetchError::PageSchemaChanged => "schema",
        }
    }
}

/// Failure to extract one table row. The row is dropped, the snapshot keeps
/// its remaining rows.
#[derive(Error, Debug)]
#[error("row {row_index}: missing or malformed field `{field}`")]
pub struct RowParseError {
    pub row_index: usize,
    pub field: &'static str,
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
