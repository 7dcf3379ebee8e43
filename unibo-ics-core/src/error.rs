use thiserror::Error;

/// Errors surfaced by the resolution pipeline.
///
/// Every stage aborts on the first error it meets; there is no partial-result
/// mode and no retry anywhere in this crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV parsing failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("resource is not a csv file: {url}")]
    UnsupportedResource { url: String },

    #[error("row {line}: expected {expected} columns, found {found}")]
    ShortRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("row {line}: invalid {column}: {message}")]
    Field {
        line: u64,
        column: &'static str,
        message: String,
    },

    #[error("course website link not found in page")]
    WebsiteNotFound,

    #[error("course website path has fewer than two segments: {capture}")]
    WebsitePath { capture: String },
}

pub type Result<T> = std::result::Result<T, Error>;
