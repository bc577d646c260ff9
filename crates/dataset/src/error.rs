use thiserror::Error;

/// Reasons the dataset could not be loaded. All of them abort startup.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("only http(s) dataset URLs are supported, got {0:?}")]
    UnsupportedUrl(String),

    #[error("dataset request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("dataset request returned HTTP {0}")]
    Status(u16),

    #[error("dataset is missing required column {0:?}")]
    MissingColumn(&'static str),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("row {row}: invalid date {value:?}")]
    InvalidDate { row: u64, value: String },

    #[error("row {row}: invalid location code {value:?}")]
    InvalidLocation { row: u64, value: String },

    #[error("dataset contains no usable rows")]
    Empty,
}
