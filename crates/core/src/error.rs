use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum WebMapError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse web map JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Portal error {code}: {message}")]
    Portal { code: i64, message: String },

    #[error("Web map has no spatial reference")]
    MissingSpatialReference,

    #[error("Invalid color: {0}")]
    InvalidColor(String),
}

pub type Result<T> = std::result::Result<T, WebMapError>;
