use std::path::PathBuf;

use thiserror::Error;

/// Why a `data-gradient` payload was rejected.
#[derive(Debug, Error)]
pub enum GradientError {
    /// The payload is not a gradient JSON object.
    #[error("malformed gradient JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A gradient needs at least one color stop.
    #[error("gradient has no color stops")]
    NoStops,
    /// Angle or stop position is NaN or infinite.
    #[error("gradient angle or stop position is not a finite number")]
    NonFinite,
    /// A stop color would break out of the gradient function.
    #[error("gradient stop color {0:?} is not a plain CSS color")]
    InvalidColor(String),
}

/// Errors loading an [`EditorConfig`](crate::EditorConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {}", path.display())]
    Io {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid config JSON.
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field has a value the editor cannot use.
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid {
        /// The offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}
