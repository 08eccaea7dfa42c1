use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, KilnError>;

#[derive(Error, Debug)]
pub enum KilnError {
    #[error("Parse error in {file}: {message}")]
    Parse { file: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Server returned {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Refusing to fetch {url}: recipe declares no sha256 checksum")]
    MissingChecksum { url: String },

    #[error("Checksum mismatch for {}: expected {expected}, got {actual}", path.display())]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("Failed to unpack {}: {message}", path.display())]
    Archive { path: PathBuf, message: String },

    #[error("Build script exited with status {status}")]
    Build { status: i32 },

    #[error("Test command `{command}` exited with status {status}")]
    TestCommand { command: String, status: i32 },

    #[error("Import check failed for module `{module}`")]
    Import { module: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl KilnError {
    pub fn exit_code(&self) -> i32 {
        2
    }

    /// Whether this error is a normal pipeline outcome (a stage that ran and
    /// failed) rather than a tool malfunction. Stage failures are recorded in
    /// the build report; everything else propagates to the caller.
    pub fn is_pipeline_failure(&self) -> bool {
        matches!(
            self,
            KilnError::Network { .. }
                | KilnError::HttpStatus { .. }
                | KilnError::MissingChecksum { .. }
                | KilnError::ChecksumMismatch { .. }
                | KilnError::Archive { .. }
                | KilnError::Build { .. }
                | KilnError::TestCommand { .. }
                | KilnError::Import { .. }
        )
    }
}
