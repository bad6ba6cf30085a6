use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatementError {
    #[error("Invalid statement layout: {0}")]
    Schema(String),

    #[error("Anchor row '{label}' not found in statement")]
    AnchorNotFound { label: String },

    #[error("No processed statement available")]
    NoStatement,

    #[error("No API key configured ({0})")]
    CredentialMissing(String),

    #[error("Analysis service error: {0}")]
    UpstreamAnalysis(String),

    #[error("Unknown error: {0}")]
    Unknown(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(feature = "gemini")]
impl From<reqwest::Error> for StatementError {
    fn from(err: reqwest::Error) -> Self {
        // Request URLs never reach the user.
        StatementError::Unknown(err.without_url().to_string())
    }
}

pub type Result<T> = std::result::Result<T, StatementError>;
