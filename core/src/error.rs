use thiserror::Error;

pub type Result<T, E = LarderError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum LarderError {
    /// Local database unavailable or a query failed.
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Recipe provider unreachable, returned an error status, or sent a
    /// response with malformed or missing fields.
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// User input rejected before it reached storage or the network.
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Export error: {0}")]
    Export(#[from] std::io::Error),
}

impl LarderError {
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<serde_json::Error> for LarderError {
    fn from(e: serde_json::Error) -> Self {
        Self::Fetch(format!("Malformed provider response: {e}"))
    }
}
