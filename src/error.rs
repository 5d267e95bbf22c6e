
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegcheckError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },
    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

pub type Result<T> = std::result::Result<T, RegcheckError>;

// Helper conversions
impl From<reqwest::Error> for RegcheckError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() { Self::Decode(e.to_string()) } else { Self::Transport(e.to_string()) }
    }
}
impl From<serde_json::Error> for RegcheckError {
    fn from(e: serde_json::Error) -> Self { Self::Decode(e.to_string()) }
}
impl From<config::ConfigError> for RegcheckError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
