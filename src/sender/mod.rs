pub mod batch;
pub mod client;
pub mod response;

pub use batch::BatchSender;
pub use client::{ClientConfig, DeliveryStats, HttpClient, PUT_ENDPOINT};
pub use response::ServerRejection;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SenderError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Request timeout: {0}")]
    Timeout(#[source] reqwest::Error),
    #[error("Network error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("failed to post data to OpenTSDB: {summary}. See the error log for details")]
    Rejected { status: u16, summary: String },
}

impl From<reqwest::Error> for SenderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            SenderError::Timeout(error)
        } else {
            SenderError::Transport(error)
        }
    }
}

impl SenderError {
    /// HTTP status of a server rejection, if that is what this error is.
    pub fn status(&self) -> Option<u16> {
        match self {
            SenderError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}
