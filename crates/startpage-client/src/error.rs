use startpage_core::CardId;
use thiserror::Error;

/// Gestures the controller refuses to start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("card {0} is not in the visible order")]
    UnknownCard(CardId),
    #[error("the order is being reloaded")]
    Reloading,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server responded with {status}: {message}")]
    Status { status: u16, message: String },
    #[error("server rejected the order: {0}")]
    Rejected(String),
    #[error(transparent)]
    Controller(#[from] ControllerError),
}
