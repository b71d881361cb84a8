//! Error types for notice board operations

use thiserror::Error;

/// Shown whenever the backend could not be reached at all.
pub const CANNOT_REACH_SERVER: &str = "Cannot reach server";

/// Every failure a notice board operation can end in
#[derive(Error, Debug)]
pub enum NoticeError {
    /// A required field was empty; nothing was sent
    #[error("{0}")]
    Validation(String),

    /// Connection refused, DNS failure, timeout
    #[error("Cannot reach server: {0}")]
    Transport(#[source] reqwest::Error),

    /// The backend answered, but not with success
    #[error("Backend error (status {status:?}): {}", .message.as_deref().unwrap_or("no details"))]
    Application {
        /// HTTP status, when one was received
        status: Option<u16>,
        /// Text of the backend's `error` field
        message: Option<String>,
    },

    /// Client could not be set up from the settings
    #[error("Configuration error: {0}")]
    Config(String),
}

impl NoticeError {
    pub fn transport(err: reqwest::Error) -> Self {
        NoticeError::Transport(err)
    }

    /// Text for the user. `fallback` covers backend failures without an error message.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            NoticeError::Validation(msg) => msg.clone(),
            NoticeError::Transport(_) => CANNOT_REACH_SERVER.to_owned(),
            NoticeError::Application {
                message: Some(msg), ..
            } => msg.clone(),
            NoticeError::Application { message: None, .. } => fallback.to_owned(),
            NoticeError::Config(msg) => msg.clone(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, NoticeError::Validation(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, NoticeError::Transport(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            NoticeError::Application { status, .. } => *status,
            _ => None,
        }
    }
}
