use thiserror::Error;

/// Shown whenever the backend could not be reached at all.
pub const NETWORK_ERROR_MESSAGE: &str =
    "Unable to reach the server. Please check your connection and try again.";

/// Default text for a 409 that carries no body.
pub const CONFLICT_ERROR_MESSAGE: &str = "Booking conflict: this appointment already exists";

#[derive(Error, Debug)]
pub enum MeetError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Internal error: {0}")]
    Internal(#[from] eyre::Report),
}

impl MeetError {
    /// The text shown to the user, without the category prefix used in logs.
    pub fn message(&self) -> String {
        match self {
            MeetError::Validation(msg)
            | MeetError::Authentication(msg)
            | MeetError::Authorization(msg)
            | MeetError::NotFound(msg)
            | MeetError::Conflict(msg)
            | MeetError::Network(msg) => msg.clone(),
            MeetError::Server { message, .. } => message.clone(),
            MeetError::Internal(report) => report.to_string(),
        }
    }

    /// Whether the caller should send the user back to a login screen.
    pub fn requires_login(&self) -> bool {
        matches!(self, MeetError::Authentication(_))
    }
}

pub type MeetResult<T> = Result<T, MeetError>;
