//! Session and authentication error types.

use thiserror::Error;

use crate::services::latency::Cancelled;

/// Errors from the local persistence slot.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading, writing or removing the slot failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors persisting the current user.
///
/// In-memory state has already been updated when one of these is returned;
/// the next successful write brings the slot back in sync.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The slot could not be written.
    #[error("could not persist session: {0}")]
    Storage(#[from] StorageError),

    /// The user could not be serialized.
    #[error("could not serialize session: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors that can occur during login or registration.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email left blank.
    #[error("email is required")]
    MissingEmail,

    /// Password left blank.
    #[error("password is required")]
    MissingPassword,

    /// Name left blank on registration.
    #[error("name is required")]
    MissingName,

    /// The caller cancelled while the request was pending.
    #[error("sign-in cancelled")]
    Cancelled,

    /// Signed in, but the session could not be saved.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl From<Cancelled> for AuthError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}
