// Failure taxonomy shared by the API clients and the state containers.
use thiserror::Error;

/// What a remote call can fail with, normalized for display.
///
/// The `Display` string of every variant is the user-facing message: either the
/// server-provided `message` field or a fixed per-operation fallback. Raw
/// transport errors are logged at the call site and never carried here.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Rejected credentials or registration (bad password, duplicate account).
    #[error("{0}")]
    Auth(String),

    /// 401 on a protected resource; the session is gone or never existed.
    #[error("not authenticated")]
    Unauthenticated,

    /// 404 on an update or delete.
    #[error("{0}")]
    NotFound(String),

    /// Any other non-success response from the backend.
    #[error("{0}")]
    Server(String),

    /// Connection failure or the 5 second transport timeout.
    #[error("{0}")]
    Network(String),

    /// The backend answered 2xx with a body this client could not decode.
    #[error("invalid response: {0}")]
    Parse(String),
}

// Custom result type
pub type ApiResult<T> = Result<T, ApiError>;
