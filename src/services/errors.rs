use thiserror::Error;

/// Error type returned by service layer functions.
///
/// Only the variants below ever cross the service boundary; remote cleanup
/// failures are advisory and reported through [`super::WithCleanup`]
/// instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// Submitted data is missing a required field or is malformed.
    #[error("{0}")]
    Form(String),
    /// A value violated a domain type constraint.
    #[error("invalid data: {0}")]
    TypeConstraint(String),
    /// Requested resource was not found.
    #[error("not found")]
    NotFound,
    /// The write collides with an existing row.
    #[error("{0}")]
    Conflict(String),
    /// The media store rejected or failed an upload.
    #[error("upload failed: {0}")]
    Upload(String),
    /// Persistence failure. The detail is kept out of `Display` so it only
    /// reaches clients when explicitly exposed.
    #[error("database error")]
    Database(String),
}

impl ServiceError {
    /// Diagnostic detail that is safe to show in development only.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Database(detail) => Some(detail),
            _ => None,
        }
    }
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
