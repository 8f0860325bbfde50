use crate::media::Cleanup;

pub mod categories;
pub mod errors;
pub mod gallery;
pub mod products;

pub use errors::{ServiceError, ServiceResult};

/// A committed database mutation together with the outcome of its
/// best-effort remote phase.
///
/// `cleanup` is advisory: the mutation succeeded regardless of its value.
#[derive(Debug)]
pub struct WithCleanup<T> {
    pub value: T,
    pub cleanup: Cleanup,
}

impl<T> WithCleanup<T> {
    pub fn new(value: T, cleanup: Cleanup) -> Self {
        Self { value, cleanup }
    }
}
