//! Error conversion glue between layers.
//!
//! The domain layer must not depend on service or repository error types, so
//! the `From` impls connecting them live here.

use crate::domain::types::TypeConstraintError;
use crate::repository::RepositoryError;

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

#[cfg(feature = "server")]
mod server {
    use crate::domain::types::TypeConstraintError;
    use crate::forms::categories::CategoryFormError;
    use crate::forms::gallery::{BulkDeleteFormError, BulkUploadFormError, UploadImageFormError};
    use crate::forms::products::ProductFormError;
    use crate::media::MediaStoreError;
    use crate::repository::RepositoryError;
    use crate::services::ServiceError;

    impl From<TypeConstraintError> for ServiceError {
        fn from(val: TypeConstraintError) -> Self {
            ServiceError::TypeConstraint(val.to_string())
        }
    }

    impl From<RepositoryError> for ServiceError {
        fn from(val: RepositoryError) -> Self {
            match val {
                RepositoryError::NotFound => ServiceError::NotFound,
                RepositoryError::ConstraintViolation(detail) => ServiceError::Conflict(detail),
                other => ServiceError::Database(other.to_string()),
            }
        }
    }

    impl From<MediaStoreError> for ServiceError {
        fn from(val: MediaStoreError) -> Self {
            ServiceError::Upload(val.to_string())
        }
    }

    impl From<CategoryFormError> for ServiceError {
        fn from(val: CategoryFormError) -> Self {
            ServiceError::Form(val.to_string())
        }
    }

    impl From<ProductFormError> for ServiceError {
        fn from(val: ProductFormError) -> Self {
            ServiceError::Form(val.to_string())
        }
    }

    impl From<UploadImageFormError> for ServiceError {
        fn from(val: UploadImageFormError) -> Self {
            ServiceError::Form(val.to_string())
        }
    }

    impl From<BulkUploadFormError> for ServiceError {
        fn from(val: BulkUploadFormError) -> Self {
            ServiceError::Form(val.to_string())
        }
    }

    impl From<BulkDeleteFormError> for ServiceError {
        fn from(val: BulkDeleteFormError) -> Self {
            ServiceError::Form(val.to_string())
        }
    }
}
