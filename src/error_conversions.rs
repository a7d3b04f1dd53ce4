//! Error conversion glue between layers.
//!
//! The domain layer must not depend on repository or service error types, so
//! the conversions out of [`TypeConstraintError`] live here.

use pushkind_common::repository::errors::RepositoryError;
use pushkind_common::services::errors::ServiceError;

use crate::domain::types::TypeConstraintError;

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}
