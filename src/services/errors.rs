//! Failures the shared [`ServiceError`] has no variant for.
//!
//! They are raised by the lifecycle controller and folded into
//! [`ServiceError`] at the service boundary, so routes keep matching on the
//! shared type only.

use pushkind_common::services::errors::ServiceError;
use thiserror::Error;

use crate::domain::types::MailingId;
use crate::forms::FormError;
use crate::scheduler::SchedulerError;

/// Shown when a status write lost a race against another request.
pub const CONFLICT_MESSAGE: &str = "Рассылка была изменена другим запросом. Обновите страницу.";

#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The stored status changed under a concurrent request.
    #[error("mailing {0} changed concurrently")]
    Conflict(MailingId),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

impl From<LifecycleError> for ServiceError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::Conflict(mailing_id) => {
                log::warn!("Mailing {mailing_id} changed concurrently");
                ServiceError::Form(CONFLICT_MESSAGE.to_string())
            }
            LifecycleError::Scheduler(SchedulerError::Repository(err)) => ServiceError::from(err),
            LifecycleError::Scheduler(SchedulerError::InvalidSchedule(reason)) => {
                ServiceError::TypeConstraint(reason)
            }
        }
    }
}

impl From<SchedulerError> for ServiceError {
    fn from(err: SchedulerError) -> Self {
        LifecycleError::from(err).into()
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::Form(err.to_string())
    }
}
