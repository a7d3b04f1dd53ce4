//! Form definitions backing the mailing routes.

use thiserror::Error;
use validator::ValidationErrors;

pub mod clients;
pub mod mailings;
pub mod messages;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("malformed form: {0}")]
    Malformed(String),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid name")]
    InvalidName,

    #[error("invalid subject")]
    InvalidSubject,

    #[error("invalid message body")]
    InvalidBody,

    #[error("invalid message id")]
    InvalidMessageId,

    #[error("invalid client id")]
    InvalidClientId,

    #[error("no recipients selected")]
    NoRecipients,

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("invalid periodicity")]
    InvalidPeriodicity,

    #[error("mailing must end after it starts")]
    EndBeforeStart,
}
