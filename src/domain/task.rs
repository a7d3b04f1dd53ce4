//! Periodic task registered for a started mailing.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::mailing::Periodicity;
use crate::domain::types::MailingId;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MailingTask {
    pub mailing_id: MailingId,
    pub periodicity: Periodicity,
    pub next_run_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewMailingTask {
    pub mailing_id: MailingId,
    pub periodicity: Periodicity,
    pub next_run_at: NaiveDateTime,
}
