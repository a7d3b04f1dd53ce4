//! Periodic task registry driving started mailings.
//!
//! A task row exists for every mailing in `START`. The lifecycle controller
//! registers and cancels tasks, the worker drains the due ones. Both
//! operations are idempotent: registering twice replaces the task, cancelling
//! a missing task succeeds.

use chrono::NaiveDateTime;
use thiserror::Error;
use pushkind_common::repository::errors::RepositoryError;

use crate::domain::mailing::Mailing;
use crate::domain::task::MailingTask;
use crate::domain::types::MailingId;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("task registry error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("invalid schedule: {0}")]
    InvalidSchedule(String),
}

pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Registration side used by the lifecycle controller.
pub trait MailingScheduler {
    /// Registers (or replaces) the periodic task of `mailing`.
    fn create_task(&self, mailing: &Mailing, now: NaiveDateTime) -> SchedulerResult<MailingTask>;
    /// Applies an edited schedule to the task of `mailing`. The next run never
    /// moves before the one already planned, so a period that was sent is not
    /// sent again. Registers the task when it is missing.
    fn update_task_schedule(
        &self,
        mailing: &Mailing,
        now: NaiveDateTime,
    ) -> SchedulerResult<MailingTask>;
    /// Cancels the periodic task of the mailing if there is one.
    fn delete_task(&self, mailing_id: MailingId) -> SchedulerResult<()>;
}

/// Consumption side used by the worker.
pub trait TaskQueue {
    fn list_due_tasks(&self, now: NaiveDateTime) -> SchedulerResult<Vec<MailingTask>>;
    fn reschedule_task(
        &self,
        mailing_id: MailingId,
        next_run_at: NaiveDateTime,
    ) -> SchedulerResult<()>;
}
