//! Diesel models for the periodic task registry.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::task::{MailingTask as DomainTask, NewMailingTask as DomainNewTask};
use crate::domain::types::{MailingId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::mailing_tasks)]
#[diesel(primary_key(mailing_id))]
pub struct MailingTask {
    pub mailing_id: i32,
    pub periodicity: String,
    pub next_run_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::mailing_tasks)]
pub struct NewMailingTask<'a> {
    pub mailing_id: i32,
    pub periodicity: &'a str,
    pub next_run_at: NaiveDateTime,
}

impl TryFrom<MailingTask> for DomainTask {
    type Error = TypeConstraintError;

    fn try_from(task: MailingTask) -> Result<Self, Self::Error> {
        Ok(Self {
            mailing_id: MailingId::new(task.mailing_id)?,
            periodicity: task.periodicity.parse()?,
            next_run_at: task.next_run_at,
            created_at: task.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewTask> for NewMailingTask<'a> {
    fn from(task: &'a DomainNewTask) -> Self {
        Self {
            mailing_id: task.mailing_id.get(),
            periodicity: task.periodicity.as_str(),
            next_run_at: task.next_run_at,
        }
    }
}
