//! Mailing aggregate: schedule, recipients and the lifecycle status machine.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{Months, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::domain::types::{ClientId, MailingId, MessageId, TypeConstraintError, UserId};

/// Lifecycle status of a mailing.
///
/// `Create` only exists between persisting a new mailing and registering its
/// periodic task. The toggle treats it the same as `Start`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum MailingStatus {
    Create,
    Start,
    Finish,
}

impl MailingStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            MailingStatus::Create => "CREATE",
            MailingStatus::Start => "START",
            MailingStatus::Finish => "FINISH",
        }
    }

    /// Whether a periodic task is expected to exist for this status.
    pub const fn is_scheduled(self) -> bool {
        matches!(self, MailingStatus::Create | MailingStatus::Start)
    }

    /// Status reached by a single toggle.
    pub const fn toggled(self) -> Self {
        match self {
            MailingStatus::Create | MailingStatus::Start => MailingStatus::Finish,
            MailingStatus::Finish => MailingStatus::Start,
        }
    }
}

impl Display for MailingStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MailingStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATE" => Ok(MailingStatus::Create),
            "START" => Ok(MailingStatus::Start),
            "FINISH" => Ok(MailingStatus::Finish),
            other => Err(TypeConstraintError::UnknownStatus(other.to_string())),
        }
    }
}

/// How often a started mailing is sent.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Periodicity {
    Daily,
    Weekly,
    Monthly,
}

impl Periodicity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Periodicity::Daily => "DAILY",
            Periodicity::Weekly => "WEEKLY",
            Periodicity::Monthly => "MONTHLY",
        }
    }

    /// Moves `from` forward by one period. Months are calendar months and
    /// clamp to the last day of a shorter month.
    pub fn advance(self, from: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            Periodicity::Daily => from.checked_add_signed(TimeDelta::days(1)),
            Periodicity::Weekly => from.checked_add_signed(TimeDelta::days(7)),
            Periodicity::Monthly => from.checked_add_months(Months::new(1)),
        }
    }

    /// First run time strictly after `now`, stepping from `last_run`.
    ///
    /// Periods missed while the worker was down are skipped, not replayed.
    pub fn next_run_after(
        self,
        last_run: NaiveDateTime,
        now: NaiveDateTime,
    ) -> Option<NaiveDateTime> {
        let mut next = self.advance(last_run)?;
        while next <= now {
            next = self.advance(next)?;
        }
        Some(next)
    }
}

impl Display for Periodicity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Periodicity {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DAILY" => Ok(Periodicity::Daily),
            "WEEKLY" => Ok(Periodicity::Weekly),
            "MONTHLY" => Ok(Periodicity::Monthly),
            _ => Err(TypeConstraintError::UnknownPeriodicity(s.to_string())),
        }
    }
}

/// Sending window and frequency of a mailing.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MailingSchedule {
    pub start_at: NaiveDateTime,
    pub end_at: Option<NaiveDateTime>,
    pub periodicity: Periodicity,
}

impl MailingSchedule {
    pub fn try_new(
        start_at: NaiveDateTime,
        end_at: Option<NaiveDateTime>,
        periodicity: Periodicity,
    ) -> Result<Self, TypeConstraintError> {
        if end_at.is_some_and(|end| end <= start_at) {
            return Err(TypeConstraintError::EndBeforeStart);
        }
        Ok(Self {
            start_at,
            end_at,
            periodicity,
        })
    }

    /// First run time for a task registered at `now`.
    pub fn first_run(&self, now: NaiveDateTime) -> NaiveDateTime {
        self.start_at.max(now)
    }

    /// True once the sending window has closed.
    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        self.end_at.is_some_and(|end| end <= now)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Mailing {
    pub id: MailingId,
    pub user_id: UserId,
    pub message_id: MessageId,
    pub schedule: MailingSchedule,
    pub status: MailingStatus,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Mailing together with its recipient list.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct MailingWithRecipients {
    pub mailing: Mailing,
    pub client_ids: Vec<ClientId>,
}

/// Data for a new mailing. It is always stored with [`MailingStatus::Create`].
#[derive(Clone, Debug, Deserialize)]
pub struct NewMailing {
    pub user_id: UserId,
    pub message_id: MessageId,
    pub schedule: MailingSchedule,
    pub is_published: bool,
    pub client_ids: Vec<ClientId>,
}

/// Editable mailing attributes. Neither owner nor status are part of the update.
#[derive(Clone, Debug, Deserialize)]
pub struct UpdateMailing {
    pub message_id: MessageId,
    pub schedule: MailingSchedule,
    pub is_published: bool,
    pub client_ids: Vec<ClientId>,
}
