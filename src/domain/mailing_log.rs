use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ClientId, MailingId, MailingLogId, TypeConstraintError};

/// Outcome of a single send attempt.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum MailingLogStatus {
    Success,
    Failure,
}

impl MailingLogStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            MailingLogStatus::Success => "SUCCESS",
            MailingLogStatus::Failure => "FAILURE",
        }
    }
}

impl Display for MailingLogStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MailingLogStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUCCESS" => Ok(MailingLogStatus::Success),
            "FAILURE" => Ok(MailingLogStatus::Failure),
            other => Err(TypeConstraintError::UnknownLogStatus(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MailingLog {
    pub id: MailingLogId,
    pub mailing_id: MailingId,
    pub client_id: Option<ClientId>,
    pub attempted_at: NaiveDateTime,
    pub status: MailingLogStatus,
    pub server_response: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewMailingLog {
    pub mailing_id: MailingId,
    pub client_id: Option<ClientId>,
    pub attempted_at: NaiveDateTime,
    pub status: MailingLogStatus,
    pub server_response: Option<String>,
}

impl NewMailingLog {
    pub fn success(mailing_id: MailingId, client_id: ClientId, at: NaiveDateTime) -> Self {
        Self {
            mailing_id,
            client_id: Some(client_id),
            attempted_at: at,
            status: MailingLogStatus::Success,
            server_response: None,
        }
    }

    pub fn failure(
        mailing_id: MailingId,
        client_id: ClientId,
        at: NaiveDateTime,
        response: impl Into<String>,
    ) -> Self {
        Self {
            mailing_id,
            client_id: Some(client_id),
            attempted_at: at,
            status: MailingLogStatus::Failure,
            server_response: Some(response.into()),
        }
    }
}
