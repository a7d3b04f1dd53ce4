//! Mailing create/edit form.
//!
//! Recipients arrive as repeated `client_ids` keys, so the form is parsed from
//! the raw body with `serde_html_form` rather than `web::Form`.

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::domain::mailing::{MailingSchedule, NewMailing, Periodicity, UpdateMailing};
use crate::domain::types::{ClientId, MessageId, TypeConstraintError, UserId};
use crate::forms::FormError;

/// Formats accepted for `start_at`/`end_at`. The first one is what
/// `<input type="datetime-local">` submits.
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

#[derive(Debug, Deserialize)]
pub struct MailingForm {
    pub message_id: i32,
    pub start_at: String,
    #[serde(default)]
    pub end_at: String,
    pub periodicity: String,
    #[serde(default)]
    pub is_published: Option<String>,
    #[serde(default)]
    pub client_ids: Vec<i32>,
}

impl MailingForm {
    pub fn from_bytes(body: &[u8]) -> Result<Self, FormError> {
        serde_html_form::from_bytes(body).map_err(|e| FormError::Malformed(e.to_string()))
    }
}

/// Validated mailing form content.
#[derive(Debug, Clone, PartialEq)]
pub struct MailingPayload {
    pub message_id: MessageId,
    pub schedule: MailingSchedule,
    pub is_published: bool,
    pub client_ids: Vec<ClientId>,
}

fn parse_datetime(raw: &str) -> Result<NaiveDateTime, FormError> {
    let raw = raw.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| FormError::InvalidDate(raw.to_string()))
}

impl TryFrom<MailingForm> for MailingPayload {
    type Error = FormError;

    fn try_from(form: MailingForm) -> Result<Self, Self::Error> {
        let message_id = MessageId::new(form.message_id).map_err(|_| FormError::InvalidMessageId)?;

        let start_at = parse_datetime(&form.start_at)?;
        let end_at = match form.end_at.trim() {
            "" => None,
            raw => Some(parse_datetime(raw)?),
        };
        let periodicity = form
            .periodicity
            .parse::<Periodicity>()
            .map_err(|_| FormError::InvalidPeriodicity)?;
        let schedule =
            MailingSchedule::try_new(start_at, end_at, periodicity).map_err(|e| match e {
                TypeConstraintError::EndBeforeStart => FormError::EndBeforeStart,
                other => FormError::Malformed(other.to_string()),
            })?;

        let mut ids = form.client_ids;
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Err(FormError::NoRecipients);
        }
        let client_ids = ids
            .into_iter()
            .map(|id| ClientId::new(id).map_err(|_| FormError::InvalidClientId))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            message_id,
            schedule,
            is_published: form.is_published.is_some(),
            client_ids,
        })
    }
}

impl MailingPayload {
    pub fn into_new(self, user_id: UserId) -> NewMailing {
        NewMailing {
            user_id,
            message_id: self.message_id,
            schedule: self.schedule,
            is_published: self.is_published,
            client_ids: self.client_ids,
        }
    }

    pub fn into_update(self) -> UpdateMailing {
        UpdateMailing {
            message_id: self.message_id,
            schedule: self.schedule,
            is_published: self.is_published,
            client_ids: self.client_ids,
        }
    }
}
