//! Diesel models for send attempt logs.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::mailing_log::{MailingLog as DomainMailingLog, NewMailingLog as DomainNewLog};
use crate::domain::types::{ClientId, MailingId, MailingLogId, TypeConstraintError};
use crate::models::mailing::Mailing;

#[derive(Debug, Clone, Identifiable, Queryable, Associations)]
#[diesel(belongs_to(Mailing, foreign_key = mailing_id))]
#[diesel(table_name = crate::schema::mailing_logs)]
pub struct MailingLog {
    pub id: i32,
    pub mailing_id: i32,
    pub client_id: Option<i32>,
    pub attempted_at: NaiveDateTime,
    pub status: String,
    pub server_response: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::mailing_logs)]
pub struct NewMailingLog<'a> {
    pub mailing_id: i32,
    pub client_id: Option<i32>,
    pub attempted_at: NaiveDateTime,
    pub status: &'a str,
    pub server_response: Option<&'a str>,
}

impl TryFrom<MailingLog> for DomainMailingLog {
    type Error = TypeConstraintError;

    fn try_from(log: MailingLog) -> Result<Self, Self::Error> {
        Ok(Self {
            id: MailingLogId::new(log.id)?,
            mailing_id: MailingId::new(log.mailing_id)?,
            client_id: log.client_id.map(ClientId::new).transpose()?,
            attempted_at: log.attempted_at,
            status: log.status.parse()?,
            server_response: log.server_response,
        })
    }
}

impl<'a> From<&'a DomainNewLog> for NewMailingLog<'a> {
    fn from(log: &'a DomainNewLog) -> Self {
        Self {
            mailing_id: log.mailing_id.get(),
            client_id: log.client_id.map(ClientId::get),
            attempted_at: log.attempted_at,
            status: log.status.as_str(),
            server_response: log.server_response.as_deref(),
        }
    }
}
