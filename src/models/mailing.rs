//! Diesel models for mailings and their recipient links.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::mailing::{
    Mailing as DomainMailing, MailingSchedule, MailingStatus, NewMailing as DomainNewMailing,
    UpdateMailing as DomainUpdateMailing,
};
use crate::domain::types::{MailingId, MessageId, TypeConstraintError, UserId};
use crate::models::client::Client;

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::mailings)]
/// Diesel model for [`crate::domain::mailing::Mailing`].
pub struct Mailing {
    pub id: i32,
    pub user_id: i32,
    pub message_id: i32,
    pub start_at: NaiveDateTime,
    pub end_at: Option<NaiveDateTime>,
    pub periodicity: String,
    pub status: String,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::mailings)]
pub struct NewMailing<'a> {
    pub user_id: i32,
    pub message_id: i32,
    pub start_at: NaiveDateTime,
    pub end_at: Option<NaiveDateTime>,
    pub periodicity: &'a str,
    pub status: &'a str,
    pub is_published: bool,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::mailings)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateMailing<'a> {
    pub message_id: i32,
    pub start_at: NaiveDateTime,
    pub end_at: Option<NaiveDateTime>,
    pub periodicity: &'a str,
    pub is_published: bool,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Queryable, Associations, Identifiable)]
#[diesel(primary_key(mailing_id, client_id))]
#[diesel(belongs_to(Mailing, foreign_key = mailing_id))]
#[diesel(belongs_to(Client, foreign_key = client_id))]
#[diesel(table_name = crate::schema::mailing_clients)]
/// Association table linking mailings to their recipients.
pub struct MailingClient {
    pub mailing_id: i32,
    pub client_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::mailing_clients)]
pub struct NewMailingClient {
    pub mailing_id: i32,
    pub client_id: i32,
}

impl TryFrom<Mailing> for DomainMailing {
    type Error = TypeConstraintError;

    fn try_from(mailing: Mailing) -> Result<Self, Self::Error> {
        let schedule = MailingSchedule::try_new(
            mailing.start_at,
            mailing.end_at,
            mailing.periodicity.parse()?,
        )?;

        Ok(Self {
            id: MailingId::new(mailing.id)?,
            user_id: UserId::new(mailing.user_id)?,
            message_id: MessageId::new(mailing.message_id)?,
            schedule,
            status: mailing.status.parse()?,
            is_published: mailing.is_published,
            created_at: mailing.created_at,
            updated_at: mailing.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewMailing> for NewMailing<'a> {
    fn from(mailing: &'a DomainNewMailing) -> Self {
        Self {
            user_id: mailing.user_id.get(),
            message_id: mailing.message_id.get(),
            start_at: mailing.schedule.start_at,
            end_at: mailing.schedule.end_at,
            periodicity: mailing.schedule.periodicity.as_str(),
            status: MailingStatus::Create.as_str(),
            is_published: mailing.is_published,
        }
    }
}

impl<'a> UpdateMailing<'a> {
    pub fn from_domain(mailing: &'a DomainUpdateMailing, updated_at: NaiveDateTime) -> Self {
        Self {
            message_id: mailing.message_id.get(),
            start_at: mailing.schedule.start_at,
            end_at: mailing.schedule.end_at,
            periodicity: mailing.schedule.periodicity.as_str(),
            is_published: mailing.is_published,
            updated_at,
        }
    }
}
