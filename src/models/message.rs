//! Diesel models for message templates.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::message::{Message as DomainMessage, NewMessage as DomainNewMessage};
use crate::domain::types::{MessageBody, MessageId, MessageSubject, TypeConstraintError, UserId};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::messages)]
pub struct Message {
    pub id: i32,
    pub user_id: i32,
    pub subject: String,
    pub body: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::messages)]
pub struct NewMessage<'a> {
    pub user_id: i32,
    pub subject: &'a str,
    pub body: &'a str,
}

impl TryFrom<Message> for DomainMessage {
    type Error = TypeConstraintError;

    fn try_from(message: Message) -> Result<Self, Self::Error> {
        Ok(Self {
            id: MessageId::new(message.id)?,
            user_id: UserId::new(message.user_id)?,
            subject: MessageSubject::new(message.subject)?,
            body: MessageBody::new(message.body)?,
            created_at: message.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewMessage> for NewMessage<'a> {
    fn from(message: &'a DomainNewMessage) -> Self {
        Self {
            user_id: message.user_id.get(),
            subject: message.subject.as_str(),
            body: message.body.as_str(),
        }
    }
}
