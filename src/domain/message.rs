//! Message templates sent by mailings.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{MessageBody, MessageId, MessageSubject, TypeConstraintError, UserId};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub user_id: UserId,
    pub subject: MessageSubject,
    pub body: MessageBody,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewMessage {
    pub user_id: UserId,
    pub subject: MessageSubject,
    pub body: MessageBody,
}

impl NewMessage {
    pub fn try_new(
        user_id: i32,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            user_id: UserId::new(user_id)?,
            subject: MessageSubject::new(subject)?,
            body: MessageBody::new(body)?,
        })
    }
}
