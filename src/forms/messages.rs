use serde::Deserialize;

use crate::domain::message::NewMessage;
use crate::domain::types::{MessageBody, MessageSubject, UserId};
use crate::forms::FormError;

#[derive(Debug, Deserialize)]
/// Form data for adding a message template.
pub struct AddMessageForm {
    pub subject: String,
    pub body: String,
}

impl AddMessageForm {
    pub fn into_domain(self, user_id: UserId) -> Result<NewMessage, FormError> {
        Ok(NewMessage {
            user_id,
            subject: MessageSubject::new(self.subject).map_err(|_| FormError::InvalidSubject)?,
            body: MessageBody::new(self.body).map_err(|_| FormError::InvalidBody)?,
        })
    }
}
