use serde::Deserialize;
use validator::Validate;

use crate::domain::client::{NewClient, UpdateClient};
use crate::domain::types::{ClientComment, ClientEmail, ClientName, UserId};
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
/// Form data for adding a client.
pub struct AddClientForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub full_name: String,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
/// Form data for updating an existing client.
pub struct SaveClientForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub full_name: String,
    #[serde(default)]
    pub comment: Option<String>,
    /// Checkbox: present when ticked.
    #[serde(default)]
    pub is_active: Option<String>,
}

fn comment(raw: Option<String>) -> Option<ClientComment> {
    raw.and_then(|c| ClientComment::new(c).ok())
}

impl AddClientForm {
    pub fn into_domain(self, user_id: UserId) -> Result<NewClient, FormError> {
        self.validate()?;

        Ok(NewClient::new(
            user_id,
            ClientEmail::new(self.email).map_err(|_| FormError::InvalidEmail)?,
            ClientName::new(self.full_name).map_err(|_| FormError::InvalidName)?,
            comment(self.comment),
        ))
    }
}

impl TryFrom<SaveClientForm> for UpdateClient {
    type Error = FormError;

    fn try_from(form: SaveClientForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(UpdateClient {
            email: ClientEmail::new(form.email).map_err(|_| FormError::InvalidEmail)?,
            full_name: ClientName::new(form.full_name).map_err(|_| FormError::InvalidName)?,
            comment: comment(form.comment),
            is_active: form.is_active.is_some(),
        })
    }
}
