use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    ClientComment, ClientEmail, ClientId, ClientName, TypeConstraintError, UserId,
};

/// Mailing recipient owned by a single user.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Client {
    pub id: ClientId,
    pub user_id: UserId,
    pub email: ClientEmail,
    pub full_name: ClientName,
    pub comment: Option<ClientComment>,
    /// Inactive clients are hidden from listings and skipped by dispatch.
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewClient {
    pub user_id: UserId,
    pub email: ClientEmail,
    pub full_name: ClientName,
    pub comment: Option<ClientComment>,
}

/// Editable client attributes. Ownership is not part of the update.
#[derive(Clone, Debug, Deserialize)]
pub struct UpdateClient {
    pub email: ClientEmail,
    pub full_name: ClientName,
    pub comment: Option<ClientComment>,
    pub is_active: bool,
}

/// Turns an optional raw comment into a validated one, treating blank input as absent.
fn optional_comment(comment: Option<String>) -> Option<ClientComment> {
    comment.and_then(|c| ClientComment::new(c).ok())
}

impl NewClient {
    #[must_use]
    pub fn new(
        user_id: UserId,
        email: ClientEmail,
        full_name: ClientName,
        comment: Option<ClientComment>,
    ) -> Self {
        Self {
            user_id,
            email,
            full_name,
            comment,
        }
    }

    /// Validates raw values coming from forms.
    pub fn try_new(
        user_id: i32,
        email: impl Into<String>,
        full_name: impl Into<String>,
        comment: Option<String>,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self::new(
            UserId::new(user_id)?,
            ClientEmail::new(email)?,
            ClientName::new(full_name)?,
            optional_comment(comment),
        ))
    }
}

impl UpdateClient {
    pub fn try_new(
        email: impl Into<String>,
        full_name: impl Into<String>,
        comment: Option<String>,
        is_active: bool,
    ) -> Result<Self, TypeConstraintError> {
        Ok(Self {
            email: ClientEmail::new(email)?,
            full_name: ClientName::new(full_name)?,
            comment: optional_comment(comment),
            is_active,
        })
    }
}
