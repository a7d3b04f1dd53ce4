use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::client::{
    Client as DomainClient, NewClient as DomainNewClient, UpdateClient as DomainUpdateClient,
};
use crate::domain::types::{
    ClientComment, ClientEmail, ClientId, ClientName, TypeConstraintError, UserId,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::clients)]
/// Diesel model for [`crate::domain::client::Client`].
pub struct Client {
    pub id: i32,
    pub user_id: i32,
    pub email: String,
    pub full_name: String,
    pub comment: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::clients)]
/// Insertable form of [`Client`].
pub struct NewClient<'a> {
    pub user_id: i32,
    pub email: &'a str,
    pub full_name: &'a str,
    pub comment: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::clients)]
#[diesel(treat_none_as_null = true)]
/// Data used when updating a [`Client`] record.
pub struct UpdateClient<'a> {
    pub email: &'a str,
    pub full_name: &'a str,
    pub comment: Option<&'a str>,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Client> for DomainClient {
    type Error = TypeConstraintError;

    fn try_from(client: Client) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ClientId::new(client.id)?,
            user_id: UserId::new(client.user_id)?,
            email: ClientEmail::new(client.email)?,
            full_name: ClientName::new(client.full_name)?,
            comment: client.comment.and_then(|c| ClientComment::new(c).ok()),
            is_active: client.is_active,
            created_at: client.created_at,
            updated_at: client.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewClient> for NewClient<'a> {
    fn from(client: &'a DomainNewClient) -> Self {
        Self {
            user_id: client.user_id.get(),
            email: client.email.as_str(),
            full_name: client.full_name.as_str(),
            comment: client.comment.as_ref().map(|c| c.as_str()),
        }
    }
}

impl<'a> UpdateClient<'a> {
    pub fn from_domain(client: &'a DomainUpdateClient, updated_at: NaiveDateTime) -> Self {
        Self {
            email: client.email.as_str(),
            full_name: client.full_name.as_str(),
            comment: client.comment.as_ref().map(|c| c.as_str()),
            is_active: client.is_active,
            updated_at,
        }
    }
}
