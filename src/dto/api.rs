//! DTOs exposed by the mailing API endpoints.

use serde::Serialize;

use crate::domain::mailing::Mailing;

/// Query parameters accepted by the `/api/v1/mailings` service.
#[derive(Debug, Default)]
pub struct MailingsQuery {
    /// Optional page number for pagination.
    pub page: Option<usize>,
}

/// Result payload returned by [`crate::services::api::list_mailings`].
#[derive(Debug, Serialize)]
pub struct MailingsResponse {
    /// Total number of visible mailings.
    pub total: usize,
    /// Page of mailings requested by the caller.
    pub mailings: Vec<Mailing>,
}
