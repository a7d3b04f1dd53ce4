use pushkind_common::domain::auth::AuthenticatedUser;

use crate::dto::api::{MailingsQuery, MailingsResponse};
use crate::repository::MailingReader;
use crate::services::ServiceResult;
use crate::services::visibility::{Mailings, list_visible};

/// Returns the page of published mailings visible to the authenticated user.
pub fn list_mailings<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: MailingsQuery,
) -> ServiceResult<MailingsResponse>
where
    R: MailingReader + ?Sized,
{
    let (total, page) = list_visible::<Mailings, R>(repo, user, params.page.unwrap_or(1))?;

    Ok(MailingsResponse {
        total,
        mailings: page.items,
    })
}
