use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::DEFAULT_ITEMS_PER_PAGE;

use crate::domain::types::MailingId;
use crate::dto::logs::{LogsPageData, LogsQuery};
use crate::repository::{MailingLogListQuery, MailingLogReader, MailingReader};
use crate::services::visibility::{ensure_access, ensure_service_access, owner_scope};
use crate::services::{ServiceError, ServiceResult, page_number, paginate};

/// Lists send attempts of the mailings visible to `user`, newest first.
pub fn load_logs_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: LogsQuery,
) -> ServiceResult<LogsPageData>
where
    R: MailingReader + MailingLogReader + ?Sized,
{
    ensure_service_access(user)?;

    let page = page_number(query.page);
    let mut list_query =
        MailingLogListQuery::new(owner_scope(user)?).paginate(page, DEFAULT_ITEMS_PER_PAGE);

    let mailing_id = match query.mailing_id {
        Some(raw) => {
            let mailing_id = MailingId::new(raw).map_err(|_| ServiceError::NotFound)?;
            let mailing = repo
                .get_mailing_by_id(mailing_id)?
                .ok_or(ServiceError::NotFound)?;
            ensure_access(user, mailing.user_id)?;
            list_query = list_query.mailing(mailing_id);
            Some(mailing_id)
        }
        None => None,
    };

    let (total, logs) = repo.list_mailing_logs(list_query)?;

    Ok(LogsPageData {
        logs: paginate(logs, page, total),
        mailing_id,
    })
}
