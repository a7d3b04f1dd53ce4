use pushkind_common::pagination::Paginated;

use crate::domain::mailing_log::MailingLog;
use crate::domain::types::MailingId;

/// Query parameters accepted by the logs page service.
#[derive(Debug, Default)]
pub struct LogsQuery {
    /// Restrict the list to a single mailing.
    pub mailing_id: Option<i32>,
    pub page: Option<usize>,
}

pub struct LogsPageData {
    pub logs: Paginated<MailingLog>,
    pub mailing_id: Option<MailingId>,
}
