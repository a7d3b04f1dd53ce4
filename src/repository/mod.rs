use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::sqlite::SqliteConnection;
use pushkind_common::db::DbPool;
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::client::{Client, NewClient, UpdateClient};
use crate::domain::mailing::{
    Mailing, MailingStatus, MailingWithRecipients, NewMailing, UpdateMailing,
};
use crate::domain::mailing_log::{MailingLog, NewMailingLog};
use crate::domain::message::{Message, NewMessage};
use crate::domain::scope::OwnerScope;
use crate::domain::types::{ClientId, MailingId, MessageId};

type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

pub mod client;
pub mod mailing;
pub mod mailing_log;
pub mod message;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod task;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    /// Rows to skip; pages past the addressable range yield an empty page.
    fn offset(&self) -> i64 {
        let skipped = self.page.saturating_sub(1).saturating_mul(self.per_page);
        i64::try_from(skipped).unwrap_or(i64::MAX)
    }

    fn limit(&self) -> i64 {
        i64::try_from(self.per_page).unwrap_or(i64::MAX)
    }
}

/// Diesel-backed repository shared by the server and the worker.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientListQuery {
    pub scope: OwnerScope,
    pub active_only: bool,
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl ClientListQuery {
    /// Active clients within `scope`.
    pub fn new(scope: OwnerScope) -> Self {
        Self {
            scope,
            active_only: true,
            search: None,
            pagination: None,
        }
    }

    pub fn include_inactive(mut self) -> Self {
        self.active_only = false;
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageListQuery {
    pub scope: OwnerScope,
    pub pagination: Option<Pagination>,
}

impl MessageListQuery {
    pub fn new(scope: OwnerScope) -> Self {
        Self {
            scope,
            pagination: None,
        }
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailingListQuery {
    pub scope: OwnerScope,
    pub published_only: bool,
    pub pagination: Option<Pagination>,
}

impl MailingListQuery {
    /// Published mailings within `scope`.
    pub fn new(scope: OwnerScope) -> Self {
        Self {
            scope,
            published_only: true,
            pagination: None,
        }
    }

    pub fn include_unpublished(mut self) -> Self {
        self.published_only = false;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailingLogListQuery {
    /// Restricts logs to mailings owned within the scope.
    pub scope: OwnerScope,
    pub mailing_id: Option<MailingId>,
    pub pagination: Option<Pagination>,
}

impl MailingLogListQuery {
    pub fn new(scope: OwnerScope) -> Self {
        Self {
            scope,
            mailing_id: None,
            pagination: None,
        }
    }

    pub fn mailing(mut self, mailing_id: MailingId) -> Self {
        self.mailing_id = Some(mailing_id);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

pub trait ClientReader {
    fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>>;
    fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)>;
    fn list_clients_by_ids(&self, ids: &[ClientId]) -> RepositoryResult<Vec<Client>>;
}

pub trait ClientWriter {
    fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client>;
    fn update_client(&self, client_id: ClientId, updates: &UpdateClient)
    -> RepositoryResult<Client>;
    fn delete_client(&self, client_id: ClientId) -> RepositoryResult<()>;
}

pub trait MessageReader {
    fn get_message_by_id(&self, id: MessageId) -> RepositoryResult<Option<Message>>;
    fn list_messages(&self, query: MessageListQuery) -> RepositoryResult<(usize, Vec<Message>)>;
}

pub trait MessageWriter {
    fn create_message(&self, new_message: &NewMessage) -> RepositoryResult<Message>;
}

pub trait MailingReader {
    fn get_mailing_by_id(&self, id: MailingId) -> RepositoryResult<Option<Mailing>>;
    fn get_mailing_with_recipients(
        &self,
        id: MailingId,
    ) -> RepositoryResult<Option<MailingWithRecipients>>;
    fn list_mailings(&self, query: MailingListQuery) -> RepositoryResult<(usize, Vec<Mailing>)>;
    fn list_mailing_recipients(&self, id: MailingId) -> RepositoryResult<Vec<Client>>;
}

pub trait MailingWriter {
    /// Inserts the mailing with status `CREATE` together with its recipients.
    fn create_mailing(&self, new_mailing: &NewMailing) -> RepositoryResult<Mailing>;
    fn update_mailing(
        &self,
        mailing_id: MailingId,
        updates: &UpdateMailing,
    ) -> RepositoryResult<Mailing>;
    /// Compare-and-set of the status. Returns `false` when the stored status
    /// was not `expected` and nothing changed.
    fn set_mailing_status(
        &self,
        mailing_id: MailingId,
        expected: MailingStatus,
        next: MailingStatus,
    ) -> RepositoryResult<bool>;
    fn delete_mailing(&self, mailing_id: MailingId) -> RepositoryResult<()>;
}

pub trait MailingLogReader {
    fn list_mailing_logs(
        &self,
        query: MailingLogListQuery,
    ) -> RepositoryResult<(usize, Vec<MailingLog>)>;
}

pub trait MailingLogWriter {
    fn create_mailing_log(&self, log: &NewMailingLog) -> RepositoryResult<MailingLog>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_starts_at_zero() {
        let pagination = Pagination {
            page: 0,
            per_page: 20,
        };
        assert_eq!(pagination.offset(), 0);
        assert_eq!(Pagination { page: 3, ..pagination }.offset(), 40);
    }

    #[test]
    fn huge_page_saturates_instead_of_overflowing() {
        let pagination = Pagination {
            page: usize::MAX,
            per_page: 20,
        };
        assert_eq!(pagination.offset(), i64::MAX);
        assert_eq!(pagination.limit(), 20);
    }
}
