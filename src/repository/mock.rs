//! Mock repository implementations for isolating services in tests.

use chrono::NaiveDateTime;
use mockall::mock;
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::client::{Client, NewClient, UpdateClient};
use crate::domain::mailing::{
    Mailing, MailingStatus, MailingWithRecipients, NewMailing, UpdateMailing,
};
use crate::domain::mailing_log::{MailingLog, NewMailingLog};
use crate::domain::message::{Message, NewMessage};
use crate::domain::task::MailingTask;
use crate::domain::types::{ClientId, MailingId, MessageId};
use crate::repository::{
    ClientListQuery, ClientReader, ClientWriter, MailingListQuery, MailingLogListQuery,
    MailingLogReader, MailingLogWriter, MailingReader, MailingWriter, MessageListQuery,
    MessageReader, MessageWriter,
};
use crate::scheduler::{MailingScheduler, SchedulerResult, TaskQueue};

mock! {
    pub Repository {}

    impl ClientReader for Repository {
        fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>>;
        fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)>;
        fn list_clients_by_ids(&self, ids: &[ClientId]) -> RepositoryResult<Vec<Client>>;
    }

    impl ClientWriter for Repository {
        fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client>;
        fn update_client(
            &self,
            client_id: ClientId,
            updates: &UpdateClient,
        ) -> RepositoryResult<Client>;
        fn delete_client(&self, client_id: ClientId) -> RepositoryResult<()>;
    }

    impl MessageReader for Repository {
        fn get_message_by_id(&self, id: MessageId) -> RepositoryResult<Option<Message>>;
        fn list_messages(&self, query: MessageListQuery) -> RepositoryResult<(usize, Vec<Message>)>;
    }

    impl MessageWriter for Repository {
        fn create_message(&self, new_message: &NewMessage) -> RepositoryResult<Message>;
    }

    impl MailingReader for Repository {
        fn get_mailing_by_id(&self, id: MailingId) -> RepositoryResult<Option<Mailing>>;
        fn get_mailing_with_recipients(
            &self,
            id: MailingId,
        ) -> RepositoryResult<Option<MailingWithRecipients>>;
        fn list_mailings(&self, query: MailingListQuery) -> RepositoryResult<(usize, Vec<Mailing>)>;
        fn list_mailing_recipients(&self, id: MailingId) -> RepositoryResult<Vec<Client>>;
    }

    impl MailingWriter for Repository {
        fn create_mailing(&self, new_mailing: &NewMailing) -> RepositoryResult<Mailing>;
        fn update_mailing(
            &self,
            mailing_id: MailingId,
            updates: &UpdateMailing,
        ) -> RepositoryResult<Mailing>;
        fn set_mailing_status(
            &self,
            mailing_id: MailingId,
            expected: MailingStatus,
            next: MailingStatus,
        ) -> RepositoryResult<bool>;
        fn delete_mailing(&self, mailing_id: MailingId) -> RepositoryResult<()>;
    }

    impl MailingLogReader for Repository {
        fn list_mailing_logs(
            &self,
            query: MailingLogListQuery,
        ) -> RepositoryResult<(usize, Vec<MailingLog>)>;
    }

    impl MailingLogWriter for Repository {
        fn create_mailing_log(&self, log: &NewMailingLog) -> RepositoryResult<MailingLog>;
    }

    impl MailingScheduler for Repository {
        fn create_task(&self, mailing: &Mailing, now: NaiveDateTime) -> SchedulerResult<MailingTask>;
        fn update_task_schedule(
            &self,
            mailing: &Mailing,
            now: NaiveDateTime,
        ) -> SchedulerResult<MailingTask>;
        fn delete_task(&self, mailing_id: MailingId) -> SchedulerResult<()>;
    }

    impl TaskQueue for Repository {
        fn list_due_tasks(&self, now: NaiveDateTime) -> SchedulerResult<Vec<MailingTask>>;
        fn reschedule_task(
            &self,
            mailing_id: MailingId,
            next_run_at: NaiveDateTime,
        ) -> SchedulerResult<()>;
    }
}
