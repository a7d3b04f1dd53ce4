use pushkind_common::repository::errors::RepositoryError;
use pushkind_mailing::domain::client::UpdateClient;
use pushkind_mailing::domain::mailing::{
    MailingSchedule, MailingStatus, NewMailing, Periodicity, UpdateMailing,
};
use pushkind_mailing::domain::mailing_log::NewMailingLog;
use pushkind_mailing::domain::scope::OwnerScope;
use pushkind_mailing::domain::types::{MailingId, UserId};
use pushkind_mailing::repository::{
    ClientListQuery, ClientReader, ClientWriter, MailingListQuery, MailingLogListQuery,
    MailingLogReader, MailingLogWriter, MailingReader, MailingWriter, MessageListQuery,
    MessageReader,
};
use pushkind_mailing::scheduler::{MailingScheduler, TaskQueue};

mod common;

use common::{add_client, add_message, at};

fn owner(id: i32) -> OwnerScope {
    OwnerScope::Owner(UserId::new(id).unwrap())
}

#[test]
fn test_client_repository_crud() {
    let test_db = common::TestDb::new("test_client_repository_crud.db");
    let repo = test_db.repo();

    let alice = add_client(&repo, 1, "alice@example.com", "Alice");
    let bob = add_client(&repo, 1, "bob@example.com", "Bob");
    add_client(&repo, 2, "carol@example.com", "Carol");

    let (total, items) = repo.list_clients(ClientListQuery::new(owner(1))).unwrap();
    assert_eq!(total, 2);
    assert_eq!(items[0].full_name.as_str(), "Alice");

    let (all_total, _) = repo.list_clients(ClientListQuery::new(OwnerScope::All)).unwrap();
    assert_eq!(all_total, 3);

    let (search_total, search_items) = repo
        .list_clients(ClientListQuery::new(owner(1)).search("bob"))
        .unwrap();
    assert_eq!(search_total, 1);
    assert_eq!(search_items[0].id, bob.id);

    let updates = UpdateClient::try_new("bobby@example.com", "Bobby", None, false).unwrap();
    let updated = repo.update_client(bob.id, &updates).unwrap();
    assert_eq!(updated.full_name.as_str(), "Bobby");
    assert!(!updated.is_active);

    let (active_total, _) = repo.list_clients(ClientListQuery::new(owner(1))).unwrap();
    assert_eq!(active_total, 1);
    let (with_inactive, _) = repo
        .list_clients(ClientListQuery::new(owner(1)).include_inactive())
        .unwrap();
    assert_eq!(with_inactive, 2);

    repo.delete_client(alice.id).unwrap();
    assert!(repo.get_client_by_id(alice.id).unwrap().is_none());
    assert!(matches!(
        repo.delete_client(alice.id),
        Err(RepositoryError::NotFound)
    ));
}

#[test]
fn test_client_search_treats_wildcards_literally() {
    let test_db = common::TestDb::new("test_client_search_wildcards.db");
    let repo = test_db.repo();

    add_client(&repo, 1, "alice@example.com", "Alice");
    add_client(&repo, 1, "bob@example.com", "Bob");
    let discount = add_client(&repo, 1, "sale@example.com", "50% off_list");

    for term in ["%", "_"] {
        let (total, items) = repo
            .list_clients(ClientListQuery::new(owner(1)).search(term))
            .unwrap();
        assert_eq!(total, 1, "term {term:?}");
        assert_eq!(items[0].id, discount.id);
    }

    let (none, _) = repo
        .list_clients(ClientListQuery::new(owner(1)).search("\\"))
        .unwrap();
    assert_eq!(none, 0);
}

#[test]
fn test_client_email_unique_per_owner() {
    let test_db = common::TestDb::new("test_client_email_unique_per_owner.db");
    let repo = test_db.repo();

    add_client(&repo, 1, "same@example.com", "First");
    add_client(&repo, 2, "same@example.com", "Other owner");

    let duplicate = pushkind_mailing::domain::client::NewClient::try_new(
        1,
        "SAME@example.com",
        "Second",
        None,
    )
    .unwrap();
    assert!(matches!(
        repo.create_client(&duplicate),
        Err(RepositoryError::ConstraintViolation(_))
    ));
}

#[test]
fn test_mailing_repository_crud() {
    let test_db = common::TestDb::new("test_mailing_repository_crud.db");
    let repo = test_db.repo();

    let message = add_message(&repo, 1);
    let alice = add_client(&repo, 1, "alice@example.com", "Alice");
    let bob = add_client(&repo, 1, "bob@example.com", "Bob");

    let new_mailing = NewMailing {
        user_id: UserId::new(1).unwrap(),
        message_id: message.id,
        schedule: MailingSchedule::try_new(at(2025, 1, 1, 9), None, Periodicity::Weekly).unwrap(),
        is_published: true,
        client_ids: vec![alice.id, bob.id, alice.id],
    };
    let mailing = repo.create_mailing(&new_mailing).unwrap();
    assert_eq!(mailing.status, MailingStatus::Create);

    let with_recipients = repo.get_mailing_with_recipients(mailing.id).unwrap().unwrap();
    assert_eq!(with_recipients.client_ids, vec![alice.id, bob.id]);

    let updates = UpdateMailing {
        message_id: message.id,
        schedule: MailingSchedule::try_new(
            at(2025, 2, 1, 9),
            Some(at(2025, 6, 1, 9)),
            Periodicity::Monthly,
        )
        .unwrap(),
        is_published: false,
        client_ids: vec![bob.id],
    };
    let updated = repo.update_mailing(mailing.id, &updates).unwrap();
    assert_eq!(updated.schedule.periodicity, Periodicity::Monthly);
    assert_eq!(updated.status, MailingStatus::Create);

    let recipients = repo.list_mailing_recipients(mailing.id).unwrap();
    assert_eq!(recipients.len(), 1);
    assert_eq!(recipients[0].id, bob.id);

    let (published, _) = repo.list_mailings(MailingListQuery::new(owner(1))).unwrap();
    assert_eq!(published, 0);
    let (all, _) = repo
        .list_mailings(MailingListQuery::new(owner(1)).include_unpublished())
        .unwrap();
    assert_eq!(all, 1);

    repo.delete_mailing(mailing.id).unwrap();
    assert!(repo.get_mailing_by_id(mailing.id).unwrap().is_none());
}

#[test]
fn test_status_write_is_compare_and_set() {
    let test_db = common::TestDb::new("test_status_write_is_compare_and_set.db");
    let repo = test_db.repo();

    let message = add_message(&repo, 1);
    let client = add_client(&repo, 1, "alice@example.com", "Alice");
    let mailing = repo
        .create_mailing(&NewMailing {
            user_id: UserId::new(1).unwrap(),
            message_id: message.id,
            schedule: MailingSchedule::try_new(at(2025, 1, 1, 9), None, Periodicity::Daily)
                .unwrap(),
            is_published: true,
            client_ids: vec![client.id],
        })
        .unwrap();

    assert!(
        repo.set_mailing_status(mailing.id, MailingStatus::Create, MailingStatus::Start)
            .unwrap()
    );
    assert!(
        !repo
            .set_mailing_status(mailing.id, MailingStatus::Create, MailingStatus::Finish)
            .unwrap()
    );

    let stored = repo.get_mailing_by_id(mailing.id).unwrap().unwrap();
    assert_eq!(stored.status, MailingStatus::Start);
}

#[test]
fn test_task_registry_is_idempotent() {
    let test_db = common::TestDb::new("test_task_registry_is_idempotent.db");
    let repo = test_db.repo();

    let message = add_message(&repo, 1);
    let client = add_client(&repo, 1, "alice@example.com", "Alice");
    let mailing = repo
        .create_mailing(&NewMailing {
            user_id: UserId::new(1).unwrap(),
            message_id: message.id,
            schedule: MailingSchedule::try_new(at(2025, 3, 1, 9), None, Periodicity::Daily)
                .unwrap(),
            is_published: true,
            client_ids: vec![client.id],
        })
        .unwrap();

    let first = repo.create_task(&mailing, at(2025, 1, 1, 0)).unwrap();
    assert_eq!(first.next_run_at, at(2025, 3, 1, 9));
    let second = repo.create_task(&mailing, at(2025, 4, 1, 0)).unwrap();
    assert_eq!(second.next_run_at, at(2025, 4, 1, 0));

    assert!(repo.list_due_tasks(at(2025, 3, 31, 0)).unwrap().is_empty());
    let due = repo.list_due_tasks(at(2025, 4, 2, 0)).unwrap();
    assert_eq!(due.len(), 1);

    repo.reschedule_task(mailing.id, at(2025, 5, 1, 0)).unwrap();
    assert!(repo.list_due_tasks(at(2025, 4, 2, 0)).unwrap().is_empty());

    repo.delete_task(mailing.id).unwrap();
    repo.delete_task(mailing.id).unwrap();
    repo.delete_task(MailingId::new(999).unwrap()).unwrap();
    assert!(repo.list_due_tasks(at(2030, 1, 1, 0)).unwrap().is_empty());
}

#[test]
fn test_logs_are_scoped_by_mailing_owner() {
    let test_db = common::TestDb::new("test_logs_are_scoped_by_mailing_owner.db");
    let repo = test_db.repo();

    let mut mailing_ids = Vec::new();
    for owner_id in [1, 2] {
        let message = add_message(&repo, owner_id);
        let client = add_client(&repo, owner_id, "someone@example.com", "Someone");
        let mailing = repo
            .create_mailing(&NewMailing {
                user_id: UserId::new(owner_id).unwrap(),
                message_id: message.id,
                schedule: MailingSchedule::try_new(at(2025, 1, 1, 9), None, Periodicity::Daily)
                    .unwrap(),
                is_published: true,
                client_ids: vec![client.id],
            })
            .unwrap();
        repo.create_mailing_log(&NewMailingLog::success(
            mailing.id,
            client.id,
            at(2025, 1, 1, 9),
        ))
        .unwrap();
        repo.create_mailing_log(&NewMailingLog::failure(
            mailing.id,
            client.id,
            at(2025, 1, 2, 9),
            "mailbox full",
        ))
        .unwrap();
        mailing_ids.push(mailing.id);
    }

    let (own_total, own_logs) = repo
        .list_mailing_logs(MailingLogListQuery::new(owner(1)))
        .unwrap();
    assert_eq!(own_total, 2);
    assert!(own_logs.iter().all(|log| log.mailing_id == mailing_ids[0]));
    assert!(own_logs[0].attempted_at > own_logs[1].attempted_at);

    let (all_total, _) = repo
        .list_mailing_logs(MailingLogListQuery::new(OwnerScope::All))
        .unwrap();
    assert_eq!(all_total, 4);

    let (single_total, _) = repo
        .list_mailing_logs(MailingLogListQuery::new(OwnerScope::All).mailing(mailing_ids[1]))
        .unwrap();
    assert_eq!(single_total, 2);

    let (messages_total, _) = repo
        .list_messages(MessageListQuery::new(owner(2)))
        .unwrap();
    assert_eq!(messages_total, 1);
}

#[test]
fn test_schedule_update_keeps_planned_run() {
    let test_db = common::TestDb::new("test_schedule_update_keeps_planned_run.db");
    let repo = test_db.repo();

    let message = add_message(&repo, 1);
    let client = add_client(&repo, 1, "alice@example.com", "Alice");
    let mut mailing = repo
        .create_mailing(&NewMailing {
            user_id: UserId::new(1).unwrap(),
            message_id: message.id,
            schedule: MailingSchedule::try_new(at(2025, 1, 1, 9), None, Periodicity::Daily)
                .unwrap(),
            is_published: true,
            client_ids: vec![client.id],
        })
        .unwrap();
    repo.create_task(&mailing, at(2025, 1, 1, 0)).unwrap();
    repo.reschedule_task(mailing.id, at(2025, 3, 2, 9)).unwrap();

    mailing.schedule =
        MailingSchedule::try_new(at(2025, 1, 1, 9), None, Periodicity::Weekly).unwrap();
    let kept = repo.update_task_schedule(&mailing, at(2025, 3, 1, 10)).unwrap();
    assert_eq!(kept.next_run_at, at(2025, 3, 2, 9));
    assert_eq!(kept.periodicity, Periodicity::Weekly);

    mailing.schedule =
        MailingSchedule::try_new(at(2025, 6, 1, 9), None, Periodicity::Weekly).unwrap();
    let moved = repo.update_task_schedule(&mailing, at(2025, 3, 1, 10)).unwrap();
    assert_eq!(moved.next_run_at, at(2025, 6, 1, 9));

    repo.delete_task(mailing.id).unwrap();
    let registered = repo.update_task_schedule(&mailing, at(2025, 3, 1, 10)).unwrap();
    assert_eq!(registered.next_run_at, at(2025, 6, 1, 9));
}
