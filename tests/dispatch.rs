use std::sync::Mutex;

use chrono::NaiveDateTime;
use pushkind_emailer::models::zmq::ZMQSendEmailMessage;
use pushkind_mailing::domain::client::UpdateClient;
use pushkind_mailing::domain::mailing::{
    Mailing, MailingSchedule, MailingStatus, NewMailing, Periodicity,
};
use pushkind_mailing::domain::mailing_log::MailingLogStatus;
use pushkind_mailing::domain::scope::OwnerScope;
use pushkind_mailing::domain::types::UserId;
use pushkind_mailing::repository::{
    ClientWriter, DieselRepository, MailingLogListQuery, MailingLogReader, MailingReader,
};
use pushkind_mailing::scheduler::TaskQueue;
use pushkind_mailing::services::dispatch::{
    EmailSender, SendError, recipient_address, run_due_mailings,
};
use pushkind_mailing::services::mailings::create_mailing;

mod common;

use common::{add_client, add_message, at};

const HUB_ID: i32 = 1;

/// Address and serialized payload of one handed-over email.
struct Delivered {
    recipient: String,
    payload: String,
}

#[derive(Default)]
struct FakeSender {
    delivered: Mutex<Vec<Delivered>>,
}

impl EmailSender for FakeSender {
    fn send(&self, email: &ZMQSendEmailMessage) -> Result<(), SendError> {
        let payload =
            serde_json::to_string(email).map_err(|e| SendError::Serialization(e.to_string()))?;
        let recipient = recipient_address(email).unwrap_or_default().to_string();
        self.delivered
            .lock()
            .map_err(|e| SendError::Transport(e.to_string()))?
            .push(Delivered { recipient, payload });
        Ok(())
    }
}

fn started_mailing(
    repo: &DieselRepository,
    schedule: MailingSchedule,
    now: NaiveDateTime,
) -> Mailing {
    let message = add_message(repo, 1);
    let alice = add_client(repo, 1, "alice@example.com", "Alice");
    let bob = add_client(repo, 1, "bob@example.com", "Bob");
    let new_mailing = NewMailing {
        user_id: UserId::new(1).unwrap(),
        message_id: message.id,
        schedule,
        is_published: true,
        client_ids: vec![alice.id, bob.id],
    };
    create_mailing(repo, &new_mailing, now).unwrap()
}

#[test]
fn due_mailing_is_sent_to_active_recipients_and_logged() {
    let test_db = common::TestDb::new("due_mailing_is_sent.db");
    let repo = test_db.repo();

    let schedule =
        MailingSchedule::try_new(at(2025, 1, 1, 9), None, Periodicity::Weekly).unwrap();
    let mailing = started_mailing(&repo, schedule, at(2025, 1, 1, 0));

    let recipients = repo.list_mailing_recipients(mailing.id).unwrap();
    let bob = recipients
        .iter()
        .find(|client| client.email.as_str() == "bob@example.com")
        .unwrap();
    let deactivate =
        UpdateClient::try_new(bob.email.as_str(), bob.full_name.as_str(), None, false).unwrap();
    repo.update_client(bob.id, &deactivate).unwrap();

    let sender = FakeSender::default();
    let summary = run_due_mailings(&repo, &sender, HUB_ID, at(2025, 1, 1, 10)).unwrap();

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.sent, 1);
    assert_eq!(summary.errors, 0);
    let delivered = sender.delivered.lock().unwrap();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].recipient, "alice@example.com");
    assert!(delivered[0].payload.contains("Weekly digest"));

    let (total, logs) = repo
        .list_mailing_logs(MailingLogListQuery::new(OwnerScope::All).mailing(mailing.id))
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(logs[0].status, MailingLogStatus::Success);

    let tasks = repo.list_due_tasks(at(2100, 1, 1, 0)).unwrap();
    assert_eq!(tasks[0].next_run_at, at(2025, 1, 8, 9));

    let again = run_due_mailings(&repo, &sender, HUB_ID, at(2025, 1, 2, 0)).unwrap();
    assert_eq!(again.processed, 0);
}

#[test]
fn mailing_past_its_end_is_finished() {
    let test_db = common::TestDb::new("mailing_past_its_end.db");
    let repo = test_db.repo();

    let schedule = MailingSchedule::try_new(
        at(2025, 1, 1, 9),
        Some(at(2025, 1, 5, 9)),
        Periodicity::Daily,
    )
    .unwrap();
    let mailing = started_mailing(&repo, schedule, at(2025, 1, 1, 0));

    let sender = FakeSender::default();
    let summary = run_due_mailings(&repo, &sender, HUB_ID, at(2025, 1, 6, 0)).unwrap();

    assert_eq!(summary.finished, 1);
    assert!(sender.delivered.lock().unwrap().is_empty());
    let stored = repo.get_mailing_by_id(mailing.id).unwrap().unwrap();
    assert_eq!(stored.status, MailingStatus::Finish);
    assert!(repo.list_due_tasks(at(2100, 1, 1, 0)).unwrap().is_empty());
}

#[test]
fn monthly_mailing_clamps_to_the_end_of_short_months() {
    let test_db = common::TestDb::new("monthly_mailing_clamps.db");
    let repo = test_db.repo();

    let schedule =
        MailingSchedule::try_new(at(2025, 1, 31, 9), None, Periodicity::Monthly).unwrap();
    started_mailing(&repo, schedule, at(2025, 1, 1, 0));

    let sender = FakeSender::default();
    run_due_mailings(&repo, &sender, HUB_ID, at(2025, 1, 31, 9)).unwrap();

    let tasks = repo.list_due_tasks(at(2100, 1, 1, 0)).unwrap();
    assert_eq!(tasks[0].next_run_at, at(2025, 2, 28, 9));
    assert_eq!(sender.delivered.lock().unwrap().len(), 2);
}
