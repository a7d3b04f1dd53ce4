//! Fixtures shared by the service tests.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::domain::client::Client;
use crate::domain::mailing::{Mailing, MailingSchedule, MailingStatus, Periodicity};
use crate::domain::mailing_log::{MailingLog, NewMailingLog};
use crate::domain::message::Message;
use crate::domain::task::MailingTask;
use crate::domain::types::{
    ClientEmail, ClientId, ClientName, MailingId, MailingLogId, MessageBody, MessageId,
    MessageSubject, UserId,
};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE, SERVICE_STAFF_ROLE};

fn user(id: i32, roles: &[&str]) -> AuthenticatedUser {
    AuthenticatedUser {
        sub: id.to_string(),
        email: format!("user{id}@example.com"),
        hub_id: 1,
        name: format!("User {id}"),
        roles: roles.iter().map(|r| r.to_string()).collect(),
        exp: 0,
    }
}

pub fn plain_user(id: i32) -> AuthenticatedUser {
    user(id, &[SERVICE_ACCESS_ROLE])
}

pub fn staff_user(id: i32) -> AuthenticatedUser {
    user(id, &[SERVICE_ACCESS_ROLE, SERVICE_STAFF_ROLE])
}

pub fn superuser(id: i32) -> AuthenticatedUser {
    user(id, &[SERVICE_ADMIN_ROLE])
}

fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 1)
        .and_then(|d| d.and_hms_opt(9, 0, 0))
        .expect("valid datetime")
}

pub fn client(id: i32, owner: i32) -> Client {
    let now = Utc::now().naive_utc();
    Client {
        id: ClientId::new(id).expect("valid client id"),
        user_id: UserId::new(owner).expect("valid user id"),
        email: ClientEmail::new(format!("client{id}@example.com")).expect("valid email"),
        full_name: ClientName::new(format!("Client {id}")).expect("valid name"),
        comment: None,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn message(id: i32, owner: i32) -> Message {
    Message {
        id: MessageId::new(id).expect("valid message id"),
        user_id: UserId::new(owner).expect("valid user id"),
        subject: MessageSubject::new("Weekly digest").expect("valid subject"),
        body: MessageBody::new("<p>Hello</p>").expect("valid body"),
        created_at: Utc::now().naive_utc(),
    }
}

/// Open-ended daily mailing using message 4.
pub fn mailing(id: i32, owner: i32, status: MailingStatus) -> Mailing {
    let now = Utc::now().naive_utc();
    Mailing {
        id: MailingId::new(id).expect("valid mailing id"),
        user_id: UserId::new(owner).expect("valid user id"),
        message_id: MessageId::new(4).expect("valid message id"),
        schedule: MailingSchedule::try_new(start(), None, Periodicity::Daily)
            .expect("valid schedule"),
        status,
        is_published: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn task(mailing_id: i32, next_run_at: NaiveDateTime) -> MailingTask {
    MailingTask {
        mailing_id: MailingId::new(mailing_id).expect("valid mailing id"),
        periodicity: Periodicity::Daily,
        next_run_at,
        created_at: next_run_at,
    }
}

pub fn mailing_log(entry: &NewMailingLog) -> MailingLog {
    MailingLog {
        id: MailingLogId::new(1).expect("valid log id"),
        mailing_id: entry.mailing_id,
        client_id: entry.client_id,
        attempted_at: entry.attempted_at,
        status: entry.status,
        server_response: entry.server_response.clone(),
    }
}
