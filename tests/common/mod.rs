#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pushkind_common::db::{DbPool, establish_connection_pool};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_mailing::domain::client::{Client, NewClient};
use pushkind_mailing::domain::message::{Message, NewMessage};
use pushkind_mailing::repository::{ClientWriter, DieselRepository, MessageWriter};
use tempfile::TempDir;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

/// Migrated SQLite database living in a temporary directory.
pub struct TestDb {
    _dir: TempDir,
    pool: DbPool,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(name);
        let pool = establish_connection_pool(path.to_str().expect("utf-8 path"))
            .expect("create connection pool");

        let mut conn = pool.get().expect("get connection");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("run migrations");

        Self { _dir: dir, pool }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }
}

pub fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, 0, 0))
        .expect("valid datetime")
}

pub fn user(id: i32, roles: &[&str]) -> AuthenticatedUser {
    AuthenticatedUser {
        sub: id.to_string(),
        email: format!("user{id}@example.com"),
        hub_id: 1,
        name: format!("User {id}"),
        roles: roles.iter().map(|r| r.to_string()).collect(),
        exp: 0,
    }
}

pub fn add_client(repo: &DieselRepository, owner: i32, email: &str, name: &str) -> Client {
    let new_client = NewClient::try_new(owner, email, name, None).expect("valid client");
    repo.create_client(&new_client).expect("create client")
}

pub fn add_message(repo: &DieselRepository, owner: i32) -> Message {
    let new_message =
        NewMessage::try_new(owner, "Weekly digest", "<p>Hello!</p>").expect("valid message");
    repo.create_message(&new_message).expect("create message")
}
