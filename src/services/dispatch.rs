//! Sending of due mailings.
//!
//! The worker drains due tasks from the registry. Each task is moved to its
//! next period before anything is sent, so a crash mid-run never sends the
//! same period twice.

use chrono::NaiveDateTime;
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::zmq::ZmqSender;
use pushkind_emailer::models::zmq::ZMQSendEmailMessage;
use serde_json::json;
use thiserror::Error;

use crate::domain::client::Client;
use crate::domain::mailing::{Mailing, MailingStatus};
use crate::domain::mailing_log::NewMailingLog;
use crate::domain::message::Message;
use crate::domain::task::MailingTask;
use crate::repository::{MailingLogWriter, MailingReader, MailingWriter, MessageReader};
use crate::scheduler::{MailingScheduler, SchedulerError, TaskQueue};
use crate::services::{ServiceError, ServiceResult};

#[derive(Debug, Error)]
pub enum SendError {
    #[error("failed to build email: {0}")]
    Serialization(String),

    #[error("failed to hand over email: {0}")]
    Transport(String),
}

/// Hands a single email over for delivery.
pub trait EmailSender {
    fn send(&self, email: &ZMQSendEmailMessage) -> Result<(), SendError>;
}

impl EmailSender for ZmqSender {
    fn send(&self, email: &ZMQSendEmailMessage) -> Result<(), SendError> {
        log::debug!(
            "Handing email for {} to the emailer",
            recipient_address(email).unwrap_or("-")
        );
        self.try_send_json(email)
            .map_err(|e| SendError::Transport(e.to_string()))
    }
}

/// Builds the emailer request for one recipient, sent on behalf of the
/// mailing owner within `hub_id`.
pub fn build_email(
    mailing: &Mailing,
    message: &Message,
    client: &Client,
    hub_id: i32,
) -> Result<ZMQSendEmailMessage, SendError> {
    let owner = AuthenticatedUser {
        sub: mailing.user_id.to_string(),
        email: String::new(),
        hub_id,
        name: String::new(),
        roles: vec![],
        exp: 0,
    };

    let new_email = serde_json::from_value(json!({
        "message": message.body.as_str(),
        "subject": message.subject.as_str(),
        "hub_id": hub_id,
        "recipients": [{
            "address": client.email.as_str(),
            "name": client.full_name.as_str(),
            "fields": {},
        }],
    }))
    .map_err(|e| SendError::Serialization(e.to_string()))?;

    Ok(ZMQSendEmailMessage::NewEmail(Box::new((owner, new_email))))
}

/// First recipient of a new-email request.
pub fn recipient_address(email: &ZMQSendEmailMessage) -> Option<&str> {
    match email {
        ZMQSendEmailMessage::NewEmail(boxed) => boxed
            .1
            .recipients
            .first()
            .map(|recipient| recipient.address.as_str()),
        _ => None,
    }
}

/// What happened to one due task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// `log_errors` counts attempts whose log row could not be written.
    Sent {
        sent: usize,
        failed: usize,
        log_errors: usize,
    },
    /// The sending window closed; the mailing was finished.
    Finished,
    /// The mailing is still being created; the task is left for the next run.
    Skipped,
    /// The mailing is gone or not running; its task was removed.
    Dropped,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
    pub processed: usize,
    pub sent: usize,
    pub failed: usize,
    pub log_errors: usize,
    pub finished: usize,
    pub errors: usize,
}

/// Runs one due task.
pub fn send_mailing<R, S>(
    repo: &R,
    sender: &S,
    task: &MailingTask,
    hub_id: i32,
    now: NaiveDateTime,
) -> ServiceResult<DispatchOutcome>
where
    R: MailingReader
        + MailingWriter
        + MessageReader
        + MailingLogWriter
        + MailingScheduler
        + TaskQueue
        + ?Sized,
    S: EmailSender + ?Sized,
{
    let mailing_id = task.mailing_id;

    let Some(mailing) = repo.get_mailing_by_id(mailing_id)? else {
        repo.delete_task(mailing_id)?;
        return Ok(DispatchOutcome::Dropped);
    };

    match mailing.status {
        MailingStatus::Create => return Ok(DispatchOutcome::Skipped),
        MailingStatus::Finish => {
            log::warn!("Removing stale task of finished mailing {mailing_id}");
            repo.delete_task(mailing_id)?;
            return Ok(DispatchOutcome::Dropped);
        }
        MailingStatus::Start => {}
    }

    if mailing.schedule.is_expired(now) {
        repo.delete_task(mailing_id)?;
        if !repo.set_mailing_status(mailing_id, MailingStatus::Start, MailingStatus::Finish)? {
            log::warn!("Mailing {mailing_id} changed status while finishing");
        }
        log::info!("Mailing {mailing_id} reached its end date");
        return Ok(DispatchOutcome::Finished);
    }

    let next_run_at = mailing
        .schedule
        .periodicity
        .next_run_after(task.next_run_at, now)
        .ok_or_else(|| {
            SchedulerError::InvalidSchedule(format!("mailing {mailing_id} cannot be advanced"))
        })?;
    repo.reschedule_task(mailing_id, next_run_at)?;

    let message = repo
        .get_message_by_id(mailing.message_id)?
        .ok_or(ServiceError::NotFound)?;
    let recipients = repo.list_mailing_recipients(mailing_id)?;

    let mut sent = 0;
    let mut failed = 0;
    let mut log_errors = 0;
    for client in recipients.iter().filter(|client| client.is_active) {
        let delivered = build_email(&mailing, &message, client, hub_id)
            .and_then(|email| sender.send(&email));

        let entry = match delivered {
            Ok(()) => {
                sent += 1;
                NewMailingLog::success(mailing_id, client.id, now)
            }
            Err(err) => {
                failed += 1;
                log::error!("Failed to send mailing {mailing_id} to {}: {err}", client.email);
                NewMailingLog::failure(mailing_id, client.id, now, err.to_string())
            }
        };

        if let Err(err) = repo.create_mailing_log(&entry) {
            log_errors += 1;
            log::error!(
                "Failed to log delivery of mailing {mailing_id} to {}: {err}",
                client.email
            );
        }
    }

    log::info!(
        "Mailing {mailing_id}: {sent} sent, {failed} failed, next run at {next_run_at}"
    );

    Ok(DispatchOutcome::Sent {
        sent,
        failed,
        log_errors,
    })
}

/// Sends every mailing whose task is due at `now`.
///
/// A failing mailing is logged and counted; the rest still run.
pub fn run_due_mailings<R, S>(
    repo: &R,
    sender: &S,
    hub_id: i32,
    now: NaiveDateTime,
) -> ServiceResult<DispatchSummary>
where
    R: MailingReader
        + MailingWriter
        + MessageReader
        + MailingLogWriter
        + MailingScheduler
        + TaskQueue
        + ?Sized,
    S: EmailSender + ?Sized,
{
    let tasks = repo.list_due_tasks(now)?;
    let mut summary = DispatchSummary::default();

    for task in &tasks {
        match send_mailing(repo, sender, task, hub_id, now) {
            Ok(outcome) => {
                summary.processed += 1;
                match outcome {
                    DispatchOutcome::Sent {
                        sent,
                        failed,
                        log_errors,
                    } => {
                        summary.sent += sent;
                        summary.failed += failed;
                        summary.log_errors += log_errors;
                    }
                    DispatchOutcome::Finished => summary.finished += 1,
                    DispatchOutcome::Skipped | DispatchOutcome::Dropped => {}
                }
            }
            Err(err) => {
                summary.errors += 1;
                log::error!("Failed to process mailing {}: {err}", task.mailing_id);
            }
        }
    }

    Ok(summary)
}
