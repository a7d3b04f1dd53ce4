//! Mailing workflows and the status lifecycle.
//!
//! A mailing is stored as `CREATE`, gets its periodic task registered and is
//! then moved to `START`. Toggling flips between `START` and `FINISH`,
//! registering or cancelling the task. Status writes are compare-and-set and
//! every scheduler failure is compensated, so the stored status and the task
//! registry agree once an operation returns.

use chrono::NaiveDateTime;
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::domain::mailing::{Mailing, MailingStatus, NewMailing};
use crate::domain::message::Message;
use crate::domain::scope::OwnerScope;
use crate::domain::types::{ClientId, MailingId, MessageId, UserId};
use crate::dto::mailings::{MailingFormOptions, MailingPageData, MailingsPageData};
use crate::forms::mailings::{MailingForm, MailingPayload};
use crate::repository::{
    ClientListQuery, ClientReader, MailingReader, MailingWriter, MessageListQuery, MessageReader,
};
use crate::scheduler::MailingScheduler;
use crate::services::errors::LifecycleError;
use crate::services::visibility::{
    Mailings, ensure_access, ensure_service_access, list_visible, user_id,
};
use crate::services::{ServiceError, ServiceResult};

/// Persists `new_mailing`, registers its task and starts it.
///
/// On failure nothing is left behind: the task and the mailing are removed.
pub fn create_mailing<R>(repo: &R, new_mailing: &NewMailing, now: NaiveDateTime) -> ServiceResult<Mailing>
where
    R: MailingWriter + MailingScheduler + ?Sized,
{
    let mailing = repo.create_mailing(new_mailing)?;

    if let Err(err) = repo.create_task(&mailing, now) {
        log::error!("Failed to schedule mailing {}: {err}", mailing.id);
        discard_mailing(repo, mailing.id);
        return Err(err.into());
    }

    let started = repo.set_mailing_status(mailing.id, MailingStatus::Create, MailingStatus::Start);
    let failure: ServiceError = match started {
        Ok(true) => {
            return Ok(Mailing {
                status: MailingStatus::Start,
                ..mailing
            });
        }
        Ok(false) => LifecycleError::Conflict(mailing.id).into(),
        Err(err) => err.into(),
    };

    log::error!("Failed to start mailing {}: {failure}", mailing.id);
    if let Err(err) = repo.delete_task(mailing.id) {
        log::error!("Failed to cancel task of mailing {}: {err}", mailing.id);
    }
    discard_mailing(repo, mailing.id);

    Err(failure)
}

fn discard_mailing<R>(repo: &R, mailing_id: MailingId)
where
    R: MailingWriter + ?Sized,
{
    if let Err(err) = repo.delete_mailing(mailing_id) {
        log::error!("Failed to discard mailing {mailing_id}: {err}");
    }
}

/// Flips the mailing between running and finished.
///
/// The status is written first (compare-and-set against `mailing.status`),
/// then the task is registered or cancelled. A scheduler failure restores the
/// previous status.
pub fn toggle_status<R>(repo: &R, mailing: &Mailing, now: NaiveDateTime) -> ServiceResult<Mailing>
where
    R: MailingWriter + MailingScheduler + ?Sized,
{
    let current = mailing.status;
    let next = current.toggled();

    if !repo.set_mailing_status(mailing.id, current, next)? {
        return Err(LifecycleError::Conflict(mailing.id).into());
    }

    let scheduled = if next.is_scheduled() {
        repo.create_task(mailing, now).map(|_| ())
    } else {
        repo.delete_task(mailing.id)
    };

    if let Err(err) = scheduled {
        log::error!("Failed to update task of mailing {}: {err}", mailing.id);
        match repo.set_mailing_status(mailing.id, next, current) {
            Ok(true) => {}
            Ok(false) => log::error!(
                "Status of mailing {} changed concurrently, not restored",
                mailing.id
            ),
            Err(restore) => log::error!(
                "Failed to restore status of mailing {}: {restore}",
                mailing.id
            ),
        }
        return Err(err.into());
    }

    log::info!("Mailing {} switched from {current} to {next}", mailing.id);

    Ok(Mailing {
        status: next,
        ..mailing.clone()
    })
}

/// Checks that the message and every recipient belong to `owner`.
fn check_references<R>(
    repo: &R,
    owner: UserId,
    message_id: MessageId,
    client_ids: &[ClientId],
) -> ServiceResult<()>
where
    R: MessageReader + ClientReader + ?Sized,
{
    if client_ids.is_empty() {
        return Err(ServiceError::Form("Выберите получателей".to_string()));
    }

    repo.get_message_by_id(message_id)?
        .filter(|message| message.user_id == owner)
        .ok_or_else(|| ServiceError::Form("Сообщение не найдено".to_string()))?;

    let clients = repo.list_clients_by_ids(client_ids)?;
    if clients.len() != client_ids.len() || clients.iter().any(|c| c.user_id != owner) {
        return Err(ServiceError::Form(
            "Некорректный список получателей".to_string(),
        ));
    }

    Ok(())
}

fn get_accessible_mailing<R>(
    repo: &R,
    user: &AuthenticatedUser,
    mailing_id: i32,
) -> ServiceResult<Mailing>
where
    R: MailingReader + ?Sized,
{
    ensure_service_access(user)?;

    let mailing_id = MailingId::new(mailing_id).map_err(|_| ServiceError::NotFound)?;
    let mailing = repo
        .get_mailing_by_id(mailing_id)?
        .ok_or(ServiceError::NotFound)?;
    ensure_access(user, mailing.user_id)?;

    Ok(mailing)
}

/// Messages and active clients the owner can put into a mailing.
fn form_options<R>(repo: &R, owner: UserId) -> ServiceResult<MailingFormOptions>
where
    R: MessageReader + ClientReader + ?Sized,
{
    let scope = OwnerScope::Owner(owner);
    let (_, messages) = repo.list_messages(MessageListQuery::new(scope))?;
    let (_, clients) = repo.list_clients(ClientListQuery::new(scope))?;

    Ok(MailingFormOptions { messages, clients })
}

pub fn load_mailings_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    page: Option<usize>,
) -> ServiceResult<MailingsPageData>
where
    R: MailingReader + MessageReader + ClientReader + ?Sized,
{
    let (_, mailings) = list_visible::<Mailings, R>(repo, user, page.unwrap_or(1))?;
    let options = form_options(repo, user_id(user)?)?;

    Ok(MailingsPageData { mailings, options })
}

pub fn load_mailing<R>(
    repo: &R,
    user: &AuthenticatedUser,
    mailing_id: i32,
) -> ServiceResult<MailingPageData>
where
    R: MailingReader + MessageReader + ClientReader + ?Sized,
{
    let mailing = get_accessible_mailing(repo, user, mailing_id)?;

    let mailing = repo
        .get_mailing_with_recipients(mailing.id)?
        .ok_or(ServiceError::NotFound)?;
    let message: Option<Message> = repo.get_message_by_id(mailing.mailing.message_id)?;
    let recipients = repo.list_mailing_recipients(mailing.mailing.id)?;
    let options = form_options(repo, mailing.mailing.user_id)?;

    Ok(MailingPageData {
        mailing,
        message,
        recipients,
        options,
    })
}

/// Validates the submitted form and creates a started mailing owned by `user`.
pub fn add_mailing<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: &[u8],
    now: NaiveDateTime,
) -> ServiceResult<Mailing>
where
    R: MailingWriter + MailingScheduler + MessageReader + ClientReader + ?Sized,
{
    ensure_service_access(user)?;

    let owner = user_id(user)?;
    let payload = MailingPayload::try_from(MailingForm::from_bytes(form)?)?;
    check_references(repo, owner, payload.message_id, &payload.client_ids)?;

    create_mailing(repo, &payload.into_new(owner), now)
}

/// Applies the edit form. When the start or the periodicity of a running
/// mailing changed, its task follows the new schedule without going back to a
/// period that was already sent.
pub fn save_mailing<R>(
    repo: &R,
    user: &AuthenticatedUser,
    mailing_id: i32,
    form: &[u8],
    now: NaiveDateTime,
) -> ServiceResult<Mailing>
where
    R: MailingReader + MailingWriter + MailingScheduler + MessageReader + ClientReader + ?Sized,
{
    let mailing = get_accessible_mailing(repo, user, mailing_id)?;

    let payload = MailingPayload::try_from(MailingForm::from_bytes(form)?)?;
    check_references(repo, mailing.user_id, payload.message_id, &payload.client_ids)?;

    let updated = repo.update_mailing(mailing.id, &payload.into_update())?;

    let rescheduled = updated.schedule.start_at != mailing.schedule.start_at
        || updated.schedule.periodicity != mailing.schedule.periodicity;
    if updated.status == MailingStatus::Start && rescheduled {
        repo.update_task_schedule(&updated, now).map_err(|err| {
            log::error!("Failed to reschedule mailing {}: {err}", updated.id);
            err
        })?;
    }

    Ok(updated)
}

pub fn toggle_mailing<R>(
    repo: &R,
    user: &AuthenticatedUser,
    mailing_id: i32,
    now: NaiveDateTime,
) -> ServiceResult<Mailing>
where
    R: MailingReader + MailingWriter + MailingScheduler + ?Sized,
{
    let mailing = get_accessible_mailing(repo, user, mailing_id)?;

    toggle_status(repo, &mailing, now)
}

/// Cancels the task, then removes the mailing with its recipients and logs.
pub fn delete_mailing<R>(repo: &R, user: &AuthenticatedUser, mailing_id: i32) -> ServiceResult<()>
where
    R: MailingReader + MailingWriter + MailingScheduler + ?Sized,
{
    let mailing = get_accessible_mailing(repo, user, mailing_id)?;

    repo.delete_task(mailing.id)?;
    repo.delete_mailing(mailing.id).map_err(|err| {
        log::error!("Failed to delete mailing {}: {err}", mailing.id);
        err
    })?;

    Ok(())
}
