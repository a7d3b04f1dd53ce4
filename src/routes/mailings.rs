use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use chrono::Utc;
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use serde::Deserialize;
use tera::Tera;

use crate::domain::mailing::MailingStatus;
use crate::repository::DieselRepository;
use crate::services::{ServiceError, mailings as mailings_service};

#[derive(Deserialize)]
struct MailingsQueryParams {
    page: Option<usize>,
}

#[get("/mailings")]
pub async fn show_mailings(
    params: web::Query<MailingsQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match mailings_service::load_mailings_page(repo.get_ref(), &user, params.page) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "mailings",
                &server_config.auth_service_url,
            );
            context.insert("mailings", &data.mailings);
            context.insert("messages", &data.options.messages);
            context.insert("clients", &data.options.clients);

            render_template(&tera, "mailings/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list mailings: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/mailings/add")]
pub async fn add_mailing(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Bytes,
) -> impl Responder {
    let now = Utc::now().naive_utc();

    match mailings_service::add_mailing(repo.get_ref(), &user, form.as_ref(), now) {
        Ok(mailing) => {
            FlashMessage::success("Рассылка создана и запущена.").send();
            redirect(&format!("/mailings/{}", mailing.id))
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/mailings")
        }
        Err(err) => {
            log::error!("Failed to add a mailing: {err}");
            FlashMessage::error("Ошибка при создании рассылки").send();
            redirect("/mailings")
        }
    }
}

#[get("/mailings/{mailing_id}")]
pub async fn show_mailing(
    mailing_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match mailings_service::load_mailing(repo.get_ref(), &user, mailing_id.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "mailings",
                &server_config.auth_service_url,
            );
            context.insert("mailing", &data.mailing.mailing);
            context.insert("client_ids", &data.mailing.client_ids);
            context.insert("message", &data.message);
            context.insert("recipients", &data.recipients);
            context.insert("messages", &data.options.messages);
            context.insert("clients", &data.options.clients);
            context.insert(
                "is_running",
                &(data.mailing.mailing.status != MailingStatus::Finish),
            );

            render_template(&tera, "mailings/mailing.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Рассылка не найдена.").send();
            redirect("/mailings")
        }
        Err(err) => {
            log::error!("Failed to load mailing: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/mailings/{mailing_id}/save")]
pub async fn save_mailing(
    mailing_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Bytes,
) -> impl Responder {
    let mailing_id = mailing_id.into_inner();
    let mailing_url = format!("/mailings/{mailing_id}");
    let now = Utc::now().naive_utc();

    match mailings_service::save_mailing(repo.get_ref(), &user, mailing_id, form.as_ref(), now) {
        Ok(_) => {
            FlashMessage::success("Рассылка обновлена.").send();
            redirect(&mailing_url)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Рассылка не найдена.").send();
            redirect("/mailings")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&mailing_url)
        }
        Err(err) => {
            log::error!("Failed to save mailing: {err}");
            FlashMessage::error("Ошибка при сохранении рассылки").send();
            redirect(&mailing_url)
        }
    }
}

#[post("/mailings/{mailing_id}/toggle")]
pub async fn toggle_mailing(
    mailing_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let mailing_id = mailing_id.into_inner();
    let mailing_url = format!("/mailings/{mailing_id}");
    let now = Utc::now().naive_utc();

    match mailings_service::toggle_mailing(repo.get_ref(), &user, mailing_id, now) {
        Ok(mailing) if mailing.status == MailingStatus::Finish => {
            FlashMessage::success("Рассылка остановлена.").send();
            redirect(&mailing_url)
        }
        Ok(_) => {
            FlashMessage::success("Рассылка запущена.").send();
            redirect(&mailing_url)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Рассылка не найдена.").send();
            redirect("/mailings")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::warning(message).send();
            redirect(&mailing_url)
        }
        Err(err) => {
            log::error!("Failed to toggle mailing: {err}");
            FlashMessage::error("Ошибка при изменении статуса рассылки").send();
            redirect(&mailing_url)
        }
    }
}

#[post("/mailings/{mailing_id}/delete")]
pub async fn delete_mailing(
    mailing_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match mailings_service::delete_mailing(repo.get_ref(), &user, mailing_id.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Рассылка удалена.").send();
            redirect("/mailings")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Рассылка не найдена.").send();
            redirect("/mailings")
        }
        Err(err) => {
            log::error!("Failed to delete mailing: {err}");
            FlashMessage::error("Ошибка при удалении рассылки").send();
            redirect("/mailings")
        }
    }
}
