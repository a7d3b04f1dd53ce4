use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use serde::Deserialize;
use tera::Tera;

use crate::forms::messages::AddMessageForm;
use crate::repository::DieselRepository;
use crate::services::{ServiceError, messages as messages_service};

#[derive(Deserialize)]
struct MessagesQueryParams {
    page: Option<usize>,
}

#[get("/messages")]
pub async fn show_messages(
    params: web::Query<MessagesQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match messages_service::load_messages_page(repo.get_ref(), &user, params.page) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "messages",
                &server_config.auth_service_url,
            );
            context.insert("messages", &data.messages);

            render_template(&tera, "messages/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list messages: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/messages/add")]
pub async fn add_message(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddMessageForm>,
) -> impl Responder {
    match messages_service::add_message(repo.get_ref(), &user, form) {
        Ok(_) => {
            FlashMessage::success("Сообщение добавлено.").send();
            redirect("/messages")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/messages")
        }
        Err(err) => {
            log::error!("Failed to add a message: {err}");
            FlashMessage::error("Ошибка при добавлении сообщения").send();
            redirect("/messages")
        }
    }
}
