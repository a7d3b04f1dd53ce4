use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use serde::Deserialize;
use tera::Tera;

use crate::dto::logs::LogsQuery;
use crate::repository::DieselRepository;
use crate::services::{ServiceError, logs as logs_service};

#[derive(Deserialize)]
struct LogsQueryParams {
    mailing_id: Option<i32>,
    page: Option<usize>,
}

#[get("/logs")]
pub async fn show_logs(
    params: web::Query<LogsQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let query = LogsQuery {
        mailing_id: params.mailing_id,
        page: params.page,
    };

    match logs_service::load_logs_page(repo.get_ref(), &user, query) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "logs",
                &server_config.auth_service_url,
            );
            context.insert("logs", &data.logs);
            context.insert("mailing_id", &data.mailing_id);

            render_template(&tera, "logs/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Рассылка не найдена.").send();
            redirect("/logs")
        }
        Err(err) => {
            log::error!("Failed to list mailing logs: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
