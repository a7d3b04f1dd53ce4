use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use serde::Deserialize;
use tera::Tera;

use crate::dto::clients::ClientsQuery;
use crate::forms::clients::{AddClientForm, SaveClientForm};
use crate::repository::DieselRepository;
use crate::services::{ServiceError, clients as clients_service};

#[derive(Deserialize)]
struct ClientsQueryParams {
    search: Option<String>,
    page: Option<usize>,
    #[serde(default)]
    inactive: bool,
}

#[get("/clients")]
pub async fn show_clients(
    params: web::Query<ClientsQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let params = params.into_inner();
    let query = ClientsQuery {
        search: params.search,
        page: params.page,
        show_inactive: params.inactive,
    };

    match clients_service::load_clients_page(repo.get_ref(), &user, query) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "clients",
                &server_config.auth_service_url,
            );
            context.insert("clients", &data.clients);
            context.insert("search_query", &data.search_query);
            context.insert("show_inactive", &data.show_inactive);

            render_template(&tera, "clients/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list clients: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/clients/add")]
pub async fn add_client(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddClientForm>,
) -> impl Responder {
    match clients_service::add_client(repo.get_ref(), &user, form) {
        Ok(client) => {
            FlashMessage::success("Клиент добавлен.").send();
            redirect(&format!("/clients/{}", client.id))
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/clients")
        }
        Err(err) => {
            log::error!("Failed to add a client: {err}");
            FlashMessage::error("Ошибка при добавлении клиента").send();
            redirect("/clients")
        }
    }
}

#[get("/clients/{client_id}")]
pub async fn show_client(
    client_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match clients_service::load_client(repo.get_ref(), &user, client_id.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "clients",
                &server_config.auth_service_url,
            );
            context.insert("client", &data.client);
            context.insert("can_delete", &data.can_delete);

            render_template(&tera, "clients/client.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Клиент не найден.").send();
            redirect("/clients")
        }
        Err(err) => {
            log::error!("Failed to load client: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/clients/{client_id}/save")]
pub async fn save_client(
    client_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<SaveClientForm>,
) -> impl Responder {
    let client_id = client_id.into_inner();
    let client_url = format!("/clients/{client_id}");

    match clients_service::save_client(repo.get_ref(), &user, client_id, form) {
        Ok(_) => {
            FlashMessage::success("Клиент обновлён.").send();
            redirect(&client_url)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Клиент не найден.").send();
            redirect("/clients")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&client_url)
        }
        Err(err) => {
            log::error!("Failed to save client: {err}");
            FlashMessage::error("Ошибка при сохранении клиента").send();
            redirect(&client_url)
        }
    }
}

#[post("/clients/{client_id}/delete")]
pub async fn delete_client(
    client_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match clients_service::delete_client(repo.get_ref(), &user, client_id.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Клиент удалён.").send();
            redirect("/clients")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав для удаления клиента.").send();
            redirect("/clients")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Клиент не найден.").send();
            redirect("/clients")
        }
        Err(err) => {
            log::error!("Failed to delete client: {err}");
            FlashMessage::error("Ошибка при удалении клиента").send();
            redirect("/clients")
        }
    }
}
