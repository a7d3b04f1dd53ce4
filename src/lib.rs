#[cfg(feature = "server")]
use actix_cors::Cors;
#[cfg(feature = "server")]
use actix_files::Files;
#[cfg(feature = "server")]
use actix_identity::IdentityMiddleware;
#[cfg(feature = "server")]
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
#[cfg(feature = "server")]
use actix_web::cookie::Key;
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, middleware, web};
#[cfg(feature = "server")]
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
#[cfg(feature = "server")]
use pushkind_common::db::establish_connection_pool;
#[cfg(feature = "server")]
use pushkind_common::middleware::RedirectUnauthorized;
#[cfg(feature = "server")]
use pushkind_common::models::config::CommonServerConfig;
#[cfg(feature = "server")]
use pushkind_common::routes::{logout, not_assigned};
#[cfg(feature = "server")]
use tera::Tera;

#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::repository::DieselRepository;
#[cfg(feature = "server")]
use crate::routes::api::api_v1_mailings;
#[cfg(feature = "server")]
use crate::routes::clients::{add_client, delete_client, save_client, show_client, show_clients};
#[cfg(feature = "server")]
use crate::routes::logs::show_logs;
#[cfg(feature = "server")]
use crate::routes::mailings::{
    add_mailing, delete_mailing, save_mailing, show_mailing, show_mailings, toggle_mailing,
};
#[cfg(feature = "server")]
use crate::routes::main::show_index;
#[cfg(feature = "server")]
use crate::routes::messages::{add_message, show_messages};

pub mod domain;
#[cfg(feature = "server")]
pub mod dto;
mod error_conversions;
#[cfg(feature = "server")]
pub mod forms;
pub mod models;
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
pub mod scheduler;
pub mod schema;
#[cfg(feature = "server")]
pub mod services;

/// Role required to use the service at all.
pub const SERVICE_ACCESS_ROLE: &str = "mailing";
/// Staff see every user's records.
pub const SERVICE_STAFF_ROLE: &str = "mailing_staff";
/// Superusers see every user's records and may delete clients.
pub const SERVICE_ADMIN_ROLE: &str = "mailing_admin";
/// Grants client deletion without superuser rights.
pub const SERVICE_DELETE_CLIENT_ROLE: &str = "mailing_delete_client";

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    let common_config = CommonServerConfig {
        auth_service_url: server_config.auth_service_url.to_string(),
        secret: server_config.secret.clone(),
    };

    // Establish Diesel connection pool for the SQLite database.
    let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;

    let repo = DieselRepository::new(pool);

    // Keys and stores for identity, sessions, and flash messages.
    let secret_key = Key::from(server_config.secret.as_bytes());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);

    log::info!("Starting mailing server on {}:{}", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{}", server_config.domain)))
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(not_assigned)
            .service(web::scope("/api").service(api_v1_mailings))
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .service(show_index)
                    .service(show_clients)
                    .service(add_client)
                    .service(show_client)
                    .service(save_client)
                    .service(delete_client)
                    .service(show_messages)
                    .service(add_message)
                    .service(show_mailings)
                    .service(add_mailing)
                    .service(show_mailing)
                    .service(save_mailing)
                    .service(toggle_mailing)
                    .service(delete_mailing)
                    .service(show_logs)
                    .service(logout),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(common_config.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
