use actix_web::{HttpResponse, Responder, get, web};
use pushkind_common::domain::auth::AuthenticatedUser;
use serde::Deserialize;

use crate::dto::api::MailingsQuery;
use crate::repository::DieselRepository;
use crate::services::{ServiceError, api as api_service};

#[derive(Deserialize)]
struct ApiV1MailingsQueryParams {
    page: Option<usize>,
}

#[get("/v1/mailings")]
pub async fn api_v1_mailings(
    params: web::Query<ApiV1MailingsQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let query = MailingsQuery { page: params.page };

    match api_service::list_mailings(repo.get_ref(), &user, query) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(ServiceError::Unauthorized) => HttpResponse::Unauthorized().finish(),
        Err(err) => {
            log::error!("Failed to list mailings: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
