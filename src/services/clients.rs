//! Client workflows.

use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::DEFAULT_ITEMS_PER_PAGE;
use pushkind_common::repository::errors::RepositoryError;
use pushkind_common::routes::check_role;

use crate::SERVICE_DELETE_CLIENT_ROLE;
use crate::domain::client::{Client, UpdateClient};
use crate::domain::types::ClientId;
use crate::dto::clients::{ClientPageData, ClientsPageData, ClientsQuery};
use crate::forms::clients::{AddClientForm, SaveClientForm};
use crate::repository::{ClientListQuery, ClientReader, ClientWriter};
use crate::services::visibility::{
    Clients, ensure_access, ensure_service_access, is_superuser, list_visible, owner_scope,
    user_id,
};
use crate::services::{ServiceError, ServiceResult, page_number, paginate};

/// Whether `user` may delete clients they can access.
pub fn can_delete_clients(user: &AuthenticatedUser) -> bool {
    is_superuser(user) || check_role(SERVICE_DELETE_CLIENT_ROLE, &user.roles)
}

fn duplicate_email(err: RepositoryError) -> ServiceError {
    match err {
        RepositoryError::ConstraintViolation(_) => {
            ServiceError::Form("Клиент с таким email уже существует".to_string())
        }
        other => ServiceError::from(other),
    }
}

/// Loads the clients list page, optionally filtered by a search term.
pub fn load_clients_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ClientsQuery,
) -> ServiceResult<ClientsPageData>
where
    R: ClientReader + ?Sized,
{
    ensure_service_access(user)?;

    let page = page_number(query.page);
    let search_query = query
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let clients = if search_query.is_none() && !query.show_inactive {
        list_visible::<Clients, R>(repo, user, page)?.1
    } else {
        let mut list_query =
            ClientListQuery::new(owner_scope(user)?).paginate(page, DEFAULT_ITEMS_PER_PAGE);
        if query.show_inactive {
            list_query = list_query.include_inactive();
        }
        if let Some(term) = &search_query {
            list_query = list_query.search(term.clone());
        }
        let (total, clients) = repo.list_clients(list_query)?;
        paginate(clients, page, total)
    };

    Ok(ClientsPageData {
        clients,
        search_query,
        show_inactive: query.show_inactive,
    })
}

pub fn add_client<R>(repo: &R, user: &AuthenticatedUser, form: AddClientForm) -> ServiceResult<Client>
where
    R: ClientWriter + ?Sized,
{
    ensure_service_access(user)?;

    let new_client = form.into_domain(user_id(user)?)?;

    repo.create_client(&new_client).map_err(|err| {
        log::error!("Failed to add a client: {err}");
        duplicate_email(err)
    })
}

fn get_accessible_client<R>(
    repo: &R,
    user: &AuthenticatedUser,
    client_id: i32,
) -> ServiceResult<Client>
where
    R: ClientReader + ?Sized,
{
    ensure_service_access(user)?;

    let client_id = ClientId::new(client_id).map_err(|_| ServiceError::NotFound)?;
    let client = repo
        .get_client_by_id(client_id)?
        .ok_or(ServiceError::NotFound)?;
    ensure_access(user, client.user_id)?;

    Ok(client)
}

pub fn load_client<R>(repo: &R, user: &AuthenticatedUser, client_id: i32) -> ServiceResult<ClientPageData>
where
    R: ClientReader + ?Sized,
{
    let client = get_accessible_client(repo, user, client_id)?;

    Ok(ClientPageData {
        client,
        can_delete: can_delete_clients(user),
    })
}

pub fn save_client<R>(
    repo: &R,
    user: &AuthenticatedUser,
    client_id: i32,
    form: SaveClientForm,
) -> ServiceResult<Client>
where
    R: ClientReader + ClientWriter + ?Sized,
{
    let client = get_accessible_client(repo, user, client_id)?;

    let updates = UpdateClient::try_from(form)?;

    repo.update_client(client.id, &updates).map_err(|err| {
        log::error!("Failed to update client {}: {err}", client.id);
        duplicate_email(err)
    })
}

pub fn delete_client<R>(repo: &R, user: &AuthenticatedUser, client_id: i32) -> ServiceResult<()>
where
    R: ClientReader + ClientWriter + ?Sized,
{
    let client = get_accessible_client(repo, user, client_id)?;

    if !can_delete_clients(user) {
        return Err(ServiceError::Unauthorized);
    }

    repo.delete_client(client.id).map_err(|err| {
        log::error!("Failed to delete client {}: {err}", client.id);
        ServiceError::from(err)
    })
}
