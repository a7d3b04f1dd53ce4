//! Ownership-scoped visibility of clients and mailings.
//!
//! Staff and superusers see every record; everybody else sees only what they
//! own. Listings additionally hide deactivated clients and unpublished
//! mailings.

use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use pushkind_common::routes::check_role;

use crate::domain::client::Client;
use crate::domain::mailing::Mailing;
use crate::domain::scope::OwnerScope;
use crate::domain::types::{TypeConstraintError, UserId};
use crate::repository::{ClientListQuery, ClientReader, MailingListQuery, MailingReader};
use crate::services::{ServiceError, ServiceResult, page_number, paginate};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE, SERVICE_STAFF_ROLE};

/// Owner id carried in the `sub` claim of the session user.
pub fn user_id(user: &AuthenticatedUser) -> ServiceResult<UserId> {
    let raw = user
        .sub
        .parse::<i32>()
        .map_err(|_| TypeConstraintError::InvalidValue(user.sub.clone()))?;
    Ok(UserId::new(raw)?)
}

pub fn is_superuser(user: &AuthenticatedUser) -> bool {
    check_role(SERVICE_ADMIN_ROLE, &user.roles)
}

/// True for staff and superusers.
pub fn can_view_all(user: &AuthenticatedUser) -> bool {
    check_role(SERVICE_STAFF_ROLE, &user.roles) || is_superuser(user)
}

/// Rejects users that hold no role of this service.
pub fn ensure_service_access(user: &AuthenticatedUser) -> ServiceResult<()> {
    if check_role(SERVICE_ACCESS_ROLE, &user.roles) || can_view_all(user) {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

pub fn owner_scope(user: &AuthenticatedUser) -> ServiceResult<OwnerScope> {
    if can_view_all(user) {
        Ok(OwnerScope::All)
    } else {
        Ok(OwnerScope::Owner(user_id(user)?))
    }
}

/// Whether `user` may read or change a record owned by `owner`.
pub fn can_access(user: &AuthenticatedUser, owner: UserId) -> bool {
    can_view_all(user) || user_id(user).is_ok_and(|id| id == owner)
}

/// Hides records of other owners as if they did not exist.
pub fn ensure_access(user: &AuthenticatedUser, owner: UserId) -> ServiceResult<()> {
    if can_access(user, owner) {
        Ok(())
    } else {
        Err(ServiceError::NotFound)
    }
}

/// An entity kind with an ownership-scoped, flag-filtered listing.
pub trait VisibleKind<R: ?Sized> {
    type Entity;

    fn list(
        repo: &R,
        scope: OwnerScope,
        page: usize,
        per_page: usize,
    ) -> ServiceResult<(usize, Vec<Self::Entity>)>;
}

/// Active clients.
pub struct Clients;

/// Published mailings.
pub struct Mailings;

impl<R> VisibleKind<R> for Clients
where
    R: ClientReader + ?Sized,
{
    type Entity = Client;

    fn list(
        repo: &R,
        scope: OwnerScope,
        page: usize,
        per_page: usize,
    ) -> ServiceResult<(usize, Vec<Client>)> {
        Ok(repo.list_clients(ClientListQuery::new(scope).paginate(page, per_page))?)
    }
}

impl<R> VisibleKind<R> for Mailings
where
    R: MailingReader + ?Sized,
{
    type Entity = Mailing;

    fn list(
        repo: &R,
        scope: OwnerScope,
        page: usize,
        per_page: usize,
    ) -> ServiceResult<(usize, Vec<Mailing>)> {
        Ok(repo.list_mailings(MailingListQuery::new(scope).paginate(page, per_page))?)
    }
}

/// Lists one page of the records of kind `K` visible to `user`, together
/// with the number of visible records.
pub fn list_visible<K, R>(
    repo: &R,
    user: &AuthenticatedUser,
    page: usize,
) -> ServiceResult<(usize, Paginated<K::Entity>)>
where
    K: VisibleKind<R>,
    R: ?Sized,
{
    ensure_service_access(user)?;

    let page = page_number(Some(page));
    let (total, items) = K::list(repo, owner_scope(user)?, page, DEFAULT_ITEMS_PER_PAGE)?;

    Ok((total, paginate(items, page, total)))
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{plain_user, staff_user, superuser};

    #[test]
    fn capability_follows_roles() {
        assert!(can_view_all(&staff_user(1)));
        assert!(can_view_all(&superuser(1)));
        assert!(!can_view_all(&plain_user(1)));
    }

    #[test]
    fn plain_users_only_access_their_own_records() {
        let owner = UserId::new(5).unwrap();
        assert!(can_access(&plain_user(5), owner));
        assert!(!can_access(&plain_user(6), owner));
        assert!(can_access(&staff_user(6), owner));
        assert!(matches!(
            ensure_access(&plain_user(6), owner),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn plain_user_lists_own_active_clients() {
        let mut repo = MockRepository::new();
        repo.expect_list_clients()
            .withf(|query| {
                query.scope == OwnerScope::Owner(UserId::new(5).unwrap())
                    && query.active_only
                    && query.search.is_none()
            })
            .times(1)
            .returning(|_| Ok((0, vec![])));

        let (total, page) = list_visible::<Clients, _>(&repo, &plain_user(5), 1).unwrap();
        assert_eq!(total, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn staff_lists_all_published_mailings() {
        let mut repo = MockRepository::new();
        repo.expect_list_mailings()
            .withf(|query| query.scope == OwnerScope::All && query.published_only)
            .times(1)
            .returning(|_| Ok((0, vec![])));

        list_visible::<Mailings, _>(&repo, &staff_user(9), 1).unwrap();
    }

    #[test]
    fn users_without_roles_are_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_list_mailings().times(0);
        let mut user = plain_user(5);
        user.roles.clear();

        let result = list_visible::<Mailings, _>(&repo, &user, 1);
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn huge_page_number_is_clamped() {
        let mut repo = MockRepository::new();
        repo.expect_list_mailings()
            .withf(|query| {
                query
                    .pagination
                    .is_some_and(|pagination| pagination.page == crate::services::MAX_PAGE)
            })
            .times(1)
            .returning(|_| Ok((3, vec![])));

        let (total, page) = list_visible::<Mailings, _>(&repo, &plain_user(5), usize::MAX).unwrap();
        assert_eq!(total, 3);
        assert_eq!(page.page, crate::services::MAX_PAGE);
    }

    #[test]
    fn user_id_requires_numeric_positive_sub() {
        assert_eq!(user_id(&plain_user(7)).unwrap().get(), 7);

        let mut broken = plain_user(7);
        broken.sub = "abc".to_string();
        assert!(matches!(
            user_id(&broken),
            Err(ServiceError::TypeConstraint(_))
        ));

        broken.sub = "0".to_string();
        assert!(user_id(&broken).is_err());
    }
}
