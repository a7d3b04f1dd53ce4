use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::DEFAULT_ITEMS_PER_PAGE;

use crate::domain::message::Message;
use crate::dto::messages::MessagesPageData;
use crate::forms::messages::AddMessageForm;
use crate::repository::{MessageListQuery, MessageReader, MessageWriter};
use crate::services::visibility::{ensure_service_access, owner_scope, user_id};
use crate::services::{ServiceResult, page_number, paginate};

/// Lists messages of the user, or every message for privileged users.
pub fn load_messages_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    page: Option<usize>,
) -> ServiceResult<MessagesPageData>
where
    R: MessageReader + ?Sized,
{
    ensure_service_access(user)?;

    let page = page_number(page);
    let (total, messages) = repo.list_messages(
        MessageListQuery::new(owner_scope(user)?).paginate(page, DEFAULT_ITEMS_PER_PAGE),
    )?;

    Ok(MessagesPageData {
        messages: paginate(messages, page, total),
    })
}

pub fn add_message<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddMessageForm,
) -> ServiceResult<Message>
where
    R: MessageWriter + ?Sized,
{
    ensure_service_access(user)?;

    let new_message = form.into_domain(user_id(user)?)?;

    repo.create_message(&new_message).map_err(|err| {
        log::error!("Failed to add a message: {err}");
        err.into()
    })
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::scope::OwnerScope;
    use crate::domain::types::UserId;
    use crate::repository::mock::MockRepository;
    use crate::services::ServiceError;
    use crate::services::test_support::{message, plain_user, staff_user};

    #[test]
    fn plain_user_lists_own_messages() {
        let mut repo = MockRepository::new();
        repo.expect_list_messages()
            .withf(|query| query.scope == OwnerScope::Owner(UserId::new(5).unwrap()))
            .returning(|_| Ok((1, vec![message(1, 5)])));

        let data = load_messages_page(&repo, &plain_user(5), None).unwrap();
        assert_eq!(data.messages.items.len(), 1);
        assert_eq!(data.messages.page, 1);
    }

    #[test]
    fn staff_lists_every_message() {
        let mut repo = MockRepository::new();
        repo.expect_list_messages()
            .withf(|query| query.scope == OwnerScope::All)
            .returning(|_| Ok((2, vec![message(1, 5), message(2, 6)])));

        let data = load_messages_page(&repo, &staff_user(1), Some(1)).unwrap();
        assert_eq!(data.messages.items.len(), 2);
    }

    #[test]
    fn new_message_is_owned_by_the_author() {
        let mut repo = MockRepository::new();
        repo.expect_create_message()
            .withf(|new_message| new_message.user_id.get() == 5)
            .times(1)
            .returning(|_| Ok(message(9, 5)));

        let form = AddMessageForm {
            subject: "News".to_string(),
            body: "<p>Hi</p>".to_string(),
        };
        let created = add_message(&repo, &plain_user(5), form).unwrap();
        assert_eq!(created.id.get(), 9);
    }

    #[test]
    fn blank_subject_is_a_form_error() {
        let mut repo = MockRepository::new();
        repo.expect_create_message().times(0);

        let form = AddMessageForm {
            subject: "  ".to_string(),
            body: "<p>Hi</p>".to_string(),
        };
        assert!(matches!(
            add_message(&repo, &plain_user(5), form),
            Err(ServiceError::Form(_))
        ));
    }
}
