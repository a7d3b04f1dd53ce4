use pushkind_common::pagination::Paginated;

use crate::domain::message::Message;

pub struct MessagesPageData {
    pub messages: Paginated<Message>,
}
