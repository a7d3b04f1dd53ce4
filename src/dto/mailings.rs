use pushkind_common::pagination::Paginated;

use crate::domain::client::Client;
use crate::domain::mailing::{Mailing, MailingWithRecipients};
use crate::domain::message::Message;

/// Messages and clients a user may pick from in the mailing form.
pub struct MailingFormOptions {
    pub messages: Vec<Message>,
    pub clients: Vec<Client>,
}

/// Data required to render the mailings list with the add form.
pub struct MailingsPageData {
    pub mailings: Paginated<Mailing>,
    pub options: MailingFormOptions,
}

/// Data required to render a single mailing with its edit form.
pub struct MailingPageData {
    pub mailing: MailingWithRecipients,
    pub message: Option<Message>,
    pub recipients: Vec<Client>,
    pub options: MailingFormOptions,
}
