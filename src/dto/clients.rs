use pushkind_common::pagination::Paginated;

use crate::domain::client::Client;

/// Query parameters accepted by the clients page service.
#[derive(Debug, Default)]
pub struct ClientsQuery {
    /// Optional search string matched against name and email.
    pub search: Option<String>,
    pub page: Option<usize>,
    /// Also list deactivated clients.
    pub show_inactive: bool,
}

/// Data required to render the clients list template.
pub struct ClientsPageData {
    pub clients: Paginated<Client>,
    pub search_query: Option<String>,
    pub show_inactive: bool,
}

/// Data required to render a single client.
pub struct ClientPageData {
    pub client: Client,
    /// Whether the delete button is shown.
    pub can_delete: bool,
}
