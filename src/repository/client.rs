//! Diesel implementation of the client reader and writer.

use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::domain::client::{Client, NewClient, UpdateClient};
use crate::domain::types::ClientId;
use crate::models::client::{
    Client as DbClient, NewClient as DbNewClient, UpdateClient as DbUpdateClient,
};
use crate::repository::{ClientListQuery, ClientReader, ClientWriter, DieselRepository};

fn into_domain(rows: Vec<DbClient>) -> RepositoryResult<Vec<Client>> {
    rows.into_iter()
        .map(|row| Client::try_from(row).map_err(RepositoryError::from))
        .collect()
}

/// Escapes LIKE wildcards so the term matches literally, with `\` as escape.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

impl ClientReader for DieselRepository {
    fn get_client_by_id(&self, id: ClientId) -> RepositoryResult<Option<Client>> {
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let client = clients::table
            .find(id.get())
            .first::<DbClient>(&mut conn)
            .optional()?;

        client
            .map(|row| Client::try_from(row).map_err(RepositoryError::from))
            .transpose()
    }

    fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<Client>)> {
        use crate::schema::clients;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = clients::table.into_boxed::<Sqlite>();

            if let Some(owner) = query.scope.owner() {
                items = items.filter(clients::user_id.eq(owner.get()));
            }
            if query.active_only {
                items = items.filter(clients::is_active.eq(true));
            }
            if let Some(term) = &query.search {
                let pattern = format!("%{}%", escape_like(term));
                items = items.filter(
                    clients::full_name
                        .like(pattern.clone())
                        .escape('\\')
                        .or(clients::email.like(pattern).escape('\\')),
                );
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order(clients::id.asc());
        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset())
                .limit(pagination.limit());
        }

        let rows = items.load::<DbClient>(&mut conn)?;
        Ok((total, into_domain(rows)?))
    }

    fn list_clients_by_ids(&self, ids: &[ClientId]) -> RepositoryResult<Vec<Client>> {
        use crate::schema::clients;

        if ids.is_empty() {
            return Ok(vec![]);
        }

        let mut conn = self.conn()?;
        let raw_ids: Vec<i32> = ids.iter().map(|id| id.get()).collect();
        let rows = clients::table
            .filter(clients::id.eq_any(raw_ids))
            .order(clients::id.asc())
            .load::<DbClient>(&mut conn)?;

        into_domain(rows)
    }
}

impl ClientWriter for DieselRepository {
    fn create_client(&self, new_client: &NewClient) -> RepositoryResult<Client> {
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let insertable: DbNewClient = new_client.into();
        let row = diesel::insert_into(clients::table)
            .values(&insertable)
            .get_result::<DbClient>(&mut conn)?;

        Ok(Client::try_from(row)?)
    }

    fn update_client(
        &self,
        client_id: ClientId,
        updates: &UpdateClient,
    ) -> RepositoryResult<Client> {
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let changes = DbUpdateClient::from_domain(updates, Utc::now().naive_utc());
        let row = diesel::update(clients::table.find(client_id.get()))
            .set(&changes)
            .get_result::<DbClient>(&mut conn)?;

        Ok(Client::try_from(row)?)
    }

    fn delete_client(&self, client_id: ClientId) -> RepositoryResult<()> {
        use crate::schema::{clients, mailing_clients};

        let mut conn = self.conn()?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            diesel::delete(
                mailing_clients::table.filter(mailing_clients::client_id.eq(client_id.get())),
            )
            .execute(conn)?;
            let deleted = diesel::delete(clients::table.find(client_id.get())).execute(conn)?;
            if deleted == 0 {
                return Err(diesel::result::Error::NotFound);
            }
            Ok(())
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
        assert_eq!(escape_like("alice"), "alice");
    }
}
