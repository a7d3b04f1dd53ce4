//! Diesel implementation of the mailing reader and writer.

use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::domain::client::Client;
use crate::domain::mailing::{
    Mailing, MailingStatus, MailingWithRecipients, NewMailing, UpdateMailing,
};
use crate::domain::types::{ClientId, MailingId};
use crate::models::client::Client as DbClient;
use crate::models::mailing::{
    Mailing as DbMailing, NewMailing as DbNewMailing, NewMailingClient,
    UpdateMailing as DbUpdateMailing,
};
use crate::repository::{DieselRepository, MailingListQuery, MailingReader, MailingWriter};

fn recipient_links(mailing_id: i32, client_ids: &[ClientId]) -> Vec<NewMailingClient> {
    let mut ids: Vec<i32> = client_ids.iter().map(|id| id.get()).collect();
    ids.sort_unstable();
    ids.dedup();
    ids.into_iter()
        .map(|client_id| NewMailingClient {
            mailing_id,
            client_id,
        })
        .collect()
}

impl MailingReader for DieselRepository {
    fn get_mailing_by_id(&self, id: MailingId) -> RepositoryResult<Option<Mailing>> {
        use crate::schema::mailings;

        let mut conn = self.conn()?;
        let row = mailings::table
            .find(id.get())
            .first::<DbMailing>(&mut conn)
            .optional()?;

        row.map(|row| Mailing::try_from(row).map_err(RepositoryError::from))
            .transpose()
    }

    fn get_mailing_with_recipients(
        &self,
        id: MailingId,
    ) -> RepositoryResult<Option<MailingWithRecipients>> {
        use crate::schema::{mailing_clients, mailings};

        let mut conn = self.conn()?;
        let Some(row) = mailings::table
            .find(id.get())
            .first::<DbMailing>(&mut conn)
            .optional()?
        else {
            return Ok(None);
        };

        let client_ids = mailing_clients::table
            .filter(mailing_clients::mailing_id.eq(id.get()))
            .order(mailing_clients::client_id.asc())
            .select(mailing_clients::client_id)
            .load::<i32>(&mut conn)?
            .into_iter()
            .map(ClientId::new)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(MailingWithRecipients {
            mailing: Mailing::try_from(row)?,
            client_ids,
        }))
    }

    fn list_mailings(&self, query: MailingListQuery) -> RepositoryResult<(usize, Vec<Mailing>)> {
        use crate::schema::mailings;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = mailings::table.into_boxed::<Sqlite>();
            if let Some(owner) = query.scope.owner() {
                items = items.filter(mailings::user_id.eq(owner.get()));
            }
            if query.published_only {
                items = items.filter(mailings::is_published.eq(true));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order(mailings::id.asc());
        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset())
                .limit(pagination.limit());
        }

        let mailings = items
            .load::<DbMailing>(&mut conn)?
            .into_iter()
            .map(|row| Mailing::try_from(row).map_err(RepositoryError::from))
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok((total, mailings))
    }

    fn list_mailing_recipients(&self, id: MailingId) -> RepositoryResult<Vec<Client>> {
        use crate::schema::{clients, mailing_clients};

        let mut conn = self.conn()?;
        clients::table
            .inner_join(mailing_clients::table)
            .filter(mailing_clients::mailing_id.eq(id.get()))
            .order(clients::id.asc())
            .select(clients::all_columns)
            .load::<DbClient>(&mut conn)?
            .into_iter()
            .map(|row| Client::try_from(row).map_err(RepositoryError::from))
            .collect()
    }
}

impl MailingWriter for DieselRepository {
    fn create_mailing(&self, new_mailing: &NewMailing) -> RepositoryResult<Mailing> {
        use crate::schema::{mailing_clients, mailings};

        let mut conn = self.conn()?;
        let insertable: DbNewMailing = new_mailing.into();

        let row = conn.transaction::<_, diesel::result::Error, _>(|conn| {
            let row = diesel::insert_into(mailings::table)
                .values(&insertable)
                .get_result::<DbMailing>(conn)?;

            diesel::insert_into(mailing_clients::table)
                .values(recipient_links(row.id, &new_mailing.client_ids))
                .execute(conn)?;

            Ok(row)
        })?;

        Ok(Mailing::try_from(row)?)
    }

    fn update_mailing(
        &self,
        mailing_id: MailingId,
        updates: &UpdateMailing,
    ) -> RepositoryResult<Mailing> {
        use crate::schema::{mailing_clients, mailings};

        let mut conn = self.conn()?;
        let changes = DbUpdateMailing::from_domain(updates, Utc::now().naive_utc());

        let row = conn.transaction::<_, diesel::result::Error, _>(|conn| {
            let row = diesel::update(mailings::table.find(mailing_id.get()))
                .set(&changes)
                .get_result::<DbMailing>(conn)?;

            diesel::delete(
                mailing_clients::table.filter(mailing_clients::mailing_id.eq(mailing_id.get())),
            )
            .execute(conn)?;

            diesel::insert_into(mailing_clients::table)
                .values(recipient_links(row.id, &updates.client_ids))
                .execute(conn)?;

            Ok(row)
        })?;

        Ok(Mailing::try_from(row)?)
    }

    fn set_mailing_status(
        &self,
        mailing_id: MailingId,
        expected: MailingStatus,
        next: MailingStatus,
    ) -> RepositoryResult<bool> {
        use crate::schema::mailings;

        let mut conn = self.conn()?;
        let affected = diesel::update(
            mailings::table
                .filter(mailings::id.eq(mailing_id.get()))
                .filter(mailings::status.eq(expected.as_str())),
        )
        .set((
            mailings::status.eq(next.as_str()),
            mailings::updated_at.eq(Utc::now().naive_utc()),
        ))
        .execute(&mut conn)?;

        Ok(affected == 1)
    }

    fn delete_mailing(&self, mailing_id: MailingId) -> RepositoryResult<()> {
        use crate::schema::{mailing_clients, mailing_logs, mailing_tasks, mailings};

        let mut conn = self.conn()?;
        let id = mailing_id.get();

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            diesel::delete(mailing_tasks::table.filter(mailing_tasks::mailing_id.eq(id)))
                .execute(conn)?;
            diesel::delete(mailing_logs::table.filter(mailing_logs::mailing_id.eq(id)))
                .execute(conn)?;
            diesel::delete(mailing_clients::table.filter(mailing_clients::mailing_id.eq(id)))
                .execute(conn)?;
            let deleted = diesel::delete(mailings::table.find(id)).execute(conn)?;
            if deleted == 0 {
                return Err(diesel::result::Error::NotFound);
            }
            Ok(())
        })?;

        Ok(())
    }
}
