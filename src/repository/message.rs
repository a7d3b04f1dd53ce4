use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::domain::message::{Message, NewMessage};
use crate::domain::types::MessageId;
use crate::models::message::{Message as DbMessage, NewMessage as DbNewMessage};
use crate::repository::{DieselRepository, MessageListQuery, MessageReader, MessageWriter};

impl MessageReader for DieselRepository {
    fn get_message_by_id(&self, id: MessageId) -> RepositoryResult<Option<Message>> {
        use crate::schema::messages;

        let mut conn = self.conn()?;
        let row = messages::table
            .find(id.get())
            .first::<DbMessage>(&mut conn)
            .optional()?;

        row.map(|row| Message::try_from(row).map_err(RepositoryError::from))
            .transpose()
    }

    fn list_messages(&self, query: MessageListQuery) -> RepositoryResult<(usize, Vec<Message>)> {
        use crate::schema::messages;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = messages::table.into_boxed::<Sqlite>();
            if let Some(owner) = query.scope.owner() {
                items = items.filter(messages::user_id.eq(owner.get()));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order(messages::id.desc());
        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset())
                .limit(pagination.limit());
        }

        let messages = items
            .load::<DbMessage>(&mut conn)?
            .into_iter()
            .map(|row| Message::try_from(row).map_err(RepositoryError::from))
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok((total, messages))
    }
}

impl MessageWriter for DieselRepository {
    fn create_message(&self, new_message: &NewMessage) -> RepositoryResult<Message> {
        use crate::schema::messages;

        let mut conn = self.conn()?;
        let insertable: DbNewMessage = new_message.into();
        let row = diesel::insert_into(messages::table)
            .values(&insertable)
            .get_result::<DbMessage>(&mut conn)?;

        Ok(Message::try_from(row)?)
    }
}
