use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::domain::mailing_log::{MailingLog, NewMailingLog};
use crate::models::mailing_log::{MailingLog as DbMailingLog, NewMailingLog as DbNewMailingLog};
use crate::repository::{DieselRepository, MailingLogListQuery, MailingLogReader, MailingLogWriter};

impl MailingLogReader for DieselRepository {
    fn list_mailing_logs(
        &self,
        query: MailingLogListQuery,
    ) -> RepositoryResult<(usize, Vec<MailingLog>)> {
        use crate::schema::{mailing_logs, mailings};

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = mailing_logs::table.into_boxed::<Sqlite>();
            if let Some(owner) = query.scope.owner() {
                let owned = mailings::table
                    .filter(mailings::user_id.eq(owner.get()))
                    .select(mailings::id);
                items = items.filter(mailing_logs::mailing_id.eq_any(owned));
            }
            if let Some(mailing_id) = query.mailing_id {
                items = items.filter(mailing_logs::mailing_id.eq(mailing_id.get()));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder().order((
            mailing_logs::attempted_at.desc(),
            mailing_logs::id.desc(),
        ));
        if let Some(pagination) = &query.pagination {
            items = items
                .offset(pagination.offset())
                .limit(pagination.limit());
        }

        let logs = items
            .load::<DbMailingLog>(&mut conn)?
            .into_iter()
            .map(|row| MailingLog::try_from(row).map_err(RepositoryError::from))
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok((total, logs))
    }
}

impl MailingLogWriter for DieselRepository {
    fn create_mailing_log(&self, log: &NewMailingLog) -> RepositoryResult<MailingLog> {
        use crate::schema::mailing_logs;

        let mut conn = self.conn()?;
        let insertable: DbNewMailingLog = log.into();
        let row = diesel::insert_into(mailing_logs::table)
            .values(&insertable)
            .get_result::<DbMailingLog>(&mut conn)?;

        Ok(MailingLog::try_from(row)?)
    }
}
