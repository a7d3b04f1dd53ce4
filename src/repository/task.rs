//! Task registry stored next to the mailings it schedules.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel::upsert::excluded;
use pushkind_common::repository::errors::RepositoryError;

use crate::domain::mailing::Mailing;
use crate::domain::task::{MailingTask, NewMailingTask};
use crate::domain::types::MailingId;
use crate::models::task::{MailingTask as DbMailingTask, NewMailingTask as DbNewMailingTask};
use crate::repository::DieselRepository;
use crate::scheduler::{MailingScheduler, SchedulerError, SchedulerResult, TaskQueue};

/// Inserts the task or replaces the periodicity and next run of an existing one.
fn upsert_task(
    conn: &mut SqliteConnection,
    new_task: &NewMailingTask,
) -> Result<DbMailingTask, RepositoryError> {
    use crate::schema::mailing_tasks;

    let insertable: DbNewMailingTask = new_task.into();

    let row = diesel::insert_into(mailing_tasks::table)
        .values(&insertable)
        .on_conflict(mailing_tasks::mailing_id)
        .do_update()
        .set((
            mailing_tasks::periodicity.eq(excluded(mailing_tasks::periodicity)),
            mailing_tasks::next_run_at.eq(excluded(mailing_tasks::next_run_at)),
        ))
        .get_result::<DbMailingTask>(conn)?;

    Ok(row)
}

fn into_domain(row: DbMailingTask) -> SchedulerResult<MailingTask> {
    MailingTask::try_from(row).map_err(|e| SchedulerError::InvalidSchedule(e.to_string()))
}

impl MailingScheduler for DieselRepository {
    fn create_task(&self, mailing: &Mailing, now: NaiveDateTime) -> SchedulerResult<MailingTask> {
        let new_task = NewMailingTask {
            mailing_id: mailing.id,
            periodicity: mailing.schedule.periodicity,
            next_run_at: mailing.schedule.first_run(now),
        };

        let mut conn = self.conn()?;
        let row = upsert_task(&mut conn, &new_task)?;

        into_domain(row)
    }

    fn update_task_schedule(
        &self,
        mailing: &Mailing,
        now: NaiveDateTime,
    ) -> SchedulerResult<MailingTask> {
        use crate::schema::mailing_tasks;

        let mut conn = self.conn()?;
        let row = conn.transaction::<_, RepositoryError, _>(|conn| {
            let planned = mailing_tasks::table
                .find(mailing.id.get())
                .select(mailing_tasks::next_run_at)
                .first::<NaiveDateTime>(conn)
                .optional()?;

            let first_run = mailing.schedule.first_run(now);
            let new_task = NewMailingTask {
                mailing_id: mailing.id,
                periodicity: mailing.schedule.periodicity,
                next_run_at: planned.map_or(first_run, |planned| planned.max(first_run)),
            };

            upsert_task(conn, &new_task)
        })?;

        into_domain(row)
    }

    fn delete_task(&self, mailing_id: MailingId) -> SchedulerResult<()> {
        use crate::schema::mailing_tasks;

        let mut conn = self.conn()?;
        diesel::delete(mailing_tasks::table.find(mailing_id.get()))
            .execute(&mut conn)
            .map_err(RepositoryError::from)?;

        Ok(())
    }
}

impl TaskQueue for DieselRepository {
    fn list_due_tasks(&self, now: NaiveDateTime) -> SchedulerResult<Vec<MailingTask>> {
        use crate::schema::mailing_tasks;

        let mut conn = self.conn()?;
        mailing_tasks::table
            .filter(mailing_tasks::next_run_at.le(now))
            .order(mailing_tasks::next_run_at.asc())
            .load::<DbMailingTask>(&mut conn)
            .map_err(RepositoryError::from)?
            .into_iter()
            .map(into_domain)
            .collect()
    }

    fn reschedule_task(
        &self,
        mailing_id: MailingId,
        next_run_at: NaiveDateTime,
    ) -> SchedulerResult<()> {
        use crate::schema::mailing_tasks;

        let mut conn = self.conn()?;
        diesel::update(mailing_tasks::table.find(mailing_id.get()))
            .set(mailing_tasks::next_run_at.eq(next_run_at))
            .execute(&mut conn)
            .map_err(RepositoryError::from)?;

        Ok(())
    }
}
