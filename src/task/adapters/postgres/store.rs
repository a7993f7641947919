//! `PostgreSQL` task store implementation.

use super::{
    models::{NewTaskRow, TaskRow},
    schema::tasks,
};
use crate::task::{
    domain::{OwnerId, PersistedTaskData, Priority, Task, TaskId, TaskStatus},
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Error as R2d2Error, Pool};
use std::collections::BTreeSet;
use std::time::Duration;

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// Pool customizer that sets `statement_timeout` on every checked-out
/// connection.
///
/// A [`TimeoutTaskStore`](crate::task::adapters::TimeoutTaskStore) limit only
/// stops waiting; the blocking statement keeps running and may commit after
/// the owner guard has moved on. Installing this customizer with a limit no
/// longer than the store limit makes the server cancel the statement
/// instead.
///
/// # Examples
///
/// ```no_run
/// use diesel::pg::PgConnection;
/// use diesel::r2d2::{ConnectionManager, Pool};
/// use std::time::Duration;
/// use taskline::task::adapters::postgres::StatementTimeout;
///
/// let manager = ConnectionManager::<PgConnection>::new("postgres://localhost/tasks");
/// let pool = Pool::builder()
///     .connection_customizer(Box::new(StatementTimeout::new(Duration::from_secs(5))))
///     .build(manager);
/// # drop(pool);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementTimeout {
    limit: Duration,
}

impl StatementTimeout {
    /// Creates a customizer enforcing `limit` per statement.
    #[must_use]
    pub const fn new(limit: Duration) -> Self {
        Self { limit }
    }

    /// Returns the `SET` statement issued on connection checkout.
    ///
    /// Sub-millisecond limits round up to one millisecond, because `0`
    /// disables the server-side timeout.
    #[must_use]
    pub fn statement(self) -> String {
        let millis = self.limit.as_millis().max(1);
        format!("SET statement_timeout = {millis}")
    }
}

impl CustomizeConnection<PgConnection, R2d2Error> for StatementTimeout {
    fn on_acquire(&self, connection: &mut PgConnection) -> Result<(), R2d2Error> {
        diesel::sql_query(self.statement())
            .execute(connection)
            .map(|_| ())
            .map_err(R2d2Error::QueryError)
    }
}

/// `PostgreSQL`-backed task store.
///
/// Active-list reads go through the `(owner, status, is_primary, priority)`
/// index and run as a single statement, which gives the consistent snapshot
/// the ordering engine needs.
#[derive(Debug, Clone)]
pub struct PostgresTaskStore {
    pool: TaskPgPool,
}

impl PostgresTaskStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskStoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskStoreError::persistence)?
    }
}

#[async_trait]
impl TaskStore for PostgresTaskStore {
    async fn get(&self, owner: &OwnerId, id: TaskId) -> TaskStoreResult<Option<Task>> {
        let owner_key = owner.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .filter(tasks::owner.eq(owner_key))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskStoreError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_active(&self, owner: &OwnerId) -> TaskStoreResult<Vec<Task>> {
        let owner_key = owner.as_str().to_owned();
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::owner.eq(owner_key))
                .filter(tasks::status.ne(TaskStatus::Completed.as_str()))
                .filter(tasks::status.ne(TaskStatus::Canceled.as_str()))
                .order((tasks::created_at.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskStoreError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn list(&self, owner: &OwnerId) -> TaskStoreResult<Vec<Task>> {
        let owner_key = owner.as_str().to_owned();
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::owner.eq(owner_key))
                .order((tasks::created_at.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskStoreError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn put(&self, task: &Task) -> TaskStoreResult<()> {
        let row = to_new_row(task)?;
        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&row)
                .on_conflict(tasks::id)
                .do_update()
                .set(&row)
                .execute(connection)
                .map_err(TaskStoreError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn set_placement(
        &self,
        owner: &OwnerId,
        id: TaskId,
        is_primary: bool,
        priority: Priority,
    ) -> TaskStoreResult<()> {
        let owner_key = owner.as_str().to_owned();
        let rank = i32::try_from(priority.value()).map_err(TaskStoreError::persistence)?;
        self.run_blocking(move |connection| {
            let updated = diesel::update(
                tasks::table
                    .filter(tasks::id.eq(id.into_inner()))
                    .filter(tasks::owner.eq(owner_key)),
            )
            .set((tasks::is_primary.eq(is_primary), tasks::priority.eq(rank)))
            .execute(connection)
            .map_err(TaskStoreError::persistence)?;
            if updated == 0 {
                return Err(TaskStoreError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, owner: &OwnerId, id: TaskId) -> TaskStoreResult<bool> {
        let owner_key = owner.as_str().to_owned();
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(
                tasks::table
                    .filter(tasks::id.eq(id.into_inner()))
                    .filter(tasks::owner.eq(owner_key)),
            )
            .execute(connection)
            .map_err(TaskStoreError::persistence)?;
            Ok(deleted > 0)
        })
        .await
    }
}

fn to_new_row(task: &Task) -> TaskStoreResult<NewTaskRow> {
    let tags = serde_json::to_value(task.tags()).map_err(TaskStoreError::persistence)?;
    let priority = i32::try_from(task.priority().value()).map_err(TaskStoreError::persistence)?;

    Ok(NewTaskRow {
        id: task.id().into_inner(),
        owner: task.owner().as_str().to_owned(),
        title: task.title().to_owned(),
        description: task.description().to_owned(),
        status: task.status().as_str().to_owned(),
        is_primary: task.is_primary(),
        priority,
        due_date: task.due_date(),
        tags,
        created_at: task.created_at(),
        modified_at: task.modified_at(),
        completed_at: task.completed_at(),
    })
}

fn row_to_task(row: TaskRow) -> TaskStoreResult<Task> {
    let TaskRow {
        id,
        owner: persisted_owner,
        title,
        description,
        status: persisted_status,
        is_primary,
        priority: persisted_priority,
        due_date,
        tags: persisted_tags,
        created_at,
        modified_at,
        completed_at,
    } = row;

    let owner = OwnerId::new(persisted_owner).map_err(TaskStoreError::persistence)?;
    let status =
        TaskStatus::try_from(persisted_status.as_str()).map_err(TaskStoreError::persistence)?;
    let rank = u32::try_from(persisted_priority).map_err(TaskStoreError::persistence)?;
    let priority = Priority::new(rank).map_err(TaskStoreError::persistence)?;
    let tags = serde_json::from_value::<BTreeSet<String>>(persisted_tags)
        .map_err(TaskStoreError::persistence)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        owner,
        title,
        description,
        status,
        is_primary,
        priority,
        due_date,
        tags,
        created_at,
        modified_at,
        completed_at,
    }))
}
