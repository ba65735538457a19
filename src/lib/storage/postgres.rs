use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::{next_timestamp, Todo, TodoError};
use crate::storage::TodoRepository;

#[derive(Clone)]
pub struct PgTodoRepository {
    pool: PgPool,
}

impl PgTodoRepository {
    /// Wraps `pool` and makes sure the `todo` table exists.
    pub async fn new(pool: PgPool) -> Result<Self, TodoError> {
        migrate(&pool).await?;
        tracing::info!("Todo schema ready");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(r#"CREATE EXTENSION IF NOT EXISTS "uuid-ossp""#)
        .execute(pool)
        .await?;
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS todo (
            id uuid DEFAULT uuid_generate_v4() PRIMARY KEY,
            task_name VARCHAR(255) NOT NULL,
            updated_at TIMESTAMP,
            completed BOOLEAN DEFAULT false
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

// `updated_at` must move forward even if two updates land in the same
// microsecond, hence the GREATEST against the stored value.
const RENAME_SQL: &str = "UPDATE todo
    SET task_name = $1,
        updated_at = GREATEST($2, COALESCE(updated_at, $2) + interval '1 microsecond')
    WHERE id = $3
    RETURNING id, task_name, updated_at, completed";

const SET_COMPLETED_SQL: &str = "UPDATE todo
    SET completed = $1,
        updated_at = GREATEST($2, COALESCE(updated_at, $2) + interval '1 microsecond')
    WHERE id = $3
    RETURNING id, task_name, updated_at, completed";

#[async_trait]
impl TodoRepository for PgTodoRepository {
    async fn list_all(&self) -> Result<Vec<Todo>, TodoError> {
        let mut tx = self.pool.begin().await?;
        let todos = sqlx::query_as::<_, Todo>(
            "SELECT id, task_name, updated_at, completed
             FROM todo
             ORDER BY completed ASC, updated_at DESC",
        )
        .fetch_all(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(todos)
    }

    async fn add(&self, task_name: &str) -> Result<Todo, TodoError> {
        let mut tx = self.pool.begin().await?;
        let todo = sqlx::query_as::<_, Todo>(
            "INSERT INTO todo (task_name, updated_at, completed)
             VALUES ($1, $2, false)
             RETURNING id, task_name, updated_at, completed",
        )
        .bind(task_name)
        .bind(next_timestamp(None))
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        tracing::debug!(id = %todo.id, "Inserted todo");
        Ok(todo)
    }

    async fn rename_task(&self, id: Uuid, task_name: &str) -> Result<Todo, TodoError> {
        let mut tx = self.pool.begin().await?;
        let todo = sqlx::query_as::<_, Todo>(RENAME_SQL)
            .bind(task_name)
            .bind(next_timestamp(None))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(TodoError::NotFound(id))?;
        tx.commit().await?;
        Ok(todo)
    }

    async fn set_completed(&self, id: Uuid, completed: bool) -> Result<Todo, TodoError> {
        let mut tx = self.pool.begin().await?;
        let todo = sqlx::query_as::<_, Todo>(SET_COMPLETED_SQL)
            .bind(completed)
            .bind(next_timestamp(None))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(TodoError::NotFound(id))?;
        tx.commit().await?;
        Ok(todo)
    }

    async fn remove(&self, id: Uuid) -> Result<bool, TodoError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM todo WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
