pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::{Todo, TodoError};

/// Persistence for todos. Every operation is a single statement inside its
/// own transaction.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// All todos, open ones first, most recently updated first within each group.
    async fn list_all(&self) -> Result<Vec<Todo>, TodoError>;
    async fn add(&self, task_name: &str) -> Result<Todo, TodoError>;
    /// Fails with [`TodoError::NotFound`] when no row has `id`.
    async fn rename_task(&self, id: Uuid, task_name: &str) -> Result<Todo, TodoError>;
    /// Fails with [`TodoError::NotFound`] when no row has `id`.
    async fn set_completed(&self, id: Uuid, completed: bool) -> Result<Todo, TodoError>;
    /// `Ok(false)` when nothing matched.
    async fn remove(&self, id: Uuid) -> Result<bool, TodoError>;
}
