use uuid::Uuid;

use crate::core::{Todo, TodoError};
use crate::storage::TodoRepository;

/// Validation gate in front of a [`TodoRepository`].
#[derive(Clone)]
pub struct TodoService<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    #[cfg(test)]
    pub(crate) fn repository(&self) -> &R {
        &self.repo
    }

    /// Never fails: a storage error is logged and reads as an empty list.
    pub async fn list_todos(&self) -> Vec<Todo> {
        match self.repo.list_all().await {
            Ok(todos) => todos,
            Err(e) => {
                tracing::error!(error = %e, "Failed to list todos");
                Vec::new()
            }
        }
    }

    pub async fn add_todo(&self, task_name: &str) -> Result<Todo, TodoError> {
        validate_task_name(task_name)?;
        self.repo.add(task_name).await
    }

    pub async fn rename_todo(&self, id: &str, task_name: &str) -> Result<Todo, TodoError> {
        let id = validate_id(id)?;
        validate_task_name(task_name)?;
        self.repo.rename_task(id, task_name).await
    }

    pub async fn set_completed(&self, id: &str, completed: bool) -> Result<Todo, TodoError> {
        let id = validate_id(id)?;
        self.repo.set_completed(id, completed).await
    }

    pub async fn delete_todo(&self, id: &str) -> Result<bool, TodoError> {
        let id = validate_id(id)?;
        self.repo.remove(id).await
    }
}

pub fn validate_task_name(task_name: &str) -> Result<(), TodoError> {
    if task_name.is_empty() {
        return Err(TodoError::InvalidTaskName);
    }
    Ok(())
}

/// Empty or non-UUID ids can never match a row, so both are rejected here.
pub fn validate_id(id: &str) -> Result<Uuid, TodoError> {
    if id.is_empty() {
        return Err(TodoError::InvalidId);
    }
    Uuid::parse_str(id).map_err(|_| TodoError::InvalidId)
}
