use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::{next_timestamp, sort_for_listing, Todo, TodoError};
use super::TodoRepository;

/// Matches the `VARCHAR(255)` width of the `todo.task_name` column.
const MAX_TASK_NAME_CHARS: usize = 255;

/// Process-local repository with the same ordering and timestamp rules as the
/// Postgres one. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryTodoRepository {
    todos: RwLock<Vec<Todo>>,
}

impl MemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) async fn count(&self) -> usize {
        self.todos.read().await.len()
    }

    async fn update<F>(&self, id: Uuid, apply: F) -> Result<Todo, TodoError>
    where
        F: FnOnce(&mut Todo) + Send,
    {
        let mut todos = self.todos.write().await;
        let todo = todos
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TodoError::NotFound(id))?;
        apply(todo);
        todo.updated_at = next_timestamp(Some(todo.updated_at));
        Ok(todo.clone())
    }
}

fn check_task_name_width(task_name: &str) -> Result<(), TodoError> {
    if task_name.chars().count() > MAX_TASK_NAME_CHARS {
        return Err(TodoError::Database(sqlx::Error::Protocol(format!(
            "value too long for type character varying({})",
            MAX_TASK_NAME_CHARS
        ))));
    }
    Ok(())
}

#[async_trait]
impl TodoRepository for MemoryTodoRepository {
    async fn list_all(&self) -> Result<Vec<Todo>, TodoError> {
        let mut todos = self.todos.read().await.clone();
        sort_for_listing(&mut todos);
        Ok(todos)
    }

    async fn add(&self, task_name: &str) -> Result<Todo, TodoError> {
        check_task_name_width(task_name)?;
        let todo = Todo {
            id: Uuid::new_v4(),
            task_name: task_name.to_string(),
            updated_at: next_timestamp(None),
            completed: false,
        };
        self.todos.write().await.push(todo.clone());
        Ok(todo)
    }

    async fn rename_task(&self, id: Uuid, task_name: &str) -> Result<Todo, TodoError> {
        check_task_name_width(task_name)?;
        let task_name = task_name.to_string();
        self.update(id, move |todo| todo.task_name = task_name).await
    }

    async fn set_completed(&self, id: Uuid, completed: bool) -> Result<Todo, TodoError> {
        self.update(id, move |todo| todo.completed = completed).await
    }

    async fn remove(&self, id: Uuid) -> Result<bool, TodoError> {
        let mut todos = self.todos.write().await;
        let before = todos.len();
        todos.retain(|t| t.id != id);
        Ok(todos.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rename_keeps_completed_flag() {
        let repo = MemoryTodoRepository::new();
        let todo = repo.add("Write report").await.unwrap();
        repo.set_completed(todo.id, true).await.unwrap();

        let renamed = repo.rename_task(todo.id, "Write final report").await.unwrap();
        assert_eq!(renamed.task_name, "Write final report");
        assert!(renamed.completed);
        assert!(renamed.updated_at > todo.updated_at);
    }

    #[tokio::test]
    async fn updates_on_unknown_id_are_not_found() {
        let repo = MemoryTodoRepository::new();
        let id = Uuid::new_v4();
        assert!(matches!(
            repo.set_completed(id, true).await,
            Err(TodoError::NotFound(missing)) if missing == id
        ));
        assert!(matches!(
            repo.rename_task(id, "x").await,
            Err(TodoError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn remove_reports_whether_a_row_existed() {
        let repo = MemoryTodoRepository::new();
        let todo = repo.add("Water plants").await.unwrap();
        assert!(repo.remove(todo.id).await.unwrap());
        assert!(!repo.remove(todo.id).await.unwrap());
        assert_eq!(repo.count().await, 0);
    }

    #[tokio::test]
    async fn task_names_wider_than_the_column_are_rejected() {
        let repo = MemoryTodoRepository::new();
        assert!(matches!(
            repo.add(&"x".repeat(256)).await,
            Err(TodoError::Database(sqlx::Error::Protocol(_)))
        ));
        assert_eq!(repo.count().await, 0);

        // width is counted in characters, not bytes
        let todo = repo.add(&"é".repeat(255)).await.unwrap();
        assert!(matches!(
            repo.rename_task(todo.id, &"y".repeat(300)).await,
            Err(TodoError::Database(_))
        ));
        let listed = repo.list_all().await.unwrap();
        assert_eq!(listed[0].task_name, "é".repeat(255));
    }
}
