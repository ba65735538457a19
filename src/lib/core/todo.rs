use chrono::{Duration, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Todo {
    pub id: Uuid,
    pub task_name: String,
    pub updated_at: NaiveDateTime,
    pub completed: bool,
}

/// Timestamp for a mutation of a row last stamped at `previous`.
///
/// Never returns a value at or before `previous`, so successive mutations of
/// one row keep a strictly increasing `updated_at` even inside a single clock
/// tick.
pub fn next_timestamp(previous: Option<NaiveDateTime>) -> NaiveDateTime {
    // Postgres TIMESTAMP keeps microseconds; truncate so the in-memory and
    // stored values compare the same way.
    let now = truncate_micros(Utc::now().naive_utc());
    match previous {
        Some(prev) if now <= prev => prev + Duration::microseconds(1),
        _ => now,
    }
}

fn truncate_micros(ts: NaiveDateTime) -> NaiveDateTime {
    ts.with_nanosecond(ts.nanosecond() / 1_000 * 1_000).unwrap_or(ts)
}

/// Listing order: open items first, then newest change first.
pub fn sort_for_listing(todos: &mut [Todo]) {
    todos.sort_by(|a, b| {
        a.completed
            .cmp(&b.completed)
            .then_with(|| b.updated_at.cmp(&a.updated_at))
    });
}

/// Template-facing shape of a [`Todo`].
#[derive(Debug, Clone, Serialize)]
pub struct TodoView {
    pub id: String,
    pub task_name: String,
    pub updated_at: String,
    pub completed: bool,
}

impl From<&Todo> for TodoView {
    fn from(todo: &Todo) -> Self {
        Self {
            id: todo.id.to_string(),
            task_name: todo.task_name.clone(),
            updated_at: todo.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            completed: todo.completed,
        }
    }
}
