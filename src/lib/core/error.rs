use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum TodoError {
    #[error("invalid task name")]
    InvalidTaskName,
    #[error("invalid id")]
    InvalidId,
    #[error("Todo {0} not found")]
    NotFound(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Render error: {0}")]
    Render(#[from] tera::Error),
}

impl TodoError {
    pub fn is_validation(&self) -> bool {
        matches!(self, TodoError::InvalidTaskName | TodoError::InvalidId)
    }
}

// Clients only ever see a bare 500; the detail goes to the log.
impl IntoResponse for TodoError {
    fn into_response(self) -> Response {
        if self.is_validation() {
            tracing::warn!(error = %self, "Rejected todo request");
        } else {
            tracing::error!(error = %self, "Todo request failed");
        }
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let reason = status.canonical_reason().unwrap_or_default();
        (status, reason).into_response()
    }
}
