/// Todo CRUD and statistics endpoints
///
/// All endpoints here sit behind the auth gate; handlers receive the caller
/// as an [`AuthUser`] extension and every repository call is scoped by that
/// user's id.
///
/// # Endpoints
///
/// - `GET    /api/todos` - List active todos, newest first
/// - `POST   /api/todos` - Create a todo
/// - `PUT    /api/todos/:id` - Replace a todo's mutable fields
/// - `DELETE /api/todos/:id` - Soft-delete a todo
/// - `GET    /api/todos/stats` - Completion ratio + 7-day histogram
///
/// Timestamps are rendered server-local as `YYYY-MM-DD HH:MM:SS`; deadlines
/// are accepted as ISO-local datetimes (`YYYY-MM-DDTHH:MM`, seconds
/// optional).

use crate::{
    app::{AppState, AuthUser},
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use todolane_shared::models::{
    stats,
    todo::{CreateTodo, Priority, Todo, UpdateTodo},
};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Create todo request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTodoRequest {
    /// Title (1-50 chars)
    #[validate(length(min = 1, max = 50, message = "Title must be 1-50 characters"))]
    pub title: String,

    /// Memo (0-200 chars, may be omitted or empty)
    #[validate(length(max = 200, message = "Memo must be at most 200 characters"))]
    pub memo: Option<String>,

    /// Priority: HIGH, MEDIUM, or LOW
    #[validate(custom(function = validate_priority))]
    pub priority: String,

    /// Deadline as an ISO-local datetime string
    #[validate(length(min = 1, message = "Deadline is required"))]
    pub deadline: String,
}

/// Update todo request
///
/// Updates are full replacements: every mutable field, including the
/// completion flag, is required and written in one statement.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTodoRequest {
    /// New title (1-50 chars)
    #[validate(length(min = 1, max = 50, message = "Title must be 1-50 characters"))]
    pub title: String,

    /// New memo (0-200 chars, may be omitted or empty)
    #[validate(length(max = 200, message = "Memo must be at most 200 characters"))]
    pub memo: Option<String>,

    /// New priority: HIGH, MEDIUM, or LOW
    #[validate(custom(function = validate_priority))]
    pub priority: String,

    /// New deadline as an ISO-local datetime string
    #[validate(length(min = 1, message = "Deadline is required"))]
    pub deadline: String,

    /// New completion flag
    pub is_completed: bool,
}

/// Todo as rendered on read paths
#[derive(Debug, Serialize)]
pub struct TodoResponse {
    /// Todo id
    pub id: Uuid,

    /// Title
    pub title: String,

    /// Memo (empty string when unset)
    pub memo: String,

    /// Priority
    pub priority: Priority,

    /// Completion flag
    pub is_completed: bool,

    /// Deadline, `YYYY-MM-DD HH:MM:SS`
    pub deadline: String,

    /// Creation time, server-local `YYYY-MM-DD HH:MM:SS`
    pub created_at: String,
}

impl From<Todo> for TodoResponse {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id,
            title: todo.title,
            memo: todo.memo,
            priority: todo.priority,
            is_completed: todo.is_completed,
            deadline: todo.deadline.format("%Y-%m-%d %H:%M:%S").to_string(),
            created_at: todo
                .created_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
        }
    }
}

/// Delete response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Confirmation message
    pub message: String,

    /// Id of the deleted todo
    pub id: Uuid,
}

/// One histogram entry on the wire
#[derive(Debug, Serialize)]
pub struct DailyEntry {
    /// Calendar day, `YYYY-MM-DD`
    pub date: String,

    /// Completed todos with a deadline on that day
    pub count: i64,
}

/// Statistics response
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    /// Completed/active split of the caller's todos
    pub ratio: stats::CompletionRatio,

    /// Trailing 7-day completion histogram, oldest day first
    pub daily: Vec<DailyEntry>,
}

fn validate_priority(value: &str) -> Result<(), ValidationError> {
    if value.parse::<Priority>().is_err() {
        let mut err = ValidationError::new("priority");
        err.message = Some("Priority must be HIGH, MEDIUM, or LOW".into());
        return Err(err);
    }
    Ok(())
}

/// Parses an ISO-local deadline string, with or without seconds
fn parse_deadline(value: &str) -> Result<NaiveDateTime, ApiError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .map_err(|_| {
            ApiError::ValidationError(vec![ValidationErrorDetail {
                field: "deadline".to_string(),
                message: "Deadline must be an ISO datetime (YYYY-MM-DDTHH:MM)".to_string(),
            }])
        })
}

impl CreateTodoRequest {
    /// Converts the validated request into repository fields
    fn into_fields(self) -> Result<CreateTodo, ApiError> {
        // validate() has already confirmed the priority string
        let priority = self
            .priority
            .parse::<Priority>()
            .map_err(|_| ApiError::BadRequest("Invalid priority".to_string()))?;
        let deadline = parse_deadline(&self.deadline)?;

        Ok(CreateTodo {
            title: self.title,
            memo: self.memo.unwrap_or_default(),
            priority,
            deadline,
        })
    }
}

impl UpdateTodoRequest {
    /// Converts the validated request into repository fields
    fn into_fields(self) -> Result<UpdateTodo, ApiError> {
        let priority = self
            .priority
            .parse::<Priority>()
            .map_err(|_| ApiError::BadRequest("Invalid priority".to_string()))?;
        let deadline = parse_deadline(&self.deadline)?;

        Ok(UpdateTodo {
            title: self.title,
            memo: self.memo.unwrap_or_default(),
            priority,
            deadline,
            is_completed: self.is_completed,
        })
    }
}

/// Lists the caller's active todos, newest first
pub async fn list_todos(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Json<Vec<TodoResponse>>> {
    let todos = Todo::list_active(&state.db, auth.id).await?;

    Ok(Json(todos.into_iter().map(TodoResponse::from).collect()))
}

/// Creates a todo owned by the caller
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
pub async fn create_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateTodoRequest>,
) -> ApiResult<(StatusCode, Json<TodoResponse>)> {
    req.validate()?;

    let todo = Todo::create(&state.db, auth.id, req.into_fields()?).await?;

    Ok((StatusCode::CREATED, Json(TodoResponse::from(todo))))
}

/// Replaces all mutable fields of one of the caller's todos
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `404 Not Found`: No active todo with that id belongs to the caller
pub async fn update_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTodoRequest>,
) -> ApiResult<Json<TodoResponse>> {
    req.validate()?;

    let todo = Todo::update(&state.db, auth.id, id, req.into_fields()?)
        .await?
        .ok_or_else(|| ApiError::NotFound("Todo not found".to_string()))?;

    Ok(Json(TodoResponse::from(todo)))
}

/// Soft-deletes one of the caller's todos
///
/// The row stays in the store with `deleted_at` set; it simply never shows
/// up in reads again. Deleting twice yields a 404 the second time.
///
/// # Errors
///
/// - `404 Not Found`: No active todo with that id belongs to the caller
pub async fn delete_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    let deleted_id = Todo::soft_delete(&state.db, auth.id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Todo not found".to_string()))?;

    Ok(Json(DeleteResponse {
        message: "Todo deleted".to_string(),
        id: deleted_id,
    }))
}

/// Returns the caller's completion ratio and 7-day histogram
pub async fn todo_stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Json<StatsResponse>> {
    let ratio = stats::completion_ratio(&state.db, auth.id).await?;
    let daily = stats::daily_completions(&state.db, auth.id).await?;

    Ok(Json(StatsResponse {
        ratio,
        daily: daily
            .into_iter()
            .map(|d| DailyEntry {
                date: d.date.format("%Y-%m-%d").to_string(),
                count: d.count,
            })
            .collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn valid_create() -> CreateTodoRequest {
        CreateTodoRequest {
            title: "Buy milk".to_string(),
            memo: None,
            priority: "LOW".to_string(),
            deadline: "2025-01-10T09:00".to_string(),
        }
    }

    #[test]
    fn test_create_request_valid() {
        assert!(valid_create().validate().is_ok());
    }

    #[test]
    fn test_create_request_title_bounds() {
        let mut req = valid_create();
        req.title = String::new();
        assert!(req.validate().is_err());

        let mut req = valid_create();
        req.title = "x".repeat(50);
        assert!(req.validate().is_ok());

        let mut req = valid_create();
        req.title = "x".repeat(51);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_request_memo_bounds() {
        let mut req = valid_create();
        req.memo = Some(String::new());
        assert!(req.validate().is_ok(), "empty memo is allowed");

        let mut req = valid_create();
        req.memo = Some("x".repeat(200));
        assert!(req.validate().is_ok());

        let mut req = valid_create();
        req.memo = Some("x".repeat(201));
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_request_priority() {
        for p in ["HIGH", "MEDIUM", "LOW"] {
            let mut req = valid_create();
            req.priority = p.to_string();
            assert!(req.validate().is_ok(), "{p} should be accepted");
        }

        let mut req = valid_create();
        req.priority = "URGENT".to_string();
        assert!(req.validate().is_err());

        let mut req = valid_create();
        req.priority = "low".to_string();
        assert!(req.validate().is_err(), "priority is case-sensitive");
    }

    #[test]
    fn test_create_request_empty_deadline() {
        let mut req = valid_create();
        req.deadline = String::new();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_parse_deadline_formats() {
        assert!(parse_deadline("2025-01-10T09:00").is_ok());
        assert!(parse_deadline("2025-01-10T09:00:30").is_ok());
        assert!(parse_deadline("2025-01-10 09:00").is_err());
        assert!(parse_deadline("next tuesday").is_err());
    }

    #[test]
    fn test_into_fields_defaults_memo_to_empty() {
        let fields = valid_create().into_fields().unwrap();
        assert_eq!(fields.memo, "");
        assert_eq!(fields.priority, Priority::Low);
        assert_eq!(
            fields.deadline,
            NaiveDateTime::parse_from_str("2025-01-10T09:00", "%Y-%m-%dT%H:%M").unwrap()
        );
    }

    #[test]
    fn test_todo_response_formats_timestamps() {
        let created_at: DateTime<Utc> = Utc.with_ymd_and_hms(2025, 1, 8, 3, 30, 0).unwrap();
        let todo = Todo {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            seq: 1,
            title: "Buy milk".to_string(),
            memo: String::new(),
            priority: Priority::Low,
            is_completed: false,
            deadline: NaiveDateTime::parse_from_str("2025-01-10T09:00", "%Y-%m-%dT%H:%M")
                .unwrap(),
            created_at,
            deleted_at: None,
        };

        let resp = TodoResponse::from(todo);
        assert_eq!(resp.deadline, "2025-01-10 09:00:00");
        assert_eq!(
            resp.created_at,
            created_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        );
    }

    #[test]
    fn test_update_request_requires_all_fields() {
        // Missing is_completed must fail deserialization: updates are full
        // replacements, not partial merges.
        let partial = serde_json::json!({
            "title": "Buy milk",
            "priority": "LOW",
            "deadline": "2025-01-10T09:00"
        });
        assert!(serde_json::from_value::<UpdateTodoRequest>(partial).is_err());

        let full = serde_json::json!({
            "title": "Buy milk",
            "memo": "",
            "priority": "LOW",
            "deadline": "2025-01-10T09:00",
            "is_completed": true
        });
        let req = serde_json::from_value::<UpdateTodoRequest>(full).unwrap();
        assert!(req.validate().is_ok());
        assert!(req.is_completed);
    }
}
