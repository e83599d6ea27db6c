/// Todo model and database operations
///
/// Todos are the core entity of Todolane. A todo always belongs to exactly
/// one user; ownership never changes after creation. "Deleting" a todo sets
/// `deleted_at`, and every read, update, and delete filters on
/// `deleted_at IS NULL` together with the owner in the same WHERE clause, so
/// soft-deleted and foreign rows are indistinguishable from nonexistent ones.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE todo_priority AS ENUM ('HIGH', 'MEDIUM', 'LOW');
///
/// CREATE TABLE todos (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     seq BIGSERIAL,
///     title VARCHAR(50) NOT NULL,
///     memo VARCHAR(200) NOT NULL DEFAULT '',
///     priority todo_priority NOT NULL,
///     is_completed BOOLEAN NOT NULL DEFAULT FALSE,
///     deadline TIMESTAMP NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     deleted_at TIMESTAMPTZ
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use todolane_shared::models::todo::{Todo, CreateTodo, Priority};
/// use todolane_shared::db::pool::{create_pool, DatabaseConfig};
/// use chrono::NaiveDate;
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let owner = Uuid::new_v4();
///
/// let todo = Todo::create(&pool, owner, CreateTodo {
///     title: "Buy milk".to_string(),
///     memo: String::new(),
///     priority: Priority::Low,
///     deadline: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap().and_hms_opt(9, 0, 0).unwrap(),
/// }).await?;
///
/// let todos = Todo::list_active(&pool, owner).await?;
/// assert_eq!(todos[0].id, todo.id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::str::FromStr;
use uuid::Uuid;

/// Todo priority level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "todo_priority", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Converts priority to its wire/database string
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
        }
    }
}

impl FromStr for Priority {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HIGH" => Ok(Priority::High),
            "MEDIUM" => Ok(Priority::Medium),
            "LOW" => Ok(Priority::Low),
            _ => Err(()),
        }
    }
}

/// Todo model representing a single task row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Todo {
    /// Unique todo ID (UUID v4)
    pub id: Uuid,

    /// Owning user; immutable after creation
    pub user_id: Uuid,

    /// Store-assigned insertion counter; tie-break for equal `created_at`
    pub seq: i64,

    /// Title (1-50 chars, enforced at the API boundary)
    pub title: String,

    /// Free-form memo (0-200 chars, empty allowed)
    pub memo: String,

    /// Priority level
    pub priority: Priority,

    /// Completion flag
    pub is_completed: bool,

    /// Deadline as a local naive timestamp, as entered by the user
    pub deadline: NaiveDateTime,

    /// When the row was created (set once by the store)
    pub created_at: DateTime<Utc>,

    /// Soft-delete marker; the row is active iff this is None
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Input for creating a new todo
#[derive(Debug, Clone)]
pub struct CreateTodo {
    /// Title (1-50 chars)
    pub title: String,

    /// Memo (may be empty)
    pub memo: String,

    /// Priority level
    pub priority: Priority,

    /// Deadline (local naive timestamp)
    pub deadline: NaiveDateTime,
}

/// Input for updating a todo
///
/// Updates are atomic full replacements: every mutable field is supplied and
/// written in one statement. There is no partial merge.
#[derive(Debug, Clone)]
pub struct UpdateTodo {
    /// New title
    pub title: String,

    /// New memo
    pub memo: String,

    /// New priority
    pub priority: Priority,

    /// New deadline
    pub deadline: NaiveDateTime,

    /// New completion flag
    pub is_completed: bool,
}

const TODO_COLUMNS: &str =
    "id, user_id, seq, title, memo, priority, is_completed, deadline, created_at, deleted_at";

impl Todo {
    /// Lists the owner's active todos, newest first
    ///
    /// Ordered by creation time descending; rows created in the same
    /// timestamp tick fall back to insertion order via `seq`.
    pub async fn list_active(pool: &PgPool, owner: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let todos = sqlx::query_as::<_, Todo>(&format!(
            r#"
            SELECT {TODO_COLUMNS}
            FROM todos
            WHERE user_id = $1 AND deleted_at IS NULL
            ORDER BY created_at DESC, seq DESC
            "#
        ))
        .bind(owner)
        .fetch_all(pool)
        .await?;

        Ok(todos)
    }

    /// Creates a new todo owned by `owner`
    ///
    /// The store assigns id, seq, and created_at; the full stored row is
    /// returned.
    pub async fn create(
        pool: &PgPool,
        owner: Uuid,
        data: CreateTodo,
    ) -> Result<Self, sqlx::Error> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            r#"
            INSERT INTO todos (user_id, title, memo, priority, deadline)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {TODO_COLUMNS}
            "#
        ))
        .bind(owner)
        .bind(data.title)
        .bind(data.memo)
        .bind(data.priority)
        .bind(data.deadline)
        .fetch_one(pool)
        .await?;

        Ok(todo)
    }

    /// Replaces all mutable fields of an active todo owned by `owner`
    ///
    /// Returns `None` when no active todo with that id belongs to the owner;
    /// soft-deleted and foreign rows look identical to missing ones.
    pub async fn update(
        pool: &PgPool,
        owner: Uuid,
        id: Uuid,
        data: UpdateTodo,
    ) -> Result<Option<Self>, sqlx::Error> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            r#"
            UPDATE todos
            SET title = $3, memo = $4, priority = $5, deadline = $6, is_completed = $7
            WHERE id = $2 AND user_id = $1 AND deleted_at IS NULL
            RETURNING {TODO_COLUMNS}
            "#
        ))
        .bind(owner)
        .bind(id)
        .bind(data.title)
        .bind(data.memo)
        .bind(data.priority)
        .bind(data.deadline)
        .bind(data.is_completed)
        .fetch_optional(pool)
        .await?;

        Ok(todo)
    }

    /// Soft-deletes an active todo owned by `owner`
    ///
    /// Sets `deleted_at` to the current time and returns the id. Returns
    /// `None` under the same condition as [`Todo::update`]; deleting an
    /// already-deleted todo is therefore a `None` the second time.
    pub async fn soft_delete(
        pool: &PgPool,
        owner: Uuid,
        id: Uuid,
    ) -> Result<Option<Uuid>, sqlx::Error> {
        let deleted: Option<(Uuid,)> = sqlx::query_as(
            r#"
            UPDATE todos
            SET deleted_at = NOW()
            WHERE id = $2 AND user_id = $1 AND deleted_at IS NULL
            RETURNING id
            "#,
        )
        .bind(owner)
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(deleted.map(|(id,)| id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_as_str() {
        assert_eq!(Priority::High.as_str(), "HIGH");
        assert_eq!(Priority::Medium.as_str(), "MEDIUM");
        assert_eq!(Priority::Low.as_str(), "LOW");
    }

    #[test]
    fn test_priority_from_str() {
        assert_eq!("HIGH".parse::<Priority>(), Ok(Priority::High));
        assert_eq!("MEDIUM".parse::<Priority>(), Ok(Priority::Medium));
        assert_eq!("LOW".parse::<Priority>(), Ok(Priority::Low));
        assert!("high".parse::<Priority>().is_err());
        assert!("URGENT".parse::<Priority>().is_err());
        assert!("".parse::<Priority>().is_err());
    }

    #[test]
    fn test_priority_serde_roundtrip() {
        let json = serde_json::to_string(&Priority::Medium).unwrap();
        assert_eq!(json, "\"MEDIUM\"");

        let parsed: Priority = serde_json::from_str("\"LOW\"").unwrap();
        assert_eq!(parsed, Priority::Low);
    }
}
