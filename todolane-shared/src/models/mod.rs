/// Database models for Todolane
///
/// This module contains all database models and their CRUD operations.
/// Every query that touches todos is scoped by the owning user id and the
/// soft-delete flag in a single WHERE clause, so cross-user access is not
/// expressible at this layer.
///
/// # Models
///
/// - `user`: User accounts
/// - `todo`: Todo items with soft-delete semantics
/// - `stats`: Aggregate statistics over a user's todos
///
/// # Example
///
/// ```no_run
/// use todolane_shared::models::user::{User, CreateUser};
/// use todolane_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let new_user = CreateUser {
///     name: "John Doe".to_string(),
///     email: "user@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod stats;
pub mod todo;
pub mod user;
