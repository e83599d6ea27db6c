/// Application state and router builder
///
/// This module defines the shared application state, the authenticated-user
/// context, and the function that assembles the Axum router with all routes
/// and middleware.
///
/// # Example
///
/// ```no_run
/// use todolane_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = todolane_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use crate::error::ApiError;
use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use todolane_shared::auth::jwt;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use uuid::Uuid;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. The pool
/// and config are the only shared resources; no other state survives a
/// request.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets the token-signing secret
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// The authenticated caller, as proven by a valid session token
///
/// Inserted into request extensions by [`auth_gate`]; handlers receive it
/// via `Extension<AuthUser>` instead of re-parsing headers.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// User id from the token's subject claim
    pub id: Uuid,

    /// Email from the token's email claim
    pub email: String,
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /api
/// ├── GET  /healthcheck         # liveness + store reachability (public)
/// ├── /auth/                    # public
/// │   ├── POST /signup
/// │   └── POST /login
/// └── /todos/                   # behind the auth gate
///     ├── GET    /
///     ├── POST   /
///     ├── GET    /stats
///     ├── PUT    /:id
///     └── DELETE /:id
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Request tracing (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Authentication gate (todo routes only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Auth routes (public, no auth required)
    let auth_routes = Router::new()
        .route("/signup", post(routes::auth::signup))
        .route("/login", post(routes::auth::login));

    // Todo routes (require a valid session token)
    let todo_routes = Router::new()
        .route("/", get(routes::todos::list_todos).post(routes::todos::create_todo))
        .route("/stats", get(routes::todos::todo_stats))
        .route(
            "/:id",
            put(routes::todos::update_todo).delete(routes::todos::delete_todo),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_gate,
        ));

    let api_routes = Router::new()
        .route("/healthcheck", get(routes::health::healthcheck))
        .nest("/auth", auth_routes)
        .nest("/todos", todo_routes);

    Router::new()
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Authentication middleware
///
/// Extracts and validates the bearer session token from the Authorization
/// header, then injects [`AuthUser`] into request extensions. On failure the
/// wrapped handler never runs.
///
/// An absent credential is a 401; a credential that is present but not a
/// bearer token, badly signed, malformed, or expired is a 403.
async fn auth_gate(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Forbidden("Expected Bearer token".to_string()))?;

    let claims = jwt::validate_token(token, state.jwt_secret())?;

    req.extensions_mut().insert(AuthUser {
        id: claims.sub,
        email: claims.email,
    });

    Ok(next.run(req).await)
}
