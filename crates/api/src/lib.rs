//! `api` crate: HTTP REST API layer.
//!
//! Exposes:
//!   POST   /auth/token                  public
//!   POST   /auth/register               public
//!   GET    /me                          logged in
//!   GET    /companies, /companies/:h    public
//!   POST   /companies                   admin
//!   PATCH  /companies/:handle           admin
//!   DELETE /companies/:handle           admin
//!   GET    /jobs, /jobs/:id             public
//!   POST   /jobs                        admin
//!   PATCH  /jobs/:id                    admin
//!   DELETE /jobs/:id                    admin
//!   GET    /users                       admin
//!   POST   /users                       admin
//!   GET    /users/:username             same user or admin
//!   PATCH  /users/:username             same user or admin
//!   DELETE /users/:username             same user or admin
//!   POST   /users/:username/jobs/:id    same user or admin

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, patch, post, MethodRouter},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::info;

use auth::TokenAuthenticator;
use db::DbPool;

pub use config::ApiConfig;
pub use error::ApiError;

use handlers::{auth as auth_routes, companies, jobs, users};
use middleware::{authenticate, require_admin, require_logged_in, require_same_user_or_admin};

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub auth: Arc<TokenAuthenticator>,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(pool: DbPool, config: ApiConfig) -> Self {
        Self {
            pool,
            auth: Arc::new(config.authenticator()),
            config: Arc::new(config),
        }
    }
}

fn logged_in(route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route.route_layer(from_fn(require_logged_in))
}

fn admin(route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route.route_layer(from_fn(require_admin))
}

fn same_user_or_admin(route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route.route_layer(from_fn(require_same_user_or_admin))
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/auth/token", post(auth_routes::token))
        .route("/auth/register", post(auth_routes::register))
        .route("/me", logged_in(get(users::me)))
        .route("/companies", get(companies::list).merge(admin(post(companies::create))))
        .route(
            "/companies/:handle",
            get(companies::get).merge(admin(patch(companies::update).delete(companies::remove))),
        )
        .route("/jobs", get(jobs::list).merge(admin(post(jobs::create))))
        .route(
            "/jobs/:id",
            get(jobs::get).merge(admin(patch(jobs::update).delete(jobs::remove))),
        )
        .route("/users", admin(get(users::list).post(users::create)))
        .route(
            "/users/:username",
            same_user_or_admin(get(users::get).patch(users::update).delete(users::remove)),
        )
        .route("/users/:username/jobs/:id", same_user_or_admin(post(users::apply)))
        .fallback(not_found)
        .layer(from_fn_with_state(state.clone(), authenticate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Not Found".to_string())
}

/// Bind `bind` and serve the API until the process is stopped.
pub async fn serve(bind: &str, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("API listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state)).await
}
