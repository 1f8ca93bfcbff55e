//! Request authentication and per-route capability gates.
//!
//! [`authenticate`] runs on every request and, when the bearer token verifies,
//! stores the caller's [`Identity`] in the request extensions.  It never
//! rejects a request.  The `require_*` middlewares are attached per route and
//! are the only place a request is turned away as unauthorized.

use std::collections::HashMap;

use axum::{
    extract::{Path, Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use auth::{Capability, Identity};

use crate::{ApiError, AppState};

/// Attach the caller's identity when a valid bearer token is presented.
pub async fn authenticate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let identity = state.auth.authenticate(authorization);

    if let Some(identity) = identity {
        debug!(username = %identity.username, is_admin = identity.is_admin, "request authenticated");
        req.extensions_mut().insert(identity);
    }

    next.run(req).await
}

fn gate(capability: Capability<'_>, req: &Request) -> Result<(), ApiError> {
    capability.check(req.extensions().get::<Identity>()).map_err(|err| {
        debug!(?capability, "capability check failed");
        ApiError::from(err)
    })
}

/// Any verified caller.
pub async fn require_logged_in(req: Request, next: Next) -> Result<Response, ApiError> {
    gate(Capability::LoggedIn, &req)?;
    Ok(next.run(req).await)
}

/// Admins only.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    gate(Capability::Admin, &req)?;
    Ok(next.run(req).await)
}

/// The user named by the route's `:username` segment, or an admin.
pub async fn require_same_user_or_admin(
    Path(params): Path<HashMap<String, String>>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let username = params.get("username").map(String::as_str).unwrap_or_default();
    gate(Capability::SameUserOrAdmin(username), &req)?;
    Ok(next.run(req).await)
}
