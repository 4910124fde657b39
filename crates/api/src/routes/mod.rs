pub mod auth;
pub mod health;
pub mod listings;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup                 signup (public)
/// /auth/login                  login (public)
///
/// /listings                    list (public), create (multipart, auth)
/// /listings/{id}               get (public), update (multipart, auth),
///                              delete (auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes (signup, login).
        .nest("/auth", auth::router())
        // Listing CRUD with coupled asset uploads.
        .nest("/listings", listings::router())
}
