//! Route definitions for the `/listings` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::listings;
use crate::state::AppState;

/// Routes mounted at `/listings`.
///
/// ```text
/// GET    /       -> list_listings (public)
/// POST   /       -> create_listing (multipart, requires auth)
/// GET    /{id}   -> get_listing (public)
/// PUT    /{id}   -> update_listing (multipart, requires auth)
/// DELETE /{id}   -> delete_listing (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(listings::list_listings).post(listings::create_listing),
        )
        .route(
            "/{id}",
            get(listings::get_listing)
                .put(listings::update_listing)
                .delete(listings::delete_listing),
        )
}
