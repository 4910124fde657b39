//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Use [`DataResponse`]
//! instead of ad-hoc `serde_json::json!({ "data": ... })` to get
//! compile-time type safety and consistent serialization.

use serde::Serialize;

use propstack_core::types::DbId;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Payload for successful create/update responses: the listing id.
#[derive(Debug, Serialize)]
pub struct ListingIdPayload {
    pub id: DbId,
}

/// Payload reporting a delete outcome. `deleted` is false when nothing
/// existed to delete -- a valid terminal outcome, not an error.
#[derive(Debug, Serialize)]
pub struct DeleteOutcome {
    pub deleted: bool,
    pub assets_removed: u64,
}
