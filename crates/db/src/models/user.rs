//! User models backing credential verification and token issuance.

use serde::Serialize;
use sqlx::FromRow;

use propstack_core::types::{DbId, Timestamp};

/// A row from the `users` table. The password hash never serializes.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: Timestamp,
}

/// Fields for inserting a user. The hash is already PHC-formatted.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}
