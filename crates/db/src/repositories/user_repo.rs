//! Repository for the `users` table.

use sqlx::PgExecutor;

use crate::models::user::{CreateUser, User};

/// Column list for `users` queries.
const COLUMNS: &str = "id, name, email, password_hash, created_at";

/// Provides the credential-lookup and signup operations.
pub struct UserRepo;

impl UserRepo {
    /// Find a user by email (the login identifier).
    pub async fn find_by_email<'e, E>(exec: E, email: &str) -> Result<Option<User>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(exec)
            .await
    }

    /// Insert a new user. Duplicate emails surface as a unique-constraint
    /// database error (`uq_users_email`).
    pub async fn insert<'e, E>(exec: E, input: &CreateUser) -> Result<User, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO users (name, email, password_hash) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .fetch_one(exec)
            .await
    }
}
