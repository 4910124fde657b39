//! Repository for the `listing_assets` child table.
//!
//! Asset rows are never updated in place: a named slot is replaced by
//! deleting the old row and inserting a new one, gallery rows only ever
//! accumulate or get deleted with their listing.

use sqlx::PgExecutor;

use propstack_core::types::DbId;

use crate::models::listing_asset::{AssetRole, ListingAsset};

/// Column list for `listing_assets` queries.
const COLUMNS: &str = "id, listing_id, role, path";

/// Provides bulk insert, scoped delete, and scoped read for listing assets.
pub struct ListingAssetRepo;

impl ListingAssetRepo {
    /// Bulk-insert asset rows for one listing, returning the created rows
    /// in insertion order. A no-op for an empty slice.
    pub async fn insert_many<'e, E>(
        exec: E,
        listing_id: DbId,
        assets: &[(AssetRole, String)],
    ) -> Result<Vec<ListingAsset>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        if assets.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!(
            "INSERT INTO listing_assets (listing_id, role, path) \
             SELECT $1, role, path FROM UNNEST($2::text[], $3::text[]) AS u(role, path) \
             RETURNING {COLUMNS}"
        );
        let roles: Vec<&str> = assets.iter().map(|(role, _)| role.as_str()).collect();
        let paths: Vec<&str> = assets.iter().map(|(_, path)| path.as_str()).collect();

        sqlx::query_as::<_, ListingAsset>(&query)
            .bind(listing_id)
            .bind(&roles)
            .bind(&paths)
            .fetch_all(exec)
            .await
    }

    /// Delete all asset rows for a listing. Must run before the parent
    /// row's delete within the same transaction.
    pub async fn delete_by_listing<'e, E>(exec: E, listing_id: DbId) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM listing_assets WHERE listing_id = $1")
            .bind(listing_id)
            .execute(exec)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete the current occupant of a named slot, if any. Called right
    /// before inserting the slot's replacement row.
    pub async fn delete_slot<'e, E>(
        exec: E,
        listing_id: DbId,
        role: AssetRole,
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM listing_assets WHERE listing_id = $1 AND role = $2")
            .bind(listing_id)
            .bind(role)
            .execute(exec)
            .await?;
        Ok(result.rows_affected())
    }

    /// All asset rows for a listing, gallery and named slots alike.
    pub async fn find_by_listing<'e, E>(
        exec: E,
        listing_id: DbId,
    ) -> Result<Vec<ListingAsset>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM listing_assets WHERE listing_id = $1 ORDER BY id ASC"
        );
        sqlx::query_as::<_, ListingAsset>(&query)
            .bind(listing_id)
            .fetch_all(exec)
            .await
    }
}
