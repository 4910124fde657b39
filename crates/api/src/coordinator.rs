//! Listing Transaction Coordinator.
//!
//! Runs every listing mutation as one atomic unit: stage uploaded files,
//! open a transaction, perform the relational writes through the
//! repositories, then commit -- or roll back and compensate by discarding
//! the files staged for this request.
//!
//! Ordering rules enforced here:
//! - staging failures abort before any transaction is opened;
//! - child asset rows are deleted before their parent listing row;
//! - a rollback always precedes the compensating file cleanup, so the
//!   relational store is settled before the non-atomic part begins.
//!
//! The pooled connection backing the transaction is returned on every exit
//! path: `sqlx::Transaction` rolls back on drop, so even an early `?`
//! cannot leak a connection or leave a transaction half-open.

use sqlx::{Postgres, Transaction};

use propstack_core::error::CoreError;
use propstack_core::types::DbId;
use propstack_db::models::listing::{CreateListing, UpdateListing};
use propstack_db::repositories::{ListingAssetRepo, ListingRepo};
use propstack_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::response::DeleteOutcome;
use crate::stager::{AssetStager, StagedUploads, UploadSet};

/// Coordinates relational writes and asset bookkeeping for one request.
pub struct ListingCoordinator<'a> {
    pool: &'a DbPool,
    stager: &'a AssetStager,
}

impl<'a> ListingCoordinator<'a> {
    pub fn new(pool: &'a DbPool, stager: &'a AssetStager) -> Self {
        Self { pool, stager }
    }

    /// Create a listing plus one asset row per staged file.
    ///
    /// A request with zero uploads is valid and yields an empty asset set.
    pub async fn create(&self, input: &CreateListing, uploads: &UploadSet) -> AppResult<DbId> {
        let staged = self.stage(uploads).await?;

        let mut tx = self.pool.begin().await?;
        let result = create_in_tx(&mut tx, input, &staged).await;
        self.settle(tx, &staged, result).await
    }

    /// Apply a sparse update; replace named slots and append gallery rows
    /// for newly staged files. Fields and slots absent from the request
    /// stay untouched.
    pub async fn update(
        &self,
        id: DbId,
        input: &UpdateListing,
        uploads: &UploadSet,
    ) -> AppResult<DbId> {
        let staged = self.stage(uploads).await?;

        let mut tx = self.pool.begin().await?;
        let result = update_in_tx(&mut tx, id, input, &staged).await;
        self.settle(tx, &staged, result).await
    }

    /// Delete a listing's asset rows, then the listing, in that fixed
    /// order. A nonexistent id is a valid terminal outcome, not an error.
    ///
    /// After the transaction commits, the files the deleted rows pointed
    /// at are removed best-effort.
    pub async fn delete(&self, id: DbId) -> AppResult<DeleteOutcome> {
        let mut tx = self.pool.begin().await?;
        let result = delete_in_tx(&mut tx, id).await;

        let (assets_removed, listings_removed, paths) =
            self.settle(tx, &StagedUploads::default(), result).await?;

        for path in &paths {
            self.stager.remove_by_public_path(path).await;
        }

        Ok(DeleteOutcome {
            deleted: listings_removed > 0,
            assets_removed,
        })
    }

    /// Step 2: stage every uploaded file before opening a transaction.
    ///
    /// On failure nothing relational has happened; files staged before the
    /// failing one are left for manual cleanup and logged.
    async fn stage(&self, uploads: &UploadSet) -> AppResult<StagedUploads> {
        match self.stager.stage_all(uploads).await {
            Ok(staged) => Ok(staged),
            Err(err) => {
                for file in err.staged.all_files() {
                    tracing::warn!(
                        path = %file.disk_path.display(),
                        "Staging aborted; file left for manual cleanup"
                    );
                }
                Err(AppError::Core(err.error))
            }
        }
    }

    /// Steps 5-6: commit on success; on any failure roll back the whole
    /// transactional scope and discard the files staged for this request.
    ///
    /// The compensating delete is best-effort and never changes the
    /// reported outcome.
    async fn settle<T>(
        &self,
        tx: Transaction<'_, Postgres>,
        staged: &StagedUploads,
        result: AppResult<T>,
    ) -> AppResult<T> {
        match result {
            Ok(value) => match tx.commit().await {
                Ok(()) => Ok(value),
                Err(e) => {
                    self.stager.discard(staged.all_files()).await;
                    Err(e.into())
                }
            },
            Err(e) => {
                if let Err(rb) = tx.rollback().await {
                    tracing::error!(error = %rb, "Rollback failed");
                }
                self.stager.discard(staged.all_files()).await;
                Err(e)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Relational mutation (step 4), always inside the caller's transaction
// ---------------------------------------------------------------------------

async fn create_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    input: &CreateListing,
    staged: &StagedUploads,
) -> AppResult<DbId> {
    let listing = ListingRepo::insert(&mut **tx, input).await?;

    let mut rows = staged.gallery_rows();
    rows.extend(
        staged
            .slots
            .iter()
            .map(|(role, file)| (*role, file.public_path.clone())),
    );
    ListingAssetRepo::insert_many(&mut **tx, listing.id, &rows).await?;

    Ok(listing.id)
}

async fn update_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    id: DbId,
    input: &UpdateListing,
    staged: &StagedUploads,
) -> AppResult<DbId> {
    let affected = ListingRepo::update(&mut **tx, id, input).await?;
    if affected == 0 {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Listing",
            id,
        }));
    }

    // Named slots: supersede the old row, never update it in place.
    for (role, file) in &staged.slots {
        ListingAssetRepo::delete_slot(&mut **tx, id, *role).await?;
        ListingAssetRepo::insert_many(&mut **tx, id, &[(*role, file.public_path.clone())])
            .await?;
    }

    ListingAssetRepo::insert_many(&mut **tx, id, &staged.gallery_rows()).await?;

    Ok(id)
}

/// Child rows first, parent second; the RESTRICT FK enforces the order.
/// Captures the asset paths so the caller can remove files post-commit.
async fn delete_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    id: DbId,
) -> AppResult<(u64, u64, Vec<String>)> {
    let assets = ListingAssetRepo::find_by_listing(&mut **tx, id).await?;
    let paths: Vec<String> = assets.into_iter().map(|a| a.path).collect();

    let assets_removed = ListingAssetRepo::delete_by_listing(&mut **tx, id).await?;
    let listings_removed = ListingRepo::delete(&mut **tx, id).await?;

    Ok((assets_removed, listings_removed, paths))
}
