//! Integration tests for the listing repositories against a real database.
//!
//! Exercises the repository layer directly:
//! - Create and read-back of listings and their asset rows
//! - Sparse partial update semantics
//! - Child-before-parent delete ordering and FK enforcement
//! - Transaction rollback atomicity

use sqlx::PgPool;

use propstack_core::amenities::Amenities;
use propstack_db::models::flag::Flag;
use propstack_db::models::listing::{CreateListing, UpdateListing};
use propstack_db::models::listing_asset::AssetRole;
use propstack_db::repositories::{ListingAssetRepo, ListingRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_listing(title: &str) -> CreateListing {
    CreateListing {
        category_id: None,
        title: title.to_string(),
        location: "Lakeview".to_string(),
        price: 450_000,
        bedrooms: 3,
        bathrooms: 2,
        area: 1800,
        is_featured: Flag::from(false),
        is_for_rent: Flag::from(false),
        amenities: None,
    }
}

fn gallery(paths: &[&str]) -> Vec<(AssetRole, String)> {
    paths
        .iter()
        .map(|p| (AssetRole::Gallery, p.to_string()))
        .collect()
}

// ---------------------------------------------------------------------------
// Create / read
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_and_read_back(pool: PgPool) {
    let created = ListingRepo::insert(&pool, &new_listing("Lakeside Villa"))
        .await
        .unwrap();
    assert!(created.id > 0);
    assert_eq!(created.category_id, 1, "default category");

    let found = ListingRepo::find_by_id(&pool, created.id)
        .await
        .unwrap()
        .expect("listing should exist");
    assert_eq!(found.title, "Lakeside Villa");
    assert_eq!(found.price, 450_000);
    assert_eq!(found.bedrooms, 3);
    assert!(!found.is_featured.as_bool());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_with_gallery_assets(pool: PgPool) {
    let listing = ListingRepo::insert(&pool, &new_listing("With Photos"))
        .await
        .unwrap();

    let rows = ListingAssetRepo::insert_many(
        &pool,
        listing.id,
        &gallery(&["/uploads/a.jpg", "/uploads/b.jpg"]),
    )
    .await
    .unwrap();
    assert_eq!(rows.len(), 2);

    let found = ListingAssetRepo::find_by_listing(&pool, listing.id)
        .await
        .unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].path, "/uploads/a.jpg");
    assert_eq!(found[0].role, AssetRole::Gallery);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_asset_slice_inserts_nothing(pool: PgPool) {
    let listing = ListingRepo::insert(&pool, &new_listing("No Photos"))
        .await
        .unwrap();
    let rows = ListingAssetRepo::insert_many(&pool, listing.id, &[])
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn amenity_flags_store_as_strict_zero_one(pool: PgPool) {
    let input = CreateListing {
        amenities: Some(Amenities {
            wifi: true,
            parking: true,
            ..Default::default()
        }),
        ..new_listing("Flagged")
    };
    let listing = ListingRepo::insert(&pool, &input).await.unwrap();

    let (wifi, garden): (i16, i16) = sqlx::query_as(
        "SELECT amenities_wifi, amenities_garden FROM listings WHERE id = $1",
    )
    .bind(listing.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(wifi, 1);
    assert_eq!(garden, 0);
    assert!(listing.amenities_parking.as_bool());
}

// ---------------------------------------------------------------------------
// Partial update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn price_only_update_retains_every_other_field(pool: PgPool) {
    let listing = ListingRepo::insert(&pool, &new_listing("Hold Steady"))
        .await
        .unwrap();

    let affected = ListingRepo::update(
        &pool,
        listing.id,
        &UpdateListing {
            price: Some(500_000),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(affected, 1);

    let found = ListingRepo::find_by_id(&pool, listing.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.price, 500_000);
    assert_eq!(found.title, "Hold Steady");
    assert_eq!(found.bedrooms, 3);
    assert_eq!(found.area, 1800);
    assert!(found.updated_at >= found.created_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_of_missing_listing_affects_zero_rows(pool: PgPool) {
    let affected = ListingRepo::update(
        &pool,
        9999,
        &UpdateListing {
            price: Some(1),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(affected, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_update_still_reports_existence(pool: PgPool) {
    let listing = ListingRepo::insert(&pool, &new_listing("Just Touch"))
        .await
        .unwrap();

    let affected = ListingRepo::update(&pool, listing.id, &UpdateListing::default())
        .await
        .unwrap();
    assert_eq!(affected, 1);

    let affected = ListingRepo::update(&pool, 424242, &UpdateListing::default())
        .await
        .unwrap();
    assert_eq!(affected, 0);
}

// ---------------------------------------------------------------------------
// Named slots
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn slot_replacement_is_delete_then_insert(pool: PgPool) {
    let listing = ListingRepo::insert(&pool, &new_listing("Agent Swap"))
        .await
        .unwrap();
    ListingAssetRepo::insert_many(
        &pool,
        listing.id,
        &[(AssetRole::Agent, "/uploads/old-agent.jpg".to_string())],
    )
    .await
    .unwrap();

    let removed = ListingAssetRepo::delete_slot(&pool, listing.id, AssetRole::Agent)
        .await
        .unwrap();
    assert_eq!(removed, 1);
    ListingAssetRepo::insert_many(
        &pool,
        listing.id,
        &[(AssetRole::Agent, "/uploads/new-agent.jpg".to_string())],
    )
    .await
    .unwrap();

    let assets = ListingAssetRepo::find_by_listing(&pool, listing.id)
        .await
        .unwrap();
    let agents: Vec<_> = assets
        .iter()
        .filter(|a| a.role == AssetRole::Agent)
        .collect();
    assert_eq!(agents.len(), 1);
    assert_eq!(agents[0].path, "/uploads/new-agent.jpg");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_an_unoccupied_slot_is_a_no_op(pool: PgPool) {
    let listing = ListingRepo::insert(&pool, &new_listing("No Agent"))
        .await
        .unwrap();
    let removed = ListingAssetRepo::delete_slot(&pool, listing.id, AssetRole::Agent)
        .await
        .unwrap();
    assert_eq!(removed, 0);
}

// ---------------------------------------------------------------------------
// Delete ordering / FK enforcement
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_removes_children_then_parent(pool: PgPool) {
    let listing = ListingRepo::insert(&pool, &new_listing("Doomed"))
        .await
        .unwrap();
    ListingAssetRepo::insert_many(&pool, listing.id, &gallery(&["/uploads/x.jpg"]))
        .await
        .unwrap();

    let mut tx = pool.begin().await.unwrap();
    let assets_removed = ListingAssetRepo::delete_by_listing(&mut *tx, listing.id)
        .await
        .unwrap();
    let listings_removed = ListingRepo::delete(&mut *tx, listing.id).await.unwrap();
    tx.commit().await.unwrap();

    assert_eq!(assets_removed, 1);
    assert_eq!(listings_removed, 1);
    assert!(ListingRepo::find_by_id(&pool, listing.id)
        .await
        .unwrap()
        .is_none());
    assert!(ListingAssetRepo::find_by_listing(&pool, listing.id)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn parent_delete_with_surviving_children_is_rejected(pool: PgPool) {
    let listing = ListingRepo::insert(&pool, &new_listing("Protected"))
        .await
        .unwrap();
    ListingAssetRepo::insert_many(&pool, listing.id, &gallery(&["/uploads/y.jpg"]))
        .await
        .unwrap();

    // Wrong order: parent first. The RESTRICT FK must refuse.
    let err = ListingRepo::delete(&pool, listing.id).await.unwrap_err();
    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23503"));
        }
        other => panic!("expected FK violation, got {other:?}"),
    }

    // Nothing was lost.
    assert!(ListingRepo::find_by_id(&pool, listing.id)
        .await
        .unwrap()
        .is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_of_nonexistent_listing_affects_zero_rows(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let assets_removed = ListingAssetRepo::delete_by_listing(&mut *tx, 9999)
        .await
        .unwrap();
    let listings_removed = ListingRepo::delete(&mut *tx, 9999).await.unwrap();
    tx.commit().await.unwrap();

    assert_eq!(assets_removed, 0);
    assert_eq!(listings_removed, 0);
}

// ---------------------------------------------------------------------------
// Atomicity
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn failed_child_insert_rolls_back_the_parent(pool: PgPool) {
    let mut tx = pool.begin().await.unwrap();
    let listing = ListingRepo::insert(&mut *tx, &new_listing("Half Done"))
        .await
        .unwrap();

    // Child insert referencing a listing that does not exist: FK failure
    // mid-transaction.
    let err = ListingAssetRepo::insert_many(
        &mut *tx,
        listing.id + 100_000,
        &gallery(&["/uploads/z.jpg"]),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, sqlx::Error::Database(_)));
    tx.rollback().await.unwrap();

    // The successfully inserted parent must not be observable either.
    assert!(ListingRepo::find_by_id(&pool, listing.id)
        .await
        .unwrap()
        .is_none());
}
