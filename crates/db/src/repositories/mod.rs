pub mod listing_asset_repo;
pub mod listing_repo;
pub mod user_repo;

pub use listing_asset_repo::ListingAssetRepo;
pub use listing_repo::ListingRepo;
pub use user_repo::UserRepo;
