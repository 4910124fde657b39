pub mod flag;
pub mod listing;
pub mod listing_asset;
pub mod user;
