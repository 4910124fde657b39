//! Listing entity and mutation DTOs.

use serde::Serialize;
use sqlx::FromRow;

use propstack_core::amenities::Amenities;
use propstack_core::types::{DbId, Timestamp};

use crate::models::flag::Flag;
use crate::models::listing_asset::ListingAsset;

/// A row from the `listings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Listing {
    pub id: DbId,
    pub category_id: DbId,

    pub title: String,
    pub location: String,
    pub price: i64,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub area: i32,

    pub is_featured: Flag,
    pub is_for_rent: Flag,

    pub full_name: Option<String>,
    pub description: Option<String>,
    pub full_address: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub province_state: Option<String>,
    pub neighborhood: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub unit_price: Option<i64>,
    pub before_price_label: Option<String>,
    pub after_price_label: Option<String>,
    pub property_type: Option<String>,
    pub property_status: Option<String>,
    pub property_label: Option<String>,
    pub land_area: Option<i32>,
    pub rooms: Option<i32>,
    pub garages: Option<i32>,
    pub garage_size: Option<String>,
    pub year_built: Option<i32>,

    pub amenities_air_condition: Flag,
    pub amenities_ceiling_height: Flag,
    pub amenities_heating: Flag,
    pub amenities_elevator: Flag,
    pub amenities_fire_place: Flag,
    pub amenities_parking: Flag,
    pub amenities_disabled_access: Flag,
    pub amenities_recreation: Flag,
    pub amenities_cable_tv: Flag,
    pub amenities_garden: Flag,
    pub amenities_wifi: Flag,

    pub virtual_tour_embedded_code: Option<String>,
    pub virtual_tour_description: Option<String>,
    pub video_url: Option<String>,

    pub enable_floor_plan: Flag,
    pub floor_plan_embedded_code: Option<String>,
    pub floor_plan_title: Option<String>,
    pub floor_price_digits: Option<i64>,
    pub floor_price_postfix: Option<String>,
    pub floor_size_digits: Option<i32>,
    pub floor_size_postfix: Option<String>,
    pub floor_bedrooms: Option<i32>,
    pub floor_bathrooms: Option<i32>,
    pub floor_description: Option<String>,

    pub agent_information: Option<String>,
    pub agent_embedded_code: Option<String>,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Fields accepted when creating a listing. Title through price are the
/// required set; everything else defaults.
#[derive(Debug, Clone)]
pub struct CreateListing {
    pub category_id: Option<DbId>,
    pub title: String,
    pub location: String,
    pub price: i64,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub area: i32,
    pub is_featured: Flag,
    pub is_for_rent: Flag,
    pub amenities: Option<Amenities>,
}

/// Sparse partial update: only `Some` fields participate in the generated
/// UPDATE statement; `None` fields retain their stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateListing {
    pub category_id: Option<DbId>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub price: Option<i64>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area: Option<i32>,
    pub is_featured: Option<Flag>,
    pub is_for_rent: Option<Flag>,

    pub full_name: Option<String>,
    pub description: Option<String>,
    pub full_address: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub province_state: Option<String>,
    pub neighborhood: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub unit_price: Option<i64>,
    pub before_price_label: Option<String>,
    pub after_price_label: Option<String>,
    pub property_type: Option<String>,
    pub property_status: Option<String>,
    pub property_label: Option<String>,
    pub land_area: Option<i32>,
    pub rooms: Option<i32>,
    pub garages: Option<i32>,
    pub garage_size: Option<String>,
    pub year_built: Option<i32>,

    /// Expands into the eleven `amenities_*` flag columns.
    pub amenities: Option<Amenities>,

    pub virtual_tour_embedded_code: Option<String>,
    pub virtual_tour_description: Option<String>,
    pub video_url: Option<String>,

    pub enable_floor_plan: Option<Flag>,
    pub floor_plan_embedded_code: Option<String>,
    pub floor_plan_title: Option<String>,
    pub floor_price_digits: Option<i64>,
    pub floor_price_postfix: Option<String>,
    pub floor_size_digits: Option<i32>,
    pub floor_size_postfix: Option<String>,
    pub floor_bedrooms: Option<i32>,
    pub floor_bathrooms: Option<i32>,
    pub floor_description: Option<String>,

    pub agent_information: Option<String>,
    pub agent_embedded_code: Option<String>,
}

impl UpdateListing {
    /// True when no scalar field was supplied. The coordinator still runs
    /// the UPDATE to bump `updated_at` and learn whether the row exists.
    pub fn is_empty(&self) -> bool {
        // Cheap structural check via the generated SET clause.
        crate::repositories::listing_repo::set_clauses(self).is_empty()
    }
}

/// A listing with its assets nested, as returned by the read endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ListingWithAssets {
    #[serde(flatten)]
    pub listing: Listing,
    pub assets: Vec<ListingAsset>,
}
