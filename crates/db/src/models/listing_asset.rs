//! Listing asset models.
//!
//! Every stored binary reference is a `listing_assets` row: the open-ended
//! gallery plus four named single-purpose slots. Named slots are replaced
//! by delete-old-row + insert-new-row, never updated in place.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use propstack_core::types::DbId;

/// Role tag distinguishing gallery images from named single-purpose slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AssetRole {
    Gallery,
    VirtualTour,
    FloorPlan,
    Floor,
    Agent,
}

impl AssetRole {
    /// The four single-purpose slots a request may fill at most once each.
    pub const NAMED_SLOTS: [AssetRole; 4] = [
        AssetRole::VirtualTour,
        AssetRole::FloorPlan,
        AssetRole::Floor,
        AssetRole::Agent,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AssetRole::Gallery => "gallery",
            AssetRole::VirtualTour => "virtual_tour",
            AssetRole::FloorPlan => "floor_plan",
            AssetRole::Floor => "floor",
            AssetRole::Agent => "agent",
        }
    }
}

/// A row from the `listing_assets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ListingAsset {
    pub id: DbId,
    pub listing_id: DbId,
    pub role: AssetRole,
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serializes_as_snake_case() {
        let json = serde_json::to_string(&AssetRole::VirtualTour).unwrap();
        assert_eq!(json, "\"virtual_tour\"");
    }

    #[test]
    fn gallery_is_not_a_named_slot() {
        assert!(!AssetRole::NAMED_SLOTS.contains(&AssetRole::Gallery));
    }
}
