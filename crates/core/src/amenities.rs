//! Typed parsing of the amenities JSON blob.
//!
//! Clients submit amenities as a single JSON-encoded multipart field
//! (`{"airCondition": true, "wifi": false, ...}`). Parsing happens during
//! request validation, before any file is staged or any transaction is
//! opened, so a malformed blob never causes relational side effects.

use serde::Deserialize;

use crate::error::CoreError;

/// Amenity switches carried on a listing.
///
/// Absent keys default to off; unknown keys are rejected so a typo'd
/// amenity fails loudly instead of being silently dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Amenities {
    pub air_condition: bool,
    pub ceiling_height: bool,
    pub heating: bool,
    pub elevator: bool,
    pub fire_place: bool,
    pub parking: bool,
    pub disabled_access: bool,
    pub recreation: bool,
    #[serde(rename = "cableTV")]
    pub cable_tv: bool,
    pub garden: bool,
    pub wifi: bool,
}

impl Amenities {
    /// Parse the raw multipart field value.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        serde_json::from_str(raw)
            .map_err(|e| CoreError::Validation(format!("Malformed amenities JSON: {e}")))
    }
}
