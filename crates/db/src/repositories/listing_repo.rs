//! Repository for the `listings` parent table.
//!
//! Every mutating operation is generic over [`sqlx::PgExecutor`], so it
//! runs against whatever scope the caller supplies -- a pool for
//! standalone reads, or a `&mut *tx` inside the coordinator's transaction.
//! Nothing here commits independently.

use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::{PgExecutor, Postgres};

use propstack_core::types::DbId;

use crate::models::flag::Flag;
use crate::models::listing::{CreateListing, Listing, UpdateListing};

/// Column list for `listings` queries.
const COLUMNS: &str = "\
    id, category_id, title, location, price, bedrooms, bathrooms, area, \
    is_featured, is_for_rent, \
    full_name, description, full_address, zip_code, country, province_state, \
    neighborhood, latitude, longitude, unit_price, before_price_label, \
    after_price_label, property_type, property_status, property_label, \
    land_area, rooms, garages, garage_size, year_built, \
    amenities_air_condition, amenities_ceiling_height, amenities_heating, \
    amenities_elevator, amenities_fire_place, amenities_parking, \
    amenities_disabled_access, amenities_recreation, amenities_cable_tv, \
    amenities_garden, amenities_wifi, \
    virtual_tour_embedded_code, virtual_tour_description, video_url, \
    enable_floor_plan, floor_plan_embedded_code, floor_plan_title, \
    floor_price_digits, floor_price_postfix, floor_size_digits, \
    floor_size_postfix, floor_bedrooms, floor_bathrooms, floor_description, \
    agent_information, agent_embedded_code, \
    created_at, updated_at";

/// Default category when the client supplies none.
const DEFAULT_CATEGORY_ID: DbId = 1;

/// Provides CRUD operations for listings.
pub struct ListingRepo;

impl ListingRepo {
    /// Insert a new listing, returning the created row.
    pub async fn insert<'e, E>(exec: E, input: &CreateListing) -> Result<Listing, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let amenities = input.amenities.unwrap_or_default();
        let query = format!(
            "INSERT INTO listings (\
                category_id, title, location, price, bedrooms, bathrooms, area, \
                is_featured, is_for_rent, \
                amenities_air_condition, amenities_ceiling_height, amenities_heating, \
                amenities_elevator, amenities_fire_place, amenities_parking, \
                amenities_disabled_access, amenities_recreation, amenities_cable_tv, \
                amenities_garden, amenities_wifi\
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, \
                       $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(input.category_id.unwrap_or(DEFAULT_CATEGORY_ID))
            .bind(&input.title)
            .bind(&input.location)
            .bind(input.price)
            .bind(input.bedrooms)
            .bind(input.bathrooms)
            .bind(input.area)
            .bind(input.is_featured)
            .bind(input.is_for_rent)
            .bind(Flag::from(amenities.air_condition))
            .bind(Flag::from(amenities.ceiling_height))
            .bind(Flag::from(amenities.heating))
            .bind(Flag::from(amenities.elevator))
            .bind(Flag::from(amenities.fire_place))
            .bind(Flag::from(amenities.parking))
            .bind(Flag::from(amenities.disabled_access))
            .bind(Flag::from(amenities.recreation))
            .bind(Flag::from(amenities.cable_tv))
            .bind(Flag::from(amenities.garden))
            .bind(Flag::from(amenities.wifi))
            .fetch_one(exec)
            .await
    }

    /// Sparse partial update. Only supplied fields participate in the SET
    /// clause; `updated_at` is always bumped. Returns the affected row
    /// count -- 0 means "not found", which is the caller's call to make.
    pub async fn update<'e, E>(
        exec: E,
        id: DbId,
        input: &UpdateListing,
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let sets = set_clauses(input);
        let sql = update_sql(&sets);

        let mut query = sqlx::query(&sql);
        for (_, value) in sets {
            query = value.bind_to(query);
        }
        let result = query.bind(id).execute(exec).await?;
        Ok(result.rows_affected())
    }

    /// Delete a listing row. Child asset rows must already be gone
    /// (FK is RESTRICT); the coordinator enforces that ordering.
    pub async fn delete<'e, E>(exec: E, id: DbId) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM listings WHERE id = $1")
            .bind(id)
            .execute(exec)
            .await?;
        Ok(result.rows_affected())
    }

    /// Find a listing by its primary key.
    pub async fn find_by_id<'e, E>(exec: E, id: DbId) -> Result<Option<Listing>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM listings WHERE id = $1");
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    /// List all listings, newest first.
    pub async fn list_all<'e, E>(exec: E) -> Result<Vec<Listing>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM listings ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Listing>(&query).fetch_all(exec).await
    }
}

// ---------------------------------------------------------------------------
// Sparse UPDATE generation
// ---------------------------------------------------------------------------

/// An owned bind value for the dynamically built UPDATE.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum BindValue {
    Text(String),
    BigInt(i64),
    Int(i32),
    Real(f64),
    Flag(Flag),
}

impl BindValue {
    fn bind_to<'q>(
        self,
        query: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments> {
        match self {
            BindValue::Text(v) => query.bind(v),
            BindValue::BigInt(v) => query.bind(v),
            BindValue::Int(v) => query.bind(v),
            BindValue::Real(v) => query.bind(v),
            BindValue::Flag(v) => query.bind(v),
        }
    }
}

/// Collect `(column, value)` pairs for every supplied field, in a fixed
/// column order. An `amenities` blob expands into all eleven flag columns.
pub(crate) fn set_clauses(input: &UpdateListing) -> Vec<(&'static str, BindValue)> {
    let mut sets: Vec<(&'static str, BindValue)> = Vec::new();

    fn text(
        sets: &mut Vec<(&'static str, BindValue)>,
        col: &'static str,
        v: &Option<String>,
    ) {
        if let Some(v) = v {
            sets.push((col, BindValue::Text(v.clone())));
        }
    }
    fn big(sets: &mut Vec<(&'static str, BindValue)>, col: &'static str, v: Option<i64>) {
        if let Some(v) = v {
            sets.push((col, BindValue::BigInt(v)));
        }
    }
    fn int(sets: &mut Vec<(&'static str, BindValue)>, col: &'static str, v: Option<i32>) {
        if let Some(v) = v {
            sets.push((col, BindValue::Int(v)));
        }
    }
    fn real(sets: &mut Vec<(&'static str, BindValue)>, col: &'static str, v: Option<f64>) {
        if let Some(v) = v {
            sets.push((col, BindValue::Real(v)));
        }
    }
    fn flag(sets: &mut Vec<(&'static str, BindValue)>, col: &'static str, v: Option<Flag>) {
        if let Some(v) = v {
            sets.push((col, BindValue::Flag(v)));
        }
    }

    text(&mut sets, "title", &input.title);
    text(&mut sets, "location", &input.location);
    text(&mut sets, "full_name", &input.full_name);
    text(&mut sets, "description", &input.description);
    text(&mut sets, "full_address", &input.full_address);
    text(&mut sets, "zip_code", &input.zip_code);
    text(&mut sets, "country", &input.country);
    text(&mut sets, "province_state", &input.province_state);
    text(&mut sets, "neighborhood", &input.neighborhood);
    text(&mut sets, "before_price_label", &input.before_price_label);
    text(&mut sets, "after_price_label", &input.after_price_label);
    text(&mut sets, "property_type", &input.property_type);
    text(&mut sets, "property_status", &input.property_status);
    text(&mut sets, "property_label", &input.property_label);
    text(&mut sets, "garage_size", &input.garage_size);
    text(&mut sets, "virtual_tour_embedded_code", &input.virtual_tour_embedded_code);
    text(&mut sets, "virtual_tour_description", &input.virtual_tour_description);
    text(&mut sets, "video_url", &input.video_url);
    text(&mut sets, "floor_plan_embedded_code", &input.floor_plan_embedded_code);
    text(&mut sets, "floor_plan_title", &input.floor_plan_title);
    text(&mut sets, "floor_price_postfix", &input.floor_price_postfix);
    text(&mut sets, "floor_size_postfix", &input.floor_size_postfix);
    text(&mut sets, "floor_description", &input.floor_description);
    text(&mut sets, "agent_information", &input.agent_information);
    text(&mut sets, "agent_embedded_code", &input.agent_embedded_code);

    big(&mut sets, "category_id", input.category_id);
    big(&mut sets, "price", input.price);
    big(&mut sets, "unit_price", input.unit_price);
    big(&mut sets, "floor_price_digits", input.floor_price_digits);

    int(&mut sets, "bedrooms", input.bedrooms);
    int(&mut sets, "bathrooms", input.bathrooms);
    int(&mut sets, "area", input.area);
    int(&mut sets, "land_area", input.land_area);
    int(&mut sets, "rooms", input.rooms);
    int(&mut sets, "garages", input.garages);
    int(&mut sets, "year_built", input.year_built);
    int(&mut sets, "floor_size_digits", input.floor_size_digits);
    int(&mut sets, "floor_bedrooms", input.floor_bedrooms);
    int(&mut sets, "floor_bathrooms", input.floor_bathrooms);

    real(&mut sets, "latitude", input.latitude);
    real(&mut sets, "longitude", input.longitude);

    flag(&mut sets, "is_featured", input.is_featured);
    flag(&mut sets, "is_for_rent", input.is_for_rent);
    flag(&mut sets, "enable_floor_plan", input.enable_floor_plan);

    if let Some(a) = input.amenities {
        let pairs: [(&'static str, bool); 11] = [
            ("amenities_air_condition", a.air_condition),
            ("amenities_ceiling_height", a.ceiling_height),
            ("amenities_heating", a.heating),
            ("amenities_elevator", a.elevator),
            ("amenities_fire_place", a.fire_place),
            ("amenities_parking", a.parking),
            ("amenities_disabled_access", a.disabled_access),
            ("amenities_recreation", a.recreation),
            ("amenities_cable_tv", a.cable_tv),
            ("amenities_garden", a.garden),
            ("amenities_wifi", a.wifi),
        ];
        for (col, on) in pairs {
            sets.push((col, BindValue::Flag(Flag::from(on))));
        }
    }

    sets
}

/// Render the UPDATE statement for the given SET pairs. The listing id is
/// always the final bind parameter.
fn update_sql(sets: &[(&'static str, BindValue)]) -> String {
    use std::fmt::Write;

    let mut sql = String::from("UPDATE listings SET updated_at = NOW()");
    for (idx, (col, _)) in sets.iter().enumerate() {
        let _ = write!(sql, ", {col} = ${}", idx + 1);
    }
    let _ = write!(sql, " WHERE id = ${}", sets.len() + 1);
    sql
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_update_only_bumps_updated_at() {
        let sets = set_clauses(&UpdateListing::default());
        assert!(sets.is_empty());
        assert_eq!(
            update_sql(&sets),
            "UPDATE listings SET updated_at = NOW() WHERE id = $1"
        );
    }

    #[test]
    fn price_only_update_touches_one_column() {
        let input = UpdateListing {
            price: Some(500_000),
            ..Default::default()
        };
        let sets = set_clauses(&input);
        assert_eq!(sets, vec![("price", BindValue::BigInt(500_000))]);
        assert_eq!(
            update_sql(&sets),
            "UPDATE listings SET updated_at = NOW(), price = $1 WHERE id = $2"
        );
    }

    #[test]
    fn amenities_blob_expands_to_all_flag_columns() {
        let input = UpdateListing {
            amenities: Some(propstack_core::amenities::Amenities {
                wifi: true,
                ..Default::default()
            }),
            ..Default::default()
        };
        let sets = set_clauses(&input);
        assert_eq!(sets.len(), 11);
        assert!(sets.contains(&("amenities_wifi", BindValue::Flag(Flag::ON))));
        assert!(sets.contains(&("amenities_garden", BindValue::Flag(Flag::OFF))));
    }

    #[test]
    fn mixed_update_orders_binds_with_the_sql() {
        let input = UpdateListing {
            title: Some("Lakeside Villa".into()),
            price: Some(450_000),
            bedrooms: Some(3),
            latitude: Some(59.33),
            is_featured: Some(Flag::ON),
            ..Default::default()
        };
        let sets = set_clauses(&input);
        let sql = update_sql(&sets);
        for (idx, (col, _)) in sets.iter().enumerate() {
            assert!(
                sql.contains(&format!("{col} = ${}", idx + 1)),
                "{col} mis-numbered in {sql}"
            );
        }
        assert!(sql.ends_with(&format!("WHERE id = ${}", sets.len() + 1)));
    }
}
