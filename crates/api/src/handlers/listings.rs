//! Handlers for the `/listings` resource.
//!
//! Mutating endpoints accept multipart form data: scalar fields named
//! after their columns, a repeatable `images` file field for the gallery,
//! and one optional file field per named slot. The heavy lifting happens
//! in [`ListingCoordinator`]; these handlers parse and validate the form
//! before any file or row is touched.

use std::collections::HashMap;

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;

use propstack_core::amenities::Amenities;
use propstack_core::error::CoreError;
use propstack_core::types::DbId;
use propstack_db::models::flag::Flag;
use propstack_db::models::listing::{CreateListing, ListingWithAssets, UpdateListing};
use propstack_db::models::listing_asset::AssetRole;
use propstack_db::repositories::{ListingAssetRepo, ListingRepo};

use crate::coordinator::ListingCoordinator;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, DeleteOutcome, ListingIdPayload};
use crate::stager::{Upload, UploadSet};
use crate::state::AppState;

/// File field name for the gallery array (`images[]` also accepted).
const GALLERY_FIELD: &str = "images";

/// File field names for the four named single-purpose slots.
const SLOT_FIELDS: [(&str, AssetRole); 4] = [
    ("virtual_tour_image", AssetRole::VirtualTour),
    ("floor_plan_image", AssetRole::FloorPlan),
    ("floor_image", AssetRole::Floor),
    ("agent_image", AssetRole::Agent),
];

// ---------------------------------------------------------------------------
// Read endpoints
// ---------------------------------------------------------------------------

/// GET /api/v1/listings
///
/// The full listing collection with assets nested.
pub async fn list_listings(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ListingWithAssets>>>> {
    let listings = ListingRepo::list_all(&state.pool).await?;

    let mut result = Vec::with_capacity(listings.len());
    for listing in listings {
        let assets = ListingAssetRepo::find_by_listing(&state.pool, listing.id).await?;
        result.push(ListingWithAssets { listing, assets });
    }

    Ok(Json(DataResponse { data: result }))
}

/// GET /api/v1/listings/{id}
pub async fn get_listing(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ListingWithAssets>>> {
    let listing = ListingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Listing",
            id,
        }))?;
    let assets = ListingAssetRepo::find_by_listing(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: ListingWithAssets { listing, assets },
    }))
}

// ---------------------------------------------------------------------------
// Mutating endpoints
// ---------------------------------------------------------------------------

/// POST /api/v1/listings
///
/// Create a listing from a multipart body. Required scalar fields: title,
/// location, bedrooms, bathrooms, area, price. Zero uploaded images is
/// valid.
pub async fn create_listing(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<ListingIdPayload>>)> {
    let (fields, uploads) = read_form(multipart).await?;
    let input = build_create(&fields)?;

    let coordinator = ListingCoordinator::new(&state.pool, &state.stager);
    let id = coordinator.create(&input, &uploads).await?;
    tracing::info!(listing_id = id, user_id = user.user_id, "Listing created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ListingIdPayload { id },
        }),
    ))
}

/// PUT /api/v1/listings/{id}
///
/// Sparse partial update. Fields absent from the form keep their stored
/// value; a named slot without a new file keeps its existing asset.
pub async fn update_listing(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<ListingIdPayload>>> {
    let (fields, uploads) = read_form(multipart).await?;
    let input = build_update(&fields)?;

    let coordinator = ListingCoordinator::new(&state.pool, &state.stager);
    let id = coordinator.update(id, &input, &uploads).await?;
    tracing::info!(listing_id = id, user_id = user.user_id, "Listing updated");

    Ok(Json(DataResponse {
        data: ListingIdPayload { id },
    }))
}

/// DELETE /api/v1/listings/{id}
///
/// Always 200; the body reports whether anything existed to delete.
pub async fn delete_listing(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DeleteOutcome>>> {
    let coordinator = ListingCoordinator::new(&state.pool, &state.stager);
    let outcome = coordinator.delete(id).await?;
    tracing::info!(
        listing_id = id,
        user_id = user.user_id,
        deleted = outcome.deleted,
        "Listing delete processed"
    );

    Ok(Json(DataResponse { data: outcome }))
}

// ---------------------------------------------------------------------------
// Multipart parsing
// ---------------------------------------------------------------------------

/// Walk the multipart stream into scalar fields and an [`UploadSet`].
///
/// Unknown fields are ignored. Nothing is validated or staged here; the
/// whole body is read before any side effect happens.
async fn read_form(mut multipart: Multipart) -> AppResult<(HashMap<String, String>, UploadSet)> {
    let mut fields = HashMap::new();
    let mut uploads = UploadSet::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();

        if let Some(filename) = field.file_name() {
            let declared_name = filename.to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            let upload = Upload {
                declared_name,
                bytes: bytes.to_vec(),
            };

            if name == GALLERY_FIELD || name == "images[]" {
                uploads.gallery.push(upload);
            } else if let Some((_, role)) =
                SLOT_FIELDS.iter().find(|(field_name, _)| *field_name == name)
            {
                uploads.slots.push((*role, upload));
            }
            // unknown file fields are dropped
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            fields.insert(name, value);
        }
    }

    Ok((fields, uploads))
}

// ---------------------------------------------------------------------------
// Form -> DTO validation (step 1: before any I/O)
// ---------------------------------------------------------------------------

/// Required create fields, checked together so the error names all gaps.
const REQUIRED_CREATE_FIELDS: [&str; 6] =
    ["title", "location", "bedrooms", "bathrooms", "area", "price"];

fn build_create(fields: &HashMap<String, String>) -> AppResult<CreateListing> {
    let missing: Vec<&str> = REQUIRED_CREATE_FIELDS
        .iter()
        .copied()
        .filter(|name| fields.get(*name).map_or(true, |v| v.trim().is_empty()))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Missing fields: {}",
            missing.join(", ")
        ))));
    }

    Ok(CreateListing {
        category_id: parse_opt_i64(fields, "category_id")?,
        title: fields["title"].clone(),
        location: fields["location"].clone(),
        price: parse_i64(fields, "price")?,
        bedrooms: parse_i32(fields, "bedrooms")?,
        bathrooms: parse_i32(fields, "bathrooms")?,
        area: parse_i32(fields, "area")?,
        is_featured: flag_field(fields, "is_featured"),
        is_for_rent: flag_field(fields, "is_for_rent"),
        amenities: parse_amenities(fields)?,
    })
}

fn build_update(fields: &HashMap<String, String>) -> AppResult<UpdateListing> {
    Ok(UpdateListing {
        category_id: parse_opt_i64(fields, "category_id")?,
        title: text_field(fields, "title"),
        location: text_field(fields, "location"),
        price: parse_opt_i64(fields, "price")?,
        bedrooms: parse_opt_i32(fields, "bedrooms")?,
        bathrooms: parse_opt_i32(fields, "bathrooms")?,
        area: parse_opt_i32(fields, "area")?,
        is_featured: opt_flag_field(fields, "is_featured"),
        is_for_rent: opt_flag_field(fields, "is_for_rent"),

        full_name: text_field(fields, "full_name"),
        description: text_field(fields, "description"),
        full_address: text_field(fields, "full_address"),
        zip_code: text_field(fields, "zip_code"),
        country: text_field(fields, "country"),
        province_state: text_field(fields, "province_state"),
        neighborhood: text_field(fields, "neighborhood"),
        latitude: parse_opt_f64(fields, "latitude")?,
        longitude: parse_opt_f64(fields, "longitude")?,
        unit_price: parse_opt_i64(fields, "unit_price")?,
        before_price_label: text_field(fields, "before_price_label"),
        after_price_label: text_field(fields, "after_price_label"),
        property_type: text_field(fields, "property_type"),
        property_status: text_field(fields, "property_status"),
        property_label: text_field(fields, "property_label"),
        land_area: parse_opt_i32(fields, "land_area")?,
        rooms: parse_opt_i32(fields, "rooms")?,
        garages: parse_opt_i32(fields, "garages")?,
        garage_size: text_field(fields, "garage_size"),
        year_built: parse_opt_i32(fields, "year_built")?,

        amenities: parse_amenities(fields)?,

        virtual_tour_embedded_code: text_field(fields, "virtual_tour_embedded_code"),
        virtual_tour_description: text_field(fields, "virtual_tour_description"),
        video_url: text_field(fields, "video_url"),

        enable_floor_plan: opt_flag_field(fields, "enable_floor_plan"),
        floor_plan_embedded_code: text_field(fields, "floor_plan_embedded_code"),
        floor_plan_title: text_field(fields, "floor_plan_title"),
        floor_price_digits: parse_opt_i64(fields, "floor_price_digits")?,
        floor_price_postfix: text_field(fields, "floor_price_postfix"),
        floor_size_digits: parse_opt_i32(fields, "floor_size_digits")?,
        floor_size_postfix: text_field(fields, "floor_size_postfix"),
        floor_bedrooms: parse_opt_i32(fields, "floor_bedrooms")?,
        floor_bathrooms: parse_opt_i32(fields, "floor_bathrooms")?,
        floor_description: text_field(fields, "floor_description"),

        agent_information: text_field(fields, "agent_information"),
        agent_embedded_code: text_field(fields, "agent_embedded_code"),
    })
}

fn parse_amenities(fields: &HashMap<String, String>) -> AppResult<Option<Amenities>> {
    match fields.get("amenities") {
        Some(raw) => Ok(Some(Amenities::parse(raw).map_err(AppError::Core)?)),
        None => Ok(None),
    }
}

fn text_field(fields: &HashMap<String, String>, name: &str) -> Option<String> {
    fields.get(name).cloned()
}

fn flag_field(fields: &HashMap<String, String>, name: &str) -> Flag {
    fields.get(name).map_or(Flag::OFF, |v| Flag::from(v.as_str()))
}

fn opt_flag_field(fields: &HashMap<String, String>, name: &str) -> Option<Flag> {
    fields.get(name).map(|v| Flag::from(v.as_str()))
}

fn parse_i64(fields: &HashMap<String, String>, name: &str) -> AppResult<i64> {
    parse_opt_i64(fields, name)?.ok_or_else(|| missing(name))
}

fn parse_i32(fields: &HashMap<String, String>, name: &str) -> AppResult<i32> {
    parse_opt_i32(fields, name)?.ok_or_else(|| missing(name))
}

fn parse_opt_i64(fields: &HashMap<String, String>, name: &str) -> AppResult<Option<i64>> {
    fields
        .get(name)
        .map(|v| v.trim().parse::<i64>().map_err(|_| not_numeric(name, v)))
        .transpose()
}

fn parse_opt_i32(fields: &HashMap<String, String>, name: &str) -> AppResult<Option<i32>> {
    fields
        .get(name)
        .map(|v| v.trim().parse::<i32>().map_err(|_| not_numeric(name, v)))
        .transpose()
}

fn parse_opt_f64(fields: &HashMap<String, String>, name: &str) -> AppResult<Option<f64>> {
    fields
        .get(name)
        .map(|v| v.trim().parse::<f64>().map_err(|_| not_numeric(name, v)))
        .transpose()
}

fn missing(name: &str) -> AppError {
    AppError::Core(CoreError::Validation(format!("Missing fields: {name}")))
}

fn not_numeric(name: &str, value: &str) -> AppError {
    AppError::Core(CoreError::Validation(format!(
        "Field '{name}' must be numeric, got '{value}'"
    )))
}
