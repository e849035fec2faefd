//! Asset register endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        asset::{
            AddBrand, Asset, AssetDetails, AssetQuery, AssetView, AvailableAsset, CreateAsset,
            ExistsResponse, UpdateAssetStatus,
        },
        assignment::{AssignmentDetails, AssignmentHistoryEntry},
        device_brand::DeviceBrandMapping,
    },
};

/// List assets with their lifecycle classification
#[utoipa::path(
    get,
    path = "/assets",
    tag = "assets",
    params(AssetQuery),
    responses(
        (status = 200, description = "Matching assets", body = Vec<AssetView>),
        (status = 400, description = "Unknown category filter")
    )
)]
pub async fn list_assets(
    State(state): State<crate::AppState>,
    Query(query): Query<AssetQuery>,
) -> AppResult<Json<Vec<AssetView>>> {
    let assets = state.services.assets.list(&query).await?;
    Ok(Json(assets))
}

/// Get an asset by oracle number
#[utoipa::path(
    get,
    path = "/assets/{oracle_number}",
    tag = "assets",
    params(
        ("oracle_number" = String, Path, description = "Oracle number")
    ),
    responses(
        (status = 200, description = "Asset details", body = AssetDetails),
        (status = 404, description = "Asset not found")
    )
)]
pub async fn get_asset(
    State(state): State<crate::AppState>,
    Path(oracle_number): Path<String>,
) -> AppResult<Json<AssetDetails>> {
    let asset = state.services.assets.get(&oracle_number).await?;
    Ok(Json(asset))
}

/// Register a new asset
#[utoipa::path(
    post,
    path = "/assets",
    tag = "assets",
    request_body = CreateAsset,
    responses(
        (status = 201, description = "Asset created", body = Asset),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Oracle or serial number already exists")
    )
)]
pub async fn create_asset(
    State(state): State<crate::AppState>,
    Json(data): Json<CreateAsset>,
) -> AppResult<(StatusCode, Json<Asset>)> {
    data.validate()?;

    let created = state.services.assets.create(data).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Change the status of an asset through the transition graph
#[utoipa::path(
    post,
    path = "/assets/update-status",
    tag = "assets",
    request_body = UpdateAssetStatus,
    responses(
        (status = 200, description = "Asset updated", body = Asset),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Asset not found"),
        (status = 422, description = "Transition not allowed")
    )
)]
pub async fn update_status(
    State(state): State<crate::AppState>,
    Json(data): Json<UpdateAssetStatus>,
) -> AppResult<Json<Asset>> {
    data.validate()?;

    let updated = state.services.assets.update_status(data).await?;
    Ok(Json(updated))
}

/// Whether an oracle number is already registered
#[utoipa::path(
    get,
    path = "/assets/check-oracle/{oracle_number}",
    tag = "assets",
    params(
        ("oracle_number" = String, Path, description = "Oracle number")
    ),
    responses(
        (status = 200, description = "Existence flag", body = ExistsResponse)
    )
)]
pub async fn check_oracle_number(
    State(state): State<crate::AppState>,
    Path(oracle_number): Path<String>,
) -> AppResult<Json<ExistsResponse>> {
    let exists = state.services.assets.exists_oracle(&oracle_number).await?;
    Ok(Json(ExistsResponse { exists }))
}

/// Whether a serial number is already registered
#[utoipa::path(
    get,
    path = "/assets/check-serial/{serial_number}",
    tag = "assets",
    params(
        ("serial_number" = String, Path, description = "Serial number")
    ),
    responses(
        (status = 200, description = "Existence flag", body = ExistsResponse)
    )
)]
pub async fn check_serial_number(
    State(state): State<crate::AppState>,
    Path(serial_number): Path<String>,
) -> AppResult<Json<ExistsResponse>> {
    let exists = state.services.assets.exists_serial(&serial_number).await?;
    Ok(Json(ExistsResponse { exists }))
}

/// Device types known to the catalogue
#[utoipa::path(
    get,
    path = "/assets/device-types",
    tag = "assets",
    responses(
        (status = 200, description = "Device types", body = Vec<String>)
    )
)]
pub async fn list_device_types(State(state): State<crate::AppState>) -> AppResult<Json<Vec<String>>> {
    let types = state.services.assets.device_types().await?;
    Ok(Json(types))
}

/// Brands for a device type, catalogue plus brands already in use
#[utoipa::path(
    get,
    path = "/assets/brands/{device_type}",
    tag = "assets",
    params(
        ("device_type" = String, Path, description = "Device type")
    ),
    responses(
        (status = 200, description = "Brand names", body = Vec<String>)
    )
)]
pub async fn list_brands(
    State(state): State<crate::AppState>,
    Path(device_type): Path<String>,
) -> AppResult<Json<Vec<String>>> {
    let brands = state.services.assets.brands_for(&device_type).await?;
    Ok(Json(brands))
}

/// Add a brand to a device type
#[utoipa::path(
    post,
    path = "/assets/brands",
    tag = "assets",
    request_body = AddBrand,
    responses(
        (status = 201, description = "Updated mapping", body = DeviceBrandMapping),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn add_brand(
    State(state): State<crate::AppState>,
    Json(data): Json<AddBrand>,
) -> AppResult<(StatusCode, Json<DeviceBrandMapping>)> {
    data.validate()?;

    let mapping = state.services.assets.add_brand(data).await?;
    Ok((StatusCode::CREATED, Json(mapping)))
}

/// Assets of a device type that can be handed out now
#[utoipa::path(
    get,
    path = "/assets/available/{device_type}",
    tag = "assets",
    params(
        ("device_type" = String, Path, description = "Device type, case-insensitive")
    ),
    responses(
        (status = 200, description = "Assignable assets", body = Vec<AvailableAsset>)
    )
)]
pub async fn list_available(
    State(state): State<crate::AppState>,
    Path(device_type): Path<String>,
) -> AppResult<Json<Vec<AvailableAsset>>> {
    let assets = state.services.assets.available(&device_type).await?;
    Ok(Json(assets))
}

/// Oracle numbers currently held by an employee
#[utoipa::path(
    get,
    path = "/assets/assigned",
    tag = "assets",
    responses(
        (status = 200, description = "Oracle numbers", body = Vec<String>)
    )
)]
pub async fn list_assigned(State(state): State<crate::AppState>) -> AppResult<Json<Vec<String>>> {
    let oracle_numbers = state.services.assets.assigned_oracle_numbers().await?;
    Ok(Json(oracle_numbers))
}

/// Every assignment an asset went through, newest first
#[utoipa::path(
    get,
    path = "/assets/{oracle_number}/assignment-history",
    tag = "assets",
    params(
        ("oracle_number" = String, Path, description = "Oracle number")
    ),
    responses(
        (status = 200, description = "Assignment history", body = Vec<AssignmentHistoryEntry>)
    )
)]
pub async fn get_assignment_history(
    State(state): State<crate::AppState>,
    Path(oracle_number): Path<String>,
) -> AppResult<Json<Vec<AssignmentHistoryEntry>>> {
    let history = state.services.assets.assignment_history(&oracle_number).await?;
    Ok(Json(history))
}

/// The active assignment of an asset
#[utoipa::path(
    get,
    path = "/assets/{oracle_number}/assignment-details",
    tag = "assets",
    params(
        ("oracle_number" = String, Path, description = "Oracle number")
    ),
    responses(
        (status = 200, description = "Active assignment", body = AssignmentDetails),
        (status = 404, description = "Asset is not assigned")
    )
)]
pub async fn get_assignment_details(
    State(state): State<crate::AppState>,
    Path(oracle_number): Path<String>,
) -> AppResult<Json<AssignmentDetails>> {
    let details = state.services.assets.assignment_details(&oracle_number).await?;
    Ok(Json(details))
}
