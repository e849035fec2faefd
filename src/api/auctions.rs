//! Auction endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        auction::{Auction, CreateAuction},
        repair::OracleNumberList,
    },
};

/// Auctions, excluding assets still in the workshop
#[utoipa::path(
    get,
    path = "/auctions",
    tag = "auctions",
    responses(
        (status = 200, description = "Auctions, newest first", body = Vec<Auction>)
    )
)]
pub async fn list_auctions(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Auction>>> {
    let auctions = state.services.auctions.list().await?;
    Ok(Json(auctions))
}

/// Oracle numbers of auctioned assets
#[utoipa::path(
    get,
    path = "/auctions/auctioned",
    tag = "auctions",
    responses(
        (status = 200, description = "Auctioned assets", body = OracleNumberList)
    )
)]
pub async fn list_auctioned(State(state): State<crate::AppState>) -> AppResult<Json<OracleNumberList>> {
    let list = state.services.auctions.auctioned_oracle_numbers().await?;
    Ok(Json(list))
}

#[utoipa::path(
    get,
    path = "/auctions/{oracle_number}",
    tag = "auctions",
    params(
        ("oracle_number" = String, Path, description = "Oracle number")
    ),
    responses(
        (status = 200, description = "Auctions of the asset", body = Vec<Auction>)
    )
)]
pub async fn get_asset_auctions(
    State(state): State<crate::AppState>,
    Path(oracle_number): Path<String>,
) -> AppResult<Json<Vec<Auction>>> {
    let auctions = state.services.auctions.for_asset(&oracle_number).await?;
    Ok(Json(auctions))
}

/// Sell an asset at auction
#[utoipa::path(
    post,
    path = "/auctions",
    tag = "auctions",
    request_body = CreateAuction,
    responses(
        (status = 201, description = "Auction recorded", body = Auction),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Asset not found"),
        (status = 422, description = "Asset cannot be auctioned")
    )
)]
pub async fn create_auction(
    State(state): State<crate::AppState>,
    Json(data): Json<CreateAuction>,
) -> AppResult<(StatusCode, Json<Auction>)> {
    data.validate()?;

    let auction = state.services.auctions.create(data).await?;
    Ok((StatusCode::CREATED, Json(auction)))
}
