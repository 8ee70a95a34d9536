//! Price book endpoints.

use super::{AppState, error::ApiError};
use crate::{core::pricing, entities::PriceEntryModel};
use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

/// Body of a price upsert
#[derive(Debug, Deserialize)]
pub struct PriceRequest {
    /// Company name
    #[serde(alias = "CongTy")]
    pub company: String,
    /// Effective date, `YYYY-MM-DD`
    #[serde(alias = "NgayThietLap")]
    pub date: String,
    /// Liquid latex unit price
    #[serde(alias = "GiaMuNuoc")]
    pub liquid_price: Decimal,
    /// Coagulum unit price
    #[serde(alias = "GiaMuTap")]
    pub coagulum_price: Decimal,
}

/// PUT /prices
#[instrument(skip(state))]
pub async fn upsert(
    State(state): State<AppState>,
    Json(request): Json<PriceRequest>,
) -> Result<Json<PriceEntryModel>, ApiError> {
    let result = pricing::upsert_price(
        &state.db,
        &request.company,
        &request.date,
        request.liquid_price,
        request.coagulum_price,
    )
    .await?;
    Ok(Json(result))
}

/// GET /prices/:company/latest
#[instrument(skip(state))]
pub async fn latest(
    State(state): State<AppState>,
    Path(company): Path<String>,
) -> Result<Json<PriceEntryModel>, ApiError> {
    let result = pricing::latest(&state.db, state.clock.as_ref(), &company).await?;
    Ok(Json(result))
}

/// GET /prices/:company/:date
#[instrument(skip(state))]
pub async fn for_date(
    State(state): State<AppState>,
    Path((company, date)): Path<(String, String)>,
) -> Result<Json<PriceEntryModel>, ApiError> {
    let result = pricing::price_for_date(&state.db, &company, &date).await?;
    Ok(Json(result))
}
