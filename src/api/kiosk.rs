//! Weighing-station endpoints.
//!
//! Request bodies accept the field names used by the station firmware
//! (`RFID`, `KhoiLuongMuTap`, `KhoiLuongMuNuoc`, `TSC`, `DRC`) as well as the
//! snake_case names. Weights and readings may be sent as JSON numbers or strings.

use super::{AppState, error::ApiError};
use crate::{
    core::transaction::{self, KioskScan},
    entities::TransactionModel,
};
use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

/// Step 1 body: coagulum weight
#[derive(Debug, Deserialize)]
pub struct CoagulumRequest {
    /// Scanned RFID tag
    #[serde(alias = "RFID")]
    pub rfid: String,
    /// Coagulum weight
    #[serde(alias = "KhoiLuongMuTap")]
    pub coagulum_weight: Decimal,
}

/// Step 2 body: liquid latex weight
#[derive(Debug, Deserialize)]
pub struct LiquidRequest {
    /// Scanned RFID tag
    #[serde(alias = "RFID")]
    pub rfid: String,
    /// Id returned by step 1, if the station kept it
    #[serde(default)]
    pub transaction_id: Option<i64>,
    /// Liquid latex weight
    #[serde(alias = "KhoiLuongMuNuoc")]
    pub liquid_weight: Decimal,
}

/// Step 3 body: moisture readings
#[derive(Debug, Deserialize)]
pub struct MoistureRequest {
    /// Scanned RFID tag
    #[serde(alias = "RFID")]
    pub rfid: String,
    /// Id returned by step 1, if the station kept it
    #[serde(default)]
    pub transaction_id: Option<i64>,
    /// Total solid content of the liquid latex
    #[serde(alias = "TSC")]
    pub tsc: Decimal,
    /// Dry rubber content of the coagulum
    #[serde(alias = "DRC")]
    pub drc: Decimal,
}

/// POST /kiosk/coagulum
#[instrument(skip(state))]
pub async fn record_coagulum(
    State(state): State<AppState>,
    Json(request): Json<CoagulumRequest>,
) -> Result<Json<TransactionModel>, ApiError> {
    let result = transaction::begin_transaction(
        &state.db,
        state.clock.as_ref(),
        &request.rfid,
        request.coagulum_weight,
    )
    .await?;
    Ok(Json(result))
}

/// PUT /kiosk/liquid
#[instrument(skip(state))]
pub async fn record_liquid(
    State(state): State<AppState>,
    Json(request): Json<LiquidRequest>,
) -> Result<Json<TransactionModel>, ApiError> {
    let scan = KioskScan {
        rfid: request.rfid,
        transaction_id: request.transaction_id,
    };
    let result = transaction::record_liquid_weight(
        &state.db,
        state.clock.as_ref(),
        &scan,
        request.liquid_weight,
    )
    .await?;
    Ok(Json(result))
}

/// PUT /kiosk/moisture
#[instrument(skip(state))]
pub async fn record_moisture(
    State(state): State<AppState>,
    Json(request): Json<MoistureRequest>,
) -> Result<Json<TransactionModel>, ApiError> {
    let scan = KioskScan {
        rfid: request.rfid,
        transaction_id: request.transaction_id,
    };
    let result = transaction::record_moisture(
        &state.db,
        state.clock.as_ref(),
        &scan,
        request.tsc,
        request.drc,
    )
    .await?;
    Ok(Json(result))
}
