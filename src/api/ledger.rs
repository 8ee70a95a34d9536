//! Back-office transaction and statement endpoints.

use super::{AppState, error::ApiError};
use crate::{
    core::{
        statement,
        transaction::{self, ManualEntry},
    },
    entities::{StatementModel, TransactionModel},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

/// Body of a manual transaction
#[derive(Debug, Deserialize)]
pub struct ManualTransactionRequest {
    /// Supplier who delivered
    #[serde(alias = "IDKhachHang")]
    pub supplier_id: i64,
    /// Trade date, `YYYY-MM-DD`
    #[serde(alias = "NgayGiaoDich")]
    pub trade_date: NaiveDate,
    /// Trade time, `HH:MM:SS`
    #[serde(alias = "ThoiGianGiaoDich")]
    pub trade_time: NaiveTime,
    /// Company; defaults to the supplier's
    #[serde(default, alias = "CongTy")]
    pub company: Option<String>,
    /// Liquid latex weight
    #[serde(default, alias = "KhoiLuongMuNuoc")]
    pub liquid_weight: Decimal,
    /// Total solid content
    #[serde(default, alias = "TSC")]
    pub tsc: Decimal,
    /// Coagulum weight
    #[serde(default, alias = "KhoiLuongMuTap")]
    pub coagulum_weight: Decimal,
    /// Dry rubber content
    #[serde(default, alias = "DRC")]
    pub drc: Decimal,
}

impl From<ManualTransactionRequest> for ManualEntry {
    fn from(request: ManualTransactionRequest) -> Self {
        Self {
            supplier_id: request.supplier_id,
            trade_date: request.trade_date,
            trade_time: request.trade_time,
            company: request.company,
            liquid_weight: request.liquid_weight,
            tsc: request.tsc,
            coagulum_weight: request.coagulum_weight,
            drc: request.drc,
        }
    }
}

/// POST /transactions
#[instrument(skip(state))]
pub async fn create_transaction(
    State(state): State<AppState>,
    Json(request): Json<ManualTransactionRequest>,
) -> Result<(StatusCode, Json<TransactionModel>), ApiError> {
    let result = transaction::record_manual_transaction(&state.db, &request.into()).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

/// GET /transactions/:id
#[instrument(skip(state))]
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TransactionModel>, ApiError> {
    Ok(Json(transaction::get_transaction_by_id(&state.db, id).await?))
}

/// PUT /transactions/:id
#[instrument(skip(state))]
pub async fn update_transaction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<ManualTransactionRequest>,
) -> Result<Json<TransactionModel>, ApiError> {
    let result = transaction::update_transaction(&state.db, id, &request.into()).await?;
    Ok(Json(result))
}

/// DELETE /transactions/:id
#[instrument(skip(state))]
pub async fn delete_transaction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    transaction::delete_transaction(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /suppliers/:id/transactions
#[instrument(skip(state))]
pub async fn supplier_transactions(
    State(state): State<AppState>,
    Path(supplier_id): Path<i64>,
) -> Result<Json<Vec<TransactionModel>>, ApiError> {
    let result = transaction::get_transactions_for_supplier(&state.db, supplier_id).await?;
    Ok(Json(result))
}

/// GET /suppliers/:id/statements
#[instrument(skip(state))]
pub async fn supplier_statements(
    State(state): State<AppState>,
    Path(supplier_id): Path<i64>,
) -> Result<Json<Vec<StatementModel>>, ApiError> {
    let result = statement::get_statements_for_supplier(&state.db, supplier_id).await?;
    Ok(Json(result))
}

/// POST /statements/:month/refresh
#[instrument(skip(state))]
pub async fn refresh_statements(
    State(state): State<AppState>,
    Path(month): Path<String>,
) -> Result<Json<Vec<StatementModel>>, ApiError> {
    let result =
        statement::refresh_monthly_statements(&state.db, state.clock.as_ref(), &month).await?;
    Ok(Json(result))
}
