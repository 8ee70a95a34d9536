//! Company administration endpoints.

use super::{AppState, error::ApiError};
use crate::core::decommission::{self, DecommissionReport};
use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

/// Body of a decommission request
#[derive(Debug, Deserialize)]
pub struct DecommissionRequest {
    /// Names of the companies to remove
    #[serde(alias = "cong_ty_list")]
    pub companies: Vec<String>,
}

/// POST /companies/decommission
#[instrument(skip(state))]
pub async fn decommission(
    State(state): State<AppState>,
    Json(request): Json<DecommissionRequest>,
) -> Result<Json<DecommissionReport>, ApiError> {
    let report = decommission::decommission_companies(
        &state.db,
        state.clock.as_ref(),
        &request.companies,
    )
    .await?;
    Ok(Json(report))
}
