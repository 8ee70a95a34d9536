//! HTTP API.
//!
//! Every handler is a thin adapter over `core`: it extracts the request, calls one
//! operation and returns its result as JSON. Errors go through [`error::ApiError`].
//! The weighing-station firmware still posts to the legacy paths, which are routed
//! to the same handlers.

pub mod companies;
pub mod error;
pub mod kiosk;
pub mod ledger;
pub mod prices;

use crate::core::clock::Clock;
use axum::{
    Json, Router,
    routing::{get, post, put},
};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    /// Connection pool
    pub db: Arc<DatabaseConnection>,
    /// Source of transaction dates and times
    pub clock: Arc<dyn Clock>,
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        // Weighing stations
        .route("/kiosk/coagulum", post(kiosk::record_coagulum))
        .route("/kiosk/liquid", put(kiosk::record_liquid))
        .route("/kiosk/moisture", put(kiosk::record_moisture))
        .route("/giaodich/mu-tap/", post(kiosk::record_coagulum))
        .route("/giaodich/mu-nuoc/", put(kiosk::record_liquid))
        .route("/giaodich/tsc-drc/", put(kiosk::record_moisture))
        // Price book
        .route("/prices", put(prices::upsert))
        .route("/prices/:company/latest", get(prices::latest))
        .route("/prices/:company/:date", get(prices::for_date))
        // Companies
        .route("/companies/decommission", post(companies::decommission))
        // Ledger
        .route("/transactions", post(ledger::create_transaction))
        .route(
            "/transactions/:id",
            get(ledger::get_transaction)
                .put(ledger::update_transaction)
                .delete(ledger::delete_transaction),
        )
        .route(
            "/suppliers/:id/transactions",
            get(ledger::supplier_transactions),
        )
        .route("/suppliers/:id/statements", get(ledger::supplier_statements))
        .route("/statements/:month/refresh", post(ledger::refresh_statements))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::errors::Result;
    use crate::test_utils::*;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use tower::ServiceExt;

    async fn test_app() -> Result<Router> {
        let db = setup_test_db().await?;
        create_test_company(&db, "Phu Rieng").await?;
        create_test_supplier(&db, "0901234567", "A1B2C3D4", "Phu Rieng").await?;
        Ok(router(AppState {
            db: Arc::new(db),
            clock: Arc::new(test_clock(8, 0, 0)),
        }))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn decimal_field(value: &Value, field: &str) -> Decimal {
        Decimal::from_str(value[field].as_str().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_health() -> Result<()> {
        let app = test_app().await?;
        let (status, body) = send(&app, Method::GET, "/health", Value::Null).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        Ok(())
    }

    #[tokio::test]
    async fn test_station_flow_over_legacy_paths() -> Result<()> {
        let app = test_app().await?;

        let (status, _) = send(
            &app,
            Method::PUT,
            "/prices",
            json!({"CongTy": "Phu Rieng", "NgayThietLap": "2024-05-01", "GiaMuNuoc": 20000, "GiaMuTap": 18000}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, opened) = send(
            &app,
            Method::POST,
            "/giaodich/mu-tap/",
            json!({"RFID": "A1B2C3D4", "KhoiLuongMuTap": 50.0}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(opened["state"], "opened");

        let (status, _) = send(
            &app,
            Method::PUT,
            "/giaodich/mu-nuoc/",
            json!({"RFID": "A1B2C3D4", "KhoiLuongMuNuoc": 30.0}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, closed) = send(
            &app,
            Method::PUT,
            "/giaodich/tsc-drc/",
            json!({"RFID": "A1B2C3D4", "TSC": 0.3, "DRC": 0.6}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(closed["id"], opened["id"]);
        assert_eq!(closed["state"], "closed");
        assert_eq!(decimal_field(&closed, "total"), dec("720000"));
        Ok(())
    }

    #[tokio::test]
    async fn test_explicit_transaction_id_over_new_paths() -> Result<()> {
        let app = test_app().await?;
        send(
            &app,
            Method::PUT,
            "/prices",
            json!({"company": "Phu Rieng", "date": "2024-05-01", "liquid_price": "20000", "coagulum_price": "18000"}),
        )
        .await;

        let (_, first) = send(
            &app,
            Method::POST,
            "/kiosk/coagulum",
            json!({"rfid": "A1B2C3D4", "coagulum_weight": "40"}),
        )
        .await;
        send(
            &app,
            Method::POST,
            "/kiosk/coagulum",
            json!({"rfid": "A1B2C3D4", "coagulum_weight": "45"}),
        )
        .await;

        let (status, updated) = send(
            &app,
            Method::PUT,
            "/kiosk/liquid",
            json!({"rfid": "A1B2C3D4", "transaction_id": first["id"], "liquid_weight": "25"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["id"], first["id"]);
        assert_eq!(updated["state"], "liquid_recorded");
        Ok(())
    }

    #[tokio::test]
    async fn test_not_found_codes_are_distinguishable() -> Result<()> {
        let app = test_app().await?;

        let (status, body) = send(
            &app,
            Method::POST,
            "/kiosk/coagulum",
            json!({"rfid": "A1B2C3D4", "coagulum_weight": 50}),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "price_not_set");

        let (status, body) = send(
            &app,
            Method::POST,
            "/kiosk/coagulum",
            json!({"rfid": "FFFFFFFF", "coagulum_weight": 50}),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "supplier_not_found");
        Ok(())
    }

    #[tokio::test]
    async fn test_error_statuses() -> Result<()> {
        let app = test_app().await?;

        let (status, body) = send(
            &app,
            Method::PUT,
            "/kiosk/liquid",
            json!({"rfid": "A1B2C3D4", "liquid_weight": 0}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_quantity");

        let (status, body) = send(
            &app,
            Method::PUT,
            "/prices",
            json!({"company": "Ghost Co", "date": "2024-05-01", "liquid_price": 2, "coagulum_price": 1}),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "unknown_company");

        let (status, body) = send(&app, Method::GET, "/prices/Phu%20Rieng/latest", Value::Null).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "no_price_history");

        let (status, body) = send(&app, Method::GET, "/transactions/42", Value::Null).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "transaction_not_found");
        Ok(())
    }

    #[tokio::test]
    async fn test_manual_transaction_is_updated_in_place() -> Result<()> {
        let app = test_app().await?;
        send(
            &app,
            Method::PUT,
            "/prices",
            json!({"company": "Phu Rieng", "date": "2024-05-01", "liquid_price": "20000", "coagulum_price": "18000"}),
        )
        .await;

        let (status, created) = send(
            &app,
            Method::POST,
            "/transactions",
            json!({"IDKhachHang": 1, "NgayGiaoDich": "2024-05-01", "ThoiGianGiaoDich": "09:30:00", "KhoiLuongMuTap": 50, "DRC": 0.6}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(decimal_field(&created, "total"), dec("540000"));

        let uri = format!("/transactions/{}", created["id"]);
        let (status, updated) = send(
            &app,
            Method::PUT,
            &uri,
            json!({"supplier_id": 1, "trade_date": "2024-05-01", "trade_time": "09:30:00", "liquid_weight": 30, "tsc": 0.3, "coagulum_weight": 50, "drc": 0.6}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["id"], created["id"]);
        assert_eq!(decimal_field(&updated, "total"), dec("720000"));

        let (status, body) = send(
            &app,
            Method::PUT,
            "/transactions/9999",
            json!({"supplier_id": 1, "trade_date": "2024-05-01", "trade_time": "09:30:00"}),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "transaction_not_found");
        Ok(())
    }

    #[tokio::test]
    async fn test_decommission_endpoint() -> Result<()> {
        let app = test_app().await?;

        let (status, report) = send(
            &app,
            Method::POST,
            "/companies/decommission",
            json!({"cong_ty_list": ["Phu Rieng", "Ghost Co"]}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["decommissioned"], json!(["Phu Rieng"]));
        assert_eq!(report["skipped"], json!(["Ghost Co"]));
        assert_eq!(report["suppliers"], 1);
        Ok(())
    }
}
