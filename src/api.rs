// 🌐 Dashboard API - REST endpoints over the report pipeline
//
// Handlers take a snapshot from the repository, run the pure engines on it
// and wrap the result in the `{ success, data, error }` envelope.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::catalog::FilterOptions;
use crate::error::ReportError;
use crate::filter::FilterCriteria;
use crate::report::{build_report, list_transactions, DashboardReport, ReportView};
use crate::repository::TransactionRepository;
use crate::transaction::Transaction;

// ============================================================================
// STATE
// ============================================================================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    repository: Arc<TransactionRepository>,
    /// Fixed "now" for reproducible MTD reports; None means the real clock
    fixed_now: Option<DateTime<Utc>>,
}

impl AppState {
    pub fn new(repository: Arc<TransactionRepository>) -> Self {
        AppState {
            repository,
            fixed_now: None,
        }
    }

    pub fn with_fixed_now(mut self, now: DateTime<Utc>) -> Self {
        self.fixed_now = Some(now);
        self
    }

    fn now(&self) -> DateTime<Utc> {
        self.fixed_now.unwrap_or_else(Utc::now)
    }
}

// ============================================================================
// RESPONSES
// ============================================================================

/// API Response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub transactions: usize,
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub transactions: usize,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("Reload failed: {0:#}")]
    Reload(anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Report(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Reload(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = %self, "Request failed");
        (self.status_code(), Json(ApiResponse::failure(self.to_string()))).into_response()
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: "OK",
        version: crate::VERSION,
        transactions: state.repository.len(),
    }))
}

/// GET /api/transactions - Filtered transaction list
async fn get_transactions(
    State(state): State<AppState>,
    Query(criteria): Query<FilterCriteria>,
) -> ApiResult<Vec<Transaction>> {
    let snapshot = state.repository.snapshot();
    Ok(Json(ApiResponse::ok(list_transactions(&snapshot, &criteria))))
}

fn summary(state: &AppState, criteria: &FilterCriteria, view: ReportView) -> ApiResult<DashboardReport> {
    let snapshot = state.repository.snapshot();
    let report = build_report(&snapshot, criteria, view, state.now())?;
    Ok(Json(ApiResponse::ok(report)))
}

/// GET /api/summary - MTD and month-by-month
async fn get_summary(
    State(state): State<AppState>,
    Query(criteria): Query<FilterCriteria>,
) -> ApiResult<DashboardReport> {
    summary(&state, &criteria, ReportView::Full)
}

/// GET /api/summary/mtd
async fn get_mtd_summary(
    State(state): State<AppState>,
    Query(criteria): Query<FilterCriteria>,
) -> ApiResult<DashboardReport> {
    summary(&state, &criteria, ReportView::Mtd)
}

/// GET /api/summary/monthly
async fn get_monthly_summary(
    State(state): State<AppState>,
    Query(criteria): Query<FilterCriteria>,
) -> ApiResult<DashboardReport> {
    summary(&state, &criteria, ReportView::MonthByMonth)
}

/// POST /api/reload - Re-read the source document. The old snapshot stays
/// in place when the new one fails to load.
async fn reload(State(state): State<AppState>) -> ApiResult<ReloadResponse> {
    let transactions = state.repository.reload().map_err(ApiError::Reload)?;
    info!(transactions, "Reloaded transaction snapshot");
    Ok(Json(ApiResponse::ok(ReloadResponse { transactions })))
}

/// GET /api/filters - Known filter values
async fn get_filter_options() -> Json<ApiResponse<FilterOptions>> {
    Json(ApiResponse::ok(FilterOptions::known()))
}

// ============================================================================
// ROUTER
// ============================================================================

/// Build the application router. `static_dir`, when given, is served for
/// every path outside `/api`.
pub fn router(state: AppState, static_dir: Option<&Path>) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/transactions", get(get_transactions))
        .route("/summary", get(get_summary))
        .route("/summary/mtd", get(get_mtd_summary))
        .route("/summary/monthly", get(get_monthly_summary))
        .route("/filters", get(get_filter_options))
        .route("/reload", post(reload))
        .with_state(state);

    let mut app = Router::new().nest("/api", api_routes);
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::seven_record_set;
    use axum::body::Body;
    use axum::http::Request;
    use chrono::TimeZone;
    use crate::fixtures::two_month_set;
    use crate::repository::write_json;
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn app_with(transactions: Vec<Transaction>) -> Router {
        let repository = Arc::new(TransactionRepository::from_transactions(transactions));
        let state = AppState::new(repository)
            .with_fixed_now(Utc.with_ymd_and_hms(2026, 2, 20, 12, 0, 0).unwrap());
        router(state, None)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        send(app, "GET", uri).await
    }

    async fn send(app: Router, method: &str, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(app_with(seven_record_set()), "/api/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["status"], "OK");
        assert_eq!(body["data"]["transactions"], 7);
    }

    #[tokio::test]
    async fn test_transactions_listing_and_filters() {
        let (_, all) = get_json(app_with(seven_record_set()), "/api/transactions").await;
        assert_eq!(all["data"].as_array().unwrap().len(), 7);

        let (status, filtered) = get_json(
            app_with(seven_record_set()),
            "/api/transactions?cardBrand=Mastercard&status=Declined&declineReasonCode=01-Insufficient%20funds",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let data = filtered["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["transactionId"], "tx-002");
    }

    #[tokio::test]
    async fn test_all_sentinel_and_unknown_values() {
        let (_, all) = get_json(
            app_with(seven_record_set()),
            "/api/transactions?cardBrand=all&status=&declineReasonCode=all",
        )
        .await;
        assert_eq!(all["data"].as_array().unwrap().len(), 7);

        let (status, none) =
            get_json(app_with(seven_record_set()), "/api/transactions?cardBrand=Diners").await;
        assert_eq!(status, StatusCode::OK);
        assert!(none["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_summary_endpoints() {
        let (status, full) =
            get_json(app_with(seven_record_set()), "/api/summary?cardBrand=Visa").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(full["data"]["mtdSummary"]["month"], "2026-02");
        assert_eq!(full["data"]["mtdSummary"]["totalTransactions"], 2);
        assert_eq!(full["data"]["mtdSummary"]["totalAmount"], 250.0);
        assert_eq!(full["data"]["monthByMonth"].as_array().unwrap().len(), 3);

        let (_, mtd) = get_json(app_with(seven_record_set()), "/api/summary/mtd").await;
        assert!(mtd["data"].get("monthByMonth").is_none());
        assert_eq!(mtd["data"]["mtdSummary"]["monthFormatted"], "Feb 2026");

        let (_, monthly) = get_json(app_with(seven_record_set()), "/api/summary/monthly").await;
        assert!(monthly["data"].get("mtdSummary").is_none());
        assert_eq!(monthly["data"]["monthByMonth"][0]["month"], "2026-02");
        assert_eq!(monthly["data"]["monthByMonth"][2]["month"], "2025-12");
    }

    #[tokio::test]
    async fn test_malformed_date_is_server_error() {
        let mut transactions = seven_record_set();
        transactions[0].transaction_date = "31/02/2026".to_string();

        let (status, body) = get_json(app_with(transactions), "/api/summary").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("31/02/2026"));
    }

    #[tokio::test]
    async fn test_filter_options() {
        let (_, body) = get_json(app_with(Vec::new()), "/api/filters").await;

        assert_eq!(body["data"]["statuses"][0], "Approved");
        assert_eq!(body["data"]["cardBrands"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_empty_repository() {
        let (status, body) = get_json(app_with(Vec::new()), "/api/summary").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["mtdSummary"]["totalTransactions"], 0);
        assert!(body["data"]["monthByMonth"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reload_swaps_snapshot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("transactions.json");
        write_json(&path, &two_month_set()).unwrap();

        let repository = Arc::new(TransactionRepository::load(&path).unwrap());
        let app = router(AppState::new(repository), None);

        let (_, before) = get_json(app.clone(), "/api/health").await;
        assert_eq!(before["data"]["transactions"], 5);

        write_json(&path, &seven_record_set()).unwrap();
        let (status, body) = send(app.clone(), "POST", "/api/reload").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["transactions"], 7);

        let (_, after) = get_json(app.clone(), "/api/transactions").await;
        assert_eq!(after["data"].as_array().unwrap().len(), 7);

        // A broken document leaves the previous snapshot serving
        std::fs::write(&path, "not json").unwrap();
        let (status, body) = send(app.clone(), "POST", "/api/reload").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);

        let (_, health) = get_json(app, "/api/health").await;
        assert_eq!(health["data"]["transactions"], 7);
    }

    #[tokio::test]
    async fn test_reload_without_source_fails() {
        let (status, body) = send(app_with(seven_record_set()), "POST", "/api/reload").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().starts_with("Reload failed"));
    }
}
