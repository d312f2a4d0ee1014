use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::audit::Audit;
use super::domain::{PeakPeriod, StoreSnapshot};
use super::priority::PriorityContext;
use super::repository::{RepositoryError, StoreRepository};
use super::service::{ComplianceService, ComplianceServiceError};

/// Router exposing scoring over posted snapshots and over the repository portfolio.
pub fn compliance_router<R>(service: Arc<ComplianceService<R>>) -> Router
where
    R: StoreRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/compliance/stores/status",
            post(store_status_handler::<R>),
        )
        .route(
            "/api/v1/compliance/priority",
            get(priority_queue_handler::<R>).post(rank_handler::<R>),
        )
        .route("/api/v1/compliance/audits", post(submit_audit_handler::<R>))
        .route(
            "/api/v1/compliance/audits/score",
            post(score_audit_handler::<R>),
        )
        .route(
            "/api/v1/compliance/risk-radar",
            get(portfolio_radar_handler::<R>).post(radar_handler::<R>),
        )
        .route("/api/v1/compliance/dashboard", get(dashboard_handler::<R>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub struct StoreStatusRequest {
    pub now: Option<DateTime<Utc>>,
    pub orange_threshold_days: Option<i64>,
    pub stores: Vec<StoreSnapshot>,
}

#[derive(Debug, Deserialize)]
pub struct PriorityRequest {
    pub now: Option<DateTime<Utc>>,
    #[serde(default)]
    pub peak_periods: Vec<PeakPeriod>,
    pub orange_threshold_days: Option<i64>,
    pub limit: Option<usize>,
    pub stores: Vec<StoreSnapshot>,
}

#[derive(Debug, Deserialize)]
pub struct RadarRequest {
    pub now: Option<DateTime<Utc>>,
    pub window_days: Option<i64>,
    pub stores: Vec<StoreSnapshot>,
}

#[derive(Debug, Deserialize)]
pub struct AuditRequest {
    pub now: Option<DateTime<Utc>>,
    pub audit: Audit,
}

#[derive(Debug, Default, Deserialize)]
pub struct PortfolioQuery {
    pub now: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

pub(crate) async fn store_status_handler<R>(
    State(service): State<Arc<ComplianceService<R>>>,
    Json(request): Json<StoreStatusRequest>,
) -> Response
where
    R: StoreRepository + 'static,
{
    let now = request.now.unwrap_or_else(Utc::now);
    match service.store_statuses(&request.stores, request.orange_threshold_days, now) {
        Ok(views) => (StatusCode::OK, Json(views)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn rank_handler<R>(
    State(service): State<Arc<ComplianceService<R>>>,
    Json(request): Json<PriorityRequest>,
) -> Response
where
    R: StoreRepository + 'static,
{
    let now = request.now.unwrap_or_else(Utc::now);
    let context = PriorityContext::new(now)
        .with_peak_periods(request.peak_periods)
        .with_orange_threshold_days(
            request
                .orange_threshold_days
                .unwrap_or(service.config().orange_threshold_days),
        );

    match service.rank(&request.stores, &context, request.limit) {
        Ok(ranked) => (StatusCode::OK, Json(ranked)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn priority_queue_handler<R>(
    State(service): State<Arc<ComplianceService<R>>>,
    Query(query): Query<PortfolioQuery>,
) -> Response
where
    R: StoreRepository + 'static,
{
    let now = query.now.unwrap_or_else(Utc::now);
    match service.priority_queue(now, query.limit) {
        Ok(queue) => (StatusCode::OK, Json(queue)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn score_audit_handler<R>(
    State(service): State<Arc<ComplianceService<R>>>,
    Json(request): Json<AuditRequest>,
) -> Response
where
    R: StoreRepository + 'static,
{
    let now = request.now.unwrap_or_else(Utc::now);
    match service.score_audit(&request.audit, now) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_audit_handler<R>(
    State(service): State<Arc<ComplianceService<R>>>,
    Json(request): Json<AuditRequest>,
) -> Response
where
    R: StoreRepository + 'static,
{
    let now = request.now.unwrap_or_else(Utc::now);
    match service.submit_audit(&request.audit, now) {
        Ok(report) => (StatusCode::CREATED, Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn radar_handler<R>(
    State(service): State<Arc<ComplianceService<R>>>,
    Json(request): Json<RadarRequest>,
) -> Response
where
    R: StoreRepository + 'static,
{
    let now = request.now.unwrap_or_else(Utc::now);
    match service.radar_for(&request.stores, request.window_days, now) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn portfolio_radar_handler<R>(
    State(service): State<Arc<ComplianceService<R>>>,
    Query(query): Query<PortfolioQuery>,
) -> Response
where
    R: StoreRepository + 'static,
{
    let now = query.now.unwrap_or_else(Utc::now);
    match service.risk_radar(now) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn dashboard_handler<R>(
    State(service): State<Arc<ComplianceService<R>>>,
    Query(query): Query<PortfolioQuery>,
) -> Response
where
    R: StoreRepository + 'static,
{
    let now = query.now.unwrap_or_else(Utc::now);
    match service.dashboard(now) {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: ComplianceServiceError) -> Response {
    let status = match &error {
        ComplianceServiceError::Scoring(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ComplianceServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ComplianceServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ComplianceServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, Json(payload)).into_response()
}
