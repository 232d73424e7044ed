// 🌐 REST API - course lookup over HTTP (axum)
//
// GET /api/health
// GET /api/courses?courseNumber=KIEI-451
// GET /api/courses/:course_number
// GET /.netlify/functions/courses?courseNumber=KIEI-451   (legacy function URL)
//
// 200 → CourseDetail JSON, 400 → missing courseNumber, 404 → unknown course,
// 500 → data-integrity fault, 503 → store down, 504 → deadline exceeded.

use crate::aggregator::CourseAggregator;
use crate::error::AggregateError;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<CourseAggregator>,
}

impl AppState {
    pub fn new(aggregator: CourseAggregator) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct CourseQuery {
    #[serde(rename = "courseNumber")]
    pub course_number: Option<String>,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

impl AggregateError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AggregateError::NotFound(_) => StatusCode::NOT_FOUND,
            AggregateError::DanglingReference { .. } | AggregateError::MalformedDocument { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AggregateError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AggregateError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl IntoResponse for AggregateError {
    fn into_response(self) -> Response {
        error_response(self.status_code(), self.to_string())
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "OK",
        version: crate::VERSION,
    })
}

/// GET /api/courses?courseNumber=... - Course detail with reviews and rollups
async fn get_course(State(state): State<AppState>, Query(params): Query<CourseQuery>) -> Response {
    match params.course_number.as_deref().filter(|n| !is_blank(n)) {
        Some(course_number) => course_response(&state, course_number).await,
        None => error_response(
            StatusCode::BAD_REQUEST,
            "missing required query parameter: courseNumber",
        ),
    }
}

/// GET /api/courses/:course_number - Same lookup, course number in the path
async fn get_course_by_path(
    State(state): State<AppState>,
    Path(course_number): Path<String>,
) -> Response {
    // Path has already percent-decoded the segment
    if is_blank(&course_number) {
        return error_response(StatusCode::BAD_REQUEST, "course number must not be blank");
    }

    course_response(&state, &course_number).await
}

/// Course numbers are opaque keys: only empty or all-whitespace values are
/// rejected, everything else is looked up exactly as sent.
fn is_blank(course_number: &str) -> bool {
    course_number.trim().is_empty()
}

async fn course_response(state: &AppState, course_number: &str) -> Response {
    match state.aggregator.get_course_detail(course_number).await {
        Ok(detail) => (StatusCode::OK, Json(detail)).into_response(),
        Err(e) if e.is_client_error() => {
            info!(course_number, "course not found");
            e.into_response()
        }
        Err(e) => {
            error!(course_number, error = %e, "course lookup failed");
            e.into_response()
        }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/courses", get(get_course))
        .route("/courses/:course_number", get(get_course_by_path));

    Router::new()
        .nest("/api", api_routes)
        .route("/.netlify/functions/courses", get(get_course))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
