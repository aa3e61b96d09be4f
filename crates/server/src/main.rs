// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod session;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
};
use clap::Parser;
use prtrack_api::{
    ApiError, CatalogResponse, CommunityStatsResponse, DeleteEntryResponse, EntrySource,
    ListEntriesResponse, ProgressResponse, RecordMilestoneRequest, UpdateEntryRequest,
    WriteEntryResponse, delete_entry, get_catalog, get_community_stats, get_owner_progress,
    list_entries, record_milestone, update_entry,
};
use prtrack_domain::MilestoneCatalog;
use prtrack_persistence::SqlitePersistence;
use serde::{Deserialize, Serialize};
use session::Owner;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use time::{Date, OffsetDateTime};
use tokio::sync::Mutex;
use tracing::{error, info};

/// PR Tracker Server - HTTP server for permanent residency milestone tracking
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(short, long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    bind: IpAddr,

    /// Where timeline entries come from: `database` or `demo`
    #[arg(long, default_value = "database")]
    data_source: EntrySource,
}

/// Application state shared across handlers.
///
/// This contains the persistence layer wrapped in a Mutex to allow
/// safe concurrent access.
#[derive(Clone)]
struct AppState {
    /// The persistence layer for timeline entries.
    persistence: Arc<Mutex<SqlitePersistence>>,
    /// The configured entry source.
    source: EntrySource,
    /// The milestone catalog every response is derived from.
    catalog: &'static MilestoneCatalog,
}

/// Query parameters for the progress endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
struct ProgressQuery {
    /// Report zero progress regardless of recorded entries.
    #[serde(default)]
    force_empty: bool,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct HealthResponse {
    /// Always `ok` while the server is answering.
    status: String,
    /// The configured entry source.
    data_source: String,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::ReadOnlySource { .. } => StatusCode::CONFLICT,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error while handling request");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// The calendar day used for future-date validation and day counts.
fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

/// Handler for GET `/health`.
async fn handle_health(AxumState(app_state): AxumState<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: String::from("ok"),
        data_source: app_state.source.name().to_string(),
    })
}

/// Handler for GET `/catalog`.
async fn handle_get_catalog(AxumState(app_state): AxumState<AppState>) -> Json<CatalogResponse> {
    info!("Handling get_catalog request");

    Json(get_catalog(app_state.catalog))
}

/// Handler for GET `/entries`.
async fn handle_list_entries(
    AxumState(app_state): AxumState<AppState>,
    Owner(owner): Owner,
) -> Result<Json<ListEntriesResponse>, HttpError> {
    info!(owner = %owner, source = %app_state.source, "Handling list_entries request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ListEntriesResponse = list_entries(
        &mut persistence,
        app_state.source,
        &owner,
        app_state.catalog,
        today(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/entries`.
///
/// Recording a milestone type the owner already has replaces that entry.
async fn handle_record_milestone(
    AxumState(app_state): AxumState<AppState>,
    Owner(owner): Owner,
    Json(request): Json<RecordMilestoneRequest>,
) -> Result<Json<WriteEntryResponse>, HttpError> {
    info!(
        owner = %owner,
        entry_type = %request.entry_type,
        entry_date = %request.entry_date,
        "Handling record_milestone request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: WriteEntryResponse = record_milestone(
        &mut persistence,
        app_state.source,
        &owner,
        app_state.catalog,
        request,
        today(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for PUT `/entries/{entry_id}`.
async fn handle_update_entry(
    AxumState(app_state): AxumState<AppState>,
    Owner(owner): Owner,
    Path(entry_id): Path<i64>,
    Json(request): Json<UpdateEntryRequest>,
) -> Result<Json<WriteEntryResponse>, HttpError> {
    info!(owner = %owner, entry_id, "Handling update_entry request");

    let mut persistence = app_state.persistence.lock().await;
    let response: WriteEntryResponse = update_entry(
        &mut persistence,
        app_state.source,
        &owner,
        app_state.catalog,
        entry_id,
        request,
        today(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for DELETE `/entries/{entry_id}`.
async fn handle_delete_entry(
    AxumState(app_state): AxumState<AppState>,
    Owner(owner): Owner,
    Path(entry_id): Path<i64>,
) -> Result<Json<DeleteEntryResponse>, HttpError> {
    info!(owner = %owner, entry_id, "Handling delete_entry request");

    let mut persistence = app_state.persistence.lock().await;
    let response: DeleteEntryResponse = delete_entry(
        &mut persistence,
        app_state.source,
        &owner,
        app_state.catalog,
        entry_id,
        today(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/progress`.
async fn handle_get_progress(
    AxumState(app_state): AxumState<AppState>,
    Owner(owner): Owner,
    Query(query): Query<ProgressQuery>,
) -> Result<Json<ProgressResponse>, HttpError> {
    info!(
        owner = %owner,
        force_empty = query.force_empty,
        "Handling get_progress request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: ProgressResponse = get_owner_progress(
        &mut persistence,
        app_state.source,
        &owner,
        app_state.catalog,
        query.force_empty,
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/stats`.
///
/// Statistics are aggregated across all owners and need no owner header.
async fn handle_get_community_stats(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<CommunityStatsResponse>, HttpError> {
    info!(source = %app_state.source, "Handling get_community_stats request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CommunityStatsResponse = get_community_stats(
        &mut persistence,
        app_state.source,
        app_state.catalog,
        today(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/catalog", get(handle_get_catalog))
        .route(
            "/entries",
            get(handle_list_entries).post(handle_record_milestone),
        )
        .route(
            "/entries/{entry_id}",
            put(handle_update_entry).delete(handle_delete_entry),
        )
        .route("/progress", get(handle_get_progress))
        .route("/stats", get(handle_get_community_stats))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing PR Tracker Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: SqlitePersistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        SqlitePersistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        SqlitePersistence::new_in_memory()?
    };

    info!(source = %args.data_source, "Entry source selected");

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        source: args.data_source,
        catalog: MilestoneCatalog::canonical(),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: SocketAddr = SocketAddr::new(args.bind, args.port);
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use crate::session::OWNER_HEADER;
    use tower::ServiceExt;

    const TEST_OWNER: &str = "device-server-test";

    /// Helper to create test app state with in-memory persistence.
    fn create_test_app_state(source: EntrySource) -> AppState {
        let persistence: SqlitePersistence =
            SqlitePersistence::new_in_memory().expect("Failed to create in-memory persistence");
        AppState {
            persistence: Arc::new(Mutex::new(persistence)),
            source,
            catalog: MilestoneCatalog::canonical(),
        }
    }

    fn record_request(entry_type: &str, entry_date: &str) -> RecordMilestoneRequest {
        RecordMilestoneRequest {
            entry_type: entry_type.to_string(),
            entry_date: entry_date.to_string(),
            notes: None,
        }
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .header(OWNER_HEADER, TEST_OWNER)
            .body(Body::empty())
            .unwrap()
    }

    fn json_request<T: Serialize>(method: &str, uri: &str, body: &T) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .header(OWNER_HEADER, TEST_OWNER)
            .body(Body::from(serde_json::to_string(body).unwrap()))
            .unwrap()
    }

    async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body_bytes).unwrap()
    }

    async fn record(app: &Router, entry_type: &str, entry_date: &str) -> WriteEntryResponse {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/entries",
                &record_request(entry_type, entry_date),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        read_json(response).await
    }

    #[tokio::test]
    async fn test_health_reports_source() {
        let app: Router = build_router(create_test_app_state(EntrySource::Demo));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let health: HealthResponse = read_json(response).await;
        assert_eq!(health.status, "ok");
        assert_eq!(health.data_source, "demo");
    }

    #[tokio::test]
    async fn test_catalog_lists_all_milestones() {
        let app: Router = build_router(create_test_app_state(EntrySource::Database));

        let response = app
            .oneshot(Request::builder().uri("/catalog").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let catalog: CatalogResponse = read_json(response).await;
        assert_eq!(catalog.total_count, 13);
        assert_eq!(catalog.milestones[0].id, "submission");
        assert_eq!(catalog.milestones[12].id, "pr_card");
    }

    #[tokio::test]
    async fn test_entries_require_owner_header() {
        let app: Router = build_router(create_test_app_state(EntrySource::Database));

        let response = app
            .oneshot(Request::builder().uri("/entries").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);
        let error_response: ErrorResponse = read_json(response).await;
        assert!(error_response.error);
        assert!(error_response.message.contains(OWNER_HEADER));
    }

    #[tokio::test]
    async fn test_blank_owner_header_is_rejected() {
        let app: Router = build_router(create_test_app_state(EntrySource::Database));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/progress")
                    .header(OWNER_HEADER, "   ")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_record_then_list_entries() {
        let app: Router = build_router(create_test_app_state(EntrySource::Database));

        let written: WriteEntryResponse = record(&app, "submission", "2025-01-02").await;
        assert!(written.entry_id > 0);
        assert_eq!(written.entry_type, "submission");
        record(&app, "aor", "2025-02-10").await;

        let response = app.oneshot(get_request("/entries")).await.unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let listed: ListEntriesResponse = read_json(response).await;
        assert_eq!(listed.owner_ref, TEST_OWNER);
        let types: Vec<&str> = listed
            .entries
            .iter()
            .map(|e| e.entry_type.as_str())
            .collect();
        assert_eq!(types, vec!["submission", "aor"]);
    }

    #[tokio::test]
    async fn test_entries_are_scoped_to_owner() {
        let app: Router = build_router(create_test_app_state(EntrySource::Database));
        record(&app, "submission", "2025-01-02").await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/entries")
                    .header(OWNER_HEADER, "someone-else")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let listed: ListEntriesResponse = read_json(response).await;
        assert!(listed.entries.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_milestone_is_bad_request() {
        let app: Router = build_router(create_test_app_state(EntrySource::Database));

        let response = app
            .oneshot(json_request(
                "POST",
                "/entries",
                &record_request("landing", "2025-01-02"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_future_date_is_unprocessable() {
        let app: Router = build_router(create_test_app_state(EntrySource::Database));
        let tomorrow: Date = today().next_day().unwrap();
        let entry_date: String = prtrack_domain::format_entry_date(tomorrow);

        let response = app
            .oneshot(json_request(
                "POST",
                "/entries",
                &record_request("submission", &entry_date),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_update_and_delete_entry() {
        let app: Router = build_router(create_test_app_state(EntrySource::Database));
        let written: WriteEntryResponse = record(&app, "submission", "2025-01-02").await;
        let uri: String = format!("/entries/{}", written.entry_id);

        let update: UpdateEntryRequest = UpdateEntryRequest {
            entry_date: String::from("2025-01-03"),
            notes: Some(String::from("Corrected date")),
        };
        let response = app
            .clone()
            .oneshot(json_request("PUT", &uri, &update))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(&uri)
                    .header(OWNER_HEADER, TEST_OWNER)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let deleted: DeleteEntryResponse = read_json(response).await;
        assert_eq!(deleted.entry_id, written.entry_id);

        let response = app.oneshot(get_request("/entries")).await.unwrap();
        let listed: ListEntriesResponse = read_json(response).await;
        assert!(listed.entries.is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_entry_is_not_found() {
        let app: Router = build_router(create_test_app_state(EntrySource::Database));

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/entries/999")
                    .header(OWNER_HEADER, TEST_OWNER)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_progress_reflects_recorded_entries() {
        let app: Router = build_router(create_test_app_state(EntrySource::Database));
        record(&app, "submission", "2025-01-02").await;
        record(&app, "aor", "2025-02-10").await;

        let response = app.clone().oneshot(get_request("/progress")).await.unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let progress: ProgressResponse = read_json(response).await;
        assert_eq!(progress.completed_index, 1);
        assert_eq!(
            progress.next_milestone.map(|m| m.id),
            Some(String::from("biometrics_request"))
        );

        let response = app
            .oneshot(get_request("/progress?force_empty=true"))
            .await
            .unwrap();
        let progress: ProgressResponse = read_json(response).await;
        assert!(progress.progress_fraction.abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_demo_source_rejects_writes() {
        let app: Router = build_router(create_test_app_state(EntrySource::Demo));

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/entries",
                &record_request("submission", "2025-01-02"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::CONFLICT);

        let response = app.oneshot(get_request("/entries")).await.unwrap();
        let listed: ListEntriesResponse = read_json(response).await;
        assert_eq!(listed.entries.len(), 8);
    }

    #[tokio::test]
    async fn test_stats_need_no_owner() {
        let app: Router = build_router(create_test_app_state(EntrySource::Database));
        record(&app, "submission", "2025-01-02").await;
        record(&app, "aor", "2025-02-10").await;

        let response = app
            .oneshot(Request::builder().uri("/stats").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let stats: CommunityStatsResponse = read_json(response).await;
        assert_eq!(stats.tracked_owners, 1);
        assert_eq!(stats.milestones.len(), 1);
        assert_eq!(stats.milestones[0].entry_type, "aor");
        assert_eq!(stats.milestones[0].min_days, 39);
    }

    #[test]
    fn test_api_errors_map_to_status_codes() {
        let cases: Vec<(ApiError, StatusCode)> = vec![
            (
                ApiError::ReadOnlySource {
                    source_name: String::from("demo"),
                },
                StatusCode::CONFLICT,
            ),
            (
                ApiError::Internal {
                    message: String::from("boom"),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::AuthenticationFailed {
                    reason: String::from("no owner"),
                },
                StatusCode::UNAUTHORIZED,
            ),
        ];

        for (err, expected) in cases {
            let http: HttpError = HttpError::from(err);
            assert_eq!(http.status, expected);
        }
    }
}
