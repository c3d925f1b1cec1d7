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

use axum::{
    Json, Router,
    extract::{Path, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use corat_api::{
    AccrualOutcome, CallError, CallErrorCode, CycleUpdateEvent, ProvisionOutcome,
    ProvisionUserRequest, ProvisionUserResponse, accrual_audit_event, apply_cycle_update,
    placeholder_email, provision_user,
};
use corat_domain::{CycleSnapshot, Role, StationId, UserProfile};
use corat_persistence::{
    IdentityError, IdentityProvider, MaintenanceStore, NewIdentityUser, PersistenceError,
    SqlitePersistence, StationRecord, StoredAuditEvent,
};

mod caller;
use caller::CallerContext;

/// CORAT Server - HTTP server for the CORAT maintenance backend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Create an initial superuser account on startup
    /// (format: IDENTIFIER:PASSWORD:NAME)
    #[arg(long)]
    bootstrap_superuser: Option<String>,
}

/// Application state shared across handlers.
///
/// This contains the persistence layer wrapped in a Mutex to allow
/// safe concurrent access.
#[derive(Clone)]
struct AppState {
    /// The document store, audit log, and identity provider.
    backend: Arc<Mutex<SqlitePersistence>>,
}

/// Ack returned for fault document writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WriteResponse {
    /// Success indicator.
    success: bool,
}

/// Ack returned for cycle document writes.
///
/// The accrual outcome is reported for observability only: the document
/// write succeeds whether or not hours were accrued.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CycleWriteResponse {
    /// Success indicator for the document write.
    success: bool,
    /// Whether this update accrued hours against a station.
    accrual_applied: bool,
    /// Human-readable accrual outcome.
    detail: String,
}

/// A station with its accumulated hours.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StationResponse {
    /// The fixed station id.
    station_id: String,
    /// The human-readable station name.
    display_name: String,
    /// Total accrued operating hours.
    accumulated_hours: f64,
}

/// API response for listing stations.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ListStationsResponse {
    /// All stations in id order.
    stations: Vec<StationResponse>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// The short error code.
    code: String,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The short error code.
    code: String,
    /// The error message.
    message: String,
}

impl HttpError {
    fn permission_denied(message: &str) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            code: CallErrorCode::PermissionDenied.as_str().to_string(),
            message: message.to_string(),
        }
    }

    fn invalid_argument(message: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: CallErrorCode::InvalidArgument.as_str().to_string(),
            message: message.to_string(),
        }
    }

    fn internal(message: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: CallErrorCode::Internal.as_str().to_string(),
            message: message.to_string(),
        }
    }

    fn not_found(message: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            code: String::from("not-found"),
            message: message.to_string(),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            code: self.code,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<CallError> for HttpError {
    fn from(err: CallError) -> Self {
        let status: StatusCode = match err.code {
            CallErrorCode::PermissionDenied => StatusCode::FORBIDDEN,
            CallErrorCode::InvalidArgument => StatusCode::BAD_REQUEST,
            CallErrorCode::AlreadyExists => StatusCode::CONFLICT,
            CallErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            code: err.code.as_str().to_string(),
            message: err.message,
        }
    }
}

impl From<PersistenceError> for HttpError {
    fn from(err: PersistenceError) -> Self {
        error!(error = %err, "Persistence error");
        Self::internal("An internal server error occurred")
    }
}

/// Converts a `StationRecord` to a `StationResponse`.
fn station_to_response(record: &StationRecord) -> StationResponse {
    StationResponse {
        station_id: record.station_id.as_str().to_string(),
        display_name: record.display_name.clone(),
        accumulated_hours: record.accumulated_hours,
    }
}

/// Handler for PUT `/faults/{fault_id}` endpoint.
///
/// Stores a fault document.
async fn handle_put_fault(
    AxumState(app_state): AxumState<AppState>,
    Path(fault_id): Path<String>,
    Json(document): Json<serde_json::Value>,
) -> Result<Json<WriteResponse>, HttpError> {
    if !document.is_object() {
        return Err(HttpError::invalid_argument("Document must be a JSON object"));
    }

    info!(fault_id = %fault_id, "Handling fault document write");

    let mut backend = app_state.backend.lock().await;
    backend.put_fault(&fault_id, &document)?;
    drop(backend);

    Ok(Json(WriteResponse { success: true }))
}

/// Handler for PUT `/faults/{fault_id}/cycles/{cycle_id}` endpoint.
///
/// Stores a cycle document and fires the accrual handler with the
/// before/after snapshot pair. The accrual reaction has no error surface:
/// a skipped accrual is logged and reported in the ack, never a failure.
async fn handle_put_cycle(
    AxumState(app_state): AxumState<AppState>,
    Path((fault_id, cycle_id)): Path<(String, String)>,
    Json(document): Json<serde_json::Value>,
) -> Result<Json<CycleWriteResponse>, HttpError> {
    if !document.is_object() {
        return Err(HttpError::invalid_argument("Document must be a JSON object"));
    }

    info!(
        fault_id = %fault_id,
        cycle_id = %cycle_id,
        "Handling cycle document write"
    );

    let mut backend = app_state.backend.lock().await;

    let before_raw: Option<serde_json::Value> = backend.get_cycle(&fault_id, &cycle_id)?;
    backend.put_cycle(&fault_id, &cycle_id, &document)?;

    let before: CycleSnapshot = before_raw
        .as_ref()
        .map(CycleSnapshot::from_document)
        .unwrap_or_default();
    let after: CycleSnapshot = CycleSnapshot::from_document(&document);
    let event: CycleUpdateEvent = CycleUpdateEvent::new(fault_id, cycle_id, before, after);

    let outcome: AccrualOutcome = apply_cycle_update(&mut *backend, &event);
    let (accrual_applied, detail): (bool, String) = match &outcome {
        AccrualOutcome::Applied(applied) => {
            if let Err(err) = backend.append_audit_event(&accrual_audit_event(&event, applied)) {
                error!(error = %err, "Failed to append accrual audit event");
            }
            (
                true,
                format!(
                    "accrued {:.2} hours to {}",
                    applied.hours_delta, applied.station
                ),
            )
        }
        AccrualOutcome::Skipped(reason) => (false, reason.to_string()),
    };
    drop(backend);

    Ok(Json(CycleWriteResponse {
        success: true,
        accrual_applied,
        detail,
    }))
}

/// Handler for POST `/users` endpoint.
///
/// The callable provisioning path: requires an authenticated caller with
/// the `superusuario` role claim.
async fn handle_create_user(
    AxumState(app_state): AxumState<AppState>,
    CallerContext(context): CallerContext,
    Json(request): Json<ProvisionUserRequest>,
) -> Result<Json<ProvisionUserResponse>, HttpError> {
    info!(caller = %context.uid, "Handling create-user call");

    let mut backend = app_state.backend.lock().await;
    let outcome: ProvisionOutcome = provision_user(&mut *backend, &context, &request)?;
    if let Err(err) = backend.append_audit_event(&outcome.audit_event) {
        error!(error = %err, "Failed to append provisioning audit event");
    }
    drop(backend);

    info!(uid = %outcome.response.uid, "Successfully provisioned user");
    Ok(Json(outcome.response))
}

/// Handler for GET `/users/{uid}` endpoint.
///
/// Fetches a user profile document.
async fn handle_get_user(
    AxumState(app_state): AxumState<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<UserProfile>, HttpError> {
    let mut backend = app_state.backend.lock().await;
    let profile: Option<UserProfile> = backend.fetch_user_profile(&uid)?;
    drop(backend);

    profile
        .map(Json)
        .ok_or_else(|| HttpError::not_found("User profile not found"))
}

/// Handler for GET `/stations` endpoint.
///
/// Lists all stations with their accumulated hours.
async fn handle_list_stations(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<ListStationsResponse>, HttpError> {
    let mut backend = app_state.backend.lock().await;
    let records: Vec<StationRecord> = backend.list_stations()?;
    drop(backend);

    Ok(Json(ListStationsResponse {
        stations: records.iter().map(station_to_response).collect(),
    }))
}

/// Handler for GET `/stations/{station_id}` endpoint.
///
/// Reads one station's accumulated hours.
async fn handle_get_station(
    AxumState(app_state): AxumState<AppState>,
    Path(station_id): Path<String>,
) -> Result<Json<StationResponse>, HttpError> {
    let station: StationId = station_id
        .parse()
        .map_err(|_| HttpError::invalid_argument("Unknown station id"))?;

    let mut backend = app_state.backend.lock().await;
    let hours: f64 = backend.station_hours(station)?;
    drop(backend);

    Ok(Json(StationResponse {
        station_id: station.as_str().to_string(),
        display_name: station.display_name().to_string(),
        accumulated_hours: hours,
    }))
}

/// Handler for GET `/audit/events` endpoint.
///
/// Lists the audit log in event order.
async fn handle_list_audit_events(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<StoredAuditEvent>>, HttpError> {
    let mut backend = app_state.backend.lock().await;
    let events: Vec<StoredAuditEvent> = backend.list_audit_events()?;
    drop(backend);

    Ok(Json(events))
}

/// Builds the application router.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/faults/{fault_id}", put(handle_put_fault))
        .route(
            "/faults/{fault_id}/cycles/{cycle_id}",
            put(handle_put_cycle),
        )
        .route("/users", post(handle_create_user))
        .route("/users/{uid}", get(handle_get_user))
        .route("/stations", get(handle_list_stations))
        .route("/stations/{station_id}", get(handle_get_station))
        .route("/audit/events", get(handle_list_audit_events))
        .with_state(app_state)
}

/// Creates the initial superuser account if it does not already exist.
///
/// The spec is `IDENTIFIER:PASSWORD:NAME`. Re-running against an existing
/// account is a logged no-op so restarts stay idempotent.
fn bootstrap_superuser(
    backend: &mut SqlitePersistence,
    spec: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let parts: Vec<&str> = spec.splitn(3, ':').collect();
    if parts.len() != 3 || parts.iter().any(|part| part.is_empty()) {
        return Err("--bootstrap-superuser expects IDENTIFIER:PASSWORD:NAME".into());
    }
    let (identifier, password, name): (&str, &str, &str) = (parts[0], parts[1], parts[2]);

    let email: String = placeholder_email(identifier);
    match backend.create_user(&NewIdentityUser {
        email: email.clone(),
        password: password.to_string(),
        display_name: name.to_string(),
    }) {
        Ok(user) => {
            backend.set_role_claim(&user.uid, Role::Superusuario)?;
            backend.write_user_profile(&UserProfile {
                uid: user.uid.clone(),
                name: name.to_string(),
                email,
                role: Role::Superusuario,
                permitted_stations: StationId::ALL.to_vec(),
                personal_phone: None,
                is_first_login: true,
            })?;
            info!(uid = %user.uid, "Bootstrapped superuser account");
        }
        Err(IdentityError::EmailAlreadyExists(_)) => {
            info!(email = %email, "Superuser account already exists, skipping bootstrap");
        }
        Err(err) => return Err(Box::new(err)),
    }
    Ok(())
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

    info!("Initializing CORAT Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let mut backend: SqlitePersistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        SqlitePersistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        SqlitePersistence::new_in_memory()?
    };

    if let Some(spec) = &args.bootstrap_superuser {
        bootstrap_superuser(&mut backend, spec)?;
    }

    let app_state: AppState = AppState {
        backend: Arc::new(Mutex::new(backend)),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
