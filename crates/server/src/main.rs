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
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use clap::Parser;
use crewcall::StaffingPolicy;
use crewcall_api::{
    ActingAdmin, ApiError, AssignWorkerRequest, AssignmentResponse, AuditEventInfo,
    BulkAssignRequest, BulkAssignResponse, CreateCertificationRequest, CreateEventRequest,
    CreateEventResponse, CreateReferenceResponse, CreateSkillRequest, CreateVenueRequest,
    CreateWorkerRequest, EligibilityResponse, EventStaffingResponse, GrantCertificationRequest,
    ListWorkersResponse, MarkNoShowRequest, RecordCompletionRequest, ReplaceRequirementsRequest,
    ScheduleInfo, SetScheduleRequest, SetWorkerActiveRequest, ShiftSyncResponse,
    StaffingConfig, TransitionStatusRequest, TransitionStatusResponse, UnassignRequest,
    WriteResponse,
};
use crewcall_audit::Cause;
use crewcall_domain::{RoleGroupProgress, ShiftStaffingProgress};
use crewcall_persistence::Persistence;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// `CrewCall` Server - HTTP server for catering event staffing
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
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Hard cap on hours recorded for a single shift
    #[arg(long, default_value_t = 24.0)]
    max_hours_per_shift: f64,

    /// Reject workers already booked on an overlapping shift
    #[arg(long)]
    enforce_overlap: bool,

    /// Hourly rate used when neither the request nor the requirement sets one
    #[arg(long)]
    default_hourly_rate: Option<f64>,
}

impl Args {
    const fn staffing_config(&self) -> StaffingConfig {
        StaffingConfig {
            max_hours_per_shift: self.max_hours_per_shift,
            enforce_overlap: self.enforce_overlap,
            default_hourly_rate: self.default_hourly_rate,
        }
    }
}

/// Application state shared across handlers.
///
/// Writes are serialized through the mutex; the active-assignment index in
/// the store still guards against a second process sharing the file.
#[derive(Clone)]
struct AppState {
    persistence: Arc<Mutex<Persistence>>,
    policy: StaffingPolicy,
}

/// Envelope for every write: who is acting and why, plus the request body.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct WriteApiRequest<T> {
    /// The admin performing this action.
    actor_id: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
    #[serde(flatten)]
    body: T,
}

/// Body of writes that carry nothing beyond the envelope.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
struct EmptyBody {}

impl<T> WriteApiRequest<T> {
    /// Splits the envelope into the acting admin, the cause and the body.
    fn into_parts(self) -> Result<(ActingAdmin, Cause, T), HttpError> {
        if self.actor_id.trim().is_empty() {
            return Err(HttpError {
                status: StatusCode::BAD_REQUEST,
                message: String::from("actor_id must not be empty"),
            });
        }
        Ok((
            ActingAdmin::new(self.actor_id),
            Cause::new(self.cause_id, self.cause_description),
            self.body,
        ))
    }
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
        let status: StatusCode = match err {
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::IneligibleWorker { .. } | ApiError::InvalidTransition { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::PreconditionFailed { .. } => StatusCode::PRECONDITION_FAILED,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(status = %status, error = %err, "Request failed");
        } else {
            warn!(status = %status, error = %err, "Request rejected");
        }
        Self {
            status,
            message: err.to_string(),
        }
    }
}

// ============================================================================
// Reference data
// ============================================================================

/// Handler for POST `/skills` endpoint.
async fn handle_create_skill(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<WriteApiRequest<CreateSkillRequest>>,
) -> Result<Json<CreateReferenceResponse>, HttpError> {
    let (admin, cause, body) = req.into_parts()?;
    info!(actor_id = %admin.id, name = %body.name, "Handling create_skill request");

    let mut persistence = app_state.persistence.lock().await;
    let response = crewcall_api::create_skill(&mut persistence, &body, &admin, cause)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/certifications` endpoint.
async fn handle_create_certification(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<WriteApiRequest<CreateCertificationRequest>>,
) -> Result<Json<CreateReferenceResponse>, HttpError> {
    let (admin, cause, body) = req.into_parts()?;
    info!(actor_id = %admin.id, name = %body.name, "Handling create_certification request");

    let mut persistence = app_state.persistence.lock().await;
    let response = crewcall_api::create_certification(&mut persistence, &body, &admin, cause)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/venues` endpoint.
async fn handle_create_venue(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<WriteApiRequest<CreateVenueRequest>>,
) -> Result<Json<CreateReferenceResponse>, HttpError> {
    let (admin, cause, body) = req.into_parts()?;
    info!(actor_id = %admin.id, name = %body.name, "Handling create_venue request");

    let mut persistence = app_state.persistence.lock().await;
    let response = crewcall_api::create_venue(&mut persistence, &body, &admin, cause)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/workers` endpoint.
async fn handle_create_worker(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<WriteApiRequest<CreateWorkerRequest>>,
) -> Result<Json<CreateReferenceResponse>, HttpError> {
    let (admin, cause, body) = req.into_parts()?;
    info!(actor_id = %admin.id, name = %body.name, "Handling create_worker request");

    let mut persistence = app_state.persistence.lock().await;
    let response = crewcall_api::create_worker(&mut persistence, &body, &admin, cause)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/workers` endpoint.
async fn handle_list_workers(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<ListWorkersResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = crewcall_api::list_workers(&mut persistence)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/workers/{worker_id}/certifications` endpoint.
async fn handle_grant_certification(
    AxumState(app_state): AxumState<AppState>,
    Path(worker_id): Path<i64>,
    Json(req): Json<WriteApiRequest<GrantCertificationRequest>>,
) -> Result<Json<WriteResponse>, HttpError> {
    let (admin, cause, body) = req.into_parts()?;
    info!(
        actor_id = %admin.id,
        worker_id,
        certification_id = body.certification_id,
        "Handling grant_certification request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response =
        crewcall_api::grant_certification(&mut persistence, worker_id, &body, &admin, cause)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/workers/{worker_id}/active` endpoint.
async fn handle_set_worker_active(
    AxumState(app_state): AxumState<AppState>,
    Path(worker_id): Path<i64>,
    Json(req): Json<WriteApiRequest<SetWorkerActiveRequest>>,
) -> Result<Json<WriteResponse>, HttpError> {
    let (admin, cause, body) = req.into_parts()?;
    info!(actor_id = %admin.id, worker_id, active = body.active, "Handling set_worker_active request");

    let mut persistence = app_state.persistence.lock().await;
    let response =
        crewcall_api::set_worker_active(&mut persistence, worker_id, &body, &admin, cause)?;
    drop(persistence);

    Ok(Json(response))
}

// ============================================================================
// Events
// ============================================================================

/// Handler for POST `/events` endpoint.
///
/// Creates a draft event with its schedule and requirements.
async fn handle_create_event(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<WriteApiRequest<CreateEventRequest>>,
) -> Result<Json<CreateEventResponse>, HttpError> {
    let (admin, cause, body) = req.into_parts()?;
    info!(actor_id = %admin.id, title = %body.title, venue_id = body.venue_id, "Handling create_event request");

    let mut persistence = app_state.persistence.lock().await;
    let response = crewcall_api::create_event(&mut persistence, &body, &admin, cause)?;
    drop(persistence);

    info!(event_id = response.event_id, "Successfully created event");
    Ok(Json(response))
}

/// Handler for PUT `/events/{event_id}/requirements` endpoint.
async fn handle_replace_requirements(
    AxumState(app_state): AxumState<AppState>,
    Path(event_id): Path<i64>,
    Json(req): Json<WriteApiRequest<ReplaceRequirementsRequest>>,
) -> Result<Json<WriteResponse>, HttpError> {
    let (admin, cause, body) = req.into_parts()?;
    info!(actor_id = %admin.id, event_id, "Handling replace_requirements request");

    let mut persistence = app_state.persistence.lock().await;
    let response =
        crewcall_api::replace_requirements(&mut persistence, event_id, &body, &admin, cause)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for PUT `/events/{event_id}/schedule` endpoint.
async fn handle_set_schedule(
    AxumState(app_state): AxumState<AppState>,
    Path(event_id): Path<i64>,
    Json(req): Json<WriteApiRequest<SetScheduleRequest>>,
) -> Result<Json<ScheduleInfo>, HttpError> {
    let (admin, cause, body) = req.into_parts()?;
    info!(actor_id = %admin.id, event_id, "Handling set_schedule request");

    let mut persistence = app_state.persistence.lock().await;
    let response = crewcall_api::set_schedule(&mut persistence, event_id, &body, &admin, cause)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/events/{event_id}/status` endpoint.
async fn handle_transition_event_status(
    AxumState(app_state): AxumState<AppState>,
    Path(event_id): Path<i64>,
    Json(req): Json<WriteApiRequest<TransitionStatusRequest>>,
) -> Result<Json<TransitionStatusResponse>, HttpError> {
    let (admin, cause, body) = req.into_parts()?;
    info!(actor_id = %admin.id, event_id, requested = %body.status, "Handling transition_event_status request");

    let mut persistence = app_state.persistence.lock().await;
    let response = crewcall_api::transition_event_status(
        &mut persistence,
        event_id,
        &body,
        &admin,
        cause,
        &app_state.policy,
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/events/{event_id}/shifts/generate` endpoint.
///
/// Regenerates shifts; shifts holding an active assignment survive.
async fn handle_generate_shifts(
    AxumState(app_state): AxumState<AppState>,
    Path(event_id): Path<i64>,
    Json(req): Json<WriteApiRequest<EmptyBody>>,
) -> Result<Json<ShiftSyncResponse>, HttpError> {
    let (admin, cause, _) = req.into_parts()?;
    info!(actor_id = %admin.id, event_id, "Handling generate_shifts request");

    let mut persistence = app_state.persistence.lock().await;
    let response = crewcall_api::generate_shifts(
        &mut persistence,
        event_id,
        &admin,
        cause,
        &app_state.policy,
    )?;
    drop(persistence);

    info!(
        event_id,
        created = response.created,
        deleted = response.deleted_shift_ids.len(),
        retained = response.retained_shift_ids.len(),
        "Shifts generated"
    );
    Ok(Json(response))
}

/// Handler for POST `/events/{event_id}/shifts/repair` endpoint.
async fn handle_repair_shifts(
    AxumState(app_state): AxumState<AppState>,
    Path(event_id): Path<i64>,
    Json(req): Json<WriteApiRequest<EmptyBody>>,
) -> Result<Json<ShiftSyncResponse>, HttpError> {
    let (admin, cause, _) = req.into_parts()?;
    info!(actor_id = %admin.id, event_id, "Handling repair_shifts request");

    let mut persistence = app_state.persistence.lock().await;
    let response =
        crewcall_api::repair_shifts(&mut persistence, event_id, &admin, cause, &app_state.policy)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/events/{event_id}/staffing` endpoint.
async fn handle_get_event_staffing(
    AxumState(app_state): AxumState<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Json<EventStaffingResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = crewcall_api::get_event_staffing(&mut persistence, event_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/events/{event_id}/roles/{role}/staffing` endpoint.
async fn handle_get_role_staffing(
    AxumState(app_state): AxumState<AppState>,
    Path((event_id, role)): Path<(i64, String)>,
) -> Result<Json<RoleGroupProgress>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = crewcall_api::get_role_staffing(&mut persistence, event_id, &role)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/events/{event_id}/audit` endpoint.
async fn handle_list_audit_events(
    AxumState(app_state): AxumState<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Json<Vec<AuditEventInfo>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = crewcall_api::list_audit_events(&mut persistence, event_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/events/{event_id}/timesheet.csv` endpoint.
async fn handle_export_timesheet(
    AxumState(app_state): AxumState<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Response, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let csv: String = crewcall_api::export_timesheet(&mut persistence, event_id)?;
    drop(persistence);

    Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], csv).into_response())
}

// ============================================================================
// Shifts
// ============================================================================

/// Handler for GET `/shifts/{shift_id}/staffing` endpoint.
async fn handle_get_shift_staffing(
    AxumState(app_state): AxumState<AppState>,
    Path(shift_id): Path<i64>,
) -> Result<Json<ShiftStaffingProgress>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response = crewcall_api::get_shift_staffing(&mut persistence, shift_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/shifts/{shift_id}/status` endpoint.
async fn handle_transition_shift_status(
    AxumState(app_state): AxumState<AppState>,
    Path(shift_id): Path<i64>,
    Json(req): Json<WriteApiRequest<TransitionStatusRequest>>,
) -> Result<Json<TransitionStatusResponse>, HttpError> {
    let (admin, cause, body) = req.into_parts()?;
    info!(actor_id = %admin.id, shift_id, requested = %body.status, "Handling transition_shift_status request");

    let mut persistence = app_state.persistence.lock().await;
    let response = crewcall_api::transition_shift_status(
        &mut persistence,
        shift_id,
        &body,
        &admin,
        cause,
        &app_state.policy,
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/shifts/{shift_id}/eligibility/{worker_id}` endpoint.
///
/// Lists every rule the worker fails, without writing anything.
async fn handle_preview_eligibility(
    AxumState(app_state): AxumState<AppState>,
    Path((shift_id, worker_id)): Path<(i64, i64)>,
) -> Result<Json<EligibilityResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response =
        crewcall_api::preview_eligibility(&mut persistence, shift_id, worker_id, &app_state.policy)?;
    drop(persistence);

    Ok(Json(response))
}

// ============================================================================
// Assignments
// ============================================================================

/// Handler for POST `/assignments` endpoint.
async fn handle_assign_worker(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<WriteApiRequest<AssignWorkerRequest>>,
) -> Result<Json<AssignmentResponse>, HttpError> {
    let (admin, cause, body) = req.into_parts()?;
    info!(
        actor_id = %admin.id,
        shift_id = body.shift_id,
        worker_id = body.worker_id,
        "Handling assign_worker request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response =
        crewcall_api::assign_worker(&mut persistence, &body, &admin, cause, &app_state.policy)?;
    drop(persistence);

    info!(
        assignment_id = response.assignment.assignment_id,
        "Successfully assigned worker"
    );
    Ok(Json(response))
}

/// Handler for POST `/assignments/bulk` endpoint.
///
/// Per-shift failures are reported in the body; the status is 200 unless
/// the request itself is malformed.
async fn handle_bulk_assign(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<WriteApiRequest<BulkAssignRequest>>,
) -> Result<Json<BulkAssignResponse>, HttpError> {
    let (admin, cause, body) = req.into_parts()?;
    info!(
        actor_id = %admin.id,
        workers = body.worker_ids.len(),
        shifts = body.shift_ids.len(),
        "Handling bulk_assign request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response =
        crewcall_api::bulk_assign(&mut persistence, &body, &admin, &cause, &app_state.policy)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/assignments/{assignment_id}/confirm` endpoint.
async fn handle_confirm_assignment(
    AxumState(app_state): AxumState<AppState>,
    Path(assignment_id): Path<i64>,
    Json(req): Json<WriteApiRequest<EmptyBody>>,
) -> Result<Json<AssignmentResponse>, HttpError> {
    let (admin, cause, _) = req.into_parts()?;
    info!(actor_id = %admin.id, assignment_id, "Handling confirm_assignment request");

    let mut persistence = app_state.persistence.lock().await;
    let response = crewcall_api::confirm_assignment(
        &mut persistence,
        assignment_id,
        &admin,
        cause,
        &app_state.policy,
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/assignments/{assignment_id}/unassign` endpoint.
async fn handle_unassign(
    AxumState(app_state): AxumState<AppState>,
    Path(assignment_id): Path<i64>,
    Json(req): Json<WriteApiRequest<UnassignRequest>>,
) -> Result<Json<AssignmentResponse>, HttpError> {
    let (admin, cause, body) = req.into_parts()?;
    info!(actor_id = %admin.id, assignment_id, "Handling unassign request");

    let mut persistence = app_state.persistence.lock().await;
    let response = crewcall_api::unassign(
        &mut persistence,
        assignment_id,
        &body,
        &admin,
        cause,
        &app_state.policy,
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/assignments/{assignment_id}/no_show` endpoint.
async fn handle_mark_no_show(
    AxumState(app_state): AxumState<AppState>,
    Path(assignment_id): Path<i64>,
    Json(req): Json<WriteApiRequest<MarkNoShowRequest>>,
) -> Result<Json<AssignmentResponse>, HttpError> {
    let (admin, cause, body) = req.into_parts()?;
    info!(actor_id = %admin.id, assignment_id, "Handling mark_no_show request");

    let mut persistence = app_state.persistence.lock().await;
    let response = crewcall_api::mark_no_show(
        &mut persistence,
        assignment_id,
        &body,
        &admin,
        cause,
        &app_state.policy,
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/assignments/{assignment_id}/completion` endpoint.
async fn handle_record_completion(
    AxumState(app_state): AxumState<AppState>,
    Path(assignment_id): Path<i64>,
    Json(req): Json<WriteApiRequest<RecordCompletionRequest>>,
) -> Result<Json<AssignmentResponse>, HttpError> {
    let (admin, cause, body) = req.into_parts()?;
    info!(
        actor_id = %admin.id,
        assignment_id,
        hours_worked = body.hours_worked,
        "Handling record_completion request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response = crewcall_api::record_completion(
        &mut persistence,
        assignment_id,
        &body,
        &admin,
        cause,
        &app_state.policy,
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/skills", post(handle_create_skill))
        .route("/certifications", post(handle_create_certification))
        .route("/venues", post(handle_create_venue))
        .route("/workers", post(handle_create_worker).get(handle_list_workers))
        .route(
            "/workers/{worker_id}/certifications",
            post(handle_grant_certification),
        )
        .route("/workers/{worker_id}/active", post(handle_set_worker_active))
        .route("/events", post(handle_create_event))
        .route(
            "/events/{event_id}/requirements",
            put(handle_replace_requirements),
        )
        .route("/events/{event_id}/schedule", put(handle_set_schedule))
        .route(
            "/events/{event_id}/status",
            post(handle_transition_event_status),
        )
        .route(
            "/events/{event_id}/shifts/generate",
            post(handle_generate_shifts),
        )
        .route(
            "/events/{event_id}/shifts/repair",
            post(handle_repair_shifts),
        )
        .route("/events/{event_id}/staffing", get(handle_get_event_staffing))
        .route(
            "/events/{event_id}/roles/{role}/staffing",
            get(handle_get_role_staffing),
        )
        .route("/events/{event_id}/audit", get(handle_list_audit_events))
        .route(
            "/events/{event_id}/timesheet.csv",
            get(handle_export_timesheet),
        )
        .route("/shifts/{shift_id}/staffing", get(handle_get_shift_staffing))
        .route(
            "/shifts/{shift_id}/status",
            post(handle_transition_shift_status),
        )
        .route(
            "/shifts/{shift_id}/eligibility/{worker_id}",
            get(handle_preview_eligibility),
        )
        .route("/assignments", post(handle_assign_worker))
        .route("/assignments/bulk", post(handle_bulk_assign))
        .route(
            "/assignments/{assignment_id}/confirm",
            post(handle_confirm_assignment),
        )
        .route(
            "/assignments/{assignment_id}/unassign",
            post(handle_unassign),
        )
        .route(
            "/assignments/{assignment_id}/no_show",
            post(handle_mark_no_show),
        )
        .route(
            "/assignments/{assignment_id}/completion",
            post(handle_record_completion),
        )
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

    info!("Initializing CrewCall Server");

    let policy: StaffingPolicy = StaffingPolicy::try_from(args.staffing_config())?;
    info!(
        max_hours_per_shift = policy.hours.max_hours_per_shift,
        enforce_overlap = policy.eligibility.enforce_overlap,
        default_hourly_rate = ?policy.default_hourly_rate,
        "Staffing policy loaded"
    );

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        policy,
    };

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
