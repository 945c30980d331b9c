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
    body::Body,
    extract::{Path, Query, State as AxumState},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::{Duration, OffsetDateTime};
use tokio::sync::Mutex;
use tracing::{error, info};

use helpdesk_api::{
    ApiError, AuthenticatedActor, CreateCommentRequest, CreateTicketRequest, ForceAssignRequest,
    LoginRequest, RegisterRequest, TokenService, UpdateCommentRequest, UpdateTicketStatusRequest,
    UpdateUserRequest, assign_ticket_to_self, create_comment, create_ticket, force_assign_ticket,
    generate_ticket_report, get_comment, get_ticket, get_user, list_agent_tickets,
    list_unassigned_tickets, list_users, login, register_user, update_comment,
    update_ticket_status, update_user,
};
use helpdesk_domain::Email;
use helpdesk_persistence::Persistence;

/// Helpdesk Server - HTTP server for the helpdesk ticketing system
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

    /// Secret used to sign bearer tokens
    #[arg(long)]
    jwt_secret: String,

    /// Token lifetime in hours. Omit to issue non-expiring tokens.
    #[arg(long)]
    token_lifetime_hours: Option<i64>,

    /// Root admin email, created at startup if no admin exists
    #[arg(long)]
    admin_email: Option<String>,

    /// Root admin password, used only when the root admin is created
    #[arg(long)]
    admin_password: Option<String>,
}

/// Application state shared across handlers.
///
/// This contains the persistence layer wrapped in a Mutex to allow
/// safe concurrent access, plus the token service.
#[derive(Clone)]
struct AppState {
    /// The persistence layer for users, tickets, and comments.
    persistence: Arc<Mutex<Persistence>>,
    /// The token issuance and validation service.
    tokens: Arc<TokenService>,
}

/// Success envelope wrapping every JSON response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Envelope<T> {
    /// Success indicator, always `true` here.
    success: bool,
    /// A human-readable message.
    message: String,
    /// The response payload.
    data: T,
}

fn envelope<T>(message: &str, data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        message: message.to_string(),
        data,
    })
}

/// A single error entry in the failure envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorDetail {
    /// The error message.
    message: String,
    /// The offending field, for validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

/// Failure envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorBody {
    /// Success indicator, always `false` here.
    success: bool,
    /// The error entries.
    error: Vec<ErrorDetail>,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error detail carried in the failure envelope.
    detail: ErrorDetail,
}

impl HttpError {
    fn unauthenticated(message: &str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            detail: ErrorDetail {
                message: message.to_string(),
                field: None,
            },
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorBody> = Json(ErrorBody {
            success: false,
            error: vec![self.detail],
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let (status, field): (StatusCode, Option<String>) = match &err {
            ApiError::NotFound { .. } => (StatusCode::NOT_FOUND, None),
            ApiError::Unauthenticated { .. } => (StatusCode::UNAUTHORIZED, None),
            ApiError::DependencyUnavailable { .. } => (StatusCode::SERVICE_UNAVAILABLE, None),
            ApiError::Internal { message } => {
                error!("Internal error: {}", message);
                return Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    detail: ErrorDetail {
                        message: String::from("Internal server error"),
                        field: None,
                    },
                };
            }
            ApiError::ValidationFailed { field, .. } => {
                (StatusCode::BAD_REQUEST, Some(field.clone()))
            }
            ApiError::PermissionDenied { .. }
            | ApiError::InvalidCredentials
            | ApiError::DuplicateIdentity { .. }
            | ApiError::InvalidArgument { .. } => (StatusCode::BAD_REQUEST, None),
        };
        Self {
            status,
            detail: ErrorDetail {
                message: err.to_string(),
                field,
            },
        }
    }
}

/// Extracts the bearer token from the Authorization header, if present.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Authenticates the caller from the Authorization header.
fn require_actor(state: &AppState, headers: &HeaderMap) -> Result<AuthenticatedActor, HttpError> {
    let token: &str = bearer_token(headers)
        .ok_or_else(|| HttpError::unauthenticated("Missing bearer token"))?;
    state
        .tokens
        .authenticate(token)
        .map_err(|e| HttpError::from(ApiError::from(e)))
}

/// Authenticates the caller if a token is supplied.
///
/// A missing header is fine; a present but invalid token is not.
fn optional_actor(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<AuthenticatedActor>, HttpError> {
    match bearer_token(headers) {
        None => Ok(None),
        Some(token) => state
            .tokens
            .authenticate(token)
            .map(Some)
            .map_err(|e| HttpError::from(ApiError::from(e))),
    }
}

/// Query parameters for the closed-ticket report.
#[derive(Debug, Deserialize)]
struct ReportQuery {
    /// The rendering format, `csv` or `text`.
    format: Option<String>,
}

/// Handler for POST `/users/register`.
///
/// Anonymous registration creates customers; elevated roles require an
/// admin bearer token. The 201 body carries a token for the new user.
async fn handle_register(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, HttpError> {
    info!(email = %req.email, "Handling register request");

    let actor: Option<AuthenticatedActor> = optional_actor(&state, &headers)?;
    let persistence = state.persistence.lock().await;
    let response = register_user(
        &persistence,
        &state.tokens,
        &req,
        actor.as_ref(),
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok((
        StatusCode::CREATED,
        envelope("User registered successfully", response),
    ))
}

/// Handler for POST `/users/login`.
async fn handle_login(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, HttpError> {
    info!(email = %req.email, "Handling login request");

    let persistence = state.persistence.lock().await;
    let response = login(&persistence, &state.tokens, &req, OffsetDateTime::now_utc())?;
    drop(persistence);

    Ok(envelope("Login successful", response))
}

/// Handler for GET `/users`.
async fn handle_list_users(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, HttpError> {
    let actor: AuthenticatedActor = require_actor(&state, &headers)?;

    let persistence = state.persistence.lock().await;
    let response = list_users(&persistence, &actor)?;
    drop(persistence);

    Ok(envelope("OK", response))
}

/// Handler for GET `/users/{user_id}`.
async fn handle_get_user(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, HttpError> {
    let actor: AuthenticatedActor = require_actor(&state, &headers)?;

    let persistence = state.persistence.lock().await;
    let response = get_user(&persistence, user_id, &actor)?;
    drop(persistence);

    Ok(envelope("OK", response))
}

/// Handler for PUT `/users/{user_id}`.
async fn handle_update_user(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let actor: AuthenticatedActor = require_actor(&state, &headers)?;

    let persistence = state.persistence.lock().await;
    let response = update_user(&persistence, user_id, &req, &actor)?;
    drop(persistence);

    Ok(envelope("User updated successfully", response))
}

/// Handler for POST `/tickets`.
async fn handle_create_ticket(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateTicketRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let actor: AuthenticatedActor = require_actor(&state, &headers)?;
    info!(user_id = actor.id, "Handling create_ticket request");

    let persistence = state.persistence.lock().await;
    let response = create_ticket(&persistence, &req, &actor, OffsetDateTime::now_utc())?;
    drop(persistence);

    Ok((
        StatusCode::CREATED,
        envelope("Ticket created successfully", response),
    ))
}

/// Handler for GET `/tickets/unassigned`.
async fn handle_list_unassigned(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, HttpError> {
    let actor: AuthenticatedActor = require_actor(&state, &headers)?;

    let persistence = state.persistence.lock().await;
    let response = list_unassigned_tickets(&persistence, &actor)?;
    drop(persistence);

    Ok(envelope("OK", response))
}

/// Handler for GET `/tickets/assigned`.
///
/// Lists the calling agent's workload.
async fn handle_list_assigned(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, HttpError> {
    let actor: AuthenticatedActor = require_actor(&state, &headers)?;

    let persistence = state.persistence.lock().await;
    let response = list_agent_tickets(&persistence, &actor)?;
    drop(persistence);

    Ok(envelope("OK", response))
}

/// Handler for GET `/tickets/{ticket_id}`.
async fn handle_get_ticket(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Path(ticket_id): Path<i64>,
) -> Result<impl IntoResponse, HttpError> {
    let actor: AuthenticatedActor = require_actor(&state, &headers)?;

    let persistence = state.persistence.lock().await;
    let response = get_ticket(&persistence, ticket_id, &actor)?;
    drop(persistence);

    Ok(envelope("OK", response))
}

/// Handler for POST `/tickets/{ticket_id}/assign`.
///
/// The calling agent claims the ticket for themselves.
async fn handle_self_assign(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Path(ticket_id): Path<i64>,
) -> Result<impl IntoResponse, HttpError> {
    let actor: AuthenticatedActor = require_actor(&state, &headers)?;
    info!(
        ticket_id = ticket_id,
        agent_id = actor.id,
        "Handling self-assign request"
    );

    let persistence = state.persistence.lock().await;
    let response = assign_ticket_to_self(&persistence, ticket_id, &actor)?;
    drop(persistence);

    Ok(envelope("Ticket assigned successfully", response))
}

/// Handler for PUT `/tickets/{ticket_id}/status`.
async fn handle_update_ticket_status(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Path(ticket_id): Path<i64>,
    Json(req): Json<UpdateTicketStatusRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let actor: AuthenticatedActor = require_actor(&state, &headers)?;

    let persistence = state.persistence.lock().await;
    let response = update_ticket_status(
        &persistence,
        ticket_id,
        &req,
        &actor,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(envelope("Ticket updated successfully", response))
}

/// Handler for POST `/tickets/assign`.
///
/// Admin-only assignment of any ticket to any agent.
async fn handle_force_assign(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<ForceAssignRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let actor: AuthenticatedActor = require_actor(&state, &headers)?;
    info!(
        ticket_id = req.ticket_id,
        agent_id = req.agent_id,
        "Handling force-assign request"
    );

    let persistence = state.persistence.lock().await;
    let response = force_assign_ticket(&persistence, &req, &actor)?;
    drop(persistence);

    Ok(envelope("Ticket assigned successfully", response))
}

/// Handler for POST `/tickets/{ticket_id}/comments`.
async fn handle_create_comment(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Path(ticket_id): Path<i64>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let actor: AuthenticatedActor = require_actor(&state, &headers)?;

    let persistence = state.persistence.lock().await;
    let response = create_comment(
        &persistence,
        ticket_id,
        &req,
        &actor,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok((
        StatusCode::CREATED,
        envelope("Comment created successfully", response),
    ))
}

/// Handler for GET `/comments/{comment_id}`.
async fn handle_get_comment(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Path(comment_id): Path<i64>,
) -> Result<impl IntoResponse, HttpError> {
    let actor: AuthenticatedActor = require_actor(&state, &headers)?;

    let persistence = state.persistence.lock().await;
    let response = get_comment(&persistence, comment_id, &actor)?;
    drop(persistence);

    Ok(envelope("OK", response))
}

/// Handler for PUT `/comments/{comment_id}`.
async fn handle_update_comment(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Path(comment_id): Path<i64>,
    Json(req): Json<UpdateCommentRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let actor: AuthenticatedActor = require_actor(&state, &headers)?;

    let persistence = state.persistence.lock().await;
    let response = update_comment(&persistence, comment_id, &req, &actor)?;
    drop(persistence);

    Ok(envelope("Comment updated successfully", response))
}

/// Handler for GET `/reports/tickets`.
///
/// Streams the rendered report back as a file attachment rather than a
/// JSON envelope.
async fn handle_ticket_report(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Query(query): Query<ReportQuery>,
) -> Result<Response, HttpError> {
    let actor: AuthenticatedActor = require_actor(&state, &headers)?;

    let format: String = query.format.ok_or_else(|| {
        HttpError::from(ApiError::InvalidArgument {
            message: String::from("Missing report format. Must be csv or text"),
        })
    })?;

    let persistence = state.persistence.lock().await;
    let document = generate_ticket_report(&persistence, &format, &actor, OffsetDateTime::now_utc())?;
    drop(persistence);

    let disposition: String = format!("attachment; filename=\"{}\"", document.filename);
    Ok((
        [
            (header::CONTENT_TYPE, document.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from(document.bytes),
    )
        .into_response())
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/users/register", post(handle_register))
        .route("/users/login", post(handle_login))
        .route("/users", get(handle_list_users))
        .route("/users/{user_id}", get(handle_get_user))
        .route("/users/{user_id}", put(handle_update_user))
        .route("/tickets", post(handle_create_ticket))
        .route("/tickets/unassigned", get(handle_list_unassigned))
        .route("/tickets/assigned", get(handle_list_assigned))
        .route("/tickets/assign", post(handle_force_assign))
        .route("/tickets/{ticket_id}", get(handle_get_ticket))
        .route("/tickets/{ticket_id}/assign", post(handle_self_assign))
        .route("/tickets/{ticket_id}/status", put(handle_update_ticket_status))
        .route("/tickets/{ticket_id}/comments", post(handle_create_comment))
        .route("/comments/{comment_id}", get(handle_get_comment))
        .route("/comments/{comment_id}", put(handle_update_comment))
        .route("/reports/tickets", get(handle_ticket_report))
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

    info!("Initializing Helpdesk Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    // Bootstrap the root admin, explicitly and idempotently, before
    // the server starts taking requests.
    if let (Some(admin_email), Some(admin_password)) = (&args.admin_email, &args.admin_password) {
        let created: bool = persistence.ensure_root_admin(
            &Email::new(admin_email),
            admin_password,
            OffsetDateTime::now_utc(),
        )?;
        if created {
            info!("Root admin created: {}", admin_email);
        }
    } else {
        info!("No root admin credentials supplied; skipping bootstrap");
    }

    let tokens: TokenService = TokenService::new(
        &args.jwt_secret,
        args.token_lifetime_hours.map(Duration::hours),
    );

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        tokens: Arc::new(tokens),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
