// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API operation handlers.
//!
//! Each handler enforces authorization before touching storage,
//! translates inner-layer errors into [`ApiError`], and returns wire
//! DTOs. Transport concerns (routing, status codes, token extraction)
//! live in the server crate.

use time::{Duration, OffsetDateTime};
use tracing::info;

use helpdesk::{
    Actor, DenyReason, apply_status, assign_agent, can_assign_ticket_to_self, can_create_comment,
    can_create_ticket, can_edit_comment, can_edit_user, can_force_assign_ticket,
    can_generate_report, can_list_all_users, can_list_unassigned_tickets,
    can_update_ticket_status, can_view_ticket, can_view_user, check_comment_order,
};
use helpdesk_domain::{
    Comment, Email, Role, Ticket, TicketStatus, validate_comment_text, validate_email,
    validate_password, validate_ticket_fields,
};
use helpdesk_persistence::{Persistence, verify_password};

use crate::auth::{AuthenticatedActor, TokenService};
use crate::error::ApiError;
use crate::report::{ReportDocument, ReportFormat, render};
use crate::request_response::{
    CommentResponse, CreateCommentRequest, CreateTicketRequest, ForceAssignRequest, LoginRequest,
    LoginResponse, RegisterRequest, TicketResponse, UpdateCommentRequest, UpdateTicketStatusRequest,
    UpdateUserRequest, UserResponse,
};

/// How far back the closed-ticket report reaches.
const REPORT_WINDOW: Duration = Duration::days(30);

/// Registers a new user and issues their first bearer token.
///
/// Anonymous callers may only register customers. Requesting an
/// elevated role (agent or admin) requires an authenticated admin
/// caller. The token always belongs to the newly registered user, so a
/// fresh customer can act immediately without a separate login.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `tokens` - The token service issuing the new user's token
/// * `request` - The registration request
/// * `actor` - The authenticated caller, if any
/// * `now` - The registration timestamp
///
/// # Errors
///
/// Returns an error if validation fails, the email is taken, an
/// elevated role is requested without admin authority, or token
/// issuance fails.
pub fn register_user(
    persistence: &Persistence,
    tokens: &TokenService,
    request: &RegisterRequest,
    actor: Option<&AuthenticatedActor>,
    now: OffsetDateTime,
) -> Result<LoginResponse, ApiError> {
    validate_email(&request.email)?;
    validate_password(&request.password)?;

    let role: Role = match &request.role {
        Some(requested) => requested.parse()?,
        None => Role::default(),
    };

    if role != Role::Customer && !matches!(actor, Some(caller) if caller.role == Role::Admin) {
        return Err(ApiError::PermissionDenied {
            message: String::from("Permission denied. Only an admin may assign elevated roles"),
        });
    }

    let email: Email = Email::new(&request.email);
    let user = persistence.create_user(&email, &request.password, role, now)?;
    let token: String = tokens.issue(&user, now)?;
    info!("Registered user {} with role {}", email, role);

    Ok(LoginResponse {
        token,
        user: UserResponse::from_user(&user)?,
    })
}

/// Authenticates a user and issues a bearer token.
///
/// An unknown email and a wrong password are reported differently: the
/// former is a lookup failure, the latter a credential failure.
///
/// # Errors
///
/// Returns `NotFound` for an unknown email, `InvalidCredentials` for a
/// password mismatch, or an error if token issuance fails.
pub fn login(
    persistence: &Persistence,
    tokens: &TokenService,
    request: &LoginRequest,
    now: OffsetDateTime,
) -> Result<LoginResponse, ApiError> {
    let email: Email = Email::new(&request.email);
    let user = persistence
        .get_user_by_email(&email)?
        .ok_or_else(|| ApiError::NotFound {
            message: String::from("User not found"),
        })?;

    if !verify_password(&request.password, &user.password_hash)? {
        return Err(ApiError::InvalidCredentials);
    }

    let token: String = tokens.issue(&user, now)?;
    info!("User {} logged in", email);

    Ok(LoginResponse {
        token,
        user: UserResponse::from_user(&user)?,
    })
}

/// Retrieves a user's profile.
///
/// # Errors
///
/// Returns an error if the caller is neither the user nor an admin, or
/// the user does not exist.
pub fn get_user(
    persistence: &Persistence,
    user_id: i64,
    actor: &AuthenticatedActor,
) -> Result<UserResponse, ApiError> {
    can_view_user(&actor.to_policy_actor(), user_id)?;

    let user = persistence
        .get_user_by_id(user_id)?
        .ok_or_else(|| ApiError::NotFound {
            message: String::from("User not found"),
        })?;

    UserResponse::from_user(&user)
}

/// Changes a user's password.
///
/// # Errors
///
/// Returns an error if the caller is neither the user nor an admin,
/// the user does not exist, or the new password fails validation.
pub fn update_user(
    persistence: &Persistence,
    user_id: i64,
    request: &UpdateUserRequest,
    actor: &AuthenticatedActor,
) -> Result<UserResponse, ApiError> {
    can_edit_user(&actor.to_policy_actor(), user_id)?;
    validate_password(&request.password)?;

    let user = persistence
        .get_user_by_id(user_id)?
        .ok_or_else(|| ApiError::NotFound {
            message: String::from("User not found"),
        })?;

    persistence.update_password(user_id, &request.password)?;
    info!("User {} changed their credential", user_id);

    UserResponse::from_user(&user)
}

/// Lists all users.
///
/// # Errors
///
/// Returns an error if the caller is not an admin.
pub fn list_users(
    persistence: &Persistence,
    actor: &AuthenticatedActor,
) -> Result<Vec<UserResponse>, ApiError> {
    can_list_all_users(&actor.to_policy_actor())?;

    persistence
        .list_users()?
        .iter()
        .map(UserResponse::from_user)
        .collect()
}

/// Opens a new ticket on behalf of the caller.
///
/// The ticket starts open and unassigned; the caller becomes its
/// customer regardless of their role.
///
/// # Errors
///
/// Returns an error if the subject or description is empty.
pub fn create_ticket(
    persistence: &Persistence,
    request: &CreateTicketRequest,
    actor: &AuthenticatedActor,
    now: OffsetDateTime,
) -> Result<TicketResponse, ApiError> {
    can_create_ticket(&actor.to_policy_actor())?;
    validate_ticket_fields(&request.subject, &request.description)?;

    let ticket: Ticket = Ticket::new(
        actor.id,
        request.subject.clone(),
        request.description.clone(),
        now,
    );
    let persisted = persistence.create_ticket(&ticket)?;

    TicketResponse::from_ticket(&persisted)
}

/// Retrieves a single ticket.
///
/// # Errors
///
/// Returns an error if the ticket does not exist or the caller is not
/// a participant.
pub fn get_ticket(
    persistence: &Persistence,
    ticket_id: i64,
    actor: &AuthenticatedActor,
) -> Result<TicketResponse, ApiError> {
    let ticket = persistence
        .get_ticket(ticket_id)?
        .ok_or_else(|| ApiError::NotFound {
            message: String::from("Ticket not found"),
        })?;

    can_view_ticket(&actor.to_policy_actor(), &ticket)?;
    TicketResponse::from_ticket(&ticket)
}

/// Claims an open, unassigned ticket for the calling agent.
///
/// A missing, closed, or already-assigned ticket all report the same
/// masked lookup failure so callers cannot distinguish them.
///
/// # Errors
///
/// Returns an error if the caller is not an agent or the claim loses.
pub fn assign_ticket_to_self(
    persistence: &Persistence,
    ticket_id: i64,
    actor: &AuthenticatedActor,
) -> Result<TicketResponse, ApiError> {
    let masked = || ApiError::NotFound {
        message: String::from("Ticket not found or already assigned"),
    };

    let ticket = persistence.get_ticket(ticket_id)?.ok_or_else(masked)?;
    can_assign_ticket_to_self(&actor.to_policy_actor(), &ticket)?;

    if !persistence.try_claim_ticket(ticket_id, actor.id)? {
        return Err(masked());
    }

    let claimed = persistence.get_ticket(ticket_id)?.ok_or_else(masked)?;
    TicketResponse::from_ticket(&claimed)
}

/// Changes a ticket's status.
///
/// Closing stamps the close timestamp once; closing an already-closed
/// ticket keeps the original timestamp. Reopening is rejected.
///
/// # Errors
///
/// Returns an error if the ticket does not exist, the caller is not a
/// participant, or the transition is not allowed.
pub fn update_ticket_status(
    persistence: &Persistence,
    ticket_id: i64,
    request: &UpdateTicketStatusRequest,
    actor: &AuthenticatedActor,
    now: OffsetDateTime,
) -> Result<TicketResponse, ApiError> {
    let ticket = persistence
        .get_ticket(ticket_id)?
        .ok_or_else(|| ApiError::NotFound {
            message: String::from("Ticket not found"),
        })?;

    can_update_ticket_status(&actor.to_policy_actor(), &ticket)?;

    let target: TicketStatus = request.status.parse()?;
    let updated: Ticket = apply_status(&ticket, target, now)?;
    persistence.update_ticket_status(&updated)?;
    info!("Ticket {} status set to {} by user {}", ticket_id, target, actor.id);

    TicketResponse::from_ticket(&updated)
}

/// Lists open, unassigned tickets.
///
/// # Errors
///
/// Returns an error if the caller is a customer.
pub fn list_unassigned_tickets(
    persistence: &Persistence,
    actor: &AuthenticatedActor,
) -> Result<Vec<TicketResponse>, ApiError> {
    can_list_unassigned_tickets(&actor.to_policy_actor())?;

    persistence
        .list_unassigned_tickets()?
        .iter()
        .map(TicketResponse::from_ticket)
        .collect()
}

/// Lists the tickets assigned to the calling agent.
///
/// # Errors
///
/// Returns an error if the caller is not an agent.
pub fn list_agent_tickets(
    persistence: &Persistence,
    actor: &AuthenticatedActor,
) -> Result<Vec<TicketResponse>, ApiError> {
    if actor.role != Role::Agent {
        return Err(DenyReason::AgentRequired {
            action: "list_assigned_tickets",
        }
        .into());
    }

    persistence
        .list_tickets_by_agent(actor.id)?
        .iter()
        .map(TicketResponse::from_ticket)
        .collect()
}

/// Adds a comment to a ticket.
///
/// The caller must be a participant, and a customer may not comment
/// until an agent has. The author's role is snapshotted onto the
/// comment at creation.
///
/// # Errors
///
/// Returns an error if the ticket does not exist, the caller is not a
/// participant, the ordering rule blocks them, or the text is empty.
pub fn create_comment(
    persistence: &Persistence,
    ticket_id: i64,
    request: &CreateCommentRequest,
    actor: &AuthenticatedActor,
    now: OffsetDateTime,
) -> Result<CommentResponse, ApiError> {
    let ticket = persistence
        .get_ticket(ticket_id)?
        .ok_or_else(|| ApiError::NotFound {
            message: String::from("Ticket not found"),
        })?;

    let policy_actor: Actor = actor.to_policy_actor();
    can_create_comment(&policy_actor, &ticket)?;

    let agent_has_commented: bool = persistence.has_agent_comment(ticket_id)?;
    check_comment_order(&policy_actor, &ticket, agent_has_commented)?;

    validate_comment_text(&request.text)?;

    let comment: Comment = Comment::new(ticket_id, actor.id, actor.role, request.text.clone(), now);
    let persisted = persistence.create_comment(&comment)?;

    CommentResponse::from_comment(&persisted)
}

/// Retrieves a single comment.
///
/// Visibility follows the parent ticket: the caller must be a
/// participant on the ticket the comment belongs to.
///
/// # Errors
///
/// Returns an error if the comment does not exist or the caller is not
/// a participant on its ticket.
pub fn get_comment(
    persistence: &Persistence,
    comment_id: i64,
    actor: &AuthenticatedActor,
) -> Result<CommentResponse, ApiError> {
    let comment = persistence
        .get_comment(comment_id)?
        .ok_or_else(|| ApiError::NotFound {
            message: String::from("Comment not found"),
        })?;

    let ticket = persistence
        .get_ticket(comment.ticket_id)?
        .ok_or_else(|| ApiError::Internal {
            message: format!("Comment {comment_id} references missing ticket"),
        })?;

    can_view_ticket(&actor.to_policy_actor(), &ticket)?;
    CommentResponse::from_comment(&comment)
}

/// Edits a comment's text.
///
/// Only the original author may edit, admins included. The role
/// snapshot and creation timestamp are untouched.
///
/// # Errors
///
/// Returns an error if the comment does not exist, the caller is not
/// the author, or the text is empty.
pub fn update_comment(
    persistence: &Persistence,
    comment_id: i64,
    request: &UpdateCommentRequest,
    actor: &AuthenticatedActor,
) -> Result<CommentResponse, ApiError> {
    let comment = persistence
        .get_comment(comment_id)?
        .ok_or_else(|| ApiError::NotFound {
            message: String::from("Comment not found"),
        })?;

    can_edit_comment(&actor.to_policy_actor(), &comment)?;
    validate_comment_text(&request.text)?;

    persistence.update_comment_text(comment_id, &request.text)?;

    let mut updated: Comment = comment;
    updated.text = request.text.clone();
    CommentResponse::from_comment(&updated)
}

/// Assigns a ticket to a specific agent, overriding any existing
/// assignment.
///
/// # Errors
///
/// Returns an error if the caller is not an admin, the ticket or user
/// does not exist, or the target user is not an agent.
pub fn force_assign_ticket(
    persistence: &Persistence,
    request: &ForceAssignRequest,
    actor: &AuthenticatedActor,
) -> Result<TicketResponse, ApiError> {
    can_force_assign_ticket(&actor.to_policy_actor())?;

    let not_found = || ApiError::NotFound {
        message: String::from("Ticket or agent not found"),
    };

    let ticket = persistence.get_ticket(request.ticket_id)?.ok_or_else(not_found)?;
    let agent = persistence
        .get_user_by_id(request.agent_id)?
        .ok_or_else(not_found)?;

    if agent.role != Role::Agent {
        return Err(ApiError::ValidationFailed {
            field: String::from("agent_id"),
            message: format!("User {} is not an agent", request.agent_id),
        });
    }

    persistence.force_assign_ticket(request.ticket_id, request.agent_id)?;
    info!(
        "Ticket {} force-assigned to agent {} by admin {}",
        request.ticket_id, request.agent_id, actor.id
    );

    let assigned: Ticket = assign_agent(&ticket, request.agent_id);
    TicketResponse::from_ticket(&assigned)
}

/// Generates the closed-ticket report for the past month.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `format` - The requested rendering format, `csv` or `text`
/// * `actor` - The authenticated caller
/// * `now` - The generation timestamp; the window reaches 30 days back
///   from it
///
/// # Errors
///
/// Returns an error if the caller is a customer, the format is
/// unknown, or no tickets closed inside the window.
pub fn generate_ticket_report(
    persistence: &Persistence,
    format: &str,
    actor: &AuthenticatedActor,
    now: OffsetDateTime,
) -> Result<ReportDocument, ApiError> {
    can_generate_report(&actor.to_policy_actor())?;

    let format: ReportFormat = format.parse()?;
    let cutoff: OffsetDateTime = now - REPORT_WINDOW;
    let tickets: Vec<Ticket> = persistence.list_closed_tickets_since(cutoff)?;

    if tickets.is_empty() {
        return Err(ApiError::NotFound {
            message: String::from("No closed tickets found for the reporting period"),
        });
    }

    info!(
        "Rendering closed-ticket report: {} tickets, requested by user {}",
        tickets.len(),
        actor.id
    );
    render(&tickets, format, now)
}
