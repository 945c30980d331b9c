// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response DTOs.
//!
//! These are distinct from domain types and represent the wire
//! contract. Timestamps cross the boundary as ISO 8601 strings, and a
//! user's credential hash never appears in any response shape.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Iso8601;

use helpdesk_domain::{Comment, Ticket, User};

use crate::error::ApiError;

fn format_timestamp(value: OffsetDateTime) -> Result<String, ApiError> {
    value.format(&Iso8601::DEFAULT).map_err(|e| ApiError::Internal {
        message: format!("Failed to format timestamp: {e}"),
    })
}

/// Request to register a new user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    /// The email identity.
    pub email: String,
    /// The plain-text password.
    pub password: String,
    /// The requested role; defaults to customer when absent.
    #[serde(default)]
    pub role: Option<String>,
}

/// Request to log in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    /// The email identity.
    pub email: String,
    /// The plain-text password.
    pub password: String,
}

/// Request to change a user's password.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateUserRequest {
    /// The new plain-text password.
    pub password: String,
}

/// Request to open a new ticket.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateTicketRequest {
    /// The ticket subject line.
    pub subject: String,
    /// The ticket body.
    pub description: String,
}

/// Request to change a ticket's status.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateTicketStatusRequest {
    /// The target status, `open` or `closed`.
    pub status: String,
}

/// Request to assign a ticket to a specific agent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ForceAssignRequest {
    /// The ticket to assign.
    pub ticket_id: i64,
    /// The agent receiving the ticket.
    pub agent_id: i64,
}

/// Request to add a comment to a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateCommentRequest {
    /// The comment text.
    pub text: String,
}

/// Request to edit a comment's text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateCommentRequest {
    /// The replacement text.
    pub text: String,
}

/// A user, as seen on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    /// The user id.
    pub user_id: i64,
    /// The email identity.
    pub email: String,
    /// The role.
    pub role: String,
    /// Registration timestamp, ISO 8601.
    pub created_at: String,
}

impl UserResponse {
    /// Builds the wire shape from a persisted user.
    ///
    /// # Errors
    ///
    /// Returns an error if the user is unpersisted or a timestamp
    /// cannot be formatted.
    pub fn from_user(user: &User) -> Result<Self, ApiError> {
        let Some(user_id) = user.user_id else {
            return Err(ApiError::Internal {
                message: String::from("Unpersisted user crossed the API boundary"),
            });
        };
        Ok(Self {
            user_id,
            email: user.email.value().to_string(),
            role: user.role.to_string(),
            created_at: format_timestamp(user.created_at)?,
        })
    }
}

/// Response to a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The signed bearer token.
    pub token: String,
    /// The authenticated user.
    pub user: UserResponse,
}

/// A ticket, as seen on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketResponse {
    /// The ticket id.
    pub ticket_id: i64,
    /// The customer who opened the ticket.
    pub customer_id: i64,
    /// The subject line.
    pub subject: String,
    /// The body.
    pub description: String,
    /// The status, `open` or `closed`.
    pub status: String,
    /// The assigned agent, if any.
    pub assigned_agent_id: Option<i64>,
    /// Creation timestamp, ISO 8601.
    pub created_at: String,
    /// Close timestamp, ISO 8601. Present only on closed tickets.
    pub closed_at: Option<String>,
}

impl TicketResponse {
    /// Builds the wire shape from a persisted ticket.
    ///
    /// # Errors
    ///
    /// Returns an error if the ticket is unpersisted or a timestamp
    /// cannot be formatted.
    pub fn from_ticket(ticket: &Ticket) -> Result<Self, ApiError> {
        let Some(ticket_id) = ticket.ticket_id else {
            return Err(ApiError::Internal {
                message: String::from("Unpersisted ticket crossed the API boundary"),
            });
        };
        Ok(Self {
            ticket_id,
            customer_id: ticket.customer_id,
            subject: ticket.subject.clone(),
            description: ticket.description.clone(),
            status: ticket.status.to_string(),
            assigned_agent_id: ticket.assigned_agent_id,
            created_at: format_timestamp(ticket.created_at)?,
            closed_at: ticket.closed_at.map(format_timestamp).transpose()?,
        })
    }
}

/// A comment, as seen on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentResponse {
    /// The comment id.
    pub comment_id: i64,
    /// The ticket the comment belongs to.
    pub ticket_id: i64,
    /// The author's user id.
    pub author_id: i64,
    /// The author's role at posting time.
    pub author_role: String,
    /// The comment text.
    pub text: String,
    /// Creation timestamp, ISO 8601.
    pub created_at: String,
}

impl CommentResponse {
    /// Builds the wire shape from a persisted comment.
    ///
    /// # Errors
    ///
    /// Returns an error if the comment is unpersisted or a timestamp
    /// cannot be formatted.
    pub fn from_comment(comment: &Comment) -> Result<Self, ApiError> {
        let Some(comment_id) = comment.comment_id else {
            return Err(ApiError::Internal {
                message: String::from("Unpersisted comment crossed the API boundary"),
            });
        };
        Ok(Self {
            comment_id,
            ticket_id: comment.ticket_id,
            author_id: comment.author_id,
            author_role: comment.author_role.to_string(),
            text: comment.text.clone(),
            created_at: format_timestamp(comment.created_at)?,
        })
    }
}
