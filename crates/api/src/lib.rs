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
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! API boundary layer for the helpdesk ticketing system.
//!
//! Authorization is enforced here, before any storage access. Inner
//! errors are translated into the closed [`ApiError`] taxonomy, and
//! requests and responses are wire DTOs, never domain entities.

mod auth;
mod error;
mod handlers;
mod report;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, TokenError, TokenService};
pub use error::ApiError;
pub use handlers::{
    assign_ticket_to_self, create_comment, create_ticket, force_assign_ticket,
    generate_ticket_report, get_comment, get_ticket, get_user, list_agent_tickets,
    list_unassigned_tickets, list_users, login, register_user, update_comment,
    update_ticket_status, update_user,
};
pub use report::{ReportDocument, ReportFormat};
pub use request_response::{
    CommentResponse, CreateCommentRequest, CreateTicketRequest, ForceAssignRequest, LoginRequest,
    LoginResponse, RegisterRequest, TicketResponse, UpdateCommentRequest, UpdateTicketStatusRequest,
    UpdateUserRequest, UserResponse,
};
