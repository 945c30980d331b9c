// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::TicketStatus;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Role string is not one of the closed set.
    InvalidRole(String),
    /// Ticket status string is not one of the closed set.
    InvalidStatus(String),
    /// Email address is empty or malformed.
    InvalidEmail(String),
    /// Password does not meet the length requirements.
    InvalidPassword(String),
    /// Ticket subject is empty.
    EmptySubject,
    /// Ticket description is empty.
    EmptyDescription,
    /// Comment text is empty.
    EmptyCommentText,
    /// A ticket's status and close timestamp disagree.
    CloseTimestampViolation {
        /// The ticket's status.
        status: TicketStatus,
        /// Whether the ticket carries a close timestamp.
        has_closed_at: bool,
    },
    /// An illegal status transition was requested.
    InvalidTransition {
        /// The current status.
        from: TicketStatus,
        /// The requested status.
        to: TicketStatus,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRole(s) => {
                write!(f, "Invalid role: '{s}'. Must be customer, agent, or admin")
            }
            Self::InvalidStatus(s) => {
                write!(f, "Invalid ticket status: '{s}'. Must be open or closed")
            }
            Self::InvalidEmail(msg) => write!(f, "Invalid email: {msg}"),
            Self::InvalidPassword(msg) => write!(f, "Invalid password: {msg}"),
            Self::EmptySubject => write!(f, "Ticket subject must not be empty"),
            Self::EmptyDescription => write!(f, "Ticket description must not be empty"),
            Self::EmptyCommentText => write!(f, "Comment text must not be empty"),
            Self::CloseTimestampViolation {
                status,
                has_closed_at,
            } => {
                write!(
                    f,
                    "Ticket status '{status}' is inconsistent with closed_at (present: {has_closed_at})"
                )
            }
            Self::InvalidTransition { from, to } => {
                write!(f, "Cannot transition ticket from '{from}' to '{to}'")
            }
        }
    }
}

impl std::error::Error for DomainError {}
