// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// Role held by a registered user.
///
/// Roles are a closed enumeration checked at every construction site.
/// Persisted role strings that do not parse are rejected, never coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A customer who opens tickets and comments on their own tickets.
    #[default]
    Customer,
    /// A support agent who claims and resolves tickets.
    Agent,
    /// An administrator with cross-cutting authority over users and tickets.
    Admin,
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "agent" => Ok(Self::Agent),
            "admin" => Ok(Self::Admin),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Role {
    /// Converts this role to its persisted string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Agent => "agent",
            Self::Admin => "admin",
        }
    }
}

/// Lifecycle status of a ticket.
///
/// `Open` is the initial state; `Closed` is terminal. There is no reopen
/// transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    /// Ticket is awaiting or undergoing resolution.
    #[default]
    Open,
    /// Ticket has been resolved. Terminal.
    Closed,
}

impl FromStr for TicketStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            _ => Err(DomainError::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TicketStatus {
    /// Converts this status to its persisted string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }

    /// Checks if a transition from this status to another is valid.
    ///
    /// The only valid transition is Open → Closed. Re-asserting the
    /// current status is permitted (close is not idempotent-guarded at
    /// this level; `closed_at` handling lives with the ticket).
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Open, Self::Closed) | (Self::Open, Self::Open) | (Self::Closed, Self::Closed)
        )
    }
}

/// An email address normalized for case-insensitive identity.
///
/// Email is the unique identity key for a user and is immutable once
/// registered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email {
    /// The normalized (lowercased, trimmed) address.
    value: String,
}

impl Email {
    /// Creates a new `Email`, normalizing to lowercase.
    ///
    /// # Arguments
    ///
    /// * `value` - The raw address (will be trimmed and lowercased)
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            value: value.trim().to_lowercase(),
        }
    }

    /// Returns the normalized address.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A registered user of the helpdesk.
///
/// `user_id` is the canonical identifier, assigned by the persistence
/// layer. The credential hash never leaves the persistence/API boundary
/// in serialized output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Canonical internal identifier (opaque, stable, immutable).
    /// `None` indicates the user has not been persisted yet.
    pub user_id: Option<i64>,
    /// The user's unique email identity.
    pub email: Email,
    /// The salted one-way hash of the user's credential. Never the
    /// plaintext, never serialized outward.
    pub password_hash: String,
    /// The user's role.
    pub role: Role,
    /// When the user registered.
    pub created_at: OffsetDateTime,
}

impl User {
    /// Creates a new `User` without a persisted `user_id`.
    #[must_use]
    pub const fn new(
        email: Email,
        password_hash: String,
        role: Role,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            user_id: None,
            email,
            password_hash,
            role,
            created_at,
        }
    }

    /// Creates a `User` with an existing `user_id` (from persistence).
    #[must_use]
    pub const fn with_id(
        user_id: i64,
        email: Email,
        password_hash: String,
        role: Role,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            user_id: Some(user_id),
            email,
            password_hash,
            role,
            created_at,
        }
    }
}

/// A support ticket.
///
/// The customer owner is set at creation and never reassigned. The
/// assigned agent starts null and is set by self-assignment or admin
/// force-assignment; it may only ever reference a user with the agent
/// role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    /// Canonical internal identifier.
    /// `None` indicates the ticket has not been persisted yet.
    pub ticket_id: Option<i64>,
    /// The owning customer's user id. Immutable after creation.
    pub customer_id: i64,
    /// Short summary of the issue (non-empty).
    pub subject: String,
    /// Full description of the issue (non-empty).
    pub description: String,
    /// Lifecycle status.
    pub status: TicketStatus,
    /// The claiming agent's user id, if any.
    pub assigned_agent_id: Option<i64>,
    /// When the ticket was opened.
    pub created_at: OffsetDateTime,
    /// When the ticket was closed. Set exactly once; null iff status is
    /// open.
    pub closed_at: Option<OffsetDateTime>,
}

impl Ticket {
    /// Creates a new open, unassigned `Ticket` without a persisted id.
    #[must_use]
    pub const fn new(
        customer_id: i64,
        subject: String,
        description: String,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            ticket_id: None,
            customer_id,
            subject,
            description,
            status: TicketStatus::Open,
            assigned_agent_id: None,
            created_at,
            closed_at: None,
        }
    }

    /// Returns whether this ticket is open and has no assigned agent.
    #[must_use]
    pub const fn is_claimable(&self) -> bool {
        matches!(self.status, TicketStatus::Open) && self.assigned_agent_id.is_none()
    }

    /// Validates the status/closed-at invariant.
    ///
    /// # Invariant
    ///
    /// `closed_at` is non-null if and only if `status == Closed`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::CloseTimestampViolation` if the invariant
    /// does not hold.
    pub fn validate_close_timestamp(&self) -> Result<(), DomainError> {
        let consistent: bool = match self.status {
            TicketStatus::Open => self.closed_at.is_none(),
            TicketStatus::Closed => self.closed_at.is_some(),
        };
        if consistent {
            Ok(())
        } else {
            Err(DomainError::CloseTimestampViolation {
                status: self.status,
                has_closed_at: self.closed_at.is_some(),
            })
        }
    }
}

/// A comment on a ticket.
///
/// `author_role` is snapshotted from the author's role at post time and
/// is never re-derived from the live user record. Comments are never
/// deleted; edits replace the text in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Canonical internal identifier.
    /// `None` indicates the comment has not been persisted yet.
    pub comment_id: Option<i64>,
    /// The ticket this comment belongs to.
    pub ticket_id: i64,
    /// The authoring user's id.
    pub author_id: i64,
    /// The author's role at post time (snapshotted).
    pub author_role: Role,
    /// The comment body (non-empty).
    pub text: String,
    /// When the comment was posted.
    pub created_at: OffsetDateTime,
}

impl Comment {
    /// Creates a new `Comment` without a persisted id.
    #[must_use]
    pub const fn new(
        ticket_id: i64,
        author_id: i64,
        author_role: Role,
        text: String,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            comment_id: None,
            ticket_id,
            author_id,
            author_role,
            text,
            created_at,
        }
    }
}
