// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket lifecycle transitions.
//!
//! Tickets move `Open → Closed` exactly once; assignment moves
//! `Unassigned → Assigned` while open. These functions compute the
//! transitioned ticket as a value; persistence applies it atomically.

use helpdesk_domain::{DomainError, Ticket, TicketStatus};
use time::OffsetDateTime;

/// Applies a requested status to a ticket, returning the updated ticket.
///
/// Semantics:
/// - `Open → Closed` closes the ticket and stamps `closed_at`.
/// - `Closed → Closed` re-runs the status set; the original `closed_at`
///   is preserved because it is only stamped when previously null.
/// - `Open → Open` is a no-op.
/// - `Closed → Open` is rejected; no reopen transition exists.
///
/// # Arguments
///
/// * `ticket` - The ticket as currently persisted
/// * `target` - The requested status
/// * `now` - The close timestamp to stamp if the ticket transitions to
///   closed for the first time
///
/// # Errors
///
/// Returns `DomainError::InvalidTransition` if the requested status
/// would reopen a closed ticket.
pub fn apply_status(
    ticket: &Ticket,
    target: TicketStatus,
    now: OffsetDateTime,
) -> Result<Ticket, DomainError> {
    if !ticket.status.can_transition_to(target) {
        return Err(DomainError::InvalidTransition {
            from: ticket.status,
            to: target,
        });
    }

    let mut updated: Ticket = ticket.clone();
    updated.status = target;
    if matches!(target, TicketStatus::Closed) && updated.closed_at.is_none() {
        updated.closed_at = Some(now);
    }
    Ok(updated)
}

/// Returns the ticket as it would look after assignment to `agent_id`.
///
/// This does not check the claim guard; callers gate via
/// `can_assign_ticket_to_self` (self-assignment) or
/// `can_force_assign_ticket` (admin override) first. The persistence
/// layer enforces the claim atomically for self-assignment.
#[must_use]
pub fn assign_agent(ticket: &Ticket, agent_id: i64) -> Ticket {
    let mut updated: Ticket = ticket.clone();
    updated.assigned_agent_id = Some(agent_id);
    updated
}
