// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Comment ordering rule.

use helpdesk_domain::Ticket;

use crate::policy::{Actor, DenyReason};

/// Enforces the customer comment ordering rule.
///
/// A customer may not comment on their own ticket until at least one
/// existing comment on that ticket was authored by an agent. The rule
/// keys off the snapshotted author role of prior comments, not the
/// authors' current roles. Agents and admins are never subject to it.
///
/// # Arguments
///
/// * `actor` - The actor attempting to comment
/// * `ticket` - The ticket being commented on
/// * `agent_has_commented` - Whether any existing comment on the ticket
///   carries the agent role snapshot
///
/// # Errors
///
/// Returns `DenyReason::AgentCommentRequired` if the actor is the
/// ticket's customer and no agent comment exists yet.
pub const fn check_comment_order(
    actor: &Actor,
    ticket: &Ticket,
    agent_has_commented: bool,
) -> Result<(), DenyReason> {
    if actor.id == ticket.customer_id && !agent_has_commented {
        return Err(DenyReason::AgentCommentRequired);
    }
    Ok(())
}
