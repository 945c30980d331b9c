// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Pure authorization decision functions.
//!
//! Every mutation in the system passes through one of these gates before
//! any state is touched. The functions are pure: they take the actor and
//! the target resource and return either `Ok(())` (allow) or a specific
//! [`DenyReason`]. No I/O, no clock, no lookups.

use helpdesk_domain::{Comment, Role, Ticket};

/// The authenticated identity performing an action.
///
/// Resolved externally from a bearer token; the policy layer never sees
/// credentials, only the identity and role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// The actor's canonical user id.
    pub id: i64,
    /// The actor's role.
    pub role: Role,
}

impl Actor {
    /// Creates a new `Actor`.
    #[must_use]
    pub const fn new(id: i64, role: Role) -> Self {
        Self { id, role }
    }
}

/// A specific reason an action was denied.
///
/// Deny reasons are a closed enumeration so the transport boundary can
/// match exhaustively; they never carry internal detail beyond what the
/// caller is entitled to see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    /// The action requires the admin role.
    AdminRequired {
        /// The action that was attempted.
        action: &'static str,
    },
    /// The action requires the agent role.
    AgentRequired {
        /// The action that was attempted.
        action: &'static str,
    },
    /// The action requires the agent or admin role.
    AgentOrAdminRequired {
        /// The action that was attempted.
        action: &'static str,
    },
    /// The actor is neither the resource owner nor an admin.
    NotResourceOwner {
        /// The action that was attempted.
        action: &'static str,
    },
    /// The actor is not the ticket's customer, its assigned agent, or an
    /// admin.
    NotTicketParticipant {
        /// The action that was attempted.
        action: &'static str,
    },
    /// The ticket is not open and unassigned.
    TicketNotClaimable,
    /// The actor is not the comment's author.
    NotCommentAuthor,
    /// A customer may not comment until an agent has commented.
    AgentCommentRequired,
}

impl std::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AdminRequired { action } => {
                write!(f, "Permission denied: '{action}' requires admin role")
            }
            Self::AgentRequired { action } => {
                write!(f, "Permission denied: '{action}' requires agent role")
            }
            Self::AgentOrAdminRequired { action } => {
                write!(
                    f,
                    "Permission denied: '{action}' requires agent or admin role"
                )
            }
            Self::NotResourceOwner { action } => {
                write!(f, "Permission denied: '{action}' is limited to the owner")
            }
            Self::NotTicketParticipant { action } => {
                write!(
                    f,
                    "Permission denied: '{action}' is limited to the ticket's customer, its assigned agent, or an admin"
                )
            }
            Self::TicketNotClaimable => {
                write!(f, "Ticket is not open and unassigned")
            }
            Self::NotCommentAuthor => {
                write!(f, "Permission denied: only the comment's author may edit it")
            }
            Self::AgentCommentRequired => {
                write!(f, "Permission denied. A support agent must comment first")
            }
        }
    }
}

impl std::error::Error for DenyReason {}

/// Checks whether the actor is the ticket's customer, its assigned
/// agent, or an admin.
const fn is_ticket_participant(actor: &Actor, ticket: &Ticket) -> bool {
    matches!(actor.role, Role::Admin)
        || actor.id == ticket.customer_id
        || matches!(ticket.assigned_agent_id, Some(agent_id) if agent_id == actor.id)
}

/// Checks if an actor may view a user's details.
///
/// Allowed for admins and for the user themselves.
///
/// # Errors
///
/// Returns `DenyReason::NotResourceOwner` otherwise.
pub const fn can_view_user(actor: &Actor, target_user_id: i64) -> Result<(), DenyReason> {
    if matches!(actor.role, Role::Admin) || actor.id == target_user_id {
        Ok(())
    } else {
        Err(DenyReason::NotResourceOwner { action: "get_user" })
    }
}

/// Checks if an actor may edit a user's credential.
///
/// Deliberately symmetric with [`can_view_user`]: admins and the user
/// themselves.
///
/// # Errors
///
/// Returns `DenyReason::NotResourceOwner` otherwise.
pub const fn can_edit_user(actor: &Actor, target_user_id: i64) -> Result<(), DenyReason> {
    if matches!(actor.role, Role::Admin) || actor.id == target_user_id {
        Ok(())
    } else {
        Err(DenyReason::NotResourceOwner {
            action: "update_user",
        })
    }
}

/// Checks if an actor may list all users.
///
/// Admin only.
///
/// # Errors
///
/// Returns `DenyReason::AdminRequired` otherwise.
pub const fn can_list_all_users(actor: &Actor) -> Result<(), DenyReason> {
    match actor.role {
        Role::Admin => Ok(()),
        Role::Customer | Role::Agent => Err(DenyReason::AdminRequired {
            action: "list_users",
        }),
    }
}

/// Checks if an actor may create a ticket.
///
/// Any authenticated actor may open a ticket.
///
/// # Errors
///
/// Never fails; the signature is kept uniform with the other gates.
pub const fn can_create_ticket(_actor: &Actor) -> Result<(), DenyReason> {
    Ok(())
}

/// Checks if an actor may view a ticket.
///
/// Restricted to the ticket's customer, its assigned agent, and admins.
///
/// # Errors
///
/// Returns `DenyReason::NotTicketParticipant` otherwise.
pub const fn can_view_ticket(actor: &Actor, ticket: &Ticket) -> Result<(), DenyReason> {
    if is_ticket_participant(actor, ticket) {
        Ok(())
    } else {
        Err(DenyReason::NotTicketParticipant {
            action: "get_ticket",
        })
    }
}

/// Checks if an actor may claim a ticket for themselves.
///
/// The actor must be an agent and the ticket must be open with no
/// assigned agent.
///
/// # Errors
///
/// Returns `DenyReason::AgentRequired` if the actor is not an agent, or
/// `DenyReason::TicketNotClaimable` if the ticket is closed or already
/// assigned.
pub const fn can_assign_ticket_to_self(actor: &Actor, ticket: &Ticket) -> Result<(), DenyReason> {
    match actor.role {
        Role::Agent => {
            if ticket.is_claimable() {
                Ok(())
            } else {
                Err(DenyReason::TicketNotClaimable)
            }
        }
        Role::Customer | Role::Admin => Err(DenyReason::AgentRequired {
            action: "assign_ticket_to_self",
        }),
    }
}

/// Checks if an actor may force-assign a ticket to an arbitrary agent.
///
/// Admin only. The force-assignment escape hatch carries no ticket
/// precondition; status and current assignment are ignored.
///
/// # Errors
///
/// Returns `DenyReason::AdminRequired` otherwise.
pub const fn can_force_assign_ticket(actor: &Actor) -> Result<(), DenyReason> {
    match actor.role {
        Role::Admin => Ok(()),
        Role::Customer | Role::Agent => Err(DenyReason::AdminRequired {
            action: "force_assign_ticket",
        }),
    }
}

/// Checks if an actor may update a ticket's status.
///
/// Restricted to the ticket's customer, its assigned agent, and admins.
///
/// # Errors
///
/// Returns `DenyReason::NotTicketParticipant` otherwise.
pub const fn can_update_ticket_status(actor: &Actor, ticket: &Ticket) -> Result<(), DenyReason> {
    if is_ticket_participant(actor, ticket) {
        Ok(())
    } else {
        Err(DenyReason::NotTicketParticipant {
            action: "update_ticket",
        })
    }
}

/// Checks if an actor may list open unassigned tickets.
///
/// Agent or admin only.
///
/// # Errors
///
/// Returns `DenyReason::AgentOrAdminRequired` otherwise.
pub const fn can_list_unassigned_tickets(actor: &Actor) -> Result<(), DenyReason> {
    match actor.role {
        Role::Agent | Role::Admin => Ok(()),
        Role::Customer => Err(DenyReason::AgentOrAdminRequired {
            action: "list_unassigned_tickets",
        }),
    }
}

/// Checks if an actor may comment on a ticket.
///
/// Allowed for admins, the ticket's customer, and the ticket's assigned
/// agent. The customer ordering rule is enforced separately, after this
/// base gate passes.
///
/// # Errors
///
/// Returns `DenyReason::NotTicketParticipant` otherwise.
pub const fn can_create_comment(actor: &Actor, ticket: &Ticket) -> Result<(), DenyReason> {
    if is_ticket_participant(actor, ticket) {
        Ok(())
    } else {
        Err(DenyReason::NotTicketParticipant {
            action: "create_comment",
        })
    }
}

/// Checks if an actor may edit a comment.
///
/// Only the original author may edit, regardless of role.
///
/// # Errors
///
/// Returns `DenyReason::NotCommentAuthor` otherwise.
pub const fn can_edit_comment(actor: &Actor, comment: &Comment) -> Result<(), DenyReason> {
    if actor.id == comment.author_id {
        Ok(())
    } else {
        Err(DenyReason::NotCommentAuthor)
    }
}

/// Checks if an actor may generate the closed-ticket report.
///
/// Agent or admin only.
///
/// # Errors
///
/// Returns `DenyReason::AgentOrAdminRequired` otherwise.
pub const fn can_generate_report(actor: &Actor) -> Result<(), DenyReason> {
    match actor.role {
        Role::Agent | Role::Admin => Ok(()),
        Role::Customer => Err(DenyReason::AgentOrAdminRequired {
            action: "generate_ticket_report",
        }),
    }
}
