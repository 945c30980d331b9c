// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket persistence functions.
//!
//! Self-assignment is a single conditional UPDATE so two agents racing
//! for the same ticket cannot both win: the claim check and the write
//! are one statement, and SQLite's per-statement atomicity decides the
//! winner.

use rusqlite::{Connection, OptionalExtension, params};
use time::OffsetDateTime;
use tracing::{debug, info};

use helpdesk_domain::{Ticket, TicketStatus};

use crate::error::PersistenceError;
use crate::timestamps;

/// Raw row shape for a ticket before domain conversion.
type TicketRow = (
    i64,
    i64,
    String,
    String,
    String,
    Option<i64>,
    String,
    Option<String>,
);

const TICKET_COLUMNS: &str =
    "ticket_id, customer_id, subject, description, status, assigned_agent_id, created_at, closed_at";

fn row_to_ticket(row: TicketRow) -> Result<Ticket, PersistenceError> {
    let (ticket_id, customer_id, subject, description, status_str, assigned_agent_id, created_str, closed_str) =
        row;
    let status: TicketStatus = status_str
        .parse()
        .map_err(|e| PersistenceError::CorruptRecord(format!("ticket {ticket_id}: {e}")))?;
    let created_at: OffsetDateTime = timestamps::from_storage(&created_str)?;
    let closed_at: Option<OffsetDateTime> = match closed_str {
        Some(s) => Some(timestamps::from_storage(&s)?),
        None => None,
    };
    Ok(Ticket {
        ticket_id: Some(ticket_id),
        customer_id,
        subject,
        description,
        status,
        assigned_agent_id,
        created_at,
        closed_at,
    })
}

fn map_ticket_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TicketRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
    ))
}

/// Persists a new ticket.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_ticket(conn: &Connection, ticket: &Ticket) -> Result<Ticket, PersistenceError> {
    let created_at_str: String = timestamps::to_storage(ticket.created_at)?;

    conn.execute(
        "INSERT INTO tickets (customer_id, subject, description, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            ticket.customer_id,
            ticket.subject,
            ticket.description,
            ticket.status.as_str(),
            created_at_str
        ],
    )?;

    let ticket_id: i64 = conn.last_insert_rowid();
    info!(
        "Created ticket {} for customer {}",
        ticket_id, ticket.customer_id
    );

    let mut persisted: Ticket = ticket.clone();
    persisted.ticket_id = Some(ticket_id);
    Ok(persisted)
}

/// Retrieves a ticket by id.
///
/// # Errors
///
/// Returns an error if the query fails. Returns `Ok(None)` if no ticket
/// exists with that id.
pub fn get_ticket(conn: &Connection, ticket_id: i64) -> Result<Option<Ticket>, PersistenceError> {
    debug!("Looking up ticket: {}", ticket_id);

    let row: Option<TicketRow> = conn
        .query_row(
            &format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE ticket_id = ?1"),
            params![ticket_id],
            map_ticket_row,
        )
        .optional()?;

    row.map(row_to_ticket).transpose()
}

/// Atomically claims an open, unassigned ticket for an agent.
///
/// The status and assignment preconditions are part of the UPDATE's
/// WHERE clause (check-and-set), so concurrent claimers cannot both
/// observe the ticket as claimable and both win.
///
/// # Returns
///
/// `true` if the claim succeeded, `false` if the ticket was missing,
/// closed, or already assigned.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn try_claim_ticket(
    conn: &Connection,
    ticket_id: i64,
    agent_id: i64,
) -> Result<bool, PersistenceError> {
    let rows: usize = conn.execute(
        "UPDATE tickets
         SET assigned_agent_id = ?1
         WHERE ticket_id = ?2 AND status = 'open' AND assigned_agent_id IS NULL",
        params![agent_id, ticket_id],
    )?;

    if rows == 1 {
        info!("Ticket {} claimed by agent {}", ticket_id, agent_id);
    } else {
        debug!(
            "Claim of ticket {} by agent {} lost: not found or already assigned",
            ticket_id, agent_id
        );
    }
    Ok(rows == 1)
}

/// Persists a ticket's status and close timestamp.
///
/// The caller computes the transitioned ticket (via the lifecycle
/// rules); this writes status and `closed_at` in one statement.
///
/// # Errors
///
/// Returns `NotFound` if the ticket does not exist, or an error if the
/// update fails.
pub fn update_ticket_status(conn: &Connection, ticket: &Ticket) -> Result<(), PersistenceError> {
    let Some(ticket_id) = ticket.ticket_id else {
        return Err(PersistenceError::Other(String::from(
            "Cannot update status of an unpersisted ticket",
        )));
    };

    let closed_at_str: Option<String> = ticket
        .closed_at
        .map(timestamps::to_storage)
        .transpose()?;

    let rows: usize = conn.execute(
        "UPDATE tickets SET status = ?1, closed_at = ?2 WHERE ticket_id = ?3",
        params![ticket.status.as_str(), closed_at_str, ticket_id],
    )?;

    if rows == 0 {
        return Err(PersistenceError::NotFound(format!("ticket {ticket_id}")));
    }

    info!("Ticket {} status set to {}", ticket_id, ticket.status);
    Ok(())
}

/// Unconditionally assigns a ticket to an agent.
///
/// This is the admin escape hatch: no status or current-assignment
/// precondition, unlike [`try_claim_ticket`].
///
/// # Errors
///
/// Returns `NotFound` if the ticket does not exist, or an error if the
/// update fails.
pub fn force_assign_ticket(
    conn: &Connection,
    ticket_id: i64,
    agent_id: i64,
) -> Result<(), PersistenceError> {
    let rows: usize = conn.execute(
        "UPDATE tickets SET assigned_agent_id = ?1 WHERE ticket_id = ?2",
        params![agent_id, ticket_id],
    )?;

    if rows == 0 {
        return Err(PersistenceError::NotFound(format!("ticket {ticket_id}")));
    }

    info!("Ticket {} force-assigned to agent {}", ticket_id, agent_id);
    Ok(())
}

/// Lists open tickets with no assigned agent, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_unassigned_tickets(conn: &Connection) -> Result<Vec<Ticket>, PersistenceError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TICKET_COLUMNS} FROM tickets
         WHERE status = 'open' AND assigned_agent_id IS NULL
         ORDER BY ticket_id ASC"
    ))?;
    collect_tickets(stmt.query_map([], map_ticket_row)?)
}

/// Lists tickets assigned to a specific agent, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_tickets_by_agent(
    conn: &Connection,
    agent_id: i64,
) -> Result<Vec<Ticket>, PersistenceError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TICKET_COLUMNS} FROM tickets
         WHERE assigned_agent_id = ?1
         ORDER BY ticket_id ASC"
    ))?;
    collect_tickets(stmt.query_map(params![agent_id], map_ticket_row)?)
}

/// Lists closed tickets whose close timestamp falls on or after the
/// cutoff.
///
/// The window comparison happens on parsed timestamps, not on the
/// stored text.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_closed_tickets_since(
    conn: &Connection,
    cutoff: OffsetDateTime,
) -> Result<Vec<Ticket>, PersistenceError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TICKET_COLUMNS} FROM tickets
         WHERE status = 'closed'
         ORDER BY ticket_id ASC"
    ))?;
    let all_closed: Vec<Ticket> = collect_tickets(stmt.query_map([], map_ticket_row)?)?;

    Ok(all_closed
        .into_iter()
        .filter(|ticket| matches!(ticket.closed_at, Some(closed_at) if closed_at >= cutoff))
        .collect())
}

fn collect_tickets(
    rows: impl Iterator<Item = rusqlite::Result<TicketRow>>,
) -> Result<Vec<Ticket>, PersistenceError> {
    let mut tickets: Vec<Ticket> = Vec::new();
    for row_result in rows {
        let row: TicketRow = row_result?;
        tickets.push(row_to_ticket(row)?);
    }
    Ok(tickets)
}
