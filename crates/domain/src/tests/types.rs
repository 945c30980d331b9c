// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::str::FromStr;
use time::OffsetDateTime;

use crate::{Comment, Email, Role, Ticket, TicketStatus};

fn now() -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap()
}

#[test]
fn test_role_round_trip() {
    for role in [Role::Customer, Role::Agent, Role::Admin] {
        let parsed: Role = Role::from_str(role.as_str()).unwrap();
        assert_eq!(parsed, role);
    }
}

#[test]
fn test_role_rejects_unknown_string() {
    assert!(Role::from_str("superuser").is_err());
    assert!(Role::from_str("Admin").is_err());
    assert!(Role::from_str("").is_err());
}

#[test]
fn test_role_defaults_to_customer() {
    assert_eq!(Role::default(), Role::Customer);
}

#[test]
fn test_status_round_trip() {
    for status in [TicketStatus::Open, TicketStatus::Closed] {
        let parsed: TicketStatus = TicketStatus::from_str(status.as_str()).unwrap();
        assert_eq!(parsed, status);
    }
    assert!(TicketStatus::from_str("pending").is_err());
}

#[test]
fn test_status_transitions() {
    assert!(TicketStatus::Open.can_transition_to(TicketStatus::Closed));
    assert!(TicketStatus::Open.can_transition_to(TicketStatus::Open));
    assert!(TicketStatus::Closed.can_transition_to(TicketStatus::Closed));
    assert!(!TicketStatus::Closed.can_transition_to(TicketStatus::Open));
}

#[test]
fn test_email_normalization() {
    let email: Email = Email::new("  Alice@Example.COM ");
    assert_eq!(email.value(), "alice@example.com");
    assert_eq!(email, Email::new("alice@example.com"));
}

#[test]
fn test_new_ticket_is_open_and_unassigned() {
    let ticket: Ticket = Ticket::new(
        1,
        String::from("Test Ticket"),
        String::from("Something broke"),
        now(),
    );
    assert_eq!(ticket.status, TicketStatus::Open);
    assert!(ticket.assigned_agent_id.is_none());
    assert!(ticket.closed_at.is_none());
    assert!(ticket.is_claimable());
    ticket.validate_close_timestamp().unwrap();
}

#[test]
fn test_assigned_ticket_is_not_claimable() {
    let mut ticket: Ticket = Ticket::new(1, String::from("s"), String::from("d"), now());
    ticket.assigned_agent_id = Some(7);
    assert!(!ticket.is_claimable());
}

#[test]
fn test_closed_ticket_is_not_claimable() {
    let mut ticket: Ticket = Ticket::new(1, String::from("s"), String::from("d"), now());
    ticket.status = TicketStatus::Closed;
    ticket.closed_at = Some(now());
    assert!(!ticket.is_claimable());
    ticket.validate_close_timestamp().unwrap();
}

#[test]
fn test_close_timestamp_invariant_violations() {
    let mut ticket: Ticket = Ticket::new(1, String::from("s"), String::from("d"), now());

    // Closed without a timestamp
    ticket.status = TicketStatus::Closed;
    assert!(ticket.validate_close_timestamp().is_err());

    // Open with a timestamp
    ticket.status = TicketStatus::Open;
    ticket.closed_at = Some(now());
    assert!(ticket.validate_close_timestamp().is_err());
}

#[test]
fn test_comment_snapshots_author_role() {
    let comment: Comment = Comment::new(1, 2, Role::Agent, String::from("On it"), now());
    assert_eq!(comment.author_role, Role::Agent);
    assert!(comment.comment_id.is_none());
}
