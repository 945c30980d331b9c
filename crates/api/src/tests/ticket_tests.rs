// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use helpdesk_domain::Role;

use crate::error::ApiError;
use crate::handlers;
use crate::request_response::{CreateTicketRequest, UpdateTicketStatusRequest};
use crate::tests::helpers::{
    admin, agent, assert_not_found, assert_permission_denied, customer, db, now, open_ticket,
    register,
};

#[test]
fn test_new_ticket_starts_open_and_unassigned() {
    let db = db();
    let alice = customer(&db);
    let ticket = open_ticket(&db, &alice);

    assert_eq!(ticket.status, "open");
    assert!(ticket.assigned_agent_id.is_none());
    assert!(ticket.closed_at.is_none());
    assert_eq!(ticket.customer_id, alice.id);
}

#[test]
fn test_empty_subject_fails_validation() {
    let db = db();
    let alice = customer(&db);
    let request = CreateTicketRequest {
        subject: String::from("   "),
        description: String::from("body"),
    };
    let result = handlers::create_ticket(&db, &request, &alice, now());
    assert!(matches!(
        result,
        Err(ApiError::ValidationFailed { field, .. }) if field == "subject"
    ));
}

#[test]
fn test_ticket_is_visible_to_owner_assignee_and_admin_only() {
    let db = db();
    let alice = customer(&db);
    let stranger = register(&db, "stranger@example.com", Role::Customer);
    let worker = agent(&db);
    let boss = admin(&db);
    let ticket = open_ticket(&db, &alice);

    assert!(handlers::get_ticket(&db, ticket.ticket_id, &alice).is_ok());
    assert!(handlers::get_ticket(&db, ticket.ticket_id, &boss).is_ok());
    assert_permission_denied(handlers::get_ticket(&db, ticket.ticket_id, &stranger));
    // Unassigned agents are not participants either.
    assert_permission_denied(handlers::get_ticket(&db, ticket.ticket_id, &worker));

    handlers::assign_ticket_to_self(&db, ticket.ticket_id, &worker).unwrap();
    assert!(handlers::get_ticket(&db, ticket.ticket_id, &worker).is_ok());
}

#[test]
fn test_get_missing_ticket_is_not_found() {
    let db = db();
    let alice = customer(&db);
    assert_not_found(handlers::get_ticket(&db, 9999, &alice));
}

#[test]
fn test_agent_claims_open_unassigned_ticket() {
    let db = db();
    let alice = customer(&db);
    let worker = agent(&db);
    let ticket = open_ticket(&db, &alice);

    let claimed = handlers::assign_ticket_to_self(&db, ticket.ticket_id, &worker).unwrap();
    assert_eq!(claimed.assigned_agent_id, Some(worker.id));
}

#[test]
fn test_claiming_an_assigned_ticket_reports_masked_not_found() {
    let db = db();
    let alice = customer(&db);
    let first = agent(&db);
    let second = register(&db, "second@example.com", Role::Agent);
    let ticket = open_ticket(&db, &alice);

    handlers::assign_ticket_to_self(&db, ticket.ticket_id, &first).unwrap();
    let result = handlers::assign_ticket_to_self(&db, ticket.ticket_id, &second);
    match result {
        Err(ApiError::NotFound { message }) => {
            assert_eq!(message, "Ticket not found or already assigned");
        }
        other => panic!("expected masked NotFound, got {other:?}"),
    }
}

#[test]
fn test_claiming_a_missing_ticket_reports_the_same_masked_error() {
    let db = db();
    let worker = agent(&db);
    let result = handlers::assign_ticket_to_self(&db, 9999, &worker);
    match result {
        Err(ApiError::NotFound { message }) => {
            assert_eq!(message, "Ticket not found or already assigned");
        }
        other => panic!("expected masked NotFound, got {other:?}"),
    }
}

#[test]
fn test_customers_and_admins_cannot_self_assign() {
    let db = db();
    let alice = customer(&db);
    let boss = admin(&db);
    let ticket = open_ticket(&db, &alice);

    assert_permission_denied(handlers::assign_ticket_to_self(&db, ticket.ticket_id, &alice));
    assert_permission_denied(handlers::assign_ticket_to_self(&db, ticket.ticket_id, &boss));
}

#[test]
fn test_closing_a_ticket_stamps_the_close_timestamp() {
    let db = db();
    let alice = customer(&db);
    let ticket = open_ticket(&db, &alice);

    let closed = handlers::update_ticket_status(
        &db,
        ticket.ticket_id,
        &UpdateTicketStatusRequest {
            status: String::from("closed"),
        },
        &alice,
        now(),
    )
    .unwrap();

    assert_eq!(closed.status, "closed");
    assert!(closed.closed_at.is_some());
}

#[test]
fn test_re_closing_preserves_the_original_close_timestamp() {
    let db = db();
    let alice = customer(&db);
    let ticket = open_ticket(&db, &alice);
    let close = UpdateTicketStatusRequest {
        status: String::from("closed"),
    };

    let first = handlers::update_ticket_status(&db, ticket.ticket_id, &close, &alice, now())
        .unwrap();
    let second = handlers::update_ticket_status(
        &db,
        ticket.ticket_id,
        &close,
        &alice,
        now() + time::Duration::hours(3),
    )
    .unwrap();

    assert_eq!(second.closed_at, first.closed_at);
}

#[test]
fn test_reopening_a_closed_ticket_is_rejected() {
    let db = db();
    let alice = customer(&db);
    let ticket = open_ticket(&db, &alice);

    handlers::update_ticket_status(
        &db,
        ticket.ticket_id,
        &UpdateTicketStatusRequest {
            status: String::from("closed"),
        },
        &alice,
        now(),
    )
    .unwrap();

    let result = handlers::update_ticket_status(
        &db,
        ticket.ticket_id,
        &UpdateTicketStatusRequest {
            status: String::from("open"),
        },
        &alice,
        now(),
    );
    assert!(matches!(
        result,
        Err(ApiError::ValidationFailed { field, .. }) if field == "status"
    ));
}

#[test]
fn test_unknown_status_string_fails_validation() {
    let db = db();
    let alice = customer(&db);
    let ticket = open_ticket(&db, &alice);

    let result = handlers::update_ticket_status(
        &db,
        ticket.ticket_id,
        &UpdateTicketStatusRequest {
            status: String::from("pending"),
        },
        &alice,
        now(),
    );
    assert!(matches!(
        result,
        Err(ApiError::ValidationFailed { field, .. }) if field == "status"
    ));
}

#[test]
fn test_non_participant_cannot_change_status() {
    let db = db();
    let alice = customer(&db);
    let stranger = register(&db, "stranger@example.com", Role::Customer);
    let ticket = open_ticket(&db, &alice);

    let result = handlers::update_ticket_status(
        &db,
        ticket.ticket_id,
        &UpdateTicketStatusRequest {
            status: String::from("closed"),
        },
        &stranger,
        now(),
    );
    assert_permission_denied(result);
}

#[test]
fn test_unassigned_listing_is_for_agents_and_admins() {
    let db = db();
    let alice = customer(&db);
    let worker = agent(&db);
    let boss = admin(&db);
    open_ticket(&db, &alice);
    open_ticket(&db, &alice);

    assert_permission_denied(handlers::list_unassigned_tickets(&db, &alice));
    assert_eq!(handlers::list_unassigned_tickets(&db, &worker).unwrap().len(), 2);
    assert_eq!(handlers::list_unassigned_tickets(&db, &boss).unwrap().len(), 2);
}

#[test]
fn test_agent_workload_listing_shows_only_their_tickets() {
    let db = db();
    let alice = customer(&db);
    let worker = agent(&db);
    let other = register(&db, "other@example.com", Role::Agent);

    let mine = open_ticket(&db, &alice);
    let theirs = open_ticket(&db, &alice);
    handlers::assign_ticket_to_self(&db, mine.ticket_id, &worker).unwrap();
    handlers::assign_ticket_to_self(&db, theirs.ticket_id, &other).unwrap();

    let workload = handlers::list_agent_tickets(&db, &worker).unwrap();
    assert_eq!(workload.len(), 1);
    assert_eq!(workload[0].ticket_id, mine.ticket_id);
}

#[test]
fn test_workload_listing_is_agent_only() {
    let db = db();
    let alice = customer(&db);
    assert_permission_denied(handlers::list_agent_tickets(&db, &alice));
}
