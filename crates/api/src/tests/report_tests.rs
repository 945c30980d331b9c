// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::Duration;

use crate::error::ApiError;
use crate::handlers;
use crate::request_response::{CreateTicketRequest, UpdateTicketStatusRequest};
use crate::tests::helpers::{
    admin, agent, assert_not_found, assert_permission_denied, customer, db, now,
};

use helpdesk_persistence::Persistence;

use crate::auth::AuthenticatedActor;

fn close_ticket_at(
    db: &Persistence,
    actor: &AuthenticatedActor,
    subject: &str,
    closed_at: time::OffsetDateTime,
) {
    let ticket = handlers::create_ticket(
        db,
        &CreateTicketRequest {
            subject: subject.to_string(),
            description: String::from("details"),
        },
        actor,
        now(),
    )
    .unwrap();
    handlers::update_ticket_status(
        db,
        ticket.ticket_id,
        &UpdateTicketStatusRequest {
            status: String::from("closed"),
        },
        actor,
        closed_at,
    )
    .unwrap();
}

#[test]
fn test_report_is_denied_to_customers() {
    let db = db();
    let alice = customer(&db);
    assert_permission_denied(handlers::generate_ticket_report(&db, "csv", &alice, now()));
}

#[test]
fn test_empty_reporting_window_is_not_found() {
    let db = db();
    let worker = agent(&db);
    assert_not_found(handlers::generate_ticket_report(&db, "csv", &worker, now()));
}

#[test]
fn test_unknown_format_is_rejected() {
    let db = db();
    let alice = customer(&db);
    let worker = agent(&db);
    close_ticket_at(&db, &alice, "One", now());

    let result = handlers::generate_ticket_report(&db, "pdf", &worker, now());
    assert!(matches!(result, Err(ApiError::InvalidArgument { .. })));
}

#[test]
fn test_csv_report_carries_header_and_closed_tickets() {
    let db = db();
    let alice = customer(&db);
    let boss = admin(&db);
    close_ticket_at(&db, &alice, "Broken keyboard", now());
    close_ticket_at(&db, &alice, "Cracked screen", now());

    let report = handlers::generate_ticket_report(&db, "csv", &boss, now()).unwrap();
    assert_eq!(report.content_type, "text/csv");
    assert_eq!(report.filename, "tickets_report.csv");

    let body = String::from_utf8(report.bytes).unwrap();
    let mut lines = body.lines();
    assert_eq!(lines.next(), Some("subject,description,closed_at"));
    assert!(body.contains("Broken keyboard"));
    assert!(body.contains("Cracked screen"));
    assert_eq!(body.lines().count(), 3);
}

#[test]
fn test_report_excludes_tickets_closed_before_the_window() {
    let db = db();
    let alice = customer(&db);
    let worker = agent(&db);
    close_ticket_at(&db, &alice, "Ancient history", now() - Duration::days(90));
    close_ticket_at(&db, &alice, "Fresh", now() - Duration::days(2));

    let report = handlers::generate_ticket_report(&db, "csv", &worker, now()).unwrap();
    let body = String::from_utf8(report.bytes).unwrap();
    assert!(body.contains("Fresh"));
    assert!(!body.contains("Ancient history"));
}

#[test]
fn test_report_excludes_open_tickets() {
    let db = db();
    let alice = customer(&db);
    let worker = agent(&db);
    close_ticket_at(&db, &alice, "Closed one", now());
    handlers::create_ticket(
        &db,
        &CreateTicketRequest {
            subject: String::from("Still open"),
            description: String::from("details"),
        },
        &alice,
        now(),
    )
    .unwrap();

    let report = handlers::generate_ticket_report(&db, "csv", &worker, now()).unwrap();
    let body = String::from_utf8(report.bytes).unwrap();
    assert!(!body.contains("Still open"));
}

#[test]
fn test_text_report_is_paginated_with_headers() {
    let db = db();
    let alice = customer(&db);
    let worker = agent(&db);
    // One more than a full page forces a second page.
    for i in 0..21 {
        close_ticket_at(&db, &alice, &format!("Ticket {i}"), now());
    }

    let report = handlers::generate_ticket_report(&db, "text", &worker, now()).unwrap();
    assert_eq!(report.content_type, "text/plain");
    assert_eq!(report.filename, "tickets_report.txt");

    let body = String::from_utf8(report.bytes).unwrap();
    assert!(body.contains("page 1 of 2"));
    assert!(body.contains("page 2 of 2"));
    assert!(body.contains("Subject:     Ticket 0"));
    assert!(body.contains("Subject:     Ticket 20"));
}
