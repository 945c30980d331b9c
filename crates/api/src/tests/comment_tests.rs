// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use helpdesk_domain::Role;

use crate::error::ApiError;
use crate::handlers;
use crate::request_response::{CreateCommentRequest, UpdateCommentRequest};
use crate::tests::helpers::{
    admin, agent, assert_not_found, assert_permission_denied, customer, db, now, open_ticket,
    register,
};

fn comment(text: &str) -> CreateCommentRequest {
    CreateCommentRequest {
        text: text.to_string(),
    }
}

#[test]
fn test_customer_cannot_comment_before_an_agent_does() {
    let db = db();
    let alice = customer(&db);
    let ticket = open_ticket(&db, &alice);

    let result = handlers::create_comment(
        &db,
        ticket.ticket_id,
        &comment("Any update?"),
        &alice,
        now(),
    );
    match result {
        Err(ApiError::PermissionDenied { message }) => {
            assert_eq!(message, "Permission denied. A support agent must comment first");
        }
        other => panic!("expected ordering denial, got {other:?}"),
    }
}

#[test]
fn test_customer_may_comment_after_an_agent_has() {
    let db = db();
    let alice = customer(&db);
    let worker = agent(&db);
    let ticket = open_ticket(&db, &alice);
    handlers::assign_ticket_to_self(&db, ticket.ticket_id, &worker).unwrap();

    handlers::create_comment(&db, ticket.ticket_id, &comment("On it"), &worker, now()).unwrap();

    let reply = handlers::create_comment(
        &db,
        ticket.ticket_id,
        &comment("Thanks!"),
        &alice,
        now(),
    )
    .unwrap();
    assert_eq!(reply.author_role, "customer");
    assert_eq!(reply.author_id, alice.id);
}

#[test]
fn test_admin_comments_do_not_satisfy_the_ordering_rule() {
    let db = db();
    let alice = customer(&db);
    let boss = admin(&db);
    let ticket = open_ticket(&db, &alice);

    handlers::create_comment(&db, ticket.ticket_id, &comment("Looking"), &boss, now()).unwrap();

    let result = handlers::create_comment(
        &db,
        ticket.ticket_id,
        &comment("Any update?"),
        &alice,
        now(),
    );
    assert_permission_denied(result);
}

#[test]
fn test_comment_on_missing_ticket_is_not_found() {
    let db = db();
    let alice = customer(&db);
    assert_not_found(handlers::create_comment(
        &db,
        9999,
        &comment("hello"),
        &alice,
        now(),
    ));
}

#[test]
fn test_non_participant_cannot_comment() {
    let db = db();
    let alice = customer(&db);
    let stranger = register(&db, "stranger@example.com", Role::Customer);
    let ticket = open_ticket(&db, &alice);

    let result = handlers::create_comment(
        &db,
        ticket.ticket_id,
        &comment("drive-by"),
        &stranger,
        now(),
    );
    assert_permission_denied(result);
}

#[test]
fn test_empty_comment_text_fails_validation() {
    let db = db();
    let alice = customer(&db);
    let worker = agent(&db);
    let ticket = open_ticket(&db, &alice);
    handlers::assign_ticket_to_self(&db, ticket.ticket_id, &worker).unwrap();

    let result = handlers::create_comment(&db, ticket.ticket_id, &comment("  "), &worker, now());
    assert!(matches!(
        result,
        Err(ApiError::ValidationFailed { field, .. }) if field == "text"
    ));
}

#[test]
fn test_comment_snapshots_the_authors_role() {
    let db = db();
    let alice = customer(&db);
    let worker = agent(&db);
    let ticket = open_ticket(&db, &alice);
    handlers::assign_ticket_to_self(&db, ticket.ticket_id, &worker).unwrap();

    let posted =
        handlers::create_comment(&db, ticket.ticket_id, &comment("On it"), &worker, now())
            .unwrap();
    assert_eq!(posted.author_role, "agent");
}

#[test]
fn test_comment_visibility_follows_the_parent_ticket() {
    let db = db();
    let alice = customer(&db);
    let worker = agent(&db);
    let stranger = register(&db, "stranger@example.com", Role::Customer);
    let ticket = open_ticket(&db, &alice);
    handlers::assign_ticket_to_self(&db, ticket.ticket_id, &worker).unwrap();

    let posted =
        handlers::create_comment(&db, ticket.ticket_id, &comment("On it"), &worker, now())
            .unwrap();

    assert!(handlers::get_comment(&db, posted.comment_id, &alice).is_ok());
    assert_permission_denied(handlers::get_comment(&db, posted.comment_id, &stranger));
}

#[test]
fn test_get_missing_comment_is_not_found() {
    let db = db();
    let alice = customer(&db);
    assert_not_found(handlers::get_comment(&db, 9999, &alice));
}

#[test]
fn test_only_the_author_may_edit_a_comment() {
    let db = db();
    let alice = customer(&db);
    let worker = agent(&db);
    let boss = admin(&db);
    let ticket = open_ticket(&db, &alice);
    handlers::assign_ticket_to_self(&db, ticket.ticket_id, &worker).unwrap();

    let posted =
        handlers::create_comment(&db, ticket.ticket_id, &comment("On it"), &worker, now())
            .unwrap();
    let edit = UpdateCommentRequest {
        text: String::from("Fixed upstream"),
    };

    // Even an admin may not edit someone else's comment.
    assert_permission_denied(handlers::update_comment(&db, posted.comment_id, &edit, &boss));
    assert_permission_denied(handlers::update_comment(&db, posted.comment_id, &edit, &alice));

    let updated = handlers::update_comment(&db, posted.comment_id, &edit, &worker).unwrap();
    assert_eq!(updated.text, "Fixed upstream");
    assert_eq!(updated.author_role, "agent");
    assert_eq!(updated.created_at, posted.created_at);
}
