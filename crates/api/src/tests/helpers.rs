// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::OffsetDateTime;

use helpdesk_domain::{Email, Role};
use helpdesk_persistence::Persistence;

use crate::auth::{AuthenticatedActor, TokenService};
use crate::error::ApiError;
use crate::handlers;
use crate::request_response::{CreateTicketRequest, TicketResponse};

pub fn now() -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap()
}

pub fn db() -> Persistence {
    Persistence::new_in_memory().expect("in-memory database should open")
}

pub fn tokens() -> TokenService {
    TokenService::new("test-secret", None)
}

pub fn register(db: &Persistence, email: &str, role: Role) -> AuthenticatedActor {
    let user = db
        .create_user(&Email::new(email), "password", role, now())
        .expect("user creation should succeed");
    AuthenticatedActor::new(user.user_id.unwrap(), email.to_string(), role)
}

pub fn customer(db: &Persistence) -> AuthenticatedActor {
    register(db, "customer@example.com", Role::Customer)
}

pub fn agent(db: &Persistence) -> AuthenticatedActor {
    register(db, "agent@example.com", Role::Agent)
}

pub fn admin(db: &Persistence) -> AuthenticatedActor {
    register(db, "admin@example.com", Role::Admin)
}

pub fn open_ticket(db: &Persistence, actor: &AuthenticatedActor) -> TicketResponse {
    let request = CreateTicketRequest {
        subject: String::from("Printer on fire"),
        description: String::from("Smoke is coming out of the tray"),
    };
    handlers::create_ticket(db, &request, actor, now()).expect("ticket creation should succeed")
}

pub fn assert_permission_denied(result: Result<impl std::fmt::Debug, ApiError>) {
    match result {
        Err(ApiError::PermissionDenied { .. }) => {}
        other => panic!("expected PermissionDenied, got {other:?}"),
    }
}

pub fn assert_not_found(result: Result<impl std::fmt::Debug, ApiError>) {
    match result {
        Err(ApiError::NotFound { .. }) => {}
        other => panic!("expected NotFound, got {other:?}"),
    }
}
