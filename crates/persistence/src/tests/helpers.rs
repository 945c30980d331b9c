// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::OffsetDateTime;

use helpdesk_domain::{Email, Role, Ticket, User};

use crate::Persistence;

pub fn now() -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap()
}

pub fn later() -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(1_700_100_000).unwrap()
}

pub fn db() -> Persistence {
    Persistence::new_in_memory().expect("in-memory database should open")
}

pub fn create_customer(db: &Persistence, email: &str) -> User {
    db.create_user(&Email::new(email), "password", Role::Customer, now())
        .expect("customer creation should succeed")
}

pub fn create_agent(db: &Persistence, email: &str) -> User {
    db.create_user(&Email::new(email), "password", Role::Agent, now())
        .expect("agent creation should succeed")
}

pub fn create_open_ticket(db: &Persistence, customer_id: i64) -> Ticket {
    let ticket = Ticket::new(
        customer_id,
        String::from("Printer on fire"),
        String::from("Smoke is coming out of the tray"),
        now(),
    );
    db.create_ticket(&ticket)
        .expect("ticket creation should succeed")
}
