// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use helpdesk_domain::{Role, Ticket, TicketStatus};
use time::OffsetDateTime;

use crate::Actor;

pub const CUSTOMER_ID: i64 = 1;
pub const AGENT_ID: i64 = 2;
pub const ADMIN_ID: i64 = 3;
pub const OTHER_CUSTOMER_ID: i64 = 4;

pub fn now() -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap()
}

pub fn customer() -> Actor {
    Actor::new(CUSTOMER_ID, Role::Customer)
}

pub fn agent() -> Actor {
    Actor::new(AGENT_ID, Role::Agent)
}

pub fn admin() -> Actor {
    Actor::new(ADMIN_ID, Role::Admin)
}

pub fn other_customer() -> Actor {
    Actor::new(OTHER_CUSTOMER_ID, Role::Customer)
}

/// A fresh open, unassigned ticket owned by `CUSTOMER_ID`.
pub fn open_ticket() -> Ticket {
    Ticket::new(
        CUSTOMER_ID,
        String::from("Test Ticket"),
        String::from("Something is broken"),
        now(),
    )
}

/// An open ticket already assigned to `AGENT_ID`.
pub fn assigned_ticket() -> Ticket {
    let mut ticket: Ticket = open_ticket();
    ticket.assigned_agent_id = Some(AGENT_ID);
    ticket
}

/// A closed ticket owned by `CUSTOMER_ID`.
pub fn closed_ticket() -> Ticket {
    let mut ticket: Ticket = open_ticket();
    ticket.status = TicketStatus::Closed;
    ticket.closed_at = Some(now());
    ticket
}
