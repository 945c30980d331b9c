// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod comments;
mod lifecycle;
mod policy;

#[cfg(test)]
mod tests;

pub use comments::check_comment_order;
pub use lifecycle::{apply_status, assign_agent};
pub use policy::{
    Actor, DenyReason, can_assign_ticket_to_self, can_create_comment, can_create_ticket,
    can_edit_comment, can_edit_user, can_force_assign_ticket, can_generate_report,
    can_list_all_users, can_list_unassigned_tickets, can_update_ticket_status, can_view_ticket,
    can_view_user,
};
