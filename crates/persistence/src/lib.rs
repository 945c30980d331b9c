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

//! SQLite-backed persistence for the helpdesk workspace.
//!
//! All storage access goes through [`Persistence`], which owns the
//! connection and exposes one method per operation. The free functions
//! in the sub-modules take a `&Connection` directly so tests can reach
//! them without a full handle.

mod comments;
mod error;
mod schema;
mod tickets;
mod timestamps;
mod users;

#[cfg(test)]
mod tests;

use rusqlite::Connection;
use time::OffsetDateTime;
use tracing::info;

use helpdesk_domain::{Comment, Email, Role, Ticket, User};

pub use error::PersistenceError;
pub use users::verify_password;

/// Handle over the SQLite database.
///
/// Construction initializes the schema and verifies that foreign key
/// enforcement is active for the connection.
pub struct Persistence {
    conn: Connection,
}

impl Persistence {
    /// Opens an in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let conn: Connection = Connection::open_in_memory()
            .map_err(|e| PersistenceError::ConnectionFailed(e.to_string()))?;
        Self::initialize(conn)
    }

    /// Opens (or creates) a database file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file(path: &str) -> Result<Self, PersistenceError> {
        info!("Opening database at {}", path);
        let conn: Connection =
            Connection::open(path).map_err(|e| PersistenceError::ConnectionFailed(e.to_string()))?;
        Self::initialize(conn)
    }

    fn initialize(conn: Connection) -> Result<Self, PersistenceError> {
        schema::initialize_schema(&conn)?;
        schema::verify_foreign_key_enforcement(&conn)?;
        Ok(Self { conn })
    }

    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateEmail` if the email is taken, or an error if
    /// hashing or the insert fails.
    pub fn create_user(
        &self,
        email: &Email,
        password: &str,
        role: Role,
        created_at: OffsetDateTime,
    ) -> Result<User, PersistenceError> {
        users::create_user(&self.conn, email, password, role, created_at)
    }

    /// Retrieves a user by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_user_by_id(&self, user_id: i64) -> Result<Option<User>, PersistenceError> {
        users::get_user_by_id(&self.conn, user_id)
    }

    /// Retrieves a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_user_by_email(&self, email: &Email) -> Result<Option<User>, PersistenceError> {
        users::get_user_by_email(&self.conn, email)
    }

    /// Lists all users, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_users(&self) -> Result<Vec<User>, PersistenceError> {
        users::list_users(&self.conn)
    }

    /// Replaces a user's credential with a hash of the new password.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user does not exist, or an error if
    /// hashing or the update fails.
    pub fn update_password(&self, user_id: i64, new_password: &str) -> Result<(), PersistenceError> {
        users::update_password(&self.conn, user_id, new_password)
    }

    /// Ensures a root admin identity exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup or creation fails.
    pub fn ensure_root_admin(
        &self,
        email: &Email,
        password: &str,
        now: OffsetDateTime,
    ) -> Result<bool, PersistenceError> {
        users::ensure_root_admin(&self.conn, email, password, now)
    }

    /// Persists a new ticket.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_ticket(&self, ticket: &Ticket) -> Result<Ticket, PersistenceError> {
        tickets::create_ticket(&self.conn, ticket)
    }

    /// Retrieves a ticket by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_ticket(&self, ticket_id: i64) -> Result<Option<Ticket>, PersistenceError> {
        tickets::get_ticket(&self.conn, ticket_id)
    }

    /// Atomically claims an open, unassigned ticket for an agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn try_claim_ticket(&self, ticket_id: i64, agent_id: i64) -> Result<bool, PersistenceError> {
        tickets::try_claim_ticket(&self.conn, ticket_id, agent_id)
    }

    /// Persists a ticket's status and close timestamp.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the ticket does not exist, or an error if
    /// the update fails.
    pub fn update_ticket_status(&self, ticket: &Ticket) -> Result<(), PersistenceError> {
        tickets::update_ticket_status(&self.conn, ticket)
    }

    /// Unconditionally assigns a ticket to an agent.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the ticket does not exist, or an error if
    /// the update fails.
    pub fn force_assign_ticket(&self, ticket_id: i64, agent_id: i64) -> Result<(), PersistenceError> {
        tickets::force_assign_ticket(&self.conn, ticket_id, agent_id)
    }

    /// Lists open tickets with no assigned agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_unassigned_tickets(&self) -> Result<Vec<Ticket>, PersistenceError> {
        tickets::list_unassigned_tickets(&self.conn)
    }

    /// Lists tickets assigned to a specific agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_tickets_by_agent(&self, agent_id: i64) -> Result<Vec<Ticket>, PersistenceError> {
        tickets::list_tickets_by_agent(&self.conn, agent_id)
    }

    /// Lists closed tickets whose close timestamp falls on or after the
    /// cutoff.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_closed_tickets_since(
        &self,
        cutoff: OffsetDateTime,
    ) -> Result<Vec<Ticket>, PersistenceError> {
        tickets::list_closed_tickets_since(&self.conn, cutoff)
    }

    /// Persists a new comment.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_comment(&self, comment: &Comment) -> Result<Comment, PersistenceError> {
        comments::create_comment(&self.conn, comment)
    }

    /// Retrieves a comment by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_comment(&self, comment_id: i64) -> Result<Option<Comment>, PersistenceError> {
        comments::get_comment(&self.conn, comment_id)
    }

    /// Replaces a comment's text.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the comment does not exist, or an error if
    /// the update fails.
    pub fn update_comment_text(&self, comment_id: i64, text: &str) -> Result<(), PersistenceError> {
        comments::update_comment_text(&self.conn, comment_id, text)
    }

    /// Checks whether any comment on a ticket was authored by an agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn has_agent_comment(&self, ticket_id: i64) -> Result<bool, PersistenceError> {
        comments::has_agent_comment(&self.conn, ticket_id)
    }
}
