// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rusqlite::Connection;
use tracing::info;

use crate::error::PersistenceError;

/// Initializes the database schema.
///
/// Three collections: `users`, `tickets`, `comments`. Ticket and comment
/// references are foreign keys resolved at read time, never embedded
/// copies. Timestamps are stored as ISO 8601 text in UTC.
///
/// # Arguments
///
/// * `conn` - The database connection to initialize
///
/// # Errors
///
/// Returns an error if schema creation fails.
pub fn initialize_schema(conn: &Connection) -> Result<(), PersistenceError> {
    info!("Initializing database schema");

    // Enable foreign key enforcement
    conn.execute("PRAGMA foreign_keys = ON", [])?;

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            user_id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL CHECK(role IN ('customer', 'agent', 'admin')),
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_users_email
            ON users(email);

        CREATE TABLE IF NOT EXISTS tickets (
            ticket_id INTEGER PRIMARY KEY AUTOINCREMENT,
            customer_id INTEGER NOT NULL,
            subject TEXT NOT NULL,
            description TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'open' CHECK(status IN ('open', 'closed')),
            assigned_agent_id INTEGER,
            created_at TEXT NOT NULL,
            closed_at TEXT,
            FOREIGN KEY(customer_id) REFERENCES users(user_id),
            FOREIGN KEY(assigned_agent_id) REFERENCES users(user_id)
        );

        CREATE INDEX IF NOT EXISTS idx_tickets_status
            ON tickets(status, assigned_agent_id);

        CREATE INDEX IF NOT EXISTS idx_tickets_agent
            ON tickets(assigned_agent_id);

        CREATE TABLE IF NOT EXISTS comments (
            comment_id INTEGER PRIMARY KEY AUTOINCREMENT,
            ticket_id INTEGER NOT NULL,
            author_id INTEGER NOT NULL,
            author_role TEXT NOT NULL CHECK(author_role IN ('customer', 'agent', 'admin')),
            text TEXT NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY(ticket_id) REFERENCES tickets(ticket_id),
            FOREIGN KEY(author_id) REFERENCES users(user_id)
        );

        CREATE INDEX IF NOT EXISTS idx_comments_ticket
            ON comments(ticket_id, author_role);
        ",
    )
    .map_err(|e| PersistenceError::InitializationError(e.to_string()))?;

    Ok(())
}

/// Verifies that foreign key enforcement is enabled.
///
/// Referential integrity between tickets, comments, and users depends on
/// the pragma being active for this connection.
///
/// # Arguments
///
/// * `conn` - The database connection to check
///
/// # Errors
///
/// Returns an error if foreign key enforcement is not enabled.
pub fn verify_foreign_key_enforcement(conn: &Connection) -> Result<(), PersistenceError> {
    let foreign_keys_enabled: i32 = conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0))?;

    if foreign_keys_enabled == 0 {
        return Err(PersistenceError::InitializationError(String::from(
            "Foreign key enforcement is not enabled. The server cannot start without FK enforcement.",
        )));
    }

    info!("Foreign key enforcement is enabled");
    Ok(())
}
