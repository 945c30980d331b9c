// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User persistence functions.

use rusqlite::{Connection, OptionalExtension, params};
use time::OffsetDateTime;
use tracing::{debug, info};

use helpdesk_domain::{Email, Role, User};

use crate::error::PersistenceError;
use crate::timestamps;

/// Raw row shape for a user before domain conversion.
type UserRow = (i64, String, String, String, String);

fn row_to_user(row: UserRow) -> Result<User, PersistenceError> {
    let (user_id, email, password_hash, role_str, created_at_str) = row;
    let role: Role = role_str
        .parse()
        .map_err(|e| PersistenceError::CorruptRecord(format!("user {user_id}: {e}")))?;
    let created_at: OffsetDateTime = timestamps::from_storage(&created_at_str)?;
    Ok(User::with_id(
        user_id,
        Email::new(&email),
        password_hash,
        role,
        created_at,
    ))
}

/// Creates a new user with a hashed credential.
///
/// The email is normalized by [`Email`] before storage; uniqueness is
/// checked first so a collision surfaces as `DuplicateEmail` rather than
/// a raw constraint error.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `email` - The normalized email identity
/// * `password` - The plain-text credential (hashed before storage,
///   never stored or logged)
/// * `role` - The user's role
/// * `created_at` - The registration timestamp
///
/// # Errors
///
/// Returns `DuplicateEmail` if the email is already registered, or an
/// error if hashing or the insert fails.
pub fn create_user(
    conn: &Connection,
    email: &Email,
    password: &str,
    role: Role,
    created_at: OffsetDateTime,
) -> Result<User, PersistenceError> {
    if get_user_by_email(conn, email)?.is_some() {
        return Err(PersistenceError::DuplicateEmail(email.value().to_string()));
    }

    info!("Creating user with email: {}, role: {}", email, role);

    let password_hash: String = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::HashingFailed(e.to_string()))?;
    let created_at_str: String = timestamps::to_storage(created_at)?;

    conn.execute(
        "INSERT INTO users (email, password_hash, role, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![email.value(), password_hash, role.as_str(), created_at_str],
    )?;

    let user_id: i64 = conn.last_insert_rowid();
    info!("Created user with ID: {}", user_id);

    Ok(User::with_id(
        user_id,
        email.clone(),
        password_hash,
        role,
        created_at,
    ))
}

/// Retrieves a user by canonical id.
///
/// # Errors
///
/// Returns an error if the query fails. Returns `Ok(None)` if no user
/// exists with that id.
pub fn get_user_by_id(conn: &Connection, user_id: i64) -> Result<Option<User>, PersistenceError> {
    debug!("Looking up user by id: {}", user_id);

    let row: Option<UserRow> = conn
        .query_row(
            "SELECT user_id, email, password_hash, role, created_at
             FROM users
             WHERE user_id = ?1",
            params![user_id],
            |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                ))
            },
        )
        .optional()?;

    row.map(row_to_user).transpose()
}

/// Retrieves a user by email identity.
///
/// # Errors
///
/// Returns an error if the query fails. Returns `Ok(None)` if no user
/// exists with that email.
pub fn get_user_by_email(
    conn: &Connection,
    email: &Email,
) -> Result<Option<User>, PersistenceError> {
    debug!("Looking up user by email: {}", email);

    let row: Option<UserRow> = conn
        .query_row(
            "SELECT user_id, email, password_hash, role, created_at
             FROM users
             WHERE email = ?1",
            params![email.value()],
            |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                ))
            },
        )
        .optional()?;

    row.map(row_to_user).transpose()
}

/// Lists all users, ordered by id.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_users(conn: &Connection) -> Result<Vec<User>, PersistenceError> {
    let mut stmt = conn.prepare(
        "SELECT user_id, email, password_hash, role, created_at
         FROM users
         ORDER BY user_id ASC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
        ))
    })?;

    let mut users: Vec<User> = Vec::new();
    for row_result in rows {
        let row: UserRow = row_result?;
        users.push(row_to_user(row)?);
    }
    Ok(users)
}

/// Replaces a user's credential with a hash of the new password.
///
/// # Errors
///
/// Returns `NotFound` if no user exists with that id, or an error if
/// hashing or the update fails.
pub fn update_password(
    conn: &Connection,
    user_id: i64,
    new_password: &str,
) -> Result<(), PersistenceError> {
    let password_hash: String = bcrypt::hash(new_password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::HashingFailed(e.to_string()))?;

    let rows: usize = conn.execute(
        "UPDATE users SET password_hash = ?1 WHERE user_id = ?2",
        params![password_hash, user_id],
    )?;

    if rows == 0 {
        return Err(PersistenceError::NotFound(format!("user {user_id}")));
    }

    info!("Updated credential for user {}", user_id);
    Ok(())
}

/// Verifies a plain-text password against a stored hash.
///
/// The comparison re-derives the hash with the stored salt; the
/// plaintext is never stored or logged.
///
/// # Errors
///
/// Returns an error if the stored hash is malformed.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PersistenceError> {
    bcrypt::verify(password, password_hash)
        .map_err(|e| PersistenceError::HashingFailed(e.to_string()))
}

/// Checks whether any admin user exists.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn admin_exists(conn: &Connection) -> Result<bool, PersistenceError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM users WHERE role = 'admin'",
        [],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Ensures a root admin identity exists, creating one if needed.
///
/// Idempotent: if any admin is already present this is a no-op. Called
/// explicitly by the process entry point at startup, never as a module
/// side effect.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `email` - The configured root admin email
/// * `password` - The configured root admin password
/// * `now` - The creation timestamp if an admin must be created
///
/// # Returns
///
/// `true` if a root admin was created, `false` if one already existed.
///
/// # Errors
///
/// Returns an error if the lookup or creation fails.
pub fn ensure_root_admin(
    conn: &Connection,
    email: &Email,
    password: &str,
    now: OffsetDateTime,
) -> Result<bool, PersistenceError> {
    if admin_exists(conn)? {
        info!("Root admin already exists");
        return Ok(false);
    }

    create_user(conn, email, password, Role::Admin, now)?;
    info!("Root admin user created");
    Ok(true)
}
