// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// Database connection failed.
    ConnectionFailed(String),
    /// Initialization error.
    InitializationError(String),
    /// Query execution failed.
    QueryFailed(String),
    /// An email address is already registered.
    DuplicateEmail(String),
    /// The requested resource was not found.
    NotFound(String),
    /// A stored record could not be mapped back to a domain value.
    CorruptRecord(String),
    /// Credential hashing failed.
    HashingFailed(String),
    /// A general error occurred.
    Other(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConnectionFailed(msg) => write!(f, "Database connection failed: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::DuplicateEmail(email) => write!(f, "Email already registered: {email}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::CorruptRecord(msg) => write!(f, "Corrupt record: {msg}"),
            Self::HashingFailed(msg) => write!(f, "Credential hashing failed: {msg}"),
            Self::Other(msg) => write!(f, "Persistence error: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<rusqlite::Error> for PersistenceError {
    fn from(err: rusqlite::Error) -> Self {
        Self::QueryFailed(err.to_string())
    }
}
