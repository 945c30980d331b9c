// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API-level errors and the explicit translations into them.
//!
//! Inner-layer errors (domain, policy, persistence) are never leaked
//! directly; every boundary crossing goes through one of the `From`
//! impls below so the wire-facing taxonomy stays closed.

use helpdesk::DenyReason;
use helpdesk_domain::DomainError;
use helpdesk_persistence::PersistenceError;

use crate::auth::TokenError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API
/// contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The requested resource does not exist (or its existence is
    /// deliberately masked).
    NotFound {
        /// A human-readable description.
        message: String,
    },
    /// The actor is authenticated but not permitted to do this.
    PermissionDenied {
        /// A human-readable description.
        message: String,
    },
    /// No valid credential accompanied the request.
    Unauthenticated {
        /// A human-readable description.
        message: String,
    },
    /// Invalid input was provided.
    ValidationFailed {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// The supplied login credentials do not match.
    InvalidCredentials,
    /// The email identity is already registered.
    DuplicateIdentity {
        /// The conflicting email.
        email: String,
    },
    /// A request parameter was not one of the accepted values.
    InvalidArgument {
        /// A human-readable description.
        message: String,
    },
    /// A backing dependency could not be reached.
    DependencyUnavailable {
        /// A human-readable description.
        message: String,
    },
    /// An internal failure that must not leak detail to the caller.
    Internal {
        /// The internal description, for logs only.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { message } => write!(f, "{message}"),
            Self::PermissionDenied { message } => write!(f, "{message}"),
            Self::Unauthenticated { message } => write!(f, "Authentication required: {message}"),
            Self::ValidationFailed { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::InvalidCredentials => write!(f, "Invalid credentials"),
            Self::DuplicateIdentity { email } => {
                write!(f, "Email already registered: {email}")
            }
            Self::InvalidArgument { message } => write!(f, "{message}"),
            Self::DependencyUnavailable { message } => {
                write!(f, "Service unavailable: {message}")
            }
            Self::Internal { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<DenyReason> for ApiError {
    fn from(reason: DenyReason) -> Self {
        match reason {
            // Claim failures are masked so callers cannot probe which
            // tickets exist or who holds them.
            DenyReason::TicketNotClaimable => Self::NotFound {
                message: String::from("Ticket not found or already assigned"),
            },
            other => Self::PermissionDenied {
                message: other.to_string(),
            },
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let field: &str = match &err {
            DomainError::InvalidRole(_) => "role",
            DomainError::InvalidStatus(_) | DomainError::InvalidTransition { .. } => "status",
            DomainError::InvalidEmail(_) => "email",
            DomainError::InvalidPassword(_) => "password",
            DomainError::EmptySubject => "subject",
            DomainError::EmptyDescription => "description",
            DomainError::EmptyCommentText => "text",
            DomainError::CloseTimestampViolation { .. } => {
                return Self::Internal {
                    message: err.to_string(),
                };
            }
        };
        Self::ValidationFailed {
            field: String::from(field),
            message: err.to_string(),
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::DuplicateEmail(email) => Self::DuplicateIdentity { email },
            PersistenceError::NotFound(message) => Self::NotFound {
                message: format!("Not found: {message}"),
            },
            PersistenceError::ConnectionFailed(message) => Self::DependencyUnavailable { message },
            other => Self::Internal {
                message: other.to_string(),
            },
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Creation(message) => Self::Internal { message },
            TokenError::Invalid => Self::Unauthenticated {
                message: String::from("Invalid or expired token"),
            },
        }
    }
}
