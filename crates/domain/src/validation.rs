// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Field-level validation for inbound domain data.

use crate::error::DomainError;

/// Minimum accepted password length.
pub const PASSWORD_MIN_LENGTH: usize = 4;

/// Maximum accepted password length.
pub const PASSWORD_MAX_LENGTH: usize = 20;

/// Validates an email address shape.
///
/// This is a structural check only: non-empty, exactly one `@` with
/// non-empty local and domain parts, and no whitespace. Deliverability
/// is not the domain's concern.
///
/// # Errors
///
/// Returns `DomainError::InvalidEmail` if the address is malformed.
pub fn validate_email(email: &str) -> Result<(), DomainError> {
    let trimmed: &str = email.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidEmail(String::from(
            "Email must not be empty",
        )));
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(DomainError::InvalidEmail(String::from(
            "Email must not contain whitespace",
        )));
    }
    let mut parts = trimmed.splitn(2, '@');
    let local: &str = parts.next().unwrap_or("");
    let domain: &str = parts.next().unwrap_or("");
    if local.is_empty() || domain.is_empty() || domain.contains('@') || !domain.contains('.') {
        return Err(DomainError::InvalidEmail(String::from(
            "Email must be valid",
        )));
    }
    Ok(())
}

/// Validates a password against the length policy.
///
/// # Errors
///
/// Returns `DomainError::InvalidPassword` if the trimmed password is
/// shorter than [`PASSWORD_MIN_LENGTH`] or longer than
/// [`PASSWORD_MAX_LENGTH`].
pub fn validate_password(password: &str) -> Result<(), DomainError> {
    let trimmed: &str = password.trim();
    if trimmed.len() < PASSWORD_MIN_LENGTH || trimmed.len() > PASSWORD_MAX_LENGTH {
        return Err(DomainError::InvalidPassword(format!(
            "Password must be between {PASSWORD_MIN_LENGTH} and {PASSWORD_MAX_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validates the fields of a new ticket.
///
/// # Errors
///
/// Returns an error if the subject or description is empty after
/// trimming.
pub fn validate_ticket_fields(subject: &str, description: &str) -> Result<(), DomainError> {
    if subject.trim().is_empty() {
        return Err(DomainError::EmptySubject);
    }
    if description.trim().is_empty() {
        return Err(DomainError::EmptyDescription);
    }
    Ok(())
}

/// Validates the text of a comment.
///
/// # Errors
///
/// Returns `DomainError::EmptyCommentText` if the text is empty after
/// trimming.
pub fn validate_comment_text(text: &str) -> Result<(), DomainError> {
    if text.trim().is_empty() {
        return Err(DomainError::EmptyCommentText);
    }
    Ok(())
}
