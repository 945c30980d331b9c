// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Token-based authentication.
//!
//! Tokens are signed JWTs carrying the user id, email, and role. A
//! token lifetime may be configured; when it is not, issued tokens
//! never expire and remain valid until the signing secret changes.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::debug;

use helpdesk::Actor;
use helpdesk_domain::{Role, User};

/// Token creation and validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The token could not be created.
    #[error("Token creation failed: {0}")]
    Creation(String),
    /// The token failed signature, claim, or expiry checks.
    #[error("Invalid or expired token")]
    Invalid,
}

/// The claims embedded in an issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    /// The user id.
    sub: i64,
    /// The user's email identity.
    email: String,
    /// The user's role at issuance time.
    role: Role,
    /// Issued-at, seconds since the Unix epoch.
    iat: i64,
    /// Expiry, seconds since the Unix epoch. Absent when no lifetime
    /// is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    exp: Option<i64>,
}

/// An authenticated caller, reconstructed from a validated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The user id.
    pub id: i64,
    /// The user's email identity.
    pub email: String,
    /// The role carried in the token.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    #[must_use]
    pub const fn new(id: i64, email: String, role: Role) -> Self {
        Self { id, email, role }
    }

    /// Converts this actor into the policy layer's actor shape.
    #[must_use]
    pub const fn to_policy_actor(&self) -> Actor {
        Actor::new(self.id, self.role)
    }
}

/// Issues and validates signed tokens.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Option<Duration>,
}

impl TokenService {
    /// Creates a token service over a shared secret.
    ///
    /// # Arguments
    ///
    /// * `secret` - The HMAC signing secret
    /// * `lifetime` - Optional token lifetime; `None` issues
    ///   non-expiring tokens
    #[must_use]
    pub fn new(secret: &str, lifetime: Option<Duration>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            lifetime,
        }
    }

    /// Issues a token for a persisted user.
    ///
    /// # Errors
    ///
    /// Returns an error if the user has no id or signing fails.
    pub fn issue(&self, user: &User, now: OffsetDateTime) -> Result<String, TokenError> {
        let Some(user_id) = user.user_id else {
            return Err(TokenError::Creation(String::from(
                "Cannot issue a token for an unpersisted user",
            )));
        };

        let claims: Claims = Claims {
            sub: user_id,
            email: user.email.value().to_string(),
            role: user.role,
            iat: now.unix_timestamp(),
            exp: self
                .lifetime
                .map(|lifetime| (now + lifetime).unix_timestamp()),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Creation(e.to_string()))
    }

    /// Validates a token and reconstructs the authenticated actor.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` if the signature, claims, or
    /// expiry do not check out.
    pub fn authenticate(&self, token: &str) -> Result<AuthenticatedActor, TokenError> {
        let mut validation: Validation = Validation::new(Algorithm::HS256);
        // Expiry is checked when present; non-expiring tokens carry no
        // exp claim at all.
        validation.required_spec_claims.clear();
        validation.validate_exp = true;

        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                debug!("Token validation failed: {}", e);
                TokenError::Invalid
            })?;

        Ok(AuthenticatedActor::new(
            data.claims.sub,
            data.claims.email,
            data.claims.role,
        ))
    }
}
