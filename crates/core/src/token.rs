//! Invitation token service.
//!
//! Tokens are signed JWTs binding an invitee email to a pending organization
//! name. They are bearer credentials: the durable side effect of issuing one
//! is the pending organization row, not the token itself.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;

/// Payload type discriminator embedded in every invitation token.
pub const INVITATION_TOKEN_TYPE: &str = "organization_invitation";

/// Claims embedded in an invitation token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationClaims {
    pub email: String,
    #[serde(rename = "organizationName")]
    pub organization_name: String,
    #[serde(rename = "type")]
    pub token_type: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    pub exp: i64,
}

/// Issues and verifies signed, time-limited invitation tokens.
///
/// Rotating the signing secret invalidates all outstanding tokens.
#[derive(Clone)]
pub struct InvitationTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validity: Duration,
    validation: Validation,
}

impl InvitationTokenService {
    pub fn new(secret: &str, validity: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // No clock leeway: a token past its window is invalid immediately.
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validity,
            validation,
        }
    }

    /// Mint a token binding `email` to `organization_name`, expiring after
    /// the configured validity window.
    pub fn issue(&self, email: &str, organization_name: &str) -> AppResult<String> {
        let now = Utc::now();
        let claims = InvitationClaims {
            email: email.to_string(),
            organization_name: organization_name.to_string(),
            token_type: INVITATION_TOKEN_TYPE.to_string(),
            created_at: now,
            exp: (now + self.validity).timestamp(),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    /// Validate signature and expiry, returning the embedded claims.
    ///
    /// Returns `None` on any failure — malformed token, bad signature,
    /// expired token, or a payload of the wrong type. Callers cannot
    /// distinguish these cases from the result alone.
    pub fn verify(&self, token: &str) -> Option<InvitationClaims> {
        let data = decode::<InvitationClaims>(token, &self.decoding_key, &self.validation).ok()?;

        if data.claims.token_type != INVITATION_TOKEN_TYPE {
            return None;
        }

        Some(data.claims)
    }
}
