// ==============================================================================
// verifier.rs - Token Verification Boundary
// ==============================================================================
// Description: TokenVerifier trait and HS256 JWT implementation
// Author: Matt Barham
// Created: 2026-02-10
// Modified: 2026-03-05
// Version: 1.0.0
// ==============================================================================
//
// Security: The auth middleware depends only on the TokenVerifier trait; the
// signature scheme and claim schema live entirely behind it. Verification
// failures never propagate as faults - they collapse to false/None so the
// middleware has a single rejection path (401).
//
// ==============================================================================

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Token verification capability consumed by the auth middleware
///
/// Implementations must be stateless with respect to requests: the same token
/// against the same verifier always yields the same answer. Key material may
/// be held privately.
pub trait TokenVerifier: Send + Sync {
    /// Returns true if the token's signature and registered claims check out
    fn validate(&self, token: &str) -> bool;

    /// Returns the numeric subject identity claim, if the token carries one
    ///
    /// Returns `None` both for tokens that fail verification and for valid
    /// tokens without an identity claim.
    fn subject_id(&self, token: &str) -> Option<u64>;
}

/// Access token claims
///
/// `user_id` is the identity claim propagated downstream. The `userId`
/// spelling is accepted for tokens minted by older issuers.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub exp: u64,

    #[serde(default, alias = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
}

/// HS256 JWT verifier (shared-secret deployments)
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    /// Create a verifier from the shared HMAC secret
    pub fn new(secret: &str) -> Self {
        // Default validation requires exp and rejects expired tokens
        let validation = Validation::new(Algorithm::HS256);

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    fn decode(&self, token: &str) -> Option<Claims> {
        match jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Some(data.claims),
            Err(err) => {
                debug!(error = %err, "token decode failed");
                None
            }
        }
    }
}

impl TokenVerifier for JwtVerifier {
    fn validate(&self, token: &str) -> bool {
        self.decode(token).is_some()
    }

    fn subject_id(&self, token: &str) -> Option<u64> {
        self.decode(token).and_then(|claims| claims.user_id)
    }
}

// ==============================================================================
// TEST SUPPORT
// ==============================================================================


// ==============================================================================
// TESTS
// ==============================================================================
