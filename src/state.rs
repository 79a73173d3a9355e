// ==============================================================================
// state.rs - Application State Management
// ==============================================================================
// Description: Shared application state for authentication gateway
// Author: Matt Barham
// Created: 2026-02-10
// Modified: 2026-03-05
// Version: 1.0.0
// ==============================================================================

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::verifier::{JwtVerifier, TokenVerifier};

/// Default path prefix exempted from authentication
const DEFAULT_PUBLIC_PREFIX: &str = "/public";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Token verification collaborator
    pub verifier: Arc<dyn TokenVerifier>,

    /// Path prefix exempted from authentication
    pub public_prefix: String,
}

impl AppState {
    /// Create new application state from environment
    pub fn new() -> Result<Self> {
        // Shared HMAC secret for access token verification
        let jwt_secret = std::env::var("JWT_SECRET")
            .context("JWT_SECRET must be set")?;

        let public_prefix = std::env::var("PUBLIC_PATH_PREFIX")
            .unwrap_or_else(|_| DEFAULT_PUBLIC_PREFIX.to_string());

        Ok(Self::with_verifier(
            Arc::new(JwtVerifier::new(&jwt_secret)),
            public_prefix,
        ))
    }

    /// Create application state around an injected verifier
    pub fn with_verifier(verifier: Arc<dyn TokenVerifier>, public_prefix: String) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                verifier,
                public_prefix,
            }),
        }
    }

    /// Get token verifier
    pub fn verifier(&self) -> &dyn TokenVerifier {
        self.inner.verifier.as_ref()
    }

    /// Get public path prefix
    pub fn public_prefix(&self) -> &str {
        &self.inner.public_prefix
    }

    /// Create scripted state for testing
    #[cfg(test)]
    pub fn mock(verifier: crate::verifier::testing::ScriptedVerifier) -> Self {
        Self::with_verifier(Arc::new(verifier), DEFAULT_PUBLIC_PREFIX.to_string())
    }
}
