// ==============================================================================
// middleware/auth.rs - Bearer Authentication Middleware
// ==============================================================================
// Description: Authenticate inbound requests and inject the identity header
// Author: Matt Barham
// Created: 2026-02-10
// Modified: 2026-03-05
// Version: 1.0.0
// ==============================================================================
//
// Security: Every request outside the public path prefix must present a
// verifiable bearer token. All rejection reasons collapse to a bare 401 with
// an empty body so the wire response does not reveal which check failed; the
// distinction is logged, not returned.
//
// The X-User-Id header is always overwritten on allow, never appended, so a
// client-supplied value can never reach a downstream handler.
//
// ==============================================================================

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderName, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, info, warn};

use crate::state::AppState;
use crate::verifier::TokenVerifier;

/// Header carrying the verified subject identity downstream
pub const USER_ID_HEADER: HeaderName = HeaderName::from_static("x-user-id");

/// Authorization scheme prefix, matched case-sensitively including the space
const BEARER_PREFIX: &str = "Bearer ";

/// Per-request authentication decision
///
/// Computed fresh for every request and discarded once the request completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    /// Forward with the subject identity header set
    Allow { subject_id: u64 },
    /// Short-circuit with this status and an empty body
    Reject { status: StatusCode },
}

/// Decide whether a non-public request may pass, first matching rule wins
///
/// `auth_header` is the `Authorization` value as a string, or `None` when the
/// header is absent or not valid visible ASCII.
pub fn authorize(verifier: &dyn TokenVerifier, auth_header: Option<&str>) -> AuthDecision {
    let reject = AuthDecision::Reject {
        status: StatusCode::UNAUTHORIZED,
    };

    let Some(auth_header) = auth_header else {
        debug!(reason = "missing_header", "no Authorization header");
        return reject;
    };

    let Some(token) = auth_header.strip_prefix(BEARER_PREFIX) else {
        debug!(reason = "malformed_header", "Authorization is not a bearer credential");
        return reject;
    };

    if !verifier.validate(token) {
        debug!(reason = "invalid_token", "token failed verification");
        return reject;
    }

    let Some(subject_id) = verifier.subject_id(token) else {
        debug!(reason = "missing_subject", "token carries no identity claim");
        return reject;
    };

    AuthDecision::Allow { subject_id }
}

/// Authentication middleware applied to every inbound request
///
/// Requests under the public path prefix bypass authentication entirely and
/// are forwarded untouched. Everything else must carry a valid bearer token;
/// on success the request is forwarded with `X-User-Id` set to the verified
/// subject, and the downstream response is returned unaltered.
pub async fn auth_gate(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();

    // Public endpoints skip authentication
    if path.starts_with(state.public_prefix()) {
        debug!(path = %path, outcome = "bypass", "public path, skipping auth");
        return next.run(req).await;
    }

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    match authorize(state.verifier(), auth_header) {
        AuthDecision::Allow { subject_id } => {
            info!(path = %path, outcome = "allow", subject_id, "request authenticated");

            // Overwrite, never append: spoofed inbound values must not survive
            req.headers_mut()
                .insert(USER_ID_HEADER, HeaderValue::from(subject_id));

            next.run(req).await
        }
        AuthDecision::Reject { status } => {
            warn!(path = %path, outcome = "reject", status = %status.as_u16(), "request rejected");
            status.into_response()
        }
    }
}

// ==============================================================================
// TESTS
// ==============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verifier::testing::ScriptedVerifier;
    use axum::{middleware, routing::get, Router};
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };
    use tower::ServiceExt;

    // --------------------------------------------------------------------------
    // authorize() unit tests
    // --------------------------------------------------------------------------

    const REJECT: AuthDecision = AuthDecision::Reject {
        status: StatusCode::UNAUTHORIZED,
    };

    #[test]
    fn test_missing_header_rejected() {
        let verifier = ScriptedVerifier::allowing(42);
        assert_eq!(authorize(&verifier, None), REJECT);
    }

    #[test]
    fn test_non_bearer_schemes_rejected() {
        // A permissive verifier must never be consulted for these
        let verifier = ScriptedVerifier::allowing(42);

        assert_eq!(authorize(&verifier, Some("Basic abc")), REJECT);
        assert_eq!(authorize(&verifier, Some("")), REJECT);
        // Scheme match is case-sensitive
        assert_eq!(authorize(&verifier, Some("bearer xyz")), REJECT);
        // Missing space after the scheme
        assert_eq!(authorize(&verifier, Some("Bearertoken")), REJECT);
    }

    #[test]
    fn test_invalid_token_rejected() {
        let verifier = ScriptedVerifier::rejecting();
        assert_eq!(authorize(&verifier, Some("Bearer bad-token")), REJECT);
    }

    #[test]
    fn test_valid_token_without_subject_rejected() {
        let verifier = ScriptedVerifier {
            valid: true,
            subject: None,
        };
        assert_eq!(authorize(&verifier, Some("Bearer anonymous")), REJECT);
    }

    #[test]
    fn test_valid_token_with_subject_allowed() {
        let verifier = ScriptedVerifier::allowing(42);
        assert_eq!(
            authorize(&verifier, Some("Bearer good-token")),
            AuthDecision::Allow { subject_id: 42 }
        );
    }

    #[test]
    fn test_decision_is_idempotent() {
        let verifier = ScriptedVerifier::allowing(7);

        let first = authorize(&verifier, Some("Bearer token"));
        let second = authorize(&verifier, Some("Bearer token"));
        assert_eq!(first, second);

        let first = authorize(&verifier, None);
        let second = authorize(&verifier, None);
        assert_eq!(first, second);
    }

    // --------------------------------------------------------------------------
    // end-to-end router tests
    // --------------------------------------------------------------------------

    use crate::state::AppState;
    use axum::http::HeaderMap;

    /// Test router: one public route, one protected route that echoes the
    /// injected identity header, and a hit counter proving whether the
    /// downstream handler ran.
    fn test_router(state: AppState, hits: Arc<AtomicUsize>) -> Router {
        let echo_hits = hits.clone();
        let echo = move |headers: HeaderMap| {
            let echo_hits = echo_hits.clone();
            async move {
                echo_hits.fetch_add(1, Ordering::SeqCst);
                headers
                    .get(USER_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("<unset>")
                    .to_string()
            }
        };

        let public = move || {
            let hits = hits.clone();
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                "public ok"
            }
        };

        Router::new()
            .route("/public/status", get(public))
            .route("/api/me", get(echo))
            .layer(middleware::from_fn_with_state(state.clone(), auth_gate))
            .with_state(state)
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn request(uri: &str) -> axum::http::request::Builder {
        Request::builder().uri(uri)
    }

    #[tokio::test]
    async fn test_public_path_bypasses_auth() {
        let hits = Arc::new(AtomicUsize::new(0));
        // Verifier would reject everything, but must never be asked
        let router = test_router(AppState::mock(ScriptedVerifier::rejecting()), hits.clone());

        let response = router
            .oneshot(request("/public/status").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "public ok");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_header_gets_bare_401() {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = test_router(AppState::mock(ScriptedVerifier::allowing(42)), hits.clone());

        let response = router
            .oneshot(request("/api/me").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(body_string(response).await.is_empty());
        // Downstream never invoked
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_token_gets_bare_401() {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = test_router(AppState::mock(ScriptedVerifier::rejecting()), hits.clone());

        let response = router
            .oneshot(
                request("/api/me")
                    .header(header::AUTHORIZATION, "Bearer bad-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(body_string(response).await.is_empty());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_allowed_request_carries_identity_header() {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = test_router(AppState::mock(ScriptedVerifier::allowing(42)), hits.clone());

        let response = router
            .oneshot(
                request("/api/me")
                    .header(header::AUTHORIZATION, "Bearer good-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        // Downstream response returned unaltered
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "42");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_spoofed_identity_header_is_overwritten() {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = test_router(AppState::mock(ScriptedVerifier::allowing(42)), hits.clone());

        let response = router
            .oneshot(
                request("/api/me")
                    .header(header::AUTHORIZATION, "Bearer good-token")
                    .header("X-User-Id", "999")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "42");
    }
}
