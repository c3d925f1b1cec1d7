// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Caller-context extraction for the callable path.
//!
//! Authentication itself is owned by the platform in front of this
//! service; what arrives here is the authenticated caller's uid in the
//! `X-Caller-Uid` header. The extractor turns that into an `AuthContext`
//! by reading the caller's role claim from the identity store.

use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::{debug, warn};

use crate::{AppState, HttpError};
use corat_api::AuthContext;
use corat_domain::Role;
use corat_persistence::{IdentityError, IdentityProvider};

/// Header carrying the authenticated caller's uid.
pub const CALLER_UID_HEADER: &str = "X-Caller-Uid";

/// Extractor for the authenticated caller's context.
///
/// # Errors
///
/// Rejects with `permission-denied` when the header is missing or not
/// valid UTF-8 (the error surface defines no separate unauthenticated
/// code), and with `internal` when the identity store cannot be read.
pub struct CallerContext(pub AuthContext);

impl FromRequestParts<AppState> for CallerContext {
    type Rejection = HttpError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let uid: &str = parts
            .headers
            .get(CALLER_UID_HEADER)
            .ok_or_else(|| {
                debug!("Missing {CALLER_UID_HEADER} header");
                HttpError::permission_denied("Authentication required")
            })?
            .to_str()
            .map_err(|_| {
                warn!("Invalid {CALLER_UID_HEADER} header encoding");
                HttpError::permission_denied("Authentication required")
            })?;

        let mut backend = state.backend.lock().await;
        let role: Option<Role> = match backend.role_claim(uid) {
            Ok(role) => role,
            // An unknown uid still has an auth context, just no claim;
            // authorization decides what it may do.
            Err(IdentityError::UserNotFound(_)) => None,
            Err(err) => {
                warn!(error = %err, "Failed to read caller role claim");
                return Err(HttpError::internal("Failed to resolve caller identity"));
            }
        };
        drop(backend);

        Ok(Self(AuthContext::new(uid.to_string(), role)))
    }
}
