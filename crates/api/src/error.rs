// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the callable boundary.

use tracing::error;

use crate::auth::AuthError;
use corat_persistence::{IdentityError, PersistenceError};

/// Short wire codes for callable failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallErrorCode {
    /// The caller is not allowed to perform this call.
    PermissionDenied,
    /// The request payload is missing or malformed data.
    InvalidArgument,
    /// The resource being created already exists.
    AlreadyExists,
    /// An unspecified server-side failure.
    Internal,
}

impl CallErrorCode {
    /// Converts this code to its wire string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "permission-denied",
            Self::InvalidArgument => "invalid-argument",
            Self::AlreadyExists => "already-exists",
            Self::Internal => "internal",
        }
    }
}

impl std::fmt::Display for CallErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A structured, coded failure returned to the calling client.
///
/// Callable handlers return this as an explicit result variant rather than
/// throwing; the code is the client-facing contract and the message is
/// human-readable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallError {
    /// The short wire code.
    pub code: CallErrorCode,
    /// A human-readable message.
    pub message: String,
}

impl CallError {
    /// Creates a `permission-denied` failure.
    #[must_use]
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self {
            code: CallErrorCode::PermissionDenied,
            message: message.into(),
        }
    }

    /// Creates an `invalid-argument` failure.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self {
            code: CallErrorCode::InvalidArgument,
            message: message.into(),
        }
    }

    /// Creates an `already-exists` failure.
    #[must_use]
    pub fn already_exists(message: impl Into<String>) -> Self {
        Self {
            code: CallErrorCode::AlreadyExists,
            message: message.into(),
        }
    }

    /// Creates an `internal` failure.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: CallErrorCode::Internal,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for CallError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for CallError {}

impl From<AuthError> for CallError {
    fn from(err: AuthError) -> Self {
        Self::permission_denied(err.to_string())
    }
}

/// Translates an identity error into a callable failure.
///
/// The known "email already exists" condition keeps its informative
/// message; policy violations surface as `invalid-argument`; everything
/// else is logged and collapsed to a generic `internal` code so backend
/// details never leak to the client.
#[must_use]
pub fn translate_identity_error(err: IdentityError) -> CallError {
    match err {
        IdentityError::EmailAlreadyExists(email) => CallError::already_exists(format!(
            "The placeholder email '{email}' (derived from the identifier) already exists"
        )),
        IdentityError::PasswordPolicy(policy_err) => {
            CallError::invalid_argument(policy_err.to_string())
        }
        other => {
            error!(error = %other, "Identity service error");
            CallError::internal("An internal error occurred while creating the user")
        }
    }
}

/// Translates a store error into a callable failure.
///
/// Always a generic `internal` code; the underlying error is logged, not
/// surfaced.
#[must_use]
pub fn translate_store_error(err: PersistenceError) -> CallError {
    error!(error = %err, "Store error");
    CallError::internal("An internal error occurred while creating the user")
}
