// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication context and authorization checks.

use tracing::warn;

use corat_domain::Role;

/// Authentication context of a callable invocation.
///
/// The platform in front of the service owns authentication; what reaches
/// a handler is the authenticated caller's uid and whatever role claim is
/// attached to their identity account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// The authenticated caller's uid.
    pub uid: String,
    /// The caller's role claim, if one is attached.
    pub role: Option<Role>,
}

impl AuthContext {
    /// Creates a new auth context.
    ///
    /// # Arguments
    ///
    /// * `uid` - The authenticated caller's uid
    /// * `role` - The caller's role claim, if any
    #[must_use]
    pub const fn new(uid: String, role: Option<Role>) -> Self {
        Self { uid, role }
    }
}

/// Authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The caller does not hold the role required for the action.
    Unauthorized {
        /// The caller's uid.
        uid: String,
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthorized {
                action,
                required_role,
                ..
            } => {
                write!(f, "Only {required_role} accounts may {action}")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// Authorization service for enforcing role-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks if a caller is authorized to provision a new user.
    ///
    /// Only callers holding the `superusuario` role claim may provision
    /// users.
    ///
    /// # Arguments
    ///
    /// * `context` - The caller's auth context
    ///
    /// # Errors
    ///
    /// Returns an error if the caller does not hold the `superusuario`
    /// role.
    pub fn authorize_provision_user(context: &AuthContext) -> Result<(), AuthError> {
        if context.role == Some(Role::Superusuario) {
            return Ok(());
        }
        warn!(uid = %context.uid, "Unauthorized attempt to provision a user");
        Err(AuthError::Unauthorized {
            uid: context.uid.clone(),
            action: String::from("create accounts"),
            required_role: Role::Superusuario.as_str().to_string(),
        })
    }
}
