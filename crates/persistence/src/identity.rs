// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Local identity provider.
//!
//! Accounts live in the same database as the documents they gate access
//! to: a uid, a unique email, a bcrypt password hash, and an optional role
//! claim readable later from the auth context. Plain-text passwords never
//! appear in logs.

use diesel::prelude::*;
use thiserror::Error;
use tracing::info;

use crate::SqlitePersistence;
use crate::data_models::NewIdentityAccountRow;
use crate::diesel_schema::identity_accounts;
use corat_domain::Role;

/// Minimum password length accepted by the identity provider.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Password policy errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordPolicyError {
    /// Password is too short.
    #[error("Password must be at least {min_length} characters long")]
    TooShort {
        /// The required minimum length.
        min_length: usize,
    },
}

/// Errors that can occur during identity operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// An account with this email already exists.
    EmailAlreadyExists(String),
    /// No account exists for this uid.
    UserNotFound(String),
    /// The stored role claim is not a known role.
    InvalidRoleClaim(String),
    /// The password was rejected by policy.
    PasswordPolicy(PasswordPolicyError),
    /// The identity backend failed.
    Backend(String),
}

impl std::fmt::Display for IdentityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmailAlreadyExists(email) => {
                write!(f, "An account with email '{email}' already exists")
            }
            Self::UserNotFound(uid) => write!(f, "No account exists for uid '{uid}'"),
            Self::InvalidRoleClaim(claim) => {
                write!(f, "Stored role claim '{claim}' is not a known role")
            }
            Self::PasswordPolicy(err) => write!(f, "{err}"),
            Self::Backend(msg) => write!(f, "Identity backend error: {msg}"),
        }
    }
}

impl std::error::Error for IdentityError {}

impl From<PasswordPolicyError> for IdentityError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicy(err)
    }
}

impl From<diesel::result::Error> for IdentityError {
    fn from(err: diesel::result::Error) -> Self {
        Self::Backend(err.to_string())
    }
}

/// Request to create an identity account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIdentityUser {
    /// The account email; normalized to lowercase for uniqueness.
    pub email: String,
    /// The plain-text password; stored only as a bcrypt hash.
    pub password: String,
    /// The display name.
    pub display_name: String,
}

/// A created identity account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityUser {
    /// The issued unique id.
    pub uid: String,
    /// The normalized email the account was created with.
    pub email: String,
    /// The display name.
    pub display_name: String,
    /// The role claim, if one has been attached.
    pub role_claim: Option<Role>,
}

/// Identity collaborator: account creation and role claims.
///
/// Like the store, this is an injected collaborator so handler tests can
/// substitute a double.
pub trait IdentityProvider {
    /// Creates an identity account and returns the issued uid.
    ///
    /// # Errors
    ///
    /// Returns an error if the email already exists, the password violates
    /// policy, or the backend fails.
    fn create_user(&mut self, new_user: &NewIdentityUser) -> Result<IdentityUser, IdentityError>;

    /// Attaches a role claim to an existing account.
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist or the backend
    /// fails.
    fn set_role_claim(&mut self, uid: &str, role: Role) -> Result<(), IdentityError>;

    /// Reads the role claim attached to an account, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist, the stored claim is
    /// unknown, or the backend fails.
    fn role_claim(&mut self, uid: &str) -> Result<Option<Role>, IdentityError>;
}

fn validate_password(password: &str) -> Result<(), PasswordPolicyError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PasswordPolicyError::TooShort {
            min_length: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

fn generate_uid() -> String {
    format!("{:016x}{:016x}", rand::random::<u64>(), rand::random::<u64>())
}

impl IdentityProvider for SqlitePersistence {
    fn create_user(&mut self, new_user: &NewIdentityUser) -> Result<IdentityUser, IdentityError> {
        let email: String = new_user.email.trim().to_lowercase();
        validate_password(&new_user.password)?;

        let existing: Option<String> = identity_accounts::table
            .filter(identity_accounts::email.eq(&email))
            .select(identity_accounts::uid)
            .first::<String>(&mut self.conn)
            .optional()?;
        if existing.is_some() {
            return Err(IdentityError::EmailAlreadyExists(email));
        }

        let uid: String = generate_uid();
        let password_hash: String = bcrypt::hash(&new_user.password, bcrypt::DEFAULT_COST)
            .map_err(|e| IdentityError::Backend(format!("Failed to hash password: {e}")))?;

        let row: NewIdentityAccountRow<'_> = NewIdentityAccountRow {
            uid: &uid,
            email: &email,
            password_hash: &password_hash,
            display_name: &new_user.display_name,
            role_claim: None,
        };
        diesel::insert_into(identity_accounts::table)
            .values(&row)
            .execute(&mut self.conn)?;

        info!(uid = %uid, email = %email, "Identity account created");

        Ok(IdentityUser {
            uid,
            email,
            display_name: new_user.display_name.clone(),
            role_claim: None,
        })
    }

    fn set_role_claim(&mut self, uid: &str, role: Role) -> Result<(), IdentityError> {
        let updated: usize = diesel::update(
            identity_accounts::table.filter(identity_accounts::uid.eq(uid)),
        )
        .set(identity_accounts::role_claim.eq(role.as_str()))
        .execute(&mut self.conn)?;

        if updated == 0 {
            return Err(IdentityError::UserNotFound(uid.to_string()));
        }

        info!(uid, role = role.as_str(), "Role claim attached");
        Ok(())
    }

    fn role_claim(&mut self, uid: &str) -> Result<Option<Role>, IdentityError> {
        let claim: Option<Option<String>> = identity_accounts::table
            .filter(identity_accounts::uid.eq(uid))
            .select(identity_accounts::role_claim)
            .first::<Option<String>>(&mut self.conn)
            .optional()?;

        match claim {
            None => Err(IdentityError::UserNotFound(uid.to_string())),
            Some(None) => Ok(None),
            Some(Some(value)) => Role::parse(&value)
                .map(Some)
                .map_err(|_| IdentityError::InvalidRoleClaim(value)),
        }
    }
}
