// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The user provisioning handler.
//!
//! Invoked by an authenticated caller: verifies the caller holds the
//! `superusuario` role claim, creates an identity account under a
//! placeholder email derived from the login identifier, attaches the
//! requested role claim, and writes the user's profile document. All
//! failures surface as coded `CallError` values.

use tracing::info;

use crate::auth::{AuthContext, AuthorizationService};
use crate::error::{CallError, translate_identity_error, translate_store_error};
use crate::request_response::{ProvisionUserRequest, ProvisionUserResponse};
use corat_audit::{Action, Actor, AuditEvent, Cause};
use corat_domain::{Role, StationId, UserProfile};
use corat_persistence::{IdentityProvider, IdentityUser, MaintenanceStore, NewIdentityUser};

/// Domain under which placeholder emails are minted.
pub const PLACEHOLDER_EMAIL_DOMAIN: &str = "placeholder.corat.mx";

/// Result of a successful provisioning call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionOutcome {
    /// The payload returned to the caller.
    pub response: ProvisionUserResponse,
    /// The audit event generated by this operation.
    pub audit_event: AuditEvent,
}

/// Builds the placeholder email for a login identifier.
#[must_use]
pub fn placeholder_email(identifier: &str) -> String {
    format!(
        "{}@{PLACEHOLDER_EMAIL_DOMAIN}",
        identifier.trim().to_lowercase()
    )
}

/// Provisions a new user account.
///
/// This function:
/// - Verifies the caller holds the `superusuario` role claim
/// - Validates the payload before any identity-service call
/// - Creates the identity account and attaches the role claim
/// - Writes the profile document with `isFirstLogin: true` and the
///   assigned station as the single permitted station
///
/// # Arguments
///
/// * `backend` - The injected store and identity collaborators
/// * `context` - The caller's auth context
/// * `request` - The provisioning payload
///
/// # Errors
///
/// Returns a coded failure: `permission-denied` for unauthorized callers,
/// `invalid-argument` for incomplete or unparseable payloads,
/// `already-exists` when the placeholder email is taken, and `internal`
/// for any other identity or store failure.
pub fn provision_user<B>(
    backend: &mut B,
    context: &AuthContext,
    request: &ProvisionUserRequest,
) -> Result<ProvisionOutcome, CallError>
where
    B: MaintenanceStore + IdentityProvider,
{
    AuthorizationService::authorize_provision_user(context)?;

    if request.identifier.trim().is_empty()
        || request.password.is_empty()
        || request.name.trim().is_empty()
        || request.role.trim().is_empty()
        || request.assigned_station.trim().is_empty()
    {
        return Err(CallError::invalid_argument(
            "Missing required fields (identifier, password, name, role, assignedStation)",
        ));
    }

    let role: Role = Role::parse(request.role.trim())
        .map_err(|err| CallError::invalid_argument(err.to_string()))?;
    let station: StationId = request
        .assigned_station
        .trim()
        .parse()
        .map_err(|err: corat_domain::DomainError| {
            CallError::invalid_argument(err.to_string())
        })?;

    let email: String = placeholder_email(&request.identifier);
    info!(email = %email, "Creating identity account");

    let identity: IdentityUser = backend
        .create_user(&NewIdentityUser {
            email: email.clone(),
            password: request.password.clone(),
            display_name: request.name.clone(),
        })
        .map_err(translate_identity_error)?;
    info!(uid = %identity.uid, "Identity account created");

    backend
        .set_role_claim(&identity.uid, role)
        .map_err(translate_identity_error)?;
    info!(uid = %identity.uid, role = role.as_str(), "Role claim assigned");

    let profile: UserProfile = UserProfile {
        uid: identity.uid.clone(),
        name: request.name.clone(),
        email: email.clone(),
        role,
        permitted_stations: vec![station],
        personal_phone: request
            .personal_phone
            .clone()
            .filter(|phone| !phone.trim().is_empty()),
        is_first_login: true,
    };
    backend
        .write_user_profile(&profile)
        .map_err(translate_store_error)?;
    info!(uid = %identity.uid, "User profile written");

    let audit_event: AuditEvent = AuditEvent::new(
        Actor::new(context.uid.clone(), Role::Superusuario.as_str().to_string()),
        Cause::new(
            String::from("call:create-user"),
            String::from("User provisioning call"),
        ),
        Action::new(
            String::from("ProvisionUser"),
            Some(format!("{} ({})", identity.uid, role.as_str())),
        ),
    );

    Ok(ProvisionOutcome {
        response: ProvisionUserResponse {
            success: true,
            uid: identity.uid,
            email,
        },
        audit_event,
    })
}
