// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{MemoryBackend, create_superuser_context, create_valid_request};
use crate::{
    AuthContext, CallError, CallErrorCode, ProvisionOutcome, ProvisionUserRequest,
    placeholder_email, provision_user,
};
use corat_domain::{Role, StationId, UserProfile};
use corat_persistence::IdentityProvider;

#[test]
fn test_placeholder_email_trims_and_lowercases() {
    assert_eq!(
        placeholder_email("  Juan.Perez  "),
        "juan.perez@placeholder.corat.mx"
    );
}

#[test]
fn test_caller_without_superuser_claim_is_denied() {
    for role in [None, Some(Role::Supervisor), Some(Role::Tecnico)] {
        let mut backend: MemoryBackend = MemoryBackend::new();
        let context: AuthContext = AuthContext::new(String::from("uid-caller"), role);

        let err: CallError =
            provision_user(&mut backend, &context, &create_valid_request()).unwrap_err();

        assert_eq!(err.code, CallErrorCode::PermissionDenied);
        // No identity call and no store write happened.
        assert_eq!(backend.identity_calls, 0);
        assert_eq!(backend.store_writes, 0);
    }
}

#[test]
fn test_missing_fields_fail_before_any_identity_call() {
    let blank_variants: Vec<ProvisionUserRequest> = vec![
        ProvisionUserRequest {
            identifier: String::new(),
            ..create_valid_request()
        },
        ProvisionUserRequest {
            password: String::new(),
            ..create_valid_request()
        },
        ProvisionUserRequest {
            name: String::new(),
            ..create_valid_request()
        },
        ProvisionUserRequest {
            role: String::new(),
            ..create_valid_request()
        },
        ProvisionUserRequest {
            assigned_station: String::new(),
            ..create_valid_request()
        },
    ];

    for request in blank_variants {
        let mut backend: MemoryBackend = MemoryBackend::new();
        let err: CallError =
            provision_user(&mut backend, &create_superuser_context(), &request).unwrap_err();

        assert_eq!(err.code, CallErrorCode::InvalidArgument);
        assert!(err.message.contains("identifier"));
        assert_eq!(backend.identity_calls, 0);
        assert_eq!(backend.store_writes, 0);
    }
}

#[test]
fn test_unknown_role_is_rejected() {
    let mut backend: MemoryBackend = MemoryBackend::new();
    let request: ProvisionUserRequest = ProvisionUserRequest {
        role: String::from("gerente"),
        ..create_valid_request()
    };

    let err: CallError =
        provision_user(&mut backend, &create_superuser_context(), &request).unwrap_err();

    assert_eq!(err.code, CallErrorCode::InvalidArgument);
    assert_eq!(backend.identity_calls, 0);
}

#[test]
fn test_unknown_station_is_rejected() {
    let mut backend: MemoryBackend = MemoryBackend::new();
    let request: ProvisionUserRequest = ProvisionUserRequest {
        assigned_station: String::from("villahermosa_centro"),
        ..create_valid_request()
    };

    let err: CallError =
        provision_user(&mut backend, &create_superuser_context(), &request).unwrap_err();

    assert_eq!(err.code, CallErrorCode::InvalidArgument);
    assert_eq!(backend.identity_calls, 0);
}

#[test]
fn test_successful_provisioning_creates_account_claim_and_profile() {
    let mut backend: MemoryBackend = MemoryBackend::new();

    let outcome: ProvisionOutcome = provision_user(
        &mut backend,
        &create_superuser_context(),
        &create_valid_request(),
    )
    .unwrap();

    assert!(outcome.response.success);
    assert_eq!(outcome.response.uid, "uid-1");
    assert_eq!(outcome.response.email, "juan.perez@placeholder.corat.mx");

    // The role claim is readable back from the identity collaborator.
    assert_eq!(
        backend.role_claim("uid-1").unwrap(),
        Some(Role::Tecnico)
    );

    let profile: &UserProfile = &backend.profiles["uid-1"];
    assert_eq!(profile.name, "Juan Pérez");
    assert_eq!(profile.email, "juan.perez@placeholder.corat.mx");
    assert_eq!(profile.role, Role::Tecnico);
    assert_eq!(profile.permitted_stations, vec![StationId::Cunduacan]);
    assert_eq!(profile.personal_phone.as_deref(), Some("+52 993 555 0101"));
    assert!(profile.is_first_login);
}

#[test]
fn test_audit_event_attributes_the_caller() {
    let mut backend: MemoryBackend = MemoryBackend::new();

    let outcome: ProvisionOutcome = provision_user(
        &mut backend,
        &create_superuser_context(),
        &create_valid_request(),
    )
    .unwrap();

    assert_eq!(outcome.audit_event.actor.id, "uid-admin");
    assert_eq!(outcome.audit_event.actor.actor_type, "superusuario");
    assert_eq!(outcome.audit_event.action.name, "ProvisionUser");
}

#[test]
fn test_blank_personal_phone_is_stored_as_none() {
    let mut backend: MemoryBackend = MemoryBackend::new();
    let request: ProvisionUserRequest = ProvisionUserRequest {
        personal_phone: Some(String::from("   ")),
        ..create_valid_request()
    };

    provision_user(&mut backend, &create_superuser_context(), &request).unwrap();

    assert_eq!(backend.profiles["uid-1"].personal_phone, None);
}

#[test]
fn test_duplicate_email_maps_to_already_exists() {
    let mut backend: MemoryBackend = MemoryBackend::new();
    provision_user(
        &mut backend,
        &create_superuser_context(),
        &create_valid_request(),
    )
    .unwrap();

    let err: CallError = provision_user(
        &mut backend,
        &create_superuser_context(),
        &create_valid_request(),
    )
    .unwrap_err();

    assert_eq!(err.code, CallErrorCode::AlreadyExists);
    assert!(err.message.contains("juan.perez@placeholder.corat.mx"));
}

#[test]
fn test_identity_backend_failure_maps_to_internal() {
    let mut backend: MemoryBackend = MemoryBackend::new();
    backend.fail_identity = true;

    let err: CallError = provision_user(
        &mut backend,
        &create_superuser_context(),
        &create_valid_request(),
    )
    .unwrap_err();

    assert_eq!(err.code, CallErrorCode::Internal);
    // The injected backend detail is not leaked to the caller.
    assert!(!err.message.contains("injected"));
    assert_eq!(backend.store_writes, 0);
}
