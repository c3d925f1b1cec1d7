// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod identity_tests;

use crate::SqlitePersistence;
use corat_audit::{Action, Actor, AuditEvent, Cause};
use corat_domain::{Role, StationId, UserProfile};

pub fn create_test_db() -> SqlitePersistence {
    SqlitePersistence::new_in_memory().unwrap()
}

pub fn create_test_profile(uid: &str) -> UserProfile {
    UserProfile {
        uid: uid.to_string(),
        name: String::from("Juan Pérez"),
        email: String::from("juan.perez@placeholder.corat.mx"),
        role: Role::Tecnico,
        permitted_stations: vec![StationId::Cunduacan],
        personal_phone: Some(String::from("+52 993 555 0101")),
        is_first_login: true,
    }
}

pub fn create_test_audit_event() -> AuditEvent {
    AuditEvent::new(
        Actor::new(String::from("uid-admin"), String::from("superusuario")),
        Cause::new(String::from("call:create-user"), String::from("Test call")),
        Action::new(String::from("ProvisionUser"), None),
    )
}
