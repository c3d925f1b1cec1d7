// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test doubles and fixtures for handler tests.

use std::collections::HashMap;

use crate::{AuthContext, ProvisionUserRequest};
use corat_audit::AuditEvent;
use corat_domain::{FaultDocument, Role, StationId, UserProfile};
use corat_persistence::{
    IdentityError, IdentityProvider, IdentityUser, MaintenanceStore, NewIdentityUser,
    PersistenceError, StationRecord, StoredAuditEvent,
};

/// An identity account held by the in-memory backend.
pub struct MemoryAccount {
    pub uid: String,
    pub email: String,
    pub display_name: String,
    pub role_claim: Option<Role>,
}

/// In-memory double for both collaborator traits.
///
/// Counts identity calls and store writes so tests can assert that
/// rejected requests touch neither collaborator, and injects failures on
/// demand.
#[derive(Default)]
pub struct MemoryBackend {
    pub faults: HashMap<String, serde_json::Value>,
    pub cycles: HashMap<(String, String), serde_json::Value>,
    pub stations: HashMap<StationId, f64>,
    pub profiles: HashMap<String, UserProfile>,
    pub accounts: Vec<MemoryAccount>,
    pub audit_events: Vec<AuditEvent>,
    pub next_uid: u32,
    pub identity_calls: usize,
    pub store_writes: usize,
    pub fail_fault_reads: bool,
    pub fail_increments: bool,
    pub fail_identity: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        let mut backend: Self = Self::default();
        for station in StationId::ALL {
            backend.stations.insert(station, 0.0);
        }
        backend
    }

    pub fn with_fault(mut self, fault_id: &str, document: serde_json::Value) -> Self {
        self.faults.insert(fault_id.to_string(), document);
        self
    }

    pub fn hours(&self, station: StationId) -> f64 {
        self.stations[&station]
    }
}

impl MaintenanceStore for MemoryBackend {
    fn put_fault(
        &mut self,
        fault_id: &str,
        document: &serde_json::Value,
    ) -> Result<(), PersistenceError> {
        self.store_writes += 1;
        self.faults.insert(fault_id.to_string(), document.clone());
        Ok(())
    }

    fn fetch_fault(&mut self, fault_id: &str) -> Result<Option<FaultDocument>, PersistenceError> {
        if self.fail_fault_reads {
            return Err(PersistenceError::DatabaseError(String::from(
                "injected fault read failure",
            )));
        }
        Ok(self
            .faults
            .get(fault_id)
            .map(FaultDocument::from_document))
    }

    fn get_cycle(
        &mut self,
        fault_id: &str,
        cycle_id: &str,
    ) -> Result<Option<serde_json::Value>, PersistenceError> {
        Ok(self
            .cycles
            .get(&(fault_id.to_string(), cycle_id.to_string()))
            .cloned())
    }

    fn put_cycle(
        &mut self,
        fault_id: &str,
        cycle_id: &str,
        document: &serde_json::Value,
    ) -> Result<(), PersistenceError> {
        self.store_writes += 1;
        self.cycles.insert(
            (fault_id.to_string(), cycle_id.to_string()),
            document.clone(),
        );
        Ok(())
    }

    fn increment_station_hours(
        &mut self,
        station: StationId,
        delta_hours: f64,
    ) -> Result<f64, PersistenceError> {
        if self.fail_increments {
            return Err(PersistenceError::DatabaseError(String::from(
                "injected increment failure",
            )));
        }
        self.store_writes += 1;
        let total: &mut f64 = self
            .stations
            .get_mut(&station)
            .ok_or_else(|| PersistenceError::StationNotFound(station.as_str().to_string()))?;
        *total += delta_hours;
        Ok(*total)
    }

    fn station_hours(&mut self, station: StationId) -> Result<f64, PersistenceError> {
        self.stations
            .get(&station)
            .copied()
            .ok_or_else(|| PersistenceError::StationNotFound(station.as_str().to_string()))
    }

    fn list_stations(&mut self) -> Result<Vec<StationRecord>, PersistenceError> {
        let mut records: Vec<StationRecord> = self
            .stations
            .iter()
            .map(|(station, hours)| StationRecord {
                station_id: *station,
                display_name: station.display_name().to_string(),
                accumulated_hours: *hours,
            })
            .collect();
        records.sort_by_key(|record| record.station_id.as_str());
        Ok(records)
    }

    fn write_user_profile(&mut self, profile: &UserProfile) -> Result<(), PersistenceError> {
        self.store_writes += 1;
        self.profiles.insert(profile.uid.clone(), profile.clone());
        Ok(())
    }

    fn fetch_user_profile(
        &mut self,
        uid: &str,
    ) -> Result<Option<UserProfile>, PersistenceError> {
        Ok(self.profiles.get(uid).cloned())
    }

    fn append_audit_event(&mut self, event: &AuditEvent) -> Result<i64, PersistenceError> {
        self.audit_events.push(event.clone());
        Ok(i64::try_from(self.audit_events.len()).unwrap())
    }

    fn list_audit_events(&mut self) -> Result<Vec<StoredAuditEvent>, PersistenceError> {
        Ok(self
            .audit_events
            .iter()
            .enumerate()
            .map(|(index, event)| StoredAuditEvent {
                event_id: i64::try_from(index + 1).unwrap(),
                actor_id: event.actor.id.clone(),
                actor_type: event.actor.actor_type.clone(),
                cause_id: event.cause.id.clone(),
                cause_description: event.cause.description.clone(),
                action_name: event.action.name.clone(),
                action_details: event.action.details.clone(),
                created_at: String::new(),
            })
            .collect())
    }
}

impl IdentityProvider for MemoryBackend {
    fn create_user(&mut self, new_user: &NewIdentityUser) -> Result<IdentityUser, IdentityError> {
        self.identity_calls += 1;
        if self.fail_identity {
            return Err(IdentityError::Backend(String::from(
                "injected identity failure",
            )));
        }
        let email: String = new_user.email.trim().to_lowercase();
        if self.accounts.iter().any(|account| account.email == email) {
            return Err(IdentityError::EmailAlreadyExists(email));
        }
        self.next_uid += 1;
        let uid: String = format!("uid-{}", self.next_uid);
        self.accounts.push(MemoryAccount {
            uid: uid.clone(),
            email: email.clone(),
            display_name: new_user.display_name.clone(),
            role_claim: None,
        });
        Ok(IdentityUser {
            uid,
            email,
            display_name: new_user.display_name.clone(),
            role_claim: None,
        })
    }

    fn set_role_claim(&mut self, uid: &str, role: Role) -> Result<(), IdentityError> {
        self.identity_calls += 1;
        let account: &mut MemoryAccount = self
            .accounts
            .iter_mut()
            .find(|account| account.uid == uid)
            .ok_or_else(|| IdentityError::UserNotFound(uid.to_string()))?;
        account.role_claim = Some(role);
        Ok(())
    }

    fn role_claim(&mut self, uid: &str) -> Result<Option<Role>, IdentityError> {
        self.accounts
            .iter()
            .find(|account| account.uid == uid)
            .map(|account| account.role_claim)
            .ok_or_else(|| IdentityError::UserNotFound(uid.to_string()))
    }
}

pub fn create_superuser_context() -> AuthContext {
    AuthContext::new(String::from("uid-admin"), Some(Role::Superusuario))
}

pub fn create_valid_request() -> ProvisionUserRequest {
    ProvisionUserRequest {
        identifier: String::from("Juan.Perez"),
        password: String::from("secreto123"),
        name: String::from("Juan Pérez"),
        role: String::from("tecnico"),
        assigned_station: String::from("cunduacan"),
        personal_phone: Some(String::from("+52 993 555 0101")),
    }
}
