// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response contracts for the handlers.
//!
//! These DTOs are distinct from domain types and represent the wire
//! contract.

use serde::{Deserialize, Serialize};

use corat_domain::CycleSnapshot;

/// A cycle document update as delivered to the accrual handler.
///
/// Carries the before/after snapshot pair plus the identifying path
/// parameters of the document that changed.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleUpdateEvent {
    /// Id of the parent fault document.
    pub fault_id: String,
    /// Id of the cycle document that was updated.
    pub cycle_id: String,
    /// The cycle snapshot before the update.
    pub before: CycleSnapshot,
    /// The cycle snapshot after the update.
    pub after: CycleSnapshot,
}

impl CycleUpdateEvent {
    /// Creates a new cycle update event.
    #[must_use]
    pub const fn new(
        fault_id: String,
        cycle_id: String,
        before: CycleSnapshot,
        after: CycleSnapshot,
    ) -> Self {
        Self {
            fault_id,
            cycle_id,
            before,
            after,
        }
    }

    /// The document path this event refers to.
    #[must_use]
    pub fn document_path(&self) -> String {
        format!("faults/{}/cycles/{}", self.fault_id, self.cycle_id)
    }
}

/// Request payload for the user provisioning call.
///
/// Fields default to empty so a payload with missing fields still
/// deserializes; presence is validated by the handler, which must reject
/// incomplete payloads before any identity-service call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionUserRequest {
    /// Login identifier the placeholder email is derived from.
    #[serde(default)]
    pub identifier: String,
    /// Initial password for the account.
    #[serde(default)]
    pub password: String,
    /// The user's display name.
    #[serde(default)]
    pub name: String,
    /// Role claim to attach (`superusuario`, `supervisor`, `tecnico`).
    #[serde(default)]
    pub role: String,
    /// Station id the user is assigned to.
    #[serde(default)]
    pub assigned_station: String,
    /// Optional personal phone number.
    #[serde(default)]
    pub personal_phone: Option<String>,
}

/// Success payload for the user provisioning call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionUserResponse {
    /// Always `true` on the success path.
    pub success: bool,
    /// The identity-issued uid of the new account.
    pub uid: String,
    /// The placeholder email the account was created with.
    pub email: String,
}
