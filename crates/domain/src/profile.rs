// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{Role, StationId};
use serde::{Deserialize, Serialize};

/// A user profile document, keyed by the identity-issued uid.
///
/// The `estacionesPermitidas` field name is fixed by the client
/// application's document schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// The identity-issued unique id.
    pub uid: String,
    /// The user's display name.
    pub name: String,
    /// The placeholder email the identity account was created with.
    pub email: String,
    /// The user's role.
    pub role: Role,
    /// Stations this user is permitted to work on.
    #[serde(rename = "estacionesPermitidas")]
    pub permitted_stations: Vec<StationId>,
    /// Optional personal phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_phone: Option<String>,
    /// Whether the user has yet to complete the first-login flow.
    pub is_first_login: bool,
}
