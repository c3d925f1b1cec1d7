// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Database row models.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::diesel_schema::{audit_events, identity_accounts};

/// Insertable audit event row; the event id is assigned by the database.
#[derive(Debug, Insertable)]
#[diesel(table_name = audit_events)]
pub struct NewAuditEventRow<'a> {
    /// The actor id.
    pub actor_id: &'a str,
    /// The actor type.
    pub actor_type: &'a str,
    /// The cause id.
    pub cause_id: &'a str,
    /// The cause description.
    pub cause_description: &'a str,
    /// The action name.
    pub action_name: &'a str,
    /// Optional action details.
    pub action_details: Option<&'a str>,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
}

/// A persisted audit event as read back from the log.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Serialize, Deserialize)]
pub struct StoredAuditEvent {
    /// The log-assigned event id.
    pub event_id: i64,
    /// The actor id.
    pub actor_id: String,
    /// The actor type.
    pub actor_type: String,
    /// The cause id.
    pub cause_id: String,
    /// The cause description.
    pub cause_description: String,
    /// The action name.
    pub action_name: String,
    /// Optional action details.
    pub action_details: Option<String>,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
}

/// Insertable identity account row.
#[derive(Debug, Insertable)]
#[diesel(table_name = identity_accounts)]
pub struct NewIdentityAccountRow<'a> {
    /// The generated uid.
    pub uid: &'a str,
    /// The normalized, unique email.
    pub email: &'a str,
    /// The bcrypt password hash.
    pub password_hash: &'a str,
    /// The display name.
    pub display_name: &'a str,
    /// The role claim, if one has been attached.
    pub role_claim: Option<&'a str>,
}
