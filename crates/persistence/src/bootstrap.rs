// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Schema creation and station seeding.
//!
//! The schema is small enough to bootstrap directly instead of carrying a
//! migration directory. Stations are a closed set, so every station row is
//! seeded here with zero accumulated hours; nothing else ever inserts into
//! the `stations` table.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;

use crate::diesel_schema::stations;
use crate::error::PersistenceError;
use corat_domain::StationId;

const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS faults (
    fault_id TEXT PRIMARY KEY NOT NULL,
    document_json TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS cycles (
    fault_id TEXT NOT NULL,
    cycle_id TEXT NOT NULL,
    document_json TEXT NOT NULL,
    PRIMARY KEY (fault_id, cycle_id)
);

CREATE TABLE IF NOT EXISTS stations (
    station_id TEXT PRIMARY KEY NOT NULL,
    display_name TEXT NOT NULL,
    accumulated_hours DOUBLE NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS user_profiles (
    uid TEXT PRIMARY KEY NOT NULL,
    profile_json TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS identity_accounts (
    uid TEXT PRIMARY KEY NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    display_name TEXT NOT NULL,
    role_claim TEXT
);

CREATE TABLE IF NOT EXISTS audit_events (
    event_id INTEGER PRIMARY KEY AUTOINCREMENT,
    actor_id TEXT NOT NULL,
    actor_type TEXT NOT NULL,
    cause_id TEXT NOT NULL,
    cause_description TEXT NOT NULL,
    action_name TEXT NOT NULL,
    action_details TEXT,
    created_at TEXT NOT NULL
);
";

/// Creates the schema and seeds the closed station set.
///
/// Idempotent: re-running against an existing database leaves existing
/// rows (and accumulated hours) untouched.
///
/// # Errors
///
/// Returns an error if schema creation or seeding fails.
pub fn initialize_schema(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    conn.batch_execute("PRAGMA foreign_keys = ON;")
        .map_err(|e| PersistenceError::InitializationError(e.to_string()))?;
    conn.batch_execute(SCHEMA)
        .map_err(|e| PersistenceError::InitializationError(e.to_string()))?;

    for station in StationId::ALL {
        diesel::insert_or_ignore_into(stations::table)
            .values((
                stations::station_id.eq(station.as_str()),
                stations::display_name.eq(station.display_name()),
                stations::accumulated_hours.eq(0.0_f64),
            ))
            .execute(conn)
            .map_err(|e| PersistenceError::InitializationError(e.to_string()))?;
    }

    debug!("Schema initialized and stations seeded");
    Ok(())
}
