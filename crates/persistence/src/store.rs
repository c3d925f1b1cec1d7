// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Document store operations.
//!
//! `MaintenanceStore` is the collaborator interface the handlers are
//! written against; the handlers receive an explicitly constructed store
//! rather than reaching for process-wide state, so tests can substitute a
//! double.

use diesel::prelude::*;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::debug;

use crate::SqlitePersistence;
use crate::data_models::{NewAuditEventRow, StoredAuditEvent};
use crate::diesel_schema::{audit_events, cycles, faults, stations, user_profiles};
use crate::error::PersistenceError;
use corat_audit::AuditEvent;
use corat_domain::{FaultDocument, StationId, UserProfile};

/// A station row with its accumulated operating hours.
#[derive(Debug, Clone, PartialEq)]
pub struct StationRecord {
    /// The fixed station id.
    pub station_id: StationId,
    /// The human-readable station name.
    pub display_name: String,
    /// Total accrued operating hours.
    pub accumulated_hours: f64,
}

/// Store collaborator for faults, cycles, stations, profiles, and the
/// audit log.
///
/// Point reads, document writes, and an atomic numeric increment — the
/// operations the handlers need and nothing more.
pub trait MaintenanceStore {
    /// Stores a fault document, replacing any previous version.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn put_fault(
        &mut self,
        fault_id: &str,
        document: &serde_json::Value,
    ) -> Result<(), PersistenceError>;

    /// Fetches a fault document by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails or the stored document is
    /// corrupt.
    fn fetch_fault(&mut self, fault_id: &str) -> Result<Option<FaultDocument>, PersistenceError>;

    /// Fetches the raw cycle document stored under a fault.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails or the stored document is
    /// corrupt.
    fn get_cycle(
        &mut self,
        fault_id: &str,
        cycle_id: &str,
    ) -> Result<Option<serde_json::Value>, PersistenceError>;

    /// Stores a cycle document, replacing any previous version.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn put_cycle(
        &mut self,
        fault_id: &str,
        cycle_id: &str,
        document: &serde_json::Value,
    ) -> Result<(), PersistenceError>;

    /// Atomically increments a station's accumulated hours.
    ///
    /// The increment is a single commutative operation on the store, never
    /// a separate read and write, so concurrent increments are never lost.
    /// Returns the new total.
    ///
    /// # Errors
    ///
    /// Returns an error if the station row does not exist or the update
    /// fails.
    fn increment_station_hours(
        &mut self,
        station: StationId,
        delta_hours: f64,
    ) -> Result<f64, PersistenceError>;

    /// Reads a station's accumulated hours.
    ///
    /// # Errors
    ///
    /// Returns an error if the station row does not exist or the read
    /// fails.
    fn station_hours(&mut self, station: StationId) -> Result<f64, PersistenceError>;

    /// Lists all stations with their accumulated hours.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    fn list_stations(&mut self) -> Result<Vec<StationRecord>, PersistenceError>;

    /// Writes a user profile document keyed by uid.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn write_user_profile(&mut self, profile: &UserProfile) -> Result<(), PersistenceError>;

    /// Fetches a user profile document by uid.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails or the stored document is
    /// corrupt.
    fn fetch_user_profile(&mut self, uid: &str)
    -> Result<Option<UserProfile>, PersistenceError>;

    /// Appends an audit event to the log and returns its assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn append_audit_event(&mut self, event: &AuditEvent) -> Result<i64, PersistenceError>;

    /// Lists all audit events in log order.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    fn list_audit_events(&mut self) -> Result<Vec<StoredAuditEvent>, PersistenceError>;
}

impl MaintenanceStore for SqlitePersistence {
    fn put_fault(
        &mut self,
        fault_id: &str,
        document: &serde_json::Value,
    ) -> Result<(), PersistenceError> {
        let document_json: String = serde_json::to_string(document)?;
        diesel::replace_into(faults::table)
            .values((
                faults::fault_id.eq(fault_id),
                faults::document_json.eq(&document_json),
            ))
            .execute(&mut self.conn)?;
        debug!(fault_id, "Stored fault document");
        Ok(())
    }

    fn fetch_fault(&mut self, fault_id: &str) -> Result<Option<FaultDocument>, PersistenceError> {
        let document_json: Option<String> = faults::table
            .filter(faults::fault_id.eq(fault_id))
            .select(faults::document_json)
            .first::<String>(&mut self.conn)
            .optional()?;

        match document_json {
            None => Ok(None),
            Some(text) => {
                let value: serde_json::Value = serde_json::from_str(&text)?;
                Ok(Some(FaultDocument::from_document(&value)))
            }
        }
    }

    fn get_cycle(
        &mut self,
        fault_id: &str,
        cycle_id: &str,
    ) -> Result<Option<serde_json::Value>, PersistenceError> {
        let document_json: Option<String> = cycles::table
            .filter(cycles::fault_id.eq(fault_id))
            .filter(cycles::cycle_id.eq(cycle_id))
            .select(cycles::document_json)
            .first::<String>(&mut self.conn)
            .optional()?;

        match document_json {
            None => Ok(None),
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
        }
    }

    fn put_cycle(
        &mut self,
        fault_id: &str,
        cycle_id: &str,
        document: &serde_json::Value,
    ) -> Result<(), PersistenceError> {
        let document_json: String = serde_json::to_string(document)?;
        diesel::replace_into(cycles::table)
            .values((
                cycles::fault_id.eq(fault_id),
                cycles::cycle_id.eq(cycle_id),
                cycles::document_json.eq(&document_json),
            ))
            .execute(&mut self.conn)?;
        debug!(fault_id, cycle_id, "Stored cycle document");
        Ok(())
    }

    fn increment_station_hours(
        &mut self,
        station: StationId,
        delta_hours: f64,
    ) -> Result<f64, PersistenceError> {
        let updated: usize =
            diesel::update(stations::table.filter(stations::station_id.eq(station.as_str())))
                .set(stations::accumulated_hours.eq(stations::accumulated_hours + delta_hours))
                .execute(&mut self.conn)?;

        if updated == 0 {
            return Err(PersistenceError::StationNotFound(
                station.as_str().to_string(),
            ));
        }

        let total: f64 = stations::table
            .filter(stations::station_id.eq(station.as_str()))
            .select(stations::accumulated_hours)
            .first(&mut self.conn)?;

        debug!(
            station = station.as_str(),
            delta_hours, total, "Incremented station hours"
        );
        Ok(total)
    }

    fn station_hours(&mut self, station: StationId) -> Result<f64, PersistenceError> {
        stations::table
            .filter(stations::station_id.eq(station.as_str()))
            .select(stations::accumulated_hours)
            .first(&mut self.conn)
            .optional()?
            .ok_or_else(|| PersistenceError::StationNotFound(station.as_str().to_string()))
    }

    fn list_stations(&mut self) -> Result<Vec<StationRecord>, PersistenceError> {
        let rows: Vec<(String, String, f64)> = stations::table
            .order(stations::station_id.asc())
            .load(&mut self.conn)?;

        rows.into_iter()
            .map(|(station_id, display_name, accumulated_hours)| {
                let station: StationId = station_id.parse().map_err(|_| {
                    PersistenceError::Other(format!("Unknown station id in store: {station_id}"))
                })?;
                Ok(StationRecord {
                    station_id: station,
                    display_name,
                    accumulated_hours,
                })
            })
            .collect()
    }

    fn write_user_profile(&mut self, profile: &UserProfile) -> Result<(), PersistenceError> {
        let profile_json: String = serde_json::to_string(profile)?;
        diesel::replace_into(user_profiles::table)
            .values((
                user_profiles::uid.eq(&profile.uid),
                user_profiles::profile_json.eq(&profile_json),
            ))
            .execute(&mut self.conn)?;
        debug!(uid = %profile.uid, "Stored user profile");
        Ok(())
    }

    fn fetch_user_profile(
        &mut self,
        uid: &str,
    ) -> Result<Option<UserProfile>, PersistenceError> {
        let profile_json: Option<String> = user_profiles::table
            .filter(user_profiles::uid.eq(uid))
            .select(user_profiles::profile_json)
            .first::<String>(&mut self.conn)
            .optional()?;

        match profile_json {
            None => Ok(None),
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
        }
    }

    fn append_audit_event(&mut self, event: &AuditEvent) -> Result<i64, PersistenceError> {
        let created_at: String = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(|e| PersistenceError::Other(format!("Failed to format timestamp: {e}")))?;

        let row: NewAuditEventRow<'_> = NewAuditEventRow {
            actor_id: &event.actor.id,
            actor_type: &event.actor.actor_type,
            cause_id: &event.cause.id,
            cause_description: &event.cause.description,
            action_name: &event.action.name,
            action_details: event.action.details.as_deref(),
            created_at,
        };

        let event_id: i64 = diesel::insert_into(audit_events::table)
            .values(&row)
            .returning(audit_events::event_id)
            .get_result(&mut self.conn)?;

        debug!(event_id, action = %event.action.name, "Appended audit event");
        Ok(event_id)
    }

    fn list_audit_events(&mut self) -> Result<Vec<StoredAuditEvent>, PersistenceError> {
        Ok(audit_events::table
            .order(audit_events::event_id.asc())
            .load(&mut self.conn)?)
    }
}
