// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The accrual update handler.
//!
//! Reacts to cycle document updates: when a cycle transitions into its
//! finished state, the parent fault's station accrues the cycle duration
//! in hours. This is an event reaction with no caller to report to, so
//! every failure is logged and returned as a skipped outcome — never an
//! error, and never a retry.
//!
//! Deliveries are at-least-once: a replayed finish transition re-applies
//! the increment. No dedup marker is recorded; see DESIGN.md.

use tracing::{error, info, warn};

use crate::request_response::CycleUpdateEvent;
use corat_audit::{Action, Actor, AuditEvent, Cause};
use corat_domain::{DomainError, FaultDocument, StationId, resolve_station_name};
use corat_persistence::{MaintenanceStore, PersistenceError};

/// Why a cycle update produced no accrual.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The update is not a not-finished → finished transition.
    NotAFinishTransition,
    /// The after snapshot's duration is missing, non-numeric, or not
    /// positive.
    InvalidDuration(DomainError),
    /// The parent fault could not be read.
    FaultFetchFailed(PersistenceError),
    /// The parent fault does not exist.
    FaultNotFound,
    /// The fault document has no station field.
    MissingStationName,
    /// The station name matched no keyword in the resolution table.
    UnknownStationName(String),
    /// The station increment failed.
    IncrementFailed(PersistenceError),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAFinishTransition => {
                write!(f, "cycle update is not a finish transition")
            }
            Self::InvalidDuration(err) => write!(f, "invalid cycle duration: {err}"),
            Self::FaultFetchFailed(err) => write!(f, "failed to read parent fault: {err}"),
            Self::FaultNotFound => write!(f, "parent fault not found"),
            Self::MissingStationName => write!(f, "fault has no station field"),
            Self::UnknownStationName(name) => {
                write!(f, "unrecognized station name '{name}'")
            }
            Self::IncrementFailed(err) => {
                write!(f, "failed to increment station hours: {err}")
            }
        }
    }
}

/// A successfully applied accrual.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedAccrual {
    /// The free-text station name from the fault document.
    pub station_name: String,
    /// The resolved station id.
    pub station: StationId,
    /// Hours added to the station's total.
    pub hours_delta: f64,
    /// The station's total after the increment.
    pub new_total_hours: f64,
}

/// Outcome of one accrual invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum AccrualOutcome {
    /// Hours were accrued against a station.
    Applied(AppliedAccrual),
    /// The update was a no-op; the reason was logged.
    Skipped(SkipReason),
}

/// Handles a cycle document update.
///
/// Applies the accrual when the update is a *not-finished → finished*
/// transition with a valid duration and a resolvable station; otherwise
/// logs why and skips. The station increment is atomic on the store, so
/// concurrent finishes mapping to the same station never lose hours.
pub fn apply_cycle_update<S: MaintenanceStore>(
    store: &mut S,
    event: &CycleUpdateEvent,
) -> AccrualOutcome {
    if event.before.is_finished() || !event.after.is_finished() {
        info!(
            cycle_id = %event.cycle_id,
            "Cycle update not relevant for hours accrual"
        );
        return AccrualOutcome::Skipped(SkipReason::NotAFinishTransition);
    }

    info!(cycle_id = %event.cycle_id, "Cycle finished, accruing hours");

    let hours_delta: f64 = match event.after.validated_duration_hours() {
        Ok(hours) => hours,
        Err(err) => {
            error!(cycle_id = %event.cycle_id, error = %err, "Invalid cycle duration");
            return AccrualOutcome::Skipped(SkipReason::InvalidDuration(err));
        }
    };

    let fault: FaultDocument = match store.fetch_fault(&event.fault_id) {
        Ok(Some(fault)) => fault,
        Ok(None) => {
            error!(fault_id = %event.fault_id, "Parent fault not found");
            return AccrualOutcome::Skipped(SkipReason::FaultNotFound);
        }
        Err(err) => {
            error!(fault_id = %event.fault_id, error = %err, "Failed to read parent fault");
            return AccrualOutcome::Skipped(SkipReason::FaultFetchFailed(err));
        }
    };

    let Some(station_name) = fault.station else {
        error!(fault_id = %event.fault_id, "Fault document has no station field");
        return AccrualOutcome::Skipped(SkipReason::MissingStationName);
    };

    let Some(station) = resolve_station_name(&station_name) else {
        warn!(
            fault_id = %event.fault_id,
            station = %station_name,
            "Could not determine a station id for this name"
        );
        return AccrualOutcome::Skipped(SkipReason::UnknownStationName(station_name));
    };

    match store.increment_station_hours(station, hours_delta) {
        Ok(new_total_hours) => {
            info!(
                "Hours for {station_name} (id {station}) incremented by {hours_delta:.2}"
            );
            AccrualOutcome::Applied(AppliedAccrual {
                station_name,
                station,
                hours_delta,
                new_total_hours,
            })
        }
        Err(err) => {
            error!(
                station_id = station.as_str(),
                error = %err,
                "Failed to increment accumulated hours"
            );
            AccrualOutcome::Skipped(SkipReason::IncrementFailed(err))
        }
    }
}

/// Builds the audit event for an applied accrual.
#[must_use]
pub fn accrual_audit_event(event: &CycleUpdateEvent, applied: &AppliedAccrual) -> AuditEvent {
    AuditEvent::new(
        Actor::new(
            String::from("cycle-update-trigger"),
            String::from("system"),
        ),
        Cause::new(event.document_path(), String::from("Cycle finished")),
        Action::new(
            String::from("AccrueStationHours"),
            Some(format!(
                "{} +{:.2}h",
                applied.station.as_str(),
                applied.hours_delta
            )),
        ),
    )
}
