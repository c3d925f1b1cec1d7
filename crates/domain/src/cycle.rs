// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Lenient views over fault and cycle documents.
//!
//! Documents are schemaless at the storage boundary. The snapshot types in
//! this module read only the fields the accrual path cares about, and read
//! them leniently: an unrecognized state string or a non-numeric duration
//! deserializes as `None` instead of failing the whole snapshot.

use crate::error::DomainError;
use crate::types::CycleState;
use serde::{Deserialize, Deserializer, Serialize};

/// Partial view of a cycle document as delivered by the update trigger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleSnapshot {
    /// The cycle lifecycle state, if present and recognized.
    #[serde(
        default,
        deserialize_with = "lenient_cycle_state",
        skip_serializing_if = "Option::is_none"
    )]
    pub cycle_state: Option<CycleState>,
    /// The cycle duration in minutes, if present and numeric.
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub cycle_duration_minutes: Option<f64>,
}

impl CycleSnapshot {
    /// Builds a snapshot from a raw document value.
    ///
    /// A document that is not a JSON object yields an empty snapshot.
    #[must_use]
    pub fn from_document(document: &serde_json::Value) -> Self {
        serde_json::from_value(document.clone()).unwrap_or_default()
    }

    /// Whether this snapshot shows the cycle in its terminal state.
    ///
    /// A missing or unrecognized state counts as not finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.cycle_state == Some(CycleState::Finished)
    }

    /// Validates the duration and converts it to hours.
    ///
    /// # Errors
    ///
    /// Returns an error if the duration is missing, non-numeric, zero, or
    /// negative.
    pub fn validated_duration_hours(&self) -> Result<f64, DomainError> {
        let minutes: f64 = self
            .cycle_duration_minutes
            .ok_or(DomainError::MissingDuration)?;
        if minutes <= 0.0 {
            return Err(DomainError::NonPositiveDuration { minutes });
        }
        Ok(minutes / 60.0)
    }
}

/// Partial view of a fault document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaultDocument {
    /// Free-form station name as entered when the fault was reported.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub station: Option<String>,
    /// Free-form fault description.
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    /// When the fault was reported (RFC 3339).
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub reported_at: Option<String>,
}

impl FaultDocument {
    /// Builds a fault view from a raw document value.
    ///
    /// A document that is not a JSON object yields an empty view.
    #[must_use]
    pub fn from_document(document: &serde_json::Value) -> Self {
        serde_json::from_value(document.clone()).unwrap_or_default()
    }
}

fn lenient_cycle_state<'de, D>(deserializer: D) -> Result<Option<CycleState>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: serde_json::Value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_str().and_then(|s| CycleState::parse(s).ok()))
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: serde_json::Value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: serde_json::Value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_str().map(ToString::to_string))
}
