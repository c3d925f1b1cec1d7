// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Fixed identifier for a station document.
///
/// The set of stations is closed: every station the system accrues hours
/// against exists before the first cycle finishes, and unrecognized names
/// must never create new stations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StationId {
    /// Boca del Cerro.
    BocaDelCerro,
    /// Cunduacán.
    Cunduacan,
    /// Periférico Villahermosa.
    PerifericoVh,
    /// Rancho Grande.
    RanchoGrande,
    /// La Venta.
    LaVenta,
}

impl StationId {
    /// Every known station, in document-id order.
    pub const ALL: [Self; 5] = [
        Self::BocaDelCerro,
        Self::Cunduacan,
        Self::PerifericoVh,
        Self::RanchoGrande,
        Self::LaVenta,
    ];

    /// Converts this station id to its document-id string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BocaDelCerro => "boca_del_cerro",
            Self::Cunduacan => "cunduacan",
            Self::PerifericoVh => "periferico_vh",
            Self::RanchoGrande => "rancho_grande",
            Self::LaVenta => "la_venta",
        }
    }

    /// Returns the human-readable station name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::BocaDelCerro => "Boca del Cerro",
            Self::Cunduacan => "Cunduacán",
            Self::PerifericoVh => "Periférico VH",
            Self::RanchoGrande => "Rancho Grande",
            Self::LaVenta => "La Venta",
        }
    }
}

impl FromStr for StationId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "boca_del_cerro" => Ok(Self::BocaDelCerro),
            "cunduacan" => Ok(Self::Cunduacan),
            "periferico_vh" => Ok(Self::PerifericoVh),
            "rancho_grande" => Ok(Self::RanchoGrande),
            "la_venta" => Ok(Self::LaVenta),
            _ => Err(DomainError::InvalidStationId(s.to_string())),
        }
    }
}

impl std::fmt::Display for StationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle state of an operating cycle.
///
/// Cycles are written by external operational data; the accrual path only
/// cares about the transition into `Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CycleState {
    /// The cycle is still running.
    InProgress,
    /// The cycle has reached its terminal state.
    Finished,
}

impl CycleState {
    /// Parses a cycle state from its wire string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a known state.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "in-progress" => Ok(Self::InProgress),
            "finished" => Ok(Self::Finished),
            _ => Err(DomainError::InvalidCycleState(s.to_string())),
        }
    }

    /// Converts this state to its wire string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "in-progress",
            Self::Finished => "finished",
        }
    }
}

impl FromStr for CycleState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for CycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Role claim attached to an identity account.
///
/// Roles gate what a caller may do; only `Superusuario` may provision new
/// accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full administrative authority, including account provisioning.
    Superusuario,
    /// Supervises stations and reviews fault reports.
    Supervisor,
    /// Field technician logging operational data.
    Tecnico,
}

impl Role {
    /// Parses a role from its claim string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a known role.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "superusuario" => Ok(Self::Superusuario),
            "supervisor" => Ok(Self::Supervisor),
            "tecnico" => Ok(Self::Tecnico),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }

    /// Converts this role to its claim string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Superusuario => "superusuario",
            Self::Supervisor => "supervisor",
            Self::Tecnico => "tecnico",
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
