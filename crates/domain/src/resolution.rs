// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Resolution of free-text station names to fixed station ids.

use crate::types::StationId;

/// Priority-ordered keyword table mapping free-text station names to ids.
///
/// Matching is case-insensitive substring matching; the first matching
/// keyword wins. Order matters when a name could match more than one
/// keyword, though in practice the keywords are disjoint.
pub const STATION_KEYWORDS: [(&str, StationId); 5] = [
    ("boca", StationId::BocaDelCerro),
    ("cunduacan", StationId::Cunduacan),
    ("periferico", StationId::PerifericoVh),
    ("rancho", StationId::RanchoGrande),
    ("venta", StationId::LaVenta),
];

/// Resolves a free-text station name to its fixed station id.
///
/// Returns `None` when no keyword matches. The table is a closed
/// enumeration: an unrecognized name never maps to a new station.
#[must_use]
pub fn resolve_station_name(name: &str) -> Option<StationId> {
    let normalized: String = name.to_lowercase();
    STATION_KEYWORDS
        .iter()
        .find(|(keyword, _)| normalized.contains(*keyword))
        .map(|(_, station)| *station)
}
