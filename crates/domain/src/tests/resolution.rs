// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{STATION_KEYWORDS, StationId, resolve_station_name};

#[test]
fn test_resolution_is_case_insensitive() {
    assert_eq!(
        resolve_station_name("ESTACION BOCA DEL RIO"),
        Some(StationId::BocaDelCerro)
    );
    assert_eq!(
        resolve_station_name("cunduacan norte"),
        Some(StationId::Cunduacan)
    );
}

#[test]
fn test_unrecognized_name_resolves_to_none() {
    assert_eq!(resolve_station_name("Estación Desconocida"), None);
    assert_eq!(resolve_station_name(""), None);
}

#[test]
fn test_every_keyword_resolves_to_its_station() {
    for (keyword, station) in STATION_KEYWORDS {
        assert_eq!(resolve_station_name(keyword), Some(station));
    }
}

#[test]
fn test_keyword_matches_as_substring() {
    assert_eq!(
        resolve_station_name("Subestacion Periferico Villahermosa"),
        Some(StationId::PerifericoVh)
    );
    assert_eq!(
        resolve_station_name("La Venta II"),
        Some(StationId::LaVenta)
    );
    assert_eq!(
        resolve_station_name("rancho grande (turbina 2)"),
        Some(StationId::RanchoGrande)
    );
}

#[test]
fn test_first_matching_keyword_wins() {
    // A name containing two keywords resolves to the earlier table entry.
    assert_eq!(
        resolve_station_name("boca / la venta"),
        Some(StationId::BocaDelCerro)
    );
}
