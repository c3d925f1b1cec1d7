// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the CORAT maintenance backend.
//!
//! This crate provides the document store (faults with nested cycles,
//! stations, user profiles), the audit event log, and the local identity
//! provider. It is built on Diesel with the `SQLite` backend.
//!
//! The handlers in `corat-api` are written against the `MaintenanceStore`
//! and `IdentityProvider` traits, not against `SqlitePersistence` itself,
//! so tests can substitute in-memory doubles.
//!
//! In-memory databases (`new_in_memory`) are used for unit and endpoint
//! tests; file-backed databases for everything else.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::info;

mod bootstrap;
mod data_models;
mod diesel_schema;
mod error;
mod identity;
mod store;

#[cfg(test)]
mod tests;

pub use data_models::StoredAuditEvent;
pub use error::PersistenceError;
pub use identity::{
    IdentityError, IdentityProvider, IdentityUser, MIN_PASSWORD_LENGTH, NewIdentityUser,
    PasswordPolicyError,
};
pub use store::{MaintenanceStore, StationRecord};

/// `SQLite`-backed persistence for documents, audit events, and identity
/// accounts.
///
/// One value owns one connection. Concurrent access is coordinated by the
/// caller (the server wraps this in an async mutex); the atomic station
/// increment is a single SQL statement, so serialization at this level is
/// about connection ownership, not about correctness of the counter.
pub struct SqlitePersistence {
    pub(crate) conn: SqliteConnection,
}

impl SqlitePersistence {
    /// Creates a persistence layer backed by an in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or schema initialization fails.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let conn: SqliteConnection = SqliteConnection::establish(":memory:")?;
        Self::initialize(conn)
    }

    /// Creates a persistence layer backed by a database file.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or schema initialization fails.
    pub fn new_with_file(path: &str) -> Result<Self, PersistenceError> {
        let conn: SqliteConnection = SqliteConnection::establish(path)?;
        info!(path, "Opened database file");
        Self::initialize(conn)
    }

    fn initialize(mut conn: SqliteConnection) -> Result<Self, PersistenceError> {
        bootstrap::initialize_schema(&mut conn)?;
        Ok(Self { conn })
    }
}
