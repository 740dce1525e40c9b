//! Persistence layer: PostgreSQL event log and state snapshots.
//!
//! The in-memory registries are the source of truth; this layer keeps a
//! durable copy. Every published [`crate::domain::MatchEvent`] is appended
//! to the `events` table and the registries are snapshotted on an
//! interval, so a restart can reload the latest state via
//! [`recorder::Recorder::restore`].

pub mod models;
pub mod postgres;
pub mod recorder;

pub use postgres::PostgresPersistence;
pub use recorder::{Recorder, RecorderSettings};
