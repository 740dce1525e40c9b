//! Database models for events and snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored event row from the `events` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEvent {
    /// Auto-increment row ID.
    pub id: i64,
    /// Match that generated the event.
    pub match_id: Uuid,
    /// Event type discriminator (e.g. `"match_requested"`).
    pub event_type: String,
    /// JSONB payload with event-specific data.
    pub payload: serde_json::Value,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A match snapshot row from the `match_snapshots` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSnapshot {
    /// Auto-increment row ID.
    pub id: i64,
    /// Match that was snapshotted.
    pub match_id: Uuid,
    /// Status string at snapshot time.
    pub status: String,
    /// Full match request state as JSONB.
    pub match_json: serde_json::Value,
    /// Snapshot timestamp.
    pub snapshot_at: DateTime<Utc>,
}

/// A dog snapshot row from the `dog_snapshots` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DogSnapshot {
    /// Auto-increment row ID.
    pub id: i64,
    /// Dog that was snapshotted.
    pub dog_id: Uuid,
    /// Owner of the dog at snapshot time.
    pub owner_id: Uuid,
    /// Full profile state as JSONB.
    pub profile_json: serde_json::Value,
    /// Snapshot timestamp.
    pub snapshot_at: DateTime<Utc>,
}
