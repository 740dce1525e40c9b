//! PostgreSQL implementation of the persistence layer.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{DogSnapshot, MatchSnapshot, StoredEvent};
use crate::error::MatchError;

/// PostgreSQL-backed persistence layer using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresPersistence {
    pool: PgPool,
}

impl PostgresPersistence {
    /// Creates a new persistence layer with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Appends an event to the event log.
    ///
    /// # Errors
    ///
    /// Returns a [`MatchError::Store`] on database failure.
    pub async fn save_event(
        &self,
        match_id: Uuid,
        event_type: &str,
        payload: &serde_json::Value,
    ) -> Result<i64, MatchError> {
        let row = sqlx::query_scalar::<_, i64>(
            "INSERT INTO events (match_id, event_type, payload) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(match_id)
        .bind(event_type)
        .bind(payload)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| MatchError::Store(e.to_string()))?;

        Ok(row)
    }

    /// Saves a match request state snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`MatchError::Store`] on database failure.
    pub async fn save_match_snapshot(
        &self,
        match_id: Uuid,
        status: &str,
        match_json: &serde_json::Value,
    ) -> Result<i64, MatchError> {
        let row = sqlx::query_scalar::<_, i64>(
            "INSERT INTO match_snapshots (match_id, status, match_json) \
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(match_id)
        .bind(status)
        .bind(match_json)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| MatchError::Store(e.to_string()))?;

        Ok(row)
    }

    /// Saves a dog profile state snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`MatchError::Store`] on database failure.
    pub async fn save_dog_snapshot(
        &self,
        dog_id: Uuid,
        owner_id: Uuid,
        profile_json: &serde_json::Value,
    ) -> Result<i64, MatchError> {
        let row = sqlx::query_scalar::<_, i64>(
            "INSERT INTO dog_snapshots (dog_id, owner_id, profile_json) \
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(dog_id)
        .bind(owner_id)
        .bind(profile_json)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| MatchError::Store(e.to_string()))?;

        Ok(row)
    }

    /// Loads the latest snapshot for each match using `DISTINCT ON`.
    ///
    /// # Errors
    ///
    /// Returns a [`MatchError::Store`] on database failure.
    pub async fn load_latest_match_snapshots(&self) -> Result<Vec<MatchSnapshot>, MatchError> {
        let rows = sqlx::query_as::<_, (i64, Uuid, String, serde_json::Value, DateTime<Utc>)>(
            "SELECT DISTINCT ON (match_id) id, match_id, status, match_json, snapshot_at \
             FROM match_snapshots ORDER BY match_id, snapshot_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| MatchError::Store(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(id, match_id, status, match_json, snapshot_at)| MatchSnapshot {
                id,
                match_id,
                status,
                match_json,
                snapshot_at,
            })
            .collect())
    }

    /// Loads the latest snapshot for each dog using `DISTINCT ON`.
    ///
    /// # Errors
    ///
    /// Returns a [`MatchError::Store`] on database failure.
    pub async fn load_latest_dog_snapshots(&self) -> Result<Vec<DogSnapshot>, MatchError> {
        let rows = sqlx::query_as::<_, (i64, Uuid, Uuid, serde_json::Value, DateTime<Utc>)>(
            "SELECT DISTINCT ON (dog_id) id, dog_id, owner_id, profile_json, snapshot_at \
             FROM dog_snapshots ORDER BY dog_id, snapshot_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| MatchError::Store(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(id, dog_id, owner_id, profile_json, snapshot_at)| DogSnapshot {
                id,
                dog_id,
                owner_id,
                profile_json,
                snapshot_at,
            })
            .collect())
    }

    /// Loads events after the given timestamp, optionally filtered by match ID.
    ///
    /// # Errors
    ///
    /// Returns a [`MatchError::Store`] on database failure.
    pub async fn load_events_after(
        &self,
        after: DateTime<Utc>,
        match_id: Option<Uuid>,
    ) -> Result<Vec<StoredEvent>, MatchError> {
        let rows = if let Some(mid) = match_id {
            sqlx::query_as::<_, (i64, Uuid, String, serde_json::Value, DateTime<Utc>)>(
                "SELECT id, match_id, event_type, payload, created_at FROM events \
                 WHERE created_at > $1 AND match_id = $2 ORDER BY created_at ASC",
            )
            .bind(after)
            .bind(mid)
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, (i64, Uuid, String, serde_json::Value, DateTime<Utc>)>(
                "SELECT id, match_id, event_type, payload, created_at FROM events \
                 WHERE created_at > $1 ORDER BY created_at ASC",
            )
            .bind(after)
            .fetch_all(&self.pool)
            .await
        }
        .map_err(|e| MatchError::Store(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(
                |(id, match_id, event_type, payload, created_at)| StoredEvent {
                    id,
                    match_id,
                    event_type,
                    payload,
                    created_at,
                },
            )
            .collect())
    }

    /// Deletes snapshots older than the given number of days, both kinds.
    ///
    /// # Errors
    ///
    /// Returns a [`MatchError::Store`] on database failure.
    pub async fn delete_old_snapshots(&self, before_days: u64) -> Result<u64, MatchError> {
        let cutoff =
            Utc::now() - chrono::Duration::days(i64::try_from(before_days).unwrap_or(i64::MAX));

        let matches = sqlx::query("DELETE FROM match_snapshots WHERE snapshot_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| MatchError::Store(e.to_string()))?;
        let dogs = sqlx::query("DELETE FROM dog_snapshots WHERE snapshot_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| MatchError::Store(e.to_string()))?;

        Ok(matches.rows_affected() + dogs.rows_affected())
    }
}
