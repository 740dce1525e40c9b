//! Background recorder: event log writer and snapshot scheduler.
//!
//! The [`Recorder`] subscribes to the [`EventBus`] and appends every
//! published event to the database, and on an interval writes full-state
//! snapshots of both registries. Registry state stays authoritative; a
//! failed write is logged and the loops keep running.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use super::postgres::PostgresPersistence;
use crate::domain::{DogProfile, DogRegistry, EventBus, MatchEvent, MatchRegistry, MatchRequest};
use crate::error::MatchError;

/// Settings for the background persistence loops.
#[derive(Debug, Clone)]
pub struct RecorderSettings {
    /// Seconds between automatic state snapshots (0 = disabled).
    pub snapshot_interval_secs: u64,
    /// Whether to append published events to the event log.
    pub event_log_enabled: bool,
    /// Delete snapshots older than this many days (0 = never).
    pub cleanup_after_days: u64,
}

/// Keeps the durable copy of the registries up to date.
#[derive(Debug)]
pub struct Recorder {
    store: PostgresPersistence,
    dogs: Arc<DogRegistry>,
    matches: Arc<MatchRegistry>,
    settings: RecorderSettings,
}

impl Recorder {
    /// Creates a recorder over the given store and registries.
    #[must_use]
    pub fn new(
        store: PostgresPersistence,
        dogs: Arc<DogRegistry>,
        matches: Arc<MatchRegistry>,
        settings: RecorderSettings,
    ) -> Self {
        Self {
            store,
            dogs,
            matches,
            settings,
        }
    }

    /// Reloads the latest snapshots into the in-memory registries.
    ///
    /// Returns how many dogs and matches were restored. Rows that no
    /// longer deserialize are skipped with a warning so one bad snapshot
    /// cannot block startup.
    ///
    /// # Errors
    ///
    /// Returns a [`MatchError::Store`] when the snapshot queries fail.
    pub async fn restore(&self) -> Result<(usize, usize), MatchError> {
        let mut dogs_restored = 0_usize;
        for row in self.store.load_latest_dog_snapshots().await? {
            match serde_json::from_value::<DogProfile>(row.profile_json) {
                Ok(profile) => {
                    if self.dogs.insert(profile).await.is_ok() {
                        dogs_restored += 1;
                    }
                }
                Err(e) => {
                    tracing::warn!(dog_id = %row.dog_id, error = %e, "skipping undecodable dog snapshot");
                }
            }
        }

        let mut matches_restored = 0_usize;
        for row in self.store.load_latest_match_snapshots().await? {
            match serde_json::from_value::<MatchRequest>(row.match_json) {
                Ok(request) => {
                    if self.matches.insert(request).await.is_ok() {
                        matches_restored += 1;
                    }
                }
                Err(e) => {
                    tracing::warn!(match_id = %row.match_id, error = %e, "skipping undecodable match snapshot");
                }
            }
        }

        Ok((dogs_restored, matches_restored))
    }

    /// Spawns the event-log and snapshot loops onto the runtime.
    pub fn spawn(self: Arc<Self>, event_bus: &EventBus) {
        if self.settings.event_log_enabled {
            let recorder = Arc::clone(&self);
            let event_rx = event_bus.subscribe();
            tokio::spawn(async move { recorder.run_event_log(event_rx).await });
        }
        if self.settings.snapshot_interval_secs > 0 {
            let recorder = Arc::clone(&self);
            tokio::spawn(async move { recorder.run_snapshot_loop().await });
        }
    }

    /// Writes one snapshot of every dog and match.
    ///
    /// # Errors
    ///
    /// Returns the first failed write as a [`MatchError::Store`] (or
    /// [`MatchError::Internal`] when serialization fails).
    pub async fn snapshot_all(&self) -> Result<(), MatchError> {
        for profile in self.dogs.all().await {
            let profile_json = serde_json::to_value(&profile)
                .map_err(|e| MatchError::Internal(e.to_string()))?;
            self.store
                .save_dog_snapshot(profile.id.into(), profile.owner_id.into(), &profile_json)
                .await?;
        }
        for request in self.matches.all().await {
            let match_json = serde_json::to_value(&request)
                .map_err(|e| MatchError::Internal(e.to_string()))?;
            self.store
                .save_match_snapshot(request.id.into(), request.status.as_str(), &match_json)
                .await?;
        }
        Ok(())
    }

    async fn run_event_log(&self, mut event_rx: broadcast::Receiver<MatchEvent>) {
        loop {
            match event_rx.recv().await {
                Ok(event) => {
                    let match_id = event.match_id();
                    let payload = serde_json::to_value(&event).unwrap_or_default();
                    if let Err(e) = self
                        .store
                        .save_event(match_id.into(), event.event_type_str(), &payload)
                        .await
                    {
                        tracing::warn!(%match_id, error = %e, "event log append failed");
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(lagged = n, "recorder lagged behind event bus");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        tracing::debug!("event log loop stopped");
    }

    async fn run_snapshot_loop(&self) {
        let mut ticker =
            tokio::time::interval(Duration::from_secs(self.settings.snapshot_interval_secs));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(e) = self.snapshot_all().await {
                tracing::warn!(error = %e, "snapshot pass failed");
            }
            if self.settings.cleanup_after_days > 0 {
                match self
                    .store
                    .delete_old_snapshots(self.settings.cleanup_after_days)
                    .await
                {
                    Ok(0) => {}
                    Ok(deleted) => tracing::info!(deleted, "old snapshots pruned"),
                    Err(e) => tracing::warn!(error = %e, "snapshot cleanup failed"),
                }
            }
        }
    }
}
