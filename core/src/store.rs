//! Typed access to the persisted profile, history and statistics records.
//!
//! The backing store only knows raw strings under string keys. Every record is one JSON value;
//! updates read the whole record, modify it and write it back.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StoreError;
use crate::profile::UserProfile;
use crate::session::{AggregateStats, History, SessionOutcome, SessionScorer};

pub const PROFILE_KEY: &str = "brainblast:profile";
pub const HISTORY_KEY: &str = "brainblast:history";
pub const STATS_KEY: &str = "brainblast:stats";
pub const JOINED_KEY: &str = "brainblast:joined";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str);
}

/// In-process store, used natively and in tests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

#[derive(Clone, Debug, Default)]
pub struct Repository<S> {
    store: S,
    scorer: SessionScorer,
}

impl<S: KeyValueStore> Repository<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            scorer: SessionScorer::default(),
        }
    }

    pub fn with_scorer(store: S, scorer: SessionScorer) -> Self {
        Self { store, scorer }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.read(PROFILE_KEY)
    }

    pub fn set_profile(&mut self, profile: &UserProfile) {
        self.write(PROFILE_KEY, profile);
    }

    pub fn history(&self) -> History {
        self.read(HISTORY_KEY).unwrap_or_default()
    }

    pub fn set_history(&mut self, history: &History) {
        self.write(HISTORY_KEY, history);
    }

    pub fn stats(&self) -> AggregateStats {
        self.read(STATS_KEY).unwrap_or_default()
    }

    pub fn set_stats(&mut self, stats: &AggregateStats) {
        self.write(STATS_KEY, stats);
    }

    /// Folds a finished session into history and statistics, and mirrors both into the signed-in
    /// profile if there is one.
    pub fn record_outcome(&mut self, outcome: SessionOutcome) -> AggregateStats {
        log::info!(
            "{} ({}) finished: {}/{}",
            outcome.topic,
            outcome.mode,
            outcome.score,
            outcome.total
        );
        let (history, stats) = self.scorer.record(self.history(), &self.stats(), outcome);
        self.set_history(&history);
        self.set_stats(&stats);

        if let Some(mut profile) = self.profile() {
            profile.history = history;
            profile.stats = stats.clone();
            self.set_profile(&profile);
        }
        stats
    }

    /// Signs in on this device, picking up whatever history and statistics it already holds.
    pub fn sign_in(&mut self, username: &str, email: &str, now: DateTime<Utc>) -> UserProfile {
        let joined_at = match self.read(JOINED_KEY) {
            Some(joined_at) => joined_at,
            None => {
                self.write(JOINED_KEY, &now);
                now
            }
        };
        let profile = UserProfile {
            history: self.history(),
            stats: self.stats(),
            ..UserProfile::new(username, email, joined_at)
        };
        self.set_profile(&profile);
        log::info!("signed in as {}", profile.username);
        profile
    }

    /// Starts a new profile with empty history and zeroed statistics.
    pub fn register(&mut self, username: &str, email: &str, now: DateTime<Utc>) -> UserProfile {
        let profile = UserProfile::new(username, email, now);
        self.set_profile(&profile);
        self.set_history(&profile.history);
        self.set_stats(&profile.stats);
        self.write(JOINED_KEY, &now);
        log::info!("registered {}", profile.username);
        profile
    }

    /// Forgets the profile; history and statistics stay for the next sign-in.
    pub fn sign_out(&mut self) {
        self.store.remove(PROFILE_KEY);
        log::info!("signed out");
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.store.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                log::warn!("Ignoring malformed record {:?}: {}", key, err);
                None
            }
        }
    }

    fn write<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        let result = serde_json::to_string(value)
            .map_err(|source| StoreError::Serialize {
                key: key.to_string(),
                source,
            })
            .and_then(|raw| self.store.set(key, raw));
        if let Err(err) = result {
            log::error!("Could not save {:?}: {}", key, err);
        }
    }
}
