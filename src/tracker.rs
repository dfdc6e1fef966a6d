//! Refresh orchestration
//!
//! Ties the fetch policy, upstream client, aggregator and resolver together
//! around the persisted tracker state, and exposes the display accessor for
//! the current value. A `tokio::sync::Mutex` guarantees at most one refresh
//! is in flight at a time.

use chrono::Utc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::aggregate::aggregate;
use crate::config::Settings;
use crate::fetch::CountClient;
use crate::policy::is_refresh_due;
use crate::resolve::{resolve_count, Resolution};
use crate::state::StateStore;

/// Displayed while no profile identifier has been configured.
pub const NOT_CONFIGURED: &str = "(not configured)";

/// Displayed after setup but before the first value has been resolved.
pub const AWAITING_FIRST_FETCH: &str = "(awaiting first fetch)";

/// Errors that can escape a refresh cycle.
///
/// Upstream faults never surface here; only failures to persist state do.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Writing tracker state to disk failed
    #[error("failed to persist tracker state: {0}")]
    Store(#[from] std::io::Error),
}

/// What a refresh attempt did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// No profile configured; nothing was fetched
    NotConfigured,
    /// The interval has not elapsed yet; nothing was fetched
    NotDue,
    /// A fresh count was stored
    Updated(String),
    /// No valid count; the fallback text was stored
    FellBack(String),
    /// No valid count and no fallback; the previous value was kept
    Retained,
}

/// Orchestrates refresh cycles and exposes the current display value.
pub struct Tracker {
    settings: Settings,
    store: StateStore,
    client: CountClient,
    /// Serializes refresh cycles so concurrent callers can't race the store.
    refresh_lock: Mutex<()>,
}

impl Tracker {
    pub fn new(settings: Settings, store: StateStore, client: CountClient) -> Self {
        Self {
            settings,
            store,
            client,
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn client(&self) -> &CountClient {
        &self.client
    }

    /// The current cached/fallback value as a string, callable from any
    /// rendering context. Returns a fixed placeholder until the profile is
    /// configured, and another until the first value has been resolved.
    pub fn display_count(&self) -> String {
        if !self.settings.is_configured() {
            return NOT_CONFIGURED.to_string();
        }
        self.store
            .load()
            .count
            .unwrap_or_else(|| AWAITING_FIRST_FETCH.to_string())
    }

    /// Unix timestamp of the last refresh attempt, if any.
    pub fn last_checked(&self) -> Option<i64> {
        self.store.load().last_checked
    }

    /// Runs one refresh cycle.
    ///
    /// Skips entirely when no profile is configured, and when the interval
    /// has not elapsed unless `force` is set. The checked-time is stamped
    /// and persisted before the network round trip so a down upstream is
    /// not hammered on every subsequent call.
    ///
    /// # Errors
    /// Returns [`TrackerError::Store`] if tracker state cannot be written.
    pub async fn refresh(&self, force: bool) -> Result<RefreshOutcome, TrackerError> {
        let _guard = self.refresh_lock.lock().await;

        if !self.settings.is_configured() {
            debug!("no profile configured, skipping refresh");
            return Ok(RefreshOutcome::NotConfigured);
        }

        let mut state = self.store.load();
        let now = Utc::now().timestamp();

        if !force && !is_refresh_due(state.last_checked, self.settings.every_secs(), now) {
            debug!(last_checked = ?state.last_checked, "refresh not due yet");
            return Ok(RefreshOutcome::NotDue);
        }

        // Stamp before the network call: the attempt counts even if the
        // upstream is down, which keeps failed fetches from retrying on
        // every invocation.
        state.last_checked = Some(now);
        self.store.save(&state)?;

        let samples = self
            .client
            .fetch_samples(&self.settings.profile, self.settings.average_window_secs())
            .await;
        let candidate = aggregate(&samples);

        let resolution = resolve_count(candidate, &self.settings.fallback_text);
        if let Some(value) = resolution.persisted_value() {
            state.count = Some(value);
            self.store.save(&state)?;
        }

        let outcome = match resolution {
            Resolution::Count(count) => RefreshOutcome::Updated(count.to_string()),
            Resolution::Fallback(text) => RefreshOutcome::FellBack(text),
            Resolution::Retain => RefreshOutcome::Retained,
        };
        info!(profile = %self.settings.profile, ?outcome, "refresh cycle finished");
        Ok(outcome)
    }
}
