//! Session manager
//!
//! Registry of live storefront sessions. Sessions are in-memory only; an
//! idle sweeper reclaims the ones their shopper abandoned.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use uuid::Uuid;

use crate::db::models::Store;
use crate::storefront::inactivity::DEFAULT_INACTIVITY_WINDOW;
use crate::storefront::session::StorefrontSession;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Sessions idle longer than this are reclaimed
const SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// Sweep cadence
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Registry of live storefront sessions
pub struct SessionManager {
    sessions: DashMap<String, Arc<StorefrontSession>>,
    default_window: Duration,
    ttl: Duration,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::with_settings(DEFAULT_INACTIVITY_WINDOW, SESSION_TTL)
    }

    /// Custom default inactivity window (from server config), default TTL
    pub fn with_window(default_window: Duration) -> Self {
        Self::with_settings(default_window, SESSION_TTL)
    }

    pub fn with_settings(default_window: Duration, ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            default_window,
            ttl,
        }
    }

    /// Open a session for a store. Store settings may override the
    /// inactivity window.
    pub fn open(&self, store: &Store) -> Arc<StorefrontSession> {
        let window = store
            .settings
            .inactivity_delay_secs
            .map(Duration::from_secs)
            .unwrap_or(self.default_window);

        let id = Uuid::new_v4().to_string();
        let session = Arc::new(StorefrontSession::new(id.clone(), store, window));
        self.sessions.insert(id, session.clone());

        tracing::debug!(session_id = %session.id, slug = %session.store_slug, "Storefront session opened");
        session
    }

    /// Look up a live session
    pub fn get(&self, id: &str) -> AppResult<Arc<StorefrontSession>> {
        self.sessions
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::new(ErrorCode::SessionNotFound))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drop sessions idle beyond the TTL. Returns how many were reclaimed.
    pub fn sweep_idle(&self) -> usize {
        let ttl_millis = self.ttl.as_millis() as i64;
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| session.idle_millis() < ttl_millis);
        let removed = before - self.sessions.len();
        if removed > 0 {
            tracing::info!(count = removed, "Idle storefront sessions reclaimed");
        }
        removed
    }

    /// Background sweeper task; runs until the process exits
    pub fn start_sweeper(self: &Arc<Self>) {
        let manager = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SWEEP_INTERVAL);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                manager.sweep_idle();
            }
        });
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}
