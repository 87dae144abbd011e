//! Inactivity / Engagement Monitor
//!
//! One timer per storefront session. Any interaction resets it; when the
//! window elapses without a reset, a human-handoff prompt becomes pending.
//! Exactly one pending timeout exists at a time — resets cancel and
//! reschedule, never stack. The timer is released when the monitor drops.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

/// Default window: 2 minutes without interaction
pub const DEFAULT_INACTIVITY_WINDOW: Duration = Duration::from_secs(120);

/// Scoped inactivity timer for one session
#[derive(Debug)]
pub struct EngagementMonitor {
    window: Duration,
    prompt_pending: Arc<AtomicBool>,
    /// Token of the single armed timer; replaced on every reset
    timer: Mutex<Option<CancellationToken>>,
}

impl EngagementMonitor {
    /// Create the monitor and arm the first timer
    pub fn new(window: Duration) -> Self {
        let monitor = Self {
            window,
            prompt_pending: Arc::new(AtomicBool::new(false)),
            timer: Mutex::new(None),
        };
        monitor.arm();
        monitor
    }

    /// Interaction signal: cancel the pending timeout and schedule a fresh
    /// one. Does not clear an already-pending prompt — only [`dismiss`]
    /// does that.
    ///
    /// [`dismiss`]: Self::dismiss
    pub fn touch(&self) {
        self.arm();
    }

    /// Whether the handoff prompt should be shown
    pub fn prompt_pending(&self) -> bool {
        self.prompt_pending.load(Ordering::Relaxed)
    }

    /// Shopper dismissed the prompt: hide it and restart the timer
    pub fn dismiss(&self) {
        self.prompt_pending.store(false, Ordering::Relaxed);
        self.arm();
    }

    fn arm(&self) {
        let token = CancellationToken::new();
        let guard = token.clone();
        let pending = self.prompt_pending.clone();
        let window = self.window;

        // Replace (and cancel) the previous timer before spawning the new one
        let previous = self.timer.lock().replace(token);
        if let Some(previous) = previous {
            previous.cancel();
        }

        tokio::spawn(async move {
            tokio::select! {
                _ = guard.cancelled() => {}
                _ = tokio::time::sleep(window) => {
                    pending.store(true, Ordering::Relaxed);
                }
            }
        });
    }
}

impl Drop for EngagementMonitor {
    fn drop(&mut self) {
        if let Some(token) = self.timer.lock().take() {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_prompt_fires_after_window() {
        let monitor = EngagementMonitor::new(Duration::from_secs(120));
        assert!(!monitor.prompt_pending());

        tokio::time::sleep(Duration::from_secs(121)).await;
        assert!(monitor.prompt_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_touch_resets_the_window() {
        let monitor = EngagementMonitor::new(Duration::from_secs(120));

        tokio::time::sleep(Duration::from_secs(100)).await;
        monitor.touch();
        tokio::time::sleep(Duration::from_secs(100)).await;
        // 200s elapsed in total, but never 120s without interaction
        assert!(!monitor.prompt_pending());

        tokio::time::sleep(Duration::from_secs(21)).await;
        assert!(monitor.prompt_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_clears_and_restarts() {
        let monitor = EngagementMonitor::new(Duration::from_secs(120));
        tokio::time::sleep(Duration::from_secs(121)).await;
        assert!(monitor.prompt_pending());

        monitor.dismiss();
        assert!(!monitor.prompt_pending());

        tokio::time::sleep(Duration::from_secs(121)).await;
        assert!(monitor.prompt_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_touch_does_not_clear_pending_prompt() {
        let monitor = EngagementMonitor::new(Duration::from_secs(120));
        tokio::time::sleep(Duration::from_secs(121)).await;
        assert!(monitor.prompt_pending());

        // Browsing again keeps the prompt until the shopper dismisses it
        monitor.touch();
        assert!(monitor.prompt_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_resets_do_not_stack() {
        let monitor = EngagementMonitor::new(Duration::from_secs(120));
        // A burst of interactions must still yield a single live timer
        for _ in 0..50 {
            monitor.touch();
        }
        tokio::time::sleep(Duration::from_secs(119)).await;
        assert!(!monitor.prompt_pending());
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(monitor.prompt_pending());
    }
}
