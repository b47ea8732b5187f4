//! Health counters for the playback session
//!
//! Tracks how often the manager had to intervene. All fields use atomic
//! operations so the counters can be shared with the worker loop and read
//! from diagnostics collaborators without locking.

use std::sync::atomic::{AtomicU64, Ordering};

/// Lifetime counters for a player instance.
#[derive(Debug, Default)]
pub struct PlaybackHealth {
    /// Transport pipelines constructed, including recovery rebuilds.
    sessions_opened: AtomicU64,

    /// Frozen-stream recoveries performed.
    recoveries: AtomicU64,

    /// Render-start requests the surface refused.
    render_rejections: AtomicU64,
}

impl PlaybackHealth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_session_opened(&self) {
        self.sessions_opened.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_recovery(&self) {
        self.recoveries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_render_rejection(&self) {
        self.render_rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn sessions_opened(&self) -> u64 {
        self.sessions_opened.load(Ordering::Relaxed)
    }

    pub fn recoveries(&self) -> u64 {
        self.recoveries.load(Ordering::Relaxed)
    }

    pub fn render_rejections(&self) -> u64 {
        self.render_rejections.load(Ordering::Relaxed)
    }

    /// Snapshot for the diagnostics table.
    pub fn snapshot(&self) -> HealthSnapshot {
        HealthSnapshot {
            sessions_opened: self.sessions_opened(),
            recoveries: self.recoveries(),
            render_rejections: self.render_rejections(),
        }
    }
}

/// Point-in-time copy of [`PlaybackHealth`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthSnapshot {
    pub sessions_opened: u64,
    pub recoveries: u64,
    pub render_rejections: u64,
}

impl std::fmt::Display for HealthSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} sessions, {} recoveries, {} rejected play requests",
            self.sessions_opened, self.recoveries, self.render_rejections
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let health = PlaybackHealth::new();

        health.record_session_opened();
        health.record_session_opened();
        health.record_recovery();

        assert_eq!(health.sessions_opened(), 2);
        assert_eq!(health.recoveries(), 1);
        assert_eq!(health.render_rejections(), 0);

        let snapshot = health.snapshot();
        assert_eq!(snapshot.sessions_opened, 2);
        assert_eq!(
            snapshot.to_string(),
            "2 sessions, 1 recoveries, 0 rejected play requests"
        );
    }
}
