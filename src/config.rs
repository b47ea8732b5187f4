//! Host-supplied configuration types.
//!
//! The host pushes a [`ConnectionTarget`] and play intent into the player;
//! nothing in this crate reads configuration from disk or the environment.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Preference key under which the diagnostics-overlay toggle is stored.
pub const PREF_SHOW_DIAGNOSTICS: &str = "show_diagnostics";

/// Identifies where a playback session connects.
///
/// Compared by value: pushing a target that differs in either field from the
/// current one invalidates the live session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionTarget {
    /// Transport endpoint the pipeline connects to, e.g. `ws://cam/live`.
    pub transport_uri: String,

    /// Media source the transport relays, e.g. `rtsp://cam/stream`.
    pub media_uri: String,
}

impl ConnectionTarget {
    pub fn new(transport_uri: impl Into<String>, media_uri: impl Into<String>) -> Self {
        Self {
            transport_uri: transport_uri.into(),
            media_uri: media_uri.into(),
        }
    }

    /// True when either endpoint is missing; such a target cannot be
    /// connected and counts as "no target".
    pub fn is_empty(&self) -> bool {
        self.transport_uri.is_empty() || self.media_uri.is_empty()
    }
}

impl std::fmt::Display for ConnectionTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.transport_uri, self.media_uri)
    }
}

/// Tunables for the playback session manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSettings {
    /// Consecutive no-progress probes before the stream is declared frozen
    /// and the transport is rebuilt.
    pub freeze_threshold: u32,

    /// Cadence of the liveness probe. Must be non-zero.
    pub probe_interval: Duration,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            freeze_threshold: 3,
            probe_interval: Duration::from_secs(1),
        }
    }
}
