//! Playback state tracking
//!
//! Separates what the user asked for (play intent, held by the manager) from
//! what the surface is actually doing ([`ObservedState`], derived purely from
//! surface events). The manager reconciles the two; nothing in here issues
//! requests.

use crate::surface::SurfaceEvent;

/// Surface-side playback state, folded from [`SurfaceEvent`]s.
///
/// Holds the invariant `is_rendering` implies `can_render`: a surface cannot
/// make progress on data it could not render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObservedState {
    /// The surface has buffered enough data to start rendering.
    pub can_render: bool,

    /// The surface is actually progressing through the stream.
    pub is_rendering: bool,
}

impl ObservedState {
    /// Fold a surface event into the state.
    pub fn apply(&mut self, event: SurfaceEvent) {
        match event {
            SurfaceEvent::CanRenderChanged(can_render) => {
                self.can_render = can_render;
                if !can_render {
                    self.is_rendering = false;
                }
            }
            SurfaceEvent::RenderingStateChanged(is_rendering) => {
                self.is_rendering = is_rendering;
                if is_rendering {
                    self.can_render = true;
                }
            }
        }
    }

    /// Reset to the detached state. Used on session teardown.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Derived playback phase consumed by controls and feedback collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    /// No play intent.
    Idle,

    /// The user asked for playback but the surface is not rendering yet.
    Waiting,

    /// Playback is confirmed on the surface.
    Playing,
}

impl PlaybackPhase {
    /// Map intent and observation to the phase shown to the user.
    pub fn derive(play: bool, observed: ObservedState) -> Self {
        if play && observed.is_rendering {
            PlaybackPhase::Playing
        } else if play {
            PlaybackPhase::Waiting
        } else {
            PlaybackPhase::Idle
        }
    }

    pub fn is_waiting(&self) -> bool {
        matches!(self, PlaybackPhase::Waiting)
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackPhase::Playing)
    }

    pub fn description(&self) -> &'static str {
        match self {
            PlaybackPhase::Idle => "Idle",
            PlaybackPhase::Waiting => "Waiting",
            PlaybackPhase::Playing => "Playing",
        }
    }
}

impl std::fmt::Display for PlaybackPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}
