//! Media surface contract.
//!
//! The surface is the renderable target that decodes and displays the samples
//! a transport feeds it. It is owned by the host and handed to the player;
//! the player is its only mutator. The surface reports back through
//! [`SurfaceEvent`]s, which the host forwards into the player.

use anyhow::Result;
use std::time::Duration;

/// Opaque identity of a render surface, reported alongside geometry so
/// layout collaborators can address the right target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(pub u64);

/// Native dimensions of the rendered video, known once rendering is
/// confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoGeometry {
    pub width: u32,
    pub height: u32,
    pub surface: SurfaceHandle,
}

/// Playback events a surface reports back into the session manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// Buffered data crossed (or fell back below) the playable threshold.
    CanRenderChanged(bool),

    /// Actual playback started or stopped.
    RenderingStateChanged(bool),
}

/// A drawable target with a playback clock.
pub trait MediaSurface: Send {
    /// Ask the surface to start rendering. The surface may refuse, e.g. when
    /// platform policy blocks playback.
    fn request_play(&mut self) -> Result<()>;

    /// Ask the surface to stop rendering.
    fn request_pause(&mut self);

    /// Current position of the playback clock. Stops advancing when the feed
    /// freezes, which is the only stall signal this system has.
    fn clock_value(&self) -> Duration;

    fn native_width(&self) -> u32;

    fn native_height(&self) -> u32;

    /// Detach the current source entirely. Called during session teardown
    /// after the transport has been closed.
    fn clear_source(&mut self);

    fn handle(&self) -> SurfaceHandle;
}
