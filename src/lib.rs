//! camsight
//!
//! Playback-session lifecycle management for live network camera streams.
//!
//! The host owns a render surface and a transport implementation; this crate
//! owns everything between them: it reconciles the user's play intent with
//! what the surface actually does, issues exactly one stream fetch per
//! session, watches the playback clock for frozen feeds and transparently
//! rebuilds the transport when one is detected.
//!
//! ```no_run
//! # use camsight::{ConnectionTarget, PlayerSettings, PlayerWorker};
//! # use camsight::{MediaSurface, PlayerEvents, TransportFactory};
//! # fn demo(surface: Box<dyn MediaSurface>,
//! #         factory: Box<dyn TransportFactory>,
//! #         events: Box<dyn PlayerEvents>) {
//! let (worker, handle) = PlayerWorker::new(surface, factory, events, PlayerSettings::default());
//! worker.launch();
//!
//! handle.set_target(Some(ConnectionTarget::new("ws://cam/live", "rtsp://cam/stream")));
//! handle.play();
//! # }
//! ```

pub mod config;
pub mod pipeline;
pub mod surface;
pub mod utils;
pub mod workers;

pub use config::{ConnectionTarget, PlayerSettings, PREF_SHOW_DIAGNOSTICS};
pub use pipeline::health::HealthSnapshot;
pub use pipeline::manager::{PlaybackSessionManager, PlayerEvents, PlayerStatus, SessionSignal};
pub use pipeline::state::{ObservedState, PlaybackPhase};
pub use pipeline::transport::{
    DescriptionHandler, SessionDescription, TransportFactory, TransportPipeline,
};
pub use surface::{MediaSurface, SurfaceEvent, SurfaceHandle, VideoGeometry};
pub use utils::prefs::{MemoryPrefs, PreferenceStore};
pub use workers::player::{PlayerCommand, PlayerHandle, PlayerWorker};
pub use workers::WorkerClose;
