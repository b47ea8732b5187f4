//! Playback pipeline layer
//!
//! Separates the concerns of a live camera session:
//! - Contracts: the transport pipeline the network side implements
//! - State: desired vs. observed playback state and the derived phase
//! - Liveness: the stall detector and health counters
//! - Coordination: the session manager reconciling all of the above
//!
//! The manager is deliberately synchronous except where the transport forces
//! asynchrony (readiness, the play request); the event loop in
//! `crate::workers::player` drives it.

pub mod health;
pub mod manager;
pub mod session;
pub mod stall;
pub mod state;
pub mod transport;

#[cfg(test)]
pub(crate) mod fakes;

pub use health::{HealthSnapshot, PlaybackHealth};
pub use manager::{PlaybackSessionManager, PlayerEvents, PlayerStatus, SessionSignal};
pub use session::Session;
pub use stall::StallDetector;
pub use state::{ObservedState, PlaybackPhase};
pub use transport::{DescriptionHandler, SessionDescription, TransportFactory, TransportPipeline};
