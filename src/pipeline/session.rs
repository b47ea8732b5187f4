//! Session bookkeeping
//!
//! A session is one live binding between a connection target and a transport
//! pipeline. The manager owns at most one at a time. Every session carries a
//! monotonically increasing generation; deferred continuations (the readiness
//! watcher, the description callback) are tagged with it and dropped if a
//! different session is live when they fire.

use crate::pipeline::transport::TransportPipeline;

pub struct Session {
    pub(crate) generation: u64,
    pub(crate) pipeline: Box<dyn TransportPipeline>,

    /// The pipeline has reported it is ready to negotiate playback.
    pub(crate) ready: bool,

    /// A play request has been issued against this pipeline. Guards against
    /// duplicate fetch initiation when play intent toggles.
    pub(crate) ready_and_fetching: bool,

    /// The negotiated description has been forwarded upward.
    pub(crate) described: bool,
}

impl Session {
    pub fn new(generation: u64, pipeline: Box<dyn TransportPipeline>) -> Self {
        Self {
            generation,
            pipeline,
            ready: false,
            ready_and_fetching: false,
            described: false,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("generation", &self.generation)
            .field("ready", &self.ready)
            .field("ready_and_fetching", &self.ready_and_fetching)
            .field("described", &self.described)
            .finish()
    }
}
