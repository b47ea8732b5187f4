//! Transport pipeline contract
//!
//! The transport moves encoded media from the network source to the render
//! surface. Protocol framing and demuxing live entirely behind this trait;
//! the session manager only creates, starts and closes pipelines and reacts
//! to their readiness and negotiation signals.

use crate::config::ConnectionTarget;
use crate::surface::MediaSurface;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

/// Negotiated session metadata, delivered at most once per transport
/// negotiation and forwarded upward unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescription {
    pub sdp: String,
}

impl SessionDescription {
    pub fn new(sdp: impl Into<String>) -> Self {
        Self { sdp: sdp.into() }
    }
}

/// Callback slot for the negotiated description.
pub type DescriptionHandler = Box<dyn Fn(SessionDescription) + Send>;

/// One live connection feeding samples to a render surface.
#[async_trait]
pub trait TransportPipeline: Send {
    /// One-shot signal resolved once negotiation can proceed. Returns the
    /// receiver on the first call and `None` once taken.
    fn take_readiness(&mut self) -> Option<oneshot::Receiver<()>>;

    /// Install the negotiated-description callback. The manager wires this
    /// when it issues the play request, not earlier.
    fn set_description_handler(&mut self, handler: DescriptionHandler);

    /// Ask the transport to start feeding the stream.
    async fn request_play(&mut self) -> Result<()>;

    /// Tear the connection down and release everything the transport
    /// attached to the render target. Safe to call more than once.
    fn close(&mut self);
}

/// Constructs pipelines for a connection target against a render surface.
///
/// Construction must have no side effect beyond instantiating the transport;
/// playback starts only on [`TransportPipeline::request_play`].
pub trait TransportFactory: Send {
    fn create(
        &mut self,
        target: &ConnectionTarget,
        surface: &mut dyn MediaSurface,
    ) -> Result<Box<dyn TransportPipeline>>;
}
