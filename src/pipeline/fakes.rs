//! Test doubles for the session manager and the player worker.
//!
//! Every fake appends to a shared operation log so tests can assert both
//! counts and ordering of lifecycle actions.

use crate::config::ConnectionTarget;
use crate::pipeline::manager::PlayerEvents;
use crate::pipeline::state::PlaybackPhase;
use crate::pipeline::transport::{
    DescriptionHandler, SessionDescription, TransportFactory, TransportPipeline,
};
use crate::surface::{MediaSurface, SurfaceHandle, VideoGeometry};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

pub(crate) type OpLog = Arc<Mutex<Vec<String>>>;

pub(crate) fn new_log() -> OpLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub(crate) fn entries(log: &OpLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

pub(crate) fn count(log: &OpLog, entry: &str) -> usize {
    log.lock().unwrap().iter().filter(|e| *e == entry).count()
}

/// Surface double with a settable clock and a play-rejection switch.
pub(crate) struct FakeSurface {
    log: OpLog,
    pub clock: Arc<Mutex<Duration>>,
    pub reject_play: Arc<AtomicBool>,
}

impl FakeSurface {
    pub fn new(log: OpLog) -> Self {
        Self {
            log,
            clock: Arc::new(Mutex::new(Duration::ZERO)),
            reject_play: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl MediaSurface for FakeSurface {
    fn request_play(&mut self) -> Result<()> {
        self.log.lock().unwrap().push("surface.play".into());
        if self.reject_play.load(Ordering::SeqCst) {
            Err(anyhow!("playback blocked by platform policy"))
        } else {
            Ok(())
        }
    }

    fn request_pause(&mut self) {
        self.log.lock().unwrap().push("surface.pause".into());
    }

    fn clock_value(&self) -> Duration {
        *self.clock.lock().unwrap()
    }

    fn native_width(&self) -> u32 {
        640
    }

    fn native_height(&self) -> u32 {
        480
    }

    fn clear_source(&mut self) {
        self.log.lock().unwrap().push("surface.clear".into());
    }

    fn handle(&self) -> SurfaceHandle {
        SurfaceHandle(7)
    }
}

/// Test-side view of one created pipeline.
pub(crate) struct PipelineProbe {
    pub id: u64,
    ready_tx: Mutex<Option<oneshot::Sender<()>>>,
    handler: Arc<Mutex<Option<DescriptionHandler>>>,
    closed: Arc<AtomicBool>,
    play_requests: Arc<AtomicUsize>,
}

impl PipelineProbe {
    /// Resolve the readiness signal, as the real transport would after
    /// negotiation.
    pub fn fire_ready(&self) {
        if let Some(tx) = self.ready_tx.lock().unwrap().take() {
            let _ = tx.send(());
        }
    }

    /// Invoke the wired description callback, if any.
    pub fn describe(&self, sdp: &str) {
        if let Some(handler) = self.handler.lock().unwrap().as_ref() {
            handler(SessionDescription::new(sdp));
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn play_requests(&self) -> usize {
        self.play_requests.load(Ordering::SeqCst)
    }
}

pub(crate) struct FakePipeline {
    id: u64,
    log: OpLog,
    readiness: Option<oneshot::Receiver<()>>,
    handler: Arc<Mutex<Option<DescriptionHandler>>>,
    closed: Arc<AtomicBool>,
    play_requests: Arc<AtomicUsize>,
}

#[async_trait]
impl TransportPipeline for FakePipeline {
    fn take_readiness(&mut self) -> Option<oneshot::Receiver<()>> {
        self.readiness.take()
    }

    fn set_description_handler(&mut self, handler: DescriptionHandler) {
        *self.handler.lock().unwrap() = Some(handler);
    }

    async fn request_play(&mut self) -> Result<()> {
        self.play_requests.fetch_add(1, Ordering::SeqCst);
        self.log
            .lock()
            .unwrap()
            .push(format!("pipeline.play#{}", self.id));
        Ok(())
    }

    fn close(&mut self) {
        // Logged once; repeated closes stay legal and silent.
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.log.lock().unwrap().push(format!("close#{}", self.id));
        }
    }
}

/// Factory double handing out probe-instrumented pipelines with sequential
/// ids, matching the manager's session generations.
pub(crate) struct FakeFactory {
    log: OpLog,
    next_id: u64,
    probes: Arc<Mutex<Vec<Arc<PipelineProbe>>>>,
    pub fail_next: Arc<AtomicBool>,
}

impl FakeFactory {
    pub fn new(log: OpLog) -> Self {
        Self {
            log,
            next_id: 1,
            probes: Arc::new(Mutex::new(Vec::new())),
            fail_next: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn probes(&self) -> Arc<Mutex<Vec<Arc<PipelineProbe>>>> {
        Arc::clone(&self.probes)
    }
}

impl TransportFactory for FakeFactory {
    fn create(
        &mut self,
        _target: &ConnectionTarget,
        _surface: &mut dyn MediaSurface,
    ) -> Result<Box<dyn TransportPipeline>> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(anyhow!("connection refused"));
        }

        let id = self.next_id;
        self.next_id += 1;
        self.log.lock().unwrap().push(format!("create#{id}"));

        let (ready_tx, ready_rx) = oneshot::channel();
        let handler = Arc::new(Mutex::new(None));
        let closed = Arc::new(AtomicBool::new(false));
        let play_requests = Arc::new(AtomicUsize::new(0));

        self.probes.lock().unwrap().push(Arc::new(PipelineProbe {
            id,
            ready_tx: Mutex::new(Some(ready_tx)),
            handler: Arc::clone(&handler),
            closed: Arc::clone(&closed),
            play_requests: Arc::clone(&play_requests),
        }));

        Ok(Box::new(FakePipeline {
            id,
            log: Arc::clone(&self.log),
            readiness: Some(ready_rx),
            handler,
            closed,
            play_requests,
        }))
    }
}

/// Upward-notification sink appending to the log.
pub(crate) struct RecordingEvents {
    log: OpLog,
}

impl RecordingEvents {
    pub fn new(log: OpLog) -> Self {
        Self { log }
    }
}

impl PlayerEvents for RecordingEvents {
    fn on_geometry(&mut self, geometry: VideoGeometry) {
        self.log
            .lock()
            .unwrap()
            .push(format!("geometry {}x{}", geometry.width, geometry.height));
    }

    fn on_session_description(&mut self, description: SessionDescription) {
        self.log
            .lock()
            .unwrap()
            .push(format!("description {}", description.sdp));
    }

    fn on_phase(&mut self, phase: PlaybackPhase) {
        self.log.lock().unwrap().push(format!("phase {phase}"));
    }
}
