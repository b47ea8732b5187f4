//! Playback session manager
//!
//! Owns at most one transport pipeline at a time, bound to the render
//! surface, and continuously reconciles the user's play intent against what
//! the surface reports. Frozen feeds are detected by the stall probe and
//! recovered by replacing the transport; everything else the manager does is
//! driven by pushed state changes, never by polling.
//!
//! # Deferred continuations
//!
//! Transport readiness and the negotiated description arrive asynchronously.
//! Both are routed through a [`SessionSignal`] channel and tagged with the
//! generation of the session that produced them; the manager drops any
//! signal whose generation is no longer the live one. A superseded session
//! can therefore never issue a play request on a closed pipeline.

use crate::config::{ConnectionTarget, PlayerSettings, PREF_SHOW_DIAGNOSTICS};
use crate::pipeline::health::{HealthSnapshot, PlaybackHealth};
use crate::pipeline::session::Session;
use crate::pipeline::stall::StallDetector;
use crate::pipeline::state::{ObservedState, PlaybackPhase};
use crate::pipeline::transport::{SessionDescription, TransportFactory};
use crate::surface::{MediaSurface, SurfaceEvent, VideoGeometry};
use crate::utils::prefs::{MemoryPrefs, PreferenceStore};
use crate::workers::WorkerClose;
use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Asynchronous signals produced by a live session and routed back into the
/// event loop that owns the manager.
#[derive(Debug)]
pub enum SessionSignal {
    /// The transport reported it is ready to negotiate playback.
    Ready { generation: u64 },

    /// The transport delivered its negotiated description.
    Described {
        generation: u64,
        description: SessionDescription,
    },
}

/// Upward notifications consumed by the host.
pub trait PlayerEvents: Send {
    /// Fired once per confirmed rendering start with the surface's native
    /// dimensions.
    fn on_geometry(&mut self, geometry: VideoGeometry);

    /// Fired at most once per session with the negotiated description.
    fn on_session_description(&mut self, description: SessionDescription);

    /// Fired when the derived playback phase changes.
    fn on_phase(&mut self, phase: PlaybackPhase) {
        let _ = phase;
    }
}

/// Point-in-time view of the player for controls and the diagnostics table.
#[derive(Debug, Clone)]
pub struct PlayerStatus {
    pub phase: PlaybackPhase,
    pub desired_play: bool,
    pub observed: ObservedState,
    pub geometry: Option<VideoGeometry>,
    pub target: Option<ConnectionTarget>,
    pub frozen_probes: u32,
    pub health: HealthSnapshot,
    pub show_diagnostics: bool,
}

impl std::fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.phase)?;
        if let Some(geometry) = &self.geometry {
            write!(f, " {}x{}", geometry.width, geometry.height)?;
        }
        match &self.target {
            Some(target) => write!(f, ", target {target}")?,
            None => write!(f, ", no target")?,
        }
        write!(f, ", {} frozen probes, {}", self.frozen_probes, self.health)
    }
}

/// Reconciles desired playback state against the observed surface state and
/// owns the transport pipeline lifecycle.
///
/// Must live on a tokio runtime: readiness watchers for new pipelines are
/// spawned as tasks. [`crate::workers::player::PlayerWorker`] provides the
/// event loop that normally drives this type.
pub struct PlaybackSessionManager {
    surface: Box<dyn MediaSurface>,
    factory: Box<dyn TransportFactory>,
    events: Box<dyn PlayerEvents>,
    prefs: Box<dyn PreferenceStore>,
    signals: mpsc::UnboundedSender<SessionSignal>,
    health: Arc<PlaybackHealth>,

    target: Option<ConnectionTarget>,
    desired_play: bool,
    observed: ObservedState,
    session: Option<Session>,
    stall: StallDetector,
    next_generation: u64,

    /// A render-start request is outstanding or was already answered.
    /// Keeps reconciliation idempotent between surface events.
    render_requested: bool,

    /// Geometry was reported for the current rendering run.
    geometry_sent: bool,
    geometry: Option<VideoGeometry>,
    last_phase: PlaybackPhase,
}

impl PlaybackSessionManager {
    pub fn new(
        surface: Box<dyn MediaSurface>,
        factory: Box<dyn TransportFactory>,
        events: Box<dyn PlayerEvents>,
        settings: PlayerSettings,
        signals: mpsc::UnboundedSender<SessionSignal>,
    ) -> Self {
        Self {
            surface,
            factory,
            events,
            prefs: Box::new(MemoryPrefs::new()),
            signals,
            health: Arc::new(PlaybackHealth::new()),
            target: None,
            desired_play: false,
            observed: ObservedState::default(),
            session: None,
            stall: StallDetector::new(settings.freeze_threshold),
            next_generation: 1,
            render_requested: false,
            geometry_sent: false,
            geometry: None,
            last_phase: PlaybackPhase::Idle,
        }
    }

    /// Replace the default in-memory preference store.
    pub fn with_preferences(mut self, prefs: Box<dyn PreferenceStore>) -> Self {
        self.prefs = prefs;
        self
    }

    pub fn health(&self) -> Arc<PlaybackHealth> {
        Arc::clone(&self.health)
    }

    /// Record the user's play intent and reconcile.
    ///
    /// A renewed `true` also retries a render start the surface previously
    /// refused, and re-establishes the session if playback was stopped while
    /// the target was kept.
    pub async fn set_desired_state(&mut self, play: bool) {
        if self.desired_play != play {
            info!(
                "desired playback state: {}",
                if play { "play" } else { "pause" }
            );
        }
        self.desired_play = play;
        self.render_requested = false;

        if play && self.session.is_none() && self.target.is_some() {
            self.establish_session();
        }
        self.try_initiate_fetch().await;
        self.reconcile();
    }

    /// Point the player at a different camera, or at nothing. A target with
    /// a missing endpoint counts as nothing.
    ///
    /// Compared by value; an unchanged target is a no-op. On change the live
    /// session is fully torn down before any replacement is constructed, so
    /// two pipelines never touch the surface at once. Construction does not
    /// start playback.
    pub fn set_connection_target(&mut self, target: Option<ConnectionTarget>) {
        let target = target.filter(|t| !t.is_empty());
        if self.target == target {
            return;
        }
        match &target {
            Some(t) => info!("connection target changed to {t}"),
            None => info!("connection target cleared"),
        }

        self.teardown_session();
        self.target = target;
        if self.target.is_some() {
            self.establish_session();
        }
        self.reconcile();
    }

    /// Fold a surface event into the observed state and reconcile.
    pub fn on_surface_event(&mut self, event: SurfaceEvent) {
        debug!("surface event: {event:?}");
        self.observed.apply(event);

        if self.observed.is_rendering {
            // Rendering confirmed, the request latch has done its job.
            self.render_requested = false;
        } else {
            self.geometry_sent = false;
        }
        if !self.observed.can_render {
            self.render_requested = false;
        }

        self.reconcile();
    }

    /// Readiness signal from a pipeline. Stale generations are dropped.
    pub async fn on_pipeline_ready(&mut self, generation: u64) {
        match self.session.as_mut() {
            Some(session) if session.generation == generation => session.ready = true,
            _ => {
                debug!("ignoring readiness signal for superseded session #{generation}");
                return;
            }
        }
        self.try_initiate_fetch().await;
    }

    /// Negotiated description from a pipeline. Forwarded upward at most once
    /// per session; stale generations are dropped.
    pub fn on_session_description(&mut self, generation: u64, description: SessionDescription) {
        match self.session.as_mut() {
            Some(session) if session.generation == generation && !session.described => {
                session.described = true;
                debug!("session #{generation}: forwarding negotiated description");
                self.events.on_session_description(description);
            }
            _ => debug!("ignoring description for superseded session #{generation}"),
        }
    }

    /// One liveness probe. No-op unless a session exists.
    pub fn probe(&mut self) {
        if self.session.is_none() {
            return;
        }
        let clock = self.surface.clock_value();
        if self.stall.sample(clock, self.observed.is_rendering) {
            self.recover();
        }
    }

    /// Stop playback and release the camera connection. The target is kept,
    /// a later play re-establishes the session.
    pub fn stop(&mut self) {
        info!("stopping playback");
        self.desired_play = false;
        if self.observed.is_rendering {
            self.surface.request_pause();
        }
        self.teardown_session();
    }

    /// Tear down and rebuild the session for the current target.
    pub fn refresh(&mut self) {
        info!("refreshing playback session");
        self.teardown_session();
        if self.target.is_some() {
            self.establish_session();
        }
        self.reconcile();
    }

    pub fn show_diagnostics(&self) -> bool {
        self.prefs.get(PREF_SHOW_DIAGNOSTICS).as_deref() == Some("true")
    }

    pub fn set_show_diagnostics(&mut self, show: bool) {
        self.prefs
            .set(PREF_SHOW_DIAGNOSTICS, if show { "true" } else { "false" });
    }

    pub fn status(&self) -> PlayerStatus {
        PlayerStatus {
            phase: PlaybackPhase::derive(self.desired_play, self.observed),
            desired_play: self.desired_play,
            observed: self.observed,
            geometry: self.geometry,
            target: self.target.clone(),
            frozen_probes: self.stall.frozen_probes(),
            health: self.health.snapshot(),
            show_diagnostics: self.show_diagnostics(),
        }
    }

    /// Map intent and observation to the next surface action.
    fn reconcile(&mut self) {
        if self.desired_play && self.observed.can_render && !self.observed.is_rendering {
            if !self.render_requested {
                self.render_requested = true;
                if let Err(e) = self.surface.request_play() {
                    self.health.record_render_rejection();
                    warn!("surface refused to start rendering: {e:#}");
                }
            }
        } else if !self.desired_play && self.observed.is_rendering {
            self.surface.request_pause();
            self.observed.is_rendering = false;
            self.render_requested = false;
            self.geometry_sent = false;
        } else if self.desired_play && self.observed.is_rendering && !self.geometry_sent {
            self.geometry_sent = true;
            let geometry = VideoGeometry {
                width: self.surface.native_width(),
                height: self.surface.native_height(),
                surface: self.surface.handle(),
            };
            self.geometry = Some(geometry);
            info!(
                "rendering confirmed at {}x{}",
                geometry.width, geometry.height
            );
            self.events.on_geometry(geometry);
        }

        self.publish_phase();
    }

    /// Issue the one play request a session gets, once its pipeline is ready
    /// and play intent is present. Wires the description callback at the
    /// same moment so it can only ever fire for a fetching pipeline.
    async fn try_initiate_fetch(&mut self) {
        if !self.desired_play {
            return;
        }
        let signals = self.signals.clone();
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if !session.ready || session.ready_and_fetching {
            return;
        }
        session.ready_and_fetching = true;

        let generation = session.generation;
        session
            .pipeline
            .set_description_handler(Box::new(move |description| {
                let _ = signals.send(SessionSignal::Described {
                    generation,
                    description,
                });
            }));

        info!("session #{generation}: transport ready, requesting stream playback");
        if let Err(e) = session.pipeline.request_play().await {
            warn!("session #{generation}: transport play request failed: {e:#}");
        }
    }

    /// Construct a pipeline for the current target and install it as the
    /// live session. Does not request playback.
    fn establish_session(&mut self) {
        let Some(target) = self.target.clone() else {
            return;
        };

        match self.factory.create(&target, self.surface.as_mut()) {
            Ok(mut pipeline) => {
                let generation = self.next_generation;
                self.next_generation += 1;

                match pipeline.take_readiness() {
                    Some(readiness) => {
                        let signals = self.signals.clone();
                        tokio::spawn(async move {
                            // A dropped sender means the pipeline went away
                            // before becoming ready.
                            if readiness.await.is_ok() {
                                let _ = signals.send(SessionSignal::Ready { generation });
                            }
                        });
                    }
                    None => warn!("session #{generation}: transport exposed no readiness signal"),
                }

                self.session = Some(Session::new(generation, pipeline));
                self.stall.reset();
                self.render_requested = false;
                self.geometry_sent = false;
                self.health.record_session_opened();
                info!("session #{generation}: transport created for {target}");
            }
            Err(e) => error!("transport construction failed for {target}: {e:#}"),
        }
    }

    /// Close the live session and detach everything from the surface.
    /// Safe to call repeatedly and with no session installed.
    fn teardown_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.pipeline.close();
            info!("session #{}: closed", session.generation);
        }
        self.surface.clear_source();
        self.observed.clear();
        self.render_requested = false;
        self.geometry_sent = false;
        self.geometry = None;
        self.stall.reset();
        self.publish_phase();
    }

    /// Replace a frozen transport. The surface is reused as-is: observed
    /// flags and source stay untouched so playback resumes seamlessly once
    /// the replacement feeds data.
    fn recover(&mut self) {
        self.health.record_recovery();
        warn!("stream frozen, replacing transport");
        if let Some(mut session) = self.session.take() {
            session.pipeline.close();
        }
        self.establish_session();
    }

    fn publish_phase(&mut self) {
        let phase = PlaybackPhase::derive(self.desired_play, self.observed);
        if phase != self.last_phase {
            self.last_phase = phase;
            self.events.on_phase(phase);
        }
    }
}

impl WorkerClose for PlaybackSessionManager {
    fn close(&mut self) {
        self.teardown_session();
    }
}
