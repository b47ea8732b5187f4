//! Player event loop
//!
//! Single task owning the [`PlaybackSessionManager`]. All state transitions
//! run to completion inside the loop before the next event is picked up, so
//! reconciliation never observes a torn intermediate state. The liveness
//! probe interval lives and dies with the loop.

use crate::config::{ConnectionTarget, PlayerSettings};
use crate::pipeline::manager::{PlaybackSessionManager, PlayerEvents, PlayerStatus};
use crate::pipeline::transport::TransportFactory;
use crate::pipeline::SessionSignal;
use crate::surface::{MediaSurface, SurfaceEvent};
use crate::utils::prefs::PreferenceStore;
use crate::workers::WorkerClose;
use log::info;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

/// Commands the host and its controls send into the player loop.
#[derive(Debug)]
pub enum PlayerCommand {
    Play,
    Pause,
    Stop,
    Refresh,
    SetTarget(Option<ConnectionTarget>),
    Surface(SurfaceEvent),
    SetShowDiagnostics(bool),
    Status(oneshot::Sender<PlayerStatus>),
    Shutdown,
}

/// Cloneable control handle over a running player loop.
///
/// All methods are fire-and-forget; sends to a stopped loop are silently
/// dropped.
#[derive(Clone)]
pub struct PlayerHandle {
    commands: mpsc::UnboundedSender<PlayerCommand>,
}

impl PlayerHandle {
    pub fn play(&self) {
        let _ = self.commands.send(PlayerCommand::Play);
    }

    pub fn pause(&self) {
        let _ = self.commands.send(PlayerCommand::Pause);
    }

    pub fn stop(&self) {
        let _ = self.commands.send(PlayerCommand::Stop);
    }

    pub fn refresh(&self) {
        let _ = self.commands.send(PlayerCommand::Refresh);
    }

    pub fn set_target(&self, target: Option<ConnectionTarget>) {
        let _ = self.commands.send(PlayerCommand::SetTarget(target));
    }

    pub fn surface_event(&self, event: SurfaceEvent) {
        let _ = self.commands.send(PlayerCommand::Surface(event));
    }

    pub fn set_show_diagnostics(&self, show: bool) {
        let _ = self.commands.send(PlayerCommand::SetShowDiagnostics(show));
    }

    /// Snapshot of the player state, `None` once the loop has stopped.
    pub async fn status(&self) -> Option<PlayerStatus> {
        let (tx, rx) = oneshot::channel();
        if self.commands.send(PlayerCommand::Status(tx)).is_err() {
            return None;
        }
        rx.await.ok()
    }

    /// Stop the loop after the commands queued so far have been processed.
    pub fn shutdown(&self) {
        let _ = self.commands.send(PlayerCommand::Shutdown);
    }
}

/// Event loop driving one playback session manager.
pub struct PlayerWorker {
    manager: PlaybackSessionManager,
    commands: mpsc::UnboundedReceiver<PlayerCommand>,
    signals: mpsc::UnboundedReceiver<SessionSignal>,
    cancel: CancellationToken,
    probe_interval: Duration,
}

impl PlayerWorker {
    pub fn new(
        surface: Box<dyn MediaSurface>,
        factory: Box<dyn TransportFactory>,
        events: Box<dyn PlayerEvents>,
        settings: PlayerSettings,
    ) -> (Self, PlayerHandle) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        let probe_interval = settings.probe_interval;
        let manager =
            PlaybackSessionManager::new(surface, factory, events, settings, signal_tx);

        (
            Self {
                manager,
                commands: command_rx,
                signals: signal_rx,
                cancel: CancellationToken::new(),
                probe_interval,
            },
            PlayerHandle {
                commands: command_tx,
            },
        )
    }

    /// Replace the default in-memory preference store.
    pub fn with_preferences(mut self, prefs: Box<dyn PreferenceStore>) -> Self {
        self.manager = self.manager.with_preferences(prefs);
        self
    }

    /// Token that stops the loop when cancelled, for hosts that manage a
    /// shutdown tree.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Spawn the loop on the current runtime.
    pub fn launch(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Run the loop until shutdown, cancellation, or the last handle drops.
    /// The session is torn down before the task ends.
    pub async fn run(mut self) {
        info!("player worker started");
        let mut probe = tokio::time::interval(self.probe_interval);

        loop {
            tokio::select! {
                biased;

                _ = self.cancel.cancelled() => break,

                command = self.commands.recv() => match command {
                    Some(PlayerCommand::Shutdown) | None => break,
                    Some(command) => self.handle_command(command).await,
                },

                signal = self.signals.recv() => match signal {
                    Some(signal) => self.handle_signal(signal).await,
                    None => break,
                },

                _ = probe.tick() => self.manager.probe(),
            }
        }

        self.manager.close();
        info!("player worker stopped");
    }

    async fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::Play => self.manager.set_desired_state(true).await,
            PlayerCommand::Pause => self.manager.set_desired_state(false).await,
            PlayerCommand::Stop => self.manager.stop(),
            PlayerCommand::Refresh => self.manager.refresh(),
            PlayerCommand::SetTarget(target) => self.manager.set_connection_target(target),
            PlayerCommand::Surface(event) => self.manager.on_surface_event(event),
            PlayerCommand::SetShowDiagnostics(show) => self.manager.set_show_diagnostics(show),
            PlayerCommand::Status(reply) => {
                let _ = reply.send(self.manager.status());
            }
            // Handled in the loop so the break happens there.
            PlayerCommand::Shutdown => {}
        }
    }

    async fn handle_signal(&mut self, signal: SessionSignal) {
        match signal {
            SessionSignal::Ready { generation } => {
                self.manager.on_pipeline_ready(generation).await
            }
            SessionSignal::Described {
                generation,
                description,
            } => self.manager.on_session_description(generation, description),
        }
    }
}
