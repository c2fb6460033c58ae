//! Polling loop and side effects (I/O layer).
//!
//! Pure frame handling lives in [`crate::engine`] and [`crate::event`].
use std::process::{Child, Command};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, error, info, trace, warn};

use crate::actuator::{CursorActuator, LogActuator, VirtualPointer};
use crate::config::{AppConfig, HandmarkerError, parse_config_file};
use crate::engine::GestureEngine;
use crate::event::{Reaction, reactions, resolve_action};
use crate::source::{HttpLandmarkSource, LandmarkSource};
use crate::swipe::SwipeDirection;

/// Swipe action processes that have not been waited on yet.
#[derive(Debug, Default)]
pub struct ActionRunner {
    children: Vec<(String, Child)>,
}

impl ActionRunner {
    /// Run `action` through `sh -c` without blocking the loop.
    pub fn spawn(&mut self, action: &str) {
        match Command::new("sh").arg("-c").arg(action).spawn() {
            Ok(child) => {
                debug!("Spawned action (pid {}): {action}", child.id());
                self.children.push((action.to_string(), child));
            }
            Err(e) => error!("Failed to execute action '{action}': {e}"),
        }
    }

    /// Collect every child that has exited; running ones are kept.
    pub fn reap(&mut self) {
        self.children.retain_mut(|(action, child)| match child.try_wait() {
            Ok(Some(status)) if status.success() => {
                trace!("Action finished: {action}");
                false
            }
            Ok(Some(status)) => {
                warn!("Action '{action}' exited with {status}");
                false
            }
            Ok(None) => true,
            Err(e) => {
                error!("Failed to wait for action '{action}': {e}");
                false
            }
        });
    }

    pub fn pending(&self) -> usize {
        self.children.len()
    }
}

/// Owns the engine and drives it from the landmark service.
pub struct GestureManager {
    config: AppConfig,
    running: Arc<AtomicBool>,
    actions: ActionRunner,
}

impl GestureManager {
    pub fn new(config_path: impl AsRef<std::path::Path>) -> Result<Self, HandmarkerError> {
        Ok(Self::with_config(parse_config_file(config_path.as_ref())?))
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            running: Arc::new(AtomicBool::new(false)),
            actions: ActionRunner::default(),
        }
    }

    /// Poll the landmark service until the running flag is cleared.
    ///
    /// With `dry_run` (or `[pointer] enabled = false`) cursor deltas are
    /// logged instead of moving the OS pointer.
    pub fn start(&mut self, dry_run: bool) -> Result<(), HandmarkerError> {
        let mut actuator: Box<dyn CursorActuator> = if dry_run || !self.config.pointer.enabled {
            info!("Pointer actuation disabled, logging cursor deltas only");
            Box::new(LogActuator)
        } else {
            Box::new(VirtualPointer::new(&self.config.pointer)?)
        };

        let mut source = HttpLandmarkSource::new(&self.config.source);
        info!("Polling landmarks from {}", source.endpoint());

        self.running.store(true, Ordering::Relaxed);
        self.run_loop(&mut source, actuator.as_mut());
        info!("Gesture manager stopped");
        Ok(())
    }

    /// Serial fetch → process → actuate loop at the configured poll period.
    pub fn run_loop(&mut self, source: &mut dyn LandmarkSource, actuator: &mut dyn CursorActuator) {
        let period = Duration::from_millis(self.config.source.poll_interval_ms);
        let mut engine = GestureEngine::new(&self.config.mapping, &self.config.thresholds);

        while self.running.load(Ordering::Relaxed) {
            let tick = Instant::now();
            self.poll_once(&mut engine, source, actuator);
            if let Some(rest) = period.checked_sub(tick.elapsed()) {
                thread::sleep(rest);
            }
        }

        self.actions.reap();
        if self.actions.pending() > 0 {
            info!("{} action(s) still running at shutdown", self.actions.pending());
        }
    }

    /// One tick. Fetch failures mean "no frame this tick". Finished swipe
    /// actions are reaped first.
    pub fn poll_once(
        &mut self,
        engine: &mut GestureEngine,
        source: &mut dyn LandmarkSource,
        actuator: &mut dyn CursorActuator,
    ) {
        self.actions.reap();

        let landmarks = match source.fetch_frame() {
            Ok(landmarks) => landmarks,
            Err(HandmarkerError::Payload(e)) => {
                warn!("Ignoring malformed landmark payload: {e}");
                return;
            }
            Err(e) => {
                debug!("{e}");
                return;
            }
        };

        let Some(outcome) = engine.process_frame(&landmarks) else {
            return;
        };
        trace!("Overlay points: {:?}", engine.state().points);

        for reaction in reactions(&outcome) {
            match reaction {
                Reaction::Swipe(direction) => self.execute_gesture(direction),
                Reaction::MoveCursor(delta) => {
                    if let Err(e) = actuator.move_by(delta) {
                        error!("Failed to move pointer: {e}");
                    }
                }
            }
        }
    }

    /// Spawn the shell command configured for a swipe.
    fn execute_gesture(&mut self, direction: SwipeDirection) {
        info!("{direction}");
        if let Some(action) = resolve_action(direction, &self.config.gestures) {
            self.actions.spawn(action);
        }
    }

    /// Stop the polling loop after the current tick.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    /// Get a reference to the running flag for signal handling.
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Number of spawned actions not yet reaped.
    pub fn pending_actions(&self) -> usize {
        self.actions.pending()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get the log level from the parsed configuration.
    pub fn config_log_level(&self) -> &str {
        &self.config.log_level
    }

    /// Get the optional log file path from the parsed configuration.
    pub fn config_log_file(&self) -> Option<&str> {
        self.config.log_file.as_deref()
    }
}
