//! Drives the simulation from a clock.
//!
//! The driver keeps two deadlines, one per clock. [`Driver::pump`] runs every
//! step and rotation whose deadline has passed, oldest first, so a late pump
//! catches up instead of skipping. When both clocks are due at the same
//! instant the rotation runs first and the step sees the new picks.
//!
//! [`Driver::start`] spawns a tokio task that pumps once per step interval and
//! [`Driver::stop`] aborts it. Every pump that changes the board is
//! broadcast as a [`BoardUpdate`].

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::events::BoardEvent;
use crate::simulation::Simulation;

/// Most steps, and separately most rotations, a single pump will run before
/// giving up on catching up.
pub const MAX_CATCH_UP_STEPS: usize = 1_000;

const UPDATE_CHANNEL: usize = 64;

/// Clock intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Fast clock, one evidence step per tick
    pub step_interval: Duration,
    /// Slow clock, one rotation per tick
    pub rotation_interval: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            step_interval: Duration::from_millis(160),
            rotation_interval: Duration::from_secs(10),
        }
    }
}

/// What one pump did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PumpReport {
    pub steps: usize,
    pub rotations: usize,
}

/// Board change pushed to subscribers.
#[derive(Debug, Clone)]
pub struct BoardUpdate {
    pub step: u64,
    pub rotation: u64,
    /// Events recorded during the pump
    pub events: Vec<BoardEvent>,
}

#[derive(Debug, Clone, Copy)]
struct Deadlines {
    next_step_at: Duration,
    next_rotation_at: Duration,
}

/// Everything the pumping task needs.
#[derive(Clone)]
struct Pump {
    simulation: Arc<RwLock<Simulation>>,
    clock: Arc<dyn Clock>,
    deadlines: Arc<Mutex<Deadlines>>,
    config: DriverConfig,
    updates: broadcast::Sender<BoardUpdate>,
}

impl Pump {
    fn resync(&self) {
        let now = self.clock.now();
        let mut deadlines = self.deadlines.lock().unwrap_or_else(|e| e.into_inner());
        *deadlines = Deadlines {
            next_step_at: now + self.config.step_interval,
            next_rotation_at: now + self.config.rotation_interval,
        };
    }

    async fn pump(&self) -> PumpReport {
        let now = self.clock.now();
        let mut sim = self.simulation.write().await;
        let first_seq = sim.next_seq();
        let mut report = PumpReport::default();

        {
            let mut deadlines = self.deadlines.lock().unwrap_or_else(|e| e.into_inner());
            loop {
                let step_due = deadlines.next_step_at <= now;
                let rotation_due = deadlines.next_rotation_at <= now;

                if rotation_due && (!step_due || deadlines.next_rotation_at <= deadlines.next_step_at)
                {
                    if report.rotations == MAX_CATCH_UP_STEPS {
                        warn!(
                            "Driver fell behind by more than {} rotations, resyncing",
                            MAX_CATCH_UP_STEPS
                        );
                        deadlines.next_step_at = now + self.config.step_interval;
                        deadlines.next_rotation_at = now + self.config.rotation_interval;
                        break;
                    }
                    sim.rotate();
                    deadlines.next_rotation_at += self.config.rotation_interval;
                    report.rotations += 1;
                } else if step_due {
                    if report.steps == MAX_CATCH_UP_STEPS {
                        warn!(
                            "Driver fell behind by more than {} steps, resyncing",
                            MAX_CATCH_UP_STEPS
                        );
                        deadlines.next_step_at = now + self.config.step_interval;
                        deadlines.next_rotation_at = now + self.config.rotation_interval;
                        break;
                    }
                    sim.step();
                    deadlines.next_step_at += self.config.step_interval;
                    report.steps += 1;
                } else {
                    break;
                }
            }
        }

        if report.steps > 0 || report.rotations > 0 {
            if report.steps > 1 {
                debug!("Caught up {} steps", report.steps);
            }
            // No subscribers is fine.
            let _ = self.updates.send(BoardUpdate {
                step: sim.step_count(),
                rotation: sim.rotation_count(),
                events: sim.events_since(first_seq),
            });
        }
        report
    }
}

/// Owns the simulation and the task that advances it.
pub struct Driver {
    pump: Pump,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Driver {
    /// Create a stopped driver.
    pub fn new(simulation: Simulation, clock: Arc<dyn Clock>, config: DriverConfig) -> Self {
        let config = DriverConfig {
            step_interval: config.step_interval.max(Duration::from_millis(1)),
            rotation_interval: config.rotation_interval.max(Duration::from_millis(1)),
        };
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL);
        let pump = Pump {
            simulation: Arc::new(RwLock::new(simulation)),
            clock,
            deadlines: Arc::new(Mutex::new(Deadlines {
                next_step_at: Duration::ZERO,
                next_rotation_at: Duration::ZERO,
            })),
            config,
            updates,
        };
        pump.resync();
        Self {
            pump,
            task: Mutex::new(None),
        }
    }

    pub fn config(&self) -> DriverConfig {
        self.pump.config
    }

    /// Shared handle to the simulation.
    pub fn simulation(&self) -> Arc<RwLock<Simulation>> {
        self.pump.simulation.clone()
    }

    /// Receive a [`BoardUpdate`] after every pump that changed the board.
    pub fn subscribe(&self) -> broadcast::Receiver<BoardUpdate> {
        self.pump.updates.subscribe()
    }

    /// Run everything that became due since the last pump.
    pub async fn pump(&self) -> PumpReport {
        self.pump.pump().await
    }

    /// Spawn the pumping task. Returns false if it was already running.
    pub fn start(&self) -> bool {
        let mut task = self.task.lock().unwrap_or_else(|e| e.into_inner());
        if task.as_ref().is_some_and(|t| !t.is_finished()) {
            return false;
        }

        // Time spent stopped is not replayed.
        self.pump.resync();
        let pump = self.pump.clone();
        let period = pump.config.step_interval;
        *task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                pump.pump().await;
            }
        }));

        info!(
            "Driver started (step {:?}, rotation {:?})",
            self.pump.config.step_interval, self.pump.config.rotation_interval
        );
        true
    }

    /// Abort the pumping task. Returns false if it was not running.
    pub fn stop(&self) -> bool {
        let mut task = self.task.lock().unwrap_or_else(|e| e.into_inner());
        match task.take() {
            Some(handle) => {
                handle.abort();
                info!("Driver stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        let task = self.task.lock().unwrap_or_else(|e| e.into_inner());
        task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for Driver {
    fn drop(&mut self) {
        let task = self.task.get_mut().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = task.take() {
            handle.abort();
        }
    }
}
