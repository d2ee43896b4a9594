//! The control loop: one owner for all mutable robot state.
//!
//! Each [`Controller::tick`] runs, in order:
//!
//! ```text
//! schedule ─▶ drive / range check ─▶ (avoidance) ─▶ sensor poll ─▶ report
//! ```
//!
//! Avoidance blocks the tick until the maneuver completes. The sensor poll and
//! the routine report run on two independent timers.
//!
//! # Invariants
//!
//! - All mutable state lives in [`ControlState`]; there are no globals.
//! - The returning-leg reorientation turn fires once, on phase entry.
//! - Errors from collaborators never stop the loop.

use log::info;
use rand::Rng;

use crate::avoidance::{self, AvoidanceConfig, AvoidanceDecision};
use crate::mission::{MissionPhase, MissionTimeline, PhaseTracker};
use crate::platform::{ActuatorSink, Clock, SensorSource, StatusReporter, Turn};
use crate::report::{PublishOutcome, ReportGate};
use crate::sensors::{PollOutcome, SensorPoller};
use crate::snapshot::{RobotSnapshot, RobotStatus};

/// Complete controller configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlConfig {
    /// Mission phase durations.
    pub timeline: MissionTimeline,
    /// Obstacle avoidance tunables.
    pub avoidance: AvoidanceConfig,
    /// Minimum spacing between sensor reads. Default 1000 ms.
    pub sensor_interval_ms: u64,
    /// Minimum spacing between routine status reports. Default 200 ms.
    pub report_interval_ms: u64,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            timeline: MissionTimeline::default(),
            avoidance: AvoidanceConfig::default(),
            sensor_interval_ms: 1_000,
            report_interval_ms: 200,
        }
    }
}

/// Mutable state carried from tick to tick.
#[derive(Clone, Debug)]
pub struct ControlState {
    snapshot: RobotSnapshot,
    mission_start_ms: u64,
    cycles_completed: u32,
    tracker: PhaseTracker,
    poller: SensorPoller,
    gate: ReportGate,
}

impl ControlState {
    /// Fresh state with the mission starting at `now_ms`.
    pub fn new(config: &ControlConfig, now_ms: u64) -> Self {
        Self {
            snapshot: RobotSnapshot::new(),
            mission_start_ms: now_ms,
            cycles_completed: 0,
            tracker: PhaseTracker::new(),
            poller: SensorPoller::new(config.sensor_interval_ms),
            gate: ReportGate::new(config.report_interval_ms),
        }
    }

    /// Latest snapshot.
    pub fn snapshot(&self) -> &RobotSnapshot {
        &self.snapshot
    }

    /// Clock time the current mission cycle started.
    pub fn mission_start_ms(&self) -> u64 {
        self.mission_start_ms
    }

    /// Number of completed mission cycles.
    pub fn cycles_completed(&self) -> u32 {
        self.cycles_completed
    }

    /// Whether the spectral sensor is currently up.
    pub fn spectral_ready(&self) -> bool {
        self.poller.spectral_ready()
    }

    /// Start a new mission cycle at `now_ms`.
    pub fn restart_mission(&mut self, now_ms: u64) {
        self.cycles_completed = self.cycles_completed.saturating_add(1);
        self.mission_start_ms = now_ms;
        self.tracker.reset();
        info!("cycle {} done, restarting", self.cycles_completed);
    }

    fn publish<P: StatusReporter>(
        &mut self,
        now_ms: u64,
        force: bool,
        reporter: &mut P,
    ) -> PublishOutcome {
        self.gate.publish(now_ms, &self.snapshot, force, reporter)
    }
}

/// What one tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickReport {
    /// Phase the tick ran in.
    pub phase: MissionPhase,
    /// `true` if this tick entered `phase`.
    pub entered_phase: bool,
    /// Avoidance decision, if an obstacle was met.
    pub avoidance: Option<AvoidanceDecision>,
    /// Sensor poll outcome.
    pub poll: PollOutcome,
    /// Routine report outcome.
    pub publish: PublishOutcome,
}

/// Result of [`Controller::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// A normal tick.
    Ran(TickReport),
    /// The timeline was exhausted and the mission start was reset.
    MissionRestarted,
}

/// Drives the robot from its sensors, actuators, clock and reporter.
pub struct Controller<S, A, C, P, R> {
    config: ControlConfig,
    state: ControlState,
    sensors: S,
    actuator: A,
    clock: C,
    reporter: P,
    rng: R,
}

impl<S, A, C, P, R> Controller<S, A, C, P, R>
where
    S: SensorSource,
    A: ActuatorSink,
    C: Clock,
    P: StatusReporter,
    R: Rng,
{
    /// Build a controller and attempt spectral sensor bring-up.
    ///
    /// The mission clock starts now. A failed bring-up is retried on every
    /// sensor window.
    pub fn new(
        config: ControlConfig,
        mut sensors: S,
        actuator: A,
        clock: C,
        reporter: P,
        rng: R,
    ) -> Self {
        let mut state = ControlState::new(&config, clock.now_ms());
        state.poller.bring_up(&mut sensors);
        Self {
            config,
            state,
            sensors,
            actuator,
            clock,
            reporter,
            rng,
        }
    }

    /// Run one control tick.
    pub fn tick(&mut self) -> TickOutcome {
        let now = self.clock.now_ms();
        let elapsed = self.clock.elapsed_since(self.state.mission_start_ms);
        let phase = self.config.timeline.current_phase(elapsed);

        if phase == MissionPhase::CycleComplete {
            self.state.restart_mission(now);
            return TickOutcome::MissionRestarted;
        }

        let entered = self.state.tracker.observe(phase);
        if let Some(p) = entered {
            info!("entering {:?} phase at {} ms", p, elapsed);
        }
        self.state.snapshot.phase = phase;
        self.state.snapshot.status = RobotStatus::for_phase(phase);
        self.state.snapshot.timestamp_ms = now;

        let mut avoided = None;
        if phase.is_underway() {
            if entered == Some(MissionPhase::Returning) {
                let turn_ms = self.config.timeline.return_turn_ms;
                self.actuator.turn_for(Turn::Left, turn_ms, &mut self.clock);
            }
            self.actuator.forward();
            let distance = avoidance::effective_distance(self.sensors.read_distance());
            self.state.snapshot.distance_cm = distance;
            if avoidance::is_obstacle(distance, &self.config.avoidance) {
                avoided = Some(self.avoid());
            }
        } else {
            self.actuator.stop();
        }

        let now = self.clock.now_ms();
        let poll = self.state.poller.poll(
            now,
            &mut self.sensors,
            &mut self.rng,
            &mut self.state.snapshot,
        );
        let publish = self.publish(false);

        TickOutcome::Ran(TickReport {
            phase,
            entered_phase: entered.is_some(),
            avoidance: avoided,
            poll,
            publish,
        })
    }

    /// Tick forever.
    pub fn run(&mut self) -> ! {
        loop {
            self.tick();
        }
    }

    /// Halt, scan both sides, and commit to a way out. Blocks until done.
    fn avoid(&mut self) -> AvoidanceDecision {
        self.actuator.stop();
        self.state.snapshot.status = RobotStatus::ObstacleScanning;
        self.publish(true);

        let tuning = self.config.avoidance.clone();
        let scan = avoidance::scan(
            &tuning,
            &mut self.sensors,
            &mut self.actuator,
            &mut self.clock,
        );
        let decision = avoidance::decide(&scan, &tuning);
        let cm = self.state.snapshot.distance_cm;
        info!("obstacle at {}cm {:?} -> {:?}", cm, scan, decision);

        self.state.snapshot.status = decision.status();
        self.publish(true);
        avoidance::commit(decision, &tuning, &mut self.actuator, &mut self.clock);
        decision
    }

    fn publish(&mut self, force: bool) -> PublishOutcome {
        let now = self.clock.now_ms();
        self.state.publish(now, force, &mut self.reporter)
    }

    /// Controller configuration.
    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    /// Control state.
    pub fn state(&self) -> &ControlState {
        &self.state
    }

    /// Latest snapshot.
    pub fn snapshot(&self) -> &RobotSnapshot {
        &self.state.snapshot
    }

    /// Sensor source.
    pub fn sensors(&self) -> &S {
        &self.sensors
    }

    /// Mutable sensor source.
    pub fn sensors_mut(&mut self) -> &mut S {
        &mut self.sensors
    }

    /// Actuator sink.
    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    /// Mutable actuator sink.
    pub fn actuator_mut(&mut self) -> &mut A {
        &mut self.actuator
    }

    /// Clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Mutable clock.
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Status reporter.
    pub fn reporter(&self) -> &P {
        &self.reporter
    }

    /// Mutable status reporter.
    pub fn reporter_mut(&mut self) -> &mut P {
        &mut self.reporter
    }
}
