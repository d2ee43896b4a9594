//! Host-side implementations of the platform traits.
//!
//! Always compiled so integration tests and host simulations can drive the
//! control loop deterministically. Recorders are fixed-capacity `heapless`
//! buffers; once full, further entries are dropped.

use heapless::{Deque, Vec};

use crate::error::{ReportError, SensorError};
use crate::platform::{ActuatorSink, Clock, SensorSource, StatusReporter, Turn};
use crate::snapshot::RobotSnapshot;
use crate::spectral::SpectralSample;

/// Capacity of [`MockActuator`]'s command log.
pub const COMMAND_LOG_CAPACITY: usize = 256;

/// Capacity of [`MockReporter`]'s publish log.
pub const PUBLISH_LOG_CAPACITY: usize = 64;

/// Capacity of [`MockSensors`]' scripted range queue.
pub const DISTANCE_QUEUE_CAPACITY: usize = 32;

// ─── Clock ───────────────────────────────────────────────────────────────────

/// Manually advanced clock. `delay_ms` advances time instead of sleeping.
#[derive(Clone, Debug, Default)]
pub struct MockClock {
    now_ms: u64,
}

impl MockClock {
    /// A clock starting at 0 ms.
    pub fn new() -> Self {
        Self::default()
    }

    /// A clock starting at `ms`.
    pub fn with_initial(ms: u64) -> Self {
        Self { now_ms: ms }
    }

    /// Set the current time.
    pub fn set(&mut self, ms: u64) {
        self.now_ms = ms;
    }

    /// Move time forward by `ms`.
    pub fn advance(&mut self, ms: u64) {
        self.now_ms = self.now_ms.saturating_add(ms);
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn delay_ms(&mut self, ms: u32) {
        self.advance(ms as u64);
    }
}

// ─── Sensors ─────────────────────────────────────────────────────────────────

/// Scripted sensor source.
#[derive(Clone, Debug)]
pub struct MockSensors {
    /// Result of the next `init_spectral` call.
    pub init_result: Result<(), SensorError>,
    /// Result of every `read_spectral` call.
    pub spectral: Result<SpectralSample, SensorError>,
    /// pH probe voltage.
    pub voltage: f32,
    /// Turbidity comparator output.
    pub turbidity_clean: bool,
    /// Range returned once the scripted queue is empty.
    pub default_distance: Result<u32, SensorError>,
    distances: Deque<Result<u32, SensorError>, DISTANCE_QUEUE_CAPACITY>,
    init_attempts: u32,
    spectral_reads: u32,
    distance_reads: u32,
}

impl MockSensors {
    /// Sensors that initialise fine, read clean water and see no obstacles.
    pub fn new() -> Self {
        Self {
            init_result: Ok(()),
            spectral: Ok(SpectralSample::new(20.0, 20.0, 10.0)),
            voltage: 0.0,
            turbidity_clean: true,
            default_distance: Err(SensorError::Timeout),
            distances: Deque::new(),
            init_attempts: 0,
            spectral_reads: 0,
            distance_reads: 0,
        }
    }

    /// Script the next range reading. Dropped if the queue is full.
    pub fn queue_distance(&mut self, reading: Result<u32, SensorError>) {
        let _ = self.distances.push_back(reading);
    }

    /// Number of `init_spectral` calls so far.
    pub fn init_attempts(&self) -> u32 {
        self.init_attempts
    }

    /// Number of `read_spectral` calls so far.
    pub fn spectral_reads(&self) -> u32 {
        self.spectral_reads
    }

    /// Number of `read_distance` calls so far.
    pub fn distance_reads(&self) -> u32 {
        self.distance_reads
    }
}

impl Default for MockSensors {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorSource for MockSensors {
    fn init_spectral(&mut self) -> Result<(), SensorError> {
        self.init_attempts += 1;
        self.init_result
    }

    fn read_spectral(&mut self) -> Result<SpectralSample, SensorError> {
        self.spectral_reads += 1;
        self.spectral
    }

    fn read_analog_voltage(&mut self) -> f32 {
        self.voltage
    }

    fn read_turbidity_clean(&mut self) -> bool {
        self.turbidity_clean
    }

    fn read_distance(&mut self) -> Result<u32, SensorError> {
        self.distance_reads += 1;
        self.distances.pop_front().unwrap_or(self.default_distance)
    }
}

// ─── Actuator ────────────────────────────────────────────────────────────────

/// A motor command as seen by [`MockActuator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotorCommand {
    /// `forward()`
    Forward,
    /// `stop()`
    Stop,
    /// `turn(direction)`
    Turn(Turn),
}

/// Records every motor command.
#[derive(Clone, Debug, Default)]
pub struct MockActuator {
    log: Vec<MotorCommand, COMMAND_LOG_CAPACITY>,
}

impl MockActuator {
    /// An empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands received so far, oldest first.
    pub fn commands(&self) -> &[MotorCommand] {
        &self.log
    }

    /// Most recent command.
    pub fn last(&self) -> Option<MotorCommand> {
        self.log.last().copied()
    }

    /// Number of `turn` commands in the given direction.
    pub fn turn_count(&self, direction: Turn) -> usize {
        self.log
            .iter()
            .filter(|c| **c == MotorCommand::Turn(direction))
            .count()
    }

    /// Forget recorded commands.
    pub fn clear(&mut self) {
        self.log.clear();
    }

    fn record(&mut self, command: MotorCommand) {
        let _ = self.log.push(command);
    }
}

impl ActuatorSink for MockActuator {
    fn forward(&mut self) {
        self.record(MotorCommand::Forward);
    }

    fn stop(&mut self) {
        self.record(MotorCommand::Stop);
    }

    fn turn(&mut self, direction: Turn) {
        self.record(MotorCommand::Turn(direction));
    }
}

// ─── Reporter ────────────────────────────────────────────────────────────────

/// Records published snapshots, optionally failing every send.
#[derive(Clone, Debug, Default)]
pub struct MockReporter {
    /// When set, every publish returns this error and records nothing.
    pub fail_with: Option<ReportError>,
    published: Vec<RobotSnapshot, PUBLISH_LOG_CAPACITY>,
    attempts: u32,
}

impl MockReporter {
    /// A reporter whose sends always succeed.
    pub fn new() -> Self {
        Self::default()
    }

    /// A reporter whose sends always fail with `error`.
    pub fn failing(error: ReportError) -> Self {
        Self {
            fail_with: Some(error),
            ..Self::default()
        }
    }

    /// Successfully published snapshots, oldest first.
    pub fn published(&self) -> &[RobotSnapshot] {
        &self.published
    }

    /// Publish calls so far, successful or not.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Forget recorded snapshots and attempts.
    pub fn clear(&mut self) {
        self.published.clear();
        self.attempts = 0;
    }
}

impl StatusReporter for MockReporter {
    fn publish(&mut self, snapshot: &RobotSnapshot) -> Result<(), ReportError> {
        self.attempts += 1;
        if let Some(e) = self.fail_with {
            return Err(e);
        }
        let _ = self.published.push(*snapshot);
        Ok(())
    }
}
