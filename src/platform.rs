//! Hardware-facing contracts consumed by the control loop.
//!
//! Drivers, motor bridges and network transport live outside this crate; they
//! plug in through these four traits. See [`crate::mock`] for host-side
//! implementations used in tests.

use crate::error::{ReportError, SensorError};
use crate::snapshot::RobotSnapshot;
use crate::spectral::SpectralSample;

/// Monotonic millisecond clock with a blocking wait.
///
/// `delay_ms` is the only way a maneuver consumes time; nothing else in the
/// control loop runs while it blocks.
pub trait Clock {
    /// Milliseconds since boot.
    fn now_ms(&self) -> u64;

    /// Block for `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32);

    /// Milliseconds elapsed since `reference_ms`, saturating at zero.
    fn elapsed_since(&self, reference_ms: u64) -> u64 {
        self.now_ms().saturating_sub(reference_ms)
    }
}

/// Water-quality and proximity sensors.
pub trait SensorSource {
    /// Bring up the spectral sensor (gain, integration time, illumination).
    fn init_spectral(&mut self) -> Result<(), SensorError>;

    /// Take one illuminated spectral measurement.
    fn read_spectral(&mut self) -> Result<SpectralSample, SensorError>;

    /// pH probe voltage in volts.
    fn read_analog_voltage(&mut self) -> f32;

    /// Turbidity comparator output: `true` when the water reads clean.
    fn read_turbidity_clean(&mut self) -> bool;

    /// Ultrasonic range to the nearest obstacle, in centimetres.
    fn read_distance(&mut self) -> Result<u32, SensorError>;
}

/// Rotation direction for turn commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Turn {
    /// Rotate counter-clockwise in place.
    Left,
    /// Rotate clockwise in place.
    Right,
}

/// Differential-drive motor outputs. Commands are fire-and-forget.
pub trait ActuatorSink {
    /// Drive both sides forward.
    fn forward(&mut self);

    /// Cut all motor outputs.
    fn stop(&mut self);

    /// Start rotating in place until the next command.
    fn turn(&mut self, direction: Turn);

    /// Rotate for `duration_ms`, then halt.
    fn turn_for<C: Clock>(&mut self, direction: Turn, duration_ms: u32, clock: &mut C)
    where
        Self: Sized,
    {
        self.turn(direction);
        clock.delay_ms(duration_ms);
        self.stop();
    }
}

/// Outbound status channel.
///
/// Implementations encode the snapshot and hand it to the transport. Errors are
/// returned for logging only; the caller never retries.
pub trait StatusReporter {
    /// Send one snapshot.
    fn publish(&mut self, snapshot: &RobotSnapshot) -> Result<(), ReportError>;
}
