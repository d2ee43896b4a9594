//! Rate-limited water-quality sampling.
//!
//! [`SensorPoller`] owns the sensor-read timer and the spectral sensor's
//! bring-up state. Each window it:
//!
//! 1. retries spectral bring-up if the sensor is down,
//! 2. reads and classifies a spectral sample if the sensor is up,
//! 3. reads the pH probe voltage and turbidity comparator,
//! 4. assigns a synthetic pH keyed by the current material.
//!
//! A failed spectral read keeps the last good sample and classification and
//! marks the sensor down so the next window retries bring-up.

use log::{debug, info, warn};
use rand::Rng;

use crate::classifier::classify;
use crate::platform::SensorSource;
use crate::snapshot::{RobotSnapshot, Turbidity};
use crate::spectral::Material;

/// ADC full-scale count of the pH probe input.
pub const ADC_FULL_SCALE: f32 = 1023.0;

/// ADC reference voltage.
pub const ADC_REFERENCE_V: f32 = 3.3;

/// Convert a raw pH probe ADC count to volts.
///
/// The probe sits behind a 10:1 divider, hence the division before scaling.
pub fn adc_to_probe_voltage(raw: u16) -> f32 {
    (raw as f32 / 10.0) * (ADC_REFERENCE_V / ADC_FULL_SCALE)
}

/// Draw a synthetic pH value for `material` from its characteristic range.
pub fn synthetic_ph<R: Rng>(material: Material, rng: &mut R) -> f32 {
    let (lo, hi) = material.ph_range_centi();
    rng.gen_range(lo..hi) as f32 / 100.0
}

/// Outcome of one [`SensorPoller::poll`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollOutcome {
    /// Less than one interval since the last read; nothing was touched.
    Skipped,
    /// Sensors were read and the spectral channel was classified.
    Classified,
    /// Sensors were read but the spectral sensor was unavailable.
    SpectralUnavailable,
}

/// Sensor-read timer plus spectral sensor bring-up state.
#[derive(Clone, Debug)]
pub struct SensorPoller {
    interval_ms: u64,
    last_read_ms: Option<u64>,
    spectral_ready: bool,
}

impl SensorPoller {
    /// A poller that reads at most once per `interval_ms`.
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_read_ms: None,
            spectral_ready: false,
        }
    }

    /// `true` once the spectral sensor has been brought up and is reading.
    pub fn spectral_ready(&self) -> bool {
        self.spectral_ready
    }

    /// Attempt spectral bring-up. Returns whether the sensor is now ready.
    pub fn bring_up<S: SensorSource>(&mut self, sensors: &mut S) -> bool {
        match sensors.init_spectral() {
            Ok(()) => {
                if !self.spectral_ready {
                    info!("spectral sensor online");
                }
                self.spectral_ready = true;
            }
            Err(e) => {
                warn!("spectral sensor bring-up failed: {}", e);
                self.spectral_ready = false;
            }
        }
        self.spectral_ready
    }

    /// `true` if a read window is open at `now_ms`.
    pub fn is_due(&self, now_ms: u64) -> bool {
        match self.last_read_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.interval_ms,
        }
    }

    /// Read sensors into `snapshot` if a window is open.
    pub fn poll<S, R>(
        &mut self,
        now_ms: u64,
        sensors: &mut S,
        rng: &mut R,
        snapshot: &mut RobotSnapshot,
    ) -> PollOutcome
    where
        S: SensorSource,
        R: Rng,
    {
        if !self.is_due(now_ms) {
            debug!("sensor window not open, reusing cached readings");
            return PollOutcome::Skipped;
        }
        self.last_read_ms = Some(now_ms);

        if !self.spectral_ready {
            self.bring_up(sensors);
        }

        let mut outcome = PollOutcome::SpectralUnavailable;
        if self.spectral_ready {
            match sensors.read_spectral() {
                Ok(sample) => {
                    let result = classify(&sample);
                    if result.is_override() {
                        debug!("NIR saturated at {}, forcing plastic", sample.nir);
                    }
                    snapshot.spectral = sample;
                    snapshot.classification = Some(result);
                    outcome = PollOutcome::Classified;
                }
                Err(e) => {
                    warn!("spectral read failed: {}, keeping last classification", e);
                    self.spectral_ready = false;
                }
            }
        }

        snapshot.voltage = sensors.read_analog_voltage();
        snapshot.turbidity = Turbidity::from_clean_flag(sensors.read_turbidity_clean());

        if let Some(result) = snapshot.classification {
            snapshot.ph = synthetic_ph(result.material, rng);
        }
        snapshot.timestamp_ms = now_ms;
        outcome
    }
}
