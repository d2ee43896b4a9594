//! Status reporting: rate limiting and the flat outbound record.
//!
//! [`ReportGate`] sits in front of a [`StatusReporter`]. Routine publishes go
//! out at most once per interval; forced publishes always go out and restart
//! the interval. Send failures are logged and dropped: no queue, no retry.
//!
//! [`StatusRecord`] (requires the `serde` feature) is the field set the
//! collector expects, flattened from a [`RobotSnapshot`].

use log::debug;

use crate::platform::StatusReporter;
use crate::snapshot::RobotSnapshot;

/// Outcome of a [`ReportGate::publish`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Handed to the reporter and accepted.
    Sent,
    /// Suppressed by the rate limit.
    RateLimited,
    /// Handed to the reporter, which failed. The report is gone.
    Dropped,
}

/// Minimum-interval gate for routine status reports.
#[derive(Clone, Debug)]
pub struct ReportGate {
    interval_ms: u64,
    last_sent_ms: Option<u64>,
}

impl ReportGate {
    /// A gate allowing one routine report per `interval_ms`.
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_sent_ms: None,
        }
    }

    /// `true` if a routine report may go out at `now_ms`.
    pub fn is_open(&self, now_ms: u64) -> bool {
        match self.last_sent_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.interval_ms,
        }
    }

    /// Publish `snapshot` unless rate-limited. `force` bypasses the limit.
    pub fn publish<P: StatusReporter>(
        &mut self,
        now_ms: u64,
        snapshot: &RobotSnapshot,
        force: bool,
        reporter: &mut P,
    ) -> PublishOutcome {
        if !force && !self.is_open(now_ms) {
            return PublishOutcome::RateLimited;
        }
        self.last_sent_ms = Some(now_ms);

        match reporter.publish(snapshot) {
            Ok(()) => PublishOutcome::Sent,
            Err(e) => {
                debug!("status report dropped: {}", e);
                PublishOutcome::Dropped
            }
        }
    }
}

/// Flat record sent to the collector.
///
/// Channel fields carry the collector's historic names: `cdom` is the
/// ultraviolet proxy, `algae` the visible proxy, `plastic` the near-infrared
/// proxy.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, Clone, Debug, PartialEq)]
pub struct StatusRecord {
    /// pH estimate.
    pub ph: f32,
    /// pH probe voltage.
    pub voltage: f32,
    /// `"CLEAN"` or `"DIRTY"`.
    pub turbidity: &'static str,
    /// Ultraviolet channel.
    pub cdom: f32,
    /// Visible channel.
    pub algae: f32,
    /// Near-infrared channel.
    pub plastic: f32,
    /// Material label, absent before the first classification.
    pub classification: Option<&'static str>,
    /// Classification confidence.
    pub confidence: f32,
    /// Water temperature in °C.
    pub temperature: f32,
    /// Forward range in centimetres.
    pub distance: u32,
    /// Status line.
    pub status: &'static str,
}

#[cfg(feature = "serde")]
impl From<&RobotSnapshot> for StatusRecord {
    fn from(s: &RobotSnapshot) -> Self {
        Self {
            ph: s.ph,
            voltage: s.voltage,
            turbidity: s.turbidity.as_str(),
            cdom: s.spectral.uv,
            algae: s.spectral.vis,
            plastic: s.spectral.nir,
            classification: s.classification.map(|c| c.label()),
            confidence: s.confidence(),
            temperature: s.spectral.temperature_or_default(),
            distance: s.distance_cm,
            status: s.status.as_str(),
        }
    }
}
