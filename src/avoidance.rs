//! Scan-and-decide obstacle avoidance.
//!
//! When the forward range drops below the obstacle limit the boat halts, looks
//! right, looks left, recentres and commits to whichever side is more open:
//!
//! ```text
//!   halt ─ settle ─ right T ─ sample R ─ settle ─ left 2T ─ sample L ─ settle
//!        ─ right T ─ settle ─ decide ─ commit
//! ```
//!
//! | Condition | Decision | Maneuver |
//! |---|---|---|
//! | `R > L` and `R > clear_path` | [`AvoidanceDecision::TurnRight`] | right T |
//! | `L >= R` and `L > clear_path` | [`AvoidanceDecision::TurnLeft`] | left T |
//! | otherwise | [`AvoidanceDecision::UTurn`] | right 2T |
//!
//! Every step blocks on the [`Clock`]; nothing else runs until the protocol
//! returns. Sensor timeouts during the scan read as [`NO_ECHO_DISTANCE_CM`].

use log::debug;

use crate::error::SensorError;
use crate::platform::{ActuatorSink, Clock, SensorSource, Turn};
use crate::snapshot::RobotStatus;

/// Range substituted for an ultrasonic timeout: no echo means open water.
pub const NO_ECHO_DISTANCE_CM: u32 = 100;

/// Tunables for the avoidance maneuver.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AvoidanceConfig {
    /// Ranges strictly below this (and above zero) trigger avoidance.
    pub obstacle_limit_cm: u32,
    /// A side must read strictly more than this to count as open.
    pub clear_path_cm: u32,
    /// Duration of one scan rotation.
    pub turn_ms: u32,
    /// Pause after the initial halt.
    pub halt_settle_ms: u32,
    /// Pause after each range sample.
    pub sample_settle_ms: u32,
    /// Pause after returning to centre.
    pub recenter_settle_ms: u32,
}

impl Default for AvoidanceConfig {
    fn default() -> Self {
        Self {
            obstacle_limit_cm: 40,
            clear_path_cm: 20,
            turn_ms: 700,
            halt_settle_ms: 500,
            sample_settle_ms: 300,
            recenter_settle_ms: 200,
        }
    }
}

/// Collapse a range reading to centimetres, mapping timeouts to [`NO_ECHO_DISTANCE_CM`].
pub fn effective_distance(reading: Result<u32, SensorError>) -> u32 {
    match reading {
        Ok(cm) => cm,
        Err(e) => {
            debug!("range read failed ({}), assuming open water", e);
            NO_ECHO_DISTANCE_CM
        }
    }
}

/// `true` when `distance_cm` is a real echo closer than the obstacle limit.
///
/// Zero is a bogus echo and never counts as an obstacle.
pub fn is_obstacle(distance_cm: u32, cfg: &AvoidanceConfig) -> bool {
    distance_cm > 0 && distance_cm < cfg.obstacle_limit_cm
}

/// Ranges sampled to each side during the scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScanResult {
    /// Range with the bow turned right.
    pub right_cm: u32,
    /// Range with the bow turned left.
    pub left_cm: u32,
}

/// Outcome of a scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AvoidanceDecision {
    /// Right side is open and strictly further than the left.
    TurnRight,
    /// Left side is open and at least as far as the right.
    TurnLeft,
    /// Neither side is open.
    UTurn,
}

impl AvoidanceDecision {
    /// Status reported when committing to this decision.
    pub fn status(&self) -> RobotStatus {
        match self {
            AvoidanceDecision::TurnRight => RobotStatus::RightPathClear,
            AvoidanceDecision::TurnLeft => RobotStatus::LeftPathClear,
            AvoidanceDecision::UTurn => RobotStatus::BlockedUTurn,
        }
    }
}

/// Pick a side from a completed scan. Ties go left when left is open.
pub fn decide(scan: &ScanResult, cfg: &AvoidanceConfig) -> AvoidanceDecision {
    let ScanResult { right_cm, left_cm } = *scan;
    if right_cm > left_cm && right_cm > cfg.clear_path_cm {
        AvoidanceDecision::TurnRight
    } else if left_cm >= right_cm && left_cm > cfg.clear_path_cm {
        AvoidanceDecision::TurnLeft
    } else {
        AvoidanceDecision::UTurn
    }
}

/// Run the look-right / look-left scan and return to centre.
///
/// Assumes the motors are already halted.
pub fn scan<S, A, C>(
    cfg: &AvoidanceConfig,
    sensors: &mut S,
    actuator: &mut A,
    clock: &mut C,
) -> ScanResult
where
    S: SensorSource,
    A: ActuatorSink,
    C: Clock,
{
    clock.delay_ms(cfg.halt_settle_ms);

    actuator.turn_for(Turn::Right, cfg.turn_ms, clock);
    let right_cm = effective_distance(sensors.read_distance());
    clock.delay_ms(cfg.sample_settle_ms);

    // Back through centre and the same amount past it.
    actuator.turn_for(Turn::Left, cfg.turn_ms.saturating_mul(2), clock);
    let left_cm = effective_distance(sensors.read_distance());
    clock.delay_ms(cfg.sample_settle_ms);

    actuator.turn_for(Turn::Right, cfg.turn_ms, clock);
    clock.delay_ms(cfg.recenter_settle_ms);

    debug!("scan: right={}cm left={}cm", right_cm, left_cm);
    ScanResult { right_cm, left_cm }
}

/// Execute the committed turn for `decision`.
pub fn commit<A, C>(
    decision: AvoidanceDecision,
    cfg: &AvoidanceConfig,
    actuator: &mut A,
    clock: &mut C,
) where
    A: ActuatorSink,
    C: Clock,
{
    match decision {
        AvoidanceDecision::TurnRight => actuator.turn_for(Turn::Right, cfg.turn_ms, clock),
        AvoidanceDecision::TurnLeft => actuator.turn_for(Turn::Left, cfg.turn_ms, clock),
        AvoidanceDecision::UTurn => {
            actuator.turn_for(Turn::Right, cfg.turn_ms.saturating_mul(2), clock)
        }
    }
}
