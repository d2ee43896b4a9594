//! The aggregated robot state handed to the status reporter.

use crate::classifier::ClassificationResult;
use crate::mission::MissionPhase;
use crate::spectral::SpectralSample;

/// pH reported before the first classification.
pub const INITIAL_PH: f32 = 7.0;

/// Operator-facing status line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RobotStatus {
    /// Booted, no control tick run yet.
    Ready,
    /// Outbound patrol leg.
    PatrollingOutbound,
    /// Return leg.
    ReturningHome,
    /// Rest period.
    Resting,
    /// Obstacle detected, scan in progress.
    ObstacleScanning,
    /// Scan chose the right-hand path.
    RightPathClear,
    /// Scan chose the left-hand path.
    LeftPathClear,
    /// Both sides blocked, turning around.
    BlockedUTurn,
}

impl RobotStatus {
    /// Status text as shown to the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            RobotStatus::Ready => "System Ready",
            RobotStatus::PatrollingOutbound => "Patrolling (Outbound)",
            RobotStatus::ReturningHome => "Returning Home",
            RobotStatus::Resting => "Resting",
            RobotStatus::ObstacleScanning => "Obstacle! Scanning...",
            RobotStatus::RightPathClear => "Right Path Clear",
            RobotStatus::LeftPathClear => "Left Path Clear",
            RobotStatus::BlockedUTurn => "Blocked! U-Turn",
        }
    }

    /// Status shown while the mission is in `phase`.
    pub fn for_phase(phase: MissionPhase) -> Self {
        match phase {
            MissionPhase::Outbound => RobotStatus::PatrollingOutbound,
            MissionPhase::Returning => RobotStatus::ReturningHome,
            MissionPhase::Resting | MissionPhase::CycleComplete => RobotStatus::Resting,
        }
    }
}

impl core::fmt::Display for RobotStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Digital turbidity state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Turbidity {
    /// Comparator reads clear water.
    Clean,
    /// Comparator reads turbid water.
    Dirty,
}

impl Turbidity {
    /// Map the comparator output (`true` = clean).
    pub fn from_clean_flag(clean: bool) -> Self {
        if clean {
            Turbidity::Clean
        } else {
            Turbidity::Dirty
        }
    }

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Turbidity::Clean => "CLEAN",
            Turbidity::Dirty => "DIRTY",
        }
    }
}

/// Everything the reporter needs, captured as one value.
///
/// Fields are only updated from completed reads, so a copy taken at any point
/// between component calls is consistent.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RobotSnapshot {
    /// Operator-facing status line.
    pub status: RobotStatus,
    /// Current mission phase.
    pub phase: MissionPhase,
    /// Last good spectral capture.
    pub spectral: SpectralSample,
    /// Most recent classification, if any spectral read has succeeded.
    pub classification: Option<ClassificationResult>,
    /// pH estimate.
    pub ph: f32,
    /// pH probe voltage in volts.
    pub voltage: f32,
    /// Turbidity comparator state.
    pub turbidity: Turbidity,
    /// Last ultrasonic range in centimetres (timeouts read as the no-echo value).
    pub distance_cm: u32,
    /// Clock time of the last update, in milliseconds since boot.
    pub timestamp_ms: u64,
}

impl RobotSnapshot {
    /// Boot-time snapshot.
    pub fn new() -> Self {
        Self {
            status: RobotStatus::Ready,
            phase: MissionPhase::Outbound,
            spectral: SpectralSample::default(),
            classification: None,
            ph: INITIAL_PH,
            voltage: 0.0,
            turbidity: Turbidity::Clean,
            distance_cm: 0,
            timestamp_ms: 0,
        }
    }

    /// Confidence of the current classification, 0 when there is none.
    pub fn confidence(&self) -> f32 {
        self.classification.map_or(0.0, |c| c.confidence)
    }
}

impl Default for RobotSnapshot {
    fn default() -> Self {
        Self::new()
    }
}
