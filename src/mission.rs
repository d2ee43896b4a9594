//! Mission timeline: patrol out, return home, rest, repeat.
//!
//! - [`MissionTimeline`]: configurable phase durations.
//! - [`MissionPhase`]: the step function of elapsed mission time.
//! - [`PhaseTracker`]: detects phase *entry* so one-shot actions fire once.
//!
//! ```text
//! 0 ──── outbound_end ──── return_end ──── rest_end ────▶ elapsed
//!   Outbound       Returning        Resting       CycleComplete
//! ```
//!
//! # Invariants
//!
//! - Phase is a pure function of elapsed time since the mission start reference.
//! - Within one cycle phases only move forward; the only way back to
//!   `Outbound` is an explicit restart after `CycleComplete`.

use log::warn;

/// Phase durations for one mission cycle, in milliseconds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MissionTimeline {
    /// Length of the outbound patrol leg. Default 20 minutes.
    pub outbound_ms: u64,
    /// Length of the return leg. Default 2 minutes.
    pub return_ms: u64,
    /// Length of the rest period. Default 5 minutes.
    pub rest_ms: u64,
    /// Duration of the left reorientation turn on entering the return leg.
    pub return_turn_ms: u32,
}

impl MissionTimeline {
    /// Construct the standard timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed time at which the outbound leg ends.
    pub fn outbound_end(&self) -> u64 {
        self.outbound_ms
    }

    /// Elapsed time at which the return leg ends.
    pub fn return_end(&self) -> u64 {
        self.outbound_end().saturating_add(self.return_ms)
    }

    /// Elapsed time at which the rest period ends and the cycle completes.
    pub fn rest_end(&self) -> u64 {
        self.return_end().saturating_add(self.rest_ms)
    }

    /// Phase for a given elapsed time since mission start.
    pub fn current_phase(&self, elapsed_ms: u64) -> MissionPhase {
        if elapsed_ms < self.outbound_end() {
            MissionPhase::Outbound
        } else if elapsed_ms < self.return_end() {
            MissionPhase::Returning
        } else if elapsed_ms < self.rest_end() {
            MissionPhase::Resting
        } else {
            MissionPhase::CycleComplete
        }
    }
}

impl Default for MissionTimeline {
    fn default() -> Self {
        Self {
            outbound_ms: 1_200_000,
            return_ms: 120_000,
            rest_ms: 300_000,
            return_turn_ms: 1_200,
        }
    }
}

/// Active mission phase. Exactly one is active at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MissionPhase {
    /// Patrolling away from home, sampling and avoiding obstacles.
    Outbound,
    /// Heading back home, still avoiding obstacles.
    Returning,
    /// Stopped, still sampling and reporting.
    Resting,
    /// Timeline exhausted; the caller restarts the mission.
    CycleComplete,
}

impl MissionPhase {
    /// `true` for phases in which the boat drives forward.
    pub fn is_underway(&self) -> bool {
        matches!(self, MissionPhase::Outbound | MissionPhase::Returning)
    }
}

/// Remembers the last observed phase and reports transitions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PhaseTracker {
    previous: Option<MissionPhase>,
}

impl PhaseTracker {
    /// A tracker that has not observed any phase yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `phase` and return it if it differs from the previous observation.
    ///
    /// The very first observation counts as an entry. A phase earlier than
    /// the previous one (a clock that stepped backwards) is logged and also
    /// counts as an entry.
    pub fn observe(&mut self, phase: MissionPhase) -> Option<MissionPhase> {
        match self.previous {
            Some(prev) if prev == phase => return None,
            Some(prev) if prev > phase => {
                warn!("phase went back: {:?} -> {:?}", prev, phase);
            }
            _ => {}
        }
        self.previous = Some(phase);
        Some(phase)
    }

    /// Forget the previous phase. Called when the mission restarts.
    pub fn reset(&mut self) {
        self.previous = None;
    }

    /// Last observed phase.
    pub fn previous(&self) -> Option<MissionPhase> {
        self.previous
    }
}
