//! # aquabot-core
//!
//! Onboard control logic for an autonomous surface boat that patrols a body of
//! water, samples water-quality proxies, classifies the water type and reports
//! its state to a remote collector while steering around obstacles.
//!
//! ---
//!
//! ## The loop
//!
//! One control tick, single-threaded, no interleaving:
//!
//! ```text
//! MissionTimeline ─▶ ActuatorSink ─▶ range check ─▶ avoidance (blocking)
//!                                                        │
//!        StatusReporter ◀─ ReportGate ◀─ SensorPoller ◀──┘
//!                                           │
//!                                       classify()
//! ```
//!
//! - The mission runs Outbound → Returning → Resting, then restarts forever.
//! - A range below the obstacle limit halts the boat and runs a scan-and-decide
//!   maneuver to completion before anything else happens.
//! - Spectral readings are classified against four fixed reference signatures
//!   by nearest Euclidean distance, with a saturation override for plastics.
//! - Reports are rate-limited; avoidance events force a report through.
//!
//! ## Module overview
//!
//! | Module | Key types | What it does |
//! |--------|-----------|--------------|
//! | [`spectral`] | [`SpectralSample`], [`Material`] | Sensor sample and reference signatures |
//! | [`classifier`] | [`ClassificationResult`] | Nearest-centroid classification with override |
//! | [`mission`] | [`MissionTimeline`], [`MissionPhase`] | Time-driven phase schedule |
//! | [`avoidance`] | [`AvoidanceDecision`] | Scan-and-decide obstacle protocol |
//! | [`sensors`] | [`SensorPoller`] | Rate-limited sampling and sensor bring-up |
//! | [`report`] | [`ReportGate`] | Report rate limit and outbound record |
//! | [`snapshot`] | [`RobotSnapshot`] | The state handed to the reporter |
//! | [`control`] | [`Controller`], [`ControlConfig`] | The tick that ties it together |
//! | [`platform`] | [`Clock`], [`SensorSource`], [`ActuatorSink`], [`StatusReporter`] | Hardware contracts |
//! | [`mock`] | [`mock::MockClock`] et al. | Host implementations of the contracts |
//!
//! ## `no_std`
//!
//! This crate is `#![no_std]` by default with no heap required. Enable `std`
//! for `std::error::Error` impls, and `serde` for serialisation of the data
//! model and [`report::StatusRecord`].

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod avoidance;
pub mod classifier;
pub mod control;
pub mod error;
pub mod mission;
pub mod mock;
pub mod platform;
pub mod report;
pub mod sensors;
pub mod snapshot;
pub mod spectral;

pub use avoidance::{AvoidanceConfig, AvoidanceDecision, ScanResult};
pub use classifier::{classify, ClassificationResult};
pub use control::{ControlConfig, ControlState, Controller, TickOutcome, TickReport};
pub use error::{ReportError, SensorError};
pub use mission::{MissionPhase, MissionTimeline, PhaseTracker};
pub use platform::{ActuatorSink, Clock, SensorSource, StatusReporter, Turn};
pub use report::{PublishOutcome, ReportGate};
pub use sensors::{PollOutcome, SensorPoller};
pub use snapshot::{RobotSnapshot, RobotStatus, Turbidity};
pub use spectral::{Material, ReferenceSignature, SpectralSample, REFERENCE_SIGNATURES};
