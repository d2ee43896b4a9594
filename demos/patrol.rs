//! # Patrol: a simulated mission on a small lake
//!
//! Runs the full control loop against simulated hardware on a compressed
//! timeline (90 s outbound, 20 s return, 15 s rest), so one mission cycle plays
//! out in a few seconds of wall time. No hardware required.
//!
//! What the simulation throws at the controller:
//!
//! - the water changes under the hull: clean, then an algae bloom, then a
//!   patch of floating plastic bright enough to saturate the NIR channel;
//! - a buoy appears dead ahead at 40 s and a dock wall at 70 s;
//! - the spectral sensor drops off the I²C bus between 55 s and 60 s;
//! - the uplink goes down between 100 s and 105 s.
//!
//! Every report is printed as the JSON line the collector would receive.
//!
//! ## Running this example
//!
//! ```
//! RUST_LOG=info cargo run --example patrol --features std,serde
//! ```

use aquabot_core::control::{ControlConfig, Controller, TickOutcome};
use aquabot_core::error::{ReportError, SensorError};
use aquabot_core::mission::MissionTimeline;
use aquabot_core::platform::{ActuatorSink, Clock, SensorSource, StatusReporter, Turn};
use aquabot_core::report::StatusRecord;
use aquabot_core::sensors::adc_to_probe_voltage;
use aquabot_core::snapshot::RobotSnapshot;
use aquabot_core::spectral::SpectralSample;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::cell::Cell;
use std::rc::Rc;

/// Control tick spacing in simulated time.
const TICK_MS: u64 = 50;

// ── Simulated hardware ───────────────────────────────────────────────────────

/// Virtual clock shared with the simulated sensors so they can see "now".
#[derive(Clone)]
struct SimClock {
    now: Rc<Cell<u64>>,
}

impl Clock for SimClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }

    fn delay_ms(&mut self, ms: u32) {
        self.now.set(self.now.get() + ms as u64);
    }
}

struct SimSensors {
    now: Rc<Cell<u64>>,
    rng: SmallRng,
    /// Remaining close-range echoes for the obstacle currently in front.
    obstacle_echoes: u32,
    buoy_seen: bool,
    dock_seen: bool,
}

impl SimSensors {
    fn secs(&self) -> u64 {
        self.now.get() / 1000
    }

    fn jitter(&mut self, centre: f32, spread: f32) -> f32 {
        (centre + self.rng.gen_range(-spread..spread)).max(0.0)
    }
}

impl SensorSource for SimSensors {
    fn init_spectral(&mut self) -> Result<(), SensorError> {
        if (55..60).contains(&self.secs()) {
            Err(SensorError::Unavailable)
        } else {
            Ok(())
        }
    }

    fn read_spectral(&mut self) -> Result<SpectralSample, SensorError> {
        let t = self.secs();
        if (55..60).contains(&t) {
            return Err(SensorError::Unavailable);
        }
        // (centre, spread) per channel.
        let [uv, vis, nir] = match t {
            0..=29 => [(22.0, 6.0), (24.0, 6.0), (12.0, 4.0)],
            30..=49 => [(45.0, 10.0), (235.0, 20.0), (140.0, 15.0)],
            50..=64 => [(190.0, 15.0), (60.0, 10.0), (25.0, 5.0)],
            65..=80 => [(160.0, 10.0), (140.0, 10.0), (1250.0, 50.0)],
            _ => [(25.0, 6.0), (30.0, 6.0), (15.0, 4.0)],
        };
        let sample = SpectralSample::new(
            self.jitter(uv.0, uv.1),
            self.jitter(vis.0, vis.1),
            self.jitter(nir.0, nir.1),
        );
        Ok(sample.with_temperature(self.jitter(21.0, 0.5)))
    }

    fn read_analog_voltage(&mut self) -> f32 {
        let raw = self.rng.gen_range(600u16..700);
        adc_to_probe_voltage(raw)
    }

    fn read_turbidity_clean(&mut self) -> bool {
        !(30..50).contains(&self.secs())
    }

    fn read_distance(&mut self) -> Result<u32, SensorError> {
        let t = self.secs();
        if t >= 40 && !self.buoy_seen {
            self.buoy_seen = true;
            // Forward echo, then right side clear, left side blocked.
            self.obstacle_echoes = 3;
        }
        if t >= 70 && !self.dock_seen {
            self.dock_seen = true;
            self.obstacle_echoes = 3;
        }
        if self.obstacle_echoes > 0 {
            self.obstacle_echoes -= 1;
            let reading = match (self.dock_seen, self.obstacle_echoes) {
                (false, 2) => 28,
                (false, 1) => 75,
                (false, _) => 12,
                (true, 2) => 18,
                (true, 1) => 14,
                (true, _) => 16,
            };
            return Ok(reading);
        }
        // Open water: no echo most of the time.
        if self.rng.gen_bool(0.7) {
            Err(SensorError::Timeout)
        } else {
            Ok(self.rng.gen_range(60..300))
        }
    }
}

struct PrintMotors;

impl ActuatorSink for PrintMotors {
    fn forward(&mut self) {}

    fn stop(&mut self) {}

    fn turn(&mut self, direction: Turn) {
        log::debug!("motors: turning {:?}", direction);
    }
}

/// Prints each report as a JSON line, except while the uplink is down.
struct JsonLineReporter {
    now: Rc<Cell<u64>>,
    sent: u32,
    dropped: u32,
}

impl StatusReporter for JsonLineReporter {
    fn publish(&mut self, snapshot: &RobotSnapshot) -> Result<(), ReportError> {
        if (100_000..105_000).contains(&self.now.get()) {
            self.dropped += 1;
            return Err(ReportError::NetworkUnavailable);
        }
        let record = StatusRecord::from(snapshot);
        let Ok(line) = serde_json::to_string(&record) else {
            return Err(ReportError::SendFailure);
        };
        println!("{:>7} ms  {}", self.now.get(), line);
        self.sent += 1;
        Ok(())
    }
}

// ── Mission ──────────────────────────────────────────────────────────────────

fn main() {
    env_logger::init();

    println!("aquabot patrol simulation");
    println!("=========================\n");

    let config = ControlConfig {
        timeline: MissionTimeline {
            outbound_ms: 90_000,
            return_ms: 20_000,
            rest_ms: 15_000,
            return_turn_ms: 1_200,
        },
        // Report once a second so the output stays readable.
        report_interval_ms: 1_000,
        ..ControlConfig::default()
    };

    let now = Rc::new(Cell::new(0u64));
    let clock = SimClock {
        now: Rc::clone(&now),
    };
    let sensors = SimSensors {
        now: Rc::clone(&now),
        rng: SmallRng::seed_from_u64(2024),
        obstacle_echoes: 0,
        buoy_seen: false,
        dock_seen: false,
    };
    let reporter = JsonLineReporter {
        now: Rc::clone(&now),
        sent: 0,
        dropped: 0,
    };

    let mut bot = Controller::new(
        config,
        sensors,
        PrintMotors,
        clock,
        reporter,
        SmallRng::seed_from_u64(7),
    );

    let mut avoidance_events = Vec::new();
    loop {
        match bot.tick() {
            TickOutcome::Ran(report) => {
                if let Some(decision) = report.avoidance {
                    avoidance_events.push((bot.clock().now_ms(), decision));
                }
            }
            TickOutcome::MissionRestarted => break,
        }
        now.set(now.get() + TICK_MS);
    }

    // ── Summary ──────────────────────────────────────────────────────────────
    println!("\nSummary");
    println!("-------");
    println!("  cycles completed:  {}", bot.state().cycles_completed());
    println!("  reports sent:      {}", bot.reporter().sent);
    println!("  reports dropped:   {}", bot.reporter().dropped);
    for (at, decision) in &avoidance_events {
        println!("  avoidance at {:>6} ms: {:?}", at, decision);
    }
}
