//! Integration tests for obstacle avoidance as run from a control tick.

use aquabot_core::avoidance::{AvoidanceConfig, AvoidanceDecision};
use aquabot_core::control::{ControlConfig, Controller, TickOutcome, TickReport};
use aquabot_core::error::{ReportError, SensorError};
use aquabot_core::mock::{MockActuator, MockClock, MockReporter, MockSensors, MotorCommand};
use aquabot_core::platform::{Clock, Turn};
use aquabot_core::report::PublishOutcome;
use aquabot_core::snapshot::RobotStatus;
use rand::rngs::SmallRng;
use rand::SeedableRng;

type Bot = Controller<MockSensors, MockActuator, MockClock, MockReporter, SmallRng>;

fn bot_with(
    forward_cm: u32,
    right: Result<u32, SensorError>,
    left: Result<u32, SensorError>,
) -> Bot {
    bot_with_reporter(forward_cm, right, left, MockReporter::new())
}

fn bot_with_reporter(
    forward_cm: u32,
    right: Result<u32, SensorError>,
    left: Result<u32, SensorError>,
    reporter: MockReporter,
) -> Bot {
    env_logger::try_init().ok();
    let mut sensors = MockSensors::new();
    sensors.queue_distance(Ok(forward_cm));
    sensors.queue_distance(right);
    sensors.queue_distance(left);
    Controller::new(
        ControlConfig::default(),
        sensors,
        MockActuator::new(),
        MockClock::new(),
        reporter,
        SmallRng::seed_from_u64(3),
    )
}

fn ran(outcome: TickOutcome) -> TickReport {
    match outcome {
        TickOutcome::Ran(report) => report,
        TickOutcome::MissionRestarted => panic!("unexpected restart"),
    }
}

fn statuses(bot: &Bot) -> Vec<RobotStatus> {
    let published = bot.reporter().published();
    published.iter().map(|s| s.status).collect()
}

#[test]
fn test_right_path_clear() {
    let mut bot = bot_with(25, Ok(30), Ok(10));
    let report = ran(bot.tick());

    assert_eq!(report.avoidance, Some(AvoidanceDecision::TurnRight));
    assert_eq!(
        bot.actuator().commands(),
        &[
            MotorCommand::Forward,
            MotorCommand::Stop,
            MotorCommand::Turn(Turn::Right),
            MotorCommand::Stop,
            MotorCommand::Turn(Turn::Left),
            MotorCommand::Stop,
            MotorCommand::Turn(Turn::Right),
            MotorCommand::Stop,
            MotorCommand::Turn(Turn::Right),
            MotorCommand::Stop,
        ]
    );
    // scan 4100 ms + committed turn 700 ms
    assert_eq!(bot.clock().now_ms(), 4_800);
    assert_eq!(
        statuses(&bot),
        vec![
            RobotStatus::ObstacleScanning,
            RobotStatus::RightPathClear,
            RobotStatus::RightPathClear,
        ]
    );
    assert_eq!(bot.snapshot().distance_cm, 25);
}

#[test]
fn test_left_path_clear() {
    let mut bot = bot_with(25, Ok(10), Ok(30));
    let report = ran(bot.tick());
    assert_eq!(report.avoidance, Some(AvoidanceDecision::TurnLeft));
    assert_eq!(statuses(&bot)[1], RobotStatus::LeftPathClear);
    assert_eq!(bot.clock().now_ms(), 4_800);
}

#[test]
fn test_tie_goes_left() {
    let mut bot = bot_with(25, Ok(25), Ok(25));
    let report = ran(bot.tick());
    assert_eq!(report.avoidance, Some(AvoidanceDecision::TurnLeft));
    assert_eq!(statuses(&bot)[1].as_str(), "Left Path Clear");
}

#[test]
fn test_both_blocked_makes_u_turn() {
    let mut bot = bot_with(25, Ok(15), Ok(18));
    let report = ran(bot.tick());
    assert_eq!(report.avoidance, Some(AvoidanceDecision::UTurn));
    assert_eq!(statuses(&bot)[1].as_str(), "Blocked! U-Turn");
    // scan 4100 ms + double-length turn 1400 ms
    assert_eq!(bot.clock().now_ms(), 5_500);
    let commands = bot.actuator().commands();
    assert_eq!(
        &commands[commands.len() - 2..],
        &[MotorCommand::Turn(Turn::Right), MotorCommand::Stop]
    );
}

#[test]
fn test_scan_timeout_reads_as_open_water() {
    let mut bot = bot_with(12, Err(SensorError::Timeout), Ok(35));
    let report = ran(bot.tick());
    assert_eq!(report.avoidance, Some(AvoidanceDecision::TurnRight));
}

#[test]
fn test_forward_timeout_is_not_an_obstacle() {
    let mut sensors = MockSensors::new();
    sensors.queue_distance(Err(SensorError::Timeout));
    let mut bot = Controller::new(
        ControlConfig::default(),
        sensors,
        MockActuator::new(),
        MockClock::new(),
        MockReporter::new(),
        SmallRng::seed_from_u64(3),
    );
    let report = ran(bot.tick());
    assert_eq!(report.avoidance, None);
    assert_eq!(bot.snapshot().distance_cm, 100);
    assert_eq!(bot.actuator().commands(), &[MotorCommand::Forward]);
}

#[test]
fn test_zero_range_is_ignored() {
    let mut bot = bot_with(0, Ok(30), Ok(10));
    let report = ran(bot.tick());
    assert_eq!(report.avoidance, None);
}

#[test]
fn test_range_at_limit_is_ignored() {
    let mut bot = bot_with(40, Ok(30), Ok(10));
    assert_eq!(ran(bot.tick()).avoidance, None);
}

#[test]
fn test_avoidance_completes_when_reports_fail() {
    let reporter = MockReporter::failing(ReportError::NetworkUnavailable);
    let mut bot = bot_with_reporter(25, Ok(30), Ok(10), reporter);
    let report = ran(bot.tick());

    assert_eq!(report.avoidance, Some(AvoidanceDecision::TurnRight));
    // Two forced attempts plus the routine one; none retried.
    assert_eq!(bot.reporter().attempts(), 3);
    assert!(bot.reporter().published().is_empty());
}

#[test]
fn test_patrol_resumes_after_avoidance() {
    let mut bot = bot_with(25, Ok(30), Ok(10));
    bot.tick();
    bot.actuator_mut().clear();
    bot.clock_mut().advance(100);

    let report = ran(bot.tick());
    assert_eq!(report.avoidance, None);
    assert_eq!(bot.actuator().commands(), &[MotorCommand::Forward]);
    assert_eq!(bot.snapshot().status, RobotStatus::PatrollingOutbound);
}

#[test]
fn test_avoidance_reports_bypass_rate_limit() {
    env_logger::try_init().ok();
    // Instant maneuver, so both avoidance reports land inside the window
    // opened by the routine report one tick earlier.
    let config = ControlConfig {
        avoidance: AvoidanceConfig {
            turn_ms: 0,
            halt_settle_ms: 0,
            sample_settle_ms: 0,
            recenter_settle_ms: 0,
            ..AvoidanceConfig::default()
        },
        ..ControlConfig::default()
    };
    let mut sensors = MockSensors::new();
    sensors.queue_distance(Err(SensorError::Timeout));
    sensors.queue_distance(Ok(25));
    sensors.queue_distance(Ok(30));
    sensors.queue_distance(Ok(10));
    let mut bot = Controller::new(
        config,
        sensors,
        MockActuator::new(),
        MockClock::new(),
        MockReporter::new(),
        SmallRng::seed_from_u64(3),
    );

    assert_eq!(ran(bot.tick()).publish, PublishOutcome::Sent);
    bot.clock_mut().advance(50);
    let report = ran(bot.tick());

    assert_eq!(report.avoidance, Some(AvoidanceDecision::TurnRight));
    assert_eq!(bot.clock().now_ms(), 50);
    // The routine report after the maneuver is still inside the window.
    assert_eq!(report.publish, PublishOutcome::RateLimited);
    assert_eq!(
        statuses(&bot),
        vec![
            RobotStatus::PatrollingOutbound,
            RobotStatus::ObstacleScanning,
            RobotStatus::RightPathClear,
        ]
    );
}
