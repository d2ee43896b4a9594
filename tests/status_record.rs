//! Outbound status record tests.
//!
//! Run with: `cargo test --features serde`

#[cfg(feature = "serde")]
mod tests {
    use aquabot_core::classifier::classify;
    use aquabot_core::control::{ControlConfig, Controller};
    use aquabot_core::mock::{MockActuator, MockClock, MockReporter, MockSensors};
    use aquabot_core::report::StatusRecord;
    use aquabot_core::snapshot::{RobotSnapshot, RobotStatus, Turbidity};
    use aquabot_core::spectral::SpectralSample;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use serde_json::Value;

    // ── Helpers ──────────────────────────────────────────────────────────────

    fn sample_snapshot() -> RobotSnapshot {
        let mut sample = SpectralSample::new(40.0, 250.0, 150.0);
        sample.temperature_c = Some(18.5);
        RobotSnapshot {
            status: RobotStatus::LeftPathClear,
            spectral: sample,
            classification: Some(classify(&sample)),
            ph: 8.75,
            voltage: 0.21,
            turbidity: Turbidity::Dirty,
            distance_cm: 33,
            ..RobotSnapshot::new()
        }
    }

    fn to_json(snapshot: &RobotSnapshot) -> Value {
        let record = StatusRecord::from(snapshot);
        serde_json::to_value(record).expect("record serialises")
    }

    // ── Tests ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_record_has_collector_field_set() {
        let json = to_json(&sample_snapshot());
        let obj = json.as_object().expect("record is a flat object");
        let mut keys: Vec<&str> = obj.keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "algae",
                "cdom",
                "classification",
                "confidence",
                "distance",
                "ph",
                "plastic",
                "status",
                "temperature",
                "turbidity",
                "voltage",
            ]
        );
    }

    #[test]
    fn test_record_values() {
        let json = to_json(&sample_snapshot());
        assert_eq!(json["turbidity"], "DIRTY");
        assert_eq!(json["classification"], "Algae Bloom");
        assert_eq!(json["status"], "Left Path Clear");
        assert_eq!(json["distance"], 33);
        assert_eq!(json["cdom"].as_f64(), Some(40.0));
        assert_eq!(json["algae"].as_f64(), Some(250.0));
        assert_eq!(json["plastic"].as_f64(), Some(150.0));
        assert_eq!(json["temperature"].as_f64(), Some(18.5));
        assert_eq!(json["confidence"].as_f64(), Some(99.0));
    }

    #[test]
    fn test_boot_record_defaults() {
        let json = to_json(&RobotSnapshot::new());
        assert_eq!(json["status"], "System Ready");
        assert_eq!(json["classification"], Value::Null);
        assert_eq!(json["confidence"].as_f64(), Some(0.0));
        assert_eq!(json["temperature"].as_f64(), Some(25.0));
        assert_eq!(json["ph"].as_f64(), Some(7.0));
        assert_eq!(json["turbidity"], "CLEAN");
    }

    #[test]
    fn test_plastic_override_in_record() {
        let sample = SpectralSample::new(5.0, 5.0, 1500.0);
        let snapshot = RobotSnapshot {
            spectral: sample,
            classification: Some(classify(&sample)),
            ..RobotSnapshot::new()
        };
        let json = to_json(&snapshot);
        assert_eq!(json["classification"], "Plastic Debris");
        let confidence = json["confidence"].as_f64().expect("number");
        assert!(
            (confidence - 99.9).abs() < 1e-4,
            "confidence {}",
            confidence
        );
    }

    #[test]
    fn test_published_snapshot_round_trips_through_json() {
        let mut bot = Controller::new(
            ControlConfig::default(),
            MockSensors::new(),
            MockActuator::new(),
            MockClock::new(),
            MockReporter::new(),
            SmallRng::seed_from_u64(9),
        );
        bot.tick();
        let published = bot.reporter().published()[0];
        let text = serde_json::to_string(&published).expect("serialises");
        let restored: RobotSnapshot = serde_json::from_str(&text).expect("snapshot deserialises");
        assert_eq!(restored, published);
    }

    #[test]
    fn test_config_deserialises_from_json() {
        let config = ControlConfig::default();
        let mut value = serde_json::to_value(config).expect("config serialises");
        value["timeline"]["outbound_ms"] = Value::from(60_000u64);
        let config: ControlConfig = serde_json::from_value(value).expect("config deserialises");
        assert_eq!(config.timeline.outbound_ms, 60_000);
        assert_eq!(config.avoidance.obstacle_limit_cm, 40);
    }
}
