//! Property-based tests for the scenario runner.

use approx::relative_eq;
use plum_core::{LogAction, LogEntry, ProtocolConfig, Reaction, SensorState};
use plum_env::{GeoPoint, SensorId};
use plum_sim::{Network, RunConfig, ScenarioRunner, Site};
use proptest::prelude::*;
use std::collections::HashMap;

const EPSILON: f64 = 1e-3;

/// Up to a dozen sensors in a ~65 km square, so some pairs are in range
/// and some are not.
fn sensor_table() -> impl Strategy<Value = Vec<Site>> {
    prop::collection::vec((0.0f64..0.6, 0.0f64..0.6), 2..12).prop_map(|coords| {
        coords
            .into_iter()
            .enumerate()
            .map(|(i, (lat, lon))| Site::new(format!("S{:02}", i), lat, lon))
            .collect()
    })
}

fn epicenter() -> impl Strategy<Value = Site> {
    (-0.5f64..1.0, -0.5f64..1.0).prop_map(|(lat, lon)| Site::new("EQ", lat, lon))
}

fn run_config() -> impl Strategy<Value = RunConfig> {
    (any::<u64>(), any::<bool>()).prop_map(|(seed, noisy)| {
        let config = RunConfig::default().with_seed(seed);
        if noisy {
            config.noisy()
        } else {
            config
        }
    })
}

fn locations(sensors: &[Site]) -> HashMap<String, GeoPoint> {
    sensors
        .iter()
        .map(|s| (s.id.clone(), s.location))
        .collect()
}

fn by_sensor(entries: &[LogEntry]) -> HashMap<&str, Vec<&LogEntry>> {
    let mut grouped: HashMap<&str, Vec<&LogEntry>> = HashMap::new();
    for entry in entries {
        grouped.entry(entry.sensor_id.as_str()).or_default().push(entry);
    }
    grouped
}

fn enters_detection(entry: &LogEntry) -> bool {
    entry.status == SensorState::Detection
        && entry.reaction == Some(Reaction::WaitForConfirmation)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_log_time_is_monotonic(sensors in sensor_table(), eq in epicenter(), run in run_config()) {
        let result = ScenarioRunner::new(ProtocolConfig::default(), run)
            .run(0, &eq, &sensors)
            .unwrap();

        for pair in result.entries.windows(2) {
            prop_assert!(pair[0].time <= pair[1].time);
        }
    }

    #[test]
    fn prop_runs_are_deterministic(sensors in sensor_table(), eq in epicenter(), run in run_config()) {
        let runner = ScenarioRunner::new(ProtocolConfig::default(), run);
        let first = runner.run(5, &eq, &sensors).unwrap();
        let second = runner.run(5, &eq, &sensors).unwrap();

        prop_assert_eq!(first.entries, second.entries);
        prop_assert_eq!(first.report.outcomes, second.report.outcomes);
        prop_assert_eq!(first.report.stats, second.report.stats);
    }

    #[test]
    fn prop_receives_stay_within_range(sensors in sensor_table(), eq in epicenter(), run in run_config()) {
        let protocol = ProtocolConfig::default();
        let range = protocol.transmission_range_km;
        let result = ScenarioRunner::new(protocol, run).run(0, &eq, &sensors).unwrap();
        let positions = locations(&sensors);

        for entry in result.entries.iter().filter(|e| e.action == LogAction::Receive) {
            let sender = entry.sender_id.as_ref().unwrap();
            prop_assert_ne!(sender, &entry.sensor_id);
            let distance = positions[entry.sensor_id.as_str()].distance_km(&positions[sender.as_str()]);
            prop_assert!(
                distance <= range + 1e-9,
                "{} heard {} at {} km",
                entry.sensor_id,
                sender,
                distance
            );
        }
    }

    #[test]
    fn prop_range_is_symmetric(sensors in sensor_table()) {
        let nodes: Vec<(SensorId, GeoPoint)> = sensors
            .iter()
            .map(|s| (SensorId::new(s.id.clone()), s.location))
            .collect();
        let network = Network::new(&nodes, &ProtocolConfig::default());

        for a in 0..network.len() {
            prop_assert!(!network.in_range(a, a));
            for b in 0..network.len() {
                prop_assert_eq!(network.in_range(a, b), network.in_range(b, a));
            }
        }
    }

    #[test]
    fn prop_alerted_is_terminal(sensors in sensor_table(), eq in epicenter(), run in run_config()) {
        let result = ScenarioRunner::new(ProtocolConfig::default(), run)
            .run(0, &eq, &sensors)
            .unwrap();

        for (sensor, entries) in by_sensor(&result.entries) {
            let mut alerted = false;
            for entry in entries {
                if alerted {
                    prop_assert_eq!(entry.status, SensorState::Alerted, "{} left Alerted", sensor);
                    prop_assert_ne!(entry.action, LogAction::ChangeStatus);
                }
                if entry.action == LogAction::ChangeStatus {
                    alerted = true;
                }
            }
        }

        // Exactly the alerted sensors carry a correlation id
        for outcome in &result.report.outcomes {
            prop_assert_eq!(
                outcome.state == SensorState::Alerted,
                outcome.correlation_id.is_some()
            );
        }
    }

    #[test]
    fn prop_cancellation_after_one_window(sensors in sensor_table(), eq in epicenter(), run in run_config()) {
        let protocol = ProtocolConfig::default();
        let window = protocol.waiting_window;
        let result = ScenarioRunner::new(protocol, run).run(0, &eq, &sensors).unwrap();

        for (sensor, entries) in by_sensor(&result.entries) {
            for (i, entry) in entries.iter().enumerate() {
                if entry.action != LogAction::EventCancelation {
                    continue;
                }
                // While in Detection, the only logged step is the one entering it.
                prop_assert!(i > 0);
                let entered = entries[i - 1];
                prop_assert!(enters_detection(entered), "{} cancelled without detecting", sensor);
                prop_assert!(relative_eq!(entry.time, entered.time + window, epsilon = EPSILON));
            }
        }
    }
}
