//! End-to-end scenarios over small hand-placed networks.

use approx::assert_relative_eq;
use plum_core::{LogAction, LogEntry, LogEvent, ProtocolConfig, Reaction, SensorState};
use plum_env::GeoPoint;
use plum_sim::{write_log_csv, RunConfig, ScenarioRunner, Site};

const EPSILON: f64 = 1e-3;

fn entries_for<'a>(entries: &'a [LogEntry], sensor: &str) -> Vec<&'a LogEntry> {
    entries
        .iter()
        .filter(|e| e.sensor_id.as_str() == sensor)
        .collect()
}

fn p_arrival(sensor: &Site, epicenter: &Site) -> f64 {
    sensor.location.distance_km(&epicenter.location) / 6.0
}

/// A and B ~11 km apart, C ~111 km away; the epicenter sits 6 km west of A
/// so A's P-wave arrives at t = 1.0.
fn three_sensor_setup() -> (Vec<Site>, Site) {
    let sensors = vec![
        Site::new("A", 0.0, 0.0),
        Site::new("B", 0.0, 0.1),
        Site::new("C", 0.0, 1.0),
    ];
    let degrees_for_6km = 6.0 / GeoPoint::new(0.0, 0.0).distance_km(&GeoPoint::new(0.0, 1.0));
    let epicenter = Site::new("EQ1", 0.0, -degrees_for_6km);
    (sensors, epicenter)
}

#[test]
fn test_three_sensor_scenario() {
    let (sensors, epicenter) = three_sensor_setup();
    let t_a = p_arrival(&sensors[0], &epicenter);
    let t_b = p_arrival(&sensors[1], &epicenter);
    assert_relative_eq!(t_a, 1.0, epsilon = EPSILON);
    assert_relative_eq!(t_b, 2.853, epsilon = 0.01);

    let result = ScenarioRunner::default()
        .run(0, &epicenter, &sensors)
        .unwrap();
    let entries = &result.entries;

    // A detects locally at t=1.0
    let a = entries_for(entries, "A");
    assert_eq!(a[0].action, LogAction::Produce);
    assert_eq!(a[0].event, Some(LogEvent::PWaveDetection));
    assert_eq!(a[0].status, SensorState::Detection);
    assert_eq!(a[0].reaction, Some(Reaction::WaitForConfirmation));
    assert!(a[0].value.is_some());
    assert_relative_eq!(a[0].time, 1.0, epsilon = EPSILON);

    // B hears about it one transmission delay later
    let b = entries_for(entries, "B");
    assert_eq!(b[0].action, LogAction::Receive);
    assert_eq!(b[0].status, SensorState::Detection);
    assert_eq!(b[0].sender_id.as_ref().map(|s| s.as_str()), Some("A"));
    assert_relative_eq!(b[0].time, t_a + 0.05, epsilon = EPSILON);

    // B's own wave confirms
    assert_eq!(b[1].action, LogAction::Produce);
    assert_eq!(b[1].status, SensorState::Alerted);
    assert_eq!(b[1].reaction, Some(Reaction::StatusToAlerted));
    assert_eq!(b[2].action, LogAction::ChangeStatus);
    assert_eq!(b[2].event, Some(LogEvent::ConfirmedAlert));
    assert_relative_eq!(b[2].time, t_b, epsilon = EPSILON);

    // A is confirmed by B's broadcast
    assert_eq!(a[1].action, LogAction::Receive);
    assert_eq!(a[1].reaction, Some(Reaction::StatusToAlerted));
    assert_eq!(a[2].action, LogAction::ChangeStatus);
    assert_eq!(a[2].status, SensorState::Alerted);
    assert_relative_eq!(a[2].time, t_b + 0.05, epsilon = EPSILON);

    // C never receives anything from A or B
    assert!(entries_for(entries, "C")
        .iter()
        .all(|e| e.action != LogAction::Receive));
    assert!(entries
        .iter()
        .filter(|e| e.action == LogAction::Receive)
        .all(|e| e.sensor_id.as_str() != "C"));

    // Both alerted sensors agree on the event label
    let report = &result.report;
    let a_id = report.outcome("A").and_then(|o| o.correlation_id.clone());
    let b_id = report.outcome("B").and_then(|o| o.correlation_id.clone());
    assert!(a_id.is_some());
    assert_eq!(a_id, b_id);
    assert!(a_id.unwrap().as_str().starts_with("A000001.000B000002.8"));

    // C detects alone and falls back to Observation
    assert_eq!(report.outcome("C").map(|o| o.state), Some(SensorState::Observation));
}

#[test]
fn test_isolated_sensor_reverts_after_window() {
    let (sensors, epicenter) = three_sensor_setup();
    let t_c = p_arrival(&sensors[2], &epicenter);

    let result = ScenarioRunner::default()
        .run(0, &epicenter, &sensors)
        .unwrap();
    let c = entries_for(&result.entries, "C");

    assert_eq!(c.len(), 2);
    assert_eq!(c[0].action, LogAction::Produce);
    assert_relative_eq!(c[0].time, t_c, epsilon = EPSILON);
    assert_eq!(c[1].action, LogAction::EventCancelation);
    assert_eq!(c[1].status, SensorState::Observation);
    assert_eq!(c[1].reaction, Some(Reaction::BackToObservation));
    assert_relative_eq!(c[1].time, t_c + 5.0, epsilon = EPSILON);
}

#[test]
fn test_slow_wave_never_confirms() {
    // 1 km/s: B's own wave comes ~11 s after A's, well past the window
    let sensors = vec![Site::new("A", 0.0, 0.0), Site::new("B", 0.0, 0.1)];
    let epicenter = Site::new("EQ1", 0.0, -0.01);
    let protocol = ProtocolConfig::default().with_p_wave_speed(1.0);

    let result = ScenarioRunner::new(protocol, RunConfig::default())
        .run(0, &epicenter, &sensors)
        .unwrap();
    let entries = &result.entries;

    assert!(entries.iter().all(|e| e.status != SensorState::Alerted));
    assert_eq!(result.report.stats.alerts, 0);
    assert_eq!(result.report.stats.cancellations, 4);

    // B entered Detection on A's message and reverted exactly one window later
    let b = entries_for(entries, "B");
    assert_eq!(b[0].action, LogAction::Receive);
    assert_eq!(b[1].action, LogAction::EventCancelation);
    assert_relative_eq!(b[1].time, b[0].time + 5.0, epsilon = EPSILON);

    for outcome in &result.report.outcomes {
        assert_eq!(outcome.state, SensorState::Observation);
        assert!(outcome.correlation_id.is_none());
    }
}

#[test]
fn test_alerted_sensors_ignore_late_detections() {
    // Three sensors ~5.5 km apart, all mutually in range
    let sensors = vec![
        Site::new("A", 0.0, 0.0),
        Site::new("B", 0.0, 0.05),
        Site::new("D", 0.0, 0.1),
    ];
    let epicenter = Site::new("EQ1", 0.0, -0.05);

    let result = ScenarioRunner::default()
        .run(0, &epicenter, &sensors)
        .unwrap();

    let ignored: Vec<&LogEntry> = result
        .entries
        .iter()
        .filter(|e| e.reaction == Some(Reaction::Ignore))
        .collect();

    assert_eq!(ignored.len(), 2);
    for entry in &ignored {
        assert_eq!(entry.action, LogAction::Receive);
        assert_eq!(entry.status, SensorState::Alerted);
        assert_eq!(entry.sender_id.as_ref().map(|s| s.as_str()), Some("D"));
    }
    assert_eq!(result.report.stats.ignored_deliveries, 2);

    // D was already alerted by the others; its own wave is still broadcast
    let d = entries_for(&result.entries, "D");
    let last = d.last().unwrap();
    assert_eq!(last.action, LogAction::Produce);
    assert_eq!(last.status, SensorState::Alerted);
    assert_eq!(last.reaction, Some(Reaction::WaitForConfirmation));
}

#[test]
fn test_identical_runs_produce_identical_csv() {
    let (sensors, epicenter) = three_sensor_setup();
    let earthquakes = vec![epicenter.clone(), Site::new("EQ2", 0.0, 1.05)];
    let runner = ScenarioRunner::new(ProtocolConfig::default(), RunConfig::default().with_seed(7));

    let mut first = Vec::new();
    let mut second = Vec::new();
    write_log_csv(&mut first, &runner.run_all(&earthquakes, &sensors).unwrap()).unwrap();
    write_log_csv(&mut second, &runner.run_all(&earthquakes, &sensors).unwrap()).unwrap();

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn test_scenarios_start_from_fresh_state() {
    let (sensors, epicenter) = three_sensor_setup();
    let earthquakes = vec![
        Site::new("EQ1", epicenter.location.latitude, epicenter.location.longitude),
        Site::new("EQ2", epicenter.location.latitude, epicenter.location.longitude),
    ];

    let results = ScenarioRunner::default()
        .run_all(&earthquakes, &sensors)
        .unwrap();

    let shape = |entries: &[LogEntry]| -> Vec<(f64, String, LogAction, SensorState)> {
        entries
            .iter()
            .map(|e| (e.time, e.sensor_id.to_string(), e.action, e.status))
            .collect()
    };
    assert_eq!(shape(&results[0].entries), shape(&results[1].entries));
    assert_eq!(results[0].report.eq_id, "EQ1");
    assert_eq!(results[1].report.eq_id, "EQ2");
}

#[test]
fn test_duration_cuts_off_run() {
    let (sensors, epicenter) = three_sensor_setup();

    let result = ScenarioRunner::new(ProtocolConfig::default(), RunConfig::default().with_duration(2.0))
        .run(0, &epicenter, &sensors)
        .unwrap();

    // only A's detection and B's receive happen before t = 2
    assert_eq!(result.entries.len(), 2);
    assert!(result.entries.iter().all(|e| e.time <= 2.0));
    assert_eq!(result.report.stats.final_time_secs, 2.0);
}
