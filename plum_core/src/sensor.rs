//! The sensor actor - one finite state machine per ground-motion station.
//!
//! A sensor never performs I/O itself. Each stimulus (local wave arrival,
//! message delivery, confirmation timeout) mutates the sensor and returns the
//! [`SensorAction`]s the harness must carry out: broadcast a message, arm a
//! confirmation timer, append a log entry.
//!
//! ```text
//!                 wave / message            wave / message
//!  Observation ───────────────────► Detection ───────────────► Alerted
//!       ▲                               │
//!       └────── confirmation timeout ───┘
//! ```

use crate::correlation::CorrelationId;
use crate::log::{LogAction, LogEntry, LogEvent, Reaction};
use crate::message::{Message, MessageKind};
use plum_env::{GeoPoint, Sampler, SensorId, SimTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

// =============================================================================
// STATE
// =============================================================================

/// Alert status of a sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorState {
    /// Idle, listening for ground motion
    Observation,
    /// One detection registered, waiting for a confirming one
    Detection,
    /// Two detections registered; terminal for the run
    Alerted,
}

impl SensorState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorState::Observation => "Observation",
            SensorState::Detection => "Detection",
            SensorState::Alerted => "Alerted",
        }
    }
}

impl std::fmt::Display for SensorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered detection: who saw the wave, and when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionRecord {
    pub source: SensorId,
    pub time: SimTime,
}

impl DetectionRecord {
    pub fn new(source: SensorId, time: SimTime) -> Self {
        Self { source, time }
    }
}

/// Side effect requested by a sensor reaction, executed by the harness in
/// the order returned.
#[derive(Debug, Clone, PartialEq)]
pub enum SensorAction {
    /// Send to every sensor in transmission range
    Broadcast(Message),
    /// Schedule a confirmation timeout one waiting window from now
    ArmConfirmationTimer,
    /// Append to the run's event log
    Log(LogEntry),
}

// =============================================================================
// SENSOR
// =============================================================================

/// A ground-motion sensor and its detection history.
#[derive(Debug, Clone)]
pub struct Sensor {
    id: SensorId,
    location: GeoPoint,
    state: SensorState,
    first_detection: Option<DetectionRecord>,
    second_detection: Option<DetectionRecord>,
    correlation_id: Option<CorrelationId>,
    /// Sampled on the first local detection
    peak_displacement: Option<f64>,
    /// Sensors within transmission range, fixed for the whole run
    known_sensors: BTreeMap<SensorId, GeoPoint>,
}

impl Sensor {
    /// Creates a sensor in `Observation` with no known neighbors.
    pub fn new(id: SensorId, location: GeoPoint) -> Self {
        Self {
            id,
            location,
            state: SensorState::Observation,
            first_detection: None,
            second_detection: None,
            correlation_id: None,
            peak_displacement: None,
            known_sensors: BTreeMap::new(),
        }
    }

    /// Attaches the neighbor table computed at network initialization.
    pub fn with_known_sensors(mut self, known: BTreeMap<SensorId, GeoPoint>) -> Self {
        self.known_sensors = known;
        self
    }

    pub fn id(&self) -> &SensorId {
        &self.id
    }

    pub fn location(&self) -> GeoPoint {
        self.location
    }

    pub fn state(&self) -> SensorState {
        self.state
    }

    pub fn first_detection(&self) -> Option<&DetectionRecord> {
        self.first_detection.as_ref()
    }

    pub fn second_detection(&self) -> Option<&DetectionRecord> {
        self.second_detection.as_ref()
    }

    pub fn correlation_id(&self) -> Option<&CorrelationId> {
        self.correlation_id.as_ref()
    }

    pub fn peak_displacement(&self) -> Option<f64> {
        self.peak_displacement
    }

    pub fn known_sensors(&self) -> &BTreeMap<SensorId, GeoPoint> {
        &self.known_sensors
    }

    // -------------------------------------------------------------------------
    // Stimuli
    // -------------------------------------------------------------------------

    /// The P-wave reaches this sensor.
    ///
    /// Every local detection is broadcast, whatever the current state, so
    /// that neighbors further from the epicenter keep hearing about it.
    pub fn on_wave_arrival<S: Sampler + ?Sized>(
        &mut self,
        now: SimTime,
        sampler: &mut S,
    ) -> Vec<SensorAction> {
        match self.state {
            SensorState::Observation => {
                self.peak_displacement = Some(sampler.peak_displacement());
                self.first_detection = Some(DetectionRecord::new(self.id.clone(), now));
                self.state = SensorState::Detection;
                debug!(sensor = %self.id, time = %now, "P-wave detected, waiting for confirmation");

                vec![
                    SensorAction::Broadcast(self.detection_message(now)),
                    SensorAction::ArmConfirmationTimer,
                    SensorAction::Log(
                        self.produce_entry(now).with_reaction(Reaction::WaitForConfirmation),
                    ),
                ]
            }
            SensorState::Detection => {
                self.confirm(DetectionRecord::new(self.id.clone(), now));

                vec![
                    SensorAction::Broadcast(self.detection_message(now)),
                    SensorAction::Log(
                        self.produce_entry(now).with_reaction(Reaction::StatusToAlerted),
                    ),
                    SensorAction::Log(self.confirmed_entry(now, None)),
                ]
            }
            SensorState::Alerted => vec![
                SensorAction::Broadcast(self.detection_message(now)),
                SensorAction::Log(
                    self.produce_entry(now).with_reaction(Reaction::WaitForConfirmation),
                ),
            ],
        }
    }

    /// A message from a neighbor is delivered.
    ///
    /// Received detections are never re-broadcast.
    pub fn on_message(&mut self, now: SimTime, message: &Message) -> Vec<SensorAction> {
        match (message.kind, self.state) {
            (MessageKind::Detection, SensorState::Observation) => {
                self.first_detection =
                    Some(DetectionRecord::new(message.sender.clone(), message.time));
                self.state = SensorState::Detection;
                debug!(sensor = %self.id, from = %message.sender, time = %now, "Detection received, waiting for confirmation");

                vec![
                    SensorAction::ArmConfirmationTimer,
                    SensorAction::Log(
                        self.receive_entry(now, message)
                            .with_reaction(Reaction::WaitForConfirmation),
                    ),
                ]
            }
            (MessageKind::Detection, SensorState::Detection) => {
                // The receive row still reports the pre-alert state.
                let received = self
                    .receive_entry(now, message)
                    .with_reaction(Reaction::StatusToAlerted);
                self.confirm(DetectionRecord::new(message.sender.clone(), message.time));

                vec![
                    SensorAction::Log(received),
                    SensorAction::Log(self.confirmed_entry(now, Some(message.sender.clone()))),
                ]
            }
            (MessageKind::Detection, SensorState::Alerted) => {
                debug!(sensor = %self.id, from = %message.sender, time = %now, "Detection ignored, already alerted");

                vec![SensorAction::Log(
                    self.receive_entry(now, message).with_reaction(Reaction::Ignore),
                )]
            }
        }
    }

    /// A confirmation timer armed one waiting window ago fires.
    ///
    /// Timers are never cancelled; this is a no-op unless the sensor is
    /// still waiting for its second detection.
    pub fn on_confirmation_timeout(&mut self, now: SimTime) -> Vec<SensorAction> {
        if self.state != SensorState::Detection || self.second_detection.is_some() {
            return Vec::new();
        }

        self.first_detection = None;
        self.state = SensorState::Observation;
        debug!(sensor = %self.id, time = %now, "Timed out waiting for confirmation");

        vec![SensorAction::Log(
            LogEntry::new(now, self.id.clone(), self.state, LogAction::EventCancelation)
                .with_reaction(Reaction::BackToObservation),
        )]
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    /// Registers the confirming detection and raises the alert.
    fn confirm(&mut self, second: DetectionRecord) {
        if let Some(first) = &self.first_detection {
            // Label by occurrence: the earlier detection goes first.
            let (earlier, later) = if second.time < first.time {
                (&second, first)
            } else {
                (first, &second)
            };
            self.correlation_id = Some(CorrelationId::from_detections(
                (&earlier.source, earlier.time),
                (&later.source, later.time),
            ));
        }

        debug!(
            sensor = %self.id,
            from = %second.source,
            correlation_id = ?self.correlation_id.as_ref().map(|c| c.as_str()),
            "Alert confirmed"
        );
        self.second_detection = Some(second);
        self.state = SensorState::Alerted;
    }

    fn detection_message(&self, now: SimTime) -> Message {
        Message::detection(self.id.clone(), now, self.peak_displacement)
    }

    fn produce_entry(&self, now: SimTime) -> LogEntry {
        LogEntry::new(now, self.id.clone(), self.state, LogAction::Produce)
            .with_event(LogEvent::PWaveDetection)
            .with_value(self.peak_displacement)
    }

    fn receive_entry(&self, now: SimTime, message: &Message) -> LogEntry {
        LogEntry::new(now, self.id.clone(), self.state, LogAction::Receive)
            .with_event(LogEvent::PWaveDetection)
            .with_sender(message.sender.clone())
    }

    fn confirmed_entry(&self, now: SimTime, sender: Option<SensorId>) -> LogEntry {
        let entry = LogEntry::new(now, self.id.clone(), self.state, LogAction::ChangeStatus)
            .with_event(LogEvent::ConfirmedAlert)
            .with_reaction(Reaction::StatusToAlerted);
        match sender {
            Some(sender) => entry.with_sender(sender),
            None => entry,
        }
    }
}
