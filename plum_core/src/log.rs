//! Event log produced by a simulation run.
//!
//! Every state transition of every sensor becomes one [`LogEntry`]. The
//! column names and string values are a contract with the visualization
//! tools, see [`LogEntry::HEADER`].

use crate::sensor::SensorState;
use plum_env::{SensorId, SimTime};
use serde::{Deserialize, Serialize};

/// Marker written for "not applicable" columns.
pub const NULL_MARKER: &str = "NaN";

/// What the sensor did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogAction {
    Produce,
    Receive,
    ChangeStatus,
    EventCancelation,
}

impl LogAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogAction::Produce => "Produce",
            LogAction::Receive => "Receive",
            LogAction::ChangeStatus => "ChangeStatus",
            LogAction::EventCancelation => "EventCancelation",
        }
    }
}

/// What the action was about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogEvent {
    #[serde(rename = "P_Wave_Detection")]
    PWaveDetection,
    ConfirmedAlert,
}

impl LogEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogEvent::PWaveDetection => "P_Wave_Detection",
            LogEvent::ConfirmedAlert => "ConfirmedAlert",
        }
    }
}

/// How the sensor reacted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reaction {
    WaitForConfirmation,
    StatusToAlerted,
    BackToObservation,
    Ignore,
}

impl Reaction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reaction::WaitForConfirmation => "WaitForConfirmation",
            Reaction::StatusToAlerted => "StatusToAlerted",
            Reaction::BackToObservation => "BackToObservation",
            Reaction::Ignore => "Ignore",
        }
    }
}

/// One row of the event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Virtual time, rounded to 4 decimals
    pub time: f64,
    pub sensor_id: SensorId,
    /// Sensor state after the logged action
    pub status: SensorState,
    pub action: LogAction,
    pub event: Option<LogEvent>,
    pub sender_id: Option<SensorId>,
    pub reaction: Option<Reaction>,
    /// Peak displacement (cm)
    pub value: Option<f64>,
}

impl LogEntry {
    /// Column names, in output order.
    pub const HEADER: [&'static str; 8] = [
        "time",
        "sensor_id",
        "status",
        "action",
        "event",
        "sender_id",
        "reaction",
        "value",
    ];

    /// Creates an entry with every optional column empty.
    pub fn new(time: SimTime, sensor_id: SensorId, status: SensorState, action: LogAction) -> Self {
        Self {
            time: time.rounded(),
            sensor_id,
            status,
            action,
            event: None,
            sender_id: None,
            reaction: None,
            value: None,
        }
    }

    pub fn with_event(mut self, event: LogEvent) -> Self {
        self.event = Some(event);
        self
    }

    pub fn with_sender(mut self, sender: SensorId) -> Self {
        self.sender_id = Some(sender);
        self
    }

    pub fn with_reaction(mut self, reaction: Reaction) -> Self {
        self.reaction = Some(reaction);
        self
    }

    pub fn with_value(mut self, value: Option<f64>) -> Self {
        self.value = value;
        self
    }

    /// Renders the entry as output fields, in [`Self::HEADER`] order.
    ///
    /// Floats keep a trailing `.0` (`6.0`, not `6`).
    pub fn to_record(&self) -> [String; 8] {
        [
            format!("{:?}", self.time),
            self.sensor_id.to_string(),
            self.status.as_str().to_string(),
            self.action.as_str().to_string(),
            self.event.map_or(NULL_MARKER, |e| e.as_str()).to_string(),
            self.sender_id
                .as_ref()
                .map_or_else(|| NULL_MARKER.to_string(), |s| s.to_string()),
            self.reaction.map_or(NULL_MARKER, |r| r.as_str()).to_string(),
            self.value
                .map_or_else(|| NULL_MARKER.to_string(), |v| format!("{:?}", v)),
        ]
    }
}

/// Append-only destination for log entries.
///
/// The protocol only ever appends; ordering is the emission order, which
/// the scheduler guarantees is non-decreasing in time.
pub trait LogSink {
    /// Appends one entry.
    fn append(&mut self, entry: LogEntry);

    /// Number of entries appended so far.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory log owned by a single run.
#[derive(Debug, Clone, Default)]
pub struct MemoryLog {
    entries: Vec<LogEntry>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all entries in emission order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Consumes the log, returning its entries.
    pub fn into_entries(self) -> Vec<LogEntry> {
        self.entries
    }
}

impl LogSink for MemoryLog {
    fn append(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
