//! Messages exchanged between sensors.

use plum_env::{SensorId, SimTime};
use serde::{Deserialize, Serialize};

/// Kind of a network message.
///
/// Only detection notices are exchanged; the alert itself is decided
/// locally by every receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    /// "I saw a P-wave at `time`"
    Detection,
}

/// Immutable broadcast message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub kind: MessageKind,

    /// Sensor that produced the message
    pub sender: SensorId,

    /// Virtual time of the sender's detection
    pub time: SimTime,

    /// Peak displacement measured by the sender (cm), if it has one
    pub displacement: Option<f64>,
}

impl Message {
    /// Creates a detection message.
    pub fn detection(sender: SensorId, time: SimTime, displacement: Option<f64>) -> Self {
        Self {
            kind: MessageKind::Detection,
            sender,
            time,
            displacement,
        }
    }
}
