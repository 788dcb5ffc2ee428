//! PLUM Core - the early-warning protocol
//!
//! Each sensor runs a two-detection confirmation rule:
//! 1. **Detect**: a local P-wave or a neighbor's detection moves the sensor
//!    from `Observation` to `Detection`
//! 2. **Confirm**: a second detection within the waiting window raises the
//!    alert and fixes the event's correlation id
//! 3. **Cancel**: without confirmation the sensor falls back to `Observation`
//!
//! The sensor is a pure state machine; the simulation harness in `plum_sim`
//! delivers its stimuli and executes the [`SensorAction`]s it returns.

pub mod config;
pub mod correlation;
pub mod log;
pub mod message;
pub mod sensor;

// Re-export key types for convenience
pub use config::ProtocolConfig;
pub use correlation::{
    CorrelationId, CorrelationParseError, CorrelationParts, DEFAULT_SENSOR_ID_LEN,
};
pub use log::{LogAction, LogEntry, LogEvent, LogSink, MemoryLog, Reaction, NULL_MARKER};
pub use message::{Message, MessageKind};
pub use sensor::{DetectionRecord, Sensor, SensorAction, SensorState};
