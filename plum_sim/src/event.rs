//! Events driving a simulation run.

use plum_core::Message;

/// Index of a sensor in the run's sensor table.
pub type SensorIndex = usize;

/// Something that happens to one sensor at a scheduled instant.
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    /// The P-wave front reaches the sensor
    WaveArrival { sensor: SensorIndex },

    /// A broadcast message reaches the sensor
    Delivery {
        sensor: SensorIndex,
        message: Message,
    },

    /// The sensor's confirmation window is over
    ConfirmationTimeout { sensor: SensorIndex },
}

impl SimEvent {
    /// The sensor this event is addressed to.
    pub fn sensor(&self) -> SensorIndex {
        match self {
            SimEvent::WaveArrival { sensor }
            | SimEvent::Delivery { sensor, .. }
            | SimEvent::ConfirmationTimeout { sensor } => *sensor,
        }
    }

    /// Short label for tracing.
    pub fn name(&self) -> &'static str {
        match self {
            SimEvent::WaveArrival { .. } => "wave_arrival",
            SimEvent::Delivery { .. } => "delivery",
            SimEvent::ConfirmationTimeout { .. } => "confirmation_timeout",
        }
    }
}
