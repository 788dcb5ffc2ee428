//! Range-limited broadcast network.
//!
//! Links are implicit: two sensors can talk iff their great-circle distance
//! is within the transmission range. The neighbor lists are computed once
//! when the network is built (sensors never move) and every delivery takes
//! the same fixed latency, regardless of distance.

use crate::event::{SensorIndex, SimEvent};
use crate::scheduler::{Scheduler, SchedulerError};
use plum_core::{Message, ProtocolConfig};
use plum_env::{GeoPoint, SensorId};
use std::collections::BTreeMap;
use tracing::trace;

/// The static network of one run.
pub struct Network {
    ids: Vec<SensorId>,
    locations: Vec<GeoPoint>,

    /// Per-sensor neighbor indices, in sensor-table order
    neighbors: Vec<Vec<SensorIndex>>,

    /// Latency applied to every delivery
    transmission_delay: f64,
}

impl Network {
    /// Builds the neighbor lists for `nodes` (O(n²), once per run).
    ///
    /// Each pair is measured once, so reachability is symmetric.
    pub fn new(nodes: &[(SensorId, GeoPoint)], config: &ProtocolConfig) -> Self {
        let range_km = config.transmission_range_km;
        let mut neighbors: Vec<Vec<SensorIndex>> = vec![Vec::new(); nodes.len()];
        for (i, (_, here)) in nodes.iter().enumerate() {
            for (j, (_, there)) in nodes.iter().enumerate().skip(i + 1) {
                if here.distance_km(there) <= range_km {
                    // pushes arrive in ascending index order for both lists
                    neighbors[i].push(j);
                    neighbors[j].push(i);
                }
            }
        }

        Self {
            ids: nodes.iter().map(|(id, _)| id.clone()).collect(),
            locations: nodes.iter().map(|(_, location)| *location).collect(),
            neighbors,
            transmission_delay: config.transmission_delay,
        }
    }

    /// Number of sensors in the network.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Indices of the sensors within range of `sensor`.
    pub fn neighbors(&self, sensor: SensorIndex) -> &[SensorIndex] {
        self.neighbors.get(sensor).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns true if `a` and `b` can reach each other.
    pub fn in_range(&self, a: SensorIndex, b: SensorIndex) -> bool {
        self.neighbors(a).contains(&b)
    }

    /// The known-sensor table (id → location) handed to a sensor.
    pub fn known_sensors(&self, sensor: SensorIndex) -> BTreeMap<SensorId, GeoPoint> {
        self.neighbors(sensor)
            .iter()
            .map(|&j| (self.ids[j].clone(), self.locations[j]))
            .collect()
    }

    /// Schedules delivery of `message` to every neighbor of `sender`.
    ///
    /// Receivers are visited in sensor-table order so equal-time deliveries
    /// are dispatched deterministically. Returns the number of deliveries.
    pub fn broadcast(
        &self,
        sender: SensorIndex,
        message: Message,
        scheduler: &mut Scheduler<SimEvent>,
    ) -> Result<usize, SchedulerError> {
        let receivers = self.neighbors(sender);
        for &receiver in receivers {
            scheduler.schedule(
                self.transmission_delay,
                SimEvent::Delivery {
                    sensor: receiver,
                    message: message.clone(),
                },
            )?;
        }
        trace!(
            sender = %message.sender,
            receivers = receivers.len(),
            "Broadcast scheduled"
        );
        Ok(receivers.len())
    }
}
