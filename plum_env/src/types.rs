//! Common types for the PLUM environment layer.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::ops::Add;

/// Unique identifier for a sensor in the network.
///
/// Ids come straight from the sensor table, so they are opaque strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SensorId(pub String);

impl SensorId {
    /// Creates a SensorId from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SensorId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SensorId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for SensorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A point on the virtual clock, in simulation time units (seconds).
///
/// Totally ordered via [`f64::total_cmp`] so it can key a priority queue.
/// Construction never checks finiteness; the scheduler rejects bad delays
/// before they become times.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime(pub f64);

impl SimTime {
    /// Virtual time zero (start of every run).
    pub const ZERO: SimTime = SimTime(0.0);

    /// Returns the time in seconds.
    pub fn as_secs(&self) -> f64 {
        self.0
    }

    /// Returns the time rounded to 4 decimals, as written to the event log.
    pub fn rounded(&self) -> f64 {
        (self.0 * 10_000.0).round() / 10_000.0
    }
}

impl PartialEq for SimTime {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SimTime {}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Add<f64> for SimTime {
    type Output = SimTime;

    fn add(self, delay: f64) -> SimTime {
        SimTime(self.0 + delay)
    }
}

impl std::fmt::Display for SimTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}s", self.0)
    }
}
