//! PLUM Discrete-Event Simulation Harness
//!
//! Runs the early-warning protocol of `plum_core` over a simulated sensor
//! network, entirely in virtual time.
//!
//! # Core Principle: One Serialization Point
//!
//! Every source of ordering and entropy is controlled:
//! - **Time**: a virtual clock that jumps from event to event
//! - **Ordering**: events at the same instant run in scheduling order
//! - **Network**: fixed-latency broadcast, geofenced by transmission range
//! - **Randomness**: all draws come from one seed per scenario
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     ScenarioRunner                        │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │ Scheduler (virtual clock + (time, seq) queue)      │  │
//! │  └────────────────────────────────────────────────────┘  │
//! │       │ WaveArrival / Delivery / ConfirmationTimeout      │
//! │  ┌────▼────┐   Broadcast   ┌─────────┐                    │
//! │  │ Sensor  │──────────────►│ Network │──► Delivery events │
//! │  └────┬────┘               └─────────┘                    │
//! │       │ Log                                                │
//! │  ┌────▼──────────┐                                         │
//! │  │   LogSink     │──► CSV / JSON exporters                 │
//! │  └───────────────┘                                         │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use plum_sim::{ScenarioRunner, Site};
//!
//! let sensors = vec![Site::new("S01", 0.0, 0.0), Site::new("S02", 0.0, 0.1)];
//! let earthquakes = vec![Site::new("EQ1", 0.0, -0.05)];
//!
//! let results = ScenarioRunner::default()
//!     .run_all(&earthquakes, &sensors)
//!     .unwrap();
//! assert_eq!(results[0].report.stats.alerts, 2);
//! ```

mod error;
mod event;
pub mod exporter;
pub mod input;
mod network;
pub mod runner;
mod scheduler;

pub use error::SimError;
pub use event::{SensorIndex, SimEvent};
pub use exporter::{write_log_csv, write_log_csv_file, SimExport};
pub use input::{load_earthquakes_csv, load_sensors_csv, Site};
pub use network::Network;
pub use runner::{
    RunConfig, ScenarioReport, ScenarioResult, ScenarioRunner, ScenarioStats, SensorOutcome,
};
pub use scheduler::{Scheduler, SchedulerError};
