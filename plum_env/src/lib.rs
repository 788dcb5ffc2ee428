//! PLUM Environment Layer
//!
//! Everything the early-warning protocol needs from "the outside world",
//! kept separate so that the protocol crate stays a pure state machine:
//!
//! - **Identity & time**: [`SensorId`] and the virtual clock value [`SimTime`]
//! - **Geometry**: [`GeoPoint`] with great-circle distance in kilometers
//! - **Randomness**: the [`Sampler`] trait and its seeded implementation
//! - **Errors**: [`ConfigError`] for malformed inputs and parameters
//!
//! # Determinism
//!
//! All entropy in a simulation run is drawn from a [`SeededSampler`], so a
//! run is fully reproducible from its 64-bit seed.
//!
//! # Example
//!
//! ```
//! use plum_env::{GeoPoint, Sampler, SeededSampler};
//!
//! let a = GeoPoint::new(0.0, 0.0);
//! let b = GeoPoint::new(0.0, 0.1);
//! assert!(a.distance_km(&b) < 30.0);
//!
//! let mut sampler = SeededSampler::new(42);
//! let value = sampler.peak_displacement();
//! assert!((0.1..=10.0).contains(&value));
//! ```

mod context;
mod error;
mod geometry;
mod sampler;
mod types;

pub use context::Sampler;
pub use error::ConfigError;
pub use geometry::{GeoPoint, EARTH_RADIUS_KM};
pub use sampler::SeededSampler;
pub use types::{SensorId, SimTime};
