//! Protocol parameters for the PLUM network.

use plum_env::ConfigError;
use serde::{Deserialize, Serialize};

/// Default transmission range between two sensors (km).
pub const TRANSMISSION_RANGE_KM: f64 = 30.0;

/// Approximate P-wave propagation speed (km/s).
pub const P_WAVE_SPEED_KM_PER_S: f64 = 6.0;

/// Approximate S-wave propagation speed (km/s).
pub const S_WAVE_SPEED_KM_PER_S: f64 = 3.5;

/// Fixed link latency for every delivered message (time units).
pub const TRANSMISSION_DELAY: f64 = 0.05;

/// How long a sensor waits for a confirming detection (time units).
pub const WAITING_WINDOW: f64 = 5.0;

/// Protocol configuration shared by every sensor of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolConfig {
    /// Maximum sensor-to-sensor distance for message delivery (km)
    pub transmission_range_km: f64,

    /// P-wave speed used for arrival times (km/s)
    pub p_wave_speed_km_s: f64,

    /// S-wave speed; arrival times are computed but drive no behavior (km/s)
    pub s_wave_speed_km_s: f64,

    /// Link latency applied to every broadcast delivery
    pub transmission_delay: f64,

    /// Confirmation window after entering Detection
    pub waiting_window: f64,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            transmission_range_km: TRANSMISSION_RANGE_KM,
            p_wave_speed_km_s: P_WAVE_SPEED_KM_PER_S,
            s_wave_speed_km_s: S_WAVE_SPEED_KM_PER_S,
            transmission_delay: TRANSMISSION_DELAY,
            waiting_window: WAITING_WINDOW,
        }
    }
}

impl ProtocolConfig {
    /// Sets the transmission range.
    pub fn with_range_km(mut self, km: f64) -> Self {
        self.transmission_range_km = km;
        self
    }

    /// Sets the P-wave speed.
    pub fn with_p_wave_speed(mut self, km_s: f64) -> Self {
        self.p_wave_speed_km_s = km_s;
        self
    }

    /// Sets the S-wave speed.
    pub fn with_s_wave_speed(mut self, km_s: f64) -> Self {
        self.s_wave_speed_km_s = km_s;
        self
    }

    /// Sets the transmission delay.
    pub fn with_transmission_delay(mut self, delay: f64) -> Self {
        self.transmission_delay = delay;
        self
    }

    /// Sets the confirmation waiting window.
    pub fn with_waiting_window(mut self, window: f64) -> Self {
        self.waiting_window = window;
        self
    }

    /// Checks every parameter is in its valid domain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.transmission_range_km.is_finite() && self.transmission_range_km >= 0.0) {
            return Err(ConfigError::parameter(
                "transmission_range_km",
                self.transmission_range_km,
                "must be finite and non-negative",
            ));
        }
        if !(self.p_wave_speed_km_s.is_finite() && self.p_wave_speed_km_s > 0.0) {
            return Err(ConfigError::parameter(
                "p_wave_speed_km_s",
                self.p_wave_speed_km_s,
                "must be finite and positive",
            ));
        }
        if !(self.s_wave_speed_km_s.is_finite() && self.s_wave_speed_km_s > 0.0) {
            return Err(ConfigError::parameter(
                "s_wave_speed_km_s",
                self.s_wave_speed_km_s,
                "must be finite and positive",
            ));
        }
        if !(self.transmission_delay.is_finite() && self.transmission_delay >= 0.0) {
            return Err(ConfigError::parameter(
                "transmission_delay",
                self.transmission_delay,
                "must be finite and non-negative",
            ));
        }
        if !(self.waiting_window.is_finite() && self.waiting_window >= 0.0) {
            return Err(ConfigError::parameter(
                "waiting_window",
                self.waiting_window,
                "must be finite and non-negative",
            ));
        }
        Ok(())
    }
}
