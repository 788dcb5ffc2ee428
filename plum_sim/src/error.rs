//! Error type for simulation runs.

use crate::scheduler::SchedulerError;
use plum_env::ConfigError;
use thiserror::Error;

/// Errors that abort a simulation run.
#[derive(Debug, Error)]
pub enum SimError {
    /// Inputs or parameters rejected before the run started
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An event could not be scheduled
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),
}
