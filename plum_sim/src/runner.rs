//! Scenario runner - one isolated simulation per earthquake.

use crate::error::SimError;
use crate::event::SimEvent;
use crate::input::{validate_sites, Site, EARTHQUAKE_TABLE, SENSOR_TABLE};
use crate::network::Network;
use crate::scheduler::Scheduler;

use plum_core::{
    CorrelationId, LogAction, LogEntry, LogSink, MemoryLog, ProtocolConfig, Reaction, Sensor,
    SensorAction, SensorState,
};
use plum_env::{ConfigError, GeoPoint, Sampler, SeededSampler, SensorId, SimTime};
use serde::Serialize;
use tracing::{debug, info, trace};

/// Virtual time simulated per earthquake.
pub const SIMULATION_DURATION: f64 = 120.0;

/// Miss probability used by noisy runs.
pub const MISS_PROBABILITY: f64 = 0.2;

/// False-detection probability used by noisy runs.
pub const FALSE_DETECTION_PROBABILITY: f64 = 0.1;

/// Per-run settings, independent of the protocol itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunConfig {
    /// Virtual time to simulate per scenario
    pub duration: f64,

    /// Master seed; scenario `n` derives its own stream from it
    pub seed: u64,

    /// Chance that a sensor misses its P-wave entirely
    pub miss_probability: f64,

    /// Chance that a sensor reports one spurious detection
    pub false_detection_probability: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            duration: SIMULATION_DURATION,
            seed: 42,
            miss_probability: 0.0,
            false_detection_probability: 0.0,
        }
    }
}

impl RunConfig {
    /// Sets the simulated duration.
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    /// Sets the master seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the miss probability.
    pub fn with_miss_probability(mut self, p: f64) -> Self {
        self.miss_probability = p;
        self
    }

    /// Sets the false-detection probability.
    pub fn with_false_detection_probability(mut self, p: f64) -> Self {
        self.false_detection_probability = p;
        self
    }

    /// Enables detection noise with the standard probabilities.
    pub fn noisy(self) -> Self {
        self.with_miss_probability(MISS_PROBABILITY)
            .with_false_detection_probability(FALSE_DETECTION_PROBABILITY)
    }

    /// Checks every parameter is in its valid domain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.duration.is_finite() && self.duration >= 0.0) {
            return Err(ConfigError::parameter(
                "duration",
                self.duration,
                "must be finite and non-negative",
            ));
        }
        for (name, p) in [
            ("miss_probability", self.miss_probability),
            ("false_detection_probability", self.false_detection_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::parameter(name, p, "must be within [0, 1]"));
            }
        }
        Ok(())
    }
}

/// Counters collected during one scenario.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScenarioStats {
    /// Events dispatched by the scheduler
    pub events_processed: u64,

    /// Local wave arrivals handled (including spurious ones)
    pub wave_arrivals: u64,

    /// Arrivals dropped by the miss probability
    pub missed_arrivals: u64,

    /// Spurious arrivals injected
    pub false_detections: u64,

    /// Broadcasts sent
    pub broadcasts: u64,

    /// Messages delivered to a receiver
    pub messages_delivered: u64,

    /// Sensors that raised an alert
    pub alerts: u64,

    /// Detections cancelled by timeout
    pub cancellations: u64,

    /// Deliveries ignored by alerted sensors
    pub ignored_deliveries: u64,

    /// Virtual time when the run stopped
    pub final_time_secs: f64,
}

impl ScenarioStats {
    fn record(&mut self, entry: &LogEntry) {
        match entry.action {
            LogAction::ChangeStatus => self.alerts += 1,
            LogAction::EventCancelation => self.cancellations += 1,
            _ => {}
        }
        if entry.reaction == Some(Reaction::Ignore) {
            self.ignored_deliveries += 1;
        }
    }
}

/// Final state of one sensor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorOutcome {
    pub id: SensorId,
    pub state: SensorState,
    pub correlation_id: Option<CorrelationId>,
}

/// Everything about a scenario except its log.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    /// Earthquake id the run is tagged with
    pub eq_id: String,

    /// Seed of the run's own sampler
    pub seed: u64,

    pub outcomes: Vec<SensorOutcome>,
    pub stats: ScenarioStats,
}

impl ScenarioReport {
    /// Looks up the outcome of a sensor by id.
    pub fn outcome(&self, id: &str) -> Option<&SensorOutcome> {
        self.outcomes.iter().find(|o| o.id.as_str() == id)
    }
}

/// A finished scenario with its in-memory log.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    #[serde(flatten)]
    pub report: ScenarioReport,
    pub entries: Vec<LogEntry>,
}

/// Runs earthquake scenarios over a fixed sensor table.
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    protocol: ProtocolConfig,
    run: RunConfig,
}

impl ScenarioRunner {
    /// Creates a runner.
    pub fn new(protocol: ProtocolConfig, run: RunConfig) -> Self {
        Self { protocol, run }
    }

    pub fn protocol(&self) -> &ProtocolConfig {
        &self.protocol
    }

    pub fn run_config(&self) -> &RunConfig {
        &self.run
    }

    /// Runs every earthquake in order, each on a fresh network.
    ///
    /// Both tables are validated before the first scenario starts.
    pub fn run_all(
        &self,
        earthquakes: &[Site],
        sensors: &[Site],
    ) -> Result<Vec<ScenarioResult>, SimError> {
        self.validate(sensors)?;
        validate_sites(EARTHQUAKE_TABLE, earthquakes)?;

        earthquakes
            .iter()
            .enumerate()
            .map(|(index, earthquake)| self.run(index as u64, earthquake, sensors))
            .collect()
    }

    /// Runs one scenario into a fresh in-memory log.
    pub fn run(
        &self,
        index: u64,
        earthquake: &Site,
        sensors: &[Site],
    ) -> Result<ScenarioResult, SimError> {
        let mut log = MemoryLog::new();
        let report = self.run_with_sink(index, earthquake, sensors, &mut log)?;
        Ok(ScenarioResult {
            report,
            entries: log.into_entries(),
        })
    }

    /// Runs one scenario, appending every log entry to `sink`.
    ///
    /// `index` selects the scenario's random stream, so results do not
    /// depend on which other scenarios ran before.
    pub fn run_with_sink<L: LogSink>(
        &self,
        index: u64,
        earthquake: &Site,
        sensors: &[Site],
        sink: &mut L,
    ) -> Result<ScenarioReport, SimError> {
        self.validate(sensors)?;
        validate_sites(EARTHQUAKE_TABLE, std::slice::from_ref(earthquake))?;

        let mut sampler = SeededSampler::for_scenario(self.run.seed, index);
        info!(
            "Starting scenario {} ({} sensors, seed={})",
            earthquake.id,
            sensors.len(),
            sampler.seed()
        );

        let nodes: Vec<(SensorId, GeoPoint)> = sensors
            .iter()
            .map(|site| (SensorId::new(site.id.clone()), site.location))
            .collect();
        let network = Network::new(&nodes, &self.protocol);
        let mut actors: Vec<Sensor> = nodes
            .iter()
            .enumerate()
            .map(|(i, (id, location))| {
                Sensor::new(id.clone(), *location).with_known_sensors(network.known_sensors(i))
            })
            .collect();

        let mut stats = ScenarioStats::default();
        let mut scheduler = Scheduler::new();
        self.schedule_arrivals(&actors, earthquake.location, &mut sampler, &mut scheduler, &mut stats)?;

        let protocol = &self.protocol;
        let dispatched = scheduler.run(
            SimTime(self.run.duration),
            |scheduler, now, event| -> Result<(), SimError> {
                trace!(time = %now, event = event.name(), sensor = event.sensor(), "Dispatch");
                let sensor = event.sensor();

                let actions = match event {
                    SimEvent::WaveArrival { .. } => {
                        stats.wave_arrivals += 1;
                        actors[sensor].on_wave_arrival(now, &mut sampler)
                    }
                    SimEvent::Delivery { message, .. } => {
                        stats.messages_delivered += 1;
                        actors[sensor].on_message(now, &message)
                    }
                    SimEvent::ConfirmationTimeout { .. } => actors[sensor].on_confirmation_timeout(now),
                };

                for action in actions {
                    match action {
                        SensorAction::Broadcast(message) => {
                            stats.broadcasts += 1;
                            network.broadcast(sensor, message, scheduler)?;
                        }
                        SensorAction::ArmConfirmationTimer => {
                            scheduler.schedule(
                                protocol.waiting_window,
                                SimEvent::ConfirmationTimeout { sensor },
                            )?;
                        }
                        SensorAction::Log(entry) => {
                            stats.record(&entry);
                            sink.append(entry);
                        }
                    }
                }
                Ok(())
            },
        )?;

        stats.events_processed = dispatched;
        stats.final_time_secs = scheduler.now().as_secs();

        info!(
            "Finished scenario {}: {} events, {} alerts, {} cancellations, {} log entries",
            earthquake.id,
            stats.events_processed,
            stats.alerts,
            stats.cancellations,
            sink.len()
        );

        Ok(ScenarioReport {
            eq_id: earthquake.id.clone(),
            seed: sampler.seed(),
            outcomes: actors
                .iter()
                .map(|actor| SensorOutcome {
                    id: actor.id().clone(),
                    state: actor.state(),
                    correlation_id: actor.correlation_id().cloned(),
                })
                .collect(),
            stats,
        })
    }

    fn validate(&self, sensors: &[Site]) -> Result<(), ConfigError> {
        self.protocol.validate()?;
        self.run.validate()?;
        validate_sites(SENSOR_TABLE, sensors)
    }

    /// Schedules one P-wave arrival per sensor, in table order, then any
    /// spurious detections.
    fn schedule_arrivals(
        &self,
        actors: &[Sensor],
        epicenter: GeoPoint,
        sampler: &mut SeededSampler,
        scheduler: &mut Scheduler<SimEvent>,
        stats: &mut ScenarioStats,
    ) -> Result<(), SimError> {
        for (sensor, actor) in actors.iter().enumerate() {
            let distance_km = actor.location().distance_km(&epicenter);
            let p_arrival = distance_km / self.protocol.p_wave_speed_km_s;
            // S-wave timing is informational only
            let s_arrival = distance_km / self.protocol.s_wave_speed_km_s;
            trace!(sensor = %actor.id(), distance_km, p_arrival, s_arrival, "Wave travel times");

            // Draw only when noise is on, so noiseless runs keep the same stream.
            if self.run.miss_probability > 0.0 && sampler.chance(self.run.miss_probability) {
                debug!(sensor = %actor.id(), "P-wave missed");
                stats.missed_arrivals += 1;
                continue;
            }
            scheduler.schedule(p_arrival, SimEvent::WaveArrival { sensor })?;
        }

        if self.run.false_detection_probability > 0.0 {
            for (sensor, actor) in actors.iter().enumerate() {
                if sampler.chance(self.run.false_detection_probability) {
                    let at = sampler.uniform(0.0, self.run.duration);
                    debug!(sensor = %actor.id(), at, "Spurious detection injected");
                    stats.false_detections += 1;
                    scheduler.schedule(at, SimEvent::WaveArrival { sensor })?;
                }
            }
        }

        Ok(())
    }
}
