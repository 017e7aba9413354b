//! Stage runner - builds a roster into a stage and drives it to the end.

use crate::context::SimContext;
use crate::meters::{MeterAssigner, DEFAULT_MAX_METER};
use crate::roster::RosterConfig;

use orb_core::{RoundReport, StageOutcome};
use orb_env::{OrbError, PerformerId};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Round cap used unless the caller picks another.
pub const DEFAULT_MAX_ROUNDS: u64 = 10_000;

/// Results from running a roster.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Scenario or roster name
    pub scenario: String,

    /// Seed used
    pub seed: u64,

    /// How the run ended
    pub outcome: StageOutcome,

    /// Meter of each performer
    pub meters: BTreeMap<PerformerId, u64>,

    /// Every round, in order
    pub reports: Vec<RoundReport>,
}

impl RunResult {
    pub fn finished(&self) -> bool {
        self.outcome.is_finished()
    }

    pub fn total_rounds(&self) -> u64 {
        self.outcome.rounds()
    }
}

/// Runs rosters on a seeded simulation context.
pub struct StageRunner {
    /// Master seed
    seed: u64,

    /// Safety cap on rounds (`None` = run until done)
    max_rounds: Option<u64>,

    /// Upper bound for randomly drawn meters
    max_meter: u64,

    /// Use one task per performer in the Speak phase
    concurrent: bool,
}

impl StageRunner {
    /// Creates a new runner.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            max_rounds: Some(DEFAULT_MAX_ROUNDS),
            max_meter: DEFAULT_MAX_METER,
            concurrent: false,
        }
    }

    /// Sets the round cap.
    pub fn with_max_rounds(mut self, max_rounds: Option<u64>) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Sets the largest random meter.
    pub fn with_max_meter(mut self, max_meter: u64) -> Self {
        self.max_meter = max_meter;
        self
    }

    /// Switches the Speak phase to concurrent tasks.
    pub fn with_concurrent(mut self, concurrent: bool) -> Self {
        self.concurrent = concurrent;
        self
    }

    /// Runs a roster and returns the result.
    pub fn run(&self, name: &str, config: &RosterConfig) -> Result<RunResult, OrbError> {
        self.run_with(name, config, |_| {})
    }

    /// Runs a roster, handing each round to `on_round` as it completes.
    pub fn run_with<F>(&self, name: &str, config: &RosterConfig, mut on_round: F) -> Result<RunResult, OrbError>
    where
        F: FnMut(&RoundReport),
    {
        info!("Starting {} (seed={})", name, self.seed);

        let context = SimContext::shared(self.seed);
        let mut assigner = MeterAssigner::from_context(context.as_ref(), self.max_meter);
        let parts = config.build(&mut assigner)?;
        let meters = parts.meters();
        for (id, meter) in &meters {
            debug!("  {} meter={}", id, meter);
        }

        let mut stage = parts.into_stage(context);
        let mut reports = Vec::new();
        let mut record = |report: &RoundReport| {
            on_round(report);
            reports.push(report.clone());
        };

        let outcome = if self.concurrent {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(stage.run_concurrent(self.max_rounds, &mut record))?
        } else {
            stage.run_with(self.max_rounds, &mut record)
        };

        match outcome {
            StageOutcome::Finished { rounds } => {
                info!("{} finished after {} rounds", name, rounds);
            }
            StageOutcome::RoundLimit { rounds } => {
                warn!("{} still running after {} rounds, giving up", name, rounds);
            }
            StageOutcome::Aborted { rounds } => {
                warn!("{} aborted after {} rounds", name, rounds);
            }
        }

        Ok(RunResult {
            scenario: name.to_string(),
            seed: self.seed,
            outcome,
            meters,
            reports,
        })
    }
}
