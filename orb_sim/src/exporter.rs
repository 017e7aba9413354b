//! JSON exporter for run transcripts.
//!
//! Exports every round of a run so external tools can replay or chart it.

use orb_core::{RoundReport, StageOutcome, Word};
use orb_env::{OrbError, PerformerId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;

/// A single round of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundFrame {
    /// Round number
    pub round: u64,

    /// Who spoke, and what (`null` = Done)
    pub spoken: BTreeMap<PerformerId, Word>,

    /// Words delivered to mailboxes this round
    pub delivered: usize,
}

impl From<&RoundReport> for RoundFrame {
    fn from(report: &RoundReport) -> Self {
        Self {
            round: report.round,
            spoken: report
                .sent
                .iter()
                .map(|m| (m.sender.clone(), m.word.clone()))
                .collect(),
            delivered: report.delivered,
        }
    }
}

/// Complete run export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunExport {
    /// Scenario or roster file name
    pub scenario: String,

    /// Seed used
    pub seed: u64,

    /// Meter of each performer
    pub meters: BTreeMap<PerformerId, u64>,

    /// All rounds
    pub rounds: Vec<RoundFrame>,

    /// True if every script ran out
    pub finished: bool,

    /// Rounds executed
    pub total_rounds: u64,
}

impl RunExport {
    /// Creates a new export container.
    pub fn new(scenario: &str, seed: u64) -> Self {
        Self {
            scenario: scenario.to_string(),
            seed,
            meters: BTreeMap::new(),
            rounds: Vec::new(),
            finished: false,
            total_rounds: 0,
        }
    }

    pub fn with_meters(mut self, meters: BTreeMap<PerformerId, u64>) -> Self {
        self.meters = meters;
        self
    }

    /// Adds a round.
    pub fn add_round(&mut self, report: &RoundReport) {
        self.total_rounds = report.round;
        self.rounds.push(RoundFrame::from(report));
    }

    /// Finalizes the export.
    pub fn finalize(&mut self, outcome: StageOutcome) {
        self.finished = outcome.is_finished();
        self.total_rounds = outcome.rounds();
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: &str) -> Result<(), OrbError> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}
