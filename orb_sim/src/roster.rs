//! Static roster and topology configuration.
//!
//! Rosters are plain JSON:
//!
//! ```json
//! {
//!   "performers": [
//!     { "id": "tom", "script": ["one", "two"], "meter": 3 },
//!     { "id": "sue", "script": ["one", "two"] }
//!   ],
//!   "links": [
//!     { "from": "tom", "to": "sue", "slot": "left" },
//!     { "from": "sue", "to": "tom", "slot": "right" }
//!   ]
//! }
//! ```
//!
//! A performer without a meter gets a random one at build time.

use crate::meters::MeterAssigner;

use orb_core::{Address, MailRoom, Meter, Performer, Roster, Router, Script, ScriptDb, Slot, Stage};
use orb_env::{OrbError, PerformerId, StageContext};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// One performer entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformerConfig {
    pub id: PerformerId,

    #[serde(default)]
    pub script: Vec<String>,

    /// Fixed meter; `None` = assign randomly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meter: Option<u64>,
}

/// One edge of the topology: `from`'s words land in `to`'s `slot`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkConfig {
    pub from: PerformerId,
    pub to: PerformerId,
    pub slot: Slot,
}

/// A full roster: who performs, in what order, and who hears whom.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Performers in speaking order
    pub performers: Vec<PerformerConfig>,

    #[serde(default)]
    pub links: Vec<LinkConfig>,
}

/// Everything a stage needs, built from a roster.
pub struct StageParts {
    pub roster: Roster,
    pub router: Router,
    pub mailroom: MailRoom,
    pub scripts: ScriptDb,
}

impl StageParts {
    pub fn into_stage<C: StageContext>(self, context: Arc<C>) -> Stage<C> {
        Stage::new(context, self.roster, self.router, self.mailroom, self.scripts)
    }

    /// Meter of every performer, for reporting.
    pub fn meters(&self) -> BTreeMap<PerformerId, u64> {
        self.roster
            .order()
            .iter()
            .filter_map(|id| self.roster.get(id).map(|p| (id.clone(), p.meter.get())))
            .collect()
    }
}

impl RosterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a performer (builder style).
    pub fn performer<I, S>(mut self, id: &str, script: I, meter: Option<u64>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.performers.push(PerformerConfig {
            id: PerformerId::from(id),
            script: script.into_iter().map(Into::into).collect(),
            meter,
        });
        self
    }

    /// Adds a link (builder style).
    pub fn link(mut self, from: &str, to: &str, slot: Slot) -> Self {
        self.links.push(LinkConfig {
            from: PerformerId::from(from),
            to: PerformerId::from(to),
            slot,
        });
        self
    }

    /// Parses a roster from JSON.
    pub fn from_json(json: &str) -> Result<Self, OrbError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a roster file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, OrbError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Rejects duplicate ids and zero meters.
    ///
    /// Links to or from unknown performers are only warned about; the
    /// stage skips them at run time.
    pub fn validate(&self) -> Result<(), OrbError> {
        let mut seen = HashSet::new();
        for performer in &self.performers {
            if !seen.insert(&performer.id) {
                return Err(OrbError::DuplicatePerformer(performer.id.to_string()));
            }
            if performer.meter == Some(0) {
                return Err(OrbError::invalid_meter(&performer.id, 0));
            }
        }

        for link in &self.links {
            if !seen.contains(&link.from) {
                warn!("link from unknown performer {} will never fire", link.from);
            }
            if !seen.contains(&link.to) {
                warn!("link to unknown performer {} will be dropped", link.to);
            }
        }

        Ok(())
    }

    /// Builds stage parts, drawing missing meters from `meters`.
    ///
    /// Meters are drawn in roster order so a seed always maps to the
    /// same cadences.
    pub fn build(&self, meters: &mut MeterAssigner) -> Result<StageParts, OrbError> {
        self.validate()?;

        let mut roster = Roster::new();
        let mut scripts = ScriptDb::new();
        for entry in &self.performers {
            let meter = match entry.meter {
                Some(value) => Meter::new(value).ok_or_else(|| OrbError::invalid_meter(&entry.id, value))?,
                None => meters.assign(),
            };
            roster.push(Performer::new(entry.id.clone(), meter));
            scripts.insert(entry.id.clone(), Script::new(entry.script.iter().cloned()));
        }

        let mut router = Router::new();
        for link in &self.links {
            router.connect(link.from.clone(), Address::new(link.to.clone(), link.slot));
        }

        let mailroom = MailRoom::for_performers(roster.order().iter());

        Ok(StageParts {
            roster,
            router,
            mailroom,
            scripts,
        })
    }

    /// Ids in speaking order.
    pub fn ids(&self) -> Vec<PerformerId> {
        self.performers.iter().map(|p| p.id.clone()).collect()
    }
}
