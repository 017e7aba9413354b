//! Built-in rosters.

use crate::roster::RosterConfig;
use orb_core::Slot;
use orb_env::OrbError;

const COUNT_TO_TEN: [&str; 10] = [
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
];

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioId {
    /// Six performers counting to ten, random meters, two inputs each
    Ensemble,

    /// Two performers filling both of each other's slots
    Duet,

    /// Three performers in a one-way ring, left slots only
    Ring,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![ScenarioId::Ensemble, ScenarioId::Duet, ScenarioId::Ring]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::Ensemble => "ensemble",
            ScenarioId::Duet => "duet",
            ScenarioId::Ring => "ring",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::Ensemble => "6 performers count to ten, meters drawn from 1..=20",
            ScenarioId::Duet => "2 performers in lock-step, finishes in 3 rounds",
            ScenarioId::Ring => "3 performers echo around a ring and never agree",
        }
    }

    /// Builds the scenario's roster.
    pub fn roster(&self) -> RosterConfig {
        match self {
            ScenarioId::Ensemble => ensemble(),
            ScenarioId::Duet => RosterConfig::new()
                .performer("a", ["x", "y"], Some(1))
                .performer("b", ["x", "y"], Some(1))
                .link("a", "b", Slot::Left)
                .link("a", "b", Slot::Right)
                .link("b", "a", Slot::Left)
                .link("b", "a", Slot::Right),
            ScenarioId::Ring => RosterConfig::new()
                .performer("a", ["x", "y"], Some(1))
                .performer("b", ["x", "y"], Some(1))
                .performer("c", ["x", "y"], Some(1))
                .link("a", "b", Slot::Left)
                .link("b", "c", Slot::Left)
                .link("c", "a", Slot::Left),
        }
    }
}

/// Every performer hears exactly two others, one per slot.
fn ensemble() -> RosterConfig {
    let names = ["tom", "dick", "harry", "mary", "sue", "thanos"];
    let mut config = RosterConfig::new();
    for name in names {
        config = config.performer(name, COUNT_TO_TEN, None);
    }

    config
        .link("tom", "sue", Slot::Left)
        .link("tom", "thanos", Slot::Right)
        .link("dick", "harry", Slot::Left)
        .link("dick", "tom", Slot::Right)
        .link("harry", "tom", Slot::Left)
        .link("harry", "dick", Slot::Right)
        .link("mary", "dick", Slot::Left)
        .link("mary", "thanos", Slot::Left)
        .link("sue", "harry", Slot::Right)
        .link("sue", "mary", Slot::Right)
        .link("thanos", "mary", Slot::Left)
        .link("thanos", "sue", Slot::Right)
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = OrbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ensemble" | "six" => Ok(ScenarioId::Ensemble),
            "duet" | "pair" => Ok(ScenarioId::Duet),
            "ring" => Ok(ScenarioId::Ring),
            _ => Err(OrbError::UnknownScenario(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        for scenario in ScenarioId::all() {
            assert_eq!(scenario.name().parse::<ScenarioId>().unwrap(), scenario);
        }
        assert_eq!("DUET".parse::<ScenarioId>().unwrap(), ScenarioId::Duet);
        assert!(matches!("chorus".parse::<ScenarioId>(), Err(OrbError::UnknownScenario(_))));
    }

    #[test]
    fn test_builtin_rosters_validate() {
        for scenario in ScenarioId::all() {
            assert!(scenario.roster().validate().is_ok(), "{} invalid", scenario);
        }
    }

    #[test]
    fn test_ensemble_fills_both_slots_of_everyone() {
        let config = ScenarioId::Ensemble.roster();
        for id in config.ids() {
            let left = config.links.iter().filter(|l| l.to == id && l.slot == Slot::Left).count();
            let right = config.links.iter().filter(|l| l.to == id && l.slot == Slot::Right).count();
            assert!(left >= 1 && right >= 1, "{} is missing an input", id);
        }
    }
}
