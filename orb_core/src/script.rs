//! Words, scripts and the script database.

use orb_env::PerformerId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// A single spoken token.
///
/// `Done` is the exhaustion sentinel. It is never stored in a script and
/// serializes as `null` so that it cannot collide with a real line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Word {
    Line(String),
    Done,
}

impl Word {
    pub fn line(text: impl Into<String>) -> Self {
        Word::Line(text.into())
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Word::Done)
    }
}

impl From<Option<String>> for Word {
    fn from(value: Option<String>) -> Self {
        value.map_or(Word::Done, Word::Line)
    }
}

impl From<Word> for Option<String> {
    fn from(word: Word) -> Self {
        match word {
            Word::Line(text) => Some(text),
            Word::Done => None,
        }
    }
}

impl std::fmt::Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Word::Line(text) => f.write_str(text),
            Word::Done => f.write_str("DONE"),
        }
    }
}

/// The lines a performer still wants to say, front first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    lines: VecDeque<String>,
}

impl Script {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// The line at the front, or `Done` once exhausted.
    pub fn current(&self) -> Word {
        self.lines
            .front()
            .map_or(Word::Done, |line| Word::Line(line.clone()))
    }

    /// Drops the front line. Advancing an exhausted script does nothing.
    pub fn advance(&mut self) {
        self.lines.pop_front();
    }

    pub fn is_done(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines left, the current one included.
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

/// Every performer's script.
#[derive(Debug, Clone, Default)]
pub struct ScriptDb {
    scripts: HashMap<PerformerId, Script>,
}

impl ScriptDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: PerformerId, script: Script) {
        self.scripts.insert(id, script);
    }

    pub fn get(&self, id: &PerformerId) -> Option<&Script> {
        self.scripts.get(id)
    }

    pub fn get_mut(&mut self, id: &PerformerId) -> Option<&mut Script> {
        self.scripts.get_mut(id)
    }

    pub fn contains(&self, id: &PerformerId) -> bool {
        self.scripts.contains_key(id)
    }

    /// Takes a script out for exclusive use (concurrent speak phase).
    pub(crate) fn take(&mut self, id: &PerformerId) -> Option<Script> {
        self.scripts.remove(id)
    }

    /// The run's termination predicate.
    pub fn all_done(&self) -> bool {
        self.scripts.values().all(Script::is_done)
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}

impl FromIterator<(PerformerId, Script)> for ScriptDb {
    fn from_iter<I: IntoIterator<Item = (PerformerId, Script)>>(iter: I) -> Self {
        Self {
            scripts: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_progression() {
        let mut script = Script::new(["one", "two"]);
        assert_eq!(script.current(), Word::line("one"));

        script.advance();
        assert_eq!(script.current(), Word::line("two"));
        assert_eq!(script.remaining(), 1);

        script.advance();
        assert!(script.is_done());
        assert_eq!(script.current(), Word::Done);

        // Exhausted scripts stay exhausted
        script.advance();
        assert_eq!(script.current(), Word::Done);
    }

    #[test]
    fn test_all_done() {
        let mut db: ScriptDb = [
            (PerformerId::from("tom"), Script::new(["one"])),
            (PerformerId::from("sue"), Script::default()),
        ]
        .into_iter()
        .collect();

        assert!(!db.all_done());
        db.get_mut(&PerformerId::from("tom")).unwrap().advance();
        assert!(db.all_done());
    }

    #[test]
    fn test_word_serialization() {
        assert_eq!(serde_json::to_string(&Word::line("five")).unwrap(), "\"five\"");
        assert_eq!(serde_json::to_string(&Word::Done).unwrap(), "null");

        let done: Word = serde_json::from_str("null").unwrap();
        assert!(done.is_done());
    }
}
