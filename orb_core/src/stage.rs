//! Stage - the round orchestrator.
//!
//! Each round runs three phases, each finishing across the whole roster
//! before the next starts:
//!
//! ```text
//!   Speak ──► Route ──► Listen
//!   (decide, clear)  (fan out)  (stamp + store)
//! ```
//!
//! Words delivered in round `r` are first read in round `r + 1`.

use crate::addressing::{RoutedMessage, SentMessage};
use crate::mailbox::MailRoom;
use crate::performer::Roster;
use crate::router::Router;
use crate::script::{ScriptDb, Word};

use orb_env::{OrbError, PerformerId, StageContext};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Lifecycle of a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageState {
    Running,
    Terminated,

    /// A concurrent speak task failed; mailboxes and scripts are incomplete
    Failed,
}

/// How a call to [`Stage::run`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// Every script was exhausted after this many rounds
    Finished { rounds: u64 },

    /// The caller's round cap was reached first
    RoundLimit { rounds: u64 },

    /// The stage failed after this many rounds and cannot continue
    Aborted { rounds: u64 },
}

impl StageOutcome {
    pub fn rounds(&self) -> u64 {
        match self {
            StageOutcome::Finished { rounds }
            | StageOutcome::RoundLimit { rounds }
            | StageOutcome::Aborted { rounds } => *rounds,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, StageOutcome::Finished { .. })
    }
}

/// What happened in one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundReport {
    /// Round number (starts at 1)
    pub round: u64,

    /// Spoken words in roster order
    pub sent: Vec<SentMessage>,

    /// Words that landed in a mailbox during Listen
    pub delivered: usize,
}

impl RoundReport {
    /// Who said what this round, for transcript rendering.
    pub fn spoken(&self) -> HashMap<PerformerId, Word> {
        self.sent
            .iter()
            .map(|m| (m.sender.clone(), m.word.clone()))
            .collect()
    }

    /// The word a performer said this round, if it spoke.
    pub fn word_of(&self, id: &PerformerId) -> Option<&Word> {
        self.sent.iter().find(|m| &m.sender == id).map(|m| &m.word)
    }
}

/// Drives a roster through synchronous rounds until all scripts run out.
pub struct Stage<C: StageContext> {
    /// Clock used to stamp deliveries
    context: Arc<C>,

    /// Speaking order and cadences (read-only)
    roster: Arc<Roster>,

    /// Static topology (read-only)
    router: Arc<Router>,

    /// Per-performer inboxes
    mailroom: MailRoom,

    /// Per-performer scripts
    scripts: ScriptDb,

    /// Next round to run
    round: u64,

    state: StageState,
}

impl<C: StageContext> Stage<C> {
    /// Creates a stage at round 1.
    pub fn new(
        context: Arc<C>,
        roster: Roster,
        router: Router,
        mailroom: MailRoom,
        scripts: ScriptDb,
    ) -> Self {
        Self {
            context,
            roster: Arc::new(roster),
            router: Arc::new(router),
            mailroom,
            scripts,
            round: 1,
            state: StageState::Running,
        }
    }

    /// Round that the next step will run.
    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn state(&self) -> StageState {
        self.state
    }

    /// True once every script is exhausted.
    pub fn is_finished(&self) -> bool {
        match self.state {
            StageState::Terminated => true,
            StageState::Failed => false,
            StageState::Running => self.scripts.all_done(),
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn mailroom(&self) -> &MailRoom {
        &self.mailroom
    }

    pub fn scripts(&self) -> &ScriptDb {
        &self.scripts
    }

    /// Runs one round. Returns `None` once the stage has terminated.
    pub fn step(&mut self) -> Option<RoundReport> {
        if !self.begin_round() {
            return None;
        }

        let sent = self.speak();
        Some(self.route_and_listen(sent))
    }

    /// Runs one round with one task per performer in the Speak phase.
    ///
    /// Each task owns its performer's mailbox and script while it decides,
    /// then hands them back. Joining every task is the barrier before Route.
    /// Produces the same reports as [`Stage::step`].
    pub async fn step_concurrent(&mut self) -> Result<Option<RoundReport>, OrbError> {
        if !self.begin_round() {
            return Ok(None);
        }

        let round = self.round;
        let mut handles = Vec::with_capacity(self.roster.len());

        for id in self.roster.order() {
            let Some(performer) = self.roster.get(id).cloned() else {
                debug!("round {}: no performer entry for {}, skipping", round, id);
                continue;
            };
            if !self.mailroom.contains(id) || !self.scripts.contains(id) {
                debug!("round {}: {} has no mailbox or script, skipping", round, id);
                continue;
            }
            let (Some(mut mailbox), Some(mut script)) = (self.mailroom.take(id), self.scripts.take(id)) else {
                continue;
            };

            handles.push(tokio::spawn(async move {
                let sent = performer.perform(round, &mailbox, &mut script);
                if sent.is_some() {
                    mailbox.clear();
                }
                (performer.id, mailbox, script, sent)
            }));
        }

        let mut sent = Vec::new();
        let mut failure = None;
        for handle in handles {
            match handle.await {
                Ok((id, mailbox, script, message)) => {
                    self.mailroom.insert(id.clone(), mailbox);
                    self.scripts.insert(id, script);
                    sent.extend(message);
                }
                Err(e) => failure = Some(e),
            }
        }

        if let Some(e) = failure {
            return Err(self.fail(e));
        }

        Ok(Some(self.route_and_listen(sent)))
    }

    /// Runs rounds until every script is done or `limit` rounds have run.
    pub fn run(&mut self, limit: Option<u64>) -> StageOutcome {
        self.run_with(limit, |_| {})
    }

    /// Like [`Stage::run`], handing each round's report to `on_round`.
    pub fn run_with<F>(&mut self, limit: Option<u64>, mut on_round: F) -> StageOutcome
    where
        F: FnMut(&RoundReport),
    {
        loop {
            if let Some(outcome) = self.check_limit(limit) {
                return outcome;
            }
            match self.step() {
                Some(report) => on_round(&report),
                None => return self.stopped(),
            }
        }
    }

    /// Concurrent counterpart of [`Stage::run_with`].
    pub async fn run_concurrent<F>(&mut self, limit: Option<u64>, mut on_round: F) -> Result<StageOutcome, OrbError>
    where
        F: FnMut(&RoundReport),
    {
        loop {
            if let Some(outcome) = self.check_limit(limit) {
                return Ok(outcome);
            }
            match self.step_concurrent().await? {
                Some(report) => on_round(&report),
                None => return Ok(self.stopped()),
            }
        }
    }

    /// Outcome once `step` has nothing more to run.
    fn stopped(&self) -> StageOutcome {
        let rounds = self.round - 1;
        match self.state {
            StageState::Failed => StageOutcome::Aborted { rounds },
            _ => StageOutcome::Finished { rounds },
        }
    }

    /// Poisons the stage after a lost speak task; its taken entries never return.
    fn fail(&mut self, e: tokio::task::JoinError) -> OrbError {
        self.state = StageState::Failed;
        OrbError::task_failed(e)
    }

    fn check_limit(&self, limit: Option<u64>) -> Option<StageOutcome> {
        let executed = self.round - 1;
        match limit {
            Some(max) if executed >= max && !self.is_finished() => {
                Some(StageOutcome::RoundLimit { rounds: executed })
            }
            _ => None,
        }
    }

    /// Termination check at the top of a round.
    fn begin_round(&mut self) -> bool {
        if self.state != StageState::Running {
            return false;
        }
        if self.scripts.all_done() {
            debug!("all scripts done before round {}", self.round);
            self.state = StageState::Terminated;
            return false;
        }
        true
    }

    /// Speak phase: every eligible performer decides, and is cleared if it spoke.
    fn speak(&mut self) -> Vec<SentMessage> {
        let round = self.round;
        let mut sent = Vec::new();

        for id in self.roster.order() {
            let Some(performer) = self.roster.get(id) else {
                debug!("round {}: no performer entry for {}, skipping", round, id);
                continue;
            };
            let (Some(mailbox), Some(script)) = (self.mailroom.get_mut(id), self.scripts.get_mut(id)) else {
                debug!("round {}: {} has no mailbox or script, skipping", round, id);
                continue;
            };

            if let Some(message) = performer.perform(round, mailbox, script) {
                mailbox.clear();
                sent.push(message);
            }
        }

        sent
    }

    /// Route and Listen phases, then close out the round.
    fn route_and_listen(&mut self, sent: Vec<SentMessage>) -> RoundReport {
        let routed: Vec<RoutedMessage> = sent
            .iter()
            .flat_map(|message| self.router.route(message))
            .collect();

        let mut delivered = 0;
        for message in &routed {
            let at = self.context.now();
            if self.mailroom.deliver(message, at) {
                self.context.tick();
                delivered += 1;
            } else {
                debug!("round {}: no mailbox at {}, dropped", self.round, message.address);
            }
        }

        debug!(
            "round {}: {} spoke, {} routed, {} delivered",
            self.round,
            sent.len(),
            routed.len(),
            delivered
        );

        let report = RoundReport {
            round: self.round,
            sent,
            delivered,
        };
        self.round += 1;
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addressing::{Address, Slot};
    use crate::performer::{Meter, Performer};
    use crate::script::Script;
    use orb_env::SystemContext;

    fn id(name: &str) -> PerformerId {
        PerformerId::from(name)
    }

    fn build(names: &[&str], router: Router, lines: &[&str]) -> Stage<SystemContext> {
        let roster: Roster = names
            .iter()
            .map(|n| Performer::new(*n, Meter::EVERY_ROUND))
            .collect();
        let mailroom = MailRoom::for_performers(roster.order().iter());
        let scripts = names
            .iter()
            .map(|n| (id(n), Script::new(lines.iter().copied())))
            .collect();

        Stage::new(SystemContext::shared(), roster, router, mailroom, scripts)
    }

    /// A and B each fill both of the other's slots.
    fn duet() -> Stage<SystemContext> {
        let router = Router::new()
            .with_link("a", Address::left("b"))
            .with_link("a", Address::right("b"))
            .with_link("b", Address::left("a"))
            .with_link("b", Address::right("a"));
        build(&["a", "b"], router, &["x", "y"])
    }

    #[test]
    fn test_first_round_says_first_line() {
        let router = Router::new()
            .with_link("a", Address::left("b"))
            .with_link("b", Address::left("c"))
            .with_link("c", Address::left("a"));
        let mut stage = build(&["a", "b", "c"], router, &["x", "y"]);

        let report = stage.step().unwrap();
        assert_eq!(report.round, 1);
        for name in ["a", "b", "c"] {
            assert_eq!(report.word_of(&id(name)), Some(&Word::line("x")));
        }
        assert_eq!(report.delivered, 3);
        assert_eq!(stage.state(), StageState::Running);
        assert_eq!(stage.round(), 2);
    }

    #[test]
    fn test_duet_terminates() {
        let mut stage = duet();
        let mut spoken = Vec::new();

        let outcome = stage.run_with(None, |r| spoken.push(r.word_of(&id("a")).cloned()));

        assert_eq!(outcome, StageOutcome::Finished { rounds: 3 });
        assert_eq!(
            spoken,
            vec![Some(Word::line("x")), Some(Word::line("y")), Some(Word::Done)]
        );
        assert_eq!(stage.state(), StageState::Terminated);
        assert!(stage.scripts().all_done());
        assert!(stage.step().is_none());
    }

    #[test]
    fn test_words_arrive_next_round() {
        let mut stage = duet();
        stage.step();

        // Listen filled both of b's slots with a's round-1 word
        let mailbox = stage.mailroom().get(&id("b")).unwrap();
        assert_eq!(mailbox.slot(Slot::Left).map(|r| &r.word), Some(&Word::line("x")));
        assert_eq!(mailbox.slot(Slot::Right).map(|r| &r.word), Some(&Word::line("x")));
    }

    #[test]
    fn test_round_limit() {
        let router = Router::new().with_link("a", Address::left("b"));
        let mut stage = build(&["a", "b"], router, &["x", "y"]);

        let outcome = stage.run(Some(5));
        assert_eq!(outcome, StageOutcome::RoundLimit { rounds: 5 });
        assert_eq!(stage.round(), 6);
    }

    #[test]
    fn test_missing_entries_are_skipped() {
        let roster = Roster::from_parts(
            vec![id("a"), id("ghost"), id("b")],
            [id("a"), id("b")]
                .into_iter()
                .map(|i| (i.clone(), Performer::new(i, Meter::EVERY_ROUND)))
                .collect(),
        );
        let mailroom = MailRoom::for_performers([id("a")].iter());
        let scripts = [
            (id("a"), Script::new(["x"])),
            (id("b"), Script::new(["x"])),
        ]
        .into_iter()
        .collect();
        let router = Router::new().with_link("a", Address::left("b"));
        let mut stage = Stage::new(SystemContext::shared(), roster, router, mailroom, scripts);

        let report = stage.step().unwrap();

        // Only a has all three entries; its word to b is dropped
        assert_eq!(report.sent.len(), 1);
        assert_eq!(report.delivered, 0);
    }

    #[test]
    fn test_same_slot_collision_last_sender_wins() {
        let router = Router::new()
            .with_link("a", Address::left("c"))
            .with_link("b", Address::left("c"));
        let roster: Roster = [
            Performer::new("a", Meter::EVERY_ROUND),
            Performer::new("b", Meter::EVERY_ROUND),
            Performer::new("c", Meter::new(7).unwrap()),
        ]
        .into_iter()
        .collect();
        let mailroom = MailRoom::for_performers(roster.order().iter());
        let scripts = [
            (id("a"), Script::new(["from-a"])),
            (id("b"), Script::new(["from-b"])),
            (id("c"), Script::new(["z"])),
        ]
        .into_iter()
        .collect();
        let mut stage = Stage::new(SystemContext::shared(), roster, router, mailroom, scripts);

        stage.step();

        let left = stage.mailroom().get(&id("c")).unwrap().left().unwrap();
        assert_eq!(left.word, Word::line("from-b"));
    }

    #[test]
    fn test_empty_stage_is_finished() {
        let mut stage = build(&[], Router::new(), &[]);
        assert!(stage.is_finished());
        assert_eq!(stage.run(None), StageOutcome::Finished { rounds: 0 });
    }

    #[tokio::test]
    async fn test_concurrent_matches_sequential() {
        let mut sequential = duet();
        let mut concurrent = duet();

        loop {
            let a = sequential.step();
            let b = concurrent.step_concurrent().await.unwrap();
            assert_eq!(a, b);
            if a.is_none() {
                break;
            }
        }
        assert!(concurrent.is_finished());
    }

    #[tokio::test]
    async fn test_failed_task_stops_the_stage() {
        let mut stage = duet();
        stage.step();

        let join_error = tokio::spawn(async { panic!("speak task died") })
            .await
            .unwrap_err();
        let err = stage.fail(join_error);

        assert!(matches!(err, OrbError::TaskFailed(_)));
        assert_eq!(stage.state(), StageState::Failed);
        assert!(!stage.is_finished());
        assert!(stage.step().is_none());
        assert_eq!(stage.step_concurrent().await.unwrap(), None);
        assert_eq!(stage.run(None), StageOutcome::Aborted { rounds: 1 });
    }

    #[tokio::test]
    async fn test_run_concurrent_reports_every_round() {
        let mut stage = duet();
        let mut rounds = Vec::new();

        let outcome = stage
            .run_concurrent(Some(100), |r| rounds.push(r.round))
            .await
            .unwrap();

        assert!(outcome.is_finished());
        assert_eq!(rounds, vec![1, 2, 3]);
    }
}
