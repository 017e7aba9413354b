//! Plain-text transcript: one column per performer, one row per round.
//!
//! ```text
//!            |       tom |       sue |
//!          1 |       one |       one |
//!          2 |           |       two |
//! ```

use orb_core::{RoundReport, Word};
use orb_env::PerformerId;
use std::collections::HashMap;

/// Width of every cell, separator excluded.
pub const ROW_ITEM_SIZE: usize = 10;

/// Renders transcript lines for a fixed column order.
pub struct Transcript {
    columns: Vec<PerformerId>,
}

impl Transcript {
    pub fn new(columns: Vec<PerformerId>) -> Self {
        Self { columns }
    }

    /// Header row with performer names.
    pub fn header(&self) -> String {
        let mut line = cell(" ");
        for id in &self.columns {
            line.push_str(&cell(id.as_str()));
        }
        line
    }

    /// One row; performers that stayed silent get a blank cell.
    pub fn row(&self, round: u64, spoken: &HashMap<PerformerId, Word>) -> String {
        let mut line = cell(&round.to_string());
        for id in &self.columns {
            match spoken.get(id) {
                Some(word) => line.push_str(&cell(&word.to_string())),
                None => line.push_str(&cell(" ")),
            }
        }
        line
    }

    pub fn report_row(&self, report: &RoundReport) -> String {
        self.row(report.round, &report.spoken())
    }

    /// Header plus every report, newline separated.
    pub fn render(&self, reports: &[RoundReport]) -> String {
        let mut out = self.header();
        for report in reports {
            out.push('\n');
            out.push_str(&self.report_row(report));
        }
        out
    }
}

fn cell(text: &str) -> String {
    format!("{:>width$} |", text, width = ROW_ITEM_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use orb_core::SentMessage;

    fn ids() -> Vec<PerformerId> {
        vec![PerformerId::from("tom"), PerformerId::from("sue")]
    }

    #[test]
    fn test_header() {
        let transcript = Transcript::new(ids());
        assert_eq!(transcript.header(), "           |       tom |       sue |");
    }

    #[test]
    fn test_row_leaves_silent_blank() {
        let transcript = Transcript::new(ids());
        let report = RoundReport {
            round: 12,
            sent: vec![SentMessage {
                sender: PerformerId::from("sue"),
                word: Word::Done,
            }],
            delivered: 0,
        };

        assert_eq!(
            transcript.report_row(&report),
            "        12 |           |      DONE |"
        );
    }

    #[test]
    fn test_render_line_count() {
        let transcript = Transcript::new(ids());
        let reports: Vec<_> = (1..=3)
            .map(|round| RoundReport { round, sent: vec![], delivered: 0 })
            .collect();

        assert_eq!(transcript.render(&reports).lines().count(), 4);
    }
}
