//! Outcome reporting boundary
//!
//! The cores never persist anything themselves. When an episode ends they hand
//! an `Outcome` to an `OutcomeReporter` supplied by the host and carry on;
//! the call is fire-and-forget and its success or failure never feeds back
//! into simulation state.

use serde::{Deserialize, Serialize};

/// Result of a finished episode, in the portal's score-record shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    /// Which game produced the result
    pub game_id: String,
    /// 1-based level the episode ended on
    pub level_reached: u32,
    /// Puzzle: elapsed ticks (lower is better). Shooter: points (higher is better)
    pub score: u64,
    /// Puzzle: move count. Shooter: unused (0)
    pub auxiliary_metric: u64,
    /// Whether the episode ended by finishing rather than failing
    pub completed: bool,
}

impl Outcome {
    /// Encode as the JSON record handed to storage layers
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Host-side sink for finished episodes
pub trait OutcomeReporter {
    /// Accept an outcome. Must not block the caller.
    fn report(&mut self, outcome: Outcome);
}

impl<F: FnMut(Outcome)> OutcomeReporter for F {
    fn report(&mut self, outcome: Outcome) {
        self(outcome)
    }
}

/// Reporter that only logs the record
#[derive(Debug, Default)]
pub struct LogReporter;

impl OutcomeReporter for LogReporter {
    fn report(&mut self, outcome: Outcome) {
        match outcome.to_json() {
            Ok(json) => log::info!("Outcome: {}", json),
            Err(e) => log::warn!("Outcome could not be encoded: {}", e),
        }
    }
}

/// Reporter that keeps every outcome in memory
#[derive(Debug, Default, Clone)]
pub struct RecordingReporter {
    pub outcomes: Vec<Outcome>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&Outcome> {
        self.outcomes.last()
    }
}

impl OutcomeReporter for RecordingReporter {
    fn report(&mut self, outcome: Outcome) {
        self.outcomes.push(outcome);
    }
}

/// One-shot guard so a terminal episode is reported at most once
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLatch {
    reported: bool,
}

impl ReportLatch {
    /// Returns true the first time it is called after a `rearm`
    pub fn claim(&mut self) -> bool {
        if self.reported {
            return false;
        }
        self.reported = true;
        true
    }

    pub fn is_reported(&self) -> bool {
        self.reported
    }

    /// Start a new episode
    pub fn rearm(&mut self) {
        self.reported = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Outcome {
        Outcome {
            game_id: "starfighter".into(),
            level_reached: 4,
            score: 1230,
            auxiliary_metric: 0,
            completed: false,
        }
    }

    #[test]
    fn test_latch_claims_once() {
        let mut latch = ReportLatch::default();
        assert!(latch.claim());
        assert!(!latch.claim());
        assert!(latch.is_reported());
        latch.rearm();
        assert!(latch.claim());
    }

    #[test]
    fn test_json_uses_camel_case() {
        let json = sample().to_json().unwrap();
        assert!(json.contains("\"gameId\":\"starfighter\""));
        assert!(json.contains("\"levelReached\":4"));
        assert!(json.contains("\"auxiliaryMetric\":0"));
    }

    #[test]
    fn test_closure_reporter() {
        let mut seen = Vec::new();
        {
            let mut reporter = |o: Outcome| seen.push(o.score);
            reporter.report(sample());
        }
        assert_eq!(seen, vec![1230]);
    }

    #[test]
    fn test_recording_reporter() {
        let mut reporter = RecordingReporter::new();
        reporter.report(sample());
        assert_eq!(reporter.outcomes.len(), 1);
        assert_eq!(reporter.last().map(|o| o.level_reached), Some(4));
    }
}
