use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// The two participants of a match and their scores.
///
/// Scores are either both empty (the match has not been played) or both set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Versus {
    pub player1: String,
    pub player2: String,
    pub score1: String,
    pub score2: String,
}

impl Versus {
    /// Render as `"P1 vs P2 (S1:S2)"`, or `"P1 vs P2 "` when no score is known.
    pub fn render(&self) -> String {
        if self.has_score() {
            format!(
                "{} vs {} ({}:{})",
                self.player1, self.player2, self.score1, self.score2
            )
        } else {
            format!("{} vs {} ", self.player1, self.player2)
        }
    }

    pub fn has_score(&self) -> bool {
        !self.score1.is_empty() && !self.score2.is_empty()
    }
}

impl fmt::Display for Versus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// A single match entry scraped from the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "startAt")]
    pub start_at: DateTime<Utc>,
    pub versus: Versus,
    /// Live countdown, only set for matches in the upcoming window.
    #[serde(rename = "timeCountingDown")]
    pub time_counting_down: Option<String>,
    pub series: String,
    #[serde(rename = "detailURL")]
    pub detail_url: Option<Url>,
}

impl Event {
    pub(crate) fn new(start_at: DateTime<Utc>, versus: Versus) -> Self {
        Self {
            start_at,
            versus,
            time_counting_down: None,
            series: String::new(),
            detail_url: None,
        }
    }

    /// Shorthand for [`Versus::render`].
    pub fn versus(&self) -> String {
        self.versus.render()
    }
}

/// Which side of the countdown window a match falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum MatchState {
    /// Started less than the countdown window ago; the page still shows a timer.
    Upcoming,
    /// Start time is now or later; carries a score and possibly a detail link.
    Finished,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn versus(score1: &str, score2: &str) -> Versus {
        Versus {
            player1: "scnace".to_string(),
            player2: "Astral".to_string(),
            score1: score1.to_string(),
            score2: score2.to_string(),
        }
    }

    #[test]
    fn test_render_with_score() {
        let vs = versus("2", "1");
        assert_eq!(vs.render(), "scnace vs Astral (2:1)");
        assert_eq!(vs.to_string(), "scnace vs Astral (2:1)");
        assert!(vs.has_score());
    }

    #[test]
    fn test_render_without_score_keeps_trailing_space() {
        let vs = versus("", "");
        assert_eq!(vs.render(), "scnace vs Astral ");
        assert!(!vs.has_score());
    }

    #[test]
    fn test_event_versus_shorthand() {
        let start_at = "2019-09-13T09:00:00Z".parse().unwrap();
        let event = Event::new(start_at, versus("0", "0"));
        assert_eq!(event.versus(), "scnace vs Astral (0:0)");
    }

    #[test]
    fn test_match_state_display() {
        assert_eq!(MatchState::Upcoming.to_string(), "upcoming");
        assert_eq!(MatchState::Finished.to_string(), "finished");
    }
}
