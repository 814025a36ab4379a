//! Over/under/push probabilities for a total-corners line.

use serde::{Deserialize, Serialize};

use super::distribution::CornerDistribution;

/// How integer (Asian) lines are settled against the distribution.
///
/// Half lines (x.5) are priced identically under both conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LineConvention {
    /// Push on exactly `line - count` more corners; a line already passed
    /// settles Over with certainty.
    Corrected,
    /// Push and under bound both taken from `floor(line) + 1 - count`, one
    /// corner beyond the true push point.
    Legacy,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketLine {
    pub line: f64,
    pub odds_over: f64,
    pub odds_under: f64,
}

impl MarketLine {
    pub fn is_half_line(&self) -> bool {
        self.line.fract() != 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeProbabilities {
    pub over: f64,
    pub under: f64,
    /// Always 0 on half lines
    pub push: f64,
}

impl OutcomeProbabilities {
    /// Over loses whenever it neither wins nor pushes.
    pub fn loss_over(&self) -> f64 {
        1.0 - self.over - self.push
    }

    pub fn loss_under(&self) -> f64 {
        1.0 - self.under - self.push
    }
}

/// Settle `line` against the remaining-corner distribution given
/// `current_count` corners already taken.
pub fn outcome_probabilities(
    dist: &CornerDistribution,
    line: f64,
    current_count: u32,
    convention: LineConvention,
) -> OutcomeProbabilities {
    let count = current_count as i64;
    // Corners still needed for Over to win on a half line
    let target_over = line.floor() as i64 + 1 - count;

    if line.fract() != 0.0 {
        let under = dist.prob_below(target_over);
        return OutcomeProbabilities {
            over: remainder(1.0 - under),
            under,
            push: 0.0,
        };
    }

    // Count already beyond the line: settled, whatever the convention
    let distance = (line - current_count as f64) as i64;
    if distance < 0 {
        return OutcomeProbabilities {
            over: 1.0,
            under: 0.0,
            push: 0.0,
        };
    }

    let push_at = match convention {
        LineConvention::Corrected => distance,
        LineConvention::Legacy => target_over,
    };
    let push = dist.pmf(push_at);
    let under = dist.prob_below(push_at);
    OutcomeProbabilities {
        over: remainder(1.0 - push - under),
        under,
        push,
    }
}

/// Probability left over after subtraction, with rounding noise and
/// negative zero mapped to 0.
fn remainder(p: f64) -> f64 {
    if p > 0.0 {
        p.min(1.0)
    } else {
        0.0
    }
}
