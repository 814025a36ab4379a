use serde::{Deserialize, Serialize};
use std::fmt;

use super::kelly::kelly_stake;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Over,
    Under,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Over => f.write_str("OVER"),
            Side::Under => f.write_str("UNDER"),
        }
    }
}

/// Priced view of one side of the market.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SideQuote {
    pub side: Side,
    pub win_prob: f64,
    pub loss_prob: f64,
    pub odds: f64,
    pub ev: f64,
}

/// What to do with a priced market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Recommendation {
    /// Back this side with the given share of bankroll
    Back {
        side: Side,
        ev: f64,
        stake_fraction: f64,
        stake_amount: f64,
    },
    /// Neither side reaches the EV threshold
    NoBet,
    /// EV is above the ceiling: the inputs are more likely wrong than the
    /// market. No stake.
    Anomalous { side: Side, ev: f64 },
}

impl Recommendation {
    /// Bankroll fraction to stake, if anything is to be backed.
    pub fn stake_fraction(&self) -> Option<f64> {
        match self {
            Recommendation::Back { stake_fraction, .. } => Some(*stake_fraction),
            Recommendation::NoBet | Recommendation::Anomalous { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecisionPolicy {
    /// Minimum EV (inclusive) for a side to be actionable
    pub ev_threshold: f64,
    /// EV above which a result is suppressed as implausible
    pub ev_ceiling: Option<f64>,
    pub kelly_fraction: f64,
}

/// Pick the side to back. Over wins ties when both clear the threshold.
pub fn decide(
    over: &SideQuote,
    under: &SideQuote,
    policy: &DecisionPolicy,
    bankroll: f64,
) -> Recommendation {
    let candidate = [over, under]
        .into_iter()
        .find(|q| q.ev >= policy.ev_threshold);

    let Some(quote) = candidate else {
        return Recommendation::NoBet;
    };

    if let Some(ceiling) = policy.ev_ceiling {
        if quote.ev > ceiling {
            return Recommendation::Anomalous {
                side: quote.side,
                ev: quote.ev,
            };
        }
    }

    let stake_fraction = kelly_stake(
        quote.win_prob,
        quote.loss_prob,
        quote.odds,
        policy.kelly_fraction,
    );
    Recommendation::Back {
        side: quote.side,
        ev: quote.ev,
        stake_fraction,
        stake_amount: bankroll * stake_fraction,
    }
}
