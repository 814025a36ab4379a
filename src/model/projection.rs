//! Remaining-corner intensity projection.
//!
//! The per-minute base rate blends the pace observed so far with the league
//! pace, trusting the observed pace linearly more as the clock runs. That
//! rate is then integrated minute by minute over the time left, weighted by
//! the phase multipliers. Phase boundaries rarely line up with the current
//! minute, so the sum is done per minute rather than per phase.

use serde::{Deserialize, Serialize};

use super::scenario::GameState;
use super::temporal::TemporalFactors;

/// Regulation time plus typical stoppage. Extra time is not modelled.
pub const MATCH_MINUTES: u32 = 95;

/// How the base rate is derived from the observed and league pace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RateBlend {
    /// Weight the observed pace by minutes_played / 95
    Hybrid,
    /// Ignore the observed pace and use the league pace only
    LeagueOnly,
}

/// Observed progress of one match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub minutes_played: u32,
    pub current_count: u32,
    /// Expected full-match corners for this league or pairing
    pub league_average: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// Per-minute base rate before phase weighting
    pub blended_rate: f64,
    /// Expected remaining corners before the game-state adjustment
    pub lambda_base: f64,
    pub scenario_factor: f64,
    /// Expected remaining corners
    pub lambda: f64,
    /// Observed corners scaled to a full match, 0 before kick-off
    pub observed_pace: f64,
    /// Blended rate scaled to a full match
    pub blended_pace: f64,
}

/// Blended per-minute base rate.
pub fn blended_base_rate(state: &MatchState, blend: RateBlend) -> f64 {
    let total = MATCH_MINUTES as f64;
    let theoretical = state.league_average / total;
    if state.minutes_played == 0 || blend == RateBlend::LeagueOnly {
        return theoretical;
    }
    let played = state.minutes_played as f64;
    let observed = state.current_count as f64 / played;
    let real_weight = played / total;
    observed * real_weight + theoretical * (1.0 - real_weight)
}

/// Expected corners over the rest of the match, before the game-state
/// adjustment. Returns `(lambda, blended_rate)`.
pub fn project_remaining_lambda(
    state: &MatchState,
    factors: &TemporalFactors,
    blend: RateBlend,
) -> (f64, f64) {
    let rate = blended_base_rate(state, blend);
    let lambda = (state.minutes_played + 1..=MATCH_MINUTES)
        .fold(0.0, |acc, minute| acc + rate * factors.factor_at(minute));
    (lambda, rate)
}

/// Full projection including the game-state multiplier.
pub fn project(
    state: &MatchState,
    factors: &TemporalFactors,
    blend: RateBlend,
    game_state: &GameState,
) -> Projection {
    let (lambda_base, blended_rate) = project_remaining_lambda(state, factors, blend);
    let scenario_factor = game_state.factor();
    let total = MATCH_MINUTES as f64;
    let observed_pace = if state.minutes_played > 0 {
        state.current_count as f64 / state.minutes_played as f64 * total
    } else {
        0.0
    };
    Projection {
        blended_rate,
        lambda_base,
        scenario_factor,
        lambda: lambda_base * scenario_factor,
        observed_pace,
        blended_pace: blended_rate * total,
    }
}
