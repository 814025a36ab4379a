//! Expected value and Kelly sizing against decimal odds.
//!
//! Markets with integer lines can push (stake returned), so win and loss
//! probabilities are passed separately and need not sum to one:
//!   p = probability the bet wins
//!   q = probability the bet loses
//!   1 − p − q = probability of a push
//!
//! Kelly formula with net odds b = odds − 1:
//!   f* = (b·p − q) / b
//!
//! We apply a *fractional* Kelly multiplier (0 < multiplier ≤ 1) to reduce
//! variance at the cost of slightly lower expected growth.

/// Expected profit per unit staked. A push contributes nothing.
pub fn expected_value(win_prob: f64, loss_prob: f64, odds: f64) -> f64 {
    win_prob * (odds - 1.0) - loss_prob
}

/// Smallest decimal odds at which the bet reaches `ev_target`.
///
/// Returns `None` when the bet cannot win (`win_prob <= 0`).
pub fn min_odds_for_ev(win_prob: f64, loss_prob: f64, ev_target: f64) -> Option<f64> {
    if win_prob <= 0.0 {
        return None;
    }
    Some((ev_target + loss_prob) / win_prob + 1.0)
}

/// Calculate the fractional Kelly stake.
///
/// # Arguments
/// * `win_prob`       – Probability the bet wins (0.0–1.0).
/// * `loss_prob`      – Probability the bet loses (0.0–1.0).
/// * `odds`           – Decimal odds quoted for the bet.
/// * `kelly_fraction` – Fractional Kelly multiplier (0.0–1.0).
///
/// # Returns
/// The fraction of bankroll to stake. Returns `0.0` when there is no edge,
/// when the bet cannot win, or when the odds pay nothing.
pub fn kelly_stake(win_prob: f64, loss_prob: f64, odds: f64, kelly_fraction: f64) -> f64 {
    debug_assert!(
        (0.0..=1.0).contains(&kelly_fraction),
        "kelly_fraction out of range"
    );

    if win_prob <= 0.0 || odds <= 1.0 {
        return 0.0;
    }

    let b = odds - 1.0;
    let f = (win_prob * b - loss_prob) / b;

    (f * kelly_fraction).max(0.0)
}
