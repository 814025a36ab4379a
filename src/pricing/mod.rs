pub mod decision;
pub mod distribution;
pub mod kelly;
pub mod market;

use serde::{Deserialize, Serialize};

use crate::error::EngineResult;

pub use decision::{decide, DecisionPolicy, Recommendation, Side, SideQuote};
pub use distribution::CornerDistribution;
pub use market::{outcome_probabilities, LineConvention, MarketLine};

/// Probabilities, EV and minimum odds for both sides of one line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    pub prob_over: f64,
    pub prob_under: f64,
    pub prob_push: f64,
    pub prob_loss_over: f64,
    pub prob_loss_under: f64,
    pub ev_over: f64,
    pub ev_under: f64,
    /// `None` when Over cannot win
    pub min_odd_over: Option<f64>,
    /// `None` when Under cannot win
    pub min_odd_under: Option<f64>,
    /// Bankroll fraction for the recommended side, `None` when nothing is
    /// actionable
    pub kelly_stake: Option<f64>,
}

impl PricingResult {
    pub fn over_quote(&self, market: &MarketLine) -> SideQuote {
        SideQuote {
            side: Side::Over,
            win_prob: self.prob_over,
            loss_prob: self.prob_loss_over,
            odds: market.odds_over,
            ev: self.ev_over,
        }
    }

    pub fn under_quote(&self, market: &MarketLine) -> SideQuote {
        SideQuote {
            side: Side::Under,
            win_prob: self.prob_under,
            loss_prob: self.prob_loss_under,
            odds: market.odds_under,
            ev: self.ev_under,
        }
    }
}

/// Price an over/under line and size the stake for whichever side `policy`
/// recommends.
#[allow(clippy::too_many_arguments)]
pub fn price_and_decide(
    lambda: f64,
    k: f64,
    market: &MarketLine,
    current_count: u32,
    convention: LineConvention,
    min_odd_ev_target: f64,
    policy: &DecisionPolicy,
    bankroll: f64,
) -> EngineResult<(PricingResult, Recommendation)> {
    let mut result = price(lambda, k, market, current_count, convention, min_odd_ev_target)?;
    let recommendation = decide(
        &result.over_quote(market),
        &result.under_quote(market),
        policy,
        bankroll,
    );
    result.kelly_stake = recommendation.stake_fraction();
    Ok((result, recommendation))
}

/// Price an over/under line given `lambda` expected remaining corners with
/// dispersion `k`. `min_odd_ev_target` is the EV the minimum odds aim for.
pub fn price(
    lambda: f64,
    k: f64,
    market: &MarketLine,
    current_count: u32,
    convention: LineConvention,
    min_odd_ev_target: f64,
) -> EngineResult<PricingResult> {
    let dist = CornerDistribution::new(lambda, k)?;
    let probs = outcome_probabilities(&dist, market.line, current_count, convention);
    let loss_over = probs.loss_over();
    let loss_under = probs.loss_under();

    Ok(PricingResult {
        prob_over: probs.over,
        prob_under: probs.under,
        prob_push: probs.push,
        prob_loss_over: loss_over,
        prob_loss_under: loss_under,
        ev_over: kelly::expected_value(probs.over, loss_over, market.odds_over),
        ev_under: kelly::expected_value(probs.under, loss_under, market.odds_under),
        min_odd_over: kelly::min_odds_for_ev(probs.over, loss_over, min_odd_ev_target),
        min_odd_under: kelly::min_odds_for_ev(probs.under, loss_under, min_odd_ev_target),
        kelly_stake: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn market(line: f64) -> MarketLine {
        MarketLine {
            line,
            odds_over: 1.90,
            odds_under: 1.90,
        }
    }

    #[test]
    fn probabilities_form_a_distribution() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..2000 {
            let lambda: f64 = rng.gen_range(0.0..15.0);
            let k: f64 = rng.gen_range(0.5..=4.0);
            let line = rng.gen_range(1..=50) as f64 * 0.5;
            let count: u32 = rng.gen_range(0..=30);
            for convention in [LineConvention::Corrected, LineConvention::Legacy] {
                let r = price(lambda, k, &market(line), count, convention, 0.10).unwrap();
                let total = r.prob_over + r.prob_under + r.prob_push;
                assert_relative_eq!(total, 1.0, epsilon = 1e-9);
                for p in [r.prob_over, r.prob_under, r.prob_push] {
                    assert!((-1e-9..=1.0 + 1e-9).contains(&p), "p={} line={} count={}", p, line, count);
                }
                if line.fract() != 0.0 {
                    assert_eq!(r.prob_push, 0.0);
                }
            }
        }
    }

    #[test]
    fn passed_integer_lines_are_certain_over() {
        for convention in [LineConvention::Corrected, LineConvention::Legacy] {
            for count in 11..=30 {
                let r = price(3.0, 2.0, &market(10.0), count, convention, 0.05).unwrap();
                assert_eq!(
                    (r.prob_over, r.prob_under, r.prob_push),
                    (1.0, 0.0, 0.0),
                    "{:?} count={}",
                    convention,
                    count
                );
                assert_eq!(r.min_odd_under, None);
                assert_relative_eq!(r.ev_over, 0.90, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn ev_and_min_odds_for_half_line() {
        let r = price(34730.0 / 9025.0, 2.62, &market(10.5), 6, LineConvention::Corrected, 0.10).unwrap();
        assert_relative_eq!(r.prob_over, 0.33848126814109625, epsilon = 1e-9);
        assert_relative_eq!(r.ev_over, -0.3568855905319171, epsilon = 1e-9);
        assert_relative_eq!(r.ev_under, 0.2568855905319172, epsilon = 1e-9);
        let min_under = r.min_odd_under.unwrap();
        assert_relative_eq!(
            kelly::expected_value(r.prob_under, r.prob_loss_under, min_under),
            0.10,
            epsilon = 1e-12
        );
    }

    #[test]
    fn push_returns_stake_on_integer_line() {
        let r = price(34730.0 / 9025.0, 2.62, &market(10.0), 6, LineConvention::Corrected, 0.05).unwrap();
        assert!(r.prob_push > 0.0);
        assert_relative_eq!(r.prob_loss_over, r.prob_under, epsilon = 1e-12);
        assert_relative_eq!(r.prob_loss_under, r.prob_over, epsilon = 1e-12);
    }

    #[test]
    fn stake_is_attached_to_the_result_only_when_actionable() {
        let policy = DecisionPolicy {
            ev_threshold: 0.10,
            ev_ceiling: None,
            kelly_fraction: 0.5,
        };
        let (r, rec) = price_and_decide(
            34730.0 / 9025.0,
            2.62,
            &market(10.5),
            6,
            LineConvention::Corrected,
            0.10,
            &policy,
            1000.0,
        )
        .unwrap();
        let p = r.prob_under;
        assert_relative_eq!(
            r.kelly_stake.unwrap(),
            (p * 0.9 - (1.0 - p)) / 0.9 * 0.5,
            epsilon = 1e-12
        );
        assert_eq!(r.kelly_stake, rec.stake_fraction());

        let strict = DecisionPolicy {
            ev_threshold: 0.50,
            ..policy
        };
        let (r, rec) = price_and_decide(
            34730.0 / 9025.0,
            2.62,
            &market(10.5),
            6,
            LineConvention::Corrected,
            0.10,
            &strict,
            1000.0,
        )
        .unwrap();
        assert_eq!(rec, Recommendation::NoBet);
        assert_eq!(r.kelly_stake, None);
    }

    #[test]
    fn quotes_carry_market_odds() {
        let m = MarketLine {
            line: 9.5,
            odds_over: 2.10,
            odds_under: 1.75,
        };
        let r = price(3.0, 2.0, &m, 7, LineConvention::Corrected, 0.05).unwrap();
        assert_eq!(r.over_quote(&m).odds, 2.10);
        assert_eq!(r.under_quote(&m).odds, 1.75);
        assert_eq!(r.under_quote(&m).side, Side::Under);
    }
}
