use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{EngineConfig, Preset};
use crate::error::EngineResult;
use crate::model::{project, GameState, LeagueTable, MatchState, Projection};
use crate::pricing::{price_and_decide, MarketLine, PricingResult, Recommendation, Side};
use crate::request::{PricingRequest, ResolvedDispersion};

/// Everything one evaluation produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingReport {
    pub computed_at: DateTime<Utc>,
    pub preset: Preset,
    pub match_state: MatchState,
    pub scenario: GameState,
    pub market: MarketLine,
    pub is_half_line: bool,
    pub dispersion: ResolvedDispersion,
    pub projection: Projection,
    pub pricing: PricingResult,
    pub ev_threshold: f64,
    pub min_odd_ev_target: f64,
    pub kelly_fraction: f64,
    pub bankroll: f64,
    pub recommendation: Recommendation,
}

/// Stateless pricing engine: configuration and league table are fixed at
/// construction, every call works on its own request snapshot.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    leagues: LeagueTable,
}

impl Engine {
    pub fn new(config: EngineConfig, leagues: LeagueTable) -> Self {
        Engine { config, leagues }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn leagues(&self) -> &LeagueTable {
        &self.leagues
    }

    pub fn evaluate(&self, req: &PricingRequest) -> EngineResult<PricingReport> {
        req.validate(&self.config.limits)?;

        let dispersion = req.resolve_dispersion(&self.leagues, &self.config.limits)?;
        let league_average = req.resolve_league_average(&self.leagues)?;
        let temporal = req.temporal.unwrap_or(self.config.temporal);
        let kelly_fraction = req.kelly_fraction.unwrap_or(self.config.kelly_fraction);

        let match_state = MatchState {
            minutes_played: req.minutes_played,
            current_count: req.current_count,
            league_average,
        };
        let projection = project(&match_state, &temporal, self.config.rate_blend, &req.scenario);

        let market = MarketLine {
            line: req.line,
            odds_over: req.odds_over,
            odds_under: req.odds_under,
        };
        let policy = self.config.decision_policy(kelly_fraction);
        let (pricing, recommendation) = price_and_decide(
            projection.lambda,
            dispersion.k,
            &market,
            req.current_count,
            self.config.line_convention,
            self.config.min_odd_ev_target,
            &policy,
            req.bankroll,
        )?;

        debug!(
            "{}' {} corners: lambda={:.3} (base {:.3} × {:.2}), k={:.2} → over {:.3} under {:.3} push {:.3}",
            req.minutes_played,
            req.current_count,
            projection.lambda,
            projection.lambda_base,
            projection.scenario_factor,
            dispersion.k,
            pricing.prob_over,
            pricing.prob_under,
            pricing.prob_push
        );

        match &recommendation {
            Recommendation::Back {
                side,
                ev,
                stake_fraction,
                stake_amount,
            } => info!(
                "✅ {} {} @ {:.2}: EV {:+.3}, stake {:.2} ({:.2}% of bankroll)",
                side,
                req.line,
                match side {
                    Side::Over => req.odds_over,
                    Side::Under => req.odds_under,
                },
                ev,
                stake_amount,
                stake_fraction * 100.0
            ),
            Recommendation::Anomalous { side, ev } => warn!(
                "EV {:+.3} on {} {} exceeds ceiling {:?}; check inputs",
                ev, side, req.line, self.config.ev_ceiling
            ),
            Recommendation::NoBet => info!(
                "❌ No entry on {}: EV over {:+.3}, under {:+.3}, target {:+.2}",
                req.line, pricing.ev_over, pricing.ev_under, self.config.ev_threshold
            ),
        }

        Ok(PricingReport {
            computed_at: Utc::now(),
            preset: self.config.preset,
            match_state,
            scenario: req.scenario.clone(),
            market,
            is_half_line: market.is_half_line(),
            dispersion,
            projection,
            pricing,
            ev_threshold: self.config.ev_threshold,
            min_odd_ev_target: self.config.min_odd_ev_target,
            kelly_fraction,
            bankroll: req.bankroll,
            recommendation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EngineError, InputError};
    use crate::model::league::LeagueProfile;
    use crate::model::TemporalFactors;
    use crate::request::DispersionSource;
    use approx::assert_relative_eq;

    fn engine(preset: Preset) -> Engine {
        Engine::new(EngineConfig::preset(preset), LeagueTable::builtin())
    }

    fn request(line: f64) -> PricingRequest {
        PricingRequest {
            minutes_played: 60,
            current_count: 6,
            league_average: Some(10.0),
            matchup: None,
            league: Some("Serie A".into()),
            dispersion: None,
            tempo: None,
            scenario: GameState::Balanced,
            line,
            odds_over: 1.90,
            odds_under: 1.90,
            bankroll: 1000.0,
            kelly_fraction: None,
            temporal: None,
        }
    }

    #[test]
    fn minute_60_half_line_backs_under() {
        let report = engine(Preset::V9).evaluate(&request(10.5)).unwrap();
        assert_relative_eq!(report.projection.lambda, 3.8481994459833797, epsilon = 1e-12);
        assert_eq!(
            report.dispersion.source,
            DispersionSource::League {
                name: "Serie A".into()
            }
        );
        assert_relative_eq!(report.pricing.prob_over, 0.33848126814109625, epsilon = 1e-9);
        assert!(report.is_half_line);
        match report.recommendation {
            Recommendation::Back {
                side,
                ev,
                stake_fraction,
                stake_amount,
            } => {
                assert_eq!(side, Side::Under);
                assert_relative_eq!(ev, 0.2568855905319172, epsilon = 1e-9);
                let p = report.pricing.prob_under;
                let expected = (p * 0.9 - (1.0 - p)) / 0.9 * 0.5;
                assert_relative_eq!(stake_fraction, expected, epsilon = 1e-9);
                assert_relative_eq!(stake_amount, 1000.0 * expected, epsilon = 1e-6);
                assert_eq!(report.pricing.kelly_stake, Some(stake_fraction));
            }
            other => panic!("Expected Back, got {:?}", other),
        }
    }

    #[test]
    fn integer_line_reports_push() {
        let report = engine(Preset::V9).evaluate(&request(10.0)).unwrap();
        assert!(!report.is_half_line);
        assert_relative_eq!(report.pricing.prob_push, 0.12043992006559079, epsilon = 1e-9);
    }

    #[test]
    fn v8_preset_projects_from_league_pace_only() {
        let report = engine(Preset::V8).evaluate(&request(10.5)).unwrap();
        // 10/95 per minute, 20 × 0.95 + 15 × 1.20 = 37
        assert_relative_eq!(report.projection.lambda, 10.0 / 95.0 * 37.0, epsilon = 1e-12);
        assert_relative_eq!(report.ev_threshold, 0.05);
    }

    #[test]
    fn v8_passed_integer_line_is_settled_over() {
        let mut req = request(10.0);
        req.minutes_played = 70;
        req.current_count = 11;
        let report = engine(Preset::V8).evaluate(&req).unwrap();
        assert_eq!(report.pricing.prob_push, 0.0);
        assert_eq!(report.pricing.prob_under, 0.0);
        assert_eq!(report.pricing.prob_over, 1.0);
        assert!(matches!(
            report.recommendation,
            Recommendation::Back { side: Side::Over, .. }
        ));
    }

    #[test]
    fn league_dispersion_outside_limits_is_rejected() {
        let mut leagues = LeagueTable::builtin();
        leagues.upsert(LeagueProfile {
            name: "Serie A".into(),
            k: 9.0,
            average: None,
        });
        let err = Engine::new(EngineConfig::preset(Preset::V9), leagues)
            .evaluate(&request(10.5))
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidInput(InputError::DispersionOutOfRange { .. })
        ));
    }

    #[test]
    fn request_temporal_factors_override_config() {
        let mut req = request(10.5);
        req.temporal = Some(TemporalFactors::new(1.0, 1.0, 1.0, 1.0));
        let report = engine(Preset::V9).evaluate(&req).unwrap();
        assert_relative_eq!(report.projection.lambda, 920.0 / 9025.0 * 35.0, epsilon = 1e-12);
    }

    #[test]
    fn ceiling_flags_anomaly() {
        let mut cfg = EngineConfig::preset(Preset::V9);
        cfg.ev_ceiling = Some(0.2);
        let report = Engine::new(cfg, LeagueTable::builtin())
            .evaluate(&request(10.5))
            .unwrap();
        assert!(matches!(
            report.recommendation,
            Recommendation::Anomalous { side: Side::Under, .. }
        ));
    }

    #[test]
    fn full_time_prices_deterministically() {
        let mut req = request(10.5);
        req.minutes_played = 95;
        req.current_count = 8;
        let report = engine(Preset::V9).evaluate(&req).unwrap();
        assert_eq!(report.projection.lambda, 0.0);
        assert_eq!(report.pricing.prob_under, 1.0);
        assert_eq!(report.pricing.min_odd_over, None);
    }

    #[test]
    fn invalid_input_is_rejected() {
        let mut req = request(10.5);
        req.odds_over = 12.0;
        let err = engine(Preset::V9).evaluate(&req).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidInput(InputError::OddsOutOfRange { field: "odds_over", .. })
        ));
    }

    #[test]
    fn report_serializes_to_json() {
        let report = engine(Preset::V9).evaluate(&request(10.5)).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["recommendation"]["action"], "back");
        assert_eq!(json["recommendation"]["side"], "under");
        assert_eq!(json["dispersion"]["source"], "league");
        assert_eq!(json["scenario"], "balanced");
    }
}
