//! Input snapshot for one evaluation and the checks it must pass before
//! reaching the pricing core.

use serde::{Deserialize, Serialize};

use crate::config::{Bounds, InputLimits};
use crate::error::InputError;
use crate::model::league::{LeagueTable, MatchupAverages, Tempo, DEFAULT_DISPERSION};
use crate::model::{GameState, TemporalFactors, MATCH_MINUTES};

fn default_odds() -> f64 {
    1.90
}

fn default_bankroll() -> f64 {
    1000.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRequest {
    pub minutes_played: u32,
    pub current_count: u32,
    /// Expected full-match corners; derived from `matchup` or `league` when absent
    #[serde(default)]
    pub league_average: Option<f64>,
    #[serde(default)]
    pub matchup: Option<MatchupAverages>,
    #[serde(default)]
    pub league: Option<String>,
    /// Explicit dispersion k; takes priority over `league` and `tempo`
    #[serde(default)]
    pub dispersion: Option<f64>,
    #[serde(default)]
    pub tempo: Option<Tempo>,
    #[serde(default)]
    pub scenario: GameState,
    pub line: f64,
    #[serde(default = "default_odds")]
    pub odds_over: f64,
    #[serde(default = "default_odds")]
    pub odds_under: f64,
    #[serde(default = "default_bankroll")]
    pub bankroll: f64,
    /// Falls back to the engine's configured multiplier
    #[serde(default)]
    pub kelly_fraction: Option<f64>,
    /// Falls back to the engine's configured phase multipliers
    #[serde(default)]
    pub temporal: Option<TemporalFactors>,
}

/// Where the dispersion used for pricing came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum DispersionSource {
    Explicit,
    League { name: String },
    Tempo { tempo: Tempo },
    Default,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedDispersion {
    pub k: f64,
    #[serde(flatten)]
    pub source: DispersionSource,
}

fn check_bounds(value: f64, bounds: &Bounds) -> bool {
    value.is_finite() && bounds.contains(value)
}

impl PricingRequest {
    /// Reject anything outside the configured ranges.
    pub fn validate(&self, limits: &InputLimits) -> Result<(), InputError> {
        if self.minutes_played > MATCH_MINUTES {
            return Err(InputError::MinutesOutOfRange {
                value: self.minutes_played,
                max: MATCH_MINUTES,
            });
        }
        if self.current_count > limits.max_count {
            return Err(InputError::CountOutOfRange {
                value: self.current_count,
                max: limits.max_count,
            });
        }
        if let Some(avg) = self.league_average {
            if !check_bounds(avg, &limits.league_average) {
                return Err(InputError::LeagueAverageOutOfRange {
                    value: avg,
                    min: limits.league_average.min,
                    max: limits.league_average.max,
                });
            }
        }
        if let Some(matchup) = &self.matchup {
            for (field, value) in matchup.fields() {
                if !(value.is_finite() && (0.0..=limits.team_average_max).contains(&value)) {
                    return Err(InputError::TeamAverageOutOfRange {
                        field,
                        value,
                        max: limits.team_average_max,
                    });
                }
            }
        }
        if let Some(k) = self.dispersion {
            if !check_bounds(k, &limits.dispersion) {
                return Err(InputError::DispersionOutOfRange {
                    value: k,
                    min: limits.dispersion.min,
                    max: limits.dispersion.max,
                });
            }
        }
        let on_half_step = (self.line * 2.0).fract() == 0.0;
        if !check_bounds(self.line, &limits.line) || !on_half_step {
            return Err(InputError::InvalidLine {
                value: self.line,
                min: limits.line.min,
                max: limits.line.max,
            });
        }
        for (field, value) in [("odds_over", self.odds_over), ("odds_under", self.odds_under)] {
            if !check_bounds(value, &limits.odds) {
                return Err(InputError::OddsOutOfRange {
                    field,
                    value,
                    min: limits.odds.min,
                    max: limits.odds.max,
                });
            }
        }
        if !(self.bankroll.is_finite() && self.bankroll >= 0.0) {
            return Err(InputError::InvalidBankroll(self.bankroll));
        }
        if let Some(fraction) = self.kelly_fraction {
            if !check_bounds(fraction, &limits.kelly_fraction) {
                return Err(InputError::KellyFractionOutOfRange {
                    value: fraction,
                    min: limits.kelly_fraction.min,
                    max: limits.kelly_fraction.max,
                });
            }
        }
        if let Some(factors) = &self.temporal {
            let named = [
                ("opening", factors.opening),
                ("first_half_close", factors.first_half_close),
                ("second_half", factors.second_half),
                ("closing", factors.closing),
            ];
            for (field, value) in named {
                if !check_bounds(value, &limits.temporal_factor) {
                    return Err(InputError::TemporalFactorOutOfRange {
                        field,
                        value,
                        min: limits.temporal_factor.min,
                        max: limits.temporal_factor.max,
                    });
                }
            }
        }
        Ok(())
    }

    /// Explicit k, then league, then tempo, then the catch-all default.
    /// Whatever the source, the chosen k must sit inside `limits.dispersion`.
    pub fn resolve_dispersion(
        &self,
        leagues: &LeagueTable,
        limits: &InputLimits,
    ) -> Result<ResolvedDispersion, InputError> {
        let resolved = if let Some(k) = self.dispersion {
            ResolvedDispersion {
                k,
                source: DispersionSource::Explicit,
            }
        } else if let Some(name) = &self.league {
            let profile = leagues.lookup(name)?;
            ResolvedDispersion {
                k: profile.k,
                source: DispersionSource::League {
                    name: profile.name.clone(),
                },
            }
        } else if let Some(tempo) = self.tempo {
            ResolvedDispersion {
                k: tempo.dispersion(),
                source: DispersionSource::Tempo { tempo },
            }
        } else {
            ResolvedDispersion {
                k: DEFAULT_DISPERSION,
                source: DispersionSource::Default,
            }
        };

        if !check_bounds(resolved.k, &limits.dispersion) {
            return Err(InputError::DispersionOutOfRange {
                value: resolved.k,
                min: limits.dispersion.min,
                max: limits.dispersion.max,
            });
        }
        Ok(resolved)
    }

    /// Explicit average, then matchup baseline, then the league's calibrated
    /// average.
    pub fn resolve_league_average(&self, leagues: &LeagueTable) -> Result<f64, InputError> {
        if let Some(avg) = self.league_average {
            return Ok(avg);
        }
        if let Some(matchup) = &self.matchup {
            return Ok(matchup.baseline());
        }
        if let Some(name) = &self.league {
            if let Some(avg) = leagues.lookup(name)?.average {
                return Ok(avg);
            }
        }
        Err(InputError::MissingLeagueAverage)
    }
}
