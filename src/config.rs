use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::model::league::{MatchupAverages, Tempo};
use crate::model::{GameState, RateBlend, TemporalFactors};
use crate::pricing::{DecisionPolicy, LineConvention};
use crate::request::PricingRequest;

/// In-play corner-kick pricing engine
#[derive(Parser, Debug, Clone)]
#[command(name = "corner-scanner", version, about)]
pub struct Config {
    #[command(subcommand)]
    pub command: Command,

    /// Historical engine variant supplying the defaults below
    #[arg(long, env = "CORNER_PRESET", value_enum, default_value = "v9", global = true)]
    pub preset: Preset,

    /// Minimum EV for a side to be recommended (overrides the preset)
    #[arg(long, env = "EV_THRESHOLD", global = true)]
    pub ev_threshold: Option<f64>,

    /// EV the minimum-odds figures aim for (overrides the preset)
    #[arg(long, env = "MIN_ODD_EV_TARGET", global = true)]
    pub min_odd_ev_target: Option<f64>,

    /// EV above which a result is flagged anomalous and not acted on
    #[arg(long, env = "EV_CEILING", global = true)]
    pub ev_ceiling: Option<f64>,

    /// Default fractional Kelly multiplier
    #[arg(long, env = "KELLY_FRACTION", default_value = "0.5", global = true)]
    pub kelly_fraction: f64,

    /// Lowest Kelly multiplier a request may ask for
    #[arg(long, env = "KELLY_MIN", default_value = "0.1", global = true)]
    pub kelly_min: f64,

    /// Highest Kelly multiplier a request may ask for
    #[arg(long, env = "KELLY_MAX", default_value = "1.0", global = true)]
    pub kelly_max: f64,

    /// Multiplier for minutes 0–35 (overrides the preset)
    #[arg(long, env = "FACTOR_OPENING", global = true)]
    pub f1: Option<f64>,

    /// Multiplier for minutes 36–45 (overrides the preset)
    #[arg(long, env = "FACTOR_FIRST_HALF_CLOSE", global = true)]
    pub f2: Option<f64>,

    /// Multiplier for minutes 46–80 (overrides the preset)
    #[arg(long, env = "FACTOR_SECOND_HALF", global = true)]
    pub f3: Option<f64>,

    /// Multiplier for minutes 81–95 (overrides the preset)
    #[arg(long, env = "FACTOR_CLOSING", global = true)]
    pub f4: Option<f64>,

    /// Lowest temporal multiplier accepted
    #[arg(long, env = "FACTOR_MIN", default_value = "0.5", global = true)]
    pub factor_min: f64,

    /// Highest temporal multiplier accepted
    #[arg(long, env = "FACTOR_MAX", default_value = "1.5", global = true)]
    pub factor_max: f64,

    /// Base-rate policy (overrides the preset)
    #[arg(long, env = "RATE_BLEND", value_enum, global = true)]
    pub rate_blend: Option<RateBlend>,

    /// Integer-line settlement convention (overrides the preset)
    #[arg(long, env = "LINE_CONVENTION", value_enum, global = true)]
    pub line_convention: Option<LineConvention>,

    /// JSON file extending or overriding the league calibration table
    #[arg(long, env = "LEAGUE_TABLE", global = true)]
    pub league_table: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Price one in-play snapshot and print the report as JSON
    Price(PriceArgs),
    /// Serve the pricing API over HTTP
    Serve {
        /// Listen address
        #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
        listen_addr: String,
    },
    /// List the league calibration table
    Leagues,
}

#[derive(Args, Debug, Clone)]
pub struct PriceArgs {
    /// Minutes played so far (0–95)
    #[arg(long)]
    pub minutes: u32,

    /// Corners taken so far
    #[arg(long)]
    pub count: u32,

    /// Expected full-match corners
    #[arg(long)]
    pub league_average: Option<f64>,

    /// League name for dispersion (and average, if calibrated)
    #[arg(long)]
    pub league: Option<String>,

    /// Explicit dispersion k
    #[arg(long)]
    pub k: Option<f64>,

    /// Tempo preset for dispersion
    #[arg(long, value_enum)]
    pub tempo: Option<Tempo>,

    /// Home team corners for, per match
    #[arg(long, requires = "home_against")]
    pub home_for: Option<f64>,

    /// Home team corners against, per match
    #[arg(long, requires = "away_for")]
    pub home_against: Option<f64>,

    /// Away team corners for, per match
    #[arg(long, requires = "away_against")]
    pub away_for: Option<f64>,

    /// Away team corners against, per match
    #[arg(long, requires = "home_for")]
    pub away_against: Option<f64>,

    /// Game state label
    #[arg(long, default_value = "balanced")]
    pub scenario: String,

    /// Total corners line, in 0.5 steps
    #[arg(long)]
    pub line: f64,

    #[arg(long, default_value = "1.90")]
    pub odds_over: f64,

    #[arg(long, default_value = "1.90")]
    pub odds_under: f64,

    /// Bankroll the stake is sized from
    #[arg(long, default_value = "1000.0")]
    pub bankroll: f64,

    /// Kelly multiplier for this evaluation
    #[arg(long)]
    pub kelly_fraction: Option<f64>,
}

impl PriceArgs {
    pub fn to_request(&self) -> PricingRequest {
        let matchup = match (self.home_for, self.home_against, self.away_for, self.away_against) {
            (Some(home_for), Some(home_against), Some(away_for), Some(away_against)) => {
                Some(MatchupAverages {
                    home_for,
                    home_against,
                    away_for,
                    away_against,
                })
            }
            _ => None,
        };
        PricingRequest {
            minutes_played: self.minutes,
            current_count: self.count,
            league_average: self.league_average,
            matchup,
            league: self.league.clone(),
            dispersion: self.k,
            tempo: self.tempo,
            scenario: GameState::from(self.scenario.clone()),
            line: self.line,
            odds_over: self.odds_over,
            odds_under: self.odds_under,
            bankroll: self.bankroll,
            kelly_fraction: self.kelly_fraction,
            temporal: None,
        }
    }
}

/// Historical variants of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// League-pace projection, EV threshold 0.05, legacy integer lines
    V8,
    /// Hybrid-pace projection, EV threshold 0.10, corrected integer lines
    V9,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Bounds { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Accepted ranges for request fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputLimits {
    pub max_count: u32,
    pub league_average: Bounds,
    pub dispersion: Bounds,
    pub odds: Bounds,
    pub line: Bounds,
    pub temporal_factor: Bounds,
    pub kelly_fraction: Bounds,
    pub team_average_max: f64,
}

impl Default for InputLimits {
    fn default() -> Self {
        InputLimits {
            max_count: 30,
            league_average: Bounds::new(5.0, 20.0),
            dispersion: Bounds::new(0.5, 4.0),
            odds: Bounds::new(1.01, 10.0),
            line: Bounds::new(0.5, 25.0),
            temporal_factor: Bounds::new(0.5, 1.5),
            kelly_fraction: Bounds::new(0.1, 1.0),
            team_average_max: 15.0,
        }
    }
}

/// Immutable settings every evaluation runs against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub preset: Preset,
    pub temporal: TemporalFactors,
    pub rate_blend: RateBlend,
    pub line_convention: LineConvention,
    pub ev_threshold: f64,
    pub min_odd_ev_target: f64,
    pub ev_ceiling: Option<f64>,
    pub kelly_fraction: f64,
    pub limits: InputLimits,
}

impl EngineConfig {
    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::V8 => EngineConfig {
                preset,
                temporal: TemporalFactors::new(0.90, 1.10, 0.95, 1.20),
                rate_blend: RateBlend::LeagueOnly,
                line_convention: LineConvention::Legacy,
                ev_threshold: 0.05,
                min_odd_ev_target: 0.05,
                ev_ceiling: None,
                kelly_fraction: 0.5,
                limits: InputLimits::default(),
            },
            Preset::V9 => EngineConfig {
                preset,
                temporal: TemporalFactors::new(0.90, 1.10, 0.95, 1.25),
                rate_blend: RateBlend::Hybrid,
                line_convention: LineConvention::Corrected,
                ev_threshold: 0.10,
                min_odd_ev_target: 0.10,
                ev_ceiling: None,
                kelly_fraction: 0.5,
                limits: InputLimits::default(),
            },
        }
    }

    pub fn decision_policy(&self, kelly_fraction: f64) -> DecisionPolicy {
        DecisionPolicy {
            ev_threshold: self.ev_threshold,
            ev_ceiling: self.ev_ceiling,
            kelly_fraction,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig::preset(Preset::V9)
    }
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(self.kelly_min > 0.0 && self.kelly_min <= self.kelly_max && self.kelly_max <= 1.0) {
            anyhow::bail!("kelly range must satisfy 0 < kelly_min <= kelly_max <= 1");
        }
        if !(self.kelly_min..=self.kelly_max).contains(&self.kelly_fraction) {
            anyhow::bail!(
                "kelly_fraction must be between {} and {}",
                self.kelly_min,
                self.kelly_max
            );
        }
        if !(self.factor_min > 0.0 && self.factor_min <= self.factor_max) {
            anyhow::bail!("temporal factor range must satisfy 0 < factor_min <= factor_max");
        }
        for (name, value) in [("f1", self.f1), ("f2", self.f2), ("f3", self.f3), ("f4", self.f4)] {
            if let Some(v) = value {
                if !(self.factor_min..=self.factor_max).contains(&v) {
                    anyhow::bail!(
                        "{} must be between {} and {}",
                        name,
                        self.factor_min,
                        self.factor_max
                    );
                }
            }
        }
        if let Some(t) = self.ev_threshold {
            if !t.is_finite() {
                anyhow::bail!("ev_threshold must be finite");
            }
        }
        if let Some(t) = self.min_odd_ev_target {
            if !t.is_finite() || t <= -1.0 {
                anyhow::bail!("min_odd_ev_target must be finite and greater than -1");
            }
        }
        if let (Some(ceiling), threshold) = (self.ev_ceiling, self.effective_threshold()) {
            if ceiling < threshold {
                anyhow::bail!(
                    "ev_ceiling ({}) must not be below the EV threshold ({})",
                    ceiling,
                    threshold
                );
            }
        }
        Ok(())
    }

    fn effective_threshold(&self) -> f64 {
        self.ev_threshold
            .unwrap_or_else(|| EngineConfig::preset(self.preset).ev_threshold)
    }

    /// Preset defaults with every explicit override applied.
    pub fn engine_config(&self) -> Result<EngineConfig> {
        self.validate()?;
        let mut cfg = EngineConfig::preset(self.preset);
        let base = cfg.temporal;
        cfg.temporal = TemporalFactors::new(
            self.f1.unwrap_or(base.opening),
            self.f2.unwrap_or(base.first_half_close),
            self.f3.unwrap_or(base.second_half),
            self.f4.unwrap_or(base.closing),
        );
        if let Some(blend) = self.rate_blend {
            cfg.rate_blend = blend;
        }
        if let Some(convention) = self.line_convention {
            cfg.line_convention = convention;
        }
        if let Some(t) = self.ev_threshold {
            cfg.ev_threshold = t;
        }
        if let Some(t) = self.min_odd_ev_target {
            cfg.min_odd_ev_target = t;
        }
        cfg.ev_ceiling = self.ev_ceiling;
        cfg.kelly_fraction = self.kelly_fraction;
        cfg.limits.kelly_fraction = Bounds::new(self.kelly_min, self.kelly_max);
        cfg.limits.temporal_factor = Bounds::new(self.factor_min, self.factor_max);
        Ok(cfg)
    }
}
