use thiserror::Error;

/// Input rejected before it reaches the pricing core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("minutes played must be between 0 and {max}, got {value}")]
    MinutesOutOfRange { value: u32, max: u32 },

    #[error("current corner count must be between 0 and {max}, got {value}")]
    CountOutOfRange { value: u32, max: u32 },

    #[error("league average must be between {min} and {max}, got {value}")]
    LeagueAverageOutOfRange { value: f64, min: f64, max: f64 },

    #[error("dispersion k must be between {min} and {max}, got {value}")]
    DispersionOutOfRange { value: f64, min: f64, max: f64 },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OddsOutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("line must be between {min} and {max} in 0.5 steps, got {value}")]
    InvalidLine { value: f64, min: f64, max: f64 },

    #[error("bankroll must be a non-negative amount, got {0}")]
    InvalidBankroll(f64),

    #[error("kelly fraction must be between {min} and {max}, got {value}")]
    KellyFractionOutOfRange { value: f64, min: f64, max: f64 },

    #[error("temporal factor {field} must be between {min} and {max}, got {value}")]
    TemporalFactorOutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("team average {field} must be between 0 and {max}, got {value}")]
    TeamAverageOutOfRange {
        field: &'static str,
        value: f64,
        max: f64,
    },

    #[error("unknown league: {0}")]
    UnknownLeague(String),

    #[error("no league average supplied and none could be derived")]
    MissingLeagueAverage,
}

/// Failure inside a pricing evaluation.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    InvalidInput(#[from] InputError),

    #[error("cannot build corner distribution for k={k}, lambda={lambda}")]
    Distribution { k: f64, lambda: f64 },
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
