pub mod league;
pub mod projection;
pub mod scenario;
pub mod temporal;

pub use league::LeagueTable;
pub use projection::{project, MatchState, Projection, RateBlend, MATCH_MINUTES};
pub use scenario::GameState;
pub use temporal::TemporalFactors;
