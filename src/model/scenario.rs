//! Game-state multipliers applied to the projected remaining corners.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Qualitative match context used to scale the expected pace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GameState {
    /// Balanced / stable match
    #[default]
    Balanced,
    /// Favourite is losing: maximum pressure
    FavoriteLosing,
    /// Favourite is drawing: high pressure
    FavoriteDrawing,
    /// Favourite is winning and slows the tempo
    FavoriteWinningSlow,
    /// Favourite is winning comfortably and controls the ball
    FavoriteWinningControl,
    /// Any label outside the fixed set. Priced as neutral.
    Unrecognized(String),
}

impl GameState {
    /// The five recognised states, in display order.
    pub const KNOWN: [GameState; 5] = [
        GameState::Balanced,
        GameState::FavoriteLosing,
        GameState::FavoriteDrawing,
        GameState::FavoriteWinningSlow,
        GameState::FavoriteWinningControl,
    ];

    pub fn factor(&self) -> f64 {
        match self {
            GameState::Balanced => 1.00,
            GameState::FavoriteLosing => 1.35,
            GameState::FavoriteDrawing => 1.15,
            GameState::FavoriteWinningSlow => 0.80,
            GameState::FavoriteWinningControl => 0.65,
            GameState::Unrecognized(_) => 1.0,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            GameState::Balanced => "balanced",
            GameState::FavoriteLosing => "favorite_losing",
            GameState::FavoriteDrawing => "favorite_drawing",
            GameState::FavoriteWinningSlow => "favorite_winning_slow",
            GameState::FavoriteWinningControl => "favorite_winning_control",
            GameState::Unrecognized(s) => s.as_str(),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            GameState::Balanced => "Balanced / stable match",
            GameState::FavoriteLosing => "Favourite losing (maximum pressure)",
            GameState::FavoriteDrawing => "Favourite drawing (high pressure)",
            GameState::FavoriteWinningSlow => "Favourite winning (slow tempo)",
            GameState::FavoriteWinningControl => "Favourite winning comfortably (control)",
            GameState::Unrecognized(_) => "Unrecognised state (neutral)",
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parsing never fails: unknown labels become `Unrecognized`.
impl FromStr for GameState {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace(&['-', ' '][..], "_");
        Ok(match key.as_str() {
            "balanced" | "stable" => GameState::Balanced,
            "favorite_losing" | "favourite_losing" => GameState::FavoriteLosing,
            "favorite_drawing" | "favourite_drawing" => GameState::FavoriteDrawing,
            "favorite_winning_slow" | "favourite_winning_slow" => GameState::FavoriteWinningSlow,
            "favorite_winning_control" | "favourite_winning_control" => {
                GameState::FavoriteWinningControl
            }
            _ => GameState::Unrecognized(s.to_string()),
        })
    }
}

impl From<String> for GameState {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(state) => state,
            Err(never) => match never {},
        }
    }
}

impl From<GameState> for String {
    fn from(state: GameState) -> Self {
        state.label().to_string()
    }
}
