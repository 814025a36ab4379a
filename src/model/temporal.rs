//! Phase multipliers for the corner rate across the 95-minute match clock.
//!
//! Four contiguous phases cover the whole clock:
//!   [0, 35]  opening
//!   [36, 45] end of first half (pressure before the break)
//!   [46, 80] second half
//!   [81, 95] closing minutes (chasing teams push for set pieces)

use serde::{Deserialize, Serialize};

/// Last minute of the opening phase.
pub const OPENING_END: u32 = 35;
/// Last minute of the first half, stoppage time included.
pub const FIRST_HALF_END: u32 = 45;
/// Last minute of the main second-half phase.
pub const SECOND_HALF_END: u32 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemporalFactors {
    /// 0–35'
    pub opening: f64,
    /// 36–45'
    pub first_half_close: f64,
    /// 46–80'
    pub second_half: f64,
    /// 81–95'
    pub closing: f64,
}

impl TemporalFactors {
    pub const fn new(opening: f64, first_half_close: f64, second_half: f64, closing: f64) -> Self {
        TemporalFactors {
            opening,
            first_half_close,
            second_half,
            closing,
        }
    }

    /// Multiplier for the given minute of play.
    pub fn factor_at(&self, minute: u32) -> f64 {
        match minute {
            m if m <= OPENING_END => self.opening,
            m if m <= FIRST_HALF_END => self.first_half_close,
            m if m <= SECOND_HALF_END => self.second_half,
            _ => self.closing,
        }
    }

    pub fn as_array(&self) -> [f64; 4] {
        [
            self.opening,
            self.first_half_close,
            self.second_half,
            self.closing,
        ]
    }
}

impl Default for TemporalFactors {
    fn default() -> Self {
        TemporalFactors::new(0.90, 1.10, 0.95, 1.25)
    }
}
