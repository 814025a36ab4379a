//! League calibration: dispersion `k` per league, tempo presets, and the
//! matchup baseline built from team averages.
//!
//! The built-in `k` values are maximum-likelihood fits of a negative
//! binomial to full-match corner totals. Lower `k` means corners arrive in
//! streaks more often than a Poisson process would predict.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::InputError;

/// `k` used when nothing more specific is known.
pub const DEFAULT_DISPERSION: f64 = 2.00;
/// Name of the catch-all entry.
pub const CUSTOM_LEAGUE: &str = "Other / Custom";

const BUILTIN_LEAGUES: [(&str, f64); 15] = [
    ("La Liga 2", 2.78),
    ("Serie A", 2.62),
    ("Primeira Liga", 2.51),
    ("La Liga", 2.45),
    ("Serie B", 2.10),
    ("Eredivisie", 1.94),
    ("Scottish Premiership", 1.85),
    ("Ligue 1", 1.82),
    ("Bundesliga", 1.62),
    ("Pro League", 1.58),
    ("2. Bundesliga", 1.35),
    ("Premier League", 1.32),
    ("Championship", 1.21),
    ("Super Lig", 1.14),
    (CUSTOM_LEAGUE, DEFAULT_DISPERSION),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueProfile {
    pub name: String,
    /// Negative-binomial dispersion
    pub k: f64,
    /// Average full-match corners, when calibrated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueTable {
    leagues: Vec<LeagueProfile>,
}

impl LeagueTable {
    pub fn builtin() -> Self {
        LeagueTable {
            leagues: BUILTIN_LEAGUES
                .iter()
                .map(|(name, k)| LeagueProfile {
                    name: (*name).to_string(),
                    k: *k,
                    average: None,
                })
                .collect(),
        }
    }

    /// Built-in table with the entries of a JSON file merged on top.
    ///
    /// The file is an array of `{ "name", "k", "average"? }` objects. An entry
    /// whose name matches a built-in league replaces it.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read league table {}", path.display()))?;
        let overrides: Vec<LeagueProfile> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse league table {}", path.display()))?;
        for entry in &overrides {
            if !(entry.k.is_finite() && entry.k > 0.0) {
                anyhow::bail!("league '{}' has non-positive k {}", entry.name, entry.k);
            }
            if let Some(avg) = entry.average {
                if !(avg.is_finite() && avg > 0.0) {
                    anyhow::bail!("league '{}' has non-positive average {}", entry.name, avg);
                }
            }
        }
        let mut table = Self::builtin();
        let count = overrides.len();
        for entry in overrides {
            table.upsert(entry);
        }
        info!("Loaded {} league calibration(s) from {}", count, path.display());
        Ok(table)
    }

    pub fn upsert(&mut self, profile: LeagueProfile) {
        let key = slug(&profile.name);
        match self.leagues.iter_mut().find(|l| slug(&l.name) == key) {
            Some(existing) => *existing = profile,
            None => self.leagues.push(profile),
        }
    }

    /// Case- and punctuation-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&LeagueProfile> {
        let key = slug(name);
        self.leagues.iter().find(|l| slug(&l.name) == key)
    }

    pub fn lookup(&self, name: &str) -> Result<&LeagueProfile, InputError> {
        self.get(name)
            .ok_or_else(|| InputError::UnknownLeague(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &LeagueProfile> {
        self.leagues.iter()
    }

    pub fn len(&self) -> usize {
        self.leagues.len()
    }
}

impl Default for LeagueTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn slug(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Hand-picked dispersion by how the match is being played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Tempo {
    /// Patient build-up, corners spread out
    Cadenced,
    Standard,
    /// All-out pressure, corners in bursts
    FullPressure,
}

impl Tempo {
    pub fn dispersion(self) -> f64 {
        match self {
            Tempo::Cadenced => 2.0,
            Tempo::Standard => 1.5,
            Tempo::FullPressure => 1.1,
        }
    }
}

/// Season corner averages of the two teams, for and against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchupAverages {
    pub home_for: f64,
    pub home_against: f64,
    pub away_for: f64,
    pub away_against: f64,
}

impl MatchupAverages {
    /// Expected full-match corners for this pairing.
    pub fn baseline(&self) -> f64 {
        ((self.home_for + self.away_for) + (self.home_against + self.away_against)) / 2.0
    }

    pub fn fields(&self) -> [(&'static str, f64); 4] {
        [
            ("home_for", self.home_for),
            ("home_against", self.home_against),
            ("away_for", self.away_for),
            ("away_against", self.away_against),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn builtin_table_has_calibrated_leagues() {
        let table = LeagueTable::builtin();
        assert_eq!(table.len(), 15);
        assert_relative_eq!(table.get("Serie A").unwrap().k, 2.62);
        assert_relative_eq!(table.get("Super Lig").unwrap().k, 1.14);
        assert_relative_eq!(table.get(CUSTOM_LEAGUE).unwrap().k, DEFAULT_DISPERSION);
    }

    #[test]
    fn lookup_ignores_case_and_punctuation() {
        let table = LeagueTable::builtin();
        assert_eq!(table.get("premier-league").unwrap().name, "Premier League");
        assert_eq!(table.get("2 bundesliga").unwrap().name, "2. Bundesliga");
        // "La Liga" must not collide with "La Liga 2"
        assert_relative_eq!(table.get("la liga").unwrap().k, 2.45);
        assert_relative_eq!(table.get("LA LIGA 2").unwrap().k, 2.78);
    }

    #[test]
    fn unknown_league_is_an_input_error() {
        let table = LeagueTable::builtin();
        assert_eq!(
            table.lookup("Sunday League").unwrap_err(),
            InputError::UnknownLeague("Sunday League".into())
        );
    }

    #[test]
    fn upsert_replaces_and_extends() {
        let mut table = LeagueTable::builtin();
        table.upsert(LeagueProfile {
            name: "serie a".into(),
            k: 2.7,
            average: Some(9.8),
        });
        table.upsert(LeagueProfile {
            name: "J1 League".into(),
            k: 1.9,
            average: Some(10.1),
        });
        assert_eq!(table.len(), 16);
        let serie_a = table.get("Serie A").unwrap();
        assert_relative_eq!(serie_a.k, 2.7);
        assert_eq!(serie_a.average, Some(9.8));
        assert!(table.get("j1 league").is_some());
    }

    #[test]
    fn load_merges_file_over_builtin() {
        let path = std::env::temp_dir().join(format!("leagues-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"[{"name": "Premier League", "k": 1.40, "average": 10.3}, {"name": "MLS", "k": 1.75}]"#,
        )
        .unwrap();
        let table = LeagueTable::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_relative_eq!(table.get("Premier League").unwrap().k, 1.40);
        assert_eq!(table.get("Premier League").unwrap().average, Some(10.3));
        assert_eq!(table.get("mls").unwrap().average, None);
    }

    #[test]
    fn load_rejects_non_positive_k() {
        let path = std::env::temp_dir().join(format!("leagues-bad-{}.json", std::process::id()));
        std::fs::write(&path, r#"[{"name": "Broken", "k": 0.0}]"#).unwrap();
        let result = LeagueTable::load(&path);
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }

    #[test]
    fn tempo_presets() {
        assert_relative_eq!(Tempo::Cadenced.dispersion(), 2.0);
        assert_relative_eq!(Tempo::Standard.dispersion(), 1.5);
        assert_relative_eq!(Tempo::FullPressure.dispersion(), 1.1);
    }

    #[test]
    fn matchup_baseline_averages_for_and_against() {
        let m = MatchupAverages {
            home_for: 5.5,
            home_against: 3.0,
            away_for: 4.5,
            away_against: 4.0,
        };
        assert_relative_eq!(m.baseline(), 8.5, epsilon = 1e-12);
    }
}
