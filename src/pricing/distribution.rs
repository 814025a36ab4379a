//! Negative-binomial model for the number of corners still to come.
//!
//! Parameterised by mean `lambda` and dispersion `k` (the "size" parameter):
//! success probability p = k / (k + lambda), so the mean is k(1-p)/p = lambda
//! and the variance is lambda + lambda²/k. Smaller `k` means fatter tails.

use statrs::distribution::{Discrete, NegativeBinomial};

use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone)]
enum Shape {
    NegBinomial(NegativeBinomial),
    /// lambda = 0: nothing more will happen
    PointMassAtZero,
    /// p = 0: all mass has escaped to infinity
    Vanishing,
}

#[derive(Debug, Clone)]
pub struct CornerDistribution {
    shape: Shape,
}

/// Success probability for mean `lambda` and dispersion `k`, 0 when both are 0.
pub fn success_probability(lambda: f64, k: f64) -> f64 {
    let denom = k + lambda;
    if denom == 0.0 {
        0.0
    } else {
        k / denom
    }
}

impl CornerDistribution {
    pub fn new(lambda: f64, k: f64) -> EngineResult<Self> {
        if !lambda.is_finite() || !k.is_finite() || lambda < 0.0 || k < 0.0 {
            return Err(EngineError::Distribution { k, lambda });
        }
        let p = success_probability(lambda, k);
        let shape = if p <= 0.0 {
            Shape::Vanishing
        } else if p >= 1.0 {
            Shape::PointMassAtZero
        } else {
            let nb = NegativeBinomial::new(k, p)
                .map_err(|_| EngineError::Distribution { k, lambda })?;
            Shape::NegBinomial(nb)
        };
        Ok(CornerDistribution { shape })
    }

    /// P(exactly `j` more corners). Negative `j` has no mass.
    pub fn pmf(&self, j: i64) -> f64 {
        if j < 0 {
            return 0.0;
        }
        match &self.shape {
            Shape::NegBinomial(nb) => nb.pmf(j as u64),
            Shape::PointMassAtZero => {
                if j == 0 {
                    1.0
                } else {
                    0.0
                }
            }
            Shape::Vanishing => 0.0,
        }
    }

    /// P(fewer than `n` more corners), summed term by term.
    pub fn prob_below(&self, n: i64) -> f64 {
        (0..n.max(0)).fold(0.0, |acc, j| acc + self.pmf(j))
    }
}
