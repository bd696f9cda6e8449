//! Sampling Configuration
//!
//! Run-level knobs: trial count, seed, volatility/correlation scaling and
//! parallelism hints. Immutable for the duration of one run.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SamplingConfig {
    /// Number of trials, > 0 (default: 10000)
    pub n_trials: usize,
    /// Base seed; `None` draws fresh entropy and the run is not reproducible
    /// until the recorded effective seed is reused (default: Some(42))
    pub base_seed: Option<u64>,
    /// Global volatility scale, >= 0; 1.0 = unscaled (default: 1.0)
    pub volatility_multiplier: f64,
    /// Scale on off-diagonal correlations, >= 0 (default: 1.0)
    pub correlation_strength: f64,
    /// Apply correlated shocks (default: true)
    pub include_correlations: bool,
    /// Worker count; 0 = every core rayon sees (default: 1)
    pub n_jobs: usize,
    /// Trials between progress log lines within a worker (default: 1000)
    pub batch_size: usize,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            n_trials: 10_000,
            base_seed: Some(42),
            volatility_multiplier: 1.0,
            correlation_strength: 1.0,
            include_correlations: true,
            n_jobs: 1,
            batch_size: 1_000,
        }
    }
}

impl SamplingConfig {
    pub fn new(n_trials: usize, base_seed: u64) -> Self {
        Self { n_trials, base_seed: Some(base_seed), ..Self::default() }
    }

    /// Small, fast run for smoke checks.
    pub fn quick() -> Self {
        Self { n_trials: 1_000, ..Self::default() }
    }

    pub fn with_n_jobs(mut self, n_jobs: usize) -> Self {
        self.n_jobs = n_jobs;
        self
    }

    pub fn with_correlations(mut self, include: bool) -> Self {
        self.include_correlations = include;
        self
    }

    pub fn with_volatility(mut self, multiplier: f64) -> Self {
        self.volatility_multiplier = multiplier;
        self
    }

    pub fn with_correlation_strength(mut self, strength: f64) -> Self {
        self.correlation_strength = strength;
        self
    }

    /// Worker count after resolving `0` to the rayon default.
    pub fn effective_jobs(&self) -> usize {
        if self.n_jobs == 0 {
            rayon::current_num_threads().max(1)
        } else {
            self.n_jobs
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.n_trials == 0 {
            return Err("n_trials must be > 0".to_string());
        }
        if !(self.volatility_multiplier >= 0.0 && self.volatility_multiplier.is_finite()) {
            return Err(format!(
                "volatility_multiplier {} must be finite and >= 0",
                self.volatility_multiplier
            ));
        }
        if !(self.correlation_strength >= 0.0 && self.correlation_strength.is_finite()) {
            return Err(format!(
                "correlation_strength {} must be finite and >= 0",
                self.correlation_strength
            ));
        }
        if self.batch_size == 0 {
            return Err("batch_size must be > 0".to_string());
        }
        Ok(())
    }
}
