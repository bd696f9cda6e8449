//! Result cache at the orchestration boundary.
//!
//! The engine itself never memoizes. Callers that rerun identical slates wrap
//! a sampler in [`CachedSampler`] and pick a [`SimulationCache`]. Keys hash
//! every input that can change the output, so a hit is always the run the
//! engine would have produced.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use super::sampler::{CompletedRun, MonteCarloSampler};
use crate::config::{ModelConfig, SamplingConfig, SummaryConfig};
use crate::error::Result;
use crate::models::{GameEnvironment, PlayerProjection};

/// SHA-256 of the canonical JSON of every run input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunKey([u8; 32]);

/// Sampling fields that shape the output. Worker count and batch size only
/// change how trials are scheduled.
#[derive(Serialize)]
struct SamplingKey {
    n_trials: usize,
    base_seed: Option<u64>,
    volatility_multiplier: f64,
    correlation_strength: f64,
    include_correlations: bool,
}

impl From<&SamplingConfig> for SamplingKey {
    fn from(cfg: &SamplingConfig) -> Self {
        Self {
            n_trials: cfg.n_trials,
            base_seed: cfg.base_seed,
            volatility_multiplier: cfg.volatility_multiplier,
            correlation_strength: cfg.correlation_strength,
            include_correlations: cfg.include_correlations,
        }
    }
}

#[derive(Serialize)]
struct KeyMaterial<'a> {
    players: &'a [PlayerProjection],
    games: &'a [GameEnvironment],
    sampling: SamplingKey,
    model: &'a ModelConfig,
    summary: &'a SummaryConfig,
}

impl RunKey {
    pub fn compute(
        players: &[PlayerProjection],
        games: &[GameEnvironment],
        sampling: &SamplingConfig,
        model: &ModelConfig,
        summary: &SummaryConfig,
    ) -> Result<Self> {
        let material = KeyMaterial { players, games, sampling: sampling.into(), model, summary };
        let bytes = serde_json::to_vec(&material)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(Self(hasher.finalize().into()))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for RunKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

pub trait SimulationCache: Send + Sync {
    fn get(&self, key: &RunKey) -> Option<Arc<CompletedRun>>;
    fn insert(&self, key: RunKey, run: Arc<CompletedRun>);
}

/// Never stores anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl SimulationCache for NoCache {
    fn get(&self, _key: &RunKey) -> Option<Arc<CompletedRun>> {
        None
    }

    fn insert(&self, _key: RunKey, _run: Arc<CompletedRun>) {}
}

#[derive(Default)]
struct Entries {
    runs: HashMap<RunKey, Arc<CompletedRun>>,
    order: VecDeque<RunKey>,
}

/// Bounded map evicting the oldest insertion first.
pub struct InMemoryCache {
    capacity: usize,
    entries: Mutex<Entries>,
}

impl InMemoryCache {
    pub fn new(capacity: usize) -> Self {
        Self { capacity: capacity.max(1), entries: Mutex::new(Entries::default()) }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lock().runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut entries = self.lock();
        entries.runs.clear();
        entries.order.clear();
    }

    // No operation leaves `Entries` half-written; poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new(16)
    }
}

impl SimulationCache for InMemoryCache {
    fn get(&self, key: &RunKey) -> Option<Arc<CompletedRun>> {
        self.lock().runs.get(key).cloned()
    }

    fn insert(&self, key: RunKey, run: Arc<CompletedRun>) {
        let mut entries = self.lock();
        if entries.runs.insert(key, run).is_some() {
            return;
        }
        entries.order.push_back(key);
        while entries.order.len() > self.capacity {
            if let Some(oldest) = entries.order.pop_front() {
                entries.runs.remove(&oldest);
                debug!(key = %oldest, "evicted cached run");
            }
        }
    }
}

/// Sampler wrapper that consults a cache before running.
///
/// Unseeded configurations are never cached: each run draws fresh entropy,
/// so no earlier result stands in for it.
pub struct CachedSampler<C: SimulationCache> {
    sampler: MonteCarloSampler,
    cache: C,
}

impl<C: SimulationCache> CachedSampler<C> {
    pub fn new(sampler: MonteCarloSampler, cache: C) -> Self {
        Self { sampler, cache }
    }

    pub fn sampler(&self) -> &MonteCarloSampler {
        &self.sampler
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn key(&self, players: &[PlayerProjection], games: &[GameEnvironment]) -> Result<RunKey> {
        RunKey::compute(
            players,
            games,
            self.sampler.sampling_config(),
            self.sampler.model_config(),
            self.sampler.summary_config(),
        )
    }

    pub fn run(
        &self,
        players: &[PlayerProjection],
        games: &[GameEnvironment],
    ) -> Result<Arc<CompletedRun>> {
        if self.sampler.sampling_config().base_seed.is_none() {
            return Ok(Arc::new(self.sampler.run(players, games)?));
        }
        let key = self.key(players, games)?;
        if let Some(hit) = self.cache.get(&key) {
            debug!(key = %key, "cache hit");
            return Ok(hit);
        }
        let run = Arc::new(self.sampler.run(players, games)?);
        self.cache.insert(key, Arc::clone(&run));
        Ok(run)
    }
}
