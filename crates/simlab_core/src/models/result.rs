//! Per-trial simulation records.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::game::GameState;

/// Player and game ordering for one slate, shared by every trial record.
#[derive(Debug, Clone, PartialEq)]
pub struct SlateIndex {
    player_ids: Vec<String>,
    player_lookup: HashMap<String, usize>,
    game_ids: Vec<String>,
    game_lookup: HashMap<String, usize>,
}

impl SlateIndex {
    pub fn new(player_ids: Vec<String>, game_ids: Vec<String>) -> Self {
        let player_lookup = player_ids.iter().enumerate().map(|(i, id)| (id.clone(), i)).collect();
        let game_lookup = game_ids.iter().enumerate().map(|(i, id)| (id.clone(), i)).collect();
        Self { player_ids, player_lookup, game_ids, game_lookup }
    }

    pub fn player_ids(&self) -> &[String] {
        &self.player_ids
    }

    pub fn game_ids(&self) -> &[String] {
        &self.game_ids
    }

    pub fn player_index(&self, player_id: &str) -> Option<usize> {
        self.player_lookup.get(player_id).copied()
    }

    pub fn game_index(&self, game_id: &str) -> Option<usize> {
        self.game_lookup.get(game_id).copied()
    }

    pub fn n_players(&self) -> usize {
        self.player_ids.len()
    }
}

/// One trial: a non-negative score per player plus each game's realized state.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub sim_id: usize,
    /// Child seed this trial's random streams were built from
    pub random_seed: u64,
    scores: Vec<f64>,
    game_states: Vec<GameState>,
    index: Arc<SlateIndex>,
}

impl SimulationResult {
    pub(crate) fn new(
        sim_id: usize,
        random_seed: u64,
        scores: Vec<f64>,
        game_states: Vec<GameState>,
        index: Arc<SlateIndex>,
    ) -> Self {
        debug_assert_eq!(scores.len(), index.n_players());
        Self { sim_id, random_seed, scores, game_states, index }
    }

    pub fn score(&self, player_id: &str) -> Option<f64> {
        self.index.player_index(player_id).map(|i| self.scores[i])
    }

    /// Scores in slate order.
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    pub fn player_scores(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.index.player_ids().iter().map(String::as_str).zip(self.scores.iter().copied())
    }

    pub fn game_state(&self, game_id: &str) -> Option<&GameState> {
        self.index.game_index(game_id).map(|i| &self.game_states[i])
    }

    pub fn game_states(&self) -> &[GameState] {
        &self.game_states
    }

    /// Owned, id-keyed form for export collaborators.
    pub fn to_record(&self) -> TrialRecord {
        TrialRecord {
            sim_id: self.sim_id,
            random_seed: self.random_seed,
            player_scores: self.player_scores().map(|(id, s)| (id.to_string(), s)).collect(),
            game_states: self
                .game_states
                .iter()
                .map(|g| (g.game_id.clone(), g.clone()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub sim_id: usize,
    pub random_seed: u64,
    pub player_scores: BTreeMap<String, f64>,
    pub game_states: BTreeMap<String, GameState>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_and_record() {
        let index = Arc::new(SlateIndex::new(
            vec!["qb1".to_string(), "wr1".to_string()],
            vec![],
        ));
        let result = SimulationResult::new(7, 99, vec![21.5, 14.0], vec![], index);
        assert_eq!(result.score("wr1"), Some(14.0));
        assert_eq!(result.score("rb9"), None);
        assert!(result.game_state("g1").is_none());

        let record = result.to_record();
        assert_eq!(record.sim_id, 7);
        assert_eq!(record.random_seed, 99);
        assert_eq!(record.player_scores.get("qb1"), Some(&21.5));

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"qb1\":21.5"));
    }
}
