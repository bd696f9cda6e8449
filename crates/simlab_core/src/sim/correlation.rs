//! Correlation Model.
//!
//! Builds one correlation matrix per slate, repairs it to positive
//! semi-definite if needed, and factors it for drawing correlated
//! standard-normal shocks.
//!
//! ## Rule order
//! 1. QB ↔ same-team WR/TE (positive, grows with target share)
//! 2. RB ↔ same-team QB/WR/TE (negative, grows with carry share)
//! 3. Opposing-team players (negative, halved when a defense is involved)
//! 4. Same-team, same-position players (negative, amplified for WR/TE)
//! 5. Cross-team players in one game (weak positive)
//!
//! A rule never replaces an entry of strictly larger magnitude.

use nalgebra::{DMatrix, DVector, SymmetricEigen};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

use super::draws::standard_normal;
use crate::config::{CorrelationConfig, GameModelConfig};
use crate::models::{PlayerProjection, Position, Schedule};

/// Relationship between the two players of a listed pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PairKind {
    QbReceiver,
    RbPassingGame,
    SamePosition,
    SameTeam,
    OpposingTeam,
    SameGame,
}

impl fmt::Display for PairKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            PairKind::QbReceiver => "QB-Receiver",
            PairKind::RbPassingGame => "RB-PassingGame",
            PairKind::SamePosition => "SamePosition",
            PairKind::SameTeam => "SameTeam",
            PairKind::OpposingTeam => "OpposingTeam",
            PairKind::SameGame => "SameGame",
        };
        f.write_str(s)
    }
}

/// One off-diagonal entry for audit listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPair {
    pub player_a: String,
    pub team_a: String,
    pub position_a: Position,
    pub player_b: String,
    pub team_b: String,
    pub position_b: Position,
    pub correlation: f64,
    pub kind: PairKind,
}

fn classify(a: &PlayerProjection, b: &PlayerProjection, correlation: f64) -> PairKind {
    if a.team != b.team {
        return if correlation > 0.0 { PairKind::SameGame } else { PairKind::OpposingTeam };
    }
    let (pa, pb) = (a.position, b.position);
    if (pa == Position::QB && pb.is_receiver()) || (pb == Position::QB && pa.is_receiver()) {
        PairKind::QbReceiver
    } else if (pa == Position::RB && pb.is_passing_game())
        || (pb == Position::RB && pa.is_passing_game())
    {
        PairKind::RbPassingGame
    } else if pa == pb {
        PairKind::SamePosition
    } else {
        PairKind::SameTeam
    }
}

/// Smallest eigenvalue of a symmetric matrix; 0 for an empty one.
pub fn min_eigenvalue(m: &DMatrix<f64>) -> f64 {
    if m.nrows() == 0 {
        return 0.0;
    }
    SymmetricEigen::new(m.clone()).eigenvalues.iter().copied().fold(f64::INFINITY, f64::min)
}

/// Diagonal loading plus rescale to unit diagonal when the matrix is not PSD.
/// Returns whether a repair happened.
pub fn regularize(m: &mut DMatrix<f64>, tolerance: f64, pad: f64) -> bool {
    let min_eig = min_eigenvalue(m);
    if min_eig >= -tolerance {
        return false;
    }
    let n = m.nrows();
    let loading = min_eig.abs() + pad;
    for i in 0..n {
        m[(i, i)] += loading;
    }
    let scale: Vec<f64> = (0..n).map(|i| m[(i, i)].sqrt()).collect();
    for i in 0..n {
        for j in 0..n {
            m[(i, j)] /= scale[i] * scale[j];
        }
    }
    for i in 0..n {
        m[(i, i)] = 1.0;
        for j in (i + 1)..n {
            let avg = 0.5 * (m[(i, j)] + m[(j, i)]);
            m[(i, j)] = avg;
            m[(j, i)] = avg;
        }
    }
    warn!(min_eigenvalue = min_eig, loading, "correlation matrix regularized to PSD");
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    matrix: DMatrix<f64>,
    player_ids: Vec<String>,
    regularized: bool,
}

impl CorrelationMatrix {
    /// Identity over `player_ids`.
    pub fn identity(player_ids: Vec<String>) -> Self {
        let n = player_ids.len();
        Self { matrix: DMatrix::identity(n, n), player_ids, regularized: false }
    }

    /// Wraps an assembled matrix, repairing it if it is not PSD.
    pub fn from_matrix(
        mut matrix: DMatrix<f64>,
        player_ids: Vec<String>,
        config: &CorrelationConfig,
    ) -> Self {
        let regularized = regularize(&mut matrix, config.eigen_tolerance, config.regularization_pad);
        Self { matrix, player_ids, regularized }
    }

    pub fn dim(&self) -> usize {
        self.player_ids.len()
    }

    pub fn player_ids(&self) -> &[String] {
        &self.player_ids
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.matrix[(i, j)]
    }

    pub fn get_by_id(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.player_ids.iter().position(|id| id == a)?;
        let j = self.player_ids.iter().position(|id| id == b)?;
        Some(self.matrix[(i, j)])
    }

    /// True when construction needed diagonal loading.
    pub fn was_regularized(&self) -> bool {
        self.regularized
    }

    pub fn min_eigenvalue(&self) -> f64 {
        min_eigenvalue(&self.matrix)
    }

    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        let n = self.dim();
        (0..n).all(|i| (i..n).all(|j| (self.matrix[(i, j)] - self.matrix[(j, i)]).abs() <= tolerance))
    }

    /// Off-diagonals scaled by `strength` and clamped to [-1, 1], re-repaired.
    pub fn scaled(&self, strength: f64, config: &CorrelationConfig) -> Self {
        if (strength - 1.0).abs() < f64::EPSILON {
            return self.clone();
        }
        let n = self.dim();
        let mut m = self.matrix.clone();
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    m[(i, j)] = (m[(i, j)] * strength).clamp(-1.0, 1.0);
                }
            }
        }
        let mut scaled = Self::from_matrix(m, self.player_ids.clone(), config);
        scaled.regularized |= self.regularized;
        scaled
    }

    /// Factor `L` with `L Lᵀ = C`; lower-triangular when Cholesky succeeds.
    pub fn factor(&self) -> CorrelationFactor {
        if self.dim() == 0 {
            return CorrelationFactor { lower: DMatrix::zeros(0, 0), method: FactorMethod::Cholesky };
        }
        if let Some(chol) = self.matrix.clone().cholesky() {
            return CorrelationFactor { lower: chol.l(), method: FactorMethod::Cholesky };
        }
        warn!(dim = self.dim(), "cholesky failed, using eigen-decomposition square root");
        let eig = SymmetricEigen::new(self.matrix.clone());
        let roots = eig.eigenvalues.map(|v| v.max(0.0).sqrt());
        let lower = &eig.eigenvectors * DMatrix::from_diagonal(&roots);
        CorrelationFactor { lower, method: FactorMethod::Eigen }
    }

    /// Off-diagonal pairs at or above `min_magnitude`, strongest first.
    pub fn pairs(&self, players: &[PlayerProjection], min_magnitude: f64) -> Vec<CorrelationPair> {
        let lookup: HashMap<&str, &PlayerProjection> =
            players.iter().map(|p| (p.player_id.as_str(), p)).collect();
        let mut pairs = Vec::new();
        let n = self.dim();
        for i in 0..n {
            for j in (i + 1)..n {
                let rho = self.matrix[(i, j)];
                if rho.abs() < min_magnitude {
                    continue;
                }
                let (Some(a), Some(b)) = (
                    lookup.get(self.player_ids[i].as_str()),
                    lookup.get(self.player_ids[j].as_str()),
                ) else {
                    continue;
                };
                pairs.push(CorrelationPair {
                    player_a: a.player_id.clone(),
                    team_a: a.team.clone(),
                    position_a: a.position,
                    player_b: b.player_id.clone(),
                    team_b: b.team.clone(),
                    position_b: b.position,
                    correlation: rho,
                    kind: classify(a, b, rho),
                });
            }
        }
        pairs.sort_by(|x, y| y.correlation.abs().total_cmp(&x.correlation.abs()));
        pairs
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactorMethod {
    Cholesky,
    Eigen,
}

#[derive(Debug, Clone)]
pub struct CorrelationFactor {
    lower: DMatrix<f64>,
    method: FactorMethod,
}

impl CorrelationFactor {
    pub fn method(&self) -> FactorMethod {
        self.method
    }

    pub fn lower(&self) -> &DMatrix<f64> {
        &self.lower
    }

    /// One correlated standard-normal vector, in player order.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        let n = self.lower.nrows();
        if n == 0 {
            return Vec::new();
        }
        let z = DVector::from_iterator(n, (0..n).map(|_| standard_normal(rng)));
        (&self.lower * z).iter().copied().collect()
    }

    pub fn sample_batch<R: Rng + ?Sized>(&self, rng: &mut R, n_samples: usize) -> Vec<Vec<f64>> {
        (0..n_samples).map(|_| self.sample(rng)).collect()
    }
}

/// Writes `value` at (i, j) and (j, i) unless a strictly stronger entry is there.
fn set_unless_stronger(m: &mut DMatrix<f64>, i: usize, j: usize, value: f64) {
    if m[(i, j)].abs() > value.abs() {
        return;
    }
    m[(i, j)] = value;
    m[(j, i)] = value;
}

#[derive(Debug, Clone)]
pub struct CorrelationModel {
    config: CorrelationConfig,
    league_pass_attempts: f64,
    league_rush_attempts: f64,
}

impl Default for CorrelationModel {
    fn default() -> Self {
        Self::new(CorrelationConfig::default(), &GameModelConfig::default())
    }
}

impl CorrelationModel {
    pub fn new(config: CorrelationConfig, game: &GameModelConfig) -> Self {
        Self {
            config,
            league_pass_attempts: game.league_pass_attempts(),
            league_rush_attempts: game.league_rush_attempts(),
        }
    }

    pub fn config(&self) -> &CorrelationConfig {
        &self.config
    }

    fn target_share(&self, p: &PlayerProjection) -> f64 {
        p.target_share(self.league_pass_attempts).unwrap_or(self.config.default_share)
    }

    fn carry_share(&self, p: &PlayerProjection) -> f64 {
        p.carry_share(self.league_rush_attempts).unwrap_or(self.config.default_share)
    }

    /// Assembled and repaired matrix over `players`, in input order.
    pub fn build(&self, players: &[PlayerProjection], schedule: &Schedule) -> CorrelationMatrix {
        let cfg = &self.config;
        let n = players.len();
        let mut m = DMatrix::identity(n, n);

        // 1. QB <-> receivers
        for (i, qb) in players.iter().enumerate().filter(|(_, p)| p.position == Position::QB) {
            for (j, rec) in players.iter().enumerate() {
                if i == j || !rec.position.is_receiver() || rec.team != qb.team {
                    continue;
                }
                let rho = (cfg.qb_receiver_base * (1.0 + self.target_share(rec)))
                    .min(cfg.qb_receiver_max);
                set_unless_stronger(&mut m, i, j, rho);
            }
        }

        // 2. RB <-> passing game
        for (i, rb) in players.iter().enumerate().filter(|(_, p)| p.position == Position::RB) {
            let rho = (cfg.rb_passing_base * (1.0 + self.carry_share(rb))).max(cfg.rb_passing_min);
            for (j, other) in players.iter().enumerate() {
                if i == j || !other.position.is_passing_game() || other.team != rb.team {
                    continue;
                }
                set_unless_stronger(&mut m, i, j, rho);
            }
        }

        // 3. Opponents
        for i in 0..n {
            let Some(opponent) = schedule.opponent_of(&players[i].team) else {
                continue;
            };
            for j in (i + 1)..n {
                if players[j].team != opponent {
                    continue;
                }
                let mut rho = cfg.opposing_team;
                if players[i].position == Position::DST || players[j].position == Position::DST {
                    rho *= cfg.opposing_dst_factor;
                }
                set_unless_stronger(&mut m, i, j, rho);
            }
        }

        // 4. Same team, same position
        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = (&players[i], &players[j]);
                if a.team != b.team || a.position != b.position {
                    continue;
                }
                let mut rho = cfg.same_position;
                if a.position.is_receiver() {
                    rho *= cfg.same_position_receiver_factor;
                }
                set_unless_stronger(&mut m, i, j, rho.max(cfg.same_position_min));
            }
        }

        // 5. Same game, different team
        for i in 0..n {
            let Some(game_i) = schedule.game_of(&players[i].team) else {
                continue;
            };
            for j in (i + 1)..n {
                if players[j].team != players[i].team
                    && schedule.game_of(&players[j].team) == Some(game_i)
                {
                    set_unless_stronger(&mut m, i, j, cfg.same_game);
                }
            }
        }

        let ids = players.iter().map(|p| p.player_id.clone()).collect();
        let matrix = CorrelationMatrix::from_matrix(m, ids, cfg);
        debug!(
            players = n,
            regularized = matrix.was_regularized(),
            "correlation matrix built"
        );
        matrix
    }
}
