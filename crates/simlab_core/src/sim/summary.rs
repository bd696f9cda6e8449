//! Per-player summary table, the interface lineup optimizers read.

use serde::{Deserialize, Serialize};

use crate::config::SummaryConfig;
use crate::error::Result;
use crate::estimators::{self, summarize};
use crate::models::{PlayerProjection, Position};

/// Diagnostic conditions worth a second look before a row is trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryFlag {
    /// Missing mean or non-positive std; every trial scored 0
    DegenerateDistribution,
    /// |mean - site projection| above the point limit
    LargeDelta,
    /// |pct delta| above the relative limit
    LargePctDelta,
    /// Mean outside the plausible range
    ExtremeMean,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Percentile {
    pub level: f64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub player_id: String,
    pub name: String,
    pub team: String,
    pub position: Position,
    pub salary: f64,
    pub site_projection: Option<f64>,

    pub n_trials: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub standard_error: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub min: f64,
    pub max: f64,
    pub percentiles: Vec<Percentile>,

    pub boom_threshold: f64,
    /// Share of trials scoring at or above `boom_threshold`
    pub boom_probability: f64,
    /// Mean score over boom trials
    pub boom_score: Option<f64>,
    pub zero_rate: f64,

    pub site_delta: Option<f64>,
    /// `delta / max(1, |site|)`
    pub site_pct_delta: Option<f64>,
    /// Share of trials strictly above the site projection
    pub beat_site_probability: Option<f64>,

    pub value_per_1k: Option<f64>,
    /// p90 per $1k of salary
    pub ceiling_per_1k: Option<f64>,

    pub flags: Vec<SummaryFlag>,
}

impl PlayerSummary {
    pub fn percentile(&self, level: f64) -> Option<f64> {
        self.percentiles.iter().find(|p| (p.level - level).abs() < 1e-12).map(|p| p.value)
    }

    pub fn has_flag(&self, flag: SummaryFlag) -> bool {
        self.flags.contains(&flag)
    }

    /// Summarizes one player's score column.
    pub fn from_scores(
        player: &PlayerProjection,
        scores: &[f64],
        config: &SummaryConfig,
    ) -> Result<Self> {
        let stats = summarize(scores, &config.percentile_levels, config.alpha)?;
        let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let n = scores.len().max(1) as f64;

        let boom_threshold = if player.boom_threshold > 0.0 {
            player.boom_threshold
        } else {
            config.boom_threshold(player.position)
        };
        let booms: Vec<f64> = scores.iter().copied().filter(|s| *s >= boom_threshold).collect();
        let boom_probability = booms.len() as f64 / n;
        let boom_score = (!booms.is_empty()).then(|| estimators::mean(&booms));
        let zero_rate = scores.iter().filter(|s| **s == 0.0).count() as f64 / n;

        let site = player.site_projection.filter(|s| *s > 0.0 && s.is_finite());
        let site_delta = site.map(|s| stats.mean - s);
        let site_pct_delta = site.map(|s| (stats.mean - s) / s.abs().max(1.0));
        let beat_site_probability =
            site.map(|s| scores.iter().filter(|v| **v > s).count() as f64 / n);

        let salary_k = (player.salary > 0.0).then_some(player.salary / 1000.0);
        let value_per_1k = salary_k.map(|k| stats.mean / k);
        let ceiling_per_1k = match salary_k {
            Some(k) => Some(estimators::quantile(scores, 0.9)? / k),
            None => None,
        };

        let mut flags = Vec::new();
        if !player.has_valid_distribution() {
            flags.push(SummaryFlag::DegenerateDistribution);
        }
        if site_delta.is_some_and(|d| d.abs() > config.large_delta_points) {
            flags.push(SummaryFlag::LargeDelta);
        }
        if site_pct_delta.is_some_and(|d| d.abs() > config.large_delta_pct) {
            flags.push(SummaryFlag::LargePctDelta);
        }
        if stats.mean < config.extreme_mean_min || stats.mean > config.extreme_mean_max {
            flags.push(SummaryFlag::ExtremeMean);
        }

        Ok(Self {
            player_id: player.player_id.clone(),
            name: player.name.clone(),
            team: player.team.clone(),
            position: player.position,
            salary: player.salary,
            site_projection: player.site_projection,
            n_trials: stats.n,
            mean: stats.mean,
            std_dev: stats.std_dev,
            standard_error: stats.standard_error,
            ci_lower: stats.confidence_interval.0,
            ci_upper: stats.confidence_interval.1,
            min: if scores.is_empty() { 0.0 } else { min },
            max: if scores.is_empty() { 0.0 } else { max },
            percentiles: stats
                .quantiles
                .iter()
                .map(|&(level, value)| Percentile { level, value })
                .collect(),
            boom_threshold,
            boom_probability,
            boom_score,
            zero_rate,
            site_delta,
            site_pct_delta,
            beat_site_probability,
            value_per_1k,
            ceiling_per_1k,
            flags,
        })
    }
}

/// Rows in slate order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryTable {
    rows: Vec<PlayerSummary>,
}

impl SummaryTable {
    /// One row per player from slate-ordered score columns.
    pub fn build(
        players: &[PlayerProjection],
        columns: &[Vec<f64>],
        config: &SummaryConfig,
    ) -> Result<Self> {
        let rows = players
            .iter()
            .zip(columns)
            .map(|(p, scores)| PlayerSummary::from_scores(p, scores, config))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[PlayerSummary] {
        &self.rows
    }

    pub fn get(&self, player_id: &str) -> Option<&PlayerSummary> {
        self.rows.iter().find(|r| r.player_id == player_id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn flagged(&self) -> impl Iterator<Item = &PlayerSummary> {
        self.rows.iter().filter(|r| !r.flags.is_empty())
    }

    /// Rows sorted by descending mean.
    pub fn ranked_by_mean(&self) -> Vec<&PlayerSummary> {
        let mut ranked: Vec<&PlayerSummary> = self.rows.iter().collect();
        ranked.sort_by(|a, b| b.mean.total_cmp(&a.mean));
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wr(site: Option<f64>) -> PlayerProjection {
        let mut p = PlayerProjection::new("wr1", "Receiver", "KC", Position::WR, 5000.0)
            .with_projection(10.0, 3.0);
        p.site_projection = site;
        p
    }

    #[test]
    fn test_row_metrics() {
        let scores: Vec<f64> = vec![0.0, 5.0, 10.0, 15.0, 20.0];
        let row = PlayerSummary::from_scores(&wr(Some(8.0)), &scores, &SummaryConfig::default())
            .unwrap();
        assert_eq!(row.n_trials, 5);
        assert!((row.mean - 10.0).abs() < 1e-12);
        assert_eq!(row.min, 0.0);
        assert_eq!(row.max, 20.0);
        assert!((row.zero_rate - 0.2).abs() < 1e-12);
        // WR default threshold 18
        assert!((row.boom_probability - 0.2).abs() < 1e-12);
        assert_eq!(row.boom_score, Some(20.0));
        assert!((row.site_delta.unwrap() - 2.0).abs() < 1e-12);
        assert!((row.site_pct_delta.unwrap() - 0.25).abs() < 1e-12);
        assert!((row.beat_site_probability.unwrap() - 0.6).abs() < 1e-12);
        assert!((row.value_per_1k.unwrap() - 2.0).abs() < 1e-12);
        // p90 = 18.0
        assert!((row.ceiling_per_1k.unwrap() - 3.6).abs() < 1e-12);
        assert!(row.flags.is_empty());
        assert!(row.percentile(0.5).is_some());
    }

    #[test]
    fn test_player_threshold_overrides_position() {
        let p = wr(None).with_boom_threshold(12.0);
        let row = PlayerSummary::from_scores(&p, &[10.0, 12.0, 14.0], &SummaryConfig::default())
            .unwrap();
        assert_eq!(row.boom_threshold, 12.0);
        assert!((row.boom_probability - 2.0 / 3.0).abs() < 1e-12);
        assert!(row.site_delta.is_none());
        assert!(row.beat_site_probability.is_none());
    }

    #[test]
    fn test_flags() {
        let cfg = SummaryConfig::default();
        let row = PlayerSummary::from_scores(&wr(Some(30.0)), &[10.0, 12.0], &cfg).unwrap();
        assert!(row.has_flag(SummaryFlag::LargeDelta));
        assert!(row.has_flag(SummaryFlag::LargePctDelta));

        let bare = PlayerProjection::new("x", "X", "KC", Position::TE, 3000.0);
        let row = PlayerSummary::from_scores(&bare, &[0.0, 0.0, 0.0], &cfg).unwrap();
        assert!(row.has_flag(SummaryFlag::DegenerateDistribution));
        assert_eq!(row.boom_score, None);
        assert_eq!(row.zero_rate, 1.0);

        let huge = PlayerSummary::from_scores(&wr(None), &[150.0, 160.0], &cfg).unwrap();
        assert!(huge.has_flag(SummaryFlag::ExtremeMean));
    }

    #[test]
    fn test_table_lookup_and_ranking() {
        let a = wr(None);
        let mut b = wr(None);
        b.player_id = "wr2".to_string();
        let table = SummaryTable::build(
            &[a, b],
            &[vec![1.0, 2.0, 3.0], vec![7.0, 8.0, 9.0]],
            &SummaryConfig::default(),
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.ranked_by_mean()[0].player_id, "wr2");
        assert!((table.get("wr1").unwrap().mean - 2.0).abs() < 1e-12);
        assert!(table.get("nope").is_none());
        assert_eq!(table.flagged().count(), 0);
    }

    #[test]
    fn test_zero_salary_skips_value() {
        let mut p = wr(None);
        p.salary = 0.0;
        let row = PlayerSummary::from_scores(&p, &[4.0, 6.0], &SummaryConfig::default()).unwrap();
        assert!(row.value_per_1k.is_none());
        assert!(row.ceiling_per_1k.is_none());
    }
}
