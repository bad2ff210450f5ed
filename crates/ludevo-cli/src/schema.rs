//! Serializable shapes for exported reports and trained models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ludevo_stats::DescriptiveStats;
use ludevo_training::QTable;

/// Turn-count distribution over a tournament.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurnSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
}

impl From<&DescriptiveStats> for TurnSummary {
    fn from(stats: &DescriptiveStats) -> Self {
        Self {
            min: stats.min,
            max: stats.max,
            mean: stats.mean,
            median: stats.median,
            std_dev: stats.std_dev,
        }
    }
}

/// Result of a `tournament` run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentReport {
    pub game: String,
    pub strategy_one: String,
    pub strategy_two: String,
    pub games_played: usize,
    pub wins_one: usize,
    pub wins_two: usize,
    pub draws: usize,
    pub win_rate_one: f64,
    pub win_rate_two: f64,
    /// Absent when no games were played.
    pub turns: Option<TurnSummary>,
    pub created_at: DateTime<Utc>,
}

/// A trained Q-learning policy as exported by `train-q`.
#[derive(Debug, Serialize, Deserialize)]
pub struct QPolicyModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    pub alpha: f64,
    pub gamma: f64,
    pub epsilon: f64,
    pub epochs: usize,
    pub table_entries: usize,
    pub win_rate_vs_random: f64,
    pub table: QTable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tournament_report_roundtrip() {
        let report = TournamentReport {
            game: "quixo".to_owned(),
            strategy_one: "genetic".to_owned(),
            strategy_two: "random".to_owned(),
            games_played: 20,
            wins_one: 15,
            wins_two: 4,
            draws: 1,
            win_rate_one: 0.75,
            win_rate_two: 0.2,
            turns: Some(TurnSummary {
                min: 5.0,
                max: 61.0,
                mean: 23.5,
                median: 21.0,
                std_dev: 9.1,
            }),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&report).unwrap();
        let restored: TournamentReport = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.games_played, 20);
        assert_eq!(restored.turns.unwrap(), report.turns.unwrap());
        assert_eq!(restored.created_at, report.created_at);
    }

    #[test]
    fn test_q_policy_model_roundtrip() {
        let model = QPolicyModel {
            name: "q-learning".to_owned(),
            trained_at: Utc::now(),
            alpha: 0.6,
            gamma: 0.5,
            epsilon: 0.3,
            epochs: 2_000,
            table_entries: 0,
            win_rate_vs_random: 0.8,
            table: QTable::new(),
        };
        let json = serde_json::to_string(&model).unwrap();
        let restored: QPolicyModel = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.name, "q-learning");
        assert!(restored.table.is_empty());
    }
}
