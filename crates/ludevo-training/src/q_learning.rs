//! Tabular Q-learning for Quixo.
//!
//! The player learns an action-value table keyed by `(board, player, move)`.
//! Unlike the genetic player's move memory, the key *includes* the player to
//! move: the same board is a different decision problem for each side.
//!
//! Rewards are shaped: every move is immediately credited with its
//! triangular-run fitness, and the match driver applies a terminal +1/-1
//! through [`QLearningPlayer::reinforce`] when the game ends.

use std::collections::HashMap;

use rand::{Rng as _, seq::IndexedRandom as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use ludevo_engine::{
    Game, MoveSelectionError, Player, PlayerId, Quixo, QuixoBoard, QuixoMove, QuixoState, RngSeed,
};
use ludevo_evaluator::{MoveScorer, TriangularRuns};

type QKey = (QuixoBoard, PlayerId, QuixoMove);

/// One exported table row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QTableEntry {
    pub board: QuixoBoard,
    pub player: PlayerId,
    pub mv: QuixoMove,
    pub value: f64,
}

/// Action-value table with default-zero reads.
#[derive(Debug, Clone, Default)]
pub struct QTable {
    values: HashMap<QKey, f64>,
}

impl QTable {
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Q-value for a state-action pair; unseen pairs read as 0.0.
    #[must_use]
    pub fn get(&self, board: QuixoBoard, player: PlayerId, mv: QuixoMove) -> f64 {
        self.values.get(&(board, player, mv)).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, board: QuixoBoard, player: PlayerId, mv: QuixoMove, value: f64) {
        self.values.insert((board, player, mv), value);
    }

    /// All known moves for one decision point.
    pub fn moves_for(
        &self,
        board: QuixoBoard,
        player: PlayerId,
    ) -> impl Iterator<Item = (QuixoMove, f64)> + '_ {
        self.values
            .iter()
            .filter(move |((b, p, _), _)| *b == board && *p == player)
            .map(|((_, _, mv), value)| (*mv, *value))
    }

    /// Highest known value for one decision point; 0.0 when nothing is
    /// known (the conventional optimistic-neutral default).
    #[must_use]
    pub fn best_value(&self, board: QuixoBoard, player: PlayerId) -> f64 {
        self.moves_for(board, player)
            .map(|(_, value)| value)
            .fold(0.0, f64::max)
    }
}

impl Serialize for QTable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut entries: Vec<QTableEntry> = self
            .values
            .iter()
            .map(|(&(board, player, mv), &value)| QTableEntry {
                board,
                player,
                mv,
                value,
            })
            .collect();
        entries.sort_by(|a, b| b.value.total_cmp(&a.value));
        entries.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for QTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let entries = Vec::<QTableEntry>::deserialize(deserializer)?;
        let values = entries
            .into_iter()
            .map(|entry| ((entry.board, entry.player, entry.mv), entry.value))
            .collect();
        Ok(Self { values })
    }
}

/// ε-greedy tabular Q-learning player for Quixo.
#[derive(Debug)]
pub struct QLearningPlayer {
    alpha: f64,
    gamma: f64,
    epsilon: f64,
    table: QTable,
    last: Option<(QuixoBoard, PlayerId, QuixoMove)>,
    scorer: MoveScorer<TriangularRuns>,
    rng: Pcg32,
}

impl QLearningPlayer {
    /// # Arguments
    ///
    /// * `alpha` - learning rate
    /// * `gamma` - discount factor
    /// * `epsilon` - exploration rate
    #[must_use]
    pub fn new(alpha: f64, gamma: f64, epsilon: f64) -> Self {
        Self::with_seed(alpha, gamma, epsilon, rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(alpha: f64, gamma: f64, epsilon: f64, seed: RngSeed) -> Self {
        Self {
            alpha,
            gamma,
            epsilon,
            table: QTable::new(),
            last: None,
            scorer: MoveScorer::new(TriangularRuns),
            rng: seed.rng(),
        }
    }

    /// Resumes from a previously exported table.
    #[must_use]
    pub fn with_table(mut self, table: QTable) -> Self {
        self.table = table;
        self
    }

    /// Freezes or re-opens exploration; evaluation runs set this to 0.0.
    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon;
    }

    #[must_use]
    pub fn table(&self) -> &QTable {
        &self.table
    }

    #[must_use]
    pub fn into_table(self) -> QTable {
        self.table
    }

    /// Applies a terminal reward to the last state-action of this game.
    ///
    /// Terminal states have no successor, so the update omits the
    /// discounted next-state term.
    pub fn reinforce(&mut self, reward: f64) {
        if let Some((board, player, mv)) = self.last.take() {
            let current = self.table.get(board, player, mv);
            let updated = current + self.alpha * (reward - current);
            self.table.set(board, player, mv, updated);
        }
    }

    fn update(
        &mut self,
        board: QuixoBoard,
        player: PlayerId,
        mv: QuixoMove,
        reward: f64,
        next_board: QuixoBoard,
        next_player: PlayerId,
    ) {
        let current = self.table.get(board, player, mv);
        let next_best = self.table.best_value(next_board, next_player);
        let updated = current + self.alpha * (reward + self.gamma * next_best - current);
        self.table.set(board, player, mv, updated);
    }

    fn random_legal_move(&mut self, state: &QuixoState) -> Result<QuixoMove, MoveSelectionError> {
        Quixo::legal_moves(state)
            .choose(&mut self.rng)
            .copied()
            .ok_or(MoveSelectionError::NoLegalCandidate)
    }

    fn best_known_legal_move(&self, state: &QuixoState) -> Option<QuixoMove> {
        let board = *state.board();
        let player = Quixo::current_player(state);
        self.table
            .moves_for(board, player)
            .filter(|&(mv, _)| Quixo::is_legal(state, mv))
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(mv, _)| mv)
    }
}

impl Player<Quixo> for QLearningPlayer {
    fn choose_move(&mut self, state: &QuixoState) -> Result<QuixoMove, MoveSelectionError> {
        let board = *state.board();
        let player = Quixo::current_player(state);

        let mv = if self.epsilon > 0.0 && self.rng.random_bool(self.epsilon) {
            self.random_legal_move(state)?
        } else {
            match self.best_known_legal_move(state) {
                Some(mv) => mv,
                None => self.random_legal_move(state)?,
            }
        };

        // Shaped reward: the immediate fitness of the move, learned online.
        let reward = self.scorer.score::<Quixo>(state, mv);
        if let Ok(next) = Quixo::apply(state, mv) {
            self.update(
                board,
                player,
                mv,
                reward,
                *next.board(),
                Quixo::current_player(&next),
            );
        }
        self.last = Some((board, player, mv));
        Ok(mv)
    }
}
