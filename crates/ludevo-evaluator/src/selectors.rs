//! Baseline move-selection strategies: uniform random, greedy one-step
//! argmax, and the Nim-specific exact baselines.

use std::marker::PhantomData;

use rand::{Rng as _, seq::IndexedRandom as _};
use rand_pcg::Pcg32;

use ludevo_engine::{
    Game, MoveSelectionError, Nim, NimState, Nimply, Player, RngSeed, nim_sum,
};

use crate::{heuristic::PositionHeuristic, move_scorer::MoveScorer};

/// Picks uniformly among the legal moves.
#[derive(Debug)]
pub struct RandomPlayer<G> {
    rng: Pcg32,
    _game: PhantomData<G>,
}

impl<G: Game> RandomPlayer<G> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: RngSeed) -> Self {
        Self {
            rng: seed.rng(),
            _game: PhantomData,
        }
    }
}

impl<G: Game> Default for RandomPlayer<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Game> Player<G> for RandomPlayer<G> {
    fn choose_move(&mut self, state: &G::State) -> Result<G::Move, MoveSelectionError> {
        G::legal_moves(state)
            .choose(&mut self.rng)
            .copied()
            .ok_or(MoveSelectionError::NoLegalCandidate)
    }
}

/// Exhaustive one-step argmax over the move scorer.
///
/// Evaluates every legal move and plays the highest-scoring one. Ties go to
/// the move encountered first in the stable `legal_moves` order.
#[derive(Debug)]
pub struct GreedyPlayer<G, H> {
    scorer: MoveScorer<H>,
    _game: PhantomData<G>,
}

impl<G: Game, H> GreedyPlayer<G, H> {
    pub fn new(heuristic: H) -> Self {
        Self {
            scorer: MoveScorer::new(heuristic),
            _game: PhantomData,
        }
    }
}

impl<G, H> Player<G> for GreedyPlayer<G, H>
where
    G: Game,
    H: PositionHeuristic<G>,
{
    fn choose_move(&mut self, state: &G::State) -> Result<G::Move, MoveSelectionError> {
        let mut best: Option<(G::Move, f64)> = None;
        for mv in G::legal_moves(state) {
            let score = self.scorer.score::<G>(state, mv);
            let improved = best.is_none_or(|(_, best_score)| score > best_score);
            if improved {
                best = Some((mv, score));
            }
        }
        best.map(|(mv, _)| mv)
            .ok_or(MoveSelectionError::NoLegalCandidate)
    }
}

/// Exact Nim baseline: always leaves the opponent a zero nim-sum when one is
/// reachable, picking uniformly among the tied optimal moves; otherwise
/// plays uniformly at random.
#[derive(Debug)]
pub struct NimSumPlayer {
    rng: Pcg32,
}

impl NimSumPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: RngSeed) -> Self {
        Self { rng: seed.rng() }
    }
}

impl Default for NimSumPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl Player<Nim> for NimSumPlayer {
    fn choose_move(&mut self, state: &NimState) -> Result<Nimply, MoveSelectionError> {
        let moves = Nim::legal_moves(state);
        let zeroing: Vec<Nimply> = moves
            .iter()
            .copied()
            .filter(|&mv| Nim::apply(state, mv).is_ok_and(|next| nim_sum(&next) == 0))
            .collect();
        let pool = if zeroing.is_empty() { &moves } else { &zeroing };
        pool.choose(&mut self.rng)
            .copied()
            .ok_or(MoveSelectionError::NoLegalCandidate)
    }
}

/// Naive Nim baseline: empties as much as allowed of the lowest-indexed
/// non-empty row.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowestRowPlayer;

impl Player<Nim> for LowestRowPlayer {
    fn choose_move(&mut self, state: &NimState) -> Result<Nimply, MoveSelectionError> {
        let (row, &count) = state
            .rows()
            .iter()
            .enumerate()
            .find(|&(_, &count)| count > 0)
            .ok_or(MoveSelectionError::NoLegalCandidate)?;
        let take = state.take_cap().map_or(count, |cap| count.min(cap));
        Ok(Nimply { row, take })
    }
}
