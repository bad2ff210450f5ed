//! Candidate spaces: everything the evolutionary driver needs to know about
//! one position.
//!
//! A space binds a single game state to a fitness strategy for the duration
//! of one search. Candidates are small copy-by-value move proposals; all
//! operators produce new candidates rather than mutating in place.

use std::{fmt, hash::Hash};

use rand::{Rng, seq::IndexedRandom as _};

use ludevo_engine::{Game, Nim, NimState, Nimply, Quixo, QuixoMove, QuixoState, Slide, BOARD_SIZE};
use ludevo_evaluator::{MoveScorer, PositionHeuristic};

/// One position's worth of candidate generation, validation, scoring, and
/// recombination.
pub trait CandidateSpace {
    type Candidate: Copy + Eq + Hash + fmt::Debug;

    /// Draws a uniformly random candidate. The draw may be illegal; callers
    /// filter through [`Self::is_legal`].
    fn random_candidate<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Candidate;

    fn is_legal(&self, candidate: Self::Candidate) -> bool;

    /// Fitness of `candidate` in this space's position. Illegal candidates
    /// receive the sentinel score and sort below every legal one.
    fn fitness(&self, candidate: Self::Candidate) -> f64;

    /// Field-wise recombination: each field of the child comes from one
    /// parent or the other with equal probability. With two-field
    /// candidates a positional split point degenerates to exactly this.
    fn crossover<R: Rng + ?Sized>(
        &self,
        a: Self::Candidate,
        b: Self::Candidate,
        rng: &mut R,
    ) -> Self::Candidate;

    /// Domain-specific soft mutation: nudge the candidate instead of
    /// replacing it. `None` means the space has no soft form and the
    /// mutation operator should fall back to re-randomization.
    fn soften<R: Rng + ?Sized>(
        &self,
        candidate: Self::Candidate,
        rng: &mut R,
    ) -> Option<Self::Candidate> {
        let _ = (candidate, rng);
        None
    }
}

/// Candidate space over Quixo moves: `(position, slide)` pairs scored by a
/// pluggable heuristic.
#[derive(Debug, Clone)]
pub struct QuixoCandidateSpace<H> {
    state: QuixoState,
    scorer: MoveScorer<H>,
}

impl<H> QuixoCandidateSpace<H> {
    pub fn new(state: &QuixoState, heuristic: H) -> Self {
        Self {
            state: *state,
            scorer: MoveScorer::new(heuristic),
        }
    }
}

impl<H> CandidateSpace for QuixoCandidateSpace<H>
where
    H: PositionHeuristic<Quixo>,
{
    type Candidate = QuixoMove;

    fn random_candidate<R: Rng + ?Sized>(&self, rng: &mut R) -> QuixoMove {
        QuixoMove {
            row: rng.random_range(0..BOARD_SIZE),
            col: rng.random_range(0..BOARD_SIZE),
            slide: *Slide::ALL.choose(rng).expect("slide list is non-empty"),
        }
    }

    fn is_legal(&self, candidate: QuixoMove) -> bool {
        Quixo::is_legal(&self.state, candidate)
    }

    fn fitness(&self, candidate: QuixoMove) -> f64 {
        self.scorer.score::<Quixo>(&self.state, candidate)
    }

    fn crossover<R: Rng + ?Sized>(&self, a: QuixoMove, b: QuixoMove, rng: &mut R) -> QuixoMove {
        let (row, col) = if rng.random_bool(0.5) {
            (a.row, a.col)
        } else {
            (b.row, b.col)
        };
        let slide = if rng.random_bool(0.5) { a.slide } else { b.slide };
        QuixoMove { row, col, slide }
    }
}

/// Candidate space over Nim moves: `(row, take)` pairs.
#[derive(Debug, Clone)]
pub struct NimCandidateSpace<H> {
    state: NimState,
    scorer: MoveScorer<H>,
}

impl<H> NimCandidateSpace<H> {
    pub fn new(state: &NimState, heuristic: H) -> Self {
        Self {
            state: state.clone(),
            scorer: MoveScorer::new(heuristic),
        }
    }
}

impl<H> CandidateSpace for NimCandidateSpace<H>
where
    H: PositionHeuristic<Nim>,
{
    type Candidate = Nimply;

    fn random_candidate<R: Rng + ?Sized>(&self, rng: &mut R) -> Nimply {
        let occupied: Vec<usize> = self
            .state
            .rows()
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(row, _)| row)
            .collect();
        let Some(&row) = occupied.choose(rng) else {
            // Terminal position: emit a dummy that legality filtering will
            // reject, so the driver's attempt cap turns this into an error.
            return Nimply { row: 0, take: 1 };
        };
        let take = rng.random_range(1..=self.state.rows()[row]);
        Nimply { row, take }
    }

    fn is_legal(&self, candidate: Nimply) -> bool {
        Nim::is_legal(&self.state, candidate)
    }

    fn fitness(&self, candidate: Nimply) -> f64 {
        self.scorer.score::<Nim>(&self.state, candidate)
    }

    fn crossover<R: Rng + ?Sized>(&self, a: Nimply, b: Nimply, rng: &mut R) -> Nimply {
        let row = if rng.random_bool(0.5) { a.row } else { b.row };
        let take = if rng.random_bool(0.5) { a.take } else { b.take };
        Nimply { row, take }
    }

    /// Shrinks the take by a random smaller amount instead of rerolling.
    fn soften<R: Rng + ?Sized>(&self, candidate: Nimply, rng: &mut R) -> Option<Nimply> {
        if candidate.take > 1 {
            Some(Nimply {
                row: candidate.row,
                take: rng.random_range(1..candidate.take),
            })
        } else {
            Some(candidate)
        }
    }
}
