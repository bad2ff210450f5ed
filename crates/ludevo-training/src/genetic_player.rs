//! The genetic player: one evolutionary search per turn, with an optional
//! per-position move memory in front of it.

use std::marker::PhantomData;

use rand_pcg::Pcg32;

use ludevo_engine::{
    Game, MoveSelectionError, Nim, NimState, Player, Quixo, QuixoState, RngSeed,
};
use ludevo_evaluator::{PositionHeuristic, TriangularRuns, ZeroNimSum};

use crate::{
    candidate::{CandidateSpace, NimCandidateSpace, QuixoCandidateSpace},
    genetic::{
        Evolver, MutationKind, ParentSelection, Scored, SearchConfig, SearchError,
    },
    move_memory::{CachePolicy, MoveMemory},
};

impl From<SearchError> for MoveSelectionError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::NoLegalCandidate { .. } => MoveSelectionError::NoLegalCandidate,
        }
    }
}

/// Chooses moves by evolving a candidate population against the current
/// position.
///
/// `space_for` rebuilds the candidate space for each new position; the
/// optional [`MoveMemory`] short-circuits or cross-checks repeated searches
/// of the same board per the configured [`CachePolicy`].
#[derive(Debug)]
pub struct GeneticPlayer<G, S, F>
where
    G: Game,
    S: CandidateSpace<Candidate = G::Move>,
    F: Fn(&G::State) -> S,
{
    evolver: Evolver,
    space_for: F,
    memory: Option<MoveMemory<G::PositionKey, G::Move>>,
    cache_policy: CachePolicy,
    rng: Pcg32,
    _space: PhantomData<fn() -> S>,
}

impl<G, S, F> GeneticPlayer<G, S, F>
where
    G: Game,
    S: CandidateSpace<Candidate = G::Move>,
    F: Fn(&G::State) -> S,
{
    pub fn new(
        config: SearchConfig,
        space_for: F,
        memory_enabled: bool,
        cache_policy: CachePolicy,
        seed: RngSeed,
    ) -> Self {
        Self {
            evolver: Evolver::new(config),
            space_for,
            memory: memory_enabled.then(MoveMemory::new),
            cache_policy,
            rng: seed.rng(),
            _space: PhantomData,
        }
    }

    /// Number of positions currently memorized.
    #[must_use]
    pub fn memory_len(&self) -> usize {
        self.memory.as_ref().map_or(0, MoveMemory::len)
    }
}

impl<G, S, F> Player<G> for GeneticPlayer<G, S, F>
where
    G: Game,
    S: CandidateSpace<Candidate = G::Move>,
    F: Fn(&G::State) -> S,
{
    fn choose_move(&mut self, state: &G::State) -> Result<G::Move, MoveSelectionError> {
        let Self {
            evolver,
            space_for,
            memory,
            cache_policy,
            rng,
            _space: PhantomData,
        } = self;
        let space = space_for(state);

        let search = |rng: &mut Pcg32| {
            evolver.search(&space, rng).map(|outcome| Scored {
                candidate: outcome.best,
                fitness: outcome.fitness,
            })
        };

        let entry = match memory {
            None => search(rng)?,
            Some(memory) => {
                let key = G::position_key(state);
                memory.lookup_or_compute(key, *cache_policy, || search(rng))?
            }
        };
        Ok(entry.candidate)
    }
}

/// The standard Quixo genetic player: triangular-run fitness, memory on,
/// recompute-and-keep-best caching.
pub fn quixo_genetic_player(
    config: SearchConfig,
    memory_enabled: bool,
    cache_policy: CachePolicy,
    seed: RngSeed,
) -> GeneticPlayer<
    Quixo,
    QuixoCandidateSpace<TriangularRuns>,
    impl Fn(&QuixoState) -> QuixoCandidateSpace<TriangularRuns>,
> {
    GeneticPlayer::new(
        config,
        |state| QuixoCandidateSpace::new(state, TriangularRuns),
        memory_enabled,
        cache_policy,
        seed,
    )
}

/// Default search configuration for the Quixo genetic player.
#[must_use]
pub fn quixo_search_config() -> SearchConfig {
    SearchConfig {
        population_size: 50,
        generations: 10,
        mutation_rate: 0.2,
        ..SearchConfig::default()
    }
}

/// The Nim evolutionary-strategy player: zero-nim-sum fitness, tournament
/// parent selection, soft mutation with an adaptive rate, no memory.
pub fn nim_evolution_player(
    config: SearchConfig,
    seed: RngSeed,
) -> GeneticPlayer<
    Nim,
    NimCandidateSpace<ZeroNimSum>,
    impl Fn(&NimState) -> NimCandidateSpace<ZeroNimSum>,
> {
    GeneticPlayer::new(
        config,
        |state| NimCandidateSpace::new(state, ZeroNimSum),
        false,
        CachePolicy::KeepBest,
        seed,
    )
}

/// Default search configuration for the Nim evolutionary-strategy player.
#[must_use]
pub fn nim_search_config() -> SearchConfig {
    SearchConfig {
        population_size: 100,
        generations: 50,
        exploration_fraction: 0.2,
        parent_selection: ParentSelection::Tournament { size: 2 },
        mutation: MutationKind::Soften,
        mutation_rate: 0.15,
        adaptive_mutation: true,
        ..SearchConfig::default()
    }
}

/// A generic heuristic-driven space builder, handy for swapping fitness
/// strategies in tests.
pub fn quixo_space_with<H>(heuristic: H) -> impl Fn(&QuixoState) -> QuixoCandidateSpace<H>
where
    H: PositionHeuristic<Quixo> + Copy,
{
    move |state| QuixoCandidateSpace::new(state, heuristic)
}

#[cfg(test)]
mod tests {
    use super::*;

    use ludevo_engine::{BOARD_SIZE, Game as _, PlayerId, QuixoBoard};

    fn seed(byte: u8) -> RngSeed {
        RngSeed::from_bytes([byte; 16])
    }

    #[test]
    fn test_genetic_player_plays_legal_nim_moves() {
        let mut player = nim_evolution_player(nim_search_config(), seed(1));
        let state = NimState::new(5);
        let mv = player.choose_move(&state).unwrap();
        assert!(Nim::is_legal(&state, mv));
    }

    #[test]
    fn test_genetic_player_fails_fast_on_terminal_state() {
        let mut player = nim_evolution_player(
            SearchConfig {
                max_sample_attempts: 50,
                ..nim_search_config()
            },
            seed(2),
        );
        let state = NimState::from_rows(vec![0, 0]);
        assert!(matches!(
            player.choose_move(&state),
            Err(MoveSelectionError::NoLegalCandidate)
        ));
    }

    #[test]
    fn test_memory_keeps_choice_stable_on_unchanged_board() {
        // Near-finished board: sliding the empty corner in from the right
        // completes row 0, the unique global optimum, so every search
        // converges to it and the memorized entry never changes.
        let mut cells = [[None; BOARD_SIZE]; BOARD_SIZE];
        for c in 0..4 {
            cells[0][c] = Some(PlayerId::One);
        }
        let state = QuixoState::from_parts(QuixoBoard::from_cells(cells), PlayerId::One);

        // A generous search budget so the unique optimum is found reliably.
        let config = SearchConfig {
            population_size: 150,
            generations: 20,
            ..quixo_search_config()
        };
        let mut player = quixo_genetic_player(config, true, CachePolicy::KeepBest, seed(3));
        let first = player.choose_move(&state).unwrap();
        let second = player.choose_move(&state).unwrap();
        assert_eq!(first, second);
        assert_eq!(player.memory_len(), 1);

        let next = Quixo::apply(&state, first).unwrap();
        assert_eq!(Quixo::winner(&next), Some(PlayerId::One));
    }

    #[test]
    fn test_trust_cache_returns_memorized_move_without_search() {
        let state = QuixoState::new();
        let mut player = quixo_genetic_player(
            quixo_search_config(),
            true,
            CachePolicy::TrustCache,
            seed(4),
        );
        let first = player.choose_move(&state).unwrap();
        // With a trusted cache, the same board always yields the stored
        // move, search randomness notwithstanding.
        for _ in 0..3 {
            assert_eq!(player.choose_move(&state).unwrap(), first);
        }
    }

    #[test]
    fn test_memoryless_player_stores_nothing() {
        let state = QuixoState::new();
        let mut player =
            quixo_genetic_player(quixo_search_config(), false, CachePolicy::KeepBest, seed(5));
        player.choose_move(&state).unwrap();
        assert_eq!(player.memory_len(), 0);
    }

    #[test]
    fn test_swappable_heuristic_builder() {
        use ludevo_evaluator::MaxLineCount;

        let space_for = quixo_space_with(MaxLineCount);
        let mut player = GeneticPlayer::<Quixo, _, _>::new(
            quixo_search_config(),
            space_for,
            false,
            CachePolicy::KeepBest,
            seed(6),
        );
        let state = QuixoState::new();
        let mv = player.choose_move(&state).unwrap();
        assert!(Quixo::is_legal(&state, mv));
    }
}
