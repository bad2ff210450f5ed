//! The evolutionary move-search core: population management, genetic
//! operators, and the generation-loop driver.
//!
//! # Algorithm
//!
//! One search runs against one frozen position (a [`CandidateSpace`]):
//!
//! 1. **Initialize** - rejection-sample `population_size` legal candidates
//! 2. **Explore** - transiently grow the population by a fresh random
//!    fraction before ranking
//! 3. **Evaluate** - score every candidate, sort best-first
//! 4. **Track** - update the best candidate seen across the whole run
//! 5. **Reproduce** - carry the elite unchanged, fill the rest with
//!    crossover + mutation offspring
//! 6. **Repeat** for a fixed number of generations, with optional early
//!    stop on stagnation or on reaching a target fitness
//!
//! The driver returns the *historical* best, never just the final
//! generation's best: a good candidate found early must not be lost to
//! later drift.
//!
//! # Operators
//!
//! Parent selection runs over the elite slice, either as two distinct
//! uniform picks or as tournaments of configurable size. Crossover is
//! field-wise (the space defines it). Mutation either re-randomizes the
//! candidate wholesale or applies the space's domain-specific soft form;
//! the mutation rate can optionally follow a random walk between
//! generations (x1.2 with probability 0.2, else x0.8), clamped to `[0, 1]`.
//!
//! Everything is synchronous and single-threaded; each fitness call works
//! on its own clone of the position, so no shared state survives a
//! generation.

use rand::{Rng, seq::IndexedRandom as _};

use ludevo_stats::DescriptiveStats;

use crate::candidate::CandidateSpace;

/// A candidate paired with its most recent fitness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scored<M> {
    pub candidate: M,
    pub fitness: f64,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum SearchError {
    /// Rejection sampling could not produce a legal candidate. Either the
    /// position is terminal (the driver's precondition was violated) or
    /// legality is pathologically rare.
    #[display("no legal candidate found after {attempts} attempts")]
    NoLegalCandidate { attempts: usize },
}

/// How parents are picked for reproduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentSelection {
    /// Two distinct uniform picks from the elite slice.
    UniformElite,
    /// Tournaments of `size` over the elite slice; the fitter contender wins.
    Tournament { size: usize },
}

/// How offspring are mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// Replace the candidate with a fresh random legal one.
    Reroll,
    /// Apply the space's soft mutation; spaces without one fall back to
    /// reroll.
    Soften,
}

/// Tuning knobs for one evolutionary search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub population_size: usize,
    pub generations: usize,
    /// Fraction of the population carried unchanged into the next
    /// generation.
    pub elite_fraction: f64,
    /// Fraction of extra fresh candidates injected each generation before
    /// ranking.
    pub exploration_fraction: f64,
    pub parent_selection: ParentSelection,
    pub mutation: MutationKind,
    /// Probability that an offspring is mutated.
    pub mutation_rate: f64,
    /// Random-walk adjustment of the mutation rate after each generation.
    pub adaptive_mutation: bool,
    /// Stop after this many generations without best-ever improvement.
    pub max_stagnation: Option<usize>,
    /// Stop as soon as the best-ever fitness reaches this value.
    pub target_fitness: Option<f64>,
    /// Rejection-sampling attempt cap per candidate.
    pub max_sample_attempts: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 10,
            elite_fraction: 0.2,
            exploration_fraction: 0.0,
            parent_selection: ParentSelection::UniformElite,
            mutation: MutationKind::Reroll,
            mutation_rate: 0.2,
            adaptive_mutation: false,
            max_stagnation: None,
            target_fitness: None,
            max_sample_attempts: 10_000,
        }
    }
}

/// Result of one evolutionary search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOutcome<M> {
    pub best: M,
    pub fitness: f64,
    pub final_mutation_rate: f64,
    pub generations_run: usize,
}

/// An ordered collection of scored candidates, re-created every generation.
#[derive(Debug, Clone)]
pub struct Population<M> {
    members: Vec<Scored<M>>,
}

impl<M: Copy + std::fmt::Debug> Population<M> {
    /// Rejection-samples `size` legal candidates.
    pub fn random<S, R>(
        space: &S,
        size: usize,
        max_attempts: usize,
        rng: &mut R,
    ) -> Result<Self, SearchError>
    where
        S: CandidateSpace<Candidate = M>,
        R: Rng + ?Sized,
    {
        let mut members = Vec::with_capacity(size);
        for _ in 0..size {
            let candidate = sample_legal(space, max_attempts, rng)?;
            members.push(Scored {
                candidate,
                fitness: f64::MIN,
            });
        }
        Ok(Self { members })
    }

    #[must_use]
    pub fn members(&self) -> &[Scored<M>] {
        &self.members
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    fn push(&mut self, candidate: M) {
        self.members.push(Scored {
            candidate,
            fitness: f64::MIN,
        });
    }

    /// Scores every member and sorts best-first.
    ///
    /// The sort is stable, so equal-fitness candidates keep their insertion
    /// order; the elite slice and the reported generation best are therefore
    /// deterministic given the same draws.
    pub fn evaluate<S>(&mut self, space: &S)
    where
        S: CandidateSpace<Candidate = M>,
    {
        for member in &mut self.members {
            member.fitness = space.fitness(member.candidate);
        }
        self.members
            .sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
    }

    /// Fitness distribution of the current generation.
    #[must_use]
    pub fn fitness_stats(&self) -> Option<DescriptiveStats> {
        DescriptiveStats::new(self.members.iter().map(|member| member.fitness))
    }
}

/// Runs the generation loop for one position.
#[derive(Debug, Clone)]
pub struct Evolver {
    config: SearchConfig,
}

impl Evolver {
    /// # Panics
    ///
    /// Panics if the configuration is degenerate: zero population or
    /// generations, or fractions/rates outside `[0, 1]`.
    #[must_use]
    pub fn new(config: SearchConfig) -> Self {
        assert!(config.population_size > 0);
        assert!(config.generations > 0);
        assert!((0.0..=1.0).contains(&config.elite_fraction));
        assert!((0.0..=1.0).contains(&config.exploration_fraction));
        assert!((0.0..=1.0).contains(&config.mutation_rate));
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Searches `space` for the best candidate move.
    pub fn search<S, R>(
        &self,
        space: &S,
        rng: &mut R,
    ) -> Result<SearchOutcome<S::Candidate>, SearchError>
    where
        S: CandidateSpace,
        R: Rng + ?Sized,
    {
        let cfg = &self.config;
        let mut mutation_rate = cfg.mutation_rate;
        let mut population =
            Population::random(space, cfg.population_size, cfg.max_sample_attempts, rng)?;
        let mut best: Option<Scored<S::Candidate>> = None;
        let mut stagnation = 0;
        let mut generations_run = 0;

        for generation in 0..cfg.generations {
            generations_run = generation + 1;

            let extra = scaled_count(cfg.population_size, cfg.exploration_fraction);
            for _ in 0..extra {
                population.push(sample_legal(space, cfg.max_sample_attempts, rng)?);
            }
            population.evaluate(space);

            let generation_best = population.members()[0];
            let improved =
                best.is_none_or(|current| generation_best.fitness > current.fitness);
            if improved {
                best = Some(generation_best);
                stagnation = 0;
            } else {
                stagnation += 1;
            }

            let best_fitness = best.map_or(f64::MIN, |current| current.fitness);
            if cfg
                .target_fitness
                .is_some_and(|target| best_fitness >= target)
            {
                break;
            }
            if cfg
                .max_stagnation
                .is_some_and(|limit| stagnation >= limit)
            {
                break;
            }

            if generation + 1 < cfg.generations {
                population = self.next_generation(&population, space, mutation_rate, rng)?;
                if cfg.adaptive_mutation {
                    mutation_rate = adapt_mutation_rate(mutation_rate, rng);
                }
            }
        }

        let best = best.expect("at least one generation was evaluated");
        Ok(SearchOutcome {
            best: best.candidate,
            fitness: best.fitness,
            final_mutation_rate: mutation_rate,
            generations_run,
        })
    }

    /// Builds the next generation: elite unchanged, offspring from
    /// crossover + mutation filling the population back to its fixed size.
    fn next_generation<S, R>(
        &self,
        population: &Population<S::Candidate>,
        space: &S,
        mutation_rate: f64,
        rng: &mut R,
    ) -> Result<Population<S::Candidate>, SearchError>
    where
        S: CandidateSpace,
        R: Rng + ?Sized,
    {
        let cfg = &self.config;
        let members = population.members();
        assert!(
            members.is_sorted_by(|a, b| a.fitness >= b.fitness),
            "population must be evaluated before reproduction"
        );

        let elite_count = scaled_count(cfg.population_size, cfg.elite_fraction)
            .clamp(1, members.len());
        let elite = &members[..elite_count];

        let mut next = Population {
            members: elite.to_vec(),
        };
        while next.len() < cfg.population_size {
            let (p1, p2) = select_parents(elite, cfg.parent_selection, rng);
            let child = space.crossover(p1.candidate, p2.candidate, rng);
            let child = self.mutate(space, child, mutation_rate, rng)?;
            next.push(child);
        }
        Ok(next)
    }

    fn mutate<S, R>(
        &self,
        space: &S,
        candidate: S::Candidate,
        mutation_rate: f64,
        rng: &mut R,
    ) -> Result<S::Candidate, SearchError>
    where
        S: CandidateSpace,
        R: Rng + ?Sized,
    {
        if !rng.random_bool(mutation_rate) {
            return Ok(candidate);
        }
        match self.config.mutation {
            MutationKind::Reroll => {
                sample_legal(space, self.config.max_sample_attempts, rng)
            }
            MutationKind::Soften => match space.soften(candidate, rng) {
                Some(softened) => Ok(softened),
                None => sample_legal(space, self.config.max_sample_attempts, rng),
            },
        }
    }
}

/// Draws random candidates until one passes legality, up to `max_attempts`.
fn sample_legal<S, R>(
    space: &S,
    max_attempts: usize,
    rng: &mut R,
) -> Result<S::Candidate, SearchError>
where
    S: CandidateSpace,
    R: Rng + ?Sized,
{
    for _ in 0..max_attempts {
        let candidate = space.random_candidate(rng);
        if space.is_legal(candidate) {
            return Ok(candidate);
        }
    }
    Err(SearchError::NoLegalCandidate {
        attempts: max_attempts,
    })
}

fn select_parents<'p, M, R>(
    elite: &'p [Scored<M>],
    policy: ParentSelection,
    rng: &mut R,
) -> (&'p Scored<M>, &'p Scored<M>)
where
    R: Rng + ?Sized,
{
    assert!(!elite.is_empty());
    if elite.len() == 1 {
        return (&elite[0], &elite[0]);
    }
    match policy {
        ParentSelection::UniformElite => {
            let mut picks = elite.choose_multiple(rng, 2);
            let p1 = picks.next().expect("elite holds at least two members");
            let p2 = picks.next().expect("elite holds at least two members");
            (p1, p2)
        }
        ParentSelection::Tournament { size } => (
            tournament(elite, size, rng),
            tournament(elite, size, rng),
        ),
    }
}

fn tournament<'p, M, R>(pool: &'p [Scored<M>], size: usize, rng: &mut R) -> &'p Scored<M>
where
    R: Rng + ?Sized,
{
    assert!(size > 0);
    pool.choose_multiple(rng, size)
        .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
        .expect("tournament pool is non-empty")
}

/// Random-walk adjustment of the mutation rate: x1.2 with probability 0.2,
/// else x0.8, clamped so the rate stays a probability.
fn adapt_mutation_rate<R>(rate: f64, rng: &mut R) -> f64
where
    R: Rng + ?Sized,
{
    let factor = if rng.random_bool(0.2) { 1.2 } else { 0.8 };
    (rate * factor).clamp(0.0, 1.0)
}

#[expect(clippy::cast_possible_truncation, clippy::cast_precision_loss, clippy::cast_sign_loss)]
fn scaled_count(base: usize, fraction: f64) -> usize {
    (base as f64 * fraction) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    use ludevo_engine::{Nim, NimState, Game as _, QuixoState, RngSeed, nim_sum};
    use ludevo_evaluator::{TriangularRuns, ZeroNimSum};

    use crate::candidate::{NimCandidateSpace, QuixoCandidateSpace};

    fn rng(byte: u8) -> rand_pcg::Pcg32 {
        RngSeed::from_bytes([byte; 16]).rng()
    }

    fn nim_space(rows: Vec<u32>) -> NimCandidateSpace<ZeroNimSum> {
        NimCandidateSpace::new(&NimState::from_rows(rows), ZeroNimSum)
    }

    mod population {
        use super::*;

        #[test]
        fn test_random_population_has_exact_size_and_legal_members() {
            let space = nim_space(vec![1, 3, 5]);
            let population =
                Population::random(&space, 30, 10_000, &mut rng(1)).unwrap();
            assert_eq!(population.len(), 30);
            for member in population.members() {
                assert!(space.is_legal(member.candidate));
            }
        }

        #[test]
        fn test_terminal_position_fails_fast() {
            let space = nim_space(vec![0, 0]);
            let err = Population::random(&space, 5, 100, &mut rng(2)).unwrap_err();
            assert!(matches!(
                err,
                SearchError::NoLegalCandidate { attempts: 100 }
            ));
        }

        #[test]
        fn test_evaluate_sorts_best_first() {
            let space = nim_space(vec![1, 3]);
            let mut population =
                Population::random(&space, 20, 10_000, &mut rng(3)).unwrap();
            population.evaluate(&space);
            let members = population.members();
            assert!(members.is_sorted_by(|a, b| a.fitness >= b.fitness));
            assert!((members[0].fitness - space.fitness(members[0].candidate)).abs() < f64::EPSILON);
        }

        #[test]
        fn test_fitness_stats_cover_population() {
            let space = nim_space(vec![1, 3, 5]);
            let mut population =
                Population::random(&space, 10, 10_000, &mut rng(4)).unwrap();
            population.evaluate(&space);
            let stats = population.fitness_stats().unwrap();
            assert!(stats.min <= stats.mean && stats.mean <= stats.max);
            assert_eq!(stats.max, population.members()[0].fitness);
        }
    }

    mod operators {
        use super::*;

        #[test]
        fn test_adapt_mutation_rate_stays_clamped() {
            let mut rng = rng(5);
            let mut rate = 0.9;
            for _ in 0..200 {
                rate = adapt_mutation_rate(rate, &mut rng);
                assert!((0.0..=1.0).contains(&rate));
            }
        }

        #[test]
        fn test_tournament_returns_fittest_of_full_pool() {
            let pool: Vec<Scored<u32>> = (0..10)
                .map(|i| Scored {
                    candidate: i,
                    fitness: f64::from(i),
                })
                .collect();
            // A tournament over the whole pool must pick the global best.
            let winner = tournament(&pool, pool.len(), &mut rng(6));
            assert_eq!(winner.candidate, 9);
        }

        #[test]
        fn test_select_parents_picks_distinct_elites() {
            let pool: Vec<Scored<u32>> = (0..5)
                .map(|i| Scored {
                    candidate: i,
                    fitness: f64::from(i),
                })
                .collect();
            let mut rng = rng(7);
            for _ in 0..50 {
                let (p1, p2) =
                    select_parents(&pool, ParentSelection::UniformElite, &mut rng);
                assert_ne!(p1.candidate, p2.candidate);
            }
        }
    }

    mod driver {
        use super::*;

        #[test]
        fn test_search_returns_legal_best_with_matching_fitness() {
            let space = nim_space(vec![1, 3, 5, 7, 9]);
            let evolver = Evolver::new(SearchConfig::default());
            let outcome = evolver.search(&space, &mut rng(8)).unwrap();
            assert!(space.is_legal(outcome.best));
            assert!((outcome.fitness - space.fitness(outcome.best)).abs() < f64::EPSILON);
            assert_eq!(outcome.generations_run, 10);
        }

        #[test]
        fn test_search_finds_the_balancing_move() {
            // <1 3>: the only zero-sum reply is taking 2 from row 1; the
            // space is tiny, so the search must find it.
            let space = nim_space(vec![1, 3]);
            let evolver = Evolver::new(SearchConfig {
                population_size: 40,
                generations: 10,
                ..SearchConfig::default()
            });
            let outcome = evolver.search(&space, &mut rng(9)).unwrap();
            assert_eq!(outcome.fitness, 0.0);
            let state = NimState::from_rows(vec![1, 3]);
            let next = Nim::apply(&state, outcome.best).unwrap();
            assert_eq!(nim_sum(&next), 0);
        }

        #[test]
        fn test_best_ever_is_monotone_across_longer_runs() {
            // Rerunning with more generations can only match or improve the
            // best fitness when the draws are shared prefix-wise.
            let space = nim_space(vec![1, 3, 5, 7]);
            let short = Evolver::new(SearchConfig {
                generations: 2,
                ..SearchConfig::default()
            })
            .search(&space, &mut rng(10))
            .unwrap();
            let long = Evolver::new(SearchConfig {
                generations: 12,
                ..SearchConfig::default()
            })
            .search(&space, &mut rng(10))
            .unwrap();
            assert!(long.fitness >= short.fitness);
        }

        #[test]
        fn test_target_fitness_stops_early() {
            let space = nim_space(vec![1, 3]);
            let evolver = Evolver::new(SearchConfig {
                population_size: 30,
                generations: 50,
                target_fitness: Some(0.0),
                ..SearchConfig::default()
            });
            let outcome = evolver.search(&space, &mut rng(11)).unwrap();
            assert_eq!(outcome.fitness, 0.0);
            assert!(outcome.generations_run < 50);
        }

        #[test]
        fn test_stagnation_stops_early() {
            // <1>: a single legal move, so the best cannot improve after
            // the first generation.
            let space = nim_space(vec![1]);
            let evolver = Evolver::new(SearchConfig {
                population_size: 5,
                generations: 100,
                max_stagnation: Some(3),
                ..SearchConfig::default()
            });
            let outcome = evolver.search(&space, &mut rng(12)).unwrap();
            assert!(outcome.generations_run <= 5);
        }

        #[test]
        fn test_search_errors_on_terminal_position() {
            let space = nim_space(vec![0]);
            let evolver = Evolver::new(SearchConfig {
                max_sample_attempts: 50,
                ..SearchConfig::default()
            });
            assert!(evolver.search(&space, &mut rng(13)).is_err());
        }

        #[test]
        fn test_adaptive_mutation_reports_final_rate_in_bounds() {
            let space = nim_space(vec![1, 3, 5]);
            let evolver = Evolver::new(SearchConfig {
                generations: 20,
                adaptive_mutation: true,
                mutation: MutationKind::Soften,
                parent_selection: ParentSelection::Tournament { size: 2 },
                exploration_fraction: 0.2,
                ..SearchConfig::default()
            });
            let outcome = evolver.search(&space, &mut rng(14)).unwrap();
            assert!((0.0..=1.0).contains(&outcome.final_mutation_rate));
        }

        #[test]
        fn test_search_on_quixo_yields_legal_move() {
            let state = QuixoState::new();
            let space = QuixoCandidateSpace::new(&state, TriangularRuns);
            let evolver = Evolver::new(SearchConfig::default());
            let outcome = evolver.search(&space, &mut rng(15)).unwrap();
            assert!(space.is_legal(outcome.best));
        }
    }
}
