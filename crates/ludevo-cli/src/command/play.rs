use std::fmt;

use anyhow::Context as _;

use ludevo_engine::{Game, Nim, NimState, Player, PlayerId, Quixo, QuixoState, RngSeed};

use super::{GameKind, GeneticArgs, StrategyKind, derive_seeds, nim_player, quixo_player};

const TURN_LIMIT: usize = 200;
const NIM_ROWS: usize = 5;

#[derive(Debug, clap::Args)]
pub(crate) struct PlayArg {
    /// Which game to play
    #[arg(long, default_value = "nim")]
    game: GameKind,
    /// Strategy for the first player
    #[arg(long, default_value = "random")]
    one: StrategyKind,
    /// Strategy for the second player
    #[arg(long, default_value = "random")]
    two: StrategyKind,
    /// Hex seed for a reproducible game
    #[arg(long)]
    seed: Option<RngSeed>,
    #[command(flatten)]
    genetic: GeneticArgs,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let (seed_one, seed_two) = derive_seeds(arg.seed);
    match arg.game {
        GameKind::Nim => {
            let mut one = nim_player(arg.one, arg.genetic, seed_one)?;
            let mut two = nim_player(arg.two, arg.genetic, seed_two)?;
            play_verbose::<Nim>(&NimState::new(NIM_ROWS), one.as_mut(), two.as_mut())
        }
        GameKind::Quixo => {
            let mut one = quixo_player(arg.one, arg.genetic, seed_one)?;
            let mut two = quixo_player(arg.two, arg.genetic, seed_two)?;
            play_verbose::<Quixo>(&QuixoState::new(), one.as_mut(), two.as_mut())
        }
    }
}

fn play_verbose<G>(
    initial: &G::State,
    one: &mut dyn Player<G>,
    two: &mut dyn Player<G>,
) -> anyhow::Result<()>
where
    G: Game,
    G::State: fmt::Display,
    G::Move: fmt::Display,
{
    let mut state = initial.clone();
    let mut turns = 0;
    println!("initial state:\n{state}");
    while !G::is_over(&state) && turns < TURN_LIMIT {
        let mover = G::current_player(&state);
        let player: &mut dyn Player<G> = match mover {
            PlayerId::One => &mut *one,
            PlayerId::Two => &mut *two,
        };
        let mv = player
            .choose_move(&state)
            .with_context(|| format!("{mover} failed to choose a move"))?;
        state = G::apply(&state, mv)
            .with_context(|| format!("{mover} proposed an illegal move"))?;
        println!("{mover} plays {mv}");
        println!("{state}");
        turns += 1;
    }
    match G::winner(&state) {
        Some(winner) => println!("{winner} wins after {turns} turns"),
        None => println!("draw after {turns} turns"),
    }
    Ok(())
}
