//! Rule engines and player plumbing for the games ludevo plays.
//!
//! This crate defines the [`Game`] rules contract, the two concrete rule
//! engines ([`nim`] and [`quixo`]), the [`Player`] trait implemented by every
//! move-selection strategy, and a seeded [`MatchRunner`] that plays two
//! players against each other.
//!
//! States are treated as immutable snapshots: [`Game::apply`] returns a new
//! state and never touches its input, so any number of simulations can run
//! against the same position without interfering with the real game.

pub use self::{game::*, match_runner::*, nim::*, player::*, quixo::*};

pub mod game;
pub mod match_runner;
pub mod nim;
pub mod player;
pub mod quixo;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("move is illegal in the current position")]
pub struct IllegalMoveError;
