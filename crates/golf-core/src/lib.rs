//! Golf card-game engine: card model, round state machine, paired matches
//! and the compact text record codec.

pub mod game;
pub mod history;
pub mod model;
