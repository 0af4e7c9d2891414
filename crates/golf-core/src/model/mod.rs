pub mod action;
pub mod card;
pub mod discard;
pub mod hand;
pub mod observation;
pub mod player;
pub mod rank;
pub mod round;
pub mod rules;
pub mod score;
pub mod stock;
pub mod suit;
