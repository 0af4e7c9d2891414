use crate::model::card::Card;
use crate::model::hand::HAND_SIZE;
use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawSource {
    Stock,
    DiscardPile,
}

impl DrawSource {
    pub const fn marker(self) -> char {
        match self {
            DrawSource::Stock => '+',
            DrawSource::DiscardPile => '-',
        }
    }

    pub const fn from_marker(marker: char) -> Option<Self> {
        match marker {
            '+' => Some(DrawSource::Stock),
            '-' => Some(DrawSource::DiscardPile),
            _ => None,
        }
    }
}

/// What to do with the card just drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscardChoice {
    /// Swap the drawn card into a hand slot; the displaced card is discarded.
    Exchange(usize),
    /// Put the drawn card straight onto the discard pile.
    ReturnToPile,
}

impl DiscardChoice {
    /// Record digit: the slot for an exchange, `6` for a return.
    pub const fn marker(self) -> char {
        match self {
            DiscardChoice::Exchange(slot) if slot < HAND_SIZE => (b'0' + slot as u8) as char,
            DiscardChoice::Exchange(_) => '?',
            DiscardChoice::ReturnToPile => (b'0' + HAND_SIZE as u8) as char,
        }
    }

    pub fn all() -> impl Iterator<Item = DiscardChoice> {
        (0..HAND_SIZE)
            .map(DiscardChoice::Exchange)
            .chain(std::iter::once(DiscardChoice::ReturnToPile))
    }
}

impl fmt::Display for DiscardChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscardChoice::Exchange(slot) => write!(f, "exchange slot {slot}"),
            DiscardChoice::ReturnToPile => f.write_str("return to pile"),
        }
    }
}

/// The card a player holds between drawing and discarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawnCard {
    pub card: Card,
    pub source: DrawSource,
}

impl DrawnCard {
    pub const fn came_from_discard(&self) -> bool {
        matches!(self.source, DrawSource::DiscardPile)
    }
}
