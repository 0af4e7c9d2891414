use crate::model::card::{Card, CardFace, Joker, RANKED_SLOTS};
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot draw from an empty stock")]
pub struct EmptyStockError;

/// The face-down draw pile. The last card in the vector is the top.
#[derive(Debug, Clone)]
pub struct Stock {
    cards: Vec<Card>,
    jokers_allowed: bool,
}

impl Stock {
    /// A fresh, unshuffled stock with every card face-down.
    pub fn ordered(jokers_allowed: bool) -> Self {
        let mut cards = Vec::with_capacity(RANKED_SLOTS + Joker::ALL.len());
        for suit in Suit::ALL.iter().copied() {
            for rank in Rank::ORDERED.iter().copied() {
                cards.push(Card::face_down(CardFace::ranked(rank, suit)));
            }
        }
        if jokers_allowed {
            for joker in Joker::ALL {
                cards.push(Card::face_down(CardFace::Joker(joker)));
            }
        }
        Self {
            cards,
            jokers_allowed,
        }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(jokers_allowed: bool, rng: &mut R) -> Self {
        let mut stock = Self::ordered(jokers_allowed);
        stock.shuffle(rng);
        stock
    }

    pub fn shuffled_with_seed(jokers_allowed: bool, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(jokers_allowed, &mut rng)
    }

    /// Rebuild a stock from spent cards: every card is turned face-down and the
    /// pile is shuffled.
    pub fn recycle<R: rand::Rng + ?Sized>(
        cards: Vec<Card>,
        jokers_allowed: bool,
        rng: &mut R,
    ) -> Self {
        let mut stock = Self {
            cards,
            jokers_allowed,
        };
        for card in &mut stock.cards {
            card.conceal();
        }
        stock.shuffle(rng);
        stock
    }

    pub fn shuffle<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Remove the top card, setting its visibility to `hidden`.
    pub fn draw(&mut self, hidden: bool) -> Result<Card, EmptyStockError> {
        let mut card = self.cards.pop().ok_or(EmptyStockError)?;
        if hidden {
            card.conceal();
        } else {
            card.reveal();
        }
        Ok(card)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn jokers_allowed(&self) -> bool {
        self.jokers_allowed
    }
}
