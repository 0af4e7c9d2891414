use crate::model::card::{Card, CardFace};
use crate::model::score::score_hand;
use thiserror::Error;

pub const HAND_SIZE: usize = 6;

/// Slots `i` and `i + COLUMN_OFFSET` form a column.
pub const COLUMN_OFFSET: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("a hand holds exactly {HAND_SIZE} cards, got {found}")]
pub struct HandSizeError {
    pub found: usize,
}

/// Six cards laid out as two rows of three.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hand {
    slots: [Card; HAND_SIZE],
}

impl Hand {
    pub const fn new(slots: [Card; HAND_SIZE]) -> Self {
        Self { slots }
    }

    pub fn cards(&self) -> &[Card; HAND_SIZE] {
        &self.slots
    }

    pub fn get(&self, slot: usize) -> Option<&Card> {
        self.slots.get(slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.slots.iter()
    }

    /// Turn one slot face-up. Returns false when the slot is out of range.
    pub fn reveal(&mut self, slot: usize) -> bool {
        match self.slots.get_mut(slot) {
            Some(card) => {
                card.reveal();
                true
            }
            None => false,
        }
    }

    pub fn reveal_all(&mut self) {
        for card in &mut self.slots {
            card.reveal();
        }
    }

    pub fn hidden_count(&self) -> usize {
        self.slots.iter().filter(|card| card.is_hidden()).count()
    }

    pub fn is_fully_revealed(&self) -> bool {
        self.hidden_count() == 0
    }

    pub fn hidden_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, card)| card.is_hidden())
            .map(|(slot, _)| slot)
    }

    pub fn visible(&self) -> impl Iterator<Item = (usize, CardFace)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, card)| card.visible_face().map(|face| (slot, face)))
    }

    /// Put `card` into `slot` and hand back the displaced card, turned face-up.
    pub fn exchange(&mut self, slot: usize, card: Card) -> Option<Card> {
        let target = self.slots.get_mut(slot)?;
        let mut displaced = std::mem::replace(target, card);
        displaced.reveal();
        Some(displaced)
    }

    pub fn score(&self) -> i32 {
        score_hand(self)
    }

    pub const fn column_partner(slot: usize) -> usize {
        (slot + COLUMN_OFFSET) % HAND_SIZE
    }
}

impl TryFrom<Vec<Card>> for Hand {
    type Error = HandSizeError;

    fn try_from(cards: Vec<Card>) -> Result<Self, Self::Error> {
        let found = cards.len();
        let slots: [Card; HAND_SIZE] = cards.try_into().map_err(|_| HandSizeError { found })?;
        Ok(Self::new(slots))
    }
}

#[cfg(test)]
mod tests {
    use super::{HAND_SIZE, Hand, HandSizeError};
    use crate::model::card::{Card, CardFace};
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    fn hidden_hand() -> Hand {
        let cards: Vec<Card> = Rank::ORDERED[..HAND_SIZE]
            .iter()
            .map(|rank| Card::face_down(CardFace::ranked(*rank, Suit::Hearts)))
            .collect();
        Hand::try_from(cards).expect("six cards")
    }

    #[test]
    fn rejects_wrong_card_count() {
        let cards = vec![Card::face_down(CardFace::ranked(Rank::Ace, Suit::Clubs)); 5];
        assert_eq!(Hand::try_from(cards), Err(HandSizeError { found: 5 }));
    }

    #[test]
    fn reveal_tracks_hidden_count() {
        let mut hand = hidden_hand();
        assert_eq!(hand.hidden_count(), 6);
        assert!(hand.reveal(2));
        assert!(!hand.reveal(6));
        assert_eq!(hand.hidden_count(), 5);
        assert_eq!(hand.hidden_slots().collect::<Vec<_>>(), vec![0, 1, 3, 4, 5]);
        hand.reveal_all();
        assert!(hand.is_fully_revealed());
    }

    #[test]
    fn exchange_returns_displaced_card_face_up() {
        let mut hand = hidden_hand();
        let incoming = Card::face_up(CardFace::ranked(Rank::King, Suit::Spades));
        let displaced = hand.exchange(0, incoming).expect("slot in range");
        assert!(!displaced.is_hidden());
        assert_eq!(displaced.face(), CardFace::ranked(Rank::Ace, Suit::Hearts));
        assert_eq!(hand.get(0), Some(&incoming));
        assert_eq!(hand.exchange(HAND_SIZE, incoming), None);
    }

    #[test]
    fn columns_pair_top_and_bottom_rows() {
        assert_eq!(Hand::column_partner(0), 3);
        assert_eq!(Hand::column_partner(2), 5);
        assert_eq!(Hand::column_partner(4), 1);
    }
}
