use crate::model::card::Card;

/// Face-up discard pile. The last card is the top.
#[derive(Debug, Clone, Default)]
pub struct DiscardPile {
    cards: Vec<Card>,
}

impl DiscardPile {
    pub const fn new() -> Self {
        Self { cards: Vec::new() }
    }

    /// Place a card on top, turning it face-up.
    pub fn push(&mut self, mut card: Card) {
        card.reveal();
        self.cards.push(card);
    }

    pub fn top(&self) -> Option<&Card> {
        self.cards.last()
    }

    pub fn pop(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Remove every card except the top one, oldest first.
    pub fn take_buried(&mut self) -> Vec<Card> {
        let keep_from = self.cards.len().saturating_sub(1);
        let top = self.cards.split_off(keep_from);
        std::mem::replace(&mut self.cards, top)
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
}
