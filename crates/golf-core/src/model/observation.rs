use crate::model::card::SLOT_COUNT;
use crate::model::discard::DiscardPile;
use crate::model::hand::{HAND_SIZE, Hand};

pub const UNKNOWN: i8 = -1;
pub const DISCARDED: i8 = -2;
pub const OPPONENT_HAND: i8 = -3;

/// Where a card identity sits from one player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotState {
    Unknown,
    Discarded,
    OpponentHand,
    OwnHand(usize),
}

impl SlotState {
    pub const fn from_value(value: i8) -> Option<Self> {
        match value {
            UNKNOWN => Some(SlotState::Unknown),
            DISCARDED => Some(SlotState::Discarded),
            OPPONENT_HAND => Some(SlotState::OpponentHand),
            position if position >= 0 && (position as usize) < HAND_SIZE => {
                Some(SlotState::OwnHand(position as usize))
            }
            _ => None,
        }
    }

    pub const fn value(self) -> i8 {
        match self {
            SlotState::Unknown => UNKNOWN,
            SlotState::Discarded => DISCARDED,
            SlotState::OpponentHand => OPPONENT_HAND,
            SlotState::OwnHand(position) => position as i8,
        }
    }
}

/// One player's view of the 54 card identities.
///
/// Each slot holds [`UNKNOWN`], [`DISCARDED`], [`OPPONENT_HAND`], or the hand
/// position (0..=5) of a face-up card the observer holds. Face-down cards
/// never leak, whoever holds them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Observation {
    slots: [i8; SLOT_COUNT],
}

impl Observation {
    pub const fn unknown() -> Self {
        Self {
            slots: [UNKNOWN; SLOT_COUNT],
        }
    }

    pub fn project<'a>(
        observer: &Hand,
        others: impl IntoIterator<Item = &'a Hand>,
        discard: &DiscardPile,
    ) -> Self {
        let mut observation = Self::unknown();
        for card in discard.cards() {
            if let Some(slot) = card.slot() {
                observation.slots[slot] = DISCARDED;
            }
        }
        for hand in others {
            for (_, face) in hand.visible() {
                observation.slots[face.slot()] = OPPONENT_HAND;
            }
        }
        for (position, face) in observer.visible() {
            observation.slots[face.slot()] = position as i8;
        }
        observation
    }

    pub fn get(&self, slot: usize) -> Option<i8> {
        self.slots.get(slot).copied()
    }

    pub fn state(&self, slot: usize) -> Option<SlotState> {
        self.get(slot).and_then(SlotState::from_value)
    }

    pub fn set(&mut self, slot: usize, state: SlotState) {
        if let Some(value) = self.slots.get_mut(slot) {
            *value = state.value();
        }
    }

    pub fn values(&self) -> &[i8; SLOT_COUNT] {
        &self.slots
    }

    /// Identity slot of the face-up card at `position` in the observer's hand.
    pub fn own_slot(&self, position: usize) -> Option<usize> {
        self.slots
            .iter()
            .position(|value| *value >= 0 && *value as usize == position)
    }

    pub fn count(&self, state: SlotState) -> usize {
        let target = state.value();
        self.slots.iter().filter(|value| **value == target).count()
    }

    pub fn unknown_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, value)| **value == UNKNOWN)
            .map(|(slot, _)| slot)
    }
}

impl Default for Observation {
    fn default() -> Self {
        Self::unknown()
    }
}

#[cfg(test)]
mod tests {
    use super::{DISCARDED, OPPONENT_HAND, Observation, SlotState, UNKNOWN};
    use crate::model::card::{Card, CardFace, Joker};
    use crate::model::discard::DiscardPile;
    use crate::model::hand::Hand;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    fn face(rank: Rank, suit: Suit) -> CardFace {
        CardFace::ranked(rank, suit)
    }

    fn hand(faces: [CardFace; 6], shown: &[usize]) -> Hand {
        let mut hand = Hand::new(faces.map(Card::face_down));
        for slot in shown {
            hand.reveal(*slot);
        }
        hand
    }

    #[test]
    fn projects_each_location() {
        let mine = hand(
            [
                face(Rank::Ace, Suit::Clubs),
                face(Rank::Two, Suit::Clubs),
                face(Rank::Three, Suit::Clubs),
                face(Rank::Four, Suit::Clubs),
                face(Rank::Five, Suit::Clubs),
                CardFace::Joker(Joker::Red),
            ],
            &[1, 5],
        );
        let theirs = hand(
            [
                face(Rank::Ace, Suit::Hearts),
                face(Rank::Two, Suit::Hearts),
                face(Rank::Three, Suit::Hearts),
                face(Rank::Four, Suit::Hearts),
                face(Rank::Five, Suit::Hearts),
                face(Rank::Six, Suit::Hearts),
            ],
            &[0],
        );
        let mut pile = DiscardPile::new();
        pile.push(Card::face_up(face(Rank::King, Suit::Spades)));

        let obs = Observation::project(&mine, [&theirs], &pile);
        assert_eq!(obs.get(1), Some(1));
        assert_eq!(obs.get(53), Some(5));
        assert_eq!(obs.get(0), Some(UNKNOWN));
        assert_eq!(obs.get(26), Some(OPPONENT_HAND));
        assert_eq!(obs.get(27), Some(UNKNOWN));
        assert_eq!(obs.get(51), Some(DISCARDED));
        assert_eq!(obs.own_slot(5), Some(53));
        assert_eq!(obs.own_slot(0), None);
        assert_eq!(obs.count(SlotState::Unknown), 50);
    }

    #[test]
    fn slot_state_values_round_trip() {
        for value in -3..=5 {
            let state = SlotState::from_value(value).expect("valid value");
            assert_eq!(state.value(), value);
        }
        assert_eq!(SlotState::from_value(6), None);
        assert_eq!(SlotState::from_value(-4), None);
    }

    #[test]
    fn set_overrides_slot() {
        let mut obs = Observation::unknown();
        obs.set(10, SlotState::OwnHand(3));
        assert_eq!(obs.state(10), Some(SlotState::OwnHand(3)));
        assert_eq!(obs.own_slot(3), Some(10));
    }
}
