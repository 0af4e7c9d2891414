use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use core::hash::{Hash, Hasher};
use serde::{Deserialize, Serialize};

/// Number of distinct card identities (52 ranked cards plus two jokers).
pub const SLOT_COUNT: usize = 54;

/// Number of ranked (non-joker) identities.
pub const RANKED_SLOTS: usize = 52;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[repr(i8)]
pub enum Joker {
    Red = -1,
    Black = -2,
}

impl Joker {
    pub const ALL: [Joker; 2] = [Joker::Red, Joker::Black];

    /// Negative sentinel carried by the joker before it is mapped to a slot.
    pub const fn discriminator(self) -> i8 {
        self as i8
    }

    /// Slot occupied by the joker: 53 for red, 52 for black.
    pub const fn slot(self) -> usize {
        (SLOT_COUNT as i8 + self.discriminator()) as usize
    }
}

/// The identity of a card, independent of whether it is face-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardFace {
    Ranked { rank: Rank, suit: Suit },
    Joker(Joker),
}

impl CardFace {
    pub const fn ranked(rank: Rank, suit: Suit) -> Self {
        CardFace::Ranked { rank, suit }
    }

    /// Signed identity: `(suit - 1) * 13 + (rank - 1)` for ranked cards and the
    /// joker discriminator otherwise.
    pub const fn index(self) -> i8 {
        match self {
            CardFace::Ranked { rank, suit } => (suit.block() * 13) as i8 + rank.value() as i8 - 1,
            CardFace::Joker(joker) => joker.discriminator(),
        }
    }

    /// Slot in `0..54`, with jokers wrapped to the top of the range.
    pub const fn slot(self) -> usize {
        match self {
            CardFace::Ranked { .. } => self.index() as usize,
            CardFace::Joker(joker) => joker.slot(),
        }
    }

    pub fn from_slot(slot: usize) -> Option<Self> {
        if slot < RANKED_SLOTS {
            let suit = Suit::from_value((slot / 13) as u8 + 1)?;
            let rank = Rank::from_value((slot % 13) as u8 + 1)?;
            return Some(CardFace::ranked(rank, suit));
        }
        Joker::ALL
            .into_iter()
            .find(|joker| joker.slot() == slot)
            .map(CardFace::Joker)
    }

    /// Face value: rank 1..=13, or -1 for either joker.
    pub const fn value(self) -> i8 {
        match self {
            CardFace::Ranked { rank, .. } => rank.value() as i8,
            CardFace::Joker(_) => -1,
        }
    }

    pub const fn rank(self) -> Option<Rank> {
        match self {
            CardFace::Ranked { rank, .. } => Some(rank),
            CardFace::Joker(_) => None,
        }
    }

    pub const fn is_joker(self) -> bool {
        matches!(self, CardFace::Joker(_))
    }
}

impl fmt::Display for CardFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardFace::Ranked { rank, suit } => write!(f, "{rank}{suit}"),
            CardFace::Joker(Joker::Red) => f.write_str("JR"),
            CardFace::Joker(Joker::Black) => f.write_str("JB"),
        }
    }
}

/// A physical card: an identity plus its face-down flag.
///
/// Visibility never takes part in equality or hashing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Card {
    face: CardFace,
    hidden: bool,
}

impl Card {
    pub const fn new(face: CardFace, hidden: bool) -> Self {
        Self { face, hidden }
    }

    pub const fn face_down(face: CardFace) -> Self {
        Self::new(face, true)
    }

    pub const fn face_up(face: CardFace) -> Self {
        Self::new(face, false)
    }

    /// True identity of the card, regardless of visibility. Policies should use
    /// [`Card::visible_face`] instead.
    pub const fn face(self) -> CardFace {
        self.face
    }

    pub const fn is_hidden(self) -> bool {
        self.hidden
    }

    pub fn reveal(&mut self) {
        self.hidden = false;
    }

    pub fn conceal(&mut self) {
        self.hidden = true;
    }

    pub const fn visible_face(self) -> Option<CardFace> {
        if self.hidden { None } else { Some(self.face) }
    }

    pub const fn slot(self) -> Option<usize> {
        if self.hidden {
            None
        } else {
            Some(self.face.slot())
        }
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.face == other.face
    }
}

impl Eq for Card {}

impl Hash for Card {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.face.hash(state);
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hidden {
            f.write_str("??")
        } else {
            write!(f, "{}", self.face)
        }
    }
}

/// Signed identity of a face-up card, or `None` while it is face-down.
pub fn identity_of(card: &Card) -> Option<i8> {
    card.visible_face().map(CardFace::index)
}

#[cfg(test)]
mod tests {
    use super::{Card, CardFace, Joker, SLOT_COUNT, identity_of};
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    #[test]
    fn ranked_index_follows_suit_blocks() {
        assert_eq!(CardFace::ranked(Rank::Ace, Suit::Clubs).index(), 0);
        assert_eq!(CardFace::ranked(Rank::King, Suit::Clubs).index(), 12);
        assert_eq!(CardFace::ranked(Rank::Ace, Suit::Diamonds).index(), 13);
        assert_eq!(CardFace::ranked(Rank::King, Suit::Spades).index(), 51);
    }

    #[test]
    fn jokers_use_negative_sentinels_and_top_slots() {
        assert_eq!(CardFace::Joker(Joker::Red).index(), -1);
        assert_eq!(CardFace::Joker(Joker::Black).index(), -2);
        assert_eq!(CardFace::Joker(Joker::Red).slot(), 53);
        assert_eq!(CardFace::Joker(Joker::Black).slot(), 52);
    }

    #[test]
    fn every_slot_maps_back_to_its_face() {
        for slot in 0..SLOT_COUNT {
            let face = CardFace::from_slot(slot).expect("slot in range");
            assert_eq!(face.slot(), slot);
        }
        assert_eq!(CardFace::from_slot(SLOT_COUNT), None);
    }

    #[test]
    fn hidden_cards_have_no_identity() {
        let face = CardFace::ranked(Rank::Seven, Suit::Hearts);
        let mut card = Card::face_down(face);
        assert_eq!(identity_of(&card), None);
        card.reveal();
        assert_eq!(identity_of(&card), Some(face.index()));
    }

    #[test]
    fn visibility_does_not_affect_equality() {
        let face = CardFace::Joker(Joker::Red);
        assert_eq!(Card::face_down(face), Card::face_up(face));
    }

    #[test]
    fn joker_value_is_negative_one() {
        assert_eq!(CardFace::Joker(Joker::Black).value(), -1);
        assert_eq!(CardFace::ranked(Rank::Queen, Suit::Clubs).value(), 12);
    }
}
