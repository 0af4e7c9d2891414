use crate::model::action::{DiscardChoice, DrawSource};
use crate::model::card::{Card, SLOT_COUNT};
use crate::model::hand::Hand;
use crate::model::player::Seat;

pub const HIDDEN_CHAR: char = '#';
pub const TURNS_OPEN: char = '<';
pub const TURNS_CLOSE: char = '>';
pub const TURN_WIDTH: usize = 4;

/// Character for a card identity slot: `'A'` + slot.
pub fn slot_char(slot: usize) -> char {
    debug_assert!(slot < SLOT_COUNT);
    (b'A' + slot as u8) as char
}

/// Inverse of [`slot_char`].
pub fn char_slot(c: char) -> Option<usize> {
    let code = (c as u32).checked_sub('A' as u32)? as usize;
    (code < SLOT_COUNT).then_some(code)
}

/// `'#'` for a face-down card, otherwise the slot character.
pub fn card_char(card: &Card) -> char {
    card.slot().map(slot_char).unwrap_or(HIDDEN_CHAR)
}

/// Append-only buffer that accumulates one round record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundRecordBuilder {
    buffer: String,
}

impl RoundRecordBuilder {
    /// Start a record with the player count and opening seat digits.
    pub fn begin(player_count: usize, opening: Seat) -> Self {
        let mut buffer = String::with_capacity(128);
        push_digit(&mut buffer, player_count);
        push_digit(&mut buffer, opening.index());
        Self { buffer }
    }

    pub fn push_hand(&mut self, hand: &Hand) {
        for card in hand.iter() {
            self.buffer.push(card_char(card));
        }
    }

    fn push_card(&mut self, card: &Card) {
        self.buffer.push(card_char(card));
    }

    pub fn open_turns(&mut self) {
        self.buffer.push(TURNS_OPEN);
    }

    pub fn push_draw(&mut self, source: DrawSource, card: &Card) {
        self.buffer.push(source.marker());
        self.push_card(card);
    }

    /// Second half of a turn: the choice digit followed by the card that
    /// landed on the discard pile.
    pub fn push_discard(&mut self, choice: DiscardChoice, discarded: &Card) {
        self.buffer.push(choice.marker());
        self.push_card(discarded);
    }

    /// Number of non-overlapping occurrences of the latest turn group in the
    /// whole record, header included.
    pub fn latest_group_repeats(&self) -> usize {
        let len = self.buffer.len();
        if len < TURN_WIDTH {
            return 0;
        }
        let group = &self.buffer[len - TURN_WIDTH..];
        self.buffer.matches(group).count()
    }

    pub fn close_turns(&mut self, ending: Seat) {
        self.buffer.push(TURNS_CLOSE);
        push_digit(&mut self.buffer, ending.index());
    }

    /// Final block: every hidden count, then every revealed hand, then every
    /// score as a two-character field.
    pub fn push_summary(&mut self, hidden_counts: &[usize], hands: &[Hand], scores: &[i32]) {
        for hidden in hidden_counts {
            push_digit(&mut self.buffer, *hidden);
        }
        for hand in hands {
            self.push_hand(hand);
        }
        for score in scores {
            self.buffer.push_str(&format!("{score:02}"));
        }
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn finish(self) -> String {
        self.buffer
    }
}

fn push_digit(buffer: &mut String, value: usize) {
    debug_assert!(value < 10);
    buffer.push((b'0' + (value % 10) as u8) as char);
}

#[cfg(test)]
mod tests {
    use super::{RoundRecordBuilder, card_char, char_slot, slot_char};
    use crate::model::action::{DiscardChoice, DrawSource};
    use crate::model::card::{Card, CardFace, Joker, SLOT_COUNT};
    use crate::model::player::Seat;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    #[test]
    fn slot_characters_cover_alphabet_and_beyond() {
        assert_eq!(slot_char(0), 'A');
        assert_eq!(slot_char(25), 'Z');
        assert_eq!(slot_char(26), '[');
        assert_eq!(slot_char(52), 'u');
        assert_eq!(slot_char(53), 'v');
        for slot in 0..SLOT_COUNT {
            assert_eq!(char_slot(slot_char(slot)), Some(slot));
        }
        assert_eq!(char_slot('#'), None);
        assert_eq!(char_slot('w'), None);
    }

    #[test]
    fn card_char_hides_face_down_cards() {
        let mut joker = Card::face_down(CardFace::Joker(Joker::Red));
        assert_eq!(card_char(&joker), '#');
        joker.reveal();
        assert_eq!(card_char(&joker), 'v');
        let two = Card::face_up(CardFace::ranked(Rank::Two, Suit::Diamonds));
        assert_eq!(card_char(&two), 'O');
    }

    #[test]
    fn turn_groups_are_four_characters() {
        let card = Card::face_up(CardFace::ranked(Rank::Ace, Suit::Clubs));
        let mut record = RoundRecordBuilder::begin(2, Seat::new(1));
        record.open_turns();
        record.push_draw(DrawSource::DiscardPile, &card);
        record.push_discard(DiscardChoice::ReturnToPile, &card);
        assert_eq!(record.as_str(), "21<-A6A");
        assert_eq!(record.latest_group_repeats(), 1);
        record.push_draw(DrawSource::DiscardPile, &card);
        record.push_discard(DiscardChoice::ReturnToPile, &card);
        assert_eq!(record.latest_group_repeats(), 2);
    }

    #[test]
    fn summary_scores_are_two_wide() {
        let mut record = RoundRecordBuilder::begin(2, Seat::new(0));
        record.close_turns(Seat::new(1));
        record.push_summary(&[0, 3], &[], &[7, -4]);
        assert_eq!(record.finish(), "20>10307-4");
    }
}
