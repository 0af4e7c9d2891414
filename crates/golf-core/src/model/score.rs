use crate::model::card::CardFace;
use crate::model::hand::{COLUMN_OFFSET, Hand};
use crate::model::player::Seat;
use serde::{Deserialize, Serialize};

/// Points for a single card: kings 0, jacks and queens 10, jokers -2, other
/// ranks their face value.
pub const fn card_score(face: CardFace) -> i32 {
    match face {
        CardFace::Joker(_) => -2,
        CardFace::Ranked { rank, .. } => match rank.value() {
            13 => 0,
            value if value > 10 => 10,
            value => value as i32,
        },
    }
}

/// Sum of column scores. A column whose two cards share a face value scores
/// zero; otherwise both cards count.
pub fn score_hand(hand: &Hand) -> i32 {
    let cards = hand.cards();
    (0..COLUMN_OFFSET)
        .map(|top| {
            let upper = cards[top].face();
            let lower = cards[top + COLUMN_OFFSET].face();
            if upper.value() == lower.value() {
                0
            } else {
                card_score(upper) + card_score(lower)
            }
        })
        .sum()
}

/// Running totals per seat across the rounds of one play of a match.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBoard {
    totals: Vec<i32>,
}

impl ScoreBoard {
    pub fn new(player_count: usize) -> Self {
        Self {
            totals: vec![0; player_count],
        }
    }

    pub fn add_points(&mut self, seat: Seat, points: i32) {
        if let Some(total) = self.totals.get_mut(seat.index()) {
            *total += points;
        }
    }

    pub fn apply_round(&mut self, scores: &[i32]) {
        for (total, points) in self.totals.iter_mut().zip(scores) {
            *total += points;
        }
    }

    pub fn score(&self, seat: Seat) -> i32 {
        self.totals.get(seat.index()).copied().unwrap_or(0)
    }

    pub fn standings(&self) -> &[i32] {
        &self.totals
    }

    /// Lowest total wins; ties go to the earlier seat.
    pub fn leading_player(&self) -> Seat {
        Seat::all(self.totals.len())
            .min_by_key(|seat| self.score(*seat))
            .unwrap_or(Seat::new(0))
    }
}

#[cfg(test)]
mod tests {
    use super::{ScoreBoard, card_score, score_hand};
    use crate::model::card::{Card, CardFace, Joker};
    use crate::model::hand::Hand;
    use crate::model::player::Seat;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    fn hand_of(ranks: [u8; 6]) -> Hand {
        let suits = [Suit::Clubs, Suit::Diamonds, Suit::Hearts];
        Hand::new(std::array::from_fn(|slot| {
            let rank = Rank::from_value(ranks[slot]).expect("valid rank");
            Card::face_up(CardFace::ranked(rank, suits[slot % 3]))
        }))
    }

    #[test]
    fn card_scores_follow_table() {
        let score = |rank| card_score(CardFace::ranked(rank, Suit::Spades));
        assert_eq!(score(Rank::King), 0);
        assert_eq!(score(Rank::Queen), 10);
        assert_eq!(score(Rank::Jack), 10);
        assert_eq!(score(Rank::Ten), 10);
        assert_eq!(score(Rank::Ace), 1);
        assert_eq!(score(Rank::Seven), 7);
        assert_eq!(card_score(CardFace::Joker(Joker::Red)), -2);
    }

    #[test]
    fn matched_columns_cancel() {
        // Columns (1,1) cancel, (5,7) = 12, (13,2) = 0 + 2.
        assert_eq!(score_hand(&hand_of([1, 5, 13, 1, 7, 2])), 14);
    }

    #[test]
    fn paired_jokers_score_zero() {
        let joker = Card::face_up(CardFace::Joker(Joker::Red));
        let other = Card::face_up(CardFace::Joker(Joker::Black));
        let two = Card::face_up(CardFace::ranked(Rank::Two, Suit::Clubs));
        let hand = Hand::new([joker, two, two, other, two, two]);
        assert_eq!(score_hand(&hand), 0);
    }

    #[test]
    fn lone_joker_is_negative() {
        let joker = Card::face_up(CardFace::Joker(Joker::Red));
        let king = Card::face_up(CardFace::ranked(Rank::King, Suit::Clubs));
        let hand = Hand::new([joker, king, king, king, king, king]);
        // Joker and king differ: -2 + 0; remaining columns are king pairs.
        assert_eq!(score_hand(&hand), -2);
    }

    #[test]
    fn scoreboard_accumulates_rounds() {
        let mut board = ScoreBoard::new(2);
        board.apply_round(&[14, 3]);
        board.add_points(Seat::new(0), -2);
        assert_eq!(board.standings(), &[12, 3]);
        assert_eq!(board.leading_player(), Seat::new(1));
    }
}
