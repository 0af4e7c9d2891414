use core::fmt;
use serde::{Deserialize, Serialize};

/// Zero-based seat at the table. Seat 0 is the first player in record order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Seat(u8);

impl Seat {
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    pub const fn from_index(index: usize, player_count: usize) -> Option<Self> {
        if index < player_count && index <= u8::MAX as usize {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn next(self, player_count: usize) -> Seat {
        Seat(((self.0 as usize + 1) % player_count) as u8)
    }

    /// Seat that opens round `round_number` (zero-based) at a table of `player_count`.
    pub const fn opening(round_number: u32, player_count: usize) -> Seat {
        Seat((round_number as usize % player_count) as u8)
    }

    pub fn all(player_count: usize) -> impl Iterator<Item = Seat> {
        (0..player_count).map(|index| Seat(index as u8))
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seat {}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::Seat;

    #[test]
    fn next_wraps_around_table() {
        assert_eq!(Seat::new(0).next(2), Seat::new(1));
        assert_eq!(Seat::new(1).next(2), Seat::new(0));
        assert_eq!(Seat::new(2).next(4), Seat::new(3));
    }

    #[test]
    fn opening_seat_rotates_with_round() {
        assert_eq!(Seat::opening(0, 2), Seat::new(0));
        assert_eq!(Seat::opening(3, 2), Seat::new(1));
        assert_eq!(Seat::opening(5, 3), Seat::new(2));
    }

    #[test]
    fn from_index_respects_player_count() {
        assert_eq!(Seat::from_index(1, 2), Some(Seat::new(1)));
        assert_eq!(Seat::from_index(2, 2), None);
        assert_eq!(Seat::all(3).count(), 3);
    }
}
