use super::encoding::StateEncoding;
use super::network::{NetworkError, ValueNetwork};
use golf_core::model::hand::{HAND_SIZE, Hand};
use golf_core::model::observation::{Observation, SlotState};

/// A state encoding paired with a network sized for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueFunction {
    encoding: StateEncoding,
    network: ValueNetwork,
}

impl ValueFunction {
    pub fn new(encoding: StateEncoding, network: ValueNetwork) -> Result<Self, NetworkError> {
        if network.n_input() != encoding.input_len() {
            return Err(NetworkError::InputLength {
                expected: encoding.input_len(),
                found: network.n_input(),
            });
        }
        Ok(Self { encoding, network })
    }

    pub fn seeded(encoding: StateEncoding, n_hidden: usize, seed: u64) -> Self {
        let network = ValueNetwork::from_seed(encoding.input_len(), n_hidden, seed);
        Self { encoding, network }
    }

    pub fn encoding(&self) -> StateEncoding {
        self.encoding
    }

    pub fn network(&self) -> &ValueNetwork {
        &self.network
    }

    pub fn evaluate(&self, observation: &Observation) -> f64 {
        let input = self.encoding.encode(observation);
        // Width is checked at construction.
        self.network.feedforward(&input).unwrap_or(f64::NEG_INFINITY)
    }

    /// Best hand position to place the card at identity `card_slot`, and the
    /// value of the resulting view. Face-up cards being displaced are seen
    /// going to the discard pile. Ties keep the lowest position.
    pub fn best_exchange(
        &self,
        observation: &Observation,
        hand: &Hand,
        card_slot: usize,
    ) -> (f64, usize) {
        let mut best = (f64::NEG_INFINITY, 0);
        for position in 0..HAND_SIZE {
            let mut after = *observation;
            after.set(card_slot, SlotState::OwnHand(position));
            if let Some(displaced) = hand.get(position).and_then(|card| card.slot()) {
                after.set(displaced, SlotState::Discarded);
            }
            let value = self.evaluate(&after);
            if value > best.0 {
                best = (value, position);
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::ValueFunction;
    use crate::bot::encoding::StateEncoding;
    use crate::bot::network::{NetworkError, ValueNetwork};
    use golf_core::model::card::{Card, CardFace};
    use golf_core::model::hand::Hand;
    use golf_core::model::observation::{Observation, SlotState};
    use golf_core::model::rank::Rank;
    use golf_core::model::suit::Suit;

    fn hand() -> Hand {
        let faces = [
            CardFace::ranked(Rank::Ace, Suit::Clubs),
            CardFace::ranked(Rank::Two, Suit::Clubs),
            CardFace::ranked(Rank::Three, Suit::Clubs),
            CardFace::ranked(Rank::Four, Suit::Clubs),
            CardFace::ranked(Rank::Five, Suit::Clubs),
            CardFace::ranked(Rank::Six, Suit::Clubs),
        ];
        let mut hand = Hand::new(faces.map(Card::face_down));
        hand.reveal(2);
        hand
    }

    #[test]
    fn rejects_mismatched_network() {
        let net = ValueNetwork::from_seed(10, 4, 1);
        let err = ValueFunction::new(StateEncoding::OneHotHand, net).unwrap_err();
        assert!(matches!(
            err,
            NetworkError::InputLength {
                expected: 90,
                found: 10
            }
        ));
    }

    #[test]
    fn best_exchange_matches_exhaustive_search() {
        let value = ValueFunction::seeded(StateEncoding::OneHotStateAndHand, 27, 3);
        let mut obs = Observation::unknown();
        obs.set(2, SlotState::OwnHand(2));
        obs.set(40, SlotState::Discarded);

        let (best, position) = value.best_exchange(&obs, &hand(), 40);
        let mut scores = Vec::new();
        for slot in 0..6 {
            let mut after = obs;
            after.set(40, SlotState::OwnHand(slot));
            if slot == 2 {
                after.set(2, SlotState::Discarded);
            }
            scores.push(value.evaluate(&after));
        }
        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(best, max);
        assert_eq!(scores[position], max);
        assert!(scores[..position].iter().all(|s| *s < max));
    }

    #[test]
    fn evaluation_is_deterministic() {
        let a = ValueFunction::seeded(StateEncoding::OneHotState, 8, 9);
        let b = ValueFunction::seeded(StateEncoding::OneHotState, 8, 9);
        let obs = Observation::unknown();
        assert_eq!(a.evaluate(&obs), b.evaluate(&obs));
        assert!(a.evaluate(&obs).is_finite());
    }
}
