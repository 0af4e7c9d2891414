use golf_core::model::card::{RANKED_SLOTS, SLOT_COUNT};
use golf_core::model::hand::HAND_SIZE;
use golf_core::model::observation::{DISCARDED, OPPONENT_HAND, Observation, UNKNOWN};
use serde::{Deserialize, Serialize};

/// Width of one hand position in the hand encoding: "unknown", thirteen
/// ranks, joker.
const HAND_POSITION_WIDTH: usize = 15;
/// Width of one identity slot in the state encoding (states -3..=5).
const STATE_WIDTH: usize = 9;

/// How an [`Observation`] is flattened into network inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StateEncoding {
    /// Only the observer's own face-up cards, one-hot by rank.
    #[default]
    OneHotHand,
    /// Every identity slot, one-hot over its nine possible states.
    OneHotState,
    /// Opponent, discard and unknown indicators per slot, followed by the
    /// hand encoding.
    OneHotStateAndHand,
}

impl StateEncoding {
    pub const ALL: [StateEncoding; 3] = [
        StateEncoding::OneHotHand,
        StateEncoding::OneHotState,
        StateEncoding::OneHotStateAndHand,
    ];

    pub const fn input_len(self) -> usize {
        match self {
            StateEncoding::OneHotHand => HAND_SIZE * HAND_POSITION_WIDTH,
            StateEncoding::OneHotState => SLOT_COUNT * STATE_WIDTH,
            StateEncoding::OneHotStateAndHand => {
                3 * SLOT_COUNT + HAND_SIZE * HAND_POSITION_WIDTH
            }
        }
    }

    pub fn encode(self, observation: &Observation) -> Vec<f64> {
        let mut input = vec![0.0; self.input_len()];
        match self {
            StateEncoding::OneHotHand => write_hand(observation, &mut input),
            StateEncoding::OneHotState => {
                for (slot, value) in observation.values().iter().enumerate() {
                    input[slot * STATE_WIDTH + state_offset(*value)] = 1.0;
                }
            }
            StateEncoding::OneHotStateAndHand => {
                for (slot, value) in observation.values().iter().enumerate() {
                    let block = match *value {
                        OPPONENT_HAND => 0,
                        DISCARDED => 1,
                        UNKNOWN => 2,
                        _ => continue,
                    };
                    input[block * SLOT_COUNT + slot] = 1.0;
                }
                write_hand(observation, &mut input[3 * SLOT_COUNT..]);
            }
        }
        input
    }
}

// Own-hand positions occupy 0..=5, the negative states wrap to the end.
fn state_offset(value: i8) -> usize {
    if value >= 0 {
        value as usize
    } else {
        (STATE_WIDTH as i8 + value) as usize
    }
}

fn write_hand(observation: &Observation, out: &mut [f64]) {
    for position in 0..HAND_SIZE {
        let base = position * HAND_POSITION_WIDTH;
        let offset = match observation.own_slot(position) {
            Some(slot) if slot < RANKED_SLOTS => slot % 13 + 1,
            Some(_) => HAND_POSITION_WIDTH - 1,
            None => 0,
        };
        out[base + offset] = 1.0;
    }
}
