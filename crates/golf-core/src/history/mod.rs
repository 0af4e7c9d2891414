//! Compact text records of played rounds.
//!
//! A round record is a single line:
//!
//! ```text
//! <N><start> <initial hands> '<' <turns> '>' <end> <hidden> <final hands> <scores>
//! ```
//!
//! (spaces added for readability only). Every card is one character, `'A'`
//! plus its slot index, or `'#'` while face-down. Each turn is four
//! characters: the draw marker (`'+'` stock, `'-'` discard pile), the drawn
//! card, the discard marker (`'0'..='5'` exchanged slot, `'6'` returned to
//! the pile) and the card that landed on the pile.

pub mod batch;
pub mod decode;
pub mod encode;

pub use decode::{
    MalformedRecordError, RoundView, TerminationTally, extract_hands, extract_scores,
    extract_termination, extract_terminations, extract_turn_count, extract_turn_counts,
    parse_rounds,
};
pub use encode::{RoundRecordBuilder, card_char, char_slot, slot_char};
