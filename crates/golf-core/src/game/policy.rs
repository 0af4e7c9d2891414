use crate::model::action::{DiscardChoice, DrawSource, DrawnCard};
use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::observation::Observation;
use crate::model::player::Seat;
use rand::RngCore;

/// Context provided to policies for decision-making
pub struct PolicyContext<'a> {
    pub seat: Seat,
    pub round_number: u32,
    pub player_count: usize,
    pub hand: &'a Hand,
    pub top_discard: Option<&'a Card>,
    pub observation: &'a Observation,
    pub stock_remaining: usize,
}

impl PolicyContext<'_> {
    /// Slot of the top discard as seen by everyone.
    pub fn top_discard_slot(&self) -> Option<usize> {
        self.top_discard.and_then(|card| card.slot())
    }
}

/// Decision-making capability the round engine drives, one call per half-turn.
///
/// Randomised policies must draw from `rng` so a round stays reproducible
/// from its seed.
pub trait Policy: Send {
    /// Pick where to draw from at the start of a turn.
    fn choose_draw(&mut self, ctx: &PolicyContext<'_>, rng: &mut dyn RngCore) -> DrawSource;

    /// Decide what to do with the card just drawn. `ctx.observation` is the
    /// view from before the draw.
    fn choose_discard(
        &mut self,
        ctx: &PolicyContext<'_>,
        drawn: DrawnCard,
        rng: &mut dyn RngCore,
    ) -> DiscardChoice;

    fn label(&self) -> &str {
        "policy"
    }
}
