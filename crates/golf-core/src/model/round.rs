use crate::game::policy::{Policy, PolicyContext};
use crate::history::encode::RoundRecordBuilder;
use crate::model::action::{DiscardChoice, DrawSource, DrawnCard};
use crate::model::discard::DiscardPile;
use crate::model::hand::{HAND_SIZE, Hand, HandSizeError};
use crate::model::observation::Observation;
use crate::model::player::Seat;
use crate::model::rules::RoundRules;
use crate::model::stock::{EmptyStockError, Stock};
use rand::RngCore;
use rand::seq::index;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

/// Cards turned face-up in every hand right after the deal.
pub const REVEALED_AT_DEAL: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The seat whose turn came up with a fully face-up hand.
    Finished(Seat),
    /// The latest turn group repeated past the configured limit.
    LoopGuard,
}

/// Dealing happens inside [`RoundState::deal`], so a live round is either
/// playing or ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Playing,
    Ended(Termination),
}

#[derive(Debug, Error)]
pub enum RoundError {
    #[error("stock exhausted and nothing left to recycle: {0}")]
    EmptyStock(#[from] EmptyStockError),
    #[error(transparent)]
    HandSize(#[from] HandSizeError),
    #[error("unsupported player count {0}")]
    InvalidPlayerCount(usize),
    #[error("expected {expected} policies but got {found}")]
    PolicyCount { expected: usize, found: usize },
    #[error("{seat} attempted an illegal action: {reason}")]
    IllegalAction { seat: Seat, reason: String },
    #[error("the round has already ended")]
    RoundOver,
}

impl RoundError {
    fn illegal(seat: Seat, reason: impl Into<String>) -> Self {
        RoundError::IllegalAction {
            seat,
            reason: reason.into(),
        }
    }
}

/// Everything known once a round has ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundOutcome {
    pub round_number: u32,
    pub opening: Seat,
    pub record: String,
    pub scores: Vec<i32>,
    pub hidden_at_end: Vec<usize>,
    pub final_hands: Vec<Hand>,
    pub turns: usize,
    pub recycles: usize,
    pub termination: Termination,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Continue,
    Ended(RoundOutcome),
}

#[derive(Debug, Clone)]
pub struct RoundState {
    round_number: u32,
    rules: RoundRules,
    stock: Stock,
    discard: DiscardPile,
    hands: Vec<Hand>,
    opening: Seat,
    active: Seat,
    phase: RoundPhase,
    turns: usize,
    recycles: usize,
    record: RoundRecordBuilder,
}

impl RoundState {
    /// Deal six face-down cards to each seat round-robin, turn two random cards
    /// per hand face-up, and flip the first discard.
    pub fn deal<R: RngCore>(
        mut stock: Stock,
        round_number: u32,
        rules: RoundRules,
        rng: &mut R,
    ) -> Result<Self, RoundError> {
        if !rules.supports_player_count() {
            return Err(RoundError::InvalidPlayerCount(rules.player_count));
        }

        let player_count = rules.player_count;
        let opening = Seat::opening(round_number, player_count);

        let mut dealt = vec![Vec::with_capacity(HAND_SIZE); player_count];
        for _ in 0..HAND_SIZE {
            for cards in dealt.iter_mut() {
                cards.push(stock.draw(true)?);
            }
        }
        let mut hands = dealt
            .into_iter()
            .map(Hand::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        for hand in &mut hands {
            for slot in index::sample(rng, HAND_SIZE, REVEALED_AT_DEAL).into_iter() {
                hand.reveal(slot);
            }
        }

        let mut record = RoundRecordBuilder::begin(player_count, opening);
        for hand in &hands {
            record.push_hand(hand);
        }

        let mut discard = DiscardPile::new();
        discard.push(stock.draw(false)?);
        record.open_turns();

        debug!(
            target: "golf_core::round",
            round_number,
            player_count,
            opening = opening.index(),
            stock = stock.len(),
            "round dealt"
        );

        Ok(Self {
            round_number,
            rules,
            stock,
            discard,
            hands,
            opening,
            active: opening,
            phase: RoundPhase::Playing,
            turns: 0,
            recycles: 0,
            record,
        })
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn rules(&self) -> &RoundRules {
        &self.rules
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, RoundPhase::Ended(_))
    }

    pub fn player_count(&self) -> usize {
        self.hands.len()
    }

    pub fn opening(&self) -> Seat {
        self.opening
    }

    pub fn active_seat(&self) -> Seat {
        self.active
    }

    pub fn hand(&self, seat: Seat) -> Option<&Hand> {
        self.hands.get(seat.index())
    }

    pub fn hands(&self) -> &[Hand] {
        &self.hands
    }

    pub fn stock(&self) -> &Stock {
        &self.stock
    }

    pub fn discard_pile(&self) -> &DiscardPile {
        &self.discard
    }

    pub fn turns_played(&self) -> usize {
        self.turns
    }

    pub fn recycles(&self) -> usize {
        self.recycles
    }

    /// The record as written so far.
    pub fn record(&self) -> &str {
        self.record.as_str()
    }

    /// Identity slots of every card on the table, sorted. Includes face-down
    /// cards, so this is for auditing, not for players.
    pub fn card_census(&self) -> Vec<usize> {
        let mut slots: Vec<usize> = self
            .stock
            .cards()
            .iter()
            .chain(self.discard.cards())
            .chain(self.hands.iter().flat_map(|hand| hand.iter()))
            .map(|card| card.face().slot())
            .collect();
        slots.sort_unstable();
        slots
    }

    pub fn observation(&self, seat: Seat) -> Observation {
        let observer = seat.index();
        Observation::project(
            &self.hands[observer],
            self.hands
                .iter()
                .enumerate()
                .filter(|(index, _)| *index != observer)
                .map(|(_, hand)| hand),
            &self.discard,
        )
    }

    fn context<'a>(&'a self, seat: Seat, observation: &'a Observation) -> PolicyContext<'a> {
        PolicyContext {
            seat,
            round_number: self.round_number,
            player_count: self.hands.len(),
            hand: &self.hands[seat.index()],
            top_discard: self.discard.top(),
            observation,
            stock_remaining: self.stock.len(),
        }
    }

    /// Play one turn for the active seat with `policy`.
    pub fn step<R: RngCore>(
        &mut self,
        policy: &mut dyn Policy,
        rng: &mut R,
    ) -> Result<Step, RoundError> {
        if self.is_over() {
            return Err(RoundError::RoundOver);
        }

        let seat = self.active;
        if self.hands[seat.index()].is_fully_revealed() {
            return Ok(Step::Ended(self.finish(Termination::Finished(seat))));
        }

        let observation = self.observation(seat);
        let source = policy.choose_draw(&self.context(seat, &observation), rng);
        let drawn = self.draw(seat, source, rng)?;
        let choice = policy.choose_discard(&self.context(seat, &observation), drawn, rng);
        self.resolve_discard(seat, drawn, choice)?;

        trace!(
            target: "golf_core::round",
            seat = seat.index(),
            policy = policy.label(),
            source = ?source,
            choice = %choice,
            "turn played"
        );

        Ok(self.end_turn(rng))
    }

    /// Drive the round to completion. `players[i]` plays seat `i`.
    pub fn play<R: RngCore>(
        mut self,
        players: &mut [&mut dyn Policy],
        rng: &mut R,
    ) -> Result<RoundOutcome, RoundError> {
        if players.len() != self.hands.len() {
            return Err(RoundError::PolicyCount {
                expected: self.hands.len(),
                found: players.len(),
            });
        }

        loop {
            let seat = self.active.index();
            if let Step::Ended(outcome) = self.step(&mut *players[seat], rng)? {
                return Ok(outcome);
            }
        }
    }

    fn draw<R: RngCore>(
        &mut self,
        seat: Seat,
        source: DrawSource,
        rng: &mut R,
    ) -> Result<DrawnCard, RoundError> {
        let card = match source {
            DrawSource::Stock => {
                if self.stock.is_empty() {
                    self.recycle(rng);
                }
                self.stock.draw(false)?
            }
            DrawSource::DiscardPile => self
                .discard
                .pop()
                .ok_or_else(|| RoundError::illegal(seat, "the discard pile is empty"))?,
        };
        self.record.push_draw(source, &card);
        Ok(DrawnCard { card, source })
    }

    fn resolve_discard(
        &mut self,
        seat: Seat,
        drawn: DrawnCard,
        choice: DiscardChoice,
    ) -> Result<(), RoundError> {
        let discarded = match choice {
            DiscardChoice::ReturnToPile => {
                if drawn.came_from_discard() && self.rules.forbid_redeposit {
                    return Err(RoundError::illegal(
                        seat,
                        "a card taken from the discard pile must be exchanged",
                    ));
                }
                drawn.card
            }
            DiscardChoice::Exchange(slot) => self.hands[seat.index()]
                .exchange(slot, drawn.card)
                .ok_or_else(|| RoundError::illegal(seat, format!("hand slot {slot} does not exist")))?,
        };
        self.record.push_discard(choice, &discarded);
        self.discard.push(discarded);
        Ok(())
    }

    fn end_turn<R: RngCore>(&mut self, rng: &mut R) -> Step {
        self.turns += 1;
        self.active = self.active.next(self.hands.len());

        if self.record.latest_group_repeats() > self.rules.loop_repeat_limit {
            debug!(
                target: "golf_core::round",
                round_number = self.round_number,
                turns = self.turns,
                "loop guard tripped"
            );
            return Step::Ended(self.finish(Termination::LoopGuard));
        }

        if self.stock.is_empty() {
            self.recycle(rng);
        }
        Step::Continue
    }

    fn recycle<R: RngCore>(&mut self, rng: &mut R) {
        let buried = self.discard.take_buried();
        self.stock = Stock::recycle(buried, self.stock.jokers_allowed(), rng);
        self.recycles += 1;
        trace!(
            target: "golf_core::round",
            round_number = self.round_number,
            stock = self.stock.len(),
            "discard pile recycled into stock"
        );
    }

    fn finish(&mut self, termination: Termination) -> RoundOutcome {
        self.record.close_turns(self.active);
        let hidden_at_end: Vec<usize> = self.hands.iter().map(Hand::hidden_count).collect();
        for hand in &mut self.hands {
            hand.reveal_all();
        }
        let scores: Vec<i32> = self.hands.iter().map(Hand::score).collect();
        self.record.push_summary(&hidden_at_end, &self.hands, &scores);
        self.phase = RoundPhase::Ended(termination);

        debug!(
            target: "golf_core::round",
            round_number = self.round_number,
            turns = self.turns,
            termination = ?termination,
            scores = ?scores,
            "round ended"
        );

        RoundOutcome {
            round_number: self.round_number,
            opening: self.opening,
            record: self.record.as_str().to_string(),
            scores,
            hidden_at_end,
            final_hands: self.hands.clone(),
            turns: self.turns,
            recycles: self.recycles,
            termination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RoundError, RoundPhase, RoundState, Step, Termination};
    use crate::game::policy::{Policy, PolicyContext};
    use crate::model::action::{DiscardChoice, DrawSource, DrawnCard};
    use crate::model::card::SLOT_COUNT;
    use crate::model::rules::RoundRules;
    use crate::model::stock::Stock;
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    struct Scripted {
        source: DrawSource,
        choice: DiscardChoice,
    }

    impl Policy for Scripted {
        fn choose_draw(&mut self, _ctx: &PolicyContext<'_>, _rng: &mut dyn RngCore) -> DrawSource {
            self.source
        }

        fn choose_discard(
            &mut self,
            _ctx: &PolicyContext<'_>,
            _drawn: DrawnCard,
            _rng: &mut dyn RngCore,
        ) -> DiscardChoice {
            self.choice
        }
    }

    fn dealt(seed: u64, rules: RoundRules) -> (RoundState, StdRng) {
        let mut rng = StdRng::seed_from_u64(seed);
        let stock = Stock::shuffled(rules.jokers, &mut rng);
        let round = RoundState::deal(stock, 0, rules, &mut rng).expect("deal succeeds");
        (round, rng)
    }

    #[test]
    fn deal_reveals_two_cards_per_hand() {
        let (round, _) = dealt(11, RoundRules::default());
        assert_eq!(round.phase(), RoundPhase::Playing);
        for hand in round.hands() {
            assert_eq!(hand.hidden_count(), 4);
        }
        assert_eq!(round.stock().len(), SLOT_COUNT - 12 - 1);
        assert_eq!(round.discard_pile().len(), 1);
        // header, 12 hand characters, then '<'; the upturned discard is not recorded
        assert_eq!(round.record().len(), 2 + 12 + 1);
        assert_eq!(round.record().find('<'), Some(14));
        assert!(round.record().starts_with("20"));
        assert!(round.record().ends_with('<'));
    }

    #[test]
    fn deal_rejects_unsupported_table() {
        let mut rng = StdRng::seed_from_u64(1);
        let stock = Stock::shuffled(true, &mut rng);
        let err = RoundState::deal(stock, 0, RoundRules::for_players(9), &mut rng)
            .expect_err("nine players do not fit");
        assert!(matches!(err, RoundError::InvalidPlayerCount(9)));
    }

    #[test]
    fn opening_seat_follows_round_number() {
        let mut rng = StdRng::seed_from_u64(5);
        let stock = Stock::shuffled(true, &mut rng);
        let round = RoundState::deal(stock, 3, RoundRules::default(), &mut rng).expect("deal");
        assert_eq!(round.active_seat().index(), 1);
        assert!(round.record().starts_with("21"));
    }

    #[test]
    fn exchange_moves_displaced_card_to_pile() {
        let (mut round, mut rng) = dealt(21, RoundRules::default());
        let mut policy = Scripted {
            source: DrawSource::Stock,
            choice: DiscardChoice::Exchange(0),
        };
        let next_stock = round.stock().cards().last().map(|c| c.face());
        let replaced = round.hands()[0].cards()[0].face();
        assert_eq!(round.step(&mut policy, &mut rng).expect("turn"), Step::Continue);
        assert_eq!(round.hands()[0].cards()[0].visible_face(), next_stock);
        assert_eq!(round.discard_pile().top().map(|c| c.face()), Some(replaced));
        assert_eq!(round.active_seat().index(), 1);
        assert_eq!(round.card_census(), (0..SLOT_COUNT).collect::<Vec<_>>());
    }

    #[test]
    fn illegal_slot_is_reported() {
        let (mut round, mut rng) = dealt(3, RoundRules::default());
        let mut policy = Scripted {
            source: DrawSource::Stock,
            choice: DiscardChoice::Exchange(6),
        };
        let err = round.step(&mut policy, &mut rng).expect_err("slot 6 is not a slot");
        assert!(matches!(err, RoundError::IllegalAction { .. }));
    }

    #[test]
    fn redeposit_rule_is_opt_in() {
        let rules = RoundRules {
            forbid_redeposit: true,
            ..RoundRules::default()
        };
        let (mut round, mut rng) = dealt(8, rules);
        let mut policy = Scripted {
            source: DrawSource::DiscardPile,
            choice: DiscardChoice::ReturnToPile,
        };
        let err = round.step(&mut policy, &mut rng).expect_err("redeposit forbidden");
        assert!(matches!(err, RoundError::IllegalAction { .. }));

        let (mut permissive, mut rng) = dealt(8, RoundRules::default());
        assert!(permissive.step(&mut policy, &mut rng).is_ok());
    }

    #[test]
    fn redepositing_the_same_card_trips_loop_guard() {
        let (round, mut rng) = dealt(4, RoundRules::default());
        let mut first = Scripted {
            source: DrawSource::DiscardPile,
            choice: DiscardChoice::ReturnToPile,
        };
        let mut second = Scripted {
            source: DrawSource::DiscardPile,
            choice: DiscardChoice::ReturnToPile,
        };
        let mut players: [&mut dyn Policy; 2] = [&mut first, &mut second];
        let outcome = round.play(&mut players, &mut rng).expect("round ends");
        assert_eq!(outcome.termination, Termination::LoopGuard);
        assert_eq!(outcome.turns, 6);
        assert_eq!(outcome.hidden_at_end, vec![4, 4]);
    }

    #[test]
    fn stepping_an_ended_round_fails() {
        let (mut round, mut rng) = dealt(4, RoundRules::default());
        let mut policy = Scripted {
            source: DrawSource::DiscardPile,
            choice: DiscardChoice::ReturnToPile,
        };
        while let Step::Continue = round.step(&mut policy, &mut rng).expect("turn") {}
        assert!(round.is_over());
        assert!(matches!(
            round.step(&mut policy, &mut rng),
            Err(RoundError::RoundOver)
        ));
    }

    #[test]
    fn wrong_policy_count_is_rejected() {
        let (round, mut rng) = dealt(2, RoundRules::default());
        let mut only = Scripted {
            source: DrawSource::Stock,
            choice: DiscardChoice::ReturnToPile,
        };
        let mut players: [&mut dyn Policy; 1] = [&mut only];
        assert!(matches!(
            round.play(&mut players, &mut rng),
            Err(RoundError::PolicyCount {
                expected: 2,
                found: 1
            })
        ));
    }
}
