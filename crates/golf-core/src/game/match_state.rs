use crate::game::policy::Policy;
use crate::history::batch::join_rounds;
use crate::model::round::{RoundError, RoundOutcome, RoundState};
use crate::model::rules::RoundRules;
use crate::model::score::ScoreBoard;
use crate::model::stock::Stock;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span};

pub const ROUNDS_PER_MATCH: usize = 9;

/// Paired matches are played at a two-seat table.
pub const MATCH_PLAYERS: usize = 2;

const GENERATION_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Identifies one paired match: the training generation (or any caller-chosen
/// batch counter) and the seed all nine round seeds derive from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchContext {
    pub generation: u64,
    pub seed: u64,
}

impl MatchContext {
    pub const fn new(generation: u64, seed: u64) -> Self {
        Self { generation, seed }
    }

    pub fn round_seeds(&self) -> [u64; ROUNDS_PER_MATCH] {
        let mixed = self.seed ^ self.generation.wrapping_mul(GENERATION_STRIDE);
        let mut rng = StdRng::seed_from_u64(mixed);
        std::array::from_fn(|_| rng.next_u64())
    }
}

/// Nine rounds played with one seating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayRecord {
    /// `seating[seat]` is the policy index (0 = first, 1 = second) in that seat.
    pub seating: [usize; MATCH_PLAYERS],
    pub rounds: Vec<RoundOutcome>,
}

impl PlayRecord {
    /// Round records joined one per line.
    pub fn record(&self) -> String {
        join_rounds(self.rounds.iter().map(|round| round.record.as_str()))
    }

    /// Totals per seat.
    pub fn scoreboard(&self) -> ScoreBoard {
        let mut board = ScoreBoard::new(MATCH_PLAYERS);
        for round in &self.rounds {
            board.apply_round(&round.scores);
        }
        board
    }

    /// Totals per policy, undoing this play's seating.
    pub fn totals_by_policy(&self) -> [i32; MATCH_PLAYERS] {
        let board = self.scoreboard();
        let mut totals = [0; MATCH_PLAYERS];
        for (seat, policy) in self.seating.iter().enumerate() {
            totals[*policy] = board.standings()[seat];
        }
        totals
    }
}

/// Both plays of a match: the same nine deals, with the seating reversed in
/// the second play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairedMatch {
    pub context: MatchContext,
    pub round_seeds: [u64; ROUNDS_PER_MATCH],
    pub plays: [PlayRecord; 2],
}

impl PairedMatch {
    pub fn play(
        context: MatchContext,
        rules: RoundRules,
        first: &mut dyn Policy,
        second: &mut dyn Policy,
    ) -> Result<Self, RoundError> {
        if rules.player_count != MATCH_PLAYERS {
            return Err(RoundError::InvalidPlayerCount(rules.player_count));
        }

        let span = info_span!(
            target: "golf_core::match",
            "paired_match",
            generation = context.generation,
            seed = context.seed
        );
        let _entered = span.enter();

        let round_seeds = context.round_seeds();
        let seatings = [[0, 1], [1, 0]];
        let mut rounds: [Vec<RoundOutcome>; 2] = [
            Vec::with_capacity(ROUNDS_PER_MATCH),
            Vec::with_capacity(ROUNDS_PER_MATCH),
        ];

        for (round_number, seed) in round_seeds.iter().copied().enumerate() {
            for (play, outcomes) in rounds.iter_mut().enumerate() {
                let mut rng = StdRng::seed_from_u64(seed);
                let stock = Stock::shuffled(rules.jokers, &mut rng);
                let round = RoundState::deal(stock, round_number as u32, rules, &mut rng)?;
                let mut seats: [&mut dyn Policy; MATCH_PLAYERS] = if play == 0 {
                    [&mut *first, &mut *second]
                } else {
                    [&mut *second, &mut *first]
                };
                outcomes.push(round.play(&mut seats, &mut rng)?);
            }
        }

        let [first_rounds, second_rounds] = rounds;
        let plays = [
            PlayRecord {
                seating: seatings[0],
                rounds: first_rounds,
            },
            PlayRecord {
                seating: seatings[1],
                rounds: second_rounds,
            },
        ];

        debug!(
            target: "golf_core::match",
            first = ?plays[0].totals_by_policy(),
            second = ?plays[1].totals_by_policy(),
            "paired match complete"
        );

        Ok(Self {
            context,
            round_seeds,
            plays,
        })
    }

    /// Match records for the original seating and the reversed one.
    pub fn records(&self) -> [String; 2] {
        [self.plays[0].record(), self.plays[1].record()]
    }

    /// Totals per policy summed over both plays.
    pub fn combined_totals(&self) -> [i32; MATCH_PLAYERS] {
        let a = self.plays[0].totals_by_policy();
        let b = self.plays[1].totals_by_policy();
        [a[0] + b[0], a[1] + b[1]]
    }
}
