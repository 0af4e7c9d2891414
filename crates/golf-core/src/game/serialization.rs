use super::match_state::{MatchContext, PairedMatch};
use crate::history::decode::{MalformedRecordError, extract_scores};
use crate::model::round::Termination;
use serde::{Deserialize, Serialize};

/// One play of a paired match in a form that survives JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaySnapshot {
    pub seating: [usize; 2],
    pub seat_totals: Vec<i32>,
    pub turns: Vec<usize>,
    pub terminations: Vec<Termination>,
    pub record: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchSnapshot {
    pub generation: u64,
    pub seed: u64,
    pub round_seeds: Vec<u64>,
    pub plays: Vec<PlaySnapshot>,
}

impl MatchSnapshot {
    pub fn capture(paired: &PairedMatch) -> Self {
        let plays = paired
            .plays
            .iter()
            .map(|play| PlaySnapshot {
                seating: play.seating,
                seat_totals: play.scoreboard().standings().to_vec(),
                turns: play.rounds.iter().map(|round| round.turns).collect(),
                terminations: play.rounds.iter().map(|round| round.termination).collect(),
                record: play.record(),
            })
            .collect();
        MatchSnapshot {
            generation: paired.context.generation,
            seed: paired.context.seed,
            round_seeds: paired.round_seeds.to_vec(),
            plays,
        }
    }

    pub fn context(&self) -> MatchContext {
        MatchContext::new(self.generation, self.seed)
    }

    /// Re-derive seat totals from the stored records.
    pub fn verify_totals(&self) -> Result<bool, MalformedRecordError> {
        for play in &self.plays {
            if extract_scores(&play.record)? != play.seat_totals {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub fn to_json(paired: &PairedMatch) -> serde_json::Result<String> {
        let snapshot = Self::capture(paired);
        serde_json::to_string_pretty(&snapshot)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
