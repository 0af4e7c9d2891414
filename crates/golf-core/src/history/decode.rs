use crate::history::batch::split_rounds;
use crate::history::encode::{TURN_WIDTH, TURNS_CLOSE, TURNS_OPEN};
use crate::model::action::{DiscardChoice, DrawSource};
use crate::model::hand::HAND_SIZE;
use serde::Serialize;
use thiserror::Error;

const HEADER_WIDTH: usize = 2;
const SCORE_WIDTH: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedRecordError {
    #[error("record is empty")]
    Empty,
    #[error("record contains non-ASCII characters")]
    NonAscii,
    #[error("invalid header {found:?}: expected player count and opening seat digits")]
    Header { found: String },
    #[error("missing '{0}' delimiter")]
    MissingDelimiter(char),
    #[error("deal segment has {found} characters, expected {expected}")]
    DealSegment { expected: usize, found: usize },
    #[error("turn segment of {len} characters is not a whole number of turns")]
    TurnSegment { len: usize },
    #[error("invalid turn {group:?} at position {index}")]
    Turn { index: usize, group: String },
    #[error("summary segment has {found} characters, expected {expected}")]
    Summary { expected: usize, found: usize },
    #[error("invalid digit {found:?} in {field}")]
    Digit { field: &'static str, found: char },
    #[error("invalid score field {field:?}")]
    Score { field: String },
    #[error("round declares {found} players but the match has {expected}")]
    PlayerCountMismatch { expected: usize, found: usize },
    #[error("hand extraction supports two-player records only, found {0} players")]
    UnsupportedPlayerCount(usize),
}

/// One decoded turn group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnEntry {
    pub source: DrawSource,
    pub drawn: char,
    pub choice: DiscardChoice,
    pub discarded: char,
}

/// Borrowed, validated view over a single round record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundView<'a> {
    player_count: usize,
    opening: usize,
    deal: &'a str,
    turns: &'a str,
    ending: usize,
    hidden: &'a str,
    hands: &'a str,
    scores: &'a str,
}

impl<'a> RoundView<'a> {
    pub fn parse(raw: &'a str) -> Result<Self, MalformedRecordError> {
        let raw = raw.trim_end_matches(['\r', '\n']);
        if raw.is_empty() {
            return Err(MalformedRecordError::Empty);
        }
        if !raw.is_ascii() {
            return Err(MalformedRecordError::NonAscii);
        }

        let header = raw.get(..HEADER_WIDTH).ok_or_else(|| MalformedRecordError::Header {
            found: raw.to_string(),
        })?;
        let mut header_digits = header.chars().map(|c| c.to_digit(10));
        let (player_count, opening) = match (header_digits.next(), header_digits.next()) {
            (Some(Some(count)), Some(Some(opening))) if count >= 2 && opening < count => {
                (count as usize, opening as usize)
            }
            _ => {
                return Err(MalformedRecordError::Header {
                    found: header.to_string(),
                });
            }
        };

        let open = raw
            .find(TURNS_OPEN)
            .ok_or(MalformedRecordError::MissingDelimiter(TURNS_OPEN))?;
        let close = raw[open..]
            .find(TURNS_CLOSE)
            .map(|offset| open + offset)
            .ok_or(MalformedRecordError::MissingDelimiter(TURNS_CLOSE))?;

        let deal = &raw[HEADER_WIDTH.min(open)..open];
        let expected_deal = player_count * HAND_SIZE;
        if open < HEADER_WIDTH || deal.len() != expected_deal {
            return Err(MalformedRecordError::DealSegment {
                expected: expected_deal,
                found: deal.len(),
            });
        }

        let turns = &raw[open + 1..close];
        if turns.len() % TURN_WIDTH != 0 {
            return Err(MalformedRecordError::TurnSegment { len: turns.len() });
        }

        let tail = &raw[close + 1..];
        let expected_tail = 1 + player_count + player_count * HAND_SIZE + player_count * SCORE_WIDTH;
        if tail.len() != expected_tail {
            return Err(MalformedRecordError::Summary {
                expected: expected_tail,
                found: tail.len(),
            });
        }

        let ending = digit(tail.as_bytes()[0] as char, "ending seat")?;
        if ending >= player_count {
            return Err(MalformedRecordError::Digit {
                field: "ending seat",
                found: tail.as_bytes()[0] as char,
            });
        }
        let hidden = &tail[1..1 + player_count];
        for c in hidden.chars() {
            if digit(c, "hidden count")? > HAND_SIZE {
                return Err(MalformedRecordError::Digit {
                    field: "hidden count",
                    found: c,
                });
            }
        }
        let hands_end = 1 + player_count + player_count * HAND_SIZE;

        Ok(Self {
            player_count,
            opening,
            deal,
            turns,
            ending,
            hidden,
            hands: &tail[1 + player_count..hands_end],
            scores: &tail[hands_end..],
        })
    }

    pub fn player_count(&self) -> usize {
        self.player_count
    }

    pub fn opening(&self) -> usize {
        self.opening
    }

    /// Seat whose turn was next when the round stopped.
    pub fn ending(&self) -> usize {
        self.ending
    }

    /// Hands as dealt (face-down cards as `'#'`), one string per seat.
    pub fn initial_hands(&self) -> Vec<&'a str> {
        chunks(self.deal, HAND_SIZE)
    }

    pub fn turn_count(&self) -> usize {
        self.turns.len() / TURN_WIDTH
    }

    pub fn turns(&self) -> Result<Vec<TurnEntry>, MalformedRecordError> {
        chunks(self.turns, TURN_WIDTH)
            .into_iter()
            .enumerate()
            .map(|(index, group)| parse_turn(index, group))
            .collect()
    }

    pub fn hidden_counts(&self) -> Vec<usize> {
        self.hidden
            .bytes()
            .map(|b| (b - b'0') as usize)
            .collect()
    }

    /// Revealed final hands, one six-character string per seat.
    pub fn final_hands(&self) -> Result<Vec<&'a str>, MalformedRecordError> {
        if self.player_count != 2 {
            return Err(MalformedRecordError::UnsupportedPlayerCount(self.player_count));
        }
        Ok(chunks(self.hands, HAND_SIZE))
    }

    pub fn scores(&self) -> Result<Vec<i32>, MalformedRecordError> {
        chunks(self.scores, SCORE_WIDTH)
            .into_iter()
            .map(|field| {
                field.parse::<i32>().map_err(|_| MalformedRecordError::Score {
                    field: field.to_string(),
                })
            })
            .collect()
    }

    /// Who ended the round: the ending seat when its hand was fully face-up,
    /// otherwise the loop guard.
    pub fn termination(&self) -> TerminationTally {
        let mut tally = TerminationTally::new(self.player_count);
        let fully_revealed = self.hidden.as_bytes()[self.ending] == b'0';
        if fully_revealed {
            tally.ended_by[self.ending] += 1;
        } else {
            tally.loop_guard += 1;
        }
        tally
    }
}

/// Count of rounds ended by each seat plus rounds stopped by the loop guard.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TerminationTally {
    pub ended_by: Vec<u32>,
    pub loop_guard: u32,
}

impl TerminationTally {
    pub fn new(player_count: usize) -> Self {
        Self {
            ended_by: vec![0; player_count],
            loop_guard: 0,
        }
    }

    pub fn merge(&mut self, other: &TerminationTally) {
        if self.ended_by.len() < other.ended_by.len() {
            self.ended_by.resize(other.ended_by.len(), 0);
        }
        for (total, count) in self.ended_by.iter_mut().zip(&other.ended_by) {
            *total += count;
        }
        self.loop_guard += other.loop_guard;
    }

    /// Seat counts followed by the loop-guard count.
    pub fn as_vec(&self) -> Vec<u32> {
        let mut values = self.ended_by.clone();
        values.push(self.loop_guard);
        values
    }
}

/// Per-seat score totals across every round of a match record.
pub fn extract_scores(match_record: &str) -> Result<Vec<i32>, MalformedRecordError> {
    let mut totals: Option<Vec<i32>> = None;
    for view in parse_rounds(match_record)? {
        let scores = view.scores()?;
        let totals = totals.get_or_insert_with(|| vec![0; view.player_count()]);
        for (total, score) in totals.iter_mut().zip(scores) {
            *total += score;
        }
    }
    totals.ok_or(MalformedRecordError::Empty)
}

/// Final hands of every round in a two-player match record.
pub fn extract_hands(match_record: &str) -> Result<Vec<Vec<String>>, MalformedRecordError> {
    parse_rounds(match_record)?
        .into_iter()
        .map(|view| {
            view.final_hands()
                .map(|hands| hands.into_iter().map(str::to_string).collect())
        })
        .collect()
}

pub fn extract_turn_count(round_record: &str) -> Result<usize, MalformedRecordError> {
    RoundView::parse(round_record).map(|view| view.turn_count())
}

pub fn extract_turn_counts(match_record: &str) -> Result<Vec<usize>, MalformedRecordError> {
    Ok(parse_rounds(match_record)?
        .iter()
        .map(RoundView::turn_count)
        .collect())
}

pub fn extract_termination(round_record: &str) -> Result<TerminationTally, MalformedRecordError> {
    RoundView::parse(round_record).map(|view| view.termination())
}

pub fn extract_terminations(match_record: &str) -> Result<TerminationTally, MalformedRecordError> {
    let mut tally = TerminationTally::default();
    for view in parse_rounds(match_record)? {
        tally.merge(&view.termination());
    }
    Ok(tally)
}

/// Parse every round of a match record, requiring a consistent player count.
pub fn parse_rounds(match_record: &str) -> Result<Vec<RoundView<'_>>, MalformedRecordError> {
    let mut views = Vec::new();
    for round in split_rounds(match_record) {
        let view = RoundView::parse(round)?;
        if let Some(first) = views.first().map(RoundView::player_count) {
            if first != view.player_count() {
                return Err(MalformedRecordError::PlayerCountMismatch {
                    expected: first,
                    found: view.player_count(),
                });
            }
        }
        views.push(view);
    }
    if views.is_empty() {
        return Err(MalformedRecordError::Empty);
    }
    Ok(views)
}

fn parse_turn(index: usize, group: &str) -> Result<TurnEntry, MalformedRecordError> {
    let invalid = || MalformedRecordError::Turn {
        index,
        group: group.to_string(),
    };
    let bytes = group.as_bytes();
    let source = DrawSource::from_marker(bytes[0] as char).ok_or_else(invalid)?;
    let choice = match bytes[2] {
        b @ b'0'..=b'5' => DiscardChoice::Exchange((b - b'0') as usize),
        b'6' => DiscardChoice::ReturnToPile,
        _ => return Err(invalid()),
    };
    Ok(TurnEntry {
        source,
        drawn: bytes[1] as char,
        choice,
        discarded: bytes[3] as char,
    })
}

fn digit(c: char, field: &'static str) -> Result<usize, MalformedRecordError> {
    c.to_digit(10)
        .map(|d| d as usize)
        .ok_or(MalformedRecordError::Digit { field, found: c })
}

fn chunks(text: &str, width: usize) -> Vec<&str> {
    (0..text.len())
        .step_by(width)
        .map(|start| &text[start..(start + width).min(text.len())])
        .collect()
}
