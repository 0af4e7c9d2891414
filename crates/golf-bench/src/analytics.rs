use std::fs;
use std::path::Path;

use golf_core::game::match_state::MATCH_PLAYERS;
use golf_core::game::serialization::MatchSnapshot;
use golf_core::history::{
    MalformedRecordError, char_slot, extract_scores, extract_terminations, parse_rounds,
};
use golf_core::model::card::CardFace;
use golf_core::model::hand::{COLUMN_OFFSET, Hand};
use golf_core::model::rank::Rank;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use thiserror::Error;

use crate::config::{AgentKind, BenchmarkConfig};

const CONFIDENCE_Z: f64 = 1.96; // 95% CI
/// Joker bucket followed by the thirteen ranks.
const VALUE_BUCKETS: usize = 14;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("baseline agent '{0}' not present in tournament")]
    MissingBaseline(String),
    #[error("match {match_index}: {source}")]
    Record {
        match_index: usize,
        #[source]
        source: MalformedRecordError,
    },
    #[error("match {match_index}: decoded totals {decoded:?} differ from recorded {recorded:?}")]
    TotalsMismatch {
        match_index: usize,
        decoded: Vec<i32>,
        recorded: Vec<i32>,
    },
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Accumulates per-agent statistics from the match records, with each seat
/// mapped back to the agent that sat there.
pub struct AnalyticsCollector {
    baseline: usize,
    agents: Vec<AgentAccumulator>,
    comparison: ComparisonAccumulator,
    matches: usize,
    draws: usize,
    rounds: usize,
    turns: usize,
    loop_guard: u32,
}

impl AnalyticsCollector {
    pub fn new(config: &BenchmarkConfig) -> Result<Self, AnalyticsError> {
        let baseline_name = config.baseline().unwrap_or_default().to_string();
        let baseline = config
            .agents
            .iter()
            .position(|agent| agent.name == baseline_name)
            .ok_or(AnalyticsError::MissingBaseline(baseline_name))?;

        let agents = config
            .agents
            .iter()
            .map(|agent| AgentAccumulator::new(agent.name.clone(), agent.kind, agent.params.clone()))
            .collect();

        Ok(Self {
            baseline,
            agents,
            comparison: ComparisonAccumulator::new(),
            matches: 0,
            draws: 0,
            rounds: 0,
            turns: 0,
            loop_guard: 0,
        })
    }

    pub fn record_match(
        &mut self,
        match_index: usize,
        snapshot: &MatchSnapshot,
    ) -> Result<(), AnalyticsError> {
        let malformed = |source| AnalyticsError::Record {
            match_index,
            source,
        };
        let mut match_totals = [0i32; MATCH_PLAYERS];

        for play in &snapshot.plays {
            let decoded = extract_scores(&play.record).map_err(malformed)?;
            if decoded != play.seat_totals {
                return Err(AnalyticsError::TotalsMismatch {
                    match_index,
                    decoded,
                    recorded: play.seat_totals.clone(),
                });
            }

            let terminations = extract_terminations(&play.record).map_err(malformed)?;
            self.loop_guard += terminations.loop_guard;

            for (seat, agent_index) in play.seating.iter().enumerate() {
                let agent = &mut self.agents[*agent_index];
                let total = decoded.get(seat).copied().unwrap_or_default();
                match_totals[*agent_index] += total;
                agent.rounds_ended += terminations.ended_by.get(seat).copied().unwrap_or(0);
            }

            for view in parse_rounds(&play.record).map_err(malformed)? {
                self.rounds += 1;
                self.turns += view.turn_count();
                let hands = view.final_hands().map_err(malformed)?;
                for (seat, hand) in hands.into_iter().enumerate() {
                    let Some(agent_index) = play.seating.get(seat) else {
                        continue;
                    };
                    self.agents[*agent_index].record_final_hand(hand);
                }
            }
        }

        for (agent, total) in self.agents.iter_mut().zip(match_totals) {
            agent.match_scores.push(f64::from(total));
        }
        let [a, b] = match_totals;
        if a == b {
            self.draws += 1;
        } else {
            // Lower total wins.
            let winner = if a < b { 0 } else { 1 };
            self.agents[winner].wins += 1;
        }

        let other = 1 - self.baseline;
        self.comparison
            .record(f64::from(match_totals[other] - match_totals[self.baseline]));
        self.matches += 1;
        Ok(())
    }

    pub fn finalize(self) -> AnalyticsSummary {
        let baseline_name = self.agents[self.baseline].name.clone();
        let (p_value, sample_size) = self.comparison.wilcoxon_signed_rank();
        let mean_turns = if self.rounds == 0 {
            0.0
        } else {
            self.turns as f64 / self.rounds as f64
        };

        let agents: Vec<AgentReport> = self
            .agents
            .into_iter()
            .map(AgentAccumulator::into_report)
            .collect();
        let comparison = ComparisonReport {
            agent: agents
                .iter()
                .map(|agent| agent.name.clone())
                .find(|name| *name != baseline_name)
                .unwrap_or_default(),
            p_value,
            sample_size,
        };

        AnalyticsSummary {
            baseline: baseline_name,
            matches: self.matches,
            draws: self.draws,
            rounds: self.rounds,
            mean_turns,
            loop_guard_rounds: self.loop_guard,
            agents,
            comparison,
        }
        .enrich()
    }
}

struct AgentAccumulator {
    name: String,
    kind: AgentKind,
    params: serde_yaml::Value,
    match_scores: Vec<f64>,
    wins: u32,
    rounds_ended: u32,
    final_hands: u32,
    column_matches: u32,
    value_counts: [u32; VALUE_BUCKETS],
}

impl AgentAccumulator {
    fn new(name: String, kind: AgentKind, params: serde_yaml::Value) -> Self {
        Self {
            name,
            kind,
            params,
            match_scores: Vec::new(),
            wins: 0,
            rounds_ended: 0,
            final_hands: 0,
            column_matches: 0,
            value_counts: [0; VALUE_BUCKETS],
        }
    }

    fn record_final_hand(&mut self, hand: &str) {
        let faces: Vec<Option<CardFace>> = hand
            .chars()
            .map(|c| char_slot(c).and_then(CardFace::from_slot))
            .collect();
        self.final_hands += 1;
        self.column_matches += column_matches(&faces);
        for face in faces.into_iter().flatten() {
            self.value_counts[value_bucket(face)] += 1;
        }
    }

    fn into_report(self) -> AgentReport {
        let matches = self.match_scores.len();
        let avg_match_score = if matches == 0 {
            0.0
        } else {
            self.match_scores.iter().sum::<f64>() / matches as f64
        };
        let column_matches_per_hand = if self.final_hands == 0 {
            0.0
        } else {
            f64::from(self.column_matches) / f64::from(self.final_hands)
        };

        AgentReport {
            ci95: confidence_interval(&self.match_scores),
            name: self.name,
            kind: self.kind,
            params: self.params,
            matches,
            avg_match_score,
            wins: self.wins as usize,
            rounds_ended: self.rounds_ended as usize,
            column_matches_per_hand,
            value_counts: self.value_counts,
            delta_vs_baseline: 0.0, // Filled once the baseline report is known
        }
    }
}

/// Columns (0,3), (1,4), (2,5) holding equal values; two jokers match too.
fn column_matches(faces: &[Option<CardFace>]) -> u32 {
    (0..COLUMN_OFFSET)
        .filter(|column| {
            let top = faces.get(*column).copied().flatten();
            let bottom = faces.get(Hand::column_partner(*column)).copied().flatten();
            matches!((top, bottom), (Some(a), Some(b)) if a.value() == b.value())
        })
        .count() as u32
}

fn value_bucket(face: CardFace) -> usize {
    face.rank().map_or(0, |rank| usize::from(rank.value()))
}

fn bucket_label(bucket: usize) -> String {
    u8::try_from(bucket)
        .ok()
        .and_then(Rank::from_value)
        .map_or_else(|| "Jkr".to_string(), |rank| rank.to_string())
}

#[derive(Clone)]
struct ComparisonAccumulator {
    diffs: Vec<f64>,
}

impl ComparisonAccumulator {
    fn new() -> Self {
        Self { diffs: Vec::new() }
    }

    fn record(&mut self, diff: f64) {
        self.diffs.push(diff);
    }

    fn wilcoxon_signed_rank(self) -> (f64, usize) {
        let diffs: Vec<f64> = self
            .diffs
            .into_iter()
            .filter(|d| d.abs() > f64::EPSILON)
            .collect();
        let n = diffs.len();
        if n == 0 {
            return (1.0, 0);
        }

        let mut paired: Vec<(f64, f64)> =
            diffs.into_iter().map(|d| (d.abs(), d.signum())).collect();
        paired.sort_by(|a, b| a.0.total_cmp(&b.0));

        // Rank handling with ties
        let mut ranks = Vec::with_capacity(n);
        let mut tie_sizes = Vec::new();
        let mut i = 0;
        while i < paired.len() {
            let mut j = i;
            while j + 1 < paired.len() && (paired[j + 1].0 - paired[i].0).abs() < 1e-12 {
                j += 1;
            }
            let rank = (i + j + 2) as f64 / 2.0;
            for entry in &paired[i..=j] {
                ranks.push((rank, entry.1));
            }
            if j > i {
                tie_sizes.push(j - i + 1);
            }
            i = j + 1;
        }

        let w_plus: f64 = ranks
            .iter()
            .filter(|(_, sign)| *sign > 0.0)
            .map(|(rank, _)| *rank)
            .sum();
        let w_minus: f64 = ranks
            .iter()
            .filter(|(_, sign)| *sign < 0.0)
            .map(|(rank, _)| *rank)
            .sum();

        let w = w_plus.min(w_minus);
        let n_f = n as f64;
        let mean_w = n_f * (n_f + 1.0) / 4.0;

        // Variance with tie correction
        let tie_adjustment: f64 = tie_sizes
            .into_iter()
            .map(|count| {
                let c = count as f64;
                (c.powi(3) - c) / 48.0
            })
            .sum();
        let variance_w = n_f * (n_f + 1.0) * (2.0 * n_f + 1.0) / 24.0 - tie_adjustment;
        if variance_w <= 0.0 {
            return (1.0, n);
        }

        let Ok(normal) = Normal::new(0.0, 1.0) else {
            return (1.0, n);
        };
        let z = ((w - mean_w).abs() - 0.5) / variance_w.sqrt();
        let p = 2.0 * (1.0 - normal.cdf(z));
        (p.clamp(0.0, 1.0), n)
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyticsSummary {
    pub baseline: String,
    pub matches: usize,
    pub draws: usize,
    pub rounds: usize,
    pub mean_turns: f64,
    pub loop_guard_rounds: u32,
    pub agents: Vec<AgentReport>,
    pub comparison: ComparisonReport,
}

impl AnalyticsSummary {
    pub fn enrich(mut self) -> Self {
        let baseline_avg = self
            .agents
            .iter()
            .find(|agent| agent.name == self.baseline)
            .map(|agent| agent.avg_match_score)
            .unwrap_or(0.0);

        for agent in &mut self.agents {
            agent.delta_vs_baseline = agent.avg_match_score - baseline_avg;
        }

        self
    }

    pub fn render_markdown(&self) -> String {
        let mut rows = String::new();
        rows.push_str("# Tournament Summary\n\n");
        rows.push_str(&format!(
            "{matches} paired matches ({rounds} rounds), {draws} drawn. Mean turns per round: {turns:.2}. Rounds stopped by the loop guard: {guard}.\n\n",
            matches = self.matches,
            rounds = self.rounds,
            draws = self.draws,
            turns = self.mean_turns,
            guard = self.loop_guard_rounds,
        ));
        rows.push_str("| Agent | Kind | Matches | Avg match score | Δ vs baseline | 95% CI | Win % | Rounds ended | Column matches/hand |\n");
        rows.push_str("|-------|------|---------|-----------------|----------------|--------|-------|--------------|---------------------|\n");

        for agent in &self.agents {
            let win_rate = if agent.matches == 0 {
                0.0
            } else {
                agent.wins as f64 / agent.matches as f64
            };
            rows.push_str(&format!(
                "| {name} | {kind} | {matches} | {avg:.3} | {delta:+.3} | [{ci_low:.3}, {ci_high:.3}] | {win:.1}% | {ended} | {columns:.3} |\n",
                name = agent.name,
                kind = agent.kind,
                matches = agent.matches,
                avg = agent.avg_match_score,
                delta = agent.delta_vs_baseline,
                ci_low = agent.ci95.0,
                ci_high = agent.ci95.1,
                win = win_rate * 100.0,
                ended = agent.rounds_ended,
                columns = agent.column_matches_per_hand,
            ));
        }

        rows.push_str(&format!(
            "\nWilcoxon signed-rank, {agent} vs {baseline}: p = {p:.4} (n = {n})\n",
            agent = self.comparison.agent,
            baseline = self.baseline,
            p = self.comparison.p_value,
            n = self.comparison.sample_size,
        ));

        rows.push_str("\n## Final hand card values\n\n| Agent |");
        for bucket in 0..VALUE_BUCKETS {
            rows.push_str(&format!(" {} |", bucket_label(bucket)));
        }
        rows.push_str("\n|-------|");
        rows.push_str(&"----|".repeat(VALUE_BUCKETS));
        rows.push('\n');
        for agent in &self.agents {
            rows.push_str(&format!("| {} |", agent.name));
            for count in agent.value_counts {
                rows.push_str(&format!(" {count} |"));
            }
            rows.push('\n');
        }
        rows
    }

    pub fn write_markdown(&self, path: impl AsRef<Path>) -> Result<(), AnalyticsError> {
        fs::write(path.as_ref(), self.render_markdown()).map_err(|e| AnalyticsError::Io {
            context: "writing summary markdown",
            source: e,
        })?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentReport {
    pub name: String,
    pub kind: AgentKind,
    pub params: serde_yaml::Value,
    pub matches: usize,
    pub avg_match_score: f64,
    pub ci95: (f64, f64),
    pub wins: usize,
    pub rounds_ended: usize,
    pub column_matches_per_hand: f64,
    /// Jokers first, then ace through king.
    pub value_counts: [u32; VALUE_BUCKETS],
    #[serde(skip)]
    pub delta_vs_baseline: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub agent: String,
    pub p_value: f64,
    pub sample_size: usize,
}

fn confidence_interval(points: &[f64]) -> (f64, f64) {
    if points.is_empty() {
        return (0.0, 0.0);
    }
    let mean = points.iter().sum::<f64>() / points.len() as f64;
    if points.len() == 1 {
        return (mean, mean);
    }
    let variance = points
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / (points.len() as f64 - 1.0);
    let std_error = (variance / points.len() as f64).sqrt();
    let margin = CONFIDENCE_Z * std_error;
    (mean - margin, mean + margin)
}
