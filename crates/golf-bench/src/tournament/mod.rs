mod agents;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use golf_bot::policy::BotPolicy;
use golf_core::game::match_state::{MATCH_PLAYERS, MatchContext, PairedMatch};
use golf_core::game::serialization::MatchSnapshot;
use golf_core::history::batch::append_match;
use golf_core::model::round::{RoundError, Termination};
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::analytics::{AnalyticsCollector, AnalyticsError};
use crate::config::{AgentKind, BenchmarkConfig, ResolvedOutputs};
use crate::logging::telemetry_path;

pub use agents::{AgentBlueprint, AgentError};

/// Primary entry point for orchestrating tournaments.
pub struct TournamentRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    agents: Vec<AgentBlueprint>,
    logging_enabled: bool,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub matches_played: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub record_paths: [PathBuf; MATCH_PLAYERS],
    pub telemetry_path: Option<PathBuf>,
}

impl TournamentRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let agents = AgentBlueprint::from_configs(&config.agents)?;

        if agents.len() != MATCH_PLAYERS {
            return Err(RunnerError::SeatCount {
                found: agents.len(),
            });
        }

        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
            agents,
        })
    }

    /// Play every paired match, streaming batch records and JSONL rows to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;
        if !self.outputs.records_dir.as_os_str().is_empty() {
            fs::create_dir_all(&self.outputs.records_dir)?;
        }

        let record_paths: [PathBuf; MATCH_PLAYERS] =
            std::array::from_fn(|play| self.outputs.batch_path(&self.config.run_id, play));
        let mut batches = Vec::with_capacity(MATCH_PLAYERS);
        for path in &record_paths {
            batches.push(BufWriter::new(File::create(path)?));
        }
        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);

        let mut policies: Vec<BotPolicy> = self
            .agents
            .iter()
            .map(AgentBlueprint::spawn_policy)
            .collect();
        let mut rng = StdRng::seed_from_u64(self.config.matches.seed.unwrap_or(0));
        let mut analytics = AnalyticsCollector::new(&self.config)?;
        let mut rows_written = 0usize;

        for match_index in 0..self.config.matches.count {
            let context = MatchContext::new(self.config.matches.generation, rng.next_u64());
            let paired = {
                let [first, second] = policies.as_mut_slice() else {
                    return Err(RunnerError::SeatCount {
                        found: policies.len(),
                    });
                };
                PairedMatch::play(context, self.config.rules, first, second)?
            };
            let snapshot = MatchSnapshot::capture(&paired);

            for (play, batch) in snapshot.plays.iter().zip(batches.iter_mut()) {
                let mut chunk = String::new();
                append_match(&mut chunk, &play.record);
                batch.write_all(chunk.as_bytes())?;
            }

            analytics.record_match(match_index, &snapshot)?;
            rows_written += self.write_match_rows(&mut writer, match_index, &snapshot)?;
            self.log_match(match_index, &snapshot);
        }

        writer.flush()?;
        for batch in &mut batches {
            batch.flush()?;
        }

        let summary = analytics.finalize();
        summary.write_markdown(&self.outputs.summary_md)?;

        Ok(RunSummary {
            matches_played: self.config.matches.count,
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            record_paths,
            telemetry_path: self
                .logging_enabled
                .then(|| telemetry_path(&self.outputs)),
        })
    }

    fn write_match_rows(
        &self,
        writer: &mut BufWriter<File>,
        match_index: usize,
        snapshot: &MatchSnapshot,
    ) -> Result<usize, RunnerError> {
        let match_id = format!("M{match_index:05}");
        let mut rows_written = 0usize;

        for (agent_index, agent) in self.agents.iter().enumerate() {
            let mut play_totals = Vec::with_capacity(snapshot.plays.len());
            let mut rounds_ended = 0usize;
            for play in &snapshot.plays {
                let Some(seat) = play.seating.iter().position(|p| *p == agent_index) else {
                    continue;
                };
                play_totals.push(play.seat_totals.get(seat).copied().unwrap_or_default());
                rounds_ended += play
                    .terminations
                    .iter()
                    .filter(|t| matches!(t, Termination::Finished(s) if s.index() == seat))
                    .count();
            }
            let total: i32 = play_totals.iter().sum();

            let row = MatchLogRow {
                run_id: self.config.run_id.clone(),
                match_id: match_id.clone(),
                match_index,
                generation: snapshot.generation,
                match_seed: snapshot.seed,
                agent: agent.name.clone(),
                kind: agent.kind,
                play_totals,
                total,
                rounds_ended,
                loop_guard_rounds: snapshot
                    .plays
                    .iter()
                    .flat_map(|play| &play.terminations)
                    .filter(|t| **t == Termination::LoopGuard)
                    .count(),
                turns: snapshot.plays.iter().flat_map(|play| &play.turns).sum(),
            };

            serde_json::to_writer(&mut *writer, &row)?;
            writer.write_all(b"\n")?;
            rows_written += 1;
        }

        Ok(rows_written)
    }

    fn log_match(&self, match_index: usize, snapshot: &MatchSnapshot) {
        if !self.logging_enabled || !tracing::enabled!(Level::INFO) {
            return;
        }

        let totals = snapshot
            .plays
            .iter()
            .map(|play| format!("{:?}", play.seat_totals))
            .collect::<Vec<_>>()
            .join(" ");
        event!(
            target: "golf_bench::match",
            Level::INFO,
            run_id = %self.config.run_id,
            match_index = match_index as u64,
            generation = snapshot.generation,
            seed = snapshot.seed,
            seat_totals = %totals
        );
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[derive(Serialize)]
struct MatchLogRow {
    run_id: String,
    match_id: String,
    match_index: usize,
    generation: u64,
    match_seed: u64,
    agent: String,
    kind: AgentKind,
    /// Agent's total in the configured seat order, then the reversed one.
    play_totals: Vec<i32>,
    total: i32,
    rounds_ended: usize,
    loop_guard_rounds: usize,
    turns: usize,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("{0}")]
    Agent(#[from] AgentError),
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("game execution failed: {0}")]
    Game(#[from] RoundError),
    #[error("configuration requires exactly {MATCH_PLAYERS} agents but found {found}")]
    SeatCount { found: usize },
    #[error("analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
}
