use golf_core::game::match_state::MATCH_PLAYERS;
use golf_core::model::rules::RoundRules;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

pub use golf_bot::BotKind as AgentKind;

const RUN_ID_TOKEN: &str = "{run_id}";

/// Tournament description read from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BenchmarkConfig {
    pub run_id: String,
    pub matches: MatchConfig,
    pub agents: Vec<AgentConfig>,
    #[serde(default)]
    pub rules: RoundRules,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BenchmarkConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let mut cfg: BenchmarkConfig =
            serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?;
        cfg.validate()
            .map_err(|source| ConfigError::Invalid { path, source })?;
        Ok(cfg)
    }

    /// Check every block and fill in defaults left empty in the file.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        check_name("run_id", &self.run_id)?;
        if self.matches.count == 0 {
            return Err(invalid("matches.count", "at least one paired match is required"));
        }
        if self.rules.player_count != MATCH_PLAYERS {
            return Err(invalid(
                "rules.player_count",
                format!(
                    "paired matches seat {MATCH_PLAYERS} players, found {}",
                    self.rules.player_count
                ),
            ));
        }
        if self.rules.loop_repeat_limit == 0 {
            return Err(invalid("rules.loop_repeat_limit", "must be at least 1"));
        }
        self.outputs.validate()?;
        self.validate_agents()?;
        if let Some(baseline) = self.metrics.baseline.as_deref()
            && !self.agents.iter().any(|agent| agent.name == baseline)
        {
            return Err(invalid(
                "metrics.baseline",
                format!("'{baseline}' is not one of the configured agents"),
            ));
        }
        if self.logging.tracing_level.trim().is_empty() {
            self.logging.tracing_level = LoggingConfig::default().tracing_level;
        }
        Ok(())
    }

    fn validate_agents(&mut self) -> Result<(), ValidationError> {
        if self.agents.len() != MATCH_PLAYERS {
            return Err(invalid(
                "agents",
                format!(
                    "a paired match needs exactly {MATCH_PLAYERS} agents, found {}",
                    self.agents.len()
                ),
            ));
        }
        let mut names = HashSet::new();
        for agent in &mut self.agents {
            check_name("agents.name", &agent.name)?;
            if !names.insert(agent.name.clone()) {
                return Err(invalid(
                    "agents",
                    format!("'{}' appears more than once", agent.name),
                ));
            }
            if agent.params.is_null() {
                agent.params = serde_yaml::Value::Mapping(Default::default());
            }
        }
        Ok(())
    }

    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        self.outputs.resolve(&self.run_id)
    }

    /// Agent the others are compared against; the first agent unless named.
    pub fn baseline(&self) -> Option<&str> {
        self.metrics
            .baseline
            .as_deref()
            .or_else(|| self.agents.first().map(|agent| agent.name.as_str()))
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MatchConfig {
    /// Seeds the generator every match seed is drawn from; 0 when absent.
    pub seed: Option<u64>,
    pub count: usize,
    #[serde(default)]
    pub generation: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AgentConfig {
    pub name: String,
    pub kind: AgentKind,
    #[serde(default)]
    pub params: serde_yaml::Value,
}

/// Output paths. Each may contain `{run_id}`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub records_dir: String,
    pub jsonl: String,
    pub summary_md: String,
}

impl OutputsConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            ("outputs.records_dir", &self.records_dir),
            ("outputs.jsonl", &self.jsonl),
            ("outputs.summary_md", &self.summary_md),
        ];
        match fields.iter().find(|(_, path)| path.trim().is_empty()) {
            Some((field, _)) => Err(invalid(*field, "path must not be empty")),
            None => Ok(()),
        }
    }

    fn resolve(&self, run_id: &str) -> ResolvedOutputs {
        let expand = |template: &str| PathBuf::from(template.replace(RUN_ID_TOKEN, run_id));
        ResolvedOutputs {
            records_dir: expand(&self.records_dir),
            jsonl: expand(&self.jsonl),
            summary_md: expand(&self.summary_md),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct MetricsConfig {
    #[serde(default)]
    pub baseline: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub enable_structured: bool,
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// `None` when the configured level is not a `tracing` level name.
    pub fn level(&self) -> Option<Level> {
        self.tracing_level.trim().parse().ok()
    }
}

/// Output paths with `{run_id}` substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub records_dir: PathBuf,
    pub jsonl: PathBuf,
    pub summary_md: PathBuf,
}

impl ResolvedOutputs {
    /// Batch file for one seat order: play 0 is the configured order, play 1
    /// the reversed one.
    pub fn batch_path(&self, run_id: &str, play: usize) -> PathBuf {
        self.records_dir.join(format!("{run_id}_{play}.txt"))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("{path:?} is not a usable configuration: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: ValidationError,
    },
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> ValidationError {
    ValidationError::InvalidField {
        field: field.into(),
        message: message.into(),
    }
}

/// Run ids and agent names end up in file names.
fn check_name(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid(field, "must not be empty"));
    }
    if let Some(bad) = value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
    {
        return Err(invalid(field, format!("'{value}' contains '{bad}'")));
    }
    Ok(())
}
