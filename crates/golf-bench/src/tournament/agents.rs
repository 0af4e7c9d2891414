use std::path::PathBuf;

use golf_bot::bot::{DEFAULT_HIDDEN, NetworkError, StateEncoding, ValueFunction, ValueNetwork};
use golf_bot::policy::BotPolicy;
use thiserror::Error;

use crate::config::{AgentConfig, AgentKind};

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("invalid parameter for agent '{name}': {message}")]
    InvalidParam { name: String, message: String },
    #[error("failed to load value network for agent '{name}': {source}")]
    Network {
        name: String,
        #[source]
        source: NetworkError,
    },
}

/// A configured agent, ready to hand out fresh policies.
pub struct AgentBlueprint {
    pub name: String,
    pub kind: AgentKind,
    implementation: AgentImplementation,
}

enum AgentImplementation {
    Random,
    Heuristic,
    Value(ValueFunction),
}

impl AgentBlueprint {
    pub fn from_configs(configs: &[AgentConfig]) -> Result<Vec<Self>, AgentError> {
        configs.iter().map(Self::from_config).collect()
    }

    pub fn from_config(config: &AgentConfig) -> Result<Self, AgentError> {
        let implementation = match config.kind {
            AgentKind::Random => {
                expect_mapping(&config.name, &config.params)?;
                AgentImplementation::Random
            }
            AgentKind::Heuristic => {
                expect_mapping(&config.name, &config.params)?;
                AgentImplementation::Heuristic
            }
            AgentKind::Value => {
                let options = ValueOptions::from_params(&config.name, &config.params)?;
                AgentImplementation::Value(options.build(&config.name)?)
            }
        };

        Ok(Self {
            name: config.name.clone(),
            kind: config.kind,
            implementation,
        })
    }

    pub fn spawn_policy(&self) -> BotPolicy {
        match &self.implementation {
            AgentImplementation::Random => BotPolicy::random(),
            AgentImplementation::Heuristic => BotPolicy::heuristic(),
            AgentImplementation::Value(function) => BotPolicy::value(function.clone()),
        }
    }
}

fn expect_mapping<'a>(
    name: &str,
    params: &'a serde_yaml::Value,
) -> Result<Option<&'a serde_yaml::Mapping>, AgentError> {
    if params.is_null() {
        return Ok(None);
    }
    params
        .as_mapping()
        .map(Some)
        .ok_or_else(|| AgentError::InvalidParam {
            name: name.to_string(),
            message: "expected mapping for agent params".to_string(),
        })
}

/// Parameters of a value-network agent: either a weights file or a seed for
/// fresh uniform weights.
#[derive(Debug, Clone, PartialEq)]
struct ValueOptions {
    encoding: StateEncoding,
    hidden: usize,
    seed: u64,
    weights: Option<PathBuf>,
}

impl ValueOptions {
    fn from_params(name: &str, params: &serde_yaml::Value) -> Result<Self, AgentError> {
        let mut options = Self {
            encoding: StateEncoding::default(),
            hidden: DEFAULT_HIDDEN,
            seed: 0,
            weights: None,
        };
        let Some(mapping) = expect_mapping(name, params)? else {
            return Ok(options);
        };

        let invalid = |message: String| AgentError::InvalidParam {
            name: name.to_string(),
            message,
        };

        for (key, value) in mapping {
            match key.as_str() {
                Some("encoding") => {
                    options.encoding = serde_yaml::from_value(value.clone())
                        .map_err(|err| invalid(format!("unknown encoding: {err}")))?;
                }
                Some("hidden") => {
                    options.hidden = value
                        .as_u64()
                        .filter(|hidden| *hidden > 0)
                        .map(|hidden| hidden as usize)
                        .ok_or_else(|| invalid("hidden must be a positive integer".to_string()))?;
                }
                Some("seed") => {
                    options.seed = value
                        .as_u64()
                        .ok_or_else(|| invalid("seed must be an unsigned integer".to_string()))?;
                }
                Some("weights") => {
                    let path = value
                        .as_str()
                        .ok_or_else(|| invalid("weights must be a path string".to_string()))?;
                    options.weights = Some(PathBuf::from(path));
                }
                Some(other) => {
                    return Err(invalid(format!("unknown parameter '{other}'")));
                }
                None => return Err(invalid("parameter names must be strings".to_string())),
            }
        }

        Ok(options)
    }

    fn build(&self, name: &str) -> Result<ValueFunction, AgentError> {
        let Some(path) = self.weights.as_ref() else {
            return Ok(ValueFunction::seeded(self.encoding, self.hidden, self.seed));
        };
        let network_error = |source| AgentError::Network {
            name: name.to_string(),
            source,
        };
        let network = ValueNetwork::from_path(path).map_err(network_error)?;
        ValueFunction::new(self.encoding, network).map_err(network_error)
    }
}
