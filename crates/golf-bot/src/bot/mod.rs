mod encoding;
mod network;
mod value;

pub use encoding::StateEncoding;
pub use network::{DEFAULT_HIDDEN, NetworkError, ValueNetwork};
pub use value::ValueFunction;

use core::fmt;
use serde::{Deserialize, Serialize};

/// Which decision policy a seat runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BotKind {
    Random,
    #[default]
    Heuristic,
    Value,
}

impl BotKind {
    pub const ALL: [BotKind; 3] = [BotKind::Random, BotKind::Heuristic, BotKind::Value];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "random" => Some(BotKind::Random),
            "heuristic" | "greedy" => Some(BotKind::Heuristic),
            "value" | "learned" => Some(BotKind::Value),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            BotKind::Random => "random",
            BotKind::Heuristic => "heuristic",
            BotKind::Value => "value",
        }
    }
}

impl fmt::Display for BotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
