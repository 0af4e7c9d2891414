pub mod bot;
pub mod policy;

pub use bot::{BotKind, DEFAULT_HIDDEN, NetworkError, StateEncoding, ValueFunction, ValueNetwork};
pub use policy::{
    BotPolicy, HeuristicPolicy, LearnedValuePolicy, Policy, PolicyContext, RandomPolicy,
};
