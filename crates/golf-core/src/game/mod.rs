pub mod match_state;
pub mod policy;
pub mod serialization;
