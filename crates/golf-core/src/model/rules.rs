use serde::{Deserialize, Serialize};

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 8;
pub const DEFAULT_LOOP_REPEAT_LIMIT: usize = 5;

/// Table rules applied to every round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundRules {
    pub player_count: usize,
    pub jokers: bool,
    /// The round stops once the latest turn's four characters have appeared
    /// more than this many times in the record.
    pub loop_repeat_limit: usize,
    /// Reject returning a card taken from the discard pile straight back to it.
    pub forbid_redeposit: bool,
}

impl Default for RoundRules {
    fn default() -> Self {
        Self {
            player_count: MIN_PLAYERS,
            jokers: true,
            loop_repeat_limit: DEFAULT_LOOP_REPEAT_LIMIT,
            forbid_redeposit: false,
        }
    }
}

impl RoundRules {
    pub fn for_players(player_count: usize) -> Self {
        Self {
            player_count,
            ..Self::default()
        }
    }

    pub fn supports_player_count(&self) -> bool {
        (MIN_PLAYERS..=MAX_PLAYERS).contains(&self.player_count)
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_LOOP_REPEAT_LIMIT, RoundRules};

    #[test]
    fn defaults_match_two_player_table() {
        let rules = RoundRules::default();
        assert_eq!(rules.player_count, 2);
        assert!(rules.jokers);
        assert_eq!(rules.loop_repeat_limit, DEFAULT_LOOP_REPEAT_LIMIT);
        assert!(!rules.forbid_redeposit);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let rules: RoundRules = serde_json::from_str(r#"{"player_count": 3}"#).expect("parse");
        assert_eq!(rules.player_count, 3);
        assert!(rules.jokers);
    }

    #[test]
    fn player_count_bounds() {
        assert!(!RoundRules::for_players(1).supports_player_count());
        assert!(RoundRules::for_players(8).supports_player_count());
        assert!(!RoundRules::for_players(9).supports_player_count());
    }
}
