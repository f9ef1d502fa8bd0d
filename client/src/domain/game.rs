//! Game namespaces, roles and the ranking scale.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Game whose ranking namespace a ballot belongs to.
///
/// Serialised upper-case (`LEAGUE`, `VALORANT`) on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GameOption {
    /// League of Legends.
    #[serde(alias = "League")]
    League,
    /// Valorant.
    #[serde(alias = "Valorant")]
    Valorant,
}

impl GameOption {
    /// Lower-case path segment used by per-game endpoints.
    pub const fn path_segment(self) -> &'static str {
        match self {
            Self::League => "league",
            Self::Valorant => "valorant",
        }
    }
}

impl fmt::Display for GameOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::League => f.write_str("League"),
            Self::Valorant => f.write_str("Valorant"),
        }
    }
}

/// League of Legends positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeagueRole {
    /// Top lane.
    Top,
    /// Jungle.
    Jungle,
    /// Mid lane.
    Mid,
    /// Bottom lane carry.
    Marksman,
    /// Support.
    Support,
}

/// Valorant agent roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValorantRole {
    /// Sentinel.
    Sentinel,
    /// Initiator.
    Initiator,
    /// Controller.
    Controller,
    /// Duelist.
    Duelist,
}

/// Letter-scale skill rating, best first.
///
/// `NotRated` is a sentinel and never compares as a real tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ranking {
    /// Shot caller, top-tier mechanics.
    S,
    /// Excellent communication, occasionally leads.
    A,
    /// Above average.
    B,
    /// Average.
    C,
    /// Below average.
    D,
    /// No rating given yet.
    #[serde(rename = "NOT_RATED")]
    NotRated,
}

impl Ranking {
    /// Selectable tiers in descending order.
    pub const RATED: [Self; 5] = [Self::S, Self::A, Self::B, Self::C, Self::D];
}

impl fmt::Display for Ranking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::S => "S",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::NotRated => "NOT_RATED",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for wire names.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(GameOption::League, "LEAGUE")]
    #[case(GameOption::Valorant, "VALORANT")]
    fn game_options_serialise_upper_case(#[case] game: GameOption, #[case] wire: &str) {
        assert_eq!(serde_json::to_value(game).expect("serialise"), json!(wire));
    }

    #[test]
    fn game_options_accept_display_case() {
        let game: GameOption = serde_json::from_value(json!("Valorant")).expect("decode");
        assert_eq!(game, GameOption::Valorant);
    }

    #[test]
    fn selectable_rankings_exclude_the_sentinel() {
        let labels: Vec<String> = Ranking::RATED.iter().map(ToString::to_string).collect();
        assert_eq!(labels, ["S", "A", "B", "C", "D"]);
    }

    #[test]
    fn sentinel_uses_its_wire_name() {
        assert_eq!(
            serde_json::to_value(Ranking::NotRated).expect("serialise"),
            json!("NOT_RATED")
        );
        let role: LeagueRole = serde_json::from_value(json!("Marksman")).expect("decode");
        assert_eq!(role, LeagueRole::Marksman);
    }
}
