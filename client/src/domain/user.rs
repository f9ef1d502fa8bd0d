//! Signed-in user profile held by the session.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ballot::Ballot;
use super::game::{GameOption, LeagueRole, ValorantRole};

/// Numeric user identifier issued by the ranking API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Wrap a raw identifier.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw identifier.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Primary, secondary and off role preferences for one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferredRoles<R> {
    /// Preferred role.
    pub primary_role: Option<R>,
    /// Second choice.
    pub secondary_role: Option<R>,
    /// Role played when neither of the others is free.
    pub off_role: Option<R>,
}

impl<R> Default for PreferredRoles<R> {
    fn default() -> Self {
        Self {
            primary_role: None,
            secondary_role: None,
            off_role: None,
        }
    }
}

/// Profile of a user as held in memory.
///
/// ## Invariants
/// - `User::default()` is the uninitialised profile: no id, no username and
///   empty collections.
/// - `ranking_ballots` holds at most one ballot per
///   `(user_id, ranking_type)` key.
///
/// The serialised form uses camelCase keys, matching the API client's key
/// conversion. Ballots keep their wire field names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Identifier, unset until the profile loads.
    #[serde(default)]
    pub id: Option<UserId>,
    /// Login name.
    #[serde(default)]
    pub username: Option<String>,
    /// Linked League account names, in link order.
    #[serde(default)]
    pub summoners: Vec<String>,
    /// Linked Valorant accounts, conventionally `name#tag`.
    #[serde(default)]
    pub valorant_accounts: Vec<String>,
    /// League role preferences.
    #[serde(default)]
    pub preferred_roles_league: PreferredRoles<LeagueRole>,
    /// Valorant role preferences.
    #[serde(default)]
    pub preferred_roles_valorant: PreferredRoles<ValorantRole>,
    /// Ballots this user has cast on others.
    #[serde(default)]
    pub ranking_ballots: Vec<Ballot>,
}

impl User {
    /// Whether the user has at least one account linked for `game`.
    pub fn has_linked_account(&self, game: GameOption) -> bool {
        match game {
            GameOption::League => !self.summoners.is_empty(),
            GameOption::Valorant => !self.valorant_accounts.is_empty(),
        }
    }

    /// First linked account for `game`, used as the display name in lists.
    pub fn primary_account(&self, game: GameOption) -> Option<&str> {
        let accounts = match game {
            GameOption::League => &self.summoners,
            GameOption::Valorant => &self.valorant_accounts,
        };
        accounts.first().map(String::as_str)
    }
}

/// Users that `current` can rank in `game`.
///
/// Drops `current` itself and anyone without a linked account for the game.
pub fn rankable_users(users: Vec<User>, current: Option<UserId>, game: GameOption) -> Vec<User> {
    users
        .into_iter()
        .filter(|user| user.id != current && user.has_linked_account(game))
        .collect()
}
