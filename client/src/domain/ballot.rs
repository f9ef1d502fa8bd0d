//! Ranking ballots and their keyed upsert.

use serde::{Deserialize, Serialize};

use super::game::{GameOption, Ranking};
use super::user::UserId;

/// One rating cast by the session user on another user.
///
/// Field names stay in their snake_case wire form in memory; the API client
/// exempts ballot-shaped payloads from key conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    /// Rater.
    pub rated_by: UserId,
    /// Ratee.
    pub user_id: UserId,
    /// Rating given.
    pub ranking: Ranking,
    /// Namespace the rating applies to.
    pub ranking_type: GameOption,
}

/// Identity of a ballot within a user's collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BallotKey {
    /// Ratee.
    pub user_id: UserId,
    /// Ranking namespace.
    pub ranking_type: GameOption,
}

impl Ballot {
    /// Key under which this ballot is stored.
    pub const fn key(&self) -> BallotKey {
        BallotKey {
            user_id: self.user_id,
            ranking_type: self.ranking_type,
        }
    }
}

/// Insert `ballot`, replacing any ballot with the same key in place.
///
/// A replaced ballot keeps its position; a new key is appended at the end.
pub fn upsert_ballot(mut ballots: Vec<Ballot>, ballot: Ballot) -> Vec<Ballot> {
    let key = ballot.key();
    if let Some(existing) = ballots.iter_mut().find(|existing| existing.key() == key) {
        *existing = ballot;
    } else {
        ballots.push(ballot);
    }
    ballots
}

/// Find the ballot stored under `key`.
pub fn find_ballot(ballots: &[Ballot], key: BallotKey) -> Option<&Ballot> {
    ballots.iter().find(|ballot| ballot.key() == key)
}
