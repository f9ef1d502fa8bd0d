//! Session model, result wrapper and ports.
//!
//! Purpose: hold everything the client knows about the signed-in user and
//! the rules for changing it, independent of HTTP and storage.
//!
//! Public surface:
//! - Either / Outcome: checked success-or-failure wrapper returned by the
//!   API port.
//! - User, Ballot and the game enums: the profile as held in memory.
//! - SessionStore: bootstrap, queries and server-confirmed mutations.
//! - reduce / SessionAction: the pure state transition function.

pub mod auth;
pub mod ballot;
pub mod claims;
pub mod either;
pub mod error;
pub mod game;
pub mod ports;
pub mod session;
pub mod session_store;
pub mod user;

pub use self::auth::{CredentialsError, LoginCredentials, TokenPair};
pub use self::ballot::{Ballot, BallotKey, find_ballot, upsert_ballot};
pub use self::claims::{AccessTokenClaims, ClaimsError};
pub use self::either::{Either, Emptiness, Outcome, UnsafeAccessError};
pub use self::error::SessionError;
pub use self::game::{GameOption, LeagueRole, Ranking, ValorantRole};
pub use self::session::{Lifecycle, SessionAction, SessionState, reduce};
pub use self::session_store::SessionStore;
pub use self::user::{PreferredRoles, User, UserId, rankable_users};
