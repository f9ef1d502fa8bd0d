//! Session state and its reducer.
//!
//! [`reduce`] is the only code that produces a new [`SessionState`]. The
//! store dispatches a [`SessionAction`] once the server has confirmed a
//! mutation; nothing is applied optimistically.

use tracing::warn;

use super::ballot::{Ballot, upsert_ballot};
use super::game::{LeagueRole, ValorantRole};
use super::ports::ApiError;
use super::user::{PreferredRoles, User};

/// Where the session is in its load sequence.
///
/// `Uninitialized → Loading → {Ready, LoginRequired}` or
/// `Uninitialized → LoginRequired`. `Ready` and `LoginRequired` are terminal
/// for the lifetime of a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    /// Nothing has happened yet.
    #[default]
    Uninitialized,
    /// Token claims decoded, profile fetch in flight.
    Loading,
    /// Profile loaded; mutations are accepted.
    Ready,
    /// No usable credentials; the user must sign in.
    LoginRequired,
}

/// Snapshot of the signed-in user and the session lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Load sequence position.
    pub lifecycle: Lifecycle,
    /// Profile, uninitialised until `Ready`.
    pub user: User,
    /// Failure that ended the load, kept for an error boundary to surface.
    pub error: Option<ApiError>,
}

/// Tagged state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Stored tokens were found; the profile fetch is starting.
    BeginLoading,
    /// The session cannot be restored.
    RequireLogin(Option<ApiError>),
    /// Replace the user wholesale with the fetched profile.
    InitializeUser(User),
    /// A League account was registered.
    AddSummoner(String),
    /// A League account was unregistered.
    RemoveSummoner(String),
    /// A Valorant account was registered.
    AddValorantAccount(String),
    /// A Valorant account was unregistered.
    RemoveValorantAccount(String),
    /// A ballot was accepted.
    UpdateBallot(Ballot),
    /// League role preferences were saved.
    SetPreferredRolesLeague(PreferredRoles<LeagueRole>),
    /// Valorant role preferences were saved.
    SetPreferredRolesValorant(PreferredRoles<ValorantRole>),
}

impl SessionAction {
    fn name(&self) -> &'static str {
        match self {
            Self::BeginLoading => "begin_loading",
            Self::RequireLogin(_) => "require_login",
            Self::InitializeUser(_) => "initialize_user",
            Self::AddSummoner(_) => "add_summoner",
            Self::RemoveSummoner(_) => "remove_summoner",
            Self::AddValorantAccount(_) => "add_valorant_account",
            Self::RemoveValorantAccount(_) => "remove_valorant_account",
            Self::UpdateBallot(_) => "update_ballot",
            Self::SetPreferredRolesLeague(_) => "set_preferred_roles_league",
            Self::SetPreferredRolesValorant(_) => "set_preferred_roles_valorant",
        }
    }
}

/// Apply `action` to `state`.
///
/// Actions that are not valid for the current lifecycle leave the state
/// untouched.
///
/// # Examples
/// ```
/// use inhouse_client::domain::{Lifecycle, SessionAction, SessionState, User, reduce};
///
/// let loading = reduce(SessionState::default(), SessionAction::BeginLoading);
/// let ready = reduce(loading, SessionAction::InitializeUser(User::default()));
/// assert_eq!(ready.lifecycle, Lifecycle::Ready);
/// ```
#[must_use]
pub fn reduce(state: SessionState, action: SessionAction) -> SessionState {
    let lifecycle = state.lifecycle;
    match (lifecycle, action) {
        (Lifecycle::Uninitialized, SessionAction::BeginLoading) => SessionState {
            lifecycle: Lifecycle::Loading,
            ..state
        },
        (Lifecycle::Uninitialized | Lifecycle::Loading, SessionAction::RequireLogin(error)) => {
            SessionState {
                lifecycle: Lifecycle::LoginRequired,
                user: User::default(),
                error,
            }
        }
        (Lifecycle::Loading, SessionAction::InitializeUser(user)) => SessionState {
            lifecycle: Lifecycle::Ready,
            user,
            error: None,
        },
        (Lifecycle::Ready, action) => apply_mutation(state, action),
        (_, action) => {
            warn!(
                ?lifecycle,
                action = action.name(),
                "session action rejected for lifecycle"
            );
            state
        }
    }
}

fn apply_mutation(state: SessionState, action: SessionAction) -> SessionState {
    let SessionState {
        lifecycle,
        mut user,
        error,
    } = state;
    match action {
        SessionAction::AddSummoner(name) => user.summoners.push(name),
        SessionAction::RemoveSummoner(name) => user.summoners.retain(|summoner| *summoner != name),
        SessionAction::AddValorantAccount(account) => user.valorant_accounts.push(account),
        SessionAction::RemoveValorantAccount(account) => {
            user.valorant_accounts.retain(|existing| *existing != account);
        }
        SessionAction::UpdateBallot(ballot) => {
            user.ranking_ballots = upsert_ballot(std::mem::take(&mut user.ranking_ballots), ballot);
        }
        SessionAction::SetPreferredRolesLeague(roles) => user.preferred_roles_league = roles,
        SessionAction::SetPreferredRolesValorant(roles) => user.preferred_roles_valorant = roles,
        other @ (SessionAction::BeginLoading
        | SessionAction::RequireLogin(_)
        | SessionAction::InitializeUser(_)) => {
            warn!(action = other.name(), "session already ready; action ignored");
        }
    }
    SessionState {
        lifecycle,
        user,
        error,
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for lifecycle transitions and mutations.
    use super::*;
    use crate::domain::{GameOption, Ranking, UserId};
    use rstest::{fixture, rstest};

    #[fixture]
    fn ready() -> SessionState {
        SessionState {
            lifecycle: Lifecycle::Ready,
            user: User {
                id: Some(UserId::new(1)),
                summoners: vec!["Faker".to_owned(), "Hide on bush".to_owned()],
                valorant_accounts: vec!["Faker#KR1".to_owned()],
                ..User::default()
            },
            error: None,
        }
    }

    #[rstest]
    fn bootstrap_path_reaches_ready() {
        let loading = reduce(SessionState::default(), SessionAction::BeginLoading);
        assert_eq!(loading.lifecycle, Lifecycle::Loading);

        let user = User {
            id: Some(UserId::new(5)),
            ..User::default()
        };
        let ready = reduce(loading, SessionAction::InitializeUser(user.clone()));
        assert_eq!(ready.lifecycle, Lifecycle::Ready);
        assert_eq!(ready.user, user);
    }

    #[rstest]
    #[case(Lifecycle::Uninitialized)]
    #[case(Lifecycle::Loading)]
    fn login_required_resets_the_user(#[case] lifecycle: Lifecycle) {
        let state = SessionState {
            lifecycle,
            ..SessionState::default()
        };
        let error = ApiError::login_required("expired");
        let next = reduce(state, SessionAction::RequireLogin(Some(error.clone())));
        assert_eq!(next.lifecycle, Lifecycle::LoginRequired);
        assert_eq!(next.error, Some(error));
    }

    #[rstest]
    #[case::initialize_before_loading(Lifecycle::Uninitialized, SessionAction::InitializeUser(User::default()))]
    #[case::mutation_before_ready(Lifecycle::Loading, SessionAction::AddSummoner("x".to_owned()))]
    #[case::ready_is_terminal(Lifecycle::Ready, SessionAction::RequireLogin(None))]
    #[case::login_required_is_terminal(Lifecycle::LoginRequired, SessionAction::BeginLoading)]
    fn invalid_transitions_leave_state_unchanged(
        #[case] lifecycle: Lifecycle,
        #[case] action: SessionAction,
    ) {
        let state = SessionState {
            lifecycle,
            ..SessionState::default()
        };
        assert_eq!(reduce(state.clone(), action), state);
    }

    #[rstest]
    fn summoners_are_appended_and_filtered(ready: SessionState) {
        let added = reduce(ready, SessionAction::AddSummoner("Gumayusi".to_owned()));
        assert_eq!(added.user.summoners.last().map(String::as_str), Some("Gumayusi"));

        let removed = reduce(added, SessionAction::RemoveSummoner("Faker".to_owned()));
        assert_eq!(removed.user.summoners, vec!["Hide on bush", "Gumayusi"]);
    }

    #[rstest]
    fn removing_an_absent_account_is_a_no_op(ready: SessionState) {
        let after_summoner = reduce(
            ready.clone(),
            SessionAction::RemoveSummoner("Nobody".to_owned()),
        );
        let after_valorant = reduce(
            after_summoner,
            SessionAction::RemoveValorantAccount("Nobody#NA1".to_owned()),
        );
        assert_eq!(after_valorant, ready);
    }

    #[rstest]
    fn ballots_upsert_by_key(ready: SessionState) {
        let ballot = |ranking| Ballot {
            rated_by: UserId::new(1),
            user_id: UserId::new(42),
            ranking,
            ranking_type: GameOption::League,
        };
        let first = reduce(ready, SessionAction::UpdateBallot(ballot(Ranking::C)));
        let second = reduce(first, SessionAction::UpdateBallot(ballot(Ranking::A)));
        assert_eq!(second.user.ranking_ballots, vec![ballot(Ranking::A)]);
    }

    #[rstest]
    fn preferred_roles_are_replaced(ready: SessionState) {
        let roles = PreferredRoles {
            primary_role: Some(ValorantRole::Duelist),
            secondary_role: None,
            off_role: Some(ValorantRole::Sentinel),
        };
        let next = reduce(ready, SessionAction::SetPreferredRolesValorant(roles));
        assert_eq!(next.user.preferred_roles_valorant, roles);
    }
}
