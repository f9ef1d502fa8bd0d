//! Session store: the signed-in user and the operations that change it.
//!
//! The store restores a session from persisted tokens, exposes read-only
//! snapshots to the UI and performs each mutation against the API before
//! folding the confirmed result into state through [`reduce`]. Failures are
//! surfaced through the [`Notifier`] and leave state untouched.

use std::mem;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::{Value, json};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    ApiError, ApiRequest, Method, Notifier, ResourcePath, Severity, TokenStore,
};
use crate::domain::{
    AccessTokenClaims, Ballot, BallotKey, Either, Emptiness, GameOption, LeagueRole, Lifecycle,
    Outcome, PreferredRoles, Ranking, SessionAction, SessionError, SessionState, User, UserId,
    ValorantRole, find_ballot, rankable_users, reduce,
};

/// Holds the session state and performs user mutations.
pub struct SessionStore<A, N> {
    api: Arc<A>,
    tokens: Arc<dyn TokenStore>,
    notifier: Arc<N>,
    state: watch::Sender<SessionState>,
    closed: AtomicBool,
}

impl<A, N> SessionStore<A, N> {
    /// Create an uninitialised store.
    #[must_use]
    pub fn new(api: Arc<A>, tokens: Arc<dyn TokenStore>, notifier: Arc<N>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            api,
            tokens,
            notifier,
            state,
            closed: AtomicBool::new(false),
        }
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver that is marked changed after every applied transition.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Current lifecycle.
    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.state.borrow().lifecycle
    }

    /// Current profile.
    #[must_use]
    pub fn user(&self) -> User {
        self.state.borrow().user.clone()
    }

    /// Failure that ended the bootstrap, if any.
    #[must_use]
    pub fn error(&self) -> Option<ApiError> {
        self.state.borrow().error.clone()
    }

    /// Ballot the session user cast on `user_id` for `game`.
    #[must_use]
    pub fn ballot_for(&self, user_id: UserId, game: GameOption) -> Option<Ballot> {
        let key = BallotKey {
            user_id,
            ranking_type: game,
        };
        find_ballot(&self.state.borrow().user.ranking_ballots, key).copied()
    }

    /// Filter `users` down to those the session user may rank in `game`.
    #[must_use]
    pub fn rankable_users(&self, users: Vec<User>, game: GameOption) -> Vec<User> {
        let current = self.state.borrow().user.id;
        rankable_users(users, current, game)
    }

    /// Stop applying state transitions.
    ///
    /// Requests already in flight still complete, but their results are
    /// discarded.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    /// Whether [`Self::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn dispatch(&self, action: SessionAction) {
        if self.is_closed() {
            debug!(?action, "session store closed; dropping action");
            return;
        }
        self.state
            .send_modify(|state| *state = reduce(mem::take(state), action));
    }

    fn ensure_ready(&self) -> Result<(), SessionError> {
        match self.lifecycle() {
            Lifecycle::Ready => Ok(()),
            lifecycle => Err(SessionError::NotReady { lifecycle }),
        }
    }
}

impl<A, N> SessionStore<A, N>
where
    A: ApiRequest,
    N: Notifier,
{
    /// Restore the session from stored tokens.
    ///
    /// Without both tokens the store moves straight to
    /// [`Lifecycle::LoginRequired`] without contacting the API. Otherwise the
    /// user id is read from the access token and the profile fetched; any
    /// failure also ends in `LoginRequired`, with the cause kept in
    /// [`SessionState::error`]. Only the first call has any effect.
    pub async fn bootstrap(&self) -> Lifecycle {
        let lifecycle = self.lifecycle();
        if lifecycle != Lifecycle::Uninitialized {
            debug!(?lifecycle, "bootstrap skipped");
            return lifecycle;
        }

        let access = match (self.tokens.access_token(), self.tokens.refresh_token()) {
            (Ok(Some(access)), Ok(Some(_))) => access,
            (Err(error), _) | (_, Err(error)) => {
                warn!(%error, "token store unreadable; login required");
                self.dispatch(SessionAction::RequireLogin(None));
                return self.lifecycle();
            }
            _ => {
                debug!("no stored token pair; login required");
                self.dispatch(SessionAction::RequireLogin(None));
                return self.lifecycle();
            }
        };

        self.dispatch(SessionAction::BeginLoading);
        let action = match self.load_profile(&access).await {
            Ok(user) => {
                info!(user_id = ?user.id, "session restored");
                SessionAction::InitializeUser(user)
            }
            Err(error) => {
                warn!(kind = error.kind(), %error, "session restore failed; login required");
                SessionAction::RequireLogin(Some(error))
            }
        };
        self.dispatch(action);
        self.lifecycle()
    }

    async fn load_profile(&self, access_token: &str) -> Result<User, ApiError> {
        let claims = AccessTokenClaims::decode(access_token)
            .map_err(|error| ApiError::decode(error.to_string()))?;
        let user_id = claims.user_id();
        debug!(%user_id, expires_at = ?claims.expires_at(), "access token claims decoded");
        let path = ResourcePath::new(["users".to_owned(), user_id.to_string()]);
        let body = self
            .api
            .request(Method::Get, &path, None)
            .await
            .unwrap_or_throw()?;
        let mut user: User = serde_json::from_value(body)
            .map_err(|error| ApiError::decode(format!("user profile: {error}")))?;
        user.id.get_or_insert(user_id);
        Ok(user)
    }

    /// Link a League account.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotReady`] before the profile has loaded;
    /// [`SessionError::Api`] when the server rejects the request.
    pub async fn add_summoner(&self, name: &str) -> Result<(), SessionError> {
        self.ensure_ready()?;
        self.send(
            Method::Post,
            ResourcePath::new(["summoners", "register"]),
            Some(json!({ "in_game_name": name })),
            format!("Failed to add {name}."),
        )
        .await?;
        self.dispatch(SessionAction::AddSummoner(name.to_owned()));
        Ok(())
    }

    /// Unlink a League account.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotReady`] before the profile has loaded;
    /// [`SessionError::Api`] when the server rejects the request.
    pub async fn remove_summoner(&self, name: &str) -> Result<(), SessionError> {
        self.ensure_ready()?;
        self.send(
            Method::Delete,
            ResourcePath::new(["summoners", name]),
            None,
            format!("Failed to remove {name}."),
        )
        .await?;
        self.dispatch(SessionAction::RemoveSummoner(name.to_owned()));
        Ok(())
    }

    /// Link a Valorant account. The tag is sent upper-cased.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotReady`] before the profile has loaded;
    /// [`SessionError::Api`] when the server rejects the request.
    pub async fn add_valorant_account(&self, name: &str, tag: &str) -> Result<(), SessionError> {
        self.ensure_ready()?;
        let upper_tag = tag.to_uppercase();
        self.send(
            Method::Post,
            ResourcePath::new(["valorant-accounts", "register"]),
            Some(json!({ "name": name, "tag": upper_tag })),
            format!("Failed to add {name}#{upper_tag}."),
        )
        .await?;
        self.dispatch(SessionAction::AddValorantAccount(name.to_owned()));
        Ok(())
    }

    /// Unlink a Valorant account given as `name#tag`.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotReady`] before the profile has loaded;
    /// [`SessionError::InvalidAccountName`] unless `account` is exactly one
    /// non-empty name and tag joined by `#`;
    /// [`SessionError::Api`] when the server rejects the request.
    pub async fn remove_valorant_account(&self, account: &str) -> Result<(), SessionError> {
        self.ensure_ready()?;
        let failure = format!("Failed to remove {account}.");
        let Some((name, tag)) = split_account(account) else {
            warn!(account, "valorant account is not name#tag");
            self.notifier.notify(&failure, Severity::Error);
            return Err(SessionError::InvalidAccountName {
                account: account.to_owned(),
            });
        };
        self.send(
            Method::Delete,
            ResourcePath::new(["valorant-accounts", name, tag]),
            None,
            failure,
        )
        .await?;
        self.dispatch(SessionAction::RemoveValorantAccount(account.to_owned()));
        Ok(())
    }

    /// Cast or replace the session user's ballot on `target`.
    ///
    /// `target_name` is only used in notifications.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotReady`] before the profile has loaded;
    /// [`SessionError::Api`] when the server rejects the request.
    pub async fn update_ballot(
        &self,
        target: UserId,
        ranking: Ranking,
        ranking_type: GameOption,
        target_name: &str,
    ) -> Result<(), SessionError> {
        self.ensure_ready()?;
        let lifecycle = self.lifecycle();
        let rated_by = self
            .state
            .borrow()
            .user
            .id
            .ok_or(SessionError::NotReady { lifecycle })?;
        let submitted = Ballot {
            rated_by,
            user_id: target,
            ranking,
            ranking_type,
        };
        let echoed = self
            .send(
                Method::Put,
                ResourcePath::new(["rankings", "rank"]),
                Some(json!({
                    "user_id": target,
                    "rated_by": rated_by,
                    "ranking": ranking,
                    "ranking_type": ranking_type,
                })),
                format!("Failed to update ranking of {target_name}"),
            )
            .await?;
        let ballot = Self::echoed_ballot(echoed, submitted);
        self.dispatch(SessionAction::UpdateBallot(ballot));
        self.notifier.notify(
            &format!("Successfully updated ranking of {target_name}"),
            Severity::Success,
        );
        Ok(())
    }

    fn echoed_ballot(echoed: Value, submitted: Ballot) -> Ballot {
        if echoed.is_empty_value() {
            return submitted;
        }
        match serde_json::from_value::<Ballot>(echoed) {
            Ok(ballot) if ballot.key() == submitted.key() => ballot,
            Ok(ballot) => {
                warn!(?ballot, ?submitted, "echoed ballot has a different key");
                submitted
            }
            Err(error) => {
                debug!(%error, "echoed ballot undecodable; keeping submitted ballot");
                submitted
            }
        }
    }

    /// Save League role preferences.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotReady`] before the profile has loaded;
    /// [`SessionError::Api`] when the server rejects the request.
    pub async fn update_preferred_roles_league(
        &self,
        roles: PreferredRoles<LeagueRole>,
    ) -> Result<(), SessionError> {
        self.save_preferred_roles(GameOption::League, Self::roles_body(&roles))
            .await?;
        self.dispatch(SessionAction::SetPreferredRolesLeague(roles));
        self.notify_roles_saved(GameOption::League);
        Ok(())
    }

    /// Save Valorant role preferences.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotReady`] before the profile has loaded;
    /// [`SessionError::Api`] when the server rejects the request.
    pub async fn update_preferred_roles_valorant(
        &self,
        roles: PreferredRoles<ValorantRole>,
    ) -> Result<(), SessionError> {
        self.save_preferred_roles(GameOption::Valorant, Self::roles_body(&roles))
            .await?;
        self.dispatch(SessionAction::SetPreferredRolesValorant(roles));
        self.notify_roles_saved(GameOption::Valorant);
        Ok(())
    }

    fn roles_body<R: serde::Serialize>(roles: &PreferredRoles<R>) -> Value {
        json!({
            "primary_role": roles.primary_role,
            "secondary_role": roles.secondary_role,
            "off_role": roles.off_role,
        })
    }

    async fn save_preferred_roles(&self, game: GameOption, body: Value) -> Result<(), SessionError> {
        self.ensure_ready()?;
        self.send(
            Method::Put,
            ResourcePath::new(["preferred-roles", game.path_segment()]),
            Some(body),
            format!("Failed to update {game} role preferences."),
        )
        .await?;
        Ok(())
    }

    fn notify_roles_saved(&self, game: GameOption) {
        self.notifier.notify(
            &format!("Updated {game} role preferences."),
            Severity::Success,
        );
    }

    /// Fetch every registered user.
    pub async fn list_users(&self) -> Either<Vec<User>, ApiError> {
        let response = self
            .api
            .request(Method::Get, &ResourcePath::new(["users"]), None)
            .await;
        match response.into_outcome() {
            Outcome::Success(body) => serde_json::from_value::<Vec<User>>(body)
                .map_err(|error| ApiError::decode(format!("user list: {error}")))
                .into(),
            Outcome::Failure(error) => Either::failure(error),
        }
    }

    async fn send(
        &self,
        method: Method,
        path: ResourcePath,
        body: Option<Value>,
        failure_message: String,
    ) -> Result<Value, SessionError> {
        match self.api.request(method, &path, body).await.into_outcome() {
            Outcome::Success(value) => {
                debug!(%method, %path, "session mutation confirmed");
                Ok(value)
            }
            Outcome::Failure(error) => {
                warn!(%method, %path, kind = error.kind(), %error, "session mutation failed");
                self.notifier.notify(&failure_message, Severity::Error);
                Err(SessionError::Api(error))
            }
        }
    }
}

fn split_account(account: &str) -> Option<(&str, &str)> {
    let mut parts = account.split('#');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(name), Some(tag), None) if !name.is_empty() && !tag.is_empty() => Some((name, tag)),
        _ => None,
    }
}

#[cfg(test)]
#[path = "session_store_tests.rs"]
mod tests;
