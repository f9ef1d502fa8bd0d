//! Restore the stored session against the configured API and report on it.
//!
//! Reads `INHOUSE_*` settings, bootstraps a session from the token store
//! (a directory when `INHOUSE_TOKEN_DIR` is set, otherwise memory) and logs
//! the resulting lifecycle. A ready session also lists the users the signed
//! in user may rank in each game.

use std::sync::Arc;

use color_eyre::eyre::{Context, Result};
use inhouse_client::config::ClientSettings;
use inhouse_client::domain::ports::{MemoryTokenStore, TokenStore};
use inhouse_client::domain::{GameOption, Lifecycle, Outcome, SessionStore, UserId};
use inhouse_client::outbound::http::ApiClient;
use inhouse_client::outbound::notify::TracingNotifier;
use inhouse_client::outbound::tokens::DirTokenStore;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(%error, "tracing init failed");
    }

    let settings = ClientSettings::load_from_iter(std::env::args_os())
        .wrap_err("failed to load client settings")?;
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build probe runtime")?;
    runtime.block_on(probe(&settings))
}

fn token_store(settings: &ClientSettings) -> Result<Arc<dyn TokenStore>> {
    match &settings.token_dir {
        Some(path) => {
            let store = DirTokenStore::open(path)
                .wrap_err_with(|| format!("failed to open token directory {}", path.display()))?;
            Ok(Arc::new(store))
        }
        None => Ok(Arc::new(MemoryTokenStore::default())),
    }
}

async fn probe(settings: &ClientSettings) -> Result<()> {
    let tokens = token_store(settings)?;
    let api = ApiClient::from_settings(settings, Arc::clone(&tokens))
        .wrap_err("failed to build api client")?;
    info!(base_url = %api.base_url(), "probing session");
    let store = SessionStore::new(Arc::new(api), tokens, Arc::new(TracingNotifier));

    let lifecycle = store.bootstrap().await;
    if lifecycle != Lifecycle::Ready {
        let reason = store.error().map(|error| error.to_string());
        warn!(?lifecycle, reason = reason.as_deref(), "session could not be restored");
        return Ok(());
    }

    let user = store.user();
    info!(
        user_id = user.id.map(UserId::get),
        username = user.username.as_deref(),
        summoners = user.summoners.len(),
        valorant_accounts = user.valorant_accounts.len(),
        ballots = user.ranking_ballots.len(),
        "session ready"
    );

    match store.list_users().await.into_outcome() {
        Outcome::Success(users) => {
            for game in [GameOption::League, GameOption::Valorant] {
                let rankable = store.rankable_users(users.clone(), game);
                let accounts: Vec<&str> = rankable
                    .iter()
                    .filter_map(|candidate| candidate.primary_account(game))
                    .collect();
                info!(%game, rankable = rankable.len(), ?accounts, "rankable users");
            }
        }
        Outcome::Failure(error) => warn!(%error, "user list unavailable"),
    }
    Ok(())
}
