use std::collections::HashSet;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use tracing::{info, warn};

use crate::api::GameApi;
use crate::auth::{self, IdentityProvider, RateLimiter};
use crate::loader;
use crate::persist::CacheStore;
use crate::state::{Delta, ProviderCommand};

pub struct Provider {
    pub api: Arc<dyn GameApi>,
    pub identity: Box<dyn IdentityProvider>,
    pub store: CacheStore,
    pub default_event: String,
}

/// Runs remote work off the UI thread until the command channel closes. Commands are
/// handled in arrival order and never cancelled.
pub fn spawn_provider(
    provider: Provider,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut worker = Worker {
            provider,
            known_teams: HashSet::new(),
            limiter: RateLimiter::default(),
        };
        for cmd in cmd_rx {
            worker.handle(cmd, &tx);
        }
        info!("provider stopped");
    })
}

struct Worker {
    provider: Provider,
    known_teams: HashSet<String>,
    limiter: RateLimiter,
}

impl Worker {
    fn handle(&mut self, cmd: ProviderCommand, tx: &Sender<Delta>) {
        let api = self.provider.api.as_ref();
        match cmd {
            ProviderCommand::LoadDashboard { player_id } => {
                loader::load_dashboard(api, player_id.as_deref(), &mut self.known_teams, tx);
            }
            ProviderCommand::SwitchPlayer { player_id } => {
                loader::switch_player(api, &player_id, &mut self.known_teams, tx);
            }
            ProviderCommand::CompleteMission { mission, player_id } => {
                loader::complete_mission(
                    api,
                    &mission,
                    &player_id,
                    &self.provider.default_event,
                    tx,
                );
            }
            ProviderCommand::SignUp { email, username } => {
                let result = self
                    .limiter
                    .check(Instant::now())
                    .and_then(|_| auth::signup(api, &self.provider.store, &email, &username));
                self.finish_sign_in(result, tx);
            }
            ProviderCommand::LogIn { email } => {
                let result = self
                    .limiter
                    .check(Instant::now())
                    .and_then(|_| auth::login(&self.provider.store, &email));
                self.finish_sign_in(result, tx);
            }
            ProviderCommand::SendSignInLink { email } => {
                let result = self
                    .limiter
                    .check(Instant::now())
                    .and_then(|_| self.provider.identity.send_sign_in_link(&email));
                match result {
                    Ok(link) => {
                        let _ = tx.send(Delta::SignInLinkSent { email, link });
                    }
                    Err(err) => {
                        let _ = tx.send(Delta::AuthError(err.to_string()));
                    }
                }
            }
            ProviderCommand::CompleteSignIn { link, username } => {
                let result = auth::complete_link_sign_in(
                    api,
                    self.provider.identity.as_mut(),
                    &self.provider.store,
                    &link,
                    &username,
                );
                self.finish_sign_in(result, tx);
            }
            ProviderCommand::SignOut => {
                self.provider.identity.sign_out();
                if let Err(err) = self.provider.store.clear_session() {
                    warn!(%err, "failed to clear stored session");
                }
                info!("signed out");
                let _ = tx.send(Delta::SessionChanged(None));
            }
            ProviderCommand::Authenticate => match api.authenticate() {
                Ok(_) => {
                    let _ = tx.send(Delta::Log("[INFO] API credentials accepted".to_string()));
                }
                Err(err) => {
                    warn!(%err, "authentication failed");
                    let _ = tx.send(Delta::Log(format!("[WARN] Authentication failed: {err}")));
                }
            },
        }
    }

    fn finish_sign_in(
        &mut self,
        result: Result<auth::Session, auth::AuthError>,
        tx: &Sender<Delta>,
    ) {
        match result {
            Ok(session) => {
                let player_id = session.player_id.clone();
                let _ = tx.send(Delta::SessionChanged(Some(session)));
                loader::load_dashboard(
                    self.provider.api.as_ref(),
                    Some(&player_id),
                    &mut self.known_teams,
                    tx,
                );
            }
            Err(err) => {
                warn!(%err, "sign-in failed");
                let _ = tx.send(Delta::AuthError(err.to_string()));
            }
        }
    }
}
