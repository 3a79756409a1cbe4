use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::api::GameApi;
use crate::error::ApiError;
use crate::models::{Level, NewPlayer, Player};
use crate::persist::CacheStore;

pub const MAX_SIGN_IN_ATTEMPTS: usize = 5;
pub const SIGN_IN_WINDOW: Duration = Duration::from_secs(5 * 60);

const LINK_SCHEME: &str = "gamelayer://sign-in";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Too many sign-in attempts. Please try again later.")]
    RateLimited,
    #[error("Enter a valid email address")]
    InvalidEmail,
    #[error("No account found for {0}")]
    UnknownEmail(String),
    #[error("Invalid or expired sign-in link")]
    InvalidLink,
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Signed-in user, with the player stats mirrored at sign-in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub email: String,
    pub username: String,
    pub player_id: String,
    pub points: i64,
    pub credits: i64,
    pub level: Level,
}

impl Session {
    pub fn for_player(email: &str, player: &Player) -> Self {
        Self {
            email: email.trim().to_string(),
            username: player.name.clone(),
            player_id: player.id.clone(),
            points: player.points,
            credits: player.credits,
            level: player.level,
        }
    }

    pub fn mirror(&mut self, player: &Player) {
        if player.id != self.player_id {
            return;
        }
        self.points = player.points;
        self.credits = player.credits;
        self.level = player.level;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityUser {
    pub uid: String,
    pub email: String,
}

/// Sliding-window limit on sign-in attempts.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    attempts: VecDeque<Instant>,
    max_attempts: usize,
    window: Duration,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(MAX_SIGN_IN_ATTEMPTS, SIGN_IN_WINDOW)
    }
}

impl RateLimiter {
    pub fn new(max_attempts: usize, window: Duration) -> Self {
        Self {
            attempts: VecDeque::with_capacity(max_attempts),
            max_attempts,
            window,
        }
    }

    /// Records an attempt at `now`, or refuses it when the window is full.
    pub fn check(&mut self, now: Instant) -> Result<(), AuthError> {
        self.prune(now);
        if self.attempts.len() >= self.max_attempts {
            return Err(AuthError::RateLimited);
        }
        self.attempts.push_back(now);
        Ok(())
    }

    pub fn prune(&mut self, now: Instant) {
        while let Some(first) = self.attempts.front() {
            if now.duration_since(*first) >= self.window {
                self.attempts.pop_front();
            } else {
                break;
            }
        }
    }

    pub fn recent(&self) -> usize {
        self.attempts.len()
    }
}

/// Passwordless sign-in contract of an external identity provider.
pub trait IdentityProvider: Send {
    /// Emails a sign-in link. Development providers may return the link itself.
    fn send_sign_in_link(&mut self, email: &str) -> Result<Option<String>, AuthError>;
    fn complete_sign_in(&mut self, link: &str) -> Result<IdentityUser, AuthError>;
    fn current_user(&self) -> Option<IdentityUser>;
    fn sign_out(&mut self);
}

/// Stand-in provider for local development: links are minted in-process and logged
/// instead of emailed.
#[derive(Debug, Default)]
pub struct LocalLinkProvider {
    pending: HashMap<String, String>,
    user: Option<IdentityUser>,
}

impl LocalLinkProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdentityProvider for LocalLinkProvider {
    fn send_sign_in_link(&mut self, email: &str) -> Result<Option<String>, AuthError> {
        let email = validate_email(email)?;
        let mut bytes = [0u8; 24];
        rand::thread_rng().fill_bytes(&mut bytes);
        let token = URL_SAFE_NO_PAD.encode(bytes);
        let link = format!("{LINK_SCHEME}?token={token}");
        self.pending.insert(token, email.to_string());
        info!(%email, %link, "sign-in link issued");
        Ok(Some(link))
    }

    fn complete_sign_in(&mut self, link: &str) -> Result<IdentityUser, AuthError> {
        let token = link_token(link).ok_or(AuthError::InvalidLink)?;
        let email = self.pending.remove(token).ok_or(AuthError::InvalidLink)?;
        let user = IdentityUser {
            uid: player_id_for_email(&email),
            email,
        };
        self.user = Some(user.clone());
        Ok(user)
    }

    fn current_user(&self) -> Option<IdentityUser> {
        self.user.clone()
    }

    fn sign_out(&mut self) {
        self.user = None;
    }
}

/// Extracts the one-time token from a sign-in link, or accepts a bare token.
pub fn link_token(link: &str) -> Option<&str> {
    let trimmed = link.trim();
    let token = match trimmed.split_once("token=") {
        Some((_, rest)) => rest.split('&').next().unwrap_or(""),
        None if !trimmed.contains(['?', '/', ' ']) => trimmed,
        None => "",
    };
    if token.is_empty() { None } else { Some(token) }
}

/// Stable remote player id for an email address.
pub fn player_id_for_email(email: &str) -> String {
    let mut id = String::with_capacity(email.len());
    let mut last_dash = false;
    for ch in email.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            id.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash && !id.is_empty() {
            id.push('-');
            last_dash = true;
        }
    }
    while id.ends_with('-') {
        id.pop();
    }
    id
}

/// Local simulated sign-up: creates the remote player and stores the session on disk.
pub fn signup(
    api: &dyn GameApi,
    store: &CacheStore,
    email: &str,
    username: &str,
) -> Result<Session, AuthError> {
    let email = validate_email(email)?;
    let user = IdentityUser {
        uid: player_id_for_email(email),
        email: email.to_string(),
    };
    let player = ensure_player(api, &user, username)?;
    let session = Session::for_player(email, &player);
    store.save_session(&session)?;
    info!(player = %player.id, "signed up");
    Ok(session)
}

/// Local simulated login. Only compares the email against the stored session; there is
/// no credential check.
pub fn login(store: &CacheStore, email: &str) -> Result<Session, AuthError> {
    let email = validate_email(email)?;
    match store.load_session() {
        Some(session) if session.email.eq_ignore_ascii_case(email) => Ok(session),
        _ => {
            warn!(%email, "login with unknown email");
            Err(AuthError::UnknownEmail(email.to_string()))
        }
    }
}

/// Finishes a link sign-in and makes sure a matching remote player exists.
pub fn complete_link_sign_in(
    api: &dyn GameApi,
    provider: &mut dyn IdentityProvider,
    store: &CacheStore,
    link: &str,
    username: &str,
) -> Result<Session, AuthError> {
    let user = provider.complete_sign_in(link)?;
    let player = ensure_player(api, &user, username)?;
    let session = Session::for_player(&user.email, &player);
    store.save_session(&session)?;
    info!(player = %player.id, "signed in via link");
    Ok(session)
}

/// Looks the player up first and only creates it when missing. A conflict on create
/// means another client won the race, so the record is fetched again.
pub fn ensure_player(
    api: &dyn GameApi,
    user: &IdentityUser,
    username: &str,
) -> Result<Player, ApiError> {
    match api.get_player(&user.uid) {
        Ok(player) => return Ok(player),
        Err(err) if err.is_not_found() => {}
        Err(err) => return Err(err),
    }

    let name = match username.trim() {
        "" => user
            .email
            .split('@')
            .next()
            .unwrap_or(&user.email)
            .to_string(),
        name => name.to_string(),
    };
    let new_player = NewPlayer {
        player: user.uid.clone(),
        name,
        email: Some(user.email.clone()),
    };
    match api.create_player(&new_player) {
        Ok(player) => Ok(player),
        Err(err) if err.is_conflict() => {
            info!(player = %user.uid, "player already exists, refetching");
            api.get_player(&user.uid)
        }
        Err(err) => Err(err),
    }
}

fn validate_email(email: &str) -> Result<&str, AuthError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(AuthError::InvalidEmail),
    }
}
