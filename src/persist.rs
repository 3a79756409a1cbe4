use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::Session;
use crate::models::{Mission, Player, Prize};
use crate::state::AppState;

const CACHE_DIR: &str = "gamelayer_terminal";
const CACHE_FILE: &str = "cache.json";
const CACHE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct CacheFile {
    version: u32,
    #[serde(default)]
    missions: Option<Cached<Vec<Mission>>>,
    #[serde(default)]
    prizes: Option<Cached<Vec<Prize>>>,
    #[serde(default)]
    active_player: Option<Cached<Player>>,
    #[serde(default)]
    session: Option<Session>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Cached<T> {
    /// Player the entry was loaded for.
    owner: String,
    fetched_at: u64,
    value: T,
}

impl<T: Clone> Cached<T> {
    fn fresh_for(&self, owner: &str, ttl: Duration, now: SystemTime) -> Option<T> {
        if self.owner != owner {
            return None;
        }
        let now = system_time_to_secs(now)?;
        if now.saturating_sub(self.fetched_at) > ttl.as_secs() {
            return None;
        }
        Some(self.value.clone())
    }
}

/// Client-side copy of the last loaded dashboard plus the local session.
///
/// Entries carry the player they belong to and a fetch timestamp; anything older than the
/// configured TTL is ignored on load. There is no other invalidation, so a cached view can
/// lag behind the remote service for up to one TTL.
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: Option<PathBuf>,
}

impl CacheStore {
    pub fn default_location() -> Self {
        Self { path: cache_path() }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn load_into_state(&self, state: &mut AppState, ttl: Duration, now: SystemTime) {
        let Some(cache) = self.read() else {
            return;
        };
        let Some(owner) = state.player_id.clone() else {
            return;
        };

        if let Some(player) = cache
            .active_player
            .as_ref()
            .and_then(|c| c.fresh_for(&owner, ttl, now))
        {
            state.active_player = Some(player);
        }
        if let Some(missions) = cache
            .missions
            .as_ref()
            .and_then(|c| c.fresh_for(&owner, ttl, now))
        {
            state.missions = missions;
        }
        if let Some(prizes) = cache
            .prizes
            .as_ref()
            .and_then(|c| c.fresh_for(&owner, ttl, now))
        {
            state.prizes = prizes;
        }
        debug!(player = %owner, "restored cached dashboard");
    }

    pub fn save_from_state(&self, state: &AppState, now: SystemTime) -> Result<()> {
        let Some(owner) = state.player_id.clone() else {
            return Ok(());
        };
        let fetched_at = system_time_to_secs(now).unwrap_or_default();
        let mut cache = self.read().unwrap_or_default();
        cache.version = CACHE_VERSION;
        cache.missions = Some(Cached {
            owner: owner.clone(),
            fetched_at,
            value: state.missions.clone(),
        });
        cache.prizes = Some(Cached {
            owner: owner.clone(),
            fetched_at,
            value: state.prizes.clone(),
        });
        cache.active_player = state.active_player.clone().map(|player| Cached {
            owner,
            fetched_at,
            value: player,
        });
        if let Some(session) = &state.session {
            cache.session = Some(session.clone());
        }
        self.write(&cache)
    }

    pub fn load_session(&self) -> Option<Session> {
        self.read()?.session
    }

    pub fn save_session(&self, session: &Session) -> Result<()> {
        let mut cache = self.read().unwrap_or_default();
        cache.version = CACHE_VERSION;
        cache.session = Some(session.clone());
        self.write(&cache)
    }

    pub fn clear_session(&self) -> Result<()> {
        let Some(mut cache) = self.read() else {
            return Ok(());
        };
        cache.session = None;
        self.write(&cache)
    }

    fn read(&self) -> Option<CacheFile> {
        let raw = fs::read_to_string(self.path.as_ref()?).ok()?;
        let cache = serde_json::from_str::<CacheFile>(&raw).ok()?;
        if cache.version != CACHE_VERSION {
            return None;
        }
        Some(cache)
    }

    fn write(&self, cache: &CacheFile) -> Result<()> {
        let Some(path) = self.path.as_ref() else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("create cache dir")?;
        }
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string(cache).context("serialize cache")?;
        fs::write(&tmp, json).context("write cache")?;
        fs::rename(&tmp, path).context("swap cache")?;
        Ok(())
    }
}

fn cache_path() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(CACHE_DIR).join(CACHE_FILE));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".cache")
            .join(CACHE_DIR)
            .join(CACHE_FILE),
    )
}

fn system_time_to_secs(time: SystemTime) -> Option<u64> {
    time.duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs())
}
