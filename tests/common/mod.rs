#![allow(dead_code)]

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{SystemTime, UNIX_EPOCH};

use gamelayer_terminal::api::GameApi;
use gamelayer_terminal::error::{ApiError, ApiResult};
use gamelayer_terminal::models::{
    Level, Mission, NewPlayer, Player, Prize, Reward, Stock, Team,
};
use gamelayer_terminal::state::Delta;
use serde_json::{Value, json};

pub fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

/// Fresh directory under the system temp dir, unique per call.
pub fn scratch_dir(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock after epoch")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "gamelayer_terminal_{tag}_{}_{nanos}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).expect("scratch dir");
    dir
}

pub fn player(id: &str, points: i64, credits: i64) -> Player {
    Player {
        id: id.to_string(),
        name: format!("Player {id}"),
        image: None,
        points,
        credits,
        level: Level {
            current: 1,
            experience: 0,
        },
        team: None,
        team_name: None,
    }
}

pub fn mission(id: &str, objectives: &[&str]) -> Mission {
    Mission {
        id: id.to_string(),
        name: format!("Mission {id}"),
        description: String::new(),
        image: None,
        reward: Reward {
            points: 10,
            credits: 5,
        },
        active_from: None,
        active_to: None,
        steps: Vec::new(),
        objectives: objectives.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn prize(id: &str, cost: i64) -> Prize {
    Prize {
        id: id.to_string(),
        name: format!("Prize {id}"),
        description: String::new(),
        image: None,
        cost,
        stock: Stock::Unlimited,
        active_from: None,
        active_to: None,
    }
}

pub fn team(id: &str, name: &str) -> Team {
    Team {
        id: id.to_string(),
        name: name.to_string(),
    }
}

pub fn channel() -> (Sender<Delta>, Receiver<Delta>) {
    mpsc::channel()
}

pub fn drain(rx: &Receiver<Delta>) -> Vec<Delta> {
    rx.try_iter().collect()
}

fn server_error() -> ApiError {
    ApiError::Http {
        status: 500,
        status_text: "Internal Server Error".to_string(),
    }
}

/// In-memory service that records every call in order.
#[derive(Default)]
pub struct MockApi {
    pub players: Mutex<Vec<Player>>,
    pub teams: Vec<Team>,
    pub missions: Vec<Mission>,
    pub prizes: Vec<Prize>,
    pub failing: HashSet<String>,
    pub conflict_on_create: bool,
    pub calls: Mutex<Vec<String>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_players(self, players: Vec<Player>) -> Self {
        *self.players.lock().expect("players lock") = players;
        self
    }

    /// Makes the call with this label fail, e.g. `player:p1` or `players`.
    pub fn failing(mut self, call: &str) -> Self {
        self.failing.insert(call.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, call: String) -> ApiResult<()> {
        self.calls.lock().expect("calls lock").push(call.clone());
        if self.failing.contains(&call) {
            return Err(server_error());
        }
        Ok(())
    }
}

impl GameApi for MockApi {
    fn list_missions(&self, player_id: Option<&str>) -> ApiResult<Vec<Mission>> {
        self.record(format!("missions:{}", player_id.unwrap_or("*")))?;
        Ok(self.missions.clone())
    }

    fn list_prizes(&self, player_id: Option<&str>) -> ApiResult<Vec<Prize>> {
        self.record(format!("prizes:{}", player_id.unwrap_or("*")))?;
        Ok(self.prizes.clone())
    }

    fn list_players(&self) -> ApiResult<Vec<Player>> {
        self.record("players".to_string())?;
        Ok(self.players.lock().expect("players lock").clone())
    }

    fn get_player(&self, player_id: &str) -> ApiResult<Player> {
        self.record(format!("player:{player_id}"))?;
        self.players
            .lock()
            .expect("players lock")
            .iter()
            .find(|p| p.id == player_id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    fn list_teams(&self) -> ApiResult<Vec<Team>> {
        self.record("teams".to_string())?;
        Ok(self.teams.clone())
    }

    fn get_team(&self, team_id: &str) -> ApiResult<Team> {
        self.record(format!("team:{team_id}"))?;
        self.teams
            .iter()
            .find(|t| t.id == team_id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    fn create_player(&self, new_player: &NewPlayer) -> ApiResult<Player> {
        self.record(format!("create:{}", new_player.player))?;
        let mut created = player(&new_player.player, 0, 0);
        created.name = new_player.name.clone();
        if self.conflict_on_create {
            // Someone else created it between our lookup and the create call.
            self.players
                .lock()
                .expect("players lock")
                .push(created);
            return Err(ApiError::Conflict);
        }
        self.players
            .lock()
            .expect("players lock")
            .push(created.clone());
        Ok(created)
    }

    fn complete_event(&self, event_id: &str, player_id: &str) -> ApiResult<()> {
        self.record(format!("complete:{event_id}:{player_id}"))
    }

    fn authenticate(&self) -> ApiResult<Value> {
        self.record("auth".to_string())?;
        Ok(json!({ "ok": true }))
    }
}
