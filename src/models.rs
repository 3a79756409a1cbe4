use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Keys under which a collection response may be wrapped.
pub const LIST_WRAPPER_KEYS: &[&str] = &["players", "data"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Level {
    pub current: i64,
    pub experience: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub points: i64,
    pub credits: i64,
    pub level: Level,
    pub team: Option<String>,
    /// Team name when the record embedded the team object rather than a bare id.
    #[serde(default)]
    pub team_name: Option<String>,
}

impl Player {
    pub fn embedded_team(&self) -> Option<Team> {
        Some(Team {
            id: self.team.clone()?,
            name: self.team_name.clone()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Reward {
    pub points: i64,
    pub credits: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionStep {
    pub name: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub reward: Reward,
    pub active_from: Option<DateTime<Utc>>,
    pub active_to: Option<DateTime<Utc>>,
    #[serde(default)]
    pub steps: Vec<MissionStep>,
    /// Event ids whose completion advances this mission.
    #[serde(default)]
    pub objectives: Vec<String>,
}

impl Mission {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        within_window(self.active_from, self.active_to, now)
    }

    /// Completed steps over total steps.
    pub fn progress(&self) -> (usize, usize) {
        let done = self.steps.iter().filter(|s| s.completed).count();
        (done, self.steps.len())
    }

    pub fn is_completed(&self) -> bool {
        !self.steps.is_empty() && self.steps.iter().all(|s| s.completed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stock {
    Limited(i64),
    Unlimited,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prize {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub cost: i64,
    pub stock: Stock,
    pub active_from: Option<DateTime<Utc>>,
    pub active_to: Option<DateTime<Utc>>,
}

impl Prize {
    pub fn in_stock(&self) -> bool {
        match self.stock {
            Stock::Limited(n) => n > 0,
            Stock::Unlimited => true,
        }
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        within_window(self.active_from, self.active_to, now)
    }
}

/// Payload for creating a player record remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPlayer {
    pub player: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Coerces a collection response into a list: a bare array is returned as-is, an object
/// wrapping an array under one of `keys` yields that array, anything else is empty.
pub fn normalize_list(value: Value, keys: &[&str]) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            for key in keys {
                if let Some(Value::Array(items)) = map.remove(*key) {
                    return items;
                }
            }
            warn!(keys = ?map.keys().collect::<Vec<_>>(), "unexpected list response shape");
            Vec::new()
        }
        Value::Null => Vec::new(),
        other => {
            warn!(kind = value_kind(&other), "unexpected list response shape");
            Vec::new()
        }
    }
}

pub fn parse_players_json(raw: &str) -> Result<Vec<Player>> {
    parse_list(raw, "players", parse_player_value)
}

pub fn parse_player_json(raw: &str) -> Result<Player> {
    let root = parse_root(raw)?;
    let inner = unwrap_single(root, &["player", "data"]);
    parse_player_value(&inner).context("player record missing id")
}

pub fn parse_missions_json(raw: &str) -> Result<Vec<Mission>> {
    parse_list(raw, "missions", parse_mission_value)
}

pub fn parse_prizes_json(raw: &str) -> Result<Vec<Prize>> {
    parse_list(raw, "prizes", parse_prize_value)
}

pub fn parse_teams_json(raw: &str) -> Result<Vec<Team>> {
    parse_list(raw, "teams", parse_team_value)
}

pub fn parse_team_json(raw: &str) -> Result<Team> {
    let root = parse_root(raw)?;
    let inner = unwrap_single(root, &["team", "data"]);
    parse_team_value(&inner).context("team record missing id")
}

fn parse_list<T>(raw: &str, resource: &str, parse: fn(&Value) -> Option<T>) -> Result<Vec<T>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let root: Value =
        serde_json::from_str(trimmed).with_context(|| format!("invalid {resource} json"))?;
    let mut keys = LIST_WRAPPER_KEYS.to_vec();
    keys.push(resource);
    let items = normalize_list(root, &keys);
    let total = items.len();
    let parsed: Vec<T> = items.iter().filter_map(parse).collect();
    if parsed.len() < total {
        warn!(
            resource,
            skipped = total - parsed.len(),
            "skipped malformed list entries"
        );
    }
    Ok(parsed)
}

fn parse_root(raw: &str) -> Result<Value> {
    serde_json::from_str(raw.trim()).context("invalid json body")
}

fn unwrap_single(root: Value, keys: &[&str]) -> Value {
    if let Value::Object(map) = &root
        && map.get("id").is_none()
    {
        for key in keys {
            if let Some(inner) = map.get(*key)
                && inner.is_object()
            {
                return inner.clone();
            }
        }
    }
    root
}

pub(crate) fn parse_player_value(value: &Value) -> Option<Player> {
    let id = pick_string(value, &["id", "player"])?;
    let name = pick_string(value, &["name", "username"]).unwrap_or_else(|| id.clone());
    let (team, team_name) = parse_team_ref(value.get("team"));
    Some(Player {
        image: pick_string(value, &["imgUrl", "image", "avatar"]),
        points: pick_i64(value, &["points"]).unwrap_or(0),
        credits: pick_i64(value, &["credits"]).unwrap_or(0),
        level: parse_level(value.get("level")),
        team,
        team_name,
        id,
        name,
    })
}

fn parse_level(value: Option<&Value>) -> Level {
    match value {
        Some(Value::Number(n)) => Level {
            current: n.as_i64().unwrap_or(0),
            experience: 0,
        },
        Some(Value::String(s)) => Level {
            current: s.trim().parse().unwrap_or(0),
            experience: 0,
        },
        Some(obj @ Value::Object(_)) => Level {
            current: pick_i64(obj, &["current", "level", "number"]).unwrap_or(0),
            experience: pick_i64(obj, &["experience", "points", "xp"]).unwrap_or(0),
        },
        _ => Level::default(),
    }
}

/// Team id plus, for an embedded `{id, name}` object, the team's name.
fn parse_team_ref(value: Option<&Value>) -> (Option<String>, Option<String>) {
    match value {
        Some(Value::String(s)) => (non_empty(s).map(str::to_string), None),
        Some(Value::Number(n)) => (Some(n.to_string()), None),
        Some(obj @ Value::Object(_)) => match pick_string(obj, &["id", "team"]) {
            Some(id) => (Some(id), pick_string(obj, &["name"])),
            None => (None, None),
        },
        _ => (None, None),
    }
}

fn parse_team_value(value: &Value) -> Option<Team> {
    let id = pick_string(value, &["id", "team"])?;
    let name = pick_string(value, &["name"]).unwrap_or_else(|| id.clone());
    Some(Team { id, name })
}

pub(crate) fn parse_mission_value(value: &Value) -> Option<Mission> {
    let id = pick_string(value, &["id", "mission"])?;
    let name = pick_string(value, &["name", "title"]).unwrap_or_else(|| id.clone());
    let reward_src = value.get("reward").unwrap_or(value);
    let window = value.get("active").unwrap_or(value);
    Some(Mission {
        description: pick_string(value, &["description"]).unwrap_or_default(),
        image: pick_string(value, &["imgUrl", "image"]),
        reward: Reward {
            points: pick_i64(reward_src, &["points"]).unwrap_or(0),
            credits: pick_i64(reward_src, &["credits"]).unwrap_or(0),
        },
        active_from: pick_time(window, &["from", "start"]),
        active_to: pick_time(window, &["to", "end"]),
        steps: parse_steps(value),
        objectives: parse_objectives(value.get("objectives")),
        id,
        name,
    })
}

fn parse_steps(value: &Value) -> Vec<MissionStep> {
    let steps = value
        .get("steps")
        .or_else(|| value.get("progress").and_then(|p| p.get("steps")));
    let Some(Value::Array(items)) = steps else {
        return Vec::new();
    };
    items
        .iter()
        .enumerate()
        .map(|(idx, step)| MissionStep {
            name: pick_string(step, &["name", "title", "description"])
                .unwrap_or_else(|| format!("Step {}", idx + 1)),
            completed: step
                .get("completed")
                .or_else(|| step.get("done"))
                .and_then(Value::as_bool)
                .unwrap_or(false),
        })
        .collect()
}

fn parse_objectives(value: Option<&Value>) -> Vec<String> {
    let items = match value {
        Some(Value::Array(items)) => items.as_slice(),
        Some(obj @ Value::Object(_)) => match obj.get("events") {
            Some(Value::Array(items)) => items.as_slice(),
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => non_empty(s).map(str::to_string),
            obj @ Value::Object(_) => match obj.get("event") {
                Some(Value::String(s)) => non_empty(s).map(str::to_string),
                Some(inner @ Value::Object(_)) => pick_string(inner, &["id"]),
                _ => pick_string(obj, &["id"]),
            },
            _ => None,
        })
        .collect()
}

pub(crate) fn parse_prize_value(value: &Value) -> Option<Prize> {
    let id = pick_string(value, &["id", "prize"])?;
    let name = pick_string(value, &["name", "title"]).unwrap_or_else(|| id.clone());
    let window = value.get("active").unwrap_or(value);
    Some(Prize {
        description: pick_string(value, &["description"]).unwrap_or_default(),
        image: pick_string(value, &["imgUrl", "image"]),
        cost: pick_i64(value, &["credits", "points_required", "cost"]).unwrap_or(0),
        stock: parse_stock(value),
        active_from: pick_time(window, &["from", "start"]),
        active_to: pick_time(window, &["to", "end"]),
        id,
        name,
    })
}

fn parse_stock(value: &Value) -> Stock {
    let stock = value.get("stock").unwrap_or(value);
    if stock.get("unlimited").and_then(Value::as_bool) == Some(true) {
        return Stock::Unlimited;
    }
    match pick_i64(stock, &["available", "count"]) {
        Some(n) => Stock::Limited(n.max(0)),
        None => Stock::Unlimited,
    }
}

fn within_window(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    if let Some(from) = from
        && now < from
    {
        return false;
    }
    if let Some(to) = to
        && now > to
    {
        return false;
    }
    true
}

fn pick_string(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        match value.get(*key) {
            Some(Value::String(s)) => {
                if let Some(s) = non_empty(s) {
                    return Some(s.to_string());
                }
            }
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    None
}

fn pick_i64(value: &Value, keys: &[&str]) -> Option<i64> {
    for key in keys {
        if let Some(v) = value.get(*key) {
            if let Some(num) = v.as_i64() {
                return Some(num);
            }
            if let Some(num) = v.as_f64() {
                return Some(num.round() as i64);
            }
            if let Some(s) = v.as_str()
                && let Ok(num) = s.trim().parse::<i64>()
            {
                return Some(num);
            }
        }
    }
    None
}

fn pick_time(value: &Value, keys: &[&str]) -> Option<DateTime<Utc>> {
    let raw = pick_string(value, keys)?;
    DateTime::parse_from_rfc3339(&raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
