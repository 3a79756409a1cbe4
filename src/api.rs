use anyhow::Result;
use reqwest::Url;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::http_client::http_client;
use crate::models::{
    Mission, NewPlayer, Player, Prize, Team, parse_missions_json, parse_player_json,
    parse_players_json, parse_prizes_json, parse_team_json, parse_teams_json,
};

/// One operation per remote resource. Each call is a single attempt.
pub trait GameApi: Send + Sync {
    fn list_missions(&self, player_id: Option<&str>) -> ApiResult<Vec<Mission>>;
    fn list_prizes(&self, player_id: Option<&str>) -> ApiResult<Vec<Prize>>;
    fn list_players(&self) -> ApiResult<Vec<Player>>;
    fn get_player(&self, player_id: &str) -> ApiResult<Player>;
    fn list_teams(&self) -> ApiResult<Vec<Team>>;
    fn get_team(&self, team_id: &str) -> ApiResult<Team>;
    fn create_player(&self, player: &NewPlayer) -> ApiResult<Player>;
    fn complete_event(&self, event_id: &str, player_id: &str) -> ApiResult<()>;
    fn authenticate(&self) -> ApiResult<Value>;
}

pub struct HttpApi {
    client: &'static Client,
    base: String,
    account: String,
    api_key: String,
}

impl HttpApi {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: http_client(config.request_timeout)?,
            base: config.api_base.clone(),
            account: config.account.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn url(&self, segments: &[&str]) -> ApiResult<Url> {
        endpoint_url(&self.base, segments)
    }

    fn with_credentials(&self, req: RequestBuilder) -> RequestBuilder {
        req.query(&[("account", self.account.as_str())])
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .header("api-key", self.api_key.as_str())
            .header("account", self.account.as_str())
    }

    fn get_text(&self, segments: &[&str], query: &[(&str, &str)]) -> ApiResult<String> {
        let url = self.url(segments)?;
        debug!(%url, "GET");
        let req = self.with_credentials(self.client.get(url.clone())).query(query);
        read_body(url.as_str(), req)
    }

    fn post_text(&self, segments: &[&str], body: &Value) -> ApiResult<String> {
        let url = self.url(segments)?;
        debug!(%url, "POST");
        let req = self.with_credentials(self.client.post(url.clone())).json(body);
        read_body(url.as_str(), req)
    }
}

/// Appends `segments` to the base URL's path, percent-encoding each one so ids cannot
/// escape into the query or fragment.
pub fn endpoint_url(base: &str, segments: &[&str]) -> ApiResult<Url> {
    let mut url =
        Url::parse(base).map_err(|err| ApiError::Malformed(format!("api base {base}: {err}")))?;
    url.path_segments_mut()
        .map_err(|()| ApiError::Malformed(format!("api base {base} cannot take a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn read_body(url: &str, req: RequestBuilder) -> ApiResult<String> {
    let resp = req.send()?;
    let status = resp.status();
    if !status.is_success() {
        let status_text = status.canonical_reason().unwrap_or("").to_string();
        let body = resp.text().unwrap_or_default();
        warn!(%url, status = status.as_u16(), body = %truncate(&body, 200), "request rejected");
        return Err(ApiError::from_status(status.as_u16(), status_text));
    }
    Ok(resp.text()?)
}

fn decode<T>(parsed: Result<T>) -> ApiResult<T> {
    parsed.map_err(|err| ApiError::Malformed(format!("{err:#}")))
}

fn player_query(player_id: Option<&str>) -> Vec<(&str, &str)> {
    match player_id {
        Some(id) => vec![("player", id)],
        None => Vec::new(),
    }
}

fn truncate(raw: &str, max: usize) -> &str {
    match raw.char_indices().nth(max) {
        Some((idx, _)) => &raw[..idx],
        None => raw,
    }
}

impl GameApi for HttpApi {
    fn list_missions(&self, player_id: Option<&str>) -> ApiResult<Vec<Mission>> {
        let body = self.get_text(&["missions"], &player_query(player_id))?;
        decode(parse_missions_json(&body))
    }

    fn list_prizes(&self, player_id: Option<&str>) -> ApiResult<Vec<Prize>> {
        let body = self.get_text(&["prizes"], &player_query(player_id))?;
        decode(parse_prizes_json(&body))
    }

    fn list_players(&self) -> ApiResult<Vec<Player>> {
        let body = self.get_text(&["players"], &[])?;
        decode(parse_players_json(&body))
    }

    fn get_player(&self, player_id: &str) -> ApiResult<Player> {
        let body = self.get_text(&["players", player_id], &[])?;
        decode(parse_player_json(&body))
    }

    fn list_teams(&self) -> ApiResult<Vec<Team>> {
        let body = self.get_text(&["teams"], &[])?;
        decode(parse_teams_json(&body))
    }

    fn get_team(&self, team_id: &str) -> ApiResult<Team> {
        let body = self.get_text(&["teams", team_id], &[])?;
        decode(parse_team_json(&body))
    }

    fn create_player(&self, player: &NewPlayer) -> ApiResult<Player> {
        let mut payload = serde_json::to_value(player)
            .map_err(|err| ApiError::Malformed(err.to_string()))?;
        if let Value::Object(map) = &mut payload {
            map.insert("account".to_string(), Value::String(self.account.clone()));
        }
        let body = self.post_text(&["players"], &payload)?;
        decode(parse_player_json(&body))
    }

    fn complete_event(&self, event_id: &str, player_id: &str) -> ApiResult<()> {
        let payload = json!({ "player": player_id, "account": self.account });
        self.post_text(&["events", event_id, "complete"], &payload)?;
        Ok(())
    }

    fn authenticate(&self) -> ApiResult<Value> {
        let payload = json!({ "account": self.account, "api_key": self.api_key });
        let body = self.post_text(&["auth"], &payload)?;
        serde_json::from_str(&body).map_err(|err| ApiError::Malformed(err.to_string()))
    }
}
