use std::collections::HashSet;
use std::panic;
use std::sync::mpsc::Sender;
use std::thread;

use tracing::{debug, info, warn};

use crate::api::GameApi;
use crate::error::ApiResult;
use crate::models::{Mission, Prize};
use crate::state::Delta;

/// Initial load: teams, then the active player, then that player's missions and prizes
/// (fetched together), then the full roster. A failed player fetch still lets the roster
/// load; every failure except the team list ends up as a page error.
pub fn load_dashboard(
    api: &dyn GameApi,
    player_id: Option<&str>,
    known_teams: &mut HashSet<String>,
    tx: &Sender<Delta>,
) {
    info!(player = ?player_id, "loading dashboard");
    let _ = tx.send(Delta::LoadStarted {
        player_id: player_id.map(str::to_string),
    });

    match api.list_teams() {
        Ok(teams) => {
            known_teams.clear();
            known_teams.extend(teams.iter().map(|t| t.id.clone()));
            let _ = tx.send(Delta::TeamsLoaded(teams));
        }
        Err(err) => {
            warn!(%err, "teams unavailable");
            let _ = tx.send(Delta::Log(format!("[WARN] Teams unavailable: {err}")));
        }
    }

    let mut team_ref = None;
    match player_id {
        Some(id) => match api.get_player(id) {
            Ok(player) => {
                team_ref = player.team.clone();
                let _ = tx.send(Delta::ActivePlayerLoaded(player));
                send_content(fetch_player_content(api, Some(id)), tx);
            }
            Err(err) => {
                warn!(player = id, %err, "active player fetch failed");
                let _ = tx.send(Delta::PageError(format!("Failed to load player {id}: {err}")));
            }
        },
        None => send_content(fetch_player_content(api, None), tx),
    }

    match api.list_players() {
        Ok(players) => {
            debug!(count = players.len(), "players loaded");
            let _ = tx.send(Delta::PlayersLoaded(players));
        }
        Err(err) => {
            warn!(%err, "players fetch failed");
            let _ = tx.send(Delta::PageError(format!("Failed to load players: {err}")));
        }
    }

    if let Some(team_id) = team_ref {
        resolve_team(api, &team_id, known_teams, tx);
    }

    let _ = tx.send(Delta::LoadFinished);
}

/// Loads another player as the viewing context. Nothing is applied unless the player and
/// their content all load, so a failure leaves the previous player in place.
pub fn switch_player(
    api: &dyn GameApi,
    player_id: &str,
    known_teams: &mut HashSet<String>,
    tx: &Sender<Delta>,
) {
    let player_id = player_id.trim();
    if player_id.is_empty() {
        let _ = tx.send(Delta::SwitchFailed {
            player_id: String::new(),
            message: "player id is required".to_string(),
        });
        return;
    }

    info!(player = player_id, "switching player");
    let _ = tx.send(Delta::SwitchStarted {
        player_id: player_id.to_string(),
    });

    let loaded = api.get_player(player_id).and_then(|player| {
        let (missions, prizes) = fetch_player_content(api, Some(player_id))?;
        Ok((player, missions, prizes))
    });

    match loaded {
        Ok((player, missions, prizes)) => {
            let team_ref = player.team.clone();
            let _ = tx.send(Delta::PlayerSwitched {
                player,
                missions,
                prizes,
            });
            if let Some(team_id) = team_ref {
                resolve_team(api, &team_id, known_teams, tx);
            }
        }
        Err(err) => {
            warn!(player = player_id, %err, "switch failed");
            let _ = tx.send(Delta::SwitchFailed {
                player_id: player_id.to_string(),
                message: err.to_string(),
            });
        }
    }
}

/// Completes the mission's first objective event (or `default_event` when it lists none),
/// then refreshes missions and the active player.
pub fn complete_mission(
    api: &dyn GameApi,
    mission: &Mission,
    player_id: &str,
    default_event: &str,
    tx: &Sender<Delta>,
) {
    let event_id = completion_event(mission, default_event);
    info!(mission = %mission.id, event = %event_id, player = player_id, "completing mission");
    let _ = tx.send(Delta::CompletionStarted {
        mission_id: mission.id.clone(),
    });

    if let Err(err) = api.complete_event(&event_id, player_id) {
        warn!(mission = %mission.id, %err, "completion failed");
        let _ = tx.send(Delta::ActionFailed(format!(
            "Could not complete {}: {err}",
            mission.name
        )));
        return;
    }

    let _ = tx.send(Delta::MissionCompleted {
        mission_id: mission.id.clone(),
        event_id,
    });

    let (missions, player) = thread::scope(|scope| {
        let missions = scope.spawn(|| api.list_missions(Some(player_id)));
        let player = scope.spawn(|| api.get_player(player_id));
        (join(missions), join(player))
    });
    match missions {
        Ok(missions) => {
            let _ = tx.send(Delta::MissionsLoaded(missions));
        }
        Err(err) => {
            let _ = tx.send(Delta::Log(format!("[WARN] Mission refresh failed: {err}")));
        }
    }
    match player {
        Ok(player) => {
            let _ = tx.send(Delta::ActivePlayerLoaded(player));
        }
        Err(err) => {
            let _ = tx.send(Delta::Log(format!("[WARN] Player refresh failed: {err}")));
        }
    }
}

pub fn completion_event(mission: &Mission, default_event: &str) -> String {
    mission
        .objectives
        .first()
        .cloned()
        .unwrap_or_else(|| default_event.to_string())
}

/// Missions and prizes for one player, requested concurrently.
pub fn fetch_player_content(
    api: &dyn GameApi,
    player_id: Option<&str>,
) -> ApiResult<(Vec<Mission>, Vec<Prize>)> {
    let (missions, prizes) = thread::scope(|scope| {
        let missions = scope.spawn(|| api.list_missions(player_id));
        let prizes = scope.spawn(|| api.list_prizes(player_id));
        (join(missions), join(prizes))
    });
    Ok((missions?, prizes?))
}

fn resolve_team(
    api: &dyn GameApi,
    team_id: &str,
    known_teams: &mut HashSet<String>,
    tx: &Sender<Delta>,
) {
    if known_teams.contains(team_id) {
        return;
    }
    match api.get_team(team_id) {
        Ok(team) => {
            known_teams.insert(team.id.clone());
            let _ = tx.send(Delta::TeamResolved(team));
        }
        Err(err) => debug!(team = team_id, %err, "team lookup failed"),
    }
}

fn send_content(content: ApiResult<(Vec<Mission>, Vec<Prize>)>, tx: &Sender<Delta>) {
    match content {
        Ok((missions, prizes)) => {
            let _ = tx.send(Delta::PlayerContentLoaded { missions, prizes });
        }
        Err(err) => {
            warn!(%err, "missions/prizes fetch failed");
            let _ = tx.send(Delta::PageError(format!(
                "Failed to load missions and prizes: {err}"
            )));
        }
    }
}

fn join<T>(handle: thread::ScopedJoinHandle<'_, T>) -> T {
    handle
        .join()
        .unwrap_or_else(|payload| panic::resume_unwind(payload))
}
