mod common;

use std::collections::HashSet;

use common::{MockApi, channel, drain, mission, player, prize, team};
use gamelayer_terminal::loader::{
    complete_mission, completion_event, load_dashboard, switch_player,
};
use gamelayer_terminal::state::{AppState, Delta, apply_delta};

fn seeded_api() -> MockApi {
    let mut p1 = player("p1", 50, 20);
    p1.team = Some("t1".to_string());
    let mut api = MockApi::new().with_players(vec![p1, player("p2", 70, 5)]);
    api.teams = vec![team("t1", "Red")];
    api.missions = vec![mission("m1", &[]), mission("m2", &["login"])];
    api.prizes = vec![prize("z1", 10)];
    api
}

fn apply_all(state: &mut AppState, deltas: Vec<Delta>) {
    for delta in deltas {
        apply_delta(state, delta);
    }
}

#[test]
fn dashboard_load_runs_in_dependency_order() {
    let api = seeded_api();
    let (tx, rx) = channel();
    let mut known = HashSet::new();

    load_dashboard(&api, Some("p1"), &mut known, &tx);

    let calls = api.calls();
    assert_eq!(calls[0], "teams");
    assert_eq!(calls[1], "player:p1");
    let mut content: Vec<&str> = calls[2..4].iter().map(String::as_str).collect();
    content.sort();
    assert_eq!(content, vec!["missions:p1", "prizes:p1"]);
    assert_eq!(calls[4], "players");
    assert_eq!(calls.len(), 5, "known team needs no extra lookup");

    let mut state = AppState::new();
    apply_all(&mut state, drain(&rx));
    assert!(!state.loading);
    assert!(state.page_error.is_none());
    assert_eq!(state.player_id.as_deref(), Some("p1"));
    assert_eq!(state.missions.len(), 2);
    assert_eq!(state.players.len(), 2);
    let active = state.active_player.clone().expect("active player");
    assert_eq!(state.team_label(&active), "Red");
}

#[test]
fn failed_player_fetch_still_loads_roster() {
    let api = seeded_api().failing("player:p1");
    let (tx, rx) = channel();
    let mut known = HashSet::new();

    load_dashboard(&api, Some("p1"), &mut known, &tx);

    let calls = api.calls();
    assert_eq!(calls, vec!["teams", "player:p1", "players"]);

    let mut state = AppState::new();
    apply_all(&mut state, drain(&rx));
    assert!(
        state
            .page_error
            .as_deref()
            .is_some_and(|e| e.contains("p1"))
    );
    assert_eq!(state.players.len(), 2);
    assert!(!state.loading);
}

#[test]
fn failed_teams_fetch_degrades_to_placeholders() {
    let api = seeded_api().failing("teams").failing("team:t1");
    let (tx, rx) = channel();
    let mut known = HashSet::new();

    load_dashboard(&api, Some("p1"), &mut known, &tx);
    assert!(api.calls().contains(&"team:t1".to_string()));

    let mut state = AppState::new();
    apply_all(&mut state, drain(&rx));
    assert!(state.page_error.is_none());
    let active = state.active_player.clone().expect("active player");
    assert_eq!(state.team_label(&active), "Team t1");
}

#[test]
fn load_without_player_fetches_general_lists() {
    let api = seeded_api();
    let (tx, _rx) = channel();
    let mut known = HashSet::new();

    load_dashboard(&api, None, &mut known, &tx);

    let calls = api.calls();
    assert_eq!(calls[0], "teams");
    assert!(calls.contains(&"missions:*".to_string()));
    assert!(calls.contains(&"prizes:*".to_string()));
    assert_eq!(calls.last().map(String::as_str), Some("players"));
}

#[test]
fn switch_failure_keeps_previous_player() {
    let api = seeded_api().failing("prizes:p2");
    let (tx, rx) = channel();
    let mut known = HashSet::new();
    let mut state = AppState::new();

    load_dashboard(&api, Some("p1"), &mut known, &tx);
    apply_all(&mut state, drain(&rx));

    switch_player(&api, "p2", &mut known, &tx);
    apply_all(&mut state, drain(&rx));

    assert_eq!(
        state.active_player.as_ref().map(|p| p.id.as_str()),
        Some("p1")
    );
    assert_eq!(state.player_id.as_deref(), Some("p1"));
    assert!(state.switch_error.is_some());
    assert!(state.page_error.is_none());
    assert!(state.switching.is_none());
}

#[test]
fn switch_success_replaces_player_and_content() {
    let api = seeded_api();
    let (tx, rx) = channel();
    let mut known = HashSet::new();
    let mut state = AppState::new();

    switch_player(&api, " p2 ", &mut known, &tx);
    apply_all(&mut state, drain(&rx));

    assert_eq!(state.player_id.as_deref(), Some("p2"));
    assert_eq!(state.active_player.as_ref().map(|p| p.points), Some(70));
    assert_eq!(state.prizes.len(), 1);
    assert!(state.switch_error.is_none());
}

#[test]
fn switch_with_blank_id_fails_inline() {
    let api = seeded_api();
    let (tx, rx) = channel();
    let mut known = HashSet::new();

    switch_player(&api, "   ", &mut known, &tx);

    assert!(api.calls().is_empty());
    let deltas = drain(&rx);
    assert!(matches!(deltas.as_slice(), [Delta::SwitchFailed { .. }]));
}

#[test]
fn completion_without_objectives_uses_default_event_and_refreshes() {
    let api = seeded_api();
    let (tx, rx) = channel();
    let target = mission("m1", &[]);

    complete_mission(&api, &target, "p1", "complete-mission", &tx);

    let calls = api.calls();
    assert_eq!(calls[0], "complete:complete-mission:p1");
    let mut refresh: Vec<&str> = calls[1..].iter().map(String::as_str).collect();
    refresh.sort();
    assert_eq!(refresh, vec!["missions:p1", "player:p1"]);

    let deltas = drain(&rx);
    assert!(deltas.iter().any(|d| matches!(
        d,
        Delta::MissionCompleted { event_id, .. } if event_id == "complete-mission"
    )));
    assert!(deltas.iter().any(|d| matches!(d, Delta::MissionsLoaded(_))));
    assert!(deltas.iter().any(|d| matches!(d, Delta::ActivePlayerLoaded(_))));

    let mut state = AppState::new();
    apply_all(&mut state, deltas);
    assert!(state.flash.is_some());
    assert!(state.completing.is_none());
}

#[test]
fn completion_prefers_objective_event() {
    assert_eq!(completion_event(&mission("m2", &["login", "share"]), "dflt"), "login");
    assert_eq!(completion_event(&mission("m1", &[]), "dflt"), "dflt");
}

#[test]
fn failed_completion_reports_inline_without_refresh() {
    let api = seeded_api().failing("complete:login:p1");
    let (tx, rx) = channel();

    complete_mission(&api, &mission("m2", &["login"]), "p1", "dflt", &tx);

    assert_eq!(api.calls(), vec!["complete:login:p1"]);
    let mut state = AppState::new();
    apply_all(&mut state, drain(&rx));
    assert!(state.action_error.is_some());
    assert!(state.flash.is_none());
    assert!(state.page_error.is_none());
}
