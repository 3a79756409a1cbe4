mod common;

use std::collections::HashMap;

use common::{player, prize, team};
use gamelayer_terminal::state::{
    AppState, affordable_prizes, leaderboard, player_rank, resolve_team_name,
};

#[test]
fn leaderboard_sorts_by_points_descending() {
    let players = vec![player("a", 10, 0), player("b", 30, 0), player("c", 20, 0)];
    let ids: Vec<&str> = leaderboard(&players).iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "c", "a"]);
}

#[test]
fn leaderboard_ties_keep_original_order() {
    let players = vec![
        player("a", 5, 0),
        player("b", 9, 0),
        player("c", 5, 0),
        player("d", 9, 0),
        player("e", 5, 0),
    ];
    let ids: Vec<&str> = leaderboard(&players).iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "d", "a", "c", "e"]);
}

#[test]
fn player_rank_is_one_based() {
    let players = vec![player("a", 1, 0), player("b", 2, 0)];
    assert_eq!(player_rank(&players, "b"), Some(1));
    assert_eq!(player_rank(&players, "a"), Some(2));
    assert_eq!(player_rank(&players, "zz"), None);
}

#[test]
fn affordability_boundary_is_inclusive() {
    let prizes = vec![prize("cheap", 5), prize("exact", 20), prize("pricey", 21)];
    let ids: Vec<&str> = affordable_prizes(&prizes, 20)
        .iter()
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(ids, vec!["cheap", "exact"]);
    assert!(affordable_prizes(&prizes, 4).is_empty());
}

#[test]
fn team_resolution_falls_back_to_id() {
    let mut teams = HashMap::new();
    teams.insert("t1".to_string(), team("t1", "Red"));
    assert_eq!(resolve_team_name(&teams, "t1"), "Red");
    assert_eq!(resolve_team_name(&teams, "t9"), "t9");
}

#[test]
fn team_label_uses_placeholder_for_unknown_team() {
    let mut state = AppState::new();
    state.teams.insert("t1".to_string(), team("t1", "Red"));

    let mut member = player("a", 0, 0);
    member.team = Some("t1".to_string());
    assert_eq!(state.team_label(&member), "Red");

    member.team = Some("t7".to_string());
    assert_eq!(state.team_label(&member), "Team t7");

    member.team = None;
    assert_eq!(state.team_label(&member), "No team");
}

#[test]
fn visible_prizes_follow_affordable_toggle() {
    let mut state = AppState::new();
    state.active_player = Some(player("me", 0, 10));
    state.prizes = vec![prize("a", 10), prize("b", 11)];

    assert_eq!(state.visible_prizes().len(), 2);
    state.affordable_only = true;
    let ids: Vec<&str> = state.visible_prizes().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["a"]);
}
