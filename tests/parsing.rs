mod common;

use chrono::{TimeZone, Utc};
use serde_json::json;

use common::read_fixture;
use gamelayer_terminal::models::{
    LIST_WRAPPER_KEYS, Level, Stock, normalize_list, parse_missions_json, parse_player_json,
    parse_players_json, parse_prizes_json, parse_teams_json,
};

#[test]
fn bare_array_is_returned_unchanged() {
    let items = vec![json!({"id": "a"}), json!(3), json!("x")];
    let out = normalize_list(json!(items.clone()), LIST_WRAPPER_KEYS);
    assert_eq!(out, items);
}

#[test]
fn wrapped_arrays_are_unwrapped() {
    let items = vec![json!({"id": "a"}), json!({"id": "b"})];
    assert_eq!(
        normalize_list(json!({ "players": items.clone() }), LIST_WRAPPER_KEYS),
        items
    );
    assert_eq!(
        normalize_list(json!({ "data": items.clone(), "total": 2 }), LIST_WRAPPER_KEYS),
        items
    );
}

#[test]
fn other_shapes_become_empty() {
    assert!(normalize_list(json!({ "players": "nope" }), LIST_WRAPPER_KEYS).is_empty());
    assert!(normalize_list(json!({ "items": [1, 2] }), LIST_WRAPPER_KEYS).is_empty());
    assert!(normalize_list(json!(42), LIST_WRAPPER_KEYS).is_empty());
    assert!(normalize_list(json!("players"), LIST_WRAPPER_KEYS).is_empty());
    assert!(normalize_list(json!(null), LIST_WRAPPER_KEYS).is_empty());
}

#[test]
fn parses_players_fixture() {
    let players = parse_players_json(&read_fixture("players_wrapped.json")).expect("fixture");
    assert_eq!(players.len(), 3, "entry without id is skipped");

    let ada = &players[0];
    assert_eq!(ada.id, "p1");
    assert_eq!(ada.credits, 40);
    assert_eq!(
        ada.level,
        Level {
            current: 3,
            experience: 250
        }
    );
    assert_eq!(ada.team.as_deref(), Some("t1"));

    let brook = &players[1];
    assert_eq!(brook.level.current, 2);
    assert_eq!(brook.team.as_deref(), Some("t2"));
    assert_eq!(brook.team_name.as_deref(), Some("Blue"));
    assert!(ada.team_name.is_none(), "bare team id carries no name");

    let third = &players[2];
    assert_eq!(third.name, "p3");
    assert_eq!(third.points, 95);
    assert!(third.team.is_none());
}

#[test]
fn parses_wrapped_single_player() {
    let player = parse_player_json(&read_fixture("player.json")).expect("fixture");
    assert_eq!(player.id, "p9");
    assert_eq!(player.team.as_deref(), Some("t1"));
    assert_eq!(player.level.experience, 10);
}

#[test]
fn parses_missions_fixture() {
    let missions = parse_missions_json(&read_fixture("missions.json")).expect("fixture");
    assert_eq!(missions.len(), 2);

    let first = &missions[0];
    assert_eq!(first.objectives, vec!["daily-login".to_string()]);
    assert_eq!(first.reward.points, 50);
    assert_eq!(first.progress(), (1, 3));
    assert_eq!(first.steps[2].name, "Step 3");
    assert!(!first.is_completed());

    let second = &missions[1];
    assert_eq!(second.name, "Share a post");
    assert_eq!(second.reward.credits, 1);
    assert!(second.objectives.is_empty());

    let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
    assert!(first.is_active(now));
    assert!(!second.is_active(now));
}

#[test]
fn parses_prizes_fixture() {
    let prizes = parse_prizes_json(&read_fixture("prizes.json")).expect("fixture");
    assert_eq!(prizes.len(), 3);
    assert_eq!(prizes[0].cost, 10);
    assert_eq!(prizes[0].stock, Stock::Limited(4));
    assert_eq!(prizes[1].cost, 40, "points_required is accepted as cost");
    assert!(!prizes[1].in_stock());
    assert_eq!(prizes[2].stock, Stock::Unlimited);
}

#[test]
fn parses_teams_fixture() {
    let teams = parse_teams_json(&read_fixture("teams.json")).expect("fixture");
    let ids: Vec<&str> = teams.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["t1", "t2"]);
}

#[test]
fn null_and_empty_bodies_are_empty() {
    assert!(parse_players_json("null").expect("null").is_empty());
    assert!(parse_missions_json("  ").expect("blank").is_empty());
    assert!(parse_prizes_json("{\"error\":\"x\"}").expect("object").is_empty());
}

#[test]
fn invalid_json_is_an_error() {
    assert!(parse_players_json("{not json").is_err());
    assert!(parse_player_json("[]").is_err());
}
