use slidestone::controller::Resources;
use slidestone::error::{LevelError, LoadError};
use slidestone::model::{LevelPack, Room, Tile};

#[test]
fn object_and_array_button_tables_agree() {
    let text = r##"[
        {"tiles": ["^0#"], "buttons": {"0": {"on": " ", "off": "#", "target": {"x": 2, "y": 0}}}},
        {"tiles": ["^0#"], "buttons": [{"on": " ", "off": "#", "target": {"x": 2, "y": 0}}]}
    ]"##;
    let pack = LevelPack::from_json(text).unwrap();
    assert_eq!(pack.levels()[0].buttons, pack.levels()[1].buttons);
}

#[test]
fn buttons_may_be_omitted() {
    let pack = LevelPack::from_json(r#"[{"tiles": ["^ @"]}]"#).unwrap();
    let room = Room::new(&pack.levels()[0]).unwrap();
    assert_eq!(room.tile_at(2, 0), Some(Tile::Exit));
}

#[test]
fn invalid_levels_name_the_problem() {
    let cases = [
        (r#"[{"tiles": []}]"#, LevelError::EmptyGrid),
        (r#"[{"tiles": ["^ ", " "]}]"#, LevelError::JaggedRow { row: 1, expected: 2, found: 1 }),
        (r#"[{"tiles": ["  "]}]"#, LevelError::MissingPlayer),
        (r#"[{"tiles": ["^^"]}]"#, LevelError::DuplicatePlayer { x: 1, y: 0 }),
        (r#"[{"tiles": ["^3"]}]"#, LevelError::UnboundButton { id: 3, x: 1, y: 0 }),
    ];
    for (text, expected) in cases {
        let pack = LevelPack::from_json(text).unwrap();
        assert_eq!(Room::new(&pack.levels()[0]).unwrap_err(), expected, "{text}");
    }
}

#[test]
fn button_target_outside_grid_is_rejected() {
    let text = r##"[{"tiles": ["^0"], "buttons": {"0": {"on": " ", "off": "#", "target": {"x": 5, "y": 0}}}}]"##;
    let pack = LevelPack::from_json(text).unwrap();
    assert!(matches!(
        Room::new(&pack.levels()[0]),
        Err(LevelError::TargetOutOfBounds { id: 0, x: 5, .. })
    ));
}

#[test]
fn non_numeric_button_key_is_a_parse_error() {
    let mut resources = Resources::new("assets");
    resources.insert(
        "levels",
        serde_json::json!([{"tiles": ["^"], "buttons": {"a": {"on": " ", "off": "#", "target": {"x": 0, "y": 0}}}}]),
    );
    assert!(matches!(resources.levels("levels"), Err(LoadError::Parse { .. })));
}

#[test]
fn native_loader_reads_bundled_pack() {
    let mut resources = Resources::new(concat!(env!("CARGO_MANIFEST_DIR"), "/assets"));
    pollster::block_on(resources.load_data(&["levels"])).unwrap();
    let pack = resources.levels("levels").unwrap();
    assert!(pack.levels().iter().all(|level| Room::new(level).is_ok()));
}
