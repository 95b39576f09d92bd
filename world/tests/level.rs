use thornfield_core::{CellCoord, CellState, Command, Stage};
use thornfield_world::{Level, LevelError};

#[test]
fn text_rows_are_padded_and_truncated() {
    let text = "s0123456789\n\n  \nl4\n";
    let level = Level::from_text(text, 4, 3).expect("level parses");

    assert_eq!(level.grid().to_text(), "s012\nl400\n0000\n");
}

#[test]
fn unknown_symbols_fall_back_to_fresh_ground() {
    let level = Level::from_text("x?s", 3, 1).expect("level parses");

    assert_eq!(level.grid().to_text(), "00s\n");
}

#[test]
fn spawn_marker_is_consumed() {
    let level = Level::from_text("000\n0d0", 3, 2).expect("level parses");

    assert_eq!(level.spawn(), CellCoord::new(1, 1));
    assert_eq!(level.grid().get(CellCoord::new(1, 1)), CellState::FRESH);
}

#[test]
fn extra_spawn_markers_are_cleared() {
    let level = Level::from_text("d0d", 3, 1).expect("level parses");

    assert_eq!(level.spawn(), CellCoord::new(0, 0));
    assert_eq!(level.grid().to_text(), "000\n");
}

#[test]
fn missing_spawn_uses_fallback_inside_grid() {
    let level = Level::from_text("0", 1, 1).expect("level parses");

    assert_eq!(level.spawn(), CellCoord::new(0, 0));
}

#[test]
fn zero_sized_levels_are_rejected() {
    let error = Level::from_text("000", 0, 3).expect_err("no cells");

    assert!(matches!(
        error,
        LevelError::EmptyDimensions { columns: 0, rows: 3 }
    ));
}

#[test]
fn tile_layer_documents_resolve_through_the_tile_table() {
    // firstgid 1: ripe = 33, solid = 35, lock variant = 44, spawn = 46.
    let json = r#"{
        "width": 3,
        "height": 2,
        "layers": [
            { "type": "objectgroup", "objects": [] },
            { "type": "tilelayer", "data": [33, 35, 44, 46, 0, 999] }
        ],
        "tilesets": [{ "firstgid": 1, "source": "tiles.tsx" }]
    }"#;

    let level = Level::from_tile_layer_json(json, 3, 2).expect("document parses");

    assert_eq!(level.grid().to_text(), "4sl\n000\n");
    assert_eq!(level.spawn(), CellCoord::new(0, 1));
}

#[test]
fn short_tile_layers_default_to_fresh_ground() {
    let json = r#"{ "layers": [{ "data": [34] }], "tilesets": [{ "firstgid": 1 }] }"#;

    let level = Level::from_tile_layer_json(json, 2, 2).expect("document parses");

    assert_eq!(
        level.grid().get(CellCoord::new(0, 0)),
        CellState::Stage(Stage::Thorned)
    );
    assert_eq!(level.grid().to_text(), "50\n00\n");
}

#[test]
fn documents_without_tile_layers_are_rejected() {
    let json = r#"{ "layers": [{ "objects": [] }] }"#;

    let error = Level::from_tile_layer_json(json, 2, 2).expect_err("no tile layer");

    assert!(matches!(error, LevelError::MissingTileLayer));
}

#[test]
fn malformed_documents_are_rejected() {
    let error = Level::from_tile_layer_json("{ not json", 2, 2).expect_err("bad json");

    assert!(matches!(error, LevelError::InvalidDocument(_)));
}

#[test]
fn into_command_carries_the_parsed_map() {
    let level = Level::from_text("dl", 2, 1).expect("level parses");

    assert_eq!(
        level.into_command(),
        Command::LoadLevel {
            cells: vec![CellState::FRESH, CellState::Lock],
            columns: 2,
            rows: 1,
            spawn: CellCoord::new(0, 0),
        }
    );
}
