use thornfield_core::{CellCoord, CellState, Command, Direction, Event, LockRule, Stage};
use thornfield_system_movement::Movement;
use thornfield_world::{self as world, query, Level, World};

fn world_from(text: &str, columns: u32, rows: u32) -> World {
    let level = Level::from_text(text, columns, rows).expect("level parses");
    World::with_level(level, LockRule::RipeOrThorned)
}

/// Feeds an intent through the system and the world until no commands remain.
fn press(world: &mut World, movement: &mut Movement, direction: Direction) -> Vec<Event> {
    let mut commands = Vec::new();
    let mut observed = Vec::new();
    movement.handle(&[], Some(direction), |_| None, &mut commands);

    while !commands.is_empty() {
        let mut events = Vec::new();
        for command in commands.drain(..) {
            world::apply(world, command, &mut events);
        }
        let grid = query::grid(world);
        movement.handle(&events, None, |cell| grid.try_get(cell), &mut commands);
        observed.extend(events);
    }

    observed
}

#[test]
fn stepping_onto_ground_runs_a_turn_at_the_destination() {
    let mut world = world_from("d00\n030\n000", 3, 3);
    let mut movement = Movement::default();

    let events = press(&mut world, &mut movement, Direction::East);

    assert_eq!(
        events.first(),
        Some(&Event::PlayerMoved {
            from: CellCoord::new(0, 0),
            to: CellCoord::new(1, 0),
        })
    );
    assert!(events.contains(&Event::Sprouted));
    assert_eq!(events.last(), Some(&Event::GridChanged));
    assert_eq!(query::grid(&world).to_text(), "101\n141\n000\n");
    assert!(!movement.turn_in_progress());
}

#[test]
fn walking_into_a_ripe_cell_sets_it_off() {
    let mut world = world_from("d4\n00", 2, 2);
    let mut movement = Movement::default();

    let events = press(&mut world, &mut movement, Direction::East);

    assert_eq!(
        events[0],
        Event::PlayerBumped {
            cell: CellCoord::new(1, 0),
            state: CellState::Stage(Stage::Ripe),
        }
    );
    assert!(events.contains(&Event::Exploded));
    assert!(events.contains(&Event::Unlocked));
    assert_eq!(query::player(&world), CellCoord::new(0, 0));
    assert_eq!(query::grid(&world).to_text(), "00\n00\n");
}

#[test]
fn thorns_and_walls_block_without_a_turn() {
    let mut world = world_from("5d\n0s", 2, 2);
    let mut movement = Movement::default();

    let west = press(&mut world, &mut movement, Direction::West);
    let south = press(&mut world, &mut movement, Direction::South);

    assert_eq!(west.len(), 1);
    assert_eq!(south.len(), 1);
    assert!(!west.contains(&Event::GridChanged));
    assert!(!south.contains(&Event::GridChanged));
}

#[test]
fn ice_does_not_trigger_a_turn() {
    let mut world = world_from("di0\n000", 3, 2);
    let mut movement = Movement::default();

    let events = press(&mut world, &mut movement, Direction::East);

    assert_eq!(
        events,
        vec![Event::PlayerMoved {
            from: CellCoord::new(0, 0),
            to: CellCoord::new(1, 0),
        }]
    );
    assert_eq!(query::grid(&world).to_text(), "0i0\n000\n");
}

#[test]
fn intents_are_dropped_while_a_turn_is_pending() {
    let mut movement = Movement::default();
    let mut commands = Vec::new();

    movement.handle(
        &[Event::PlayerMoved {
            from: CellCoord::new(0, 0),
            to: CellCoord::new(1, 0),
        }],
        Some(Direction::East),
        |_| Some(CellState::FRESH),
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::ResolveTurn {
            cell: CellCoord::new(1, 0),
        }]
    );
    assert!(movement.turn_in_progress());

    commands.clear();
    movement.handle(&[Event::GridChanged], Some(Direction::South), |_| None, &mut commands);

    assert_eq!(
        commands,
        vec![Command::StepPlayer {
            direction: Direction::South,
        }]
    );
}

#[test]
fn loading_a_level_clears_a_pending_turn() {
    let mut movement = Movement::default();
    let mut commands = Vec::new();
    movement.handle(
        &[Event::PlayerBumped {
            cell: CellCoord::new(2, 2),
            state: CellState::Stage(Stage::Ripe),
        }],
        None,
        |_| None,
        &mut commands,
    );
    assert!(movement.turn_in_progress());

    movement.handle(
        &[Event::LevelLoaded {
            spawn: CellCoord::new(0, 0),
            columns: 3,
            rows: 3,
        }],
        None,
        |_| None,
        &mut commands,
    );

    assert!(!movement.turn_in_progress());
}
