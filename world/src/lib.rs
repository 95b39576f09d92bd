#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Thornfield.

pub mod decay;
pub mod grid;
pub mod level;

use thornfield_core::{
    CellCoord, CellState, Command, Event, LockRule, DEFAULT_COLUMNS, DEFAULT_ROWS,
    WELCOME_BANNER,
};

pub use decay::DecayEngine;
pub use grid::Grid;
pub use level::{Level, LevelError};

/// Represents the authoritative Thornfield world state.
///
/// Mutation happens exclusively through [`apply`], one command at a time, so a
/// decay turn always runs to completion before the next command is observed.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    grid: Grid,
    player: CellCoord,
    decay: DecayEngine,
}

impl World {
    /// Creates a world holding an empty map of the default size.
    #[must_use]
    pub fn new(rule: LockRule) -> Self {
        let grid = Grid::new(DEFAULT_COLUMNS, DEFAULT_ROWS);
        let level = Level::from_grid(grid);
        Self::with_level(level, rule)
    }

    /// Creates a world starting on the provided level.
    #[must_use]
    pub fn with_level(level: Level, rule: LockRule) -> Self {
        let player = level.spawn();
        let grid = level.grid().clone();
        let decay = DecayEngine::new(&grid, rule);
        Self {
            banner: WELCOME_BANNER,
            grid,
            player,
            decay,
        }
    }

    fn is_locked(&self) -> bool {
        self.grid.is_locked_under(self.decay.rule())
    }

    fn blocks_player(&self, state: CellState) -> bool {
        match state {
            CellState::Solid => true,
            CellState::Lock => self.is_locked(),
            CellState::Stage(stage) => stage.is_ripe_or_thorned(),
            CellState::Ice | CellState::Spawn | CellState::Background => false,
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(LockRule::default())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::LoadLevel {
            cells,
            columns,
            rows,
            spawn,
        } => {
            world.grid = Grid::from_cells(columns, rows, cells);
            world.player = if world.grid.in_bounds(spawn) {
                spawn
            } else {
                log::warn!("spawn {spawn:?} outside {columns}x{rows} level, using origin");
                CellCoord::new(0, 0)
            };
            world.decay.reseed(&world.grid);
            log::info!("loaded {columns}x{rows} level, player at {:?}", world.player);
            out_events.push(Event::LevelLoaded {
                spawn: world.player,
                columns,
                rows,
            });
        }
        Command::StepPlayer { direction } => {
            let from = world.player;
            let Some(to) = from
                .step(direction)
                .filter(|cell| world.grid.in_bounds(*cell))
            else {
                log::debug!("step {direction:?} from {from:?} leaves the map");
                return;
            };

            let state = world.grid.get(to);
            if world.blocks_player(state) {
                out_events.push(Event::PlayerBumped { cell: to, state });
                return;
            }

            world.player = to;
            out_events.push(Event::PlayerMoved { from, to });
            if state == CellState::Lock {
                log::info!("exit reached at {to:?}");
                out_events.push(Event::ExitReached { cell: to });
            }
        }
        Command::ResolveTurn { cell } => {
            if !world.grid.in_bounds(cell) {
                log::warn!("ignoring decay turn outside the map at {cell:?}");
                return;
            }
            world.decay.turn(&mut world.grid, cell, out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{Grid, World};
    use thornfield_core::{CellCoord, LockRule};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the current map.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Cell currently occupied by the player.
    #[must_use]
    pub fn player(world: &World) -> CellCoord {
        world.player
    }

    /// Reports whether lock cells currently block movement.
    #[must_use]
    pub fn is_locked(world: &World) -> bool {
        world.is_locked()
    }

    /// Lock predicate the world was configured with.
    #[must_use]
    pub fn lock_rule(world: &World) -> LockRule {
        world.decay.rule()
    }
}
