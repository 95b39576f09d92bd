#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Thornfield engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems and
//! presentation collaborators to react to. Systems consume event streams,
//! query immutable views, and respond exclusively with new command batches.

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Thornfield.";

/// Column count of the levels shipped with the game.
pub const DEFAULT_COLUMNS: u32 = 15;

/// Row count of the levels shipped with the game.
pub const DEFAULT_ROWS: u32 = 10;

/// Position of a cell within the decay cycle.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Stage {
    /// Stage `0`: freshly trodden ground.
    Fresh,
    /// Stage `1`: the first shoots.
    Sprout,
    /// Stage `2`: growing.
    Grow,
    /// Stage `3`: budding, one step from ripe.
    Bud,
    /// Stage `4`: ripe, explodes when the player walks into it.
    Ripe,
    /// Stage `5`: thorned, blocks movement and never grows further.
    Thorned,
}

impl Stage {
    /// All stages in growth order.
    pub const ALL: [Stage; 6] = [
        Stage::Fresh,
        Stage::Sprout,
        Stage::Grow,
        Stage::Bud,
        Stage::Ripe,
        Stage::Thorned,
    ];

    /// Advances the stage by one step of growth. Thorned is a fixed point.
    #[must_use]
    pub const fn grow(self) -> Stage {
        match self {
            Stage::Fresh => Stage::Sprout,
            Stage::Sprout => Stage::Grow,
            Stage::Grow => Stage::Bud,
            Stage::Bud => Stage::Ripe,
            Stage::Ripe | Stage::Thorned => Stage::Thorned,
        }
    }

    /// Maps the stage through a blast. Fresh ground is untouched by explosions.
    #[must_use]
    pub const fn explode(self) -> Option<Stage> {
        match self {
            Stage::Fresh => None,
            Stage::Sprout | Stage::Grow | Stage::Bud => Some(Stage::Sprout),
            Stage::Ripe => Some(Stage::Grow),
            Stage::Thorned => Some(Stage::Ripe),
        }
    }

    /// Numeric stage index in the range `0..=5`.
    #[must_use]
    pub const fn digit(self) -> u8 {
        match self {
            Stage::Fresh => 0,
            Stage::Sprout => 1,
            Stage::Grow => 2,
            Stage::Bud => 3,
            Stage::Ripe => 4,
            Stage::Thorned => 5,
        }
    }

    /// Resolves a stage from its numeric index.
    #[must_use]
    pub const fn from_digit(digit: u8) -> Option<Stage> {
        match digit {
            0 => Some(Stage::Fresh),
            1 => Some(Stage::Sprout),
            2 => Some(Stage::Grow),
            3 => Some(Stage::Bud),
            4 => Some(Stage::Ripe),
            5 => Some(Stage::Thorned),
            _ => None,
        }
    }

    /// Reports whether the stage participates in the lock predicate.
    #[must_use]
    pub const fn is_ripe_or_thorned(self) -> bool {
        matches!(self, Stage::Ripe | Stage::Thorned)
    }
}

/// Contents of a single map cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    /// Ground somewhere in the decay cycle.
    Stage(Stage),
    /// Permanent wall. Never decays, never explodes.
    Solid,
    /// Exit that is impassable while the map is locked.
    Lock,
    /// Slippery ground that never decays and never triggers a turn.
    Ice,
    /// Player spawn marker, consumed when a level is loaded.
    Spawn,
    /// Decoration without gameplay semantics.
    Background,
}

impl CellState {
    /// Stage `0` ground, the default for any missing map data.
    pub const FRESH: CellState = CellState::Stage(Stage::Fresh);

    /// Resolves a cell from its map symbol.
    #[must_use]
    pub fn from_symbol(symbol: char) -> Option<CellState> {
        match symbol {
            's' => Some(CellState::Solid),
            'l' => Some(CellState::Lock),
            'i' => Some(CellState::Ice),
            'd' => Some(CellState::Spawn),
            'b' => Some(CellState::Background),
            digit => digit
                .to_digit(10)
                .and_then(|value| u8::try_from(value).ok())
                .and_then(Stage::from_digit)
                .map(CellState::Stage),
        }
    }

    /// Map symbol used by text levels.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            CellState::Stage(stage) => (b'0' + stage.digit()) as char,
            CellState::Solid => 's',
            CellState::Lock => 'l',
            CellState::Ice => 'i',
            CellState::Spawn => 'd',
            CellState::Background => 'b',
        }
    }

    /// Decay stage held by the cell, if it is ground.
    #[must_use]
    pub const fn stage(self) -> Option<Stage> {
        match self {
            CellState::Stage(stage) => Some(stage),
            _ => None,
        }
    }

    /// Reports whether the cell holds stage `4` or `5`.
    #[must_use]
    pub const fn is_ripe_or_thorned(self) -> bool {
        match self {
            CellState::Stage(stage) => stage.is_ripe_or_thorned(),
            _ => false,
        }
    }
}

impl Default for CellState {
    fn default() -> Self {
        CellState::FRESH
    }
}

/// Predicate deciding whether lock cells currently block movement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LockRule {
    /// Locked while any cell is ripe or thorned.
    #[default]
    RipeOrThorned,
    /// Locked while any cell is still fresh ground.
    AnyFresh,
}

impl LockRule {
    /// Evaluates the rule against a single cell.
    #[must_use]
    pub const fn locks_on(self, state: CellState) -> bool {
        match self {
            LockRule::RipeOrThorned => state.is_ripe_or_thorned(),
            LockRule::AnyFresh => matches!(state, CellState::Stage(Stage::Fresh)),
        }
    }
}

/// Cardinal movement directions available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Column and row offsets of a single step.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Shifts the coordinate, returning `None` when either axis would go negative.
    ///
    /// Upper bounds are not checked here; the grid owns its dimensions.
    #[must_use]
    pub fn offset(self, column_delta: i32, row_delta: i32) -> Option<CellCoord> {
        let column = self.column.checked_add_signed(column_delta)?;
        let row = self.row.checked_add_signed(row_delta)?;
        Some(CellCoord::new(column, row))
    }

    /// Steps one cell in the provided direction.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        let (column_delta, row_delta) = direction.delta();
        self.offset(column_delta, row_delta)
    }

    /// Offsets of the 3×3 neighbourhood, center included.
    ///
    /// Columns vary slowest, so iteration order is stable across calls.
    pub fn neighborhood() -> impl Iterator<Item = (i32, i32)> {
        (-1..=1).flat_map(|column| (-1..=1).map(move |row| (column, row)))
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Replaces the current map with a freshly parsed level.
    LoadLevel {
        /// Row-major cells of the new map.
        cells: Vec<CellState>,
        /// Number of columns in the new map.
        columns: u32,
        /// Number of rows in the new map.
        rows: u32,
        /// Cell the player starts on.
        spawn: CellCoord,
    },
    /// Requests that the player advance a single step in the specified direction.
    StepPlayer {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Runs one decay turn centered on the provided cell.
    ResolveTurn {
        /// Cell where the triggering move came to rest.
        cell: CellCoord,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Announces that a new level replaced the previous map.
    LevelLoaded {
        /// Cell the player starts on.
        spawn: CellCoord,
        /// Number of columns in the new map.
        columns: u32,
        /// Number of rows in the new map.
        rows: u32,
    },
    /// Confirms that the player moved between two cells.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: CellCoord,
        /// Cell the player occupies after completing the move.
        to: CellCoord,
    },
    /// Reports that the player walked into a blocking cell and stayed put.
    PlayerBumped {
        /// Cell the player attempted to enter.
        cell: CellCoord,
        /// Contents of the blocking cell.
        state: CellState,
    },
    /// Reports that the player stands on an open exit.
    ExitReached {
        /// Exit cell reached by the player.
        cell: CellCoord,
    },
    /// A ripe cell was set off at the start of a turn.
    Exploded,
    /// Per-cell cue for every blast center of an explosion wave.
    BlastCue {
        /// Cell at the center of the blast.
        cell: CellCoord,
    },
    /// Per-cell cue for a neighbour that grew into stage `4` or `5`.
    RipenCue {
        /// Cell that ripened or thorned.
        cell: CellCoord,
    },
    /// At least one neighbour ripened during the turn.
    Sprouted,
    /// At least one neighbour thorned during the turn.
    Thorned,
    /// The map transitioned from unlocked to locked.
    Locked,
    /// The map transitioned from locked to unlocked.
    Unlocked,
    /// The turn completed; every cell should be redrawn from current state.
    GridChanged,
}
