//! Level parsing from text blocks and tile-layer documents.
//!
//! Level data is trusted content from the level editor, so parsing is
//! permissive: short rows, missing rows, unknown symbols and unknown tile
//! indices all fall back to fresh ground. Only input that cannot describe a
//! map at all is reported as an error.

use serde::Deserialize;
use thiserror::Error;
use thornfield_core::{CellCoord, CellState, Command, Stage};

use crate::grid::Grid;

/// Columns in the tile sheet the level editor paints with.
pub const SHEET_COLUMNS: u32 = 9;

/// Start position used when a level carries no spawn marker.
const FALLBACK_SPAWN: CellCoord = CellCoord::new(1, 1);

/// Errors raised while decoding level data.
#[derive(Debug, Error)]
pub enum LevelError {
    /// The requested grid has no cells.
    #[error("level dimensions {columns}x{rows} contain no cells")]
    EmptyDimensions {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
    /// The tile-layer document is not valid JSON for the expected shape.
    #[error("could not parse tile layer document: {0}")]
    InvalidDocument(#[from] serde_json::Error),
    /// The tile-layer document contains no tile layer.
    #[error("tile layer document contains no tile layer")]
    MissingTileLayer,
}

/// Parsed map paired with the player's starting cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    grid: Grid,
    spawn: CellCoord,
}

impl Level {
    /// Parses a newline-delimited block with one symbol per cell.
    ///
    /// Blank lines are skipped.
    pub fn from_text(text: &str, columns: u32, rows: u32) -> Result<Self, LevelError> {
        ensure_dimensions(columns, rows)?;
        let mut grid = Grid::new(columns, rows);
        let lines = text.lines().filter(|line| !line.trim().is_empty());
        for (row, line) in (0..rows).zip(lines) {
            for (column, symbol) in (0..columns).zip(line.chars()) {
                let state = CellState::from_symbol(symbol).unwrap_or(CellState::FRESH);
                grid.set(CellCoord::new(column, row), state);
            }
        }
        Ok(Self::with_spawn_from(grid))
    }

    /// Parses a tile-layer JSON document as exported by the level editor.
    pub fn from_tile_layer_json(json: &str, columns: u32, rows: u32) -> Result<Self, LevelError> {
        ensure_dimensions(columns, rows)?;
        let document: TileDocument = serde_json::from_str(json)?;
        let layer = document
            .layers
            .iter()
            .find(|layer| layer.data.is_some())
            .ok_or(LevelError::MissingTileLayer)?;
        let first_gid = document
            .tilesets
            .first()
            .map_or(1, |tileset| tileset.firstgid);
        let data = layer.data.as_deref().unwrap_or(&[]);

        let mut grid = Grid::new(columns, rows);
        let cells = (0..rows).flat_map(|row| (0..columns).map(move |column| (column, row)));
        for ((column, row), gid) in cells.zip(data.iter().copied()) {
            let state = resolve_gid(gid, first_gid);
            grid.set(CellCoord::new(column, row), state);
        }
        Ok(Self::with_spawn_from(grid))
    }

    /// Wraps an already-populated grid, consuming any spawn marker.
    #[must_use]
    pub fn from_grid(grid: Grid) -> Self {
        Self::with_spawn_from(grid)
    }

    /// Overrides the starting cell, e.g. when restoring a saved position.
    ///
    /// Coordinates outside the grid are ignored.
    #[must_use]
    pub fn with_spawn(mut self, spawn: CellCoord) -> Self {
        if self.grid.in_bounds(spawn) {
            self.spawn = spawn;
        } else {
            log::warn!("ignoring spawn override {spawn:?} outside the level");
        }
        self
    }

    /// Map of the level with the spawn marker already consumed.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Cell the player starts on.
    #[must_use]
    pub const fn spawn(&self) -> CellCoord {
        self.spawn
    }

    /// Builds the command that installs this level into a world.
    #[must_use]
    pub fn into_command(self) -> Command {
        let (columns, rows) = self.grid.dimensions();
        Command::LoadLevel {
            cells: self.grid.as_slice().to_vec(),
            columns,
            rows,
            spawn: self.spawn,
        }
    }

    fn with_spawn_from(mut grid: Grid) -> Self {
        let markers: Vec<CellCoord> = grid
            .cells()
            .filter(|(_, state)| *state == CellState::Spawn)
            .map(|(cell, _)| cell)
            .collect();
        for marker in &markers {
            grid.set(*marker, CellState::FRESH);
        }
        if markers.len() > 1 {
            log::warn!(
                "level has {} spawn markers, using the first at {:?}",
                markers.len(),
                markers[0]
            );
        }

        let spawn = markers.first().copied().unwrap_or_else(|| {
            let fallback = CellCoord::new(
                FALLBACK_SPAWN.column().min(grid.columns().saturating_sub(1)),
                FALLBACK_SPAWN.row().min(grid.rows().saturating_sub(1)),
            );
            log::debug!("level has no spawn marker, starting at {fallback:?}");
            fallback
        });
        Self { grid, spawn }
    }
}

/// Resolves a sheet tile index into a cell state.
///
/// Unknown indices become fresh ground.
#[must_use]
pub fn cell_for_tile(index: u32) -> CellState {
    let x = index % SHEET_COLUMNS;
    let y = index / SHEET_COLUMNS;
    match (x, y) {
        (1, 1) => CellState::Background,
        (1..=6, 3) => u8::try_from(x - 1)
            .ok()
            .and_then(Stage::from_digit)
            .map_or(CellState::FRESH, CellState::Stage),
        (7, 3) | (6..=8, 0..=2) => CellState::Solid,
        // Lock and its alternate painted variant.
        (7, 5) | (7, 4) => CellState::Lock,
        (6, 5) => CellState::Ice,
        (0, 5) => CellState::Spawn,
        _ => CellState::FRESH,
    }
}

fn resolve_gid(gid: u32, first_gid: u32) -> CellState {
    if gid == 0 {
        return CellState::FRESH;
    }
    match gid.checked_sub(first_gid) {
        Some(index) => cell_for_tile(index),
        None => CellState::FRESH,
    }
}

fn ensure_dimensions(columns: u32, rows: u32) -> Result<(), LevelError> {
    if columns == 0 || rows == 0 {
        return Err(LevelError::EmptyDimensions { columns, rows });
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct TileDocument {
    #[serde(default)]
    layers: Vec<TileLayer>,
    #[serde(default)]
    tilesets: Vec<Tileset>,
}

#[derive(Debug, Deserialize)]
struct TileLayer {
    #[serde(default)]
    data: Option<Vec<u32>>,
}

#[derive(Debug, Deserialize)]
struct Tileset {
    firstgid: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(x: u32, y: u32) -> u32 {
        x + y * SHEET_COLUMNS
    }

    #[test]
    fn tile_table_covers_every_symbol() {
        assert_eq!(cell_for_tile(tile(1, 1)), CellState::Background);
        assert_eq!(cell_for_tile(tile(1, 3)), CellState::FRESH);
        assert_eq!(cell_for_tile(tile(5, 3)), CellState::Stage(Stage::Ripe));
        assert_eq!(cell_for_tile(tile(6, 3)), CellState::Stage(Stage::Thorned));
        assert_eq!(cell_for_tile(tile(7, 3)), CellState::Solid);
        assert_eq!(cell_for_tile(tile(8, 2)), CellState::Solid);
        assert_eq!(cell_for_tile(tile(7, 5)), CellState::Lock);
        assert_eq!(cell_for_tile(tile(6, 5)), CellState::Ice);
        assert_eq!(cell_for_tile(tile(0, 5)), CellState::Spawn);
        assert_eq!(cell_for_tile(tile(3, 7)), CellState::FRESH);
    }

    #[test]
    fn lock_variant_collapses_to_lock() {
        assert_eq!(cell_for_tile(tile(7, 4)), CellState::Lock);
    }

    #[test]
    fn zero_and_pre_offset_gids_are_fresh() {
        assert_eq!(resolve_gid(0, 1), CellState::FRESH);
        assert_eq!(resolve_gid(3, 10), CellState::FRESH);
        assert_eq!(resolve_gid(tile(7, 3) + 10, 10), CellState::Solid);
    }
}
