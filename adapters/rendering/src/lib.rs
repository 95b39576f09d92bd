#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Thornfield adapters.
//!
//! Adapters never receive diffs: after every turn a [`Scene`] is captured
//! from the full grid and the global lock flag, and every tile visual is
//! derived again from scratch.

use anyhow::Result as AnyResult;
use thornfield_core::{CellCoord, CellState, Event, Stage};

/// Edge of the map a lock cell faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Facing {
    /// Closest to row zero.
    Top,
    /// Closest to the last row.
    Bottom,
    /// Closest to column zero.
    Left,
    /// Closest to the last column.
    Right,
}

impl Facing {
    /// Picks the border nearest to `cell`.
    ///
    /// Distances are `row`, `rows - row`, `column` and `columns - column`;
    /// ties resolve in that order.
    #[must_use]
    pub fn nearest_border(cell: CellCoord, columns: u32, rows: u32) -> Self {
        let candidates = [
            (cell.row(), Facing::Top),
            (rows.saturating_sub(cell.row()), Facing::Bottom),
            (cell.column(), Facing::Left),
            (columns.saturating_sub(cell.column()), Facing::Right),
        ];
        let mut best = candidates[0];
        for candidate in &candidates[1..] {
            if candidate.0 < best.0 {
                best = *candidate;
            }
        }
        best.1
    }
}

/// Set of neighbouring solids a wall tile visually connects to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Joins(u8);

impl Joins {
    /// Creates an empty join set.
    #[must_use]
    pub const fn none() -> Self {
        Self(0)
    }

    /// Records a join toward the neighbour at the provided offset.
    #[must_use]
    pub const fn with(self, column_delta: i32, row_delta: i32) -> Self {
        match Self::bit(column_delta, row_delta) {
            Some(bit) => Self(self.0 | bit),
            None => self,
        }
    }

    /// Reports whether the tile joins the neighbour at the provided offset.
    #[must_use]
    pub const fn contains(self, column_delta: i32, row_delta: i32) -> bool {
        match Self::bit(column_delta, row_delta) {
            Some(bit) => self.0 & bit != 0,
            None => false,
        }
    }

    /// Number of joined neighbours.
    #[must_use]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    const fn bit(column_delta: i32, row_delta: i32) -> Option<u8> {
        let index = match (column_delta, row_delta) {
            (0, -1) => 0,
            (1, -1) => 1,
            (1, 0) => 2,
            (1, 1) => 3,
            (0, 1) => 4,
            (-1, 1) => 5,
            (-1, 0) => 6,
            (-1, -1) => 7,
            _ => return None,
        };
        Some(1 << index)
    }
}

/// Visual chosen for a single map cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileVisual {
    /// Plain backdrop.
    Background,
    /// Ground drawn according to its decay stage.
    Stage(Stage),
    /// Wall piece connected to the listed neighbouring walls.
    Solid {
        /// Neighbouring solids the piece connects to.
        joins: Joins,
    },
    /// Ice sheet.
    Ice,
    /// Open exit, drawn when the map is unlocked.
    Exit {
        /// Border the exit icon points toward.
        facing: Facing,
    },
    /// Closed exit, drawn as a wall while the map is locked.
    Barrier {
        /// Border the barrier icon points toward.
        facing: Facing,
    },
}

impl TileVisual {
    /// Terminal glyph used by text adapters.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            TileVisual::Background => ' ',
            TileVisual::Stage(Stage::Fresh) => '.',
            TileVisual::Stage(Stage::Sprout) => ',',
            TileVisual::Stage(Stage::Grow) => ';',
            TileVisual::Stage(Stage::Bud) => 'w',
            TileVisual::Stage(Stage::Ripe) => '@',
            TileVisual::Stage(Stage::Thorned) => '#',
            TileVisual::Solid { .. } => 'X',
            TileVisual::Ice => '~',
            TileVisual::Barrier { .. } => '=',
            TileVisual::Exit { facing } => match facing {
                Facing::Top => '^',
                Facing::Bottom => 'v',
                Facing::Left => '<',
                Facing::Right => '>',
            },
        }
    }
}

/// Transient particle effect anchored to a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Effect {
    /// Burst drawn at every blast center of an explosion.
    Blast(CellCoord),
    /// Puff drawn where ground ripened or thorned.
    Poof(CellCoord),
}

impl Effect {
    /// Derives the effect announced by a world event, if any.
    #[must_use]
    pub const fn for_event(event: &Event) -> Option<Self> {
        match event {
            Event::BlastCue { cell } => Some(Effect::Blast(*cell)),
            Event::RipenCue { cell } => Some(Effect::Poof(*cell)),
            _ => None,
        }
    }

    /// Cell the effect is anchored to.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        match self {
            Effect::Blast(cell) | Effect::Poof(cell) => *cell,
        }
    }
}

/// Named sound effects the audio collaborator plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// A step, taken or bumped.
    Walk,
    /// A ripe cell went off.
    Exploded,
    /// Ground ripened.
    Sprout,
    /// Ground thorned.
    Thorn,
    /// The exits closed.
    Locked,
    /// The exits opened.
    Unlocked,
}

impl SoundCue {
    /// Derives the sound announced by a world event, if any.
    #[must_use]
    pub const fn for_event(event: &Event) -> Option<Self> {
        match event {
            Event::PlayerMoved { .. } | Event::PlayerBumped { .. } => Some(SoundCue::Walk),
            Event::Exploded => Some(SoundCue::Exploded),
            Event::Sprouted => Some(SoundCue::Sprout),
            Event::Thorned => Some(SoundCue::Thorn),
            Event::Locked => Some(SoundCue::Locked),
            Event::Unlocked => Some(SoundCue::Unlocked),
            _ => None,
        }
    }

    /// Asset key of the sound, matching the sample file prefix.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            SoundCue::Walk => "walk",
            SoundCue::Exploded => "exploded",
            SoundCue::Sprout => "sprout",
            SoundCue::Thorn => "thorn",
            SoundCue::Locked => "locked",
            SoundCue::Unlocked => "unlocked",
        }
    }
}

/// Full-frame description of the map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scene {
    /// Number of columns in the map.
    pub columns: u32,
    /// Number of rows in the map.
    pub rows: u32,
    /// Row-major visuals, one per cell.
    pub tiles: Vec<TileVisual>,
    /// Cell occupied by the player.
    pub player: CellCoord,
    /// Whether exits are currently closed.
    pub locked: bool,
    /// Effects triggered by the most recent turn.
    pub effects: Vec<Effect>,
}

impl Scene {
    /// Derives every tile visual from row-major cell states.
    ///
    /// Missing cells are drawn as fresh ground.
    #[must_use]
    pub fn capture(
        columns: u32,
        rows: u32,
        cells: &[CellState],
        player: CellCoord,
        locked: bool,
    ) -> Self {
        let state_at = |cell: CellCoord| -> Option<CellState> {
            if cell.column() >= columns || cell.row() >= rows {
                return None;
            }
            let index = usize::try_from(cell.row() * columns + cell.column()).ok()?;
            Some(cells.get(index).copied().unwrap_or_default())
        };

        let mut tiles = Vec::with_capacity(cells.len());
        for row in 0..rows {
            for column in 0..columns {
                let cell = CellCoord::new(column, row);
                let state = state_at(cell).unwrap_or_default();
                tiles.push(visual_for(cell, state, columns, rows, locked, &state_at));
            }
        }

        Self {
            columns,
            rows,
            tiles,
            player,
            locked,
            effects: Vec::new(),
        }
    }

    /// Attaches the effects announced by a batch of events.
    #[must_use]
    pub fn with_effects(mut self, events: &[Event]) -> Self {
        self.effects = events.iter().filter_map(Effect::for_event).collect();
        self
    }

    /// Visual of the tile at the provided cell.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<TileVisual> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }
        let index = usize::try_from(cell.row() * self.columns + cell.column()).ok()?;
        self.tiles.get(index).copied()
    }
}

fn visual_for<F>(
    cell: CellCoord,
    state: CellState,
    columns: u32,
    rows: u32,
    locked: bool,
    state_at: &F,
) -> TileVisual
where
    F: Fn(CellCoord) -> Option<CellState>,
{
    match state {
        CellState::Stage(stage) => TileVisual::Stage(stage),
        // Spawn markers are consumed on load; draw any stray one as ground.
        CellState::Spawn => TileVisual::Stage(Stage::Fresh),
        CellState::Background => TileVisual::Background,
        CellState::Ice => TileVisual::Ice,
        CellState::Lock => {
            let facing = Facing::nearest_border(cell, columns, rows);
            if locked {
                TileVisual::Barrier { facing }
            } else {
                TileVisual::Exit { facing }
            }
        }
        CellState::Solid => {
            let joins = CellCoord::neighborhood()
                .filter(|offset| *offset != (0, 0))
                .filter(|(column_delta, row_delta)| {
                    cell.offset(*column_delta, *row_delta)
                        .and_then(state_at)
                        .map_or(false, |neighbor| neighbor == CellState::Solid)
                })
                .fold(Joins::none(), |joins, (column_delta, row_delta)| {
                    joins.with(column_delta, row_delta)
                });
            TileVisual::Solid { joins }
        }
    }
}

/// Draws the scene as text, one line per row.
///
/// The player is drawn as `P`; effects overlay the tile beneath them.
#[must_use]
pub fn render_ascii(scene: &Scene) -> String {
    let rows = usize::try_from(scene.rows).unwrap_or(0);
    let mut text = String::with_capacity(scene.tiles.len() + rows);
    for row in 0..scene.rows {
        for column in 0..scene.columns {
            let cell = CellCoord::new(column, row);
            let glyph = if cell == scene.player {
                'P'
            } else if let Some(effect) = scene.effects.iter().find(|effect| effect.cell() == cell)
            {
                match effect {
                    Effect::Blast(_) => '*',
                    Effect::Poof(_) => '+',
                }
            } else {
                scene.tile(cell).map_or(' ', TileVisual::glyph)
            };
            text.push(glyph);
        }
        text.push('\n');
    }
    text
}

/// Rendering backend capable of presenting Thornfield scenes.
pub trait RenderingBackend {
    /// Draws a freshly captured scene.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;

    /// Plays a named sound effect.
    fn play(&mut self, cue: SoundCue) -> AnyResult<()>;
}
