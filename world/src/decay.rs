//! Per-turn decay automaton.
//!
//! A turn grows the 3×3 neighbourhood around the cell where a move came to
//! rest. When that cell is ripe the turn becomes an explosion instead: the
//! blast maps neighbours down the decay cycle and every ripe neighbour caught
//! in it becomes a blast center of the next wave. Waves are processed
//! breadth-first until no ripe neighbour remains.
//!
//! Reads within a wave observe the grid as it was when the wave began; the
//! wave's writes are committed together once every frontier member has been
//! visited. A cell that is both a blast center and a neighbour of another
//! center in the same wave ends up reset by the center rule. Solid, ice and
//! lock cells keep their state even as turn centers.

use std::collections::{BTreeMap, BTreeSet};

use thornfield_core::{CellCoord, CellState, Event, LockRule, Stage};

use crate::grid::Grid;

/// Stateful driver of decay turns.
///
/// The only state carried between turns is the previous lock flag, used to
/// report lock transitions exactly once.
#[derive(Clone, Copy, Debug)]
pub struct DecayEngine {
    rule: LockRule,
    locked: bool,
}

impl DecayEngine {
    /// Creates an engine whose lock flag is seeded from the provided grid.
    #[must_use]
    pub fn new(grid: &Grid, rule: LockRule) -> Self {
        Self {
            rule,
            locked: grid.is_locked_under(rule),
        }
    }

    /// Lock flag observed at the end of the previous turn.
    #[must_use]
    pub const fn locked(&self) -> bool {
        self.locked
    }

    /// Lock predicate used by the engine.
    #[must_use]
    pub const fn rule(&self) -> LockRule {
        self.rule
    }

    /// Re-reads the lock flag after the grid was replaced wholesale.
    pub fn reseed(&mut self, grid: &Grid) {
        self.locked = grid.is_locked_under(self.rule);
    }

    /// Runs a single turn centered on `origin`, appending what happened to `out`.
    ///
    /// # Panics
    ///
    /// Panics when `origin` lies outside the grid.
    pub fn turn(&mut self, grid: &mut Grid, origin: CellCoord, out: &mut Vec<Event>) {
        let explode = grid.get(origin) == CellState::Stage(Stage::Ripe);
        if explode {
            out.push(Event::Exploded);
        }

        let mut frontier = vec![origin];
        let mut sprouted = false;
        let mut thorned = false;
        let mut wave_index = 0_u32;

        while !frontier.is_empty() {
            log::debug!(
                "decay wave {wave_index} at {origin:?}: {} center(s), explode={explode}",
                frontier.len()
            );

            let mut wave = Wave::default();
            for center in &frontier {
                if explode {
                    out.push(Event::BlastCue { cell: *center });
                }
                wave.visit(grid, *center, explode);
            }

            for (cell, state) in &wave.writes {
                log::trace!("decay {cell:?}: {:?} -> {state:?}", grid.get(*cell));
                grid.set(*cell, *state);
            }

            for cell in &wave.ripened {
                out.push(Event::RipenCue { cell: *cell });
            }
            sprouted |= wave.sprouted;
            thorned |= wave.thorned;

            frontier = wave.next.into_iter().collect();
            wave_index = wave_index.saturating_add(1);
        }

        if thorned {
            out.push(Event::Thorned);
        } else if sprouted {
            out.push(Event::Sprouted);
        }

        let now_locked = grid.is_locked_under(self.rule);
        match (self.locked, now_locked) {
            (false, true) => out.push(Event::Locked),
            (true, false) => out.push(Event::Unlocked),
            _ => {}
        }
        self.locked = now_locked;

        out.push(Event::GridChanged);
    }
}

/// Mutations gathered for one wave before they are committed.
#[derive(Debug, Default)]
struct Wave {
    writes: BTreeMap<CellCoord, CellState>,
    centers: BTreeSet<CellCoord>,
    next: BTreeSet<CellCoord>,
    ripened: BTreeSet<CellCoord>,
    sprouted: bool,
    thorned: bool,
}

impl Wave {
    fn visit(&mut self, grid: &Grid, center: CellCoord, explode: bool) {
        for (column_delta, row_delta) in CellCoord::neighborhood() {
            let Some(target) = center.offset(column_delta, row_delta) else {
                continue;
            };
            if !grid.in_bounds(target) {
                continue;
            }

            let before = grid.get(target);
            if (column_delta, row_delta) == (0, 0) {
                self.reset_center(target, before);
                continue;
            }

            let Some(stage) = before.stage() else {
                continue;
            };

            if explode {
                if stage == Stage::Ripe {
                    let _ = self.next.insert(target);
                }
                if let Some(after) = stage.explode() {
                    self.write_neighbor(target, CellState::Stage(after));
                }
            } else {
                let after = stage.grow();
                if after != stage {
                    match after {
                        Stage::Ripe => self.sprouted = true,
                        Stage::Thorned => self.thorned = true,
                        _ => {}
                    }
                    if after.is_ripe_or_thorned() {
                        let _ = self.ripened.insert(target);
                    }
                }
                self.write_neighbor(target, CellState::Stage(after));
            }
        }
    }

    fn reset_center(&mut self, cell: CellCoord, before: CellState) {
        if matches!(before, CellState::Solid | CellState::Ice | CellState::Lock) {
            return;
        }
        let _ = self.centers.insert(cell);
        let _ = self.writes.insert(cell, CellState::FRESH);
    }

    fn write_neighbor(&mut self, cell: CellCoord, state: CellState) {
        if self.centers.contains(&cell) {
            return;
        }
        let _ = self.writes.insert(cell, state);
    }
}
