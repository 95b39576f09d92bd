#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure movement system that turns player intents into steps and decides
//! where decay turns happen.
//!
//! A move that comes to rest on ordinary ground triggers a turn centered on
//! the destination. Walking into a ripe cell leaves the player in place and
//! triggers a turn centered on the ripe cell, which sets it off. Only one turn
//! may be in flight: intents are dropped until the world reports the grid
//! change that concludes the pending turn.

use thornfield_core::{CellCoord, CellState, Command, Direction, Event, Stage};

/// Pure system that reacts to world events and emits movement commands.
#[derive(Debug, Default)]
pub struct Movement {
    pending_turn: Option<CellCoord>,
}

impl Movement {
    /// Consumes world events and the current player intent to emit commands.
    ///
    /// `cell_state` looks up the current contents of a cell; it is only
    /// consulted for cells the player just entered.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        intent: Option<Direction>,
        cell_state: F,
        out: &mut Vec<Command>,
    ) where
        F: Fn(CellCoord) -> Option<CellState>,
    {
        for event in events {
            match event {
                Event::LevelLoaded { .. } | Event::GridChanged => {
                    self.pending_turn = None;
                }
                Event::PlayerMoved { to, .. } => {
                    if cell_state(*to) == Some(CellState::Ice) {
                        log::debug!("slid onto ice at {to:?}, no turn");
                        continue;
                    }
                    self.request_turn(*to, out);
                }
                Event::PlayerBumped { cell, state } => {
                    if *state == CellState::Stage(Stage::Ripe) {
                        self.request_turn(*cell, out);
                    }
                }
                _ => {}
            }
        }

        let Some(direction) = intent else {
            return;
        };
        if let Some(cell) = self.pending_turn {
            log::debug!("dropping {direction:?} while the turn at {cell:?} resolves");
            return;
        }
        out.push(Command::StepPlayer { direction });
    }

    /// Reports whether a turn was requested and has not concluded yet.
    #[must_use]
    pub fn turn_in_progress(&self) -> bool {
        self.pending_turn.is_some()
    }

    fn request_turn(&mut self, cell: CellCoord, out: &mut Vec<Command>) {
        if let Some(pending) = self.pending_turn {
            log::warn!("turn at {cell:?} requested while {pending:?} is unresolved");
            return;
        }
        self.pending_turn = Some(cell);
        out.push(Command::ResolveTurn { cell });
    }
}
