use std::collections::VecDeque;

use anyhow::{bail, Result};
use thornfield_core::{Command, Direction, Event, LockRule};
use thornfield_rendering::{RenderingBackend, Scene, SoundCue};
use thornfield_system_movement::Movement;
use thornfield_world::{self as world, query, Level, World};

use crate::grid_transfer::GridSnapshot;

/// Outcome of a single key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Progress {
    /// The current level is still being played.
    Playing,
    /// An exit was taken and the next level has been loaded.
    LevelComplete,
    /// An exit was taken on the last level.
    Finished,
}

/// Drives the world and the movement system for a sequence of levels.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    movement: Movement,
    upcoming: VecDeque<Level>,
}

impl Session {
    /// Creates a session that plays the provided levels in order.
    pub(crate) fn new(levels: Vec<Level>, rule: LockRule) -> Result<Self> {
        let mut upcoming = VecDeque::from(levels);
        let Some(first) = upcoming.pop_front() else {
            bail!("no levels to play");
        };
        Ok(Self {
            world: World::with_level(first, rule),
            movement: Movement::default(),
            upcoming,
        })
    }

    /// Banner shown before the first frame.
    pub(crate) fn banner(&self) -> &'static str {
        query::welcome_banner(&self.world)
    }

    /// Draws the opening frame.
    pub(crate) fn start(&self, backend: &mut impl RenderingBackend) -> Result<()> {
        backend.present(&self.scene(&[]))
    }

    /// Processes one step intent until the world settles.
    pub(crate) fn press(
        &mut self,
        direction: Direction,
        backend: &mut impl RenderingBackend,
    ) -> Result<Progress> {
        let mut commands = Vec::new();
        self.movement.handle(&[], Some(direction), |_| None, &mut commands);
        let events = self.pump(commands);

        for cue in events.iter().filter_map(SoundCue::for_event) {
            backend.play(cue)?;
        }

        let exited = events
            .iter()
            .any(|event| matches!(event, Event::ExitReached { .. }));
        if !exited {
            backend.present(&self.scene(&events))?;
            return Ok(Progress::Playing);
        }

        let Some(next) = self.upcoming.pop_front() else {
            log::info!("final exit taken");
            backend.present(&self.scene(&events))?;
            return Ok(Progress::Finished);
        };
        log::info!("level complete, {} remaining", self.upcoming.len());
        let _ = self.pump(vec![next.into_command()]);
        backend.present(&self.scene(&[]))?;
        Ok(Progress::LevelComplete)
    }

    /// Captures the current map and player position for transfer.
    pub(crate) fn snapshot(&self) -> GridSnapshot {
        GridSnapshot::capture(query::grid(&self.world), query::player(&self.world))
    }

    fn pump(&mut self, mut commands: Vec<Command>) -> Vec<Event> {
        let mut observed = Vec::new();
        while !commands.is_empty() {
            let mut events = Vec::new();
            for command in commands.drain(..) {
                world::apply(&mut self.world, command, &mut events);
            }
            let grid = query::grid(&self.world);
            self.movement.handle(&events, None, |cell| grid.try_get(cell), &mut commands);
            observed.extend(events);
        }
        observed
    }

    fn scene(&self, events: &[Event]) -> Scene {
        let grid = query::grid(&self.world);
        Scene::capture(
            grid.columns(),
            grid.rows(),
            grid.as_slice(),
            query::player(&self.world),
            query::is_locked(&self.world),
        )
        .with_effects(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result as AnyResult;
    use thornfield_core::CellCoord;

    #[derive(Default)]
    struct RecordingBackend {
        scenes: Vec<Scene>,
        cues: Vec<SoundCue>,
    }

    impl RenderingBackend for RecordingBackend {
        fn present(&mut self, scene: &Scene) -> AnyResult<()> {
            self.scenes.push(scene.clone());
            Ok(())
        }

        fn play(&mut self, cue: SoundCue) -> AnyResult<()> {
            self.cues.push(cue);
            Ok(())
        }
    }

    fn level(text: &str, columns: u32, rows: u32) -> Level {
        Level::from_text(text, columns, rows).expect("level parses")
    }

    #[test]
    fn empty_level_list_is_rejected() {
        assert!(Session::new(Vec::new(), LockRule::default()).is_err());
    }

    #[test]
    fn step_plays_cues_and_redraws() {
        let mut session =
            Session::new(vec![level("d00\n030\n000", 3, 3)], LockRule::default()).expect("session");
        let mut backend = RecordingBackend::default();

        let progress = session
            .press(Direction::East, &mut backend)
            .expect("press succeeds");

        assert_eq!(progress, Progress::Playing);
        assert_eq!(backend.cues, vec![SoundCue::Walk, SoundCue::Sprout, SoundCue::Locked]);
        let scene = backend.scenes.last().expect("scene presented");
        assert_eq!(scene.player, CellCoord::new(1, 0));
        assert!(scene.locked);
    }

    #[test]
    fn taking_an_exit_loads_the_next_level() {
        let levels = vec![level("dl", 2, 1), level("0d0", 3, 1)];
        let mut session = Session::new(levels, LockRule::default()).expect("session");
        let mut backend = RecordingBackend::default();

        let progress = session
            .press(Direction::East, &mut backend)
            .expect("press succeeds");

        assert_eq!(progress, Progress::LevelComplete);
        let scene = backend.scenes.last().expect("scene presented");
        assert_eq!((scene.columns, scene.rows), (3, 1));
        assert_eq!(scene.player, CellCoord::new(1, 0));
        assert!(scene.effects.is_empty());
    }

    #[test]
    fn exit_on_last_level_finishes() {
        let mut session =
            Session::new(vec![level("dl", 2, 1)], LockRule::default()).expect("session");
        let mut backend = RecordingBackend::default();

        let progress = session
            .press(Direction::East, &mut backend)
            .expect("press succeeds");

        assert_eq!(progress, Progress::Finished);
    }

    #[test]
    fn snapshot_captures_player_position() {
        let session =
            Session::new(vec![level("0d\n00", 2, 2)], LockRule::default()).expect("session");
        let restored = GridSnapshot::decode(&session.snapshot().encode())
            .and_then(GridSnapshot::into_level)
            .expect("snapshot decodes");

        assert_eq!(restored.spawn(), CellCoord::new(1, 0));
        assert_eq!(restored.grid().to_text(), "00\n00\n");
    }
}
