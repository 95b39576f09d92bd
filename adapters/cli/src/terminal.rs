use std::io::Write;

use anyhow::{Context, Result as AnyResult};
use thornfield_rendering::{render_ascii, RenderingBackend, Scene, SoundCue};

/// Backend that draws scenes as text onto any writer.
#[derive(Debug)]
pub(crate) struct TerminalBackend<W: Write> {
    out: W,
}

impl<W: Write> TerminalBackend<W> {
    /// Creates a backend drawing onto the provided writer.
    pub(crate) fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> RenderingBackend for TerminalBackend<W> {
    fn present(&mut self, scene: &Scene) -> AnyResult<()> {
        let status = if scene.locked {
            "exits closed"
        } else {
            "exits open"
        };
        write!(self.out, "{}", render_ascii(scene)).context("failed to draw scene")?;
        writeln!(self.out, "-- {status} --").context("failed to draw status line")?;
        self.out.flush().context("failed to flush terminal output")
    }

    fn play(&mut self, cue: SoundCue) -> AnyResult<()> {
        log::debug!("sound cue {}", cue.key());
        writeln!(self.out, "[{}]", cue.key()).context("failed to announce sound cue")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thornfield_core::{CellCoord, CellState};

    #[test]
    fn presents_scene_with_status_line() {
        let mut backend = TerminalBackend::new(Vec::new());
        let cells = [CellState::FRESH, CellState::Solid];
        let scene = Scene::capture(2, 1, &cells, CellCoord::new(0, 0), false);

        backend.present(&scene).expect("present succeeds");
        backend.play(SoundCue::Walk).expect("play succeeds");

        let text = String::from_utf8(backend.out).expect("utf8 output");
        assert_eq!(text, "PX\n-- exits open --\n[walk]\n");
    }
}
