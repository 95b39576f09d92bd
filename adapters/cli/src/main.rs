#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Thornfield levels in the terminal.

mod config;
mod grid_transfer;
mod session;
mod terminal;

use std::{
    fs,
    io::{self, BufRead},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use thornfield_rendering::RenderingBackend;
use thornfield_world::Level;

use crate::{
    config::{Config, KeyBindings},
    grid_transfer::GridSnapshot,
    session::{Progress, Session},
    terminal::TerminalBackend,
};

const START_LEVEL: &str = include_str!("../levels/start.txt");
const QUIT_KEY: char = 'q';

/// Command-line arguments for the Thornfield terminal client.
#[derive(Debug, Parser)]
#[command(name = "thornfield", about = "Walk the field, set off the ripe ones, find the exit.")]
struct Args {
    /// Level files to play in order; `.json` files are read as tile layers.
    #[arg(long = "level", value_name = "PATH")]
    levels: Vec<PathBuf>,
    /// Configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Key presses to play instead of reading standard input.
    #[arg(long, value_name = "KEYS")]
    moves: Option<String>,
    /// Starts from a previously exported grid.
    #[arg(long, value_name = "SNAPSHOT")]
    import: Option<String>,
    /// Prints the final grid as a transfer string.
    #[arg(long)]
    export: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

/// Entry point for the Thornfield command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path, true)?,
        None => Config::load(&Config::default_path(), false)?,
    };
    let levels = load_levels(&args, &config)?;
    let mut session = Session::new(levels, config.lock_rule)?;

    println!("{}", session.banner());
    let stdout = io::stdout();
    let mut backend = TerminalBackend::new(stdout.lock());
    session.start(&mut backend)?;

    match &args.moves {
        Some(moves) => {
            let _ = feed(moves, &mut session, &config.keys, &mut backend)?;
        }
        None => {
            for line in io::stdin().lock().lines() {
                let line = line.context("failed to read key presses from stdin")?;
                if feed(&line, &mut session, &config.keys, &mut backend)? == Flow::Stop {
                    break;
                }
            }
        }
    }

    if args.export {
        println!("{}", session.snapshot().encode());
    }
    Ok(())
}

fn load_levels(args: &Args, config: &Config) -> Result<Vec<Level>> {
    let mut levels = Vec::with_capacity(args.levels.len() + 1);
    if let Some(snapshot) = &args.import {
        let level = GridSnapshot::decode(snapshot)
            .and_then(GridSnapshot::into_level)
            .context("failed to import grid snapshot")?;
        levels.push(level);
    }
    for path in &args.levels {
        levels.push(load_level(path, config)?);
    }
    if levels.is_empty() {
        log::debug!("no levels given, playing the built-in start level");
        levels.push(Level::from_text(START_LEVEL, config.columns, config.rows)?);
    }
    Ok(levels)
}

fn load_level(path: &Path, config: &Config) -> Result<Level> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read level at {}", path.display()))?;
    let is_tile_layer = path
        .extension()
        .map_or(false, |extension| extension.eq_ignore_ascii_case("json"));
    let level = if is_tile_layer {
        Level::from_tile_layer_json(&contents, config.columns, config.rows)
    } else {
        Level::from_text(&contents, config.columns, config.rows)
    };
    level.with_context(|| format!("invalid level at {}", path.display()))
}

fn feed(
    keys: &str,
    session: &mut Session,
    bindings: &KeyBindings,
    backend: &mut impl RenderingBackend,
) -> Result<Flow> {
    for key in keys.chars().filter(|key| !key.is_whitespace()) {
        if key.eq_ignore_ascii_case(&QUIT_KEY) {
            log::info!("quit requested");
            return Ok(Flow::Stop);
        }
        let Some(direction) = bindings.direction(key) else {
            log::debug!("ignoring unbound key {key:?}");
            continue;
        };
        match session.press(direction, backend)? {
            Progress::Playing => {}
            Progress::LevelComplete => log::info!("on to the next level"),
            Progress::Finished => {
                log::info!("every level cleared");
                return Ok(Flow::Stop);
            }
        }
    }
    Ok(Flow::Continue)
}
