use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use thornfield_core::{Direction, LockRule, DEFAULT_COLUMNS, DEFAULT_ROWS};

const SUPPORTED_CONFIG_VERSION: u32 = 1;

/// Settings loaded from the player's configuration file.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default = "default_columns")]
    pub(crate) columns: u32,
    #[serde(default = "default_rows")]
    pub(crate) rows: u32,
    #[serde(default)]
    pub(crate) lock_rule: LockRule,
    #[serde(default)]
    pub(crate) keys: KeyBindings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: SUPPORTED_CONFIG_VERSION,
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            lock_rule: LockRule::default(),
            keys: KeyBindings::default(),
        }
    }
}

impl Config {
    /// Returns the configuration path used when none is supplied.
    #[must_use]
    pub(crate) fn default_path() -> PathBuf {
        PathBuf::from("thornfield.toml")
    }

    /// Loads the configuration at `path`.
    ///
    /// When `explicit` is false a missing file yields the defaults.
    pub(crate) fn load(path: &Path, explicit: bool) -> Result<Self> {
        if !explicit && !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid config at {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).context("failed to parse config toml contents")?;
        if config.version != SUPPORTED_CONFIG_VERSION {
            bail!(
                "unsupported config version {}; expected {}",
                config.version,
                SUPPORTED_CONFIG_VERSION
            );
        }
        if config.columns == 0 || config.rows == 0 {
            bail!(
                "level dimensions {}x{} contain no cells",
                config.columns,
                config.rows
            );
        }
        config.keys.ensure_distinct()?;
        Ok(config)
    }
}

/// Keys mapped to each step direction.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct KeyBindings {
    up: char,
    down: char,
    left: char,
    right: char,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            up: 'w',
            down: 's',
            left: 'a',
            right: 'd',
        }
    }
}

impl KeyBindings {
    /// Resolves a pressed key into a step direction.
    #[must_use]
    pub(crate) fn direction(&self, key: char) -> Option<Direction> {
        let key = key.to_ascii_lowercase();
        self.bound()
            .into_iter()
            .find(|(bound, _)| *bound == key)
            .map(|(_, direction)| direction)
    }

    fn bound(&self) -> [(char, Direction); 4] {
        [
            (self.up.to_ascii_lowercase(), Direction::North),
            (self.down.to_ascii_lowercase(), Direction::South),
            (self.left.to_ascii_lowercase(), Direction::West),
            (self.right.to_ascii_lowercase(), Direction::East),
        ]
    }

    fn ensure_distinct(&self) -> Result<()> {
        let bound = self.bound();
        for (index, (key, direction)) in bound.iter().enumerate() {
            if let Some((_, other)) = bound[index + 1..].iter().find(|(other, _)| other == key) {
                bail!("key `{key}` is bound to both {direction:?} and {other:?}");
            }
        }
        Ok(())
    }
}

const fn default_version() -> u32 {
    SUPPORTED_CONFIG_VERSION
}

const fn default_columns() -> u32 {
    DEFAULT_COLUMNS
}

const fn default_rows() -> u32 {
    DEFAULT_ROWS
}
