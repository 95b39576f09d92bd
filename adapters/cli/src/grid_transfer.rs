use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use thornfield_core::CellCoord;
use thornfield_world::{Grid, Level, LevelError};

const SNAPSHOT_DOMAIN: &str = "thorn";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded snapshot payload.
pub(crate) const SNAPSHOT_HEADER: &str = "thorn:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Map and player position captured mid-level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct GridSnapshot {
    columns: u32,
    rows: u32,
    payload: SnapshotPayload,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct SnapshotPayload {
    cells: String,
    spawn: CellCoord,
}

impl GridSnapshot {
    /// Captures the grid and the player's cell.
    #[must_use]
    pub(crate) fn capture(grid: &Grid, player: CellCoord) -> Self {
        let (columns, rows) = grid.dimensions();
        Self {
            columns,
            rows,
            payload: SnapshotPayload {
                cells: grid.to_text(),
                spawn: player,
            },
        }
    }

    /// Encodes the snapshot into a single-line string suitable for clipboard transfer.
    #[must_use]
    pub(crate) fn encode(&self) -> String {
        let json = serde_json::to_vec(&self.payload)
            .expect("grid snapshot serialization never fails");
        let encoded = STANDARD_NO_PAD.encode(json);
        format!("{SNAPSHOT_HEADER}:{}x{}:{encoded}", self.columns, self.rows)
    }

    /// Decodes a snapshot from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, TransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(TransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(TransferError::MissingPrefix)?;
        let version = parts.next().ok_or(TransferError::MissingVersion)?;
        let dimensions = parts.next().ok_or(TransferError::MissingDimensions)?;
        let payload = parts.next().ok_or(TransferError::MissingPayload)?;

        if domain != SNAPSHOT_DOMAIN {
            return Err(TransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != SNAPSHOT_VERSION {
            return Err(TransferError::UnsupportedVersion(version.to_owned()));
        }

        let (columns, rows) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD.decode(payload.as_bytes())?;
        let payload: SnapshotPayload = serde_json::from_slice(&bytes)?;

        Ok(Self {
            columns,
            rows,
            payload,
        })
    }

    /// Rebuilds a level that resumes from the captured position.
    pub(crate) fn into_level(self) -> Result<Level, TransferError> {
        let level = Level::from_text(&self.payload.cells, self.columns, self.rows)?;
        Ok(level.with_spawn(self.payload.spawn))
    }
}

/// Errors that can occur while decoding grid transfer strings.
#[derive(Debug, Error)]
pub(crate) enum TransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("grid snapshot was empty")]
    EmptyPayload,
    /// The prefix segment was missing from the encoded snapshot.
    #[error("grid snapshot is missing the prefix")]
    MissingPrefix,
    /// The encoded snapshot did not contain a version segment.
    #[error("grid snapshot is missing the version")]
    MissingVersion,
    /// The encoded snapshot did not include grid dimensions.
    #[error("grid snapshot is missing the grid dimensions")]
    MissingDimensions,
    /// The encoded snapshot did not include the payload segment.
    #[error("grid snapshot is missing the payload")]
    MissingPayload,
    /// The encoded snapshot used an unexpected prefix segment.
    #[error("grid snapshot prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded snapshot used an unsupported version identifier.
    #[error("grid snapshot version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed from the encoded snapshot.
    #[error("could not parse grid dimensions '{0}'")]
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode grid snapshot payload: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),
    /// The decoded payload could not be deserialised.
    #[error("could not parse grid snapshot payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
    /// The decoded cells did not describe a level.
    #[error("grid snapshot does not describe a level: {0}")]
    InvalidLevel(#[from] LevelError),
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), TransferError> {
    let invalid = || TransferError::InvalidDimensions(dimensions.to_owned());
    let (columns, rows) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;

    let columns = columns.trim().parse::<u32>().map_err(|_| invalid())?;
    let rows = rows.trim().parse::<u32>().map_err(|_| invalid())?;

    if columns == 0 || rows == 0 {
        return Err(invalid());
    }

    Ok((columns, rows))
}
