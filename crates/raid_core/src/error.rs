//! Error types for the raid core.
//!
//! Most conditions the core meets during a tick (missing spawn inputs, a mob
//! kind that cannot be built right now, stale tower references) are absorbed
//! where they happen. Only the failures listed here reach a caller.

use thiserror::Error;

use crate::math::BlockPos;
use crate::world::DimensionId;

/// Result type alias using [`RaidError`].
pub type Result<T> = std::result::Result<T, RaidError>;

/// Top-level error type for the raid core.
#[derive(Debug, Error)]
pub enum RaidError {
    /// The target world is not loaded and cannot accept entities.
    #[error("World for dimension {0} is not available")]
    WorldUnavailable(DimensionId),

    /// A structure already occupies the requested position.
    #[error("Position {0} is already occupied by a structure")]
    PositionOccupied(BlockPos),

    /// Failed to load a RON configuration file.
    #[error("Failed to load config '{path}': {message}")]
    ConfigLoad {
        /// Path to the file that failed to load.
        path: String,
        /// Error message.
        message: String,
    },

    /// Encoding or decoding persisted state failed.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Save data was written by an incompatible format version.
    #[error("Save version mismatch: expected {expected}, found {found}")]
    VersionMismatch {
        /// Version this build reads.
        expected: u32,
        /// Version found in the data.
        found: u32,
    },
}
