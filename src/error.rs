//! World construction errors.

use thiserror::Error;

/// An error raised while configuring or populating a [World](crate::World).
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("the track must have at least one lane")]
    NoLanes,

    #[error("track of {height_cells} cells is too short, need more than {min}")]
    TrackTooShort { height_cells: i32, min: i32 },

    /// The grid is too crowded to place every requested vehicle.
    /// Treat this as a configuration error: too many cars for the grid.
    #[error("placed {placed} of {requested} vehicles before running out of spawn attempts")]
    SpawnExhausted { placed: usize, requested: usize },

    #[cfg(feature = "serde")]
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Shorthand result type for world operations.
pub type WorldResult<T> = Result<T, WorldError>;
