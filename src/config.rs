use crate::error::{WorldError, WorldResult};
use crate::vehicle::VEHICLE_LENGTH;

/// The parameters of a highway world.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldConfig {
    /// The number of lanes.
    pub lane_count: usize,
    /// The length of the track in cells.
    pub height_cells: i32,
    /// The number of non-ego vehicles to keep on the track.
    pub cars_count: usize,
    /// The initial speed of the ego vehicle.
    pub ego_speed: i32,
    /// The base speed of the other traffic.
    pub other_speed: i32,
    /// Spawn attempts per vehicle, as a multiple of `cars_count * lane_count`.
    pub spawn_retry_factor: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            lane_count: 7,
            height_cells: 70,
            cars_count: 20,
            ego_speed: 80,
            other_speed: 65,
            spawn_retry_factor: 100,
        }
    }
}

impl WorldConfig {
    /// Parses a configuration from JSON. Missing fields take their default values.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> WorldResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Checks that the grid has room for at least one spawn row.
    pub fn validate(&self) -> WorldResult<()> {
        if self.lane_count == 0 {
            return Err(WorldError::NoLanes);
        }
        if self.height_cells <= VEHICLE_LENGTH {
            return Err(WorldError::TrackTooShort {
                height_cells: self.height_cells,
                min: VEHICLE_LENGTH,
            });
        }
        Ok(())
    }

    /// The number of random draws allowed when placing a single vehicle.
    pub(crate) fn spawn_attempts(&self) -> usize {
        self.spawn_retry_factor
            .saturating_mul(self.cars_count)
            .saturating_mul(self.lane_count)
            .max(1)
    }
}
