use crate::util::Interval;

/// The length of every vehicle, in cells.
pub const VEHICLE_LENGTH: i32 = 4;

/// The number of sub-cell position units in one cell.
pub const CELL_SIZE: i32 = 10;

/// A vehicle on the highway grid.
///
/// The longitudinal coordinate grows towards the rear of the track,
/// so a vehicle moving forward relative to the ego vehicle has a decreasing position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vehicle {
    /// The absolute speed of the vehicle.
    speed: i32,
    /// The index of the lane the vehicle occupies.
    lane: usize,
    /// The longitudinal position in sub-cell units.
    pos: i32,
}

impl Vehicle {
    /// Creates a vehicle whose front occupies the given cell.
    pub fn new(speed: i32, lane: usize, cell: i32) -> Self {
        Self {
            speed,
            lane,
            pos: cell * CELL_SIZE,
        }
    }

    /// The vehicle's absolute speed.
    pub fn speed(&self) -> i32 {
        self.speed
    }

    /// The index of the lane the vehicle is in.
    pub fn lane(&self) -> usize {
        self.lane
    }

    /// The longitudinal position in sub-cell units.
    pub fn position(&self) -> i32 {
        self.pos
    }

    /// The grid row of the front of the vehicle.
    pub fn cell_position(&self) -> i32 {
        self.pos.div_euclid(CELL_SIZE)
    }

    /// The cells covered by the vehicle within its lane.
    pub fn occupied_range(&self) -> Interval<i32> {
        let start = self.cell_position();
        Interval::new(start, start + VEHICLE_LENGTH)
    }

    /// Sets the vehicle's absolute speed.
    pub fn set_speed(&mut self, speed: i32) {
        self.speed = speed;
    }

    /// Moves the vehicle into another lane, keeping its longitudinal position.
    pub fn set_lane(&mut self, lane: usize) {
        self.lane = lane;
    }

    /// Checks whether two vehicles are closer than `safety_margin` cells.
    ///
    /// Vehicles in different lanes never overlap. Bumper-to-bumper contact
    /// counts as an overlap even with a margin of zero.
    pub fn overlaps(&self, other: &Vehicle, safety_margin: i32) -> bool {
        if self.lane != other.lane {
            return false;
        }
        let (mine, theirs) = (self.cell_position(), other.cell_position());
        let gap_ahead = mine - theirs - VEHICLE_LENGTH;
        let gap_behind = theirs - mine - VEHICLE_LENGTH;
        gap_ahead <= safety_margin && gap_behind <= safety_margin
    }

    /// Moves the vehicle by its speed relative to the ego vehicle, in sub-cell units.
    /// A positive `relative_speed` moves the vehicle forward.
    pub fn advance(&mut self, relative_speed: i32) {
        self.pos -= relative_speed;
    }

    /// Whether the front of the vehicle lies in `0..=track_length - VEHICLE_LENGTH`.
    ///
    /// Only whole cells are compared, so a vehicle in the last valid row
    /// still counts as inside while its sub-cell remainder overhangs the track end.
    pub fn is_inside(&self, track_length: i32) -> bool {
        (0..=track_length - VEHICLE_LENGTH).contains(&self.cell_position())
    }
}
