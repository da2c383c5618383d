use crate::util::Interval;

/// A dense `lanes × cells` grid of relative speeds, stored lane by lane.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    lanes: usize,
    cells: usize,
    values: Vec<f32>,
}

impl Grid {
    /// Creates a zero-filled grid.
    pub fn zeros(lanes: usize, cells: usize) -> Self {
        Self {
            lanes,
            cells,
            values: vec![0.0; lanes * cells],
        }
    }

    /// The grid dimensions as `(lanes, cells)`.
    pub fn dims(&self) -> (usize, usize) {
        (self.lanes, self.cells)
    }

    /// Gets the value of a single cell.
    ///
    /// # Panics
    /// Panics if `lane` or `cell` is out of bounds.
    pub fn get(&self, lane: usize, cell: usize) -> f32 {
        self.lane(lane)[cell]
    }

    /// The cells of one lane.
    pub fn lane(&self, lane: usize) -> &[f32] {
        let start = lane * self.cells;
        &self.values[start..start + self.cells]
    }

    /// All values, lane-major.
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    /// Writes `value` into the cells of `lane` covered by `range`.
    /// Parts of the range outside the grid are ignored, as is a lane outside the grid.
    pub(crate) fn fill(&mut self, lane: usize, range: Interval<i32>, value: f32) {
        if lane >= self.lanes {
            return;
        }
        let cells = range.to_index_range(self.cells);
        let start = lane * self.cells;
        self.values[start + cells.start..start + cells.end].fill(value);
    }
}
