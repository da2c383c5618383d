use crate::config::WorldConfig;
use crate::error::{WorldError, WorldResult};
use crate::grid::Grid;
use crate::rng::TrafficRng;
use crate::vehicle::{Vehicle, VEHICLE_LENGTH};
use crate::{VehicleId, VehicleSet};
use itertools::iproduct;
use log::{debug, trace, warn};
use rand_distr::{Distribution, Uniform};
use smallvec::SmallVec;

/// Replacement vehicles get a speed within this distance of the base traffic speed.
const SPEED_JITTER: i32 = 20;

/// The outcome of searching the grid for a collision-free spot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// A zero-speed probe vehicle at the free spot.
    Placed(Vehicle),
    /// Every attempt collided with an already placed vehicle.
    Exhausted,
}

/// A highway with an ego vehicle and the surrounding traffic.
#[derive(Clone, Debug)]
pub struct World {
    /// The parameters the world was built with.
    config: WorldConfig,
    /// The vehicle controlled by the agent.
    ego: Vehicle,
    /// Every other vehicle.
    traffic: VehicleSet,
    /// The relative speed grid, derived from `ego` and `traffic`.
    snapshot: Grid,
    /// The source of randomness for spawning.
    rng: TrafficRng,
    /// The number of steps taken.
    frame: usize,
}

impl World {
    /// Creates a world and populates it with `config.cars_count` randomly placed vehicles.
    ///
    /// The ego vehicle sits in the middle lane, two thirds of the way down the track.
    pub fn new(config: &WorldConfig, rng: TrafficRng) -> WorldResult<Self> {
        config.validate()?;
        let ego = Vehicle::new(
            config.ego_speed,
            (config.lane_count - 1) / 2,
            2 * config.height_cells / 3,
        );
        let mut world = Self::empty(config, ego, rng);
        world.populate_initial()?;
        world.render();
        debug!(
            "Created world with {} vehicles on a {}x{} grid",
            world.traffic.len(),
            config.lane_count,
            config.height_cells
        );
        Ok(world)
    }

    /// Creates a world from explicitly placed vehicles. No overlap checks are performed.
    pub fn from_parts(
        config: &WorldConfig,
        ego: Vehicle,
        traffic: impl IntoIterator<Item = Vehicle>,
        rng: TrafficRng,
    ) -> WorldResult<Self> {
        config.validate()?;
        let mut world = Self::empty(config, ego, rng);
        for vehicle in traffic {
            world.traffic.insert(vehicle);
        }
        world.render();
        Ok(world)
    }

    fn empty(config: &WorldConfig, ego: Vehicle, rng: TrafficRng) -> Self {
        Self {
            config: config.clone(),
            ego,
            traffic: VehicleSet::default(),
            snapshot: Grid::zeros(config.lane_count, config.height_cells as usize),
            rng,
            frame: 0,
        }
    }

    /// The number of lanes.
    pub fn lane_count(&self) -> usize {
        self.config.lane_count
    }

    /// The length of the track in cells.
    pub fn height_cells(&self) -> i32 {
        self.config.height_cells
    }

    /// The number of traffic vehicles the world is meant to hold.
    pub fn cars_count(&self) -> usize {
        self.config.cars_count
    }

    /// The number of steps taken since the world was created.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// The ego vehicle.
    pub fn ego(&self) -> &Vehicle {
        &self.ego
    }

    /// Whether the ego vehicle is still on the track.
    pub fn is_ego_inside(&self) -> bool {
        self.ego.is_inside(self.config.height_cells)
    }

    /// Returns an iterator over the traffic vehicles.
    pub fn iter_traffic(&self) -> impl Iterator<Item = (VehicleId, &Vehicle)> {
        self.traffic.iter()
    }

    /// The number of traffic vehicles currently on the track.
    pub fn traffic_len(&self) -> usize {
        self.traffic.len()
    }

    /// Gets a traffic vehicle by ID.
    pub fn get_vehicle(&self, vehicle_id: VehicleId) -> Option<&Vehicle> {
        self.traffic.get(vehicle_id)
    }

    /// The grid of speeds relative to the ego vehicle.
    pub fn snapshot(&self) -> &Grid {
        &self.snapshot
    }

    /// Adds a traffic vehicle to the world.
    pub fn insert_vehicle(&mut self, vehicle: Vehicle) -> VehicleId {
        let id = self.traffic.insert(vehicle);
        self.render();
        id
    }

    /// Removes a traffic vehicle from the world.
    pub fn remove_vehicle(&mut self, vehicle_id: VehicleId) -> Option<Vehicle> {
        let vehicle = self.traffic.remove(vehicle_id);
        if vehicle.is_some() {
            self.render();
        }
        vehicle
    }

    /// Modifies the ego vehicle, e.g. to apply an agent's action.
    pub fn update_ego(&mut self, f: impl FnOnce(&mut Vehicle)) {
        f(&mut self.ego);
        self.render();
    }

    /// Advances the world by one frame.
    ///
    /// Positions are tracked in the ego vehicle's frame of reference,
    /// so every other vehicle moves by its speed relative to the ego vehicle.
    pub fn step(&mut self) {
        let ego_speed = self.ego.speed();
        for vehicle in self.traffic.values_mut() {
            vehicle.advance(vehicle.speed() - ego_speed);
        }
        self.frame += 1;
        self.render();
    }

    /// Removes and returns the traffic vehicles that have left the track.
    pub fn remove_exited(&mut self) -> Vec<Vehicle> {
        let height = self.config.height_cells;
        let exited = self
            .traffic
            .iter()
            .filter(|(_, vehicle)| !vehicle.is_inside(height))
            .map(|(id, _)| id)
            .collect::<Vec<_>>();
        let removed = exited
            .into_iter()
            .filter_map(|id| self.traffic.remove(id))
            .collect::<Vec<_>>();
        if !removed.is_empty() {
            trace!("{} vehicles left the track", removed.len());
            self.render();
        }
        removed
    }

    /// Tops the traffic back up to `cars_count` with vehicles entering at either end of the track.
    /// Returns the number of vehicles added, which is less than requested when
    /// the track ends are blocked; the remainder can be retried on a later frame.
    ///
    /// This is never called by [`step`](Self::step).
    pub fn refill(&mut self) -> usize {
        let mut added = 0;
        while self.traffic.len() < self.config.cars_count {
            match self.spawn_replacement() {
                Some(vehicle) => {
                    self.traffic.insert(vehicle);
                    added += 1;
                }
                None => {
                    debug!(
                        "No free spawn spot, {} vehicles short",
                        self.config.cars_count - self.traffic.len()
                    );
                    break;
                }
            }
        }
        if added > 0 {
            self.render();
        }
        added
    }

    /// Finds a spot for a new vehicle at the front or rear edge of the track.
    ///
    /// Candidates in every lane at both edges are tried in random order, and the first
    /// one clear of the current traffic wins. The returned vehicle is not inserted.
    ///
    /// The ego vehicle is not checked. On tracks of 24 cells or fewer the rear edge
    /// reaches the ego vehicle's starting row, so a replacement may land on top of it.
    pub fn spawn_replacement(&mut self) -> Option<Vehicle> {
        let rear = self.config.height_cells - VEHICLE_LENGTH;
        let mut spots = iproduct!([0, rear], 0..self.config.lane_count)
            .collect::<SmallVec<[(i32, usize); 16]>>();
        self.rng.shuffle(&mut spots);

        let jitter = Uniform::new(-SPEED_JITTER, SPEED_JITTER);
        for (cell, lane) in spots {
            let speed = self.config.other_speed + jitter.sample(self.rng.inner());
            let vehicle = Vehicle::new(speed, lane, cell);
            if self.traffic.values().any(|other| vehicle.overlaps(other, 0)) {
                continue;
            }
            return Some(vehicle);
        }
        None
    }

    /// Places `cars_count` vehicles at random, keeping clear of the ego vehicle and each other.
    fn populate_initial(&mut self) -> WorldResult<()> {
        let requested = self.config.cars_count;
        let attempts = self.config.spawn_attempts();
        let mut placed = vec![self.ego];
        placed.extend(self.traffic.values().copied());

        while self.traffic.len() < requested {
            let probe = match find_free_spot(
                &mut self.rng,
                self.config.lane_count,
                self.config.height_cells,
                &placed,
                attempts,
            ) {
                Placement::Placed(probe) => probe,
                Placement::Exhausted => {
                    warn!(
                        "Gave up placing vehicles after {} attempts ({} of {} placed)",
                        attempts,
                        self.traffic.len(),
                        requested
                    );
                    return Err(WorldError::SpawnExhausted {
                        placed: self.traffic.len(),
                        requested,
                    });
                }
            };
            let vehicle = Vehicle::new(self.config.other_speed, probe.lane(), probe.cell_position());
            trace!("Placed vehicle at lane {} cell {}", vehicle.lane(), vehicle.cell_position());
            self.traffic.insert(vehicle);
            placed.push(vehicle);
        }
        Ok(())
    }

    /// Rebuilds the snapshot from the current vehicles.
    fn render(&mut self) {
        self.snapshot = render(
            self.config.lane_count,
            self.config.height_cells,
            &self.ego,
            self.traffic.values(),
        );
    }
}

/// Draws random spots until one is clear of every vehicle in `placed`,
/// giving up after `max_attempts` draws.
///
/// Lanes are drawn from `0..lane_count` and cells from `0..height_cells - VEHICLE_LENGTH`;
/// if either range is empty there is nowhere to draw from and the search is exhausted.
pub fn find_free_spot(
    rng: &mut TrafficRng,
    lane_count: usize,
    height_cells: i32,
    placed: &[Vehicle],
    max_attempts: usize,
) -> Placement {
    if lane_count == 0 || height_cells <= VEHICLE_LENGTH {
        return Placement::Exhausted;
    }
    for _ in 0..max_attempts {
        let lane = rng.gen_range(0..lane_count);
        let cell = rng.gen_range(0..height_cells - VEHICLE_LENGTH);
        let probe = Vehicle::new(0, lane, cell);
        if placed.iter().any(|other| probe.overlaps(other, 0)) {
            continue;
        }
        return Placement::Placed(probe);
    }
    Placement::Exhausted
}

/// Renders the grid of speeds relative to `ego`.
///
/// Each vehicle's cells hold `vehicle.speed - ego.speed`, all other cells are zero.
/// The ego vehicle itself is not drawn. Where vehicles overlap the later one wins.
pub fn render<'a>(
    lane_count: usize,
    height_cells: i32,
    ego: &Vehicle,
    traffic: impl IntoIterator<Item = &'a Vehicle>,
) -> Grid {
    let mut grid = Grid::zeros(lane_count, height_cells.max(0) as usize);
    for vehicle in traffic {
        let relative_speed = (vehicle.speed() - ego.speed()) as f32;
        grid.fill(vehicle.lane(), vehicle.occupied_range(), relative_speed);
    }
    grid
}
