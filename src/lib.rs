//! A discrete highway traffic world.
//!
//! The highway is a grid of lanes and cells. An ego vehicle, controlled by an agent,
//! drives among randomly spawned traffic, and the world is exposed to the agent as a
//! [Grid] of speeds relative to the ego vehicle.

pub use config::WorldConfig;
pub use error::{WorldError, WorldResult};
pub use grid::Grid;
pub use rng::TrafficRng;
use slotmap::{new_key_type, SlotMap};
pub use slotmap::{Key, KeyData};
pub use util::Interval;
pub use vehicle::{Vehicle, CELL_SIZE, VEHICLE_LENGTH};
pub use world::{find_free_spot, render, Placement, World};

mod config;
mod error;
mod grid;
mod rng;
mod util;
mod vehicle;
mod world;

new_key_type! {
    /// Unique ID of a traffic [Vehicle].
    pub struct VehicleId;
}

type VehicleSet = SlotMap<VehicleId, Vehicle>;
