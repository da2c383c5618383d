//! Tests that involve populating and stepping a whole world.

use assert_approx_eq::assert_approx_eq;
use deep_traffic::{
    render, TrafficRng, Vehicle, World, WorldConfig, WorldError, VEHICLE_LENGTH,
};

fn all_vehicles(world: &World) -> Vec<Vehicle> {
    std::iter::once(*world.ego())
        .chain(world.iter_traffic().map(|(_, veh)| *veh))
        .collect()
}

/// Test that randomly placed vehicles never overlap each other or the ego vehicle.
#[test]
fn initial_population_has_no_overlaps() {
    let config = WorldConfig::default();
    for seed in 0..20 {
        let world = World::new(&config, TrafficRng::new(seed)).unwrap();
        assert_eq!(world.traffic_len(), config.cars_count);

        let vehicles = all_vehicles(&world);
        for (i, a) in vehicles.iter().enumerate() {
            for b in &vehicles[i + 1..] {
                assert!(!a.overlaps(b, 0), "seed {seed}: {a:?} overlaps {b:?}");
            }
            assert!(a.is_inside(config.height_cells));
        }
    }
}

#[test]
fn ego_starts_in_middle_lane() {
    let world = World::new(&WorldConfig::default(), TrafficRng::new(1)).unwrap();
    assert_eq!(world.ego().lane(), 3);
    assert_eq!(world.ego().cell_position(), 46);
    assert_eq!(world.ego().speed(), 80);
    assert!(world.iter_traffic().all(|(_, veh)| veh.speed() == 65));
}

#[test]
fn same_seed_same_world() {
    let config = WorldConfig::default();
    let a = World::new(&config, TrafficRng::new(1234)).unwrap();
    let b = World::new(&config, TrafficRng::new(1234)).unwrap();
    assert_eq!(all_vehicles(&a), all_vehicles(&b));
    assert_eq!(a.snapshot(), b.snapshot());
}

#[test]
fn crowded_track_is_exhausted() {
    // One lane fits the ego vehicle plus a single car in front of it.
    let config = WorldConfig {
        lane_count: 1,
        height_cells: 10,
        cars_count: 2,
        ..Default::default()
    };
    match World::new(&config, TrafficRng::new(9)) {
        Err(WorldError::SpawnExhausted { placed, requested }) => {
            assert_eq!(placed, 1);
            assert_eq!(requested, 2);
        }
        other => panic!("expected exhaustion, got {other:?}"),
    }
}

#[test]
fn renders_relative_speeds() {
    let config = WorldConfig::default();
    let ego = Vehicle::new(80, 3, 46);
    let other = Vehicle::new(70, 2, 10);
    let world = World::from_parts(&config, ego, [other], TrafficRng::new(0)).unwrap();

    let grid = world.snapshot();
    assert_eq!(grid.dims(), (7, 70));
    for lane in 0..7 {
        for cell in 0..70 {
            let expected = if lane == 2 && (10..14).contains(&cell) {
                -10.0
            } else {
                0.0
            };
            assert_approx_eq!(grid.get(lane, cell), expected);
        }
    }
}

#[test]
fn step_moves_traffic_relative_to_ego() {
    let config = WorldConfig::default();
    let ego = Vehicle::new(80, 3, 46);
    let slow = Vehicle::new(70, 2, 10);
    let fast = Vehicle::new(95, 4, 30);
    let mut world = World::from_parts(&config, ego, [slow, fast], TrafficRng::new(0)).unwrap();

    world.step();
    assert_eq!(world.frame(), 1);
    let positions = world
        .iter_traffic()
        .map(|(_, veh)| (veh.lane(), veh.position()))
        .collect::<Vec<_>>();
    assert!(positions.contains(&(2, 110)));
    assert!(positions.contains(&(4, 285)));
    assert_eq!(world.ego().position(), 460);

    let grid = world.snapshot();
    assert_approx_eq!(grid.get(2, 10), 0.0);
    assert_approx_eq!(grid.get(2, 11), -10.0);
    assert_approx_eq!(grid.get(2, 14), -10.0);
    assert_approx_eq!(grid.get(4, 28), 15.0);
    assert_approx_eq!(grid.get(4, 32), 0.0);
}

#[test]
fn snapshot_matches_fresh_render() {
    let config = WorldConfig::default();
    let mut world = World::new(&config, TrafficRng::new(77)).unwrap();
    for frame in 0..200 {
        world.step();
        world.remove_exited();
        world.refill();
        if frame % 50 == 0 {
            world.update_ego(|ego| ego.set_speed(ego.speed() + 5));
        }
        let expected = render(
            world.lane_count(),
            world.height_cells(),
            world.ego(),
            world.iter_traffic().map(|(_, veh)| veh),
        );
        assert_eq!(world.snapshot(), &expected);
    }
}

#[test]
fn exited_vehicles_are_replaced_at_track_ends() {
    let config = WorldConfig {
        cars_count: 3,
        ..Default::default()
    };
    let ego = Vehicle::new(80, 3, 46);
    let slow = Vehicle::new(20, 0, 60);
    let mut world = World::from_parts(&config, ego, [slow], TrafficRng::new(5)).unwrap();

    // Falls 6 cells back per frame, leaving the track on the second frame.
    world.step();
    assert!(world.remove_exited().is_empty());
    world.step();
    let exited = world.remove_exited();
    assert_eq!(exited.len(), 1);
    assert_eq!(world.traffic_len(), 0);

    assert_eq!(world.refill(), 3);
    assert_eq!(world.traffic_len(), 3);
    for (_, veh) in world.iter_traffic() {
        let cell = veh.cell_position();
        assert!(cell == 0 || cell == config.height_cells - VEHICLE_LENGTH);
        assert!((45..85).contains(&veh.speed()), "{veh:?}");
    }
}

fn blocked_world() -> World {
    let config = WorldConfig {
        lane_count: 2,
        height_cells: 14,
        cars_count: 6,
        ..Default::default()
    };
    let ego = Vehicle::new(80, 0, 5);
    let traffic = [
        Vehicle::new(65, 0, 0),
        Vehicle::new(65, 1, 0),
        Vehicle::new(65, 0, 10),
        Vehicle::new(65, 1, 10),
    ];
    World::from_parts(&config, ego, traffic, TrafficRng::new(0)).unwrap()
}

#[test]
fn replacement_reports_no_spot() {
    let mut world = blocked_world();
    assert_eq!(world.spawn_replacement(), None);
    assert_eq!(world.refill(), 0);
    assert_eq!(world.traffic_len(), 4);
}

#[test]
fn replacement_takes_only_free_end() {
    let mut world = blocked_world();
    let id = world
        .iter_traffic()
        .find(|(_, veh)| veh.lane() == 1 && veh.cell_position() == 10)
        .map(|(id, _)| id)
        .unwrap();
    world.remove_vehicle(id);

    for _ in 0..10 {
        let veh = world.spawn_replacement().unwrap();
        assert_eq!((veh.lane(), veh.cell_position()), (1, 10));
    }
}

#[test]
fn steering_the_ego_changes_reference_speed() {
    let config = WorldConfig::default();
    let ego = Vehicle::new(80, 3, 46);
    let mut world = World::from_parts(&config, ego, [Vehicle::new(70, 2, 10)], TrafficRng::new(0)).unwrap();
    world.update_ego(|ego| {
        ego.set_speed(60);
        ego.set_lane(4);
    });
    assert_eq!(world.ego().lane(), 4);
    assert_approx_eq!(world.snapshot().get(2, 10), 10.0);
    assert!(world.is_ego_inside());
}

#[test]
fn huge_retry_factor_still_populates() {
    let config = WorldConfig {
        spawn_retry_factor: usize::MAX / 2,
        ..Default::default()
    };
    let world = World::new(&config, TrafficRng::new(0)).unwrap();
    assert_eq!(world.traffic_len(), config.cars_count);
}

/// Replacements are only checked against traffic, so on a short track the
/// rear edge can land on the ego vehicle's row.
#[test]
fn replacement_ignores_ego() {
    let config = WorldConfig {
        lane_count: 1,
        height_cells: 20,
        cars_count: 2,
        ..Default::default()
    };
    let ego = Vehicle::new(80, 0, 2 * 20 / 3);
    let front = Vehicle::new(65, 0, 0);
    let mut world = World::from_parts(&config, ego, [front], TrafficRng::new(0)).unwrap();

    let veh = world.spawn_replacement().unwrap();
    assert_eq!(veh.cell_position(), 20 - VEHICLE_LENGTH);
    assert!(veh.overlaps(world.ego(), 0));
}
