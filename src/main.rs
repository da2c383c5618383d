use std::time::Instant;

use deep_traffic::{TrafficRng, World, WorldConfig};

fn main() {
    let config = WorldConfig::default();
    let mut world = match World::new(&config, TrafficRng::new(0)) {
        Ok(world) => world,
        Err(err) => {
            eprintln!("Failed to create world: {err}");
            std::process::exit(1);
        }
    };

    println!("Simulating...");
    const NUM_FRAMES: u32 = 100_000;
    let start = Instant::now();
    let mut refilled = 0;
    for _ in 0..NUM_FRAMES {
        world.step();
        world.remove_exited();
        refilled += world.refill();
    }
    let frame = start.elapsed() / NUM_FRAMES;
    println!(
        "Avg. frame: {:?} ({} vehs on track, {} spawned, ego inside: {})",
        frame,
        world.traffic_len(),
        refilled,
        world.is_ego_inside(),
    );
}
