//! plaza: walled square with two probe maps and a handful of wanderers.
//!
//! Phase 1 keeps every agent paused while the visibility and space maps
//! probe the scene until they converge (or `warmup_ticks` runs out).
//! Phase 2 releases the agents, which pick destinations from the converged
//! fields, the territorial cost field and the points of interest.
//!
//! Fields are written to the scenario's output directory as CSV plus PNG
//! textures, once at convergence and periodically afterwards.
//!
//! ```text
//! RUST_LOG=debug cargo run -p plaza -- demos/plaza/scenario.json
//! ```

mod scenario;

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

use anyhow::Result;
use tracing::{info, warn};

use fw_output::{CsvSink, Gradient, PersistenceObserver};
use fw_sim::SimEvent;

use scenario::Scenario;

const DEFAULT_SCENARIO: &str = "demos/plaza/scenario.json";

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn main() -> Result<()> {
    init_tracing();

    let path = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| DEFAULT_SCENARIO.into());
    let scenario = Scenario::load(&path)?;
    info!(
        scenario = %path.display(),
        agents = scenario.agents.len(),
        maps = scenario.maps.len(),
        ticks = scenario.sim.total_ticks,
        "loaded scenario"
    );

    // 1. Build sim.
    let mut sim = scenario.build()?;

    let picks = Rc::new(Cell::new(0u64));
    let walk_backs = Rc::new(Cell::new(0u64));
    {
        let (picks, walk_backs) = (Rc::clone(&picks), Rc::clone(&walk_backs));
        sim.context.subscribe(move |_, event| {
            if let SimEvent::DestinationPicked { walk_back, .. } = event {
                picks.set(picks.get() + 1);
                if *walk_back {
                    walk_backs.set(walk_backs.get() + 1);
                }
            }
        });
    }

    // 2. Set up output.
    let sink = CsvSink::new(&scenario.output.dir)?;
    let mut obs = PersistenceObserver::new(sink).with_save_interval(scenario.output.save_interval_secs);
    if scenario.output.textures {
        obs = obs.with_textures(Gradient::heat());
    }

    // 3. Converge with everyone standing still.
    let t0 = Instant::now();
    let warmup_end = fw_core::Tick(scenario.warmup_ticks.min(scenario.sim.total_ticks));
    while !sim.all_converged() && sim.clock.current_tick < warmup_end {
        sim.run_ticks(1, &mut obs)?;
    }
    if sim.all_converged() {
        info!(tick = %sim.clock.current_tick, "all maps converged");
    } else {
        warn!(tick = %sim.clock.current_tick, "warm-up ended before every map converged");
    }

    // 4. Release the agents and run to the end.
    let ids: Vec<_> = sim.agents.agent_ids().collect();
    for id in ids {
        sim.set_paused(id, false)?;
    }
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.take_error() {
        eprintln!("output error: {e}");
    }

    // 5. Summary.
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  simulated           : {:.1} s", sim.clock.elapsed_secs());
    println!("  destinations picked : {} ({} walk-backs)", picks.get(), walk_backs.get());
    println!("  files written       : {} in {}", obs.handles().len(), scenario.output.dir.display());
    println!();

    println!("{:<12} {:<10} {:<12}", "Map", "Converged", "Mean change");
    println!("{}", "-".repeat(36));
    for map in &sim.maps {
        let c = map.convergence();
        let change = if c.mean_change == f32::MAX { "-".to_owned() } else { format!("{:.5}", c.mean_change) };
        println!("{:<12} {:<10} {:<12}", map.name(), c.has_converged, change);
    }
    println!();

    println!("{:<8} {:<24} {:<8} {:<8}", "Agent", "Position", "Yaw", "Crowd");
    println!("{}", "-".repeat(50));
    for id in sim.agents.agent_ids() {
        let pose = sim.agents.pose[id.index()];
        println!(
            "{:<8} ({:>6.2}, {:>6.2}, {:>6.2})   {:<8.2} {:<8}",
            id,
            pose.position.x,
            pose.position.y,
            pose.position.z,
            pose.yaw,
            sim.agents.crowding[id.index()],
        );
    }

    Ok(())
}
