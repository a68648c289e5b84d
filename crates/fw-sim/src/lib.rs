//! `fw-sim`: tick loop orchestrator for the fieldwalk framework.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Maps       RayMap::tick: probe under budget, or resume a
//!                 normalization pass; convergence is broadcast once.
//!   ② Territory  ellipse per live agent from its pose; repaint.
//!   ③ Agents     ascending AgentId:
//!                   needs_pick → DestinationSelector::select
//!                              → NavSurface::calculate_path → PathFollower
//!                   PathFollower::advance; arrival ends a retreat.
//!   ④ Crowding   R-tree neighbour count within crowding_radius.
//! ```
//!
//! Everything runs on the caller's thread.  Long work inside a tick is
//! bounded by each map's `WorkBudget`.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use fw_agent::AgentStoreBuilder;
//! use fw_core::SimConfig;
//! use fw_sim::{NoopObserver, SimBuilder};
//!
//! let (store, rngs) = AgentStoreBuilder::new(42).agents(poses).build()?;
//! let mut sim = SimBuilder::new(config, store, rngs, scene, nav).build()?;
//! sim.context.subscribe(|tick, event| println!("{tick}: {event:?}"));
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod observer;
pub mod sim;


pub use builder::{MapSetup, SimBuilder, TerritorySetup};
pub use context::{SimContext, SimEvent, Subscription};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver, TickReport};
pub use sim::{Sim, TerritoryLayer};
