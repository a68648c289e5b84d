//! Fluent builder for constructing `AgentStore` + `AgentRngs` in one step.
//!
//! # Usage
//!
//! ```rust
//! use fw_agent::{AgentConfig, AgentPose, AgentStoreBuilder};
//! use fw_core::Vec3;
//!
//! let (store, rngs) = AgentStoreBuilder::new(/*seed=*/ 42)
//!     .config(AgentConfig { walk_speed: 1.1, ..AgentConfig::default() })
//!     .agent(AgentPose::new(Vec3::ZERO, 0.0))
//!     .agent(AgentPose::new(Vec3::X, 0.0))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(store.live_count(), 2);
//! assert_eq!(rngs.len(), 2);
//! ```

use crate::{AgentConfig, AgentPose, AgentResult, AgentRngs, AgentStore};
use fw_core::AgentId;

/// Fluent builder for [`AgentStore`] + [`AgentRngs`].
///
/// Initial agents receive ids `0..n` in the order they were added.
pub struct AgentStoreBuilder {
    seed:   u64,
    config: AgentConfig,
    agents: Vec<AgentPose>,
}

impl AgentStoreBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed, config: AgentConfig::default(), agents: Vec::new() }
    }

    pub fn config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    /// Spawn an agent at build time.
    pub fn agent(mut self, pose: AgentPose) -> Self {
        self.agents.push(pose);
        self
    }

    pub fn agents(mut self, poses: impl IntoIterator<Item = AgentPose>) -> Self {
        self.agents.extend(poses);
        self
    }

    /// Validate the configuration and construct `AgentStore` and `AgentRngs`.
    pub fn build(self) -> AgentResult<(AgentStore, AgentRngs)> {
        self.config.validate()?;
        let mut store = AgentStore::new(self.config);
        let mut rngs = AgentRngs::new(self.seed);
        for (i, pose) in self.agents.into_iter().enumerate() {
            let id = AgentId(i as u32);
            store.insert(id, pose)?;
            rngs.ensure(id);
        }
        Ok((store, rngs))
    }
}
