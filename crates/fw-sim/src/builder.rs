//! Fluent builder for constructing a [`Sim`].

use glam::Vec3;
use tracing::{error, warn};

use fw_agent::{AgentRngs, AgentStore};
use fw_core::{AgentId, MapId, SimConfig, SimRng};
use fw_field::GridSpec;
use fw_probe::{ProbeConfig, RayMap};
use fw_spatial::{NavSurface, SceneQuery};
use fw_territory::{TerritorialCostField, TerritoryConfig};
use fw_wander::{DestinationSelector, PerceptionSource, WanderConfig};

use crate::{Sim, SimContext, SimError, SimResult, TerritoryLayer};

/// One probe map to register, in scenario form.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapSetup {
    pub name:   String,
    pub grid:   GridSpec,
    #[cfg_attr(feature = "serde", serde(default))]
    pub probe:  ProbeConfig,
    /// Scoring weight of this map's value.
    pub weight: f32,
    /// Start the probe walk here instead of at the field centre.
    #[cfg_attr(feature = "serde", serde(default))]
    pub probe_origin: Option<Vec3>,
}

/// The territorial cost field, in scenario form.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerritorySetup {
    pub grid:               GridSpec,
    #[cfg_attr(feature = "serde", serde(default))]
    pub shape:              TerritoryConfig,
    pub base_cost:          f32,
    pub out_of_bounds_cost: f32,
    pub weight:             f32,
}

/// Fluent builder for [`Sim<S, N>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: total ticks, seed, tick duration, …
/// - [`AgentStore`] + [`AgentRngs`]: from [`fw_agent::AgentStoreBuilder`]
/// - `S: SceneQuery`: colliders for probes and line of sight
/// - `N: NavSurface`: sampling and path queries
///
/// # Optional inputs (have defaults)
///
/// | Method                   | Default                       |
/// |--------------------------|-------------------------------|
/// | `.wander(c)`             | `WanderConfig::default()`     |
/// | `.map(setup)`            | no probe maps                 |
/// | `.territory(setup)`      | no territorial cost field     |
/// | `.perception(source)`    | no perception sources         |
///
/// # Example
///
/// ```rust,ignore
/// let (store, rngs) = AgentStoreBuilder::new(seed).agents(poses).build()?;
/// let mut sim = SimBuilder::new(config, store, rngs, scene, nav)
///     .map(MapSetup { name: "visibility".into(), grid, probe, weight: 1.0, probe_origin: None })
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<S: SceneQuery, N: NavSurface> {
    config:     SimConfig,
    agents:     AgentStore,
    rngs:       AgentRngs,
    scene:      S,
    nav:        Option<N>,
    wander:     WanderConfig,
    maps:       Vec<MapSetup>,
    territory:  Option<TerritorySetup>,
    perception: Vec<Box<dyn PerceptionSource>>,
}

impl<S: SceneQuery, N: NavSurface> SimBuilder<S, N> {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, agents: AgentStore, rngs: AgentRngs, scene: S, nav: N) -> Self {
        Self {
            config,
            agents,
            rngs,
            scene,
            nav: Some(nav),
            wander: WanderConfig::default(),
            maps: Vec::new(),
            territory: None,
            perception: Vec::new(),
        }
    }

    pub fn wander(mut self, wander: WanderConfig) -> Self {
        self.wander = wander;
        self
    }

    /// Register a probe map.  Maps get `MapId`s in registration order.
    pub fn map(mut self, setup: MapSetup) -> Self {
        self.maps.push(setup);
        self
    }

    pub fn maps(mut self, setups: impl IntoIterator<Item = MapSetup>) -> Self {
        self.maps.extend(setups);
        self
    }

    pub fn territory(mut self, setup: TerritorySetup) -> Self {
        self.territory = Some(setup);
        self
    }

    pub fn perception(mut self, source: impl PerceptionSource + 'static) -> Self {
        self.perception.push(Box::new(source));
        self
    }

    /// Start without a navigation surface.  Agents stand still until one is
    /// installed in [`Sim::nav`].
    pub fn without_navigation(mut self) -> Self {
        self.nav = None;
        self
    }

    /// Validate inputs, build the maps and territory, and return a
    /// ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<S, N>> {
        self.config
            .validate()
            .inspect_err(|e| error!(error = %e, "invalid simulation configuration"))?;
        self.wander.validate()?;

        let agent_count = self.agents.count;
        if self.rngs.len() != agent_count {
            return Err(SimError::AgentCountMismatch {
                expected: agent_count,
                got:      self.rngs.len(),
                what:     "agent RNGs",
            });
        }

        // ── Probe maps, one RNG stream each ───────────────────────────────
        let mut root = SimRng::new(self.config.seed);
        let mut maps = Vec::with_capacity(self.maps.len());
        let mut map_weights = Vec::with_capacity(self.maps.len());
        for (k, setup) in self.maps.into_iter().enumerate() {
            let id = MapId::try_from(k)
                .ok()
                .filter(|id| id.is_valid())
                .ok_or_else(|| SimError::Config(format!("too many probe maps ({k})")))?;
            let mut map = RayMap::new(id, setup.name, &setup.grid, setup.probe, root.child(k as u64))?;
            if let Some(origin) = setup.probe_origin {
                map = map.with_probe_origin(origin);
            }
            maps.push(map);
            map_weights.push(setup.weight);
        }

        let territory = match self.territory {
            None => None,
            Some(setup) => {
                setup.shape.validate()?;
                let field = TerritorialCostField::new(&setup.grid, setup.base_cost, setup.out_of_bounds_cost)?;
                Some(TerritoryLayer { field, config: setup.shape, weight: setup.weight })
            }
        };

        if self.nav.is_none() {
            warn!("no navigation surface; agents will not pick destinations");
        }

        let selectors = (0..agent_count).map(|_| DestinationSelector::new(&self.wander)).collect();
        let first_free = AgentId::try_from(agent_count)
            .map_err(|_| SimError::Config(format!("agent count {agent_count} exceeds id range")))?;

        Ok(Sim {
            clock: self.config.make_clock(),
            config: self.config,
            agents: self.agents,
            rngs: self.rngs,
            selectors,
            wander: self.wander,
            maps,
            map_weights,
            territory,
            scene: self.scene,
            nav: self.nav,
            perception: self.perception,
            context: SimContext::new(first_free),
        })
    }
}
