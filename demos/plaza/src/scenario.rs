//! JSON scenario description and the sim it builds.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use fw_agent::{AgentConfig, AgentPose, AgentStoreBuilder};
use fw_core::{SimConfig, WorldRect};
use fw_sim::{MapSetup, Sim, SimBuilder, TerritorySetup};
use fw_spatial::{BoxScene, GridNavSurface, SceneBox};
use fw_wander::{PointOfInterest, PointsOfInterest, WanderConfig};

#[derive(Debug, Deserialize)]
pub struct Walls {
    pub height:    f32,
    pub thickness: f32,
}

#[derive(Debug, Deserialize)]
pub struct NavSetup {
    pub cell_size:    f32,
    pub agent_radius: f32,
    pub clearance:    f32,
}

impl Default for NavSetup {
    fn default() -> Self {
        Self { cell_size: 0.5, agent_radius: 0.3, clearance: 1.8 }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputSetup {
    pub dir:                PathBuf,
    /// Simulated seconds between periodic saves; `0` saves on convergence only.
    pub save_interval_secs: f32,
    pub textures:           bool,
}

impl Default for OutputSetup {
    fn default() -> Self {
        Self { dir: PathBuf::from("output/plaza"), save_interval_secs: 0.0, textures: true }
    }
}

#[derive(Debug, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub sim:                SimConfig,
    /// Walkable ground-plane extent.
    pub area:               WorldRect,
    pub walls:              Option<Walls>,
    #[serde(default)]
    pub obstacles:          Vec<SceneBox>,
    #[serde(default)]
    pub nav:                NavSetup,
    #[serde(default)]
    pub agent:              AgentConfig,
    pub agents:             Vec<AgentPose>,
    #[serde(default)]
    pub wander:             WanderConfig,
    #[serde(default)]
    pub maps:               Vec<MapSetup>,
    pub territory:          Option<TerritorySetup>,
    #[serde(default)]
    pub points_of_interest: Vec<PointOfInterest>,
    /// Upper bound on the paused convergence phase, in ticks.
    #[serde(default)]
    pub warmup_ticks:       u64,
    #[serde(default)]
    pub output:             OutputSetup,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing scenario {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn scene(&self) -> BoxScene {
        let mut scene = match &self.walls {
            Some(w) => BoxScene::new().with_walls(self.area, 0.0, w.height, w.thickness),
            None => BoxScene::new(),
        };
        for b in &self.obstacles {
            scene.add(*b);
        }
        scene
    }

    /// Build the simulation.  Every agent starts paused so the maps can
    /// converge before anyone walks.
    pub fn build(&self) -> Result<Sim<BoxScene, GridNavSurface>> {
        let scene = self.scene();
        let nav = GridNavSurface::from_scene(
            &scene,
            self.area,
            0.0,
            self.nav.cell_size,
            self.nav.agent_radius,
            self.nav.clearance,
        )?;
        let (mut agents, rngs) = AgentStoreBuilder::new(self.sim.seed)
            .config(self.agent.clone())
            .agents(self.agents.iter().copied())
            .build()?;
        for state in &mut agents.nav {
            state.paused = true;
        }

        let mut builder = SimBuilder::new(self.sim.clone(), agents, rngs, scene, nav)
            .wander(self.wander.clone())
            .maps(self.maps.iter().cloned());
        if let Some(t) = &self.territory {
            builder = builder.territory(t.clone());
        }
        if !self.points_of_interest.is_empty() {
            builder = builder.perception(PointsOfInterest { points: self.points_of_interest.clone() });
        }
        Ok(builder.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUNDLED: &str = include_str!("../scenario.json");

    #[test]
    fn bundled_scenario_builds_with_paused_agents() {
        let scenario = Scenario::parse(BUNDLED).unwrap();
        assert_eq!(scenario.agents.len(), 4);
        assert_eq!(scenario.output.save_interval_secs, 30.0);

        let sim = scenario.build().unwrap();
        assert_eq!(sim.maps.len(), 2);
        assert_eq!(sim.map_named("space").map(|m| m.id().0), Some(1));
        assert!(sim.territory.is_some());
        assert_eq!(sim.perception.len(), 1);
        assert!(sim.agents.nav.iter().all(|n| n.paused));
    }

    #[test]
    fn minimal_scenario_uses_defaults() {
        let scenario = Scenario::parse(
            r#"{ "area": { "min": [-2.0, -2.0], "max": [2.0, 2.0] }, "agents": [] }"#,
        )
        .unwrap();
        assert!(scenario.walls.is_none());
        assert!(scenario.maps.is_empty());
        assert_eq!(scenario.output.dir, PathBuf::from("output/plaza"));
        assert!(scenario.build().unwrap().agents.is_empty());
    }
}
