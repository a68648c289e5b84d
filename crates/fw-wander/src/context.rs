//! Read-only world view passed to every selection cycle.

use fw_field::FieldSource;
use fw_spatial::{NavSurface, SceneQuery};

use crate::WanderConfig;

/// One scoring term: a field and the weight of its value in `goodness`.
///
/// Cost fields take a negative weight.
#[derive(Copy, Clone)]
pub struct MapTerm<'a> {
    pub source: &'a dyn FieldSource,
    pub weight: f32,
}

impl<'a> MapTerm<'a> {
    #[inline]
    pub fn new(source: &'a dyn FieldSource, weight: f32) -> Self {
        Self { source, weight }
    }
}

/// Everything a selection cycle reads but never mutates.
///
/// Built by the scheduler once per tick and shared by every agent that
/// selects during the tick.  A missing `nav` aborts selection; a missing
/// `scene` skips the line-of-sight check.
#[derive(Copy, Clone)]
pub struct WanderContext<'a> {
    pub config: &'a WanderConfig,
    pub maps:   &'a [MapTerm<'a>],
    pub nav:    Option<&'a dyn NavSurface>,
    pub scene:  Option<&'a dyn SceneQuery>,
    /// Simulated seconds since the run started.
    pub now:    f32,
}

impl<'a> WanderContext<'a> {
    #[inline]
    pub fn new(
        config: &'a WanderConfig,
        maps:   &'a [MapTerm<'a>],
        nav:    Option<&'a dyn NavSurface>,
        scene:  Option<&'a dyn SceneQuery>,
        now:    f32,
    ) -> Self {
        Self { config, maps, nav, scene, now }
    }
}
