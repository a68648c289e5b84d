//! Read-only sampling seam between fields and the agents that consult them.

use fw_core::AgentId;
use glam::Vec3;

use crate::GridField;

/// Anything an agent can sample by world position.
///
/// `agent` identifies the caller so sources that depend on who is asking
/// (a territorial cost field excludes the caller's own territory) can answer
/// correctly.  Plain grids ignore it.
pub trait FieldSource {
    fn sample(&self, pos: Vec3, agent: AgentId) -> f32;
}

impl FieldSource for GridField {
    #[inline]
    fn sample(&self, pos: Vec3, _agent: AgentId) -> f32 {
        self.value_at_world(pos)
    }
}

impl<T: FieldSource + ?Sized> FieldSource for &T {
    #[inline]
    fn sample(&self, pos: Vec3, agent: AgentId) -> f32 {
        (**self).sample(pos, agent)
    }
}
