//! Field snapshots handed to sinks, and the metadata row written alongside
//! every saved field.

use fw_core::Tick;
use fw_field::GridField;
use fw_probe::RayMap;

/// A borrowed view of one field at one tick.
#[derive(Clone, Copy, Debug)]
pub struct FieldSnapshot<'a> {
    pub name:        &'a str,
    pub tick:        Tick,
    pub field:       &'a GridField,
    /// Change signal of the latest normalization pass, if one was measured.
    pub mean_change: Option<f32>,
    pub converged:   bool,
}

impl<'a> FieldSnapshot<'a> {
    /// Snapshot a bare field with no convergence information.
    pub fn new(name: &'a str, tick: Tick, field: &'a GridField) -> Self {
        Self { name, tick, field, mean_change: None, converged: false }
    }

    /// Snapshot a probe map's published field.
    pub fn of_map(map: &'a RayMap, tick: Tick) -> Self {
        let c = map.convergence();
        Self {
            name:        map.name(),
            tick,
            field:       map.field(),
            mean_change: (c.mean_change != f32::MAX).then_some(c.mean_change),
            converged:   c.has_converged,
        }
    }

    /// File-system friendly stem: the name with anything outside
    /// `[A-Za-z0-9_-]` replaced, then the tick.
    pub fn file_stem(&self) -> String {
        let name: String = self
            .name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        format!("{name}_t{}", self.tick.0)
    }

    /// Row-major `(x, y, value)` triples, `y` outer.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32, f32)> + '_ {
        let w = self.field.width();
        self.field
            .values()
            .iter()
            .enumerate()
            .map(move |(i, &v)| ((i % w) as u32, (i / w) as u32, v))
    }
}

/// Grid layout and convergence state of one saved field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMetaRow {
    pub map:         String,
    pub tick:        u64,
    pub width:       u32,
    pub height:      u32,
    pub cell_size:   f32,
    pub origin_x:    f32,
    pub origin_y:    f32,
    pub origin_z:    f32,
    pub mean_change: Option<f32>,
    pub converged:   bool,
}

impl From<&FieldSnapshot<'_>> for FieldMetaRow {
    fn from(s: &FieldSnapshot<'_>) -> Self {
        let origin = s.field.origin();
        Self {
            map:         s.name.to_owned(),
            tick:        s.tick.0,
            width:       s.field.width() as u32,
            height:      s.field.height() as u32,
            cell_size:   s.field.cell_size(),
            origin_x:    origin.x,
            origin_y:    origin.y,
            origin_z:    origin.z,
            mean_change: s.mean_change,
            converged:   s.converged,
        }
    }
}
