//! Raw per-probe tallies, collapsed into a [`GridField`] by a normalizer.

use crate::GridField;

/// Unbounded accumulation buffer paired with a [`GridField`].
///
/// Values only grow: probes add a positive delta to every cell they cross.
/// The buffer is zeroed at creation and never cleared afterwards, so later
/// normalization passes see the full history of hits.
#[derive(Clone, Debug)]
pub struct AccumulationBuffer {
    width:  usize,
    height: usize,
    values: Vec<f32>,
    /// Number of probe events recorded (one per cast probe).
    events: u64,
}

impl AccumulationBuffer {
    /// A zeroed buffer with the same dimensions as `field`.
    pub fn for_field(field: &GridField) -> Self {
        Self {
            width:  field.width(),
            height: field.height(),
            values: vec![0.0; field.len()],
            events: 0,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Add `delta` to cell `(x, y)`.  Out-of-grid cells are ignored and
    /// reported with `false`.
    #[inline]
    pub fn add(&mut self, x: i32, y: i32, delta: f32) -> bool {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return false;
        }
        self.values[y as usize * self.width + x as usize] += delta;
        true
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<f32> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(self.values[y as usize * self.width + x as usize])
    }

    /// Count one probe event.
    #[inline]
    pub fn record_event(&mut self) {
        self.events += 1;
    }

    #[inline]
    pub fn events(&self) -> u64 {
        self.events
    }

    /// Sum of all tallies.
    pub fn total(&self) -> f64 {
        self.values.iter().map(|&v| v as f64).sum()
    }
}
