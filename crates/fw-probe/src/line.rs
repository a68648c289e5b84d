//! Discretised line walk across a field grid.

use glam::Vec2;

/// Cells visited walking from `from` to `to` (fractional grid coordinates)
/// in unit steps, both endpoints included.
///
/// The walk takes `ceil(|to - from|)` equal steps, so a diagonal line may
/// land in the same cell on consecutive steps.  With `collapse` set those
/// repeats are skipped; otherwise each step yields its cell.
#[derive(Clone, Debug)]
pub struct LineCells {
    from:     Vec2,
    step:     Vec2,
    steps:    u32,
    next:     u32,
    collapse: bool,
    last:     Option<(i32, i32)>,
}

impl LineCells {
    pub fn new(from: Vec2, to: Vec2, collapse: bool) -> Self {
        let delta = to - from;
        let steps = delta.length().ceil().max(0.0) as u32;
        let step = if steps == 0 { Vec2::ZERO } else { delta / steps as f32 };
        Self { from, step, steps, next: 0, collapse, last: None }
    }
}

impl Iterator for LineCells {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<(i32, i32)> {
        while self.next <= self.steps {
            let p = self.from + self.step * self.next as f32;
            self.next += 1;
            let cell = (p.x.floor() as i32, p.y.floor() as i32);
            if self.collapse && self.last == Some(cell) {
                continue;
            }
            self.last = Some(cell);
            return Some(cell);
        }
        None
    }
}
