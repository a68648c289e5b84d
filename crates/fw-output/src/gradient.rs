//! Colour ramps used to render fields as textures.

use crate::{OutputError, OutputResult};

/// One colour stop: RGBA at a position along the ramp.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColorStop {
    pub position: f32,
    pub color:    [u8; 4],
}

impl ColorStop {
    pub const fn new(position: f32, color: [u8; 4]) -> Self {
        Self { position, color }
    }
}

/// A piecewise-linear colour ramp.  Stops are kept sorted by position;
/// values before the first or after the last stop take that stop's colour.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<ColorStop>", into = "Vec<ColorStop>")
)]
pub struct Gradient {
    stops: Vec<ColorStop>,
}

impl Gradient {
    /// Build a ramp from at least one stop with finite positions.
    pub fn new(mut stops: Vec<ColorStop>) -> OutputResult<Self> {
        if stops.is_empty() {
            return Err(OutputError::Gradient("at least one colour stop is required".into()));
        }
        if let Some(bad) = stops.iter().find(|s| !s.position.is_finite()) {
            return Err(OutputError::Gradient(format!("stop position {} is not finite", bad.position)));
        }
        stops.sort_by(|a, b| a.position.total_cmp(&b.position));
        Ok(Self { stops })
    }

    /// Black at 0, white at 1.
    pub fn grayscale() -> Self {
        Self {
            stops: vec![ColorStop::new(0.0, [0, 0, 0, 255]), ColorStop::new(1.0, [255, 255, 255, 255])],
        }
    }

    /// Blue, cyan, green, yellow, red.
    pub fn heat() -> Self {
        Self {
            stops: vec![
                ColorStop::new(0.00, [0, 0, 255, 255]),
                ColorStop::new(0.25, [0, 255, 255, 255]),
                ColorStop::new(0.50, [0, 255, 0, 255]),
                ColorStop::new(0.75, [255, 255, 0, 255]),
                ColorStop::new(1.00, [255, 0, 0, 255]),
            ],
        }
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Colour at `t`.  NaN samples the first stop.
    pub fn sample(&self, t: f32) -> [u8; 4] {
        let t = if t.is_nan() { f32::NEG_INFINITY } else { t };
        let first = self.stops[0];
        if t <= first.position {
            return first.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.position {
                let span = b.position - a.position;
                let f = if span > 0.0 { (t - a.position) / span } else { 1.0 };
                return lerp_color(a.color, b.color, f);
            }
        }
        self.stops[self.stops.len() - 1].color
    }
}

impl Default for Gradient {
    fn default() -> Self {
        Self::heat()
    }
}

impl TryFrom<Vec<ColorStop>> for Gradient {
    type Error = OutputError;

    fn try_from(stops: Vec<ColorStop>) -> OutputResult<Self> {
        Self::new(stops)
    }
}

impl From<Gradient> for Vec<ColorStop> {
    fn from(g: Gradient) -> Self {
        g.stops
    }
}

fn lerp_color(a: [u8; 4], b: [u8; 4], f: f32) -> [u8; 4] {
    let mut out = [0u8; 4];
    for (o, (&x, &y)) in out.iter_mut().zip(a.iter().zip(&b)) {
        *o = (x as f32 + (y as f32 - x as f32) * f).round().clamp(0.0, 255.0) as u8;
    }
    out
}
