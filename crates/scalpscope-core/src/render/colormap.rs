//! Colormaps for scalp map rendering

use serde::{Deserialize, Serialize};

/// Colormap used to turn normalized map values into pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    /// Diverging blue-white-red for signed potentials
    #[default]
    CoolWarm,
    /// Perceptually uniform, good for scientific data
    Viridis,
    /// Purple to yellow, perceptually uniform
    Plasma,
}

impl Colormap {
    /// Parse a host-supplied colormap name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "coolwarm" => Some(Self::CoolWarm),
            "viridis" => Some(Self::Viridis),
            "plasma" => Some(Self::Plasma),
            _ => None,
        }
    }

    /// Sample the colormap at parameter `t` (0.0 to 1.0).
    #[must_use]
    pub fn sample(self, t: f64) -> [u8; 4] {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::CoolWarm => sample_coolwarm(t),
            Self::Viridis => quad_bezier(t, [68.0, 1.0, 84.0], [33.0, 145.0, 140.0], [253.0, 231.0, 37.0]),
            Self::Plasma => quad_bezier(t, [13.0, 8.0, 135.0], [204.0, 71.0, 120.0], [240.0, 249.0, 33.0]),
        }
    }
}

/// Blue (0) -> near-white (0.5) -> red (1)
fn sample_coolwarm(t: f64) -> [u8; 4] {
    const LOW: [f64; 3] = [59.0, 76.0, 192.0];
    const MID: [f64; 3] = [245.0, 245.0, 245.0];
    const HIGH: [f64; 3] = [180.0, 4.0, 38.0];

    let (from, to, s) = if t < 0.5 {
        (LOW, MID, t * 2.0)
    } else {
        (MID, HIGH, (t - 0.5) * 2.0)
    };
    [
        lerp_u8(from[0], to[0], s),
        lerp_u8(from[1], to[1], s),
        lerp_u8(from[2], to[2], s),
        255,
    ]
}

/// Quadratic Bezier through the endpoint anchors with `mid` as control.
fn quad_bezier(t: f64, start: [f64; 3], mid: [f64; 3], end: [f64; 3]) -> [u8; 4] {
    let channel = |i: usize| {
        let v = (1.0 - t) * (1.0 - t) * start[i] + 2.0 * t * (1.0 - t) * mid[i] + t * t * end[i];
        v.clamp(0.0, 255.0) as u8
    };
    [channel(0), channel(1), channel(2), 255]
}

fn lerp_u8(from: f64, to: f64, s: f64) -> u8 {
    (from + (to - from) * s).clamp(0.0, 255.0) as u8
}
