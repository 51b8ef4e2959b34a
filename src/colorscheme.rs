/*
 *  colorscheme.rs
 *
 *  ProbeStrip - scrolling heat-strip display for neural probes
 *  (c) 2020-26 Stuart Hunter
 *
 *  Normalized-scalar to color lookup with selectable schemes
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use embedded_graphics::pixelcolor::Rgb888;
use serde::{Deserialize, Serialize};

// Anchor points, evenly spaced over [0,1]. Five per scheme keeps the
// midpoint an exact anchor.
const INFERNO: [(u8, u8, u8); 5] =
    [(0, 0, 4), (87, 16, 110), (188, 55, 84), (249, 142, 9), (252, 255, 164)];
const VIRIDIS: [(u8, u8, u8); 5] =
    [(68, 1, 84), (59, 82, 139), (33, 145, 140), (94, 201, 98), (253, 231, 37)];
const PLASMA: [(u8, u8, u8); 5] =
    [(13, 8, 135), (126, 3, 168), (204, 71, 120), (248, 149, 64), (240, 249, 33)];
const GREYS: [(u8, u8, u8); 5] =
    [(0, 0, 0), (64, 64, 64), (128, 128, 128), (191, 191, 191), (255, 255, 255)];

/// Color scheme used to map a normalized scalar onto the heat strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorScheme {
    Inferno,
    Viridis,
    Plasma,
    Greys,
}

impl Default for ColorScheme {
    fn default() -> Self {
        ColorScheme::Inferno
    }
}

impl ColorScheme {
    fn anchors(&self) -> &'static [(u8, u8, u8)] {
        match self {
            ColorScheme::Inferno => &INFERNO,
            ColorScheme::Viridis => &VIRIDIS,
            ColorScheme::Plasma => &PLASMA,
            ColorScheme::Greys => &GREYS,
        }
    }

    /// Map a normalized value to a color.
    ///
    /// Input is clamped to [0,1]; values the normalization produced outside
    /// the configured bounds saturate at the scheme's endpoints.
    pub fn color_for(&self, normalized: f32) -> Rgb888 {
        let anchors = self.anchors();
        let t = if normalized.is_finite() { normalized.clamp(0.0, 1.0) } else { 0.0 };

        let span = (anchors.len() - 1) as f32;
        let pos = t * span;
        let i = (pos.floor() as usize).min(anchors.len() - 2);
        let frac = pos - i as f32;

        let (r0, g0, b0) = anchors[i];
        let (r1, g1, b1) = anchors[i + 1];
        let lerp = |a: u8, b: u8| -> u8 {
            (a as f32 + (b as f32 - a as f32) * frac).round() as u8
        };

        Rgb888::new(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::prelude::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(ColorScheme::Inferno.color_for(0.0), Rgb888::new(0, 0, 4));
        assert_eq!(ColorScheme::Inferno.color_for(1.0), Rgb888::new(252, 255, 164));
    }

    #[test]
    fn test_midpoint_is_exact_anchor() {
        assert_eq!(ColorScheme::Inferno.color_for(0.5), Rgb888::new(188, 55, 84));
        assert_eq!(ColorScheme::Greys.color_for(0.5), Rgb888::new(128, 128, 128));
    }

    #[test]
    fn test_out_of_range_saturates() {
        assert_eq!(
            ColorScheme::Viridis.color_for(-3.0),
            ColorScheme::Viridis.color_for(0.0)
        );
        assert_eq!(
            ColorScheme::Viridis.color_for(42.0),
            ColorScheme::Viridis.color_for(1.0)
        );
        assert_eq!(
            ColorScheme::Viridis.color_for(f32::NAN),
            ColorScheme::Viridis.color_for(0.0)
        );
    }

    #[test]
    fn test_interpolation_is_monotonic_in_luma() {
        // Greys is a pure ramp, so luma must never decrease.
        let mut last = 0u32;
        for step in 0..=100 {
            let c = ColorScheme::Greys.color_for(step as f32 / 100.0);
            let luma = c.r() as u32 + c.g() as u32 + c.b() as u32;
            assert!(luma >= last);
            last = luma;
        }
    }
}
