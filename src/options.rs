/*
 *  options.rs
 *
 *  ProbeStrip - scrolling heat-strip display for neural probes
 *  (c) 2020-26 Stuart Hunter
 *
 *  Per-mode normalization bounds and active mode/scheme selection
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

use crate::colorscheme::ColorScheme;
use crate::tile::RenderMode;

/// User-configured normalization range for one render mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub low: f32,
    pub spread: f32,
}

impl Bounds {
    pub fn new(low: f32, spread: f32) -> Self {
        Self { low, spread }
    }

    /// Normalize a raw scalar against these bounds.
    ///
    /// A spread of 0 is treated as 1 so a collapsed range never divides
    /// by zero. The result is not clamped here; the color lookup saturates.
    #[inline]
    pub fn normalized(&self, value: f32) -> f32 {
        let spread = if self.spread == 0.0 { 1.0 } else { self.spread };
        (value - self.low) / spread
    }
}

/// Scaling bounds and display selection shared by every channel renderer.
///
/// The canvas owns one of these; channels read it through the paint context
/// each column, so a settings change takes effect on the next painted pixel.
#[derive(Debug, Clone)]
pub struct OptionsState {
    bounds: [Bounds; 3],
    render_mode: RenderMode,
    color_scheme: ColorScheme,
}

impl Default for OptionsState {
    fn default() -> Self {
        Self {
            // RMS in uV, spike rate in Hz, FFT band power in dB
            bounds: [
                Bounds::new(0.0, 100.0),
                Bounds::new(0.0, 30.0),
                Bounds::new(0.0, 60.0),
            ],
            render_mode: RenderMode::Rms,
            color_scheme: ColorScheme::default(),
        }
    }
}

impl OptionsState {
    pub fn new(bounds: [Bounds; 3], render_mode: RenderMode, color_scheme: ColorScheme) -> Self {
        Self { bounds, render_mode, color_scheme }
    }

    pub fn bounds(&self, mode: RenderMode) -> Bounds {
        self.bounds[mode.index()]
    }

    pub fn set_bounds(&mut self, mode: RenderMode, bounds: Bounds) {
        self.bounds[mode.index()] = bounds;
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.render_mode = mode;
    }

    pub fn color_scheme(&self) -> ColorScheme {
        self.color_scheme
    }

    pub fn set_color_scheme(&mut self, scheme: ColorScheme) {
        self.color_scheme = scheme;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization_is_monotonic() {
        let b = Bounds::new(10.0, 40.0);
        let mut last = f32::NEG_INFINITY;
        for v in [-5.0, 0.0, 10.0, 25.0, 50.0, 100.0] {
            let n = b.normalized(v);
            assert!(n >= last);
            last = n;
        }
    }

    #[test]
    fn test_zero_spread_behaves_as_one() {
        let zero = Bounds::new(2.0, 0.0);
        let one = Bounds::new(2.0, 1.0);
        for v in [-1.0, 0.0, 2.0, 2.5, 10.0] {
            assert_eq!(zero.normalized(v), one.normalized(v));
        }
    }

    #[test]
    fn test_per_mode_bounds_are_independent() {
        let mut opts = OptionsState::default();
        opts.set_bounds(RenderMode::SpikeRate, Bounds::new(5.0, 10.0));
        assert_eq!(opts.bounds(RenderMode::SpikeRate), Bounds::new(5.0, 10.0));
        assert_ne!(opts.bounds(RenderMode::Rms), Bounds::new(5.0, 10.0));
    }
}
