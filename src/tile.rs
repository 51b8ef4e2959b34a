/*
 *  tile.rs
 *
 *  ProbeStrip - scrolling heat-strip display for neural probes
 *  (c) 2020-26 Stuart Hunter
 *
 *  Fixed-geometry bitmap tile with per-mode planes and read-site bands
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

use crate::error::ViewerError;
use crate::plane::PixelPlane;

/// Which derived scalar stream is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderMode {
    Rms,
    SpikeRate,
    FftPower,
}

impl RenderMode {
    pub const ALL: [RenderMode; 3] =
        [RenderMode::Rms, RenderMode::SpikeRate, RenderMode::FftPower];

    /// Stable plane index for this mode.
    #[inline]
    pub fn index(&self) -> usize {
        match self {
            RenderMode::Rms => 0,
            RenderMode::SpikeRate => 1,
            RenderMode::FftPower => 2,
        }
    }
}

impl Default for RenderMode {
    fn default() -> Self {
        RenderMode::Rms
    }
}

/// One read site's horizontal band of a plane: a y offset plus height.
///
/// Bands are plain index ranges into the flat pixel buffer, computed once
/// at tile construction. Band 0 is the bottom of the plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandSpan {
    pub y: usize,
    pub height: usize,
}

/// A fixed-width bitmap segment of scroll history.
///
/// Holds three parallel planes, one per render mode, all sharing the same
/// geometry and the same read-site band partition. Tiles are allocated once
/// and reused forever by rotation; there is no resize operation.
pub struct RenderTile {
    id: u32,
    width: u32,
    height: u32,
    planes: [PixelPlane; 3],
    bands: Vec<BandSpan>,
}

impl RenderTile {
    pub fn new(
        id: u32,
        width: u32,
        height: u32,
        read_sites: u32,
        background: Rgb888,
    ) -> Result<Self, ViewerError> {
        if width == 0 || height == 0 || read_sites == 0 {
            return Err(ViewerError::Geometry(format!(
                "tile dimensions must be nonzero (got {}x{}, {} read sites)",
                width, height, read_sites
            )));
        }
        if height % read_sites != 0 {
            return Err(ViewerError::Geometry(format!(
                "tile height {} is not divisible by {} read sites",
                height, read_sites
            )));
        }

        let band_height = (height / read_sites) as usize;
        let bands = (0..read_sites)
            .map(|site| BandSpan {
                y: (height as usize) - (site as usize + 1) * band_height,
                height: band_height,
            })
            .collect();

        let plane = || PixelPlane::new(width, height, background);
        Ok(Self {
            id,
            width,
            height,
            planes: [plane(), plane(), plane()],
            bands,
        })
    }

    /// Construction-order identity, stable across rotations.
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Full-tile plane for a mode, used for compositing.
    pub fn plane(&self, mode: RenderMode) -> &PixelPlane {
        &self.planes[mode.index()]
    }

    pub fn plane_mut(&mut self, mode: RenderMode) -> &mut PixelPlane {
        &mut self.planes[mode.index()]
    }

    /// Band descriptor for a read site. Sites are validated when channels
    /// are registered, so an out-of-range site here is a caller bug.
    pub fn band(&self, read_site: usize) -> BandSpan {
        self.bands[read_site]
    }

    pub fn bands(&self) -> &[BandSpan] {
        &self.bands
    }

    /// Paint one solid vertical stripe: every row of `read_site`'s band in
    /// the `mode` plane, at pixel column `x`.
    pub fn paint_band_column(&mut self, read_site: usize, mode: RenderMode, x: u32, color: Rgb888) {
        let band = self.bands[read_site];
        self.planes[mode.index()].fill_column(x as usize, band.y, band.height, color);
    }
}
