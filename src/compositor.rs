/*
 *  compositor.rs
 *
 *  ProbeStrip - scrolling heat-strip display for neural probes
 *  (c) 2020-26 Stuart Hunter
 *
 *  Stitches the tile ring into one contiguous scrolling frame
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

use crate::config::DisplayGeometry;
use crate::plane::PixelPlane;
use crate::scroll::TileRing;
use crate::tile::{RenderMode, RenderTile};

/// Scale factors the presentation layer applies when drawing the composed
/// frame into its viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderScale {
    pub horizontal: f32,
    pub vertical: f32,
}

/// Assembles the ring of tiles into a single scrolling image.
///
/// Owns the screen buffer (logical display width by tile height); the ring
/// is read-only during composition. New columns enter at the left edge:
/// the front tile sits at `-offset - 1`, and each earlier tile lands one
/// tile width further right, oldest furthest right / off-canvas.
pub struct Compositor {
    screen: PixelPlane,
    tile_width: u32,
    tile_height: u32,
    display_width: u32,
    max_read_sites: u32,
}

impl Compositor {
    pub fn new(geometry: &DisplayGeometry) -> Self {
        Self {
            screen: PixelPlane::new(
                geometry.display_width,
                geometry.tile_height(),
                geometry.background,
            ),
            tile_width: geometry.tile_width,
            tile_height: geometry.tile_height(),
            display_width: geometry.display_width,
            max_read_sites: geometry.max_read_sites,
        }
    }

    /// Compose the current frame for one render mode.
    ///
    /// The ring always spans at least `display_width + tile_width` pixels,
    /// so every screen column is covered and no clear is needed between
    /// frames.
    pub fn compose(&mut self, ring: &TileRing, mode: RenderMode) -> &PixelPlane {
        let tiles: Vec<&RenderTile> = ring.iter().collect();
        if tiles.is_empty() {
            return &self.screen;
        }

        // front tile, shifted left so the newest painted column lands at x=0
        let mut x = -(ring.offset() as i32) - 1;
        self.blit(tiles[tiles.len() - 1], mode, x);

        // back tiles, newest-rotated-out first, each one tile width further right
        for idx in (0..tiles.len() - 1).rev() {
            x += self.tile_width as i32;
            self.blit(tiles[idx], mode, x);
        }

        &self.screen
    }

    /// The most recently composed frame, without recomposing.
    pub fn screen(&self) -> &PixelPlane {
        &self.screen
    }

    /// Viewport scale factors: vertical maps tile rows onto the visible
    /// per-channel height, horizontal maps the logical display width onto
    /// the widget width.
    pub fn scale(&self, channel_height: f32, viewport_width: u32) -> RenderScale {
        RenderScale {
            horizontal: viewport_width as f32 / self.display_width as f32,
            vertical: (channel_height * self.max_read_sites as f32) / self.tile_height as f32,
        }
    }

    fn blit(&mut self, tile: &RenderTile, mode: RenderMode, x: i32) {
        let plane = tile.plane(mode);
        let tw = self.tile_width as i32;
        let dw = self.display_width as i32;

        let dst_x0 = x.max(0);
        let dst_x1 = (x + tw).min(dw);
        if dst_x0 >= dst_x1 {
            return;
        }
        let src_x0 = (dst_x0 - x) as usize;
        let src_x1 = (dst_x1 - x) as usize;
        let (dst_x0, dst_x1) = (dst_x0 as usize, dst_x1 as usize);

        for y in 0..self.tile_height as usize {
            self.screen.row_mut(y)[dst_x0..dst_x1]
                .copy_from_slice(&plane.row(y)[src_x0..src_x1]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> DisplayGeometry {
        DisplayGeometry {
            display_width: 128,
            tile_width: 64,
            max_read_sites: 4,
            channel_px_height: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_front_tile_newest_column_lands_at_left_edge() {
        let geo = geometry();
        let mut ring = TileRing::new(&geo).unwrap();
        let marker = embedded_graphics::pixelcolor::Rgb888::new(250, 1, 2);

        // paint the column the engine would paint at the current offset,
        // then advance, as the refresh loop does
        let x = ring.offset();
        ring.front_mut().paint_band_column(0, RenderMode::Rms, x, marker);
        ring.advance_column();

        let mut comp = Compositor::new(&geo);
        let frame = comp.compose(&ring, RenderMode::Rms);

        let band_y = 6; // site 0 band of an 8-row plane
        assert_eq!(frame.get(0, band_y), Some(marker));
        assert_eq!(frame.get(1, band_y), Some(geo.background));
    }

    #[test]
    fn test_back_tiles_extend_right_of_front() {
        let geo = geometry();
        let mut ring = TileRing::new(&geo).unwrap();
        let marker = embedded_graphics::pixelcolor::Rgb888::new(9, 200, 9);

        // fill one whole tile so a rotation occurs, marking its last column
        for step in 0..64u32 {
            let x = ring.offset();
            let color = if step == 0 { marker } else { geo.background };
            ring.front_mut().paint_band_column(0, RenderMode::Rms, x, color);
            ring.advance_column();
        }
        // the marked tile is now the back tile just behind front
        let mut comp = Compositor::new(&geo);
        let frame = comp.compose(&ring, RenderMode::Rms);

        // offset reset to 63: front spans [-64,0), previous tile [0,64);
        // its column 63 (painted at step 0) lands at screen x = 63
        assert_eq!(frame.get(63, 6), Some(marker));
    }

    #[test]
    fn test_scale_factors() {
        let geo = geometry();
        let comp = Compositor::new(&geo);
        let scale = comp.scale(10.0, 256);
        assert_eq!(scale.horizontal, 2.0);
        assert_eq!(scale.vertical, 10.0 * 4.0 / 8.0);
    }
}
