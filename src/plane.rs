/*
 *  plane.rs
 *
 *  ProbeStrip - scrolling heat-strip display for neural probes
 *  (c) 2020-25 Stuart Hunter
 *
 *  Runtime-sized RGB pixel plane backing the render tiles
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

use core::convert::Infallible;
use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// A runtime-sized RGB framebuffer for embedded-graphics.
///
/// Allocated once at construction and never resized; the scroll engine
/// reuses planes indefinitely by overwriting pixels in place.
#[derive(Debug, Clone)]
pub struct PixelPlane {
    buf: Vec<Rgb888>,
    w: usize,
    h: usize,
}

impl PixelPlane {
    pub fn new(width: u32, height: u32, fill: Rgb888) -> Self {
        let (w, h) = (width as usize, height as usize);
        Self { buf: vec![fill; w * h], w, h }
    }

    pub fn width(&self) -> usize { self.w }
    pub fn height(&self) -> usize { self.h }

    /// Immutable raw access
    pub fn as_slice(&self) -> &[Rgb888] { &self.buf }

    /// Mutable raw access (useful for pushing regions to the presentation layer)
    pub fn as_mut_slice(&mut self) -> &mut [Rgb888] { &mut self.buf }

    /// Clear to a color
    pub fn clear_color(&mut self, color: Rgb888) {
        self.buf.fill(color);
    }

    /// One full pixel row, for blitting
    pub fn row(&self, y: usize) -> &[Rgb888] {
        let base = y * self.w;
        &self.buf[base..base + self.w]
    }

    /// One full mutable pixel row, for blitting
    pub fn row_mut(&mut self, y: usize) -> &mut [Rgb888] {
        let base = y * self.w;
        &mut self.buf[base..base + self.w]
    }

    /// Read a single pixel; None if out of bounds
    pub fn get(&self, x: usize, y: usize) -> Option<Rgb888> {
        if x < self.w && y < self.h {
            Some(self.buf[y * self.w + x])
        } else {
            None
        }
    }

    /// Write one solid color into column `x` for rows `y0..y0 + rows`.
    ///
    /// Out-of-bounds coordinates are clipped, not errors; the hot render
    /// path never fails.
    pub fn fill_column(&mut self, x: usize, y0: usize, rows: usize, color: Rgb888) {
        if x >= self.w {
            return;
        }
        let end = (y0 + rows).min(self.h);
        for y in y0..end {
            self.buf[y * self.w + x] = color;
        }
    }

    /// Map (x,y) to linear index; returns None if out of bounds
    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.y >= 0 {
            let (x, y) = (p.x as usize, p.y as usize);
            if x < self.w && y < self.h {
                return Some(y * self.w + x);
            }
        }
        None
    }
}

impl OriginDimensions for PixelPlane {
    fn size(&self) -> Size {
        Size::new(self.w as u32, self.h as u32)
    }
}

impl DrawTarget for PixelPlane {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, c) in pixels {
            if let Some(i) = self.idx(p) {
                self.buf[i] = c;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.clear_color(color);
        Ok(())
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        // fast path for rectangular fills the primitives use
        let Size { width, height } = area.size;
        if width == 0 || height == 0 { return Ok(()); }
        let (x0, y0) = (area.top_left.x.max(0) as usize, area.top_left.y.max(0) as usize);
        let w = width as usize;
        let h = height as usize;

        let mut it = colors.into_iter();
        for row in 0..h {
            let base = (y0 + row) * self.w + x0;
            for col in 0..w {
                if let Some(c) = it.next() {
                    let i = base + col;
                    if i < self.buf.len() { self.buf[i] = c; }
                } else {
                    return Ok(());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_column_writes_requested_rows() {
        let mut plane = PixelPlane::new(8, 8, Rgb888::new(0, 0, 0));
        let red = Rgb888::new(255, 0, 0);
        plane.fill_column(3, 2, 4, red);

        for y in 0..8 {
            let expected = if (2..6).contains(&y) { red } else { Rgb888::new(0, 0, 0) };
            assert_eq!(plane.get(3, y), Some(expected));
        }
        // neighboring column untouched
        assert_eq!(plane.get(4, 3), Some(Rgb888::new(0, 0, 0)));
    }

    #[test]
    fn test_fill_column_clips_out_of_bounds() {
        let mut plane = PixelPlane::new(4, 4, Rgb888::new(0, 0, 0));
        let c = Rgb888::new(1, 2, 3);
        plane.fill_column(9, 0, 4, c);
        plane.fill_column(0, 2, 100, c);
        assert_eq!(plane.get(0, 3), Some(c));
        assert_eq!(plane.get(0, 1), Some(Rgb888::new(0, 0, 0)));
    }

    #[test]
    fn test_row_access_matches_set_pixels() {
        let mut plane = PixelPlane::new(4, 2, Rgb888::new(0, 0, 0));
        let c = Rgb888::new(9, 9, 9);
        plane.row_mut(1)[2] = c;
        assert_eq!(plane.get(2, 1), Some(c));
        assert_eq!(plane.row(1)[2], c);
    }
}
