/*
 *  scroll.rs
 *
 *  ProbeStrip - scrolling heat-strip display for neural probes
 *  (c) 2020-25 Stuart Hunter
 *
 *  Fixed-pool tile ring with sub-tile offset countdown and O(1) rotation
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

use log::debug;
use std::collections::VecDeque;

use crate::config::DisplayGeometry;
use crate::error::ViewerError;
use crate::tile::RenderTile;

/// Ordered ring of render tiles covering a fixed window of scroll history.
///
/// Tiles are ordered oldest first; the last tile is the front (the one
/// currently receiving pixel columns). The pool is allocated once and its
/// size never changes; infinite scrolling is rotation, not reallocation.
pub struct TileRing {
    tiles: VecDeque<RenderTile>,
    offset: u32,
    tile_width: u32,
}

impl TileRing {
    pub fn new(geometry: &DisplayGeometry) -> Result<Self, ViewerError> {
        let geometry = geometry.validated()?;
        let mut tiles = VecDeque::with_capacity(geometry.num_tiles());
        for id in 0..geometry.num_tiles() as u32 {
            tiles.push_back(RenderTile::new(
                id,
                geometry.tile_width,
                geometry.tile_height(),
                geometry.max_read_sites,
                geometry.background,
            )?);
        }
        Ok(Self {
            tiles,
            offset: geometry.tile_width - 1,
            tile_width: geometry.tile_width,
        })
    }

    /// Pixel columns remaining before the front tile is full.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// The tile currently being painted.
    pub fn front(&self) -> &RenderTile {
        self.tiles.back().expect("tile ring is never empty")
    }

    pub fn front_mut(&mut self) -> &mut RenderTile {
        self.tiles.back_mut().expect("tile ring is never empty")
    }

    /// Tiles oldest first, front last.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &RenderTile> {
        self.tiles.iter()
    }

    /// Advance the scroll position by one painted pixel column.
    ///
    /// Decrements the offset; when it would go below zero the offset resets
    /// to `tile_width - 1` and the oldest tile rotates around to become the
    /// new front. The rotated tile keeps its stale pixels; painting
    /// overwrites them column by column. Returns true when a rotation
    /// occurred.
    pub fn advance_column(&mut self) -> bool {
        if self.offset == 0 {
            self.offset = self.tile_width - 1;
            if let Some(oldest) = self.tiles.pop_front() {
                debug!("rotating tile {} to front", oldest.id());
                self.tiles.push_back(oldest);
            }
            true
        } else {
            self.offset -= 1;
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_geometry() -> DisplayGeometry {
        DisplayGeometry {
            display_width: 128,
            tile_width: 64,
            max_read_sites: 4,
            channel_px_height: 2,
            ..Default::default()
        }
    }

    #[test]
    fn test_pool_size_covers_display_plus_one() {
        let ring = TileRing::new(&small_geometry()).unwrap();
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.offset(), 63);
    }

    #[test]
    fn test_full_tile_of_advances_rotates_once() {
        let mut ring = TileRing::new(&small_geometry()).unwrap();
        let first_front = ring.front().id();

        let mut rotations = 0;
        for _ in 0..64 {
            if ring.advance_column() {
                rotations += 1;
            }
        }
        assert_eq!(rotations, 1);
        assert_eq!(ring.offset(), 63);
        assert_ne!(ring.front().id(), first_front);
        // the oldest tile became the new front
        assert_eq!(ring.front().id(), 0);
    }

    #[test]
    fn test_rotation_is_a_pure_permutation() {
        let mut ring = TileRing::new(&small_geometry()).unwrap();
        let mut ids: Vec<u32> = ring.iter().map(|t| t.id()).collect();
        ids.sort_unstable();

        for _ in 0..64 * 7 + 13 {
            ring.advance_column();
        }

        let mut after: Vec<u32> = ring.iter().map(|t| t.id()).collect();
        after.sort_unstable();
        assert_eq!(ids, after);
        assert_eq!(ring.len(), 3);
    }
}
