/*
 *  lib.rs
 *
 *  ProbeStrip - scrolling heat-strip display for neural probes
 *  (c) 2020-26 Stuart Hunter
 *
 *  Tiled ring-buffer rendering engine for multi-channel probe data
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

pub mod canvas;
pub mod channel;
pub mod colorscheme;
pub mod compositor;
pub mod config;
pub mod error;
pub mod options;
pub mod pacer;
pub mod plane;
pub mod scroll;
pub mod tile;

pub use canvas::ChannelViewCanvas;
pub use channel::{ChannelClass, ProbeChannel, PENDING_SAMPLE_CAP};
pub use colorscheme::ColorScheme;
pub use compositor::{Compositor, RenderScale};
pub use config::{Config, DisplayGeometry};
pub use error::ViewerError;
pub use options::{Bounds, OptionsState};
pub use pacer::Pacer;
pub use plane::PixelPlane;
pub use scroll::TileRing;
pub use tile::{BandSpan, RenderMode, RenderTile};
