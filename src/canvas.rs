/*
 *  canvas.rs
 *
 *  ProbeStrip - scrolling heat-strip display for neural probes
 *  (c) 2020-26 Stuart Hunter
 *
 *  Channel view canvas: owns the tile ring, the channels and the refresh cycle
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

use log::info;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::channel::{ChannelClass, ProbeChannel};
use crate::colorscheme::ColorScheme;
use crate::compositor::{Compositor, RenderScale};
use crate::config::DisplayGeometry;
use crate::error::ViewerError;
use crate::options::OptionsState;
use crate::plane::PixelPlane;
use crate::scroll::TileRing;
use crate::tile::RenderMode;

const DEFAULT_CHANNEL_HEIGHT: f32 = 10.0;

/// The scrolling multi-channel display.
///
/// Exclusively owns the tile pool, the scroll engine, the channel renderers
/// and the options state. Channels never hold references back here; the
/// refresh loop hands each one the front tile and the current options for
/// the column being painted.
///
/// Single-threaded cooperative model: sample producers feed
/// [`push_pixel_value_for_channel`](Self::push_pixel_value_for_channel) and
/// [`note_pixel_update`](Self::note_pixel_update) on the owning thread, and
/// the host's refresh tick drains pending updates via
/// [`refresh`](Self::refresh).
pub struct ChannelViewCanvas {
    geometry: DisplayGeometry,
    ring: TileRing,
    channels: Vec<ProbeChannel>,
    options: OptionsState,
    compositor: Compositor,
    dirty: AtomicBool,
    pending_updates: usize,
    channel_height: f32,
}

impl ChannelViewCanvas {
    pub fn new(geometry: DisplayGeometry) -> Result<Self, ViewerError> {
        let geometry = geometry.validated()?;
        let ring = TileRing::new(&geometry)?;
        info!(
            "canvas: {} tiles of {}x{} covering {} px, {} read sites",
            ring.len(),
            geometry.tile_width,
            geometry.tile_height(),
            geometry.display_width,
            geometry.max_read_sites
        );
        Ok(Self {
            compositor: Compositor::new(&geometry),
            geometry,
            ring,
            channels: Vec::new(),
            options: OptionsState::default(),
            dirty: AtomicBool::new(false),
            pending_updates: 0,
            channel_height: DEFAULT_CHANNEL_HEIGHT,
        })
    }

    pub fn with_options(geometry: DisplayGeometry, options: OptionsState) -> Result<Self, ViewerError> {
        let mut canvas = Self::new(geometry)?;
        canvas.options = options;
        Ok(canvas)
    }

    pub fn geometry(&self) -> &DisplayGeometry {
        &self.geometry
    }

    pub fn ring(&self) -> &TileRing {
        &self.ring
    }

    /// Register a channel; its read-site assignment is fixed for the
    /// channel's lifetime. Returns the channel's index in the feed order.
    pub fn add_channel(
        &mut self,
        channel_id: u32,
        read_site: u32,
        class: ChannelClass,
        sample_rate: f32,
    ) -> Result<usize, ViewerError> {
        if read_site >= self.geometry.max_read_sites {
            return Err(ViewerError::ReadSiteOutOfRange {
                site: read_site,
                max: self.geometry.max_read_sites,
            });
        }
        self.channels.push(ProbeChannel::new(
            channel_id,
            read_site,
            class,
            sample_rate,
            &self.geometry,
        ));
        Ok(self.channels.len() - 1)
    }

    /// Remove a channel; later channel indices shift down by one.
    pub fn remove_channel(&mut self, index: usize) -> Result<ProbeChannel, ViewerError> {
        if index >= self.channels.len() {
            return Err(ViewerError::UnknownChannel(index));
        }
        Ok(self.channels.remove(index))
    }

    pub fn channels(&self) -> &[ProbeChannel] {
        &self.channels
    }

    pub fn channel(&self, index: usize) -> Option<&ProbeChannel> {
        self.channels.get(index)
    }

    /// Inbound scalar feed: one triple for one channel, one call per
    /// channel per logical sample tick.
    pub fn push_pixel_value_for_channel(
        &mut self,
        index: usize,
        rms: f32,
        spike_rate: f32,
        fft: f32,
    ) -> Result<(), ViewerError> {
        let channel = self
            .channels
            .get_mut(index)
            .ok_or(ViewerError::UnknownChannel(index))?;
        channel.push_samples(rms, spike_rate, fft);
        Ok(())
    }

    /// Mark one completed per-channel sample tick: a pixel column is now
    /// pending for every channel. Sets the dirty flag.
    pub fn note_pixel_update(&mut self) {
        self.pending_updates += 1;
        self.dirty.store(true, Ordering::Release);
    }

    pub fn pending_updates(&self) -> usize {
        self.pending_updates
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Drain pending updates: for each one, paint a pixel column for every
    /// channel into the front tile, then advance the scroll offset.
    /// Batches many logical ticks into one visual refresh. Returns true if
    /// the presentation layer should repaint.
    pub fn refresh(&mut self) -> bool {
        if !self.dirty.load(Ordering::Acquire) {
            return false;
        }
        while self.pending_updates > 0 {
            let last = self.pending_updates == 1;
            let x = self.ring.offset();
            {
                let front = self.ring.front_mut();
                for channel in &mut self.channels {
                    channel.paint_pending_column(front, x, &self.options, last);
                }
            }
            self.ring.advance_column();
            self.pending_updates -= 1;
        }
        self.dirty.store(false, Ordering::Release);
        true
    }

    /// Stitch the ring into the screen buffer for the active render mode.
    pub fn compose_frame(&mut self) -> &PixelPlane {
        self.compositor.compose(&self.ring, self.options.render_mode())
    }

    /// Scale factors for drawing the composed frame into a viewport.
    pub fn presentation_scale(&self, viewport_width: u32) -> RenderScale {
        self.compositor.scale(self.channel_height, viewport_width)
    }

    pub fn channel_height(&self) -> f32 {
        self.channel_height
    }

    pub fn set_channel_height(&mut self, height: f32) {
        self.channel_height = height;
    }

    pub fn options(&self) -> &OptionsState {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut OptionsState {
        &mut self.options
    }

    pub fn render_mode(&self) -> RenderMode {
        self.options.render_mode()
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.options.set_render_mode(mode);
    }

    pub fn color_scheme(&self) -> ColorScheme {
        self.options.color_scheme()
    }

    pub fn set_color_scheme(&mut self, scheme: ColorScheme) {
        self.options.set_color_scheme(scheme);
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
    fn test_read_site_out_of_range_is_rejected() {
        let mut canvas = ChannelViewCanvas::new(geometry()).unwrap();
        assert!(canvas.add_channel(0, 3, ChannelClass::Signal, 30_000.0).is_ok());
        assert!(matches!(
            canvas.add_channel(1, 4, ChannelClass::Signal, 30_000.0),
            Err(ViewerError::ReadSiteOutOfRange { site: 4, max: 4 })
        ));
    }

    #[test]
    fn test_refresh_is_a_no_op_when_clean() {
        let mut canvas = ChannelViewCanvas::new(geometry()).unwrap();
        assert!(!canvas.refresh());
        assert_eq!(canvas.ring().offset(), 63);
    }

    #[test]
    fn test_refresh_drains_pending_and_advances() {
        let mut canvas = ChannelViewCanvas::new(geometry()).unwrap();
        canvas.add_channel(0, 0, ChannelClass::Signal, 30_000.0).unwrap();

        for _ in 0..3 {
            canvas.push_pixel_value_for_channel(0, 1.0, 2.0, 3.0).unwrap();
            canvas.note_pixel_update();
        }
        assert!(canvas.is_dirty());
        assert_eq!(canvas.pending_updates(), 3);

        assert!(canvas.refresh());
        assert_eq!(canvas.pending_updates(), 0);
        assert!(!canvas.is_dirty());
        assert_eq!(canvas.ring().offset(), 60);
        assert_eq!(canvas.channel(0).unwrap().pending_len(), 0);
    }

    #[test]
    fn test_unknown_channel_index_errors() {
        let mut canvas = ChannelViewCanvas::new(geometry()).unwrap();
        assert!(matches!(
            canvas.push_pixel_value_for_channel(0, 0.0, 0.0, 0.0),
            Err(ViewerError::UnknownChannel(0))
        ));
        assert!(matches!(
            canvas.remove_channel(0),
            Err(ViewerError::UnknownChannel(0))
        ));
    }
}
