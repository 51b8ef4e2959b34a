/*
 *  channel.rs
 *
 *  ProbeStrip - scrolling heat-strip display for neural probes
 *  (c) 2020-26 Stuart Hunter
 *
 *  Per-channel sample buffering and pixel-column painting
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

use log::warn;
use std::collections::VecDeque;

use crate::config::DisplayGeometry;
use crate::options::OptionsState;
use crate::tile::{RenderMode, RenderTile};

/// Pending queues are sized for one refresh burst; anything past this is a
/// producer outpacing the refresh cycle. We warn and drop the oldest so the
/// display stays current in bounded memory.
pub const PENDING_SAMPLE_CAP: usize = 1024;

/// Electrode classification for a probe channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelClass {
    Signal,
    Reference,
}

/// One probe channel's renderer state.
///
/// Buffers incoming scalar triples and, once per scroll tick, paints one
/// pixel column of all three mode planes into its read-site band of the
/// current front tile.
pub struct ProbeChannel {
    channel_id: u32,
    read_site: u32,
    class: ChannelClass,
    sample_rate: f32,
    samples_per_pixel: f32,
    rms: VecDeque<f32>,
    spike_rate: VecDeque<f32>,
    fft: VecDeque<f32>,
    overflow_events: u64,
}

impl ProbeChannel {
    pub fn new(
        channel_id: u32,
        read_site: u32,
        class: ChannelClass,
        sample_rate: f32,
        geometry: &DisplayGeometry,
    ) -> Self {
        // reference sites carry no signal, so no samples map to their pixels
        let samples_per_pixel = match class {
            ChannelClass::Reference => 0.0,
            ChannelClass::Signal => {
                sample_rate * geometry.window_seconds / geometry.display_width as f32
            }
        };
        Self {
            channel_id,
            read_site,
            class,
            sample_rate,
            samples_per_pixel,
            rms: VecDeque::new(),
            spike_rate: VecDeque::new(),
            fft: VecDeque::new(),
            overflow_events: 0,
        }
    }

    pub fn channel_id(&self) -> u32 {
        self.channel_id
    }

    pub fn read_site(&self) -> u32 {
        self.read_site
    }

    pub fn class(&self) -> ChannelClass {
        self.class
    }

    pub fn set_class(&mut self, class: ChannelClass) {
        self.class = class;
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Raw samples represented by one pixel column; 0 for reference sites.
    pub fn samples_per_pixel(&self) -> f32 {
        self.samples_per_pixel
    }

    /// Pending triples not yet painted.
    pub fn pending_len(&self) -> usize {
        self.rms.len().max(self.spike_rate.len()).max(self.fft.len())
    }

    /// Queue-cap drops observed so far (defect signal, see [`PENDING_SAMPLE_CAP`]).
    pub fn overflow_events(&self) -> u64 {
        self.overflow_events
    }

    /// Append one scalar triple to the pending queues. Never blocks.
    pub fn push_samples(&mut self, rms: f32, spike_rate: f32, fft: f32) {
        if self.rms.len() >= PENDING_SAMPLE_CAP {
            self.overflow_events += 1;
            // first overflow and every 256th after, so a runaway producer
            // doesn't flood the log
            if self.overflow_events == 1 || self.overflow_events % 256 == 0 {
                warn!(
                    "channel {}: pending sample queue exceeded {} ({} drops); producer is outpacing refresh",
                    self.channel_id, PENDING_SAMPLE_CAP, self.overflow_events
                );
            }
            self.rms.pop_front();
            self.spike_rate.pop_front();
            self.fft.pop_front();
        }

        self.rms.push_back(rms);
        self.spike_rate.push_back(spike_rate);
        self.fft.push_back(fft);
    }

    /// Pop the oldest pending triple and paint one pixel column per mode.
    ///
    /// Each mode normalizes its scalar against that mode's bounds, maps it
    /// through the active color scheme and writes a full-height stripe into
    /// this channel's band of `tile` at column `x`. When `last_in_batch`,
    /// all three queues are cleared afterwards; they only exist to span one
    /// display-refresh burst.
    pub fn paint_pending_column(
        &mut self,
        tile: &mut RenderTile,
        x: u32,
        options: &OptionsState,
        last_in_batch: bool,
    ) {
        let scheme = options.color_scheme();
        let site = self.read_site as usize;

        for mode in RenderMode::ALL {
            let queue = match mode {
                RenderMode::Rms => &mut self.rms,
                RenderMode::SpikeRate => &mut self.spike_rate,
                RenderMode::FftPower => &mut self.fft,
            };
            if let Some(value) = queue.pop_front() {
                let normalized = options.bounds(mode).normalized(value);
                let color = scheme.color_for(normalized);
                tile.paint_band_column(site, mode, x, color);
            }
        }

        if last_in_batch {
            self.rms.clear();
            self.spike_rate.clear();
            self.fft.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colorscheme::ColorScheme;
    use embedded_graphics::pixelcolor::Rgb888;

    fn geometry() -> DisplayGeometry {
        DisplayGeometry {
            display_width: 128,
            tile_width: 64,
            max_read_sites: 4,
            channel_px_height: 2,
            window_seconds: 1.0,
            ..Default::default()
        }
    }

    fn tile(geo: &DisplayGeometry) -> RenderTile {
        RenderTile::new(0, geo.tile_width, geo.tile_height(), geo.max_read_sites, geo.background)
            .unwrap()
    }

    #[test]
    fn test_reference_channel_has_zero_samples_per_pixel() {
        let geo = geometry();
        let ch = ProbeChannel::new(7, 1, ChannelClass::Reference, 30_000.0, &geo);
        assert_eq!(ch.samples_per_pixel(), 0.0);

        let signal = ProbeChannel::new(8, 2, ChannelClass::Signal, 30_000.0, &geo);
        assert_eq!(signal.samples_per_pixel(), 30_000.0 * 1.0 / 128.0);
    }

    #[test]
    fn test_queue_cap_drops_oldest() {
        let geo = geometry();
        let mut ch = ProbeChannel::new(0, 0, ChannelClass::Signal, 30_000.0, &geo);
        for i in 0..(PENDING_SAMPLE_CAP + 10) {
            ch.push_samples(i as f32, 0.0, 0.0);
        }
        assert_eq!(ch.pending_len(), PENDING_SAMPLE_CAP);
        assert_eq!(ch.overflow_events(), 10);

        // the oldest 10 were dropped, so the head is sample #10
        let mut tile = tile(&geo);
        let opts = OptionsState::default();
        ch.paint_pending_column(&mut tile, 0, &opts, false);
        assert_eq!(ch.pending_len(), PENDING_SAMPLE_CAP - 1);
    }

    #[test]
    fn test_paint_drains_one_triple_and_clears_on_last() {
        let geo = geometry();
        let mut ch = ProbeChannel::new(0, 0, ChannelClass::Signal, 30_000.0, &geo);
        let mut t = tile(&geo);
        let opts = OptionsState::default();

        for _ in 0..3 {
            ch.push_samples(1.0, 2.0, 3.0);
        }
        ch.paint_pending_column(&mut t, 63, &opts, false);
        assert_eq!(ch.pending_len(), 2);
        ch.paint_pending_column(&mut t, 62, &opts, false);
        assert_eq!(ch.pending_len(), 1);
        ch.paint_pending_column(&mut t, 61, &opts, true);
        assert_eq!(ch.pending_len(), 0);
    }

    #[test]
    fn test_paint_writes_scheme_color_into_band() {
        let geo = geometry();
        let mut ch = ProbeChannel::new(0, 0, ChannelClass::Signal, 30_000.0, &geo);
        let mut t = tile(&geo);
        let mut opts = OptionsState::default();
        opts.set_bounds(RenderMode::Rms, crate::options::Bounds::new(0.0, 10.0));

        ch.push_samples(5.0, 0.0, 0.0);
        ch.paint_pending_column(&mut t, 63, &opts, true);

        let expected = ColorScheme::Inferno.color_for(0.5);
        let band = t.band(0);
        for y in band.y..band.y + band.height {
            assert_eq!(t.plane(RenderMode::Rms).get(63, y), Some(expected));
        }
        // column next door untouched
        assert_eq!(t.plane(RenderMode::Rms).get(62, band.y), Some(Rgb888::new(0, 18, 43)));
    }
}
