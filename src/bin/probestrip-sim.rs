/*
 *  bin/probestrip-sim.rs
 *
 *  ProbeStrip - scrolling heat-strip display for neural probes
 *  (c) 2020-26 Stuart Hunter
 *
 *  Synthetic-feed simulator: drives the canvas without hardware attached
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

use std::time::Duration;

use anyhow::Context;
use env_logger::Env;
use log::{debug, info};
use rand::Rng;

use probestrip::{ChannelClass, ChannelViewCanvas, Pacer, config};

fn main() -> anyhow::Result<()> {
    let cfg = config::load().context("loading configuration")?;

    let log_level = cfg.log_level.clone().unwrap_or_else(|| "info".to_string());
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let geometry = cfg.geometry()?;
    let options = cfg.options_state();
    let mut canvas = ChannelViewCanvas::with_options(geometry, options)?;

    let sample_rate = cfg.sample_rate_hz.unwrap_or(30_000) as f32;
    let sim = cfg.sim.clone().unwrap_or_default();
    let num_channels = sim.channels.unwrap_or_else(|| geometry.max_read_sites.min(32));
    let ticks = sim.ticks.unwrap_or(600);
    let fps = sim.fps.unwrap_or(30);

    for i in 0..num_channels {
        // sprinkle a reference site every two dozen channels, probe-style
        let class = if i % 24 == 23 {
            ChannelClass::Reference
        } else {
            ChannelClass::Signal
        };
        canvas.add_channel(i, i % geometry.max_read_sites, class, sample_rate)?;
    }
    info!(
        "feeding {} channels at {} Hz, {} ticks, {} fps target",
        num_channels, sample_rate, ticks, fps
    );

    let mut pacer = Pacer::new(fps);
    let mut rng = rand::rng();
    let mut frames = 0u64;

    for tick in 0..ticks {
        let phase = tick as f32 * 0.05;
        for idx in 0..num_channels as usize {
            let site = idx as f32;
            let rms = 40.0
                + 30.0 * (phase + site * 0.3).sin()
                + rng.random_range(-5.0..5.0f32);
            let spikes = (8.0 + 6.0 * (phase * 0.5 + site).cos() + rng.random_range(0.0..2.0f32))
                .max(0.0);
            let fft = 25.0 + 15.0 * (phase * 0.8).sin() + rng.random_range(-3.0..3.0f32);
            canvas.push_pixel_value_for_channel(idx, rms, spikes, fft)?;
        }
        canvas.note_pixel_update();

        if pacer.should_flush() && canvas.refresh() {
            let frame = canvas.compose_frame();
            frames += 1;
            debug!(
                "frame {}: {}x{}, offset {}",
                frames,
                frame.width(),
                frame.height(),
                canvas.ring().offset()
            );
        }
        std::thread::sleep(Duration::from_millis(1));
    }

    // flush whatever the pacer was still holding back
    if canvas.refresh() {
        canvas.compose_frame();
        frames += 1;
    }

    let scale = canvas.presentation_scale(1280);
    let dropped: u64 = canvas.channels().iter().map(|c| c.overflow_events()).sum();
    info!(
        "simulated {} ticks into {} frames (viewport scale {:.2} x {:.2}, {} queue drops)",
        ticks, frames, scale.horizontal, scale.vertical, dropped
    );
    Ok(())
}
