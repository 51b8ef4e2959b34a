/*
 *  config.rs
 *
 *  ProbeStrip - scrolling heat-strip display for neural probes
 *  (c) 2020-26 Stuart Hunter
 *
 *  Display geometry constants and layered YAML/CLI configuration
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

use clap::{ArgAction, Parser, ValueHint};
use dirs_next::home_dir;
use embedded_graphics::pixelcolor::Rgb888;
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};

use crate::colorscheme::ColorScheme;
use crate::error::ViewerError;
use crate::options::OptionsState;
use crate::tile::RenderMode;

/// Immutable display geometry, constructed once and shared by reference.
///
/// Defaults match a full Neuropixels probe: 394 read sites at 2 px per
/// channel, a 1920 px logical scroll width in 64 px tiles.
#[derive(Debug, Clone, Copy)]
pub struct DisplayGeometry {
    /// Logical scroll width in pixel columns
    pub display_width: u32,
    /// Pixel columns per tile
    pub tile_width: u32,
    /// Vertical read-site slots on the probe
    pub max_read_sites: u32,
    /// Pixel rows per channel band
    pub channel_px_height: u32,
    /// Seconds of signal represented by one full display width
    pub window_seconds: f32,
    /// Fill color for freshly constructed planes
    pub background: Rgb888,
}

impl Default for DisplayGeometry {
    fn default() -> Self {
        Self {
            display_width: 1920,
            tile_width: 64,
            max_read_sites: 394,
            channel_px_height: 2,
            window_seconds: 1.0,
            background: Rgb888::new(0, 18, 43),
        }
    }
}

impl DisplayGeometry {
    /// Total pixel rows per tile plane.
    pub fn tile_height(&self) -> u32 {
        self.max_read_sites * self.channel_px_height
    }

    /// Number of tiles that covers *at least* the display width, plus one
    /// so the seam tile can slide off-canvas.
    pub fn num_tiles(&self) -> usize {
        (self.display_width as usize).div_ceil(self.tile_width as usize) + 1
    }

    /// Validate construction-time invariants. Geometric misconfiguration
    /// is rejected here rather than silently truncated at paint time.
    pub fn validated(self) -> Result<Self, ViewerError> {
        if self.display_width == 0
            || self.tile_width == 0
            || self.max_read_sites == 0
            || self.channel_px_height == 0
        {
            return Err(ViewerError::Geometry(
                "display dimensions must be nonzero".into(),
            ));
        }
        if !(self.window_seconds > 0.0) {
            return Err(ViewerError::Geometry(format!(
                "window_seconds must be positive (got {})",
                self.window_seconds
            )));
        }
        if self.tile_height() % self.max_read_sites != 0 {
            return Err(ViewerError::Geometry(format!(
                "tile height {} is not divisible by {} read sites",
                self.tile_height(),
                self.max_read_sites
            )));
        }
        Ok(self)
    }
}

/// Top-level app configuration, layered defaults -> YAML -> CLI.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// e.g., "info" | "debug"
    pub log_level: Option<String>,
    /// acquisition sample rate fed to new channels
    pub sample_rate_hz: Option<u32>,
    pub render_mode: Option<RenderMode>,
    pub color_scheme: Option<ColorScheme>,
    pub display: Option<DisplaySection>,
    pub bounds: Option<BoundsSection>,
    pub sim: Option<SimSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DisplaySection {
    pub width: Option<u32>,
    pub tile_width: Option<u32>,
    pub read_sites: Option<u32>,
    pub channel_px_height: Option<u32>,
    pub window_seconds: Option<f32>,
    /// background fill as [r, g, b]
    pub background: Option<[u8; 3]>,
}

/// Per-mode normalization ranges: low bound plus spread (high - low).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BoundsSection {
    pub rms_low: Option<f32>,
    pub rms_spread: Option<f32>,
    pub spike_low: Option<f32>,
    pub spike_spread: Option<f32>,
    pub fft_low: Option<f32>,
    pub fft_spread: Option<f32>,
}

/// Synthetic-feed simulator knobs (binary only).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SimSection {
    pub channels: Option<u32>,
    pub ticks: Option<u64>,
    pub fps: Option<u32>,
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone)]
#[command(name = "probestrip", about = "ProbeStrip heat-strip viewer", disable_help_flag = false)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    #[arg(long)]
    pub sample_rate_hz: Option<u32>,
    #[arg(long)]
    pub display_width: Option<u32>,
    #[arg(long)]
    pub tile_width: Option<u32>,
    #[arg(long)]
    pub read_sites: Option<u32>,
    #[arg(long)]
    pub window_seconds: Option<f32>,
    #[arg(long)]
    pub channels: Option<u32>,
    #[arg(long)]
    pub ticks: Option<u64>,
    #[arg(long)]
    pub fps: Option<u32>,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

/// Public entry point: parse CLI, read YAML, merge, validate.
pub fn load() -> Result<Config, ViewerError> {
    let cli = Cli::parse();
    load_with(cli)
}

/// Same as [`load`] but with a pre-parsed CLI, so tests can drive it.
pub fn load_with(cli: Cli) -> Result<Config, ViewerError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ViewerError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, &cli);

    // 4) Validate
    validate(&cfg)?;

    if cli.dump_config {
        // Pretty YAML of effective config (nice for debugging)
        let s = serde_yaml::to_string(&cfg)?;
        println!("{s}");
        std::process::exit(0);
    }

    Ok(cfg)
}

fn read_yaml(path: &Path) -> Result<Config, ViewerError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&raw)?)
}

fn find_config_file() -> Option<PathBuf> {
    let mut candidates = vec![PathBuf::from("probestrip.yaml")];
    if let Some(home) = home_dir() {
        candidates.push(home.join(".config/probestrip/config.yaml"));
    }
    candidates.into_iter().find(|p| p.exists())
}

fn merge(base: &mut Config, overlay: Config) {
    if overlay.log_level.is_some() { base.log_level = overlay.log_level; }
    if overlay.sample_rate_hz.is_some() { base.sample_rate_hz = overlay.sample_rate_hz; }
    if overlay.render_mode.is_some() { base.render_mode = overlay.render_mode; }
    if overlay.color_scheme.is_some() { base.color_scheme = overlay.color_scheme; }
    if overlay.display.is_some() { base.display = overlay.display; }
    if overlay.bounds.is_some() { base.bounds = overlay.bounds; }
    if overlay.sim.is_some() { base.sim = overlay.sim; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some() { cfg.log_level = cli.log_level.clone(); }
    if cli.sample_rate_hz.is_some() { cfg.sample_rate_hz = cli.sample_rate_hz; }

    if cli.display_width.is_some()
        || cli.tile_width.is_some()
        || cli.read_sites.is_some()
        || cli.window_seconds.is_some()
    {
        let d = cfg.display.get_or_insert_with(DisplaySection::default);
        if cli.display_width.is_some() { d.width = cli.display_width; }
        if cli.tile_width.is_some() { d.tile_width = cli.tile_width; }
        if cli.read_sites.is_some() { d.read_sites = cli.read_sites; }
        if cli.window_seconds.is_some() { d.window_seconds = cli.window_seconds; }
    }

    if cli.channels.is_some() || cli.ticks.is_some() || cli.fps.is_some() {
        let s = cfg.sim.get_or_insert_with(SimSection::default);
        if cli.channels.is_some() { s.channels = cli.channels; }
        if cli.ticks.is_some() { s.ticks = cli.ticks; }
        if cli.fps.is_some() { s.fps = cli.fps; }
    }
}

fn validate(cfg: &Config) -> Result<(), ViewerError> {
    // geometry invariants are checked again when the canvas is built; catch
    // plainly bad values early so --dump-config shows the rejection
    cfg.geometry().map(|_| ())
}

impl Config {
    /// Effective validated geometry for this config.
    pub fn geometry(&self) -> Result<DisplayGeometry, ViewerError> {
        let mut geo = DisplayGeometry::default();
        if let Some(d) = &self.display {
            if let Some(v) = d.width { geo.display_width = v; }
            if let Some(v) = d.tile_width { geo.tile_width = v; }
            if let Some(v) = d.read_sites { geo.max_read_sites = v; }
            if let Some(v) = d.channel_px_height { geo.channel_px_height = v; }
            if let Some(v) = d.window_seconds { geo.window_seconds = v; }
            if let Some([r, g, b]) = d.background { geo.background = Rgb888::new(r, g, b); }
        }
        geo.validated()
    }

    /// Effective options state (bounds, mode, scheme) for this config.
    pub fn options_state(&self) -> OptionsState {
        let mut opts = OptionsState::default();
        if let Some(m) = self.render_mode { opts.set_render_mode(m); }
        if let Some(s) = self.color_scheme { opts.set_color_scheme(s); }
        if let Some(b) = &self.bounds {
            let mut apply = |mode: RenderMode, low: Option<f32>, spread: Option<f32>| {
                let mut cur = opts.bounds(mode);
                if let Some(v) = low { cur.low = v; }
                if let Some(v) = spread { cur.spread = v; }
                opts.set_bounds(mode, cur);
            };
            apply(RenderMode::Rms, b.rms_low, b.rms_spread);
            apply(RenderMode::SpikeRate, b.spike_low, b.spike_spread);
            apply(RenderMode::FftPower, b.fft_low, b.fft_spread);
        }
        opts
    }
}
