/*
 *  error.rs
 *
 *  ProbeStrip - scrolling heat-strip display for neural probes
 *  (c) 2020-26 Stuart Hunter
 *
 *  Unified error types for the viewer
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

use thiserror::Error;

/// Unified error type for canvas construction and configuration.
///
/// The steady-state render path never fails; everything here is raised at
/// construction or config-load time.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// Display or tile geometry that cannot be partitioned cleanly
    #[error("Invalid display geometry: {0}")]
    Geometry(String),

    /// A channel index with no registered channel behind it
    #[error("No channel at index {0}")]
    UnknownChannel(usize),

    /// A read site outside the configured probe
    #[error("Read site {site} out of range (max {max})")]
    ReadSiteOutOfRange { site: u32, max: u32 },

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}
