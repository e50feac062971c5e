//! On-disk driver configuration: serial port selection, the video/vision
//! tunables, and the timing table, loaded from TOML with
//! `braid-config-data`'s parse-and-fixup style. A missing config file is
//! not an error — [`DriverConfig::default`] reproduces every compiled-in
//! constant the spec names.

use std::path::Path;

use lightgun_proto::VideoSettings;
use lightgun_serial::timing::TimingConstants;
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO error reading config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

fn default_serial_port() -> String {
    "/dev/ttyUSB0".to_string()
}

fn default_baud_rate() -> u32 {
    115200
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DriverConfig {
    #[serde(default = "default_serial_port")]
    pub serial_port: String,
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    #[serde(default)]
    pub video: VideoSettings,
    #[serde(default)]
    pub timing: TimingConstants,
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig {
            serial_port: default_serial_port(),
            baud_rate: default_baud_rate(),
            video: VideoSettings::default(),
            timing: TimingConstants::default(),
        }
    }
}

/// Loads and parses `path`. Absence of the file is the caller's concern —
/// this only reports I/O failures on a path that's supposed to exist and
/// malformed TOML; use [`DriverConfig::default`] when no file is given.
pub fn parse_config_file<P: AsRef<Path>>(path: P) -> Result<DriverConfig> {
    let contents = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&contents)?)
}
