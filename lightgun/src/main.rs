use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use driver_config::DriverConfig;
use lightgun_protocol::{ProtocolEngine, SystemNonceSource};
use lightgun_vision::{FrameProcessor, Image};

/// Light-gun peripheral driver: connects to the device over serial, runs
/// the start procedure, and (optionally) replays a directory of raw
/// camera frames through the vision pipeline for offline testing.
#[derive(Parser, Debug)]
#[command(name = "lightgun", about = "light-gun peripheral driver")]
struct Cli {
    /// Path to a TOML config file; falls back to compiled-in defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Serial device path, overriding whatever the config file says.
    #[arg(long)]
    device: Option<String>,

    /// Device firmware version (16-bit, high byte major / low byte minor).
    #[arg(long, default_value_t = 0x0200)]
    firmware_version: u16,

    /// Directory of raw BGR24 frames to replay through the vision
    /// pipeline instead of talking to real hardware.
    #[arg(long)]
    demo_frames_dir: Option<PathBuf>,

    /// Width of each demo frame, in pixels.
    #[arg(long, default_value_t = 640)]
    frame_width: u32,

    /// Height of each demo frame, in pixels.
    #[arg(long, default_value_t = 480)]
    frame_height: u32,
}

fn run_demo(cli: &Cli, dir: &PathBuf, config: &DriverConfig) -> Result<()> {
    let mut processor = FrameProcessor::new();
    let mut device_info = lightgun_proto::DeviceInfo::new(cli.firmware_version);
    let stride = cli.frame_width as usize * 3;

    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir).with_context(|| format!("reading demo frames dir {dir:?}"))?.filter_map(|e| e.ok()).map(|e| e.path()).collect();
    entries.sort();

    for path in entries {
        let data = std::fs::read(&path).with_context(|| format!("reading frame {path:?}"))?;
        if data.len() < stride * cli.frame_height as usize {
            tracing::warn!(?path, "frame shorter than expected width*height*3, skipping");
            continue;
        }
        let image = Image::Bgr24 { width: cli.frame_width, height: cli.frame_height, stride, data: &data };
        match processor.process_frame(&image, &config.video, &mut device_info) {
            Ok(Some(update)) => tracing::info!(?path, x_pct = update.x_pct, y_pct = update.y_pct, "cursor update"),
            Ok(None) => tracing::debug!(?path, "no cursor update this frame"),
            Err(err) => tracing::warn!(?path, %err, "frame processing failed"),
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let _logging_guard = driver_logging::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => driver_config::parse_config_file(path).with_context(|| format!("loading config from {path:?}"))?,
        None => DriverConfig::default(),
    };
    if let Some(device) = &cli.device {
        config.serial_port = device.clone();
    }

    if let Some(dir) = cli.demo_frames_dir.clone() {
        return run_demo(&cli, &dir, &config);
    }

    tracing::info!(port = %config.serial_port, baud = config.baud_rate, "connecting to device");
    let mut engine = ProtocolEngine::connect_over_device(&config.serial_port, config.baud_rate, config.timing, SystemNonceSource, cli.firmware_version).context("connecting to device")?;
    engine.start().context("running start procedure")?;
    tracing::info!("device connected and started");

    Ok(())
}
