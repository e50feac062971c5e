//! Wire-format data model shared between the serial framing layer, the
//! protocol engine, and the frame processor: opcodes, the 7-byte request
//! frame, calibration percentage encoding, button mapping, and device/video
//! settings.

mod button;
mod calibration;
mod device_info;
mod errors;
mod frame;
mod opcode;
mod recoil;
mod video_settings;

pub use button::{Button, ButtonMap, KeyCode};
pub use calibration::{decode as decode_calibration, encode as encode_calibration, encode_bytes as encode_calibration_bytes};
pub use device_info::{DeviceInfo, CAMERA_NAME_LEN};
pub use errors::{Error, Result};
pub use frame::Frame;
pub use opcode::Opcode;
pub use recoil::{RecoilEvents, RecoilPositions, RecoilPulseValues, RecoilStyle};
pub use video_settings::{Handedness, HandednessSetting, VideoSettings};
