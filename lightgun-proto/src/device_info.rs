use std::time::Instant;

/// Linked-camera name is transmitted as 15 space-padded ASCII bytes.
pub const CAMERA_NAME_LEN: usize = 15;

/// Device metadata created at session start and mutated only by the
/// protocol engine or by the frame processor writing back inferred
/// calibration.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub firmware_version: u16,
    pub unique_id: String,
    pub colour: String,
    pub manufacture_date: String,
    pub camera_name: String,
    pub calibration_x: f64,
    pub calibration_y: f64,
    pub requires_recalibration_push: bool,
    pub last_button_push: Option<Instant>,
    /// The last `(x, y)` cursor offset transmitted. Explicitly
    /// zero-initialised here, rather than left to whatever the
    /// allocator happens to hand back.
    pub last_frame_offsets: [i16; 2],
}

impl DeviceInfo {
    pub fn new(firmware_version: u16) -> Self {
        DeviceInfo {
            firmware_version,
            unique_id: String::new(),
            colour: String::new(),
            manufacture_date: String::new(),
            camera_name: String::new(),
            calibration_x: 0.0,
            calibration_y: 0.0,
            requires_recalibration_push: false,
            last_button_push: None,
            last_frame_offsets: [0, 0],
        }
    }

    /// `true` for firmware at or below v1.5 — these devices need the
    /// `CursorOffset`-then-`EnableSleepMode` compatibility shim and the
    /// 11-byte `CursorOffset` status-byte reading.
    pub fn is_legacy_firmware(&self) -> bool {
        self.firmware_version <= 0x0105
    }

    /// Space-pads (or truncates) `name` to the wire's fixed 15-byte field.
    pub fn encode_camera_name(name: &str) -> [u8; CAMERA_NAME_LEN] {
        let mut out = [b' '; CAMERA_NAME_LEN];
        for (slot, byte) in out.iter_mut().zip(name.as_bytes().iter().take(CAMERA_NAME_LEN)) {
            *slot = *byte;
        }
        out
    }
}
