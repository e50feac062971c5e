use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use lightgun_proto::{decode_calibration as calibration_decode, encode_calibration_bytes, Button, ButtonMap, DeviceInfo, Frame, KeyCode, Opcode, CAMERA_NAME_LEN};
use lightgun_serial::timing::Clock;
use lightgun_serial::{SerialFraming, SerialTransport};

use crate::errors::{Error, Result};
use crate::nonce::NonceSource;
use crate::secrets;
use crate::state::ConnectState;

/// Drives the connect/handshake state machine and opcode dispatch over a
/// [`SerialFraming`] transport. Generic over the transport and clock so
/// the same logic runs against the real `serialport` backend in
/// production and the in-memory fake in tests.
pub struct ProtocolEngine<T, C, N> {
    framing: SerialFraming<T, C>,
    nonce_source: N,
    state: ConnectState,
    pub device_info: DeviceInfo,
    pub button_map: ButtonMap,
}

impl<T: SerialTransport, C: Clock, N: NonceSource> ProtocolEngine<T, C, N> {
    pub fn new(framing: SerialFraming<T, C>, nonce_source: N, firmware_version: u16) -> Self {
        ProtocolEngine {
            framing,
            nonce_source,
            state: ConnectState::Disconnected,
            device_info: DeviceInfo::new(firmware_version),
            button_map: ButtonMap::new(),
        }
    }

    pub fn state(&self) -> ConnectState {
        self.state
    }

    fn write_frame(&mut self, frame: Frame) -> Result<()> {
        debug!(opcode = frame.opcode, p0 = frame.p0, p1 = frame.p1, p2 = frame.p2, p3 = frame.p3, "writing frame");
        self.framing.write_bytes(&frame.to_bytes())?;
        Ok(())
    }

    /// Runs the full connect sequence: `Disconnected -> Opening ->
    /// AwaitingDeviceKey -> AwaitingHandshakeAck -> Authenticated`.
    pub fn connect(&mut self) -> Result<()> {
        if self.state != ConnectState::Disconnected {
            return Err(Error::AlreadyConnected);
        }
        let timing = *self.framing.timing();

        self.state = ConnectState::Opening;
        debug!(state = ?self.state, "connect sequence started");
        self.write_frame(Frame::new(Opcode::Connect))?;
        self.framing.flush(timing.post_connect_flush_ms)?;

        self.state = ConnectState::AwaitingDeviceKey;
        debug!(state = ?self.state);
        let identifier = self.nonce_source.generate_identifier();
        let nonce: [u8; 32] = Sha256::digest(identifier).into();
        self.framing.write_bytes(&nonce)?;

        self.framing.poll(32)?;
        let device_key: [u8; 32] = self.framing.read_fixed()?;
        let mut preimage = Vec::with_capacity(32 + secrets::PRIVATE_KEY.len());
        preimage.extend_from_slice(&nonce);
        preimage.extend_from_slice(&secrets::PRIVATE_KEY);
        let expected_key: [u8; 32] = Sha256::digest(&preimage).into();
        if device_key != expected_key {
            self.state = ConnectState::Disconnected;
            return Err(Error::InvalidAuthentication);
        }

        self.state = ConnectState::AwaitingHandshakeAck;
        debug!(state = ?self.state);
        self.write_frame(Frame::new(Opcode::Handshake))?;
        self.framing.sleep(timing.post_handshake_sleep_ms);
        self.framing.poll(32)?;
        let handshake: [u8; 32] = self.framing.read_fixed()?;
        let mut buf64 = Vec::with_capacity(64);
        buf64.extend_from_slice(&handshake);
        buf64.extend_from_slice(&secrets::HANDSHAKE_KEY);
        let digest: [u8; 32] = Sha256::digest(&buf64).into();
        self.framing.write_bytes(&digest)?;

        self.framing.sleep(timing.post_handshake_ack_sleep_ms);
        self.framing.poll(5)?;
        let ack = self.framing.read_line()?;
        if ack != "true" {
            self.state = ConnectState::Disconnected;
            return Err(Error::InvalidAuthentication);
        }

        self.write_frame(Frame::new(Opcode::Authenticated))?;
        self.framing.sleep(timing.inter_authenticated_sleep_ms);
        self.write_frame(Frame::new(Opcode::Authenticated))?;

        self.state = ConnectState::Authenticated;
        debug!(state = ?self.state, "connect sequence complete");
        Ok(())
    }

    /// Runs the post-connect start procedure.
    pub fn start(&mut self) -> Result<()> {
        let post_start_sleep_ms = self.framing.timing().post_start_sleep_ms;
        self.set_sleep_mode(true)?;
        self.set_edge_click_reload(true)?;
        self.write_frame(Frame::with_payload(Opcode::EnableCalibration, 1, 0, 0, 0))?;
        self.resync_all_buttons()?;
        self.write_frame(Frame::with_payload(Opcode::EnableRecoil, 1, 0, 0, 0))?;
        self.framing.sleep(post_start_sleep_ms);
        self.framing.read_exhaust()?;
        Ok(())
    }

    /// `EnableSleepMode`/`DisableSleepMode` — `p0 = 0/1`.
    pub fn set_sleep_mode(&mut self, enabled: bool) -> Result<()> {
        let opcode = if enabled { Opcode::EnableSleepMode } else { Opcode::DisableSleepMode };
        self.write_frame(Frame::with_payload(opcode, 1, 0, 0, 0))
    }

    /// `EnableEdgeReload`/`DisableEdgeReload` — `p0 = 0/1`.
    pub fn set_edge_reload(&mut self, enabled: bool) -> Result<()> {
        let opcode = if enabled { Opcode::EnableEdgeReload } else { Opcode::DisableEdgeReload };
        self.write_frame(Frame::with_payload(opcode, 1, 0, 0, 0))
    }

    /// `EnableEdgeClickReload`/`DisableEdgeClickReload` — `p0 = 0/1`.
    pub fn set_edge_click_reload(&mut self, enabled: bool) -> Result<()> {
        let opcode = if enabled { Opcode::EnableEdgeClickReload } else { Opcode::DisableEdgeClickReload };
        self.write_frame(Frame::with_payload(opcode, 1, 0, 0, 0))
    }

    fn resync_all_buttons(&mut self) -> Result<()> {
        let entries: Vec<(Button, KeyCode)> = self.button_map.iter().collect();
        for (button, key) in entries {
            self.write_frame(Frame::with_payload(Opcode::AssignButton, 0, button.wire_id(), 0, key.wire_byte()))?;
        }
        Ok(())
    }

    fn resync_button(&mut self, button: Button) -> Result<()> {
        let key = self.button_map.get(button);
        self.write_frame(Frame::with_payload(Opcode::AssignButton, 0, button.wire_id(), 0, key.wire_byte()))
    }

    fn resync_trigger_and_pump(&mut self) -> Result<()> {
        self.resync_button(Button::Trigger)?;
        self.resync_button(Button::PumpAction)?;
        Ok(())
    }

    /// Sends a `CursorOffset` frame for the given aim percentages
    /// (-100..100 range expected; converted to 16-bit signed), then
    /// handles any immediate status byte.
    pub fn send_cursor_offset(&mut self, x_pct: f64, y_pct: f64) -> Result<()> {
        let x = ((x_pct / 100.0) * 32767.0).round() as i16;
        let y = ((y_pct / 100.0) * 32767.0).round() as i16;
        let [xh, xl] = x.to_be_bytes();
        let [yh, yl] = y.to_be_bytes();
        self.write_frame(Frame::with_payload(Opcode::CursorOffset, xh, xl, yh, yl))?;
        self.device_info.last_frame_offsets = [x, y];

        if self.device_info.is_legacy_firmware() {
            self.write_frame(Frame::with_payload(Opcode::EnableSleepMode, xh, xl, yh, yl))?;
        }

        self.handle_cursor_status_byte()
    }

    fn handle_cursor_status_byte(&mut self) -> Result<()> {
        if self.framing.bytes_available()? == 0 {
            return Ok(());
        }
        let status = self.framing.read_byte()?;
        match status {
            200 => {
                self.button_map.unassign(Button::Trigger);
                self.button_map.unassign(Button::PumpAction);
            }
            201 => {
                self.device_info.requires_recalibration_push = true;
                self.resync_trigger_and_pump()?;
            }
            202 => {
                self.resync_trigger_and_pump()?;
            }
            254 => {
                let legacy = self.device_info.is_legacy_firmware();
                if !legacy && self.framing.bytes_available()? >= 3 {
                    self.framing.read_buffered(3)?;
                    self.device_info.last_button_push = Some(std::time::Instant::now());
                } else if legacy && self.framing.bytes_available()? >= 11 {
                    let body = self.framing.read_buffered(10)?;
                    self.framing.read_byte()?;
                    if body.iter().any(|&b| b != 0) {
                        self.device_info.last_button_push = Some(std::time::Instant::now());
                    }
                }
            }
            other => {
                warn!(status = other, "unexpected cursor-offset status byte");
            }
        }
        Ok(())
    }

    /// `RequestFirmware` — two-byte big-endian response.
    pub fn request_firmware(&mut self) -> Result<u16> {
        self.write_frame(Frame::new(Opcode::RequestFirmware))?;
        self.framing.poll(2)?;
        let bytes: [u8; 2] = self.framing.read_fixed()?;
        Ok(u16::from_be_bytes(bytes))
    }

    /// `RequestCamera` — 15 space-padded ASCII bytes, trimmed.
    pub fn request_camera(&mut self) -> Result<String> {
        self.write_frame(Frame::new(Opcode::RequestCamera))?;
        self.framing.poll(CAMERA_NAME_LEN as u32)?;
        let bytes: [u8; CAMERA_NAME_LEN] = self.framing.read_fixed()?;
        Ok(String::from_utf8_lossy(&bytes).trim_end().to_string())
    }

    /// `UpdateCamera` — one character per frame, 15 frames, index in
    /// `p1` and the character in `p3`.
    pub fn update_camera(&mut self, name: &str) -> Result<()> {
        let encoded = DeviceInfo::encode_camera_name(name);
        for (index, &byte) in encoded.iter().enumerate() {
            self.write_frame(Frame::with_payload(Opcode::UpdateCamera, 0, index as u8, 0, byte))?;
        }
        Ok(())
    }

    /// `RequestCalibrationX`/`RequestCalibrationY` — two-byte big-endian
    /// response, decoded via `(v - 10000) / 100`.
    pub fn request_calibration_x(&mut self) -> Result<f64> {
        self.request_calibration(Opcode::RequestCalibrationX)
    }

    pub fn request_calibration_y(&mut self) -> Result<f64> {
        self.request_calibration(Opcode::RequestCalibrationY)
    }

    fn request_calibration(&mut self, opcode: Opcode) -> Result<f64> {
        self.write_frame(Frame::new(opcode))?;
        self.framing.poll(2)?;
        let bytes: [u8; 2] = self.framing.read_fixed()?;
        Ok(calibration_decode(u16::from_be_bytes(bytes)))
    }

    /// `UpdateCalibrationX`/`UpdateCalibrationY` — encoded `(p0, p1)`
    /// big-endian payload.
    pub fn update_calibration_x(&mut self, v: f64) -> Result<()> {
        let (p0, p1) = encode_calibration_bytes(v);
        self.write_frame(Frame::with_payload(Opcode::UpdateCalibrationX, p0, p1, 0, 0))
    }

    pub fn update_calibration_y(&mut self, v: f64) -> Result<()> {
        let (p0, p1) = encode_calibration_bytes(v);
        self.write_frame(Frame::with_payload(Opcode::UpdateCalibrationY, p0, p1, 0, 0))
    }

    /// `RequestColour` — variable-length ASCII response, drained after a
    /// fixed wait since the device gives no length prefix.
    pub fn request_colour(&mut self) -> Result<String> {
        self.write_frame(Frame::new(Opcode::RequestColour))?;
        let wait_ms = self.framing.timing().debug_response_wait_ms;
        self.framing.sleep(wait_ms);
        let bytes = self.framing.read_exhaust()?;
        Ok(String::from_utf8_lossy(&bytes).to_string())
    }

    /// `RequestManufactureDate` — each response byte is a two-digit
    /// decimal component (year, month, day, ...), concatenated. The
    /// source this was ported from returned `DeviceInfo.UniqueId` here
    /// instead of the date it had just parsed; that looks like a copy-
    /// paste bug rather than intended behaviour, so this returns the
    /// parsed date.
    pub fn request_manufacture_date(&mut self) -> Result<String> {
        self.write_frame(Frame::new(Opcode::RequestManufactureDate))?;
        let wait_ms = self.framing.timing().debug_response_wait_ms;
        self.framing.sleep(wait_ms);
        let bytes = self.framing.read_exhaust()?;
        let date: String = bytes.iter().map(|b| format!("{b:02}")).collect();
        self.device_info.manufacture_date = date.clone();
        Ok(date)
    }

    /// `RequestUniqueId`. The source this was ported from reused the
    /// `RequestColour` opcode (111) here, which looks like the wrong
    /// opcode was wired up rather than a deliberate reuse — no corrected
    /// opcode is documented, so this keeps the same wire behaviour and
    /// flags the suspicion at `warn!` rather than silently trusting it.
    pub fn request_unique_id(&mut self) -> Result<String> {
        warn!("RequestUniqueId reuses the RequestColour opcode; verify against firmware");
        self.write_frame(Frame::new(Opcode::RequestColour))?;
        let wait_ms = self.framing.timing().debug_response_wait_ms;
        self.framing.sleep(wait_ms);
        let bytes = self.framing.read_exhaust()?;
        let id = String::from_utf8_lossy(&bytes).to_string();
        self.device_info.unique_id = id.clone();
        Ok(id)
    }

    /// `EnableRecoil`/`DisableRecoil` — `p0 = 0/1`.
    pub fn set_recoil_enabled(&mut self, enabled: bool) -> Result<()> {
        self.write_frame(Frame::with_payload(Opcode::EnableRecoil, enabled as u8, 0, 0, 0))
    }

    /// `RecoilPulseValues` — each field placed in its own payload byte.
    pub fn set_recoil_pulse_values(&mut self, pulse: lightgun_proto::RecoilPulseValues) -> Result<()> {
        let (p0, p1, p2, p3) = pulse.wire_payload();
        self.write_frame(Frame::with_payload(Opcode::RecoilPulseValues, p0, p1, p2, p3))
    }

    /// `RecoilStyle` — `p0 = 0` for Normal, nonzero otherwise.
    pub fn set_recoil_style(&mut self, style: lightgun_proto::RecoilStyle) -> Result<()> {
        self.write_frame(Frame::with_payload(Opcode::RecoilStyle, style.wire_byte(), 0, 0, 0))
    }

    /// `RecoilEvents` — one flag per payload byte.
    pub fn set_recoil_events(&mut self, events: lightgun_proto::RecoilEvents) -> Result<()> {
        let (p0, p1, p2, p3) = events.wire_payload();
        self.write_frame(Frame::with_payload(Opcode::RecoilEvents, p0, p1, p2, p3))
    }

    /// `RecoilPositions` — front-left/back-left/front-right/back-right.
    pub fn set_recoil_positions(&mut self, positions: lightgun_proto::RecoilPositions) -> Result<()> {
        let (p0, p1, p2, p3) = positions.wire_payload();
        self.write_frame(Frame::with_payload(Opcode::RecoilPositions, p0, p1, p2, p3))
    }

    /// `RecoilStrength` — voltage in `p0`.
    pub fn set_recoil_strength(&mut self, voltage: u8) -> Result<()> {
        self.write_frame(Frame::with_payload(Opcode::RecoilStrength, voltage, 0, 0, 0))
    }

    /// `RecoilTest` — fires a single pulse.
    pub fn fire_recoil_test(&mut self) -> Result<()> {
        self.write_frame(Frame::new(Opcode::RecoilTest))
    }

    pub fn start_recoil_test_repeat(&mut self) -> Result<()> {
        self.write_frame(Frame::new(Opcode::RecoilTestRepeatStart))
    }

    pub fn stop_recoil_test_repeat(&mut self) -> Result<()> {
        self.write_frame(Frame::new(Opcode::RecoilTestRepeatStop))
    }

    /// `PulseStrength` — the same strength value repeated across `p0..p2`.
    pub fn set_pulse_strength(&mut self, strength: u8) -> Result<()> {
        self.write_frame(Frame::with_payload(Opcode::PulseStrength, strength, strength, strength, 0))
    }

    /// `CustomPulseStrength` — amount in `p0`.
    pub fn set_custom_pulse_strength(&mut self, amount: u8) -> Result<()> {
        self.write_frame(Frame::with_payload(Opcode::CustomPulseStrength, amount, 0, 0, 0))
    }

    /// `Debug(opcode, payload)` — transmits an arbitrary opcode frame
    /// using the first four payload bytes, waits, and joins every
    /// response byte with `-`. The fifth payload byte is part of the
    /// call's signature but isn't transmitted: the frame only carries
    /// four payload slots.
    pub fn debug(&mut self, opcode: u8, payload: [u8; 5]) -> Result<String> {
        let frame = Frame { opcode, p0: payload[0], p1: payload[1], p2: payload[2], p3: payload[3] };
        self.write_frame(frame)?;
        let wait_ms = self.framing.timing().debug_response_wait_ms;
        self.framing.sleep(wait_ms);
        let bytes = self.framing.read_exhaust()?;
        Ok(bytes.iter().map(|b| b.to_string()).collect::<Vec<_>>().join("-"))
    }
}

impl<N: NonceSource> ProtocolEngine<Box<dyn serialport::SerialPort>, lightgun_serial::timing::SystemClock, N> {
    /// Opens the real serial port and runs the connect sequence.
    /// Port-open failures are reported as `DeviceNotResponding`, per the
    /// connect sequence's step 1; failures past that point propagate as
    /// their underlying cause.
    pub fn connect_over_device(
        path: &str,
        baud: u32,
        timing: lightgun_serial::timing::TimingConstants,
        nonce_source: N,
        firmware_version: u16,
    ) -> Result<Self> {
        let framing = SerialFraming::open(path, baud, lightgun_serial::timing::SystemClock, timing)
            .map_err(|_| Error::DeviceNotResponding)?;
        let mut engine = ProtocolEngine::new(framing, nonce_source, firmware_version);
        engine.connect()?;
        Ok(engine)
    }
}

#[cfg(test)]
impl<C: Clock, N: NonceSource> ProtocolEngine<lightgun_serial::FakeSerialPort, C, N> {
    fn framing_written_for_test(&self) -> &[u8] {
        &self.framing.transport().written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lightgun_serial::timing::{ImmediateClock, TimingConstants};
    use lightgun_serial::FakeSerialPort;

    use crate::nonce::FixedNonceSource;

    fn engine_with_script() -> (ProtocolEngine<FakeSerialPort, ImmediateClock, FixedNonceSource>, [u8; 32]) {
        let identifier = [7u8; 16];
        let nonce: [u8; 32] = Sha256::digest(identifier).into();
        let mut preimage = Vec::with_capacity(32 + secrets::PRIVATE_KEY.len());
        preimage.extend_from_slice(&nonce);
        preimage.extend_from_slice(&secrets::PRIVATE_KEY);
        let device_key: [u8; 32] = Sha256::digest(&preimage).into();

        let mut port = FakeSerialPort::new();
        // Writes, in order: #1 Connect frame, #2 nonce, #3 Handshake
        // frame, #4 session-key digest, #5/#6 Authenticated frames.
        port.stage_reply_after_write(2, device_key.to_vec());
        port.stage_reply_after_write(3, vec![0xAB; 32]); // arbitrary device handshake bytes
        port.stage_reply_after_write(4, b"true\n".to_vec());

        let framing = SerialFraming::new(port, ImmediateClock, TimingConstants::default());
        let engine = ProtocolEngine::new(framing, FixedNonceSource(identifier), 0x0200);
        (engine, nonce)
    }

    #[test]
    fn scenario_1_connect_golden_trace() {
        let (mut engine, _nonce) = engine_with_script();
        let start = std::time::Instant::now();
        engine.connect().unwrap();
        assert!(start.elapsed() < std::time::Duration::from_millis(300));
        assert_eq!(engine.state(), ConnectState::Authenticated);
    }

    #[test]
    fn connect_transmits_exactly_the_scripted_frames() {
        let (mut engine, nonce) = engine_with_script();
        engine.connect().unwrap();

        let written = engine.framing_written_for_test();
        let mut expected = Vec::new();
        expected.extend_from_slice(&Frame::new(Opcode::Connect).to_bytes());
        expected.extend_from_slice(&nonce);
        expected.extend_from_slice(&Frame::new(Opcode::Handshake).to_bytes());
        let digest: [u8; 32] = {
            let mut buf = Vec::with_capacity(64);
            buf.extend_from_slice(&[0xAB; 32]);
            buf.extend_from_slice(&secrets::HANDSHAKE_KEY);
            Sha256::digest(&buf).into()
        };
        expected.extend_from_slice(&digest);
        expected.extend_from_slice(&Frame::new(Opcode::Authenticated).to_bytes());
        expected.extend_from_slice(&Frame::new(Opcode::Authenticated).to_bytes());

        assert_eq!(written, expected);
    }

    #[test]
    fn connect_rejects_a_wrong_device_key() {
        let mut port = FakeSerialPort::new();
        port.stage_reply_after_write(2, vec![0u8; 32]); // wrong key
        let framing = SerialFraming::new(port, ImmediateClock, TimingConstants::default());
        let mut engine = ProtocolEngine::new(framing, FixedNonceSource([1u8; 16]), 0x0200);
        let err = engine.connect().unwrap_err();
        assert!(matches!(err, Error::InvalidAuthentication));
        assert_eq!(engine.state(), ConnectState::Disconnected);
    }

    #[test]
    fn scenario_2_status_byte_200_clears_trigger_and_pump() {
        let mut port = FakeSerialPort::new();
        port.push_incoming(&[200]);
        let framing = SerialFraming::new(port, ImmediateClock, TimingConstants::default());
        let mut engine = ProtocolEngine::new(framing, FixedNonceSource([0u8; 16]), 0x0200);
        engine.button_map.set(Button::Trigger, KeyCode::Ascii(b'a'));
        engine.button_map.set(Button::PumpAction, KeyCode::Ascii(b'b'));

        engine.send_cursor_offset(10.0, -5.0).unwrap();

        assert_eq!(engine.button_map.get(Button::Trigger), KeyCode::None);
        assert_eq!(engine.button_map.get(Button::PumpAction), KeyCode::None);
    }

    #[test]
    fn already_connected_is_rejected() {
        let (mut engine, _) = engine_with_script();
        engine.connect().unwrap();
        let err = engine.connect().unwrap_err();
        assert!(matches!(err, Error::AlreadyConnected));
    }

    #[test]
    fn request_firmware_decodes_a_big_endian_u16() {
        let mut port = FakeSerialPort::new();
        port.push_incoming(&[0x01, 0x06]);
        let framing = SerialFraming::new(port, ImmediateClock, TimingConstants::default());
        let mut engine = ProtocolEngine::new(framing, FixedNonceSource([0u8; 16]), 0x0200);
        assert_eq!(engine.request_firmware().unwrap(), 0x0106);
    }

    #[test]
    fn request_camera_trims_trailing_padding() {
        let mut port = FakeSerialPort::new();
        port.push_incoming(b"cam1           ");
        let framing = SerialFraming::new(port, ImmediateClock, TimingConstants::default());
        let mut engine = ProtocolEngine::new(framing, FixedNonceSource([0u8; 16]), 0x0200);
        assert_eq!(engine.request_camera().unwrap(), "cam1");
    }

    #[test]
    fn update_camera_sends_one_frame_per_character() {
        let port = FakeSerialPort::new();
        let framing = SerialFraming::new(port, ImmediateClock, TimingConstants::default());
        let mut engine = ProtocolEngine::new(framing, FixedNonceSource([0u8; 16]), 0x0200);
        engine.update_camera("cam1").unwrap();
        let written = engine.framing_written_for_test();
        assert_eq!(written.len(), 15 * 7);
        assert_eq!(written[0..7], [0xAA, u8::from(Opcode::UpdateCamera), 0, 0, 0, b'c', 0xBB]);
        assert_eq!(written[7..14], [0xAA, u8::from(Opcode::UpdateCamera), 0, 1, 0, b'a', 0xBB]);
    }

    #[test]
    fn calibration_round_trips_through_the_wire_encoding() {
        let mut port = FakeSerialPort::new();
        port.push_incoming(&[0x22, 0x3E]); // encode(-12.34)
        let framing = SerialFraming::new(port, ImmediateClock, TimingConstants::default());
        let mut engine = ProtocolEngine::new(framing, FixedNonceSource([0u8; 16]), 0x0200);
        let v = engine.request_calibration_x().unwrap();
        assert!((v - (-12.34)).abs() < 0.01);

        engine.update_calibration_y(-12.34).unwrap();
        let written = engine.framing_written_for_test();
        let frame = &written[written.len() - 7..];
        assert_eq!(frame, &[0xAA, u8::from(Opcode::UpdateCalibrationY), 0x22, 0x3E, 0, 0, 0xBB]);
    }

    #[test]
    fn request_manufacture_date_formats_each_byte_as_two_digits() {
        let mut port = FakeSerialPort::new();
        port.push_incoming(&[9, 3, 25]);
        let framing = SerialFraming::new(port, ImmediateClock, TimingConstants::default());
        let mut engine = ProtocolEngine::new(framing, FixedNonceSource([0u8; 16]), 0x0200);
        let date = engine.request_manufacture_date().unwrap();
        assert_eq!(date, "090325");
        assert_eq!(engine.device_info.manufacture_date, "090325");
    }

    #[test]
    fn set_recoil_pulse_values_places_each_field_in_its_own_byte() {
        let port = FakeSerialPort::new();
        let framing = SerialFraming::new(port, ImmediateClock, TimingConstants::default());
        let mut engine = ProtocolEngine::new(framing, FixedNonceSource([0u8; 16]), 0x0200);
        let pulse = lightgun_proto::RecoilPulseValues { strength: 1, start_delay: 2, stop_strength: 3, delay: 4 };
        engine.set_recoil_pulse_values(pulse).unwrap();
        let written = engine.framing_written_for_test();
        assert_eq!(written, &[0xAA, u8::from(Opcode::RecoilPulseValues), 1, 2, 3, 4, 0xBB]);
    }

    #[test]
    fn edge_reload_and_sleep_mode_toggles_pick_the_enable_or_disable_opcode() {
        let port = FakeSerialPort::new();
        let framing = SerialFraming::new(port, ImmediateClock, TimingConstants::default());
        let mut engine = ProtocolEngine::new(framing, FixedNonceSource([0u8; 16]), 0x0200);

        engine.set_edge_reload(true).unwrap();
        engine.set_edge_reload(false).unwrap();
        engine.set_sleep_mode(false).unwrap();
        engine.set_edge_click_reload(false).unwrap();

        let written = engine.framing_written_for_test();
        assert_eq!(&written[0..7], &[0xAA, u8::from(Opcode::EnableEdgeReload), 1, 0, 0, 0, 0xBB]);
        assert_eq!(&written[7..14], &[0xAA, u8::from(Opcode::DisableEdgeReload), 1, 0, 0, 0, 0xBB]);
        assert_eq!(&written[14..21], &[0xAA, u8::from(Opcode::DisableSleepMode), 1, 0, 0, 0, 0xBB]);
        assert_eq!(&written[21..28], &[0xAA, u8::from(Opcode::DisableEdgeClickReload), 1, 0, 0, 0, 0xBB]);
    }
}
