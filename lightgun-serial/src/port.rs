use std::io::{Read, Write};
use std::time::Duration;

use tracing::debug;

use crate::errors::{Error, Result};
use crate::timing::{Clock, TimingConstants};
use crate::transport::SerialTransport;

/// Synchronous framing over a raw [`SerialTransport`]: single-byte, line,
/// exhaust-buffer, fixed-length, and buffered reads; one- or many-byte
/// writes; and the two higher-level primitives the protocol engine builds
/// its connect sequence on. There is no read timeout — callers rely on
/// `Flush`/`Poll` pauses between write and read, same as the device
/// firmware expects.
pub struct SerialFraming<T, C> {
    transport: T,
    clock: C,
    timing: TimingConstants,
}

impl<T: SerialTransport, C: Clock> SerialFraming<T, C> {
    pub fn new(transport: T, clock: C, timing: TimingConstants) -> Self {
        SerialFraming { transport, clock, timing }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn timing(&self) -> &TimingConstants {
        &self.timing
    }

    pub fn read_byte(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.transport.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    /// Reads until (and excluding) the next `\n`, also stripping a
    /// trailing `\r`.
    pub fn read_line(&mut self) -> Result<String> {
        let mut line = Vec::new();
        loop {
            let b = self.read_byte()?;
            if b == b'\n' {
                break;
            }
            line.push(b);
        }
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Ok(String::from_utf8_lossy(&line).into_owned())
    }

    /// Drains every byte currently buffered without blocking for more.
    pub fn read_exhaust(&mut self) -> Result<Vec<u8>> {
        let available = self.bytes_available()? as usize;
        self.read_buffered(available)
    }

    pub fn read_buffered(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        self.transport.read_exact(&mut buf)?;
        Ok(buf)
    }

    pub fn read_fixed<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.transport.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Sleeps for `ms` via the injected clock, with no I/O.
    pub fn sleep(&mut self, ms: u64) {
        self.clock.sleep(Duration::from_millis(ms));
    }

    pub fn bytes_available(&mut self) -> Result<u32> {
        Ok(self.transport.bytes_to_read()?)
    }

    pub fn write_byte(&mut self, b: u8) -> Result<()> {
        self.transport.write_all(&[b])?;
        Ok(())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.transport.write_all(bytes)?;
        Ok(())
    }

    /// Sleeps `sleep_ms`, then drains any bytes that arrived meanwhile.
    pub fn flush(&mut self, sleep_ms: u64) -> Result<Vec<u8>> {
        self.clock.sleep(Duration::from_millis(sleep_ms));
        self.read_exhaust()
    }

    /// Blocks in `poll_step_ms` increments until at least `count` bytes
    /// are available. No timeout: mirrors the device firmware's own lack
    /// of one.
    pub fn poll(&mut self, count: u32) -> Result<()> {
        loop {
            if self.bytes_available()? >= count {
                return Ok(());
            }
            self.clock.sleep(Duration::from_millis(self.timing.poll_step_ms));
        }
    }
}

impl<C: Clock> SerialFraming<Box<dyn serialport::SerialPort>, C> {
    /// Opens the real serial port at `baud`, asserting RTS and DTR as the
    /// device expects.
    pub fn open(path: &str, baud: u32, clock: C, timing: TimingConstants) -> Result<Self> {
        let settings = serialport::SerialPortSettings {
            baud_rate: baud,
            data_bits: serialport::DataBits::Eight,
            flow_control: serialport::FlowControl::None,
            parity: serialport::Parity::None,
            stop_bits: serialport::StopBits::One,
            timeout: Duration::from_millis(timing.connect_timeout_ms),
        };
        let mut transport = serialport::open_with_settings(path, &settings).map_err(|e| Error::Open(e.to_string()))?;
        transport.write_request_to_send(true)?;
        transport.write_data_terminal_ready(true)?;
        debug!(port = path, baud, "opened serial port");
        Ok(SerialFraming::new(transport, clock, timing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeSerialPort;
    use crate::timing::ImmediateClock;

    fn framing() -> SerialFraming<FakeSerialPort, ImmediateClock> {
        SerialFraming::new(FakeSerialPort::new(), ImmediateClock, TimingConstants::default())
    }

    #[test]
    fn read_byte_and_read_fixed() {
        let mut f = framing();
        f.transport.push_incoming(&[1, 2, 3, 4]);
        assert_eq!(f.read_byte().unwrap(), 1);
        let rest: [u8; 3] = f.read_fixed().unwrap();
        assert_eq!(rest, [2, 3, 4]);
    }

    #[test]
    fn read_line_strips_crlf() {
        let mut f = framing();
        f.transport.push_incoming(b"true\r\n");
        assert_eq!(f.read_line().unwrap(), "true");
    }

    #[test]
    fn poll_waits_until_enough_bytes_are_available() {
        let mut f = framing();
        f.transport.push_incoming(&[1, 2]);
        assert!(f.poll(2).is_ok());
        assert_eq!(f.bytes_available().unwrap(), 2);
    }

    #[test]
    fn flush_drains_pending_bytes_after_sleeping() {
        let mut f = framing();
        f.transport.push_incoming(&[9, 9, 9]);
        let drained = f.flush(5).unwrap();
        assert_eq!(drained, vec![9, 9, 9]);
        assert_eq!(f.bytes_available().unwrap(), 0);
    }

    #[test]
    fn write_bytes_reaches_the_transport() {
        let mut f = framing();
        f.write_bytes(&[0xAA, 40, 0, 0, 0, 0, 0xBB]).unwrap();
        assert_eq!(f.transport.written, vec![0xAA, 40, 0, 0, 0, 0, 0xBB]);
    }
}
