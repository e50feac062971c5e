use std::io;

/// The minimal surface the framing layer needs from a serial connection:
/// byte streams plus a way to ask how much is buffered without blocking.
/// Implemented for the real `serialport` backend and for the in-memory
/// fake used in tests.
pub trait SerialTransport: io::Read + io::Write {
    fn bytes_to_read(&self) -> io::Result<u32>;
}

impl SerialTransport for Box<dyn serialport::SerialPort> {
    fn bytes_to_read(&self) -> io::Result<u32> {
        serialport::SerialPort::bytes_to_read(self.as_ref()).map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}
