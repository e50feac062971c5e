use crate::errors::{Error, Result};
use crate::opcode::Opcode;

const START_MARKER: u8 = 0xAA;
const END_MARKER: u8 = 0xBB;

/// The fixed 7-byte request frame: `0xAA, opcode, p0, p1, p2, p3, 0xBB`.
/// Payload bytes default to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub opcode: u8,
    pub p0: u8,
    pub p1: u8,
    pub p2: u8,
    pub p3: u8,
}

impl Frame {
    pub fn new(opcode: Opcode) -> Self {
        Frame { opcode: opcode.into(), p0: 0, p1: 0, p2: 0, p3: 0 }
    }

    pub fn with_payload(opcode: Opcode, p0: u8, p1: u8, p2: u8, p3: u8) -> Self {
        Frame { opcode: opcode.into(), p0, p1, p2, p3 }
    }

    pub fn to_bytes(self) -> [u8; 7] {
        [START_MARKER, self.opcode, self.p0, self.p1, self.p2, self.p3, END_MARKER]
    }

    pub fn from_bytes(bytes: &[u8; 7]) -> Result<Self> {
        if bytes[0] != START_MARKER || bytes[6] != END_MARKER {
            return Err(Error::MalformedFrame);
        }
        Ok(Frame { opcode: bytes[1], p0: bytes[2], p1: bytes[3], p2: bytes[4], p3: bytes[5] })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_bytes() {
        let frame = Frame::with_payload(Opcode::CursorOffset, 1, 2, 3, 4);
        let bytes = frame.to_bytes();
        assert_eq!(bytes, [0xAA, 40, 1, 2, 3, 4, 0xBB]);
        assert_eq!(Frame::from_bytes(&bytes).unwrap(), frame);
    }

    #[test]
    fn rejects_missing_markers() {
        let bytes = [0x00, 40, 0, 0, 0, 0, 0xBB];
        assert_eq!(Frame::from_bytes(&bytes).unwrap_err(), Error::MalformedFrame);
    }
}
