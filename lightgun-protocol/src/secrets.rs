//! Hard-coded mutual-authentication secrets.
//!
//! The real firmware's secret bytes aren't available to this workspace;
//! these are fixed placeholder arrays of the documented lengths
//! (41-byte private key, 32-byte handshake key) so the derivation and
//! comparison logic in [`crate::engine`] is exercised exactly as the
//! wire protocol specifies. Replace with the real device secrets before
//! talking to actual hardware.

pub const PRIVATE_KEY: [u8; 41] = [
    0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F, 0x10,
    0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x18, 0x19, 0x1A, 0x1B, 0x1C, 0x1D, 0x1E, 0x1F, 0x20,
    0x21, 0x22, 0x23, 0x24, 0x25, 0x26, 0x27, 0x28, 0x29,
];

pub const HANDSHAKE_KEY: [u8; 32] = [
    0x30, 0x31, 0x32, 0x33, 0x34, 0x35, 0x36, 0x37, 0x38, 0x39, 0x3A, 0x3B, 0x3C, 0x3D, 0x3E, 0x3F,
    0x40, 0x41, 0x42, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48, 0x49, 0x4A, 0x4B, 0x4C, 0x4D, 0x4E, 0x4F,
];
