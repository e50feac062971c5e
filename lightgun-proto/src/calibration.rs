/// Encodes a calibration percentage for the wire: `floor(v * 100 + 10000)`
/// as a big-endian `u16`.
pub fn encode(v: f64) -> u16 {
    (v * 100.0 + 10000.0).floor() as u16
}

/// Decodes a wire calibration value back to a percentage.
pub fn decode(raw: u16) -> f64 {
    (raw as f64 - 10000.0) / 100.0
}

/// Splits an encoded value into the big-endian `(p0, p1)` payload bytes a
/// calibration-update frame carries.
pub fn encode_bytes(v: f64) -> (u8, u8) {
    let raw = encode(v);
    raw.to_be_bytes().into()
}
