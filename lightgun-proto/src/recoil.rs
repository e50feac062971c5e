/// Recoil solenoid firing style: `RecoilStyle` frame's `p0` is `0` for
/// `Normal`, nonzero for anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RecoilStyle {
    Normal,
    Custom,
}

impl RecoilStyle {
    pub fn wire_byte(self) -> u8 {
        match self {
            RecoilStyle::Normal => 0,
            RecoilStyle::Custom => 1,
        }
    }
}

/// The four solenoid positions a `RecoilPositions` frame addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct RecoilPositions {
    pub front_left: u8,
    pub back_left: u8,
    pub front_right: u8,
    pub back_right: u8,
}

impl RecoilPositions {
    pub fn wire_payload(self) -> (u8, u8, u8, u8) {
        (self.front_left, self.back_left, self.front_right, self.back_right)
    }
}

/// Which recoil-triggering events are currently armed, one flag per
/// payload byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct RecoilEvents {
    pub on_trigger: bool,
    pub on_pump: bool,
    pub on_hit: bool,
    pub on_reload: bool,
}

impl RecoilEvents {
    pub fn wire_payload(self) -> (u8, u8, u8, u8) {
        (self.on_trigger as u8, self.on_pump as u8, self.on_hit as u8, self.on_reload as u8)
    }
}

/// Pulse timing for the recoil solenoid. Each field gets its own payload
/// byte — the source this was ported from collapsed all four writes onto
/// a single buffer slot so only `delay` ever reached the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct RecoilPulseValues {
    pub strength: u8,
    pub start_delay: u8,
    pub stop_strength: u8,
    pub delay: u8,
}

impl RecoilPulseValues {
    pub fn wire_payload(self) -> (u8, u8, u8, u8) {
        (self.strength, self.start_delay, self.stop_strength, self.delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recoil_events_pack_one_flag_per_byte() {
        let events = RecoilEvents { on_trigger: true, on_pump: false, on_hit: true, on_reload: false };
        assert_eq!(events.wire_payload(), (1, 0, 1, 0));
    }

    #[test]
    fn pulse_values_place_each_field_in_its_own_byte() {
        let pulse = RecoilPulseValues { strength: 10, start_delay: 20, stop_strength: 30, delay: 40 };
        assert_eq!(pulse.wire_payload(), (10, 20, 30, 40));
    }
}
