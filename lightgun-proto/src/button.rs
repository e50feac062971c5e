use std::collections::HashMap;

/// The fixed enumeration of device buttons, including an "offscreen"
/// variant of each physical button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Trigger,
    TriggerOffscreen,
    PumpAction,
    PumpActionOffscreen,
    FrontLeft,
    FrontLeftOffscreen,
    RearLeft,
    RearLeftOffscreen,
    FrontRight,
    FrontRightOffscreen,
    RearRight,
    RearRightOffscreen,
    DPad,
    DPadOffscreen,
}

impl Button {
    pub const ALL: &'static [Button] = &[
        Button::Trigger,
        Button::TriggerOffscreen,
        Button::PumpAction,
        Button::PumpActionOffscreen,
        Button::FrontLeft,
        Button::FrontLeftOffscreen,
        Button::RearLeft,
        Button::RearLeftOffscreen,
        Button::FrontRight,
        Button::FrontRightOffscreen,
        Button::RearRight,
        Button::RearRightOffscreen,
        Button::DPad,
        Button::DPadOffscreen,
    ];

    /// The button's id on the wire (its position in [`Button::ALL`]),
    /// used as `p1` in an `AssignButton` frame.
    pub fn wire_id(self) -> u8 {
        Self::ALL.iter().position(|&b| b == self).expect("Button::ALL is exhaustive") as u8
    }
}

/// A host key code in ASCII range, with a sentinel `None` meaning
/// "unmapped".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    None,
    Ascii(u8),
}

impl KeyCode {
    /// The byte an `AssignButton` frame carries in `p3`.
    pub fn wire_byte(self) -> u8 {
        match self {
            KeyCode::None => 0,
            KeyCode::Ascii(b) => b,
        }
    }
}

/// Maps every [`Button`] to a [`KeyCode`]. The key set is exactly
/// `Button::ALL` for the lifetime of the map — only values are
/// reassigned.
#[derive(Debug, Clone)]
pub struct ButtonMap {
    keys: HashMap<Button, KeyCode>,
}

impl ButtonMap {
    pub fn new() -> Self {
        let keys = Button::ALL.iter().map(|&b| (b, KeyCode::None)).collect();
        ButtonMap { keys }
    }

    pub fn get(&self, button: Button) -> KeyCode {
        self.keys[&button]
    }

    pub fn set(&mut self, button: Button, key: KeyCode) {
        self.keys.insert(button, key);
    }

    pub fn unassign(&mut self, button: Button) {
        self.set(button, KeyCode::None);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Button, KeyCode)> + '_ {
        Button::ALL.iter().map(move |&b| (b, self.keys[&b]))
    }
}

impl Default for ButtonMap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_map_has_every_button_unassigned() {
        let map = ButtonMap::new();
        assert_eq!(map.iter().count(), Button::ALL.len());
        for (_, key) in map.iter() {
            assert_eq!(key, KeyCode::None);
        }
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut map = ButtonMap::new();
        map.set(Button::Trigger, KeyCode::Ascii(b'z'));
        assert_eq!(map.get(Button::Trigger), KeyCode::Ascii(b'z'));
        map.unassign(Button::Trigger);
        assert_eq!(map.get(Button::Trigger), KeyCode::None);
    }

    #[test]
    fn key_set_never_changes_size() {
        let mut map = ButtonMap::new();
        map.set(Button::PumpAction, KeyCode::Ascii(b'x'));
        assert_eq!(map.iter().count(), Button::ALL.len());
    }
}
