/// User-forced handedness preference, as stored in settings. Distinct from
/// the runtime [`crate::Handedness`] decision the frame processor makes
/// each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandednessSetting {
    Auto,
    Left,
    Right,
}

/// Runtime handedness classification the frame processor assigns to the
/// current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handedness {
    None,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct VideoSettings {
    pub border_colour: (u8, u8, u8),
    pub filter_radius: f64,
    pub handedness: HandednessSetting,
    pub only_match_where_pointing: bool,
    pub anti_jitter: bool,
    pub jitter_move_threshold: f64,
    pub y_sight_offset: f64,
}

impl Default for VideoSettings {
    fn default() -> Self {
        VideoSettings {
            border_colour: (255, 255, 255),
            filter_radius: 50.0,
            handedness: HandednessSetting::Auto,
            only_match_where_pointing: false,
            anti_jitter: true,
            jitter_move_threshold: 0.5,
            y_sight_offset: 0.0,
        }
    }
}
