//! KB1 Settings Model
//!
//! Structured values for the settings records the controller exposes
//! over BLE. Wire layouts live in
//! [`crate::infrastructure::bluetooth::codec`].
//!
//! The enum-valued fields mirror the firmware's 32-bit ordinals. Every
//! wire enum carries an `Other` variant holding ordinals this build
//! does not know, so records written by newer firmware survive a
//! read/edit/write cycle untouched.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The six addressable settings records on the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettingsKind {
    Lever1,
    Lever2,
    LeverPush1,
    LeverPush2,
    Touch,
    Scale,
}

impl SettingsKind {
    /// Every record kind, in the order bulk operations visit them.
    pub const ALL: [SettingsKind; 6] = [
        SettingsKind::Lever1,
        SettingsKind::Lever2,
        SettingsKind::LeverPush1,
        SettingsKind::LeverPush2,
        SettingsKind::Touch,
        SettingsKind::Scale,
    ];
}

impl fmt::Display for SettingsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SettingsKind::Lever1 => "Lever 1",
            SettingsKind::Lever2 => "Lever 2",
            SettingsKind::LeverPush1 => "Lever Push 1",
            SettingsKind::LeverPush2 => "Lever Push 2",
            SettingsKind::Touch => "Touch",
            SettingsKind::Scale => "Scale",
        })
    }
}

/// How a lever maps physical travel to CC values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeverFunctionMode {
    Interpolated,
    PeakAndDecay,
    Incremental,
    Other(i32),
}

impl LeverFunctionMode {
    pub fn from_ordinal(ordinal: i32) -> Self {
        match ordinal {
            0 => Self::Interpolated,
            1 => Self::PeakAndDecay,
            2 => Self::Incremental,
            n => Self::Other(n),
        }
    }

    pub fn ordinal(self) -> i32 {
        match self {
            Self::Interpolated => 0,
            Self::PeakAndDecay => 1,
            Self::Incremental => 2,
            Self::Other(n) => n,
        }
    }
}

/// How a push-lever behaves when pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeverPushFunctionMode {
    Interpolated,
    PeakAndDecay,
    Static,
    Reset,
    Other(i32),
}

impl LeverPushFunctionMode {
    pub fn from_ordinal(ordinal: i32) -> Self {
        match ordinal {
            0 => Self::Interpolated,
            1 => Self::PeakAndDecay,
            2 => Self::Static,
            3 => Self::Reset,
            n => Self::Other(n),
        }
    }

    pub fn ordinal(self) -> i32 {
        match self {
            Self::Interpolated => 0,
            Self::PeakAndDecay => 1,
            Self::Static => 2,
            Self::Reset => 3,
            Self::Other(n) => n,
        }
    }
}

/// How the touch pad emits its CC value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchFunctionMode {
    Hold,
    Toggle,
    Continuous,
    Other(i32),
}

impl TouchFunctionMode {
    pub fn from_ordinal(ordinal: i32) -> Self {
        match ordinal {
            0 => Self::Hold,
            1 => Self::Toggle,
            2 => Self::Continuous,
            n => Self::Other(n),
        }
    }

    pub fn ordinal(self) -> i32 {
        match self {
            Self::Hold => 0,
            Self::Toggle => 1,
            Self::Continuous => 2,
            Self::Other(n) => n,
        }
    }
}

/// Onset/offset curve shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterpolationType {
    Linear,
    Exponential,
    Logarithmic,
    Other(i32),
}

impl InterpolationType {
    pub fn from_ordinal(ordinal: i32) -> Self {
        match ordinal {
            0 => Self::Linear,
            1 => Self::Exponential,
            2 => Self::Logarithmic,
            n => Self::Other(n),
        }
    }

    pub fn ordinal(self) -> i32 {
        match self {
            Self::Linear => 0,
            Self::Exponential => 1,
            Self::Logarithmic => 2,
            Self::Other(n) => n,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueMode {
    Unipolar,
    Bipolar,
    Other(i32),
}

impl ValueMode {
    pub fn from_ordinal(ordinal: i32) -> Self {
        match ordinal {
            0 => Self::Unipolar,
            1 => Self::Bipolar,
            n => Self::Other(n),
        }
    }

    pub fn ordinal(self) -> i32 {
        match self {
            Self::Unipolar => 0,
            Self::Bipolar => 1,
            Self::Other(n) => n,
        }
    }
}

/// Quantizer scale, in the firmware's table order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleType {
    Chromatic,
    Major,
    Minor,
    HarmonicMinor,
    MelodicMinorAsc,
    PentatonicMajor,
    PentatonicMinor,
    Blues,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Locrian,
    Other(i32),
}

impl ScaleType {
    pub fn from_ordinal(ordinal: i32) -> Self {
        match ordinal {
            0 => Self::Chromatic,
            1 => Self::Major,
            2 => Self::Minor,
            3 => Self::HarmonicMinor,
            4 => Self::MelodicMinorAsc,
            5 => Self::PentatonicMajor,
            6 => Self::PentatonicMinor,
            7 => Self::Blues,
            8 => Self::Dorian,
            9 => Self::Phrygian,
            10 => Self::Lydian,
            11 => Self::Mixolydian,
            12 => Self::Locrian,
            n => Self::Other(n),
        }
    }

    pub fn ordinal(self) -> i32 {
        match self {
            Self::Chromatic => 0,
            Self::Major => 1,
            Self::Minor => 2,
            Self::HarmonicMinor => 3,
            Self::MelodicMinorAsc => 4,
            Self::PentatonicMajor => 5,
            Self::PentatonicMinor => 6,
            Self::Blues => 7,
            Self::Dorian => 8,
            Self::Phrygian => 9,
            Self::Lydian => 10,
            Self::Mixolydian => 11,
            Self::Locrian => 12,
            Self::Other(n) => n,
        }
    }
}

impl fmt::Display for ScaleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chromatic => f.write_str("Chromatic"),
            Self::Major => f.write_str("Major"),
            Self::Minor => f.write_str("Minor"),
            Self::HarmonicMinor => f.write_str("Harmonic Minor"),
            Self::MelodicMinorAsc => f.write_str("Melodic Minor Ascending"),
            Self::PentatonicMajor => f.write_str("Pentatonic Major"),
            Self::PentatonicMinor => f.write_str("Pentatonic Minor"),
            Self::Blues => f.write_str("Blues"),
            Self::Dorian => f.write_str("Dorian"),
            Self::Phrygian => f.write_str("Phrygian"),
            Self::Lydian => f.write_str("Lydian"),
            Self::Mixolydian => f.write_str("Mixolydian"),
            Self::Locrian => f.write_str("Locrian"),
            Self::Other(n) => write!(f, "Scale #{n}"),
        }
    }
}

/// Settings for one of the two levers (40-byte record).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeverSettings {
    pub cc_number: i32,
    pub min_cc_value: i32,
    pub max_cc_value: i32,
    pub step_size: i32,
    pub function_mode: LeverFunctionMode,
    pub value_mode: ValueMode,
    /// Onset ramp duration in milliseconds.
    pub onset_time: u32,
    /// Offset ramp duration in milliseconds.
    pub offset_time: u32,
    pub onset_type: InterpolationType,
    pub offset_type: InterpolationType,
}

/// Settings for one of the two push-levers (32-byte record).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeverPushSettings {
    pub cc_number: i32,
    pub min_cc_value: i32,
    pub max_cc_value: i32,
    pub function_mode: LeverPushFunctionMode,
    pub onset_time: u32,
    pub offset_time: u32,
    pub onset_type: InterpolationType,
    pub offset_type: InterpolationType,
}

/// Settings for the touch pad (16-byte record).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TouchSettings {
    pub cc_number: i32,
    pub min_cc_value: i32,
    pub max_cc_value: i32,
    pub function_mode: TouchFunctionMode,
}

/// Settings for the scale quantizer (8-byte record).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleSettings {
    pub scale_type: ScaleType,
    /// Pitch class of the scale root, 0-11.
    pub root_note: i32,
}

/// In-memory collection of decoded settings records.
///
/// Fields are independently optional: a failed or skipped read/write
/// for one record leaves the others untouched. A bulk read starts from
/// an empty aggregate and populates whatever it could fetch; a bulk
/// write consumes only the fields that are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub lever1: Option<LeverSettings>,
    pub lever2: Option<LeverSettings>,
    pub lever_push1: Option<LeverPushSettings>,
    pub lever_push2: Option<LeverPushSettings>,
    pub touch: Option<TouchSettings>,
    pub scale: Option<ScaleSettings>,
}
