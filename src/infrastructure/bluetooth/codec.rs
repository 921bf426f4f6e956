//! Record Codec
//!
//! Encode/decode between structured settings values and the
//! fixed-layout records the firmware stores behind each
//! characteristic. All multi-byte integers are little-endian; there is
//! no framing, checksum, or version byte - the record length is the
//! implicit type tag.
//!
//! Decoding reads exactly the expected size and ignores trailing
//! bytes. Enum ordinals are never validated here: firmware newer than
//! this build may define members we do not know, and they must pass
//! through a read/edit/write cycle untouched.
//!
//! # Record layouts
//!
//! ```text
//! Lever (40 bytes):
//! [0-3]   ccNumber      (i32)     [20-23] valueMode   (i32 ordinal)
//! [4-7]   minCCValue    (i32)     [24-27] onsetTime   (u32, ms)
//! [8-11]  maxCCValue    (i32)     [28-31] offsetTime  (u32, ms)
//! [12-15] stepSize      (i32)     [32-35] onsetType   (i32 ordinal)
//! [16-19] functionMode  (ordinal) [36-39] offsetType  (i32 ordinal)
//!
//! LeverPush (32 bytes):
//! [0-3]   ccNumber      (i32)     [16-19] onsetTime   (u32, ms)
//! [4-7]   minCCValue    (i32)     [20-23] offsetTime  (u32, ms)
//! [8-11]  maxCCValue    (i32)     [24-27] onsetType   (i32 ordinal)
//! [12-15] functionMode  (ordinal) [28-31] offsetType  (i32 ordinal)
//!
//! Touch (16 bytes):
//! [0-3]   ccNumber      (i32)     [8-11]  maxCCValue  (i32)
//! [4-7]   minCCValue    (i32)     [12-15] functionMode (ordinal)
//!
//! Scale (8 bytes):
//! [0-3]   scaleType     (ordinal) [4-7]   rootNote    (i32)
//! ```

use bytes::{Buf, BufMut};

use crate::domain::settings::{
    InterpolationType, LeverFunctionMode, LeverPushFunctionMode, LeverPushSettings, LeverSettings,
    ScaleSettings, ScaleType, SettingsKind, TouchFunctionMode, TouchSettings, ValueMode,
};
use crate::error::LinkError;

pub const LEVER_SIZE: usize = 40;
pub const LEVER_PUSH_SIZE: usize = 32;
pub const TOUCH_SIZE: usize = 16;
pub const SCALE_SIZE: usize = 8;

/// Wire size of the record for `kind`.
pub fn expected_size(kind: SettingsKind) -> usize {
    match kind {
        SettingsKind::Lever1 | SettingsKind::Lever2 => LEVER_SIZE,
        SettingsKind::LeverPush1 | SettingsKind::LeverPush2 => LEVER_PUSH_SIZE,
        SettingsKind::Touch => TOUCH_SIZE,
        SettingsKind::Scale => SCALE_SIZE,
    }
}

fn check_len(bytes: &[u8], expected: usize) -> Result<(), LinkError> {
    if bytes.len() < expected {
        return Err(LinkError::MalformedRecord {
            expected,
            actual: bytes.len(),
        });
    }
    Ok(())
}

pub fn decode_lever(bytes: &[u8]) -> Result<LeverSettings, LinkError> {
    check_len(bytes, LEVER_SIZE)?;
    let mut buf = &bytes[..LEVER_SIZE];
    Ok(LeverSettings {
        cc_number: buf.get_i32_le(),
        min_cc_value: buf.get_i32_le(),
        max_cc_value: buf.get_i32_le(),
        step_size: buf.get_i32_le(),
        function_mode: LeverFunctionMode::from_ordinal(buf.get_i32_le()),
        value_mode: ValueMode::from_ordinal(buf.get_i32_le()),
        onset_time: buf.get_u32_le(),
        offset_time: buf.get_u32_le(),
        onset_type: InterpolationType::from_ordinal(buf.get_i32_le()),
        offset_type: InterpolationType::from_ordinal(buf.get_i32_le()),
    })
}

pub fn encode_lever(settings: &LeverSettings) -> Vec<u8> {
    let mut buf = Vec::with_capacity(LEVER_SIZE);
    buf.put_i32_le(settings.cc_number);
    buf.put_i32_le(settings.min_cc_value);
    buf.put_i32_le(settings.max_cc_value);
    buf.put_i32_le(settings.step_size);
    buf.put_i32_le(settings.function_mode.ordinal());
    buf.put_i32_le(settings.value_mode.ordinal());
    buf.put_u32_le(settings.onset_time);
    buf.put_u32_le(settings.offset_time);
    buf.put_i32_le(settings.onset_type.ordinal());
    buf.put_i32_le(settings.offset_type.ordinal());
    buf
}

pub fn decode_lever_push(bytes: &[u8]) -> Result<LeverPushSettings, LinkError> {
    check_len(bytes, LEVER_PUSH_SIZE)?;
    let mut buf = &bytes[..LEVER_PUSH_SIZE];
    Ok(LeverPushSettings {
        cc_number: buf.get_i32_le(),
        min_cc_value: buf.get_i32_le(),
        max_cc_value: buf.get_i32_le(),
        function_mode: LeverPushFunctionMode::from_ordinal(buf.get_i32_le()),
        onset_time: buf.get_u32_le(),
        offset_time: buf.get_u32_le(),
        onset_type: InterpolationType::from_ordinal(buf.get_i32_le()),
        offset_type: InterpolationType::from_ordinal(buf.get_i32_le()),
    })
}

pub fn encode_lever_push(settings: &LeverPushSettings) -> Vec<u8> {
    let mut buf = Vec::with_capacity(LEVER_PUSH_SIZE);
    buf.put_i32_le(settings.cc_number);
    buf.put_i32_le(settings.min_cc_value);
    buf.put_i32_le(settings.max_cc_value);
    buf.put_i32_le(settings.function_mode.ordinal());
    buf.put_u32_le(settings.onset_time);
    buf.put_u32_le(settings.offset_time);
    buf.put_i32_le(settings.onset_type.ordinal());
    buf.put_i32_le(settings.offset_type.ordinal());
    buf
}

pub fn decode_touch(bytes: &[u8]) -> Result<TouchSettings, LinkError> {
    check_len(bytes, TOUCH_SIZE)?;
    let mut buf = &bytes[..TOUCH_SIZE];
    Ok(TouchSettings {
        cc_number: buf.get_i32_le(),
        min_cc_value: buf.get_i32_le(),
        max_cc_value: buf.get_i32_le(),
        function_mode: TouchFunctionMode::from_ordinal(buf.get_i32_le()),
    })
}

pub fn encode_touch(settings: &TouchSettings) -> Vec<u8> {
    let mut buf = Vec::with_capacity(TOUCH_SIZE);
    buf.put_i32_le(settings.cc_number);
    buf.put_i32_le(settings.min_cc_value);
    buf.put_i32_le(settings.max_cc_value);
    buf.put_i32_le(settings.function_mode.ordinal());
    buf
}

pub fn decode_scale(bytes: &[u8]) -> Result<ScaleSettings, LinkError> {
    check_len(bytes, SCALE_SIZE)?;
    let mut buf = &bytes[..SCALE_SIZE];
    Ok(ScaleSettings {
        scale_type: ScaleType::from_ordinal(buf.get_i32_le()),
        root_note: buf.get_i32_le(),
    })
}

pub fn encode_scale(settings: &ScaleSettings) -> Vec<u8> {
    let mut buf = Vec::with_capacity(SCALE_SIZE);
    buf.put_i32_le(settings.scale_type.ordinal());
    buf.put_i32_le(settings.root_note);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lever_fixture() -> LeverSettings {
        LeverSettings {
            cc_number: 74,
            min_cc_value: -64,
            max_cc_value: 127,
            step_size: 2,
            function_mode: LeverFunctionMode::PeakAndDecay,
            value_mode: ValueMode::Bipolar,
            onset_time: 120,
            offset_time: 3_000_000_000, // exercises the u32 range above i32::MAX
            onset_type: InterpolationType::Exponential,
            offset_type: InterpolationType::Logarithmic,
        }
    }

    #[test]
    fn scale_record_matches_wire_example() {
        let settings = ScaleSettings {
            scale_type: ScaleType::Major,
            root_note: 9,
        };
        let bytes = encode_scale(&settings);
        assert_eq!(bytes, [0x01, 0x00, 0x00, 0x00, 0x09, 0x00, 0x00, 0x00]);
        assert_eq!(decode_scale(&bytes).unwrap(), settings);
    }

    #[test]
    fn lever_round_trips() {
        let settings = lever_fixture();
        let bytes = encode_lever(&settings);
        assert_eq!(bytes.len(), LEVER_SIZE);
        assert_eq!(decode_lever(&bytes).unwrap(), settings);
    }

    #[test]
    fn lever_push_round_trips() {
        let settings = LeverPushSettings {
            cc_number: 1,
            min_cc_value: 0,
            max_cc_value: 127,
            function_mode: LeverPushFunctionMode::Reset,
            onset_time: 0,
            offset_time: 250,
            onset_type: InterpolationType::Linear,
            offset_type: InterpolationType::Exponential,
        };
        let bytes = encode_lever_push(&settings);
        assert_eq!(bytes.len(), LEVER_PUSH_SIZE);
        assert_eq!(decode_lever_push(&bytes).unwrap(), settings);
    }

    #[test]
    fn touch_round_trips() {
        let settings = TouchSettings {
            cc_number: 11,
            min_cc_value: -1,
            max_cc_value: 100,
            function_mode: TouchFunctionMode::Toggle,
        };
        let bytes = encode_touch(&settings);
        assert_eq!(bytes.len(), TOUCH_SIZE);
        assert_eq!(decode_touch(&bytes).unwrap(), settings);
    }

    #[test]
    fn expected_sizes_per_kind() {
        assert_eq!(expected_size(SettingsKind::Lever1), 40);
        assert_eq!(expected_size(SettingsKind::Lever2), 40);
        assert_eq!(expected_size(SettingsKind::LeverPush1), 32);
        assert_eq!(expected_size(SettingsKind::LeverPush2), 32);
        assert_eq!(expected_size(SettingsKind::Touch), 16);
        assert_eq!(expected_size(SettingsKind::Scale), 8);
    }

    #[test]
    fn short_input_is_malformed() {
        assert!(matches!(
            decode_lever(&[0u8; 39]),
            Err(LinkError::MalformedRecord {
                expected: 40,
                actual: 39
            })
        ));
        assert!(matches!(
            decode_lever_push(&[0u8; 8]),
            Err(LinkError::MalformedRecord { expected: 32, .. })
        ));
        assert!(matches!(
            decode_touch(&[]),
            Err(LinkError::MalformedRecord { expected: 16, .. })
        ));
        assert!(matches!(
            decode_scale(&[0u8; 7]),
            Err(LinkError::MalformedRecord { expected: 8, .. })
        ));
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let mut bytes = encode_scale(&ScaleSettings {
            scale_type: ScaleType::Blues,
            root_note: 4,
        });
        bytes.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        let decoded = decode_scale(&bytes).unwrap();
        assert_eq!(decoded.scale_type, ScaleType::Blues);
        assert_eq!(decoded.root_note, 4);
    }

    #[test]
    fn unknown_ordinals_round_trip_unchanged() {
        let mut bytes = encode_touch(&TouchSettings {
            cc_number: 20,
            min_cc_value: 0,
            max_cc_value: 127,
            function_mode: TouchFunctionMode::Hold,
        });
        // Ordinal 99 is not a known touch mode; it must survive decode
        // and re-encode byte for byte.
        bytes[12..16].copy_from_slice(&99i32.to_le_bytes());
        let decoded = decode_touch(&bytes).unwrap();
        assert_eq!(decoded.function_mode, TouchFunctionMode::Other(99));
        assert_eq!(encode_touch(&decoded), bytes);
    }
}
