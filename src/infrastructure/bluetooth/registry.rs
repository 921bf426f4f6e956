//! KB1 Characteristic Registry
//!
//! Static mapping from settings record kinds to the GATT
//! characteristic UUIDs the firmware publishes them under. The service
//! UUID is the one identifier that is not itself a record.

use crate::domain::settings::SettingsKind;

/// Local name the controller advertises under.
pub const DEVICE_NAME: &str = "KB1";

/// Primary settings service UUID.
pub const SERVICE_UUID: &str = "f22b99e8-81ab-4e46-abff-79a74a1f2ff3";

/// Characteristic UUID carrying the record for `kind`.
pub fn uuid_for(kind: SettingsKind) -> &'static str {
    match kind {
        SettingsKind::Lever1 => "6bae0d4d-a0a4-4bc6-9802-a5d27fb15680",
        SettingsKind::Lever2 => "13ffbea4-793f-40f5-82da-ac9eca5f0e09",
        SettingsKind::LeverPush1 => "1de84ff3-36c0-4cf6-912b-208600cf94f4",
        SettingsKind::LeverPush2 => "52629808-3d14-4ae8-a826-40bcec6467d5",
        SettingsKind::Touch => "5612b54d-8bfe-4217-a079-c9c95ab32c41",
        SettingsKind::Scale => "297bd635-c3e8-4fb4-b5e0-93586da8f14c",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn record_uuids_are_unique() {
        let uuids: HashSet<_> = SettingsKind::ALL.iter().map(|&k| uuid_for(k)).collect();
        assert_eq!(uuids.len(), SettingsKind::ALL.len());
    }

    #[test]
    fn service_uuid_is_not_a_record() {
        assert!(SettingsKind::ALL.iter().all(|&k| uuid_for(k) != SERVICE_UUID));
    }
}
