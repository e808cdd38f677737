//! Handle table for the Alert Notification Service
//!
//! Discovery fills the table with the attribute handles of the profile's
//! characteristics on the peer. A handle of 0 means "not resolved".

use super::constants::*;
use super::types::AlertKind;
use crate::uuid::{uuid_equal, Uuid};

/// Characteristics of the Alert Notification Service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileCharacteristic {
    NewAlert,
    UnreadAlertStatus,
    ControlPoint,
    SupportedNewAlertCategory,
    SupportedUnreadAlertCategory,
}

impl ProfileCharacteristic {
    pub const ALL: [ProfileCharacteristic; 5] = [
        ProfileCharacteristic::NewAlert,
        ProfileCharacteristic::ControlPoint,
        ProfileCharacteristic::UnreadAlertStatus,
        ProfileCharacteristic::SupportedNewAlertCategory,
        ProfileCharacteristic::SupportedUnreadAlertCategory,
    ];

    pub fn uuid(&self) -> Uuid {
        let uuid16 = match self {
            ProfileCharacteristic::NewAlert => NEW_ALERT_UUID,
            ProfileCharacteristic::UnreadAlertStatus => UNREAD_ALERT_STATUS_UUID,
            ProfileCharacteristic::ControlPoint => ALERT_NOTIFICATION_CONTROL_POINT_UUID,
            ProfileCharacteristic::SupportedNewAlertCategory => SUPPORTED_NEW_ALERT_CATEGORY_UUID,
            ProfileCharacteristic::SupportedUnreadAlertCategory => {
                SUPPORTED_UNREAD_ALERT_CATEGORY_UUID
            }
        };
        Uuid::Uuid16(uuid16)
    }

    /// Match a discovered UUID against the profile's 16-bit UUIDs
    pub fn from_uuid(uuid: &Uuid) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|characteristic| uuid_equal(&characteristic.uuid(), uuid))
    }

    /// Alert characteristic carrying notifications of the given class
    pub fn for_alert(kind: AlertKind) -> Self {
        match kind {
            AlertKind::New => ProfileCharacteristic::NewAlert,
            AlertKind::Unread => ProfileCharacteristic::UnreadAlertStatus,
        }
    }
}

/// Declaration and value handle of one characteristic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CharacteristicHandles {
    pub declaration: u16,
    pub value: u16,
}

impl CharacteristicHandles {
    pub fn is_resolved(&self) -> bool {
        self.declaration != 0 && self.value != 0
    }
}

/// Resolved handles of the profile on the connected peer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandleTable {
    pub new_alert: CharacteristicHandles,
    pub new_alert_cccd: u16,
    pub unread_alert: CharacteristicHandles,
    pub unread_alert_cccd: u16,
    pub control_point: CharacteristicHandles,
    pub supported_new_alert_category: CharacteristicHandles,
    pub supported_unread_alert_category: CharacteristicHandles,
}

impl HandleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, characteristic: ProfileCharacteristic) -> CharacteristicHandles {
        match characteristic {
            ProfileCharacteristic::NewAlert => self.new_alert,
            ProfileCharacteristic::UnreadAlertStatus => self.unread_alert,
            ProfileCharacteristic::ControlPoint => self.control_point,
            ProfileCharacteristic::SupportedNewAlertCategory => self.supported_new_alert_category,
            ProfileCharacteristic::SupportedUnreadAlertCategory => {
                self.supported_unread_alert_category
            }
        }
    }

    fn get_mut(&mut self, characteristic: ProfileCharacteristic) -> &mut CharacteristicHandles {
        match characteristic {
            ProfileCharacteristic::NewAlert => &mut self.new_alert,
            ProfileCharacteristic::UnreadAlertStatus => &mut self.unread_alert,
            ProfileCharacteristic::ControlPoint => &mut self.control_point,
            ProfileCharacteristic::SupportedNewAlertCategory => {
                &mut self.supported_new_alert_category
            }
            ProfileCharacteristic::SupportedUnreadAlertCategory => {
                &mut self.supported_unread_alert_category
            }
        }
    }

    /// Record the handles of a discovered characteristic.
    ///
    /// Returns the characteristic the UUID matched, or `None` when the UUID is
    /// not part of the profile. A repeated UUID overwrites the earlier handles.
    pub fn resolve(
        &mut self,
        uuid: &Uuid,
        handle: u16,
        value_handle: u16,
    ) -> Option<ProfileCharacteristic> {
        let characteristic = ProfileCharacteristic::from_uuid(uuid)?;
        *self.get_mut(characteristic) = CharacteristicHandles {
            declaration: handle,
            value: value_handle,
        };
        Some(characteristic)
    }

    pub fn cccd(&self, kind: AlertKind) -> u16 {
        match kind {
            AlertKind::New => self.new_alert_cccd,
            AlertKind::Unread => self.unread_alert_cccd,
        }
    }

    pub fn set_cccd(&mut self, kind: AlertKind, handle: u16) {
        match kind {
            AlertKind::New => self.new_alert_cccd = handle,
            AlertKind::Unread => self.unread_alert_cccd = handle,
        }
    }

    /// Value handle of the supported-category characteristic for a class
    pub fn supported_category_value(&self, kind: AlertKind) -> u16 {
        match kind {
            AlertKind::New => self.supported_new_alert_category.value,
            AlertKind::Unread => self.supported_unread_alert_category.value,
        }
    }

    /// New Alert, Control Point and Supported New Alert Category must exist
    pub fn has_mandatory(&self) -> bool {
        self.new_alert.is_resolved()
            && self.control_point.is_resolved()
            && self.supported_new_alert_category.is_resolved()
    }

    /// Declaration handles of all five characteristics, 0 for unresolved ones
    pub fn declaration_handles(&self) -> [u16; 5] {
        ProfileCharacteristic::ALL.map(|characteristic| self.get(characteristic).declaration)
    }

    /// Handle range in which the descriptors of `characteristic` can live.
    ///
    /// The range starts right after the declaration and ends just before the
    /// next larger known declaration, or at `service_end` when the
    /// characteristic is the last one of the service. The returned range is
    /// empty (start > end) when the next declaration immediately follows.
    pub fn descriptor_range(
        &self,
        characteristic: ProfileCharacteristic,
        service_end: u16,
    ) -> Option<(u16, u16)> {
        let declaration = self.get(characteristic).declaration;
        if declaration == 0 {
            return None;
        }
        let start = declaration.checked_add(1)?;

        let mut sorted = self.declaration_handles();
        sorted.sort_unstable();

        let end = sorted
            .iter()
            .find(|&&handle| handle > declaration)
            .map(|&next| next - 1)
            .unwrap_or(service_end);

        Some((start, end))
    }

    /// Characteristic whose value handle is `handle`
    pub fn characteristic_for_value(&self, handle: u16) -> Option<ProfileCharacteristic> {
        if handle == 0 {
            return None;
        }
        ProfileCharacteristic::ALL
            .iter()
            .copied()
            .find(|&characteristic| self.get(characteristic).value == handle)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated() -> HandleTable {
        let mut table = HandleTable::new();
        table.resolve(&Uuid::Uuid16(NEW_ALERT_UUID), 10, 11);
        table.resolve(&Uuid::Uuid16(ALERT_NOTIFICATION_CONTROL_POINT_UUID), 20, 21);
        table.resolve(&Uuid::Uuid16(UNREAD_ALERT_STATUS_UUID), 30, 31);
        table.resolve(&Uuid::Uuid16(SUPPORTED_NEW_ALERT_CATEGORY_UUID), 40, 41);
        table.resolve(&Uuid::Uuid16(SUPPORTED_UNREAD_ALERT_CATEGORY_UUID), 50, 51);
        table
    }

    #[test]
    fn test_resolve_matches_profile_uuids() {
        let mut table = HandleTable::new();
        assert_eq!(
            table.resolve(&Uuid::Uuid16(NEW_ALERT_UUID), 3, 4),
            Some(ProfileCharacteristic::NewAlert)
        );
        assert_eq!(table.new_alert, CharacteristicHandles { declaration: 3, value: 4 });

        // Unknown and wrong-length UUIDs are ignored
        assert_eq!(table.resolve(&Uuid::Uuid16(0x2A19), 5, 6), None);
        assert_eq!(table.resolve(&Uuid::Uuid32(NEW_ALERT_UUID as u32), 7, 8), None);
        assert_eq!(table.new_alert.declaration, 3);

        // Duplicates overwrite
        table.resolve(&Uuid::Uuid16(NEW_ALERT_UUID), 9, 10);
        assert_eq!(table.new_alert.value, 10);
    }

    #[test]
    fn test_descriptor_range_example() {
        let table = populated();
        assert_eq!(
            table.descriptor_range(ProfileCharacteristic::NewAlert, 100),
            Some((11, 19))
        );
        assert_eq!(
            table.descriptor_range(ProfileCharacteristic::SupportedUnreadAlertCategory, 100),
            Some((51, 100))
        );
    }

    #[test]
    fn test_descriptor_ranges_do_not_overlap() {
        let mut table = HandleTable::new();
        // Declared out of order on purpose
        table.resolve(&Uuid::Uuid16(NEW_ALERT_UUID), 42, 43);
        table.resolve(&Uuid::Uuid16(ALERT_NOTIFICATION_CONTROL_POINT_UUID), 7, 8);
        table.resolve(&Uuid::Uuid16(UNREAD_ALERT_STATUS_UUID), 15, 16);
        table.resolve(&Uuid::Uuid16(SUPPORTED_NEW_ALERT_CATEGORY_UUID), 60, 61);
        table.resolve(&Uuid::Uuid16(SUPPORTED_UNREAD_ALERT_CATEGORY_UUID), 29, 30);
        let service_end = 80;

        let mut ranges: Vec<(u16, u16)> = ProfileCharacteristic::ALL
            .iter()
            .filter_map(|&c| table.descriptor_range(c, service_end))
            .collect();
        ranges.sort();

        assert_eq!(ranges.first().map(|r| r.0), Some(8));
        assert_eq!(ranges.last().map(|r| r.1), Some(service_end));
        for pair in ranges.windows(2) {
            // Each range stops right before the next declaration
            assert_eq!(pair[0].1 + 2, pair[1].0);
        }
    }

    #[test]
    fn test_descriptor_range_with_unresolved_optionals() {
        let mut table = HandleTable::new();
        table.resolve(&Uuid::Uuid16(NEW_ALERT_UUID), 30, 31);
        table.resolve(&Uuid::Uuid16(ALERT_NOTIFICATION_CONTROL_POINT_UUID), 10, 11);
        table.resolve(&Uuid::Uuid16(SUPPORTED_NEW_ALERT_CATEGORY_UUID), 20, 21);

        assert_eq!(
            table.descriptor_range(ProfileCharacteristic::NewAlert, 0x40),
            Some((31, 0x40))
        );
        assert_eq!(
            table.descriptor_range(ProfileCharacteristic::UnreadAlertStatus, 0x40),
            None
        );
    }

    #[test]
    fn test_value_lookup_and_clear() {
        let mut table = populated();
        table.set_cccd(AlertKind::New, 12);
        assert!(table.has_mandatory());
        assert_eq!(
            table.characteristic_for_value(31),
            Some(ProfileCharacteristic::UnreadAlertStatus)
        );
        assert_eq!(table.characteristic_for_value(0), None);
        assert_eq!(table.cccd(AlertKind::New), 12);

        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.declaration_handles(), [0; 5]);
        assert!(!table.has_mandatory());
    }
}
