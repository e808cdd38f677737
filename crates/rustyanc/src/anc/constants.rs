//! Alert Notification Profile constants

// Service UUID
pub const ALERT_NOTIFICATION_SERVICE_UUID: u16 = 0x1811;

// Characteristic UUIDs
pub const ALERT_NOTIFICATION_CONTROL_POINT_UUID: u16 = 0x2A44;
pub const UNREAD_ALERT_STATUS_UUID: u16 = 0x2A45;
pub const NEW_ALERT_UUID: u16 = 0x2A46;
pub const SUPPORTED_NEW_ALERT_CATEGORY_UUID: u16 = 0x2A47;
pub const SUPPORTED_UNREAD_ALERT_CATEGORY_UUID: u16 = 0x2A48;

// Descriptor UUIDs
pub const CLIENT_CHAR_CONFIG_UUID: u16 = 0x2902;

// Client characteristic configuration values
pub const CCCD_NONE: u16 = 0x0000;
pub const CCCD_NOTIFICATION: u16 = 0x0001;

// Alert category ids
pub const CATEGORY_ID_SIMPLE_ALERT: u8 = 0;
pub const CATEGORY_ID_EMAIL: u8 = 1;
pub const CATEGORY_ID_NEWS: u8 = 2;
pub const CATEGORY_ID_CALL: u8 = 3;
pub const CATEGORY_ID_MISSED_CALL: u8 = 4;
pub const CATEGORY_ID_SMS_OR_MMS: u8 = 5;
pub const CATEGORY_ID_VOICE_MAIL: u8 = 6;
pub const CATEGORY_ID_SCHEDULE_ALERT: u8 = 7;
pub const CATEGORY_ID_HIGH_PRIORITY_ALERT: u8 = 8;
pub const CATEGORY_ID_INSTANT_MESSAGE: u8 = 9;
pub const CATEGORY_ID_ALL: u8 = 0xFF;

// Control point command ids
pub const CMD_ENABLE_NEW_ALERT_NOTIFICATION: u8 = 0;
pub const CMD_ENABLE_UNREAD_STATUS_NOTIFICATION: u8 = 1;
pub const CMD_DISABLE_NEW_ALERT_NOTIFICATION: u8 = 2;
pub const CMD_DISABLE_UNREAD_STATUS_NOTIFICATION: u8 = 3;
pub const CMD_NOTIFY_NEW_ALERT_IMMEDIATELY: u8 = 4;
pub const CMD_NOTIFY_UNREAD_STATUS_IMMEDIATELY: u8 = 5;

// Handle range searched for the primary service
pub const HANDLE_MIN: u16 = 0x0001;
pub const HANDLE_MAX: u16 = 0xFFFF;

// Payload limits
pub const CONTROL_POINT_VALUE_LEN: usize = 2;
pub const CCCD_VALUE_LEN: usize = 2;
pub const SUPPORTED_CATEGORY_VALUE_LEN: usize = 2;
pub const UNREAD_ALERT_VALUE_LEN: usize = 2;
pub const NEW_ALERT_HEADER_LEN: usize = 2;
pub const DEFAULT_MAX_READ_LEN: usize = 256;
/// Longest text a new alert carries at the default ATT MTU (23 - 3 - 2)
pub const DEFAULT_MAX_ALERT_TEXT_LEN: usize = 18;
