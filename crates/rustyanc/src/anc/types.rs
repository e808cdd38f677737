//! Common types for the Alert Notification client
//!
//! This module defines alert categories, control point commands and the
//! events delivered to the application.

use super::constants::*;
use crate::error::GattStatus;
use bitflags::bitflags;
use std::fmt;

/// Alert category as carried in notifications and control point writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertCategory {
    SimpleAlert,
    Email,
    News,
    Call,
    MissedCall,
    SmsOrMms,
    VoiceMail,
    ScheduleAlert,
    HighPriorityAlert,
    InstantMessage,
    /// All categories; only meaningful in control point writes
    All,
}

impl AlertCategory {
    /// Convert from the wire value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            CATEGORY_ID_SIMPLE_ALERT => Some(AlertCategory::SimpleAlert),
            CATEGORY_ID_EMAIL => Some(AlertCategory::Email),
            CATEGORY_ID_NEWS => Some(AlertCategory::News),
            CATEGORY_ID_CALL => Some(AlertCategory::Call),
            CATEGORY_ID_MISSED_CALL => Some(AlertCategory::MissedCall),
            CATEGORY_ID_SMS_OR_MMS => Some(AlertCategory::SmsOrMms),
            CATEGORY_ID_VOICE_MAIL => Some(AlertCategory::VoiceMail),
            CATEGORY_ID_SCHEDULE_ALERT => Some(AlertCategory::ScheduleAlert),
            CATEGORY_ID_HIGH_PRIORITY_ALERT => Some(AlertCategory::HighPriorityAlert),
            CATEGORY_ID_INSTANT_MESSAGE => Some(AlertCategory::InstantMessage),
            CATEGORY_ID_ALL => Some(AlertCategory::All),
            _ => None,
        }
    }

    /// Convert to the wire value
    pub fn to_u8(&self) -> u8 {
        match self {
            AlertCategory::SimpleAlert => CATEGORY_ID_SIMPLE_ALERT,
            AlertCategory::Email => CATEGORY_ID_EMAIL,
            AlertCategory::News => CATEGORY_ID_NEWS,
            AlertCategory::Call => CATEGORY_ID_CALL,
            AlertCategory::MissedCall => CATEGORY_ID_MISSED_CALL,
            AlertCategory::SmsOrMms => CATEGORY_ID_SMS_OR_MMS,
            AlertCategory::VoiceMail => CATEGORY_ID_VOICE_MAIL,
            AlertCategory::ScheduleAlert => CATEGORY_ID_SCHEDULE_ALERT,
            AlertCategory::HighPriorityAlert => CATEGORY_ID_HIGH_PRIORITY_ALERT,
            AlertCategory::InstantMessage => CATEGORY_ID_INSTANT_MESSAGE,
            AlertCategory::All => CATEGORY_ID_ALL,
        }
    }

    /// Human readable name
    pub fn name(&self) -> &'static str {
        match self {
            AlertCategory::SimpleAlert => "Simple Alert",
            AlertCategory::Email => "Email",
            AlertCategory::News => "News",
            AlertCategory::Call => "Call",
            AlertCategory::MissedCall => "Missed Call",
            AlertCategory::SmsOrMms => "SMS/MMS",
            AlertCategory::VoiceMail => "Voice Mail",
            AlertCategory::ScheduleAlert => "Scheduled Alert",
            AlertCategory::HighPriorityAlert => "High Priority Alert",
            AlertCategory::InstantMessage => "Instant Message",
            AlertCategory::All => "All",
        }
    }
}

impl fmt::Display for AlertCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// Category bitmap read from the Supported New/Unread Alert Category
    /// characteristics
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AlertCategoryMask: u16 {
        const SIMPLE_ALERT = 1 << 0;
        const EMAIL = 1 << 1;
        const NEWS = 1 << 2;
        const CALL = 1 << 3;
        const MISSED_CALL = 1 << 4;
        const SMS_OR_MMS = 1 << 5;
        const VOICE_MAIL = 1 << 6;
        const SCHEDULE_ALERT = 1 << 7;
        const HIGH_PRIORITY_ALERT = 1 << 8;
        const INSTANT_MESSAGE = 1 << 9;
    }
}

impl AlertCategoryMask {
    /// Whether the bitmap advertises the given category
    pub fn supports(&self, category: AlertCategory) -> bool {
        match category {
            AlertCategory::All => !self.is_empty(),
            other => self.bits() & (1 << other.to_u8()) != 0,
        }
    }
}

/// Alert notification control point command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlCommand {
    EnableNewAlertNotification,
    EnableUnreadStatusNotification,
    DisableNewAlertNotification,
    DisableUnreadStatusNotification,
    NotifyNewAlertImmediately,
    NotifyUnreadStatusImmediately,
}

impl ControlCommand {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            CMD_ENABLE_NEW_ALERT_NOTIFICATION => Some(ControlCommand::EnableNewAlertNotification),
            CMD_ENABLE_UNREAD_STATUS_NOTIFICATION => {
                Some(ControlCommand::EnableUnreadStatusNotification)
            }
            CMD_DISABLE_NEW_ALERT_NOTIFICATION => Some(ControlCommand::DisableNewAlertNotification),
            CMD_DISABLE_UNREAD_STATUS_NOTIFICATION => {
                Some(ControlCommand::DisableUnreadStatusNotification)
            }
            CMD_NOTIFY_NEW_ALERT_IMMEDIATELY => Some(ControlCommand::NotifyNewAlertImmediately),
            CMD_NOTIFY_UNREAD_STATUS_IMMEDIATELY => {
                Some(ControlCommand::NotifyUnreadStatusImmediately)
            }
            _ => None,
        }
    }

    pub fn to_u8(&self) -> u8 {
        match self {
            ControlCommand::EnableNewAlertNotification => CMD_ENABLE_NEW_ALERT_NOTIFICATION,
            ControlCommand::EnableUnreadStatusNotification => CMD_ENABLE_UNREAD_STATUS_NOTIFICATION,
            ControlCommand::DisableNewAlertNotification => CMD_DISABLE_NEW_ALERT_NOTIFICATION,
            ControlCommand::DisableUnreadStatusNotification => {
                CMD_DISABLE_UNREAD_STATUS_NOTIFICATION
            }
            ControlCommand::NotifyNewAlertImmediately => CMD_NOTIFY_NEW_ALERT_IMMEDIATELY,
            ControlCommand::NotifyUnreadStatusImmediately => CMD_NOTIFY_UNREAD_STATUS_IMMEDIATELY,
        }
    }
}

/// The two alert classes a client can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertKind {
    New,
    Unread,
}

/// Events delivered to the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AncEvent {
    /// Discovery of the profile's characteristics and descriptors finished
    DiscoverResult { conn_id: u16, status: GattStatus },
    SupportedNewAlertsResult {
        conn_id: u16,
        status: GattStatus,
        categories: AlertCategoryMask,
    },
    SupportedUnreadAlertsResult {
        conn_id: u16,
        status: GattStatus,
        categories: AlertCategoryMask,
    },
    /// Write response for a control point command
    ControlAlertsResult {
        conn_id: u16,
        status: GattStatus,
        command: ControlCommand,
        category: AlertCategory,
    },
    EnableNewAlertsResult { conn_id: u16, status: GattStatus },
    DisableNewAlertsResult { conn_id: u16, status: GattStatus },
    EnableUnreadAlertsResult { conn_id: u16, status: GattStatus },
    DisableUnreadAlertsResult { conn_id: u16, status: GattStatus },
    NewAlertNotification {
        conn_id: u16,
        category: AlertCategory,
        count: u8,
        text: String,
    },
    UnreadAlertNotification {
        conn_id: u16,
        category: AlertCategory,
        count: u8,
    },
}

impl AncEvent {
    /// Result event for a CCCD write of the given alert class and direction
    pub fn configuration_result(
        kind: AlertKind,
        enabled: bool,
        conn_id: u16,
        status: GattStatus,
    ) -> Self {
        match (kind, enabled) {
            (AlertKind::New, true) => AncEvent::EnableNewAlertsResult { conn_id, status },
            (AlertKind::New, false) => AncEvent::DisableNewAlertsResult { conn_id, status },
            (AlertKind::Unread, true) => AncEvent::EnableUnreadAlertsResult { conn_id, status },
            (AlertKind::Unread, false) => AncEvent::DisableUnreadAlertsResult { conn_id, status },
        }
    }

    /// Result event for a supported-category read
    pub fn supported_alerts_result(
        kind: AlertKind,
        conn_id: u16,
        status: GattStatus,
        categories: AlertCategoryMask,
    ) -> Self {
        match kind {
            AlertKind::New => AncEvent::SupportedNewAlertsResult {
                conn_id,
                status,
                categories,
            },
            AlertKind::Unread => AncEvent::SupportedUnreadAlertsResult {
                conn_id,
                status,
                categories,
            },
        }
    }

    pub fn conn_id(&self) -> u16 {
        match self {
            AncEvent::DiscoverResult { conn_id, .. }
            | AncEvent::SupportedNewAlertsResult { conn_id, .. }
            | AncEvent::SupportedUnreadAlertsResult { conn_id, .. }
            | AncEvent::ControlAlertsResult { conn_id, .. }
            | AncEvent::EnableNewAlertsResult { conn_id, .. }
            | AncEvent::DisableNewAlertsResult { conn_id, .. }
            | AncEvent::EnableUnreadAlertsResult { conn_id, .. }
            | AncEvent::DisableUnreadAlertsResult { conn_id, .. }
            | AncEvent::NewAlertNotification { conn_id, .. }
            | AncEvent::UnreadAlertNotification { conn_id, .. } => *conn_id,
        }
    }

    /// Status of a result event; notifications carry none
    pub fn status(&self) -> Option<GattStatus> {
        match self {
            AncEvent::DiscoverResult { status, .. }
            | AncEvent::SupportedNewAlertsResult { status, .. }
            | AncEvent::SupportedUnreadAlertsResult { status, .. }
            | AncEvent::ControlAlertsResult { status, .. }
            | AncEvent::EnableNewAlertsResult { status, .. }
            | AncEvent::DisableNewAlertsResult { status, .. }
            | AncEvent::EnableUnreadAlertsResult { status, .. }
            | AncEvent::DisableUnreadAlertsResult { status, .. } => Some(*status),
            AncEvent::NewAlertNotification { .. } | AncEvent::UnreadAlertNotification { .. } => {
                None
            }
        }
    }
}
