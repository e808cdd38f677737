//! RustyANC - Bluetooth LE Alert Notification Profile client
//!
//! This library implements the client role of the Alert Notification Profile on
//! top of an abstract GATT transport. It discovers the peer's Alert
//! Notification Service, subscribes to New Alert and Unread Alert Status
//! notifications, writes the control point and decodes incoming alerts.
//! Commands rejected for insufficient authentication can be replayed after
//! pairing through [`AncSession`].

pub mod anc;
pub mod error;
pub mod gap;
pub mod uuid;

// Re-export common types for convenience
pub use anc::{
    AlertCategory, AlertCategoryMask, AlertKind, AlertNotificationClient, AncCommand, AncConfig,
    AncEvent, AncSession, ConnectionInfo, ControlCommand, DiscoveryData, DiscoveryType, Dispatch,
    GattEvent, GattTransport,
};
pub use error::{AncError, AncResult, GattStatus};
pub use gap::{AddressType, BdAddr};
pub use uuid::Uuid;
