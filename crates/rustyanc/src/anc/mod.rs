//! Alert Notification Profile client
//!
//! This module discovers a peer's Alert Notification Service, configures its
//! New Alert and Unread Alert Status notifications, drives the control point
//! and decodes the alerts the peer sends.

pub mod client;
pub mod config;
pub mod constants;
pub mod handles;
pub mod notification;
pub mod session;
pub mod transport;
pub mod types;


pub use client::{AlertNotificationClient, ConfigPhase, DiscoveryPhase};
pub use config::AncConfig;
pub use handles::{CharacteristicHandles, HandleTable, ProfileCharacteristic};
pub use notification::{NewAlert, UnreadAlert};
pub use session::{AncCommand, AncSession, Dispatch, EventCallback};
pub use transport::{
    AuthRequirement, CharacteristicProperties, ConnectionInfo, DiscoveryData, DiscoveryType,
    GattEvent, GattTransport,
};
pub use types::{AlertCategory, AlertCategoryMask, AlertKind, AncEvent, ControlCommand};
