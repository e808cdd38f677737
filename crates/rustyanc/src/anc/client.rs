//! Alert Notification client
//!
//! This module drives a peer's Alert Notification Service through discovery
//! and configuration, and turns GATT completions and notifications into
//! [`AncEvent`]s.

use super::config::AncConfig;
use super::constants::*;
use super::handles::{HandleTable, ProfileCharacteristic};
use super::notification::{decode_category_bitmap, decode_new_alert, decode_unread_alert};
use super::transport::{ConnectionInfo, DiscoveryData, DiscoveryType, GattEvent, GattTransport};
use super::types::{AlertCategory, AlertCategoryMask, AlertKind, AncEvent, ControlCommand};
use crate::error::{AncError, AncResult, GattStatus};
use crate::uuid::{uuid_equal, Uuid};
use byteorder::{LittleEndian, WriteBytesExt};
use log::{debug, info, trace, warn};
use std::fmt;

/// Progress of the discovery procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryPhase {
    /// No connection, or the last discovery failed
    Idle,
    /// Connected; discovery either not started or finished
    Connected,
    /// Looking for the Alert Notification Service
    Services,
    Characteristics,
    NewAlertCccd,
    UnreadAlertCccd,
}

impl DiscoveryPhase {
    pub fn is_discovering(&self) -> bool {
        matches!(
            self,
            DiscoveryPhase::Services
                | DiscoveryPhase::Characteristics
                | DiscoveryPhase::NewAlertCccd
                | DiscoveryPhase::UnreadAlertCccd
        )
    }

    fn cccd_target(&self) -> Option<AlertKind> {
        match self {
            DiscoveryPhase::NewAlertCccd => Some(AlertKind::New),
            DiscoveryPhase::UnreadAlertCccd => Some(AlertKind::Unread),
            _ => None,
        }
    }
}

/// Outstanding CCCD write of one alert class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigPhase {
    #[default]
    Idle,
    Enabling,
    Disabling,
}

/// Client side of the Alert Notification Profile for one peer connection
pub struct AlertNotificationClient<T: GattTransport> {
    transport: T,
    config: AncConfig,
    connection: Option<ConnectionInfo>,
    service_range: (u16, u16),
    discovery: DiscoveryPhase,
    new_alert_config: ConfigPhase,
    unread_alert_config: ConfigPhase,
    handles: HandleTable,
    enabled_new: bool,
    enabled_unread: bool,
    pending_control: Option<(ControlCommand, AlertCategory)>,
}

impl<T: GattTransport> fmt::Debug for AlertNotificationClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlertNotificationClient")
            .field("connection", &self.connection)
            .field("service_range", &self.service_range)
            .field("discovery", &self.discovery)
            .field("new_alert_config", &self.new_alert_config)
            .field("unread_alert_config", &self.unread_alert_config)
            .field("handles", &self.handles)
            .field("pending_control", &self.pending_control)
            .finish()
    }
}

impl<T: GattTransport> AlertNotificationClient<T> {
    /// Create a client with the default configuration
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, AncConfig::default())
    }

    pub fn with_config(transport: T, config: AncConfig) -> Self {
        Self {
            transport,
            config,
            connection: None,
            service_range: (0, 0),
            discovery: DiscoveryPhase::Idle,
            new_alert_config: ConfigPhase::Idle,
            unread_alert_config: ConfigPhase::Idle,
            handles: HandleTable::new(),
            enabled_new: false,
            enabled_unread: false,
            pending_control: None,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn config(&self) -> &AncConfig {
        &self.config
    }

    pub fn conn_id(&self) -> Option<u16> {
        self.connection.map(|c| c.conn_id)
    }

    pub fn peer(&self) -> Option<&ConnectionInfo> {
        self.connection.as_ref()
    }

    pub fn service_range(&self) -> (u16, u16) {
        self.service_range
    }

    pub fn discovery_phase(&self) -> DiscoveryPhase {
        self.discovery
    }

    pub fn config_phase(&self, kind: AlertKind) -> ConfigPhase {
        match kind {
            AlertKind::New => self.new_alert_config,
            AlertKind::Unread => self.unread_alert_config,
        }
    }

    fn config_phase_mut(&mut self, kind: AlertKind) -> &mut ConfigPhase {
        match kind {
            AlertKind::New => &mut self.new_alert_config,
            AlertKind::Unread => &mut self.unread_alert_config,
        }
    }

    pub fn handles(&self) -> &HandleTable {
        &self.handles
    }

    /// Last requested notification state of an alert class
    pub fn is_enabled(&self, kind: AlertKind) -> bool {
        match kind {
            AlertKind::New => self.enabled_new,
            AlertKind::Unread => self.enabled_unread,
        }
    }

    fn set_enabled(&mut self, kind: AlertKind, enabled: bool) {
        match kind {
            AlertKind::New => self.enabled_new = enabled,
            AlertKind::Unread => self.enabled_unread = enabled,
        }
    }

    pub fn pending_control(&self) -> Option<(ControlCommand, AlertCategory)> {
        self.pending_control
    }

    /// Discovery finished and the New Alert CCCD is known
    pub fn is_ready(&self) -> bool {
        self.discovery == DiscoveryPhase::Connected && self.handles.new_alert_cccd != 0
    }

    fn require_connection(&self) -> AncResult<u16> {
        self.conn_id().ok_or(AncError::NotConnected)
    }

    fn in_service(&self, handle: u16) -> bool {
        let (start, end) = self.service_range;
        start != 0 && handle >= start && handle <= end
    }

    /// Forget everything learned about the peer
    fn reset(&mut self) {
        self.service_range = (0, 0);
        self.discovery = DiscoveryPhase::Idle;
        self.new_alert_config = ConfigPhase::Idle;
        self.unread_alert_config = ConfigPhase::Idle;
        self.handles.clear();
        self.enabled_new = false;
        self.enabled_unread = false;
        self.pending_control = None;
    }

    /// Dispatch one message from the transport.
    ///
    /// Messages for a connection other than the current one are ignored.
    pub fn handle_event(&mut self, event: GattEvent) -> Option<AncEvent> {
        if let GattEvent::ConnectionUp(info) = event {
            return self.connection_up(info);
        }

        let conn_id = match &event {
            GattEvent::ConnectionDown { conn_id, .. }
            | GattEvent::DiscoveryResult { conn_id, .. }
            | GattEvent::DiscoveryComplete { conn_id, .. }
            | GattEvent::WriteComplete { conn_id, .. }
            | GattEvent::ReadComplete { conn_id, .. }
            | GattEvent::Notification { conn_id, .. } => *conn_id,
            GattEvent::ConnectionUp(info) => info.conn_id,
        };
        if self.conn_id() != Some(conn_id) {
            debug!("Ignoring event for unknown connection {}", conn_id);
            return None;
        }

        match event {
            GattEvent::ConnectionDown { reason, .. } => {
                self.connection_down(reason);
                None
            }
            GattEvent::DiscoveryResult { data, .. } => {
                self.on_discovery_result(data);
                None
            }
            GattEvent::DiscoveryComplete { kind, status, .. } => {
                self.on_discovery_complete(kind, status)
            }
            GattEvent::WriteComplete { status, handle, .. } => self.on_write_response(status, handle),
            GattEvent::ReadComplete {
                status,
                handle,
                value,
                ..
            } => self.on_read_response(status, handle, &value),
            GattEvent::Notification { handle, value, .. } => self.on_notification(handle, &value),
            GattEvent::ConnectionUp(_) => None,
        }
    }

    /// A peer connected.
    ///
    /// Starts the service lookup when `discover_service_on_connect` is set; a
    /// failure to start it is reported as a `DiscoverResult`.
    pub fn connection_up(&mut self, info: ConnectionInfo) -> Option<AncEvent> {
        if let Some(current) = &self.connection {
            warn!(
                "Ignoring connection {} while connection {} is up",
                info.conn_id, current.conn_id
            );
            return None;
        }

        info!(
            "Connection {} up with {} ({:?})",
            info.conn_id, info.peer_addr, info.addr_type
        );
        self.reset();
        self.connection = Some(info);
        self.discovery = DiscoveryPhase::Connected;

        if !self.config.discover_service_on_connect {
            return None;
        }

        self.discovery = DiscoveryPhase::Services;
        match self.transport.discover(
            info.conn_id,
            DiscoveryType::PrimaryServices,
            None,
            HANDLE_MIN,
            HANDLE_MAX,
        ) {
            Ok(()) => None,
            Err(err) => {
                warn!("Failed to start service discovery: {}", err);
                self.discovery = DiscoveryPhase::Connected;
                Some(AncEvent::DiscoverResult {
                    conn_id: info.conn_id,
                    status: err.status(),
                })
            }
        }
    }

    /// The peer disconnected; all per-connection state is dropped
    pub fn connection_down(&mut self, reason: u8) {
        if let Some(info) = self.connection.take() {
            info!("Connection {} down (reason 0x{:02x})", info.conn_id, reason);
        }
        self.reset();
    }

    /// Discover the profile's characteristics within the service handle range
    pub fn discover(&mut self, start_handle: u16, end_handle: u16) -> AncResult<()> {
        if start_handle == 0 || end_handle == 0 {
            return Err(AncError::InvalidHandle);
        }
        let conn_id = self.require_connection()?;
        if self.discovery.is_discovering() {
            return Err(AncError::Busy);
        }
        self.discover_characteristics(conn_id, start_handle, end_handle)
    }

    fn discover_characteristics(
        &mut self,
        conn_id: u16,
        start_handle: u16,
        end_handle: u16,
    ) -> AncResult<()> {
        info!(
            "Discovering alert notification characteristics in 0x{:04x}-0x{:04x}",
            start_handle, end_handle
        );
        self.service_range = (start_handle, end_handle);
        self.discovery = DiscoveryPhase::Characteristics;

        if let Err(err) = self.transport.discover(
            conn_id,
            DiscoveryType::Characteristics,
            None,
            start_handle,
            end_handle,
        ) {
            warn!("Characteristic discovery request failed: {}", err);
            self.discovery = DiscoveryPhase::Connected;
            return Err(err);
        }
        Ok(())
    }

    /// Consume one attribute reported by the running discovery procedure
    pub fn on_discovery_result(&mut self, data: DiscoveryData) {
        match (self.discovery, data) {
            (
                DiscoveryPhase::Services,
                DiscoveryData::Service {
                    uuid,
                    start_handle,
                    end_handle,
                },
            ) => {
                if uuid_equal(&uuid, &Uuid::Uuid16(ALERT_NOTIFICATION_SERVICE_UUID)) {
                    info!(
                        "Alert notification service at 0x{:04x}-0x{:04x}",
                        start_handle, end_handle
                    );
                    self.service_range = (start_handle, end_handle);
                }
            }
            (
                DiscoveryPhase::Characteristics,
                DiscoveryData::Characteristic {
                    uuid,
                    handle,
                    value_handle,
                    properties,
                },
            ) => {
                if let Some(characteristic) = self.handles.resolve(&uuid, handle, value_handle) {
                    debug!(
                        "{:?} handles 0x{:04x}-0x{:04x} properties {:?}",
                        characteristic, handle, value_handle, properties
                    );
                }
            }
            (phase, DiscoveryData::Descriptor { uuid, handle }) if phase.cccd_target().is_some() => {
                if !uuid_equal(&uuid, &Uuid::Uuid16(CLIENT_CHAR_CONFIG_UUID)) {
                    return;
                }
                if let Some(kind) = phase.cccd_target() {
                    debug!("{:?} alert CCCD handle 0x{:04x}", kind, handle);
                    self.handles.set_cccd(kind, handle);
                }
            }
            (phase, data) => {
                debug!("Ignoring discovery result {:?} in phase {:?}", data, phase);
            }
        }
    }

    /// Advance the discovery procedure after one step completed
    pub fn on_discovery_complete(
        &mut self,
        kind: DiscoveryType,
        status: GattStatus,
    ) -> Option<AncEvent> {
        debug!(
            "{:?} discovery complete in phase {:?} ({:?})",
            kind, self.discovery, status
        );

        match (self.discovery, kind) {
            (DiscoveryPhase::Services, DiscoveryType::PrimaryServices) => {
                self.on_service_discovery_complete()
            }
            (DiscoveryPhase::Characteristics, DiscoveryType::Characteristics) => {
                self.on_characteristic_discovery_complete()
            }
            (DiscoveryPhase::NewAlertCccd, DiscoveryType::Descriptors)
            | (DiscoveryPhase::UnreadAlertCccd, DiscoveryType::Descriptors) => {
                self.on_descriptor_discovery_complete()
            }
            (phase, kind) => {
                warn!("Unexpected {:?} discovery complete in phase {:?}", kind, phase);
                None
            }
        }
    }

    fn on_service_discovery_complete(&mut self) -> Option<AncEvent> {
        self.discovery = DiscoveryPhase::Connected;
        let conn_id = self.conn_id()?;
        let (start, end) = self.service_range;

        let status = if start == 0 || end == 0 {
            warn!("Alert notification service not found");
            GattStatus::NotFound
        } else {
            match self.discover_characteristics(conn_id, start, end) {
                Ok(()) => return None,
                Err(err) => err.status(),
            }
        };
        Some(AncEvent::DiscoverResult { conn_id, status })
    }

    fn on_characteristic_discovery_complete(&mut self) -> Option<AncEvent> {
        let conn_id = self.conn_id()?;

        if !self.handles.has_mandatory() {
            warn!("Mandatory alert notification characteristics missing");
            self.reset();
            return Some(AncEvent::DiscoverResult {
                conn_id,
                status: GattStatus::NotFound,
            });
        }

        self.discover_cccd(AlertKind::New)
    }

    fn on_descriptor_discovery_complete(&mut self) -> Option<AncEvent> {
        if self.discovery == DiscoveryPhase::NewAlertCccd
            && self.handles.unread_alert.declaration != 0
        {
            return self.discover_cccd(AlertKind::Unread);
        }
        self.finish_discovery()
    }

    /// Look for the CCCD of an alert characteristic, bounded by its neighbours
    fn discover_cccd(&mut self, kind: AlertKind) -> Option<AncEvent> {
        let conn_id = self.conn_id()?;
        self.discovery = match kind {
            AlertKind::New => DiscoveryPhase::NewAlertCccd,
            AlertKind::Unread => DiscoveryPhase::UnreadAlertCccd,
        };

        let range = self
            .handles
            .descriptor_range(ProfileCharacteristic::for_alert(kind), self.service_range.1);
        match range {
            Some((start, end)) if start <= end => {
                debug!(
                    "Discovering {:?} alert CCCD in 0x{:04x}-0x{:04x}",
                    kind, start, end
                );
                match self.transport.discover(
                    conn_id,
                    DiscoveryType::Descriptors,
                    Some(CLIENT_CHAR_CONFIG_UUID),
                    start,
                    end,
                ) {
                    Ok(()) => None,
                    Err(err) => {
                        warn!("{:?} alert CCCD discovery request failed: {}", kind, err);
                        self.on_descriptor_discovery_complete()
                    }
                }
            }
            _ => {
                debug!("No descriptor range for {:?} alert", kind);
                self.on_descriptor_discovery_complete()
            }
        }
    }

    fn finish_discovery(&mut self) -> Option<AncEvent> {
        self.discovery = DiscoveryPhase::Connected;
        let conn_id = self.conn_id()?;

        let status = if self.handles.new_alert_cccd != 0 {
            info!("Alert notification discovery complete: {:?}", self.handles);
            GattStatus::Success
        } else {
            warn!("New alert CCCD not found");
            GattStatus::NotFound
        };
        Some(AncEvent::DiscoverResult { conn_id, status })
    }

    fn read_supported_alerts(&mut self, kind: AlertKind) -> AncResult<()> {
        let conn_id = self.require_connection()?;
        let handle = self.handles.supported_category_value(kind);
        if handle == 0 {
            return Err(AncError::NotFound);
        }

        debug!("Reading supported {:?} alert categories at 0x{:04x}", kind, handle);
        self.transport.read(
            conn_id,
            handle,
            self.config.max_read_len,
            self.config.auth_requirement,
        )
    }

    /// Read the Supported New Alert Category bitmap
    pub fn read_supported_new_alerts(&mut self) -> AncResult<()> {
        self.read_supported_alerts(AlertKind::New)
    }

    /// Read the Supported Unread Alert Category bitmap
    pub fn read_supported_unread_alerts(&mut self) -> AncResult<()> {
        self.read_supported_alerts(AlertKind::Unread)
    }

    /// Write the CCCD of one alert class.
    ///
    /// Fails with `NotFound` when the CCCD is unknown and with `Busy` while a
    /// write for the same class is outstanding.
    fn set_notifications(&mut self, kind: AlertKind, enable: bool) -> AncResult<()> {
        let handle = self.handles.cccd(kind);
        if handle == 0 {
            return Err(AncError::NotFound);
        }
        let conn_id = self.require_connection()?;
        if self.config_phase(kind) != ConfigPhase::Idle {
            return Err(AncError::Busy);
        }

        let cccd = if enable { CCCD_NOTIFICATION } else { CCCD_NONE };
        let mut value = Vec::with_capacity(CCCD_VALUE_LEN);
        value
            .write_u16::<LittleEndian>(cccd)
            .map_err(|_| AncError::NoResources)?;

        self.set_enabled(kind, enable);
        *self.config_phase_mut(kind) = if enable {
            ConfigPhase::Enabling
        } else {
            ConfigPhase::Disabling
        };

        debug!(
            "Writing {:?} alert CCCD 0x{:04x} = 0x{:04x}",
            kind, handle, cccd
        );
        if let Err(err) = self
            .transport
            .write(conn_id, handle, &value, self.config.auth_requirement)
        {
            warn!("{:?} alert CCCD write failed: {}", kind, err);
            *self.config_phase_mut(kind) = ConfigPhase::Idle;
            return Err(err);
        }
        Ok(())
    }

    pub fn enable_new_alerts(&mut self) -> AncResult<()> {
        self.set_notifications(AlertKind::New, true)
    }

    pub fn disable_new_alerts(&mut self) -> AncResult<()> {
        self.set_notifications(AlertKind::New, false)
    }

    pub fn enable_unread_alerts(&mut self) -> AncResult<()> {
        self.set_notifications(AlertKind::Unread, true)
    }

    pub fn disable_unread_alerts(&mut self) -> AncResult<()> {
        self.set_notifications(AlertKind::Unread, false)
    }

    /// Send `[command, category]` to the alert notification control point
    pub fn control_required_alerts(
        &mut self,
        command: ControlCommand,
        category: AlertCategory,
    ) -> AncResult<()> {
        let conn_id = self.require_connection()?;
        let handle = self.handles.control_point.value;
        if handle == 0 {
            return Err(AncError::NotFound);
        }
        if self.pending_control.is_some() {
            return Err(AncError::Busy);
        }

        let value = [command.to_u8(), category.to_u8()];
        debug!(
            "Control point 0x{:04x}: {:?} for {}",
            handle, command, category
        );
        self.pending_control = Some((command, category));

        if let Err(err) = self
            .transport
            .write(conn_id, handle, &value, self.config.auth_requirement)
        {
            warn!("Control point write failed: {}", err);
            self.pending_control = None;
            return Err(err);
        }
        Ok(())
    }

    /// Re-enable new alerts after a reconnection, then send the control command
    pub fn recover_new_alerts(
        &mut self,
        command: ControlCommand,
        category: AlertCategory,
    ) -> AncResult<()> {
        self.enable_new_alerts()?;
        self.control_required_alerts(command, category)
    }

    /// Re-enable unread alerts after a reconnection, then send the control command
    pub fn recover_unread_alerts(
        &mut self,
        command: ControlCommand,
        category: AlertCategory,
    ) -> AncResult<()> {
        self.enable_unread_alerts()?;
        self.control_required_alerts(command, category)
    }

    /// Match a write response against the outstanding profile writes
    pub fn on_write_response(&mut self, status: GattStatus, handle: u16) -> Option<AncEvent> {
        trace!("Write response handle 0x{:04x} status {:?}", handle, status);
        if !self.in_service(handle) {
            return None;
        }
        let conn_id = self.conn_id()?;

        if handle == self.handles.control_point.value {
            return match self.pending_control.take() {
                Some((command, category)) => Some(AncEvent::ControlAlertsResult {
                    conn_id,
                    status,
                    command,
                    category,
                }),
                None => {
                    warn!("Control point write response without a pending command");
                    None
                }
            };
        }

        for kind in [AlertKind::New, AlertKind::Unread] {
            if handle != self.handles.cccd(kind) {
                continue;
            }
            let enabled = match std::mem::take(self.config_phase_mut(kind)) {
                ConfigPhase::Enabling => true,
                ConfigPhase::Disabling => false,
                ConfigPhase::Idle => self.is_enabled(kind),
            };
            return Some(AncEvent::configuration_result(kind, enabled, conn_id, status));
        }

        debug!("Write response for unrelated handle 0x{:04x}", handle);
        None
    }

    /// Decode a supported-category read response
    pub fn on_read_response(
        &mut self,
        status: GattStatus,
        handle: u16,
        value: &[u8],
    ) -> Option<AncEvent> {
        trace!(
            "Read response handle 0x{:04x} status {:?}: {}",
            handle,
            status,
            hex::encode(value)
        );
        if !self.in_service(handle) {
            return None;
        }
        if self.discovery != DiscoveryPhase::Connected {
            warn!("Read response in phase {:?}", self.discovery);
            return None;
        }
        let conn_id = self.conn_id()?;

        let kind = [AlertKind::New, AlertKind::Unread]
            .into_iter()
            .find(|&kind| self.handles.supported_category_value(kind) == handle)?;

        if !status.is_success() {
            return Some(AncEvent::supported_alerts_result(
                kind,
                conn_id,
                status,
                AlertCategoryMask::empty(),
            ));
        }

        match decode_category_bitmap(value) {
            Some(bits) => Some(AncEvent::supported_alerts_result(
                kind,
                conn_id,
                status,
                AlertCategoryMask::from_bits_truncate(bits),
            )),
            None => {
                warn!(
                    "Supported {:?} alert category value has length {}",
                    kind,
                    value.len()
                );
                None
            }
        }
    }

    /// Decode a notification on one of the alert characteristics
    pub fn on_notification(&mut self, handle: u16, value: &[u8]) -> Option<AncEvent> {
        if !self.in_service(handle) {
            return None;
        }
        let conn_id = self.conn_id()?;
        trace!("Notification handle 0x{:04x}: {}", handle, hex::encode(value));

        match self.handles.characteristic_for_value(handle) {
            Some(ProfileCharacteristic::NewAlert) => {
                let alert = decode_new_alert(value, self.config.max_alert_text_len)?;
                Some(AncEvent::NewAlertNotification {
                    conn_id,
                    category: alert.category,
                    count: alert.count,
                    text: alert.text,
                })
            }
            Some(ProfileCharacteristic::UnreadAlertStatus) => {
                let alert = decode_unread_alert(value)?;
                Some(AncEvent::UnreadAlertNotification {
                    conn_id,
                    category: alert.category,
                    count: alert.count,
                })
            }
            _ => {
                debug!("Notification on unhandled handle 0x{:04x} ({} bytes)", handle, value.len());
                None
            }
        }
    }
}
