//! Recovery of commands rejected for insufficient authentication
//!
//! [`AncSession`] wraps a client and remembers the last command the peer
//! refused because the link was not authenticated. Pairing is started in its
//! place and the command is replayed once the link is encrypted.

use super::client::AlertNotificationClient;
use super::transport::{GattEvent, GattTransport};
use super::types::{AlertCategory, AncEvent, ControlCommand};
use crate::error::{AncError, AncResult, GattStatus};
use log::{debug, info, warn};

/// Application command that can be replayed after pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AncCommand {
    ReadSupportedNewAlerts,
    ReadSupportedUnreadAlerts,
    ControlAlerts {
        command: ControlCommand,
        category: AlertCategory,
    },
    EnableNewAlerts,
    EnableUnreadAlerts,
    DisableNewAlerts,
    DisableUnreadAlerts,
}

impl AncCommand {
    /// Command whose completion produced `event`
    pub fn from_result(event: &AncEvent) -> Option<Self> {
        match event {
            AncEvent::SupportedNewAlertsResult { .. } => Some(AncCommand::ReadSupportedNewAlerts),
            AncEvent::SupportedUnreadAlertsResult { .. } => {
                Some(AncCommand::ReadSupportedUnreadAlerts)
            }
            AncEvent::ControlAlertsResult {
                command, category, ..
            } => Some(AncCommand::ControlAlerts {
                command: *command,
                category: *category,
            }),
            AncEvent::EnableNewAlertsResult { .. } => Some(AncCommand::EnableNewAlerts),
            AncEvent::EnableUnreadAlertsResult { .. } => Some(AncCommand::EnableUnreadAlerts),
            AncEvent::DisableNewAlertsResult { .. } => Some(AncCommand::DisableNewAlerts),
            AncEvent::DisableUnreadAlertsResult { .. } => Some(AncCommand::DisableUnreadAlerts),
            AncEvent::DiscoverResult { .. }
            | AncEvent::NewAlertNotification { .. }
            | AncEvent::UnreadAlertNotification { .. } => None,
        }
    }
}

/// Outcome of [`AncSession::execute`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The request went out to the peer
    Sent,
    /// Pairing was started; the command is held until encryption completes
    AwaitingAuthentication,
}

/// Application callback receiving every event produced by the client
pub type EventCallback = Box<dyn FnMut(&AncEvent) + Send + 'static>;

/// Client plus a one-deep slot for a command awaiting authentication
pub struct AncSession<T: GattTransport> {
    client: AlertNotificationClient<T>,
    pending: Option<AncCommand>,
    callback: Option<EventCallback>,
}

impl<T: GattTransport> AncSession<T> {
    pub fn new(client: AlertNotificationClient<T>) -> Self {
        Self {
            client,
            pending: None,
            callback: None,
        }
    }

    pub fn set_event_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&AncEvent) + Send + 'static,
    {
        self.callback = Some(Box::new(callback));
    }

    pub fn client(&self) -> &AlertNotificationClient<T> {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut AlertNotificationClient<T> {
        &mut self.client
    }

    /// Command waiting for the link to be encrypted
    pub fn pending_command(&self) -> Option<AncCommand> {
        self.pending
    }

    fn apply(&mut self, command: AncCommand) -> AncResult<()> {
        match command {
            AncCommand::ReadSupportedNewAlerts => self.client.read_supported_new_alerts(),
            AncCommand::ReadSupportedUnreadAlerts => self.client.read_supported_unread_alerts(),
            AncCommand::ControlAlerts { command, category } => {
                self.client.control_required_alerts(command, category)
            }
            AncCommand::EnableNewAlerts => self.client.enable_new_alerts(),
            AncCommand::EnableUnreadAlerts => self.client.enable_unread_alerts(),
            AncCommand::DisableNewAlerts => self.client.disable_new_alerts(),
            AncCommand::DisableUnreadAlerts => self.client.disable_unread_alerts(),
        }
    }

    /// Issue a command, starting pairing if the peer demands authentication
    pub fn execute(&mut self, command: AncCommand) -> AncResult<Dispatch> {
        match self.apply(command) {
            Ok(()) => Ok(Dispatch::Sent),
            Err(AncError::InsufficientAuthentication) => {
                self.request_authentication(command)?;
                Ok(Dispatch::AwaitingAuthentication)
            }
            Err(err) => Err(err),
        }
    }

    /// Hold `command` and start pairing; a newer command replaces an older one
    fn request_authentication(&mut self, command: AncCommand) -> AncResult<()> {
        let peer = *self.client.peer().ok_or(AncError::NotConnected)?;
        if let Some(previous) = self.pending.replace(command) {
            debug!("Replacing pending command {:?}", previous);
        }

        info!("Starting pairing with {} to retry {:?}", peer.peer_addr, command);
        if let Err(err) = self.client.transport_mut().start_pairing(&peer) {
            warn!("Failed to start pairing: {}", err);
            self.pending = None;
            return Err(err);
        }
        Ok(())
    }

    /// Feed one transport message through the client.
    ///
    /// The resulting event, if any, is passed to the callback and returned.
    pub fn handle_event(&mut self, event: GattEvent) -> Option<AncEvent> {
        let result = self.client.handle_event(event);

        if self.client.conn_id().is_none() && self.pending.take().is_some() {
            debug!("Connection gone, dropping pending command");
        }

        if let Some(event) = &result {
            self.track_result(event);
            if let Some(callback) = self.callback.as_mut() {
                callback(event);
            }
        }
        result
    }

    fn track_result(&mut self, event: &AncEvent) {
        match event.status() {
            Some(GattStatus::InsufficientAuthentication) => {
                if let Some(command) = AncCommand::from_result(event) {
                    if let Err(err) = self.request_authentication(command) {
                        warn!("Cannot recover {:?}: {}", command, err);
                    }
                }
            }
            Some(_) => self.pending = None,
            None => {}
        }
    }

    /// Link encryption finished.
    ///
    /// On success the pending command is replayed once and returned. The slot
    /// is empty afterwards in every case.
    pub fn encryption_changed(&mut self, success: bool) -> AncResult<Option<AncCommand>> {
        let Some(command) = self.pending.take() else {
            return Ok(None);
        };

        if !success {
            warn!("Encryption failed, dropping {:?}", command);
            return Ok(None);
        }

        info!("Link encrypted, replaying {:?}", command);
        self.apply(command)?;
        Ok(Some(command))
    }
}
