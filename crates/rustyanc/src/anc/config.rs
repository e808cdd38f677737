//! Client configuration

use super::constants::{DEFAULT_MAX_ALERT_TEXT_LEN, DEFAULT_MAX_READ_LEN};
use super::transport::AuthRequirement;

/// Alert Notification client configuration
#[derive(Debug, Clone)]
pub struct AncConfig {
    /// Look up the Alert Notification Service as soon as a connection comes up
    pub discover_service_on_connect: bool,
    /// Authentication requirement attached to reads and writes
    pub auth_requirement: AuthRequirement,
    /// Buffer size requested for characteristic reads
    pub max_read_len: usize,
    /// Longest new-alert text kept from a notification
    pub max_alert_text_len: usize,
}

impl Default for AncConfig {
    fn default() -> Self {
        Self {
            discover_service_on_connect: true,
            auth_requirement: AuthRequirement::None,
            max_read_len: DEFAULT_MAX_READ_LEN,
            max_alert_text_len: DEFAULT_MAX_ALERT_TEXT_LEN,
        }
    }
}
