//! Error types for the rustyanc library
//!
//! This module defines the GATT status codes reported by the transport and the
//! error type returned by request-issuing operations.

use thiserror::Error;

// GATT status values
pub const GATT_SUCCESS: u8 = 0x00;
pub const GATT_INVALID_HANDLE: u8 = 0x01;
pub const GATT_INSUFFICIENT_AUTHENTICATION: u8 = 0x05;
pub const GATT_NOT_FOUND: u8 = 0x0A;
pub const GATT_NO_RESOURCES: u8 = 0x80;
pub const GATT_BUSY: u8 = 0x84;
pub const GATT_ERROR: u8 = 0x85;

/// Status code carried by completion events and outbound alert events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GattStatus {
    /// Operation completed
    Success,
    /// Zero or otherwise invalid attribute handle
    InvalidHandle,
    /// Peer requires an authenticated link
    InsufficientAuthentication,
    /// Attribute (or handle needed to reach it) not found
    NotFound,
    /// No buffer available to build the request
    NoResources,
    /// Another request of the same class is outstanding
    Busy,
    /// Generic transport failure
    Error,
    /// Any other status value
    Other(u8),
}

impl GattStatus {
    pub fn is_success(&self) -> bool {
        *self == GattStatus::Success
    }
}

impl From<u8> for GattStatus {
    fn from(code: u8) -> Self {
        match code {
            GATT_SUCCESS => GattStatus::Success,
            GATT_INVALID_HANDLE => GattStatus::InvalidHandle,
            GATT_INSUFFICIENT_AUTHENTICATION => GattStatus::InsufficientAuthentication,
            GATT_NOT_FOUND => GattStatus::NotFound,
            GATT_NO_RESOURCES => GattStatus::NoResources,
            GATT_BUSY => GattStatus::Busy,
            GATT_ERROR => GattStatus::Error,
            c => GattStatus::Other(c),
        }
    }
}

impl From<GattStatus> for u8 {
    fn from(status: GattStatus) -> Self {
        match status {
            GattStatus::Success => GATT_SUCCESS,
            GattStatus::InvalidHandle => GATT_INVALID_HANDLE,
            GattStatus::InsufficientAuthentication => GATT_INSUFFICIENT_AUTHENTICATION,
            GattStatus::NotFound => GATT_NOT_FOUND,
            GattStatus::NoResources => GATT_NO_RESOURCES,
            GattStatus::Busy => GATT_BUSY,
            GattStatus::Error => GATT_ERROR,
            GattStatus::Other(code) => code,
        }
    }
}

/// Errors returned synchronously by profile operations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AncError {
    #[error("Required attribute handle not resolved")]
    NotFound,

    #[error("An operation of the same class is already outstanding")]
    Busy,

    #[error("No resources available for the request")]
    NoResources,

    #[error("Invalid attribute handle")]
    InvalidHandle,

    #[error("Insufficient authentication")]
    InsufficientAuthentication,

    #[error("No peer connection")]
    NotConnected,

    #[error("GATT error: {0:?}")]
    Gatt(GattStatus),
}

impl AncError {
    /// Status code equivalent of this error
    pub fn status(&self) -> GattStatus {
        match self {
            AncError::NotFound => GattStatus::NotFound,
            AncError::Busy => GattStatus::Busy,
            AncError::NoResources => GattStatus::NoResources,
            AncError::InvalidHandle => GattStatus::InvalidHandle,
            AncError::InsufficientAuthentication => GattStatus::InsufficientAuthentication,
            AncError::NotConnected => GattStatus::Error,
            AncError::Gatt(status) => *status,
        }
    }
}

impl From<GattStatus> for AncError {
    fn from(status: GattStatus) -> Self {
        match status {
            GattStatus::NotFound => AncError::NotFound,
            GattStatus::Busy => AncError::Busy,
            GattStatus::NoResources => AncError::NoResources,
            GattStatus::InvalidHandle => AncError::InvalidHandle,
            GattStatus::InsufficientAuthentication => AncError::InsufficientAuthentication,
            other => AncError::Gatt(other),
        }
    }
}

/// Result type for profile operations
pub type AncResult<T> = Result<T, AncError>;
