//! Transport interface consumed by the client
//!
//! The GATT stack underneath the profile is an external collaborator: it
//! issues discovery, read and write requests on behalf of the client and
//! reports their outcome back as [`GattEvent`] messages.

use crate::error::{AncResult, GattStatus};
use crate::gap::{AddressType, BdAddr};
use crate::uuid::Uuid;
use bitflags::bitflags;

/// Kind of discovery procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryType {
    PrimaryServices,
    Characteristics,
    Descriptors,
}

/// Authentication requirement attached to a read or write request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthRequirement {
    #[default]
    None,
    /// Encrypted link, no MITM protection
    NoMitm,
    /// Encrypted link with MITM protection
    Mitm,
}

bitflags! {
    /// Characteristic properties from the declaration
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CharacteristicProperties: u8 {
        const BROADCAST = 0x01;
        const READ = 0x02;
        const WRITE_WITHOUT_RESPONSE = 0x04;
        const WRITE = 0x08;
        const NOTIFY = 0x10;
        const INDICATE = 0x20;
        const AUTHENTICATED_SIGNED_WRITES = 0x40;
        const EXTENDED_PROPERTIES = 0x80;
    }
}

/// Peer information reported when a connection comes up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionInfo {
    pub conn_id: u16,
    pub peer_addr: BdAddr,
    pub addr_type: AddressType,
}

/// One attribute reported by a discovery procedure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryData {
    Service {
        uuid: Uuid,
        start_handle: u16,
        end_handle: u16,
    },
    Characteristic {
        uuid: Uuid,
        handle: u16,
        value_handle: u16,
        properties: CharacteristicProperties,
    },
    Descriptor {
        uuid: Uuid,
        handle: u16,
    },
}

/// Messages delivered by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GattEvent {
    ConnectionUp(ConnectionInfo),
    ConnectionDown {
        conn_id: u16,
        reason: u8,
    },
    DiscoveryResult {
        conn_id: u16,
        data: DiscoveryData,
    },
    DiscoveryComplete {
        conn_id: u16,
        kind: DiscoveryType,
        status: GattStatus,
    },
    WriteComplete {
        conn_id: u16,
        status: GattStatus,
        handle: u16,
    },
    ReadComplete {
        conn_id: u16,
        status: GattStatus,
        handle: u16,
        value: Vec<u8>,
    },
    Notification {
        conn_id: u16,
        handle: u16,
        value: Vec<u8>,
    },
}

/// GATT requests the client needs from the underlying stack.
///
/// Every method only queues the request; completion is reported later
/// through a [`GattEvent`]. An `Err` means the request was never sent.
pub trait GattTransport {
    /// Start a discovery procedure over `[start_handle, end_handle]`
    fn discover(
        &mut self,
        conn_id: u16,
        kind: DiscoveryType,
        uuid_filter: Option<u16>,
        start_handle: u16,
        end_handle: u16,
    ) -> AncResult<()>;

    /// Write request (with response)
    fn write(
        &mut self,
        conn_id: u16,
        handle: u16,
        value: &[u8],
        auth: AuthRequirement,
    ) -> AncResult<()>;

    /// Read request by handle
    fn read(
        &mut self,
        conn_id: u16,
        handle: u16,
        max_len: usize,
        auth: AuthRequirement,
    ) -> AncResult<()>;

    /// Start bonding with the peer so that a failed request can be replayed
    fn start_pairing(&mut self, peer: &ConnectionInfo) -> AncResult<()>;
}
