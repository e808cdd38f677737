use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use thiserror::Error;

/// A Bluetooth UUID as it appears on the wire.
///
/// The length is part of the value: a 16-bit UUID never compares equal to a
/// 32-bit or 128-bit one, even when both denote the same SIG-assigned number.
/// 128-bit values are stored in little-endian byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Uuid {
    Uuid16(u16),
    Uuid32(u32),
    Uuid128([u8; 16]),
}

/// Errors reported by the low-level UUID comparator
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UuidError {
    #[error("UUID lengths differ ({0} vs {1} bytes)")]
    LengthMismatch(usize, usize),
}

impl Default for Uuid {
    fn default() -> Self {
        Uuid::Uuid16(0)
    }
}

impl Uuid {
    /// Convert raw little-endian bytes to a UUID based on length
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        match bytes.len() {
            2 => Some(Uuid::Uuid16(u16::from_le_bytes([bytes[0], bytes[1]]))),
            4 => Some(Uuid::Uuid32(u32::from_le_bytes([
                bytes[0], bytes[1], bytes[2], bytes[3],
            ]))),
            16 => {
                let mut uuid = [0u8; 16];
                uuid.copy_from_slice(bytes);
                Some(Uuid::Uuid128(uuid))
            }
            _ => None,
        }
    }

    /// Get the little-endian bytes of this UUID
    pub fn as_bytes(&self) -> Vec<u8> {
        match self {
            Uuid::Uuid16(uuid) => uuid.to_le_bytes().to_vec(),
            Uuid::Uuid32(uuid) => uuid.to_le_bytes().to_vec(),
            Uuid::Uuid128(uuid) => uuid.to_vec(),
        }
    }

    /// Length of the UUID in bytes (2, 4 or 16)
    pub fn len(&self) -> usize {
        match self {
            Uuid::Uuid16(_) => 2,
            Uuid::Uuid32(_) => 4,
            Uuid::Uuid128(_) => 16,
        }
    }

    /// Get the 16-bit value if this is a 16-bit UUID
    pub fn as_u16(&self) -> Option<u16> {
        match self {
            Uuid::Uuid16(uuid) => Some(*uuid),
            _ => None,
        }
    }

    /// Compare two UUIDs of the same length.
    ///
    /// Returns `Ok(true)` when the raw values match, `Ok(false)` when they
    /// differ, and an error when the lengths differ.
    pub fn compare(&self, other: &Uuid) -> Result<bool, UuidError> {
        match (self, other) {
            (Uuid::Uuid16(a), Uuid::Uuid16(b)) => Ok(a == b),
            (Uuid::Uuid32(a), Uuid::Uuid32(b)) => Ok(a == b),
            (Uuid::Uuid128(a), Uuid::Uuid128(b)) => Ok(a == b),
            _ => Err(UuidError::LengthMismatch(self.len(), other.len())),
        }
    }

    /// Copy length and value from `src`
    pub fn copy_from(&mut self, src: &Uuid) {
        *self = *src;
    }
}

/// True only if both UUIDs have the same length and the same bytes.
///
/// A length mismatch is "not equal" here, never an error.
pub fn uuid_equal(a: &Uuid, b: &Uuid) -> bool {
    a.compare(b).unwrap_or(false)
}

impl From<u16> for Uuid {
    fn from(uuid16: u16) -> Self {
        Uuid::Uuid16(uuid16)
    }
}

impl From<u32> for Uuid {
    fn from(uuid32: u32) -> Self {
        Uuid::Uuid32(uuid32)
    }
}

impl From<[u8; 16]> for Uuid {
    /// Assumes bytes are in little-endian order.
    fn from(bytes: [u8; 16]) -> Self {
        Uuid::Uuid128(bytes)
    }
}

impl PartialEq<u16> for Uuid {
    fn eq(&self, other: &u16) -> bool {
        self.as_u16() == Some(*other)
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Uuid::Uuid16(uuid) => write!(f, "{:04x}", uuid),
            Uuid::Uuid32(uuid) => write!(f, "{:08x}", uuid),
            Uuid::Uuid128(uuid) => {
                // Standard hyphenated format (big-endian)
                let mut b = *uuid;
                b.reverse();
                write!(
                    f,
                    "{}-{}-{}-{}-{}",
                    hex::encode(&b[0..4]),
                    hex::encode(&b[4..6]),
                    hex::encode(&b[6..8]),
                    hex::encode(&b[8..10]),
                    hex::encode(&b[10..16])
                )
            }
        }
    }
}

#[derive(Debug)]
pub enum UuidParseError {
    InvalidLength,
    InvalidFormat,
    HexError(hex::FromHexError),
}

impl From<hex::FromHexError> for UuidParseError {
    fn from(err: hex::FromHexError) -> Self {
        UuidParseError::HexError(err)
    }
}

impl From<ParseIntError> for UuidParseError {
    fn from(_: ParseIntError) -> Self {
        UuidParseError::InvalidFormat
    }
}

impl FromStr for Uuid {
    type Err = UuidParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned = s.trim_start_matches("0x").replace('-', "");
        if !cleaned.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(UuidParseError::InvalidFormat);
        }

        match cleaned.len() {
            4 => Ok(Uuid::Uuid16(u16::from_str_radix(&cleaned, 16)?)),
            8 => Ok(Uuid::Uuid32(u32::from_str_radix(&cleaned, 16)?)),
            32 => {
                let mut bytes = [0u8; 16];
                hex::decode_to_slice(&cleaned, &mut bytes)?;
                bytes.reverse();
                Ok(Uuid::Uuid128(bytes))
            }
            _ => Err(UuidParseError::InvalidLength),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_same_length() {
        assert_eq!(Uuid::Uuid16(0x2A46).compare(&Uuid::Uuid16(0x2A46)), Ok(true));
        assert_eq!(Uuid::Uuid16(0x2A46).compare(&Uuid::Uuid16(0x2A45)), Ok(false));
    }

    #[test]
    fn test_length_mismatch_is_not_equal() {
        let short = Uuid::Uuid16(0x2A46);
        let long = Uuid::Uuid32(0x2A46);

        assert_eq!(short.compare(&long), Err(UuidError::LengthMismatch(2, 4)));
        assert!(!uuid_equal(&short, &long));
        assert!(uuid_equal(&short, &Uuid::from(0x2A46u16)));
    }

    #[test]
    fn test_copy_from() {
        let mut dst = Uuid::default();
        dst.copy_from(&Uuid::Uuid32(0x1234_5678));
        assert_eq!(dst, Uuid::Uuid32(0x1234_5678));
    }

    #[test]
    fn test_from_bytes() {
        assert_eq!(Uuid::from_bytes(&[0x02, 0x29]), Some(Uuid::Uuid16(0x2902)));
        assert_eq!(Uuid::from_bytes(&[0x02, 0x29, 0x00]), None);
        assert_eq!(Uuid::Uuid16(0x2902).as_bytes(), vec![0x02, 0x29]);
    }

    #[test]
    fn test_parse_and_display() {
        let uuid: Uuid = "2A46".parse().unwrap();
        assert_eq!(uuid, Uuid::Uuid16(0x2A46));
        assert_eq!(uuid.to_string(), "2a46");

        let text = "00001811-0000-1000-8000-00805f9b34fb";
        let uuid: Uuid = text.parse().unwrap();
        assert_eq!(uuid.len(), 16);
        assert_eq!(uuid.to_string(), text);

        assert!("12345".parse::<Uuid>().is_err());
    }
}
