//! Decoding of New Alert and Unread Alert Status notifications

use super::constants::*;
use super::types::AlertCategory;
use byteorder::{LittleEndian, ReadBytesExt};
use log::trace;
use std::io::{Cursor, Read};

/// Payload of a New Alert notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAlert {
    pub category: AlertCategory,
    pub count: u8,
    pub text: String,
}

/// Payload of an Unread Alert Status notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnreadAlert {
    pub category: AlertCategory,
    pub count: u8,
}

/// Category ids above Instant Message are not valid in notifications
fn notified_category(raw: u8) -> Option<AlertCategory> {
    if raw > CATEGORY_ID_INSTANT_MESSAGE {
        trace!("Dropping alert with category id {}", raw);
        return None;
    }
    AlertCategory::from_u8(raw)
}

/// Decode `[category, count, text...]`.
///
/// Payloads shorter than the two header bytes and unknown categories yield
/// `None`. The text is cut at `max_text_len` bytes and at the first NUL.
pub fn decode_new_alert(value: &[u8], max_text_len: usize) -> Option<NewAlert> {
    if value.len() < NEW_ALERT_HEADER_LEN {
        return None;
    }

    let mut cursor = Cursor::new(value);
    let category = notified_category(cursor.read_u8().ok()?)?;
    let count = cursor.read_u8().ok()?;

    let mut text = Vec::new();
    cursor
        .take(max_text_len as u64)
        .read_to_end(&mut text)
        .ok()?;
    if let Some(nul) = text.iter().position(|&b| b == 0) {
        text.truncate(nul);
    }

    Some(NewAlert {
        category,
        count,
        text: String::from_utf8_lossy(&text).into_owned(),
    })
}

/// Decode `[category, count]`; any other length yields `None`
pub fn decode_unread_alert(value: &[u8]) -> Option<UnreadAlert> {
    if value.len() != UNREAD_ALERT_VALUE_LEN {
        return None;
    }

    Some(UnreadAlert {
        category: notified_category(value[0])?,
        count: value[1],
    })
}

/// Decode the 16-bit little-endian category bitmap of a supported-category read
pub fn decode_category_bitmap(value: &[u8]) -> Option<u16> {
    if value.len() != SUPPORTED_CATEGORY_VALUE_LEN {
        return None;
    }
    Cursor::new(value).read_u16::<LittleEndian>().ok()
}
