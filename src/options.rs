//! DHCP option scanning.
//!
//! The options region of a DHCP message is a sequence of TLV entries:
//! a tag byte, a length byte, and `length` bytes of data. Two tags are
//! special: PAD (0) has no length byte, and END (255) terminates the list.
//!
//! The server engine only acts on two options: the message type (53) and
//! the requested IP address (50). Everything else is walked over and
//! discarded. [`scan`] extracts exactly those two fields; [`OptionIter`]
//! is the underlying bounds-checked walk.
//!
//! # References
//!
//! - RFC 2132: DHCP Options and BOOTP Vendor Extensions

use std::net::Ipv4Addr;

/// Padding (no operation), single byte with no length or data.
pub const OPT_PAD: u8 = 0;

/// Requested IP address (RFC 2132 §9.1).
pub const OPT_REQUESTED_IP: u8 = 50;

/// DHCP message type (RFC 2132 §9.6).
pub const OPT_MESSAGE_TYPE: u8 = 53;

/// End of options marker.
pub const OPT_END: u8 = 255;

/// DHCP message types (Option 53) as defined in RFC 2132 §9.6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageType {
    /// Client broadcast to locate servers.
    Discover = 1,
    /// Server response to DISCOVER with IP offer.
    Offer = 2,
    /// Client request for offered parameters.
    Request = 3,
    /// Client indicates address is already in use.
    Decline = 4,
    /// Server acknowledgement.
    Ack = 5,
    /// Server negative acknowledgement.
    Nak = 6,
    /// Client releases IP address.
    Release = 7,
    /// Client requests config without IP allocation.
    Inform = 8,
}

impl TryFrom<u8> for MessageType {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Discover),
            2 => Ok(Self::Offer),
            3 => Ok(Self::Request),
            4 => Ok(Self::Decline),
            5 => Ok(Self::Ack),
            6 => Ok(Self::Nak),
            7 => Ok(Self::Release),
            8 => Ok(Self::Inform),
            other => Err(other),
        }
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Discover => write!(f, "DISCOVER"),
            Self::Offer => write!(f, "OFFER"),
            Self::Request => write!(f, "REQUEST"),
            Self::Decline => write!(f, "DECLINE"),
            Self::Ack => write!(f, "ACK"),
            Self::Nak => write!(f, "NAK"),
            Self::Release => write!(f, "RELEASE"),
            Self::Inform => write!(f, "INFORM"),
        }
    }
}

/// A single raw TLV entry yielded by [`OptionIter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawOption<'a> {
    /// The option tag (never PAD or END).
    pub tag: u8,
    /// The option payload, exactly as declared by the length byte.
    pub data: &'a [u8],
}

/// Bounds-checked iterator over the TLV entries of an options region.
///
/// PAD bytes are skipped, END stops iteration, and a truncated length
/// byte or payload stops iteration instead of reading past the buffer.
/// A buffer without an END tag simply iterates to the boundary.
#[derive(Debug, Clone)]
pub struct OptionIter<'a> {
    buffer: &'a [u8],
    index: usize,
}

impl<'a> OptionIter<'a> {
    /// Creates an iterator starting at offset 0 of `buffer`.
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, index: 0 }
    }
}

impl<'a> Iterator for OptionIter<'a> {
    type Item = RawOption<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.buffer.len() {
            let tag = self.buffer[self.index];

            if tag == OPT_END {
                self.index = self.buffer.len();
                return None;
            }

            if tag == OPT_PAD {
                self.index += 1;
                continue;
            }

            // Length byte missing: stop rather than read past the end.
            if self.index + 1 >= self.buffer.len() {
                self.index = self.buffer.len();
                return None;
            }

            let length = self.buffer[self.index + 1] as usize;
            let end = self.index + 2 + length;

            // Payload truncated: stop rather than read past the end.
            if end > self.buffer.len() {
                self.index = self.buffer.len();
                return None;
            }

            let data = &self.buffer[self.index + 2..end];
            self.index = end;
            return Some(RawOption { tag, data });
        }

        None
    }
}

/// The two option fields the server engine acts on.
///
/// Produced per incoming message by [`scan`] and discarded after the
/// reply is built; the engine retains no other option state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedOptions {
    /// Message type (Option 53). `None` when the option is absent or
    /// carries a value outside 1..=8.
    pub message_type: Option<MessageType>,

    /// Requested IP address (Option 50). [`Ipv4Addr::UNSPECIFIED`] when
    /// absent or when the declared length is not exactly 4 bytes.
    pub requested_ip: Ipv4Addr,
}

/// Scans an options region for the message type and requested IP.
///
/// Later occurrences of an option overwrite earlier ones. The scan never
/// reads out of bounds; malformed trailing data terminates it early with
/// whatever was already captured.
pub fn scan(options: &[u8]) -> ParsedOptions {
    let mut parsed = ParsedOptions {
        message_type: None,
        requested_ip: Ipv4Addr::UNSPECIFIED,
    };

    for option in OptionIter::new(options) {
        match option.tag {
            OPT_MESSAGE_TYPE if !option.data.is_empty() => {
                parsed.message_type = MessageType::try_from(option.data[0]).ok();
            }
            OPT_REQUESTED_IP if option.data.len() == 4 => {
                parsed.requested_ip = Ipv4Addr::new(
                    option.data[0],
                    option.data[1],
                    option.data[2],
                    option.data[3],
                );
            }
            _ => {}
        }
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type_conversions() {
        for value in 1..=8u8 {
            let msg_type = MessageType::try_from(value).unwrap();
            assert_eq!(msg_type as u8, value);
        }
        assert!(MessageType::try_from(0).is_err());
        assert!(MessageType::try_from(9).is_err());
    }

    #[test]
    fn test_scan_discover() {
        let parsed = scan(&[53, 1, 1, 255]);
        assert_eq!(parsed.message_type, Some(MessageType::Discover));
        assert_eq!(parsed.requested_ip, Ipv4Addr::UNSPECIFIED);
    }

    #[test]
    fn test_scan_requested_ip() {
        let parsed = scan(&[53, 1, 3, 50, 4, 10, 0, 0, 9, 255]);
        assert_eq!(parsed.message_type, Some(MessageType::Request));
        assert_eq!(parsed.requested_ip, Ipv4Addr::new(10, 0, 0, 9));
    }

    #[test]
    fn test_scan_stops_at_end_tag() {
        // The requested IP after END must not be picked up.
        let parsed = scan(&[53, 1, 1, 255, 50, 4, 10, 0, 0, 9]);
        assert_eq!(parsed.message_type, Some(MessageType::Discover));
        assert_eq!(parsed.requested_ip, Ipv4Addr::UNSPECIFIED);
    }

    #[test]
    fn test_scan_skips_pad_bytes() {
        let parsed = scan(&[0, 0, 0, 53, 1, 1, 0, 255]);
        assert_eq!(parsed.message_type, Some(MessageType::Discover));
    }

    #[test]
    fn test_scan_skips_unrelated_options() {
        // Lease time (51) and parameter request list (55) are walked over.
        let parsed = scan(&[51, 4, 0, 1, 81, 128, 55, 3, 1, 3, 6, 53, 1, 4, 255]);
        assert_eq!(parsed.message_type, Some(MessageType::Decline));
    }

    #[test]
    fn test_scan_short_requested_ip_ignored() {
        // A length other than 4 does not partially fill the address.
        let parsed = scan(&[50, 2, 10, 0, 53, 1, 1, 255]);
        assert_eq!(parsed.requested_ip, Ipv4Addr::UNSPECIFIED);
        assert_eq!(parsed.message_type, Some(MessageType::Discover));
    }

    #[test]
    fn test_scan_unknown_message_type_value() {
        let parsed = scan(&[53, 1, 42, 255]);
        assert_eq!(parsed.message_type, None);
    }

    #[test]
    fn test_scan_truncated_length_byte() {
        // Tag with no room for a length byte: keep what was captured.
        let parsed = scan(&[53, 1, 1, 50]);
        assert_eq!(parsed.message_type, Some(MessageType::Discover));
        assert_eq!(parsed.requested_ip, Ipv4Addr::UNSPECIFIED);
    }

    #[test]
    fn test_scan_truncated_payload() {
        // Declared length runs past the buffer end.
        let parsed = scan(&[53, 1, 1, 50, 4, 10, 0]);
        assert_eq!(parsed.message_type, Some(MessageType::Discover));
        assert_eq!(parsed.requested_ip, Ipv4Addr::UNSPECIFIED);
    }

    #[test]
    fn test_scan_no_end_tag() {
        let parsed = scan(&[53, 1, 1]);
        assert_eq!(parsed.message_type, Some(MessageType::Discover));
    }

    #[test]
    fn test_scan_empty_buffer() {
        let parsed = scan(&[]);
        assert_eq!(parsed.message_type, None);
        assert_eq!(parsed.requested_ip, Ipv4Addr::UNSPECIFIED);
    }

    #[test]
    fn test_scan_all_pad_bytes() {
        let parsed = scan(&[0u8; 64]);
        assert_eq!(parsed.message_type, None);
    }

    #[test]
    fn test_later_option_wins() {
        let parsed = scan(&[53, 1, 1, 53, 1, 3, 255]);
        assert_eq!(parsed.message_type, Some(MessageType::Request));
    }

    #[test]
    fn test_iter_yields_raw_entries() {
        let buffer = [12, 3, b'a', b'b', b'c', 0, 50, 4, 10, 0, 0, 2, 255];
        let entries: Vec<_> = OptionIter::new(&buffer).collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].tag, 12);
        assert_eq!(entries[0].data, b"abc");
        assert_eq!(entries[1].tag, 50);
        assert_eq!(entries[1].data, &[10, 0, 0, 2]);
    }

    #[test]
    fn test_iter_zero_length_option() {
        let entries: Vec<_> = OptionIter::new(&[55, 0, 255]).collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].tag, 55);
        assert!(entries[0].data.is_empty());
    }
}
