//! BOOTP/DHCP message codec.
//!
//! A message is a fixed 576-byte record: a 236-byte BOOTP header, the
//! 4-byte magic cookie, and a 336-byte options region. There is no
//! partial or streaming decode; the [`Message`] struct is the unit
//! exchanged at the system boundary.
//!
//! # Message Structure
//!
//! ```text
//! 0                   1                   2                   3
//! 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |     op (1)    |   htype (1)   |   hlen (1)    |   hops (1)    |
//! +---------------+---------------+---------------+---------------+
//! |                            xid (4)                            |
//! +-------------------------------+-------------------------------+
//! |           secs (2)            |           flags (2)           |
//! +-------------------------------+-------------------------------+
//! |                          ciaddr (4)                           |
//! +---------------------------------------------------------------+
//! |                          yiaddr (4)                           |
//! +---------------------------------------------------------------+
//! |                          siaddr (4)                           |
//! +---------------------------------------------------------------+
//! |                          giaddr (4)                           |
//! +---------------------------------------------------------------+
//! |                          chaddr (16)                          |
//! +---------------------------------------------------------------+
//! |                          sname (64)                           |
//! +---------------------------------------------------------------+
//! |                          bootf (128)                          |
//! +---------------------------------------------------------------+
//! |                    magic cookie (4) = 99.130.83.99            |
//! +---------------------------------------------------------------+
//! |                          options (336)                        |
//! +---------------------------------------------------------------+
//! ```
//!
//! Multi-byte integers (`xid`, `secs`, `flags`) use network byte order
//! (big-endian) in both directions. The decoder does not validate the
//! magic cookie; requests carrying a foreign cookie still classify and
//! are answered through the normal reply path.
//!
//! # References
//!
//! - RFC 2131: Dynamic Host Configuration Protocol

use std::net::Ipv4Addr;

use crate::error::{Error, Result};
use crate::options::{self, MessageType, OPT_END, OPT_MESSAGE_TYPE, ParsedOptions};

/// Total encoded message size. 576 bytes is the minimum datagram every
/// DHCP participant must accept per RFC 2131 §2.
pub const MESSAGE_SIZE: usize = 576;

/// Capacity of the options region: everything after the magic cookie.
pub const OPTIONS_CAPACITY: usize = MESSAGE_SIZE - OPTIONS_OFFSET;

/// DHCP magic cookie that identifies DHCP messages (vs plain BOOTP).
pub const MAGIC_COOKIE: [u8; 4] = [99, 130, 83, 99];

/// BOOTP operation code for client requests.
pub const BOOTREQUEST: u8 = 1;

/// BOOTP operation code for server replies.
pub const BOOTREPLY: u8 = 2;

/// Hardware type for Ethernet.
pub const HTYPE_ETHERNET: u8 = 1;

/// Hardware address length for Ethernet (6 bytes).
pub const HLEN_ETHERNET: u8 = 6;

/// Flags bit 15: the client asks for a broadcast reply.
pub const BROADCAST_FLAG: u16 = 0x8000;

const CHADDR_OFFSET: usize = 28;
const SNAME_OFFSET: usize = 44;
const BOOTF_OFFSET: usize = 108;
const MAGIC_OFFSET: usize = 236;
const OPTIONS_OFFSET: usize = 240;

/// A BOOTP/DHCP message.
///
/// Represents both client requests and server replies. Use
/// [`decode`](Self::decode) for incoming datagrams, [`reply`](Self::reply)
/// to construct responses, and [`encode`](Self::encode) for transmission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Operation code: [`BOOTREQUEST`] (1) or [`BOOTREPLY`] (2).
    pub op: u8,

    /// Hardware address type. [`HTYPE_ETHERNET`] (1) for Ethernet.
    pub htype: u8,

    /// Hardware address length. [`HLEN_ETHERNET`] (6) for Ethernet.
    pub hlen: u8,

    /// Hop count, incremented by relay agents.
    pub hops: u8,

    /// Transaction ID chosen by the client, echoed in replies.
    pub xid: u32,

    /// Seconds elapsed since the client began address acquisition.
    pub secs: u16,

    /// Flags. Bit 15 ([`BROADCAST_FLAG`]) requests a broadcast reply.
    pub flags: u16,

    /// Client IP address (set by clients that already hold one).
    pub ciaddr: Ipv4Addr,

    /// "Your" IP address - the address being assigned to the client.
    pub yiaddr: Ipv4Addr,

    /// Server IP address.
    pub siaddr: Ipv4Addr,

    /// Gateway IP address - set by relay agents.
    pub giaddr: Ipv4Addr,

    /// Client hardware address; the first `hlen` bytes are significant.
    pub chaddr: [u8; 16],

    /// Server host name, zero-padded.
    pub sname: [u8; 64],

    /// Boot file name, zero-padded.
    pub bootf: [u8; 128],

    /// Magic cookie, conventionally [`MAGIC_COOKIE`]. Captured as-is on
    /// decode, not validated.
    pub magic: [u8; 4],

    /// Options region in raw TLV form.
    pub options: [u8; OPTIONS_CAPACITY],
}

impl Default for Message {
    fn default() -> Self {
        Self {
            op: 0,
            htype: 0,
            hlen: 0,
            hops: 0,
            xid: 0,
            secs: 0,
            flags: 0,
            ciaddr: Ipv4Addr::UNSPECIFIED,
            yiaddr: Ipv4Addr::UNSPECIFIED,
            siaddr: Ipv4Addr::UNSPECIFIED,
            giaddr: Ipv4Addr::UNSPECIFIED,
            chaddr: [0; 16],
            sname: [0; 64],
            bootf: [0; 128],
            magic: [0; 4],
            options: [0; OPTIONS_CAPACITY],
        }
    }
}

impl Message {
    /// Decodes a message from raw bytes.
    ///
    /// Requires at least [`MESSAGE_SIZE`] bytes; trailing bytes beyond
    /// that are ignored. The mapping is purely structural - no field is
    /// validated or transformed beyond byte-order conversion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMessage`] when the buffer is shorter than
    /// [`MESSAGE_SIZE`].
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < MESSAGE_SIZE {
            return Err(Error::InvalidMessage(format!(
                "message too short: {} bytes (expected {})",
                data.len(),
                MESSAGE_SIZE
            )));
        }

        let mut chaddr = [0u8; 16];
        chaddr.copy_from_slice(&data[CHADDR_OFFSET..CHADDR_OFFSET + 16]);

        let mut sname = [0u8; 64];
        sname.copy_from_slice(&data[SNAME_OFFSET..SNAME_OFFSET + 64]);

        let mut bootf = [0u8; 128];
        bootf.copy_from_slice(&data[BOOTF_OFFSET..BOOTF_OFFSET + 128]);

        let mut magic = [0u8; 4];
        magic.copy_from_slice(&data[MAGIC_OFFSET..MAGIC_OFFSET + 4]);

        let mut options = [0u8; OPTIONS_CAPACITY];
        options.copy_from_slice(&data[OPTIONS_OFFSET..MESSAGE_SIZE]);

        Ok(Self {
            op: data[0],
            htype: data[1],
            hlen: data[2],
            hops: data[3],
            xid: u32::from_be_bytes([data[4], data[5], data[6], data[7]]),
            secs: u16::from_be_bytes([data[8], data[9]]),
            flags: u16::from_be_bytes([data[10], data[11]]),
            ciaddr: Ipv4Addr::new(data[12], data[13], data[14], data[15]),
            yiaddr: Ipv4Addr::new(data[16], data[17], data[18], data[19]),
            siaddr: Ipv4Addr::new(data[20], data[21], data[22], data[23]),
            giaddr: Ipv4Addr::new(data[24], data[25], data[26], data[27]),
            chaddr,
            sname,
            bootf,
            magic,
            options,
        })
    }

    /// Encodes the message to its fixed wire layout.
    ///
    /// The result is always exactly [`MESSAGE_SIZE`] bytes regardless of
    /// content; unused tail bytes of variable-length fields stay zero.
    pub fn encode(&self) -> [u8; MESSAGE_SIZE] {
        let mut data = [0u8; MESSAGE_SIZE];

        data[0] = self.op;
        data[1] = self.htype;
        data[2] = self.hlen;
        data[3] = self.hops;
        data[4..8].copy_from_slice(&self.xid.to_be_bytes());
        data[8..10].copy_from_slice(&self.secs.to_be_bytes());
        data[10..12].copy_from_slice(&self.flags.to_be_bytes());
        data[12..16].copy_from_slice(&self.ciaddr.octets());
        data[16..20].copy_from_slice(&self.yiaddr.octets());
        data[20..24].copy_from_slice(&self.siaddr.octets());
        data[24..28].copy_from_slice(&self.giaddr.octets());
        data[CHADDR_OFFSET..CHADDR_OFFSET + 16].copy_from_slice(&self.chaddr);
        data[SNAME_OFFSET..SNAME_OFFSET + 64].copy_from_slice(&self.sname);
        data[BOOTF_OFFSET..BOOTF_OFFSET + 128].copy_from_slice(&self.bootf);
        data[MAGIC_OFFSET..MAGIC_OFFSET + 4].copy_from_slice(&self.magic);
        data[OPTIONS_OFFSET..MESSAGE_SIZE].copy_from_slice(&self.options);

        data
    }

    /// Creates a server reply message.
    ///
    /// The envelope is fixed regardless of reply type: `op=BOOTREPLY`,
    /// Ethernet hardware fields, `xid` echoed, broadcast flag set,
    /// `ciaddr` unspecified. `siaddr` is the server's own address when
    /// the type calls for it (OFFER) and unspecified otherwise; the
    /// caller decides. The options region carries the reply type and an
    /// END marker, preceded by the conventional magic cookie.
    pub fn reply(
        message_type: MessageType,
        your_ip: Ipv4Addr,
        xid: u32,
        server_ip: Ipv4Addr,
    ) -> Self {
        let mut options = [0u8; OPTIONS_CAPACITY];
        options[0] = OPT_MESSAGE_TYPE;
        options[1] = 1;
        options[2] = message_type as u8;
        options[3] = OPT_END;

        Self {
            op: BOOTREPLY,
            htype: HTYPE_ETHERNET,
            hlen: HLEN_ETHERNET,
            hops: 0,
            xid,
            secs: 0,
            flags: BROADCAST_FLAG,
            ciaddr: Ipv4Addr::UNSPECIFIED,
            yiaddr: your_ip,
            siaddr: server_ip,
            giaddr: Ipv4Addr::UNSPECIFIED,
            chaddr: [0; 16],
            sname: [0; 64],
            bootf: [0; 128],
            magic: MAGIC_COOKIE,
            options,
        }
    }

    /// Scans the options region for the fields the engine acts on.
    pub fn parsed_options(&self) -> ParsedOptions {
        options::scan(&self.options)
    }

    /// Returns the DHCP message type (Option 53) if present.
    pub fn message_type(&self) -> Option<MessageType> {
        self.parsed_options().message_type
    }

    /// Returns true if the broadcast flag (bit 15) is set.
    pub fn is_broadcast(&self) -> bool {
        (self.flags & BROADCAST_FLAG) != 0
    }

    /// Returns the client hardware address bytes (respecting `hlen`).
    pub fn chaddr_bytes(&self) -> &[u8] {
        let len = (self.hlen as usize).min(self.chaddr.len());
        &self.chaddr[..len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_message() -> Message {
        let mut chaddr = [0u8; 16];
        chaddr[..6].copy_from_slice(&[0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]);

        let mut options = [0u8; OPTIONS_CAPACITY];
        options[..4].copy_from_slice(&[OPT_MESSAGE_TYPE, 1, 1, OPT_END]);

        Message {
            op: BOOTREQUEST,
            htype: HTYPE_ETHERNET,
            hlen: HLEN_ETHERNET,
            hops: 2,
            xid: 0xDEADBEEF,
            secs: 1234,
            flags: BROADCAST_FLAG,
            ciaddr: Ipv4Addr::new(10, 0, 0, 1),
            yiaddr: Ipv4Addr::new(10, 0, 0, 2),
            siaddr: Ipv4Addr::new(10, 0, 0, 3),
            giaddr: Ipv4Addr::new(10, 0, 0, 4),
            chaddr,
            magic: MAGIC_COOKIE,
            options,
            ..Message::default()
        }
    }

    #[test]
    fn test_encode_is_exactly_576_bytes() {
        assert_eq!(sample_message().encode().len(), MESSAGE_SIZE);
        assert_eq!(Message::default().encode().len(), MESSAGE_SIZE);
    }

    #[test]
    fn test_roundtrip() {
        let message = sample_message();
        let decoded = Message::decode(&message.encode()).unwrap();
        assert_eq!(decoded, message);
    }

    #[test]
    fn test_decode_field_offsets() {
        let mut data = [0u8; MESSAGE_SIZE];
        data[0] = BOOTREQUEST;
        data[1] = HTYPE_ETHERNET;
        data[2] = HLEN_ETHERNET;
        data[3] = 5;
        data[4..8].copy_from_slice(&0x12345678u32.to_be_bytes());
        data[8..10].copy_from_slice(&999u16.to_be_bytes());
        data[10..12].copy_from_slice(&0x8000u16.to_be_bytes());
        data[12..16].copy_from_slice(&[10, 0, 0, 1]);
        data[16..20].copy_from_slice(&[10, 0, 0, 2]);
        data[20..24].copy_from_slice(&[10, 0, 0, 3]);
        data[24..28].copy_from_slice(&[10, 0, 0, 4]);
        data[28..34].copy_from_slice(&[0x11, 0x22, 0x33, 0x44, 0x55, 0x66]);
        data[44..52].copy_from_slice(b"testname");
        data[108..116].copy_from_slice(b"bootfile");
        data[236..240].copy_from_slice(&MAGIC_COOKIE);
        data[240] = OPT_END;

        let message = Message::decode(&data).unwrap();
        assert_eq!(message.op, BOOTREQUEST);
        assert_eq!(message.htype, HTYPE_ETHERNET);
        assert_eq!(message.hlen, HLEN_ETHERNET);
        assert_eq!(message.hops, 5);
        assert_eq!(message.xid, 0x12345678);
        assert_eq!(message.secs, 999);
        assert_eq!(message.flags, 0x8000);
        assert_eq!(message.ciaddr, Ipv4Addr::new(10, 0, 0, 1));
        assert_eq!(message.yiaddr, Ipv4Addr::new(10, 0, 0, 2));
        assert_eq!(message.siaddr, Ipv4Addr::new(10, 0, 0, 3));
        assert_eq!(message.giaddr, Ipv4Addr::new(10, 0, 0, 4));
        assert_eq!(&message.chaddr[..6], &[0x11, 0x22, 0x33, 0x44, 0x55, 0x66]);
        assert_eq!(&message.sname[..8], b"testname");
        assert_eq!(&message.bootf[..8], b"bootfile");
        assert_eq!(message.magic, MAGIC_COOKIE);
    }

    #[test]
    fn test_encode_field_offsets() {
        let encoded = sample_message().encode();
        assert_eq!(encoded[0], BOOTREQUEST);
        assert_eq!(encoded[1], HTYPE_ETHERNET);
        assert_eq!(encoded[2], HLEN_ETHERNET);
        assert_eq!(encoded[3], 2);
        assert_eq!(&encoded[4..8], &0xDEADBEEFu32.to_be_bytes());
        assert_eq!(&encoded[8..10], &1234u16.to_be_bytes());
        assert_eq!(&encoded[10..12], &0x8000u16.to_be_bytes());
        assert_eq!(&encoded[12..16], &[10, 0, 0, 1]);
        assert_eq!(&encoded[16..20], &[10, 0, 0, 2]);
        assert_eq!(&encoded[20..24], &[10, 0, 0, 3]);
        assert_eq!(&encoded[24..28], &[10, 0, 0, 4]);
        assert_eq!(&encoded[28..34], &[0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]);
        assert_eq!(&encoded[236..240], &MAGIC_COOKIE);
        assert_eq!(&encoded[240..244], &[OPT_MESSAGE_TYPE, 1, 1, OPT_END]);
    }

    #[test]
    fn test_decode_short_buffer_rejected() {
        assert!(Message::decode(&[]).is_err());
        assert!(Message::decode(&[0u8; 100]).is_err());
        assert!(Message::decode(&[0u8; MESSAGE_SIZE - 1]).is_err());
        assert!(Message::decode(&[0u8; MESSAGE_SIZE]).is_ok());
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let mut data = vec![0u8; MESSAGE_SIZE + 40];
        data[0] = BOOTREQUEST;
        let message = Message::decode(&data).unwrap();
        assert_eq!(message.op, BOOTREQUEST);
    }

    #[test]
    fn test_decode_does_not_validate_magic() {
        let mut data = [0u8; MESSAGE_SIZE];
        data[236..240].copy_from_slice(&[1, 2, 3, 4]);
        let message = Message::decode(&data).unwrap();
        assert_eq!(message.magic, [1, 2, 3, 4]);
    }

    #[test]
    fn test_reply_envelope() {
        let reply = Message::reply(
            MessageType::Offer,
            Ipv4Addr::new(10, 0, 0, 2),
            0x1234,
            Ipv4Addr::new(10, 0, 0, 1),
        );

        assert_eq!(reply.op, BOOTREPLY);
        assert_eq!(reply.htype, HTYPE_ETHERNET);
        assert_eq!(reply.hlen, HLEN_ETHERNET);
        assert_eq!(reply.hops, 0);
        assert_eq!(reply.xid, 0x1234);
        assert_eq!(reply.secs, 0);
        assert!(reply.is_broadcast());
        assert_eq!(reply.ciaddr, Ipv4Addr::UNSPECIFIED);
        assert_eq!(reply.yiaddr, Ipv4Addr::new(10, 0, 0, 2));
        assert_eq!(reply.siaddr, Ipv4Addr::new(10, 0, 0, 1));
        assert_eq!(reply.magic, MAGIC_COOKIE);
        assert_eq!(reply.message_type(), Some(MessageType::Offer));
    }

    #[test]
    fn test_reply_roundtrips_through_codec() {
        let reply = Message::reply(
            MessageType::Nak,
            Ipv4Addr::UNSPECIFIED,
            77,
            Ipv4Addr::UNSPECIFIED,
        );
        let decoded = Message::decode(&reply.encode()).unwrap();
        assert_eq!(decoded, reply);
        assert_eq!(decoded.message_type(), Some(MessageType::Nak));
    }

    #[test]
    fn test_chaddr_bytes_respects_hlen() {
        let mut message = sample_message();
        message.hlen = 4;
        assert_eq!(message.chaddr_bytes(), &[0xaa, 0xbb, 0xcc, 0xdd]);

        // hlen larger than the field never reads out of bounds.
        message.hlen = 200;
        assert_eq!(message.chaddr_bytes().len(), 16);
    }
}
