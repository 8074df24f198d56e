//! Client-side message construction.
//!
//! Builds the DISCOVER and REQUEST messages a client broadcasts while
//! acquiring an address. Useful for exercising the server end to end
//! without a real client on the network.

use std::net::Ipv4Addr;

use rand::Rng;

use crate::message::{
    BOOTREQUEST, BROADCAST_FLAG, HLEN_ETHERNET, HTYPE_ETHERNET, MAGIC_COOKIE, Message,
    OPTIONS_CAPACITY,
};
use crate::options::{MessageType, OPT_END, OPT_MESSAGE_TYPE, OPT_REQUESTED_IP};

/// A DHCP client identity: a hardware address used to stamp requests.
#[derive(Debug, Clone)]
pub struct DhcpClient {
    chaddr: [u8; 16],
    hlen: u8,
}

impl DhcpClient {
    /// Creates a client with the given hardware address. At most 16
    /// bytes are kept; the tail of the field stays zero.
    pub fn new(hardware_addr: &[u8]) -> Self {
        let len = hardware_addr.len().min(16);
        let mut chaddr = [0u8; 16];
        chaddr[..len].copy_from_slice(&hardware_addr[..len]);
        Self {
            chaddr,
            hlen: len as u8,
        }
    }

    /// Creates a client with a random Ethernet hardware address drawn
    /// from the supplied generator.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let mut hardware_addr = [0u8; HLEN_ETHERNET as usize];
        rng.fill(&mut hardware_addr[..]);
        Self::new(&hardware_addr)
    }

    /// The significant bytes of the hardware address.
    pub fn hardware_addr(&self) -> &[u8] {
        &self.chaddr[..self.hlen as usize]
    }

    /// Builds a DISCOVER message.
    pub fn discover(&self, xid: u32) -> Message {
        self.build(xid, &[OPT_MESSAGE_TYPE, 1, MessageType::Discover as u8, OPT_END])
    }

    /// Builds a REQUEST message confirming `requested` (typically the
    /// address carried in a preceding OFFER).
    pub fn request(&self, xid: u32, requested: Ipv4Addr) -> Message {
        let ip = requested.octets();
        self.build(
            xid,
            &[
                OPT_MESSAGE_TYPE,
                1,
                MessageType::Request as u8,
                OPT_REQUESTED_IP,
                4,
                ip[0],
                ip[1],
                ip[2],
                ip[3],
                OPT_END,
            ],
        )
    }

    fn build(&self, xid: u32, option_bytes: &[u8]) -> Message {
        let mut options = [0u8; OPTIONS_CAPACITY];
        options[..option_bytes.len()].copy_from_slice(option_bytes);

        Message {
            op: BOOTREQUEST,
            htype: HTYPE_ETHERNET,
            hlen: self.hlen,
            xid,
            flags: BROADCAST_FLAG,
            chaddr: self.chaddr,
            magic: MAGIC_COOKIE,
            options,
            ..Message::default()
        }
    }
}
