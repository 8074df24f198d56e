//! Request classification and reply construction.
//!
//! The engine is the protocol state machine: it inspects one decoded
//! request, consults the address pool, and produces exactly one reply.
//! States live in the message-type option of the request, not in the
//! engine; the pool bitmap is the only state mutated, and only on the
//! DISCOVER path.
//!
//! Anything that cannot be classified - a non-BOOTREQUEST op, a missing
//! or unknown message type - gets a NAK rather than silence, so every
//! inbound datagram produces a syntactically valid reply.

use std::net::Ipv4Addr;

use tracing::{debug, warn};

use crate::message::{BOOTREQUEST, Message};
use crate::options::MessageType;
use crate::pool::AddressPool;

/// The DHCP server engine: one pool, one server identity.
#[derive(Debug)]
pub struct Engine {
    server_ip: Ipv4Addr,
    pool: AddressPool,
}

impl Engine {
    /// Creates an engine serving `range` addresses under the /24 of
    /// `server_ip`.
    pub fn new(server_ip: Ipv4Addr, range: u8) -> Self {
        Self {
            server_ip,
            pool: AddressPool::new(server_ip, range),
        }
    }

    /// The server's own address, used as `siaddr` in offers.
    pub fn server_ip(&self) -> Ipv4Addr {
        self.server_ip
    }

    /// Read access to the pool for inspection and tests.
    pub fn pool(&self) -> &AddressPool {
        &self.pool
    }

    /// Mutable access to the pool, e.g. to return addresses out of band.
    pub fn pool_mut(&mut self) -> &mut AddressPool {
        &mut self.pool
    }

    /// Handles one request and returns the reply to send.
    ///
    /// Request-type to reply-type mapping:
    ///
    /// - `op != BOOTREQUEST` -> NAK (protocol violation, answered rather
    ///   than dropped)
    /// - DISCOVER -> OFFER carrying the allocated address in `yiaddr`
    /// - REQUEST -> ACK with `yiaddr` unspecified
    /// - DECLINE, RELEASE, absent or unknown type -> NAK
    ///
    /// Pool exhaustion on DISCOVER still yields an OFFER; its `yiaddr`
    /// is the sentinel `0.0.0.0`.
    ///
    /// RELEASE does not return the client's address to the pool. That
    /// matches the behavior this engine was built to preserve, but it is
    /// almost certainly a gap: callers wanting the address back must call
    /// [`pool_mut`](Self::pool_mut)`().release(..)` themselves.
    pub fn handle(&mut self, request: &Message) -> Message {
        if request.op != BOOTREQUEST {
            warn!(op = request.op, xid = request.xid, "non-client message");
            return self.nak(request.xid);
        }

        let parsed = request.parsed_options();
        match parsed.message_type {
            Some(MessageType::Discover) => {
                let offered = self.pool.allocate(parsed.requested_ip);
                if offered == Ipv4Addr::UNSPECIFIED {
                    warn!(xid = request.xid, "pool exhausted, offering sentinel");
                } else {
                    debug!(xid = request.xid, address = %offered, "offer");
                }
                Message::reply(MessageType::Offer, offered, request.xid, self.server_ip)
            }
            Some(MessageType::Request) => {
                debug!(xid = request.xid, "ack");
                Message::reply(
                    MessageType::Ack,
                    Ipv4Addr::UNSPECIFIED,
                    request.xid,
                    Ipv4Addr::UNSPECIFIED,
                )
            }
            Some(other) => {
                debug!(xid = request.xid, message_type = %other, "nak");
                self.nak(request.xid)
            }
            None => {
                debug!(xid = request.xid, "no message type, nak");
                self.nak(request.xid)
            }
        }
    }

    fn nak(&self, xid: u32) -> Message {
        Message::reply(
            MessageType::Nak,
            Ipv4Addr::UNSPECIFIED,
            xid,
            Ipv4Addr::UNSPECIFIED,
        )
    }
}
