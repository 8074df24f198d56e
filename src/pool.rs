//! IPv4 address pool.
//!
//! A bitmap allocator over a /24-style range. The pool covers fourth-octet
//! values `2..=range + 1` under a fixed three-octet prefix taken from the
//! server's own address; fourth octets 0 and 1 stay reserved for the
//! network and the server itself.
//!
//! Allocation is deterministic: a requested address wins when it is free,
//! otherwise the lowest free fourth octet is handed out. Exhaustion is
//! signaled with the sentinel `0.0.0.0` rather than an error so the reply
//! path stays uniform.

use std::net::Ipv4Addr;

/// Largest usable range: fourth octets 2..=255.
const MAX_RANGE: u8 = 254;

/// Bitmap allocator over a contiguous block of a /24.
///
/// Entry `true` means free, `false` means leased; index 0 corresponds to
/// fourth-octet value 2. The bitmap length always equals the range.
#[derive(Debug, Clone)]
pub struct AddressPool {
    prefix: [u8; 3],
    range: u8,
    slots: Vec<bool>,
}

impl AddressPool {
    /// Creates a pool under the first three octets of `server_addr` with
    /// `range` leasable addresses, all initially free.
    ///
    /// The range is clamped to `1..=254` so the bitmap is never empty and
    /// the highest pool address (`prefix.255`) still fits an octet.
    pub fn new(server_addr: Ipv4Addr, range: u8) -> Self {
        let octets = server_addr.octets();
        let range = range.clamp(1, MAX_RANGE);
        Self {
            prefix: [octets[0], octets[1], octets[2]],
            range,
            slots: vec![true; range as usize],
        }
    }

    /// Number of leasable addresses in the pool.
    pub fn range(&self) -> u8 {
        self.range
    }

    /// Number of addresses currently free.
    pub fn available(&self) -> usize {
        self.slots.iter().filter(|free| **free).count()
    }

    /// Maps an address to its bitmap index, or `None` when the address is
    /// outside the pool (wrong prefix, reserved octet, or past the range).
    fn slot_index(&self, ip: Ipv4Addr) -> Option<usize> {
        let octets = ip.octets();
        if octets[..3] != self.prefix {
            return None;
        }
        if octets[3] < 2 {
            return None;
        }
        let index = (octets[3] - 2) as usize;
        if index >= self.slots.len() {
            return None;
        }
        Some(index)
    }

    /// Returns true when `ip` is inside the pool and currently free.
    pub fn is_available(&self, ip: Ipv4Addr) -> bool {
        match self.slot_index(ip) {
            Some(index) => self.slots[index],
            None => false,
        }
    }

    /// Reserves and returns an address.
    ///
    /// `requested` is honored when it is free; any unavailable or
    /// out-of-pool request (including `0.0.0.0`) falls through to the
    /// lowest free address. Returns `0.0.0.0` when the pool is exhausted;
    /// the sentinel is never a valid lease.
    pub fn allocate(&mut self, requested: Ipv4Addr) -> Ipv4Addr {
        if let Some(index) = self.slot_index(requested)
            && self.slots[index]
        {
            self.slots[index] = false;
            return requested;
        }

        match self.slots.iter().position(|free| *free) {
            Some(index) => {
                self.slots[index] = false;
                Ipv4Addr::new(
                    self.prefix[0],
                    self.prefix[1],
                    self.prefix[2],
                    index as u8 + 2,
                )
            }
            None => Ipv4Addr::UNSPECIFIED,
        }
    }

    /// Returns a leased address to the pool.
    ///
    /// Releasing an address that is already free, or one outside the
    /// pool, is a no-op.
    pub fn release(&mut self, ip: Ipv4Addr) {
        if let Some(index) = self.slot_index(ip)
            && !self.slots[index]
        {
            self.slots[index] = true;
        }
    }
}
