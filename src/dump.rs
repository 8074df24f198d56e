//! Human-readable diagnostics for messages and raw datagrams.

use std::fmt;

use crate::message::{BOOTREPLY, BOOTREQUEST, Message};
use crate::options::{OPT_END, OptionIter};

fn op_name(op: u8) -> &'static str {
    match op {
        BOOTREQUEST => "BOOTREQUEST",
        BOOTREPLY => "BOOTREPLY",
        _ => "UNKNOWN",
    }
}

fn htype_name(htype: u8) -> &'static str {
    match htype {
        1 => "Ethernet (10Mb)",
        6 => "IEEE 802 Network",
        7 => "ARCNET",
        11 => "LocalTalk",
        12 => "LocalNet",
        14 => "SMDS",
        15 => "Frame Relay",
        16 | 19 | 21 => "Asynchronous Transfer Mode (ATM)",
        17 => "HDLC",
        18 => "Fibre Channel",
        20 => "Serial Line",
        _ => "unknown",
    }
}

/// Formats a hardware address as a colon-separated hex string.
pub fn format_hardware_addr(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut result = String::with_capacity(bytes.len() * 3);
    for (index, byte) in bytes.iter().enumerate() {
        if index > 0 {
            result.push(':');
        }
        let _ = write!(result, "{:02x}", byte);
    }
    result
}

/// Renders a raw datagram as a hex dump: a four-digit hex offset followed
/// by up to 16 bytes per row, with a gap after the eighth byte.
pub fn hex_dump(buffer: &[u8]) -> String {
    use std::fmt::Write;
    let mut result = String::new();
    for (row, chunk) in buffer.chunks(16).enumerate() {
        let _ = write!(result, "{:04x} ", row * 16);
        for (index, byte) in chunk.iter().enumerate() {
            if index == 8 {
                result.push(' ');
            }
            let _ = write!(result, " {:02x}", byte);
        }
        result.push('\n');
    }
    result
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DHCP message")?;
        writeln!(f, "    op: {} ({})", self.op, op_name(self.op))?;
        writeln!(f, "    htype: {} ({})", self.htype, htype_name(self.htype))?;
        writeln!(f, "    hlen: {}", self.hlen)?;
        writeln!(f, "    hops: {}", self.hops)?;
        writeln!(f, "    xid: {:#010x}", self.xid)?;
        writeln!(f, "    secs: {} s", self.secs)?;
        writeln!(f, "    flags: {:#06x}", self.flags)?;
        writeln!(f, "    ciaddr: {}", self.ciaddr)?;
        writeln!(f, "    yiaddr: {}", self.yiaddr)?;
        writeln!(f, "    siaddr: {}", self.siaddr)?;
        writeln!(f, "    giaddr: {}", self.giaddr)?;
        writeln!(
            f,
            "    chaddr: {}",
            format_hardware_addr(self.chaddr_bytes())
        )?;
        writeln!(
            f,
            "    sname: {}",
            String::from_utf8_lossy(&self.sname).trim_end_matches('\0')
        )?;
        writeln!(
            f,
            "    bootf: {}",
            String::from_utf8_lossy(&self.bootf).trim_end_matches('\0')
        )?;
        writeln!(
            f,
            "    magic: {}.{}.{}.{}",
            self.magic[0], self.magic[1], self.magic[2], self.magic[3]
        )?;
        writeln!(f, "    options:")?;
        writeln!(f, "        tag  len  data")?;
        for option in OptionIter::new(&self.options) {
            writeln!(
                f,
                "        {:<3}  {:<3}  {:02x?}",
                option.tag,
                option.data.len(),
                option.data
            )?;
        }
        if self.options.first() == Some(&OPT_END) {
            writeln!(f, "        (empty)")?;
        }
        Ok(())
    }
}
