//! UDP front end.
//!
//! Binds port 67, receives datagrams one at a time, feeds them through the
//! engine, and broadcasts each reply to port 68. Handling is strictly
//! sequential: one request is fully answered before the next is read, so
//! the engine needs no locking.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::dump::hex_dump;
use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::message::Message;

const DHCP_SERVER_PORT: u16 = 67;
const DHCP_CLIENT_PORT: u16 = 68;
const RECV_BUFFER_SIZE: usize = 1500;

pub struct DhcpServer {
    config: Config,
    engine: Engine,
    socket: UdpSocket,
}

impl DhcpServer {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let socket = Self::create_socket()?;
        let engine = Engine::new(config.server_ip, config.pool_range);

        info!(
            "DHCP server starting on {}:{}",
            config.server_ip, DHCP_SERVER_PORT
        );
        info!(
            "IP pool: {} addresses under {}.{}.{}.0/24",
            engine.pool().range(),
            config.server_ip.octets()[0],
            config.server_ip.octets()[1],
            config.server_ip.octets()[2],
        );

        Ok(Self {
            config,
            engine,
            socket,
        })
    }

    fn create_socket() -> Result<UdpSocket> {
        let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))
            .map_err(|error| Error::Socket(format!("Failed to create socket: {}", error)))?;

        socket
            .set_reuse_address(true)
            .map_err(|error| Error::Socket(format!("Failed to set SO_REUSEADDR: {}", error)))?;

        socket
            .set_broadcast(true)
            .map_err(|error| Error::Socket(format!("Failed to set SO_BROADCAST: {}", error)))?;

        socket
            .set_nonblocking(true)
            .map_err(|error| Error::Socket(format!("Failed to set non-blocking: {}", error)))?;

        let bind_addr = SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, DHCP_SERVER_PORT);
        socket.bind(&bind_addr.into()).map_err(|error| {
            Error::Socket(format!("Failed to bind to {}: {}", bind_addr, error))
        })?;

        let std_socket: std::net::UdpSocket = socket.into();
        let tokio_socket = UdpSocket::from_std(std_socket).map_err(|error| {
            Error::Socket(format!("Failed to convert to tokio socket: {}", error))
        })?;

        Ok(tokio_socket)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Receives and answers requests forever.
    pub async fn run(&mut self) -> Result<()> {
        let mut buffer = [0u8; RECV_BUFFER_SIZE];

        info!("DHCP server ready and listening");

        loop {
            let (size, source) = self.socket.recv_from(&mut buffer).await?;
            if let Err(error) = self.handle_datagram(&buffer[..size], source).await {
                warn!("Error handling datagram from {}: {}", source, error);
            }
        }
    }

    async fn handle_datagram(&mut self, data: &[u8], source: SocketAddr) -> Result<()> {
        if self.config.verbose {
            debug!("Received {} bytes from {}\n{}", data.len(), source, hex_dump(data));
        }

        let request = Message::decode(data)?;
        if self.config.verbose {
            debug!("{}", request);
        }

        let reply = self.engine.handle(&request);
        if self.config.verbose {
            debug!("{}", reply);
        }

        self.send_reply(&reply).await
    }

    async fn send_reply(&self, reply: &Message) -> Result<()> {
        // Replies always go to the local broadcast address; clients do not
        // have a routable address yet.
        let destination = SocketAddrV4::new(Ipv4Addr::BROADCAST, DHCP_CLIENT_PORT);
        let encoded = reply.encode();
        self.socket.send_to(&encoded, SocketAddr::V4(destination)).await?;
        Ok(())
    }
}
