//! # tinydhcp
//!
//! A minimal BOOTP/DHCP server built around fixed-size 576-byte messages.
//!
//! ## Features
//!
//! - DISCOVER/OFFER and REQUEST/ACK exchanges, NAK for everything else
//! - Bitmap address pool over a /24 with deterministic lowest-free assignment
//! - Client-side DISCOVER/REQUEST builders for end-to-end exercises
//! - Hex and field-level dumps of every datagram in verbose mode
//! - Async/await with Tokio
//!
//! ## Quick Start
//!
//! ```no_run
//! use tinydhcp::{Config, DhcpServer};
//!
//! #[tokio::main]
//! async fn main() -> tinydhcp::Result<()> {
//!     let config = Config::load_or_create("tinydhcp.json")?;
//!     let mut server = DhcpServer::new(config)?;
//!     server.run().await
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`Config`] - Server configuration (address, pool size, verbosity)
//! - [`DhcpServer`] - UDP front end listening on port 67
//! - [`Engine`] - The request/reply state machine
//! - [`AddressPool`] - Bitmap allocator over the server's /24
//! - [`Message`] - Fixed-size wire codec
//! - [`DhcpClient`] - Client-side message builders

pub mod client;
pub mod config;
pub mod dump;
pub mod engine;
pub mod error;
pub mod message;
pub mod options;
pub mod pool;
pub mod server;

pub use client::DhcpClient;
pub use config::Config;
pub use engine::Engine;
pub use error::{Error, Result};
pub use message::Message;
pub use options::{MessageType, ParsedOptions};
pub use pool::AddressPool;
pub use server::DhcpServer;
