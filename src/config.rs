use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use std::path::Path;

use crate::error::{Error, Result};

/// Server configuration, persisted as JSON next to the binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server_ip: Ipv4Addr,
    pub pool_range: u8,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_ip: Ipv4Addr::new(10, 0, 0, 1),
            pool_range: 32,
            verbose: false,
        }
    }
}

impl Config {
    /// Loads the configuration from `path`, writing the defaults there
    /// first when the file does not exist yet.
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save(path)?;
            Ok(config)
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.pool_range == 0 {
            return Err(Error::InvalidConfig(
                "pool_range must be greater than 0".to_string(),
            ));
        }

        if self.pool_range == u8::MAX {
            return Err(Error::InvalidConfig(
                "pool_range must be at most 254".to_string(),
            ));
        }

        // The pool covers fourth octets 2..=pool_range + 1 under the
        // server's /24.
        let fourth = self.server_ip.octets()[3];
        if fourth >= 2 && fourth <= self.pool_range + 1 {
            return Err(Error::InvalidConfig(
                "server_ip must not be within the pool range".to_string(),
            ));
        }

        Ok(())
    }
}
