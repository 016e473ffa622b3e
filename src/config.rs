use std::net::SocketAddr;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const BIND_ADDR_ENV: &str = "RUSTYRIDE_ADDR";
pub const DEFAULT_LOG_FILTER: &str = "rustyride=debug,tower_http=debug,info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
}

impl ServerConfig {
    /// Read the bind address from `RUSTYRIDE_ADDR`, falling back to the default.
    pub fn from_env() -> Result<Self, std::net::AddrParseError> {
        Self::from_value(std::env::var(BIND_ADDR_ENV).ok().as_deref())
    }

    pub fn from_value(value: Option<&str>) -> Result<Self, std::net::AddrParseError> {
        let raw = value
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .unwrap_or(DEFAULT_BIND_ADDR);
        Ok(Self {
            bind_addr: raw.parse()?,
        })
    }
}
