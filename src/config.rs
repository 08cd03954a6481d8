use std::net::SocketAddr;
use std::time::Duration;

use url::Url;

use crate::clients::{
    CatalogClient,
    catalog::DEFAULT_TIMEOUT,
    errors::{Error, Result},
};
use crate::web::AppState;

pub const DEFAULT_CATALOG_URL: &str = "http://127.0.0.1:8001";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

// Runtime configuration for the web server
#[derive(Debug, Clone)]
pub struct Config {
    pub catalog_url: Url,
    pub timeout: Duration,
    pub preview_port: u16,
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn app_state(&self) -> Result<AppState> {
        let catalog = CatalogClient::new(&self.catalog_url, self.timeout)?;
        Ok(AppState::new(catalog, self.preview_port))
    }
}

#[derive(Default)]
pub struct ConfigBuilder {
    catalog_url: Option<String>,
    timeout_secs: Option<u64>,
    preview_port: Option<u16>,
    bind_addr: Option<String>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn catalog_url(mut self, url: impl Into<String>) -> Self {
        self.catalog_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    #[must_use]
    pub fn preview_port(mut self, port: u16) -> Self {
        self.preview_port = Some(port);
        self
    }

    #[must_use]
    pub fn bind_addr(mut self, addr: impl Into<String>) -> Self {
        self.bind_addr = Some(addr.into());
        self
    }

    pub fn build(self) -> Result<Config> {
        let raw_url = self
            .catalog_url
            .unwrap_or_else(|| DEFAULT_CATALOG_URL.to_string());
        let catalog_url = Url::parse(raw_url.trim())?;
        if !matches!(catalog_url.scheme(), "http" | "https") || !catalog_url.has_host() {
            return Err(Error::ConfigurationError(format!(
                "Catalog URL must be an http(s) URL with a host, got {raw_url}"
            )));
        }

        let timeout = match self.timeout_secs {
            Some(0) => {
                return Err(Error::ConfigurationError(
                    "Catalog timeout must be greater than zero".into(),
                ));
            }
            Some(secs) => Duration::from_secs(secs),
            None => DEFAULT_TIMEOUT,
        };

        // Previews are served by the catalog, so its port is the natural default
        let preview_port = match self.preview_port {
            Some(port) => port,
            None => catalog_url.port_or_known_default().ok_or_else(|| {
                Error::ConfigurationError("Cannot determine catalog port".into())
            })?,
        };

        let raw_bind = self
            .bind_addr
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_bind.parse().map_err(|e| {
            Error::ConfigurationError(format!("Invalid bind address {raw_bind}: {e}"))
        })?;

        Ok(Config {
            catalog_url,
            timeout,
            preview_port,
            bind_addr,
        })
    }
}
