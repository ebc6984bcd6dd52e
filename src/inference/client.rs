use anyhow::{Context, Result};
use reqwest::Client;

use crate::config::Config;

/// Install the ring crypto provider for rustls (required for rustls 0.23+).
/// Safe to call more than once.
pub fn install_crypto_provider() {
    // Err only means a provider is already installed
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// Create the HTTP client shared by every inference source.
///
/// No overall request timeout is set here: the collector bounds each source
/// itself so retries stay inside the same budget.
pub fn create_client(config: &Config) -> Result<Client> {
    install_crypto_provider();
    let connect_timeout = config.inference.timeout()?;
    Client::builder()
        .connect_timeout(connect_timeout)
        .user_agent(concat!("wellscan/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to create inference HTTP client")
}
