pub mod client;
pub mod error;
pub mod health;
pub mod source;
pub mod types;

pub use client::{create_client, install_crypto_provider};
pub use error::SourceError;
pub use health::{health_check, ServiceHealth};
pub use source::{build_sources, HttpSource, ScoreSource};
pub use types::{Reading, SourcePayload};
