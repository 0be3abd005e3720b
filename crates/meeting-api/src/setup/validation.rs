//! Configuration validation
//!
//! Validates configuration at startup to catch misconfigurations early.

use anyhow::Result;
use meeting_core::Config;

/// Validate configuration; fails on combinations that cannot work and warns on risky ones.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
    }

    if config.is_production() && config.storage.access_key == "minioadmin" {
        tracing::warn!("Default storage credentials in use in production");
    }

    Ok(())
}
