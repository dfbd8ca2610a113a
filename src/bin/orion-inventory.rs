// Copyright (c) 2025 - Cowboy AI, Inc.
//! Orion Inventory
//!
//! Prints the host inventory for an Orion inventory source as JSON on stdout.
//!
//! Environment:
//! - `ORION_INVENTORY_CONFIG`: path to the source file (`*orion.yaml`, `*solarwinds.yml`, ...)
//! - `ORION_INVENTORY_REFRESH`: set to `1` to bypass a cached result
//! - `RUST_LOG`: log filter; logs go to stderr

use anyhow::{bail, Context, Result};
use orion_infrastructure::client::SwisClient;
use orion_infrastructure::inventory::{verify_file, InventoryConfig, InventorySource};
use std::path::PathBuf;
use tracing::info;

const ENV_CONFIG: &str = "ORION_INVENTORY_CONFIG";
const ENV_REFRESH: &str = "ORION_INVENTORY_REFRESH";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let path = std::env::var(ENV_CONFIG)
        .map(PathBuf::from)
        .with_context(|| format!("{} not set", ENV_CONFIG))?;
    if !verify_file(&path) {
        bail!(
            "{} is not an Orion inventory source (expected a name ending in orion.yaml or solarwinds.yaml)",
            path.display()
        );
    }

    let config = InventoryConfig::load(&path).context("Failed to load inventory source")?;
    let swis = SwisClient::new(config.swis_config()).context("Failed to build SWIS client")?;
    let use_cache = !matches!(std::env::var(ENV_REFRESH).as_deref(), Ok("1" | "true"));

    let source = InventorySource::new(&path, config);
    let inventory = source.parse(&swis, use_cache).await?;
    info!("Inventory contains {} hosts", inventory.len());

    println!("{}", serde_json::to_string_pretty(&inventory)?);
    Ok(())
}
