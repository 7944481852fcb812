//! `freenas-provisioner`: provision and tear down FreeNAS iSCSI volumes.

mod cli;
mod commands;
mod config;
mod logging;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use libcsi::FreenasBackend;
use libfreenas::FreenasClient;
use tracing::debug;

use crate::cli::{Cli, Command};
use crate::config::StorageClass;

type Backend = FreenasBackend<FreenasClient>;

fn provisioning_backend(cli: &Cli, client: Arc<FreenasClient>) -> Result<(StorageClass, Backend)> {
    let class = StorageClass::load_required(cli.storage_class.as_deref())?;
    let config = class.provisioner_config()?;
    debug!(?config, "loaded storage class");
    Ok((class, FreenasBackend::new(client, config)))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log)?;

    let client = FreenasClient::new(&cli.api.to_config()).context("Failed to build FreeNAS client")?;
    let client = Arc::new(client);

    match &cli.command {
        Command::Provision(args) => {
            let (class, backend) = provisioning_backend(&cli, client)?;
            commands::provision(&backend, &class, args).await
        }
        Command::Teardown(args) => {
            // Everything teardown needs is in the volume record.
            let backend = FreenasBackend::for_teardown(client);
            commands::teardown(&backend, args).await
        }
        Command::Capacity => {
            let (_, backend) = provisioning_backend(&cli, client)?;
            commands::capacity(&backend).await
        }
    }
}
