use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use libcsi::{CreateVolumeRequest, CsiController, ReclaimPolicy, Volume};
use tracing::info;

use crate::cli::{ProvisionArgs, TeardownArgs};
use crate::config::StorageClass;

pub fn volume_request(class: &StorageClass, args: &ProvisionArgs) -> CreateVolumeRequest {
    CreateVolumeRequest {
        name: args.name.clone(),
        namespace: args.namespace.clone(),
        capacity_bytes: args.capacity,
        access_modes: args.access_modes.iter().copied().map(Into::into).collect(),
        reclaim_policy: class.reclaim_policy.unwrap_or_default(),
        storage_class_name: class.metadata.name.clone(),
        mount_options: class.mount_options.clone(),
    }
}

pub fn write_volume(volume: &Volume, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(volume).context("Failed to serialize volume")?;
    match output {
        Some(path) => fs::write(path, format!("{json}\n"))
            .with_context(|| format!("Failed to write volume record: {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}").context("Failed to write volume record to stdout")
        }
    }
}

/// Read a record written by [`write_volume`].  YAML is a superset of JSON, so
/// hand-edited YAML records are accepted too.
pub fn read_volume(path: &Path) -> Result<Volume> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read volume record: {}", path.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse volume record: {}", path.display()))
}

pub async fn provision(
    controller: &impl CsiController,
    class: &StorageClass,
    args: &ProvisionArgs,
) -> Result<()> {
    let request = volume_request(class, args);
    let volume = controller
        .create_volume(request)
        .await
        .with_context(|| format!("Failed to provision volume {}", args.name))?;
    info!(name = %volume.name, iqn = %volume.iscsi.iqn, "provisioned");
    write_volume(&volume, args.output.as_deref())
}

pub async fn teardown(controller: &impl CsiController, args: &TeardownArgs) -> Result<()> {
    let volume = read_volume(&args.volume)?;
    if volume.reclaim_policy == ReclaimPolicy::Retain && !args.force {
        info!(
            name = %volume.name,
            "reclaim policy is Retain, leaving remote resources in place"
        );
        return Ok(());
    }
    if let Err(err) = controller.delete_volume(&volume).await {
        let context = if err.is_precondition() {
            format!("Volume record {} cannot be torn down", args.volume.display())
        } else {
            format!("Failed to tear down volume {}", volume.name)
        };
        return Err(anyhow::Error::new(err).context(context));
    }
    info!(name = %volume.name, "torn down");
    Ok(())
}

pub async fn capacity(controller: &impl CsiController) -> Result<()> {
    let bytes = controller
        .get_capacity()
        .await
        .context("Failed to query capacity")?;
    println!("{bytes}");
    Ok(())
}
