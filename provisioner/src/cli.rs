//! Command line definition.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use libcsi::AccessMode;
use libfreenas::ApiConfig;

use crate::logging::LogArgs;

#[derive(Parser, Debug)]
#[command(name = "freenas-provisioner")]
#[command(about = "Provision iSCSI volumes on a FreeNAS appliance", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub api: ApiArgs,

    /// Storage class manifest holding the provisioner parameters; required
    /// by `provision` and `capacity`
    #[arg(long, env = "STORAGE_CLASS_PATH", value_name = "FILE")]
    pub storage_class: Option<PathBuf>,

    #[command(flatten)]
    pub log: LogArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug)]
pub struct ApiArgs {
    /// FreeNAS API host, e.g. https://freenas.local
    #[arg(long = "freenas-api-host", env = "FREENAS_API_HOST")]
    pub host: String,

    /// FreeNAS API username
    #[arg(long = "freenas-api-user", env = "FREENAS_API_USER", default_value = "root")]
    pub user: String,

    /// FreeNAS API password
    #[arg(
        long = "freenas-api-password",
        env = "FREENAS_API_PASSWORD",
        default_value = "",
        hide_env_values = true
    )]
    pub password: String,

    /// Skip TLS certificate verification
    #[arg(
        long = "freenas-api-skip-tls-verification",
        env = "FREENAS_API_SKIP_TLS_VERIFICATION"
    )]
    pub skip_tls_verification: bool,

    /// Per-request timeout in seconds
    #[arg(
        long = "freenas-api-timeout-secs",
        env = "FREENAS_API_TIMEOUT_SECS",
        default_value_t = 30
    )]
    pub timeout_secs: u64,
}

impl ApiArgs {
    pub fn to_config(&self) -> ApiConfig {
        ApiConfig {
            insecure_skip_verify: self.skip_tls_verification,
            timeout: Duration::from_secs(self.timeout_secs),
            ..ApiConfig::new(&self.host, &self.user, &self.password)
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a volume and print its record as JSON
    Provision(ProvisionArgs),
    /// Delete every remote resource behind a volume record
    Teardown(TeardownArgs),
    /// Print the bytes available under the root dataset
    Capacity,
}

#[derive(Args, Debug)]
pub struct ProvisionArgs {
    /// Volume name; also used for the iSCSI target and extent
    #[arg(long)]
    pub name: String,

    /// Namespace of the claim
    #[arg(long, default_value = "default")]
    pub namespace: String,

    /// Requested size: bytes, or a quantity such as 2Gi
    #[arg(long, value_parser = parse_quantity)]
    pub capacity: u64,

    /// Access mode, can be set multiple times
    #[arg(long = "access-mode", value_enum, default_value = "ReadWriteOnce")]
    pub access_modes: Vec<AccessModeArg>,

    /// Write the record to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct TeardownArgs {
    /// Volume record written by `provision` (JSON or YAML)
    #[arg(long, value_name = "FILE")]
    pub volume: PathBuf,

    /// Delete even when the record asks for the volume to be retained
    #[arg(long)]
    pub force: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum AccessModeArg {
    #[value(name = "ReadWriteOnce")]
    ReadWriteOnce,
    #[value(name = "ReadOnlyMany")]
    ReadOnlyMany,
    #[value(name = "ReadWriteMany")]
    ReadWriteMany,
}

impl From<AccessModeArg> for AccessMode {
    fn from(arg: AccessModeArg) -> Self {
        match arg {
            AccessModeArg::ReadWriteOnce => AccessMode::ReadWriteOnce,
            AccessModeArg::ReadOnlyMany => AccessMode::ReadOnlyMany,
            AccessModeArg::ReadWriteMany => AccessMode::ReadWriteMany,
        }
    }
}

/// Parse a byte count with an optional binary suffix (`Ki`, `Mi`, `Gi`,
/// `Ti`).
pub fn parse_quantity(s: &str) -> Result<u64, String> {
    let s = s.trim();
    let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let (digits, suffix) = s.split_at(split);
    if digits.is_empty() {
        return Err(format!("{s:?} does not start with a number"));
    }
    let value: u64 = digits.parse().map_err(|e| format!("{s:?}: {e}"))?;
    let multiplier: u64 = match suffix {
        "" => 1,
        "Ki" => 1 << 10,
        "Mi" => 1 << 20,
        "Gi" => 1 << 30,
        "Ti" => 1 << 40,
        other => return Err(format!("unsupported quantity suffix {other:?}")),
    };
    value
        .checked_mul(multiplier)
        .ok_or_else(|| format!("{s:?} overflows a byte count"))
}
