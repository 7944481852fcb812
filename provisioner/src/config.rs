//! Storage class manifest.
//!
//! Only the fields the provisioner reads are modelled; anything else in the
//! manifest (`apiVersion`, `provisioner`, ...) is ignored.
//!
//! ```yaml
//! apiVersion: storage.k8s.io/v1
//! kind: StorageClass
//! metadata:
//!   name: freenas-iscsi
//! reclaimPolicy: Delete
//! mountOptions: [noatime]
//! parameters:
//!   rootDatasetName: tank/k8s
//!   portalGroup: "1"
//!   initiatorGroup: "1"
//!   lunID: "0"
//!   targetPortal: 10.0.0.1:3260
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use libcsi::{ProvisionerConfig, ReclaimPolicy};
use serde::Deserialize;
use serde_yaml::Value;

#[derive(Debug, Default, Deserialize)]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageClass {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub parameters: HashMap<String, Value>,
    #[serde(default)]
    pub reclaim_policy: Option<ReclaimPolicy>,
    #[serde(default)]
    pub mount_options: Vec<String>,
}

impl StorageClass {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read storage class: {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse storage class: {}", path.display()))
    }

    /// Parameters as strings.  Unquoted YAML numbers and booleans are
    /// accepted and rendered back to text.
    pub fn string_parameters(&self) -> Result<HashMap<String, String>> {
        self.parameters
            .iter()
            .map(|(key, value)| {
                let text = match value {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    other => bail!("storage class parameter {key} is not a scalar: {other:?}"),
                };
                Ok((key.clone(), text))
            })
            .collect()
    }

    /// Storage class for the commands that create or measure volumes.
    /// Teardown runs without one.
    pub fn load_required(path: Option<&Path>) -> Result<Self> {
        let path = path
            .context("--storage-class (or STORAGE_CLASS_PATH) is required for this command")?;
        Self::load(path)
    }

    pub fn provisioner_config(&self) -> Result<ProvisionerConfig> {
        let params = self.string_parameters()?;
        ProvisionerConfig::from_parameters(&params).context("Invalid storage class parameters")
    }
}
