//! In-memory FreeNAS double that records every call in order.

use std::sync::Mutex;

use async_trait::async_trait;
use libfreenas::{
    Create, Dataset, DatasetName, Delete, Extent, ExtentId, FreenasError, Get,
    GlobalConfiguration, Pooled, StatusCode, Target, TargetGroup, TargetId, TargetToExtent, ZVol,
    ZVolKey,
};

use crate::resource::{Operation, ResourceKind};

pub(crate) const BASENAME: &str = "iqn.2005-10.org.freenas.ctl";
pub(crate) const ROOT_DATASET: &str = "tank/data";
pub(crate) const POOL: &str = "tank";
pub(crate) const AVAILABLE: i64 = 5 * 1024 * 1024 * 1024;
pub(crate) const TARGET_ID: i64 = 7;
pub(crate) const EXTENT_ID: i64 = 11;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    GetGlobalConfiguration,
    GetDataset(String),
    CreateZVol { pool: String, zvol: ZVol },
    DeleteZVol(ZVolKey),
    CreateTarget(Target),
    DeleteTarget(TargetId),
    CreateTargetGroup(TargetGroup),
    CreateExtent(Extent),
    DeleteExtent(ExtentId),
    CreateTargetToExtent(TargetToExtent),
}

impl Call {
    fn is_mutation(&self) -> bool {
        !matches!(self, Self::GetGlobalConfiguration | Self::GetDataset(_))
    }
}

#[derive(Default)]
pub(crate) struct MockFreenas {
    calls: Mutex<Vec<Call>>,
    failing: Vec<(Operation, ResourceKind)>,
    /// Answer target creation without an id.
    omit_target_id: bool,
}

impl MockFreenas {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Every listed operation answers with a 500.
    pub(crate) fn failing(ops: &[(Operation, ResourceKind)]) -> Self {
        Self {
            failing: ops.to_vec(),
            ..Self::default()
        }
    }

    /// Target creation succeeds but the response carries no id.
    pub(crate) fn without_target_id() -> Self {
        Self {
            omit_target_id: true,
            ..Self::default()
        }
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls that change remote state, in order.
    pub(crate) fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(Call::is_mutation)
            .collect()
    }

    fn record(
        &self,
        call: Call,
        op: Operation,
        resource: ResourceKind,
    ) -> Result<(), FreenasError> {
        self.calls.lock().unwrap().push(call);
        if self.failing.contains(&(op, resource)) {
            Err(FreenasError::unexpected_status(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("{op} {resource} refused"),
            ))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Get<(), GlobalConfiguration> for MockFreenas {
    async fn get(&self, _key: &()) -> Result<GlobalConfiguration, FreenasError> {
        self.record(
            Call::GetGlobalConfiguration,
            Operation::Get,
            ResourceKind::GlobalConfiguration,
        )?;
        Ok(GlobalConfiguration {
            iscsi_basename: Some(BASENAME.into()),
            id: Some(1),
            ..Default::default()
        })
    }
}

#[async_trait]
impl Get<DatasetName, Dataset> for MockFreenas {
    async fn get(&self, name: &DatasetName) -> Result<Dataset, FreenasError> {
        self.record(
            Call::GetDataset(name.0.clone()),
            Operation::Get,
            ResourceKind::RootDataset,
        )?;
        Ok(Dataset {
            name: Some(name.0.clone()),
            pool: Some(POOL.into()),
            avail: Some(AVAILABLE),
            ..Default::default()
        })
    }
}

#[async_trait]
impl Create<Pooled<ZVol>> for MockFreenas {
    async fn create(&self, zvol: &Pooled<ZVol>) -> Result<Pooled<ZVol>, FreenasError> {
        self.record(
            Call::CreateZVol {
                pool: zvol.pool.clone(),
                zvol: zvol.inner.clone(),
            },
            Operation::Create,
            ResourceKind::ZVol,
        )?;
        Ok(zvol.clone())
    }
}

#[async_trait]
impl Delete<ZVolKey> for MockFreenas {
    async fn delete(&self, key: &ZVolKey) -> Result<(), FreenasError> {
        self.record(
            Call::DeleteZVol(key.clone()),
            Operation::Delete,
            ResourceKind::ZVol,
        )
    }
}

#[async_trait]
impl Create<Target> for MockFreenas {
    async fn create(&self, target: &Target) -> Result<Target, FreenasError> {
        self.record(
            Call::CreateTarget(target.clone()),
            Operation::Create,
            ResourceKind::Target,
        )?;
        Ok(Target {
            id: (!self.omit_target_id).then_some(TARGET_ID),
            ..target.clone()
        })
    }
}

#[async_trait]
impl Delete<TargetId> for MockFreenas {
    async fn delete(&self, id: &TargetId) -> Result<(), FreenasError> {
        self.record(
            Call::DeleteTarget(*id),
            Operation::Delete,
            ResourceKind::Target,
        )
    }
}

#[async_trait]
impl Create<TargetGroup> for MockFreenas {
    async fn create(&self, group: &TargetGroup) -> Result<TargetGroup, FreenasError> {
        self.record(
            Call::CreateTargetGroup(group.clone()),
            Operation::Create,
            ResourceKind::TargetGroup,
        )?;
        Ok(TargetGroup {
            id: Some(3),
            ..group.clone()
        })
    }
}

#[async_trait]
impl Create<Extent> for MockFreenas {
    async fn create(&self, extent: &Extent) -> Result<Extent, FreenasError> {
        self.record(
            Call::CreateExtent(extent.clone()),
            Operation::Create,
            ResourceKind::Extent,
        )?;
        Ok(Extent {
            id: Some(EXTENT_ID),
            ..extent.clone()
        })
    }
}

#[async_trait]
impl Delete<ExtentId> for MockFreenas {
    async fn delete(&self, id: &ExtentId) -> Result<(), FreenasError> {
        self.record(
            Call::DeleteExtent(*id),
            Operation::Delete,
            ResourceKind::Extent,
        )
    }
}

#[async_trait]
impl Create<TargetToExtent> for MockFreenas {
    async fn create(&self, mapping: &TargetToExtent) -> Result<TargetToExtent, FreenasError> {
        self.record(
            Call::CreateTargetToExtent(mapping.clone()),
            Operation::Create,
            ResourceKind::TargetToExtent,
        )?;
        Ok(TargetToExtent {
            id: Some(5),
            ..mapping.clone()
        })
    }
}
