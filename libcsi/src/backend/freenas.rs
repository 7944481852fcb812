//! FreeNAS iSCSI storage backend for CSI.
//!
//! [`FreenasBackend`] implements [`CsiController`] on top of the FreeNAS v1.0
//! API.  A volume is a zvol under the configured root dataset, exported
//! through its own iSCSI target and extent:
//!
//! ```text
//! create:   zvol -> target -> target group -> extent -> target-to-extent
//! rollback:                 <- target      <- extent <-  (on failure)
//! delete:   extent -> target -> zvol
//! ```
//!
//! The backend keeps no state.  The ids needed for teardown are stored as
//! annotations on the returned [`Volume`] (see [`VolumeHandle`]), so a
//! backend built with [`FreenasBackend::for_teardown`] needs no storage
//! class parameters.

use std::sync::Arc;

use async_trait::async_trait;
use libfreenas::{
    Create, Dataset, DatasetName, Delete, Extent, ExtentId, FreenasError, Get,
    GlobalConfiguration, Pooled, Target, TargetGroup, TargetId, TargetToExtent, VolSize, ZVol,
    ZVolKey,
};
use tracing::{debug, info, instrument};

use crate::config::{ProvisionerConfig, ROOT_DATASET_NAME_PARAM};
use crate::controller::CsiController;
use crate::error::CsiError;
use crate::handle::VolumeHandle;
use crate::resource::{self, Operation, ResourceKind, RootPool};
use crate::saga::{Compensation, Saga};
use crate::types::{CreateVolumeRequest, IscsiSource, Volume};

/// Every FreeNAS capability the backend depends on.
pub trait FreenasApi:
    Get<(), GlobalConfiguration>
    + Get<DatasetName, Dataset>
    + Create<Pooled<ZVol>>
    + Delete<ZVolKey>
    + Create<Target>
    + Delete<TargetId>
    + Create<TargetGroup>
    + Create<Extent>
    + Delete<ExtentId>
    + Create<TargetToExtent>
{
}

impl<T> FreenasApi for T where
    T: Get<(), GlobalConfiguration>
        + Get<DatasetName, Dataset>
        + Create<Pooled<ZVol>>
        + Delete<ZVolKey>
        + Create<Target>
        + Delete<TargetId>
        + Create<TargetGroup>
        + Create<Extent>
        + Delete<ExtentId>
        + Create<TargetToExtent>
{
}

/// Concrete CSI backend backed by a FreeNAS appliance.
pub struct FreenasBackend<C> {
    client: Arc<C>,
    /// `None` when only teardown is needed.
    config: Option<ProvisionerConfig>,
}

impl<C: FreenasApi> FreenasBackend<C> {
    pub fn new(client: Arc<C>, config: ProvisionerConfig) -> Self {
        Self {
            client,
            config: Some(config),
        }
    }

    /// Backend that can only delete volumes.  Provisioning and capacity
    /// queries fail with [`CsiError::MissingParameter`] before any remote call.
    pub fn for_teardown(client: Arc<C>) -> Self {
        Self {
            client,
            config: None,
        }
    }

    fn config(&self) -> Result<&ProvisionerConfig, CsiError> {
        self.config
            .as_ref()
            .ok_or(CsiError::MissingParameter(ROOT_DATASET_NAME_PARAM))
    }

    async fn iscsi_basename(&self) -> Result<String, CsiError> {
        let global = <C as Get<(), GlobalConfiguration>>::get(&self.client, &())
            .await
            .map_err(|e| CsiError::remote(Operation::Get, ResourceKind::GlobalConfiguration, e))?;
        global
            .iscsi_basename
            .ok_or_else(|| CsiError::missing_field(ResourceKind::GlobalConfiguration, "iscsi_basename"))
    }

    async fn root_dataset(&self) -> Result<Dataset, CsiError> {
        let name = DatasetName(self.config()?.root_dataset_name.clone());
        <C as Get<DatasetName, Dataset>>::get(&self.client, &name)
            .await
            .map_err(|e| CsiError::remote(Operation::Get, ResourceKind::RootDataset, e))
    }
}

fn root_pool(dataset: Dataset) -> Result<RootPool, CsiError> {
    Ok(RootPool {
        dataset: dataset
            .name
            .ok_or_else(|| CsiError::missing_field(ResourceKind::RootDataset, "name"))?,
        pool: dataset
            .pool
            .ok_or_else(|| CsiError::missing_field(ResourceKind::RootDataset, "pool"))?,
    })
}

fn failed(op: Operation, resource: ResourceKind) -> impl FnOnce(FreenasError) -> CsiError {
    move |e| CsiError::remote(op, resource, e)
}

async fn delete_zvol<C: FreenasApi>(client: &C, key: ZVolKey) -> Result<(), CsiError> {
    <C as Delete<ZVolKey>>::delete(client, &key)
        .await
        .map_err(failed(Operation::Delete, ResourceKind::ZVol))?;
    info!(pool = %key.pool, zvol = %key.name, "deleted zvol");
    Ok(())
}

async fn delete_target<C: FreenasApi>(client: &C, id: TargetId) -> Result<(), CsiError> {
    <C as Delete<TargetId>>::delete(client, &id)
        .await
        .map_err(failed(Operation::Delete, ResourceKind::Target))?;
    info!(target_id = %id, "deleted iscsi target");
    Ok(())
}

async fn delete_extent<C: FreenasApi>(client: &C, id: ExtentId) -> Result<(), CsiError> {
    <C as Delete<ExtentId>>::delete(client, &id)
        .await
        .map_err(failed(Operation::Delete, ResourceKind::Extent))?;
    info!(extent_id = %id, "deleted iscsi extent");
    Ok(())
}

#[async_trait]
impl<C: FreenasApi> CsiController for FreenasBackend<C> {
    #[instrument(skip(self, req), fields(name = %req.name, namespace = %req.namespace))]
    async fn create_volume(&self, req: CreateVolumeRequest) -> Result<Volume, CsiError> {
        let config = self.config()?;
        let basename = self.iscsi_basename().await?;
        let root = root_pool(self.root_dataset().await?)?;

        let client: &C = &self.client;
        let zvol_name = root.zvol_name(&req.name);
        debug!(dataset = %root.dataset, pool = %root.pool, zvol = %zvol_name, "provisioning");

        let mut saga = Saga::new(format!("provision {}", req.name));

        let zvol = Pooled::new(
            root.pool.clone(),
            ZVol {
                name: Some(zvol_name.clone()),
                volsize: Some(VolSize::Text(resource::zvol_size(req.capacity_bytes))),
                sparse: Some(config.thin_provisioning),
                ..Default::default()
            },
        );
        let zvol_key = saga
            .step(
                ResourceKind::ZVol,
                async {
                    let created = <C as Create<Pooled<ZVol>>>::create(client, &zvol)
                        .await
                        .map_err(failed(Operation::Create, ResourceKind::ZVol))?;
                    let key = ZVolKey {
                        pool: created.pool,
                        name: created.inner.name.unwrap_or_else(|| zvol_name.clone()),
                    };
                    info!(pool = %key.pool, zvol = %key.name, "created zvol");
                    Ok(key)
                },
                |key| {
                    Some(Compensation::new(
                        format!("{}/{}", key.pool, key.name),
                        delete_zvol(client, key.clone()),
                    ))
                },
            )
            .await?;

        let target = Target {
            iscsi_target_name: Some(req.name.clone()),
            ..Default::default()
        };
        let target_id = saga
            .step(
                ResourceKind::Target,
                async {
                    let created = <C as Create<Target>>::create(client, &target)
                        .await
                        .map_err(failed(Operation::Create, ResourceKind::Target))?;
                    let id = created
                        .id
                        .map(TargetId)
                        .ok_or_else(|| CsiError::missing_field(ResourceKind::Target, "id"))?;
                    info!(target_id = %id, "created iscsi target");
                    Ok(id)
                },
                |id| Some(Compensation::new(id.to_string(), delete_target(client, *id))),
            )
            .await?;

        // Removed together with the target.
        let group = TargetGroup {
            iscsi_target: Some(target_id.0),
            iscsi_target_portalgroup: Some(config.portal_group),
            iscsi_target_initiatorgroup: Some(config.initiator_group),
            ..Default::default()
        };
        saga.step(
            ResourceKind::TargetGroup,
            async {
                <C as Create<TargetGroup>>::create(client, &group)
                    .await
                    .map_err(failed(Operation::Create, ResourceKind::TargetGroup))?;
                info!(target_id = %target_id, "created iscsi target group");
                Ok(())
            },
            |_| None,
        )
        .await?;

        let extent = Extent {
            iscsi_target_extent_type: Some(config.extent_type.clone()),
            iscsi_target_extent_name: Some(req.name.clone()),
            iscsi_target_extent_disk: Some(resource::extent_disk(&zvol_key.pool, &zvol_key.name)),
            ..Default::default()
        };
        let extent_id = saga
            .step(
                ResourceKind::Extent,
                async {
                    let created = <C as Create<Extent>>::create(client, &extent)
                        .await
                        .map_err(failed(Operation::Create, ResourceKind::Extent))?;
                    let id = created
                        .id
                        .map(ExtentId)
                        .ok_or_else(|| CsiError::missing_field(ResourceKind::Extent, "id"))?;
                    info!(extent_id = %id, "created iscsi extent");
                    Ok(id)
                },
                |id| Some(Compensation::new(id.to_string(), delete_extent(client, *id))),
            )
            .await?;

        // Removed together with the target.
        let mapping = TargetToExtent {
            iscsi_target: Some(target_id.0),
            iscsi_extent: Some(extent_id.0),
            iscsi_lunid: Some(config.lun_id),
            ..Default::default()
        };
        saga.step(
            ResourceKind::TargetToExtent,
            async {
                <C as Create<TargetToExtent>>::create(client, &mapping)
                    .await
                    .map_err(failed(Operation::Create, ResourceKind::TargetToExtent))?;
                info!(lun = config.lun_id, "created iscsi target to extent");
                Ok(())
            },
            |_| None,
        )
        .await?;

        saga.commit();

        let handle = VolumeHandle {
            extent_id,
            target_id,
            pool: zvol_key.pool,
            zvol_name: zvol_key.name,
        };
        info!(iqn = %resource::iqn(&basename, &req.name), "volume provisioned");

        Ok(Volume {
            annotations: handle.encode(),
            iscsi: IscsiSource {
                target_portal: config.target_portal.clone(),
                iqn: resource::iqn(&basename, &req.name),
                lun: config.lun_id,
                iscsi_interface: config.iscsi_interface.clone(),
                fs_type: config.fs_type.clone(),
                initiator_name: config.initiator_name.clone(),
            },
            name: req.name,
            namespace: req.namespace,
            capacity_bytes: req.capacity_bytes,
            access_modes: req.access_modes,
            reclaim_policy: req.reclaim_policy,
            storage_class_name: req.storage_class_name,
            mount_options: req.mount_options,
        })
    }

    #[instrument(skip(self, volume), fields(name = %volume.name))]
    async fn delete_volume(&self, volume: &Volume) -> Result<(), CsiError> {
        let handle = VolumeHandle::decode(&volume.annotations)?;
        let client: &C = &self.client;

        delete_extent(client, handle.extent_id).await?;
        // Also drops the target group and the target-to-extent mapping.
        delete_target(client, handle.target_id).await?;
        delete_zvol(client, handle.zvol_key()).await?;

        info!(disk = %handle.extent_disk(), "volume deleted");
        Ok(())
    }

    async fn get_capacity(&self) -> Result<u64, CsiError> {
        let avail = self
            .root_dataset()
            .await?
            .avail
            .ok_or_else(|| CsiError::missing_field(ResourceKind::RootDataset, "avail"))?;
        Ok(u64::try_from(avail).unwrap_or(0))
    }
}
