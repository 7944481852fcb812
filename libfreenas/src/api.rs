//! Capability traits implemented per remote entity type.
//!
//! Each trait covers a single request/response operation.  A type that
//! implements `Create<Target>` knows how to create targets and nothing else,
//! which keeps consumers generic over exactly the operations they need.

use async_trait::async_trait;

use crate::error::FreenasError;

/// Create an entity and return it as populated by the server (assigned id and
/// any server-filled fields).
#[async_trait]
pub trait Create<T>: Send + Sync
where
    T: Send + Sync,
{
    async fn create(&self, entity: &T) -> Result<T, FreenasError>;
}

/// Delete the entity addressed by `key`.
#[async_trait]
pub trait Delete<K>: Send + Sync
where
    K: Send + Sync,
{
    async fn delete(&self, key: &K) -> Result<(), FreenasError>;
}

/// Look up the entity addressed by `key`.
#[async_trait]
pub trait Get<K, T>: Send + Sync
where
    K: Send + Sync,
    T: Send,
{
    async fn get(&self, key: &K) -> Result<T, FreenasError>;
}
