//! Pending quantity store
//!
//! The quantities a user lines up before triggering a generation run
//! live in an explicit keyed store rather than ambient session state.
//! Entries are keyed by (company, user) so two counters at the same
//! shop never see each other's carts.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use core_kernel::{CompanyId, DomainPort, ItemCode, PortError, UserId};

/// Keyed store of not-yet-generated quantities.
#[async_trait]
pub trait PendingQuantityStore: DomainPort {
    /// Sets an item's pending quantity, replacing any earlier value.
    async fn put(
        &self,
        company: &CompanyId,
        user: &UserId,
        item: &ItemCode,
        qty: u32,
    ) -> Result<(), PortError>;

    /// Drops one item from the pending set.
    async fn remove(
        &self,
        company: &CompanyId,
        user: &UserId,
        item: &ItemCode,
    ) -> Result<(), PortError>;

    /// The user's full pending set, ordered by item code.
    async fn pending(
        &self,
        company: &CompanyId,
        user: &UserId,
    ) -> Result<BTreeMap<ItemCode, u32>, PortError>;

    /// Empties the user's pending set.
    async fn clear(&self, company: &CompanyId, user: &UserId) -> Result<(), PortError>;
}

/// In-memory pending store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPendingStore {
    entries: Arc<RwLock<HashMap<(CompanyId, UserId), BTreeMap<ItemCode, u32>>>>,
}

impl InMemoryPendingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DomainPort for InMemoryPendingStore {}

#[async_trait]
impl PendingQuantityStore for InMemoryPendingStore {
    async fn put(
        &self,
        company: &CompanyId,
        user: &UserId,
        item: &ItemCode,
        qty: u32,
    ) -> Result<(), PortError> {
        let mut entries = self.entries.write().await;
        entries
            .entry((company.clone(), user.clone()))
            .or_default()
            .insert(item.clone(), qty);
        Ok(())
    }

    async fn remove(
        &self,
        company: &CompanyId,
        user: &UserId,
        item: &ItemCode,
    ) -> Result<(), PortError> {
        let mut entries = self.entries.write().await;
        if let Some(pending) = entries.get_mut(&(company.clone(), user.clone())) {
            pending.remove(item);
        }
        Ok(())
    }

    async fn pending(
        &self,
        company: &CompanyId,
        user: &UserId,
    ) -> Result<BTreeMap<ItemCode, u32>, PortError> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(&(company.clone(), user.clone()))
            .cloned()
            .unwrap_or_default())
    }

    async fn clear(&self, company: &CompanyId, user: &UserId) -> Result<(), PortError> {
        let mut entries = self.entries.write().await;
        entries.remove(&(company.clone(), user.clone()));
        Ok(())
    }
}
