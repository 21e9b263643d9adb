//! Sales Domain Ports
//!
//! Port interfaces for the collaborators a run reads from: the item
//! master and the per-company category limit policy. Both are consumed
//! read-only; the engine never writes back through these seams.
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_sales::ports::ItemDirectory;
//! use std::sync::Arc;
//!
//! pub struct GenerationService {
//!     items: Arc<dyn ItemDirectory>,
//! }
//!
//! impl GenerationService {
//!     pub async fn profile(&self, code: &ItemCode) -> Result<ItemProfile, PortError> {
//!         self.items.profile(code).await
//!     }
//! }
//! ```

use async_trait::async_trait;
use std::collections::HashMap;

use core_kernel::{CompanyId, DomainPort, ItemCode, PortError};

use crate::classify::SaleCategory;
use crate::item::ItemProfile;
use crate::pack::VolumeLimit;

/// Per-company volume limits keyed by sale category
///
/// Categories missing from the table are treated as unlimited, matching
/// the zero-means-unlimited convention of the stored limits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryLimits {
    limits: HashMap<SaleCategory, VolumeLimit>,
}

impl CategoryLimits {
    /// Creates an empty table; every category reads as unlimited
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the limit for one category
    pub fn with_limit(mut self, category: SaleCategory, limit: VolumeLimit) -> Self {
        self.limits.insert(category, limit);
        self
    }

    /// The limit for a category, unlimited when not configured
    pub fn limit_for(&self, category: SaleCategory) -> VolumeLimit {
        self.limits
            .get(&category)
            .copied()
            .unwrap_or(VolumeLimit::UNLIMITED)
    }
}

/// Read-only access to the item master
#[async_trait]
pub trait ItemDirectory: DomainPort {
    /// Retrieves one item's profile
    ///
    /// # Errors
    ///
    /// Returns `PortError::NotFound` for an unknown code.
    async fn profile(&self, code: &ItemCode) -> Result<ItemProfile, PortError>;

    /// Retrieves profiles for several codes, failing on the first
    /// unknown code
    async fn profiles(&self, codes: &[ItemCode]) -> Result<Vec<ItemProfile>, PortError> {
        let mut out = Vec::with_capacity(codes.len());
        for code in codes {
            out.push(self.profile(code).await?);
        }
        Ok(out)
    }
}

/// Read-only access to the per-company category limit policy
#[async_trait]
pub trait LimitPolicy: DomainPort {
    /// The volume limit table for a company
    async fn limits(&self, company: &CompanyId) -> Result<CategoryLimits, PortError>;
}

/// In-memory adapters
///
/// Usable both as test doubles and as real adapters for callers whose
/// item master is loaded up front.
pub mod memory {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory implementation of [`ItemDirectory`]
    #[derive(Debug, Default)]
    pub struct InMemoryItemDirectory {
        items: Arc<RwLock<HashMap<ItemCode, ItemProfile>>>,
    }

    impl InMemoryItemDirectory {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates the directory
        pub async fn with_items(items: Vec<ItemProfile>) -> Self {
            let directory = Self::new();
            for item in items {
                directory.insert(item).await;
            }
            directory
        }

        /// Inserts or replaces a profile
        pub async fn insert(&self, item: ItemProfile) {
            self.items.write().await.insert(item.code.clone(), item);
        }
    }

    impl DomainPort for InMemoryItemDirectory {}

    #[async_trait]
    impl ItemDirectory for InMemoryItemDirectory {
        async fn profile(&self, code: &ItemCode) -> Result<ItemProfile, PortError> {
            self.items
                .read()
                .await
                .get(code)
                .cloned()
                .ok_or_else(|| PortError::not_found("Item", code))
        }
    }

    /// [`LimitPolicy`] that serves one fixed table to every company
    #[derive(Debug, Default)]
    pub struct FixedLimitPolicy {
        limits: CategoryLimits,
    }

    impl FixedLimitPolicy {
        pub fn new(limits: CategoryLimits) -> Self {
            Self { limits }
        }
    }

    impl DomainPort for FixedLimitPolicy {}

    #[async_trait]
    impl LimitPolicy for FixedLimitPolicy {
        async fn limits(&self, _company: &CompanyId) -> Result<CategoryLimits, PortError> {
            Ok(self.limits.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memory::{FixedLimitPolicy, InMemoryItemDirectory};
    use super::*;
    use crate::item::LiquorMode;
    use rust_decimal_macros::dec;

    fn item(code: &str) -> ItemProfile {
        ItemProfile::new(
            ItemCode::new(code).unwrap(),
            format!("{code} 750 ML"),
            LiquorMode::Foreign,
            dec!(540),
        )
    }

    #[tokio::test]
    async fn test_directory_lookup_and_not_found() {
        let directory = InMemoryItemDirectory::with_items(vec![item("A1")]).await;

        let found = directory.profile(&ItemCode::new("A1").unwrap()).await.unwrap();
        assert_eq!(found.code.as_str(), "A1");

        let missing = directory.profile(&ItemCode::new("ZZ").unwrap()).await;
        assert!(missing.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_profiles_fails_on_first_unknown_code() {
        let directory = InMemoryItemDirectory::with_items(vec![item("A1")]).await;
        let codes = vec![ItemCode::new("A1").unwrap(), ItemCode::new("ZZ").unwrap()];

        let result = directory.profiles(&codes).await;
        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_fixed_limits_ignore_company() {
        let limits = CategoryLimits::new()
            .with_limit(SaleCategory::Imfl, VolumeLimit::new(9000))
            .with_limit(SaleCategory::Beer, VolumeLimit::new(15_600));
        let policy = FixedLimitPolicy::new(limits);

        let a = policy.limits(&CompanyId::new("A").unwrap()).await.unwrap();
        let b = policy.limits(&CompanyId::new("B").unwrap()).await.unwrap();

        assert_eq!(a, b);
        assert_eq!(a.limit_for(SaleCategory::Imfl), VolumeLimit::new(9000));
    }

    #[test]
    fn test_unconfigured_category_reads_unlimited() {
        let limits = CategoryLimits::new().with_limit(SaleCategory::Beer, VolumeLimit::new(1000));
        assert!(limits.limit_for(SaleCategory::Wine).is_unlimited());
    }
}
