//! Carts Repository

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::domain::carts::models::{CartOwner, CartRecord};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    /// Stored cart data is unreadable or inconsistent.
    #[error("cart for {owner} is corrupted: {reason}")]
    Corrupted { owner: CartOwner, reason: String },

    /// The backing store failed.
    #[error("cart storage failed: {0}")]
    Storage(String),
}

/// Cart storage keyed by owner, held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryCartsRepository {
    carts: RwLock<FxHashMap<CartOwner, CartRecord>>,
}

impl InMemoryCartsRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CartsRepository for InMemoryCartsRepository {
    async fn load(&self, owner: CartOwner) -> Result<Option<CartRecord>, RepositoryError> {
        let carts = self.carts.read().await;

        let Some(record) = carts.get(&owner) else {
            return Ok(None);
        };

        if record.owner != owner {
            return Err(RepositoryError::Corrupted {
                owner,
                reason: format!("stored under {owner} but owned by {}", record.owner),
            });
        }

        Ok(Some(record.clone()))
    }

    async fn save(&self, record: CartRecord) -> Result<(), RepositoryError> {
        self.carts.write().await.insert(record.owner, record);

        Ok(())
    }

    async fn delete(&self, owner: CartOwner) -> Result<bool, RepositoryError> {
        Ok(self.carts.write().await.remove(&owner).is_some())
    }
}

#[automock]
#[async_trait]
pub trait CartsRepository: Send + Sync {
    /// Load the cart owned by `owner`, if one was saved.
    async fn load(&self, owner: CartOwner) -> Result<Option<CartRecord>, RepositoryError>;

    /// Insert or replace the owner's cart.
    async fn save(&self, record: CartRecord) -> Result<(), RepositoryError>;

    /// Delete the owner's cart, returning whether one existed.
    async fn delete(&self, owner: CartOwner) -> Result<bool, RepositoryError>;
}

#[cfg(test)]
mod tests {
    use jiff::{SignedDuration, Timestamp};
    use rusty_money::iso::EUR;
    use testresult::TestResult;
    use uuid::Uuid;

    use super::*;

    fn record(owner: CartOwner) -> TestResult<CartRecord> {
        Ok(CartRecord::new(
            owner,
            EUR,
            Timestamp::now(),
            SignedDuration::from_hours(1),
        )?)
    }

    #[tokio::test]
    async fn save_then_load_returns_record() -> TestResult {
        let repository = InMemoryCartsRepository::new();
        let owner = CartOwner::Session(Uuid::now_v7());
        let saved = record(owner)?;

        repository.save(saved.clone()).await?;

        assert_eq!(repository.load(owner).await?, Some(saved));

        Ok(())
    }

    #[tokio::test]
    async fn load_unknown_owner_returns_none() -> TestResult {
        let repository = InMemoryCartsRepository::new();

        assert_eq!(
            repository.load(CartOwner::User(Uuid::now_v7())).await?,
            None
        );

        Ok(())
    }

    #[tokio::test]
    async fn carts_are_isolated_per_owner() -> TestResult {
        let repository = InMemoryCartsRepository::new();
        let uuid = Uuid::now_v7();

        repository.save(record(CartOwner::Session(uuid))?).await?;

        assert!(repository.load(CartOwner::User(uuid)).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn delete_reports_whether_cart_existed() -> TestResult {
        let repository = InMemoryCartsRepository::new();
        let owner = CartOwner::Session(Uuid::now_v7());

        repository.save(record(owner)?).await?;

        assert!(repository.delete(owner).await?);
        assert!(!repository.delete(owner).await?);
        assert!(repository.load(owner).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn mismatched_owner_is_corrupted() -> TestResult {
        let repository = InMemoryCartsRepository::new();
        let owner = CartOwner::Session(Uuid::now_v7());
        let other = CartOwner::User(Uuid::now_v7());

        repository
            .carts
            .write()
            .await
            .insert(owner, record(other)?);

        let result = repository.load(owner).await;

        assert!(matches!(result, Err(RepositoryError::Corrupted { .. })));

        Ok(())
    }
}
