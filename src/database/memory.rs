use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::models::{Holding, HoldingChanges, NewHolding, NewUser, User};
use crate::database::repository::{HoldingRepository, StoreError, UserRepository};

/// In-process store selected with `DATABASE_URL=memory://`.
///
/// Same contract as the Postgres store: unique emails, owner-scoped holdings
/// listed in insertion order. Contents are lost on shutdown.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    holdings: RwLock<Vec<Holding>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == new_user.email) {
            return Err(StoreError::DuplicateEmail);
        }

        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: Utc::now(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }
}

#[async_trait]
impl HoldingRepository for MemoryStore {
    async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<Holding>, StoreError> {
        let holdings = self.holdings.read().await;
        Ok(holdings
            .iter()
            .filter(|h| h.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn find_for_owner(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Holding>, StoreError> {
        let holdings = self.holdings.read().await;
        Ok(holdings
            .iter()
            .find(|h| h.id == id && h.owner_id == owner_id)
            .cloned())
    }

    async fn create(&self, owner_id: Uuid, new_holding: NewHolding) -> Result<Holding, StoreError> {
        let now = Utc::now();
        let holding = Holding {
            id: Uuid::new_v4(),
            name: new_holding.name,
            ticker: new_holding.ticker,
            quantity: new_holding.quantity,
            buy_price: new_holding.buy_price,
            owner_id,
            created_at: now,
            updated_at: now,
        };
        self.holdings.write().await.push(holding.clone());
        Ok(holding)
    }

    async fn update_for_owner(
        &self,
        owner_id: Uuid,
        id: Uuid,
        changes: HoldingChanges,
    ) -> Result<Option<Holding>, StoreError> {
        let mut holdings = self.holdings.write().await;
        let Some(holding) = holdings
            .iter_mut()
            .find(|h| h.id == id && h.owner_id == owner_id)
        else {
            return Ok(None);
        };

        changes.apply_to(holding);
        holding.updated_at = Utc::now();
        Ok(Some(holding.clone()))
    }

    async fn delete_for_owner(&self, owner_id: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let mut holdings = self.holdings.write().await;
        let before = holdings.len();
        holdings.retain(|h| !(h.id == id && h.owner_id == owner_id));
        Ok(holdings.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            username: "alice".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
        }
    }

    fn new_holding(ticker: &str) -> NewHolding {
        NewHolding {
            name: format!("{} Inc", ticker),
            ticker: ticker.to_string(),
            quantity: 2.0,
            buy_price: 10.0,
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = MemoryStore::new();
        store.create_user(new_user("a@example.com")).await.unwrap();

        let err = store.create_user(new_user("a@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
    }

    #[tokio::test]
    async fn users_are_found_by_email_and_id() {
        let store = MemoryStore::new();
        let user = store.create_user(new_user("a@example.com")).await.unwrap();

        let by_email = store.find_by_email("a@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, user.id);
        assert!(store.find_by_id(user.id).await.unwrap().is_some());
        assert!(store.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn holdings_are_listed_per_owner_in_insertion_order() {
        let store = MemoryStore::new();
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());

        store.create(alice, new_holding("AAPL")).await.unwrap();
        store.create(bob, new_holding("TSLA")).await.unwrap();
        store.create(alice, new_holding("MSFT")).await.unwrap();

        let tickers: Vec<String> = store
            .list_for_owner(alice)
            .await
            .unwrap()
            .into_iter()
            .map(|h| h.ticker)
            .collect();
        assert_eq!(tickers, vec!["AAPL", "MSFT"]);
    }

    #[tokio::test]
    async fn other_owners_cannot_update_or_delete() {
        let store = MemoryStore::new();
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let holding = store.create(alice, new_holding("AAPL")).await.unwrap();

        let changes = HoldingChanges {
            quantity: Some(99.0),
            ..Default::default()
        };
        assert!(store
            .update_for_owner(bob, holding.id, changes)
            .await
            .unwrap()
            .is_none());
        assert!(store.find_for_owner(bob, holding.id).await.unwrap().is_none());
        assert!(!store.delete_for_owner(bob, holding.id).await.unwrap());
        assert_eq!(
            store.find_for_owner(alice, holding.id).await.unwrap(),
            Some(holding.clone())
        );

        let still_there = store.list_for_owner(alice).await.unwrap();
        assert_eq!(still_there, vec![holding]);
    }

    #[tokio::test]
    async fn partial_update_keeps_untouched_fields() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let holding = store.create(owner, new_holding("AAPL")).await.unwrap();

        let changes = HoldingChanges {
            buy_price: Some(12.5),
            ..Default::default()
        };
        let updated = store
            .update_for_owner(owner, holding.id, changes)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.ticker, "AAPL");
        assert_eq!(updated.quantity, 2.0);
        assert_eq!(updated.buy_price, 12.5);
        assert_eq!(updated.owner_id, owner);
    }
}
