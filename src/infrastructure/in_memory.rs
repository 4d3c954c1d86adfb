use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::sync::RwLock;

use crate::domain::payment::{Payment, PaymentId, Reminder};
use crate::domain::ports::{PaymentStore, ReminderStore, ShopStore, UserStore};
use crate::domain::shop::{Shop, ShopId};
use crate::domain::user::{User, UserId};
use crate::error::Result;

/// Thread-safe in-memory shop store.
///
/// Ids are assigned sequentially, so iterating the `BTreeMap` by key yields
/// creation order, which is what listings must preserve.
#[derive(Default, Clone)]
pub struct InMemoryShopStore {
    shops: Arc<RwLock<BTreeMap<u32, Shop>>>,
    next_id: Arc<AtomicU32>,
}

impl InMemoryShopStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ShopStore for InMemoryShopStore {
    async fn store(&self, shop: Shop) -> Result<()> {
        let mut shops = self.shops.write().await;
        shops.insert(shop.id.0, shop);
        Ok(())
    }

    async fn get(&self, id: ShopId) -> Result<Option<Shop>> {
        let shops = self.shops.read().await;
        Ok(shops.get(&id.0).cloned())
    }

    async fn all(&self) -> Result<Vec<Shop>> {
        let shops = self.shops.read().await;
        Ok(shops.values().cloned().collect())
    }

    async fn by_owner(&self, owner_id: UserId) -> Result<Option<Shop>> {
        let shops = self.shops.read().await;
        Ok(shops.values().find(|s| s.owner_id == owner_id).cloned())
    }

    async fn remove(&self, id: ShopId) -> Result<Option<Shop>> {
        let mut shops = self.shops.write().await;
        Ok(shops.remove(&id.0))
    }

    async fn next_id(&self) -> Result<ShopId> {
        Ok(ShopId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1))
    }
}

/// Thread-safe in-memory payment store.
#[derive(Default, Clone)]
pub struct InMemoryPaymentStore {
    payments: Arc<RwLock<BTreeMap<u32, Payment>>>,
    next_id: Arc<AtomicU32>,
}

impl InMemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn store(&self, payment: Payment) -> Result<()> {
        let mut payments = self.payments.write().await;
        payments.insert(payment.id.0, payment);
        Ok(())
    }

    async fn get(&self, id: PaymentId) -> Result<Option<Payment>> {
        let payments = self.payments.read().await;
        Ok(payments.get(&id.0).cloned())
    }

    async fn by_shop(&self, shop_id: ShopId) -> Result<Vec<Payment>> {
        let payments = self.payments.read().await;
        Ok(payments
            .values()
            .filter(|p| p.shop_id == shop_id)
            .cloned()
            .collect())
    }

    async fn remove_by_shop(&self, shop_id: ShopId) -> Result<()> {
        let mut payments = self.payments.write().await;
        payments.retain(|_, p| p.shop_id != shop_id);
        Ok(())
    }

    async fn next_id(&self) -> Result<PaymentId> {
        Ok(PaymentId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1))
    }
}

/// Thread-safe in-memory user store.
#[derive(Default, Clone)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<BTreeMap<u32, User>>>,
    next_id: Arc<AtomicU32>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn store(&self, user: User) -> Result<()> {
        let mut users = self.users.write().await;
        users.insert(user.id.0, user);
        Ok(())
    }

    async fn get(&self, id: UserId) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id.0).cloned())
    }

    async fn by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn all(&self) -> Result<Vec<User>> {
        let users = self.users.read().await;
        Ok(users.values().cloned().collect())
    }

    async fn next_id(&self) -> Result<UserId> {
        Ok(UserId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1))
    }
}

/// Thread-safe in-memory reminder log.
#[derive(Default, Clone)]
pub struct InMemoryReminderStore {
    reminders: Arc<RwLock<BTreeMap<u32, Reminder>>>,
    next_id: Arc<AtomicU32>,
}

impl InMemoryReminderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReminderStore for InMemoryReminderStore {
    async fn store(&self, reminder: Reminder) -> Result<()> {
        let mut reminders = self.reminders.write().await;
        reminders.insert(reminder.id, reminder);
        Ok(())
    }

    async fn by_shop(&self, shop_id: ShopId) -> Result<Vec<Reminder>> {
        let reminders = self.reminders.read().await;
        Ok(reminders
            .values()
            .filter(|r| r.shop_id == shop_id)
            .cloned()
            .collect())
    }

    async fn remove_by_shop(&self, shop_id: ShopId) -> Result<()> {
        let mut reminders = self.reminders.write().await;
        reminders.retain(|_, r| r.shop_id != shop_id);
        Ok(())
    }

    async fn next_id(&self) -> Result<u32> {
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::forms::ShopForm;
    use crate::domain::payment::Amount;
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;

    fn shop(id: u32, owner: u32) -> Shop {
        let form = ShopForm {
            name: format!("Shop {id}"),
            industry: "Apparel".to_string(),
            shop_number: "A-1".to_string(),
            city: "Nairobi".to_string(),
            mall: "The Hub".to_string(),
            whatsapp: "+254700000001".to_string(),
            ..Default::default()
        };
        Shop::from_form(
            ShopId(id),
            UserId(owner),
            "Owner".to_string(),
            form,
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_shop_store_round_trip() {
        let store = InMemoryShopStore::new();
        let shop = shop(1, 7);
        store.store(shop.clone()).await.unwrap();

        assert_eq!(store.get(ShopId(1)).await.unwrap(), Some(shop.clone()));
        assert_eq!(store.by_owner(UserId(7)).await.unwrap(), Some(shop));
        assert!(store.get(ShopId(2)).await.unwrap().is_none());
        assert!(store.by_owner(UserId(8)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_shop_listing_is_creation_ordered() {
        let store = InMemoryShopStore::new();
        for owner in [3u32, 1, 2] {
            let id = store.next_id().await.unwrap();
            store.store(shop(id.0, owner)).await.unwrap();
        }
        let ids: Vec<u32> = store.all().await.unwrap().iter().map(|s| s.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_next_id_is_sequential() {
        let store = InMemoryShopStore::new();
        assert_eq!(store.next_id().await.unwrap(), ShopId(1));
        assert_eq!(store.next_id().await.unwrap(), ShopId(2));
    }

    #[tokio::test]
    async fn test_remove_returns_the_record() {
        let store = InMemoryShopStore::new();
        store.store(shop(1, 7)).await.unwrap();
        assert!(store.remove(ShopId(1)).await.unwrap().is_some());
        assert!(store.remove(ShopId(1)).await.unwrap().is_none());
        assert!(store.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_payments_filtered_by_shop() {
        let store = InMemoryPaymentStore::new();
        let due = NaiveDate::from_ymd_opt(2025, 5, 15).unwrap();
        for (id, shop_id) in [(1u32, 1u32), (2, 2), (3, 1)] {
            store
                .store(Payment::open(
                    PaymentId(id),
                    ShopId(shop_id),
                    Amount::new(dec!(5000)).unwrap(),
                    "KES".to_string(),
                    due,
                    None,
                ))
                .await
                .unwrap();
        }
        let mine = store.by_shop(ShopId(1)).await.unwrap();
        let ids: Vec<u32> = mine.iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![1, 3]);

        store.remove_by_shop(ShopId(1)).await.unwrap();
        assert!(store.by_shop(ShopId(1)).await.unwrap().is_empty());
        assert_eq!(store.by_shop(ShopId(2)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_user_email_lookup_is_case_insensitive() {
        let store = InMemoryUserStore::new();
        let user = User::new(
            UserId(1),
            "Jane Smith".to_string(),
            "jane@example.com".to_string(),
            crate::domain::user::Role::Customer,
            Utc::now(),
        );
        store.store(user.clone()).await.unwrap();
        assert_eq!(store.by_email("Jane@Example.COM").await.unwrap(), Some(user));
        assert!(store.by_email("other@example.com").await.unwrap().is_none());
    }
}
