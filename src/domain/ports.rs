use async_trait::async_trait;

use crate::domain::payment::{Payment, PaymentId, Reminder};
use crate::domain::shop::{Shop, ShopId};
use crate::domain::user::{User, UserId};
use crate::error::Result;

pub type ShopStoreBox = Box<dyn ShopStore>;
pub type PaymentStoreBox = Box<dyn PaymentStore>;
pub type UserStoreBox = Box<dyn UserStore>;
pub type ReminderStoreBox = Box<dyn ReminderStore>;

#[async_trait]
pub trait ShopStore: Send + Sync {
    async fn store(&self, shop: Shop) -> Result<()>;
    async fn get(&self, id: ShopId) -> Result<Option<Shop>>;
    /// All shops in creation order.
    async fn all(&self) -> Result<Vec<Shop>>;
    async fn by_owner(&self, owner_id: UserId) -> Result<Option<Shop>>;
    async fn remove(&self, id: ShopId) -> Result<Option<Shop>>;
    async fn next_id(&self) -> Result<ShopId>;
}

#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn store(&self, payment: Payment) -> Result<()>;
    async fn get(&self, id: PaymentId) -> Result<Option<Payment>>;
    /// A shop's payments in creation order.
    async fn by_shop(&self, shop_id: ShopId) -> Result<Vec<Payment>>;
    async fn remove_by_shop(&self, shop_id: ShopId) -> Result<()>;
    async fn next_id(&self) -> Result<PaymentId>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn store(&self, user: User) -> Result<()>;
    async fn get(&self, id: UserId) -> Result<Option<User>>;
    async fn by_email(&self, email: &str) -> Result<Option<User>>;
    /// All users in creation order.
    async fn all(&self) -> Result<Vec<User>>;
    async fn next_id(&self) -> Result<UserId>;
}

#[async_trait]
pub trait ReminderStore: Send + Sync {
    async fn store(&self, reminder: Reminder) -> Result<()>;
    /// A shop's reminders in creation order.
    async fn by_shop(&self, shop_id: ShopId) -> Result<Vec<Reminder>>;
    async fn remove_by_shop(&self, shop_id: ShopId) -> Result<()>;
    async fn next_id(&self) -> Result<u32>;
}
