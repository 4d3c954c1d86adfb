use chrono::{Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::filter::{PaymentQuery, ShopQuery, UserQuery};
use crate::domain::forms::{ShopForm, SignUpForm};
use crate::domain::payment::{
    Amount, Payment, PaymentId, PaymentMethod, PaymentState, PaymentStatus, PaymentSummary,
    Reminder, ReminderStatus,
};
use crate::domain::ports::{PaymentStoreBox, ReminderStoreBox, ShopStoreBox, UserStoreBox};
use crate::domain::shop::{Shop, ShopId, ShopStatus};
use crate::domain::user::{Role, User, UserId};
use crate::error::{MarketError, Result};
use crate::infrastructure::in_memory::{
    InMemoryPaymentStore, InMemoryReminderStore, InMemoryShopStore, InMemoryUserStore,
};

/// Platform-wide billing configuration, set from the admin settings page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingSettings {
    pub monthly_fee: Decimal,
    pub currency: String,
    /// Days between approval and the first due date.
    pub payment_window_days: u32,
}

impl Default for BillingSettings {
    fn default() -> Self {
        Self {
            monthly_fee: dec!(5000),
            currency: "KES".to_string(),
            payment_window_days: 30,
        }
    }
}

/// Outcome of a settlement attempt. `successor` is `None` when the attempt
/// was a no-op replay against an already-paid record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settlement {
    pub payment: Payment,
    pub successor: Option<Payment>,
}

/// One row of the admin billing table: shop joined with its payment state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillingRow {
    pub shop_id: ShopId,
    pub shop_name: String,
    pub owner_name: String,
    pub state: PaymentState,
    pub amount: Decimal,
    pub currency: String,
    pub last_payment: Option<NaiveDate>,
    pub next_due: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminDashboard {
    pub total_shops: usize,
    pub active_shops: usize,
    pub pending_approvals: usize,
    pub inactive_shops: usize,
    pub overdue_shops: usize,
    pub total_users: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnerDashboard {
    pub shop: Shop,
    pub current_payment: Option<Payment>,
    pub overdue: bool,
    pub summary: PaymentSummary,
}

/// The marketplace back office.
///
/// Owns the storage ports and applies every state change sequentially, so
/// invariants (one open cycle per shop, idempotent settlement) are enforced
/// in one place instead of per view.
pub struct MarketplaceEngine {
    shops: ShopStoreBox,
    payments: PaymentStoreBox,
    users: UserStoreBox,
    reminders: ReminderStoreBox,
    settings: BillingSettings,
}

impl MarketplaceEngine {
    pub fn new(
        shops: ShopStoreBox,
        payments: PaymentStoreBox,
        users: UserStoreBox,
        reminders: ReminderStoreBox,
        settings: BillingSettings,
    ) -> Self {
        Self {
            shops,
            payments,
            users,
            reminders,
            settings,
        }
    }

    /// Engine backed by fresh in-memory stores.
    pub fn in_memory(settings: BillingSettings) -> Self {
        Self::new(
            Box::new(InMemoryShopStore::new()),
            Box::new(InMemoryPaymentStore::new()),
            Box::new(InMemoryUserStore::new()),
            Box::new(InMemoryReminderStore::new()),
            settings,
        )
    }

    pub fn settings(&self) -> &BillingSettings {
        &self.settings
    }

    // ---- users ----

    /// Creates an account from a validated sign-up. Duplicate emails are a
    /// conflict; new accounts start as customers.
    pub async fn sign_up(&self, form: SignUpForm) -> Result<User> {
        form.validate()?;
        if self.users.by_email(&form.email).await?.is_some() {
            return Err(MarketError::conflict(format!(
                "an account already exists for {}",
                form.email
            )));
        }
        let id = self.users.next_id().await?;
        let user = User::new(
            id,
            form.full_name.trim().to_string(),
            form.email.trim().to_string(),
            Role::Customer,
            Utc::now(),
        );
        self.users.store(user.clone()).await?;
        info!(user = user.id.0, email = %user.email, "account created");
        Ok(user)
    }

    pub async fn users(&self, query: &UserQuery) -> Result<Vec<User>> {
        let users = self.users.all().await?;
        Ok(users.into_iter().filter(|u| query.matches(u)).collect())
    }

    pub async fn user(&self, id: UserId) -> Result<User> {
        self.users
            .get(id)
            .await?
            .ok_or(MarketError::not_found("user", id.0))
    }

    // ---- shop lifecycle ----

    /// Registers a shop for an owner. One shop per owner; the record starts
    /// pending and stays out of the public directory until approved.
    pub async fn register_shop(&self, owner_id: UserId, form: ShopForm) -> Result<Shop> {
        form.validate()?;
        let mut owner = self.user(owner_id).await?;
        if let Some(existing) = self.shops.by_owner(owner_id).await? {
            return Err(MarketError::conflict(format!(
                "{} already owns shop {}",
                owner.name, existing.id.0
            )));
        }
        let id = self.shops.next_id().await?;
        let shop = Shop::from_form(id, owner_id, owner.name.clone(), form, Utc::now());
        self.shops.store(shop.clone()).await?;
        owner.promote_to_owner();
        self.users.store(owner).await?;
        info!(shop = shop.id.0, name = %shop.name, "shop registered, awaiting approval");
        Ok(shop)
    }

    /// Public directory: active shops only, then the caller's query, in
    /// creation order.
    pub async fn directory(&self, query: &ShopQuery) -> Result<Vec<Shop>> {
        let shops = self.shops.all().await?;
        Ok(shops
            .into_iter()
            .filter(|s| s.is_listed() && query.matches(s))
            .collect())
    }

    /// Admin listing: every shop, filtered by the query, in creation order.
    pub async fn shops(&self, query: &ShopQuery) -> Result<Vec<Shop>> {
        let shops = self.shops.all().await?;
        Ok(shops.into_iter().filter(|s| query.matches(s)).collect())
    }

    /// The awaiting-admin-action set.
    pub async fn pending_shops(&self) -> Result<Vec<Shop>> {
        let shops = self.shops.all().await?;
        Ok(shops
            .into_iter()
            .filter(|s| s.status == ShopStatus::Pending)
            .collect())
    }

    pub async fn shop(&self, id: ShopId) -> Result<Shop> {
        self.shops
            .get(id)
            .await?
            .ok_or(MarketError::not_found("shop", id.0))
    }

    /// Approves a pending shop and opens its first billing cycle, due after
    /// the configured payment window.
    pub async fn approve_shop(&self, id: ShopId, today: NaiveDate) -> Result<Shop> {
        let mut shop = self.shop(id).await?;
        shop.approve(Utc::now())?;
        self.shops.store(shop.clone()).await?;

        let due_date = today
            .checked_add_days(Days::new(self.settings.payment_window_days as u64))
            .unwrap_or(today);
        let payment = Payment::open(
            self.payments.next_id().await?,
            shop.id,
            Amount::new(self.settings.monthly_fee)?,
            self.settings.currency.clone(),
            due_date,
            Some("Monthly subscription fee".to_string()),
        );
        self.payments.store(payment).await?;
        info!(shop = shop.id.0, %due_date, "shop approved, first billing cycle opened");
        Ok(shop)
    }

    /// Rejects a pending shop. Terminal: it permanently leaves the queue.
    pub async fn reject_shop(&self, id: ShopId) -> Result<Shop> {
        let mut shop = self.shop(id).await?;
        shop.reject(Utc::now())?;
        self.shops.store(shop.clone()).await?;
        info!(shop = shop.id.0, "shop rejected");
        Ok(shop)
    }

    /// Owner edit of shop details.
    pub async fn update_shop(&self, id: ShopId, form: ShopForm) -> Result<Shop> {
        form.validate()?;
        let mut shop = self.shop(id).await?;
        shop.apply_edit(form, Utc::now());
        self.shops.store(shop.clone()).await?;
        Ok(shop)
    }

    /// Admin hard delete; payment history and reminders go with the shop.
    pub async fn delete_shop(&self, id: ShopId) -> Result<()> {
        let removed = self
            .shops
            .remove(id)
            .await?
            .ok_or(MarketError::not_found("shop", id.0))?;
        self.payments.remove_by_shop(id).await?;
        self.reminders.remove_by_shop(id).await?;
        info!(shop = removed.id.0, name = %removed.name, "shop deleted");
        Ok(())
    }

    // ---- billing ----

    /// A shop's payment history, newest first.
    pub async fn payment_history(&self, shop_id: ShopId) -> Result<Vec<Payment>> {
        self.shop(shop_id).await?;
        let mut payments = self.payments.by_shop(shop_id).await?;
        payments.reverse();
        Ok(payments)
    }

    /// The single non-terminal cycle for a shop, if one is open.
    pub async fn current_payment(&self, shop_id: ShopId) -> Result<Option<Payment>> {
        let payments = self.payments.by_shop(shop_id).await?;
        Ok(payments.into_iter().find(Payment::is_open))
    }

    /// Settles a payment. Idempotent per payment id: replaying a settlement
    /// against an already-paid record returns it untouched and spawns
    /// nothing, so a race between the owner's payment flow and an admin
    /// marking paid can never double-charge or fork the cycle chain.
    ///
    /// A successful settlement stamps the payment, appends the successor
    /// cycle (due one calendar month later), and reactivates the shop if the
    /// lapsed payment had deactivated it.
    pub async fn settle_payment(
        &self,
        shop_id: ShopId,
        payment_id: PaymentId,
        method: PaymentMethod,
    ) -> Result<Settlement> {
        let mut shop = self.shop(shop_id).await?;
        let mut payment = self
            .payments
            .get(payment_id)
            .await?
            .filter(|p| p.shop_id == shop_id)
            .ok_or(MarketError::not_found("payment", payment_id.0))?;

        if payment.status == PaymentStatus::Paid {
            info!(payment = payment_id.0, "settlement replay ignored");
            return Ok(Settlement {
                payment,
                successor: None,
            });
        }

        payment.settle(method, Utc::now())?;
        let successor = payment.next_cycle(self.payments.next_id().await?);
        self.payments.store(payment.clone()).await?;
        self.payments.store(successor.clone()).await?;

        if shop.status == ShopStatus::Inactive {
            shop.reactivate(Utc::now())?;
            self.shops.store(shop).await?;
            info!(shop = shop_id.0, "shop reactivated by settlement");
        }
        info!(
            payment = payment_id.0,
            reference = %payment.transaction_ref.as_ref().map(|r| r.as_str()).unwrap_or(""),
            "payment settled"
        );
        Ok(Settlement {
            payment,
            successor: Some(successor),
        })
    }

    /// Settles the shop's current open cycle (owner "Pay Now" / admin
    /// "Mark as Paid").
    pub async fn settle_current(&self, shop_id: ShopId, method: PaymentMethod) -> Result<Settlement> {
        let current = self
            .current_payment(shop_id)
            .await?
            .ok_or_else(|| MarketError::conflict(format!("shop {} has no open billing cycle", shop_id.0)))?;
        self.settle_payment(shop_id, current.id, method).await
    }

    /// Records a payment reminder against the shop's current cycle.
    pub async fn send_reminder(&self, shop_id: ShopId) -> Result<Reminder> {
        let shop = self.shop(shop_id).await?;
        let current = self
            .current_payment(shop_id)
            .await?
            .ok_or_else(|| MarketError::conflict(format!("shop {} has no open billing cycle", shop_id.0)))?;
        let reminder = Reminder {
            id: self.reminders.next_id().await?,
            shop_id,
            payment_id: current.id,
            sent_at: Utc::now(),
            status: ReminderStatus::Sent,
        };
        self.reminders.store(reminder.clone()).await?;
        info!(shop = shop.id.0, payment = current.id.0, "payment reminder sent");
        Ok(reminder)
    }

    /// A shop's reminders, newest first.
    pub async fn reminder_history(&self, shop_id: ShopId) -> Result<Vec<Reminder>> {
        let mut reminders = self.reminders.by_shop(shop_id).await?;
        reminders.reverse();
        Ok(reminders)
    }

    /// Deactivates every active shop whose current payment is past due.
    /// Overdue is computed against the supplied date, never stored, so the
    /// sweep can run any number of times without drift.
    pub async fn enforce_overdue(&self, today: NaiveDate) -> Result<Vec<ShopId>> {
        let mut lapsed = Vec::new();
        for mut shop in self.shops.all().await? {
            if shop.status != ShopStatus::Active {
                continue;
            }
            let overdue = self
                .current_payment(shop.id)
                .await?
                .is_some_and(|p| p.is_overdue(today));
            if overdue {
                shop.deactivate(Utc::now())?;
                self.shops.store(shop.clone()).await?;
                info!(shop = shop.id.0, "shop deactivated: payment overdue");
                lapsed.push(shop.id);
            }
        }
        Ok(lapsed)
    }

    /// Admin billing table: one row per shop with at least one payment.
    pub async fn billing(&self, query: &PaymentQuery, today: NaiveDate) -> Result<Vec<BillingRow>> {
        let mut rows = Vec::new();
        for shop in self.shops.all().await? {
            let payments = self.payments.by_shop(shop.id).await?;
            if payments.is_empty() {
                continue;
            }
            let current = payments.iter().find(|p| p.is_open());
            let state = match current {
                Some(p) => p.state_on(today),
                None => PaymentState::Paid,
            };
            let last_payment = payments
                .iter()
                .filter_map(|p| p.payment_date)
                .max()
                .map(|ts| ts.date_naive());
            let row = BillingRow {
                shop_id: shop.id,
                shop_name: shop.name.clone(),
                owner_name: shop.owner_name.clone(),
                state,
                amount: current
                    .map(|p| p.amount.value())
                    .unwrap_or(self.settings.monthly_fee),
                currency: self.settings.currency.clone(),
                last_payment,
                next_due: current.map(|p| p.due_date),
            };
            if query.matches(&row.shop_name, &row.owner_name, row.state) {
                rows.push(row);
            }
        }
        Ok(rows)
    }

    /// Totals for the owner's payments page.
    pub async fn payment_summary(&self, shop_id: ShopId, today: NaiveDate) -> Result<PaymentSummary> {
        self.shop(shop_id).await?;
        let payments = self.payments.by_shop(shop_id).await?;
        Ok(PaymentSummary::compute(&payments, today))
    }

    // ---- dashboards ----

    pub async fn admin_dashboard(&self, today: NaiveDate) -> Result<AdminDashboard> {
        let shops = self.shops.all().await?;
        let mut overdue_shops = 0;
        for shop in &shops {
            if self
                .current_payment(shop.id)
                .await?
                .is_some_and(|p| p.is_overdue(today))
            {
                overdue_shops += 1;
            }
        }
        let count = |status: ShopStatus| shops.iter().filter(|s| s.status == status).count();
        Ok(AdminDashboard {
            total_shops: shops.len(),
            active_shops: count(ShopStatus::Active),
            pending_approvals: count(ShopStatus::Pending),
            inactive_shops: count(ShopStatus::Inactive),
            overdue_shops,
            total_users: self.users.all().await?.len(),
        })
    }

    pub async fn owner_dashboard(&self, owner_id: UserId, today: NaiveDate) -> Result<OwnerDashboard> {
        let shop = self
            .shops
            .by_owner(owner_id)
            .await?
            .ok_or(MarketError::not_found("shop", owner_id.0))?;
        let current_payment = self.current_payment(shop.id).await?;
        let overdue = current_payment
            .as_ref()
            .is_some_and(|p| p.is_overdue(today));
        let summary = self.payment_summary(shop.id, today).await?;
        Ok(OwnerDashboard {
            shop,
            current_payment,
            overdue,
            summary,
        })
    }
}
