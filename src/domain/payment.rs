use chrono::{DateTime, Months, NaiveDate, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::shop::ShopId;
use crate::error::{MarketError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PaymentId(pub u32);

/// A positive monetary amount.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(MarketError::conflict("amount must be positive"))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = MarketError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    Mpesa,
    BankTransfer,
    CreditCard,
}

impl PaymentMethod {
    /// Two-letter prefix carried by transaction references.
    pub fn prefix(&self) -> &'static str {
        match self {
            PaymentMethod::Mpesa => "MP",
            PaymentMethod::BankTransfer => "BT",
            PaymentMethod::CreditCard => "CC",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Mpesa => write!(f, "M-Pesa"),
            PaymentMethod::BankTransfer => write!(f, "Bank Transfer"),
            PaymentMethod::CreditCard => write!(f, "Credit Card"),
        }
    }
}

/// Settlement reference: method prefix + 10 digits, e.g. `MP0123456789`.
/// Random digits are fine for the mock gateway; a real gateway would assign
/// its own collision-resistant reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRef(String);

impl TransactionRef {
    pub fn generate(method: PaymentMethod) -> Self {
        let mut rng = rand::thread_rng();
        let mut value = String::with_capacity(12);
        value.push_str(method.prefix());
        for _ in 0..10 {
            value.push(char::from(b'0' + rng.gen_range(0..10u8)));
        }
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stored payment status. `Overdue` is intentionally absent: it is derived
/// from `due_date` at read time, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Refunded,
}

/// What a view shows for a payment on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentState {
    Pending,
    Paid,
    Overdue,
    Failed,
    Refunded,
}

impl fmt::Display for PaymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaymentState::Pending => "pending",
            PaymentState::Paid => "paid",
            PaymentState::Overdue => "overdue",
            PaymentState::Failed => "failed",
            PaymentState::Refunded => "refunded",
        };
        f.write_str(s)
    }
}

/// One billing cycle's obligation for a shop.
///
/// Invariant: `payment_date` is set if and only if `status == Paid`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub shop_id: ShopId,
    pub amount: Amount,
    pub currency: String,
    pub status: PaymentStatus,
    pub due_date: NaiveDate,
    pub payment_date: Option<DateTime<Utc>>,
    pub method: Option<PaymentMethod>,
    pub transaction_ref: Option<TransactionRef>,
    pub notes: Option<String>,
}

impl Payment {
    /// Opens a new billing cycle.
    pub fn open(
        id: PaymentId,
        shop_id: ShopId,
        amount: Amount,
        currency: String,
        due_date: NaiveDate,
        notes: Option<String>,
    ) -> Self {
        Self {
            id,
            shop_id,
            amount,
            currency,
            status: PaymentStatus::Pending,
            due_date,
            payment_date: None,
            method: None,
            transaction_ref: None,
            notes,
        }
    }

    /// The one cycle per shop still awaiting settlement.
    pub fn is_open(&self) -> bool {
        self.status == PaymentStatus::Pending
    }

    /// Derived, not stored: a pending cycle past its due date.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status == PaymentStatus::Pending && self.due_date < today
    }

    pub fn state_on(&self, today: NaiveDate) -> PaymentState {
        match self.status {
            PaymentStatus::Pending if self.due_date < today => PaymentState::Overdue,
            PaymentStatus::Pending => PaymentState::Pending,
            PaymentStatus::Paid => PaymentState::Paid,
            PaymentStatus::Failed => PaymentState::Failed,
            PaymentStatus::Refunded => PaymentState::Refunded,
        }
    }

    /// Pending → Paid. Stamps the payment date, method, and a fresh
    /// transaction reference. Terminal states refuse with a conflict; the
    /// caller treats an already-paid record as a no-op before getting here.
    pub fn settle(&mut self, method: PaymentMethod, now: DateTime<Utc>) -> Result<()> {
        match self.status {
            PaymentStatus::Pending => {
                self.status = PaymentStatus::Paid;
                self.payment_date = Some(now);
                self.method = Some(method);
                self.transaction_ref = Some(TransactionRef::generate(method));
                Ok(())
            }
            PaymentStatus::Paid => Err(MarketError::conflict(format!(
                "payment {} is already settled",
                self.id.0
            ))),
            status => Err(MarketError::conflict(format!(
                "cannot settle payment {}: status is {:?}",
                self.id.0, status
            ))),
        }
    }

    /// The successor cycle: amount and currency carried forward, due date
    /// advanced by exactly one calendar month (clamped at month end).
    pub fn next_cycle(&self, id: PaymentId) -> Payment {
        let due_date = self
            .due_date
            .checked_add_months(Months::new(1))
            .unwrap_or(self.due_date);
        Payment::open(
            id,
            self.shop_id,
            self.amount,
            self.currency.clone(),
            due_date,
            self.notes.clone(),
        )
    }
}

/// Aggregates a shop's payment history for the owner dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentSummary {
    pub total_paid: Decimal,
    pub total_pending: Decimal,
    pub total_overdue: Decimal,
    pub average_monthly_payment: Decimal,
}

impl PaymentSummary {
    pub fn compute(payments: &[Payment], today: NaiveDate) -> Self {
        let mut total_paid = Decimal::ZERO;
        let mut total_pending = Decimal::ZERO;
        let mut total_overdue = Decimal::ZERO;
        let mut paid_cycles = 0u32;
        for p in payments {
            match p.state_on(today) {
                PaymentState::Paid => {
                    total_paid += p.amount.value();
                    paid_cycles += 1;
                }
                PaymentState::Pending => total_pending += p.amount.value(),
                PaymentState::Overdue => total_overdue += p.amount.value(),
                PaymentState::Failed | PaymentState::Refunded => {}
            }
        }
        let average_monthly_payment = if paid_cycles > 0 {
            total_paid / Decimal::from(paid_cycles)
        } else {
            Decimal::ZERO
        };
        Self {
            total_paid,
            total_pending,
            total_overdue,
            average_monthly_payment,
        }
    }
}

/// A payment reminder sent to a shop owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: u32,
    pub shop_id: ShopId,
    pub payment_id: PaymentId,
    pub sent_at: DateTime<Utc>,
    pub status: ReminderStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    Sent,
    Failed,
}
