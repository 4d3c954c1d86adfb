use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::forms::ShopForm;
use crate::domain::user::UserId;
use crate::error::{MarketError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShopId(pub u32);

/// Shop lifecycle. `Pending` is the state every registration starts in;
/// `Rejected` is terminal. Only `Active` shops are publicly listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShopStatus {
    #[default]
    Pending,
    Active,
    Inactive,
    Rejected,
}

impl std::fmt::Display for ShopStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ShopStatus::Pending => "pending",
            ShopStatus::Active => "active",
            ShopStatus::Inactive => "inactive",
            ShopStatus::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

/// A registered storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shop {
    pub id: ShopId,
    pub owner_id: UserId,
    pub owner_name: String,
    pub name: String,
    pub industry: String,
    pub city: String,
    pub mall: String,
    pub shop_number: String,
    pub whatsapp: String,
    pub logo: Option<String>,
    pub description: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub opening_hours: Option<String>,
    pub status: ShopStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Shop {
    /// Builds a pending shop from a validated registration form.
    pub fn from_form(
        id: ShopId,
        owner_id: UserId,
        owner_name: String,
        form: ShopForm,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner_id,
            owner_name,
            name: form.name,
            industry: form.industry,
            city: form.city,
            mall: form.mall,
            shop_number: form.shop_number,
            whatsapp: form.whatsapp,
            logo: form.logo,
            description: form.description,
            email: form.email,
            website: form.website,
            opening_hours: form.opening_hours,
            status: ShopStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_listed(&self) -> bool {
        self.status == ShopStatus::Active
    }

    /// Pending → Active. The shop becomes publicly visible.
    pub fn approve(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.transition(ShopStatus::Pending, ShopStatus::Active, "approve", now)
    }

    /// Pending → Rejected. Terminal: the record leaves the pending queue
    /// permanently and no further transition is accepted.
    pub fn reject(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.transition(ShopStatus::Pending, ShopStatus::Rejected, "reject", now)
    }

    /// Active → Inactive, triggered when the current payment lapses.
    pub fn deactivate(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.transition(ShopStatus::Active, ShopStatus::Inactive, "deactivate", now)
    }

    /// Inactive → Active, when the overdue payment is settled.
    pub fn reactivate(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.transition(ShopStatus::Inactive, ShopStatus::Active, "reactivate", now)
    }

    /// Applies an owner edit from a validated form.
    pub fn apply_edit(&mut self, form: ShopForm, now: DateTime<Utc>) {
        self.name = form.name;
        self.industry = form.industry;
        self.city = form.city;
        self.mall = form.mall;
        self.shop_number = form.shop_number;
        self.whatsapp = form.whatsapp;
        self.logo = form.logo;
        self.description = form.description;
        self.email = form.email;
        self.website = form.website;
        self.opening_hours = form.opening_hours;
        self.updated_at = now;
    }

    fn transition(
        &mut self,
        from: ShopStatus,
        to: ShopStatus,
        action: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if self.status != from {
            return Err(MarketError::conflict(format!(
                "cannot {action} shop {}: status is {:?}",
                self.id.0, self.status
            )));
        }
        self.status = to;
        self.updated_at = now;
        Ok(())
    }
}
