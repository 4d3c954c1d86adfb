use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{MarketError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub u32);

/// Platform role. Every role-dependent decision matches exhaustively on this
/// union; there is no string comparison anywhere downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Admin,
    ShopOwner,
    Customer,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::Admin => "admin",
            Role::ShopOwner => "shop-owner",
            Role::Customer => "customer",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
            UserStatus::Suspended => "suspended",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: UserId, name: String, email: String, role: Role, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            email,
            role,
            status: UserStatus::Active,
            created_at: now,
        }
    }

    /// Promotes a customer to shop owner when their registration is accepted.
    /// Admins keep their role; an already-owner is a no-op.
    pub fn promote_to_owner(&mut self) {
        if self.role == Role::Customer {
            self.role = Role::ShopOwner;
        }
    }

    pub fn set_status(&mut self, status: UserStatus) -> Result<()> {
        if self.status == status {
            return Err(MarketError::conflict(format!(
                "user {} is already {:?}",
                self.id.0, status
            )));
        }
        self.status = status;
        Ok(())
    }
}
