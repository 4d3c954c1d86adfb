use serde::{Deserialize, Serialize};

use crate::domain::payment::PaymentState;
use crate::domain::shop::{Shop, ShopStatus};
use crate::domain::user::{Role, User, UserStatus};

/// Case-insensitive substring match over a set of fields. A record matches
/// when ANY field contains the term; the empty term matches everything.
pub fn text_matches(term: &str, fields: &[&str]) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    fields.iter().any(|f| f.to_lowercase().contains(&term))
}

/// A categorical filter with an "all" sentinel that admits every value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facet<T> {
    All,
    Only(T),
}

impl<T> Default for Facet<T> {
    fn default() -> Self {
        Facet::All
    }
}

impl<T: PartialEq> Facet<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Facet::All => true,
            Facet::Only(wanted) => wanted == value,
        }
    }
}

/// Text facet for free-form categories (industry, city). Matching is
/// case-insensitive exact, mirroring the select inputs it models.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextFacet {
    #[default]
    All,
    Only(String),
}

impl TextFacet {
    pub fn only(value: impl Into<String>) -> Self {
        Self::Only(value.into())
    }

    pub fn admits(&self, value: &str) -> bool {
        match self {
            TextFacet::All => true,
            TextFacet::Only(wanted) => wanted.eq_ignore_ascii_case(value),
        }
    }
}

/// Directory / admin shop listing query. All predicates must hold.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopQuery {
    pub term: String,
    pub industry: TextFacet,
    pub status: Facet<ShopStatus>,
}

impl ShopQuery {
    pub fn matches(&self, shop: &Shop) -> bool {
        text_matches(&self.term, &[&shop.name, &shop.owner_name, &shop.city, &shop.mall])
            && self.industry.admits(&shop.industry)
            && self.status.admits(&shop.status)
    }

    /// Stable filter: keeps the input's relative order, never sorts.
    pub fn apply<'a>(&self, shops: &'a [Shop]) -> Vec<&'a Shop> {
        shops.iter().filter(|s| self.matches(s)).collect()
    }
}

/// Admin billing table query; the state facet works on the derived state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentQuery {
    pub term: String,
    pub state: Facet<PaymentState>,
}

impl PaymentQuery {
    pub fn matches(&self, shop_name: &str, owner_name: &str, state: PaymentState) -> bool {
        text_matches(&self.term, &[shop_name, owner_name]) && self.state.admits(&state)
    }
}

/// Admin user listing query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserQuery {
    pub term: String,
    pub role: Facet<Role>,
    pub status: Facet<UserStatus>,
}

impl UserQuery {
    pub fn matches(&self, user: &User) -> bool {
        text_matches(&self.term, &[&user.name, &user.email])
            && self.role.admits(&user.role)
            && self.status.admits(&user.status)
    }

    pub fn apply<'a>(&self, users: &'a [User]) -> Vec<&'a User> {
        users.iter().filter(|u| self.matches(u)).collect()
    }
}
