use crate::domain::user::Role;

/// One back-office navigation entry and the roles allowed to see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavEntry {
    pub label: &'static str,
    pub route: &'static str,
    pub roles: &'static [Role],
}

impl NavEntry {
    /// Prefix match, so sub-routes keep the parent entry highlighted.
    pub fn is_active(&self, current_route: &str) -> bool {
        current_route.starts_with(self.route)
    }
}

/// Full entry table, declared in display order.
pub const NAV_ENTRIES: &[NavEntry] = &[
    NavEntry {
        label: "Dashboard",
        route: "/admin/dashboard",
        roles: &[Role::Admin],
    },
    NavEntry {
        label: "Shops",
        route: "/admin/shops",
        roles: &[Role::Admin],
    },
    NavEntry {
        label: "Users",
        route: "/admin/users",
        roles: &[Role::Admin],
    },
    NavEntry {
        label: "Payments",
        route: "/admin/payments",
        roles: &[Role::Admin],
    },
    NavEntry {
        label: "Settings",
        route: "/admin/settings",
        roles: &[Role::Admin],
    },
    NavEntry {
        label: "Shop Information",
        route: "/shop-owner/dashboard",
        roles: &[Role::ShopOwner],
    },
    NavEntry {
        label: "Payments",
        route: "/shop-owner/payments",
        roles: &[Role::ShopOwner],
    },
    NavEntry {
        label: "Products",
        route: "/shop-owner/products",
        roles: &[Role::ShopOwner],
    },
    NavEntry {
        label: "Orders",
        route: "/shop-owner/orders",
        roles: &[Role::ShopOwner],
    },
    NavEntry {
        label: "Analytics",
        route: "/shop-owner/analytics",
        roles: &[Role::ShopOwner],
    },
    NavEntry {
        label: "Settings",
        route: "/shop-owner/settings",
        roles: &[Role::ShopOwner],
    },
];

/// The ordered navigation visible to a role.
pub fn entries_for(role: Role) -> Vec<&'static NavEntry> {
    NAV_ENTRIES
        .iter()
        .filter(|entry| entry.roles.contains(&role))
        .collect()
}

/// Where a role lands when visiting its root path.
pub fn landing_route(role: Role) -> &'static str {
    match role {
        Role::Admin => "/admin/dashboard",
        Role::ShopOwner => "/shop-owner/dashboard",
        Role::Customer => "/",
    }
}
