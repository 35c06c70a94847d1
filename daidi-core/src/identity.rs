//! Roles and the permissions each role carries.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Customer,
    Staff,
    Manager,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Customer => "customer",
            UserRole::Staff => "staff",
            UserRole::Manager => "manager",
            UserRole::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "customer" => Some(UserRole::Customer),
            "staff" => Some(UserRole::Staff),
            "manager" => Some(UserRole::Manager),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }

}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    // Orders
    CanApproveOrder,
    CanCancelOrder,
    CanShipOrder,
    CanPackOrder,
    CanDeliverOrder,
    CanUpdateOrderPaymentTerm,
    CanUpdateOrderPaymentMethod,
    CanFulfillOrder,

    // Payments
    CanInitiatePaymentRefund,

    // Products
    CanBulkProductStatusUpdate,
    CanBulkProductDelete,

    // Stock
    CanReceiveTransferredStock,
    CanMarkStockTransferAsCompleted,

    // Customers
    CanReadCustomer,
    CanUpdateCustomer,
    CanDeleteCustomer,

    // Marketing pages
    CanManageServices,
    CanManagePortfolio,
    CanViewAnalytics,
}

impl Permission {
    pub const ALL: [Permission; 19] = [
        Permission::CanApproveOrder,
        Permission::CanCancelOrder,
        Permission::CanShipOrder,
        Permission::CanPackOrder,
        Permission::CanDeliverOrder,
        Permission::CanUpdateOrderPaymentTerm,
        Permission::CanUpdateOrderPaymentMethod,
        Permission::CanFulfillOrder,
        Permission::CanInitiatePaymentRefund,
        Permission::CanBulkProductStatusUpdate,
        Permission::CanBulkProductDelete,
        Permission::CanReceiveTransferredStock,
        Permission::CanMarkStockTransferAsCompleted,
        Permission::CanReadCustomer,
        Permission::CanUpdateCustomer,
        Permission::CanDeleteCustomer,
        Permission::CanManageServices,
        Permission::CanManagePortfolio,
        Permission::CanViewAnalytics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::CanApproveOrder => "can_approve_order",
            Permission::CanCancelOrder => "can_cancel_order",
            Permission::CanShipOrder => "can_ship_order",
            Permission::CanPackOrder => "can_pack_order",
            Permission::CanDeliverOrder => "can_deliver_order",
            Permission::CanUpdateOrderPaymentTerm => "can_update_order_payment_term",
            Permission::CanUpdateOrderPaymentMethod => "can_update_order_payment_method",
            Permission::CanFulfillOrder => "can_fulfill_order",
            Permission::CanInitiatePaymentRefund => "can_initiate_payment_refund",
            Permission::CanBulkProductStatusUpdate => "can_bulk_product_status_update",
            Permission::CanBulkProductDelete => "can_bulk_product_delete",
            Permission::CanReceiveTransferredStock => "can_receive_transferred_stock",
            Permission::CanMarkStockTransferAsCompleted => "can_mark_stock_transfer_as_completed",
            Permission::CanReadCustomer => "can_read_customer",
            Permission::CanUpdateCustomer => "can_update_customer",
            Permission::CanDeleteCustomer => "can_delete_customer",
            Permission::CanManageServices => "can_manage_services",
            Permission::CanManagePortfolio => "can_manage_portfolio",
            Permission::CanViewAnalytics => "can_view_analytics",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const STAFF_PERMISSIONS: &[Permission] = &[
    Permission::CanApproveOrder,
    Permission::CanShipOrder,
    Permission::CanPackOrder,
    Permission::CanDeliverOrder,
    Permission::CanFulfillOrder,
    Permission::CanReadCustomer,
];

const MANAGER_PERMISSIONS: &[Permission] = &[
    Permission::CanApproveOrder,
    Permission::CanCancelOrder,
    Permission::CanShipOrder,
    Permission::CanPackOrder,
    Permission::CanDeliverOrder,
    Permission::CanUpdateOrderPaymentTerm,
    Permission::CanUpdateOrderPaymentMethod,
    Permission::CanFulfillOrder,
    Permission::CanReadCustomer,
    Permission::CanUpdateCustomer,
    Permission::CanManageServices,
    Permission::CanManagePortfolio,
    Permission::CanViewAnalytics,
];

/// Fixed role → permission matrix. Customers only see their own orders.
pub fn role_permissions(role: UserRole) -> &'static [Permission] {
    match role {
        UserRole::Customer => &[],
        UserRole::Staff => STAFF_PERMISSIONS,
        UserRole::Manager => MANAGER_PERMISSIONS,
        UserRole::Admin => &Permission::ALL,
    }
}

/// The authenticated caller of a request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Principal {
    pub user_id: String,
    pub email: Option<String>,
    /// Display name, "first last"
    #[serde(default)]
    pub name: Option<String>,
    pub role: UserRole,
    #[serde(default)]
    pub is_superuser: bool,
}

impl Principal {
    pub fn has_role(&self, role: UserRole) -> bool {
        self.role == role
    }

    /// Staff, managers, admins and superusers
    pub fn is_back_office(&self) -> bool {
        self.is_superuser || !self.has_role(UserRole::Customer)
    }

    /// Superusers pass every check
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.is_superuser || role_permissions(self.role).contains(&permission)
    }

    pub fn permissions(&self) -> Vec<Permission> {
        if self.is_superuser {
            Permission::ALL.to_vec()
        } else {
            role_permissions(self.role).to_vec()
        }
    }
}

/// Display data of a user account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct UserProfile {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl UserProfile {
    pub fn for_principal(principal: &Principal) -> Self {
        let mut profile = UserProfile {
            email: principal.email.clone().unwrap_or_default(),
            ..UserProfile::default()
        };
        if let Some(name) = principal.name.as_deref() {
            profile.set_full_name(name);
        }
        profile
    }

    /// "first last" when both are set, otherwise the e-mail address
    pub fn full_name(&self) -> String {
        if !self.first_name.is_empty() && !self.last_name.is_empty() {
            format!("{} {}", self.first_name, self.last_name)
        } else {
            self.email.clone()
        }
    }

    /// Split on the first space: "Ali Reza Karimi" → ("Ali", "Reza Karimi")
    pub fn set_full_name(&mut self, value: &str) {
        let mut parts = value.splitn(2, ' ');
        self.first_name = parts.next().unwrap_or_default().to_string();
        self.last_name = parts.next().unwrap_or_default().to_string();
    }
}
