//! User accounts, as seen from the customer and admin surfaces.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::transaction::{BalanceDirection, Transaction};

/// A customer-facing account profile.
///
/// Only `id`, `email` and `username` are guaranteed; the remaining fields
/// depend on which backend serializer produced the record.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    /// Decimal amounts travel as strings.
    #[serde(default)]
    pub balance: Option<String>,
    #[serde(default)]
    pub referral_code: Option<String>,
    #[serde(default)]
    pub referral_counter: Option<u64>,
    #[serde(default)]
    pub is_kyc_verified: Option<bool>,
    #[serde(default)]
    pub is_staff: Option<bool>,
    #[serde(default)]
    pub is_superuser: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// The full account record the admin surface works with.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AdminUser {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub phone: String,
    pub country: String,
    pub balance: String,
    pub referral_code: String,
    pub referral_counter: u64,
    pub is_kyc_verified: bool,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: String,
}

/// Partial update of the admin-editable account flags.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
pub struct AdminUserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_kyc_verified: Option<bool>,
}

impl AdminUserUpdate {
    #[must_use]
    pub const fn active(is_active: bool) -> Self {
        Self {
            is_active: Some(is_active),
            is_kyc_verified: None,
        }
    }

    #[must_use]
    pub const fn kyc_verified(is_kyc_verified: bool) -> Self {
        Self {
            is_active: None,
            is_kyc_verified: Some(is_kyc_verified),
        }
    }
}

/// Manual ledger adjustment of a user's balance.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AdjustBalanceRequest {
    pub amount: String,
    pub direction: BalanceDirection,
    pub tx_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// Result of a balance adjustment: the updated account, the ledger entry
/// it produced, and the resulting balance.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct BalanceAdjustment {
    pub user: AdminUser,
    pub transaction: Transaction,
    pub new_balance: String,
}
