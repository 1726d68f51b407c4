//! Withdrawal requests: customer submission and admin review.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WithdrawalStatus {
    Pending,
    Approved,
    Rejected,
    Processing,
    Completed,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct WithdrawalRequest {
    pub id: i64,
    pub user_id: i64,
    pub amount: String,
    pub status: WithdrawalStatus,
    pub payout_address: String,
    #[serde(default)]
    pub reference: String,
    /// External settlement reference, recorded on approval.
    pub transaction_id: Option<String>,
    pub created_at: String,
    pub reviewed_at: Option<String>,
    pub reviewed_by: Option<i64>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CreateWithdrawalRequest {
    pub amount: String,
    pub payout_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ApproveWithdrawalRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct RejectWithdrawalRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
