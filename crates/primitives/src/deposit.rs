//! Deposit requests: customer submission and admin review.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DepositStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DepositRequest {
    pub id: i64,
    pub user_id: i64,
    pub amount: String,
    pub status: DepositStatus,
    #[serde(default)]
    pub payment_method: String,
    /// Reference to the uploaded payment proof, if any.
    #[serde(default)]
    pub proof: String,
    #[serde(default)]
    pub reference: String,
    pub transaction_id: Option<i64>,
    pub created_at: String,
    pub reviewed_at: Option<String>,
    pub reviewed_by: Option<i64>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CreateDepositRequest {
    pub amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Reviewer notes attached to an approve/reject decision.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ReviewNotes {
    pub notes: String,
}

impl ReviewNotes {
    #[must_use]
    pub fn new(notes: impl Into<String>) -> Self {
        Self {
            notes: notes.into(),
        }
    }
}
