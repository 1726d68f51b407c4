//! Investment packs and customer investments.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// When a pack pays out: daily drip or a lump sum at term end.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PayoutType {
    Daily,
    End,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Pack {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub min_amount: Option<String>,
    #[serde(default)]
    pub max_amount: Option<String>,
    #[serde(default)]
    pub duration_days: Option<u32>,
    #[serde(default)]
    pub roi_percent: Option<String>,
    #[serde(default)]
    pub payout_type: Option<PayoutType>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Full payload for creating or replacing a pack.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PackUpsertRequest {
    pub name: String,
    pub is_active: bool,
    pub min_amount: String,
    pub max_amount: String,
    pub duration_days: u32,
    pub roi_percent: String,
    pub payout_type: PayoutType,
}

/// A customer's position in a pack. The backend attaches a varying set of
/// computed fields; anything beyond the stable core is kept loose.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Investment {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Result of a forced payout on an investment.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PayoutResult {
    #[serde(default)]
    pub paid: Option<String>,
    #[serde(default)]
    pub investment: Option<Investment>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
