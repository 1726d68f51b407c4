//! Ledger entries.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Which side of the ledger an entry lands on.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceDirection {
    Credit,
    Debit,
}

/// A single ledger entry with its before/after balances.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub tx_type: String,
    pub direction: BalanceDirection,
    pub amount: String,
    pub balance_before: String,
    pub balance_after: String,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    pub created_at: String,
}
