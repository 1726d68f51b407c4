//! The platform deposit wallet shown to customers and managed by admins.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Wallet {
    pub address: String,
    pub network: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct UpsertWalletRequest {
    pub address: String,
    pub network: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct UpdateWalletRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
}
