//! KYC submissions and review decisions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KycStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct KycRecord {
    pub id: i64,
    pub user_id: i64,
    pub status: KycStatus,
    /// Storage reference to the uploaded passport image.
    #[serde(default)]
    pub passport_image: Option<String>,
    pub submitted_at: Option<String>,
    pub reviewed_at: Option<String>,
    pub notes: Option<String>,
}

/// Outcome of an admin approve/reject: the reviewed record plus the
/// account it belongs to. The backend shapes `user` differently per
/// serializer, so it stays untyped here.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct KycDecision {
    pub kyc: KycRecord,
    pub user: Value,
}
