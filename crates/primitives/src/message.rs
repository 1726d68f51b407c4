//! Referral "message" offers: admin-authored tasks with a reward, routed
//! to individual customers, who accept and submit a proof link.

use serde::{Deserialize, Serialize};

/// Customer's response to an offer. Older backend revisions emitted
/// `rejected` where current ones emit `declined`; both are accepted.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserResponse {
    Pending,
    Accepted,
    Declined,
    Rejected,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Message {
    pub id: i64,
    pub subject: String,
    pub body: String,
    pub reward: String,
    pub created_at: String,
}

/// Per-customer routing record of a message, with review state.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MessageRecipient {
    pub id: i64,
    pub message: Message,
    pub user_id: i64,
    pub user_response: UserResponse,
    pub submitted_link: Option<String>,
    pub verification_status: VerificationStatus,
    pub reward_given: bool,
    pub reviewed_at: Option<String>,
}

/// Compact entry of the customer's message list.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct MessageSummary {
    pub id: i64,
    #[serde(default)]
    pub user_response: Option<UserResponse>,
    #[serde(default)]
    pub reward_given: Option<bool>,
}

/// Customer-visible detail of one routed message.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MessageDetail {
    pub id: i64,
    #[serde(default)]
    pub submitted_link: Option<String>,
    #[serde(default)]
    pub user_response: Option<UserResponse>,
    #[serde(default)]
    pub reward_given: Option<bool>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CreateMessageRequest {
    pub subject: String,
    pub body: String,
    pub reward: String,
    pub user_id: i64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SubmitLinkRequest {
    pub submitted_link: String,
}

/// Approval payout: the amount paid and the recipient record after review.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ApprovedReward {
    pub paid: String,
    pub recipient: MessageRecipient,
}
