//! Support tickets.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SupportTicket {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub whatsapp: String,
    pub telegram: String,
    pub email: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CreateTicketRequest {
    pub name: String,
    pub whatsapp: String,
    pub telegram: String,
    pub email: String,
    pub message: String,
}

/// Admin-side read marker update.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct UpdateTicketRequest {
    pub is_read: bool,
}
