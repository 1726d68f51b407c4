//! Typed API surface over [`ConnectionInfo`].
//!
//! One thin method per backend operation; every response is unwrapped
//! from the standard envelope before it reaches the caller.

use eyre::Result;
use reqwest::multipart::{Form, Part};
use serde_json::{json, Value};
use url::Url;

use investpro_primitives::auth::{
    ChangePasswordRequest, LoginData, LoginRequest, LogoutRequest, OtpSent, OtpVerified,
    PasswordChanged, RegisterRequest, SendResetOtpRequest, VerifyResetOtpRequest,
};
use investpro_primitives::deposit::{CreateDepositRequest, DepositRequest, ReviewNotes};
use investpro_primitives::kyc::{KycDecision, KycRecord};
use investpro_primitives::message::{
    ApprovedReward, CreateMessageRequest, MessageDetail, MessageRecipient, MessageSummary,
    SubmitLinkRequest,
};
use investpro_primitives::pack::{Investment, Pack, PackUpsertRequest, PayoutResult};
use investpro_primitives::support::{CreateTicketRequest, SupportTicket, UpdateTicketRequest};
use investpro_primitives::transaction::Transaction;
use investpro_primitives::user::{
    AdjustBalanceRequest, AdminUser, AdminUserUpdate, BalanceAdjustment, User,
};
use investpro_primitives::wallet::{UpdateWalletRequest, UpsertWalletRequest, Wallet};
use investpro_primitives::withdrawal::{
    ApproveWithdrawalRequest, CreateWithdrawalRequest, RejectWithdrawalRequest, WithdrawalRequest,
};
use investpro_primitives::ApiResponse;

use crate::config::ConnectionConfig;
use crate::connection::ConnectionInfo;
use crate::storage::TokenStorage;

/// A document attached to a KYC submission.
#[derive(Clone, Debug)]
pub struct KycDocument {
    pub file_name: String,
    pub content: Vec<u8>,
}

/// Customer KYC submission payload (multipart).
#[derive(Clone, Debug, Default)]
pub struct KycSubmission {
    pub passport_image: Option<KycDocument>,
    pub notes: Option<String>,
}

/// Generic API client that can work with any token storage implementation.
#[derive(Clone, Debug)]
pub struct Client<S>
where
    S: TokenStorage + Clone + Send + Sync,
{
    connection: ConnectionInfo<S>,
}

impl<S> Client<S>
where
    S: TokenStorage + Clone + Send + Sync,
{
    #[must_use]
    pub const fn new(connection: ConnectionInfo<S>) -> Self {
        Self { connection }
    }

    /// Customer-scoped client with the platform defaults.
    #[must_use]
    pub fn customer(api_url: Url, storage: S) -> Self {
        Self::new(ConnectionInfo::new(ConnectionConfig::customer(api_url), storage))
    }

    /// Admin-scoped client with the platform defaults.
    #[must_use]
    pub fn admin(api_url: Url, storage: S) -> Self {
        Self::new(ConnectionInfo::new(ConnectionConfig::admin(api_url), storage))
    }

    #[must_use]
    pub const fn connection(&self) -> &ConnectionInfo<S> {
        &self.connection
    }

    #[must_use]
    pub fn api_url(&self) -> &Url {
        &self.connection.config().api_url
    }

    /// Persist a login's token pair for this client's scope. Token
    /// writes stay with the caller; logging in does not store anything
    /// by itself.
    pub async fn store_session(&self, login: &LoginData) -> Result<()> {
        self.connection
            .tokens()
            .set_tokens(&login.access, Some(&login.refresh), self.connection.scope())
            .await?;
        Ok(())
    }

    // ----------------------------- Customer: auth -----------------------------

    pub async fn login(&self, request: LoginRequest) -> Result<LoginData> {
        let response: ApiResponse<LoginData> =
            self.connection.post("customer/login/", &request).await?;
        Ok(response.into_data()?)
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<User> {
        let response: ApiResponse<User> =
            self.connection.post("customer/register/", &request).await?;
        Ok(response.into_data()?)
    }

    /// Revokes the stored refresh token server-side. The response body is
    /// not inspected; local tokens are untouched (callers clear them as
    /// part of their logout flow).
    pub async fn logout(&self) -> Result<()> {
        let refresh = self
            .connection
            .tokens()
            .refresh_token(self.connection.scope())
            .await?
            .unwrap_or_default();
        let _: ApiResponse<Value> = self
            .connection
            .post("customer/logout/", &LogoutRequest { refresh })
            .await?;
        Ok(())
    }

    pub async fn profile(&self) -> Result<User> {
        let response: ApiResponse<User> = self.connection.get("customer/profile/").await?;
        Ok(response.into_data()?)
    }

    pub async fn send_reset_otp(&self, email: &str) -> Result<OtpSent> {
        let response: ApiResponse<OtpSent> = self
            .connection
            .post(
                "customer/password/reset/send-otp/",
                &SendResetOtpRequest {
                    email: email.to_owned(),
                },
            )
            .await?;
        Ok(response.into_data()?)
    }

    pub async fn verify_reset_otp(&self, email: &str, otp: &str) -> Result<OtpVerified> {
        let response: ApiResponse<OtpVerified> = self
            .connection
            .post(
                "customer/password/reset/verify-otp/",
                &VerifyResetOtpRequest {
                    email: email.to_owned(),
                    otp: otp.to_owned(),
                },
            )
            .await?;
        Ok(response.into_data()?)
    }

    pub async fn change_password(&self, request: ChangePasswordRequest) -> Result<PasswordChanged> {
        let response: ApiResponse<PasswordChanged> = self
            .connection
            .post("customer/password/reset/change/", &request)
            .await?;
        Ok(response.into_data()?)
    }

    // --------------------------- Customer: deposits ---------------------------

    pub async fn create_deposit_request(
        &self,
        request: CreateDepositRequest,
    ) -> Result<DepositRequest> {
        let response: ApiResponse<DepositRequest> = self
            .connection
            .post("customer/deposits/request/", &request)
            .await?;
        Ok(response.into_data()?)
    }

    pub async fn deposit_requests(&self) -> Result<Vec<DepositRequest>> {
        let response: ApiResponse<Vec<DepositRequest>> =
            self.connection.get("customer/deposits/requests/").await?;
        Ok(response.into_data_or_default()?)
    }

    // ------------------------- Customer: withdrawals --------------------------

    pub async fn create_withdrawal_request(
        &self,
        request: CreateWithdrawalRequest,
    ) -> Result<WithdrawalRequest> {
        let response: ApiResponse<WithdrawalRequest> = self
            .connection
            .post("customer/withdrawals/request/", &request)
            .await?;
        Ok(response.into_data()?)
    }

    pub async fn withdrawal_requests(&self) -> Result<Vec<WithdrawalRequest>> {
        let response: ApiResponse<Vec<WithdrawalRequest>> = self
            .connection
            .get("customer/withdrawals/requests/")
            .await?;
        Ok(response.into_data_or_default()?)
    }

    // ----------------------------- Customer: KYC ------------------------------

    /// The customer's current KYC record, absent when nothing was ever
    /// submitted.
    pub async fn kyc(&self) -> Result<Option<KycRecord>> {
        let response: ApiResponse<KycRecord> = self.connection.get("customer/kyc").await?;
        Ok(response.into_result()?)
    }

    pub async fn submit_kyc(&self, submission: KycSubmission) -> Result<KycRecord> {
        let response: ApiResponse<KycRecord> = self
            .connection
            .post_multipart("customer/kyc/", || {
                let mut form = Form::new();
                if let Some(document) = &submission.passport_image {
                    form = form.part(
                        "passport_image",
                        Part::bytes(document.content.clone()).file_name(document.file_name.clone()),
                    );
                }
                let notes = submission.notes.as_deref().map(str::trim).unwrap_or_default();
                if !notes.is_empty() {
                    form = form.text("notes", notes.to_owned());
                }
                form
            })
            .await?;
        Ok(response.into_data()?)
    }

    // ---------------------------- Customer: wallet ----------------------------

    /// The platform deposit wallet, absent until an admin creates it.
    pub async fn wallet(&self) -> Result<Option<Wallet>> {
        let response: ApiResponse<Wallet> = self.connection.get("customer/wallet/").await?;
        Ok(response.into_result()?)
    }

    // --------------------------- Customer: support ----------------------------

    pub async fn support_tickets(&self) -> Result<Vec<SupportTicket>> {
        let response: ApiResponse<Vec<SupportTicket>> =
            self.connection.get("customer/support-tickets/").await?;
        Ok(response.into_data_or_default()?)
    }

    pub async fn create_support_ticket(
        &self,
        request: CreateTicketRequest,
    ) -> Result<SupportTicket> {
        let response: ApiResponse<SupportTicket> = self
            .connection
            .post("customer/support-tickets/", &request)
            .await?;
        Ok(response.into_data()?)
    }

    // --------------------------- Customer: messages ---------------------------

    pub async fn messages(&self) -> Result<Vec<MessageSummary>> {
        let response: ApiResponse<Vec<MessageSummary>> =
            self.connection.get("customer/messages/").await?;
        Ok(response.into_data_or_default()?)
    }

    pub async fn message_detail(&self, recipient_id: i64) -> Result<MessageDetail> {
        let response: ApiResponse<MessageDetail> = self
            .connection
            .get(&format!("customer/messages/{recipient_id}/"))
            .await?;
        Ok(response.into_data()?)
    }

    pub async fn accept_message(&self, recipient_id: i64) -> Result<MessageDetail> {
        let response: ApiResponse<MessageDetail> = self
            .connection
            .post_no_body(&format!("customer/messages/{recipient_id}/accept/"))
            .await?;
        Ok(response.into_data()?)
    }

    pub async fn submit_message_link(
        &self,
        recipient_id: i64,
        submitted_link: &str,
    ) -> Result<MessageDetail> {
        let response: ApiResponse<MessageDetail> = self
            .connection
            .put(
                &format!("customer/messages/{recipient_id}/"),
                &SubmitLinkRequest {
                    submitted_link: submitted_link.to_owned(),
                },
            )
            .await?;
        Ok(response.into_data()?)
    }

    // ------------------------------ Admin: auth -------------------------------

    pub async fn admin_login(&self, request: LoginRequest) -> Result<LoginData> {
        let response: ApiResponse<LoginData> =
            self.connection.post("admin/login/", &request).await?;
        Ok(response.into_data()?)
    }

    pub async fn admin_logout(&self) -> Result<()> {
        let _: ApiResponse<Value> = self.connection.post_no_body("admin/logout/").await?;
        Ok(())
    }

    // ---------------------------- Admin: deposits -----------------------------

    pub async fn admin_deposit_requests(&self) -> Result<Vec<DepositRequest>> {
        let response: ApiResponse<Vec<DepositRequest>> =
            self.connection.get("admin/deposits/requests/").await?;
        Ok(response.into_data_or_default()?)
    }

    pub async fn approve_deposit(&self, id: i64, notes: Option<&str>) -> Result<DepositRequest> {
        let response: ApiResponse<DepositRequest> = self
            .connection
            .post(
                &format!("admin/deposits/requests/{id}/approve/"),
                &ReviewNotes::new(notes.unwrap_or_default()),
            )
            .await?;
        Ok(response.into_data()?)
    }

    pub async fn reject_deposit(&self, id: i64, notes: &str) -> Result<DepositRequest> {
        let response: ApiResponse<DepositRequest> = self
            .connection
            .post(
                &format!("admin/deposits/requests/{id}/reject/"),
                &ReviewNotes::new(notes),
            )
            .await?;
        Ok(response.into_data()?)
    }

    // --------------------------- Admin: withdrawals ---------------------------

    pub async fn admin_withdrawal_requests(&self) -> Result<Vec<WithdrawalRequest>> {
        let response: ApiResponse<Vec<WithdrawalRequest>> =
            self.connection.get("admin/withdrawals/requests/").await?;
        Ok(response.into_data_or_default()?)
    }

    pub async fn approve_withdrawal(
        &self,
        id: i64,
        request: ApproveWithdrawalRequest,
    ) -> Result<Value> {
        let response: ApiResponse<Value> = self
            .connection
            .post(&format!("admin/withdrawals/requests/{id}/approve/"), &request)
            .await?;
        Ok(response.into_data_or_default()?)
    }

    pub async fn reject_withdrawal(
        &self,
        id: i64,
        request: RejectWithdrawalRequest,
    ) -> Result<Value> {
        let response: ApiResponse<Value> = self
            .connection
            .post(&format!("admin/withdrawals/requests/{id}/reject/"), &request)
            .await?;
        Ok(response.into_data_or_default()?)
    }

    // ------------------------------ Admin: KYC --------------------------------

    pub async fn admin_kyc_list(&self) -> Result<Vec<KycRecord>> {
        let response: ApiResponse<Vec<KycRecord>> = self.connection.get("admin/kyc/").await?;
        Ok(response.into_data_or_default()?)
    }

    pub async fn admin_kyc_detail(&self, kyc_id: i64) -> Result<KycRecord> {
        let response: ApiResponse<KycRecord> =
            self.connection.get(&format!("admin/kyc/{kyc_id}/")).await?;
        Ok(response.into_data()?)
    }

    pub async fn approve_kyc(&self, kyc_id: i64, notes: &str) -> Result<KycDecision> {
        let response: ApiResponse<KycDecision> = self
            .connection
            .post(&format!("admin/kyc/{kyc_id}/approve/"), &ReviewNotes::new(notes))
            .await?;
        Ok(response.into_data()?)
    }

    pub async fn reject_kyc(&self, kyc_id: i64, notes: &str) -> Result<KycDecision> {
        let response: ApiResponse<KycDecision> = self
            .connection
            .post(&format!("admin/kyc/{kyc_id}/reject/"), &ReviewNotes::new(notes))
            .await?;
        Ok(response.into_data()?)
    }

    // ------------------------------ Admin: users ------------------------------

    pub async fn admin_users(&self) -> Result<Vec<AdminUser>> {
        let response: ApiResponse<Vec<AdminUser>> = self.connection.get("admin/users/").await?;
        Ok(response.into_data_or_default()?)
    }

    pub async fn admin_user(&self, user_id: i64) -> Result<AdminUser> {
        let response: ApiResponse<AdminUser> = self
            .connection
            .get(&format!("admin/users/{user_id}/"))
            .await?;
        Ok(response.into_data()?)
    }

    pub async fn update_admin_user(
        &self,
        user_id: i64,
        update: AdminUserUpdate,
    ) -> Result<AdminUser> {
        let response: ApiResponse<AdminUser> = self
            .connection
            .put(&format!("admin/users/{user_id}/"), &update)
            .await?;
        Ok(response.into_data()?)
    }

    pub async fn set_user_active(&self, user_id: i64, is_active: bool) -> Result<AdminUser> {
        self.update_admin_user(user_id, AdminUserUpdate::active(is_active))
            .await
    }

    pub async fn set_user_kyc_verified(
        &self,
        user_id: i64,
        is_kyc_verified: bool,
    ) -> Result<AdminUser> {
        self.update_admin_user(user_id, AdminUserUpdate::kyc_verified(is_kyc_verified))
            .await
    }

    pub async fn adjust_user_balance(
        &self,
        user_id: i64,
        request: AdjustBalanceRequest,
    ) -> Result<BalanceAdjustment> {
        let response: ApiResponse<BalanceAdjustment> = self
            .connection
            .post(&format!("admin/users/{user_id}/balance/adjust/"), &request)
            .await?;
        Ok(response.into_data()?)
    }

    pub async fn delete_admin_user(&self, user_id: i64) -> Result<AdminUser> {
        let response: ApiResponse<AdminUser> = self
            .connection
            .delete(&format!("admin/users/{user_id}/"))
            .await?;
        Ok(response.into_data()?)
    }

    // ------------------------------ Admin: packs ------------------------------

    pub async fn admin_packs(&self) -> Result<Vec<Pack>> {
        let response: ApiResponse<Vec<Pack>> = self.connection.get("admin/packs/").await?;
        Ok(response.into_data_or_default()?)
    }

    pub async fn admin_pack(&self, pack_id: i64) -> Result<Pack> {
        let response: ApiResponse<Pack> = self
            .connection
            .get(&format!("admin/packs/{pack_id}/"))
            .await?;
        Ok(response.into_data()?)
    }

    pub async fn create_pack(&self, request: PackUpsertRequest) -> Result<Pack> {
        let response: ApiResponse<Pack> = self.connection.post("admin/packs/", &request).await?;
        Ok(response.into_data()?)
    }

    pub async fn update_pack(&self, pack_id: i64, request: PackUpsertRequest) -> Result<Pack> {
        let response: ApiResponse<Pack> = self
            .connection
            .put(&format!("admin/packs/{pack_id}/"), &request)
            .await?;
        Ok(response.into_data()?)
    }

    pub async fn set_pack_active(&self, pack_id: i64, is_active: bool) -> Result<Pack> {
        let response: ApiResponse<Pack> = self
            .connection
            .put(
                &format!("admin/packs/{pack_id}/"),
                &json!({ "is_active": is_active }),
            )
            .await?;
        Ok(response.into_data()?)
    }

    /// The backend answers pack deletion either with a bare 2xx or with
    /// an envelope; both count as success, a rejecting envelope fails.
    pub async fn delete_pack(&self, pack_id: i64) -> Result<()> {
        let body = self
            .connection
            .delete_text(&format!("admin/packs/{pack_id}/"))
            .await?;
        if body.trim().is_empty() {
            return Ok(());
        }
        if let Ok(envelope) = serde_json::from_str::<ApiResponse<Value>>(&body) {
            drop(envelope.into_result()?);
        }
        Ok(())
    }

    // --------------------------- Admin: investments ---------------------------

    pub async fn admin_investments(&self) -> Result<Vec<Investment>> {
        let response: ApiResponse<Vec<Investment>> =
            self.connection.get("admin/investments/").await?;
        Ok(response.into_data_or_default()?)
    }

    pub async fn admin_investment(&self, investment_id: i64) -> Result<Investment> {
        let response: ApiResponse<Investment> = self
            .connection
            .get(&format!("admin/investments/{investment_id}/"))
            .await?;
        Ok(response.into_data()?)
    }

    pub async fn force_payout(&self, investment_id: i64) -> Result<PayoutResult> {
        let response: ApiResponse<PayoutResult> = self
            .connection
            .post_no_body(&format!("admin/investments/{investment_id}/payout/"))
            .await?;
        Ok(response.into_data()?)
    }

    // -------------------------- Admin: transactions ---------------------------

    pub async fn admin_transactions(&self) -> Result<Vec<Transaction>> {
        let response: ApiResponse<Vec<Transaction>> =
            self.connection.get("admin/transactions").await?;
        Ok(response.into_data_or_default()?)
    }

    // ------------------------------ Admin: wallet -----------------------------

    pub async fn create_admin_wallet(&self, request: UpsertWalletRequest) -> Result<Wallet> {
        let response: ApiResponse<Wallet> = self.connection.post("admin/wallet/", &request).await?;
        Ok(response.into_data()?)
    }

    pub async fn update_admin_wallet(
        &self,
        request: UpdateWalletRequest,
    ) -> Result<Option<Wallet>> {
        let response: ApiResponse<Wallet> = self.connection.put("admin/wallet/", &request).await?;
        Ok(response.into_result()?)
    }

    /// Update-then-create upsert: the backend only hints via its error
    /// text whether the wallet exists yet.
    pub async fn upsert_admin_wallet(&self, request: UpsertWalletRequest) -> Result<Wallet> {
        let response: ApiResponse<Wallet> = self
            .connection
            .put(
                "admin/wallet/",
                &UpdateWalletRequest {
                    address: Some(request.address.clone()),
                    network: Some(request.network.clone()),
                },
            )
            .await?;

        if response.success {
            if let Some(wallet) = response.data {
                return Ok(wallet);
            }
        }

        let detail = response.error_text();
        if detail.to_lowercase().contains("not created") {
            return self.create_admin_wallet(request).await;
        }
        Err(eyre::eyre!(detail))
    }

    // ----------------------------- Admin: support -----------------------------

    pub async fn admin_support_tickets(&self) -> Result<Vec<SupportTicket>> {
        let response: ApiResponse<Vec<SupportTicket>> =
            self.connection.get("admin/support-tickets/").await?;
        Ok(response.into_data_or_default()?)
    }

    pub async fn update_admin_support_ticket(
        &self,
        ticket_id: i64,
        is_read: bool,
    ) -> Result<SupportTicket> {
        let response: ApiResponse<SupportTicket> = self
            .connection
            .put(
                &format!("admin/support-tickets/{ticket_id}/"),
                &UpdateTicketRequest { is_read },
            )
            .await?;
        Ok(response.into_data()?)
    }

    // ---------------------------- Admin: messages -----------------------------

    pub async fn create_message(&self, request: CreateMessageRequest) -> Result<Value> {
        let response: ApiResponse<Value> =
            self.connection.post("admin/messages/", &request).await?;
        Ok(response.into_data_or_default()?)
    }

    pub async fn message_recipients(&self) -> Result<Vec<MessageRecipient>> {
        let response: ApiResponse<Vec<MessageRecipient>> =
            self.connection.get("admin/message-recipients/").await?;
        Ok(response.into_data_or_default()?)
    }

    pub async fn message_recipient(&self, recipient_id: i64) -> Result<MessageRecipient> {
        let response: ApiResponse<MessageRecipient> = self
            .connection
            .get(&format!("admin/message-recipients/{recipient_id}"))
            .await?;
        Ok(response.into_data()?)
    }

    pub async fn approve_message_recipient(&self, recipient_id: i64) -> Result<ApprovedReward> {
        let response: ApiResponse<ApprovedReward> = self
            .connection
            .post_no_body(&format!("admin/message-recipients/{recipient_id}/approve/"))
            .await?;
        Ok(response.into_data()?)
    }

    pub async fn reject_message_recipient(
        &self,
        recipient_id: i64,
        notes: &str,
    ) -> Result<MessageRecipient> {
        let response: ApiResponse<MessageRecipient> = self
            .connection
            .post(
                &format!("admin/message-recipients/{recipient_id}/reject/"),
                &ReviewNotes::new(notes),
            )
            .await?;
        Ok(response.into_data()?)
    }
}
