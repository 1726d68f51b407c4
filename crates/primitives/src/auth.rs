//! Authentication payloads for both scopes, plus the OTP-based password
//! reset flow.

use serde::{Deserialize, Serialize};

use crate::user::User;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Successful login: a fresh token pair and, for customers, the profile.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LoginData {
    pub access: String,
    pub refresh: String,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub country: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referral_code: Option<String>,
}

/// Logout revokes the refresh token server-side.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LogoutRequest {
    pub refresh: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SendResetOtpRequest {
    pub email: String,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct OtpSent {
    pub sent: bool,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct VerifyResetOtpRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct OtpVerified {
    pub verified: bool,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ChangePasswordRequest {
    pub email: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct PasswordChanged {
    pub changed: bool,
}
