//! InvestPro Client Library
//!
//! Client-side building blocks for the InvestPro platform: a
//! scope-partitioned token store, an HTTP connection with transparent
//! bearer-auth and 401 refresh-and-retry handling, and a typed API
//! surface over the backend's REST contract.
//!
//! ## Features
//!
//! - **Dual scopes**: customer and admin sessions hold independent
//!   token state and fail independently
//! - **Pluggable storage**: token persistence behind a small trait,
//!   with in-memory and JSON-file implementations included
//! - **Silent refresh**: a 401 triggers at most one refresh-and-retry
//!   cycle before the scope is logged out
//! - **Unauthorized events**: forced logouts are broadcast to
//!   subscribers instead of being handled in-band
//!
//! ## Quick Start
//!
//! ```no_run
//! use investpro_client::{api_url_from_env, Client, MemoryTokenStorage};
//! use investpro_primitives::auth::LoginRequest;
//!
//! # async fn run() -> eyre::Result<()> {
//! let client = Client::customer(api_url_from_env()?, MemoryTokenStorage::new());
//!
//! let session = client
//!     .login(LoginRequest::new("user@example.com", "hunter2"))
//!     .await?;
//! client.store_session(&session).await?;
//!
//! let profile = client.profile().await?;
//! println!("balance: {:?}", profile.balance);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod connection;
pub mod errors;
pub mod events;
pub mod storage;
pub mod tokens;

// Re-export main types for easy access
pub use client::{Client, KycDocument, KycSubmission};
pub use config::{
    api_url_from_env, AccessTokenExtractor, ConnectionConfig, API_URL_ENV,
    CUSTOMER_PUBLIC_PATHS, DEFAULT_API_URL, REFRESH_ENDPOINT,
};
pub use connection::ConnectionInfo;
pub use errors::ClientError;
pub use events::{AuthEvents, UnauthorizedEvent};
pub use eyre::Result;
pub use storage::{FileTokenStorage, MemoryTokenStorage, StorageError, TokenStorage};
pub use tokens::{TokenScope, TokenStore};
// Re-export common types
pub use url::Url;

/// Current version of the client library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
