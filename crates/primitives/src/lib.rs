//! Shared request/response types for the InvestPro backend API.
//!
//! Every endpoint of the backend wraps its payload in the same envelope
//! (see [`ApiResponse`]); the remaining modules mirror the REST contract
//! one domain at a time. These types are plain data: no I/O, no client
//! logic, usable from any transport.

pub mod auth;
pub mod deposit;
pub mod kyc;
pub mod message;
pub mod pack;
pub mod response;
pub mod support;
pub mod transaction;
pub mod user;
pub mod wallet;
pub mod withdrawal;

pub use response::{ApiError, ApiResponse, Empty};
