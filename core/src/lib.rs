//! Core types and utilities for the Eagle lookup bot.
//!
//! This crate provides the foundational types used throughout Eagle:
//!
//! - **Identifiers**: `UserId`, `SessionId`
//! - **Accounts**: `UserAccount`
//! - **Envelope**: `UpstreamEnvelope`, the parsed Lookup Service response
//! - **Reports**: page construction and pagination math
//!
//! # Credit unit
//!
//! **1 credit = 1 search.** Balances are stored as `i64` and are never
//! observed negative: a debit that would underflow is rejected with
//! [`EagleError::InsufficientBalance`] before being applied.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod account;
pub mod envelope;
pub mod error;
pub mod ids;
pub mod report;

pub use account::UserAccount;
pub use envelope::{DatabaseSection, EnvelopeError, UpstreamEnvelope};
pub use error::{DenyReason, EagleError, Result};
pub use ids::{IdError, SessionId, UserId};
pub use report::{build_pages, wrap_page_index, PAGE_CHAR_LIMIT};
