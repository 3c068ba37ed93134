//! Eagle: a chat front end to the Lookup Service, gated by a credit ledger.
//!
//! Event flow: the polling loop pulls gateway updates, normalizes them into
//! [`events::InboundEvent`]s, and hands each one to the
//! [`router::SessionRouter`], which runs it to completion before the next
//! event is considered. Search text goes through the
//! [`dispatch::QueryDispatcher`] (gate → debit → lookup → cache or refund);
//! everything else is a direct ledger read or admin mutation.

#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cache;
pub mod config;
pub mod dispatch;
pub mod events;
pub mod gate;
pub mod gateway;
pub mod keyboards;
pub mod ledger;
pub mod messages;
pub mod router;
pub mod state;

pub use config::{BotConfig, GroupCheck};
pub use router::SessionRouter;
pub use state::AppState;
