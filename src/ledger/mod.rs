//! The expense and revenue ledgers.
//!
//! Every mutation to a ledger entry is mirrored by a signed adjustment to
//! the owning user's balance, and every read is scoped to the owner.

pub mod balance;
pub mod domain;
pub mod http;
pub mod services;
