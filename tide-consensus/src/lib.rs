//! Implementation of Tide consensus checks.
//!
//! This crate decides whether transactions may be admitted into the chain
//! state:
//!
//! - [`transaction::fee`] enforces minimum fees, fee sponsorship, and the
//!   rules for accounts with scripts,
//! - [`transaction::check`] enforces feature activation and checks
//!   transaction payloads, including account scripts,
//! - [`block`] validates the transactions of a block in order, against a
//!   [`ChainState`] snapshot.
//!
//! Structural validity is enforced by the definitions of data structures in
//! `tide-chain`, and script compilation by `tide-script`.

#![allow(clippy::try_err)]
#![forbid(unsafe_code)]

pub mod block;
pub mod config;
pub mod error;
pub mod state;
pub mod transaction;

pub use block::{check_transactions_parallel, validate_block};
pub use config::{Config, Settings};
pub use state::{BlockDiff, ChainState, MemoryState, PendingState, StateChange};
pub use transaction::{check_transaction, fee::check_fee};
