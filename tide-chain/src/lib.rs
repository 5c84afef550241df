//! Core Tide data structures.
//!
//! This crate provides definitions of core data structures for Tide, such as
//! accounts, assets, transactions, and the blockchain features that switch
//! consensus rules on at specific heights.
//!
//! It also contains the consensus-critical serialization traits used by the
//! transaction and script formats.

// Standard lints
#![warn(missing_docs)]
#![allow(clippy::try_err)]
#![deny(clippy::await_holding_lock)]
#![forbid(unsafe_code)]

#[macro_use]
extern crate serde;

pub mod account;
pub mod amount;
pub mod asset;
pub mod block;
pub mod parameters;
pub mod primitives;
pub mod serialization;
pub mod transaction;
