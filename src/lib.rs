//! Off-chain settlement engine for best-of-N money matches.
//!
//! Two parties stake tokens on a series of games and report each game's winner by vote.
//! [`moneymatch`] turns those votes into an agreed score, a series winner or a frozen match,
//! [`engine`] drives it from ledger [`event`]s and hands payouts to the escrow collaborator.

pub mod address;
pub mod amount;
pub mod config;
pub mod engine;
pub mod event;
pub mod matches;
pub mod moneymatch;
pub mod report;
