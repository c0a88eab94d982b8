//! Ports Layer - Trait definitions for external dependencies
//!
//! Following hexagonal architecture, the cluster is reached only through
//! `LedgerPort`, so the escrow flow can run against RPC or an in-memory mock.

pub mod ledger;
pub mod mocks;

pub use ledger::{LedgerError, LedgerPort};
pub use mocks::MockLedger;
