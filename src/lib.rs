//! Escrow Harness Library
//!
//! Drives a deployed escrow program end to end on a Solana cluster: funds fresh
//! signers, creates test token mints, derives the escrow PDA and vault, and
//! submits make/take/refund transactions.
//!
//! # Modules
//!
//! - `domain`: Pure values (cluster links, PDAs, amounts, escrow account layout)
//! - `ports`: `LedgerPort` abstraction over the cluster, plus an in-memory mock
//! - `adapters`: External implementations (RPC, wallets, token and escrow instructions, CLI)
//! - `config`: Configuration loading and validation
//! - `application`: Harness steps and the end-to-end scenario

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod config;
pub mod application;
