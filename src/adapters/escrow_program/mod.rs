//! Escrow Program Client
//!
//! Builders for the escrow program's `make`, `take` and `refund` instructions.
//! The program itself is deployed separately; its id comes from configuration.

pub mod instructions;

pub use instructions::{
    make, refund, take, EscrowInstructionError, MakeAccounts, MakeArgs, RefundAccounts,
    TakeAccounts,
};
