//! CLI Adapter
//!
//! Command-line interface for the escrow harness.
//! Uses clap derive macros for argument parsing.

mod commands;

pub use commands::{
    AirdropCmd, CliApp, Command, CreateMintCmd, FinishArg, MakeCmd, MintCmd, RefundCmd,
    ScenarioCmd, ShowCmd, TakeCmd,
};
