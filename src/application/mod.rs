//! Application Layer - Escrow test flows
//!
//! - `harness`: single steps (fund, create mint, mint, make, take, refund)
//! - `scenario`: the full make/take sequence with verification and a report

pub mod harness;
pub mod scenario;

pub use harness::{EscrowHarness, HarnessError, HarnessSettings, MadeEscrow, TakenEscrow, TokenSettings};
pub use scenario::{EscrowScenario, ScenarioError, ScenarioPlan, ScenarioReport, StepRecord};
