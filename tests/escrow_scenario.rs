//! Escrow Scenario Integration Tests
//!
//! Drives the full make/take and make/refund flows through the public API:
//! 1. EscrowHarness + MockLedger: signers, mints, make, settlement
//! 2. ScenarioReport contents and JSON shape
//! 3. Failure propagation and post-settlement verification
//!
//! Everything except the `#[ignore]`d localnet test runs without a network.

use std::str::FromStr;
use std::time::Duration;

use regex::Regex;
use rust_decimal_macros::dec;
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};

use escrow_harness::adapters::solana::SolanaClient;
use escrow_harness::application::{
    EscrowHarness, EscrowScenario, HarnessSettings, ScenarioError, ScenarioPlan,
};
use escrow_harness::config::Finish;
use escrow_harness::domain::discriminator::instruction_discriminator;
use escrow_harness::domain::{associated_token_address, escrow_address, Cluster};
use escrow_harness::ports::MockLedger;

// ============================================================================
// Test Fixtures
// ============================================================================

fn program_id() -> Pubkey {
    Pubkey::from_str("22222222222222222222222222222222222222222222").unwrap()
}

fn fast_settings() -> HarnessSettings {
    let mut settings = HarnessSettings::new(program_id(), Cluster::Localnet);
    settings.airdrop_poll_interval = Duration::ZERO;
    settings.airdrop_max_polls = 5;
    settings
}

fn scenario(ledger: &MockLedger, plan: ScenarioPlan) -> EscrowScenario<MockLedger> {
    EscrowScenario::new(EscrowHarness::new(ledger.clone(), fast_settings()), plan)
}

// ============================================================================
// Take Flow
// ============================================================================

#[tokio::test]
async fn test_take_scenario_submits_every_step_in_order() {
    let ledger = MockLedger::new().with_default_token_balance(1);
    let report = scenario(&ledger, ScenarioPlan::default()).run().await.unwrap();

    let names: Vec<_> = report.steps.iter().map(|s| s.step.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "create mint A",
            "create mint B",
            "mint A to maker",
            "mint B to taker",
            "make",
            "take"
        ]
    );
    assert!(report.verified);
    assert_eq!(report.seed, 1);

    // fee payer, maker, taker
    assert_eq!(ledger.airdrops().len(), 3);
    assert!(ledger.airdrops().iter().all(|(_, lamports)| *lamports == 5_000_000_000));
}

#[tokio::test]
async fn test_take_scenario_signers_and_addresses() {
    let ledger = MockLedger::new().with_default_token_balance(1);
    let report = scenario(&ledger, ScenarioPlan::default()).run().await.unwrap();

    let maker = Pubkey::from_str(&report.participants.maker).unwrap();
    let taker = Pubkey::from_str(&report.participants.taker).unwrap();
    let fee_payer = Pubkey::from_str(&report.participants.fee_payer).unwrap();
    let mint_a = Pubkey::from_str(&report.participants.mint_a).unwrap();

    let (escrow, _) = escrow_address(&program_id(), &maker, 1);
    assert_eq!(report.escrow, escrow.to_string());
    assert_eq!(
        report.vault,
        associated_token_address(&escrow, &mint_a, &spl_token_2022::ID).to_string()
    );

    let sent = ledger.sent_transactions();
    assert_eq!(sent.len(), 6);

    // mint creation is co-signed by the new mint account
    assert_eq!(sent[0].message.account_keys[0], fee_payer);
    assert_eq!(sent[0].message.header.num_required_signatures, 2);

    let make = &sent[4];
    assert_eq!(make.message.account_keys[0], maker);
    assert_eq!(make.message.header.num_required_signatures, 1);
    assert_eq!(make.message.instructions[0].data[..8], instruction_discriminator("make"));

    let take = &sent[5];
    assert_eq!(take.message.account_keys[0], taker);
    assert_eq!(take.message.instructions[0].data, instruction_discriminator("take").to_vec());

    // every transaction carries the blockhash fetched for it
    assert!(sent.iter().all(|tx| tx.message.recent_blockhash == ledger.blockhash()));
    assert_eq!(report.steps[5].signature, take.signatures[0].to_string());
}

#[tokio::test]
async fn test_report_serializes_to_json() {
    let ledger = MockLedger::new().with_default_token_balance(10);
    let report = scenario(&ledger, ScenarioPlan::default()).run().await.unwrap();

    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["cluster"], "localnet");
    assert_eq!(value["program_id"], program_id().to_string());
    assert_eq!(value["steps"].as_array().unwrap().len(), 6);
    assert_eq!(value["verified"], true);
    assert!(value["started_at"].is_string());
    assert!(value["participants"]["taker"].is_string());
}

#[tokio::test]
async fn test_explorer_links_point_at_local_validator() {
    let ledger = MockLedger::new().with_default_token_balance(1);
    let report = scenario(&ledger, ScenarioPlan::default()).run().await.unwrap();

    let link = Regex::new(
        r"^https://explorer\.solana\.com/tx/[1-9A-HJ-NP-Za-km-z]{64,88}\?cluster=custom&customUrl=http%3A%2F%2Flocalhost%3A8899$",
    )
    .unwrap();
    for step in &report.steps {
        assert!(link.is_match(&step.explorer), "bad link for {}: {}", step.step, step.explorer);
        assert!(step.explorer.contains(&step.signature));
    }
}

#[tokio::test]
async fn test_take_verification_fails_when_tokens_did_not_move() {
    let ledger = MockLedger::new().with_default_token_balance(0);
    let result = scenario(&ledger, ScenarioPlan::default()).run().await;

    match result {
        Err(ScenarioError::Verification(msg)) => assert!(msg.contains("mint A"), "{}", msg),
        other => panic!("expected verification failure, got {:?}", other.map(|r| r.verified)),
    }
}

#[tokio::test]
async fn test_no_verify_skips_balance_reads() {
    // no token balances seeded: any balance read would fail
    let ledger = MockLedger::new();
    let plan = ScenarioPlan {
        verify: false,
        ..ScenarioPlan::default()
    };

    let report = scenario(&ledger, plan).run().await.unwrap();

    assert!(!report.verified);
    assert_eq!(report.steps.len(), 6);
}

// ============================================================================
// Refund Flow
// ============================================================================

#[tokio::test]
async fn test_refund_scenario() {
    let ledger = MockLedger::new();
    let plan = ScenarioPlan {
        seed: 77,
        deposit: 5,
        mint_amount: dec!(1),
        finish: Finish::Refund,
        ..ScenarioPlan::default()
    };

    let report = scenario(&ledger, plan).run().await.unwrap();

    let names: Vec<_> = report.steps.iter().map(|s| s.step.as_str()).collect();
    // the taker is never funded with mint B
    assert_eq!(names, vec!["create mint A", "create mint B", "mint A to maker", "make", "refund"]);
    assert!(report.verified);
    assert_eq!(report.seed, 77);

    let maker = Pubkey::from_str(&report.participants.maker).unwrap();
    let sent = ledger.sent_transactions();
    let refund = &sent[4];
    assert_eq!(refund.message.account_keys[0], maker);
    assert_eq!(refund.message.instructions[0].data, instruction_discriminator("refund").to_vec());

    let instruction_counts: Vec<_> = sent.iter().map(|tx| tx.message.instructions.len()).collect();
    assert_eq!(instruction_counts, vec![4, 4, 2, 1, 1]);
}

// ============================================================================
// Failure Propagation
// ============================================================================

#[tokio::test]
async fn test_failed_take_names_the_step() {
    let ledger = MockLedger::new().failing_send_at(5);
    let result = scenario(&ledger, ScenarioPlan::default()).run().await;

    match result {
        Err(ScenarioError::Step { step, source }) => {
            assert_eq!(step, "take");
            assert!(source.to_string().contains("custom program error"));
        }
        other => panic!("expected take to fail, got {:?}", other.map(|r| r.steps.len())),
    }
    assert_eq!(ledger.sent_transactions().len(), 5);
}

#[tokio::test]
async fn test_airdrop_timeout_stops_before_any_transaction() {
    let ledger = MockLedger::new().with_pending_polls(100);
    let result = scenario(&ledger, ScenarioPlan::default()).run().await;

    match result {
        Err(ScenarioError::Step { step, .. }) => assert_eq!(step, "fund fee payer"),
        other => panic!("expected funding to time out, got {:?}", other.map(|r| r.steps.len())),
    }
    assert!(ledger.sent_transactions().is_empty());
}

// ============================================================================
// Local Validator
// ============================================================================

#[tokio::test]
#[ignore = "requires solana-test-validator with the escrow program deployed (set ESCROW_PROGRAM_ID)"]
async fn test_localnet_take_scenario() {
    let program_id = std::env::var("ESCROW_PROGRAM_ID")
        .map(|id| Pubkey::from_str(&id).unwrap())
        .unwrap_or_else(|_| program_id());

    let cluster = Cluster::Localnet;
    let client = SolanaClient::with_commitment(
        cluster.rpc_url().to_string(),
        CommitmentConfig::confirmed(),
    );
    let harness = EscrowHarness::new(client, HarnessSettings::new(program_id, cluster));

    let report = EscrowScenario::new(harness, ScenarioPlan::default())
        .run()
        .await
        .unwrap();

    assert!(report.verified);
    assert_eq!(report.steps.len(), 6);
}
