//! Escrow Scenario
//!
//! Runs the full escrow test sequence against a cluster:
//! 1. fund fee payer, maker and taker; create mint A and mint B; mint test tokens
//! 2. `make` an offer (deposit of A, asking for B)
//! 3. settle it with `take` or `refund` (or leave it open)
//! 4. verify the escrow closed and the tokens moved

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use solana_sdk::{pubkey::Pubkey, signature::Signature};
use thiserror::Error;

use super::harness::{EscrowHarness, HarnessError, MadeEscrow, TakenEscrow};
use crate::adapters::escrow_program::MakeArgs;
use crate::adapters::solana::Wallet;
use crate::config::{Config, Finish};
use crate::ports::LedgerPort;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Step '{step}' failed: {source}")]
    Step {
        step: String,
        #[source]
        source: HarnessError,
    },
    #[error("Verification failed: {0}")]
    Verification(String),
}

/// What the scenario submits after setup
#[derive(Debug, Clone)]
pub struct ScenarioPlan {
    pub seed: u64,
    pub deposit: u64,
    pub receive: u64,
    /// Whole tokens minted to maker (mint A) and taker (mint B)
    pub mint_amount: Decimal,
    pub finish: Finish,
    pub verify: bool,
}

impl Default for ScenarioPlan {
    fn default() -> Self {
        Self {
            seed: 1,
            deposit: 1,
            receive: 1,
            mint_amount: Decimal::TEN,
            finish: Finish::Take,
            verify: true,
        }
    }
}

impl From<&Config> for ScenarioPlan {
    fn from(config: &Config) -> Self {
        Self {
            seed: config.scenario.seed,
            deposit: config.scenario.deposit,
            receive: config.scenario.receive,
            mint_amount: config.scenario.mint_amount,
            finish: config.scenario.finish,
            verify: config.scenario.verify,
        }
    }
}

/// One submitted transaction
#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    pub step: String,
    pub signature: String,
    pub explorer: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Participants {
    pub fee_payer: String,
    pub maker: String,
    pub taker: String,
    pub mint_a: String,
    pub mint_b: String,
}

/// Summary of a scenario run, printed as JSON by the CLI
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub cluster: String,
    pub program_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub participants: Participants,
    pub escrow: String,
    pub vault: String,
    pub seed: u64,
    pub steps: Vec<StepRecord>,
    pub verified: bool,
}

pub struct EscrowScenario<L: LedgerPort> {
    harness: EscrowHarness<L>,
    plan: ScenarioPlan,
}

impl<L: LedgerPort> EscrowScenario<L> {
    pub fn new(harness: EscrowHarness<L>, plan: ScenarioPlan) -> Self {
        Self { harness, plan }
    }

    pub async fn run(&self) -> Result<ScenarioReport, ScenarioError> {
        let started_at = Utc::now();
        let mut steps = Vec::new();
        let plan = &self.plan;

        tracing::info!(
            "Escrow scenario on {} (program {}), seed {}",
            self.harness.settings().cluster,
            self.harness.settings().program_id,
            plan.seed
        );

        // before: signers, mints, balances
        let fee_payer = step("fund fee payer", self.harness.create_signer("fee payer")).await?;
        let maker = step("fund maker", self.harness.create_signer("maker")).await?;
        let taker = step("fund taker", self.harness.create_signer("taker")).await?;

        let mint_a = Wallet::generate("mint a");
        let mint_b = Wallet::generate("mint b");

        let sig = step("create mint A", self.harness.create_mint(&fee_payer, &mint_a, "Mint A")).await?;
        self.record(&mut steps, "create mint A", sig);
        let sig = step("create mint B", self.harness.create_mint(&fee_payer, &mint_b, "Mint B")).await?;
        self.record(&mut steps, "create mint B", sig);

        let sig = step(
            "mint A to maker",
            self.harness.mint_tokens(&fee_payer, &mint_a.pubkey(), &fee_payer, &maker.pubkey(), plan.mint_amount),
        )
        .await?;
        self.record(&mut steps, "mint A to maker", sig);

        if plan.finish == Finish::Take {
            let sig = step(
                "mint B to taker",
                self.harness.mint_tokens(&fee_payer, &mint_b.pubkey(), &fee_payer, &taker.pubkey(), plan.mint_amount),
            )
            .await?;
            self.record(&mut steps, "mint B to taker", sig);
        }

        // make
        let made = step(
            "make",
            self.harness.make(
                &maker,
                &mint_a.pubkey(),
                &mint_b.pubkey(),
                MakeArgs {
                    seed: plan.seed,
                    deposit: plan.deposit,
                    receive: plan.receive,
                },
            ),
        )
        .await?;
        self.record(&mut steps, "make", made.signature);

        // settle
        let mut verified = false;
        match plan.finish {
            Finish::Take => {
                let taken = step(
                    "take",
                    self.harness.take_offer(&taker, &made.maker, &made.addresses.escrow, &made.mint_a, &made.mint_b),
                )
                .await?;
                self.record(&mut steps, "take", taken.signature);
                if plan.verify {
                    self.verify_taken(&made, &taken).await?;
                    verified = true;
                }
            }
            Finish::Refund => {
                let sig = step(
                    "refund",
                    self.harness.refund_offer(&maker, &made.addresses.escrow, &made.mint_a),
                )
                .await?;
                self.record(&mut steps, "refund", sig);
                if plan.verify {
                    self.verify_closed(&made).await?;
                    verified = true;
                }
            }
            Finish::None => {
                tracing::info!("Leaving escrow {} open", made.addresses.escrow);
            }
        }

        let report = ScenarioReport {
            cluster: self.harness.settings().cluster.to_string(),
            program_id: self.harness.settings().program_id.to_string(),
            started_at,
            finished_at: Utc::now(),
            participants: Participants {
                fee_payer: fee_payer.pubkey().to_string(),
                maker: maker.pubkey().to_string(),
                taker: taker.pubkey().to_string(),
                mint_a: mint_a.pubkey().to_string(),
                mint_b: mint_b.pubkey().to_string(),
            },
            escrow: made.addresses.escrow.to_string(),
            vault: made.addresses.vault.to_string(),
            seed: plan.seed,
            steps,
            verified,
        };

        tracing::info!(
            "Escrow scenario finished: {} transaction(s) in {}ms",
            report.steps.len(),
            (report.finished_at - report.started_at).num_milliseconds()
        );
        Ok(report)
    }

    fn record(&self, steps: &mut Vec<StepRecord>, name: &str, signature: Signature) {
        steps.push(StepRecord {
            step: name.to_string(),
            signature: signature.to_string(),
            explorer: self.harness.settings().cluster.explorer_tx_link(signature),
        });
    }

    async fn verify_taken(&self, made: &MadeEscrow, taken: &TakenEscrow) -> Result<(), ScenarioError> {
        self.verify_closed(made).await?;

        let received_a = self.token_balance("taker ATA A", &taken.taker_ata_a).await?;
        if received_a < made.args.deposit {
            return Err(ScenarioError::Verification(format!(
                "taker holds {} of mint A, expected at least {}",
                received_a, made.args.deposit
            )));
        }

        let received_b = self.token_balance("maker ATA B", &taken.maker_ata_b).await?;
        if received_b < made.args.receive {
            return Err(ScenarioError::Verification(format!(
                "maker holds {} of mint B, expected at least {}",
                received_b, made.args.receive
            )));
        }

        tracing::info!("Take verified: taker received {} A, maker received {} B", received_a, received_b);
        Ok(())
    }

    async fn verify_closed(&self, made: &MadeEscrow) -> Result<(), ScenarioError> {
        for (name, address) in [("escrow", made.addresses.escrow), ("vault", made.addresses.vault)] {
            let data = self
                .harness
                .ledger()
                .account_data(&address)
                .await
                .map_err(|e| ScenarioError::Step {
                    step: format!("read {}", name),
                    source: e.into(),
                })?;
            if data.is_some() {
                return Err(ScenarioError::Verification(format!(
                    "{} account {} is still open",
                    name, address
                )));
            }
        }
        Ok(())
    }

    async fn token_balance(&self, name: &str, account: &Pubkey) -> Result<u64, ScenarioError> {
        self.harness
            .ledger()
            .token_balance(account)
            .await
            .map_err(|e| ScenarioError::Step {
                step: format!("read {}", name),
                source: e.into(),
            })
    }
}

/// Attach the step name to a failing harness call
async fn step<T>(
    name: &str,
    fut: impl std::future::Future<Output = Result<T, HarnessError>>,
) -> Result<T, ScenarioError> {
    fut.await.map_err(|source| {
        tracing::error!("Step '{}' failed: {}", name, source);
        ScenarioError::Step {
            step: name.to_string(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::harness::HarnessSettings;
    use crate::domain::Cluster;
    use crate::ports::MockLedger;
    use std::time::Duration;

    fn harness(ledger: MockLedger) -> EscrowHarness<MockLedger> {
        let mut settings = HarnessSettings::new(Pubkey::new_unique(), Cluster::Localnet);
        settings.airdrop_poll_interval = Duration::ZERO;
        EscrowHarness::new(ledger, settings)
    }

    #[tokio::test]
    async fn test_make_only_scenario() {
        let ledger = MockLedger::new();
        let plan = ScenarioPlan {
            finish: Finish::None,
            ..ScenarioPlan::default()
        };
        let scenario = EscrowScenario::new(harness(ledger.clone()), plan);

        let report = scenario.run().await.unwrap();

        let names: Vec<_> = report.steps.iter().map(|s| s.step.as_str()).collect();
        assert_eq!(names, vec!["create mint A", "create mint B", "mint A to maker", "make"]);
        assert_eq!(ledger.airdrops().len(), 3);
        assert!(!report.verified);
    }

    #[tokio::test]
    async fn test_step_error_names_step() {
        // 0: mint A, 1: mint B, 2: mint A to maker, 3: mint B to taker, 4: make
        let ledger = MockLedger::new().failing_send_at(4);
        let scenario = EscrowScenario::new(harness(ledger), ScenarioPlan::default());

        match scenario.run().await {
            Err(ScenarioError::Step { step, .. }) => assert_eq!(step, "make"),
            other => panic!("expected make to fail, got {:?}", other.map(|r| r.steps.len())),
        }
    }
}
