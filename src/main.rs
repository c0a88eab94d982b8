//! Escrow Harness
//!
//! End-to-end driver for the escrow program on a Solana cluster.

use anyhow::{bail, Context, Result};
use clap::Parser;
use solana_sdk::{native_token::LAMPORTS_PER_SOL, pubkey::Pubkey};
use std::path::Path;
use std::str::FromStr;
use tracing_subscriber::{fmt, EnvFilter};

use escrow_harness::adapters::cli::{
    AirdropCmd, CliApp, Command, CreateMintCmd, MakeCmd, MintCmd, RefundCmd, ScenarioCmd,
    ShowCmd, TakeCmd,
};
use escrow_harness::adapters::escrow_program::MakeArgs;
use escrow_harness::adapters::solana::{SolanaClient, Wallet};
use escrow_harness::application::{EscrowHarness, EscrowScenario, HarnessSettings, ScenarioPlan};
use escrow_harness::config::{load_config, Config, SignerSource};
use escrow_harness::domain::{escrow_address, to_base_units, to_ui_amount};

type Harness = EscrowHarness<SolanaClient>;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (secrets go here, not in the config file)
    dotenvy::dotenv().ok();

    let app = CliApp::parse();

    let config = load_config(&app.config)
        .with_context(|| format!("Failed to load configuration from {}", app.config.display()))?;
    init_logging(app.verbose, app.debug, &config.logging.level)?;

    let mut settings = HarnessSettings::from_config(&config).context("Invalid configuration")?;
    if let Some(program) = app.token_program {
        settings.token.program = program;
    }
    let solana = SolanaClient::with_commitment(
        settings.cluster.rpc_url().to_string(),
        config.cluster.commitment_config()?,
    );
    tracing::info!("Cluster {} ({})", settings.cluster, solana.url());
    let harness = EscrowHarness::new(solana, settings);

    let run = async {
        match app.command {
            Command::Scenario(cmd) => scenario_command(harness, &config, cmd).await,
            Command::Airdrop(cmd) => airdrop_command(&harness, cmd).await,
            Command::CreateMint(cmd) => create_mint_command(&harness, &config, cmd).await,
            Command::Mint(cmd) => mint_command(&harness, &config, cmd).await,
            Command::Make(cmd) => make_command(&harness, &config, cmd).await,
            Command::Take(cmd) => take_command(&harness, &config, cmd).await,
            Command::Refund(cmd) => refund_command(&harness, &config, cmd).await,
            Command::Show(cmd) => show_command(&harness, cmd).await,
        }
    };

    tokio::select! {
        result = run => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Shutdown signal received");
            bail!("Interrupted")
        }
    }
}

/// `--debug` / `--verbose` win, then RUST_LOG, then the config level
fn init_logging(verbose: bool, debug: bool, config_level: &str) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config_level))
    };

    fmt().with_env_filter(filter).with_target(false).init();
    Ok(())
}

async fn scenario_command(harness: Harness, config: &Config, cmd: ScenarioCmd) -> Result<()> {
    let mut plan = ScenarioPlan::from(config);
    if let Some(seed) = cmd.seed {
        plan.seed = seed;
    } else if cmd.random_seed {
        plan.seed = rand::random::<u64>();
    }
    if let Some(finish) = cmd.finish {
        plan.finish = finish.into();
    }
    if cmd.no_verify {
        plan.verify = false;
    }

    let report = EscrowScenario::new(harness, plan)
        .run()
        .await
        .context("Escrow scenario failed")?;

    let json = serde_json::to_string_pretty(&report)?;
    match cmd.report {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            println!("Report written to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

async fn airdrop_command(harness: &Harness, cmd: AirdropCmd) -> Result<()> {
    let address = parse_pubkey(&cmd.address, "address")?;
    let lamports = to_base_units(cmd.sol, 9).context("Invalid SOL amount")?;

    let signature = harness.fund(&address, lamports).await?;
    let balance = harness_balance(harness, &address).await?;

    println!("Airdropped {} SOL to {}", cmd.sol, address);
    println!("Signature: {}", signature);
    println!("Balance: {} lamports ({:.4} SOL)", balance, balance as f64 / LAMPORTS_PER_SOL as f64);
    Ok(())
}

async fn harness_balance(harness: &Harness, address: &Pubkey) -> Result<u64> {
    use escrow_harness::ports::LedgerPort;
    harness
        .ledger()
        .balance(address)
        .await
        .context("Failed to get balance")
}

async fn create_mint_command(harness: &Harness, config: &Config, cmd: CreateMintCmd) -> Result<()> {
    let payer = load_wallet("payer", cmd.payer.as_deref(), config)?;
    let mint = Wallet::generate("mint");
    if let Some(path) = &cmd.save_mint {
        mint.save_to_file(path)
            .with_context(|| format!("Failed to save mint keypair to {}", path.display()))?;
    }

    let signature = harness.create_mint(&payer, &mint, &cmd.name).await?;

    println!("Mint: {}", mint.pubkey());
    println!("Explorer: {}", harness.settings().cluster.explorer_tx_link(signature));
    Ok(())
}

async fn mint_command(harness: &Harness, config: &Config, cmd: MintCmd) -> Result<()> {
    let authority = load_wallet("mint authority", cmd.authority.as_deref(), config)?;
    let mint = parse_pubkey(&cmd.mint, "mint")?;
    let owner = parse_pubkey(&cmd.owner, "owner")?;

    let signature = harness
        .mint_tokens(&authority, &mint, &authority, &owner, cmd.amount)
        .await?;

    println!("Minted {} to {}", cmd.amount, owner);
    println!("Explorer: {}", harness.settings().cluster.explorer_tx_link(signature));
    Ok(())
}

async fn make_command(harness: &Harness, config: &Config, cmd: MakeCmd) -> Result<()> {
    let maker = load_wallet("maker", cmd.maker.as_deref(), config)?;
    let mint_a = parse_pubkey(&cmd.mint_a, "mint A")?;
    let mint_b = parse_pubkey(&cmd.mint_b, "mint B")?;

    let made = harness
        .make(
            &maker,
            &mint_a,
            &mint_b,
            MakeArgs {
                seed: cmd.seed,
                deposit: cmd.deposit,
                receive: cmd.receive,
            },
        )
        .await?;

    println!("Escrow: {}", made.addresses.escrow);
    println!("Vault: {}", made.addresses.vault);
    println!("Explorer: {}", harness.settings().cluster.explorer_tx_link(made.signature));
    Ok(())
}

async fn take_command(harness: &Harness, config: &Config, cmd: TakeCmd) -> Result<()> {
    let taker = load_wallet("taker", cmd.taker.as_deref(), config)?;
    let maker = parse_pubkey(&cmd.maker, "maker")?;

    let taken = harness.take(&taker, &maker, cmd.seed).await?;

    println!("Taken by {}", taker.pubkey());
    println!("Explorer: {}", harness.settings().cluster.explorer_tx_link(taken.signature));
    Ok(())
}

async fn refund_command(harness: &Harness, config: &Config, cmd: RefundCmd) -> Result<()> {
    let maker = load_wallet("maker", cmd.maker.as_deref(), config)?;

    let signature = harness.refund(&maker, cmd.seed).await?;

    println!("Refunded escrow seed {} to {}", cmd.seed, maker.pubkey());
    println!("Explorer: {}", harness.settings().cluster.explorer_tx_link(signature));
    Ok(())
}

async fn show_command(harness: &Harness, cmd: ShowCmd) -> Result<()> {
    let maker = parse_pubkey(&cmd.maker, "maker")?;
    let (escrow, _) = escrow_address(&harness.settings().program_id, &maker, cmd.seed);

    match harness.fetch_escrow(&maker, cmd.seed).await? {
        Some(state) => {
            let decimals = harness.settings().token.decimals;
            println!("Escrow: {}", escrow);
            println!("  seed:    {}", state.seed);
            println!("  maker:   {}", state.maker);
            println!("  mint A:  {}", state.mint_a);
            println!("  mint B:  {}", state.mint_b);
            println!(
                "  receive: {} ({} tokens at {} decimals)",
                state.receive,
                to_ui_amount(state.receive, decimals)?,
                decimals
            );
            println!("  bump:    {}", state.bump);
            println!("  {}", harness.settings().cluster.explorer_address_link(escrow));
        }
        None => println!("No escrow at {} (closed or never made)", escrow),
    }
    Ok(())
}

fn parse_pubkey(value: &str, what: &str) -> Result<Pubkey> {
    Pubkey::from_str(value.trim()).with_context(|| format!("Invalid {} address: {}", what, value))
}

/// Load a signer from an explicit path, ESCROW_SECRET_KEY (base58), or the config keypair
fn load_wallet(label: &str, explicit: Option<&Path>, config: &Config) -> Result<Wallet> {
    let path = match config.wallet.signer_source(explicit) {
        Some(SignerSource::Base58(secret)) => {
            return Wallet::from_base58(label, &secret)
                .context("ESCROW_SECRET_KEY is not a valid base58 keypair");
        }
        Some(SignerSource::File(path)) => path,
        None => bail!(
            "No {} keypair given.\n\n\
             Pass --{} <FILE>, set ESCROW_KEYPAIR_PATH, or set [wallet] keypair_path in the config.\n\
             To create one, run:\n  solana-keygen new --outfile ~/.config/solana/id.json",
            label,
            label.replace(' ', "-")
        ),
    };

    if !path.exists() {
        bail!(
            "Wallet file not found: {}\n\n\
             To create a new wallet, run:\n  \
             solana-keygen new --outfile {}",
            path.display(),
            path.display()
        );
    }

    Wallet::from_file(label, &path)
        .with_context(|| format!("Failed to load {} keypair from {}", label, path.display()))
}
