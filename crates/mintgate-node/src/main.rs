//! mintgate: operator CLI for a MintGate ledger.
//!
//! Every command opens the state database under `--data-dir`, does its work
//! through the state engine or a read-only query, and exits. Calls are read
//! from a JSON batch file and applied one at a time, each committed or
//! rejected on its own.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing::{info, warn};

use mintgate_core::event::EventRecord;
use mintgate_core::operation::{Call, Operation};
use mintgate_core::permission::Permission;
use mintgate_core::records::EmissionChannel;
use mintgate_core::types::{AccountId, Timestamp};
use mintgate_genesis::{apply_genesis, GenesisParams};
use mintgate_state::{LedgerQuery, StateDb, StateEngine};

// ── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "mintgate",
    version,
    about = "MintGate permissioned ledger with time-budgeted emission"
)]
struct Args {
    /// Directory for the persistent state database.
    #[arg(long, global = true, default_value = "~/.mintgate/data")]
    data_dir: PathBuf,

    /// Unix timestamp to use instead of the system clock.
    #[arg(long, global = true)]
    now: Option<Timestamp>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new ledger.
    Init {
        /// Genesis params JSON.
        #[arg(long)]
        params: Option<PathBuf>,
        /// Owner account (base-58 or @label). Overrides the params file.
        #[arg(long)]
        owner: Option<String>,
    },

    /// Apply a JSON array of calls, in order.
    Apply {
        file: PathBuf,
        /// Abort at the first rejected call instead of continuing.
        #[arg(long)]
        stop_on_error: bool,
    },

    /// Print owner, supply, emission channels and permission locks.
    Status,

    /// Print an account's balance and permissions.
    Balance {
        /// Account (base-58 or @label).
        account: String,
    },

    /// Print audit events as JSON lines.
    Events {
        /// First sequence number to print.
        #[arg(long, default_value_t = 0)]
        since: u64,
    },

    /// Print the account id derived from a label.
    Account { label: String },
}

/// One entry of a batch file. `at` overrides the timestamp for this call.
#[derive(Debug, Deserialize)]
struct BatchEntry {
    caller: AccountId,
    operation: Operation,
    #[serde(default)]
    at: Option<Timestamp>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,mintgate=debug")),
        )
        .init();

    let args = Args::parse();

    if let Command::Account { label } = &args.command {
        println!("{}", AccountId::derive(label));
        return Ok(());
    }

    // ── State database ────────────────────────────────────────────────────────
    let data_dir = expand_tilde(&args.data_dir);
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data dir {}", data_dir.display()))?;
    let db = Arc::new(StateDb::open(&data_dir).context("opening state database")?);

    match args.command {
        Command::Init { params, owner } => {
            let mut genesis = load_genesis_params(params.as_deref(), owner.as_deref())?;
            if let Some(o) = owner {
                genesis.owner = parse_account(&o)?;
            }
            let now = args.now.unwrap_or_else(host_now);
            let summary = apply_genesis(&db, &genesis, now).context("applying genesis")?;
            println!("Ledger initialised.");
            println!("Owner:        {}", summary.owner);
            println!("Total supply: {}", summary.total_supply);
            println!("Started at:   {}", summary.started_at);
            Ok(())
        }

        Command::Apply { file, stop_on_error } => {
            let json = std::fs::read_to_string(&file)
                .with_context(|| format!("reading calls from {}", file.display()))?;
            let batch: Vec<BatchEntry> =
                serde_json::from_str(&json).context("parsing call batch JSON")?;
            cmd_apply(Arc::clone(&db), batch, args.now, stop_on_error)?;
            db.flush().context("flushing state database")?;
            Ok(())
        }

        Command::Status => {
            let now = args.now.unwrap_or_else(host_now);
            cmd_status(&db, now)
        }

        Command::Balance { account } => {
            let id = parse_account(&account)?;
            let q = LedgerQuery::new(&db);
            let held: Vec<String> = q
                .permissions_of(&id)?
                .into_iter()
                .map(|p| p.to_string())
                .collect();
            println!("Account:     {}", id);
            println!("Balance:     {}", q.balance(&id)?);
            println!("Permissions: {}", if held.is_empty() { "-".to_string() } else { held.join(", ") });
            Ok(())
        }

        Command::Events { since } => {
            for record in db.events_since(since)? {
                println!("{}", event_line(&record)?);
            }
            Ok(())
        }

        Command::Account { .. } => Ok(()),
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn cmd_apply(
    db: Arc<StateDb>,
    batch: Vec<BatchEntry>,
    now_override: Option<Timestamp>,
    stop_on_error: bool,
) -> anyhow::Result<()> {
    let engine = StateEngine::new(db);
    let (mut applied, mut rejected) = (0usize, 0usize);

    for (i, entry) in batch.into_iter().enumerate() {
        let now = entry.at.or(now_override).unwrap_or_else(host_now);
        let call = Call::new(entry.caller, entry.operation);
        let label = call.operation.label();

        match engine.apply(&call, now) {
            Ok(receipt) => {
                applied += 1;
                println!("ok       #{i} {label} {} ({} events)", receipt.call_id, receipt.events.len());
                if let Some(plan) = receipt.distribution {
                    println!(
                        "         paid {} recipients, total {}, skipped {}",
                        plan.payouts.len(),
                        plan.total,
                        plan.skipped
                    );
                }
            }
            Err(e) => {
                rejected += 1;
                warn!(index = i, op = label, kind = ?e.kind(), error = %e, "call rejected");
                println!("rejected #{i} {label}: {e}");
                if stop_on_error {
                    return Err(e).with_context(|| format!("call #{i} ({label}) rejected"));
                }
            }
        }
    }

    info!(applied, rejected, "batch complete");
    println!("Applied: {applied}, rejected: {rejected}");
    Ok(())
}

fn cmd_status(db: &StateDb, now: Timestamp) -> anyhow::Result<()> {
    let q = LedgerQuery::new(db);
    let token = db.get_token_info().context("reading token info (is the ledger initialised?)")?;
    let staking = q.staking()?;

    println!("Token:        {} ({}, {} decimals)", token.name, token.symbol, token.decimals);
    println!("Owner:        {}", q.owner()?);
    println!("Total supply: {}", q.total_supply()?);
    println!(
        "Staking:      {} -> {}",
        if staking.active { "active" } else { "inactive" },
        staking.staking_address.map(|a| a.to_string()).unwrap_or_else(|| "-".into())
    );
    println!("As of:        {} ({})", now, format_timestamp(now));

    println!();
    for channel in EmissionChannel::ALL {
        let s = q.emission(channel)?;
        println!(
            "{:<8} rate {}/s  cap {}  last claim {}  mintable {}",
            channel,
            s.rate_per_second,
            s.cap,
            s.last_claim,
            q.mintable(channel, now)?
        );
    }

    println!();
    for permission in Permission::ALL {
        println!("{}", q.describe_lock(permission, now)?);
    }
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn load_genesis_params(path: Option<&Path>, owner: Option<&str>) -> anyhow::Result<GenesisParams> {
    if let Some(p) = path {
        let json = std::fs::read_to_string(p)
            .with_context(|| format!("reading genesis params from {}", p.display()))?;
        return GenesisParams::from_json(&json).context("parsing genesis params JSON");
    }
    let owner = owner.context("either --params or --owner is required")?;
    Ok(GenesisParams::for_owner(parse_account(owner)?))
}

/// `@label` derives an account from the label; anything else is base-58.
fn parse_account(s: &str) -> anyhow::Result<AccountId> {
    match s.strip_prefix('@') {
        Some(label) => Ok(AccountId::derive(label)),
        None => AccountId::from_b58(s).map_err(|e| anyhow::anyhow!("invalid account {s}: {e}")),
    }
}

fn event_line(record: &EventRecord) -> anyhow::Result<String> {
    serde_json::to_string(record).context("encoding event")
}

/// Host clock, read once per call.
fn host_now() -> Timestamp {
    chrono::Utc::now().timestamp()
}

fn format_timestamp(ts: Timestamp) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "out of range".into())
}

/// Expand a leading `~` to the user's home directory (`HOME` or `USERPROFILE`).
fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Ok(home) = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE")) {
            return PathBuf::from(home).join(stripped);
        }
    }
    path.to_path_buf()
}
