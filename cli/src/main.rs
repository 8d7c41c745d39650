//! attest command line.
//!
//! Compiles a TOML verification manifest against the standard predicates and
//! runs every entry through the verification engine.
//!
//! Usage:
//!   attest check --manifest verify.toml
//!   attest check --manifest verify.toml --testing
//!   attest check --manifest verify.toml --assume fail --journal-json
//!   attest explain --manifest verify.toml
//!   attest predicates

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use attest_contracts::{
    config::RunConfig,
    error::{AttestError, AttestResult},
    host::Phase,
};
use attest_core::{traits::Delivery, Predicates, VerificationEngine};
use attest_delivery::{LocalShellDelivery, Reply, ScriptedDelivery};
use attest_journal::InMemoryJournal;
use attest_manifest::Manifest;

// ── CLI definition ────────────────────────────────────────────────────────────

/// attest: declarative state verification for provisioned hosts.
#[derive(Parser)]
#[command(
    name = "attest",
    about = "Compile and run state verifications",
    long_about = "Compiles [[verify]] entries from a TOML manifest into shell predicates\n\
                  and checks them against their host groups. Any failing entry halts the run."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every manifest entry and halt at the first failure.
    Check(CheckArgs),
    /// Print the commands each manifest entry compiles to.
    Explain {
        /// Path to the TOML manifest.
        #[arg(long, short)]
        manifest: PathBuf,
    },
    /// List the registered predicates and the module that owns each.
    Predicates,
}

#[derive(Args)]
struct CheckArgs {
    /// Path to the TOML manifest.
    #[arg(long, short)]
    manifest: PathBuf,

    /// Dry run: report every entry as skipped without running anything.
    #[arg(long)]
    testing: bool,

    /// Log predicate output and the dispatched command batches.
    #[arg(long, short)]
    verbose: bool,

    /// Run commands through `sudo -n`.
    #[arg(long)]
    sudo: bool,

    /// Answer every entry from a script instead of running commands.
    #[arg(long, value_enum)]
    assume: Option<Assume>,

    /// Print the journal as JSON when the run ends.
    #[arg(long)]
    journal_json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Assume {
    Pass,
    Fail,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Check(args) => check(args),
        Command::Explain { manifest } => {
            init_tracing(false);
            explain(&manifest)
        }
        Command::Predicates => {
            init_tracing(false);
            list_predicates()
        }
    };

    if let Err(e) = result {
        eprintln!("attest: {}", e);
        std::process::exit(1);
    }
}

/// Structured logging. `RUST_LOG` wins; otherwise `info`, or `debug` when
/// verbose.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_target(false)
        .compact()
        .init();
}

fn standard_predicates() -> AttestResult<Predicates> {
    Ok(attest_predicates::standard()?.seal())
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn check(args: CheckArgs) -> AttestResult<()> {
    let manifest = Manifest::from_file(&args.manifest)?;
    let config = merge(manifest.run_config(), &args);
    init_tracing(config.verbose);

    let compiled = manifest.compile(&standard_predicates()?)?;

    let delivery: Box<dyn Delivery> = match args.assume {
        Some(Assume::Pass) => Box::new(ScriptedDelivery::new(Reply::Pass)),
        Some(Assume::Fail) => Box::new(ScriptedDelivery::new(Reply::Fail)),
        None => Box::new(
            LocalShellDelivery::new()
                .with_sudo(args.sudo)
                .with_verbose(config.verbose),
        ),
    };
    let journal = InMemoryJournal::new();
    let engine = VerificationEngine::new(delivery.as_ref(), config).with_journal(&journal);

    info!(
        run_id = %engine.run_id(),
        entries = compiled.len(),
        testing = config.testing,
        "starting verification run"
    );

    let result = compiled
        .iter()
        .try_for_each(|c| engine.process(&c.spec, &c.hosts, Phase::Post).map(|_| ()));

    let log = journal.export();
    println!(
        "{} passed, {} failed, {} skipped",
        log.summary.passed, log.summary.failed, log.summary.skipped
    );
    if args.journal_json {
        let json = serde_json::to_string_pretty(&log).map_err(|e| AttestError::ConfigError {
            reason: format!("failed to serialize journal: {}", e),
        })?;
        println!("{}", json);
    }

    result
}

/// CLI flags can only switch behaviour on; the manifest's `[run]` table
/// supplies the rest. `force` only matters to install pipelines, so `check`
/// has no flag for it.
fn merge(run: RunConfig, args: &CheckArgs) -> RunConfig {
    RunConfig {
        testing: run.testing || args.testing,
        verbose: run.verbose || args.verbose,
        force: run.force,
    }
}

fn explain(path: &Path) -> AttestResult<()> {
    let manifest = Manifest::from_file(path)?;
    for compiled in manifest.compile(&standard_predicates()?)? {
        println!("{} [{}]", compiled.spec.description(), compiled.hosts);
        for command in compiled.spec.commands() {
            println!("  {}", command);
        }
    }
    Ok(())
}

fn list_predicates() -> AttestResult<()> {
    let predicates = standard_predicates()?;
    for name in predicates.names() {
        println!("{:<18} {}", name, predicates.owner(name).unwrap_or("-"));
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
