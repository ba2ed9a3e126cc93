use crate::cli::{Cli, Command};
use anyhow::{bail, Context};
use kii_storage_core::{EventLog, PrivateInfoStorage, SnapshotLock, StoreConfig, StoreSnapshot};
use kii_storage_metrics::{InstrumentedStore, StoreMetrics};
use prometheus::Registry;
use serde_json::json;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// Executes one command against the snapshot at `cli.state`, writing JSON
/// lines to `out`.
pub fn run(cli: &Cli, out: &mut impl Write) -> anyhow::Result<()> {
    let metrics = StoreMetrics::new(Registry::new()).context("registering metrics")?;
    let log = EventLog::new();

    let outcome = execute(cli, &metrics, &log, &mut *out);

    // Events are only reported once the snapshot holding them is saved.
    if outcome.is_ok() {
        for record in log.records() {
            writeln!(out, "{}", serde_json::to_string(&record)?)?;
        }
    }
    if cli.metrics {
        write!(out, "{}", metrics.render().context("rendering metrics")?)?;
    }
    outcome
}

fn execute(
    cli: &Cli,
    metrics: &StoreMetrics,
    log: &EventLog,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let lock = SnapshotLock::acquire(&cli.state)
        .with_context(|| format!("locking snapshot {}", cli.state.display()))?;
    debug!(lock = %lock.path().display(), "snapshot lock held");

    match &cli.command {
        Command::Deploy { config, force } => deploy(cli, config, *force, metrics, out)?,
        Command::Authenticate { caller } => {
            let store = open(cli, log)?;
            let role = InstrumentedStore::new(&store, metrics).authenticate(caller)?;
            writeln!(out, "{}", json!({ "role": role, "code": role.code() }))?;
        }
        Command::Whitelist => {
            let store = open(cli, log)?;
            let whitelist = InstrumentedStore::new(&store, metrics).get_whitelist();
            writeln!(out, "{}", json!({ "whitelist": whitelist }))?;
        }
        Command::AddAddress { caller, address } => {
            let store = open(cli, log)?;
            InstrumentedStore::new(&store, metrics).add_address(caller, *address)?;
            save(&store, &cli.state)?;
        }
        Command::Get { caller } => {
            let store = open(cli, log)?;
            let value = InstrumentedStore::new(&store, metrics).get_kii_private_info(caller)?;
            writeln!(out, "{}", json!({ "kii_private_info": value }))?;
        }
        Command::Set { caller, value } => {
            let store = open(cli, log)?;
            InstrumentedStore::new(&store, metrics).set_kii_private_info(caller, value.as_str())?;
            save(&store, &cli.state)?;
        }
    }
    Ok(())
}

fn deploy(
    cli: &Cli,
    config: &Path,
    force: bool,
    metrics: &StoreMetrics,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    if cli.state.exists() && !force {
        bail!(
            "snapshot {} already exists, pass --force to replace it",
            cli.state.display()
        );
    }
    let cfg = StoreConfig::load(config)
        .with_context(|| format!("loading config {}", config.display()))?;
    let store = cfg.deploy().context("deploying store")?;
    metrics.observe_whitelist(&store);
    save(&store, &cli.state)?;
    info!(state = %cli.state.display(), owner = %store.owner(), "snapshot written");
    writeln!(
        out,
        "{}",
        json!({ "owner": store.owner(), "whitelist": store.get_whitelist() })
    )?;
    Ok(())
}

fn open(cli: &Cli, log: &EventLog) -> anyhow::Result<PrivateInfoStorage> {
    let snapshot = StoreSnapshot::load(&cli.state)
        .with_context(|| format!("loading snapshot {}", cli.state.display()))?;
    let store = PrivateInfoStorage::restore(snapshot).context("restoring store")?;
    Ok(store.with_sink(log.clone()))
}

fn save(store: &PrivateInfoStorage, path: &Path) -> anyhow::Result<()> {
    store
        .snapshot()
        .save(path)
        .with_context(|| format!("saving snapshot {}", path.display()))
}
