use crate::cli::Cli;
use crate::run::run;
use clap::Parser;
use kii_storage_core::{StoreError, StoreSnapshot};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::thread;
use tempfile::TempDir;

const OWNER: &str = "0x5ec605060d810669fd7134494c4af17ab438cc92";
const WALLET: &str = "0xcaf3415f37b557554b56283845b4e9924620e809";
const STRANGER: &str = "0x00000000000000000000000000000000000000aa";

struct Workspace {
    _dir: TempDir,
    state: PathBuf,
    config: PathBuf,
}

fn workspace() -> Workspace {
    let dir = tempfile::tempdir().unwrap();
    let state = dir.path().join("state.json");
    let config = dir.path().join("deploy.json");
    std::fs::write(
        &config,
        format!(
            r#"{{"owner": "{OWNER}", "kii_private_info": "Private phrase", "wallets": ["{WALLET}"]}}"#
        ),
    )
    .unwrap();
    Workspace {
        _dir: dir,
        state,
        config,
    }
}

fn invoke(state: &Path, args: &[&str]) -> (anyhow::Result<()>, Vec<Value>) {
    let mut argv = vec!["kii-storage", "--state", state.to_str().unwrap()];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).unwrap();
    let mut out = Vec::new();
    let result = run(&cli, &mut out);
    let lines = String::from_utf8(out)
        .unwrap()
        .lines()
        .filter(|l| l.starts_with('{'))
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    (result, lines)
}

fn deployed() -> Workspace {
    let ws = workspace();
    let (result, lines) = invoke(&ws.state, &["deploy", "--config", ws.config.to_str().unwrap()]);
    result.unwrap();
    assert_eq!(lines[0]["whitelist"][0], OWNER);
    assert_eq!(lines[0]["whitelist"][1], WALLET);
    ws
}

#[test]
fn deploy_writes_snapshot() {
    let ws = deployed();
    let snapshot = StoreSnapshot::load(&ws.state).unwrap();
    assert_eq!(snapshot.owner.to_string(), OWNER);
    assert_eq!(snapshot.kii_private_info, "Private phrase");
    assert_eq!(snapshot.whitelist.len(), 2);
}

#[test]
fn deploy_refuses_to_overwrite_without_force() {
    let ws = deployed();
    let config = ws.config.to_str().unwrap();
    let (result, _) = invoke(&ws.state, &["deploy", "--config", config]);
    assert!(result.is_err());
    let (result, _) = invoke(&ws.state, &["deploy", "--config", config, "--force"]);
    result.unwrap();
}

#[test]
fn authenticate_reports_role_codes() {
    let ws = deployed();
    let (result, lines) = invoke(&ws.state, &["authenticate", "--caller", OWNER]);
    result.unwrap();
    assert_eq!(lines[0]["code"], 0);

    let (result, lines) = invoke(&ws.state, &["authenticate", "--caller", WALLET]);
    result.unwrap();
    assert_eq!(lines[0]["code"], 1);

    let (result, _) = invoke(&ws.state, &["authenticate", "--caller", STRANGER]);
    let err = result.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<StoreError>(),
        Some(StoreError::AddressNotWhitelisted(_))
    ));
}

#[test]
fn set_persists_and_prints_event() {
    let ws = deployed();
    let (result, lines) = invoke(
        &ws.state,
        &["set", "--caller", OWNER, "--value", "New private phrase"],
    );
    result.unwrap();
    assert_eq!(lines[0]["event"]["type"], "KiiPrivateInfoUpdated");
    assert_eq!(lines[0]["event"]["kii_private_info"], "New private phrase");

    let (result, lines) = invoke(&ws.state, &["get", "--caller", WALLET]);
    result.unwrap();
    assert_eq!(lines[0]["kii_private_info"], "New private phrase");
}

#[test]
fn rejected_mutation_leaves_snapshot_untouched() {
    let ws = deployed();
    let before = StoreSnapshot::load(&ws.state).unwrap();
    let (result, lines) = invoke(
        &ws.state,
        &["add-address", "--caller", WALLET, "--address", STRANGER],
    );
    let err = result.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<StoreError>(),
        Some(StoreError::NotOwner(_))
    ));
    assert!(lines.is_empty());
    assert_eq!(StoreSnapshot::load(&ws.state).unwrap(), before);
}

#[test]
fn add_address_extends_whitelist() {
    let ws = deployed();
    let (result, lines) = invoke(
        &ws.state,
        &["add-address", "--caller", OWNER, "--address", STRANGER],
    );
    result.unwrap();
    assert_eq!(lines[0]["event"]["type"], "AddedAddress");
    assert_eq!(lines[0]["event"]["address"], STRANGER);

    let (result, lines) = invoke(&ws.state, &["whitelist"]);
    result.unwrap();
    assert_eq!(lines[0]["whitelist"][2], STRANGER);
}

#[test]
fn concurrent_adds_persist_every_reported_event() {
    for _ in 0..5 {
        let ws = deployed();
        let handles: Vec<_> = (1..=8)
            .map(|i| {
                let state = ws.state.clone();
                thread::spawn(move || {
                    let address = format!("0x{i:040x}");
                    invoke(
                        &state,
                        &["add-address", "--caller", OWNER, "--address", &address],
                    )
                })
            })
            .collect();

        let mut reported = Vec::new();
        for handle in handles {
            let (result, lines) = handle.join().unwrap();
            result.unwrap();
            for line in lines {
                assert_eq!(line["event"]["type"], "AddedAddress");
                reported.push(line["event"]["address"].as_str().unwrap().to_string());
            }
        }

        let snapshot = StoreSnapshot::load(&ws.state).unwrap();
        let persisted: Vec<String> = snapshot.whitelist.iter().map(|a| a.to_string()).collect();
        assert_eq!(reported.len(), 8);
        assert_eq!(persisted.len(), 10);
        for address in &reported {
            assert!(persisted.contains(address), "{address} reported but not saved");
        }
    }
}

#[test]
fn metrics_flag_appends_exposition() {
    let ws = deployed();
    let argv = [
        "kii-storage",
        "--state",
        ws.state.to_str().unwrap(),
        "--metrics",
        "get",
        "--caller",
        STRANGER,
    ];
    let cli = Cli::try_parse_from(argv).unwrap();
    let mut out = Vec::new();
    assert!(run(&cli, &mut out).is_err());
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains(
        "kii_storage_calls_total{operation=\"get_kii_private_info\",outcome=\"AddressNotWhitelisted\"} 1"
    ));
}

#[test]
fn invalid_caller_address_is_a_parse_error() {
    let result = Cli::try_parse_from(["kii-storage", "get", "--caller", "0x1234"]);
    assert!(result.is_err());
}
