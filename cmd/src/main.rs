//! Demo server binary wiring the core crate end to end: load a zone master
//! file, optionally load signing keys and build a denial-of-existence
//! database, then serve UDP and TCP on the configured address. Out of core
//! scope per spec.md §1/§4.L — this exists only so the crate is runnable.

use anyhow::{Context, Result};
use rsdns::keys::KeyStore;
use rsdns::server::{Server, ZoneState};
use rsdns::signer::Signer;
use rsdns::zone::master_file;
use rsdns::zone::{nsec3_db::NSEC3_HASH_SHA1, Nsec3Db, NsecDb};
use rsdns::dns::{name::Name, CLASS_IN};
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;

struct Args {
    bind: String,
    zone_file: String,
    origin: String,
    keys_file: Option<String>,
    nsec3: bool,
    threads: usize,
    log_level: String,
}

fn parse_args() -> Result<Args> {
    let mut bind = "127.0.0.1:5300".to_string();
    let mut zone_file = None;
    let mut origin = None;
    let mut keys_file = None;
    let mut nsec3 = false;
    let mut threads = 4usize;
    let mut log_level = "info".to_string();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--bind" => bind = args.next().context("--bind requires a value")?,
            "--zone" => zone_file = Some(args.next().context("--zone requires a value")?),
            "--origin" => origin = Some(args.next().context("--origin requires a value")?),
            "--keys" => keys_file = Some(args.next().context("--keys requires a value")?),
            "--nsec3" => nsec3 = true,
            "--thread" => {
                threads = args
                    .next()
                    .context("--thread requires a value")?
                    .parse()
                    .context("--thread must be a number")?
            }
            "--log-level" => log_level = args.next().context("--log-level requires a value")?,
            other => anyhow::bail!("unrecognized argument {other:?}"),
        }
    }

    Ok(Args {
        bind,
        zone_file: zone_file.context("--zone <path> is required")?,
        origin: origin.context("--origin <apex> is required")?,
        keys_file,
        nsec3,
        threads,
        log_level,
    })
}

fn run() -> Result<()> {
    let args = parse_args()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(args.log_level.clone()))
        .init();

    let apex = Name::from_presentation(&args.origin).context("invalid --origin domain name")?;
    let zone_text = std::fs::read_to_string(&args.zone_file)
        .with_context(|| format!("reading zone file {:?}", args.zone_file))?;
    let mut zone =
        master_file::load(&zone_text, apex.clone(), CLASS_IN).context("parsing zone master file")?;
    zone.verify().context("zone failed structural validation")?;
    tracing::info!(apex = %apex, nodes = zone.nodes().len(), "zone loaded");

    let signer = match &args.keys_file {
        Some(path) => {
            let yaml = std::fs::read_to_string(path).with_context(|| format!("reading key config {path:?}"))?;
            let keys = KeyStore::load(&yaml).context("loading key configuration")?;
            tracing::info!(keys = keys.iter().count(), "signing keys loaded");
            Some(Signer::new(keys))
        }
        None => None,
    };

    let nsec = (signer.is_some() && !args.nsec3).then(|| NsecDb::build(&zone));
    let nsec3 = (signer.is_some() && args.nsec3)
        .then(|| Nsec3Db::build(&zone, NSEC3_HASH_SHA1, 0, 10, vec![0xAB, 0xCD, 0xEF, 0x01]));

    let state = ZoneState {
        zone,
        nsec,
        nsec3,
        signer,
    };
    let server = Arc::new(Server::new(state, args.threads.max(1)));

    let tcp_server = Arc::clone(&server);
    let tcp_bind = args.bind.clone();
    let tcp_handle = thread::Builder::new()
        .name("rsdns-tcp-accept".to_string())
        .spawn(move || tcp_server.serve_tcp(&tcp_bind))
        .expect("failed to spawn tcp accept thread");

    server.serve_udp(&args.bind).context("udp accept loop failed")?;
    tcp_handle
        .join()
        .expect("tcp accept thread panicked")
        .context("tcp accept loop failed")
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("rsdns: {err:#}");
            ExitCode::FAILURE
        }
    }
}
