// Copyright (c) 2024 The Envprobe Authors
//
// SPDX-License-Identifier: Apache-2.0
//

//! Collect a host environment fingerprint, optionally sealed with RSA.

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use clap::{Args, Parser, Subcommand};
use crypto::rsa::{PrivateKey, PublicKey};
use envprobe::{EnvironmentProbe, EnvironmentReport, ReportFormat};
use log::{debug, info};

mod config;
mod seal;

use config::{load_config, GetterConfig, DEFAULT_CONFIG_PATH};

#[derive(Parser)]
#[command(name = "fingerprint-getter")]
#[command(bin_name = "fingerprint-getter")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    operation: Operation,

    /// Config file path for fingerprint getter
    #[arg(default_value_t = DEFAULT_CONFIG_PATH.to_string(), short, long = "config")]
    config: String,
}

#[derive(Subcommand)]
enum Operation {
    /// Collect the environment report and print it
    Collect(CollectArgs),

    /// Collect the environment report and encrypt it with the configured public key
    Seal,

    /// Decrypt a sealed report with the configured private key
    Unseal(UnsealArgs),
}

#[derive(Args)]
struct CollectArgs {
    /// Output encoding, `json` or `kv`. Overrides the config file.
    #[arg(short, long)]
    format: Option<ReportFormat>,

    /// Pretty print JSON output
    #[arg(short, long)]
    pretty: bool,
}

#[derive(Args)]
struct UnsealArgs {
    /// path to the file which contains the base64 encoded sealed report
    #[arg(short, long)]
    input: String,
}

fn collect() -> Result<EnvironmentReport> {
    let probe = EnvironmentProbe::native().context("initialize environment probe")?;
    Ok(probe.collect())
}

fn read_key(path: Option<&str>, name: &str) -> Result<Vec<u8>> {
    let path = path.with_context(|| format!("`keys.{name}` is not configured"))?;
    debug!("Reading {name} from {path}");
    std::fs::read(path).with_context(|| format!("read {name} {path}"))
}

fn run(operation: Operation, config: GetterConfig) -> Result<()> {
    match operation {
        Operation::Collect(args) => {
            let format = args.format.unwrap_or(config.format);
            let report = collect()?;
            println!("{}", report.encode(format, args.pretty || config.pretty)?);
        }
        Operation::Seal => {
            let pem = read_key(config.keys.public_key_path.as_deref(), "public_key_path")?;
            let public_key = PublicKey::from_pem(&pem).context("load sealing key")?;
            let report = collect()?.encode(config.format, config.pretty)?;
            let sealed = seal::seal(&public_key, config.keys.padding, report.as_bytes())?;
            info!(
                "Report sealed with {} into {} bytes",
                config.keys.padding,
                sealed.len()
            );
            println!("{}", STANDARD.encode(sealed));
        }
        Operation::Unseal(args) => {
            let pem = read_key(config.keys.private_key_path.as_deref(), "private_key_path")?;
            let private_key = PrivateKey::from_pem(&pem).context("load unsealing key")?;
            let encoded = std::fs::read_to_string(&args.input)
                .with_context(|| format!("read sealed report {}", args.input))?;
            let sealed = STANDARD
                .decode(encoded.trim())
                .context("base64 decode sealed report")?;
            let report = seal::unseal(&private_key, config.keys.padding, &sealed)?;
            println!("{}", String::from_utf8_lossy(&report));
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    debug!("Using config {}: {config:?}", cli.config);

    run(cli.operation, config)
}
