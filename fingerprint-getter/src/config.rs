// Copyright (c) 2024 The Envprobe Authors
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Context, Result};
use crypto::rsa::PaddingMode;
use envprobe::ReportFormat;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/envprobe/fingerprint-getter.toml";

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct GetterConfig {
    /// Encoding of printed and sealed reports
    #[serde(default)]
    pub format: ReportFormat,

    /// Pretty print JSON reports
    #[serde(default)]
    pub pretty: bool,

    #[serde(default)]
    pub keys: KeyConfig,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct KeyConfig {
    /// PEM public key used to seal reports
    pub public_key_path: Option<String>,

    /// PEM private key used to unseal reports
    pub private_key_path: Option<String>,

    #[serde(default)]
    pub padding: PaddingMode,
}

pub fn load_config(path: &str) -> Result<GetterConfig> {
    let settings = ::config::Config::builder()
        .add_source(::config::File::with_name(path).required(false))
        .build()
        .context(format!("failed to load fingerprint getter config: {}", path))?;

    let cfg: GetterConfig = settings
        .try_deserialize()
        .context("failed to deserialize fingerprint getter config")?;

    Ok(cfg)
}
