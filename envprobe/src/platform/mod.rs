// Copyright (c) 2024 The Envprobe Authors
//
// SPDX-License-Identifier: Apache-2.0
//

//! Native oracle backends. Windows is the reference target; Unix hosts get
//! an equivalent backed by `uname`, the passwd database and procfs.

#[cfg(unix)]
pub mod unix;

#[cfg(windows)]
pub mod windows;

use crate::error::Result;
use crate::oracle::HostOracles;

#[cfg(windows)]
pub fn native_oracles() -> Result<HostOracles> {
    let libraries = self::windows::NativeLibraries::load()?;
    Ok(HostOracles::uniform(self::windows::WindowsOracle::new(
        std::sync::Arc::new(libraries),
    )))
}

#[cfg(unix)]
pub fn native_oracles() -> Result<HostOracles> {
    Ok(HostOracles::uniform(self::unix::UnixOracle::default()))
}

#[cfg(not(any(unix, windows)))]
pub fn native_oracles() -> Result<HostOracles> {
    Err(crate::error::ProbeError::UnsupportedPlatform(format!(
        "no native oracles for {}",
        std::env::consts::OS
    )))
}
