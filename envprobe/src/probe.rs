// Copyright (c) 2024 The Envprobe Authors
//
// SPDX-License-Identifier: Apache-2.0
//

use log::{debug, info, warn};

use crate::arch::{Architecture, ProcessArchitecture};
use crate::error::Result;
use crate::oracle::HostOracles;
use crate::platform;
use crate::report::{EnvironmentReport, ReportFields};
use crate::types::{CodePageKind, UTF8_CODE_PAGE};

/// Placeholder for code pages that could not be queried.
const CODE_PAGE_SENTINEL: [u8; 2] = [0, 0];

/// Strip a `DOMAIN\` or `HOST\` prefix from an account name.
pub fn strip_account_prefix(account: &str) -> &str {
    account.rsplit('\\').next().unwrap_or(account)
}

/// Queries the host one facet at a time, or all at once through
/// [`EnvironmentProbe::collect`].
///
/// Single-facet calls propagate their failure, except where a fail-closed
/// answer is part of the contract (`is_elevated`, `session_id`,
/// `is_process_architecture_match`).
pub struct EnvironmentProbe {
    oracles: HostOracles,
}

impl EnvironmentProbe {
    pub fn new(oracles: HostOracles) -> Self {
        Self { oracles }
    }

    /// Probe backed by the native oracles of the compile target.
    pub fn native() -> Result<Self> {
        Ok(Self::new(platform::native_oracles()?))
    }

    pub fn native_architecture(&self) -> Result<Architecture> {
        self.oracles.architecture.native_architecture()
    }

    pub fn process_architecture(&self) -> ProcessArchitecture {
        ProcessArchitecture::current()
    }

    pub fn is_os_64bit(&self) -> Result<bool> {
        Ok(self.native_architecture()?.is_64bit())
    }

    /// Whether the process `pid` has the same bitness as the OS.
    ///
    /// When the process cannot be inspected the answer for the current
    /// process is returned instead.
    pub fn is_process_architecture_match(&self, pid: u32) -> bool {
        match self.oracles.architecture.process_is_native_width(pid) {
            Ok(matches) => matches,
            Err(e) => {
                debug!("cannot inspect process {pid} ({e}), using the current process instead");
                self.current_process_matches_native()
            }
        }
    }

    fn current_process_matches_native(&self) -> bool {
        let process_bits = self.process_architecture().bits();
        match self.native_architecture().map(|arch| arch.bits()) {
            Ok(Some(native_bits)) => native_bits == process_bits,
            Ok(None) => {
                warn!("native architecture is unknown, assuming the process matches it");
                true
            }
            Err(e) => {
                warn!("native architecture unavailable ({e}), assuming the process matches it");
                true
            }
        }
    }

    /// Fail-closed: any error while querying the token yields `false`.
    pub fn is_elevated(&self) -> bool {
        self.oracles.privilege.token_elevated().unwrap_or_else(|e| {
            warn!("elevation query failed, reporting not elevated: {e}");
            false
        })
    }

    pub fn os_version(&self) -> Result<String> {
        Ok(self.oracles.version.os_version()?.to_string())
    }

    /// Bare account name of the current user.
    pub fn username(&self) -> Result<String> {
        let account = self.oracles.identity.account_name()?;
        Ok(strip_account_prefix(&account).to_string())
    }

    /// Session of process `pid`, `0` when the lookup fails.
    pub fn session_id(&self, pid: u32) -> u32 {
        self.lookup_session_id(pid).unwrap_or_else(|e| {
            warn!("session lookup for process {pid} failed, reporting 0: {e}");
            0
        })
    }

    pub fn lookup_session_id(&self, pid: u32) -> Result<u32> {
        self.oracles.session.session_id(pid)
    }

    /// Little-endian code page identifier of the given kind.
    ///
    /// The system value is only used to verify the query works; the result
    /// is always UTF-8 (65001).
    pub fn code_page(&self, kind: CodePageKind) -> Result<[u8; 2]> {
        let system = self.oracles.code_page.code_page(kind)?;
        debug!("system {kind} code page is {system}, reporting {UTF8_CODE_PAGE}");
        Ok(UTF8_CODE_PAGE.to_le_bytes())
    }

    /// Query every facet. Never fails; facets that error are replaced by
    /// their sentinel values.
    pub fn collect(&self) -> EnvironmentReport {
        let report = EnvironmentReport::new(ReportFields {
            architecture: or_sentinel("native architecture", self.native_architecture()),
            is_elevated: self.is_elevated(),
            os_version_string: or_sentinel("os version", self.os_version()),
            username: or_sentinel("username", self.username()),
            session_id: self.session_id(std::process::id()),
            ansi_code_page: or_code_page_sentinel(self.code_page(CodePageKind::Ansi)),
            oem_code_page: or_code_page_sentinel(self.code_page(CodePageKind::Oem)),
        });
        info!(
            "Environment collected: {} OS, {} process, elevated: {}",
            report.architecture(),
            report.process_architecture(),
            report.is_elevated()
        );
        report
    }
}

fn or_sentinel<T: Default>(facet: &str, res: Result<T>) -> T {
    res.unwrap_or_else(|e| {
        warn!("{facet} unavailable: {e}");
        T::default()
    })
}

fn or_code_page_sentinel(res: Result<[u8; 2]>) -> [u8; 2] {
    res.unwrap_or_else(|e| {
        warn!("code page unavailable: {e}");
        CODE_PAGE_SENTINEL
    })
}
