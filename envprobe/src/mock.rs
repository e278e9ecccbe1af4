// Copyright (c) 2024 The Envprobe Authors
//
// SPDX-License-Identifier: Apache-2.0
//

//! Simulated oracles for exercising the probe without touching the host.

use crate::arch::Architecture;
use crate::error::{ProbeError, Result};
use crate::oracle::*;
use crate::types::{CodePageKind, OsVersion};

/// Answers every facet with fixed values.
#[derive(Debug, Clone)]
pub struct MockOracle {
    architecture: Architecture,
    // `None` simulates a process that cannot be opened
    process_native_width: Option<bool>,
    elevated: bool,
    version: OsVersion,
    account_name: String,
    session_id: u32,
    code_page: u32,
}

impl Default for MockOracle {
    fn default() -> Self {
        Self {
            architecture: Architecture::X64,
            process_native_width: Some(true),
            elevated: false,
            version: OsVersion::new(10, 0, 19045),
            account_name: "HOST\\alice".to_string(),
            session_id: 1,
            code_page: 1252,
        }
    }
}

impl MockOracle {
    pub fn with_architecture(mut self, architecture: Architecture) -> Self {
        self.architecture = architecture;
        self
    }

    pub fn with_process_native_width(mut self, native_width: Option<bool>) -> Self {
        self.process_native_width = native_width;
        self
    }

    pub fn with_elevated(mut self, elevated: bool) -> Self {
        self.elevated = elevated;
        self
    }

    pub fn with_version(mut self, version: OsVersion) -> Self {
        self.version = version;
        self
    }

    pub fn with_account_name(mut self, account_name: impl Into<String>) -> Self {
        self.account_name = account_name.into();
        self
    }

    pub fn with_session_id(mut self, session_id: u32) -> Self {
        self.session_id = session_id;
        self
    }

    pub fn with_code_page(mut self, code_page: u32) -> Self {
        self.code_page = code_page;
        self
    }
}

impl ArchitectureOracle for MockOracle {
    fn native_architecture(&self) -> Result<Architecture> {
        Ok(self.architecture)
    }

    fn process_is_native_width(&self, pid: u32) -> Result<bool> {
        self.process_native_width
            .ok_or_else(|| ProbeError::AccessDenied(format!("open process {pid}")))
    }
}

impl PrivilegeOracle for MockOracle {
    fn token_elevated(&self) -> Result<bool> {
        Ok(self.elevated)
    }
}

impl VersionOracle for MockOracle {
    fn os_version(&self) -> Result<OsVersion> {
        Ok(self.version)
    }
}

impl IdentityOracle for MockOracle {
    fn account_name(&self) -> Result<String> {
        Ok(self.account_name.clone())
    }
}

impl SessionOracle for MockOracle {
    fn session_id(&self, _pid: u32) -> Result<u32> {
        Ok(self.session_id)
    }
}

impl CodePageOracle for MockOracle {
    fn code_page(&self, _kind: CodePageKind) -> Result<u32> {
        Ok(self.code_page)
    }
}

/// Fails every facet with the same error.
#[derive(Debug, Clone)]
pub struct FailingOracle {
    error: ProbeError,
}

impl FailingOracle {
    pub fn new(error: ProbeError) -> Self {
        Self { error }
    }
}

impl Default for FailingOracle {
    fn default() -> Self {
        Self::new(ProbeError::LookupFailed("mocked failure".to_string()))
    }
}

impl ArchitectureOracle for FailingOracle {
    fn native_architecture(&self) -> Result<Architecture> {
        Err(self.error.clone())
    }

    fn process_is_native_width(&self, _pid: u32) -> Result<bool> {
        Err(self.error.clone())
    }
}

impl PrivilegeOracle for FailingOracle {
    fn token_elevated(&self) -> Result<bool> {
        Err(self.error.clone())
    }
}

impl VersionOracle for FailingOracle {
    fn os_version(&self) -> Result<OsVersion> {
        Err(self.error.clone())
    }
}

impl IdentityOracle for FailingOracle {
    fn account_name(&self) -> Result<String> {
        Err(self.error.clone())
    }
}

impl SessionOracle for FailingOracle {
    fn session_id(&self, _pid: u32) -> Result<u32> {
        Err(self.error.clone())
    }
}

impl CodePageOracle for FailingOracle {
    fn code_page(&self, _kind: CodePageKind) -> Result<u32> {
        Err(self.error.clone())
    }
}
