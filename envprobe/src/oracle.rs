// Copyright (c) 2024 The Envprobe Authors
//
// SPDX-License-Identifier: Apache-2.0
//

//! Capability traits, one per environment facet.
//!
//! Every native backend implements the full set. The probe only talks to
//! these traits, so tests and non-reference platforms can swap any of them
//! without touching the aggregation logic.

use crate::arch::Architecture;
use crate::error::{ProbeError, Result};
use crate::types::{CodePageKind, OsVersion};

pub trait ArchitectureOracle {
    /// Native architecture of the OS, regardless of the caller's bitness.
    fn native_architecture(&self) -> Result<Architecture>;

    /// Whether the process `pid` runs with the native pointer width. Fails
    /// when the process cannot be opened or inspected.
    fn process_is_native_width(&self, pid: u32) -> Result<bool>;
}

pub trait PrivilegeOracle {
    /// Whether the current security context is elevated.
    fn token_elevated(&self) -> Result<bool>;
}

pub trait VersionOracle {
    fn os_version(&self) -> Result<OsVersion>;
}

pub trait IdentityOracle {
    /// Account name as reported by the OS, possibly `DOMAIN\user`.
    fn account_name(&self) -> Result<String>;
}

pub trait SessionOracle {
    fn session_id(&self, pid: u32) -> Result<u32>;
}

pub trait CodePageOracle {
    /// The system code page of the given kind.
    fn code_page(&self, kind: CodePageKind) -> Result<u32>;
}

pub type BoxedArchitectureOracle = Box<dyn ArchitectureOracle + Send + Sync>;
pub type BoxedPrivilegeOracle = Box<dyn PrivilegeOracle + Send + Sync>;
pub type BoxedVersionOracle = Box<dyn VersionOracle + Send + Sync>;
pub type BoxedIdentityOracle = Box<dyn IdentityOracle + Send + Sync>;
pub type BoxedSessionOracle = Box<dyn SessionOracle + Send + Sync>;
pub type BoxedCodePageOracle = Box<dyn CodePageOracle + Send + Sync>;

/// The full set of oracles consulted by an [`crate::EnvironmentProbe`].
pub struct HostOracles {
    pub(crate) architecture: BoxedArchitectureOracle,
    pub(crate) privilege: BoxedPrivilegeOracle,
    pub(crate) version: BoxedVersionOracle,
    pub(crate) identity: BoxedIdentityOracle,
    pub(crate) session: BoxedSessionOracle,
    pub(crate) code_page: BoxedCodePageOracle,
}

impl HostOracles {
    pub fn builder() -> HostOraclesBuilder {
        HostOraclesBuilder::default()
    }

    /// Use one backend for every facet.
    pub fn uniform<O>(oracle: O) -> Self
    where
        O: ArchitectureOracle
            + PrivilegeOracle
            + VersionOracle
            + IdentityOracle
            + SessionOracle
            + CodePageOracle
            + Clone
            + Send
            + Sync
            + 'static,
    {
        Self {
            architecture: Box::new(oracle.clone()),
            privilege: Box::new(oracle.clone()),
            version: Box::new(oracle.clone()),
            identity: Box::new(oracle.clone()),
            session: Box::new(oracle.clone()),
            code_page: Box::new(oracle),
        }
    }
}

#[derive(Default)]
pub struct HostOraclesBuilder {
    architecture: Option<BoxedArchitectureOracle>,
    privilege: Option<BoxedPrivilegeOracle>,
    version: Option<BoxedVersionOracle>,
    identity: Option<BoxedIdentityOracle>,
    session: Option<BoxedSessionOracle>,
    code_page: Option<BoxedCodePageOracle>,
}

fn required<T>(oracle: Option<T>, facet: &str) -> Result<T> {
    oracle.ok_or_else(|| ProbeError::UnsupportedPlatform(format!("{facet} oracle is required")))
}

impl HostOraclesBuilder {
    pub fn architecture(mut self, oracle: impl ArchitectureOracle + Send + Sync + 'static) -> Self {
        self.architecture = Some(Box::new(oracle));
        self
    }

    pub fn privilege(mut self, oracle: impl PrivilegeOracle + Send + Sync + 'static) -> Self {
        self.privilege = Some(Box::new(oracle));
        self
    }

    pub fn version(mut self, oracle: impl VersionOracle + Send + Sync + 'static) -> Self {
        self.version = Some(Box::new(oracle));
        self
    }

    pub fn identity(mut self, oracle: impl IdentityOracle + Send + Sync + 'static) -> Self {
        self.identity = Some(Box::new(oracle));
        self
    }

    pub fn session(mut self, oracle: impl SessionOracle + Send + Sync + 'static) -> Self {
        self.session = Some(Box::new(oracle));
        self
    }

    pub fn code_page(mut self, oracle: impl CodePageOracle + Send + Sync + 'static) -> Self {
        self.code_page = Some(Box::new(oracle));
        self
    }

    pub fn build(self) -> Result<HostOracles> {
        Ok(HostOracles {
            architecture: required(self.architecture, "architecture")?,
            privilege: required(self.privilege, "privilege")?,
            version: required(self.version, "version")?,
            identity: required(self.identity, "identity")?,
            session: required(self.session, "session")?,
            code_page: required(self.code_page, "code page")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{FailingOracle, MockOracle};

    #[test]
    fn test_builder_mixes_backends() {
        let oracles = HostOracles::builder()
            .architecture(MockOracle::default().with_architecture(Architecture::Arm64))
            .privilege(FailingOracle::default())
            .version(MockOracle::default())
            .identity(MockOracle::default())
            .session(MockOracle::default())
            .code_page(MockOracle::default())
            .build()
            .unwrap();

        assert_eq!(
            oracles.architecture.native_architecture().unwrap(),
            Architecture::Arm64
        );
        assert!(oracles.privilege.token_elevated().is_err());
    }

    #[test]
    fn test_builder_missing_oracle() {
        let res = HostOracles::builder()
            .architecture(MockOracle::default())
            .privilege(MockOracle::default())
            .version(MockOracle::default())
            .identity(MockOracle::default())
            .code_page(MockOracle::default())
            .build();

        match res {
            Err(ProbeError::UnsupportedPlatform(msg)) => assert!(msg.contains("session")),
            _ => panic!("building without a session oracle must fail"),
        }
    }
}
