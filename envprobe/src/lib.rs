// Copyright (c) 2024 The Envprobe Authors
//
// SPDX-License-Identifier: Apache-2.0
//

//! A library for fingerprinting the host environment.
//!
//! The probe queries the local operating system for its native architecture,
//! the privilege level and identity of the current user, the login session,
//! the OS version and the legacy code pages, and folds the answers into an
//! [`EnvironmentReport`].
//!
//! Every facet is served by its own oracle trait (see [`oracle`]). A failing
//! facet never aborts the others: [`EnvironmentProbe::collect`] substitutes a
//! documented sentinel and always returns a complete report.
//!
//! # Platform Support
//! - **Windows**: reference backend, resolves `kernel32` exports once into a
//!   `NativeLibraries` registry.
//! - **Unix**: `uname`, the passwd database, `getsid` and procfs.
//!
//! # Example
//! ```no_run
//! use envprobe::{EnvironmentProbe, ReportFormat};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let probe = EnvironmentProbe::native()?;
//!     let report = probe.collect();
//!     println!("{}", report.encode(ReportFormat::Kv, false)?);
//!     Ok(())
//! }
//! ```

pub mod arch;
pub mod error;
pub mod mock;
pub mod oracle;
pub mod platform;
mod probe;
pub mod report;
pub mod types;

pub use arch::{Architecture, ProcessArchitecture};
pub use error::{ProbeError, Result};
pub use oracle::HostOracles;
pub use probe::{strip_account_prefix, EnvironmentProbe};
pub use report::{EnvironmentReport, ReportFormat};
pub use types::{CodePageKind, OsVersion, UTF8_CODE_PAGE};
