// Copyright (c) 2024 The Envprobe Authors
//
// SPDX-License-Identifier: Apache-2.0
//

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProbeError>;

/// Failure of a single environment facet.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// A required native entry point does not exist on this OS/build.
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// The calling process lacks rights to open a handle or token.
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// A process id, account or other target could not be resolved.
    #[error("lookup failed: {0}")]
    LookupFailed(String),
}

impl ProbeError {
    pub(crate) fn from_io(context: &str, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => {
                Self::AccessDenied(format!("{context}: {err}"))
            }
            _ => Self::LookupFailed(format!("{context}: {err}")),
        }
    }

    #[cfg(unix)]
    pub(crate) fn from_errno(context: &str, errno: nix::errno::Errno) -> Self {
        use nix::errno::Errno;

        match errno {
            Errno::EPERM | Errno::EACCES => Self::AccessDenied(format!("{context}: {errno}")),
            _ => Self::LookupFailed(format!("{context}: {errno}")),
        }
    }

    #[cfg(windows)]
    pub(crate) fn from_win32(context: &str, err: windows::core::Error) -> Self {
        if err.code() == windows::Win32::Foundation::E_ACCESSDENIED {
            Self::AccessDenied(format!("{context}: {err}"))
        } else {
            Self::LookupFailed(format!("{context}: {err}"))
        }
    }
}
