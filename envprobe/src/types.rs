// Copyright (c) 2024 The Envprobe Authors
//
// SPDX-License-Identifier: Apache-2.0
//

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Code page identifier of UTF-8.
pub const UTF8_CODE_PAGE: u16 = 65001;

/// Which of the two legacy code pages to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr, Display)]
#[strum(serialize_all = "lowercase")]
pub enum CodePageKind {
    Ansi,
    Oem,
}

/// Operating system version, rendered as `major.minor.build`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OsVersion {
    pub major: u32,
    pub minor: u32,
    pub build: u32,
}

impl OsVersion {
    pub fn new(major: u32, minor: u32, build: u32) -> Self {
        Self {
            major,
            minor,
            build,
        }
    }

    /// Parse a kernel release such as `6.6.31-cloudlinux` or `23.4.0`.
    ///
    /// Only the leading dotted numeric run is used. Missing minor/build
    /// components are zero. Returns `None` when there is no leading number.
    pub fn from_release(release: &str) -> Option<Self> {
        let mut parts = release.trim().split('.').map(leading_number);

        let major = parts.next().flatten()?;
        let minor = parts.next().flatten();
        // a component without digits ends the numeric run
        let build = minor.and_then(|_| parts.next().flatten());

        Some(Self::new(major, minor.unwrap_or(0), build.unwrap_or(0)))
    }
}

fn leading_number(part: &str) -> Option<u32> {
    let end = part
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(part.len());
    part[..end].parse().ok()
}

impl fmt::Display for OsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.build)
    }
}
