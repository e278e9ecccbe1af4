// Copyright (c) 2024 The Envprobe Authors
//
// SPDX-License-Identifier: Apache-2.0
//

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

// Values of SYSTEM_INFO.wProcessorArchitecture
const PROCESSOR_ARCHITECTURE_INTEL: u16 = 0;
const PROCESSOR_ARCHITECTURE_ARM: u16 = 5;
const PROCESSOR_ARCHITECTURE_AMD64: u16 = 9;
const PROCESSOR_ARCHITECTURE_ARM64: u16 = 12;

/// Native architecture of the operating system.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumString,
    AsRefStr,
    Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Architecture {
    X86,
    X64,
    Arm,
    Arm64,
    #[default]
    Unknown,
}

impl Architecture {
    /// Map a Windows `PROCESSOR_ARCHITECTURE_*` value. IA-64 and anything
    /// unrecognised is reported as unknown.
    pub fn from_processor_architecture(value: u16) -> Self {
        match value {
            PROCESSOR_ARCHITECTURE_INTEL => Self::X86,
            PROCESSOR_ARCHITECTURE_ARM => Self::Arm,
            PROCESSOR_ARCHITECTURE_AMD64 => Self::X64,
            PROCESSOR_ARCHITECTURE_ARM64 => Self::Arm64,
            _ => Self::Unknown,
        }
    }

    /// Map a `uname -m` machine string.
    pub fn from_machine(machine: &str) -> Self {
        let machine = machine.trim().to_ascii_lowercase();
        match machine.as_str() {
            "x86_64" | "amd64" | "x64" => Self::X64,
            "i386" | "i486" | "i586" | "i686" | "x86" | "i86pc" => Self::X86,
            "aarch64" | "arm64" | "aarch64_be" => Self::Arm64,
            m if m.starts_with("arm") => Self::Arm,
            _ => Self::Unknown,
        }
    }

    /// Pointer width in bits, `None` when the architecture is unknown.
    pub fn bits(&self) -> Option<u8> {
        match self {
            Self::X86 | Self::Arm => Some(32),
            Self::X64 | Self::Arm64 => Some(64),
            Self::Unknown => None,
        }
    }

    pub fn is_64bit(&self) -> bool {
        self.bits() == Some(64)
    }
}

/// Bitness of the running process, fixed at compile time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, AsRefStr, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProcessArchitecture {
    X86,
    X64,
}

impl ProcessArchitecture {
    pub const fn current() -> Self {
        if cfg!(target_pointer_width = "64") {
            Self::X64
        } else {
            Self::X86
        }
    }

    pub fn bits(&self) -> u8 {
        match self {
            Self::X86 => 32,
            Self::X64 => 64,
        }
    }
}
