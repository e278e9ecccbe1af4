// Copyright (c) 2024 The Envprobe Authors
//
// SPDX-License-Identifier: Apache-2.0
//

use std::fmt;

use ::windows::core::{w, PCSTR};
use ::windows::Win32::Foundation::HMODULE;
use ::windows::Win32::System::LibraryLoader::{GetModuleHandleW, GetProcAddress};
use ::windows::Win32::System::SystemInformation::SYSTEM_INFO;
use log::debug;

use crate::error::{ProbeError, Result};
use crate::types::CodePageKind;

pub(crate) type GetNativeSystemInfoFn = unsafe extern "system" fn(*mut SYSTEM_INFO);
pub(crate) type GetCodePageFn = unsafe extern "system" fn() -> u32;

/// Entry points resolved once from `kernel32.dll` at startup.
///
/// Built explicitly and handed to the oracles; nothing is loaded lazily or
/// kept in process-wide state. A missing export leaves its slot empty and
/// the facet that needs it reports [`ProbeError::UnsupportedPlatform`].
#[derive(Clone, Copy, Default)]
pub struct NativeLibraries {
    native_system_info: Option<GetNativeSystemInfoFn>,
    ansi_code_page: Option<GetCodePageFn>,
    oem_code_page: Option<GetCodePageFn>,
}

/// Look up a NUL terminated export name.
fn export(module: HMODULE, name: &'static str) -> Option<unsafe extern "system" fn() -> isize> {
    debug_assert!(name.ends_with('\0'));
    let proc = unsafe { GetProcAddress(module, PCSTR::from_raw(name.as_ptr())) };
    if proc.is_none() {
        debug!("kernel32 export {} not found", name.trim_end_matches('\0'));
    }
    proc
}

impl NativeLibraries {
    pub fn load() -> Result<Self> {
        // kernel32 is mapped into every process, so the handle needs no release
        let kernel32 = unsafe { GetModuleHandleW(w!("kernel32.dll")) }
            .map_err(|e| ProbeError::UnsupportedPlatform(format!("kernel32.dll: {e}")))?;

        // SAFETY: the exports are transmuted to their documented signatures.
        let libraries = unsafe {
            Self {
                native_system_info: export(kernel32, "GetNativeSystemInfo\0")
                    .map(|f| std::mem::transmute::<_, GetNativeSystemInfoFn>(f)),
                ansi_code_page: export(kernel32, "GetACP\0")
                    .map(|f| std::mem::transmute::<_, GetCodePageFn>(f)),
                oem_code_page: export(kernel32, "GetOEMCP\0")
                    .map(|f| std::mem::transmute::<_, GetCodePageFn>(f)),
            }
        };
        debug!("Native libraries loaded: {libraries:?}");
        Ok(libraries)
    }

    pub(crate) fn native_system_info(&self) -> Result<GetNativeSystemInfoFn> {
        self.native_system_info.ok_or_else(|| {
            ProbeError::UnsupportedPlatform("GetNativeSystemInfo not found".to_string())
        })
    }

    pub(crate) fn code_page(&self, kind: CodePageKind) -> Result<GetCodePageFn> {
        let (entry, name) = match kind {
            CodePageKind::Ansi => (self.ansi_code_page, "GetACP"),
            CodePageKind::Oem => (self.oem_code_page, "GetOEMCP"),
        };
        entry.ok_or_else(|| ProbeError::UnsupportedPlatform(format!("{name} not found")))
    }
}

impl fmt::Debug for NativeLibraries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeLibraries")
            .field("GetNativeSystemInfo", &self.native_system_info.is_some())
            .field("GetACP", &self.ansi_code_page.is_some())
            .field("GetOEMCP", &self.oem_code_page.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_resolves_kernel32_exports() {
        let libraries = NativeLibraries::load().unwrap();
        assert!(libraries.native_system_info().is_ok());
        assert!(libraries.code_page(CodePageKind::Ansi).is_ok());
        assert!(libraries.code_page(CodePageKind::Oem).is_ok());
    }

    #[test]
    fn test_empty_registry() {
        let libraries = NativeLibraries::default();
        assert!(matches!(
            libraries.native_system_info(),
            Err(ProbeError::UnsupportedPlatform(_))
        ));
        assert!(matches!(
            libraries.code_page(CodePageKind::Oem),
            Err(ProbeError::UnsupportedPlatform(_))
        ));
    }
}
