// Copyright (c) 2024 The Envprobe Authors
//
// SPDX-License-Identifier: Apache-2.0
//

mod handle;
mod libraries;

pub use libraries::NativeLibraries;

use std::ffi::c_void;
use std::mem::size_of;
use std::sync::Arc;

use ::windows::core::PWSTR;
use ::windows::Win32::Foundation::{BOOL, ERROR_MORE_DATA, HANDLE};
use ::windows::Win32::Security::Authentication::Identity::{GetUserNameExW, NameSamCompatible};
use ::windows::Win32::Security::{
    GetTokenInformation, TokenElevation, TOKEN_ELEVATION, TOKEN_QUERY,
};
use ::windows::Win32::System::RemoteDesktop::ProcessIdToSessionId;
use ::windows::Win32::System::SystemInformation::{GetVersionExW, OSVERSIONINFOW, SYSTEM_INFO};
use ::windows::Win32::System::Threading::{
    GetCurrentProcess, IsWow64Process, OpenProcess, OpenProcessToken,
    PROCESS_QUERY_LIMITED_INFORMATION,
};
use log::debug;

use crate::arch::Architecture;
use crate::error::{ProbeError, Result};
use crate::oracle::*;
use crate::types::{CodePageKind, OsVersion};
use handle::OwnedHandle;

// Large enough for any SAM compatible DOMAIN\user name
const ACCOUNT_NAME_CAPACITY: usize = 256;

/// Oracles backed by Win32 calls.
#[derive(Debug, Clone)]
pub struct WindowsOracle {
    libraries: Arc<NativeLibraries>,
}

impl WindowsOracle {
    pub fn new(libraries: Arc<NativeLibraries>) -> Self {
        Self { libraries }
    }
}

impl ArchitectureOracle for WindowsOracle {
    fn native_architecture(&self) -> Result<Architecture> {
        let get_native_system_info = self.libraries.native_system_info()?;
        let mut info = SYSTEM_INFO::default();
        let raw = unsafe {
            get_native_system_info(&mut info);
            info.Anonymous.Anonymous.wProcessorArchitecture.0
        };
        debug!("GetNativeSystemInfo processor architecture: {raw}");
        Ok(Architecture::from_processor_architecture(raw))
    }

    fn process_is_native_width(&self, pid: u32) -> Result<bool> {
        let process = unsafe { OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, pid) }
            .map_err(|e| ProbeError::from_win32(&format!("OpenProcess({pid})"), e))?;
        let process = OwnedHandle::new(process);

        let mut wow64 = BOOL::default();
        unsafe { IsWow64Process(process.raw(), &mut wow64) }
            .map_err(|e| ProbeError::from_win32("IsWow64Process", e))?;
        // WOW64 processes are narrower than the OS they run on
        Ok(!wow64.as_bool())
    }
}

impl PrivilegeOracle for WindowsOracle {
    fn token_elevated(&self) -> Result<bool> {
        let mut token = HANDLE::default();
        unsafe { OpenProcessToken(GetCurrentProcess(), TOKEN_QUERY, &mut token) }
            .map_err(|e| ProbeError::from_win32("OpenProcessToken", e))?;
        let token = OwnedHandle::new(token);

        let mut elevation = TOKEN_ELEVATION::default();
        let size = size_of::<TOKEN_ELEVATION>() as u32;
        let mut returned = 0u32;
        unsafe {
            GetTokenInformation(
                token.raw(),
                TokenElevation,
                Some(&mut elevation as *mut TOKEN_ELEVATION as *mut c_void),
                size,
                &mut returned,
            )
        }
        .map_err(|e| ProbeError::from_win32("GetTokenInformation", e))?;

        Ok(returned == size && elevation.TokenIsElevated != 0)
    }
}

impl VersionOracle for WindowsOracle {
    fn os_version(&self) -> Result<OsVersion> {
        let mut info = OSVERSIONINFOW {
            dwOSVersionInfoSize: size_of::<OSVERSIONINFOW>() as u32,
            ..Default::default()
        };
        #[allow(deprecated)]
        unsafe { GetVersionExW(&mut info) }
            .map_err(|e| ProbeError::from_win32("GetVersionExW", e))?;

        Ok(OsVersion::new(
            info.dwMajorVersion,
            info.dwMinorVersion,
            info.dwBuildNumber,
        ))
    }
}

impl IdentityOracle for WindowsOracle {
    fn account_name(&self) -> Result<String> {
        let mut buffer = vec![0u16; ACCOUNT_NAME_CAPACITY];
        loop {
            let mut len = buffer.len() as u32;
            let ok = unsafe {
                GetUserNameExW(NameSamCompatible, PWSTR(buffer.as_mut_ptr()), &mut len)
            };
            if ok.0 != 0 {
                buffer.truncate(len as usize);
                return Ok(String::from_utf16_lossy(&buffer));
            }

            let err = ::windows::core::Error::from_win32();
            if err.code() == ERROR_MORE_DATA.to_hresult() && len as usize > buffer.len() {
                buffer.resize(len as usize, 0);
                continue;
            }
            return Err(ProbeError::from_win32("GetUserNameExW", err));
        }
    }
}

impl SessionOracle for WindowsOracle {
    fn session_id(&self, pid: u32) -> Result<u32> {
        let mut session = 0u32;
        unsafe { ProcessIdToSessionId(pid, &mut session) }
            .map_err(|e| ProbeError::from_win32(&format!("ProcessIdToSessionId({pid})"), e))?;
        Ok(session)
    }
}

impl CodePageOracle for WindowsOracle {
    fn code_page(&self, kind: CodePageKind) -> Result<u32> {
        let get_code_page = self.libraries.code_page(kind)?;
        Ok(unsafe { get_code_page() })
    }
}
