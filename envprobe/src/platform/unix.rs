// Copyright (c) 2024 The Envprobe Authors
//
// SPDX-License-Identifier: Apache-2.0
//

use std::env;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;
use nix::sys::utsname::{uname, UtsName};
use nix::unistd::{getsid, geteuid, Pid, User};

use crate::arch::Architecture;
use crate::error::{ProbeError, Result};
use crate::oracle::*;
use crate::types::{CodePageKind, OsVersion, UTF8_CODE_PAGE};

const ELF_MAGIC: [u8; 4] = [0x7f, b'E', b'L', b'F'];
const ELFCLASS32: u8 = 1;
const ELFCLASS64: u8 = 2;

const US_ASCII_CODE_PAGE: u32 = 20127;
const ISO_8859_1_CODE_PAGE: u32 = 28591;

/// Locale variables consulted for the character set, highest priority first.
const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_CTYPE", "LANG"];

#[derive(Debug, Default, Clone)]
pub struct UnixOracle {}

fn system_uname() -> Result<UtsName> {
    uname().map_err(|e| ProbeError::from_errno("uname", e))
}

/// Pointer width of an ELF image, read from its identification header.
pub(crate) fn elf_class(path: &Path) -> Result<u8> {
    let context = format!("read {}", path.display());
    let mut ident = [0u8; 5];
    File::open(path)
        .and_then(|mut f| f.read_exact(&mut ident))
        .map_err(|e| ProbeError::from_io(&context, e))?;

    if ident[..4] != ELF_MAGIC {
        return Err(ProbeError::LookupFailed(format!(
            "{context}: not an ELF image"
        )));
    }

    match ident[4] {
        ELFCLASS32 => Ok(32),
        ELFCLASS64 => Ok(64),
        class => Err(ProbeError::LookupFailed(format!(
            "{context}: unknown ELF class {class}"
        ))),
    }
}

/// Map a POSIX locale name such as `en_US.UTF-8` to a code page identifier.
pub(crate) fn code_page_for_locale(locale: &str) -> u32 {
    if locale.is_empty() || locale == "C" || locale == "POSIX" {
        return US_ASCII_CODE_PAGE;
    }

    let charset = locale
        .split_once('.')
        .map(|(_, rest)| rest.split('@').next().unwrap_or_default())
        .unwrap_or_default()
        .to_ascii_lowercase()
        .replace(['-', '_'], "");

    match charset.as_str() {
        "iso88591" | "latin1" => ISO_8859_1_CODE_PAGE,
        _ => u32::from(UTF8_CODE_PAGE),
    }
}

impl ArchitectureOracle for UnixOracle {
    fn native_architecture(&self) -> Result<Architecture> {
        let uts = system_uname()?;
        let machine = uts.machine().to_string_lossy();
        debug!("uname machine: {machine}");
        Ok(Architecture::from_machine(&machine))
    }

    fn process_is_native_width(&self, pid: u32) -> Result<bool> {
        let process_bits = elf_class(&Path::new("/proc").join(pid.to_string()).join("exe"))?;
        let native = self.native_architecture()?;
        let native_bits = native.bits().ok_or_else(|| {
            ProbeError::LookupFailed(format!("pointer width of {native} is unknown"))
        })?;
        Ok(process_bits == native_bits)
    }
}

impl PrivilegeOracle for UnixOracle {
    fn token_elevated(&self) -> Result<bool> {
        Ok(geteuid().is_root())
    }
}

impl VersionOracle for UnixOracle {
    fn os_version(&self) -> Result<OsVersion> {
        let uts = system_uname()?;
        let release = uts.release().to_string_lossy();
        debug!("uname release: {release}");
        OsVersion::from_release(&release).ok_or_else(|| {
            ProbeError::LookupFailed(format!("unparsable kernel release {release}"))
        })
    }
}

impl IdentityOracle for UnixOracle {
    fn account_name(&self) -> Result<String> {
        let uid = geteuid();
        let user = User::from_uid(uid)
            .map_err(|e| ProbeError::from_errno("getpwuid", e))?
            .ok_or_else(|| ProbeError::LookupFailed(format!("no passwd entry for uid {uid}")))?;
        Ok(user.name)
    }
}

impl SessionOracle for UnixOracle {
    fn session_id(&self, pid: u32) -> Result<u32> {
        let raw = i32::try_from(pid)
            .map_err(|_| ProbeError::LookupFailed(format!("pid {pid} out of range")))?;
        let sid = getsid(Some(Pid::from_raw(raw)))
            .map_err(|e| ProbeError::from_errno(&format!("getsid({pid})"), e))?;
        u32::try_from(sid.as_raw())
            .map_err(|_| ProbeError::LookupFailed(format!("negative session id {sid}")))
    }
}

impl CodePageOracle for UnixOracle {
    fn code_page(&self, kind: CodePageKind) -> Result<u32> {
        // Unix has a single locale charset, shared by both kinds
        let locale = LOCALE_VARS
            .iter()
            .find_map(|var| env::var(var).ok().filter(|v| !v.is_empty()))
            .unwrap_or_default();
        let code_page = code_page_for_locale(&locale);
        debug!("{kind} code page from locale {locale:?}: {code_page}");
        Ok(code_page)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rstest::rstest;

    use super::*;
    use crate::arch::ProcessArchitecture;

    #[rstest]
    #[case("", 20127)]
    #[case("C", 20127)]
    #[case("POSIX", 20127)]
    #[case("C.UTF-8", 65001)]
    #[case("en_US.UTF-8", 65001)]
    #[case("de_DE.utf8@euro", 65001)]
    #[case("fr_FR.ISO-8859-1", 28591)]
    #[case("en_US", 65001)]
    fn test_code_page_for_locale(#[case] locale: &str, #[case] expected: u32) {
        assert_eq!(code_page_for_locale(locale), expected);
    }

    #[test]
    fn test_elf_class_rejects_non_elf() {
        let path = env::temp_dir().join(format!("envprobe-not-elf-{}", std::process::id()));
        File::create(&path)
            .and_then(|mut f| f.write_all(b"#!/bin/sh\necho hi\n"))
            .unwrap();
        let res = elf_class(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(res, Err(ProbeError::LookupFailed(_))));
    }

    #[test]
    fn test_elf_class_missing_file() {
        let res = elf_class(Path::new("/nonexistent/envprobe/exe"));
        assert!(matches!(res, Err(ProbeError::LookupFailed(_))));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_current_process_width() {
        let oracle = UnixOracle::default();
        let bits = elf_class(Path::new("/proc/self/exe")).unwrap();
        assert_eq!(bits, ProcessArchitecture::current().bits());
        assert!(oracle.process_is_native_width(std::process::id()).is_ok());
    }

    #[test]
    fn test_native_architecture() {
        let arch = UnixOracle::default().native_architecture().unwrap();
        if cfg!(target_arch = "x86_64") {
            assert_eq!(arch, Architecture::X64);
        } else if cfg!(target_arch = "aarch64") {
            assert_eq!(arch, Architecture::Arm64);
        }
    }

    #[test]
    fn test_os_version() {
        let version = UnixOracle::default().os_version().unwrap();
        assert_eq!(version.to_string().split('.').count(), 3);
    }

    #[test]
    fn test_session_of_current_process() {
        assert!(UnixOracle::default()
            .session_id(std::process::id())
            .is_ok());
    }

    #[rstest]
    #[case(u32::MAX)]
    #[case(i32::MAX as u32)]
    fn test_session_of_invalid_pid(#[case] pid: u32) {
        assert!(UnixOracle::default().session_id(pid).is_err());
    }
}
