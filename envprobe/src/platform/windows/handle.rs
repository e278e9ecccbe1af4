// Copyright (c) 2024 The Envprobe Authors
//
// SPDX-License-Identifier: Apache-2.0
//

use ::windows::Win32::Foundation::{CloseHandle, HANDLE};
use log::warn;

/// Process or token handle closed when dropped, on every return path.
pub(crate) struct OwnedHandle(HANDLE);

impl OwnedHandle {
    pub(crate) fn new(handle: HANDLE) -> Self {
        Self(handle)
    }

    pub(crate) fn raw(&self) -> HANDLE {
        self.0
    }
}

impl Drop for OwnedHandle {
    fn drop(&mut self) {
        if self.0.is_invalid() {
            return;
        }
        if let Err(e) = unsafe { CloseHandle(self.0) } {
            warn!("CloseHandle failed: {e}");
        }
    }
}
