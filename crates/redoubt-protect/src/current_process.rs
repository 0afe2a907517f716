// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! CurrentProcess - The calling process's address space, via mprotect.

use crate::error::ProtectError;
use crate::protection::Protection;
use crate::request::PAGE_SIZE;
use crate::traits::AddressSpace;

/// The address space of the calling process.
///
/// Changes made through it are process-wide and visible to every thread
/// immediately after the call returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CurrentProcess;

impl CurrentProcess {
    /// Page size reported by the host (`sysconf(_SC_PAGESIZE)`).
    ///
    /// Falls back to [`PAGE_SIZE`] if the host cannot report one.
    pub fn host_page_size() -> usize {
        page_size_from_sysconf(unsafe { libc::sysconf(libc::_SC_PAGESIZE) })
    }
}

/// Interprets a `sysconf(_SC_PAGESIZE)` result. `-1` (and any other
/// non-positive value) means "unknown".
pub(crate) fn page_size_from_sysconf(raw: libc::c_long) -> usize {
    match usize::try_from(raw) {
        Ok(size) if size > 0 => size,
        _ => PAGE_SIZE as usize,
    }
}

impl AddressSpace for CurrentProcess {
    fn change_protection(
        &self,
        base: u64,
        length: u64,
        mode: Protection,
    ) -> Result<(), ProtectError> {
        let native = mode.to_native()?;
        let addr = usize::try_from(base).map_err(|_| ProtectError::InvalidRange)?;
        let len = usize::try_from(length).map_err(|_| ProtectError::InvalidRange)?;

        let failed = unsafe { libc::mprotect(addr as *mut libc::c_void, len, native) } != 0;

        if failed {
            let errno = last_errno();
            let error = ProtectError::from_errno(errno);

            log::debug!(
                "mprotect({:#x}, {}, {:?}) failed with errno {}: {}",
                addr,
                len,
                mode,
                errno,
                error
            );

            return Err(error);
        }

        Ok(())
    }
}

#[cfg(target_os = "linux")]
fn last_errno() -> i32 {
    unsafe { *libc::__errno_location() }
}

#[cfg(any(target_os = "android", target_os = "netbsd", target_os = "openbsd"))]
fn last_errno() -> i32 {
    unsafe { *libc::__errno() }
}

#[cfg(any(target_os = "macos", target_os = "ios", target_os = "freebsd"))]
fn last_errno() -> i32 {
    unsafe { *libc::__error() }
}
