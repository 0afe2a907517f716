// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Protection - Page access flags.

use crate::error::ProtectError;

bitflags::bitflags! {
    /// Access permissions enforced on a page.
    ///
    /// `NONE` is the empty set. The flags combine freely; the named
    /// combinations are provided for readability.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Protection: u32 {
        /// Page is inaccessible.
        const NONE = 0;
        /// Page may be read.
        const READ = 1 << 0;
        /// Page may be written.
        const WRITE = 1 << 1;
        /// Page may be executed.
        const EXECUTE = 1 << 2;

        /// `READ`
        const READ_ONLY = Self::READ.bits();
        /// `READ | WRITE`
        const READ_WRITE = Self::READ.bits() | Self::WRITE.bits();
        /// `READ | EXECUTE`
        const READ_EXECUTE = Self::READ.bits() | Self::EXECUTE.bits();
        /// `READ | WRITE | EXECUTE`
        const READ_WRITE_EXECUTE = Self::READ.bits() | Self::WRITE.bits() | Self::EXECUTE.bits();
    }
}

impl Protection {
    /// Returns `Err(InvalidMode)` if any bit outside `READ | WRITE | EXECUTE`
    /// is set.
    pub fn validate(self) -> Result<Self, ProtectError> {
        if self.bits() & !Self::all().bits() != 0 {
            return Err(ProtectError::InvalidMode);
        }

        Ok(self)
    }

    /// Builds a mode from a C-style `PROT_*` integer.
    ///
    /// Bits the host does not define are kept, so a later [`validate`] or
    /// [`to_native`] rejects them with [`ProtectError::InvalidMode`].
    ///
    /// [`validate`]: Protection::validate
    /// [`to_native`]: Protection::to_native
    #[cfg(unix)]
    pub fn from_native(native: libc::c_int) -> Self {
        let known = libc::PROT_READ | libc::PROT_WRITE | libc::PROT_EXEC;
        let mut mode = Self::from_bits_retain((native & !known) as u32);

        if native & libc::PROT_READ != 0 {
            mode |= Self::READ;
        }
        if native & libc::PROT_WRITE != 0 {
            mode |= Self::WRITE;
        }
        if native & libc::PROT_EXEC != 0 {
            mode |= Self::EXECUTE;
        }

        mode
    }

    /// Encodes the mode as the host's `PROT_*` bits.
    #[cfg(unix)]
    pub fn to_native(self) -> Result<libc::c_int, ProtectError> {
        let mode = self.validate()?;
        let mut native = libc::PROT_NONE;

        if mode.contains(Self::READ) {
            native |= libc::PROT_READ;
        }
        if mode.contains(Self::WRITE) {
            native |= libc::PROT_WRITE;
        }
        if mode.contains(Self::EXECUTE) {
            native |= libc::PROT_EXEC;
        }

        Ok(native)
    }
}
