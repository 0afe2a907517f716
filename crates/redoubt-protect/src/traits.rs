// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! AddressSpace - The target a protection change is applied to.

use crate::error::ProtectError;
use crate::protection::Protection;

/// An address space whose page protections can be changed.
///
/// This is the explicit context a protection change is applied to. For the
/// calling process use [`CurrentProcess`](crate::CurrentProcess). Implementations
/// perform no locking: concurrent changes on overlapping ranges are ordered
/// however the underlying system orders them.
pub trait AddressSpace {
    /// Applies `mode` to the pages covering `[base, base + length)`.
    ///
    /// `base` is page aligned when called through
    /// [`ProtectionAdjuster`](crate::ProtectionAdjuster). `length` is passed
    /// through as given.
    ///
    /// # Errors
    ///
    /// Returns the [`ProtectError`] classification of the native failure.
    fn change_protection(
        &self,
        base: u64,
        length: u64,
        mode: Protection,
    ) -> Result<(), ProtectError>;
}

impl<S: AddressSpace + ?Sized> AddressSpace for &S {
    fn change_protection(
        &self,
        base: u64,
        length: u64,
        mode: Protection,
    ) -> Result<(), ProtectError> {
        (**self).change_protection(base, length, mode)
    }
}
