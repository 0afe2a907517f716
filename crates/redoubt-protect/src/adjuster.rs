// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! ProtectionAdjuster - Aligns a request and forwards it to an address space.

use crate::error::ProtectError;
use crate::protection::Protection;
use crate::request::ProtectionRequest;
use crate::traits::AddressSpace;

/// Applies protection requests to an [`AddressSpace`].
///
/// Stateless apart from the space it targets. Holds no lock and performs no
/// retries; every failure from the space is returned as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtectionAdjuster<S: AddressSpace> {
    space: S,
}

impl<S: AddressSpace> ProtectionAdjuster<S> {
    /// Creates an adjuster targeting `space`.
    pub fn new(space: S) -> Self {
        Self { space }
    }

    /// Returns the targeted address space.
    pub fn space(&self) -> &S {
        &self.space
    }

    /// Consumes the adjuster and returns the address space.
    pub fn into_space(self) -> S {
        self.space
    }

    /// Applies `request`.
    ///
    /// The mode is validated first; an unsupported combination fails with
    /// [`ProtectError::InvalidMode`] without touching the address space.
    /// The address is then rounded down to its page and forwarded with the
    /// length unchanged.
    pub fn adjust(&self, request: &ProtectionRequest) -> Result<(), ProtectError> {
        let mode = request.mode.validate()?;
        let base = request.aligned_base();

        log::trace!(
            "adjust_protection: {:#x} -> base {:#x}, length {}, mode {:?}",
            request.address,
            base,
            request.length,
            mode
        );

        self.space.change_protection(base, request.length, mode)
    }

    /// Shorthand for [`adjust`](Self::adjust) with a freshly built request.
    pub fn adjust_protection(
        &self,
        address: u64,
        length: u64,
        mode: Protection,
    ) -> Result<(), ProtectError> {
        self.adjust(&ProtectionRequest::new(address, length, mode))
    }
}
