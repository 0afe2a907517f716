// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! ProtectionRequest - A single protection change, before it reaches the OS.
//!
//! The address is rounded down to a 4096-byte boundary. The length is NOT
//! extended to make up for the bytes lost to that rounding, so an unaligned
//! request leaves up to `address % 4096` bytes at the end of its intended
//! range untouched. [`ProtectionRequest::uncovered_tail`] reports that gap.

use core::ops::Range;

use crate::protection::Protection;

/// Page granularity used for alignment.
pub const PAGE_SIZE: u64 = 4096;

/// Mask that clears the in-page offset of an address.
pub const PAGE_MASK: u64 = 0xFFFF_FFFF_FFFF_F000;

/// Rounds `address` down to the start of its page.
#[inline]
pub const fn align_down(address: u64) -> u64 {
    address & PAGE_MASK
}

/// Rounds `address` up to the next page boundary, saturating at the last
/// page of the address space.
#[inline]
pub const fn align_up(address: u64) -> u64 {
    match address.checked_add(PAGE_SIZE - 1) {
        Some(end) => align_down(end),
        None => align_down(u64::MAX),
    }
}

/// A raw address, a byte length and the mode to apply.
///
/// The address is an opaque number. Nothing here owns, dereferences or frees
/// the memory it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtectionRequest {
    /// Address as given by the caller, aligned or not.
    pub address: u64,
    /// Byte count measured from the aligned base.
    pub length: u64,
    /// Flags to apply.
    pub mode: Protection,
}

impl ProtectionRequest {
    /// Creates a new request.
    pub const fn new(address: u64, length: u64, mode: Protection) -> Self {
        Self {
            address,
            length,
            mode,
        }
    }

    /// The page-aligned base handed to the OS.
    #[inline]
    pub const fn aligned_base(&self) -> u64 {
        align_down(self.address)
    }

    /// Number of bytes the base moved down by alignment.
    #[inline]
    pub const fn alignment_offset(&self) -> u64 {
        self.address & !PAGE_MASK
    }

    /// The byte range the caller meant to cover: `[address, address + length)`.
    pub fn intended(&self) -> Range<u64> {
        self.address..self.address.saturating_add(self.length)
    }

    /// The byte range whose protection actually changes.
    ///
    /// Starts at the aligned base. The OS rounds `length` up to a whole page,
    /// so the end is the boundary after `aligned_base() + length`.
    pub fn covered(&self) -> Range<u64> {
        let base = self.aligned_base();

        base..align_up(base.saturating_add(self.length))
    }

    /// Bytes at the end of [`intended`](Self::intended) that fall outside
    /// [`covered`](Self::covered). Zero when nothing was intended.
    pub fn uncovered_tail(&self) -> u64 {
        let intended = self.intended();

        intended
            .end
            .saturating_sub(self.covered().end.max(intended.start))
    }

    /// Number of pages touched by the change.
    pub fn page_count(&self) -> u64 {
        let covered = self.covered();

        (covered.end - covered.start) / PAGE_SIZE
    }
}
