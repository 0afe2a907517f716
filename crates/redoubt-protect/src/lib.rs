// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! # redoubt_protect
//!
//! Page-aligned memory protection changes.
//!
//! Takes a raw address, a byte length and a [`Protection`] mode, clears the
//! low 12 bits of the address and asks the OS to apply the mode to the pages
//! starting there.
//!
//! ## Core Types
//!
//! - [`ProtectionRequest`]: address, length and mode, with the derived
//!   aligned base and covered range
//! - [`ProtectionAdjuster`]: validates, aligns and forwards a request
//! - [`CurrentProcess`]: the calling process's address space (`mprotect`)
//!
//! ## Alignment
//!
//! Only the address is aligned. The length is passed through unchanged and is
//! measured from the aligned base, so a request at `0x1005` for 4096 bytes
//! changes `[0x1000, 0x2000)` and leaves the last 5 intended bytes alone.
//! Callers that need the whole range covered must add
//! [`ProtectionRequest::alignment_offset`] to the length themselves.
//!
//! ## Example
//!
//! ```rust
//! # #[cfg(target_os = "linux")]
//! # fn example() -> Result<(), redoubt_protect::ProtectError> {
//! use redoubt_protect::{adjust_protection, Protection};
//!
//! let page = unsafe {
//!     libc::mmap(
//!         core::ptr::null_mut(),
//!         4096,
//!         libc::PROT_READ | libc::PROT_WRITE,
//!         libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
//!         -1,
//!         0,
//!     )
//! };
//! assert_ne!(page, libc::MAP_FAILED);
//!
//! // Any address inside the page works; it is rounded down.
//! adjust_protection(page as u64 + 12, 4096, Protection::READ_ONLY)?;
//!
//! unsafe { libc::munmap(page, 4096) };
//! # Ok(())
//! # }
//! # #[cfg(target_os = "linux")]
//! # example().unwrap();
//! ```
//!
//! ## Concurrency
//!
//! Page protections are process-wide. Nothing here locks: callers that may
//! change overlapping ranges from several threads must coordinate themselves.

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

#[cfg(any(test, feature = "test_utils"))]
extern crate alloc;

#[cfg(test)]
mod tests;

mod adjuster;
mod error;
mod protection;
mod request;
mod support;
mod traits;

#[cfg(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
))]
mod current_process;

pub use adjuster::ProtectionAdjuster;
pub use error::ProtectError;
pub use protection::Protection;
pub use request::{align_down, align_up, ProtectionRequest, PAGE_MASK, PAGE_SIZE};
pub use traits::AddressSpace;

#[cfg(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
))]
pub use current_process::CurrentProcess;

#[cfg(any(test, feature = "test_utils"))]
pub use support::test_utils;

/// Changes the protection of the calling process's pages starting at the page
/// containing `address`.
///
/// `address` is rounded down to a 4096-byte boundary; `length` is measured
/// from that boundary and is not extended. See the crate docs for the
/// resulting gap on unaligned addresses.
///
/// # Errors
///
/// - [`ProtectError::InvalidRange`]: part of the range is not mapped
/// - [`ProtectError::PermissionDenied`]: the region may not be changed
/// - [`ProtectError::InvalidMode`]: `mode` is not supported on this host
/// - [`ProtectError::Platform`]: any other native failure
#[cfg(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
))]
pub fn adjust_protection(address: u64, length: u64, mode: Protection) -> Result<(), ProtectError> {
    ProtectionAdjuster::new(CurrentProcess).adjust_protection(address, length, mode)
}
