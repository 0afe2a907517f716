// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for redoubt-protect.
use thiserror::Error;

/// Failure outcomes of a protection change.
///
/// Each variant maps one-to-one onto what the native call can report.
/// Nothing is recovered locally.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum ProtectError {
    /// The address/length pair is not (fully) backed by a mapped region.
    #[error("address range is not mapped")]
    InvalidRange,

    /// The caller may not change protection on the region.
    #[error("permission denied changing page protection")]
    PermissionDenied,

    /// The requested flag combination is not supported on this host.
    #[error("unsupported protection mode")]
    InvalidMode,

    /// Any other native failure, carrying the raw error code.
    #[error("mprotect failed with errno {0}")]
    Platform(i32),
}

impl ProtectError {
    /// Classifies a native `errno` value returned by `mprotect`.
    ///
    /// - `ENOMEM` → [`ProtectError::InvalidRange`]
    /// - `EACCES`, `EPERM` → [`ProtectError::PermissionDenied`]
    /// - `EINVAL`, `ENOTSUP` → [`ProtectError::InvalidMode`]
    /// - anything else → [`ProtectError::Platform`]
    #[cfg(unix)]
    pub fn from_errno(errno: i32) -> Self {
        match errno {
            libc::ENOMEM => Self::InvalidRange,
            libc::EACCES | libc::EPERM => Self::PermissionDenied,
            libc::EINVAL | libc::ENOTSUP => Self::InvalidMode,
            code => Self::Platform(code),
        }
    }

    /// Classifies a native error code. Without a libc there is nothing to
    /// match against, so every code is passed through verbatim.
    #[cfg(not(unix))]
    pub fn from_errno(errno: i32) -> Self {
        Self::Platform(errno)
    }

    /// Returns the raw code carried by [`ProtectError::Platform`].
    pub fn errno(&self) -> Option<i32> {
        match self {
            Self::Platform(code) => Some(*code),
            _ => None,
        }
    }
}
