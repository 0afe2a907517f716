// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Test utilities for code built on top of redoubt-protect.

mod mock_address_space;

pub use mock_address_space::{MockAddressSpace, MockAddressSpaceBehaviour, MockCall};
