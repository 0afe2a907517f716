// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::error::ProtectError;
use crate::protection::Protection;
use crate::request::{align_down, align_up, PAGE_MASK, PAGE_SIZE};
use crate::traits::AddressSpace;

/// Configurable behavior for [`MockAddressSpace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockAddressSpaceBehaviour {
    /// Normal operation (applies the change to the simulated page table).
    None,
    /// Always fail with the given error.
    FailAlways(ProtectError),
    /// Fail on the Nth call (1-indexed: 1 = first call fails).
    FailAtNthCall(usize, ProtectError),
}

/// A single recorded `change_protection` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockCall {
    /// Base address received.
    pub base: u64,
    /// Length received.
    pub length: u64,
    /// Mode received.
    pub mode: Protection,
}

#[derive(Debug, Clone, Copy)]
struct MockPage {
    mode: Protection,
    sealed: bool,
}

/// In-memory address space for testing.
///
/// Keeps a 4096-byte page table and mirrors the kernel's `mprotect` rules:
/// unaligned base is `InvalidMode`, a zero length succeeds without effect,
/// the length is rounded up to whole pages, a range running past the top of
/// the address space is `InvalidRange`, any unmapped page in range is
/// `InvalidRange` and any sealed page is `PermissionDenied`. A failing call
/// changes nothing. Every call is recorded, including failing ones.
#[derive(Debug)]
pub struct MockAddressSpace {
    pages: RefCell<BTreeMap<u64, MockPage>>,
    calls: RefCell<Vec<MockCall>>,
    behaviour: MockAddressSpaceBehaviour,
}

impl MockAddressSpace {
    /// Creates an empty address space with the specified behavior.
    pub fn new(behaviour: MockAddressSpaceBehaviour) -> Self {
        Self {
            pages: RefCell::new(BTreeMap::new()),
            calls: RefCell::new(Vec::new()),
            behaviour,
        }
    }

    /// Changes the mock behavior at runtime.
    pub fn change_behaviour(&mut self, behaviour: MockAddressSpaceBehaviour) {
        self.behaviour = behaviour;
    }

    /// Maps every page overlapping `[address, address + length)` with `mode`.
    pub fn map(&self, address: u64, length: u64, mode: Protection) {
        let mut pages = self.pages.borrow_mut();

        for page in page_range(align_down(address), address.saturating_add(length)) {
            pages.insert(
                page,
                MockPage {
                    mode,
                    sealed: false,
                },
            );
        }
    }

    /// Unmaps every page overlapping `[address, address + length)`.
    pub fn unmap(&self, address: u64, length: u64) {
        let mut pages = self.pages.borrow_mut();

        for page in page_range(align_down(address), address.saturating_add(length)) {
            pages.remove(&page);
        }
    }

    /// Marks the mapped pages overlapping `[address, address + length)` as
    /// immutable. Later changes touching them fail with `PermissionDenied`.
    pub fn seal(&self, address: u64, length: u64) {
        let mut pages = self.pages.borrow_mut();

        for page in page_range(align_down(address), address.saturating_add(length)) {
            if let Some(entry) = pages.get_mut(&page) {
                entry.sealed = true;
            }
        }
    }

    /// Returns the mode of the page containing `address`, or `None` if the
    /// page is unmapped.
    pub fn protection_at(&self, address: u64) -> Option<Protection> {
        self.pages
            .borrow()
            .get(&align_down(address))
            .map(|page| page.mode)
    }

    /// Returns a copy of every recorded call, oldest first.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.borrow().clone()
    }

    /// Returns the number of recorded calls.
    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Forgets all recorded calls. The page table is kept.
    pub fn reset_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn apply(&self, base: u64, length: u64, mode: Protection) -> Result<(), ProtectError> {
        mode.validate()?;

        if base & !PAGE_MASK != 0 {
            return Err(ProtectError::InvalidMode);
        }

        if length == 0 {
            return Ok(());
        }

        // Kernel rule: a range whose page-rounded end wraps is unmapped.
        let end = length
            .checked_add(PAGE_SIZE - 1)
            .map(align_down)
            .and_then(|rounded| base.checked_add(rounded))
            .ok_or(ProtectError::InvalidRange)?;
        let mut pages = self.pages.borrow_mut();

        for page in page_range(base, end) {
            match pages.get(&page) {
                None => return Err(ProtectError::InvalidRange),
                Some(entry) if entry.sealed => return Err(ProtectError::PermissionDenied),
                Some(_) => {}
            }
        }

        for page in page_range(base, end) {
            if let Some(entry) = pages.get_mut(&page) {
                entry.mode = mode;
            }
        }

        Ok(())
    }
}

impl AddressSpace for MockAddressSpace {
    fn change_protection(
        &self,
        base: u64,
        length: u64,
        mode: Protection,
    ) -> Result<(), ProtectError> {
        let count = {
            let mut calls = self.calls.borrow_mut();
            calls.push(MockCall { base, length, mode });
            calls.len()
        };

        match self.behaviour {
            MockAddressSpaceBehaviour::None => self.apply(base, length, mode),
            MockAddressSpaceBehaviour::FailAlways(error) => Err(error),
            MockAddressSpaceBehaviour::FailAtNthCall(n, error) if count == n => Err(error),
            MockAddressSpaceBehaviour::FailAtNthCall(..) => self.apply(base, length, mode),
        }
    }
}

/// Page starts from `start` (aligned) up to the page boundary at or after `end`.
fn page_range(start: u64, end: u64) -> impl Iterator<Item = u64> {
    (start..align_up(end)).step_by(PAGE_SIZE as usize)
}
