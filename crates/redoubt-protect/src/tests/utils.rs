// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Test utilities for redoubt-protect.

use std::os::fd::AsRawFd;

use crate::current_process::CurrentProcess;
use crate::protection::Protection;
use crate::request::PAGE_SIZE;

/// Anonymous private pages, read/write on creation, unmapped on drop.
pub struct MappedPages {
    ptr: *mut libc::c_void,
    len: usize,
}

impl MappedPages {
    pub fn new(pages: usize) -> Self {
        let len = pages * PAGE_SIZE as usize;
        let ptr = unsafe {
            libc::mmap(
                core::ptr::null_mut(),
                len,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                -1,
                0,
            )
        };
        assert_ne!(ptr, libc::MAP_FAILED, "Failed to mmap(..)");

        Self { ptr, len }
    }

    /// Maps the first page of the test binary read-only and shared. The
    /// file is opened read-only, so the mapping can never become writable.
    pub fn shared_read_only_file() -> Self {
        let exe = std::env::current_exe().expect("Failed to current_exe()");
        let file = std::fs::File::open(exe).expect("Failed to open(..)");
        let len = PAGE_SIZE as usize;
        let ptr = unsafe {
            libc::mmap(
                core::ptr::null_mut(),
                len,
                libc::PROT_READ,
                libc::MAP_SHARED,
                file.as_raw_fd(),
                0,
            )
        };
        assert_ne!(ptr, libc::MAP_FAILED, "Failed to mmap(..)");

        Self { ptr, len }
    }

    /// Address of the start of page `index`.
    pub fn page(&self, index: usize) -> u64 {
        self.ptr as u64 + (index as u64) * PAGE_SIZE
    }

    pub fn addr(&self) -> u64 {
        self.page(0)
    }

    /// Unmaps page `index`, leaving a hole in the mapping.
    pub fn punch_hole(&self, index: usize) {
        let result =
            unsafe { libc::munmap(self.page(index) as *mut libc::c_void, PAGE_SIZE as usize) };
        assert_eq!(result, 0, "Failed to munmap(..)");
    }

    /// Writes `value` at `address` and reads it back.
    ///
    /// # Safety
    /// `address` must be inside a writable page of this mapping.
    pub unsafe fn write_read(&self, address: u64, value: u8) -> u8 {
        let ptr = address as *mut u8;
        unsafe {
            core::ptr::write_volatile(ptr, value);
            core::ptr::read_volatile(ptr)
        }
    }
}

impl Drop for MappedPages {
    fn drop(&mut self) {
        unsafe { libc::munmap(self.ptr, self.len) };
    }
}

/// Whether the host pages match the 4096-byte alignment used by the crate.
pub fn host_uses_4k_pages() -> bool {
    CurrentProcess::host_page_size() as u64 == PAGE_SIZE
}

/// Reads the protection of the mapping containing `address` from
/// `/proc/self/maps`. Returns `None` if no mapping contains it.
pub fn page_protection(address: u64) -> Option<Protection> {
    let maps = std::fs::read_to_string("/proc/self/maps").expect("Failed to read /proc/self/maps");

    maps.lines().find_map(|line| {
        let mut fields = line.split_whitespace();
        let (start, end) = fields.next()?.split_once('-')?;
        let perms = fields.next()?.as_bytes();

        let start = u64::from_str_radix(start, 16).ok()?;
        let end = u64::from_str_radix(end, 16).ok()?;

        if address < start || address >= end {
            return None;
        }

        let mut mode = Protection::NONE;
        if perms.first() == Some(&b'r') {
            mode |= Protection::READ;
        }
        if perms.get(1) == Some(&b'w') {
            mode |= Protection::WRITE;
        }
        if perms.get(2) == Some(&b'x') {
            mode |= Protection::EXECUTE;
        }

        Some(mode)
    })
}

/// Runs an ignored test as a subprocess and returns its exit code.
pub fn run_test_as_subprocess(test_name: &str) -> Option<i32> {
    let exe = std::env::current_exe().expect("Failed to current_exe()");
    let status = std::process::Command::new(exe)
        .args([
            "--exact",
            test_name,
            "--ignored",
            "--test-threads=1",
            "--nocapture",
        ])
        .status()
        .expect("Failed to run subprocess");

    status.code()
}

/// Makes every later `mprotect` in this process fail with `EPERM`.
pub fn block_mprotect() {
    use libseccomp::{ScmpAction, ScmpFilterContext, ScmpSyscall};

    let mut filter = ScmpFilterContext::new(ScmpAction::Allow).expect("Failed to create filter");
    filter
        .add_rule(
            ScmpAction::Errno(libc::EPERM),
            ScmpSyscall::from_name("mprotect").expect("Failed to from_name(..)"),
        )
        .expect("Failed to add rule");
    filter.load().expect("Failed to load seccomp filter");
}

/// Check if seccomp is available by forking a child process that attempts to load a filter.
pub fn is_seccomp_available() -> bool {
    use libseccomp::{ScmpAction, ScmpFilterContext};

    match unsafe { libc::fork() } {
        -1 => false,
        0 => {
            let result = ScmpFilterContext::new(ScmpAction::Allow).and_then(|filter| filter.load());

            std::process::exit(if result.is_ok() { 0 } else { 1 });
        }
        child_pid => {
            let mut status: libc::c_int = 0;
            unsafe {
                libc::waitpid(child_pid, &mut status, 0);
            }

            libc::WIFEXITED(status) && libc::WEXITSTATUS(status) == 0
        }
    }
}
