// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Guard values and running checksum.
//!
//! Safe Rust already rules out out-of-bounds writes into the stack's own
//! fields. The guards remain as a best-effort detector for corruption that
//! bypasses ownership (foreign code writing through raw pointers, logic bugs
//! behind `unsafe`). The checksum is a wrapping sum of per-element hashes and
//! offers no cryptographic guarantee.

use crate::error::ErrorFlags;
use crate::hash::ElementHasher;

/// Sentinel value both guards hold while the instance is intact.
pub const GUARD_VALUE: usize = 0xDEAD_BEEF;

/// Guard word placed at one end of the instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub(crate) struct Guard(usize);

impl Guard {
    pub(crate) const fn armed() -> Self {
        Self(GUARD_VALUE)
    }

    #[inline]
    pub(crate) fn is_intact(&self) -> bool {
        self.0 == GUARD_VALUE
    }

    #[cfg(any(test, feature = "test_utils"))]
    pub(crate) fn overwrite(&mut self, value: usize) {
        self.0 = value;
    }
}

/// Running sum of element hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(transparent)]
pub(crate) struct Checksum(u64);

impl Checksum {
    /// Recomputes the sum over `elements` from scratch.
    pub(crate) fn over<T, H>(hasher: &H, elements: &[T]) -> Self
    where
        H: ElementHasher<T>,
    {
        elements
            .iter()
            .fold(Self::default(), |sum, element| sum.add(hasher.hash_element(element)))
    }

    #[inline]
    #[must_use]
    pub(crate) fn add(self, hash: u64) -> Self {
        Self(self.0.wrapping_add(hash))
    }

    #[inline]
    #[must_use]
    pub(crate) fn sub(self, hash: u64) -> Self {
        Self(self.0.wrapping_sub(hash))
    }

    #[inline]
    pub(crate) fn value(self) -> u64 {
        self.0
    }
}

/// Compares the stored checksum against one recomputed over `elements`.
pub(crate) fn check_checksum<T, H>(stored: Checksum, hasher: &H, elements: &[T]) -> ErrorFlags
where
    H: ElementHasher<T>,
{
    if Checksum::over(hasher, elements) == stored {
        ErrorFlags::empty()
    } else {
        ErrorFlags::CHECKSUM_MISMATCH
    }
}

/// Checks each guard independently.
pub(crate) fn check_guards(leading: &Guard, trailing: &Guard) -> ErrorFlags {
    let mut flags = ErrorFlags::empty();

    if !leading.is_intact() {
        flags |= ErrorFlags::BOUNDARY_CORRUPTION_BEFORE;
    }

    if !trailing.is_intact() {
        flags |= ErrorFlags::BOUNDARY_CORRUPTION_AFTER;
    }

    flags
}
