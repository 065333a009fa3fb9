// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for guarded-stack.

use core::fmt;

use bitflags::bitflags;
use thiserror::Error;

bitflags! {
    /// Sticky set of detected violations.
    ///
    /// Flags are declared in reporting order: iterating a set yields them in
    /// the order their diagnostic lines are written.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ErrorFlags: u8 {
        /// `pop()` was called on an empty stack.
        const POP_FROM_EMPTY = 1 << 1;
        /// Storage could not be allocated (construction or growth).
        const ALLOCATION_FAILURE = 1 << 2;
        /// Stored checksum differs from the recomputed one.
        const CHECKSUM_MISMATCH = 1 << 3;
        /// The leading guard no longer holds the sentinel value.
        const BOUNDARY_CORRUPTION_BEFORE = 1 << 4;
        /// The trailing guard no longer holds the sentinel value.
        const BOUNDARY_CORRUPTION_AFTER = 1 << 5;
        /// `top()` was called on an empty stack.
        const TOP_FROM_EMPTY = 1 << 6;
    }
}

impl ErrorFlags {
    /// Human-readable sentence for a single flag.
    ///
    /// Returns `None` for the empty set or for sets with more than one flag.
    pub fn diagnostic(self) -> Option<&'static str> {
        const LINES: [(ErrorFlags, &str); 6] = [
            (ErrorFlags::POP_FROM_EMPTY, "Pop from empty stack was performed;"),
            (ErrorFlags::ALLOCATION_FAILURE, "Failed to allocate memory;"),
            (ErrorFlags::CHECKSUM_MISMATCH, "Check of control sum failed;"),
            (
                ErrorFlags::BOUNDARY_CORRUPTION_BEFORE,
                "Canary before the stack is corrupted;",
            ),
            (
                ErrorFlags::BOUNDARY_CORRUPTION_AFTER,
                "Canary after the stack is corrupted;",
            ),
            (ErrorFlags::TOP_FROM_EMPTY, "Top from empty stack was performed;"),
        ];

        LINES
            .iter()
            .find(|(flag, _)| *flag == self)
            .map(|(_, line)| *line)
    }
}

impl fmt::Display for ErrorFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("NONE");
        }

        for (i, (name, _)) in self.iter_names().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            f.write_str(name)?;
        }

        Ok(())
    }
}

/// Fatal failure returned by stack operations.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum StackError {
    /// A validation pass found violations. The diagnostic was emitted and the
    /// instance is now poisoned.
    #[error("stack integrity violation: {0}")]
    Violation(ErrorFlags),

    /// The instance was poisoned by an earlier violation.
    #[error("stack is poisoned: {0}")]
    Poisoned(ErrorFlags),

    /// Fast mode only: `pop` or `top` on an empty stack.
    #[error("stack is empty")]
    Empty,

    /// Fast mode only: growth failed and `push` refused to write past capacity.
    #[error("failed to grow stack storage")]
    AllocationFailure,
}

impl StackError {
    /// Violation flags carried by this error, if any.
    pub fn flags(&self) -> ErrorFlags {
        match self {
            Self::Violation(flags) | Self::Poisoned(flags) => *flags,
            Self::Empty => ErrorFlags::empty(),
            Self::AllocationFailure => ErrorFlags::ALLOCATION_FAILURE,
        }
    }

    /// Returns true if the error comes from a poisoned instance, either freshly
    /// (`Violation`) or from an earlier failure (`Poisoned`).
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Violation(_) | Self::Poisoned(_))
    }
}

/// Errors from the [`SlotAllocator`](crate::SlotAllocator) seam.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
pub enum AllocError {
    /// The allocator could not provide storage.
    #[error("failed to allocate {capacity} slots")]
    OutOfMemory {
        /// Requested slot count.
        capacity: usize,
    },

    /// Doubling the capacity would overflow `usize`.
    #[error("capacity overflow while growing from {capacity} slots")]
    CapacityOverflow {
        /// Capacity before the attempted growth.
        capacity: usize,
    },

    /// The allocator returned less storage than requested.
    #[error("allocator granted {granted} slots, {requested} requested")]
    Undersized {
        /// Requested slot count.
        requested: usize,
        /// Slot count actually available.
        granted: usize,
    },

    /// The allocator returned a block that already holds elements.
    #[error("allocator returned a block holding {len} elements")]
    Occupied {
        /// Number of leftover elements.
        len: usize,
    },
}
