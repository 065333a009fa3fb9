// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Self-validating growable stack.
//!
//! `GuardedStack<T>` checks its own integrity on every public operation
//! instead of trusting the caller:
//!
//! - **Guard words** bracket the instance and must keep the sentinel
//!   [`GUARD_VALUE`].
//! - **Running checksum**: a wrapping sum of per-element hashes, recomputed
//!   and compared on every validation pass.
//! - **Sticky errors**: violations accumulate in [`ErrorFlags`] and are never
//!   cleared.
//! - **Poisoning**: the first report turns the instance into a terminal state
//!   where every operation returns [`StackError::Poisoned`].
//!
//! Storage grows by doubling. A failed growth is recorded as
//! [`ErrorFlags::ALLOCATION_FAILURE`] and nothing is written past capacity.
//!
//! The checksum and guards are best-effort detectors, not cryptographic
//! integrity.
//!
//! # Example
//!
//! ```rust
//! use guarded_stack::{ErrorFlags, GuardedStack, StackError, StackState};
//!
//! let mut stack = GuardedStack::new(4);
//! stack.push("kek").unwrap();
//! stack.push("kek").unwrap();
//! assert_eq!(stack.len(), 2);
//!
//! stack.pop().unwrap();
//! stack.pop().unwrap();
//!
//! // Popping an empty stack is a violation. The report goes to stderr.
//! let err = stack.pop().unwrap_err();
//! assert_eq!(err, StackError::Violation(ErrorFlags::POP_FROM_EMPTY));
//! assert_eq!(stack.state(), StackState::Poisoned);
//!
//! // Poisoned for good.
//! assert!(matches!(stack.is_empty(), Err(StackError::Poisoned(_))));
//! ```
//!
//! # Configuration
//!
//! [`StackConfig`] selects the initial capacity, the [`ValidationMode`] and the
//! [`DumpPolicy`]. Their defaults follow the `safe-mode` and `dump` features.
//! Hashing and allocation are pluggable through [`ElementHasher`] and
//! [`SlotAllocator`]; reports go to a [`DiagnosticSink`].
//!
//! # Test Utilities
//!
//! The `test_utils` feature exposes corruption hooks on [`GuardedStack`],
//! `CountingAllocator`, `FailingAllocator` and `MemorySink`.

#![warn(missing_docs)]

mod allocator;
mod buffer;
mod config;
mod error;
mod hash;
mod integrity;
mod report;
mod stack;

#[cfg(test)]
mod tests;

pub use allocator::{HeapAllocator, SlotAllocator};
pub use buffer::GROWTH_FACTOR;
pub use config::{DEFAULT_CAPACITY, DumpPolicy, StackConfig, ValidationMode};
pub use error::{AllocError, ErrorFlags, StackError};
pub use hash::{ElementHasher, FnHasher, StdElementHasher};
pub use integrity::GUARD_VALUE;
pub use report::{DiagnosticSink, StderrSink};
pub use stack::{GuardedStack, StackState};

#[cfg(any(test, feature = "test_utils"))]
pub use allocator::{CountingAllocator, FailingAllocator};
#[cfg(any(test, feature = "test_utils"))]
pub use report::MemorySink;
