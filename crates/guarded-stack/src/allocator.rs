// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Allocation seam: storage is requested and released by slot count.

use crate::error::AllocError;

/// Source of slot storage for a [`GuardedStack`](crate::GuardedStack).
///
/// `allocate` returns an empty `Vec` whose capacity is at least `capacity`.
/// Failure is reported as a value, never as an abort. Every `Vec` returned by
/// `allocate` is handed back to `deallocate` exactly once, even when its
/// capacity is 0.
pub trait SlotAllocator {
    /// Requests storage for `capacity` elements.
    fn allocate<T>(&self, capacity: usize) -> Result<Vec<T>, AllocError>;

    /// Releases storage previously returned by `allocate`.
    fn deallocate<T>(&self, slots: Vec<T>) {
        drop(slots);
    }
}

/// Global-heap allocator backed by `Vec::try_reserve_exact`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeapAllocator;

impl SlotAllocator for HeapAllocator {
    fn allocate<T>(&self, capacity: usize) -> Result<Vec<T>, AllocError> {
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| AllocError::OutOfMemory { capacity })?;

        Ok(slots)
    }
}

#[cfg(any(test, feature = "test_utils"))]
pub use test_allocators::{CountingAllocator, FailingAllocator};

#[cfg(any(test, feature = "test_utils"))]
mod test_allocators {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::{HeapAllocator, SlotAllocator};
    use crate::error::AllocError;

    /// Heap allocator that counts calls through shared handles.
    ///
    /// Clones share the same counters, so a test can keep one handle and
    /// hand the other to the stack.
    #[derive(Debug, Clone, Default)]
    pub struct CountingAllocator {
        allocations: Rc<Cell<usize>>,
        deallocations: Rc<Cell<usize>>,
        last_capacity: Rc<Cell<usize>>,
    }

    impl CountingAllocator {
        /// Creates an allocator with zeroed counters.
        pub fn new() -> Self {
            Self::default()
        }

        /// Successful `allocate` calls so far.
        pub fn allocations(&self) -> usize {
            self.allocations.get()
        }

        /// `deallocate` calls so far.
        pub fn deallocations(&self) -> usize {
            self.deallocations.get()
        }

        /// Capacity requested by the most recent successful `allocate`.
        pub fn last_capacity(&self) -> usize {
            self.last_capacity.get()
        }
    }

    impl SlotAllocator for CountingAllocator {
        fn allocate<T>(&self, capacity: usize) -> Result<Vec<T>, AllocError> {
            let slots = HeapAllocator.allocate(capacity)?;
            self.allocations.set(self.allocations.get() + 1);
            self.last_capacity.set(capacity);
            Ok(slots)
        }

        fn deallocate<T>(&self, slots: Vec<T>) {
            self.deallocations.set(self.deallocations.get() + 1);
            drop(slots);
        }
    }

    /// Allocator that succeeds `succeed_times` times, then always fails.
    ///
    /// The behaviour is sticky: once it starts failing it never recovers.
    #[derive(Debug, Clone)]
    pub struct FailingAllocator {
        remaining: Rc<Cell<usize>>,
    }

    impl FailingAllocator {
        /// Fails every request.
        pub fn always() -> Self {
            Self::after(0)
        }

        /// Lets `succeed_times` requests through before failing.
        pub fn after(succeed_times: usize) -> Self {
            Self {
                remaining: Rc::new(Cell::new(succeed_times)),
            }
        }
    }

    impl SlotAllocator for FailingAllocator {
        fn allocate<T>(&self, capacity: usize) -> Result<Vec<T>, AllocError> {
            match self.remaining.get() {
                0 => Err(AllocError::OutOfMemory { capacity }),
                n => {
                    self.remaining.set(n - 1);
                    HeapAllocator.allocate(capacity)
                }
            }
        }
    }
}
