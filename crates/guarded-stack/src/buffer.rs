// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Capacity-sized slot storage with doubling growth.

use core::mem;

use crate::allocator::SlotAllocator;
use crate::error::AllocError;

/// Capacity multiplier applied on every growth step.
pub const GROWTH_FACTOR: usize = 2;

/// Exclusively owned storage of `capacity` slots.
///
/// Slots `[0, len)` are live in stack order; the remaining slots up to
/// `capacity` are reserved but unset. The inner `Vec` never reallocates on
/// its own: every write is checked against the logical `capacity`, which the
/// allocator guaranteed the `Vec` can hold.
///
/// Every block obtained from the allocator goes back to it exactly once,
/// zero-capacity blocks included.
pub(crate) struct SlotBuffer<T, A: SlotAllocator> {
    slots: Vec<T>,
    capacity: usize,
    owns_block: bool,
    allocator: A,
}

impl<T, A: SlotAllocator> SlotBuffer<T, A> {
    /// Creates a buffer without storage.
    pub(crate) fn unallocated(allocator: A) -> Self {
        Self {
            slots: Vec::new(),
            capacity: 0,
            owns_block: false,
            allocator,
        }
    }

    /// Installs fresh storage for `capacity` slots.
    ///
    /// Only valid while the buffer holds no live elements. On failure the
    /// buffer is left unchanged.
    pub(crate) fn allocate(&mut self, capacity: usize) -> Result<(), AllocError> {
        debug_assert!(self.slots.is_empty());

        let fresh = self.request(capacity)?;
        self.install(fresh, capacity);

        Ok(())
    }

    /// Doubles the capacity, moving live elements in order.
    ///
    /// Invoked only when the buffer is full. A buffer of capacity 0 grows to 1.
    /// On failure capacity and storage are left unchanged.
    #[cold]
    #[inline(never)]
    pub(crate) fn grow(&mut self) -> Result<usize, AllocError> {
        debug_assert!(self.is_full());

        let new_capacity = match self.capacity {
            0 => 1,
            capacity => capacity
                .checked_mul(GROWTH_FACTOR)
                .ok_or(AllocError::CapacityOverflow { capacity })?,
        };

        let mut fresh = self.request(new_capacity)?;
        fresh.extend(self.slots.drain(..));
        self.install(fresh, new_capacity);

        Ok(new_capacity)
    }

    fn request(&self, capacity: usize) -> Result<Vec<T>, AllocError> {
        let fresh = self.allocator.allocate::<T>(capacity)?;

        if !fresh.is_empty() {
            let len = fresh.len();
            self.allocator.deallocate(fresh);
            return Err(AllocError::Occupied { len });
        }

        if fresh.capacity() < capacity {
            let granted = fresh.capacity();
            self.allocator.deallocate(fresh);
            return Err(AllocError::Undersized {
                requested: capacity,
                granted,
            });
        }

        Ok(fresh)
    }

    fn install(&mut self, fresh: Vec<T>, capacity: usize) {
        let old = mem::replace(&mut self.slots, fresh);
        if mem::replace(&mut self.owns_block, true) {
            self.allocator.deallocate(old);
        }
        self.capacity = capacity;
    }

    /// Writes `value` into the next free slot, handing it back when full.
    pub(crate) fn try_push(&mut self, value: T) -> Result<(), T> {
        if self.is_full() {
            return Err(value);
        }

        self.slots.push(value);
        Ok(())
    }

    pub(crate) fn pop(&mut self) -> Option<T> {
        self.slots.pop()
    }

    pub(crate) fn last(&self) -> Option<&T> {
        self.slots.last()
    }

    pub(crate) fn last_mut(&mut self) -> Option<&mut T> {
        self.slots.last_mut()
    }

    pub(crate) fn as_slice(&self) -> &[T] {
        &self.slots
    }

    #[cfg(any(test, feature = "test_utils"))]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.slots
    }

    /// Address of the storage block.
    pub(crate) fn as_ptr(&self) -> *const T {
        self.slots.as_ptr()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.len() == self.capacity
    }

    /// Returns true once storage has been installed.
    #[inline]
    pub(crate) fn has_storage(&self) -> bool {
        self.capacity > 0
    }
}

#[cfg(test)]
impl<A: SlotAllocator> SlotBuffer<(), A> {
    /// Full buffer of `capacity` unit slots that never touched the allocator.
    pub(crate) fn saturated(allocator: A, capacity: usize) -> Self {
        let mut slots = Vec::new();
        // SAFETY: `()` is zero-sized, so a `Vec<()>` has capacity `usize::MAX`
        // and every slot is trivially initialized.
        unsafe { slots.set_len(capacity) };

        Self {
            slots,
            capacity,
            owns_block: false,
            allocator,
        }
    }
}

impl<T, A: SlotAllocator> Drop for SlotBuffer<T, A> {
    fn drop(&mut self) {
        if self.owns_block {
            let slots = mem::take(&mut self.slots);
            self.allocator.deallocate(slots);
        }
    }
}
