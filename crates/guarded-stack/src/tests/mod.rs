// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

mod report;

use core::fmt;
use core::hash::Hash;
use core::mem;

use crate::{
    AllocError, DumpPolicy, GuardedStack, HeapAllocator, MemorySink, SlotAllocator, StackConfig,
    StdElementHasher, ValidationMode,
};

/// Hands out blocks that still hold leftover `u64` elements.
pub(crate) struct DirtyAllocator;

impl SlotAllocator for DirtyAllocator {
    fn allocate<T>(&self, capacity: usize) -> Result<Vec<T>, AllocError> {
        assert_eq!(mem::size_of::<T>(), mem::size_of::<u64>());
        assert_eq!(mem::align_of::<T>(), mem::align_of::<u64>());

        let mut leftovers = mem::ManuallyDrop::new(vec![0xA5A5_A5A5_u64; capacity.max(1)]);
        let (ptr, len, cap) = (leftovers.as_mut_ptr(), leftovers.len(), leftovers.capacity());

        // SAFETY: only ever used with `T = u64`; size and alignment are checked
        // above and ownership of the block moves into the new `Vec`.
        Ok(unsafe { Vec::from_raw_parts(ptr.cast::<T>(), len, cap) })
    }
}

/// Safe mode with dumps, independent of the enabled features.
pub(crate) fn safe_config(capacity: usize) -> StackConfig {
    StackConfig::default()
        .with_initial_capacity(capacity)
        .with_validation(ValidationMode::Safe)
        .with_dump(DumpPolicy::Enabled)
}

pub(crate) fn fast_config(capacity: usize) -> StackConfig {
    safe_config(capacity).with_validation(ValidationMode::Fast)
}

/// Stack with default hasher and allocator reporting into a memory sink.
pub(crate) fn stack_with_sink<T>(config: StackConfig) -> (GuardedStack<T>, MemorySink)
where
    T: Hash + fmt::Debug,
{
    let sink = MemorySink::new();
    let stack = GuardedStack::with_config(config, StdElementHasher, HeapAllocator)
        .with_sink(sink.clone());

    (stack, sink)
}
