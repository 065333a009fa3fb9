// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use core::hash::{BuildHasher, BuildHasherDefault, Hash};
use std::collections::hash_map::DefaultHasher;

/// Per-element hash feeding the running checksum.
///
/// The checksum is a wrapping sum of these values, so it detects accidental
/// tampering only. Different element multisets can produce the same sum.
pub trait ElementHasher<T: ?Sized> {
    /// Hashes a single element.
    fn hash_element(&self, value: &T) -> u64;
}

/// Hashes elements through `std::hash::Hash` with fixed SipHash keys.
///
/// Every instance produces the same value for the same input, so a checksum
/// stays comparable across the lifetime of the stack.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdElementHasher;

impl<T: Hash + ?Sized> ElementHasher<T> for StdElementHasher {
    #[inline]
    fn hash_element(&self, value: &T) -> u64 {
        BuildHasherDefault::<DefaultHasher>::default().hash_one(value)
    }
}

/// Adapts a closure into an [`ElementHasher`].
///
/// ```rust
/// use guarded_stack::{ElementHasher, FnHasher};
///
/// let hasher = FnHasher(|v: &u32| u64::from(*v));
/// assert_eq!(hasher.hash_element(&7u32), 7);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FnHasher<F>(pub F);

impl<T: ?Sized, F> ElementHasher<T> for FnHasher<F>
where
    F: Fn(&T) -> u64,
{
    #[inline]
    fn hash_element(&self, value: &T) -> u64 {
        (self.0)(value)
    }
}
