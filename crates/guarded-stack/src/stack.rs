// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use core::cell::Cell;
use core::fmt;
use core::hash::Hash;

use tracing::{debug, error, trace, warn};

use crate::allocator::{HeapAllocator, SlotAllocator};
use crate::buffer::SlotBuffer;
use crate::config::{DumpPolicy, StackConfig, ValidationMode};
use crate::error::{ErrorFlags, StackError};
use crate::hash::{ElementHasher, StdElementHasher};
use crate::integrity::{Checksum, Guard, check_checksum, check_guards};
use crate::report::{DiagnosticSink, Dump, SlotFormatter, StderrSink, render};

/// Observable lifecycle state of a [`GuardedStack`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackState {
    /// No live elements, no violation detected.
    Empty,
    /// At least one live element, no violation detected.
    NonEmpty,
    /// A violation was reported. Every further operation fails.
    Poisoned,
}

/// Growable stack that validates itself on every public operation.
///
/// Each operation may grow the storage, then runs the validation pass:
/// the running checksum is recomputed over the live elements and both guard
/// words are compared against [`GUARD_VALUE`](crate::GUARD_VALUE). Any
/// detected violation is added to a sticky [`ErrorFlags`] set, a report is
/// written to the [`DiagnosticSink`], and the instance becomes
/// [`StackState::Poisoned`]. From then on every operation returns
/// [`StackError::Poisoned`] without touching the stack.
///
/// The type is deliberately not `Clone`.
///
/// # Example
///
/// ```rust
/// use guarded_stack::{GuardedStack, StackError};
///
/// fn example() -> Result<(), StackError> {
///     let mut stack = GuardedStack::new(2);
///     stack.push("a")?;
///     stack.push("b")?;
///     stack.push("c")?;
///
///     assert_eq!(stack.capacity(), 4);
///     assert_eq!(*stack.top()?, "c");
///     assert_eq!(stack.pop()?, "c");
///     Ok(())
/// }
/// # example().unwrap();
/// ```
#[repr(C)]
pub struct GuardedStack<T, H = StdElementHasher, A = HeapAllocator>
where
    A: SlotAllocator,
{
    leading_guard: Guard,
    hasher: H,
    checksum: Checksum,
    buffer: SlotBuffer<T, A>,
    errors: Cell<ErrorFlags>,
    poisoned: Cell<Option<ErrorFlags>>,
    config: StackConfig,
    sink: Box<dyn DiagnosticSink>,
    fmt_slot: Option<SlotFormatter<T>>,
    trailing_guard: Guard,
}

impl<T: Hash + fmt::Debug> GuardedStack<T> {
    /// Creates a stack with `initial_capacity` slots and default settings.
    pub fn new(initial_capacity: usize) -> Self {
        Self::with_config(
            StackConfig::default().with_initial_capacity(initial_capacity),
            StdElementHasher,
            HeapAllocator,
        )
    }
}

impl<T: Hash + fmt::Debug> Default for GuardedStack<T> {
    fn default() -> Self {
        Self::with_config(StackConfig::default(), StdElementHasher, HeapAllocator)
    }
}

impl<T, H, A> GuardedStack<T, H, A>
where
    T: fmt::Debug,
    H: ElementHasher<T>,
    A: SlotAllocator,
{
    /// Creates a stack from an explicit configuration, hasher and allocator.
    ///
    /// Construction never fails. If the initial allocation fails the
    /// instance records [`ErrorFlags::ALLOCATION_FAILURE`], keeps capacity 0,
    /// and the first validating operation reports it.
    pub fn with_config(config: StackConfig, hasher: H, allocator: A) -> Self {
        let fmt_slot: SlotFormatter<T> = <T as fmt::Debug>::fmt;

        Self::assemble(config, hasher, SlotBuffer::unallocated(allocator), Some(fmt_slot))
            .with_initial_storage()
    }
}

impl<T, H, A> GuardedStack<T, H, A>
where
    H: ElementHasher<T>,
    A: SlotAllocator,
{
    /// Like [`with_config`](Self::with_config) for element types without
    /// `Debug`. Reports from this instance never carry a dump.
    pub fn with_config_opaque(config: StackConfig, hasher: H, allocator: A) -> Self {
        Self::assemble(config, hasher, SlotBuffer::unallocated(allocator), None)
            .with_initial_storage()
    }

    fn assemble(
        config: StackConfig,
        hasher: H,
        buffer: SlotBuffer<T, A>,
        fmt_slot: Option<SlotFormatter<T>>,
    ) -> Self {
        Self {
            leading_guard: Guard::armed(),
            hasher,
            checksum: Checksum::default(),
            buffer,
            errors: Cell::new(ErrorFlags::empty()),
            poisoned: Cell::new(None),
            config,
            sink: Box::new(StderrSink),
            fmt_slot,
            trailing_guard: Guard::armed(),
        }
    }

    fn with_initial_storage(mut self) -> Self {
        let capacity = self.config.initial_capacity;

        if let Err(err) = self.buffer.allocate(capacity) {
            warn!(capacity, %err, "initial allocation failed");
            self.record(ErrorFlags::ALLOCATION_FAILURE);
        }

        self
    }

    /// Replaces the destination of violation reports.
    pub fn with_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Number of live elements. Does not validate.
    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Number of allocated slots. Does not validate.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Current value of the running checksum. Does not validate.
    #[inline]
    pub fn checksum(&self) -> u64 {
        self.checksum.value()
    }

    /// Sticky set of every violation recorded so far.
    #[inline]
    pub fn errors(&self) -> ErrorFlags {
        self.errors.get()
    }

    /// Returns true once a violation has been reported.
    #[inline]
    pub fn is_poisoned(&self) -> bool {
        self.poisoned.get().is_some()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> StackState {
        if self.is_poisoned() {
            StackState::Poisoned
        } else if self.buffer.len() == 0 {
            StackState::Empty
        } else {
            StackState::NonEmpty
        }
    }

    /// Configuration the instance was built with.
    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    /// Live elements, bottom first. Does not validate.
    pub fn as_slice(&self) -> &[T] {
        self.buffer.as_slice()
    }

    #[inline]
    fn record(&self, flags: ErrorFlags) {
        self.errors.set(self.errors.get() | flags);
    }

    fn ensure_live(&self) -> Result<(), StackError> {
        match self.poisoned.get() {
            Some(flags) => {
                trace!(%flags, "operation on poisoned stack");
                Err(StackError::Poisoned(flags))
            }
            None => Ok(()),
        }
    }

    fn grow(&mut self) {
        let from = self.buffer.capacity();

        match self.buffer.grow() {
            Ok(to) => debug!(from, to, "stack storage grown"),
            Err(err) => {
                warn!(capacity = from, %err, "stack growth failed");
                self.record(ErrorFlags::ALLOCATION_FAILURE);
            }
        }
    }
}

impl<T, H, A> GuardedStack<T, H, A>
where
    H: ElementHasher<T>,
    A: SlotAllocator,
{
    /// Pushes `value`, growing the storage when full.
    ///
    /// Validation runs after any growth and before the write. If growth
    /// failed nothing is written.
    pub fn push(&mut self, value: T) -> Result<(), StackError> {
        self.ensure_live()?;

        if self.buffer.is_full() {
            self.grow();
        }

        self.validate()?;

        let hash = self.hasher.hash_element(&value);
        self.buffer
            .try_push(value)
            .map_err(|_| StackError::AllocationFailure)?;
        self.checksum = self.checksum.add(hash);
        trace!(len = self.buffer.len(), "pushed");

        Ok(())
    }

    /// Pushes a copy of `value`. Behaves exactly like [`push`](Self::push).
    pub fn push_cloned(&mut self, value: &T) -> Result<(), StackError>
    where
        T: Clone,
    {
        self.push(value.clone())
    }

    /// Removes and returns the top element.
    ///
    /// On an empty stack [`ErrorFlags::POP_FROM_EMPTY`] is recorded. Validation
    /// runs after the attempt in both cases.
    pub fn pop(&mut self) -> Result<T, StackError> {
        self.ensure_live()?;

        let popped = self.buffer.pop();
        match &popped {
            Some(value) => {
                self.checksum = self.checksum.sub(self.hasher.hash_element(value));
                trace!(len = self.buffer.len(), "popped");
            }
            None => self.record(ErrorFlags::POP_FROM_EMPTY),
        }

        self.validate()?;
        popped.ok_or(StackError::Empty)
    }

    /// Returns the top element.
    ///
    /// On an empty stack [`ErrorFlags::TOP_FROM_EMPTY`] is recorded and the
    /// call fails before any reference is produced.
    pub fn top(&self) -> Result<&T, StackError> {
        self.ensure_live()?;

        if self.buffer.len() == 0 {
            self.record(ErrorFlags::TOP_FROM_EMPTY);
        }

        self.validate()?;
        self.buffer.last().ok_or(StackError::Empty)
    }

    /// Returns the top element mutably.
    ///
    /// Writes through the reference bypass checksum bookkeeping; changing the
    /// element's hash is reported as [`ErrorFlags::CHECKSUM_MISMATCH`] by the
    /// next validating operation.
    pub fn top_mut(&mut self) -> Result<&mut T, StackError> {
        self.ensure_live()?;

        if self.buffer.len() == 0 {
            self.record(ErrorFlags::TOP_FROM_EMPTY);
        }

        self.validate()?;
        self.buffer.last_mut().ok_or(StackError::Empty)
    }

    /// Validates, then returns true if the stack holds no elements.
    pub fn is_empty(&self) -> Result<bool, StackError> {
        self.validate()?;
        Ok(self.buffer.len() == 0)
    }

    /// Runs the validation pass.
    ///
    /// Recomputes the checksum, checks both guards, and reports if any flag
    /// is set. Skipped entirely in [`ValidationMode::Fast`].
    pub fn validate(&self) -> Result<(), StackError> {
        self.ensure_live()?;

        if self.config.validation == ValidationMode::Fast {
            return Ok(());
        }

        self.record(check_checksum(
            self.checksum,
            &self.hasher,
            self.buffer.as_slice(),
        ));
        self.record(check_guards(&self.leading_guard, &self.trailing_guard));

        self.report()
    }

    /// Emits the report and poisons the instance if any flag is set.
    fn report(&self) -> Result<(), StackError> {
        let flags = self.errors.get();
        if flags.is_empty() {
            return Ok(());
        }

        error!(
            %flags,
            len = self.buffer.len(),
            capacity = self.buffer.capacity(),
            "stack integrity violation"
        );

        let dump = self
            .fmt_slot
            .filter(|_| self.config.dump == DumpPolicy::Enabled && self.buffer.has_storage())
            .map(|fmt_slot| Dump {
                instance: (self as *const Self).cast::<()>(),
                storage: self.buffer.as_ptr(),
                capacity: self.buffer.capacity(),
                live: self.buffer.as_slice(),
                fmt_slot,
            });

        self.sink.emit(&render(flags, dump.as_ref()));
        self.poisoned.set(Some(flags));

        Err(StackError::Violation(flags))
    }
}

impl<T, H, A> fmt::Debug for GuardedStack<T, H, A>
where
    A: SlotAllocator,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuardedStack")
            .field("len", &self.buffer.len())
            .field("capacity", &self.buffer.capacity())
            .field("checksum", &self.checksum.value())
            .field("errors", &self.errors.get())
            .field("poisoned", &self.poisoned.get().is_some())
            .finish()
    }
}

/// Corruption hooks for exercising the detectors.
///
/// These write to the instance the way foreign code or a stray raw pointer
/// would: without any bookkeeping.
#[cfg(any(test, feature = "test_utils"))]
impl<T, H, A> GuardedStack<T, H, A>
where
    A: SlotAllocator,
{
    /// Overwrites the leading guard word.
    pub fn corrupt_leading_guard(&mut self, value: usize) {
        self.leading_guard.overwrite(value);
    }

    /// Overwrites the trailing guard word.
    pub fn corrupt_trailing_guard(&mut self, value: usize) {
        self.trailing_guard.overwrite(value);
    }

    /// Shifts the stored checksum by `delta`.
    pub fn corrupt_checksum(&mut self, delta: u64) {
        self.checksum = self.checksum.add(delta);
    }

    /// Live elements, writable without checksum bookkeeping.
    pub fn slots_mut_unchecked(&mut self) -> &mut [T] {
        self.buffer.as_mut_slice()
    }
}

#[cfg(test)]
impl<H, A> GuardedStack<(), H, A>
where
    H: ElementHasher<()>,
    A: SlotAllocator,
{
    /// Stack whose storage already holds `capacity` unit elements.
    ///
    /// The checksum starts at 0, so only fast mode is meaningful.
    pub(crate) fn saturated(
        config: StackConfig,
        hasher: H,
        allocator: A,
        capacity: usize,
    ) -> Self {
        let fmt_slot: SlotFormatter<()> = <() as fmt::Debug>::fmt;

        Self::assemble(config, hasher, SlotBuffer::saturated(allocator, capacity), Some(fmt_slot))
    }
}
