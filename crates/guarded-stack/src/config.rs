// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Per-instance configuration.
//!
//! Defaults follow the crate features: `safe-mode` selects
//! [`ValidationMode::Safe`] and `dump` selects [`DumpPolicy::Enabled`]. Both
//! are on by default.

/// Slot count used when no capacity is given.
pub const DEFAULT_CAPACITY: usize = 64;

/// Whether public operations run the validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Recompute the checksum and check both guards on every operation.
    Safe,
    /// Skip validation entirely. Checksum bookkeeping still happens.
    Fast,
}

impl Default for ValidationMode {
    fn default() -> Self {
        if cfg!(feature = "safe-mode") {
            Self::Safe
        } else {
            Self::Fast
        }
    }
}

/// Whether a violation report includes the structural dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpPolicy {
    /// Append address, capacity, slot contents and size to the report.
    Enabled,
    /// Emit only the diagnostic lines.
    Disabled,
}

impl Default for DumpPolicy {
    fn default() -> Self {
        if cfg!(feature = "dump") {
            Self::Enabled
        } else {
            Self::Disabled
        }
    }
}

/// Configuration for a [`GuardedStack`](crate::GuardedStack).
///
/// # Example
///
/// ```rust
/// use guarded_stack::{DumpPolicy, StackConfig, ValidationMode};
///
/// let config = StackConfig::default()
///     .with_initial_capacity(8)
///     .with_validation(ValidationMode::Safe)
///     .with_dump(DumpPolicy::Disabled);
///
/// assert_eq!(config.initial_capacity, 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackConfig {
    /// Slots allocated at construction.
    pub initial_capacity: usize,
    /// Validation pass policy.
    pub validation: ValidationMode,
    /// Structural dump policy.
    pub dump: DumpPolicy,
}

impl StackConfig {
    /// Sets the initial capacity.
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Sets the validation mode.
    pub fn with_validation(mut self, validation: ValidationMode) -> Self {
        self.validation = validation;
        self
    }

    /// Sets the dump policy.
    pub fn with_dump(mut self, dump: DumpPolicy) -> Self {
        self.dump = dump;
        self
    }
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            validation: ValidationMode::default(),
            dump: DumpPolicy::default(),
        }
    }
}
