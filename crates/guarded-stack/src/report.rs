// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Violation reports: diagnostic lines plus an optional structural dump.
//!
//! A report looks like:
//!
//! ```text
//! Errors found:
//! 	Pop from empty stack was performed;
//! Dump:
//! stack = 0x7ffd5e0c2a40
//! {
//! 	buffer[4] = 0x55d0c8a3e2b0
//! 	{
//! 		[0] = <uninit>
//! 		[1] = <uninit>
//! 		[2] = <uninit>
//! 		[3] = <uninit>
//! 	}
//! 	size = 0
//! }
//! ```

use core::fmt::{self, Write};

use crate::error::ErrorFlags;

/// Destination for rendered violation reports.
pub trait DiagnosticSink {
    /// Writes one complete report.
    fn emit(&self, report: &str);
}

/// Writes reports to the standard error stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn emit(&self, report: &str) {
        eprint!("{report}");
    }
}

/// Formats one live slot in the dump.
pub(crate) type SlotFormatter<T> = fn(&T, &mut fmt::Formatter<'_>) -> fmt::Result;

/// Snapshot of the instance layout printed after the diagnostic lines.
pub(crate) struct Dump<'a, T> {
    pub(crate) instance: *const (),
    pub(crate) storage: *const T,
    pub(crate) capacity: usize,
    pub(crate) live: &'a [T],
    pub(crate) fmt_slot: SlotFormatter<T>,
}

impl<T> fmt::Display for Dump<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dump:")?;
        writeln!(f, "stack = {:p}", self.instance)?;
        writeln!(f, "{{")?;
        writeln!(f, "\tbuffer[{}] = {:p}", self.capacity, self.storage)?;
        writeln!(f, "\t{{")?;

        for i in 0..self.capacity {
            write!(f, "\t\t[{i}] = ")?;
            match self.live.get(i) {
                Some(element) => (self.fmt_slot)(element, f)?,
                None => f.write_str("<uninit>")?,
            }
            writeln!(f)?;
        }

        writeln!(f, "\t}}")?;
        writeln!(f, "\tsize = {}", self.live.len())?;
        writeln!(f, "}}")
    }
}

/// Renders the report for a nonzero flag set.
///
/// One line per set flag in declaration order, then the dump when given.
pub(crate) fn render<T>(flags: ErrorFlags, dump: Option<&Dump<'_, T>>) -> String {
    let mut report = String::from("Errors found:\n");

    for flag in flags.iter() {
        if let Some(line) = flag.diagnostic() {
            // Writing into a String cannot fail.
            let _ = writeln!(report, "\t{line}");
        }
    }

    if let Some(dump) = dump {
        let _ = write!(report, "{dump}");
    }

    report
}

#[cfg(any(test, feature = "test_utils"))]
pub use memory_sink::MemorySink;

#[cfg(any(test, feature = "test_utils"))]
mod memory_sink {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::DiagnosticSink;

    /// Collects reports in memory. Clones share the same storage.
    #[derive(Debug, Clone, Default)]
    pub struct MemorySink {
        reports: Rc<RefCell<Vec<String>>>,
    }

    impl MemorySink {
        /// Creates an empty sink.
        pub fn new() -> Self {
            Self::default()
        }

        /// All reports emitted so far, oldest first.
        pub fn reports(&self) -> Vec<String> {
            self.reports.borrow().clone()
        }

        /// Number of reports emitted so far.
        pub fn count(&self) -> usize {
            self.reports.borrow().len()
        }

        /// The most recent report.
        pub fn last(&self) -> Option<String> {
            self.reports.borrow().last().cloned()
        }
    }

    impl DiagnosticSink for MemorySink {
        fn emit(&self, report: &str) {
            self.reports.borrow_mut().push(report.to_owned());
        }
    }
}
