// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use std::cell::RefCell;
use std::rc::Rc;

use guarded_stack::{
    DiagnosticSink, DumpPolicy, ErrorFlags, GuardedStack, HeapAllocator, StackConfig, StackError,
    StackState, StdElementHasher, ValidationMode,
};

#[derive(Clone, Default)]
struct CapturingSink(Rc<RefCell<Vec<String>>>);

impl DiagnosticSink for CapturingSink {
    fn emit(&self, report: &str) {
        self.0.borrow_mut().push(report.to_owned());
    }
}

fn guarded<T>(capacity: usize) -> (GuardedStack<T>, CapturingSink)
where
    T: std::hash::Hash + std::fmt::Debug,
{
    let sink = CapturingSink::default();
    let config = StackConfig::default()
        .with_initial_capacity(capacity)
        .with_validation(ValidationMode::Safe)
        .with_dump(DumpPolicy::Enabled);
    let stack =
        GuardedStack::with_config(config, StdElementHasher, HeapAllocator).with_sink(sink.clone());

    (stack, sink)
}

#[test]
fn test_kek_lifecycle_ends_poisoned() {
    let (mut stack, sink) = guarded(4);

    stack.push("kek").expect("Failed to push(..)");
    stack.push("kek").expect("Failed to push(..)");
    assert_eq!(stack.len(), 2);
    assert!(stack.errors().is_empty());

    stack.pop().expect("Failed to pop()");
    stack.pop().expect("Failed to pop()");
    assert_eq!(stack.len(), 0);
    assert!(stack.errors().is_empty());
    assert!(sink.0.borrow().is_empty());

    let err = stack.pop().unwrap_err();
    assert_eq!(err, StackError::Violation(ErrorFlags::POP_FROM_EMPTY));
    assert!(err.is_fatal());
    assert_eq!(stack.state(), StackState::Poisoned);
    assert_eq!(sink.0.borrow().len(), 1);

    assert_eq!(
        stack.push("kek"),
        Err(StackError::Poisoned(ErrorFlags::POP_FROM_EMPTY))
    );
    assert_eq!(
        stack.is_empty(),
        Err(StackError::Poisoned(ErrorFlags::POP_FROM_EMPTY))
    );
    assert!(stack.errors().contains(ErrorFlags::POP_FROM_EMPTY));
}

#[test]
fn test_third_push_grows_once() {
    let (mut stack, sink) = guarded(2);

    stack.push('A').expect("Failed to push(..)");
    stack.push('B').expect("Failed to push(..)");
    assert_eq!(stack.capacity(), 2);

    stack.push('C').expect("Failed to push(..)");

    assert_eq!(stack.capacity(), 4);
    assert_eq!(stack.as_slice(), &['A', 'B', 'C']);
    assert!(stack.errors().is_empty());
    assert!(sink.0.borrow().is_empty());

    assert_eq!(stack.pop(), Ok('C'));
    assert_eq!(stack.pop(), Ok('B'));
    assert_eq!(stack.top(), Ok(&'A'));
}

#[test]
fn test_top_on_empty_never_yields_a_value() {
    let (stack, sink) = guarded::<String>(1);

    let result = stack.top();

    assert_eq!(result, Err(StackError::Violation(ErrorFlags::TOP_FROM_EMPTY)));
    assert_eq!(sink.0.borrow().len(), 1);
    assert!(sink.0.borrow()[0].contains("Top from empty stack was performed;"));
}
