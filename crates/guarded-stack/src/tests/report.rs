// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use core::fmt;

use crate::report::{Dump, render};
use crate::{DiagnosticSink, ErrorFlags, MemorySink};

fn dump_of(live: &[u32], capacity: usize) -> Dump<'_, u32> {
    Dump {
        instance: core::ptr::null(),
        storage: live.as_ptr(),
        capacity,
        live,
        fmt_slot: <u32 as fmt::Debug>::fmt,
    }
}

// =============================================================================
// render()
// =============================================================================

#[test]
fn test_render_single_flag_without_dump() {
    let report = render::<u32>(ErrorFlags::POP_FROM_EMPTY, None);

    assert_eq!(
        report,
        "Errors found:\n\tPop from empty stack was performed;\n"
    );
}

#[test]
fn test_render_lines_in_stable_order() {
    let flags = ErrorFlags::TOP_FROM_EMPTY
        | ErrorFlags::BOUNDARY_CORRUPTION_AFTER
        | ErrorFlags::ALLOCATION_FAILURE;

    let report = render::<u32>(flags, None);

    assert_eq!(
        report,
        "Errors found:\n\
         \tFailed to allocate memory;\n\
         \tCanary after the stack is corrupted;\n\
         \tTop from empty stack was performed;\n"
    );
}

#[test]
fn test_render_appends_dump() {
    let live = [11u32, 22];
    let dump = dump_of(&live, 3);

    let report = render(ErrorFlags::CHECKSUM_MISMATCH, Some(&dump));

    assert!(report.starts_with("Errors found:\n\tCheck of control sum failed;\nDump:\n"));
    assert!(report.contains("stack = 0x0\n"));
    assert!(report.contains("\tbuffer[3] = 0x"));
    assert!(report.contains("\t\t[0] = 11\n"));
    assert!(report.contains("\t\t[1] = 22\n"));
    assert!(report.contains("\t\t[2] = <uninit>\n"));
    assert!(report.ends_with("\t}\n\tsize = 2\n}\n"));
}

#[test]
fn test_dump_uses_debug_formatting() {
    let live = [String::from("kek")];
    let dump = Dump {
        instance: core::ptr::null(),
        storage: live.as_ptr(),
        capacity: 1,
        live: &live,
        fmt_slot: <String as fmt::Debug>::fmt,
    };

    assert!(dump.to_string().contains("\t\t[0] = \"kek\"\n"));
}

#[test]
fn test_dump_uses_captured_slot_formatter() {
    let live = [7u32, 8];
    let dump = Dump {
        instance: core::ptr::null(),
        storage: live.as_ptr(),
        capacity: 3,
        live: &live,
        fmt_slot: |_, f| f.write_str("***"),
    };

    let rendered = dump.to_string();

    assert!(rendered.contains("\t\t[0] = ***\n"));
    assert!(rendered.contains("\t\t[1] = ***\n"));
    assert!(rendered.contains("\t\t[2] = <uninit>\n"));
}

// =============================================================================
// MemorySink
// =============================================================================

#[test]
fn test_memory_sink_collects_reports() {
    let sink = MemorySink::new();
    let handle = sink.clone();

    handle.emit("first");
    handle.emit("second");

    assert_eq!(sink.count(), 2);
    assert_eq!(sink.reports(), vec!["first".to_owned(), "second".to_owned()]);
    assert_eq!(sink.last().as_deref(), Some("second"));
}
