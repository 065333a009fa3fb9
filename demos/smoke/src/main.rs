// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

// Smoke test: two pushes into a stack of capacity 4.
//
// RUST_LOG=guarded_stack=trace cargo run -p guarded-stack-smoke

use guarded_stack::{GuardedStack, StackError};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), StackError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut stack = GuardedStack::new(4);
    stack.push(String::from("kek"))?;
    stack.push(String::from("kek"))?;

    Ok(())
}
