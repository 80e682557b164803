//! Worker-count resolution
//!
//! Maps the `parallel` option onto the `-j<N>` value handed to the native
//! build tool:
//!
//! | `parallel` | workers |
//! |---|---|
//! | unset | 1 |
//! | `0` (auto) | half the logical CPUs, at least 1 (1 if unknown) |
//! | `n` | `n`, unchecked |

use std::num::NonZeroUsize;
use std::thread;

/// Resolve the worker count against a known CPU count
#[must_use]
pub fn resolve_workers(parallel: Option<usize>, cpu_count: Option<usize>) -> usize {
    match parallel {
        None => 1,
        Some(0) => cpu_count.map_or(1, |cpus| (cpus / 2).max(1)),
        Some(workers) => workers,
    }
}

/// Resolve the worker count against this host's logical CPUs
#[must_use]
pub fn resolve_host_workers(parallel: Option<usize>) -> usize {
    resolve_workers(parallel, host_cpu_count())
}

/// Logical CPUs available to this process, if the OS reports them
#[must_use]
pub fn host_cpu_count() -> Option<usize> {
    thread::available_parallelism()
        .ok()
        .map(NonZeroUsize::get)
}
