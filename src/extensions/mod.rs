//! Native extension building
//!
//! Builds natively compiled extension modules with `CMake`. Each extension
//! is configured and built in two external steps:
//!
//! ```bash
//! cmake -S<source> -B<build_temp> -DCMAKE_LIBRARY_OUTPUT_DIRECTORY=<out> ...
//! cmake --build <build_temp> -- -j<N>
//! ```

pub mod builder;
pub mod cmake;
pub mod command;
pub mod descriptor;
pub mod runner;
pub mod sink;
pub mod types;
pub mod workers;

pub use builder::{ExtensionBuilder, build_extensions};
pub use command::CommandLine;
pub use descriptor::ExtensionDescriptor;
pub use runner::{Captured, CommandRunner, Exit, ProcessRunner};
pub use sink::{CommandStreams, FileSink, LogLevel, LogSink, MemorySink, NullSink, sink_for};
pub use types::{BuildConfig, BuildOptions, BuildPlan, BuildReport};
pub use workers::{resolve_host_workers, resolve_workers};
