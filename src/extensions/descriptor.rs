//! Extension descriptors
//!
//! A descriptor names one extension module (dotted, e.g. `pkg._core`) and
//! the directory holding its `CMakeLists.txt`.

use crate::error::{BuildError, BuildResult};
use std::fs;
use std::path::{Path, PathBuf};

/// One extension module to build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionDescriptor {
    name: String,
    source_dir: PathBuf,
}

impl ExtensionDescriptor {
    /// Create a descriptor, resolving `source_dir` to an absolute path
    ///
    /// `None` means the current directory. The name must be dotted
    /// identifiers, so it can only map to directories under `build_lib`.
    pub fn new(name: impl Into<String>, source_dir: Option<&Path>) -> BuildResult<Self> {
        let name = name.into();
        if !is_module_name(&name) {
            return Err(BuildError::InvalidName { name });
        }
        let source_dir = resolve_dir(source_dir.unwrap_or_else(|| Path::new(".")))?;
        Ok(Self { name, source_dir })
    }

    /// Parse `NAME` or `NAME=DIR` as given on the command line
    pub fn parse(spec: &str) -> BuildResult<Self> {
        match spec.split_once('=') {
            Some((name, dir)) if !dir.is_empty() => Self::new(name.trim(), Some(Path::new(dir))),
            Some((name, _)) => Self::new(name.trim(), None),
            None => Self::new(spec.trim(), None),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Directory the compiled module must land in
    ///
    /// `pkg.sub._core` under `build/lib` lands in `build/lib/pkg/sub`; a
    /// top-level module lands in `build/lib` itself.
    pub fn output_dir(&self, build_lib: &Path) -> BuildResult<PathBuf> {
        let mut dir = build_lib.to_path_buf();
        let mut parts: Vec<&str> = self.name.split('.').collect();
        parts.pop();
        for part in parts {
            dir.push(part);
        }
        absolute(&dir)
    }
}

fn is_module_name(name: &str) -> bool {
    name.split('.').all(|part| {
        !part.is_empty() && part.chars().all(|c| c.is_alphanumeric() || c == '_')
    })
}

/// Canonical path when it exists, lexically absolute otherwise
fn resolve_dir(path: &Path) -> BuildResult<PathBuf> {
    if path.exists() {
        fs::canonicalize(path).map_err(|source| BuildError::ResolveSource {
            path: path.to_path_buf(),
            source,
        })
    } else {
        absolute(path)
    }
}

pub(crate) fn absolute(path: &Path) -> BuildResult<PathBuf> {
    std::path::absolute(path).map_err(|source| BuildError::ResolveSource {
        path: path.to_path_buf(),
        source,
    })
}
