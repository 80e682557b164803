//! Configuration file management
//!
//! Reads `cmext.toml` from the project directory and build defaults from the
//! user config directory, then layers command-line and environment overrides
//! on top:
//!
//! ```toml
//! [package]
//! name = "pybind11_generics"
//! version = "0.4.0"
//!
//! [build]
//! build-type = "Release"
//! build-log = "build.log"
//! parallel = 0
//!
//! [[extension]]
//! name = "pybind11_generics._core"
//! sourcedir = "."
//! ```
//!
//! Relative paths in a project manifest are taken relative to the manifest's
//! directory.

use crate::extensions::cmake::find_cmake;
use crate::extensions::types::{
    BuildConfig, BuildOptions, DEFAULT_BUILD_LIB, DEFAULT_BUILD_TEMP, DEFAULT_BUILD_TYPE,
    UNKNOWN_VERSION,
};
use crate::extensions::{ExtensionDescriptor, workers};
use crate::interpreter::Interpreter;
use crate::platform::detect_current_platform;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Contents of a `cmext.toml`
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub package: PackageSection,

    #[serde(default)]
    pub build: BuildSection,

    /// Registered extensions, in build order
    #[serde(default, rename = "extension")]
    pub extensions: Vec<ExtensionEntry>,

    /// Directory the manifest was read from
    #[serde(skip)]
    pub root: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct PackageSection {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// `[build]` table; every key is optional
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct BuildSection {
    #[serde(default)]
    pub build_type: Option<String>,
    #[serde(default)]
    pub build_log: Option<PathBuf>,
    #[serde(default)]
    pub parallel: Option<usize>,
    #[serde(default)]
    pub build_temp: Option<PathBuf>,
    #[serde(default)]
    pub build_lib: Option<PathBuf>,
    #[serde(default)]
    pub cmake: Option<PathBuf>,
    #[serde(default)]
    pub python: Option<PathBuf>,
}

/// One `[[extension]]` entry
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ExtensionEntry {
    pub name: String,
    #[serde(default)]
    pub sourcedir: Option<PathBuf>,
}

/// Values from the command line or environment, highest precedence first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub build_type: Option<String>,
    pub build_log: Option<PathBuf>,
    pub parallel: Option<usize>,
    pub build_temp: Option<PathBuf>,
    pub build_lib: Option<PathBuf>,
    pub cmake: Option<PathBuf>,
    pub python: Option<PathBuf>,
    pub package_version: Option<String>,
}

impl Overrides {
    /// Overrides read from `CMEXT_*` variables
    ///
    /// `CMAKE` and `PYTHON` are consulted later, during tool and interpreter
    /// lookup.
    #[must_use]
    pub fn from_env() -> Self {
        use crate::env_vars;

        Self {
            build_type: env_vars::build_type(),
            build_log: env_vars::build_log(),
            parallel: env_vars::parallel(),
            build_temp: env_vars::build_temp(),
            build_lib: env_vars::build_lib(),
            ..Self::default()
        }
    }

    /// Fill unset values from a lower-precedence layer
    #[must_use]
    pub fn or(self, lower: Self) -> Self {
        Self {
            build_type: self.build_type.or(lower.build_type),
            build_log: self.build_log.or(lower.build_log),
            parallel: self.parallel.or(lower.parallel),
            build_temp: self.build_temp.or(lower.build_temp),
            build_lib: self.build_lib.or(lower.build_lib),
            cmake: self.cmake.or(lower.cmake),
            python: self.python.or(lower.python),
            package_version: self.package_version.or(lower.package_version),
        }
    }
}

impl From<BuildSection> for Overrides {
    fn from(section: BuildSection) -> Self {
        Self {
            build_type: section.build_type,
            build_log: section.build_log,
            parallel: section.parallel,
            build_temp: section.build_temp,
            build_lib: section.build_lib,
            cmake: section.cmake,
            python: section.python,
            package_version: None,
        }
    }
}

impl BuildSection {
    /// Fill unset keys from `fallback`
    #[must_use]
    pub fn or(self, fallback: Self) -> Self {
        Self {
            build_type: self.build_type.or(fallback.build_type),
            build_log: self.build_log.or(fallback.build_log),
            parallel: self.parallel.or(fallback.parallel),
            build_temp: self.build_temp.or(fallback.build_temp),
            build_lib: self.build_lib.or(fallback.build_lib),
            cmake: self.cmake.or(fallback.cmake),
            python: self.python.or(fallback.python),
        }
    }

    fn anchored(self, root: &Path) -> Self {
        let anchor = |path: Option<PathBuf>| path.map(|p| root.join(p));
        Self {
            build_log: anchor(self.build_log),
            build_temp: anchor(self.build_temp),
            build_lib: anchor(self.build_lib),
            ..self
        }
    }
}

impl Config {
    /// Load configuration from TOML files.
    /// Priority: the project manifest (`custom_path` or ./cmext.toml), then
    /// ~/.config/cmext/config.toml for build defaults
    ///
    /// # Arguments
    /// * `custom_path` - Optional custom path to the project manifest
    /// * `skip_rc` - If true, skip loading config files (return default config)
    ///
    /// `CMEXT_NO_CONFIG` only applies when no manifest was named explicitly.
    ///
    /// # Errors
    ///
    /// Returns an error if config file reading or parsing fails.
    pub fn load_with_options(custom_path: Option<&Path>, skip_rc: bool) -> Result<Self> {
        if skip_rc || (custom_path.is_none() && crate::env_vars::no_config()) {
            return Ok(Self::default());
        }

        let project = match custom_path {
            Some(path) => Some(Self::load_project(path)?),
            None => {
                let local = Path::new(crate::MANIFEST_FILE);
                if local.exists() {
                    Some(Self::load_project(local)?)
                } else {
                    None
                }
            }
        };

        let user = match Self::user_config_dir() {
            Some(dir) if dir.join("config.toml").exists() => {
                Some(Self::load_from(&dir.join("config.toml"))?)
            }
            _ => None,
        };

        Ok(Self::layered(project, user))
    }

    /// Put the project manifest over the user config
    ///
    /// Only `[build]` is taken from the user config; package metadata and
    /// extensions always come from the project.
    fn layered(project: Option<Self>, user: Option<Self>) -> Self {
        let mut config = project.unwrap_or_default();
        if let Some(user) = user {
            config.build = config.build.or(user.build);
        }
        config
    }

    /// Load a project manifest, anchoring its relative paths to its directory
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_project(path: &Path) -> Result<Self> {
        let mut config = Self::load_from(path)?;
        let root = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

        config.build = config.build.anchored(&root);
        for entry in &mut config.extensions {
            entry.sourcedir = Some(
                entry
                    .sourcedir
                    .as_ref()
                    .map_or_else(|| root.clone(), |dir| root.join(dir)),
            );
        }
        config.root = Some(root);
        Ok(config)
    }

    fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn user_config_dir() -> Option<PathBuf> {
        // Check XDG_CONFIG_HOME first
        if let Some(xdg_config) = crate::env_vars::xdg_config_home() {
            return Some(xdg_config.join("cmext"));
        }

        // Fall back to ~/.config/cmext
        dirs::home_dir().map(|home| home.join(".config").join("cmext"))
    }

    /// Descriptors for every `[[extension]]`, in manifest order
    ///
    /// # Errors
    ///
    /// Returns an error if a source directory cannot be resolved.
    pub fn descriptors(&self) -> Result<Vec<ExtensionDescriptor>> {
        self.extensions
            .iter()
            .map(|entry| {
                ExtensionDescriptor::new(entry.name.clone(), entry.sourcedir.as_deref())
                    .with_context(|| format!("Invalid extension entry: {}", entry.name))
            })
            .collect()
    }

    /// Merge overrides over this config into the builder's configuration
    ///
    /// `overrides` should already combine command-line and environment values.
    #[must_use]
    pub fn build_config(&self, overrides: Overrides) -> BuildConfig {
        let merged = overrides.or(self.build.clone().into());
        let root = self.root.clone().unwrap_or_else(|| PathBuf::from("."));

        BuildConfig {
            options: BuildOptions {
                build_type: merged
                    .build_type
                    .unwrap_or_else(|| DEFAULT_BUILD_TYPE.to_string()),
                build_log: merged.build_log,
                parallel: merged.parallel,
            },
            build_temp: merged
                .build_temp
                .unwrap_or_else(|| root.join(DEFAULT_BUILD_TEMP)),
            build_lib: merged
                .build_lib
                .unwrap_or_else(|| root.join(DEFAULT_BUILD_LIB)),
            cmake: find_cmake(merged.cmake.as_deref()),
            interpreter: Interpreter::detect(merged.python.as_deref()),
            platform: detect_current_platform(),
            cpu_count: workers::host_cpu_count(),
            package_version: merged
                .package_version
                .or_else(|| self.package.version.clone())
                .unwrap_or_else(|| UNKNOWN_VERSION.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"
[package]
name = "demo"
version = "0.4.0"

[build]
build-type = "Release"
build-log = "logs/build.log"
parallel = 0

[[extension]]
name = "demo._core"
sourcedir = "native"

[[extension]]
name = "demo._extra"
"#;

    fn write_manifest(temp: &TempDir) -> PathBuf {
        let path = temp.path().join("cmext.toml");
        fs::write(&path, MANIFEST).unwrap();
        path
    }

    #[test]
    fn parses_manifest() {
        let config: Config = toml::from_str(MANIFEST).unwrap();

        assert_eq!(config.package.version.as_deref(), Some("0.4.0"));
        assert_eq!(config.build.build_type.as_deref(), Some("Release"));
        assert_eq!(config.build.parallel, Some(0));
        assert_eq!(config.extensions.len(), 2);
        assert_eq!(config.extensions.get(1).map(|e| e.sourcedir.is_none()), Some(true));
    }

    #[test]
    fn empty_manifest_is_default() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.extensions.is_empty());
        assert_eq!(config.build, BuildSection::default());
    }

    #[test]
    fn project_paths_are_anchored() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_project(&write_manifest(&temp)).unwrap();

        assert_eq!(config.root.as_deref(), Some(temp.path()));
        assert_eq!(config.build.build_log, Some(temp.path().join("logs/build.log")));
        assert_eq!(
            config.extensions.first().and_then(|e| e.sourcedir.clone()),
            Some(temp.path().join("native"))
        );
        assert_eq!(
            config.extensions.get(1).and_then(|e| e.sourcedir.clone()),
            Some(temp.path().to_path_buf())
        );
    }

    #[test]
    fn custom_path_must_exist() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.toml");
        assert!(Config::load_with_options(Some(&missing), false).is_err());
    }

    #[test]
    fn skip_rc_returns_default() {
        let config = Config::load_with_options(None, true).unwrap();
        assert!(config.extensions.is_empty());
        assert!(config.root.is_none());
    }

    #[test]
    fn overrides_take_precedence() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_project(&write_manifest(&temp)).unwrap();

        let cli = Overrides {
            build_type: Some("RelWithDebInfo".to_string()),
            parallel: Some(3),
            ..Overrides::default()
        };
        let build = config.build_config(cli);

        assert_eq!(build.options.build_type, "RelWithDebInfo");
        assert_eq!(build.options.parallel, Some(3));
        assert_eq!(build.options.build_log, Some(temp.path().join("logs/build.log")));
        assert_eq!(build.package_version, "0.4.0");
        assert_eq!(build.build_temp, temp.path().join(DEFAULT_BUILD_TEMP));
    }

    #[test]
    fn defaults_without_manifest() {
        let build = Config::default().build_config(Overrides::default());

        assert_eq!(build.options, BuildOptions::default());
        assert_eq!(build.package_version, UNKNOWN_VERSION);
        assert_eq!(build.build_lib, Path::new(".").join(DEFAULT_BUILD_LIB));
    }

    #[test]
    fn layered_overrides() {
        let cli = Overrides {
            parallel: Some(2),
            ..Overrides::default()
        };
        let env = Overrides {
            parallel: Some(8),
            build_type: Some("Release".to_string()),
            ..Overrides::default()
        };

        let merged = cli.or(env);
        assert_eq!(merged.parallel, Some(2));
        assert_eq!(merged.build_type.as_deref(), Some("Release"));
    }

    #[test]
    fn user_defaults_fill_gaps() {
        let project = BuildSection {
            build_type: Some("Release".to_string()),
            ..BuildSection::default()
        };
        let user = BuildSection {
            build_type: Some("Debug".to_string()),
            parallel: Some(0),
            ..BuildSection::default()
        };

        let merged = project.or(user);
        assert_eq!(merged.build_type.as_deref(), Some("Release"));
        assert_eq!(merged.parallel, Some(0));
    }

    #[test]
    fn user_config_contributes_build_defaults_only() {
        let user: Config = toml::from_str(
            "[package]\nversion = \"9.9.9\"\n\n\
             [build]\nparallel = 0\n\n\
             [[extension]]\nname = \"from_user._core\"\n",
        )
        .unwrap();

        let config = Config::layered(None, Some(user.clone()));
        assert!(config.extensions.is_empty());
        assert!(config.package.version.is_none());
        assert_eq!(config.build.parallel, Some(0));

        let temp = TempDir::new().unwrap();
        let project = Config::load_project(&write_manifest(&temp)).unwrap();
        let config = Config::layered(Some(project), Some(user));
        let names: Vec<&str> = config.extensions.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["demo._core", "demo._extra"]);
        assert_eq!(config.package.version.as_deref(), Some("0.4.0"));
    }

    #[test]
    fn explicit_manifest_is_loaded() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_with_options(Some(&write_manifest(&temp)), false).unwrap();
        assert_eq!(config.extensions.len(), 2);
        assert_eq!(config.root.as_deref(), Some(temp.path()));
    }

    #[test]
    fn descriptors_follow_manifest_order() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("native")).unwrap();
        let config = Config::load_project(&write_manifest(&temp)).unwrap();

        let descriptors = config.descriptors().unwrap();
        let names: Vec<&str> = descriptors.iter().map(ExtensionDescriptor::name).collect();

        assert_eq!(names, vec!["demo._core", "demo._extra"]);
        assert!(descriptors.iter().all(|d| d.source_dir().is_absolute()));
    }
}
