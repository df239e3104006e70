use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use napigen_utils::read_text;
use serde::Deserialize;
use tracing::debug;

use crate::emit::{DEFAULT_INCLUDE_PATTERN, FlatApiMarkers, MarkerPolicy, WrapperMarkers};

pub const CONFIG_FILE_NAME: &str = "napigen.toml";

/// Subdirectory of the output directory that receives the wrapper header and
/// the shared-declarations copy.
pub const WRAPPER_SUBDIR: &str = "cpp";

/// `napigen.toml` as written on disk; paths are still relative.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    headers: Vec<PathBuf>,
    flat_api_template: PathBuf,
    flat_api_out_dir: Option<PathBuf>,
    wrapper_template: PathBuf,
    out_dir: PathBuf,
    shared_header: Option<PathBuf>,
    #[serde(default)]
    include_classes: Vec<String>,
    #[serde(default = "default_include_pattern")]
    include_pattern: String,
    #[serde(default)]
    markers: MarkerConfig,
}

fn default_include_pattern() -> String {
    DEFAULT_INCLUDE_PATTERN.to_string()
}

/// The `[markers]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkerConfig {
    pub functions: String,
    pub registrations: String,
    pub includes: String,
    pub namespaces: String,
    pub policy: MarkerPolicy,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        let flat = FlatApiMarkers::default();
        let wrapper = WrapperMarkers::default();
        Self {
            functions: flat.functions,
            registrations: flat.registrations,
            includes: wrapper.includes,
            namespaces: wrapper.namespaces,
            policy: MarkerPolicy::default(),
        }
    }
}

impl MarkerConfig {
    pub fn flat_api(&self) -> FlatApiMarkers {
        FlatApiMarkers {
            functions: self.functions.clone(),
            registrations: self.registrations.clone(),
        }
    }

    pub fn wrapper(&self) -> WrapperMarkers {
        WrapperMarkers {
            includes: self.includes.clone(),
            namespaces: self.namespaces.clone(),
        }
    }
}

/// Command-line values that take precedence over the config file. Empty
/// lists leave the configured value alone.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub out_dir: Option<PathBuf>,
    pub headers: Vec<PathBuf>,
    pub include_classes: Vec<String>,
}

/// A fully resolved project: every path is absolute or relative to the
/// working directory, never to the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    pub headers: Vec<PathBuf>,
    pub flat_api_template: PathBuf,
    /// Falls back to `out_dir` when unset.
    pub flat_api_out_dir: Option<PathBuf>,
    pub wrapper_template: PathBuf,
    pub out_dir: PathBuf,
    pub shared_header: Option<PathBuf>,
    pub include_classes: Vec<String>,
    pub include_pattern: String,
    pub markers: MarkerConfig,
}

impl ProjectConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = read_text(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        let config = Self::from_toml_str(&text, base)
            .with_context(|| format!("invalid project configuration {}", path.display()))?;
        debug!(
            config = %path.display(),
            headers = config.headers.len(),
            "project configuration loaded"
        );
        Ok(config)
    }

    /// Parses `text` and resolves relative paths against `base`.
    pub fn from_toml_str(text: &str, base: &Path) -> Result<Self> {
        let file: ConfigFile = toml::from_str(text).context("failed to parse configuration")?;
        if !file.include_pattern.contains("{}") {
            bail!(
                "include_pattern `{}` has no `{{}}` placeholder for the class name",
                file.include_pattern
            );
        }

        let resolve = |path: &Path| base.join(path);
        let out_dir = resolve(&file.out_dir);
        Ok(Self {
            headers: file.headers.iter().map(|p| resolve(p)).collect(),
            flat_api_template: resolve(&file.flat_api_template),
            flat_api_out_dir: file.flat_api_out_dir.as_deref().map(resolve),
            wrapper_template: resolve(&file.wrapper_template),
            out_dir,
            shared_header: file.shared_header.as_deref().map(resolve),
            include_classes: file.include_classes,
            include_pattern: file.include_pattern,
            markers: file.markers,
        })
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(out_dir) = overrides.out_dir {
            self.out_dir = out_dir;
        }
        if !overrides.headers.is_empty() {
            self.headers = overrides.headers;
        }
        if !overrides.include_classes.is_empty() {
            self.include_classes = overrides.include_classes;
        }
        self
    }

    /// `<template stem>.gen<ext>` inside the flat-API output directory.
    pub fn flat_api_output(&self) -> Result<PathBuf> {
        let Some(stem) = self.flat_api_template.file_stem() else {
            bail!(
                "flat api template {} has no file name",
                self.flat_api_template.display()
            );
        };
        let mut name = stem.to_os_string();
        name.push(".gen");
        if let Some(ext) = self.flat_api_template.extension() {
            name.push(".");
            name.push(ext);
        }
        Ok(self.flat_api_out_dir().join(name))
    }

    pub fn flat_api_out_dir(&self) -> &Path {
        self.flat_api_out_dir.as_deref().unwrap_or(&self.out_dir)
    }

    pub fn wrapper_out_dir(&self) -> PathBuf {
        self.out_dir.join(WRAPPER_SUBDIR)
    }

    /// The wrapper header keeps its template's file name.
    pub fn wrapper_output(&self) -> Result<PathBuf> {
        let Some(name) = self.wrapper_template.file_name() else {
            bail!(
                "wrapper template {} has no file name",
                self.wrapper_template.display()
            );
        };
        Ok(self.wrapper_out_dir().join(name))
    }
}
