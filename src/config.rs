//=====================================================
// File: config.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: QuillScript interpreter configuration
// Objective: Load quill.toml settings with defaults and script-relative discovery
//=====================================================

//! Interpreter configuration loaded from `quill.toml` with CLI overrides.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::eval::DEFAULT_MAX_DEPTH;

/// File looked up next to the script when no explicit path is given.
pub const CONFIG_FILE: &str = "quill.toml";

/// Configuration model for one interpreter run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Maximum nesting of function calls and lambda evaluations.
    pub max_call_depth: usize,
    /// Render diagnostics with ANSI colors.
    pub color: bool,
    /// Print a suggestion line under each diagnostic.
    pub suggestions: bool,
    /// Exit with a failure status if any line reported an error.
    pub strict: bool,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_DEPTH,
            color: true,
            suggestions: true,
            strict: false,
        }
    }
}

impl InterpreterConfig {
    /// Load configuration from an explicit TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading configuration from {}", path.display()))?;
        let cfg: Self = toml::from_str(&data)
            .with_context(|| format!("parsing configuration {}", path.display()))?;
        Ok(cfg)
    }

    /// Use `explicit` if given, else `quill.toml` beside the script, else defaults.
    pub fn discover(explicit: Option<&Path>, script: &Path) -> anyhow::Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }
        let candidate = script
            .parent()
            .map(|dir| dir.join(CONFIG_FILE))
            .filter(|path| path.is_file());
        match candidate {
            Some(path) => Ok((Self::load(&path)?, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }
}
