//! Declarative tree expectation
//!
//! The expected tree shape and its wait budget can be overridden from a
//! small YAML file; absent a file the built-in defaults describe the dev
//! namespace.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

use crate::checker::TreeChecker;
use crate::error::HarnessResult;

/// Expected label of the namespace's top-level entry
pub const DEFAULT_TREE_ROOT: &str = "ns.dev.v.io:8101";

/// Expected child entries under the root
pub const DEFAULT_TREE_CHILDREN: [&str; 3] = ["applications", "binaries", "proxy"];

/// Default tree-load wait, in seconds
pub const DEFAULT_TREE_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TreeExpectation {
    /// Required root label
    #[serde(default = "default_root")]
    pub root: String,

    /// Required child labels
    #[serde(default = "default_children")]
    pub children: BTreeSet<String>,

    /// How long the tree may take to load
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_root() -> String {
    DEFAULT_TREE_ROOT.to_string()
}

fn default_children() -> BTreeSet<String> {
    DEFAULT_TREE_CHILDREN.iter().map(|c| c.to_string()).collect()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TREE_TIMEOUT_SECS
}

impl Default for TreeExpectation {
    fn default() -> Self {
        Self {
            root: default_root(),
            children: default_children(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl TreeExpectation {
    /// Parse an expectation from YAML
    pub fn from_yaml(yaml: &str) -> HarnessResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse an expectation from a YAML file
    pub fn from_file(path: &Path) -> HarnessResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load from an optional file, falling back to the defaults
    pub fn load(path: Option<&Path>) -> HarnessResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// A fresh checker for this expectation
    pub fn checker(&self) -> TreeChecker {
        TreeChecker::new(self.root.clone(), self.children.iter().cloned())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
