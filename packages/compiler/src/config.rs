//! Parser configuration

use serde::{Deserialize, Serialize};

/// Conventional location of directive package descriptors.
pub const DIRECTIVE_PACKAGES_ROOT: &str = "META-INF/flavour/directive-packages";

/// Package registered under [`DEFAULT_PREFIX`] before every parse.
pub const DEFAULT_PACKAGE: &str = "flavour.directives";
pub const DEFAULT_PREFIX: &str = "std";

/// What to do when a directive package descriptor cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceErrorPolicy {
    /// Abort the compilation with [`CompileError::ResourceRead`](crate::error::CompileError).
    #[default]
    Fatal,
    /// Record a diagnostic and keep the entries read so far.
    Report,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParserConfig {
    pub default_prefix: String,
    pub default_package: String,
    pub descriptor_root: String,
    pub resource_errors: ResourceErrorPolicy,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            default_prefix: DEFAULT_PREFIX.to_string(),
            default_package: DEFAULT_PACKAGE.to_string(),
            descriptor_root: DIRECTIVE_PACKAGES_ROOT.to_string(),
            resource_errors: ResourceErrorPolicy::default(),
        }
    }
}

impl ParserConfig {
    pub fn with_resource_errors(mut self, policy: ResourceErrorPolicy) -> Self {
        self.resource_errors = policy;
        self
    }

    /// Resource name of the descriptor for `package_name`.
    pub fn descriptor_resource(&self, package_name: &str) -> String {
        format!("{}/{}", self.descriptor_root.trim_end_matches('/'), package_name)
    }
}
