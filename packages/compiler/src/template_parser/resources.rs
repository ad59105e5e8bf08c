//! Resource Providers
//!
//! Directive package descriptors are looked up by resource name, e.g.
//! `META-INF/flavour/directive-packages/flavour.directives`.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};

use crate::config::{ParserConfig, DEFAULT_PACKAGE, DIRECTIVE_PACKAGES_ROOT};

const BUILTIN_DESCRIPTOR: &str =
    include_str!("../../resources/META-INF/flavour/directive-packages/flavour.directives");

pub trait ResourceProvider {
    /// Open `name` for reading. `Ok(None)` means the resource does not exist.
    fn open_resource(&self, name: &str) -> io::Result<Option<Box<dyn BufRead + '_>>>;
}

impl<P: ResourceProvider + ?Sized> ResourceProvider for Box<P> {
    fn open_resource(&self, name: &str) -> io::Result<Option<Box<dyn BufRead + '_>>> {
        (**self).open_resource(name)
    }
}

impl<P: ResourceProvider + ?Sized> ResourceProvider for &P {
    fn open_resource(&self, name: &str) -> io::Result<Option<Box<dyn BufRead + '_>>> {
        (**self).open_resource(name)
    }
}

/// In-memory resources keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemoryResources {
    entries: HashMap<String, String>,
}

impl MemoryResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<String>) -> &mut Self {
        self.entries.insert(name.into(), content.into());
        self
    }

    pub fn with(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(name, content);
        self
    }
}

impl ResourceProvider for MemoryResources {
    fn open_resource(&self, name: &str) -> io::Result<Option<Box<dyn BufRead + '_>>> {
        Ok(self
            .entries
            .get(name)
            .map(|content| Box::new(Cursor::new(content.as_bytes())) as Box<dyn BufRead + '_>))
    }
}

/// Resources stored as files below a root directory.
#[derive(Debug, Clone)]
pub struct DirectoryResources {
    root: PathBuf,
}

impl DirectoryResources {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirectoryResources { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceProvider for DirectoryResources {
    fn open_resource(&self, name: &str) -> io::Result<Option<Box<dyn BufRead + '_>>> {
        match File::open(self.root.join(name)) {
            Ok(file) => Ok(Some(Box::new(BufReader::new(file)))),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }
}

/// Serves the descriptor of the standard directive package under the
/// descriptor root and delegates every other name to `inner`.
#[derive(Debug, Clone)]
pub struct BuiltinResources<P> {
    inner: P,
    root: String,
}

impl<P: ResourceProvider> BuiltinResources<P> {
    pub fn new(inner: P) -> Self {
        BuiltinResources {
            inner,
            root: DIRECTIVE_PACKAGES_ROOT.to_string(),
        }
    }

    /// Serve the built-in descriptor below the root the parser is configured with.
    pub fn for_config(inner: P, config: &ParserConfig) -> Self {
        BuiltinResources {
            inner,
            root: config.descriptor_root.clone(),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    fn is_builtin(&self, name: &str) -> bool {
        name.strip_prefix(self.root.trim_end_matches('/'))
            .and_then(|rest| rest.strip_prefix('/'))
            == Some(DEFAULT_PACKAGE)
    }
}

impl<P: ResourceProvider + Default> Default for BuiltinResources<P> {
    fn default() -> Self {
        BuiltinResources::new(P::default())
    }
}

impl<P: ResourceProvider> ResourceProvider for BuiltinResources<P> {
    fn open_resource(&self, name: &str) -> io::Result<Option<Box<dyn BufRead + '_>>> {
        if self.is_builtin(name) {
            return Ok(Some(Box::new(Cursor::new(BUILTIN_DESCRIPTOR.as_bytes()))));
        }
        self.inner.open_resource(name)
    }
}
