//! Class name resolution with template imports

use std::collections::HashMap;

use crate::chars;

/// Resolves a possibly simple class name to a fully qualified one.
pub trait ClassResolver {
    fn find_class(&self, name: &str) -> Option<String>;
}

/// Layers `<?import?>` declarations over another resolver.
///
/// Simple names are looked up through explicitly imported classes first, then
/// through imported packages in import order, then as-is.
#[derive(Debug)]
pub struct ImportingClassResolver<R> {
    inner: R,
    imported_classes: HashMap<String, String>,
    imported_packages: Vec<String>,
}

impl<R: ClassResolver> ImportingClassResolver<R> {
    pub fn new(inner: R) -> Self {
        ImportingClassResolver {
            inner,
            imported_classes: HashMap::new(),
            imported_packages: Vec::new(),
        }
    }

    /// Import a fully qualified class under its simple name.
    pub fn import_class(&mut self, name: &str) {
        let simple_name = name.rsplit(chars::PERIOD).next().unwrap_or(name);
        self.imported_classes
            .insert(simple_name.to_string(), name.to_string());
    }

    /// Import every class of a package; a trailing `.*` is accepted.
    pub fn import_package(&mut self, name: &str) {
        let package = name.strip_suffix(".*").unwrap_or(name);
        if !self.imported_packages.iter().any(|p| p == package) {
            self.imported_packages.push(package.to_string());
        }
    }
}

impl<R: ClassResolver> ClassResolver for ImportingClassResolver<R> {
    fn find_class(&self, name: &str) -> Option<String> {
        if name.contains(chars::PERIOD) {
            return self.inner.find_class(name);
        }
        if let Some(full_name) = self.imported_classes.get(name) {
            return Some(full_name.clone());
        }
        self.imported_packages
            .iter()
            .find_map(|package| self.inner.find_class(&format!("{}.{}", package, name)))
            .or_else(|| self.inner.find_class(name))
    }
}
