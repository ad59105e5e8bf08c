//! Directive Registry
//!
//! Maps `prefix:name` tags to directive metadata. Packages are registered
//! through `<?use prefix:package?>`; each package descriptor lists the simple
//! names of its directive classes, one per line.

use std::collections::HashMap;
use std::io::{self, BufRead};
use std::rc::Rc;

use tracing::{debug, warn};

use crate::config::{ParserConfig, ResourceErrorPolicy};
use crate::error::{CompileError, Result};
use crate::parse_util::{Diagnostic, SourceSpan};

use super::metadata::{ClassRepository, DirectiveMetadata};
use super::resources::ResourceProvider;

#[derive(Debug)]
pub struct DirectiveRegistry {
    directives: HashMap<String, Rc<DirectiveMetadata>>,
    /// Metadata by owning class, shared between prefixes.
    by_class: HashMap<String, Rc<DirectiveMetadata>>,
    config: ParserConfig,
}

impl DirectiveRegistry {
    pub fn new(config: &ParserConfig) -> Self {
        DirectiveRegistry {
            directives: HashMap::new(),
            by_class: HashMap::new(),
            config: config.clone(),
        }
    }

    pub fn resolve(&self, prefix: &str, name: &str) -> Option<Rc<DirectiveMetadata>> {
        self.directives.get(&format!("{}:{}", prefix, name)).cloned()
    }

    /// Register `metadata` as `prefix:<directive name>`, replacing any earlier entry.
    pub fn register(&mut self, prefix: &str, metadata: Rc<DirectiveMetadata>) {
        self.directives
            .insert(format!("{}:{}", prefix, metadata.name), metadata);
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Register every directive of `package_name` under `prefix`.
    ///
    /// Missing or unopenable packages and unknown classes are reported against
    /// `anchor`. Failures while reading an opened descriptor follow the
    /// configured [`ResourceErrorPolicy`].
    #[allow(clippy::too_many_arguments)]
    pub fn use_package(
        &mut self,
        prefix: &str,
        package_name: &str,
        anchor: SourceSpan,
        classes: &dyn ClassRepository,
        resources: &dyn ResourceProvider,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<()> {
        let resource = self.config.descriptor_resource(package_name);
        let result = self.read_package(prefix, package_name, &resource, anchor, classes, resources, diagnostics);
        match result {
            Ok(()) => Ok(()),
            Err(source) => match self.config.resource_errors {
                ResourceErrorPolicy::Fatal => Err(CompileError::ResourceRead { resource, source }),
                ResourceErrorPolicy::Report => {
                    warn!(resource = %resource, error = %source, "failed to read directive package");
                    diagnostics.push(Diagnostic::at(
                        anchor,
                        format!("Error reading directive package {}: {}", package_name, source),
                    ));
                    Ok(())
                }
            },
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn read_package(
        &mut self,
        prefix: &str,
        package_name: &str,
        resource: &str,
        anchor: SourceSpan,
        classes: &dyn ClassRepository,
        resources: &dyn ResourceProvider,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> io::Result<()> {
        let reader = match resources.open_resource(resource) {
            Ok(Some(reader)) => reader,
            Ok(None) => {
                diagnostics.push(Diagnostic::at(
                    anchor,
                    format!("Directive package was not found: {}", package_name),
                ));
                return Ok(());
            }
            Err(err) => {
                warn!(resource = %resource, error = %err, "failed to open directive package");
                diagnostics.push(Diagnostic::at(
                    anchor,
                    format!("Error opening directive package {}: {}", package_name, err),
                ));
                return Ok(());
            }
        };

        let mut count = 0;
        for line in reader.split(b'\n') {
            let bytes = line?;
            let line = String::from_utf8_lossy(&bytes);
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let class_name = format!("{}.{}", package_name, line);
            match self.describe_directive(&class_name, classes) {
                Ok(metadata) => {
                    self.register(prefix, metadata);
                    count += 1;
                }
                Err(message) => diagnostics.push(Diagnostic::at(anchor, message)),
            }
        }
        debug!(prefix = prefix, package = package_name, directives = count, "registered directive package");
        Ok(())
    }

    fn describe_directive(
        &mut self,
        class_name: &str,
        classes: &dyn ClassRepository,
    ) -> std::result::Result<Rc<DirectiveMetadata>, String> {
        if let Some(metadata) = self.by_class.get(class_name) {
            return Ok(Rc::clone(metadata));
        }
        let description = classes.describe(class_name).ok_or_else(|| {
            format!("Class {} declared by directive package was not found", class_name)
        })?;
        let mut metadata = description
            .directive
            .ok_or_else(|| format!("Class {} is not a directive", class_name))?;
        metadata.owning_class_name = class_name.to_string();
        let metadata = Rc::new(metadata);
        self.by_class
            .insert(class_name.to_string(), Rc::clone(&metadata));
        Ok(metadata)
    }
}
