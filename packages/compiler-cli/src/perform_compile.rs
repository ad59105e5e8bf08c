//! Perform Compile
//!
//! Compilation entry point shared by `flavourc` and embedders: loads class
//! metadata, compiles one template and optionally renders it against data.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde_json::Value;
use tracing::{debug, info};

use flavour_compiler::config::ParserConfig;
use flavour_compiler::expression::{PathEvaluator, PathExpressionCompiler};
use flavour_compiler::parse_util::SourceFile;
use flavour_compiler::runtime::Interpreter;
use flavour_compiler::template_parser::{
    BuiltinResources, DirectoryResources, MemoryResources, MetadataTable, ResourceProvider,
    TemplateParseResult, TemplateParser,
};
use flavour_compiler::tree::TemplateNode;

pub const DEFAULT_CLASS_NAME: &str = "Object";

#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub template: PathBuf,
    pub class_name: String,
    pub metadata: Vec<PathBuf>,
    pub resources: Option<PathBuf>,
    pub parser: ParserConfig,
}

impl CompileOptions {
    pub fn new(template: impl Into<PathBuf>) -> Self {
        CompileOptions {
            template: template.into(),
            class_name: DEFAULT_CLASS_NAME.to_string(),
            metadata: Vec::new(),
            resources: None,
            parser: ParserConfig::default(),
        }
    }
}

#[derive(Debug)]
pub struct CompileOutput {
    pub file: SourceFile,
    pub result: TemplateParseResult,
}

impl CompileOutput {
    /// Diagnostics rendered with file, line and column.
    pub fn formatted_diagnostics(&self) -> Vec<String> {
        self.result
            .diagnostics
            .iter()
            .map(|diagnostic| self.file.describe(diagnostic))
            .collect()
    }
}

/// Built-in directive metadata merged with every table in `paths`, in order.
pub fn load_classes(paths: &[PathBuf]) -> anyhow::Result<MetadataTable> {
    let mut table = MetadataTable::with_builtins();
    for path in paths {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read metadata {}", path.display()))?;
        let loaded = MetadataTable::from_json(&content)
            .with_context(|| format!("invalid metadata {}", path.display()))?;
        debug!(path = %path.display(), classes = loaded.len(), "loaded class metadata");
        table.merge(loaded);
    }
    Ok(table)
}

fn resources(
    root: Option<&Path>,
    config: &ParserConfig,
) -> BuiltinResources<Box<dyn ResourceProvider>> {
    let inner: Box<dyn ResourceProvider> = match root {
        Some(root) => Box::new(DirectoryResources::new(root)),
        None => Box::new(MemoryResources::new()),
    };
    BuiltinResources::for_config(inner, config)
}

pub fn perform_compile(options: &CompileOptions) -> anyhow::Result<CompileOutput> {
    let content = fs::read_to_string(&options.template)
        .with_context(|| format!("failed to read template {}", options.template.display()))?;
    let classes = load_classes(&options.metadata)?;
    let resources = resources(options.resources.as_deref(), &options.parser);
    let compiler = PathExpressionCompiler::new();

    let result = TemplateParser::new(&classes, &resources, &compiler)
        .with_config(options.parser.clone())
        .parse(&content, &options.class_name)
        .with_context(|| format!("failed to compile {}", options.template.display()))?;
    info!(
        template = %options.template.display(),
        diagnostics = result.diagnostics.len(),
        "compiled template"
    );

    Ok(CompileOutput {
        file: SourceFile::new(content, options.template.display().to_string()),
        result,
    })
}

/// Instantiate `nodes` against `model`, render once and serialize.
pub fn render_html(nodes: &[TemplateNode], model: Value) -> anyhow::Result<String> {
    let mut instance = Interpreter::new(PathEvaluator).instantiate(nodes, model);
    instance.render().context("failed to render template")?;
    Ok(instance.to_html())
}
