//! Main Entry
//!
//! Argument handling and output for the `flavourc` binary.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use crate::config::ProjectConfig;
use crate::perform_compile::{perform_compile, render_html, CompileOptions};

/// Exit code when the template has diagnostics.
pub const EXIT_DIAGNOSTICS: i32 = 1;
/// Exit code when the compiler could not run at all.
pub const EXIT_FAILURE: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emit {
    Tree,
    Html,
}

pub fn command() -> Command {
    Command::new("flavourc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Flavour template compiler")
        .arg(
            Arg::new("template")
                .required(true)
                .value_name("FILE")
                .help("Template to compile"),
        )
        .arg(
            Arg::new("class")
                .short('c')
                .long("class")
                .value_name("NAME")
                .help("Class backing the template, bound to `this`"),
        )
        .arg(
            Arg::new("metadata")
                .short('m')
                .long("metadata")
                .value_name("FILE")
                .action(ArgAction::Append)
                .help("Class metadata table (JSON); may be repeated"),
        )
        .arg(
            Arg::new("resources")
                .short('r')
                .long("resources")
                .value_name("DIR")
                .help("Directory holding META-INF/flavour/directive-packages"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("Project configuration (JSON)"),
        )
        .arg(
            Arg::new("data")
                .short('d')
                .long("data")
                .value_name("FILE")
                .help("JSON model bound to `this` when emitting HTML"),
        )
        .arg(
            Arg::new("emit")
                .long("emit")
                .value_parser(["tree", "html"])
                .default_value("tree")
                .help("Output the bound tree as JSON or the rendered HTML"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Log debug output to stderr"),
        )
}

/// Install a stderr subscriber; `RUST_LOG` overrides the level.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Merge the optional project file with command-line arguments; arguments win.
pub fn compile_options(matches: &ArgMatches) -> anyhow::Result<CompileOptions> {
    let template = matches
        .get_one::<String>("template")
        .context("missing template argument")?;
    let mut options = CompileOptions::new(template);

    if let Some(path) = matches.get_one::<String>("config") {
        let project = ProjectConfig::load(PathBuf::from(path).as_path())?;
        if let Some(class_name) = project.class_name {
            options.class_name = class_name;
        }
        options.metadata = project.metadata;
        options.resources = project.resources;
        options.parser = project.parser;
    }
    if let Some(class_name) = matches.get_one::<String>("class") {
        options.class_name = class_name.clone();
    }
    if let Some(metadata) = matches.get_many::<String>("metadata") {
        options.metadata.extend(metadata.map(PathBuf::from));
    }
    if let Some(resources) = matches.get_one::<String>("resources") {
        options.resources = Some(PathBuf::from(resources));
    }
    Ok(options)
}

fn emit_mode(matches: &ArgMatches) -> Emit {
    match matches.get_one::<String>("emit").map(String::as_str) {
        Some("html") => Emit::Html,
        _ => Emit::Tree,
    }
}

fn load_data(matches: &ArgMatches) -> anyhow::Result<Value> {
    let Some(path) = matches.get_one::<String>("data") else {
        return Ok(Value::Null);
    };
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read data {}", path))?;
    serde_json::from_str(&content).with_context(|| format!("invalid data {}", path))
}

/// Compile and emit. Returns the process exit code.
pub fn run(matches: &ArgMatches) -> anyhow::Result<i32> {
    let options = compile_options(matches)?;
    let output = perform_compile(&options)?;

    if !output.result.is_successful() {
        for diagnostic in output.formatted_diagnostics() {
            eprintln!("{}", diagnostic);
        }
        return Ok(EXIT_DIAGNOSTICS);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match emit_mode(matches) {
        Emit::Tree => {
            serde_json::to_writer_pretty(&mut out, &output.result.nodes)?;
            writeln!(out)?;
        }
        Emit::Html => {
            let html = render_html(&output.result.nodes, load_data(matches)?)?;
            writeln!(out, "{}", html)?;
        }
    }
    Ok(0)
}

pub fn main_entry<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = match command().try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() { EXIT_FAILURE } else { 0 };
        }
    };
    init_logging(matches.get_flag("verbose"));

    match run(&matches) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            EXIT_FAILURE
        }
    }
}
