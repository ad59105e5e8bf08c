#![deny(clippy::all)]

/**
 * Flavour Compiler CLI
 *
 * Command-line driver for the Flavour template compiler
 */
pub use flavour_compiler as compiler;

pub mod config;
pub mod main_entry;
pub mod perform_compile;

/// CLI version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
