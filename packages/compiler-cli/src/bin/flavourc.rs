/**
 * Flavour Compiler CLI - flavourc
 *
 * Compiles a template, prints diagnostics, the bound tree or rendered HTML
 */
use flavour_compiler_cli::main_entry::main_entry;
use std::process;

fn main() {
    process::exit(main_entry(std::env::args_os()));
}
