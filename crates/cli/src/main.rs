mod logging;
mod run;

use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use std::process;

#[derive(Debug, Parser)]
#[command(
    name = "stencil",
    version,
    about = "Render template files from layered YAML contexts, environment and CLI variables"
)]
struct Cli {
    /// Context file to be used for rendering. Path can be either a file or
    /// a directory containing multiple files (*.yml, *.yaml). Can be given
    /// multiple times
    #[arg(short = 'c', long = "contextfile", value_name = "PATH")]
    contextfile: Vec<PathBuf>,

    /// Additional variable, overriding the environment. Can be given
    /// multiple times
    #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_var)]
    var: Vec<(String, String)>,

    /// Render the context files like the templates before parsing them
    #[arg(short = 'd', long)]
    dynamic_contextfiles: bool,

    /// Check that given variables match the types declared in a context
    /// file's defaults
    #[arg(short = 't', long)]
    defaults_type_check: bool,

    /// Ignore undefined variables instead of failing
    #[arg(short = 'i', long)]
    ignore_undefined_variables: bool,

    /// Overwrite existing files
    #[arg(short = 'f', long)]
    force: bool,

    /// Delete the templates after rendering
    #[arg(short = 'r', long)]
    remove_templates: bool,

    /// File mode for rendered files (octal, e.g. 644)
    #[arg(short = 'm', long, value_name = "MODE")]
    mode: Option<String>,

    /// Enable verbose output (-vv for debug output)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to the config file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// File to be rendered. Path can be either a file or a directory
    /// containing multiple files (*.tpl)
    #[arg(required = true)]
    template: Vec<PathBuf>,

    /// Destination for the rendered file(s)
    destination: PathBuf,
}

fn parse_var(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{s}'")),
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run::run(&cli) {
        eprintln!("{e}");
        if cli.verbose >= 2 {
            let mut cause = e.source();
            while let Some(err) = cause {
                eprintln!("  caused by: {err}");
                cause = err.source();
            }
        }
        process::exit(1);
    }
}
