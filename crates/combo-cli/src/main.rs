//! `combo`: inspect the Combo bundler plugin configuration of a project.

use clap::Parser;
use combo_cli::{cli, commands, error, logger};
use miette::Result;

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);

    // `refresh = true` probes for default paths relative to the working directory.
    std::env::set_current_dir(&args.cwd)
        .map_err(|e| miette::miette!("cannot enter {}: {e}", args.cwd.display()))?;

    let mut stdout = std::io::stdout().lock();
    commands::execute(&args.command, std::path::Path::new("."), &mut stdout)
        .map_err(error::to_report)
}
