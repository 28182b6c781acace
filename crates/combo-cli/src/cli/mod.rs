//! Command-line interface definition.
//!
//! - `combo options` - the normalized plugin options
//! - `combo config` - the configuration handed to the bundler
//! - `combo watch` - the full-reload watch groups

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Inspect the Combo bundler plugin configuration of a project
#[derive(Parser, Debug)]
#[command(name = "combo", version)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Project root holding `combo.toml` or `package.json`
    #[arg(long, global = true, value_name = "DIR", default_value = ".")]
    pub cwd: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands of `combo`.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the plugin options with every default applied
    Options,

    /// Print the configuration the plugin contributes for one invocation
    Config(ConfigArgs),

    /// Print the full-reload watch groups
    Watch,
}

/// Arguments of `combo config`.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Bundler command to resolve for
    #[arg(long, value_enum, default_value = "build")]
    pub command: CommandArg,

    /// Mode name; defaults to `production` for builds and `development` when serving
    #[arg(long)]
    pub mode: Option<String>,

    /// Resolve the SSR build
    #[arg(long)]
    pub ssr: bool,

    /// JSON file with the user's bundler configuration
    #[arg(long, value_name = "FILE")]
    pub host_config: Option<PathBuf>,
}

/// The bundler command being resolved.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandArg {
    Build,
    Serve,
}

impl From<CommandArg> for combo_config::Command {
    fn from(arg: CommandArg) -> Self {
        match arg {
            CommandArg::Build => Self::Build,
            CommandArg::Serve => Self::Serve,
        }
    }
}

impl ConfigArgs {
    /// The explicit mode, else the conventional one for the command.
    pub fn mode(&self) -> String {
        self.mode.clone().unwrap_or_else(|| {
            match self.command {
                CommandArg::Build => "production",
                CommandArg::Serve => "development",
            }
            .to_string()
        })
    }
}
