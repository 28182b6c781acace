//! Subcommand implementations.
//!
//! Each command writes pretty-printed JSON to `out`.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use combo_config::{
    BoolOr, BuildOptions, ConfigDiscovery, ConfigEnv, PluginOptions, UserConfig, normalize,
};
use combo_plugin::{ComboPlugin, WatchGroups, combo};
use serde::Serialize;
use tracing::debug;

use crate::cli::{Command, ConfigArgs};

/// Run `command` against the project in `root`.
///
/// # Errors
///
/// Configuration discovery, validation and I/O failures, with context.
pub fn execute(command: &Command, root: &Path, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Options => options(root, out),
        Command::Config(args) => config(root, args, out),
        Command::Watch => watch(root, out),
    }
}

fn load_options(root: &Path) -> Result<PluginOptions> {
    Ok(ConfigDiscovery::new(root).load()?)
}

/// `combo options`
pub fn options(root: &Path, out: &mut impl Write) -> Result<()> {
    let resolved = normalize(Some(load_options(root)?))?;
    print_json(out, &resolved)
}

/// `combo config`
pub fn config(root: &Path, args: &ConfigArgs, out: &mut impl Write) -> Result<()> {
    let plugin = ComboPlugin::new(load_options(root)?)?;

    let mut user = match &args.host_config {
        Some(path) => read_host_config(path)?,
        None => UserConfig::default(),
    };
    if args.ssr {
        user.build.get_or_insert_with(BuildOptions::default).ssr = Some(BoolOr::Bool(true));
    }
    if user.env_dir.is_none() {
        user.env_dir = Some(root.to_path_buf());
    }

    let env = ConfigEnv {
        command: args.command.into(),
        mode: args.mode(),
    };
    debug!(command = ?env.command, mode = %env.mode, ssr = args.ssr, "resolving configuration");

    let merged = plugin.config(&user, &env)?;
    print_json(out, &merged)
}

/// `combo watch`
pub fn watch(root: &Path, out: &mut impl Write) -> Result<()> {
    let plugins = combo(load_options(root)?, WatchGroups)?;
    let groups: Vec<_> = plugins
        .full_reload
        .into_iter()
        .map(|reload| reload.handle)
        .collect();

    print_json(out, &groups)
}

fn read_host_config(path: &Path) -> Result<UserConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read host config {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("invalid host config {}", path.display()))
}

fn print_json(out: &mut impl Write, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
