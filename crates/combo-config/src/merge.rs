//! Merging plugin defaults into the host configuration.
//!
//! Each output field has its own resolver taking the host value first. The
//! plugin only contributes a value where the user left the field unset.

use serde::Serialize;
use tracing::debug;

use crate::cors::{CorsOptions, CorsOrigin, OriginMatcher, default_allowed_origins};
use crate::dev_server::DEV_SERVER_ORIGIN_PLACEHOLDER;
use crate::env::{APP_URL, ASSET_URL, Env, EnvServerConfig, resolve_server_config_from_env};
use crate::error::Result;
use crate::host::{
    Alias, AliasOptions, BoolOr, Command, ConfigEnv, HmrOptions, HttpsOptions, NoExternal,
    ServerOptions, UserConfig,
};
use crate::normalize::{ResolvedPluginConfig, join_path};
use crate::options::InputOption;

/// Package whose runtime helpers must be bundled into SSR output.
pub const PLUGIN_PACKAGE_NAME: &str = "vite-plugin-combo";
/// Manifest file name for client builds.
pub const MANIFEST_FILE: &str = "manifest.json";
/// Manifest file name for SSR builds.
pub const SSR_MANIFEST_FILE: &str = "ssr-manifest.json";

/// Aliases the plugin always contributes.
pub const DEFAULT_ALIASES: &[(&str, &str)] = &[("@", "/src")];

/// The configuration returned from the `config` hook.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedBuildConfig {
    pub base: String,
    pub public_dir: BoolOr<String>,
    pub build: MergedBuildOptions,
    pub server: MergedServerOptions,
    pub resolve: MergedResolveOptions,
    pub ssr: MergedSsrOptions,
}

/// The merged `build` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedBuildOptions {
    pub manifest: BoolOr<String>,
    pub ssr_manifest: BoolOr<String>,
    pub out_dir: String,
    pub rollup_options: MergedRollupOptions,
    pub assets_inline_limit: u64,
    pub empty_out_dir: bool,
}

/// The merged `build.rollupOptions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedRollupOptions {
    pub input: InputOption,
}

/// The merged `server` section. Host, HMR and HTTPS appear only with TLS from the environment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedServerOptions {
    pub origin: String,
    pub cors: BoolOr<CorsOptions>,

    // Only set when serving with certificates from the environment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<BoolOr<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hmr: Option<BoolOr<HmrOptions>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub https: Option<HttpsOptions>,
}

/// The merged `resolve` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedResolveOptions {
    pub alias: AliasOptions,
}

/// The merged `ssr` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedSsrOptions {
    pub no_external: NoExternal,
}

/// Compute the configuration the host should use for this invocation.
///
/// # Errors
///
/// Only when serving with certificate variables set: missing certificate
/// files or an `APP_URL` without a host.
pub fn merge(
    plugin: &ResolvedPluginConfig,
    user: &UserConfig,
    config_env: &ConfigEnv,
    env: &Env,
) -> Result<MergedBuildConfig> {
    let ssr = user.is_ssr();
    let build = user.build.clone().unwrap_or_default();
    let server = user.server.clone().unwrap_or_default();

    debug!(command = ?config_env.command, mode = %config_env.mode, ssr, "merging build configuration");

    let env_server = match config_env.command {
        Command::Serve => resolve_server_config_from_env(env)?,
        Command::Build => None,
    };

    Ok(MergedBuildConfig {
        base: prefer(user.base.as_ref(), || resolve_base(plugin, config_env, env)),
        public_dir: prefer(user.public_dir.as_ref(), || BoolOr::Bool(false)),
        build: MergedBuildOptions {
            manifest: prefer(build.manifest.as_ref(), || resolve_manifest(ssr)),
            ssr_manifest: prefer(build.ssr_manifest.as_ref(), || resolve_ssr_manifest(ssr)),
            out_dir: prefer(build.out_dir.as_ref(), || resolve_out_dir(plugin, ssr)),
            rollup_options: MergedRollupOptions {
                input: prefer(
                    build.rollup_options.as_ref().and_then(|r| r.input.as_ref()),
                    || resolve_input(plugin, ssr),
                ),
            },
            assets_inline_limit: prefer(build.assets_inline_limit.as_ref(), || 0),
            empty_out_dir: prefer(build.empty_out_dir.as_ref(), || true),
        },
        server: resolve_server(&server, env, env_server),
        resolve: MergedResolveOptions {
            alias: resolve_alias(user.resolve.as_ref().and_then(|r| r.alias.as_ref())),
        },
        ssr: MergedSsrOptions {
            no_external: resolve_no_external(user.ssr.as_ref().and_then(|s| s.no_external.as_ref())),
        },
    })
}

/// Host value first, plugin default second.
fn prefer<T: Clone>(host: Option<&T>, plugin: impl FnOnce() -> T) -> T {
    host.cloned().unwrap_or_else(plugin)
}

/// Built assets live below `ASSET_URL` (if any) and the build directory.
fn resolve_base(plugin: &ResolvedPluginConfig, config_env: &ConfigEnv, env: &Env) -> String {
    match config_env.command {
        Command::Build => {
            let asset_url = env.get(ASSET_URL).unwrap_or_default();
            format!("{}{}/", with_trailing_slash(asset_url), plugin.build_dir)
        }
        Command::Serve => String::new(),
    }
}

fn with_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}

fn resolve_manifest(ssr: bool) -> BoolOr<String> {
    if ssr {
        BoolOr::Bool(false)
    } else {
        BoolOr::Value(MANIFEST_FILE.to_string())
    }
}

fn resolve_ssr_manifest(ssr: bool) -> BoolOr<String> {
    if ssr {
        BoolOr::Value(SSR_MANIFEST_FILE.to_string())
    } else {
        BoolOr::Bool(false)
    }
}

fn resolve_out_dir(plugin: &ResolvedPluginConfig, ssr: bool) -> String {
    if ssr {
        plugin.ssr_out_dir.clone()
    } else {
        join_path(&plugin.static_dir, &plugin.build_dir)
    }
}

fn resolve_input(plugin: &ResolvedPluginConfig, ssr: bool) -> InputOption {
    if ssr {
        plugin.ssr_input.clone()
    } else {
        plugin.input.clone()
    }
}

fn resolve_server(
    server: &ServerOptions,
    env: &Env,
    env_server: Option<EnvServerConfig>,
) -> MergedServerOptions {
    let mut merged = MergedServerOptions {
        origin: prefer(server.origin.as_ref(), || {
            DEV_SERVER_ORIGIN_PLACEHOLDER.to_string()
        }),
        cors: prefer(server.cors.as_ref(), || BoolOr::Value(resolve_cors(server, env))),
        host: None,
        hmr: None,
        https: None,
    };

    if let Some(env_server) = env_server {
        merged.host = Some(prefer(server.host.as_ref(), || {
            BoolOr::Value(env_server.host.clone())
        }));
        merged.hmr = Some(resolve_hmr(server.hmr.as_ref(), env_server.hmr));
        merged.https = Some(prefer(server.https.as_ref(), || env_server.https));
    }

    merged
}

/// A user-set origin is the only allowed origin; otherwise the default list.
fn resolve_cors(server: &ServerOptions, env: &Env) -> CorsOptions {
    let origin = match &server.origin {
        Some(origin) => CorsOrigin::One(OriginMatcher::literal(origin.clone())),
        None => CorsOrigin::List(default_allowed_origins(env.get(APP_URL))),
    };

    CorsOptions::with_origin(origin)
}

fn resolve_hmr(user: Option<&BoolOr<HmrOptions>>, env_hmr: HmrOptions) -> BoolOr<HmrOptions> {
    match user {
        Some(BoolOr::Bool(false)) => BoolOr::Bool(false),
        Some(BoolOr::Value(user)) => BoolOr::Value(user.clone().over(env_hmr)),
        Some(BoolOr::Bool(true)) | None => BoolOr::Value(env_hmr),
    }
}

/// List aliases are first-match, so the plugin's entries go last; map
/// aliases let the user's keys overwrite the plugin's.
fn resolve_alias(user: Option<&AliasOptions>) -> AliasOptions {
    match user {
        Some(AliasOptions::List(list)) => {
            let mut aliases = list.clone();
            aliases.extend(
                DEFAULT_ALIASES
                    .iter()
                    .map(|(find, replacement)| Alias::new(*find, *replacement)),
            );
            AliasOptions::List(aliases)
        }
        Some(AliasOptions::Map(map)) => {
            let mut aliases = default_alias_map();
            aliases.extend(map.iter().map(|(k, v)| (k.clone(), v.clone())));
            AliasOptions::Map(aliases)
        }
        None => AliasOptions::Map(default_alias_map()),
    }
}

fn default_alias_map() -> indexmap::IndexMap<String, String> {
    DEFAULT_ALIASES
        .iter()
        .map(|(find, replacement)| (find.to_string(), replacement.to_string()))
        .collect()
}

fn resolve_no_external(user: Option<&NoExternal>) -> NoExternal {
    let plugin = PLUGIN_PACKAGE_NAME.to_string();

    match user {
        Some(NoExternal::All(true)) => NoExternal::All(true),
        Some(NoExternal::All(false)) | None => NoExternal::Many(vec![plugin]),
        Some(NoExternal::One(one)) => NoExternal::Many(vec![one.clone(), plugin]),
        Some(NoExternal::Many(many)) => {
            let mut packages = many.clone();
            packages.push(plugin);
            NoExternal::Many(packages)
        }
    }
}
