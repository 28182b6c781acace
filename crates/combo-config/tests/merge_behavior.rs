//! Merging plugin defaults with the host's partial configuration.

use combo_config::{
    Alias, AliasOptions, BoolOr, ConfigEnv, Env, InputOption, MergedBuildConfig, NoExternal,
    PluginOptions, UserConfig, merge, normalize,
};
use serde_json::json;

fn build(options: PluginOptions, user: UserConfig) -> MergedBuildConfig {
    let plugin = normalize(Some(options)).expect("normalize");
    merge(&plugin, &user, &ConfigEnv::build("production"), &Env::new()).expect("merge")
}

fn user(value: serde_json::Value) -> UserConfig {
    serde_json::from_value(value).expect("user config")
}

#[test]
fn string_input_is_used_for_both_builds() {
    let options = PluginOptions::new("src/js/app.ts");

    let config = build(options.clone(), UserConfig::default());
    assert_eq!(config.build.rollup_options.input, InputOption::from("src/js/app.ts"));

    let ssr = build(options, UserConfig::ssr_build());
    assert_eq!(ssr.build.rollup_options.input, InputOption::from("src/js/app.ts"));
}

#[test]
fn input_shapes_are_preserved() {
    let options = PluginOptions::new(["src/js/app.ts", "src/js/other.js"])
        .with_ssr_input(["src/js/ssr.ts", "src/js/other.js"]);

    let config = build(options.clone(), UserConfig::default());
    assert_eq!(
        serde_json::to_value(&config.build.rollup_options.input).unwrap(),
        json!(["src/js/app.ts", "src/js/other.js"])
    );

    let ssr = build(options, UserConfig::ssr_build());
    assert_eq!(
        serde_json::to_value(&ssr.build.rollup_options.input).unwrap(),
        json!(["src/js/ssr.ts", "src/js/other.js"])
    );
}

#[test]
fn named_inputs_are_preserved() {
    let options = PluginOptions::from_value(json!({
        "input": {"app": "src/js/entrypoint-csr.js"},
        "ssrInput": {"ssr": "src/js/entrypoint-ssr.js"}
    }))
    .unwrap()
    .unwrap();

    let config = build(options.clone(), UserConfig::default());
    assert_eq!(
        serde_json::to_value(&config.build.rollup_options.input).unwrap(),
        json!({"app": "src/js/entrypoint-csr.js"})
    );

    let ssr = build(options, UserConfig::ssr_build());
    assert_eq!(
        serde_json::to_value(&ssr.build.rollup_options.input).unwrap(),
        json!({"ssr": "src/js/entrypoint-ssr.js"})
    );
}

#[test]
fn full_configuration() {
    let options = PluginOptions::new("src/js/app.ts")
        .with_static_dir("other-static")
        .with_build_dir("other-build")
        .with_ssr_input("src/js/ssr.ts")
        .with_ssr_out_dir("other-ssr-output");

    let config = build(options.clone(), UserConfig::default());
    assert_eq!(config.base, "/other-build/");
    assert_eq!(config.build.manifest, BoolOr::from("manifest.json"));
    assert_eq!(config.build.ssr_manifest, BoolOr::Bool(false));
    assert_eq!(config.build.out_dir, "other-static/other-build");
    assert_eq!(config.build.rollup_options.input, InputOption::from("src/js/app.ts"));

    let ssr = build(options, UserConfig::ssr_build());
    assert_eq!(ssr.base, "/other-build/");
    assert_eq!(ssr.build.manifest, BoolOr::Bool(false));
    assert_eq!(ssr.build.ssr_manifest, BoolOr::from("ssr-manifest.json"));
    assert_eq!(ssr.build.out_dir, "other-ssr-output");
    assert_eq!(ssr.build.rollup_options.input, InputOption::from("src/js/ssr.ts"));
}

#[test]
fn partial_configuration_uses_defaults() {
    let options = PluginOptions::new("src/js/app.js").with_ssr_input("src/js/ssr.js");

    let config = build(options.clone(), UserConfig::default());
    assert_eq!(config.base, "/build/");
    assert_eq!(config.public_dir, BoolOr::Bool(false));
    assert_eq!(config.build.out_dir, "../priv/static/build");
    assert_eq!(config.build.assets_inline_limit, 0);
    assert!(config.build.empty_out_dir);

    let ssr = build(options, UserConfig::ssr_build());
    assert_eq!(ssr.build.out_dir, "../priv/ssr");
    assert_eq!(ssr.build.rollup_options.input, InputOption::from("src/js/ssr.js"));
}

#[test]
fn surrounding_slashes_are_trimmed() {
    let options = PluginOptions::new("src/js/app.js")
        .with_static_dir("/public/test/")
        .with_build_dir("/build/test/")
        .with_ssr_out_dir("/ssr-output/test/");

    let config = build(options.clone(), UserConfig::default());
    assert_eq!(config.base, "/build/test/");
    assert_eq!(config.build.out_dir, "public/test/build/test");

    let ssr = build(options, UserConfig::ssr_build());
    assert_eq!(ssr.build.out_dir, "ssr-output/test");
}

#[test]
fn user_values_are_never_overridden() {
    let config = build(
        PluginOptions::new("src/js/app.js"),
        user(json!({
            "base": "/foo/",
            "publicDir": "public",
            "build": {
                "manifest": "my-custom-manifest.json",
                "outDir": "dist",
                "assetsInlineLimit": 4096,
                "emptyOutDir": true,
                "rollupOptions": {"input": "other.js"}
            },
            "server": {"origin": "http://my-app.test:5173"}
        })),
    );

    assert_eq!(config.base, "/foo/");
    assert_eq!(config.public_dir, BoolOr::from("public"));
    assert_eq!(config.build.manifest, BoolOr::from("my-custom-manifest.json"));
    assert_eq!(config.build.out_dir, "dist");
    assert_eq!(config.build.assets_inline_limit, 4096);
    assert!(config.build.empty_out_dir);
    assert_eq!(config.build.rollup_options.input, InputOption::from("other.js"));
    assert_eq!(config.server.origin, "http://my-app.test:5173");
}

#[test]
fn empty_out_dir_defaults_on_and_respects_user_opt_out() {
    let options = PluginOptions::new("src/js/app.js");
    assert!(build(options.clone(), UserConfig::default()).build.empty_out_dir);

    let kept = build(options, user(json!({"build": {"emptyOutDir": false}})));
    assert!(!kept.build.empty_out_dir);
}

#[test]
fn asset_url_prefixes_build_base() {
    let plugin = normalize(Some(PluginOptions::new("src/js/app.js"))).unwrap();
    let env = Env::new().with("ASSET_URL", "http://example.com");

    let serve = merge(&plugin, &UserConfig::default(), &ConfigEnv::serve("development"), &env).unwrap();
    assert_eq!(serve.base, "");

    let build = merge(&plugin, &UserConfig::default(), &ConfigEnv::build("production"), &env).unwrap();
    assert_eq!(build.base, "http://example.com/build/");
}

#[test]
fn server_origin_defaults_to_placeholder() {
    let config = build(PluginOptions::new("src/js/app.js"), UserConfig::default());
    assert_eq!(config.server.origin, "http://__vite_dev_server_host_placeholder__");
    assert!(config.server.host.is_none());
    assert!(config.server.https.is_none());
}

#[test]
fn provides_an_at_alias_by_default() {
    let config = build(PluginOptions::new("src/js/app.js"), UserConfig::default());
    let AliasOptions::Map(aliases) = config.resolve.alias else {
        panic!("expected map aliases");
    };
    assert_eq!(aliases["@"], "/src");
}

#[test]
fn respects_an_existing_at_alias() {
    let config = build(
        PluginOptions::new("src/js/app.js"),
        user(json!({"resolve": {"alias": {"@": "/somewhere/else"}}})),
    );
    let AliasOptions::Map(aliases) = config.resolve.alias else {
        panic!("expected map aliases");
    };
    assert_eq!(aliases["@"], "/somewhere/else");
}

#[test]
fn appends_alias_to_alias_list() {
    let config = build(
        PluginOptions::new("src/js/app.js"),
        user(json!({"resolve": {"alias": [{"find": "@", "replacement": "/something/else"}]}})),
    );

    assert_eq!(
        config.resolve.alias,
        AliasOptions::List(vec![
            Alias::new("@", "/something/else"),
            Alias::new("@", "/src"),
        ])
    );
}

#[test]
fn plugin_package_is_never_externalized() {
    let options = PluginOptions::new("src/js/app.js");
    let ssr_with = |no_external: serde_json::Value| {
        let mut config = user(json!({"ssr": {"noExternal": no_external}}));
        config.build = UserConfig::ssr_build().build;
        build(options.clone(), config).ssr.no_external
    };

    assert_eq!(
        build(options.clone(), UserConfig::ssr_build()).ssr.no_external,
        NoExternal::Many(vec!["vite-plugin-combo".into()])
    );
    assert_eq!(ssr_with(json!(true)), NoExternal::All(true));
    assert_eq!(
        ssr_with(json!(["foo"])),
        NoExternal::Many(vec!["foo".into(), "vite-plugin-combo".into()])
    );
    assert_eq!(
        ssr_with(json!("foo")),
        NoExternal::Many(vec!["foo".into(), "vite-plugin-combo".into()])
    );
}

#[test]
fn merged_config_serializes_in_host_shape() {
    let config = build(PluginOptions::new("src/js/app.js"), UserConfig::default());
    let value = serde_json::to_value(&config).unwrap();

    assert_eq!(value["base"], json!("/build/"));
    assert_eq!(value["publicDir"], json!(false));
    assert_eq!(value["build"]["manifest"], json!("manifest.json"));
    assert_eq!(value["build"]["ssrManifest"], json!(false));
    assert_eq!(value["build"]["rollupOptions"]["input"], json!("src/js/app.js"));
    assert_eq!(value["build"]["assetsInlineLimit"], json!(0));
    assert_eq!(value["build"]["emptyOutDir"], json!(true));
    assert_eq!(value["ssr"]["noExternal"], json!(["vite-plugin-combo"]));
}
