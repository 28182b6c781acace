//! Dev-server settings: CORS policy and certificates from the environment.

use std::fs;

use combo_config::{
    BoolOr, ConfigEnv, ConfigError, CorsOptions, CorsOrigin, Env, HmrOptions, MergedBuildConfig,
    PluginOptions, UserConfig, merge, normalize,
};
use serde_json::json;
use tempfile::TempDir;

fn serve(user: UserConfig, env: &Env) -> combo_config::Result<MergedBuildConfig> {
    let plugin = normalize(Some(PluginOptions::new("src/js/app.js")))?;
    merge(&plugin, &user, &ConfigEnv::serve("development"), env)
}

fn cors_origin(config: &MergedBuildConfig) -> &CorsOrigin {
    config
        .server
        .cors
        .value()
        .and_then(|cors| cors.origin.as_ref())
        .expect("cors origin")
}

#[test]
fn configures_default_cors_origins() {
    let env = Env::new().with("APP_URL", "http://example.com");
    let config = serve(UserConfig::default(), &env).unwrap();
    let origin = cors_origin(&config);

    for url in [
        "http://localhost",
        "https://localhost",
        "http://localhost:8080",
        "https://localhost:8080",
        "http://app.localhost",
        "https://app.localhost",
        "http://app.localhost:8080",
        "https://app.localhost:8080",
        "http://127.0.0.1",
        "https://127.0.0.1",
        "http://127.0.0.1:8000",
        "https://127.0.0.1:8000",
        "https://my-app.test:8000",
        "http://example.com",
    ] {
        assert!(origin.allows(url), "{url} should be allowed");
    }

    for url in [
        "http://combo.com",
        "https://combo.com",
        "http://combo.com:8000",
        "https://combo.com:8000",
        "http://128.0.0.1",
        "https://128.0.0.1",
        "http://128.0.0.1:8000",
        "https://128.0.0.1:8000",
        "https://example.com",
        "http://example.com:8000",
        "https://example.com:8000",
        "http://exampletest",
        "http://example.test:",
    ] {
        assert!(!origin.allows(url), "{url} should be rejected");
    }
}

#[test]
fn respects_user_cors_config() {
    let user: UserConfig = serde_json::from_value(json!({"server": {"cors": true}})).unwrap();
    let config = serve(user, &Env::new()).unwrap();
    assert_eq!(config.server.cors, BoolOr::Bool(true));
}

#[test]
fn user_origin_becomes_the_only_cors_origin() {
    let user: UserConfig =
        serde_json::from_value(json!({"server": {"origin": "http://my-app.test:5173"}})).unwrap();
    let config = serve(user, &Env::new()).unwrap();
    let origin = cors_origin(&config);

    assert!(origin.allows("http://my-app.test:5173"));
    assert!(!origin.allows("http://localhost:5173"));
}

#[test]
fn cors_policy_serializes_patterns() {
    let config = serve(UserConfig::default(), &Env::new()).unwrap();
    let value = serde_json::to_value(&config.server.cors).unwrap();

    let origins = value["origin"].as_array().unwrap();
    assert_eq!(origins.len(), 2);
    assert!(origins.iter().all(|o| o.get("pattern").is_some()));

    let parsed: CorsOptions = serde_json::from_value(value).unwrap();
    assert!(parsed.allows("http://localhost:5173"));
}

struct Certificates {
    _dir: TempDir,
    env: Env,
}

fn certificates() -> Certificates {
    let dir = TempDir::new().unwrap();
    let key = dir.path().join("dev.key");
    let cert = dir.path().join("dev.crt");
    fs::write(&key, "KEY").unwrap();
    fs::write(&cert, "CERT").unwrap();

    let env = Env::new()
        .with("APP_URL", "https://my-app.test")
        .with("VITE_DEV_SERVER_KEY", key.to_string_lossy())
        .with("VITE_DEV_SERVER_CERT", cert.to_string_lossy());

    Certificates { _dir: dir, env }
}

#[test]
fn env_certificates_enable_https() {
    let certs = certificates();
    let config = serve(UserConfig::default(), &certs.env).unwrap();

    assert_eq!(config.server.host, Some(BoolOr::from("my-app.test")));
    assert_eq!(
        config.server.hmr,
        Some(BoolOr::Value(HmrOptions {
            host: Some("my-app.test".into()),
            ..HmrOptions::default()
        }))
    );
    let https = config.server.https.unwrap();
    assert_eq!(https.key.as_deref(), Some(b"KEY".as_slice()));
    assert_eq!(https.cert.as_deref(), Some(b"CERT".as_slice()));
}

#[test]
fn env_certificates_are_ignored_for_builds() {
    let certs = certificates();
    let plugin = normalize(Some(PluginOptions::new("src/js/app.js"))).unwrap();
    let config = merge(&plugin, &UserConfig::default(), &ConfigEnv::build("production"), &certs.env).unwrap();

    assert!(config.server.https.is_none());
}

#[test]
fn user_server_settings_win_over_env() {
    let certs = certificates();
    let user: UserConfig = serde_json::from_value(json!({
        "server": {"host": "0.0.0.0", "hmr": {"clientPort": 443}}
    }))
    .unwrap();

    let config = serve(user, &certs.env).unwrap();
    assert_eq!(config.server.host, Some(BoolOr::from("0.0.0.0")));
    assert_eq!(
        config.server.hmr,
        Some(BoolOr::Value(HmrOptions {
            host: Some("my-app.test".into()),
            client_port: Some(443),
            ..HmrOptions::default()
        }))
    );

    let user: UserConfig = serde_json::from_value(json!({"server": {"hmr": false}})).unwrap();
    let config = serve(user, &certs.env).unwrap();
    assert_eq!(config.server.hmr, Some(BoolOr::Bool(false)));
}

#[test]
fn missing_certificate_names_both_variables() {
    let env = Env::new()
        .with("APP_URL", "https://my-app.test")
        .with("VITE_DEV_SERVER_KEY", "/does/not/exist.key");

    let err = serve(UserConfig::default(), &env).unwrap_err();
    assert!(matches!(err, ConfigError::CertificateNotFound { .. }));

    let message = err.to_string();
    assert!(message.contains("VITE_DEV_SERVER_KEY: [/does/not/exist.key]"));
    assert!(message.contains("VITE_DEV_SERVER_CERT: []"));
}

#[test]
fn certificates_require_app_url() {
    let mut certs = certificates();
    certs.env = certs.env.with("APP_URL", "");

    let err = serve(UserConfig::default(), &certs.env).unwrap_err();
    assert!(matches!(err, ConfigError::UnresolvableHost { .. }));
    assert!(err.to_string().contains("APP_URL"));
}
