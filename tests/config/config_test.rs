//! Coverage for config parsing, env precedence and path resolution.

use std::fs;
use std::path::PathBuf;

use manzili::config::ManziliConfig;

#[test]
fn parse_full_config() {
    let toml_str = r#"
[advisor]
model = "gemini/gemini-1.5-flash"
timeout_secs = 15
max_tokens = 1024
api_base = "http://10.0.0.2:8443/v1beta"

[reports]
output_dir = "/srv/manzili/reports"
assets_dir = "/srv/manzili/assets"
catalogue_dir = "/srv/manzili/catalogues"

[server]
bind = "0.0.0.0:8080"
logs_dir = "/var/log/manzili"

[logging]
level = "debug"
"#;
    let config = match ManziliConfig::from_toml(toml_str) {
        Ok(config) => config,
        Err(err) => panic!("config should parse: {err}"),
    };
    assert_eq!(config.advisor.model, "gemini/gemini-1.5-flash");
    assert_eq!(config.advisor.timeout_secs, 15);
    assert_eq!(config.advisor.max_tokens, 1024);
    assert_eq!(
        config.advisor.api_base.as_deref(),
        Some("http://10.0.0.2:8443/v1beta")
    );
    assert_eq!(config.reports.output_dir, PathBuf::from("/srv/manzili/reports"));
    assert_eq!(
        config.reports.catalogue_dir,
        Some(PathBuf::from("/srv/manzili/catalogues"))
    );
    assert_eq!(config.server.bind, "0.0.0.0:8080");
    assert_eq!(config.server.logs_dir, PathBuf::from("/var/log/manzili"));
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn unknown_sections_are_ignored() {
    let config = ManziliConfig::from_toml("[telemetry]\nenabled = true\n").expect("should parse");
    assert_eq!(config.advisor.model, "gemini/gemini-1.5-pro");
}

#[test]
fn wrong_value_type_is_an_error() {
    assert!(ManziliConfig::from_toml("[advisor]\ntimeout_secs = \"soon\"\n").is_err());
}

#[test]
fn file_then_env_precedence() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("manzili.toml");
    let write = fs::write(
        &path,
        "[advisor]\nmodel = \"gemini/gemini-1.0-pro\"\n\n[server]\nbind = \"127.0.0.1:9000\"\n",
    );
    assert!(write.is_ok());
    let path = path.display().to_string();

    let config = ManziliConfig::load_with(|key| match key {
        "MANZILI_CONFIG_PATH" => Some(path.clone()),
        "MANZILI_MODEL" => Some("gemini/gemini-1.5-flash".to_owned()),
        "MANZILI_LOG_LEVEL" => Some("warn".to_owned()),
        _ => None,
    })
    .expect("should load");

    assert_eq!(config.advisor.model, "gemini/gemini-1.5-flash");
    assert_eq!(config.server.bind, "127.0.0.1:9000");
    assert_eq!(config.logging.level, "warn");
}

#[test]
fn unreadable_config_path_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let as_dir = dir.path().display().to_string();
    let result = ManziliConfig::load_with(|key| match key {
        "MANZILI_CONFIG_PATH" => Some(as_dir.clone()),
        _ => None,
    });
    assert!(result.is_err());
}

#[test]
fn api_base_override_treats_blank_as_unset() {
    let mut config =
        ManziliConfig::from_toml("[advisor]\napi_base = \"http://proxy:8443/v1beta\"\n")
            .expect("should parse");
    config.apply_overrides(|key| (key == "MANZILI_API_BASE").then(|| "  ".to_owned()));
    assert!(config.advisor.api_base.is_none());

    config.apply_overrides(|key| {
        (key == "MANZILI_API_BASE").then(|| "http://edge/v1beta".to_owned())
    });
    assert_eq!(config.advisor.api_base.as_deref(), Some("http://edge/v1beta"));
}
