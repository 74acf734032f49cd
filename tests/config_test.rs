//! Tests for config loading

use serial_test::serial;
use std::path::PathBuf;
use trendlens::config::Config;

const ENV_KEYS: &[&str] = &[
    "TRENDLENS_BASE_URL",
    "TRENDLENS_KEYWORD",
    "TRENDLENS_GEO",
    "TRENDLENS_OUTPUT_DIR",
    "TRENDLENS_RATE_LIMIT",
    "TRENDLENS_MAX_RETRIES",
    "TRENDLENS_TOP_N",
    "TRENDLENS_CHARTS",
    "TRENDLENS_TZ",
];

fn clear_env() {
    for key in ENV_KEYS {
        std::env::remove_var(key);
    }
}

#[test]
fn test_config_file_exists() {
    let config_path = std::path::Path::new("config.toml");
    assert!(
        config_path.exists(),
        "config.toml should exist in project root"
    );
}

#[test]
fn test_config_toml_loads() {
    let config = Config::from_file(std::path::Path::new("config.toml"))
        .expect("Should be able to load config.toml");

    assert_eq!(config.query.keyword, "turkcell");
    assert_eq!(config.query.geo, "TR");
    assert_eq!(config.output.regional_top_n, 15);
    assert!(config.validate().is_ok());
}

#[test]
fn test_missing_file_is_error() {
    assert!(Config::from_file(std::path::Path::new("does-not-exist.toml")).is_err());
}

#[test]
#[serial]
fn test_from_env_defaults() {
    clear_env();

    let config = Config::from_env().unwrap();
    assert_eq!(config.provider.base_url, "https://trends.google.com");
    assert_eq!(config.provider.tz_offset, 180);
    assert_eq!(config.provider.max_retries, 0);
    assert_eq!(config.query.keyword, "turkcell");
    assert_eq!(config.output.dir, PathBuf::from("."));
    assert!(config.output.charts);
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_env();
    std::env::set_var("TRENDLENS_KEYWORD", "vodafone");
    std::env::set_var("TRENDLENS_OUTPUT_DIR", "/tmp/trends");
    std::env::set_var("TRENDLENS_RATE_LIMIT", "5");
    std::env::set_var("TRENDLENS_TOP_N", "8");
    std::env::set_var("TRENDLENS_CHARTS", "false");

    let config = Config::from_env().unwrap();
    assert_eq!(config.query.keyword, "vodafone");
    assert_eq!(config.output.dir, PathBuf::from("/tmp/trends"));
    assert_eq!(config.provider.rate_limit, 5);
    assert_eq!(config.output.regional_top_n, 8);
    assert!(!config.output.charts);

    clear_env();
}

#[test]
#[serial]
fn test_unparsable_env_falls_back_to_default() {
    clear_env();
    std::env::set_var("TRENDLENS_MAX_RETRIES", "many");
    std::env::set_var("TRENDLENS_TZ", "east");

    let config = Config::from_env().unwrap();
    assert_eq!(config.provider.max_retries, 0);
    assert_eq!(config.provider.tz_offset, 180);

    clear_env();
}
