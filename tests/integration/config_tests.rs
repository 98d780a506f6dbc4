use clap::Parser;
use dedupe::cli::Cli;
use dedupe::config::{CliOverrides, ConfigError, Settings};
use figment::providers::{Format, Serialized, Toml};
use figment::Figment;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_config_load_defaults() {
    // Use figment directly without Env to avoid interference from other tests
    let figment = Figment::from(Serialized::defaults(Settings::default()));
    let settings = Settings::from_figment(&figment).unwrap();

    assert_eq!(settings.extensions, "");
    assert_eq!(settings.preferred, "");
    assert!(!settings.clean);
    assert!(!settings.trash);
    assert_eq!(settings.delay_secs, 10);
    assert_eq!(settings.io_threads, 4);
}

#[test]
fn test_config_load_from_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
extensions = "jpg, jpeg ,png"
preferred = ".png"
clean = true
trash = true
delay_secs = 0
io_threads = 2
"#,
    )
    .unwrap();

    let figment =
        Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file(&config_path));
    let settings = Settings::from_figment(&figment).unwrap();

    assert_eq!(settings.extension_set().unwrap().len(), 3);
    assert_eq!(settings.preferred_extension().unwrap().as_str(), ".png");
    assert!(settings.clean);
    assert!(settings.trash);
    assert_eq!(settings.delay_secs, 0);
    assert_eq!(settings.io_threads, 2);
}

#[test]
fn test_cli_flags_override_file() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "extensions = \"txt\"\npreferred = \"doc\"\n").unwrap();

    let cli = Cli::try_parse_from([
        "dedupe",
        "--directory",
        "/tmp",
        "--config",
        config_path.to_str().unwrap(),
        "--extensions",
        "md",
    ])
    .unwrap();
    let figment = Figment::from(Serialized::defaults(Settings::default()))
        .merge(Toml::file(&config_path))
        .merge(Serialized::defaults(CliOverrides::from(&cli)));
    let settings = Settings::from_figment(&figment).unwrap();

    assert_eq!(settings.extensions, "md");
    assert_eq!(settings.preferred, "doc");
}

#[test]
fn test_unset_switches_do_not_override_file() {
    let cli = Cli::try_parse_from(["dedupe", "--directory", "/tmp"]).unwrap();
    let overrides = CliOverrides::from(&cli);

    assert!(overrides.clean.is_none());
    assert!(overrides.trash.is_none());
    assert!(overrides.extensions.is_none());
    assert!(overrides.delay_secs.is_none());
}

#[test]
fn test_missing_explicit_config_is_error() {
    let temp_dir = tempdir().unwrap();
    let cli = Cli::try_parse_from([
        "dedupe",
        "--directory",
        "/tmp",
        "--config",
        temp_dir.path().join("absent.toml").to_str().unwrap(),
    ])
    .unwrap();

    assert!(matches!(
        Settings::load(&cli),
        Err(ConfigError::FileNotFound(_))
    ));
}

#[test]
fn test_config_invalid_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "extensions = [not toml").unwrap();

    let figment =
        Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file(&config_path));
    assert!(Settings::from_figment(&figment).is_err());
}

#[test]
fn test_config_roundtrips_through_toml() {
    let settings = Settings {
        extensions: "txt,doc".to_string(),
        preferred: "doc".to_string(),
        trash: true,
        ..Settings::default()
    };
    let rendered = settings.to_toml().unwrap();

    let parsed = Settings::from_figment(&Figment::from(Toml::string(&rendered))).unwrap();
    assert_eq!(parsed, settings);
}
