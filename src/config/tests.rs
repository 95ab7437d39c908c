use super::*;
use tempfile::{tempdir, TempDir};
use std::fs::File;
use std::io::Write;

/// Helper function to create a test configuration file
fn create_test_config_file(dir: &TempDir, content: &str) -> PathBuf {
    let config_path = dir.path().join("config.toml");
    let mut file = File::create(&config_path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    config_path
}

fn sample_config() -> Config {
    Config {
        database_url: "original.db".to_string(),
        bind_address: "127.0.0.1:9000".to_string(),
        jwt_secret: "original-secret".to_string(),
        token_ttl_minutes: 30,
        log_dir: None,
    }
}

fn empty_args() -> CliArgs {
    CliArgs {
        database_url: None,
        bind_address: None,
        jwt_secret: None,
        token_ttl_minutes: None,
        log_dir: None,
        debug: false,
    }
}

/// Tests for Config::apply_update
#[test]
fn test_apply_update_with_all_values() {
    let update = ConfigUpdate {
        database_url: Some("updated.db".to_string()),
        bind_address: Some("0.0.0.0:80".to_string()),
        jwt_secret: Some("updated-secret".to_string()),
        token_ttl_minutes: Some(120),
        log_dir: Some(PathBuf::from("/var/log/flashdeck")),
        server_url: Some("http://ignored".to_string()),
    };

    let updated = sample_config().apply_update(update);

    assert_eq!(updated.database_url, "updated.db");
    assert_eq!(updated.bind_address, "0.0.0.0:80");
    assert_eq!(updated.jwt_secret, "updated-secret");
    assert_eq!(updated.token_ttl_minutes, 120);
    assert_eq!(updated.log_dir, Some(PathBuf::from("/var/log/flashdeck")));
}


#[test]
fn test_apply_update_with_partial_values() {
    let update = ConfigUpdate {
        database_url: Some("updated.db".to_string()),
        ..ConfigUpdate::default()
    };

    let updated = sample_config().apply_update(update);

    assert_eq!(updated.database_url, "updated.db");
    assert_eq!(updated.bind_address, "127.0.0.1:9000"); // Unchanged
    assert_eq!(updated.jwt_secret, "original-secret"); // Unchanged
    assert_eq!(updated.token_ttl_minutes, 30); // Unchanged
}


#[test]
fn test_apply_update_with_no_values() {
    let updated = sample_config().apply_update(ConfigUpdate::default());

    assert_eq!(updated.database_url, "original.db");
    assert_eq!(updated.bind_address, "127.0.0.1:9000");
    assert_eq!(updated.token_ttl_minutes, 30);
    assert_eq!(updated.log_dir, None);
}


#[test]
fn test_token_ttl_conversion() {
    assert_eq!(sample_config().token_ttl(), Duration::from_secs(30 * 60));
}


#[test]
fn test_base_config_defaults() {
    let config = base_config(None);

    assert_eq!(config.database_url, "flashdeck.db");
    assert_eq!(config.bind_address, "127.0.0.1:8080");
    assert_eq!(config.token_ttl_minutes, 60);
    assert!(config.uses_development_secret());
    assert_eq!(config.log_dir, None);
}


#[test]
fn test_base_config_with_path() {
    let temp_dir = tempdir().unwrap();
    let config = base_config(Some(temp_dir.path().to_path_buf()));

    let expected_db_path = temp_dir.path().join("flashdeck.db").to_string_lossy().to_string();
    assert_eq!(config.database_url, expected_db_path);
}


#[test]
fn test_config_from_args_with_all_values() {
    let args = CliArgs {
        database_url: Some("args.db".to_string()),
        bind_address: Some("0.0.0.0:1234".to_string()),
        jwt_secret: Some("args-secret".to_string()),
        token_ttl_minutes: Some(15),
        log_dir: Some(PathBuf::from("logs")),
        debug: true,
    };

    let update = config_from_args(&args);

    assert_eq!(update.database_url, Some("args.db".to_string()));
    assert_eq!(update.bind_address, Some("0.0.0.0:1234".to_string()));
    assert_eq!(update.jwt_secret, Some("args-secret".to_string()));
    assert_eq!(update.token_ttl_minutes, Some(15));
    assert_eq!(update.log_dir, Some(PathBuf::from("logs")));
    assert_eq!(update.server_url, None);
}


#[test]
fn test_config_from_args_with_no_values() {
    let update = config_from_args(&empty_args());

    assert_eq!(update.database_url, None);
    assert_eq!(update.bind_address, None);
    assert_eq!(update.jwt_secret, None);
    assert_eq!(update.token_ttl_minutes, None);
}


#[test]
fn test_config_from_file_with_no_path() {
    let update = config_from_file(None).unwrap();
    assert_eq!(update.database_url, None);
    assert_eq!(update.server_url, None);
}


#[test]
fn test_config_from_file_with_valid_toml() {
    let temp_dir = tempdir().unwrap();
    let config_content = r#"
        database_url = "file.db"
        bind_address = "0.0.0.0:8081"
        jwt_secret = "file-secret"
        token_ttl_minutes = 45
        server_url = "http://localhost:8081"
    "#;

    let config_path = create_test_config_file(&temp_dir, config_content);

    let result = config_from_file(Some(config_path));

    assert!(result.is_ok(), "Failed to parse config file: {}", result.err().unwrap());
    let update = result.unwrap();
    assert_eq!(update.database_url, Some("file.db".to_string()));
    assert_eq!(update.bind_address, Some("0.0.0.0:8081".to_string()));
    assert_eq!(update.jwt_secret, Some("file-secret".to_string()));
    assert_eq!(update.token_ttl_minutes, Some(45));
    assert_eq!(update.server_url, Some("http://localhost:8081".to_string()));
}


#[test]
fn test_config_from_file_with_partial_values() {
    let temp_dir = tempdir().unwrap();
    let config_content = r#"
        database_url = "file.db"
        # Intentionally missing other fields
    "#;

    let config_path = create_test_config_file(&temp_dir, config_content);

    let update = config_from_file(Some(config_path)).unwrap();
    assert_eq!(update.database_url, Some("file.db".to_string()));
    assert_eq!(update.token_ttl_minutes, None);
}


#[test]
fn test_config_from_file_with_invalid_toml() {
    let temp_dir = tempdir().unwrap();
    let config_content = r#"
        database_url = "file.db"
        token_ttl_minutes = "not a number" # Type error
    "#;

    let config_path = create_test_config_file(&temp_dir, config_content);

    assert!(config_from_file(Some(config_path)).is_err());
}


#[test]
fn test_config_from_file_with_nonexistent_file() {
    let temp_dir = tempdir().unwrap();
    let nonexistent_path = temp_dir.path().join("nonexistent_config.toml");

    let update = config_from_file(Some(nonexistent_path)).unwrap();
    assert_eq!(update.database_url, None);
}


#[test]
fn test_config_precedence() {
    let args = CliArgs {
        database_url: Some("args.db".to_string()),
        ..empty_args()
    };

    let file_config = ConfigUpdate {
        database_url: Some("file.db".to_string()),
        token_ttl_minutes: Some(50),
        ..ConfigUpdate::default()
    };

    // Replicate get_config without touching the real config directory
    let config = base_config(None)
        .apply_update(file_config)
        .apply_update(config_from_args(&args));

    assert_eq!(config.database_url, "args.db"); // From args
    assert_eq!(config.token_ttl_minutes, 50); // From file
    assert_eq!(config.bind_address, "127.0.0.1:8080"); // From base
}
