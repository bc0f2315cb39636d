use std::io::Write;

use serial_test::serial;
use tempfile::NamedTempFile;

use super::*;

fn clear_env() {
    // SAFETY: tests touching the environment are serialized.
    unsafe {
        env::remove_var(ENV_URL);
        env::remove_var(ENV_ANON_KEY);
        env::remove_var(ENV_TIMEOUT_SECS);
        env::remove_var(ENV_CONFIG_FILE);
    }
}

fn yaml(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
#[serial]
fn overrides_win_over_environment() {
    clear_env();
    unsafe {
        env::set_var(ENV_URL, "https://env.example.co");
        env::set_var(ENV_ANON_KEY, "env-key");
    }
    let config = Config::load(ConfigOverrides {
        url: Some("https://flag.example.co/".to_string()),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(config.url, "https://flag.example.co");
    assert_eq!(config.anon_key, "env-key");
    assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    clear_env();
}

#[test]
#[serial]
fn missing_url_is_an_error() {
    clear_env();
    let err = Config::load(ConfigOverrides::default()).unwrap_err();
    assert!(matches!(err, ConfigError::Missing { field: "url", .. }));
}

#[test]
#[serial]
fn file_supplies_values_below_environment() {
    clear_env();
    let file = yaml(
        "url: https://file.example.co\nanon_key: file-key\ntimeout_secs: 5\ndebounce_ms: 250\npage_size: 20\n",
    );
    unsafe {
        env::set_var(ENV_ANON_KEY, "env-key");
    }
    let config = Config::load(ConfigOverrides {
        file: Some(file.path().to_path_buf()),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(config.url, "https://file.example.co");
    assert_eq!(config.anon_key, "env-key");
    assert_eq!(config.timeout(), Duration::from_secs(5));
    assert_eq!(config.debounce(), Duration::from_millis(250));
    assert_eq!(config.page_size, 20);
    clear_env();
}

#[test]
#[serial]
fn invalid_timeout_in_environment() {
    clear_env();
    unsafe {
        env::set_var(ENV_TIMEOUT_SECS, "soon");
    }
    let err = Config::load(ConfigOverrides {
        url: Some("https://x.co".to_string()),
        anon_key: Some("k".to_string()),
        ..Default::default()
    })
    .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Invalid {
            field: "timeout_secs",
            ..
        }
    ));
    clear_env();
}

#[test]
#[serial]
fn unreadable_and_malformed_files() {
    clear_env();
    let err = Config::load(ConfigOverrides {
        file: Some(PathBuf::from("/nonexistent/cadmin.yaml")),
        ..Default::default()
    })
    .unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));

    let file = yaml("url: [unterminated\n");
    let err = Config::load(ConfigOverrides {
        file: Some(file.path().to_path_buf()),
        ..Default::default()
    })
    .unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
#[serial]
fn zero_page_size_is_rejected() {
    clear_env();
    let file = yaml("url: https://x.co\nanon_key: k\npage_size: 0\n");
    let err = Config::load(ConfigOverrides {
        file: Some(file.path().to_path_buf()),
        ..Default::default()
    })
    .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { field: "page_size", .. }));
}
