//! Configuration loader
//!
//! Loads the client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `HORIZON_BASE_URL` is missing or a value is invalid, falls back to a
//!    file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `HORIZON_BASE_URL`: Horizon endpoint (required)
//! - `HORIZON_TIMEOUT_SECONDS`: Request timeout in seconds
//! - `HORIZON_PROXY`: Proxy URL
//! - `HORIZON_CA_BUNDLE`: PEM file with extra trust anchors
//! - `HORIZON_SKIP_TLS_VERIFY`: Disable server certificate checks (true/false)
//! - `HORIZON_USER_AGENT`: User-Agent header
//! - `HORIZON_API_ID` / `HORIZON_API_KEY`: Shared-secret credential
//! - `HORIZON_CLIENT_CERT` / `HORIZON_CLIENT_KEY`: Client certificate and key
//!   PEM files
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./horizon.json` or `./horizon.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. The same names in the parent and grandparent directories
//! 4. Relative to executable location

use std::path::{Path, PathBuf};

use horizon_domain::{AuthConfig, HorizonConfig, HorizonError, Result};

const CONFIG_FILE_NAMES: [&str; 4] = ["horizon.json", "horizon.toml", "config.json", "config.toml"];
const SEARCH_DEPTH: usize = 2;

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If that fails, falls
/// back to loading from a config file.
///
/// # Errors
/// Returns `HorizonError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<HorizonConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Credentials are optional, but each credential needs both of its
/// variables. Setting both credential kinds at once is rejected.
///
/// # Errors
/// Returns `HorizonError::Config` if `HORIZON_BASE_URL` is missing, a value
/// is invalid, or a credential is incomplete.
pub fn load_from_env() -> Result<HorizonConfig> {
    let mut config = HorizonConfig::new(env_var("HORIZON_BASE_URL")?);

    config.timeout_seconds = optional_env_var("HORIZON_TIMEOUT_SECONDS")
        .map(|s| {
            s.parse::<u64>()
                .map_err(|e| HorizonError::Config(format!("Invalid timeout: {e}")))
        })
        .transpose()?;
    config.proxy = optional_env_var("HORIZON_PROXY");
    config.ca_bundle_path = optional_env_var("HORIZON_CA_BUNDLE").map(PathBuf::from);
    config.skip_tls_verify = env_bool("HORIZON_SKIP_TLS_VERIFY", false);
    config.user_agent = optional_env_var("HORIZON_USER_AGENT");

    let shared_secret = env_pair("HORIZON_API_ID", "HORIZON_API_KEY")?
        .map(|(api_id, api_key)| AuthConfig::SharedSecret { api_id, api_key });
    let client_certificate =
        env_pair("HORIZON_CLIENT_CERT", "HORIZON_CLIENT_KEY")?.map(|(cert, key)| {
            AuthConfig::ClientCertificate {
                certificate_path: PathBuf::from(cert),
                private_key_path: PathBuf::from(key),
            }
        });

    config.auth = match (shared_secret, client_certificate) {
        (Some(_), Some(_)) => {
            return Err(HorizonError::Config(
                "Both shared-secret and client-certificate credentials are set".to_string(),
            ))
        }
        (auth @ Some(_), None) | (None, auth) => auth,
    };

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `HorizonError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<HorizonConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(HorizonError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            HorizonError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| HorizonError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<HorizonConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| HorizonError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| HorizonError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(HorizonError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the current working directory, its parents (up to 2 levels) and
/// then the same around the executable location.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }
    if let Some(exe_dir) =
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        roots.push(exe_dir);
    }

    roots.iter().flat_map(|root| candidates_in(root)).find(|path| path.exists())
}

/// Config file candidates in `root` and its ancestors, nearest first.
fn candidates_in(root: &Path) -> Vec<PathBuf> {
    root.ancestors()
        .take(SEARCH_DEPTH + 1)
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .collect()
}

/// Get required environment variable
///
/// # Errors
/// Returns `HorizonError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    optional_env_var(key).ok_or_else(|| {
        HorizonError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Non-empty value of an environment variable.
fn optional_env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Both variables of a pair, neither, or an error if only one is set.
fn env_pair(first: &str, second: &str) -> Result<Option<(String, String)>> {
    match (optional_env_var(first), optional_env_var(second)) {
        (Some(a), Some(b)) => Ok(Some((a, b))),
        (None, None) => Ok(None),
        (Some(_), None) => Err(HorizonError::Config(format!("{first} is set but {second} is not"))),
        (None, Some(_)) => Err(HorizonError::Config(format!("{second} is set but {first} is not"))),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use once_cell::sync::Lazy;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const HORIZON_VARS: [&str; 10] = [
        "HORIZON_BASE_URL",
        "HORIZON_TIMEOUT_SECONDS",
        "HORIZON_PROXY",
        "HORIZON_CA_BUNDLE",
        "HORIZON_SKIP_TLS_VERIFY",
        "HORIZON_USER_AGENT",
        "HORIZON_API_ID",
        "HORIZON_API_KEY",
        "HORIZON_CLIENT_CERT",
        "HORIZON_CLIENT_KEY",
    ];

    fn clear_env() {
        for key in HORIZON_VARS {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        std::env::set_var("TEST_HORIZON_BOOL_YES", "YES");
        std::env::set_var("TEST_HORIZON_BOOL_OFF", "off");
        std::env::remove_var("TEST_HORIZON_BOOL_MISSING");

        assert!(env_bool("TEST_HORIZON_BOOL_YES", false));
        assert!(!env_bool("TEST_HORIZON_BOOL_OFF", true));
        assert!(env_bool("TEST_HORIZON_BOOL_MISSING", true));
        assert!(!env_bool("TEST_HORIZON_BOOL_MISSING", false));

        std::env::remove_var("TEST_HORIZON_BOOL_YES");
        std::env::remove_var("TEST_HORIZON_BOOL_OFF");
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("HORIZON_BASE_URL", "https://pki.example");
        std::env::set_var("HORIZON_TIMEOUT_SECONDS", "12");
        std::env::set_var("HORIZON_PROXY", "http://proxy.example:3128");
        std::env::set_var("HORIZON_CA_BUNDLE", "/etc/horizon/ca.pem");
        std::env::set_var("HORIZON_SKIP_TLS_VERIFY", "true");
        std::env::set_var("HORIZON_USER_AGENT", "horizon-tests");
        std::env::set_var("HORIZON_API_ID", "admin");
        std::env::set_var("HORIZON_API_KEY", "s3cret");

        let result = load_from_env();
        clear_env();

        let config = result.expect("config from env");
        assert_eq!(config.base_url, "https://pki.example");
        assert_eq!(config.timeout_seconds, Some(12));
        assert_eq!(config.proxy.as_deref(), Some("http://proxy.example:3128"));
        assert_eq!(config.ca_bundle_path, Some(PathBuf::from("/etc/horizon/ca.pem")));
        assert!(config.skip_tls_verify);
        assert_eq!(config.user_agent.as_deref(), Some("horizon-tests"));
        assert_eq!(
            config.auth,
            Some(AuthConfig::SharedSecret { api_id: "admin".into(), api_key: "s3cret".into() })
        );
    }

    #[test]
    fn test_load_from_env_client_certificate() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("HORIZON_BASE_URL", "https://pki.example");
        std::env::set_var("HORIZON_CLIENT_CERT", "/etc/horizon/client.pem");
        std::env::set_var("HORIZON_CLIENT_KEY", "/etc/horizon/client.key");

        let result = load_from_env();
        clear_env();

        assert_eq!(
            result.expect("config from env").auth,
            Some(AuthConfig::ClientCertificate {
                certificate_path: PathBuf::from("/etc/horizon/client.pem"),
                private_key_path: PathBuf::from("/etc/horizon/client.key"),
            })
        );
    }

    #[test]
    fn test_load_from_env_missing_base_url() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, HorizonError::Config(_)), "Should be a Config error");
    }

    #[test]
    fn test_load_from_env_invalid_timeout() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("HORIZON_BASE_URL", "https://pki.example");
        std::env::set_var("HORIZON_TIMEOUT_SECONDS", "soon");

        let result = load_from_env();
        clear_env();

        assert!(matches!(result, Err(HorizonError::Config(_))));
    }

    #[test]
    fn test_load_from_env_incomplete_credential() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("HORIZON_BASE_URL", "https://pki.example");
        std::env::set_var("HORIZON_API_ID", "admin");

        let result = load_from_env();
        clear_env();

        let err = result.unwrap_err();
        assert!(err.to_string().contains("HORIZON_API_KEY"), "{err}");
    }

    #[test]
    fn test_load_from_env_conflicting_credentials() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("HORIZON_BASE_URL", "https://pki.example");
        std::env::set_var("HORIZON_API_ID", "admin");
        std::env::set_var("HORIZON_API_KEY", "s3cret");
        std::env::set_var("HORIZON_CLIENT_CERT", "client.pem");
        std::env::set_var("HORIZON_CLIENT_KEY", "client.key");

        let result = load_from_env();
        clear_env();

        assert!(matches!(result, Err(HorizonError::Config(_))));
    }

    #[test]
    fn test_parse_config_json() {
        let json_content = r#"{
            "base_url": "https://pki.example",
            "auth": { "mode": "shared_secret", "api_id": "admin", "api_key": "s3cret" }
        }"#;

        let config = parse_config(json_content, &PathBuf::from("horizon.json")).unwrap();
        assert_eq!(config.base_url, "https://pki.example");
        assert!(matches!(config.auth, Some(AuthConfig::SharedSecret { .. })));
    }

    #[test]
    fn test_parse_config_toml() {
        let toml_content = r#"
base_url = "https://pki.example"
timeout_seconds = 5

[auth]
mode = "client_certificate"
certificate_path = "client.pem"
private_key_path = "client.key"
"#;

        let config = parse_config(toml_content, &PathBuf::from("horizon.toml")).unwrap();
        assert_eq!(config.timeout_seconds, Some(5));
        assert!(matches!(config.auth, Some(AuthConfig::ClientCertificate { .. })));
    }

    #[test]
    fn test_parse_config_missing_base_url() {
        let result = parse_config(r#"{ "timeout_seconds": 5 }"#, &PathBuf::from("horizon.json"));
        assert!(matches!(result, Err(HorizonError::Config(_))));
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("base_url: x", &PathBuf::from("horizon.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }

    #[test]
    fn test_candidates_cover_parents_nearest_first() {
        let candidates = candidates_in(Path::new("/srv/app/bin"));
        assert_eq!(candidates.len(), CONFIG_FILE_NAMES.len() * (SEARCH_DEPTH + 1));
        assert_eq!(candidates[0], PathBuf::from("/srv/app/bin/horizon.json"));
        assert_eq!(candidates[4], PathBuf::from("/srv/app/horizon.json"));
        assert_eq!(candidates.last().unwrap(), &PathBuf::from("/srv/config.toml"));
    }
}
