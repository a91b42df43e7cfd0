//! Startup configuration read from the environment.

use std::fmt;
use std::path::PathBuf;
use url::Url;

use crate::builder::BodySigning;
use crate::error::{Error, Result};

pub const ENV_API_KEY: &str = "TWITTER_API_KEY";
pub const ENV_API_SECRET: &str = "TWITTER_API_SECRET";
pub const ENV_ACCESS_TOKEN: &str = "TWITTER_ACCESS_TOKEN";
pub const ENV_ACCESS_SECRET: &str = "TWITTER_ACCESS_SECRET";
pub const ENV_ACCOUNT_ID: &str = "TWITTER_ADS_ACCOUNT_ID";
pub const ENV_API_BASE: &str = "TWITTER_ADS_API_BASE";
pub const ENV_SIGN_JSON_BODY: &str = "TWITTER_ADS_SIGN_JSON_BODY";
/// Path of a dotenv file to load instead of the nearest `.env`.
pub const ENV_FILE: &str = "TWADS_ENV_FILE";

pub const DEFAULT_API_BASE: &str = "https://ads-api.twitter.com/12";

/// Consumer (application) and token (account) key pairs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub token: String,
    pub token_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("token", &self.token)
            .field("token_secret", &"<redacted>")
            .finish()
    }
}

/// Where requests go and how they are signed.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: Url,
    pub body_signing: BodySigning,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: default_base_url(),
            body_signing: BodySigning::Excluded,
        }
    }
}

/// Everything the client needs, built once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub credentials: Credentials,
    pub account_id: String,
    pub api: ApiConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from `lookup`, which maps a variable name to
    /// its value. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(Error::MissingCredential(name))
        };

        let credentials = Credentials {
            consumer_key: required(ENV_API_KEY)?,
            consumer_secret: required(ENV_API_SECRET)?,
            token: required(ENV_ACCESS_TOKEN)?,
            token_secret: required(ENV_ACCESS_SECRET)?,
        };
        let account_id = required(ENV_ACCOUNT_ID)?;

        let base_url = match lookup(ENV_API_BASE).filter(|v| !v.trim().is_empty()) {
            Some(raw) => Url::parse(raw.trim()).map_err(|err| Error::InvalidConfig {
                name: ENV_API_BASE,
                reason: err.to_string(),
            })?,
            None => default_base_url(),
        };
        let body_signing = match lookup(ENV_SIGN_JSON_BODY) {
            Some(raw) => parse_flag(&raw)
                .map(BodySigning::from)
                .ok_or_else(|| Error::InvalidConfig {
                    name: ENV_SIGN_JSON_BODY,
                    reason: format!("expected true or false, got '{}'", raw),
                })?,
            None => BodySigning::Excluded,
        };

        Ok(Config {
            credentials,
            account_id,
            api: ApiConfig {
                base_url,
                body_signing,
            },
        })
    }
}

/// Loads a dotenv file into the process environment. Variables that are
/// already set are left alone. Returns the file that was read.
pub fn load_env_file() -> std::result::Result<PathBuf, dotenvy::Error> {
    load_env_file_from(std::env::var_os(ENV_FILE).map(PathBuf::from))
}

fn load_env_file_from(path: Option<PathBuf>) -> std::result::Result<PathBuf, dotenvy::Error> {
    match path {
        Some(path) => dotenvy::from_path(&path).map(|()| path),
        None => dotenvy::dotenv(),
    }
}

fn default_base_url() -> Url {
    match Url::parse(DEFAULT_API_BASE) {
        Ok(url) => url,
        Err(_) => unreachable!("default API base is a valid URL"),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn full_env() -> HashMap<&'static str, String> {
        [
            (ENV_API_KEY, "ck"),
            (ENV_API_SECRET, "cs"),
            (ENV_ACCESS_TOKEN, "tk"),
            (ENV_ACCESS_SECRET, "ts"),
            (ENV_ACCOUNT_ID, "18ce54d4x5t"),
        ]
        .into_iter()
        .map(|(k, v)| (k, v.to_string()))
        .collect()
    }

    fn load(env: &HashMap<&'static str, String>) -> Result<Config> {
        Config::from_lookup(|name| env.get(name).cloned())
    }

    #[test]
    fn loads_required_values_and_defaults() {
        let config = load(&full_env()).unwrap();
        assert_eq!(config.credentials.consumer_key, "ck");
        assert_eq!(config.credentials.token_secret, "ts");
        assert_eq!(config.account_id, "18ce54d4x5t");
        assert_eq!(config.api.base_url.as_str(), DEFAULT_API_BASE);
        assert_eq!(config.api.body_signing, BodySigning::Excluded);
    }

    #[test]
    fn each_missing_credential_is_reported_by_name() {
        for name in [
            ENV_API_KEY,
            ENV_API_SECRET,
            ENV_ACCESS_TOKEN,
            ENV_ACCESS_SECRET,
            ENV_ACCOUNT_ID,
        ] {
            let mut env = full_env();
            env.remove(name);
            match load(&env) {
                Err(Error::MissingCredential(missing)) => assert_eq!(missing, name),
                other => panic!("expected missing {name}, got {other:?}"),
            }
        }
    }

    #[test]
    fn blank_credential_counts_as_missing() {
        let mut env = full_env();
        env.insert(ENV_ACCESS_SECRET, "   ".to_string());
        assert!(matches!(
            load(&env),
            Err(Error::MissingCredential(ENV_ACCESS_SECRET))
        ));
    }

    #[test]
    fn optional_overrides_are_applied() {
        let mut env = full_env();
        env.insert(ENV_API_BASE, "http://127.0.0.1:9000/12".to_string());
        env.insert(ENV_SIGN_JSON_BODY, "TRUE".to_string());
        let config = load(&env).unwrap();
        assert_eq!(config.api.base_url.as_str(), "http://127.0.0.1:9000/12");
        assert_eq!(config.api.body_signing, BodySigning::Included);
    }

    #[test]
    fn malformed_overrides_are_rejected() {
        let mut env = full_env();
        env.insert(ENV_SIGN_JSON_BODY, "maybe".to_string());
        assert!(matches!(load(&env), Err(Error::InvalidConfig { .. })));

        let mut env = full_env();
        env.insert(ENV_API_BASE, "not a url".to_string());
        assert!(matches!(load(&env), Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn missing_env_file_is_reported_as_not_found() {
        let path = std::env::temp_dir().join(format!("twads-absent-{}.env", std::process::id()));
        let err = load_env_file_from(Some(path)).unwrap_err();
        assert!(err.not_found());
    }

    #[test]
    fn env_file_fills_unset_variables_only() {
        let path = std::env::temp_dir().join(format!("twads-{}.env", std::process::id()));
        std::fs::write(
            &path,
            "TWADS_DOTENV_FRESH=from-file\nTWADS_DOTENV_PRESET=from-file\n",
        )
        .unwrap();
        std::env::set_var("TWADS_DOTENV_PRESET", "from-process");

        let loaded = load_env_file_from(Some(path.clone())).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded, path);
        assert_eq!(std::env::var("TWADS_DOTENV_FRESH").unwrap(), "from-file");
        assert_eq!(std::env::var("TWADS_DOTENV_PRESET").unwrap(), "from-process");
    }

    #[test]
    fn debug_output_hides_secrets() {
        let config = load(&full_env()).unwrap();
        let rendered = format!("{:?}", config.credentials);
        assert!(rendered.contains("ck"));
        assert!(!rendered.contains("\"cs\""));
        assert!(!rendered.contains("\"ts\""));
    }
}
