//! config-rs/lib.rs
//! Configuration for the auto-ops service.
//! Everything is read once at the composition root into an [`AppConfig`]
//! and handed to the adapters; nothing below reads the environment itself.

use std::collections::HashMap;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const SERVICE_NAME: &str = "AUTO_OPS";
pub const DEFAULT_PORT: u16 = 3000;

/// Key/value lookup the configuration is built from.
pub trait ConfigSource {
    fn get(&self, key: &str) -> Option<String>;

    /// Like [`ConfigSource::get`] but treats blank values as absent.
    fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// Process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSource;

impl ConfigSource for EnvSource {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

/// Fixed set of values, mostly for tests.
#[derive(Debug, Default, Clone)]
pub struct MapSource(HashMap<String, String>);

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.0.insert(key.to_string(), value.to_string());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapSource {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl ConfigSource for MapSource {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }
}

/// Loads an optional `.env` file into the process environment and returns
/// where it came from. Nothing is logged here: this runs before any logger
/// is installed.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenv::dotenv().ok()
}

fn parse_or<T: std::str::FromStr>(source: &dyn ConfigSource, key: &str, default: T) -> T
where
    T: std::fmt::Display,
{
    match source.get_non_empty(key) {
        Some(raw) => raw.parse::<T>().unwrap_or_else(|_| {
            log::warn!("Invalid value '{}' in {}, using default {}", raw, key, default);
            default
        }),
        None => default,
    }
}

fn string_or(source: &dyn ConfigSource, key: &str, default: &str) -> String {
    source
        .get_non_empty(key)
        .unwrap_or_else(|| default.to_string())
}

/// Get service port from `<SERVICE>_SERVICE_PORT` with fallback.
pub fn service_port_from(source: &dyn ConfigSource, service_name: &str, default_port: u16) -> u16 {
    let var_name = format!("{}_SERVICE_PORT", service_name.to_uppercase());
    parse_or(source, &var_name, default_port)
}

/// Bind address from `<SERVICE>_SERVICE_ADDR` (plain or `http://host:port`),
/// else `0.0.0.0:<port>`.
pub fn bind_address_from(
    source: &dyn ConfigSource,
    service_name: &str,
    default_port: u16,
) -> SocketAddr {
    let var_name = format!("{}_SERVICE_ADDR", service_name.to_uppercase());

    if let Some(addr_str) = source.get_non_empty(&var_name) {
        let candidate = addr_str
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&addr_str);
        match candidate.trim_end_matches('/').parse::<SocketAddr>() {
            Ok(addr) => return addr,
            Err(_) => log::warn!("Invalid address format in {}, using default", var_name),
        }
    }

    let port = service_port_from(source, service_name, default_port);
    SocketAddr::from(([0, 0, 0, 0], port))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    File,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub dir: PathBuf,
}

/// Repository the patches are tested against and proposed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryConfig {
    pub url: String,
    pub branch: String,
}

impl RepositoryConfig {
    /// `(owner, name)` parsed from the clone URL.
    pub fn slug(&self) -> Option<(String, String)> {
        let path = self
            .url
            .trim_end_matches('/')
            .trim_end_matches(".git")
            .rsplitn(3, '/')
            .take(2)
            .collect::<Vec<_>>();
        match path.as_slice() {
            [name, owner] if !name.is_empty() && !owner.is_empty() && !owner.contains(':') => {
                Some((owner.to_string(), name.to_string()))
            }
            _ => None,
        }
    }

    pub fn name(&self) -> Option<String> {
        self.slug().map(|(_, name)| name)
    }
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub timeout: Duration,
    pub plan_max_tokens: u32,
    pub patch_max_tokens: u32,
}

#[derive(Debug, Clone)]
pub struct LogSinkConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct SandboxConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub repository: RepositoryConfig,
}

#[derive(Debug, Clone)]
pub struct CodeHostConfig {
    pub token: Option<String>,
    pub api_url: String,
    pub repository: RepositoryConfig,
}

#[derive(Debug, Clone)]
pub struct SpeechConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub voice_id: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `RUST_LOG`-style directive.
    pub filter: String,
    pub json: bool,
}

impl LoggingConfig {
    /// Read on its own so the subscriber can be installed before the rest
    /// of the configuration emits warnings.
    pub fn from_source(source: &dyn ConfigSource) -> Self {
        Self {
            filter: string_or(source, "RUST_LOG", "info"),
            json: source
                .get_non_empty("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreConfig,
    pub llm: LlmConfig,
    pub log_sink: LogSinkConfig,
    pub sandbox: SandboxConfig,
    pub code_host: CodeHostConfig,
    pub speech: SpeechConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_source(&EnvSource)
    }

    pub fn from_source(source: &dyn ConfigSource) -> Self {
        let repository = RepositoryConfig {
            url: string_or(
                source,
                "GITHUB_REPO_URL",
                "https://github.com/Soulemane12/auto-ops-demo-python",
            ),
            branch: string_or(source, "GITHUB_REPO_BRANCH", "master"),
        };

        let backend = match source
            .get_non_empty("INCIDENT_STORE_BACKEND")
            .map(|v| v.to_lowercase())
            .as_deref()
        {
            None | Some("file") => StoreBackend::File,
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                log::warn!("Unknown INCIDENT_STORE_BACKEND '{}', using file", other);
                StoreBackend::File
            }
        };

        Self {
            bind_addr: bind_address_from(source, SERVICE_NAME, DEFAULT_PORT),
            store: StoreConfig {
                backend,
                dir: PathBuf::from(string_or(
                    source,
                    "INCIDENT_STORE_DIR",
                    "./data/auto-ops-incidents",
                )),
            },
            llm: LlmConfig {
                api_key: source.get_non_empty("CLAUDE_API_KEY"),
                api_url: string_or(source, "CLAUDE_API_URL", "https://api.anthropic.com"),
                model: string_or(source, "CLAUDE_MODEL", "claude-3-sonnet-20240229"),
                timeout: Duration::from_secs(parse_or(source, "CLAUDE_TIMEOUT_SECS", 15)),
                plan_max_tokens: parse_or(source, "CLAUDE_PLAN_MAX_TOKENS", 200),
                patch_max_tokens: parse_or(source, "CLAUDE_PATCH_MAX_TOKENS", 800),
            },
            log_sink: LogSinkConfig {
                api_key: source.get_non_empty("GALILEO_API_KEY"),
                api_url: string_or(source, "GALILEO_API_URL", "https://api.galileo.ai/v1/logs"),
                timeout: Duration::from_secs(parse_or(source, "GALILEO_TIMEOUT_SECS", 5)),
            },
            sandbox: SandboxConfig {
                api_key: source.get_non_empty("DAYTONA_API_KEY"),
                api_url: string_or(source, "DAYTONA_API_URL", "https://app.daytona.io/api"),
                repository: repository.clone(),
            },
            code_host: CodeHostConfig {
                token: source.get_non_empty("GITHUB_TOKEN"),
                api_url: string_or(source, "GITHUB_API_URL", "https://api.github.com"),
                repository,
            },
            speech: SpeechConfig {
                api_key: source.get_non_empty("ELEVEN_LABS_API_KEY"),
                api_url: string_or(source, "ELEVEN_LABS_API_URL", "https://api.elevenlabs.io/v1"),
                voice_id: string_or(source, "ELEVEN_LABS_VOICE_ID", "21m00Tcm4TlvDq8ikWAM"),
                timeout: Duration::from_secs(parse_or(source, "ELEVEN_LABS_TIMEOUT_SECS", 30)),
            },
            logging: LoggingConfig::from_source(source),
        }
    }
}
