use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;

/// Proxy server settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_static_directory")]
    pub static_directory: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_json: bool,
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_base_url() -> String {
    "http://some-api.com".to_string()
}
fn default_static_directory() -> String {
    "./www".to_string()
}
fn default_request_timeout_ms() -> u64 {
    10_000
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: default_bind(),
            port: default_port(),
            base_url: default_base_url(),
            static_directory: default_static_directory(),
            request_timeout_ms: default_request_timeout_ms(),
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

impl ServerConfig {
    /// Apply `PORT` / `BASE_URL` style overrides. Values are taken as given;
    /// an unparsable port is an error.
    pub fn apply_overrides(
        &mut self,
        port: Option<String>,
        base_url: Option<String>,
    ) -> Result<(), String> {
        if let Some(port) = port {
            self.port = port
                .trim()
                .parse()
                .map_err(|e| format!("PORT must be a port number, got '{}': {}", port, e))?;
        }
        if let Some(base_url) = base_url {
            self.base_url = base_url;
        }
        Ok(())
    }

    /// Apply overrides from the process environment, falling back to `./.env`.
    pub fn apply_env(&mut self) -> Result<(), String> {
        self.apply_env_with(Path::new(".env"))
    }

    /// Variables set in the process environment win over those in `dotenv_path`.
    pub fn apply_env_with(&mut self, dotenv_path: &Path) -> Result<(), String> {
        let file = read_dotenv(dotenv_path)?;
        let lookup = |name: &str| std::env::var(name).ok().or_else(|| file.get(name).cloned());
        self.apply_overrides(lookup("PORT"), lookup("BASE_URL"))
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.bind, self.port)
            .parse()
            .map_err(|e| format!("Invalid bind address {}:{}: {}", self.bind, self.port, e))
    }

    /// Upstream base URL without a trailing slash.
    pub fn upstream_base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn validate(&self) -> Result<(), String> {
        let mut errors = Vec::new();

        if !(1024..=65535).contains(&self.port) {
            errors.push(format!(
                "port must be 1024-65535, got {}. Example: port = 8080",
                self.port
            ));
        }

        if let Err(e) = self.socket_addr() {
            errors.push(format!("{}. Example: bind = \"127.0.0.1\"", e));
        }

        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            errors.push(format!(
                "base_url must start with http:// or https://, got '{}'. Example: base_url = \"https://api.example.com\"",
                self.base_url
            ));
        }

        if self.request_timeout_ms == 0 {
            errors.push(format!(
                "request_timeout_ms must be > 0, got {}. Example: request_timeout_ms = 10000",
                self.request_timeout_ms
            ));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            errors.push(format!(
                "log_level must be one of {:?}, got '{}'. Example: log_level = \"info\"",
                valid_levels, self.log_level
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.join("\n"))
        }
    }
}

/// Read a dotenv file without touching the process environment. A missing file is empty.
pub fn read_dotenv(path: &Path) -> Result<HashMap<String, String>, String> {
    match dotenvy::from_path_iter(path) {
        Ok(iter) => iter
            .collect::<Result<HashMap<_, _>, _>>()
            .map_err(|e| format!("{}: {}", path.display(), e)),
        Err(e) if e.not_found() => Ok(HashMap::new()),
        Err(e) => Err(format!("{}: {}", path.display(), e)),
    }
}
