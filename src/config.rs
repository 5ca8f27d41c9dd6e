//! Service configuration: config file, environment and CLI overrides.
//!
//! Non-secret settings live in a `key = value` file; credentials only come
//! from the environment (`ADMIN_USER`, `ADMIN_PASS`, `EMAIL_ADDRESS`,
//! `EMAIL_PASSWORD`). Precedence for each setting is CLI flag, then
//! environment, then file, then built-in default.

use std::env;
use std::fs;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::db::DatabaseOptions;
use crate::http::{AdminCredentials, DEFAULT_SENDER_NAME};
use crate::mailer::{DEFAULT_SMTP_HOST, DEFAULT_SMTP_PORT, DEFAULT_SMTP_TIMEOUT_SECS, SmtpSettings};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATABASE_FILE: &str = "leadgate.db";

pub const ENV_ADMIN_USER: &str = "ADMIN_USER";
pub const ENV_ADMIN_PASS: &str = "ADMIN_PASS";
pub const ENV_EMAIL_ADDRESS: &str = "EMAIL_ADDRESS";
pub const ENV_EMAIL_PASSWORD: &str = "EMAIL_PASSWORD";
pub const ENV_DATABASE_PATH: &str = "DATABASE_PATH";
pub const ENV_BIND_ADDR: &str = "BIND_ADDR";

/// File-backed configuration; every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    /// Address the HTTP server listens on.
    pub bind_addr: Option<SocketAddr>,
    /// SQLite database file.
    pub database_path: Option<PathBuf>,
    /// Database pool max connections (1..=20).
    pub db_max_connections: Option<u32>,
    /// Database busy timeout in milliseconds.
    pub db_busy_timeout_ms: Option<u32>,
    /// SMTP relay host.
    pub smtp_host: Option<String>,
    /// SMTP relay port (implicit TLS).
    pub smtp_port: Option<u16>,
    /// SMTP command timeout in seconds.
    pub smtp_timeout_secs: Option<u64>,
    /// Display name for outgoing mail.
    pub sender_name: Option<String>,
    /// Default verbosity mode.
    pub verbosity: Option<VerbositySetting>,
}

impl FileConfig {
    /// Validates config values against runtime constraints.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first out-of-range key.
    pub fn validate(&self) -> Result<()> {
        if let Some(value) = self.db_max_connections
            && !(1..=20).contains(&value)
        {
            bail!("Invalid config value for `db_max_connections`: {value}. Expected range: 1..=20");
        }
        if let Some(value) = self.db_busy_timeout_ms
            && value > 120_000
        {
            bail!("Invalid config value for `db_busy_timeout_ms`: {value}. Expected range: 0..=120000");
        }
        if let Some(value) = self.smtp_port
            && value == 0
        {
            bail!("Invalid config value for `smtp_port`: 0. Expected range: 1..=65535");
        }
        if let Some(value) = self.smtp_timeout_secs
            && !(1..=600).contains(&value)
        {
            bail!("Invalid config value for `smtp_timeout_secs`: {value}. Expected range: 1..=600");
        }
        if let Some(host) = &self.smtp_host
            && host.trim().is_empty()
        {
            bail!("Invalid config value for `smtp_host`: must not be empty");
        }
        Ok(())
    }
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl VerbositySetting {
    /// Returns the stable string label for display output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Verbose => "verbose",
            Self::Quiet => "quiet",
            Self::Debug => "debug",
        }
    }
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/leadgate/config.toml`
/// 2. `$HOME/.config/leadgate/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("leadgate")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("leadgate")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Reads a non-empty process environment variable.
#[must_use]
pub fn process_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Loads the config file.
///
/// An explicit path must exist; the default path is optional.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails to parse.
pub fn load_file_config(explicit: Option<&Path>) -> Result<Option<FileConfig>> {
    if let Some(path) = explicit {
        return read_file_config(path).map(Some);
    }
    match resolve_default_config_path() {
        Some(path) if path.exists() => read_file_config(&path).map(Some),
        _ => Ok(None),
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

/// Parses `key = value` lines; strings are double-quoted, `#` starts a comment.
///
/// # Errors
///
/// Returns an error for bad syntax, unknown keys or out-of-range values.
pub fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }
        let line_no = line_index + 1;

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_no}: expected key = value");
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let invalid = || format!("Invalid `{key}` value on line {line_no}");

        match key {
            "bind_addr" => {
                let parsed = parse_string_literal(value).with_context(invalid)?;
                cfg.bind_addr = Some(parsed.parse::<SocketAddr>().with_context(invalid)?);
            }
            "database_path" => {
                let parsed = parse_string_literal(value).with_context(invalid)?;
                cfg.database_path = Some(PathBuf::from(parsed));
            }
            "db_max_connections" => {
                cfg.db_max_connections = Some(parse_integer(value).with_context(invalid)?);
            }
            "db_busy_timeout_ms" => {
                cfg.db_busy_timeout_ms = Some(parse_integer(value).with_context(invalid)?);
            }
            "smtp_host" => {
                cfg.smtp_host = Some(parse_string_literal(value).with_context(invalid)?);
            }
            "smtp_port" => {
                cfg.smtp_port = Some(parse_integer(value).with_context(invalid)?);
            }
            "smtp_timeout_secs" => {
                cfg.smtp_timeout_secs = Some(parse_integer(value).with_context(invalid)?);
            }
            "sender_name" => {
                cfg.sender_name = Some(parse_string_literal(value).with_context(invalid)?);
            }
            "verbosity" => {
                let parsed = parse_string_literal(value).with_context(invalid)?;
                cfg.verbosity = Some(parse_verbosity(&parsed).with_context(|| {
                    format!("Invalid `verbosity` value '{parsed}' on line {line_no}")
                })?);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_no}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_integer<T: TryFrom<u64>>(raw_value: &str) -> Result<T> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<u64>()?;
    T::try_from(value).map_err(|_| anyhow::anyhow!("Integer value {value} out of range"))
}

fn parse_verbosity(value: &str) -> Result<VerbositySetting> {
    match value {
        "default" => Ok(VerbositySetting::Default),
        "verbose" => Ok(VerbositySetting::Verbose),
        "quiet" => Ok(VerbositySetting::Quiet),
        "debug" => Ok(VerbositySetting::Debug),
        _ => bail!("Expected one of: default, verbose, quiet, debug"),
    }
}

/// Values given on the command line, which win over everything else.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub bind_addr: Option<SocketAddr>,
    pub database_path: Option<PathBuf>,
}

/// Fully resolved settings for the service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    pub database_path: PathBuf,
    pub db_options: DatabaseOptions,
    /// `None` when `EMAIL_ADDRESS`/`EMAIL_PASSWORD` are unset.
    pub smtp: Option<SmtpSettings>,
    /// `None` when `ADMIN_USER`/`ADMIN_PASS` are unset.
    pub admin: Option<AdminCredentials>,
    pub sender_name: String,
}

impl ServiceConfig {
    /// Merges CLI overrides, environment (looked up through `env`) and file config.
    ///
    /// # Errors
    ///
    /// Returns an error when an environment override cannot be parsed.
    pub fn resolve(
        file: Option<&FileConfig>,
        cli: &CliOverrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let default_file = FileConfig::default();
        let file = file.unwrap_or(&default_file);

        let env_bind = env(ENV_BIND_ADDR)
            .map(|raw| {
                raw.trim()
                    .parse::<SocketAddr>()
                    .with_context(|| format!("Invalid {ENV_BIND_ADDR} value '{raw}'"))
            })
            .transpose()?;
        let bind_addr = cli
            .bind_addr
            .or(env_bind)
            .or(file.bind_addr)
            .unwrap_or_else(|| SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)));

        let database_path = cli
            .database_path
            .clone()
            .or_else(|| env(ENV_DATABASE_PATH).map(PathBuf::from))
            .or_else(|| file.database_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_FILE));

        let mut db_options = DatabaseOptions::default();
        if let Some(n) = file.db_max_connections {
            db_options.max_connections = n;
        }
        if let Some(ms) = file.db_busy_timeout_ms {
            db_options.busy_timeout_ms = ms;
        }

        let sender_name = file
            .sender_name
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SENDER_NAME.to_string());

        let smtp = match (env(ENV_EMAIL_ADDRESS), env(ENV_EMAIL_PASSWORD)) {
            (Some(address), Some(password)) => Some(SmtpSettings {
                host: file
                    .smtp_host
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
                port: file.smtp_port.unwrap_or(DEFAULT_SMTP_PORT),
                address,
                password,
                sender_name: sender_name.clone(),
                timeout_secs: file.smtp_timeout_secs.unwrap_or(DEFAULT_SMTP_TIMEOUT_SECS),
            }),
            _ => None,
        };

        let admin = match (env(ENV_ADMIN_USER), env(ENV_ADMIN_PASS)) {
            (Some(user), Some(pass)) => Some(AdminCredentials::new(user, pass)),
            _ => None,
        };

        Ok(Self {
            bind_addr,
            database_path,
            db_options,
            smtp,
            admin,
            sender_name,
        })
    }
}

/// Picks the default tracing filter level.
///
/// Priority: quiet flag > verbose flag > config verbosity > `info`.
/// (`RUST_LOG`, when set, overrides all of these at subscriber setup.)
#[must_use]
pub fn resolve_default_log_level(
    verbose: u8,
    quiet: bool,
    file_verbosity: Option<VerbositySetting>,
) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => {}
        1 => return "debug",
        _ => return "trace",
    }
    match file_verbosity {
        Some(VerbositySetting::Quiet) => "error",
        Some(VerbositySetting::Verbose) => "debug",
        Some(VerbositySetting::Debug) => "trace",
        Some(VerbositySetting::Default) | None => "info",
    }
}
