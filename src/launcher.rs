//! Server launch commands
//!
//! Resolves configuration properties for the parsed command, validates them
//! and carries out `start`, `start-dev`, `config` and `show-config`.

use crate::cli::spec::{CONFIG, SHOW_CONFIG, START, START_DEV};
use crate::cli::{Invocation, Sink};
use crate::config::{
    build_time_mappers, default_config_file, load_config_file, mapper_for_flag, FeatureType,
    Properties, NAMESPACE_PREFIX,
};
use crate::error::{BoxError, ConfigResult, ConfigurationError, InvalidProperty, LaunchError, Result};
use crate::logging;
use colored::Colorize;
use regex::Regex;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};

/// Profile used by `start` when none is given
pub const DEFAULT_PROFILE: &str = "prod";

/// Profile forced by `start-dev`
pub const DEV_PROFILE: &str = "dev";

/// Supported database vendors
pub const DB_VENDORS: &[&str] = &[
    "h2-mem", "h2-file", "mariadb", "mssql", "mysql", "oracle", "postgres",
];

/// Supported proxy modes
pub const PROXY_MODES: &[&str] = &["none", "edge", "reencrypt", "passthrough"];

const HOSTNAME_PATTERN: &str = r"^[A-Za-z0-9]([A-Za-z0-9.-]*[A-Za-z0-9])?$";

const MASK: &str = "*******";

/// Process-wide lifecycle state
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    started: bool,
}

impl Platform {
    /// Whether structured logging is available
    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn mark_started(&mut self) {
        self.started = true;
    }
}

/// Executes a parsed command, writing user facing lines to `sink`
pub trait Launcher {
    fn launch(&mut self, invocation: &Invocation, sink: &mut dyn Sink) -> Result<()>;

    fn platform(&self) -> &Platform;
}

/// Launcher backed by the property registry and the configuration file
#[derive(Debug, Default)]
pub struct ServerLauncher {
    platform: Platform,
    default_config: Option<PathBuf>,
}

impl ServerLauncher {
    /// Launcher reading the platform default configuration file if present
    pub fn new() -> Self {
        ServerLauncher {
            platform: Platform::default(),
            default_config: default_config_file(),
        }
    }

    /// Launcher using `path` when no `--config-file` is given
    pub fn with_default_config(path: Option<PathBuf>) -> Self {
        ServerLauncher {
            platform: Platform::default(),
            default_config: path,
        }
    }

    /// Merge the configuration file with the command line options
    pub fn resolve(&self, invocation: &Invocation) -> ConfigResult<Properties> {
        let mut properties = match invocation.config_file() {
            Some(path) => load_config_file(path)?,
            None => match &self.default_config {
                Some(path) if path.is_file() => load_config_file(path)?,
                _ => Properties::new(),
            },
        };

        for (flag, value) in &invocation.options {
            if let Some(key) = property_for_flag(flag) {
                properties.insert(key, value.clone());
            }
        }

        if invocation.command() == Some(START_DEV) {
            properties
                .entry(format!("{}db", NAMESPACE_PREFIX))
                .or_insert_with(|| "h2-file".to_string());
            properties
                .entry(format!("{}http.enabled", NAMESPACE_PREFIX))
                .or_insert_with(|| "true".to_string());
        }

        Ok(properties)
    }

    fn start(&mut self, invocation: &Invocation, sink: &mut dyn Sink) -> Result<()> {
        let properties = self.resolve(invocation)?;
        validate(&properties)?;

        let level = properties
            .get("kc.log.level")
            .and_then(|l| logging::level_from_property(l))
            .unwrap_or(if invocation.verbose {
                LevelFilter::DEBUG
            } else {
                LevelFilter::INFO
            });
        logging::init(level);
        self.platform.mark_started();

        let profile = invocation.profile_or_default();
        info!(profile = %profile, "Starting server");
        for (key, value) in &properties {
            debug!("{} = {}", key, display_value(key, value));
        }
        sink.info(&format!("Server started using profile ({}).", profile));
        Ok(())
    }

    fn config(&mut self, invocation: &Invocation, sink: &mut dyn Sink) -> Result<()> {
        let properties = self.resolve(invocation)?;
        validate(&properties)?;

        sink.info(&"Updating the configuration.".bold().to_string());
        for mapper in build_time_mappers() {
            if let Some(value) = properties.get(mapper.from) {
                sink.info(&format!("  {} = {}", mapper.from, display_value(mapper.from, value)));
            }
        }
        for (key, value) in properties.iter().filter(|(k, _)| k.starts_with("kc.features")) {
            sink.info(&format!("  {} = {}", key, value));
        }
        sink.info("Server configuration updated.");
        Ok(())
    }

    fn show_config(&mut self, invocation: &Invocation, sink: &mut dyn Sink) -> Result<()> {
        let properties = self.resolve(invocation)?;

        sink.info(&format!(
            "{} ({})",
            "Current Configuration:".bold(),
            invocation.profile_or_default()
        ));
        for (key, value) in &properties {
            sink.info(&format!("  {} = {}", key, display_value(key, value)));
        }
        if !invocation.config_args.is_empty() {
            sink.info(&format!("  kc.config.args = {}", invocation.config_args));
        }
        Ok(())
    }
}

impl Launcher for ServerLauncher {
    fn launch(&mut self, invocation: &Invocation, sink: &mut dyn Sink) -> Result<()> {
        match invocation.command() {
            Some(START) | Some(START_DEV) => self.start(invocation, sink),
            Some(CONFIG) => self.config(invocation, sink),
            Some(SHOW_CONFIG) => self.show_config(invocation, sink),
            Some(other) => Err(LaunchError::UnsupportedCommand(other.to_string())),
            None => Ok(()),
        }
    }

    fn platform(&self) -> &Platform {
        &self.platform
    }
}

/// Property key set by a command line flag
fn property_for_flag(flag: &str) -> Option<String> {
    if let Some(mapper) = mapper_for_flag(flag) {
        return Some(mapper.from.to_string());
    }
    let name = flag.strip_prefix("--features")?;
    if name.is_empty() {
        return Some(format!("{}features", NAMESPACE_PREFIX));
    }
    let feature = name.strip_prefix('-')?;
    Some(format!("{}features.{}", NAMESPACE_PREFIX, feature))
}

fn display_value<'a>(key: &str, value: &'a str) -> &'a str {
    if key.contains("password") {
        MASK
    } else {
        value
    }
}

/// Check every known property, collecting all problems into one error
pub fn validate(properties: &Properties) -> ConfigResult<()> {
    let hostname = Regex::new(HOSTNAME_PATTERN).unwrap();
    let mut problems: Vec<BoxError> = Vec::new();

    for (key, value) in properties {
        let problem = match key.as_str() {
            "kc.http.port" | "kc.https.port" => value.parse::<u16>().err().map(|e| {
                InvalidProperty::new(key, format!("'{}' is not a valid port", value)).with_source(e)
            }),
            "kc.db.pool.initial-size" | "kc.db.pool.min-size" | "kc.db.pool.max-size" => {
                value.parse::<u32>().err().map(|e| {
                    InvalidProperty::new(key, format!("'{}' is not a valid size", value))
                        .with_source(e)
                })
            }
            "kc.http.enabled" | "kc.metrics.enabled" => value.parse::<bool>().err().map(|e| {
                InvalidProperty::new(key, format!("'{}' is not a boolean", value)).with_source(e)
            }),
            "kc.db" => one_of(key, value, DB_VENDORS),
            "kc.proxy" => one_of(key, value, PROXY_MODES),
            "kc.hostname" if !hostname.is_match(value) => Some(InvalidProperty::new(
                key,
                format!("'{}' is not a valid hostname", value),
            )),
            "kc.features" => value
                .split(',')
                .map(str::trim)
                .find(|t| FeatureType::from_cli_name(t).is_none())
                .map(|t| InvalidProperty::new(key, format!("unknown feature group '{}'", t))),
            _ => None,
        };

        if let Some(problem) = problem {
            problems.push(Box::new(problem));
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(ConfigurationError::aggregate(problems))
    }
}

fn one_of(key: &str, value: &str, allowed: &[&str]) -> Option<InvalidProperty> {
    if allowed.contains(&value) {
        None
    } else {
        Some(InvalidProperty::new(
            key,
            format!("'{}' is not one of: {}", value, allowed.join(", ")),
        ))
    }
}
