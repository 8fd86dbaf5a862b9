//! Error types for serverctl

use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Boxed error used as an opaque cause
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Result type alias for launcher operations
pub type Result<T> = std::result::Result<T, LaunchError>;

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigurationError>;

/// A configuration problem detected while preparing the server.
///
/// Independent problems found in the same pass are attached as suppressed
/// errors. An aggregate carries no message of its own and displays as an
/// empty string.
#[derive(Debug, Default)]
pub struct ConfigurationError {
    message: Option<String>,
    source: Option<BoxError>,
    suppressed: Vec<BoxError>,
}

impl ConfigurationError {
    /// Create a configuration error with a message
    pub fn new(message: impl Into<String>) -> Self {
        ConfigurationError {
            message: Some(message.into()),
            ..Default::default()
        }
    }

    /// Create a message-less error wrapping independent problems
    pub fn aggregate<I>(problems: I) -> Self
    where
        I: IntoIterator<Item = BoxError>,
    {
        ConfigurationError {
            suppressed: problems.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Attach an underlying cause
    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Problems attached alongside this one, in detection order
    pub fn suppressed(&self) -> &[BoxError] {
        &self.suppressed
    }
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message.as_deref().unwrap_or_default())
    }
}

impl StdError for ConfigurationError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

/// A single invalid property value
#[derive(Error, Debug)]
#[error("Invalid value for property '{key}': {reason}")]
pub struct InvalidProperty {
    pub key: String,
    pub reason: String,
    #[source]
    pub source: Option<BoxError>,
}

impl InvalidProperty {
    pub fn new(key: impl Into<String>, reason: impl Into<String>) -> Self {
        InvalidProperty {
            key: key.into(),
            reason: reason.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Errors raised while executing a command
#[derive(Error, Debug)]
pub enum LaunchError {
    /// The server could not be configured
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The command is known to the parser but has no handler
    #[error("Unsupported command: {0}")]
    UnsupportedCommand(String),
}

/// Errors loading the configuration file
#[derive(Error, Debug)]
pub enum ConfigFileError {
    #[error("Failed to read configuration file '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse configuration file '{path}'")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Property '{0}' must be a scalar value")]
    NotScalar(String),
}

impl From<ConfigFileError> for ConfigurationError {
    fn from(err: ConfigFileError) -> Self {
        ConfigurationError::new("Invalid configuration file").with_source(err)
    }
}

/// Walk an error and its causes, outermost first
pub fn chain<'a>(
    err: &'a (dyn StdError + 'static),
) -> impl Iterator<Item = &'a (dyn StdError + 'static)> {
    std::iter::successors(Some(err), |&e| e.source())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_has_no_message() {
        let err = ConfigurationError::aggregate(vec![
            Box::new(InvalidProperty::new("http.port", "not a number")) as BoxError,
        ]);
        assert_eq!(err.to_string(), "");
        assert_eq!(err.message(), None);
        assert_eq!(err.suppressed().len(), 1);
    }

    #[test]
    fn test_chain_follows_sources() {
        let io = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err = ConfigurationError::from(ConfigFileError::Read {
            path: PathBuf::from("conf.yml"),
            source: io,
        });

        let messages: Vec<String> = chain(&err).map(|e| e.to_string()).collect();
        assert_eq!(
            messages,
            vec![
                "Invalid configuration file".to_string(),
                "Failed to read configuration file 'conf.yml'".to_string(),
                "missing".to_string(),
            ]
        );
    }

    #[test]
    fn test_configuration_error_is_transparent_in_launch_error() {
        let err = LaunchError::from(ConfigurationError::new("bad port"));
        assert_eq!(err.to_string(), "bad port");
    }
}
