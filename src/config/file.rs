//! Configuration file loading
//!
//! The configuration file is a flat YAML mapping of property keys to scalar
//! values. Keys may be written with or without the `kc.` namespace.

use crate::config::mapper::qualify;
use crate::error::ConfigFileError;
use directories::ProjectDirs;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "serverctl.yml";

/// Properties keyed by their qualified name
pub type Properties = BTreeMap<String, String>;

/// Location of the configuration file used when none is given
pub fn default_config_file() -> Option<PathBuf> {
    ProjectDirs::from("", "", "serverctl").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Read and parse a configuration file
pub fn load_config_file(path: &Path) -> Result<Properties, ConfigFileError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_properties(&contents).map_err(|err| match err {
        ParseFailure::Yaml(source) => ConfigFileError::Parse {
            path: path.to_path_buf(),
            source,
        },
        ParseFailure::NotScalar(key) => ConfigFileError::NotScalar(key),
    })
}

enum ParseFailure {
    Yaml(serde_yaml::Error),
    NotScalar(String),
}

fn parse_properties(yaml: &str) -> Result<Properties, ParseFailure> {
    let raw: Option<BTreeMap<String, Value>> =
        serde_yaml::from_str(yaml).map_err(ParseFailure::Yaml)?;

    let mut properties = Properties::new();
    for (key, value) in raw.unwrap_or_default() {
        let value = match value {
            Value::String(s) => s,
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::Null => continue,
            _ => return Err(ParseFailure::NotScalar(key)),
        };
        properties.insert(qualify(&key), value);
    }

    Ok(properties)
}
