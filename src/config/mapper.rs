//! Configuration property metadata
//!
//! Every configurable property is described by a [`PropertyMapper`]. The
//! registry is split into runtime properties, which can change on every
//! start, and build-time properties, which are baked in by `config`.

/// Namespace prefix carried by every property key
pub const NAMESPACE_PREFIX: &str = "kc.";

/// Metadata describing one configurable property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyMapper {
    /// Canonical property key, e.g. `kc.db.url`
    pub from: &'static str,
    /// Help text; properties without one are internal
    pub description: Option<&'static str>,
}

impl PropertyMapper {
    pub const fn new(from: &'static str, description: &'static str) -> Self {
        PropertyMapper {
            from,
            description: Some(description),
        }
    }

    pub const fn internal(from: &'static str) -> Self {
        PropertyMapper {
            from,
            description: None,
        }
    }

    /// The command line flag for this property, e.g. `--db-url`
    pub fn flag(&self) -> Option<String> {
        flag_name(&to_cli_format(self.from))
    }
}

/// Convert a property key into its command line form.
///
/// The namespace is kept and the remaining dots become dashes, so
/// `kc.db.url` becomes `kc.db-url`. Keys without a dot are left untouched.
pub fn to_cli_format(key: &str) -> String {
    if !key.contains('.') {
        return key.to_string();
    }
    let rest = key.get(NAMESPACE_PREFIX.len()..).unwrap_or_default();
    format!("{}{}", NAMESPACE_PREFIX, rest.replace('.', "-"))
}

/// Qualify a bare key such as `db.url` with the namespace
pub fn qualify(key: &str) -> String {
    if key.starts_with(NAMESPACE_PREFIX) {
        key.to_string()
    } else {
        format!("{}{}", NAMESPACE_PREFIX, key)
    }
}

/// Strip the namespace prefix from a transformed key and turn it into a flag.
///
/// Returns `None` when nothing remains after the prefix.
pub fn flag_name(transformed: &str) -> Option<String> {
    let prefix_len = NAMESPACE_PREFIX.chars().count();
    let start = transformed
        .char_indices()
        .nth(prefix_len)
        .map(|(i, _)| i)?;
    Some(format!("--{}", &transformed[start..]))
}

static RUNTIME_MAPPERS: &[PropertyMapper] = &[
    PropertyMapper::new("kc.db.url", "The database JDBC URL. If not provided a default URL is set based on the selected database vendor."),
    PropertyMapper::new("kc.db.username", "The database username."),
    PropertyMapper::new("kc.db.password", "The database password."),
    PropertyMapper::new("kc.db.schema", "The database schema."),
    PropertyMapper::new("kc.db.pool.initial-size", "The initial size of the connection pool."),
    PropertyMapper::new("kc.db.pool.min-size", "The minimal size of the connection pool."),
    PropertyMapper::new("kc.db.pool.max-size", "The maximum size of the connection pool."),
    PropertyMapper::internal("kc.db.driver"),
    PropertyMapper::new("kc.hostname", "The hostname of the server."),
    PropertyMapper::new("kc.http.enabled", "Enables the HTTP listener."),
    PropertyMapper::new("kc.http.host", "The HTTP host."),
    PropertyMapper::new("kc.http.port", "The HTTP port."),
    PropertyMapper::new("kc.https.port", "The HTTPS port."),
    PropertyMapper::new("kc.https.client-auth", "Configures the server to require/request client authentication. none, request, required."),
    PropertyMapper::new("kc.https.cipher-suites", "The cipher suites to use. If none is given, a reasonable default is selected."),
    PropertyMapper::new("kc.https.protocols", "The list of protocols to explicitly enable."),
    PropertyMapper::new("kc.https.certificate.file", "The file path to a server certificate or certificate chain in PEM format."),
    PropertyMapper::new("kc.https.certificate.key-file", "The file path to a private key in PEM format."),
    PropertyMapper::internal("kc.https.certificate.key-store-password"),
    PropertyMapper::new("kc.proxy", "Configure the proxy mode. Possible values: none, edge, reencrypt, passthrough."),
    PropertyMapper::new("kc.log.level", "The log level of the root category or a comma-separated list of individual categories and their levels."),
];

static BUILD_TIME_MAPPERS: &[PropertyMapper] = &[
    PropertyMapper::new("kc.db", "The database vendor. Possible values are: h2-mem, h2-file, mariadb, mssql, mysql, oracle, postgres"),
    PropertyMapper::new("kc.cluster", "Specifies clustering configuration. The specified value points to the infinispan configuration file prefixed with the 'cluster-' inside the distribution configuration directory."),
    PropertyMapper::new("kc.cluster.stack", "Specifies the default stack to use for cluster communication and node discovery."),
    PropertyMapper::new("kc.metrics.enabled", "If the server should expose metrics and healthcheck."),
    PropertyMapper::internal("kc.db-kind"),
];

/// Properties that can be set on every start
pub fn runtime_mappers() -> &'static [PropertyMapper] {
    RUNTIME_MAPPERS
}

/// Properties persisted by the `config` command
pub fn build_time_mappers() -> &'static [PropertyMapper] {
    BUILD_TIME_MAPPERS
}

/// Find the mapper exposed under a command line flag
pub fn mapper_for_flag(flag: &str) -> Option<&'static PropertyMapper> {
    runtime_mappers()
        .iter()
        .chain(build_time_mappers())
        .find(|m| m.flag().as_deref() == Some(flag))
}
