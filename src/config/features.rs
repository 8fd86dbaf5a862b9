//! Server feature toggles
//!
//! Features are switched on as a group with `--features` or one by one with
//! `--features-<name>`.

use strum::{EnumIter, IntoEnumIterator, IntoStaticStr};

/// Groups of features that can be enabled together
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum FeatureType {
    Default,
    Preview,
}

/// Individually switchable features
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Feature {
    Authorization,
    AccountApi,
    Account2,
    Admin2,
    AdminFineGrainedAuthz,
    Ciba,
    ClientPolicies,
    DeclarativeUserProfile,
    Docker,
    Impersonation,
    MapStorage,
    OpenshiftIntegration,
    Par,
    Scripts,
    TokenExchange,
    UploadScripts,
    WebAuthn,
}

/// Values accepted by `--features-<name>`
pub const TOGGLE_VALUES: [&str; 2] = ["enabled", "disabled"];

impl FeatureType {
    /// Canonical upper-case name
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Name as written on the command line
    pub fn cli_name(self) -> String {
        self.name().to_lowercase()
    }

    /// Look up a group by its command line name
    pub fn from_cli_name(name: &str) -> Option<Self> {
        FeatureType::iter().find(|t| t.cli_name() == name)
    }
}

impl Feature {
    /// Canonical upper-case name
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Name as written on the command line
    pub fn cli_name(self) -> String {
        self.name().to_lowercase()
    }

    /// The flag toggling this feature, e.g. `--features-docker`
    pub fn flag(self) -> String {
        format!("--features-{}", self.cli_name())
    }

    /// Help text for the feature's flag
    pub fn description(self) -> String {
        format!(
            "Enables the {} feature. Set enabled to enable the feature or disabled otherwise.",
            self.name()
        )
    }
}

/// Help text for the `--features` flag
pub fn features_description() -> String {
    let types: Vec<String> = FeatureType::iter().map(FeatureType::cli_name).collect();
    format!(
        "Enables a group of features. Possible values are: {}",
        types.join(",")
    )
}
