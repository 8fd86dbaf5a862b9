//! Command specification model
//!
//! The command tree is assembled as plain data first and only rendered into a
//! clap [`Command`] at the end, so that dynamic options coming from the
//! property registry can be merged without a parser being present.

use crate::config::{
    build_time_mappers, features_description, flag_name, runtime_mappers, Feature,
    PropertyMapper, TOGGLE_VALUES,
};
use clap::{Arg, ArgAction, Command};
use strum::IntoEnumIterator;

/// Placeholder shown for option values in help text
pub const VALUE_LABEL: &str = "<value>";

/// Name the root command is displayed under
pub const COMMAND_NAME: &str = "serverctl";

pub const START: &str = "start";
pub const START_DEV: &str = "start-dev";
pub const CONFIG: &str = "config";
pub const SHOW_CONFIG: &str = "show-config";

/// A single option definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    /// Flag including the leading dashes, e.g. `--db-url`
    pub name: String,
    pub description: String,
    /// Placeholder for the value in help text
    pub param_label: String,
    /// Restricts the accepted values when not empty
    pub possible_values: Vec<String>,
    /// Applies to every subcommand
    pub global: bool,
    /// Takes no value
    pub switch: bool,
}

impl OptionSpec {
    /// Option taking a single string value
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        OptionSpec {
            name: name.into(),
            description: description.into(),
            param_label: VALUE_LABEL.to_string(),
            possible_values: Vec::new(),
            global: false,
            switch: false,
        }
    }

    /// Option without a value
    pub fn switch(name: impl Into<String>, description: impl Into<String>) -> Self {
        OptionSpec {
            switch: true,
            ..OptionSpec::new(name, description)
        }
    }

    pub fn param_label(mut self, label: impl Into<String>) -> Self {
        self.param_label = label.into();
        self
    }

    pub fn possible_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.possible_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn global(mut self) -> Self {
        self.global = true;
        self
    }

    /// Flag name without the leading dashes
    pub fn long(&self) -> &str {
        self.name.trim_start_matches('-')
    }

    fn to_arg(&self) -> Arg {
        let mut arg = Arg::new(self.long().to_string())
            .long(self.long().to_string())
            .help(self.description.clone())
            .global(self.global);

        if self.switch {
            return arg.action(ArgAction::SetTrue);
        }

        arg = arg
            .action(ArgAction::Set)
            .num_args(1)
            .value_name(
                self.param_label
                    .trim_start_matches('<')
                    .trim_end_matches('>')
                    .to_string(),
            );

        if !self.possible_values.is_empty() {
            arg = arg.value_parser(self.possible_values.clone());
        }

        arg
    }
}

/// A command with its options and subcommands, both kept in insertion order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: String,
    pub about: Option<String>,
    pub version: Option<String>,
    options: Vec<OptionSpec>,
    subcommands: Vec<CommandSpec>,
}

impl CommandSpec {
    pub fn new(name: impl Into<String>) -> Self {
        CommandSpec {
            name: name.into(),
            about: None,
            version: None,
            options: Vec::new(),
            subcommands: Vec::new(),
        }
    }

    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Add a subcommand; a name that is already taken is ignored
    pub fn subcommand(mut self, command: CommandSpec) -> Self {
        if self.get_subcommand(&command.name).is_none() {
            self.subcommands.push(command);
        }
        self
    }

    pub fn with_option(mut self, option: OptionSpec) -> Self {
        self.add_option(option);
        self
    }

    /// Add an option unless one with the same name exists.
    ///
    /// Returns whether the option was added.
    pub fn add_option(&mut self, option: OptionSpec) -> bool {
        if self.has_option(&option.name) {
            return false;
        }
        self.options.push(option);
        true
    }

    pub fn has_option(&self, name: &str) -> bool {
        self.options.iter().any(|o| o.name == name)
    }

    pub fn get_option(&self, name: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.name == name)
    }

    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    pub fn subcommands(&self) -> &[CommandSpec] {
        &self.subcommands
    }

    pub fn get_subcommand(&self, name: &str) -> Option<&CommandSpec> {
        self.subcommands.iter().find(|c| c.name == name)
    }

    pub fn get_subcommand_mut(&mut self, name: &str) -> Option<&mut CommandSpec> {
        self.subcommands.iter_mut().find(|c| c.name == name)
    }

    /// Render the specification into a clap command
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(self.name.clone());

        if let Some(about) = &self.about {
            cmd = cmd.about(about.clone());
        }

        if let Some(version) = &self.version {
            cmd = cmd.version(version.clone());
        }

        for option in &self.options {
            cmd = cmd.arg(option.to_arg());
        }

        for sub in &self.subcommands {
            cmd = cmd.subcommand(sub.to_command());
        }

        cmd
    }
}

/// Register one option per mapper on a subcommand.
///
/// The flag is derived by `transform`, stripped of the namespace prefix and
/// prefixed with `--`. Mappers without a description are skipped, as are
/// flags the subcommand already has. Unknown subcommands are left alone.
pub fn add_mapper_options<F>(
    spec: CommandSpec,
    command: &str,
    mappers: &[PropertyMapper],
    transform: F,
) -> CommandSpec
where
    F: Fn(&str) -> String,
{
    let mut spec = spec;
    if let Some(target) = spec.get_subcommand_mut(command) {
        for mapper in mappers {
            let Some(description) = mapper.description else {
                continue;
            };
            let Some(name) = flag_name(&transform(mapper.from)) else {
                continue;
            };
            target.add_option(OptionSpec::new(name, description));
        }
    }
    spec
}

/// The statically declared command tree, before dynamic options are merged
pub fn base_specification() -> CommandSpec {
    CommandSpec::new(COMMAND_NAME)
        .about("Server launcher")
        .version(crate::VERSION)
        .with_option(
            OptionSpec::switch("--verbose", "Print out more details when running this command.")
                .global(),
        )
        .with_option(
            OptionSpec::new("--profile", "Set the profile. Use 'dev' profile to enable development mode.")
                .param_label("<profile>")
                .global(),
        )
        .with_option(
            OptionSpec::new("--config-file", "Set the path to a configuration file.")
                .param_label("<file>")
                .global(),
        )
        .subcommand(CommandSpec::new(START).about("Start the server."))
        .subcommand(CommandSpec::new(START_DEV).about("Start the server in development mode."))
        .subcommand(CommandSpec::new(CONFIG).about("Update the server configuration."))
        .subcommand(CommandSpec::new(SHOW_CONFIG).about("Print out the current configuration."))
}

/// Build the complete command tree with options from the property registry
pub fn build_specification() -> CommandSpec {
    build_specification_with(
        base_specification(),
        runtime_mappers(),
        build_time_mappers(),
        crate::config::to_cli_format,
    )
}

/// Merge the given registries into `base`
pub fn build_specification_with<F>(
    base: CommandSpec,
    runtime: &[PropertyMapper],
    build_time: &[PropertyMapper],
    transform: F,
) -> CommandSpec
where
    F: Fn(&str) -> String,
{
    let mut spec = base;
    spec = add_mapper_options(spec, START, runtime, &transform);
    spec = add_mapper_options(spec, START_DEV, runtime, &transform);
    spec = add_mapper_options(spec, CONFIG, runtime, &transform);
    spec = add_mapper_options(spec, CONFIG, build_time, &transform);

    if let Some(config) = spec.get_subcommand_mut(CONFIG) {
        config.add_option(OptionSpec::new("--features", features_description()));

        for feature in Feature::iter() {
            config.add_option(
                OptionSpec::new(feature.flag(), feature.description())
                    .possible_values(TOGGLE_VALUES),
            );
        }
    }

    spec
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::to_cli_format;

    fn option_names(spec: &CommandSpec, command: &str) -> Vec<String> {
        spec.get_subcommand(command)
            .unwrap()
            .options()
            .iter()
            .map(|o| o.name.clone())
            .collect()
    }

    #[test]
    fn test_add_option_first_wins() {
        let mut spec = CommandSpec::new("start");
        assert!(spec.add_option(OptionSpec::new("--db", "first")));
        assert!(!spec.add_option(OptionSpec::new("--db", "second")));

        assert_eq!(spec.options().len(), 1);
        assert_eq!(spec.get_option("--db").unwrap().description, "first");
    }

    #[test]
    fn test_add_mapper_options() {
        let mappers = [
            PropertyMapper::new("kc.db.url", "url"),
            PropertyMapper::internal("kc.db.driver"),
            PropertyMapper::new("kc.hostname", "host"),
        ];
        let spec = CommandSpec::new("root").subcommand(CommandSpec::new("start"));
        let spec = add_mapper_options(spec, "start", &mappers, to_cli_format);

        assert_eq!(option_names(&spec, "start"), vec!["--db-url", "--hostname"]);
    }

    #[test]
    fn test_add_mapper_options_is_idempotent() {
        let first = [PropertyMapper::new("kc.db.url", "first")];
        let second = [PropertyMapper::new("kc.db.url", "second")];
        let spec = CommandSpec::new("root").subcommand(CommandSpec::new("start"));
        let spec = add_mapper_options(spec, "start", &first, to_cli_format);
        let spec = add_mapper_options(spec, "start", &second, to_cli_format);

        let start = spec.get_subcommand("start").unwrap();
        assert_eq!(start.options().len(), 1);
        assert_eq!(start.get_option("--db-url").unwrap().description, "first");
    }

    #[test]
    fn test_add_mapper_options_uses_transform() {
        let mappers = [PropertyMapper::new("kc.anything", "desc")];
        let spec = CommandSpec::new("root").subcommand(CommandSpec::new("start"));
        let spec = add_mapper_options(spec, "start", &mappers, |_| "xx.custom".to_string());

        assert_eq!(option_names(&spec, "start"), vec!["--custom"]);
    }

    #[test]
    fn test_add_mapper_options_unknown_command() {
        let mappers = [PropertyMapper::new("kc.db.url", "url")];
        let spec = CommandSpec::new("root");
        let spec = add_mapper_options(spec, "start", &mappers, to_cli_format);
        assert!(spec.subcommands().is_empty());
    }

    #[test]
    fn test_build_specification_subcommands() {
        let spec = build_specification();
        let names: Vec<&str> = spec.subcommands().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec![START, START_DEV, CONFIG, SHOW_CONFIG]);
    }

    #[test]
    fn test_runtime_options_on_every_start_command() {
        let spec = build_specification();
        let expected: Vec<String> = runtime_mappers()
            .iter()
            .filter(|m| m.description.is_some())
            .filter_map(|m| m.flag())
            .collect();

        for command in [START, START_DEV, CONFIG] {
            let names = option_names(&spec, command);
            for flag in &expected {
                assert_eq!(
                    names.iter().filter(|n| *n == flag).count(),
                    1,
                    "{} missing on {}",
                    flag,
                    command
                );
            }
        }
        assert!(!option_names(&spec, START).contains(&"--db-driver".to_string()));
        assert!(option_names(&spec, SHOW_CONFIG).is_empty());
    }

    #[test]
    fn test_build_time_options_only_on_config() {
        let spec = build_specification();
        assert!(option_names(&spec, CONFIG).contains(&"--db".to_string()));
        assert!(option_names(&spec, CONFIG).contains(&"--metrics-enabled".to_string()));
        assert!(!option_names(&spec, START).contains(&"--db".to_string()));
    }

    #[test]
    fn test_feature_options() {
        let spec = build_specification();
        let config = spec.get_subcommand(CONFIG).unwrap();

        let features = config.get_option("--features").unwrap();
        assert_eq!(features.description, features_description());

        let toggles: Vec<&OptionSpec> = config
            .options()
            .iter()
            .filter(|o| o.name.starts_with("--features-"))
            .collect();
        assert_eq!(toggles.len(), Feature::iter().count());
        assert!(config.has_option("--features-token_exchange"));
        assert!(!spec.get_subcommand(START).unwrap().has_option("--features"));
    }

    #[test]
    fn test_to_command_is_valid() {
        build_specification().to_command().debug_assert();
    }

    #[test]
    fn test_to_command_parses_dynamic_option() {
        let matches = build_specification()
            .to_command()
            .try_get_matches_from(["serverctl", "start", "--db-url", "jdbc:h2:mem"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, START);
        assert_eq!(sub.get_one::<String>("db-url").unwrap(), "jdbc:h2:mem");
    }

    #[test]
    fn test_to_command_rejects_bad_toggle() {
        let result = build_specification()
            .to_command()
            .try_get_matches_from(["serverctl", "config", "--features-docker", "maybe"]);
        assert!(result.is_err());
    }
}
