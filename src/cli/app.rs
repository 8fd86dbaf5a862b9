//! Main CLI application

use crate::cli::args::filter_provider_args;
use crate::cli::report::{Reporter, StreamSink, TracingSink};
use crate::cli::spec::{build_specification, CommandSpec, START_DEV};
use crate::error::{ConfigurationError, LaunchError};
use crate::exitcode;
use crate::launcher::{Launcher, ServerLauncher, DEFAULT_PROFILE, DEV_PROFILE};
use clap::{ArgMatches, Command};
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::Path;

/// Result of parsing an argument list against a [`CommandSpec`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Root command followed by the matched subcommands
    pub command_path: Vec<String>,
    /// Arguments as seen by the parser
    pub expanded_args: Vec<String>,
    /// Values of the options given, keyed by flag
    pub options: BTreeMap<String, String>,
    pub verbose: bool,
    /// Option names seen before provider options were removed
    pub config_args: String,
}

impl Invocation {
    /// Collect the values of every option declared along the matched path
    pub fn from_matches(
        spec: &CommandSpec,
        args: &[String],
        config_args: String,
        matches: &ArgMatches,
    ) -> Self {
        let mut command_path = vec![spec.name.clone()];
        let mut options = BTreeMap::new();

        let mut current_spec = spec;
        let mut current = matches;
        collect_options(current_spec, current, &mut options);

        while let Some((name, sub)) = current.subcommand() {
            command_path.push(name.to_string());
            let Some(sub_spec) = current_spec.get_subcommand(name) else {
                break;
            };
            current_spec = sub_spec;
            current = sub;
            collect_options(current_spec, current, &mut options);
        }

        Invocation {
            command_path,
            expanded_args: args.to_vec(),
            options,
            verbose: args.iter().any(|arg| arg == "--verbose"),
            config_args,
        }
    }

    /// The subcommand that was matched, if any
    pub fn command(&self) -> Option<&str> {
        self.command_path.get(1).map(String::as_str)
    }

    pub fn option(&self, flag: &str) -> Option<&str> {
        self.options.get(flag).map(String::as_str)
    }

    pub fn config_file(&self) -> Option<&Path> {
        self.option("--config-file").map(Path::new)
    }

    /// The profile in effect; `start-dev` always runs the dev profile
    pub fn profile_or_default(&self) -> &str {
        if self.command() == Some(START_DEV) {
            return DEV_PROFILE;
        }
        self.option("--profile").unwrap_or(DEFAULT_PROFILE)
    }
}

fn collect_options(spec: &CommandSpec, matches: &ArgMatches, options: &mut BTreeMap<String, String>) {
    for option in spec.options().iter().filter(|o| !o.switch) {
        if let Some(value) = matches.get_one::<String>(option.long()) {
            options.insert(option.name.clone(), value.clone());
        }
    }
}

/// CLI application
pub struct Cli {
    spec: CommandSpec,
}

impl Cli {
    pub fn new(spec: CommandSpec) -> Self {
        Cli { spec }
    }

    /// Parse `args` and run the matched command, returning the exit code.
    ///
    /// `args` must not include the program name.
    pub fn execute<L: Launcher + ?Sized>(
        &self,
        args: &[String],
        config_args: String,
        launcher: &mut L,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> i32 {
        let mut command = self.spec.to_command();
        let argv = std::iter::once(self.spec.name.clone()).chain(args.iter().cloned());

        let matches = match command.try_get_matches_from_mut(argv) {
            Ok(matches) => matches,
            Err(e) => {
                let stream: &mut dyn Write = if e.use_stderr() { err } else { out };
                let _ = write!(stream, "{}", e.render());
                return e.exit_code();
            }
        };

        let invocation = Invocation::from_matches(&self.spec, args, config_args, &matches);

        // No command given, show help
        if invocation.command().is_none() {
            let _ = write!(out, "{}", command.render_help());
            return exitcode::OK;
        }

        let launched = {
            let mut sink = StreamSink::new(&mut *out, &mut *err, io::stderr());
            launcher.launch(&invocation, &mut sink)
        };

        match launched {
            Ok(()) => exitcode::OK,
            Err(LaunchError::Configuration(cause)) => {
                let started = launcher.platform().is_started();
                self.report_failure(&invocation, &cause, started, out, err)
            }
            Err(other) => handle_execution_error(&command, &invocation, &other, err),
        }
    }

    fn report_failure(
        &self,
        invocation: &Invocation,
        cause: &ConfigurationError,
        started: bool,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> i32 {
        let message = format!(
            "Failed to start server using profile ({}).",
            invocation.profile_or_default()
        );

        if started {
            let mut sink = TracingSink;
            Reporter::new(&mut sink).report(&invocation.expanded_args, &message, Some(cause as _))
        } else {
            let mut sink = StreamSink::new(out, err, io::stderr());
            Reporter::new(&mut sink).report(&invocation.expanded_args, &message, Some(cause as _))
        }
    }
}

/// Print the failure and the usage of the failing command
fn handle_execution_error(
    command: &Command,
    invocation: &Invocation,
    error: &LaunchError,
    err: &mut dyn Write,
) -> i32 {
    let _ = writeln!(err, "{}", error);

    let mut target = command.clone();
    for name in invocation.command_path.iter().skip(1) {
        let Some(sub) = target.find_subcommand(name).cloned() else {
            break;
        };
        target = sub;
    }
    let _ = write!(err, "{}", target.render_help());

    exitcode::EXIT_CODE_ON_EXECUTION_EXCEPTION
}

/// Run the CLI application with the process arguments
pub fn run() -> i32 {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let config_args = filter_provider_args(&mut args);

    let cli = Cli::new(build_specification());
    let mut launcher = ServerLauncher::new();

    let stdout = io::stdout();
    let stderr = io::stderr();
    cli.execute(
        &args,
        config_args,
        &mut launcher,
        &mut stdout.lock(),
        &mut stderr.lock(),
    )
}
