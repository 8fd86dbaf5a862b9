//! Startup error reporting
//!
//! Errors are written through a [`Sink`]. Before the server has started the
//! logging subsystem is not ready, so [`StreamSink`] writes straight to the
//! streams the command was invoked with: informational lines to its output,
//! errors to its error stream. Afterwards [`TracingSink`] routes
//! everything through `tracing`.

use crate::error::{chain, ConfigurationError};
use crate::exitcode;
use std::error::Error as StdError;
use std::io::{self, Write};

/// Hint printed after a failure unless `--verbose` was given
pub const VERBOSE_HINT: &str = "For more details run the same command passing the '--verbose' option. Also you can use '--help' to see the details about the usage of the particular command.";

/// Destination for user facing messages
pub trait Sink {
    fn info(&mut self, message: &str);

    /// Report an error, optionally carrying the full cause for diagnostics
    fn error(&mut self, message: &str, cause: Option<&(dyn StdError + 'static)>);
}

/// Sink writing directly to output streams
pub struct StreamSink<O: Write, E: Write, T: Write> {
    out: O,
    err: E,
    trace: T,
}

impl<O: Write, E: Write, T: Write> StreamSink<O, E, T> {
    /// Info goes to `out`, errors to `err` and full diagnostics of attached
    /// causes to `trace`
    pub fn new(out: O, err: E, trace: T) -> Self {
        StreamSink { out, err, trace }
    }

    pub fn into_inner(self) -> (O, E, T) {
        (self.out, self.err, self.trace)
    }
}

impl<O: Write, E: Write, T: Write> Sink for StreamSink<O, E, T> {
    fn info(&mut self, message: &str) {
        let _ = writeln!(self.out, "{}", message);
    }

    fn error(&mut self, message: &str, cause: Option<&(dyn StdError + 'static)>) {
        let _ = writeln!(self.err, "{}", message);
        if let Some(cause) = cause {
            let _ = write_diagnostics(&mut self.trace, cause);
        }
    }
}

/// Sink routing messages through the tracing subscriber
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl Sink for TracingSink {
    fn info(&mut self, message: &str) {
        tracing::info!("{}", message);
    }

    fn error(&mut self, message: &str, cause: Option<&(dyn StdError + 'static)>) {
        match cause {
            Some(cause) => tracing::error!(error = ?cause, "{}", message),
            None => tracing::error!("{}", message),
        }
    }
}

/// Write the debug representation of an error followed by its causes
pub fn write_diagnostics<W: Write + ?Sized>(
    out: &mut W,
    err: &(dyn StdError + 'static),
) -> io::Result<()> {
    writeln!(out, "{:?}", err)?;
    for cause in chain(err).skip(1) {
        writeln!(out, "Caused by: {:?}", cause)?;
    }
    Ok(())
}

/// Formats startup failures for the user
pub struct Reporter<'a> {
    sink: &'a mut dyn Sink,
}

impl<'a> Reporter<'a> {
    pub fn new(sink: &'a mut dyn Sink) -> Self {
        Reporter { sink }
    }

    /// Report `message` and its cause, returning the exit code to use.
    ///
    /// `args` are the arguments of the last parse and decide whether the
    /// output is verbose.
    pub fn report(
        &mut self,
        args: &[String],
        message: &str,
        cause: Option<&(dyn StdError + 'static)>,
    ) -> i32 {
        self.sink.error(&format!("ERROR: {}", message), None);

        if let Some(cause) = cause {
            let verbose = args.iter().any(|arg| arg == "--verbose");

            if let Some(config_error) = cause.downcast_ref::<ConfigurationError>() {
                match config_error.suppressed() {
                    [] => self.dump(cause, verbose),
                    [single] => self.dump(&**single, verbose),
                    many => {
                        self.sink
                            .error("ERROR: Multiple configuration errors during startup", None);
                        for (index, inner) in many.iter().enumerate() {
                            self.sink.error(&format!("ERROR {}", index + 1), None);
                            self.dump(&**inner, verbose);
                        }
                    }
                }
            }

            if !verbose {
                self.sink.error(VERBOSE_HINT, None);
            }
        }

        exitcode::EXIT_CODE_ON_EXECUTION_EXCEPTION
    }

    fn dump(&mut self, cause: &(dyn StdError + 'static), verbose: bool) {
        if verbose {
            self.sink.error("ERROR: Details:", Some(cause));
            return;
        }

        for link in chain(cause) {
            let message = link.to_string();
            if !message.is_empty() {
                self.sink.error(&format!("ERROR: {}", message), None);
            }
        }
    }
}
