//! Raw argument pre-processing

/// Prefix of options handled by providers rather than the parser
pub const PROVIDER_PREFIX: &str = "--spi";

/// Remove provider options from `args` and list the remaining option names.
///
/// Provider options are dropped in place because the parser has no schema
/// for them yet. The returned string lists each remaining token starting
/// with `--`, joined by commas.
// TODO: register provider options from the provider registry instead of dropping them by prefix
pub fn filter_provider_args(args: &mut Vec<String>) -> String {
    args.retain(|arg| !arg.starts_with(PROVIDER_PREFIX));

    args.iter()
        .filter(|arg| arg.starts_with("--"))
        .cloned()
        .collect::<Vec<_>>()
        .join(",")
}
