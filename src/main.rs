use std::process;

fn main() {
    process::exit(serverctl::cli::run());
}
