//! xbm - command-line editor for monochrome XBM sprite sheets

use std::process::ExitCode;

use xbm_editor::cli;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();
    cli::run()
}
