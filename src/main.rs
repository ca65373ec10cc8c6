//! The `ansilust` launcher binary.
//!
//! Deliberately not a clap CLI: every argument, `--help` and `--version`
//! included, belongs to the native binary and is forwarded verbatim. The
//! launcher's only surface is its error output and its exit status.

use std::ffi::OsString;
use std::process;

use ansilust::launcher;
use ansilust::process::ExecOutcome;
use ansilust::runtime::RealRuntime;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let runtime = RealRuntime;
    let args: Vec<OsString> = std::env::args_os().skip(1).collect();

    match launcher::launch(&runtime, &args) {
        Ok(outcome) => {
            if let ExecOutcome::SpawnFailed(e) = &outcome {
                eprintln!("Error: failed to run the ansilust binary: {}", e);
            }
            process::exit(outcome.exit_code());
        }
        Err(err) => {
            eprintln!("{}", err.render());
            process::exit(1);
        }
    }
}
