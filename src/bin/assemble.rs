use clap::Parser;
use std::path::PathBuf;
use std::process;

use ansilust::assembler::{AssembleOptions, assemble};
use ansilust::runtime::RealRuntime;

/// ansilust-assemble - build installable platform packages
///
/// Reads compiled ansilust binaries from either a CI layout
/// (platform-binaries/{target}/) or a local build (zig-out/bin/ansilust)
/// and writes one package directory per supported target under packages/.
///
/// Targets whose binary was not built this run are skipped; that is not
/// a failure. The exit status is non-zero only when a located binary
/// failed to package.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Project root holding the source binaries and the packages/ output
    #[arg(long = "root", short = 'r', value_name = "PATH", default_value = ".")]
    root: PathBuf,

    /// Version stamped into every package manifest (overrides the root
    /// package.json)
    #[arg(
        long = "release-version",
        env = "ANSILUST_RELEASE_VERSION",
        value_name = "VERSION"
    )]
    release_version: Option<String>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = RealRuntime;

    let options = AssembleOptions {
        root: cli.root,
        version_override: cli.release_version,
    };

    match assemble(&runtime, &options) {
        Ok(summary) if summary.ok() => {}
        Ok(_) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}
