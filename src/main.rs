//! CLI entrypoint for `auth0-merge`.
//!
//! Parses command-line arguments, validates input paths, loads data through
//! the library engine, writes the import-ready JSON array to stdout (or a
//! file), and keeps every diagnostic on stderr so the output can be piped.
use std::fs;
use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;
use log::{LevelFilter, error, warn};

use auth0_merge::{
    engine::Engine,
    report::{render_missing_hashes, render_summary},
};

#[derive(Parser, Debug)]
#[command(
    name = "auth0-merge",
    version,
    about = "Merge an Auth0 user export with its password hash export into an import-ready JSON file"
)]
struct Args {
    /// Path to the user export (ndjson, usually gzip-compressed)
    users_file: PathBuf,

    /// Path to the password hash export (ndjson, usually a single-entry zip)
    hashes_file: PathBuf,

    /// Write the merged JSON to a file instead of stdout
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,

    /// Control color output (auto, always, never)
    #[arg(long = "color", value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// Suppress the stderr summary (the JSON output is still written)
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

fn init_logger(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let _ = env_logger::Builder::from_default_env()
        .filter_level(level)
        .try_init();
}

fn verify_inputs(args: &Args) -> Result<()> {
    for p in [&args.users_file, &args.hashes_file] {
        if !p.exists() {
            bail!("input file not found: {}", p.display());
        }
    }
    Ok(())
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version land here too; only real usage errors
            // should exit non-zero
            let is_usage = e.use_stderr();
            let _ = e.print();
            std::process::exit(if is_usage { 1 } else { 0 });
        }
    };
    init_logger(args.verbose);
    match args.color {
        ColorChoice::Always => colored::control::set_override(true),
        ColorChoice::Never => colored::control::set_override(false),
        ColorChoice::Auto => {}
    }
    if let Err(e) = verify_inputs(&args) {
        error!("{}", e);
        std::process::exit(2);
    }

    let mut engine = Engine::new();
    if let Err(e) = engine.load_from_file_paths(&args.users_file, &args.hashes_file) {
        error!("failed to merge exports: {:#}", e);
        std::process::exit(3);
    }

    if engine.profile_count == 0 {
        warn!("no users found in the file: {}", args.users_file.display());
    } else if engine.hash_count == 0 {
        warn!(
            "no password hashes found in the file: {}",
            args.hashes_file.display()
        );
    }

    let json = match serde_json::to_string_pretty(&engine.records) {
        Ok(json) => json,
        Err(e) => {
            error!("failed to serialize output: {}", e);
            std::process::exit(3);
        }
    };
    match &args.output {
        Some(path) => {
            if let Err(e) = fs::write(path, json + "\n") {
                error!("failed to write {}: {}", path.display(), e);
                std::process::exit(4);
            }
        }
        None => println!("{}", json),
    }

    if !args.quiet {
        eprintln!("{}", render_summary(&engine));
    }
    let missing_block = render_missing_hashes(&engine.missing_hashes);
    if !missing_block.is_empty() {
        eprint!("{}", missing_block);
    }
}
